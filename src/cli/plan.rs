//! Plan command handler.

use std::path::PathBuf;

use color_eyre::Result;

use crate::binding::{Binder, BindingPlan, ClassSchema, ConventionKind};
use crate::config::BinderSettings;
use crate::context::Context;
use crate::di::FromRef;
use crate::error::AppError;

/// Show which methods of a class manifest take part in binding.
#[derive(clap::Args, Debug)]
pub struct PlanCommand {
    /// TOML class manifest
    pub manifest: PathBuf,

    /// Annotation convention (overrides configuration)
    #[arg(long, value_enum)]
    pub convention: Option<ConventionKind>,

    /// Fail when a method needs a dependency the class does not inject
    #[arg(long)]
    pub strict: bool,
}

impl PlanCommand {
    pub fn run(self, ctx: &Context) -> Result<()> {
        let plan = self.plan(ctx)?;
        println!("{}", serde_json::to_string_pretty(&plan)?);
        Ok(())
    }

    /// Computes the plan without printing it.
    pub fn plan(&self, ctx: &Context) -> Result<BindingPlan, AppError> {
        let binder = self.binder(ctx);
        let schema = ClassSchema::from_file(&self.manifest)?;
        tracing::info!(
            "Planning {} ({} methods) with {}",
            schema.name,
            schema.methods.len(),
            binder.settings().convention
        );

        let plan = binder.plan(&schema)?;
        if binder.settings().strict {
            plan.check_declared()?;
        }
        Ok(plan)
    }

    fn binder(&self, ctx: &Context) -> Binder {
        if self.convention.is_none() && !self.strict {
            return Binder::from_ref(ctx);
        }
        let configured = &ctx.settings;
        Binder::new(BinderSettings {
            convention: self.convention.unwrap_or(configured.convention),
            strict: self.strict || configured.strict,
        })
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;
    use crate::config::Config;

    const MANIFEST: &str = r#"
name = "Greeter"
inject = ["logger"]

[methods.greet]
annotation = "/* $inject: logger */"

[methods.shout]
annotation = "/* $inject: logger, volume */"

[methods.wave]
"#;

    fn manifest(text: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(text.as_bytes()).unwrap();
        file
    }

    fn command(file: &tempfile::NamedTempFile) -> PlanCommand {
        PlanCommand {
            manifest: file.path().to_path_buf(),
            convention: None,
            strict: false,
        }
    }

    #[test]
    fn test_plan_from_manifest() {
        let file = manifest(MANIFEST);
        let plan = command(&file).plan(&Context::new(Config::default())).unwrap();

        assert_eq!(plan.class, "Greeter");
        let participating: Vec<_> = plan.participating().map(|m| m.name.as_str()).collect();
        assert_eq!(participating, vec!["greet", "shout"]);
    }

    #[test]
    fn test_strict_flag_rejects_undeclared() {
        let file = manifest(MANIFEST);
        let cmd = PlanCommand {
            strict: true,
            ..command(&file)
        };
        let err = cmd.plan(&Context::new(Config::default())).unwrap_err();
        assert!(matches!(err, AppError::UnresolvedDependency { ref dependency, .. } if dependency == "volume"));
    }

    #[test]
    fn test_strict_from_config() {
        let file = manifest(MANIFEST);
        let mut config = Config::default();
        config.binder.strict = true;
        assert!(command(&file).plan(&Context::new(config)).is_err());
    }

    #[test]
    fn test_convention_override() {
        let file = manifest(MANIFEST);
        let cmd = PlanCommand {
            convention: Some(ConventionKind::EnabledFlag),
            ..command(&file)
        };
        let err = cmd.plan(&Context::new(Config::default())).unwrap_err();
        assert!(matches!(err, AppError::Binding { ref method, .. } if method == "greet"));
    }

    #[test]
    fn test_missing_manifest() {
        let cmd = PlanCommand {
            manifest: PathBuf::from("/nonexistent/manifest.toml"),
            convention: None,
            strict: false,
        };
        let err = cmd.plan(&Context::new(Config::default())).unwrap_err();
        assert_eq!(err.code(), "MANIFEST_ERROR");
    }
}
