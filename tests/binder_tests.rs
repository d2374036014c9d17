//! Binder behaviour through the public API.

use std::sync::{Arc, Mutex};

use prebind::binding::{BindState, ConventionKind, EnabledFlag, MarkerComment};
use prebind::config::BinderSettings;
use prebind::{args, AppError, Args, Binder, ClassDescriptor, Instance, MethodSignature, Value};

#[derive(Default)]
struct ConsoleLogger {
    lines: Mutex<Vec<String>>,
}

impl ConsoleLogger {
    fn log(&self, line: impl Into<String>) {
        self.lines.lock().unwrap().push(line.into());
    }

    fn lines(&self) -> Vec<String> {
        self.lines.lock().unwrap().clone()
    }
}

/// A method that records the string form of every argument it receives.
fn recorder(name: &'static str) -> impl Fn(&Instance, Args) -> anyhow::Result<prebind::binding::Output> {
    move |_this, args| {
        let seen: Vec<String> = args
            .iter()
            .map(|arg| match arg {
                Some(v) => v
                    .downcast_ref::<&str>()
                    .map(|s| s.to_string())
                    .unwrap_or_else(|| "?".to_string()),
                None => "<absent>".to_string(),
            })
            .collect();
        Ok(Some(Value::new(format!("{name}({})", seen.join(", ")))))
    }
}

fn output_string(out: Option<Value>) -> String {
    out.and_then(|v| v.downcast::<String>())
        .map(|s| s.as_str().to_string())
        .unwrap_or_default()
}

fn strict_binder() -> Binder {
    Binder::new(BinderSettings {
        convention: ConventionKind::MarkerComment,
        strict: true,
    })
}

mod attach_phase {
    use super::*;

    #[test]
    fn test_positional_pairing() {
        let class = ClassDescriptor::builder("C").inject(["a", "b", "c"]).build();
        let values = vec![Value::new(1_u8), Value::new(2_u8), Value::new(3_u8)];

        let bound = Binder::default()
            .bind(&class, &Instance::new(), values.clone())
            .unwrap();

        for (name, value) in ["a", "b", "c"].iter().zip(&values) {
            assert!(bound.dependency(name).unwrap().ptr_eq(value));
        }
        let keys: Vec<_> = bound.dependencies().map(|(k, _)| k.as_str()).collect();
        assert_eq!(keys, vec!["_a", "_b", "_c"]);
    }

    #[test]
    fn test_mismatch_rejected_and_target_unmutated() {
        let class = ClassDescriptor::builder("C")
            .inject(["a", "b"])
            .method("m", MethodSignature::inject(["a"]), recorder("m"))
            .build();
        let target = Instance::of(&class);
        let before = target.method("m").unwrap().clone();

        let err = Binder::default()
            .bind(&class, &target, vec![Value::new("x")])
            .unwrap_err();

        assert!(matches!(
            err,
            AppError::InvalidArgument { expected: 2, actual: 1, .. }
        ));
        assert_eq!(target.dependencies().count(), 0);
        assert!(target.method("m").unwrap().ptr_eq(&before));
        assert_eq!(target.state(), &BindState::Unbound);
    }

    #[test]
    fn test_existing_fields_survive() {
        let class = ClassDescriptor::builder("C").inject(["a"]).build();
        let target = Instance::new().with_field("name", Value::new("kept"));

        let bound = Binder::default()
            .bind(&class, &target, vec![Value::new("x")])
            .unwrap();

        assert_eq!(*bound.field("name").unwrap().downcast::<&str>().unwrap(), "kept");
    }
}

mod rebind_phase {
    use super::*;

    #[test]
    fn test_marker_comment_extraction() {
        let class = ClassDescriptor::builder("C")
            .inject(["a", "b"])
            .method("m", MethodSignature::inject(["a", "b"]), recorder("m"))
            .build();

        let bound = Binder::default()
            .bind_with(
                &MarkerComment,
                &class,
                &Instance::of(&class),
                vec![Value::new("X"), Value::new("Y")],
            )
            .unwrap();

        let out = bound.call("m", args!["Z"]).unwrap();
        assert_eq!(output_string(out), "m(X, Y, Z)");
    }

    #[test]
    fn test_enabled_flag_extraction() {
        let class = ClassDescriptor::builder("C")
            .inject(["a", "b"])
            .method("m", MethodSignature::enabled(["a", "b"]), recorder("m"))
            .build();

        let bound = Binder::default()
            .bind_with(
                &EnabledFlag,
                &class,
                &Instance::of(&class),
                vec![Value::new("X"), Value::new("Y")],
            )
            .unwrap();

        let out = bound.call("m", args!["Z"]).unwrap();
        assert_eq!(output_string(out), "m(X, Y, Z)");
    }

    #[test]
    fn test_enabled_flag_from_configuration() {
        let class = ClassDescriptor::builder("C")
            .inject(["b"])
            .method("m", MethodSignature::enabled(["b"]), recorder("m"))
            .build();
        let binder = Binder::new(BinderSettings {
            convention: ConventionKind::EnabledFlag,
            strict: false,
        });

        let bound = binder
            .bind(&class, &Instance::of(&class), vec![Value::new("Y")])
            .unwrap();

        assert_eq!(output_string(bound.call("m", Args::new()).unwrap()), "m(Y)");
    }

    #[test]
    fn test_annotation_order_governs_binding_order() {
        let class = ClassDescriptor::builder("C")
            .inject(["a", "b"])
            .method("m", MethodSignature::inject(["b", "a"]), recorder("m"))
            .build();

        let bound = Binder::default()
            .bind(&class, &Instance::of(&class), vec![Value::new("X"), Value::new("Y")])
            .unwrap();

        assert_eq!(output_string(bound.call("m", args![]).unwrap()), "m(Y, X)");
    }

    #[test]
    fn test_non_participating_method_is_untouched() {
        let class = ClassDescriptor::builder("C")
            .inject(["a"])
            .method("plain", MethodSignature::new().params(["a"]), recorder("plain"))
            .method("noted", MethodSignature::new().annotation("/* pure */"), recorder("noted"))
            .method("m", MethodSignature::inject(["a"]), recorder("m"))
            .build();
        let target = Instance::of(&class);

        let bound = Binder::default()
            .bind(&class, &target, vec![Value::new("X")])
            .unwrap();

        for name in ["plain", "noted"] {
            assert!(bound.method(name).unwrap().ptr_eq(target.method(name).unwrap()));
        }
        assert!(!bound.method("m").unwrap().ptr_eq(target.method("m").unwrap()));
        assert_eq!(output_string(bound.call("plain", args!["Z"]).unwrap()), "plain(Z)");
    }

    #[test]
    fn test_marker_lookalike_is_untouched() {
        let class = ClassDescriptor::builder("C")
            .inject(["a"])
            .method(
                "plain",
                MethodSignature::new().annotation("/* resolved by the $injector */"),
                recorder("plain"),
            )
            .method("m", MethodSignature::inject(["a"]), recorder("m"))
            .build();
        let target = Instance::of(&class);

        let bound = Binder::default()
            .bind(&class, &target, vec![Value::new("X")])
            .unwrap();

        assert!(bound.method("plain").unwrap().ptr_eq(target.method("plain").unwrap()));
        assert_eq!(output_string(bound.call("plain", args!["Z"]).unwrap()), "plain(Z)");
    }

    #[test]
    fn test_method_table_order_and_state() {
        let class = ClassDescriptor::builder("C")
            .inject(["a"])
            .method("zeta", MethodSignature::new(), recorder("zeta"))
            .method("alpha", MethodSignature::inject(["a"]), recorder("alpha"))
            .build();
        let target = Instance::of(&class);
        assert!(!target.is_bound());

        let bound = Binder::default()
            .bind(&class, &target, vec![Value::new("X")])
            .unwrap();

        assert!(bound.is_bound());
        assert!(!target.is_bound());
        let names: Vec<_> = bound.method_names().collect();
        assert_eq!(names, vec!["zeta", "alpha"]);
    }

    #[test]
    fn test_caller_arguments_follow_bound_ones() {
        let class = ClassDescriptor::builder("C")
            .inject(["a"])
            .method("m", MethodSignature::inject(["a"]), recorder("m"))
            .build();
        let bound = Binder::default()
            .bind(&class, &Instance::new(), vec![Value::new("X")])
            .unwrap();

        let mut args = Args::new();
        args.push(Value::new("Y"));
        args.push_arg(None);

        assert_eq!(output_string(bound.call("m", args).unwrap()), "m(X, Y, <absent>)");
    }

    #[test]
    fn test_non_participating_method_is_not_copied() {
        let class = ClassDescriptor::builder("C")
            .method("plain", MethodSignature::new(), recorder("plain"))
            .method("m", MethodSignature::inject(["a"]), recorder("m"))
            .build();

        // Target without any methods: only the participating one is installed
        let bound = Binder::default()
            .bind(&class, &Instance::new(), Vec::new())
            .unwrap();

        assert!(bound.method("plain").is_none());
        assert!(bound.method("m").is_some());
    }

    #[test]
    fn test_unresolved_dependency_is_absent() {
        let class = ClassDescriptor::builder("C")
            .inject(["a"])
            .method("m", MethodSignature::inject(["a", "missing"]), recorder("m"))
            .build();

        let bound = Binder::default()
            .bind(&class, &Instance::of(&class), vec![Value::new("X")])
            .unwrap();

        assert_eq!(output_string(bound.call("m", args![]).unwrap()), "m(X, <absent>)");
    }

    #[test]
    fn test_strict_mode_rejects_unresolved() {
        let class = ClassDescriptor::builder("C")
            .method("m", MethodSignature::inject(["missing"]), recorder("m"))
            .build();

        let err = strict_binder()
            .bind(&class, &Instance::of(&class), Vec::new())
            .unwrap_err();

        assert!(matches!(
            err,
            AppError::UnresolvedDependency { ref method, ref dependency, .. }
                if method == "m" && dependency == "missing"
        ));
    }

    #[test]
    fn test_previously_attached_dependency_resolves() {
        let class = ClassDescriptor::builder("C")
            .method("m", MethodSignature::inject(["early"]), recorder("m"))
            .build();
        let mut target = Instance::of(&class);
        target.attach("early", Value::new("E"));

        let bound = strict_binder().bind(&class, &target, Vec::new()).unwrap();

        assert_eq!(output_string(bound.call("m", args![]).unwrap()), "m(E)");
    }

    #[test]
    fn test_static_plan_check_ignores_preattached_values() {
        let class = ClassDescriptor::builder("C")
            .method("m", MethodSignature::inject(["early"]), recorder("m"))
            .build();
        let mut target = Instance::of(&class);
        target.attach("early", Value::new("E"));

        // The plan only sees the class's inject list
        let plan = strict_binder().plan(class.schema()).unwrap();
        assert!(plan.check_declared().is_err());
        assert!(strict_binder().bind(&class, &target, Vec::new()).is_ok());
    }

    #[test]
    fn test_receiver_is_the_bound_instance() {
        let class = ClassDescriptor::builder("C")
            .inject(["a"])
            .method("peek", MethodSignature::inject(["a"]), |this, args| {
                let injected = args.raw(0).cloned().flatten();
                let attached = this.dependency("a").cloned();
                let same = match (injected, attached) {
                    (Some(x), Some(y)) => x.ptr_eq(&y),
                    _ => false,
                };
                Ok(Some(Value::new(same)))
            })
            .build();

        let bound = Binder::default()
            .bind(&class, &Instance::new(), vec![Value::new(5_u32)])
            .unwrap();

        let out = bound.call("peek", args![]).unwrap().unwrap();
        assert!(*out.downcast::<bool>().unwrap());
    }
}

mod errors {
    use super::*;

    #[test]
    fn test_malformed_annotation_names_method() {
        let class = ClassDescriptor::builder("Greeter")
            .inject(["logger"])
            .method("ok", MethodSignature::inject(["logger"]), recorder("ok"))
            .method(
                "typo",
                MethodSignature::new().annotation("/* $inject logger */"),
                recorder("typo"),
            )
            .build();
        let target = Instance::of(&class);

        let err = Binder::default()
            .bind(&class, &target, vec![Value::new("L")])
            .unwrap_err();

        match err {
            AppError::Binding { class, method, .. } => {
                assert_eq!(class, "Greeter");
                assert_eq!(method, "typo");
            }
            other => panic!("expected binding error, got {other:?}"),
        }
        assert_eq!(target.dependencies().count(), 0);
    }

    #[test]
    fn test_double_binding_is_disallowed() {
        let class = ClassDescriptor::builder("C")
            .inject(["a"])
            .method("m", MethodSignature::inject(["a"]), recorder("m"))
            .build();
        let binder = Binder::default();

        let once = binder
            .bind(&class, &Instance::of(&class), vec![Value::new("X")])
            .unwrap();
        assert_eq!(once.state(), &BindState::Bound("C".to_string()));

        let err = binder.bind(&class, &once, vec![Value::new("X")]).unwrap_err();
        assert!(matches!(err, AppError::AlreadyBound(ref by) if by == "C"));

        // The first binding still behaves: no extra leading arguments
        assert_eq!(output_string(once.call("m", args!["Z"]).unwrap()), "m(X, Z)");
    }

    #[test]
    fn test_wrong_argument_type_at_call_time() {
        let class = ClassDescriptor::builder("C")
            .inject(["n"])
            .method("double", MethodSignature::inject(["n"]), |_this, args| {
                let n: Arc<i64> = args.get(0)?;
                Ok(Some(Value::new(*n * 2)))
            })
            .build();

        let bound = Binder::default()
            .bind(&class, &Instance::new(), vec![Value::new("not a number")])
            .unwrap();

        let err = bound.call("double", args![]).unwrap_err();
        assert!(matches!(err, AppError::Method(_)));
        assert!(err.to_string().contains("Argument 0"));
    }
}

#[test]
fn test_greeter_scenario() {
    let class = ClassDescriptor::builder("Greeter")
        .inject(["logger"])
        .method("greet", MethodSignature::inject(["logger"]), |_this, args| {
            let logger: Arc<ConsoleLogger> = args.get(0)?;
            logger.log("hello");
            Ok(Some(Value::new(args.len())))
        })
        .build();
    let logger = Arc::new(ConsoleLogger::default());
    let logger_value = Value::from_arc(logger.clone());

    let greeter = Binder::default()
        .bind(&class, &Instance::new(), vec![logger_value.clone()])
        .unwrap();

    assert!(greeter.dependency("logger").unwrap().ptr_eq(&logger_value));
    let out = greeter.call("greet", args![]).unwrap().unwrap();
    assert_eq!(*out.downcast::<usize>().unwrap(), 1);
    assert_eq!(logger.lines(), vec!["hello".to_string()]);
}

#[test]
fn test_bound_instance_is_shareable_across_threads() {
    let class = ClassDescriptor::builder("Counter")
        .inject(["logger"])
        .method("tick", MethodSignature::inject(["logger"]), |_this, args| {
            let logger: Arc<ConsoleLogger> = args.get(0)?;
            logger.log("tick");
            Ok(None)
        })
        .build();
    let logger = Arc::new(ConsoleLogger::default());

    let counter = Arc::new(
        Binder::default()
            .bind(&class, &Instance::new(), vec![Value::from_arc(logger.clone())])
            .unwrap(),
    );

    let handles: Vec<_> = (0..4)
        .map(|_| {
            let counter = counter.clone();
            std::thread::spawn(move || counter.call("tick", args![]).map(|_| ()))
        })
        .collect();
    for handle in handles {
        handle.join().unwrap().unwrap();
    }

    assert_eq!(logger.lines().len(), 4);
}
