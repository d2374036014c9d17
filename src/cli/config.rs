//! Config command handler.

use color_eyre::Result;

use crate::context::Context;

/// Print the effective configuration as JSON.
pub fn run_config(ctx: &Context) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(ctx.config.as_ref())?);
    Ok(())
}
