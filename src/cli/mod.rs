//! CLI module for prebind.
//!
//! Subcommands:
//! - `plan`: Show how a class manifest would be bound
//! - `config`: Print the effective configuration

mod config;
mod plan;

use clap::{Parser, Subcommand};

use crate::config::Config;
use crate::context::Context;

pub use plan::PlanCommand;

/// prebind - pre-bind named dependencies into object methods
#[derive(Parser, Debug)]
#[command(name = "prebind")]
#[command(about = "Pre-binds named dependencies into object methods")]
#[command(version)]
pub struct App {
    /// Run in verbose mode
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Show which methods of a class manifest take part in binding
    Plan(PlanCommand),

    /// Print the effective configuration
    Config,
}

impl App {
    /// Run the CLI application.
    pub fn run(self) -> color_eyre::Result<()> {
        let config = Config::load()?;
        tracing::debug!(
            "Loaded configuration: convention={}, strict={}",
            config.binder.convention,
            config.binder.strict
        );
        let ctx = Context::new(config);

        match self.command {
            Command::Plan(cmd) => cmd.run(&ctx),
            Command::Config => self::config::run_config(&ctx),
        }
    }
}
