//! CLI interface for vwap-engine
//!
//! Provides subcommands for:
//! - `run`: Subscribe to the trade feed and maintain VWAPs
//! - `config`: Show the effective configuration

mod run;

pub use run::RunArgs;

use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "vwap-engine")]
#[command(about = "Streaming sliding-window VWAP engine for exchange trade feeds")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Path to configuration file
    #[arg(short, long, default_value = "config.toml")]
    pub config: String,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Subscribe to the feed and compute VWAPs until stopped
    Run(RunArgs),
    /// Show configuration
    Config,
}
