pub mod check;
pub mod run;
pub mod validate;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use pingwatch_common::target::Target;

const DEFAULT_CONFIG: &str = "config.yaml";

#[derive(Parser)]
#[command(name = "pingwatch")]
#[command(about = "Watches device reachability and escalates devices that stop answering.")]
pub struct CommandLine {
    /// Raise log verbosity (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,
    /// Only show warnings, errors and results
    #[arg(short, long, global = true)]
    pub quiet: bool,
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Probe every target, escalating the ones that stay unreachable
    #[command(alias = "r")]
    Run {
        /// Configuration file (YAML, TOML or JSON)
        #[arg(short, long, default_value = DEFAULT_CONFIG)]
        config: PathBuf,
        /// Target to monitor instead of the configured inventory (repeatable)
        #[arg(short, long = "target", value_name = "NAME=ADDRESS")]
        targets: Vec<Target>,
        /// Log escalations instead of sending mail
        #[arg(long)]
        dry_run: bool,
        /// Targets monitored at once (overrides the configuration)
        #[arg(long)]
        concurrency: Option<usize>,
    },
    /// Send a single probe to an address
    #[command(alias = "c")]
    Check {
        address: String,
        /// Echo requests to send
        #[arg(long, default_value_t = 4)]
        count: u32,
        /// Seconds before the probe is abandoned
        #[arg(long, default_value_t = 30, value_parser = clap::value_parser!(u64).range(1..))]
        timeout: u64,
    },
    /// Load a configuration file and report what a run would use
    #[command(alias = "v")]
    Validate {
        #[arg(short, long, default_value = DEFAULT_CONFIG)]
        config: PathBuf,
    },
}

impl CommandLine {
    pub fn parse_args() -> Self {
        Self::parse()
    }
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝
