//! CLI module for densegroup
//!
//! - Argument parsing (`args`)
//! - Command handlers (`commands`)

pub mod args;
pub mod commands;

pub use args::{Cli, Commands};
pub use commands::{handle_clear, handle_cluster, handle_index, handle_inspect, run};

/// Parse CLI arguments using Clap
pub fn parse_args() -> Cli {
    args::parse_args()
}
