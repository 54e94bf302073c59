// CLI module for flvjoin
//
// Argument parsing, result formatting and the subcommand implementations.
// The merge engine itself lives in the library.

pub mod commands;
pub mod config;
pub mod output;

pub use config::{Commands, Config, OutputFormat};
pub use output::OutputFormatter;

// Error type for CLI operations
pub type CliResult<T> = anyhow::Result<T>;
