// CLI configuration
use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

use flvjoin::merge::DEFAULT_MAX_PROBE_TAGS;

/// flvjoin - FLV concatenation tool
#[derive(Parser, Debug)]
#[command(name = "flvjoin")]
#[command(about = "Concatenate FLV files into one continuous, playable FLV", long_about = None)]
#[command(version)]
#[command(author = "xwsjjctz <xwsjjctz@icloud.com>")]
pub struct Config {
    /// Output format
    #[arg(short, long, value_enum, default_value = "pretty", global = true)]
    pub format: OutputFormat,

    /// Quiet mode (only warnings and errors)
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Verbose mode (debug logging)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Subcommand
    #[command(subcommand)]
    pub command: Commands,
}

/// Output format for results
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    /// Human readable lines
    #[default]
    Pretty,
    /// One JSON document per result
    Json,
}

/// CLI subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Merge FLV files, in the order given, into one file
    Merge {
        /// Input FLV files (at least two in total)
        #[arg(value_name = "FILE")]
        files: Vec<PathBuf>,

        /// Merged output file
        #[arg(short, long, value_name = "OUTPUT")]
        output: PathBuf,

        /// Also merge files matching this pattern, in sorted order, after FILE
        #[arg(short, long)]
        glob: Option<String>,

        /// Only replace OUTPUT once every input was copied
        #[arg(long)]
        atomic: bool,

        /// Stop probing an input after this many tags
        #[arg(long, default_value_t = DEFAULT_MAX_PROBE_TAGS)]
        max_probe_tags: usize,
    },

    /// Show the codec parameters of FLV files
    Probe {
        /// FLV file path(s)
        #[arg(value_name = "FILE", required = true)]
        files: Vec<PathBuf>,

        /// Stop probing a file after this many tags
        #[arg(long, default_value_t = DEFAULT_MAX_PROBE_TAGS)]
        max_probe_tags: usize,
    },

    /// Check that FLV files can be merged, without writing anything
    Check {
        /// FLV file path(s)
        #[arg(value_name = "FILE")]
        files: Vec<PathBuf>,

        /// Also check files matching this pattern, in sorted order, after FILE
        #[arg(short, long)]
        glob: Option<String>,

        /// Stop probing an input after this many tags
        #[arg(long, default_value_t = DEFAULT_MAX_PROBE_TAGS)]
        max_probe_tags: usize,
    },
}

impl Config {
    /// Log filter used when RUST_LOG is not set
    pub fn log_filter(&self) -> &'static str {
        if self.verbose {
            "flvjoin=debug,info"
        } else if self.quiet {
            "warn"
        } else {
            "info"
        }
    }
}
