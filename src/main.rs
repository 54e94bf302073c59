// CLI binary entry point for flvjoin
//
// This is the main entry point for the flvjoin command-line tool.

mod cli;

use clap::Parser;
use std::process;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use cli::commands::{command_check, command_merge, command_probe};
use cli::{Commands, Config, OutputFormatter};
use flvjoin::MergeOptions;

fn main() {
    let config = Config::parse();

    // Logs go to stderr so JSON results on stdout stay parseable
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| config.log_filter().into()))
        .with(tracing_subscriber::fmt::layer().with_target(false).with_writer(std::io::stderr))
        .init();

    let formatter = OutputFormatter::new(config.format, config.quiet);

    let result = match config.command {
        Commands::Merge { files, output, glob, atomic, max_probe_tags } => {
            let options = MergeOptions::new()
                .with_max_probe_tags(max_probe_tags)
                .with_atomic(atomic);
            command_merge(files, output, glob, options, &formatter)
        }
        Commands::Probe { files, max_probe_tags } => command_probe(files, max_probe_tags, &formatter),
        Commands::Check { files, glob, max_probe_tags } => {
            let options = MergeOptions::new().with_max_probe_tags(max_probe_tags);
            command_check(files, glob, options, &formatter)
        }
    };

    if let Err(e) = result {
        formatter.print_error(&format!("{:#}", e));
        process::exit(1);
    }
}
