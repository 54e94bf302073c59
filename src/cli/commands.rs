// CLI command implementations
use std::io;
use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::{bail, Context};
use serde_json::json;

use flvjoin::{MergeOptions, ProbedSource};

use super::{CliResult, OutputFormatter};

/// Merge files into `output`
pub fn command_merge(
    files: Vec<PathBuf>,
    output: PathBuf,
    pattern: Option<String>,
    options: MergeOptions,
    formatter: &OutputFormatter,
) -> CliResult<()> {
    let inputs = collect_inputs(files, pattern.as_deref())?;
    if inputs.len() < 2 {
        bail!("must have two input files at least, got {}", inputs.len());
    }

    for input in &inputs {
        formatter.print_status(&format!("Merging {}", input.display()));
    }

    let started = Instant::now();
    let summary = flvjoin::merge_with_options(inputs.as_slice(), &output, options)
        .with_context(|| format!("failed to merge into {}", output.display()))?;
    let elapsed = started.elapsed().as_secs_f64();

    if formatter.is_json() {
        let mut record = serde_json::to_value(&summary)?;
        record["elapsed_secs"] = json!(elapsed);
        formatter.output_record(&record, &mut io::stdout())?;
    } else {
        formatter.print_status(&format!(
            "✓ Merged {} files ({} tags, {} bytes) into {}",
            summary.inputs,
            summary.tags,
            summary.bytes_written,
            output.display()
        ));
        formatter.print_status(&format!("bench: used {:.3}s", elapsed));
    }

    Ok(())
}

/// Show codec parameters of each file
pub fn command_probe(files: Vec<PathBuf>, max_probe_tags: usize, formatter: &OutputFormatter) -> CliResult<()> {
    let mut failures = 0;

    for path in &files {
        match probe_record(path, max_probe_tags) {
            Ok(record) => formatter.output_record(&record, &mut io::stdout())?,
            Err(e) => {
                formatter.print_error(&format!("{}: {:#}", path.display(), e));
                failures += 1;
            }
        }
    }

    if failures > 0 {
        bail!("{} of {} files could not be probed", failures, files.len());
    }
    Ok(())
}

/// Check that files could be merged
pub fn command_check(
    files: Vec<PathBuf>,
    pattern: Option<String>,
    options: MergeOptions,
    formatter: &OutputFormatter,
) -> CliResult<()> {
    let inputs = collect_inputs(files, pattern.as_deref())?;
    if inputs.len() < 2 {
        bail!("must have two input files at least, got {}", inputs.len());
    }

    let config = flvjoin::check(inputs.as_slice(), options).context("files cannot be merged")?;

    if formatter.is_json() {
        let record = json!({
            "compatible": true,
            "inputs": inputs.len(),
            "config": config,
        });
        formatter.output_record(&record, &mut io::stdout())?;
    } else {
        formatter.print_success(&format!("{} files can be merged: {}", inputs.len(), config));
    }
    Ok(())
}

/// Explicit files first, then sorted glob matches
fn collect_inputs(mut files: Vec<PathBuf>, pattern: Option<&str>) -> CliResult<Vec<PathBuf>> {
    if let Some(pattern) = pattern {
        let mut matched = Vec::new();
        for entry in glob::glob(pattern).with_context(|| format!("invalid glob pattern '{}'", pattern))? {
            let path = entry.context("error reading path")?;
            if path.is_file() {
                matched.push(path);
            }
        }
        matched.sort();
        files.extend(matched);
    }
    Ok(files)
}

fn probe_record(path: &Path, max_probe_tags: usize) -> CliResult<serde_json::Value> {
    let source = ProbedSource::open(path, max_probe_tags)?;
    let metadata = std::fs::metadata(path)?;

    let modified = metadata
        .modified()
        .ok()
        .map(|mtime| chrono::DateTime::<chrono::Utc>::from(mtime).format("%Y-%m-%d %H:%M:%S UTC").to_string());

    let header = source.header();
    let config = source.config();
    Ok(json!({
        "file": path.display().to_string(),
        "size": metadata.len(),
        "modified": modified,
        "flags": {
            "audio": header.has_audio(),
            "video": header.has_video(),
        },
        "audio": config.audio,
        "video": {
            "codec": config.video_codec,
        },
    }))
}
