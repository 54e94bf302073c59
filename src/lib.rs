//! # flvjoin
//!
//! Concatenate FLV files into one continuous, playable FLV.
//!
//! Every input is validated and probed for its audio and video codec
//! parameters. Inputs must agree on all of them; the tag streams are then
//! appended in order with each tag timestamp shifted by the last timestamp of
//! the previous input, so playback time keeps increasing across joins.
//!
//! Nothing is re-encoded and no index or duration metadata is rewritten.
//!
//! ```no_run
//! let summary = flvjoin::merge(&["part1.flv", "part2.flv"], "joined.flv")?;
//! println!("{} tags, ends at {} ms", summary.tags, summary.final_timestamp);
//! # Ok::<(), flvjoin::MergeError>(())
//! ```

use std::path::Path;

pub mod error;
pub mod flv;
pub mod merge;
mod utils;

pub use error::{MergeError, Result};
pub use flv::{compatible, AudioConfig, CodecConfig, ContainerHeader};
pub use merge::{MergeOptions, MergeState, MergeSummary, MergeTaskList, ProbedSource, SourceSummary};

/// Merge `inputs`, in order, into `output` with default options.
pub fn merge<P, Q>(inputs: &[P], output: Q) -> Result<MergeSummary>
where
    P: AsRef<Path>,
    Q: AsRef<Path>,
{
    merge_with_options(inputs, output, MergeOptions::default())
}

/// Merge `inputs`, in order, into `output`.
///
/// All inputs are probed and checked for compatibility before the output is
/// created. Unless `options.atomic` is set, a failure while copying leaves a
/// partial file at `output`.
pub fn merge_with_options<P, Q>(inputs: &[P], output: Q, options: MergeOptions) -> Result<MergeSummary>
where
    P: AsRef<Path>,
    Q: AsRef<Path>,
{
    let mut tasks = MergeTaskList::new(options);
    tasks.load(inputs)?;
    tasks.verify()?;
    tasks.merge_into(output)
}

/// Probe `inputs` and check they could be merged, without writing anything.
///
/// Returns the shared codec configuration.
pub fn check<P: AsRef<Path>>(inputs: &[P], options: MergeOptions) -> Result<CodecConfig> {
    let mut tasks = MergeTaskList::new(options);
    tasks.load(inputs)?;
    tasks.verify()?;
    let config = *tasks.sources()[0].config();
    tasks.clear();
    Ok(config)
}

/// Validate and probe a single file.
pub fn probe_file<P: AsRef<Path>>(path: P, max_probe_tags: usize) -> Result<ProbedSource> {
    ProbedSource::open(path, max_probe_tags)
}
