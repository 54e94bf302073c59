// FLV merging: per-file tag copier and the run orchestrator

pub mod copier;
pub mod options;
pub mod task_list;

pub use copier::{copy_tags, CopyStats, ScratchBuffer, MAX_DATA_SIZE};
pub use options::{MergeOptions, DEFAULT_MAX_PROBE_TAGS};
pub use task_list::{MergeState, MergeSummary, MergeTaskList, ProbedSource, SourceSummary};
