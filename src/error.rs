//! Error types for FLV validation, probing and merging.

use std::path::PathBuf;
use thiserror::Error;

/// Every way a merge run can fail. Any of these aborts the whole run.
#[derive(Error, Debug)]
pub enum MergeError {
    /// The stream does not start with a valid FLV header.
    #[error("invalid FLV container: {0}")]
    InvalidContainer(String),

    /// The tag stream ended (or the scan bound was hit) before both the audio
    /// and the video configuration were found.
    #[error("could not find both audio and video parameters after scanning {tags_scanned} tags")]
    ProbeIncomplete {
        /// Number of tag headers read before giving up.
        tags_scanned: usize,
    },

    /// Advancing the stream position failed.
    #[error("seek failed: {0}")]
    SeekFailed(#[source] std::io::Error),

    /// Two consecutive inputs do not share the same codec configuration.
    #[error("unable to merge {} and {}: {detail}", .left.display(), .right.display())]
    IncompatibleStreams {
        left: PathBuf,
        right: PathBuf,
        /// Which parameter differs first.
        detail: String,
    },

    /// Short read or short write while copying tags.
    #[error("copy failed: {0}")]
    CopyFailed(String),

    /// The payload scratch buffer could not be acquired.
    #[error("cannot allocate {0} bytes for the payload buffer")]
    AllocationFailed(usize),

    /// An input or the output path could not be opened.
    #[error("cannot open {}: {source}", .path.display())]
    ResourceUnavailable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Fewer than two inputs were probed; nothing to merge.
    #[error("at least two input files are required, got {0}")]
    NotEnoughInputs(usize),

    /// Atomic mode could not move the finished output into place.
    #[error("cannot move merged output to {}: {source}", .path.display())]
    Persist {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl MergeError {
    /// Wrap an I/O failure that happened mid-copy.
    pub(crate) fn copy(context: &str, err: std::io::Error) -> Self {
        MergeError::CopyFailed(format!("{}: {}", context, err))
    }
}

/// Result type for merge operations.
pub type Result<T> = std::result::Result<T, MergeError>;
