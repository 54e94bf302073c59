// Merge configuration

use serde::{Deserialize, Serialize};

/// Default bound on tag headers read while probing one input.
pub const DEFAULT_MAX_PROBE_TAGS: usize = 4096;

/// Tunables for one merge run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MergeOptions {
    /// Give up probing an input after this many tags without finding both
    /// an audio and a video tag.
    pub max_probe_tags: usize,
    /// Write into a temporary file next to the destination and rename it
    /// into place only when every input was copied. When off, a failed run
    /// leaves whatever was written so far at the destination path.
    pub atomic: bool,
}

impl Default for MergeOptions {
    fn default() -> Self {
        Self {
            max_probe_tags: DEFAULT_MAX_PROBE_TAGS,
            atomic: false,
        }
    }
}

impl MergeOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_max_probe_tags(mut self, max_probe_tags: usize) -> Self {
        self.max_probe_tags = max_probe_tags;
        self
    }

    pub fn with_atomic(mut self, atomic: bool) -> Self {
        self.atomic = atomic;
        self
    }
}
