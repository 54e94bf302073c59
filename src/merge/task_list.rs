// Merge task list and orchestration
//
// State flow for one run:
//   Empty -> Probing -> Probed -> Verifying -> Verified -> Copying -> Done
// Any step may end in Failed, which releases every probed source.

use std::fs::File;
use std::io::{BufReader, BufWriter, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};

use serde::Serialize;
use tempfile::NamedTempFile;
use tracing::{debug, error, info};

use super::copier::{copy_tags, CopyStats, ScratchBuffer};
use super::options::MergeOptions;
use crate::error::{MergeError, Result};
use crate::flv::header::{validate_container, ContainerHeader, FLV_PREAMBLE_SIZE};
use crate::flv::probe::{probe_stream, CodecConfig};

/// An input file whose codec configuration is known, holding its open handle.
#[derive(Debug)]
pub struct ProbedSource {
    path: PathBuf,
    header: ContainerHeader,
    config: CodecConfig,
    reader: BufReader<File>,
}

impl ProbedSource {
    /// Open, validate and probe `path`.
    ///
    /// On success the handle is positioned at the first tag header.
    pub fn open<P: AsRef<Path>>(path: P, max_probe_tags: usize) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let file = File::open(&path).map_err(|source| MergeError::ResourceUnavailable {
            path: path.clone(),
            source,
        })?;
        let mut reader = BufReader::new(file);

        let header = validate_container(&mut reader)?;
        let config = probe_stream(&mut reader, max_probe_tags)?;
        reader
            .seek(SeekFrom::Start(FLV_PREAMBLE_SIZE as u64))
            .map_err(MergeError::SeekFailed)?;

        debug!(path = %path.display(), %config, flags = header.flags(), "probed input");

        Ok(ProbedSource { path, header, config, reader })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn header(&self) -> &ContainerHeader {
        &self.header
    }

    pub fn config(&self) -> &CodecConfig {
        &self.config
    }

    /// True when both sources share the same five codec codes.
    pub fn is_compatible_with(&self, other: &ProbedSource) -> bool {
        self.config.is_compatible_with(&other.config)
    }
}

/// Where a [`MergeTaskList`] is in its run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum MergeState {
    Empty,
    Probing,
    Probed,
    Verifying,
    Verified,
    Copying,
    Done,
    Failed,
}

/// Per-input part of a [`MergeSummary`].
#[derive(Debug, Clone, Serialize)]
pub struct SourceSummary {
    pub path: PathBuf,
    pub config: CodecConfig,
    pub tags: u64,
    pub first_timestamp: Option<u32>,
    pub last_timestamp: u32,
}

/// Result of a successful merge.
#[derive(Debug, Clone, Serialize)]
pub struct MergeSummary {
    pub output: PathBuf,
    pub inputs: usize,
    pub tags: u64,
    pub bytes_written: u64,
    /// Running timestamp after the last input.
    pub final_timestamp: u32,
    pub sources: Vec<SourceSummary>,
}

/// Ordered probed inputs for one merge run. Insertion order is merge order.
#[derive(Debug)]
pub struct MergeTaskList {
    sources: Vec<ProbedSource>,
    state: MergeState,
    options: MergeOptions,
}

impl MergeTaskList {
    pub fn new(options: MergeOptions) -> Self {
        MergeTaskList {
            sources: Vec::new(),
            state: MergeState::Empty,
            options,
        }
    }

    pub fn state(&self) -> MergeState {
        self.state
    }

    pub fn len(&self) -> usize {
        self.sources.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sources.is_empty()
    }

    pub fn sources(&self) -> &[ProbedSource] {
        &self.sources
    }

    /// Append an already probed source.
    ///
    /// A finished or failed list has already released its sources, so adding
    /// starts a new run. Adding to a verified list drops it back to `Probed`
    /// so the next merge verifies the new neighbour pair.
    pub fn add_task(&mut self, source: ProbedSource) {
        match self.state {
            MergeState::Probing => {}
            MergeState::Done | MergeState::Failed => {
                self.clear();
                self.state = MergeState::Probed;
            }
            _ => self.state = MergeState::Probed,
        }
        debug!(path = %source.path.display(), position = self.sources.len(), "queued input");
        self.sources.push(source);
    }

    /// Open, validate and probe every path in order, after any sources
    /// already queued.
    ///
    /// The first failure releases every source loaded so far.
    pub fn load<P: AsRef<Path>>(&mut self, paths: &[P]) -> Result<()> {
        if matches!(self.state, MergeState::Done | MergeState::Failed) {
            self.clear();
        }
        self.state = MergeState::Probing;
        for path in paths {
            let path = path.as_ref();
            match ProbedSource::open(path, self.options.max_probe_tags) {
                Ok(source) => self.add_task(source),
                Err(err) => {
                    error!(path = %path.display(), error = %err, "failed to load input");
                    return self.fail(err);
                }
            }
        }
        self.state = MergeState::Probed;
        Ok(())
    }

    /// Check that every pair of neighbouring sources is compatible.
    pub fn verify(&mut self) -> Result<()> {
        if self.sources.len() < 2 {
            let count = self.sources.len();
            return self.fail(MergeError::NotEnoughInputs(count));
        }

        self.state = MergeState::Verifying;
        let mismatch = self.sources.windows(2).find_map(|pair| {
            pair[0].config.mismatch(&pair[1].config).map(|detail| MergeError::IncompatibleStreams {
                left: pair[0].path.clone(),
                right: pair[1].path.clone(),
                detail,
            })
        });
        if let Some(err) = mismatch {
            return self.fail(err);
        }

        self.state = MergeState::Verified;
        Ok(())
    }

    /// Copy every source into `output`, verifying first if needed.
    ///
    /// Sources are released afterwards whether or not the copy succeeded.
    pub fn merge_into<P: AsRef<Path>>(&mut self, output: P) -> Result<MergeSummary> {
        let output = output.as_ref();
        if self.state != MergeState::Verified {
            self.verify()?;
        }

        info!(inputs = self.sources.len(), output = %output.display(), atomic = self.options.atomic, "merging");

        let result = if self.options.atomic {
            self.copy_atomic(output)
        } else {
            self.copy_in_place(output)
        };

        match result {
            Ok(summary) => {
                self.clear();
                self.state = MergeState::Done;
                info!(
                    tags = summary.tags,
                    bytes = summary.bytes_written,
                    final_timestamp = summary.final_timestamp,
                    "merge finished"
                );
                Ok(summary)
            }
            Err(err) => self.fail(err),
        }
    }

    /// Release every source and return to the empty state.
    pub fn clear(&mut self) {
        self.sources.clear();
        self.state = MergeState::Empty;
    }

    fn fail<T>(&mut self, err: MergeError) -> Result<T> {
        self.clear();
        self.state = MergeState::Failed;
        Err(err)
    }

    fn copy_in_place(&mut self, output: &Path) -> Result<MergeSummary> {
        let file = File::create(output).map_err(|source| MergeError::ResourceUnavailable {
            path: output.to_path_buf(),
            source,
        })?;
        let mut writer = BufWriter::new(file);
        let summary = self.copy_all(&mut writer, output)?;
        writer
            .flush()
            .map_err(|e| MergeError::copy("flushing output", e))?;
        Ok(summary)
    }

    fn copy_atomic(&mut self, output: &Path) -> Result<MergeSummary> {
        let dir = match output.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        let mut staging = NamedTempFile::new_in(dir).map_err(|source| MergeError::ResourceUnavailable {
            path: dir.to_path_buf(),
            source,
        })?;

        let summary = {
            let mut writer = BufWriter::new(staging.as_file_mut());
            let summary = self.copy_all(&mut writer, output)?;
            writer
                .flush()
                .map_err(|e| MergeError::copy("flushing output", e))?;
            summary
        };

        staging.persist(output).map_err(|e| MergeError::Persist {
            path: output.to_path_buf(),
            source: e.error,
        })?;
        Ok(summary)
    }

    fn copy_all<W: Write + Seek>(&mut self, dest: &mut W, output: &Path) -> Result<MergeSummary> {
        self.state = MergeState::Copying;
        let mut scratch = ScratchBuffer::new();
        let mut running_timestamp = 0u32;
        let mut summary = MergeSummary {
            output: output.to_path_buf(),
            inputs: self.sources.len(),
            tags: 0,
            bytes_written: 0,
            final_timestamp: 0,
            sources: Vec::with_capacity(self.sources.len()),
        };

        for (index, source) in self.sources.iter_mut().enumerate() {
            let stats: CopyStats = copy_tags(
                &mut source.reader,
                dest,
                index == 0,
                running_timestamp,
                &mut scratch,
            )?;

            debug!(
                path = %source.path.display(),
                tags = stats.tags,
                offset = running_timestamp,
                last_timestamp = stats.last_timestamp,
                "copied input"
            );

            running_timestamp = stats.last_timestamp;
            summary.tags += stats.tags;
            summary.bytes_written += stats.bytes_written;
            summary.sources.push(SourceSummary {
                path: source.path.clone(),
                config: source.config,
                tags: stats.tags,
                first_timestamp: stats.first_timestamp,
                last_timestamp: stats.last_timestamp,
            });
        }

        summary.final_timestamp = running_timestamp;
        Ok(summary)
    }
}

impl Default for MergeTaskList {
    fn default() -> Self {
        Self::new(MergeOptions::default())
    }
}
