//! Sorting images into output directories
//!
//! Assignments accumulate while browsing and are flushed in one batch by
//! [`Sorter::perform`], moving or copying every assigned file depending on the
//! mode chosen for the run.

use std::collections::BTreeMap;
use std::fmt;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use crate::error::SortError;
use crate::model::Image;

/// A destination directory
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Output {
    path: PathBuf,
}

impl Output {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Directory name for display purposes
    pub fn label(&self) -> String {
        self.path
            .file_name()
            .unwrap_or(self.path.as_os_str())
            .to_string_lossy()
            .into_owned()
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum TransferMode {
    #[default]
    Move,
    Copy,
}

impl fmt::Display for TransferMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TransferMode::Move => f.write_str("move"),
            TransferMode::Copy => f.write_str("copy"),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PerformReport {
    pub transferred: usize,
    pub mode: TransferMode,
}

/// Pending image -> output assignments of one sorting run
#[derive(Debug)]
pub struct Sorter {
    outputs: Vec<Output>,
    mode: TransferMode,
    pending: BTreeMap<PathBuf, usize>,
}

impl Sorter {
    pub fn new(outputs: impl IntoIterator<Item = PathBuf>, mode: TransferMode) -> Self {
        Self {
            outputs: outputs.into_iter().map(Output::new).collect(),
            mode,
            pending: BTreeMap::new(),
        }
    }

    pub fn outputs(&self) -> &[Output] {
        &self.outputs
    }

    pub fn mode(&self) -> TransferMode {
        self.mode
    }

    /// Assign `image` to the output at `output`, replacing any earlier choice
    pub fn assign(&mut self, image: &Image, output: usize) {
        assert!(
            output < self.outputs.len(),
            "output {output} out of range for {} outputs",
            self.outputs.len()
        );
        tracing::debug!(
            image = %image.path().display(),
            output = %self.outputs[output].path.display(),
            "Image assigned"
        );
        self.pending.insert(image.path().to_path_buf(), output);
    }

    pub fn unassign(&mut self, image: &Image) -> bool {
        self.pending.remove(image.path()).is_some()
    }

    pub fn assignment(&self, image: &Image) -> Option<&Output> {
        self.pending
            .get(image.path())
            .map(|&output| &self.outputs[output])
    }

    /// Number of assignments not yet performed
    pub fn pending(&self) -> usize {
        self.pending.len()
    }

    pub fn is_pending(&self, source: &Path) -> bool {
        self.pending.contains_key(source)
    }

    /// Source and destination path of every pending assignment
    pub fn planned(&self) -> Vec<(PathBuf, PathBuf)> {
        self.pending
            .iter()
            .filter_map(|(source, &output)| {
                let name = source.file_name()?;
                Some((source.clone(), self.outputs[output].path.join(name)))
            })
            .collect()
    }

    /// Transfer every assigned file into its output directory.
    ///
    /// Existing files are never overwritten. The batch stops at the first
    /// failure; transfers already done leave the pending set, the rest stay.
    pub fn perform(&mut self) -> Result<PerformReport, SortError> {
        let mut transferred = 0;

        while let Some((source, output)) = self
            .pending
            .first_key_value()
            .map(|(source, &output)| (source.clone(), output))
        {
            let output = &self.outputs[output];
            if let Err(e) = transfer(&source, output.path(), self.mode) {
                tracing::error!(source = %source.display(), error = %e, "Transfer failed");
                return Err(e);
            }
            self.pending.remove(&source);
            transferred += 1;
        }

        tracing::info!(transferred, mode = %self.mode, "Assignments performed");
        Ok(PerformReport {
            transferred,
            mode: self.mode,
        })
    }
}

fn transfer(source: &Path, directory: &Path, mode: TransferMode) -> Result<(), SortError> {
    let wrap = |e: io::Error| SortError::Transfer {
        path: source.to_path_buf(),
        source: e,
    };

    let Some(name) = source.file_name() else {
        return Err(wrap(io::Error::new(
            io::ErrorKind::InvalidInput,
            "path has no file name",
        )));
    };
    let destination = directory.join(name);
    if destination.exists() {
        return Err(SortError::DestinationExists(destination));
    }

    match mode {
        TransferMode::Copy => {
            fs::copy(source, &destination).map_err(wrap)?;
        }
        TransferMode::Move => {
            // rename fails across filesystems
            if fs::rename(source, &destination).is_err() {
                fs::copy(source, &destination).map_err(wrap)?;
                fs::remove_file(source).map_err(wrap)?;
            }
        }
    }
    Ok(())
}
