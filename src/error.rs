//! Error types for picpick
//!
//! Business rules the user can break (duplicate image, duplicate tag name...)
//! are values of [`Error`]. Broken preconditions are caller bugs and panic
//! instead, see the controller module.

use std::path::PathBuf;

use thiserror::Error;

use crate::model::InvariantViolation;

/// Recoverable errors surfaced to the front-end
#[derive(Error, Debug)]
pub enum Error {
    #[error("Image \"{}\" is already present", .0.display())]
    ImageAlreadyPresent(PathBuf),

    #[error("Tag \"{0}\" is already present")]
    TagAlreadyPresent(String),

    #[error("Tag name must not be empty")]
    EmptyTagName,

    /// `save_current` before any save or load
    #[error("Project has no save location yet, use \"save as\" first")]
    NoSaveLocation,

    /// Stepping the cursor past the first or last image
    #[error("No more images")]
    ImagesExhausted,

    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// Failures reading or writing a `.picpick` project file
#[derive(Error, Debug)]
pub enum StorageError {
    #[error("File I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Malformed project file: {0}")]
    Format(#[from] serde_json::Error),

    /// The file ends before both records were read
    #[error("Project file is truncated")]
    Truncated,

    #[error("Project file is inconsistent: {0}")]
    Invariant(#[from] InvariantViolation),

    #[error("Stored current image index {index} is out of range for {len} images")]
    InvalidCurrentIndex { index: usize, len: usize },
}

/// Failures while transferring sorted images to their outputs
#[derive(Error, Debug)]
pub enum SortError {
    #[error("\"{}\" already exists", .0.display())]
    DestinationExists(PathBuf),

    #[error("Failed to transfer \"{}\": {source}", .path.display())]
    Transfer {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Convenience Result type using the picpick [`Error`]
pub type Result<T> = std::result::Result<T, Error>;
