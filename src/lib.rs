//! PicPick - tag local pictures and keep the decisions in a project file
//!
//! - `model`: images, tags and the project they belong to
//! - `controller`: the only writer of project state, notifies a view
//! - `view`: the notification seam and the terminal front-end
//! - `storage`: the `.picpick` file format
//! - `sorting`: moving or copying images into output directories
//! - `app`: terminal application state and key handling

pub mod app;
pub mod controller;
pub mod error;
pub mod model;
pub mod sorting;
pub mod storage;
pub mod view;

pub use app::App;
pub use controller::Controller;
pub use error::{Error, Result, SortError, StorageError};
pub use model::{Image, ImageId, InvariantViolation, Model, Tag};
pub use sorting::{Output, PerformReport, Sorter, TransferMode};
pub use view::{ProjectView, TerminalView};
