//! Model module - Project data
//!
//! Pure data with no behaviour beyond storage and invariant checks:
//!
//! - `types`: the entities (`Tag`, `Image` and its opaque `ImageId`)
//! - `project`: the `Model` aggregate owning every image and tag

mod project;
mod types;

pub use project::{InvariantViolation, Model};
pub use types::{Image, ImageId, Tag};
