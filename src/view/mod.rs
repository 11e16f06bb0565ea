//! View module - Everything the controller notifies
//!
//! The controller only knows the [`ProjectView`] trait. The terminal front-end
//! implements it and is organized into submodules by component type:
//!
//! - `terminal`: `TerminalView`, widget state fed by the notifications
//! - `layout`: main layout (file list, tag checklist, details, status line)
//! - `overlays`: modal overlays (error, prompt, help)
//! - `utils`: shared rendering helpers

mod layout;
mod overlays;
mod terminal;
mod utils;

use crate::model::{Image, Tag};

pub use terminal::{Focus, Prompt, PromptKind, TerminalView};

/// Notifications sent by the controller after every state change.
///
/// Each call carries freshly derived data so an implementation can re-render
/// without calling back into the controller. Calls may repeat; rendering must
/// be idempotent.
pub trait ProjectView {
    /// The image listing changed; `images` is sorted by file name
    fn image_list_changed(&mut self, images: &[&Image]);

    /// The tag set changed; `tags` is sorted by name
    fn tag_list_changed(&mut self, tags: &[&Tag]);

    /// Another image (or none) became current
    fn current_image_changed(&mut self, image: Option<&Image>);

    /// The tags of the current image changed
    fn current_image_tags_changed(&mut self, image: &Image);

    fn marked_unsaved(&mut self);

    /// The project now matches the file named by `label`
    fn marked_saved(&mut self, label: &str);
}
