//! Controller module - The only writer of project state
//!
//! Every mutation goes through [`Controller`], which keeps the model
//! consistent, owns the current image cursor and tells the view what changed.
//! It is organized into submodules by responsibility:
//!
//! - `images`: image insertion and cursor movement
//! - `tags`: tag set management and tagging of the current image
//! - `persistence`: save / load of project files
//!
//! Business rule violations come back as [`crate::Error`] values. Calling an
//! operation with an image or tag that is not part of the project, or
//! double-tagging, is a caller bug and panics before anything is mutated.

mod images;
mod persistence;
mod tags;

use std::path::{Path, PathBuf};

use crate::model::{Image, ImageId, Model, Tag};
use crate::view::ProjectView;

pub struct Controller<V: ProjectView> {
    model: Model,
    current: Option<ImageId>,
    save_location: Option<PathBuf>,
    view: V,
}

impl<V: ProjectView> Controller<V> {
    /// Take ownership of `model` and push its whole state to `view`.
    ///
    /// The first image by file name becomes current. A project that did not
    /// come from a file starts out unsaved.
    pub fn new(model: Model, view: V) -> Self {
        let current = model.images_by_file_name().first().map(|image| image.id());
        let mut controller = Self {
            model,
            current,
            save_location: None,
            view,
        };

        controller.refresh_view();
        controller.view.marked_unsaved();
        controller
    }

    pub fn view(&self) -> &V {
        &self.view
    }

    /// Access to view-local state (focus, prompts...). Project state must
    /// still change through controller methods.
    pub fn view_mut(&mut self) -> &mut V {
        &mut self.view
    }

    pub fn model(&self) -> &Model {
        &self.model
    }

    /// All images sorted by file name, recomputed on every call
    pub fn images(&self) -> Vec<&Image> {
        self.model.images_by_file_name()
    }

    /// All tags sorted by name
    pub fn tags(&self) -> Vec<&Tag> {
        self.model.tags().iter().collect()
    }

    /// Tags whose name contains `pattern`, sorted by name
    pub fn tags_matching(&self, pattern: &str) -> Vec<&Tag> {
        self.model
            .tags()
            .iter()
            .filter(|tag| tag.name().contains(pattern))
            .collect()
    }

    pub fn current_image(&self) -> Option<&Image> {
        self.current.and_then(|id| self.model.image(id))
    }

    /// Where `save_current` writes, set by the last successful save or load
    pub fn save_location(&self) -> Option<&Path> {
        self.save_location.as_deref()
    }

    /// Position of the current image in [`Controller::images`]
    pub fn current_index(&self) -> Option<usize> {
        let current = self.current?;
        self.model
            .images_by_file_name()
            .iter()
            .position(|image| image.id() == current)
    }

    fn current_image_mut(&mut self) -> &mut Image {
        let Some(id) = self.current else {
            panic!("operation requires a current image");
        };
        match self.model.image_mut(id) {
            Some(image) => image,
            None => unreachable!("current image {id} is missing from the model"),
        }
    }

    fn refresh_view(&mut self) {
        self.notify_image_list();
        self.notify_tag_list();
        self.notify_current_image();
    }

    fn notify_image_list(&mut self) {
        let images = self.model.images_by_file_name();
        self.view.image_list_changed(&images);
    }

    fn notify_tag_list(&mut self) {
        let tags: Vec<&Tag> = self.model.tags().iter().collect();
        self.view.tag_list_changed(&tags);
    }

    fn notify_current_image(&mut self) {
        let image = self.current.and_then(|id| self.model.image(id));
        self.view.current_image_changed(image);
    }

    fn notify_current_image_tags(&mut self) {
        if let Some(image) = self.current.and_then(|id| self.model.image(id)) {
            self.view.current_image_tags_changed(image);
        }
    }
}
