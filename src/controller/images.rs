//! Image insertion and current image cursor

use std::path::PathBuf;

use crate::error::{Error, Result};
use crate::model::{Image, ImageId};
use crate::view::ProjectView;
use super::Controller;

impl<V: ProjectView> Controller<V> {
    /// Insert `image` unless another image already has its path.
    ///
    /// The first image added to a project without a current image becomes
    /// current; later additions leave the cursor alone.
    pub fn add_image(&mut self, image: Image) -> Result<ImageId> {
        if self.model.contains_path(image.path()) {
            tracing::warn!(path = %image.path().display(), "Image already present");
            return Err(Error::ImageAlreadyPresent(image.path().to_path_buf()));
        }

        let id = self.model.insert_image(image);
        tracing::debug!(%id, images = self.model.image_count(), "Image added");
        self.notify_image_list();

        if self.current.is_none() {
            self.current = Some(id);
            self.notify_current_image();
        }

        self.view.marked_unsaved();
        Ok(id)
    }

    /// Add every path not yet in the project, returning how many were added
    pub fn add_images(&mut self, paths: impl IntoIterator<Item = PathBuf>) -> usize {
        let mut added = 0;
        for path in paths {
            match self.add_image(Image::new(path)) {
                Ok(_) => added += 1,
                Err(Error::ImageAlreadyPresent(path)) => {
                    tracing::debug!(path = %path.display(), "Skipping duplicate input");
                }
                Err(e) => tracing::error!(error = %e, "Unexpected error adding image"),
            }
        }
        added
    }

    /// Point `image` at `path` after its file moved on disk.
    ///
    /// Fails with [`Error::ImageAlreadyPresent`] when another image already
    /// has `path`.
    pub fn relocate_image(&mut self, image: ImageId, path: PathBuf) -> Result<()> {
        assert!(
            self.model.contains_image(image),
            "image {image} is not part of the project"
        );
        if self
            .model
            .image(image)
            .is_some_and(|entry| entry.path() == path.as_path())
        {
            return Ok(());
        }
        if self.model.contains_path(&path) {
            tracing::warn!(path = %path.display(), "Relocation target already present");
            return Err(Error::ImageAlreadyPresent(path));
        }

        if let Some(entry) = self.model.image_mut(image) {
            tracing::debug!(
                from = %entry.path().display(),
                to = %path.display(),
                "Image relocated"
            );
            entry.set_path(path);
        }
        self.notify_image_list();
        if self.current == Some(image) {
            self.notify_current_image();
        }
        self.view.marked_unsaved();
        Ok(())
    }

    /// Move the cursor to `image`, or clear it with `None`.
    ///
    /// Selecting the image that is already current does nothing and sends no
    /// notification.
    pub fn set_current_image(&mut self, image: Option<ImageId>) {
        if let Some(id) = image {
            assert!(
                self.model.contains_image(id),
                "image {id} is not part of the project"
            );
        }
        if image == self.current {
            return;
        }

        self.current = image;
        tracing::debug!(current = ?image, "Current image changed");
        self.notify_current_image();
        self.view.marked_unsaved();
    }

    /// Select the image after the current one.
    ///
    /// With no current image the first image is selected. Fails with
    /// [`Error::ImagesExhausted`] on the last image.
    pub fn next_image(&mut self) -> Result<()> {
        let next = {
            let images = self.model.images_by_file_name();
            let position = self
                .current
                .and_then(|current| images.iter().position(|image| image.id() == current));
            let next = match position {
                Some(position) => images.get(position + 1),
                None => images.first(),
            };
            next.map(|image| image.id())
        };

        let next = next.ok_or(Error::ImagesExhausted)?;
        self.set_current_image(Some(next));
        Ok(())
    }

    /// Select the image before the current one.
    ///
    /// With no current image the last image is selected. Fails with
    /// [`Error::ImagesExhausted`] on the first image.
    pub fn previous_image(&mut self) -> Result<()> {
        let previous = {
            let images = self.model.images_by_file_name();
            let position = self
                .current
                .and_then(|current| images.iter().position(|image| image.id() == current));
            let previous = match position {
                Some(0) => None,
                Some(position) => images.get(position - 1),
                None => images.last(),
            };
            previous.map(|image| image.id())
        };

        let previous = previous.ok_or(Error::ImagesExhausted)?;
        self.set_current_image(Some(previous));
        Ok(())
    }
}
