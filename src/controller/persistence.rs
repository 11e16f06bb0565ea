//! Saving and loading project files

use std::path::Path;

use crate::error::{Error, Result};
use crate::storage;
use crate::view::ProjectView;
use super::Controller;

impl<V: ProjectView> Controller<V> {
    /// Write the project and the current selection to `destination`, which
    /// becomes the location used by [`Controller::save_current`].
    pub fn save(&mut self, destination: &Path) -> Result<()> {
        let current_index = self.current_index();

        if let Err(e) = storage::save(destination, &self.model, current_index) {
            tracing::error!(path = %destination.display(), error = %e, "Save failed");
            return Err(e.into());
        }

        self.save_location = Some(destination.to_path_buf());
        self.view.marked_saved(&save_label(destination));
        Ok(())
    }

    /// Save again to the location of the last save or load
    pub fn save_current(&mut self) -> Result<()> {
        let Some(location) = self.save_location.clone() else {
            return Err(Error::NoSaveLocation);
        };
        self.save(&location)
    }

    /// Replace the whole project with the one stored in `source`.
    ///
    /// On failure the project in memory is left untouched.
    pub fn load(&mut self, source: &Path) -> Result<()> {
        let (model, current_index) = match storage::load(source) {
            Ok(loaded) => loaded,
            Err(e) => {
                tracing::error!(path = %source.display(), error = %e, "Load failed");
                return Err(e.into());
            }
        };

        self.current = current_index.and_then(|index| {
            model
                .images_by_file_name()
                .get(index)
                .map(|image| image.id())
        });
        self.model = model;
        self.save_location = Some(source.to_path_buf());

        self.refresh_view();
        self.view.marked_saved(&save_label(source));
        Ok(())
    }
}

fn save_label(path: &Path) -> String {
    path.file_name()
        .unwrap_or(path.as_os_str())
        .to_string_lossy()
        .into_owned()
}
