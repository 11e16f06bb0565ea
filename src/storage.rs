//! Project file persistence
//!
//! A `.picpick` file holds two JSON values one after the other: the project
//! record first, the current image index second. Both are read back through a
//! single deserializer, so a file that stops after the first value is detected
//! as truncated instead of loading with a made-up selection.

use std::collections::BTreeSet;
use std::ffi::OsString;
use std::fs::{self, File};
use std::io::{BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::StorageError;
use crate::model::{Image, Model, Tag};

/// Conventional extension of project files
pub const EXTENSION: &str = "picpick";

#[derive(Serialize, Deserialize)]
struct ProjectRecord {
    images: Vec<ImageRecord>,
    tags: BTreeSet<Tag>,
}

#[derive(Serialize, Deserialize)]
struct ImageRecord {
    path: PathBuf,
    tags: BTreeSet<Tag>,
}

impl ProjectRecord {
    fn from_model(model: &Model) -> Self {
        let images = model
            .images_by_file_name()
            .into_iter()
            .map(|image| ImageRecord {
                path: image.path().to_path_buf(),
                tags: image.tags().clone(),
            })
            .collect();

        Self {
            images,
            tags: model.tags().clone(),
        }
    }

    fn into_model(self) -> Model {
        let mut model = Model::new();
        for tag in self.tags {
            model.insert_tag(tag);
        }
        for image in self.images {
            model.insert_image(Image::with_tags(image.path, image.tags));
        }
        model
    }
}

/// Write `model` and the index of its current image to `destination`.
///
/// `current_index` points into [`Model::images_by_file_name`]. Panics when the
/// model or the index is inconsistent: an invalid project is never written.
pub fn save(
    destination: &Path,
    model: &Model,
    current_index: Option<usize>,
) -> Result<(), StorageError> {
    if let Err(violation) = model.validate() {
        panic!("refusing to save an inconsistent project: {violation}");
    }
    if let Some(index) = current_index {
        assert!(
            index < model.image_count(),
            "current index {index} out of range for {} images",
            model.image_count()
        );
    }

    let record = ProjectRecord::from_model(model);

    // Write next to the destination first so a failed write cannot clobber
    // an existing project
    let staging = staging_path(destination);
    if let Err(e) = write_records(&staging, &record, current_index) {
        let _ = fs::remove_file(&staging);
        return Err(e);
    }
    if let Err(e) = fs::rename(&staging, destination) {
        let _ = fs::remove_file(&staging);
        return Err(e.into());
    }

    tracing::info!(
        path = %destination.display(),
        images = record.images.len(),
        tags = record.tags.len(),
        current_index = ?current_index,
        "Project saved"
    );
    Ok(())
}

/// Read a project back, re-checking every invariant [`save`] enforces.
pub fn load(source: &Path) -> Result<(Model, Option<usize>), StorageError> {
    let reader = BufReader::new(File::open(source)?);
    let mut de = serde_json::Deserializer::from_reader(reader);

    let record = ProjectRecord::deserialize(&mut de).map_err(eof_as_truncated)?;
    let current_index = Option::<usize>::deserialize(&mut de).map_err(eof_as_truncated)?;
    de.end()?;

    let model = record.into_model();
    model.validate()?;

    if let Some(index) = current_index {
        if index >= model.image_count() {
            return Err(StorageError::InvalidCurrentIndex {
                index,
                len: model.image_count(),
            });
        }
    }

    tracing::info!(
        path = %source.display(),
        images = model.image_count(),
        tags = model.tags().len(),
        current_index = ?current_index,
        "Project loaded"
    );
    Ok((model, current_index))
}

fn write_records(
    path: &Path,
    record: &ProjectRecord,
    current_index: Option<usize>,
) -> Result<(), StorageError> {
    let mut writer = BufWriter::new(File::create(path)?);
    serde_json::to_writer_pretty(&mut writer, record)?;
    writer.write_all(b"\n")?;
    serde_json::to_writer(&mut writer, &current_index)?;
    writer.write_all(b"\n")?;
    writer.flush()?;
    Ok(())
}

fn staging_path(destination: &Path) -> PathBuf {
    let mut name = OsString::from(".");
    name.push(destination.file_name().unwrap_or_default());
    name.push(".tmp");
    destination.with_file_name(name)
}

fn eof_as_truncated(err: serde_json::Error) -> StorageError {
    if err.is_eof() {
        StorageError::Truncated
    } else {
        StorageError::Format(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::InvariantViolation;

    fn tag(name: &str) -> Tag {
        Tag::new(name).unwrap()
    }

    fn sample_model() -> Model {
        let mut model = Model::new();
        model.insert_tag(tag("red"));
        model.insert_tag(tag("blue"));
        model.insert_image(Image::with_tags("foo.jpg", [tag("red")].into_iter().collect()));
        model.insert_image(Image::new("bar.jpg"));
        model
    }

    #[test]
    fn test_save_and_load_empty() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("save.picpick");

        save(&path, &Model::new(), None).unwrap();
        let (loaded, current_index) = load(&path).unwrap();

        assert!(loaded.is_empty());
        assert_eq!(current_index, None);
    }

    #[test]
    fn test_save_and_load_some_images_and_tags() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("save.picpick");
        let model = sample_model();

        save(&path, &model, Some(1)).unwrap();
        let (loaded, current_index) = load(&path).unwrap();

        assert_eq!(current_index, Some(1));
        assert_eq!(loaded.tags(), model.tags());

        let images = loaded.images_by_file_name();
        assert_eq!(images.len(), 2);
        assert_eq!(images[0].path(), Path::new("bar.jpg"));
        assert!(images[0].tags().is_empty());
        assert_eq!(images[1].path(), Path::new("foo.jpg"));
        assert_eq!(images[1].tags(), &BTreeSet::from([tag("red")]));

        // Fresh entities, not the saved ones
        assert!(model.images().all(|image| !loaded.contains_image(image.id())));
    }

    #[test]
    fn test_save_replaces_existing_file_without_leftovers() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("save.picpick");

        save(&path, &sample_model(), Some(0)).unwrap();
        save(&path, &Model::new(), None).unwrap();

        let (loaded, _) = load(&path).unwrap();
        assert!(loaded.is_empty());
        assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 1);
    }

    #[test]
    fn test_failed_rename_removes_staging_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("proj.picpick");
        fs::create_dir(&path).unwrap();

        assert!(matches!(
            save(&path, &sample_model(), None),
            Err(StorageError::Io(_))
        ));

        let names: Vec<_> = fs::read_dir(dir.path())
            .unwrap()
            .map(|entry| entry.unwrap().file_name())
            .collect();
        assert_eq!(names, ["proj.picpick"]);
        assert!(path.is_dir());
    }

    #[test]
    fn test_load_missing_index_is_truncated() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("save.picpick");
        fs::write(&path, r#"{"images": [], "tags": []}"#).unwrap();

        assert!(matches!(load(&path), Err(StorageError::Truncated)));
    }

    #[test]
    fn test_load_cut_record_is_truncated() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("save.picpick");
        fs::write(&path, r#"{"images": [{"path": "a.jpg", "#).unwrap();

        assert!(matches!(load(&path), Err(StorageError::Truncated)));
    }

    #[test]
    fn test_load_trailing_data_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("save.picpick");
        fs::write(&path, "{\"images\": [], \"tags\": []}\nnull\n3\n").unwrap();

        assert!(matches!(load(&path), Err(StorageError::Format(_))));
    }

    #[test]
    fn test_load_dangling_tag_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("save.picpick");
        fs::write(
            &path,
            r#"{"images": [{"path": "a.jpg", "tags": ["red"]}], "tags": []} 0"#,
        )
        .unwrap();

        assert!(matches!(
            load(&path),
            Err(StorageError::Invariant(InvariantViolation::DanglingTag { .. }))
        ));
    }

    #[test]
    fn test_load_duplicate_path_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("save.picpick");
        fs::write(
            &path,
            r#"{"images": [{"path": "a.jpg", "tags": []}, {"path": "a.jpg", "tags": []}], "tags": []} null"#,
        )
        .unwrap();

        assert!(matches!(
            load(&path),
            Err(StorageError::Invariant(InvariantViolation::DuplicatePath(_)))
        ));
    }

    #[test]
    fn test_load_index_out_of_range() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("save.picpick");
        fs::write(&path, r#"{"images": [], "tags": []} 0"#).unwrap();

        assert!(matches!(
            load(&path),
            Err(StorageError::InvalidCurrentIndex { index: 0, len: 0 })
        ));
    }

    #[test]
    fn test_load_empty_tag_name_is_format_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("save.picpick");
        fs::write(&path, r#"{"images": [], "tags": [""]} null"#).unwrap();

        assert!(matches!(load(&path), Err(StorageError::Format(_))));
    }

    #[test]
    #[should_panic(expected = "refusing to save")]
    fn test_save_duplicate_paths_panics() {
        let dir = tempfile::tempdir().unwrap();
        let mut model = Model::new();
        model.insert_image(Image::new("a.jpg"));
        model.insert_image(Image::new("a.jpg"));

        let _ = save(&dir.path().join("save.picpick"), &model, None);
    }

    #[test]
    #[should_panic(expected = "out of range")]
    fn test_save_bad_index_panics() {
        let dir = tempfile::tempdir().unwrap();
        let _ = save(&dir.path().join("save.picpick"), &Model::new(), Some(0));
    }
}
