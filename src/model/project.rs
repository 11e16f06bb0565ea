//! The project aggregate: every image and every tag of one session

use std::collections::{BTreeMap, BTreeSet, HashSet};
use std::path::{Path, PathBuf};

use thiserror::Error;

use super::types::{Image, ImageId, Tag};

/// A broken consistency rule of a [`Model`]
#[derive(Error, Debug, PartialEq, Eq)]
pub enum InvariantViolation {
    #[error("two images share the path \"{}\"", .0.display())]
    DuplicatePath(PathBuf),

    #[error("image \"{}\" carries unknown tag \"{}\"", .path.display(), .tag)]
    DanglingTag { path: PathBuf, tag: Tag },
}

/// Owns the set of images and the set of tags.
///
/// Only storage here. The controller decides what may be inserted and keeps
/// the invariants; [`Model::validate`] checks them at persistence boundaries.
#[derive(Debug, Default)]
pub struct Model {
    images: BTreeMap<ImageId, Image>,
    tags: BTreeSet<Tag>,
}

impl Model {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert_image(&mut self, image: Image) -> ImageId {
        let id = image.id();
        self.images.insert(id, image);
        id
    }

    pub fn insert_tag(&mut self, tag: Tag) -> bool {
        self.tags.insert(tag)
    }

    pub fn image(&self, id: ImageId) -> Option<&Image> {
        self.images.get(&id)
    }

    pub(crate) fn image_mut(&mut self, id: ImageId) -> Option<&mut Image> {
        self.images.get_mut(&id)
    }

    pub fn images(&self) -> impl Iterator<Item = &Image> {
        self.images.values()
    }

    pub(crate) fn images_mut(&mut self) -> impl Iterator<Item = &mut Image> {
        self.images.values_mut()
    }

    pub fn tags(&self) -> &BTreeSet<Tag> {
        &self.tags
    }

    pub(crate) fn remove_tag(&mut self, tag: &Tag) -> bool {
        self.tags.remove(tag)
    }

    pub(crate) fn replace_tags(&mut self, tags: BTreeSet<Tag>) {
        self.tags = tags;
    }

    pub fn contains_image(&self, id: ImageId) -> bool {
        self.images.contains_key(&id)
    }

    pub fn contains_tag(&self, tag: &Tag) -> bool {
        self.tags.contains(tag)
    }

    pub fn contains_path(&self, path: &Path) -> bool {
        self.images.values().any(|image| image.path() == path)
    }

    pub fn image_count(&self) -> usize {
        self.images.len()
    }

    pub fn is_empty(&self) -> bool {
        self.images.is_empty() && self.tags.is_empty()
    }

    /// Images ordered by file name (full path breaks ties)
    pub fn images_by_file_name(&self) -> Vec<&Image> {
        let mut images: Vec<&Image> = self.images.values().collect();
        images.sort_by(|a, b| a.sort_key().cmp(&b.sort_key()));
        images
    }

    /// Check that no two images share a path and that every image tag is
    /// a member of the tag set.
    pub fn validate(&self) -> Result<(), InvariantViolation> {
        let mut seen = HashSet::new();
        for image in self.images_by_file_name() {
            if !seen.insert(image.path()) {
                return Err(InvariantViolation::DuplicatePath(image.path().to_path_buf()));
            }
            if let Some(tag) = image.tags().iter().find(|tag| !self.tags.contains(*tag)) {
                return Err(InvariantViolation::DanglingTag {
                    path: image.path().to_path_buf(),
                    tag: tag.clone(),
                });
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tag(name: &str) -> Tag {
        Tag::new(name).unwrap()
    }

    #[test]
    fn test_images_sorted_by_file_name_not_directory() {
        let mut model = Model::new();
        model.insert_image(Image::new("b/one.jpg"));
        model.insert_image(Image::new("a/two.jpg"));
        model.insert_image(Image::new("c/three.jpg"));

        let names: Vec<String> = model
            .images_by_file_name()
            .iter()
            .map(|image| image.display_name())
            .collect();
        assert_eq!(names, ["one.jpg", "three.jpg", "two.jpg"]);
    }

    #[test]
    fn test_equal_file_names_ordered_by_path() {
        let mut model = Model::new();
        model.insert_image(Image::new("z/pic.jpg"));
        model.insert_image(Image::new("a/pic.jpg"));

        let paths: Vec<&Path> = model
            .images_by_file_name()
            .iter()
            .map(|image| image.path())
            .collect();
        assert_eq!(paths, [Path::new("a/pic.jpg"), Path::new("z/pic.jpg")]);
    }

    #[test]
    fn test_sort_is_case_sensitive() {
        let mut model = Model::new();
        model.insert_image(Image::new("apple.jpg"));
        model.insert_image(Image::new("Zebra.jpg"));

        let first = model.images_by_file_name()[0].display_name();
        assert_eq!(first, "Zebra.jpg");
    }

    #[test]
    fn test_validate_duplicate_path() {
        let mut model = Model::new();
        model.insert_image(Image::new("one.jpg"));
        model.insert_image(Image::new("one.jpg"));

        assert_eq!(
            model.validate(),
            Err(InvariantViolation::DuplicatePath(PathBuf::from("one.jpg")))
        );
    }

    #[test]
    fn test_validate_dangling_tag() {
        let mut model = Model::new();
        model.insert_tag(tag("red"));
        model.insert_image(Image::with_tags(
            "one.jpg",
            [tag("red"), tag("blue")].into_iter().collect(),
        ));

        assert_eq!(
            model.validate(),
            Err(InvariantViolation::DanglingTag {
                path: PathBuf::from("one.jpg"),
                tag: tag("blue"),
            })
        );

        model.insert_tag(tag("blue"));
        assert_eq!(model.validate(), Ok(()));
    }
}
