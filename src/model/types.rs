//! Core entity definitions: tags, images and image identity

use std::borrow::Borrow;
use std::collections::BTreeSet;
use std::ffi::OsStr;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// A tag is a name with value semantics: two tags with the same name are the
/// same tag.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Tag(String);

impl Tag {
    /// Create a tag, rejecting blank names
    pub fn new(name: impl Into<String>) -> Result<Self> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(Error::EmptyTagName);
        }
        Ok(Self(name))
    }

    pub fn name(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for Tag {
    type Error = Error;

    fn try_from(name: String) -> Result<Self> {
        Self::new(name)
    }
}

impl From<Tag> for String {
    fn from(tag: Tag) -> Self {
        tag.0
    }
}

impl Borrow<str> for Tag {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Tag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Opaque identity of an [`Image`].
///
/// Ids come from a process-wide counter, so an image built from the same path
/// twice (or reloaded from a project file) is a different entity.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ImageId(u64);

impl ImageId {
    fn next() -> Self {
        static NEXT: AtomicU64 = AtomicU64::new(0);
        Self(NEXT.fetch_add(1, Ordering::Relaxed))
    }
}

impl fmt::Display for ImageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// One input picture and the tags assigned to it
#[derive(Debug)]
pub struct Image {
    id: ImageId,
    path: PathBuf,
    tags: BTreeSet<Tag>,
}

impl Image {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            id: ImageId::next(),
            path: path.into(),
            tags: BTreeSet::new(),
        }
    }

    pub(crate) fn with_tags(path: impl Into<PathBuf>, tags: BTreeSet<Tag>) -> Self {
        Self {
            tags,
            ..Self::new(path)
        }
    }

    pub fn id(&self) -> ImageId {
        self.id
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Final path component, or the whole path when there is none
    pub fn file_name(&self) -> &OsStr {
        self.path.file_name().unwrap_or(self.path.as_os_str())
    }

    /// File name for display purposes
    pub fn display_name(&self) -> String {
        self.file_name().to_string_lossy().into_owned()
    }

    pub fn tags(&self) -> &BTreeSet<Tag> {
        &self.tags
    }

    pub fn has_tag(&self, tag: &Tag) -> bool {
        self.tags.contains(tag)
    }

    pub(crate) fn set_path(&mut self, path: PathBuf) {
        self.path = path;
    }

    pub(crate) fn tags_mut(&mut self) -> &mut BTreeSet<Tag> {
        &mut self.tags
    }

    /// Ordering key of the derived image listing: file name, then full path
    pub(crate) fn sort_key(&self) -> (&OsStr, &Path) {
        (self.file_name(), &self.path)
    }
}

impl PartialEq for Image {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Image {}

impl Hash for Image {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tag_rejects_blank_names() {
        assert!(matches!(Tag::new(""), Err(Error::EmptyTagName)));
        assert!(matches!(Tag::new("   "), Err(Error::EmptyTagName)));
        assert_eq!(Tag::new("red").unwrap().name(), "red");
    }

    #[test]
    fn test_tags_are_equal_by_name() {
        let a = Tag::new("red").unwrap();
        let b = Tag::new(String::from("red")).unwrap();
        assert_eq!(a, b);

        let set: BTreeSet<Tag> = [a, b, Tag::new("blue").unwrap()].into_iter().collect();
        assert_eq!(set.len(), 2);
        assert!(set.contains("red"));
    }

    #[test]
    fn test_tag_deserialization_checks_name() {
        let tag: Tag = serde_json::from_str("\"green\"").unwrap();
        assert_eq!(tag.name(), "green");
        assert!(serde_json::from_str::<Tag>("\"\"").is_err());
    }

    #[test]
    fn test_images_have_identity_not_path_equality() {
        let a = Image::new("pics/one.jpg");
        let b = Image::new("pics/one.jpg");

        assert_ne!(a, b);
        assert_ne!(a.id(), b.id());
        assert_eq!(a.path(), b.path());
    }

    #[test]
    fn test_file_name() {
        let image = Image::new("/tmp/pics/two.jpg");
        assert_eq!(image.file_name(), "two.jpg");
        assert_eq!(image.display_name(), "two.jpg");

        let bare = Image::new("/");
        assert_eq!(bare.file_name(), "/");
    }
}
