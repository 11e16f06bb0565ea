//! Tag set management and tagging of the current image

use std::collections::BTreeSet;

use crate::error::{Error, Result};
use crate::model::Tag;
use crate::view::ProjectView;
use super::Controller;

impl<V: ProjectView> Controller<V> {
    pub fn add_tag(&mut self, tag: Tag) -> Result<()> {
        if self.model.contains_tag(&tag) {
            tracing::warn!(%tag, "Tag already present");
            return Err(Error::TagAlreadyPresent(tag.name().to_owned()));
        }

        tracing::debug!(%tag, "Tag added");
        self.model.insert_tag(tag);
        self.notify_tag_list();
        self.view.marked_unsaved();
        Ok(())
    }

    /// Remove `tag` from the project and from every image carrying it
    pub fn delete_tag(&mut self, tag: &Tag) {
        assert!(self.model.contains_tag(tag), "unknown tag \"{tag}\"");

        let current = self.current;
        let mut current_changed = false;
        let mut others_changed = false;

        self.model.remove_tag(tag);
        for image in self.model.images_mut() {
            if image.tags_mut().remove(tag) {
                if Some(image.id()) == current {
                    current_changed = true;
                } else {
                    others_changed = true;
                }
            }
        }
        tracing::debug!(%tag, "Tag deleted");

        self.notify_tag_changes(current_changed, others_changed);
    }

    /// Rename `old` to `new` everywhere.
    ///
    /// Fails with [`Error::TagAlreadyPresent`] when `new` is another existing
    /// tag; renaming a tag to itself does nothing.
    pub fn update_tag(&mut self, old: &Tag, new: Tag) -> Result<()> {
        assert!(self.model.contains_tag(old), "unknown tag \"{old}\"");

        if new == *old {
            return Ok(());
        }
        if self.model.contains_tag(&new) {
            tracing::warn!(%old, %new, "Rename target already present");
            return Err(Error::TagAlreadyPresent(new.name().to_owned()));
        }

        let current = self.current;
        let mut current_changed = false;
        let mut others_changed = false;

        self.model.remove_tag(old);
        self.model.insert_tag(new.clone());
        for image in self.model.images_mut() {
            if image.tags_mut().remove(old) {
                image.tags_mut().insert(new.clone());
                if Some(image.id()) == current {
                    current_changed = true;
                } else {
                    others_changed = true;
                }
            }
        }
        tracing::debug!(%old, %new, "Tag renamed");

        self.notify_tag_changes(current_changed, others_changed);
        Ok(())
    }

    /// Replace the whole tag set. Image tags missing from `tags` are dropped.
    pub fn set_tags(&mut self, tags: impl IntoIterator<Item = Tag>) {
        let tags: BTreeSet<Tag> = tags.into_iter().collect();

        let current = self.current;
        let mut current_changed = false;
        let mut others_changed = false;
        for image in self.model.images_mut() {
            let before = image.tags().len();
            image.tags_mut().retain(|tag| tags.contains(tag));
            if image.tags().len() == before {
                continue;
            }
            if Some(image.id()) == current {
                current_changed = true;
            } else {
                others_changed = true;
            }
        }
        tracing::debug!(tags = tags.len(), "Tag set replaced");
        self.model.replace_tags(tags);

        self.notify_tag_changes(current_changed, others_changed);
    }

    /// Notifications after the tag set changed. Images other than the current
    /// one are only visible through the image list, so it is refreshed when
    /// one of their tag sets changed.
    fn notify_tag_changes(&mut self, current_changed: bool, others_changed: bool) {
        self.notify_tag_list();
        if others_changed {
            self.notify_image_list();
        }
        if current_changed {
            self.notify_current_image_tags();
        }
        self.view.marked_unsaved();
    }

    /// Add `tag` to the current image, which must not carry it yet
    pub fn tag_current_image(&mut self, tag: &Tag) {
        assert!(self.model.contains_tag(tag), "unknown tag \"{tag}\"");

        let image = self.current_image_mut();
        assert!(
            !image.has_tag(tag),
            "image \"{}\" is already tagged \"{tag}\"",
            image.path().display()
        );
        image.tags_mut().insert(tag.clone());
        tracing::debug!(%tag, image = %image.path().display(), "Image tagged");

        self.notify_current_image_tags();
        self.view.marked_unsaved();
    }

    /// Remove `tag` from the current image, which must carry it
    pub fn untag_current_image(&mut self, tag: &Tag) {
        assert!(self.model.contains_tag(tag), "unknown tag \"{tag}\"");

        let image = self.current_image_mut();
        assert!(
            image.has_tag(tag),
            "image \"{}\" is not tagged \"{tag}\"",
            image.path().display()
        );
        image.tags_mut().remove(tag);
        tracing::debug!(%tag, image = %image.path().display(), "Image untagged");

        self.notify_current_image_tags();
        self.view.marked_unsaved();
    }

    pub fn set_current_image_tag(&mut self, tag: &Tag, present: bool) {
        if present {
            self.tag_current_image(tag);
        } else {
            self.untag_current_image(tag);
        }
    }
}
