#![allow(dead_code)]

use picpick::{Controller, Image, Model, ProjectView, Tag};

/// One call received by [`RecordingView`], with names instead of references
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Notification {
    ImageList(Vec<String>),
    TagList(Vec<String>),
    CurrentImage(Option<String>),
    CurrentImageTags(Vec<String>),
    Unsaved,
    Saved(String),
}

/// View that records every notification in order
#[derive(Debug, Default)]
pub struct RecordingView {
    pub received: Vec<Notification>,
}

impl RecordingView {
    /// Drain what was received so far
    pub fn take(&mut self) -> Vec<Notification> {
        std::mem::take(&mut self.received)
    }
}

impl ProjectView for RecordingView {
    fn image_list_changed(&mut self, images: &[&Image]) {
        let names = images.iter().map(|image| image.display_name()).collect();
        self.received.push(Notification::ImageList(names));
    }

    fn tag_list_changed(&mut self, tags: &[&Tag]) {
        let names = tags.iter().map(|tag| tag.name().to_string()).collect();
        self.received.push(Notification::TagList(names));
    }

    fn current_image_changed(&mut self, image: Option<&Image>) {
        self.received
            .push(Notification::CurrentImage(image.map(Image::display_name)));
    }

    fn current_image_tags_changed(&mut self, image: &Image) {
        self.received
            .push(Notification::CurrentImageTags(tag_names(image.tags())));
    }

    fn marked_unsaved(&mut self) {
        self.received.push(Notification::Unsaved);
    }

    fn marked_saved(&mut self, label: &str) {
        self.received.push(Notification::Saved(label.to_string()));
    }
}

pub fn tag(name: &str) -> Tag {
    Tag::new(name).unwrap()
}

pub fn tag_names<'a>(tags: impl IntoIterator<Item = &'a Tag>) -> Vec<String> {
    tags.into_iter().map(|tag| tag.name().to_string()).collect()
}

pub fn file_names(images: &[&Image]) -> Vec<String> {
    images.iter().map(|image| image.display_name()).collect()
}

/// Controller over an empty project, with the startup notifications drained
pub fn controller() -> Controller<RecordingView> {
    let mut controller = Controller::new(Model::new(), RecordingView::default());
    controller.view_mut().take();
    controller
}

/// Controller holding `images` and `tags`, notifications drained
pub fn controller_with(images: &[&str], tags: &[&str]) -> Controller<RecordingView> {
    let mut controller = controller();
    for name in images {
        controller.add_image(Image::new(*name)).unwrap();
    }
    for name in tags {
        controller.add_tag(tag(name)).unwrap();
    }
    controller.view_mut().take();
    controller
}

pub fn image_named<'a>(controller: &'a Controller<RecordingView>, name: &str) -> &'a Image {
    controller
        .images()
        .into_iter()
        .find(|image| image.display_name() == name)
        .unwrap()
}
