//! Terminal implementation of the project view

use std::collections::BTreeSet;
use std::path::PathBuf;

use chrono::{DateTime, Local};
use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout},
};

use crate::model::{Image, ImageId, Tag};
use super::{ProjectView, layout, overlays};

const TITLE: &str = "PicPick";

/// Which pane receives navigation keys
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum Focus {
    #[default]
    Files,
    Tags,
    Outputs,
}

impl Focus {
    pub fn next(self, with_outputs: bool) -> Self {
        match self {
            Focus::Files => Focus::Tags,
            Focus::Tags if with_outputs => Focus::Outputs,
            Focus::Tags | Focus::Outputs => Focus::Files,
        }
    }

    pub fn prev(self, with_outputs: bool) -> Self {
        match self {
            Focus::Files if with_outputs => Focus::Outputs,
            Focus::Files => Focus::Tags,
            Focus::Tags => Focus::Files,
            Focus::Outputs => Focus::Tags,
        }
    }
}

/// What a text prompt is asking for
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PromptKind {
    AddTag,
    RenameTag(Tag),
    AddImage,
    SaveAs,
    Open,
    ConfirmPerform,
}

impl PromptKind {
    pub fn title(&self) -> String {
        match self {
            PromptKind::AddTag => " New tag ".to_string(),
            PromptKind::RenameTag(tag) => format!(" Rename \"{}\" ", tag),
            PromptKind::AddImage => " Add image (path) ".to_string(),
            PromptKind::SaveAs => " Save as (path) ".to_string(),
            PromptKind::Open => " Open project (path) ".to_string(),
            PromptKind::ConfirmPerform => " Perform assignments? (y/n) ".to_string(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Prompt {
    pub kind: PromptKind,
    pub input: String,
}

#[derive(Clone, Debug)]
pub(super) struct FileEntry {
    pub id: ImageId,
    pub name: String,
    pub tag_count: usize,
}

/// Sorting run summary shown in the details panel
#[derive(Clone, Debug, Default)]
pub(super) struct SortingState {
    pub outputs: Vec<String>,
    pub cursor: usize,
    pub assigned: Option<String>,
    pub pending: usize,
}

/// Widget state of the terminal front-end.
///
/// Project data only arrives through [`ProjectView`] notifications; the rest
/// (focus, cursors, prompts, messages) is local to the view.
#[derive(Debug, Default)]
pub struct TerminalView {
    pub(super) files: Vec<FileEntry>,
    pub(super) tags: Vec<Tag>,
    pub(super) current: Option<ImageId>,
    pub(super) current_path: Option<PathBuf>,
    pub(super) checked: BTreeSet<Tag>,
    pub(super) tag_cursor: usize,
    pub(super) focus: Focus,
    pub(super) dirty: bool,
    pub(super) saved: Option<(String, DateTime<Local>)>,
    pub(super) sorting: Option<SortingState>,
    pub(super) prompt: Option<Prompt>,
    pub(super) error_message: Option<String>,
    pub(super) status: Option<String>,
    pub(super) show_help: bool,
}

impl TerminalView {
    pub fn new() -> Self {
        Self::default()
    }

    /// Window title, starred while there are unsaved changes
    pub fn title(&self) -> String {
        if self.dirty {
            format!("{TITLE} *")
        } else {
            TITLE.to_string()
        }
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Index of the current image in the file list
    pub fn selected_file(&self) -> Option<usize> {
        let current = self.current?;
        self.files.iter().position(|entry| entry.id == current)
    }

    pub fn file_names(&self) -> Vec<&str> {
        self.files.iter().map(|entry| entry.name.as_str()).collect()
    }

    pub fn tags(&self) -> &[Tag] {
        &self.tags
    }

    pub fn tag_at(&self, index: usize) -> Option<&Tag> {
        self.tags.get(index)
    }

    pub fn is_checked(&self, tag: &Tag) -> bool {
        self.checked.contains(tag)
    }

    pub fn highlighted_tag(&self) -> Option<&Tag> {
        self.tags.get(self.tag_cursor)
    }

    pub fn move_tag_cursor(&mut self, down: bool) {
        if down {
            if self.tag_cursor + 1 < self.tags.len() {
                self.tag_cursor += 1;
            }
        } else {
            self.tag_cursor = self.tag_cursor.saturating_sub(1);
        }
    }

    pub fn focus(&self) -> Focus {
        self.focus
    }

    pub fn cycle_focus(&mut self, forward: bool) {
        let with_outputs = self.sorting.is_some();
        self.focus = if forward {
            self.focus.next(with_outputs)
        } else {
            self.focus.prev(with_outputs)
        };
    }

    pub fn set_outputs(&mut self, outputs: Vec<String>) {
        self.sorting = Some(SortingState {
            outputs,
            ..SortingState::default()
        });
    }

    pub fn output_cursor(&self) -> Option<usize> {
        self.sorting.as_ref().map(|sorting| sorting.cursor)
    }

    pub fn move_output_cursor(&mut self, down: bool) {
        if let Some(sorting) = self.sorting.as_mut() {
            if down {
                if sorting.cursor + 1 < sorting.outputs.len() {
                    sorting.cursor += 1;
                }
            } else {
                sorting.cursor = sorting.cursor.saturating_sub(1);
            }
        }
    }

    pub fn set_assignment(&mut self, assigned: Option<String>, pending: usize) {
        if let Some(sorting) = self.sorting.as_mut() {
            sorting.assigned = assigned;
            sorting.pending = pending;
        }
    }

    pub fn prompt(&self) -> Option<&Prompt> {
        self.prompt.as_ref()
    }

    pub fn open_prompt(&mut self, kind: PromptKind, input: impl Into<String>) {
        self.prompt = Some(Prompt {
            kind,
            input: input.into(),
        });
    }

    pub fn prompt_input_mut(&mut self) -> Option<&mut String> {
        self.prompt.as_mut().map(|prompt| &mut prompt.input)
    }

    pub fn take_prompt(&mut self) -> Option<Prompt> {
        self.prompt.take()
    }

    pub fn show_error(&mut self, message: impl Into<String>) {
        self.error_message = Some(message.into());
    }

    pub fn error_message(&self) -> Option<&str> {
        self.error_message.as_deref()
    }

    pub fn clear_error(&mut self) {
        self.error_message = None;
    }

    pub fn set_status(&mut self, message: impl Into<String>) {
        self.status = Some(message.into());
    }

    pub fn status(&self) -> Option<&str> {
        self.status.as_deref()
    }

    pub fn is_help_open(&self) -> bool {
        self.show_help
    }

    pub fn set_help_open(&mut self, open: bool) {
        self.show_help = open;
    }

    pub fn render(&self, frame: &mut Frame) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3), // Title + project
                Constraint::Min(0),    // Sidebar + details
                Constraint::Length(1), // Status line
            ])
            .split(frame.area());

        layout::render_top_bar(frame, chunks[0], self);

        let main_chunks = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(35), Constraint::Percentage(65)])
            .split(chunks[1]);

        layout::render_sidebar(frame, main_chunks[0], self);
        layout::render_details(frame, main_chunks[1], self);
        layout::render_status_line(frame, chunks[2], self);

        if let Some(ref prompt) = self.prompt {
            overlays::render_prompt(frame, prompt);
        }
        if let Some(ref message) = self.error_message {
            overlays::render_error_notification(frame, message);
        }
        if self.show_help {
            overlays::render_help_popup(frame, self.sorting.is_some());
        }
    }
}

impl ProjectView for TerminalView {
    fn image_list_changed(&mut self, images: &[&Image]) {
        self.files = images
            .iter()
            .map(|image| FileEntry {
                id: image.id(),
                name: image.display_name(),
                tag_count: image.tags().len(),
            })
            .collect();
    }

    fn tag_list_changed(&mut self, tags: &[&Tag]) {
        self.tags = tags.iter().map(|&tag| tag.clone()).collect();
        self.tag_cursor = self.tag_cursor.min(self.tags.len().saturating_sub(1));
    }

    fn current_image_changed(&mut self, image: Option<&Image>) {
        self.current = image.map(|image| image.id());
        self.current_path = image.map(|image| image.path().to_path_buf());
        self.checked = image.map(|image| image.tags().clone()).unwrap_or_default();
    }

    fn current_image_tags_changed(&mut self, image: &Image) {
        self.checked = image.tags().clone();
        if let Some(entry) = self.files.iter_mut().find(|entry| entry.id == image.id()) {
            entry.tag_count = image.tags().len();
        }
    }

    fn marked_unsaved(&mut self) {
        self.dirty = true;
    }

    fn marked_saved(&mut self, label: &str) {
        self.dirty = false;
        self.status = None;
        self.saved = Some((label.to_string(), Local::now()));
    }
}
