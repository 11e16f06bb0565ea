//! Terminal application
//!
//! [`App`] owns the controller driving a [`TerminalView`] and the optional
//! sorting run. Key handling lives in `input`; everything here is plain
//! state glue between the two.

mod input;

use std::path::PathBuf;

use ratatui::Frame;

use crate::controller::Controller;
use crate::error::Error;
use crate::model::Image;
use crate::sorting::{Output, Sorter, TransferMode};
use crate::view::{PromptKind, TerminalView};

pub struct App {
    controller: Controller<TerminalView>,
    sorter: Option<Sorter>,
    should_quit: bool,
}

impl App {
    pub fn new(controller: Controller<TerminalView>, sorter: Option<Sorter>) -> Self {
        let mut app = Self {
            controller,
            sorter,
            should_quit: false,
        };

        if let Some(ref sorter) = app.sorter {
            let labels = sorter.outputs().iter().map(Output::label).collect();
            app.controller.view_mut().set_outputs(labels);
        }
        app.sync_sorting_status();
        app
    }

    pub fn controller(&self) -> &Controller<TerminalView> {
        &self.controller
    }

    pub fn controller_mut(&mut self) -> &mut Controller<TerminalView> {
        &mut self.controller
    }

    pub fn sorter(&self) -> Option<&Sorter> {
        self.sorter.as_ref()
    }

    pub fn should_quit(&self) -> bool {
        self.should_quit
    }

    pub fn render(&self, frame: &mut Frame) {
        self.controller.view().render(frame);
    }

    /// Turn an error into the message shown in the error overlay
    pub(crate) fn format_error(error: &anyhow::Error) -> String {
        match error.downcast_ref::<Error>() {
            Some(Error::NoSaveLocation) => "Nothing to save to yet. Press Shift+S to pick a file.".to_string(),
            Some(Error::Storage(e)) => format!("Project file error: {}", e),
            Some(e) => e.to_string(),
            None => format!("Error: {:#}", error),
        }
    }

    /// Push the assignment of the current image and the queue size to the view
    fn sync_sorting_status(&mut self) {
        let Some(ref sorter) = self.sorter else {
            return;
        };
        let assigned = self
            .controller
            .current_image()
            .and_then(|image| sorter.assignment(image))
            .map(Output::label);
        let pending = sorter.pending();
        self.controller.view_mut().set_assignment(assigned, pending);
    }

    /// Assign the current image to the highlighted output and step to the
    /// next image. Past the last image, offer to perform the batch.
    fn assign_current(&mut self) -> anyhow::Result<()> {
        let Some(output) = self.controller.view().output_cursor() else {
            return Ok(());
        };
        let Some(ref mut sorter) = self.sorter else {
            return Ok(());
        };
        if output >= sorter.outputs().len() {
            return Ok(());
        }
        let Some(image) = self.controller.current_image() else {
            self.controller.view_mut().set_status("No image selected");
            return Ok(());
        };
        sorter.assign(image, output);

        match self.controller.next_image() {
            Ok(()) => {}
            Err(Error::ImagesExhausted) => {
                self.controller
                    .view_mut()
                    .open_prompt(PromptKind::ConfirmPerform, "");
            }
            Err(e) => return Err(e.into()),
        }
        self.sync_sorting_status();
        Ok(())
    }

    fn unassign_current(&mut self) {
        if let (Some(sorter), Some(image)) = (self.sorter.as_mut(), self.controller.current_image()) {
            sorter.unassign(image);
        }
        self.sync_sorting_status();
    }

    /// Point project images at the files a move run put in the outputs.
    /// Keeps going past a failed relocation and reports the first one.
    fn relocate_moved(&mut self, moved: Vec<(PathBuf, PathBuf)>) -> anyhow::Result<()> {
        let mut first_error = None;
        for (source, destination) in moved {
            let id = self
                .controller
                .model()
                .images()
                .find(|image| image.path() == source.as_path())
                .map(Image::id);
            let Some(id) = id else {
                continue;
            };
            if let Err(e) = self.controller.relocate_image(id, destination) {
                first_error.get_or_insert(e);
            }
        }
        match first_error {
            Some(e) => Err(e.into()),
            None => Ok(()),
        }
    }

    fn perform_assignments(&mut self) -> anyhow::Result<()> {
        let Some(ref mut sorter) = self.sorter else {
            return Ok(());
        };
        let planned = sorter.planned();
        let mode = sorter.mode();
        let result = sorter.perform();
        let moved: Vec<_> = match mode {
            TransferMode::Move => planned
                .into_iter()
                .filter(|(source, _)| !sorter.is_pending(source))
                .collect(),
            TransferMode::Copy => Vec::new(),
        };

        let relocated = self.relocate_moved(moved);
        self.sync_sorting_status();

        let report = result?;
        relocated?;
        let verb = match report.mode {
            TransferMode::Move => "Moved",
            TransferMode::Copy => "Copied",
        };
        self.controller
            .view_mut()
            .set_status(format!("{} {} image(s)", verb, report.transferred));
        Ok(())
    }
}
