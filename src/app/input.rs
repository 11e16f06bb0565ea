//! Key event handling

use std::ffi::OsString;
use std::path::PathBuf;

use anyhow::{Result, bail};
use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use crate::error::Error;
use crate::model::{Image, Tag};
use crate::storage;
use crate::view::{Focus, Prompt, PromptKind};
use super::App;

impl App {
    /// Apply one key press. Failures end up in the error overlay.
    pub fn handle_key_event(&mut self, key: KeyEvent) {
        if key.kind != KeyEventKind::Press {
            return;
        }

        if let Err(e) = self.dispatch_key(key) {
            tracing::warn!(error = %e, "Key action failed");
            let message = Self::format_error(&e);
            self.controller.view_mut().show_error(message);
        }
    }

    fn dispatch_key(&mut self, key: KeyEvent) -> Result<()> {
        let view = self.controller.view();

        // Error message blocks all other interactions
        if view.error_message().is_some() {
            if matches!(key.code, KeyCode::Esc | KeyCode::Enter) {
                self.controller.view_mut().clear_error();
            }
            return Ok(());
        }

        if view.is_help_open() {
            if matches!(
                key.code,
                KeyCode::Esc | KeyCode::Char('h') | KeyCode::Char('H') | KeyCode::Char('?')
            ) {
                self.controller.view_mut().set_help_open(false);
            }
            return Ok(());
        }

        if view.prompt().is_some() {
            return self.handle_prompt_key(key);
        }

        if key.modifiers.contains(KeyModifiers::CONTROL) {
            match key.code {
                KeyCode::Char('s') => self.save()?,
                KeyCode::Char('q') | KeyCode::Char('c') => self.should_quit = true,
                _ => {}
            }
            return Ok(());
        }

        match key.code {
            KeyCode::Char('q') | KeyCode::Char('Q') => {
                self.should_quit = true;
            }
            KeyCode::Char('h') | KeyCode::Char('H') | KeyCode::Char('?') => {
                self.controller.view_mut().set_help_open(true);
            }
            KeyCode::Tab => {
                let forward = !key.modifiers.contains(KeyModifiers::SHIFT);
                self.controller.view_mut().cycle_focus(forward);
            }
            KeyCode::BackTab => {
                self.controller.view_mut().cycle_focus(false);
            }
            KeyCode::Up => self.move_selection(false)?,
            KeyCode::Down => self.move_selection(true)?,
            KeyCode::Char(' ') => self.toggle_highlighted_tag(),
            KeyCode::Enter => match self.controller.view().focus() {
                Focus::Files => {}
                Focus::Tags => self.toggle_highlighted_tag(),
                Focus::Outputs => self.assign_current()?,
            },
            KeyCode::Char(c @ '1'..='9') => {
                let index = c as usize - '1' as usize;
                self.toggle_tag(index);
            }
            KeyCode::Char('n') | KeyCode::Char('N') => self.step_image(true)?,
            KeyCode::Char('p') => self.step_image(false)?,
            KeyCode::Char('P') => {
                if self.sorter.is_some() {
                    self.controller
                        .view_mut()
                        .open_prompt(PromptKind::ConfirmPerform, "");
                }
            }
            KeyCode::Char('u') | KeyCode::Char('U') => self.unassign_current(),
            KeyCode::Char('a') | KeyCode::Char('A') => {
                self.controller.view_mut().open_prompt(PromptKind::AddTag, "");
            }
            KeyCode::Char('r') | KeyCode::Char('R') => {
                if let Some(tag) = self.controller.view().highlighted_tag().cloned() {
                    let input = tag.name().to_string();
                    self.controller
                        .view_mut()
                        .open_prompt(PromptKind::RenameTag(tag), input);
                }
            }
            KeyCode::Char('d') | KeyCode::Char('D') => {
                if let Some(tag) = self.controller.view().highlighted_tag().cloned() {
                    self.controller.delete_tag(&tag);
                }
            }
            KeyCode::Char('i') | KeyCode::Char('I') => {
                self.controller.view_mut().open_prompt(PromptKind::AddImage, "");
            }
            KeyCode::Char('o') | KeyCode::Char('O') => {
                self.controller.view_mut().open_prompt(PromptKind::Open, "");
            }
            KeyCode::Char('s') => self.save()?,
            KeyCode::Char('S') => self.open_save_as(),
            _ => {}
        }

        Ok(())
    }

    fn handle_prompt_key(&mut self, key: KeyEvent) -> Result<()> {
        let view = self.controller.view_mut();
        let confirming = matches!(
            view.prompt(),
            Some(Prompt {
                kind: PromptKind::ConfirmPerform,
                ..
            })
        );

        if confirming {
            match key.code {
                KeyCode::Char('y') | KeyCode::Char('Y') => {
                    view.take_prompt();
                    return self.perform_assignments();
                }
                KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => {
                    view.take_prompt();
                }
                _ => {}
            }
            return Ok(());
        }

        match key.code {
            KeyCode::Esc => {
                view.take_prompt();
            }
            KeyCode::Enter => {
                if let Some(prompt) = view.take_prompt() {
                    self.submit_prompt(prompt)?;
                }
            }
            KeyCode::Backspace => {
                if let Some(input) = view.prompt_input_mut() {
                    input.pop();
                }
            }
            KeyCode::Char(c) => {
                if let Some(input) = view.prompt_input_mut() {
                    input.push(c);
                }
            }
            _ => {}
        }
        Ok(())
    }

    fn submit_prompt(&mut self, prompt: Prompt) -> Result<()> {
        let input = prompt.input.trim();

        match prompt.kind {
            PromptKind::AddTag => {
                self.controller.add_tag(Tag::new(input)?)?;
            }
            PromptKind::RenameTag(old) => {
                self.controller.update_tag(&old, Tag::new(input)?)?;
            }
            PromptKind::AddImage => {
                let path = PathBuf::from(input);
                if !path.is_file() {
                    bail!("\"{}\" is not a file", path.display());
                }
                self.controller.add_image(Image::new(path))?;
                self.sync_sorting_status();
            }
            PromptKind::SaveAs => {
                if input.is_empty() {
                    bail!("No file name given");
                }
                let path = with_project_extension(PathBuf::from(input));
                self.controller.save(&path)?;
            }
            PromptKind::Open => {
                if input.is_empty() {
                    bail!("No file name given");
                }
                self.controller.load(&PathBuf::from(input))?;
                self.sync_sorting_status();
            }
            PromptKind::ConfirmPerform => self.perform_assignments()?,
        }
        Ok(())
    }

    fn move_selection(&mut self, down: bool) -> Result<()> {
        match self.controller.view().focus() {
            Focus::Files => match self.step_image(down) {
                // Arrow keys stop quietly at either end
                Err(e) if matches!(e.downcast_ref::<Error>(), Some(Error::ImagesExhausted)) => Ok(()),
                other => other,
            },
            Focus::Tags => {
                self.controller.view_mut().move_tag_cursor(down);
                Ok(())
            }
            Focus::Outputs => {
                self.controller.view_mut().move_output_cursor(down);
                Ok(())
            }
        }
    }

    fn step_image(&mut self, forward: bool) -> Result<()> {
        if forward {
            self.controller.next_image()?;
        } else {
            self.controller.previous_image()?;
        }
        self.sync_sorting_status();
        Ok(())
    }

    fn toggle_highlighted_tag(&mut self) {
        if let Some(tag) = self.controller.view().highlighted_tag().cloned() {
            self.toggle_on_current(&tag);
        }
    }

    /// Flip tag number `index` of the tag list on the current image
    fn toggle_tag(&mut self, index: usize) {
        if let Some(tag) = self.controller.view().tag_at(index).cloned() {
            self.toggle_on_current(&tag);
        }
    }

    fn toggle_on_current(&mut self, tag: &Tag) {
        let Some(image) = self.controller.current_image() else {
            self.controller.view_mut().set_status("No image selected");
            return;
        };
        let present = image.has_tag(tag);
        self.controller.set_current_image_tag(tag, !present);
    }

    /// Save to the known location, or ask for one
    fn save(&mut self) -> Result<()> {
        match self.controller.save_current() {
            Err(Error::NoSaveLocation) => {
                self.open_save_as();
                Ok(())
            }
            other => Ok(other?),
        }
    }

    fn open_save_as(&mut self) {
        let input = self
            .controller
            .save_location()
            .map(|path| path.display().to_string())
            .unwrap_or_default();
        self.controller
            .view_mut()
            .open_prompt(PromptKind::SaveAs, input);
    }
}

/// Append the project extension unless `path` already carries it
fn with_project_extension(path: PathBuf) -> PathBuf {
    if path.extension().is_some_and(|ext| ext == storage::EXTENSION) {
        return path;
    }
    let mut name = OsString::from(path);
    name.push(".");
    name.push(storage::EXTENSION);
    PathBuf::from(name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_with_project_extension() {
        assert_eq!(
            with_project_extension(PathBuf::from("holiday")),
            PathBuf::from("holiday.picpick")
        );
        assert_eq!(
            with_project_extension(PathBuf::from("holiday.picpick")),
            PathBuf::from("holiday.picpick")
        );
        assert_eq!(
            with_project_extension(PathBuf::from("2024.05")),
            PathBuf::from("2024.05.picpick")
        );
    }
}
