//! Key handling
//!
//! Translates key presses into session events. The published render model can lag
//! behind events still queued for the runtime, so edits build on [`LocalInput`], which
//! lays the values the UI has already sent over the latest model.

use {
    crate::{
        days,
        state::{Direction, Event},
        view::{RenderModel, SourceToggle},
    },
    crossterm::event::KeyCode,
};

/// Field receiving typed characters
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Focus {
    #[default]
    None,
    Date,
    Window,
    Postcode,
}

impl Focus {
    pub fn next(self) -> Self {
        match self {
            Focus::None => Focus::Date,
            Focus::Date => Focus::Window,
            Focus::Window => Focus::Postcode,
            Focus::Postcode => Focus::None,
        }
    }
}

/// Values sent to the runtime that the published model may not show yet
///
/// Text and window values are held while their field has focus. Source toggles are
/// held until the set of source names changes, since only the UI toggles them.
#[derive(Debug, Default)]
pub struct LocalInput {
    date_text: Option<String>,
    postcode_text: Option<String>,
    window_selected: Option<String>,
    sources: Vec<SourceToggle>,
}

impl LocalInput {
    /// The published model with local values laid over it
    pub fn overlay(&mut self, published: &RenderModel, focus: Focus) -> RenderModel {
        if focus != Focus::Date {
            self.date_text = None;
        }
        if focus != Focus::Postcode {
            self.postcode_text = None;
        }
        if focus != Focus::Window {
            self.window_selected = None;
        }
        let same_names = self.sources.len() == published.sources.len()
            && self
                .sources
                .iter()
                .zip(&published.sources)
                .all(|(local, remote)| local.name == remote.name);
        if !same_names {
            self.sources = published.sources.clone();
        }

        let mut model = published.clone();
        if let Some(text) = &self.date_text {
            model.date_valid = days::parse_day(text).is_ok();
            model.date_text = text.clone();
        }
        if let Some(text) = &self.postcode_text {
            model.postcode_text = text.clone();
        }
        if let Some(window) = &self.window_selected {
            model.window_selected = window.clone();
        }
        model.sources = self.sources.clone();
        model
    }

    /// Remember an event that is about to be sent
    pub fn record(&mut self, event: &Event) {
        match event {
            Event::EditDateInput(text) => self.date_text = Some(text.clone()),
            Event::EditPostcodeInput(text) => self.postcode_text = Some(text.clone()),
            Event::SetWindow(text) => self.window_selected = Some(text.clone()),
            Event::ToggleSource(name, included) => {
                if let Some(source) = self.sources.iter_mut().find(|s| s.name == *name) {
                    source.included = *included;
                }
            }
            // The runtime rewrites the date buffer
            Event::StepDate(_) | Event::ToggleTimer => self.date_text = None,
            _ => {}
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum KeyOutcome {
    Quit,
    Send(Event),
    Ignored,
}

/// Handle one key press, updating `focus` in place
pub fn handle_key(code: KeyCode, focus: &mut Focus, model: &RenderModel) -> KeyOutcome {
    match code {
        KeyCode::Tab => {
            *focus = focus.next();
            return KeyOutcome::Ignored;
        }
        KeyCode::Esc if *focus != Focus::None => {
            *focus = Focus::None;
            return KeyOutcome::Ignored;
        }
        KeyCode::Esc => return KeyOutcome::Quit,
        KeyCode::Left => return KeyOutcome::Send(Event::StepDate(Direction::Back)),
        KeyCode::Right => return KeyOutcome::Send(Event::StepDate(Direction::Forward)),
        _ => {}
    }

    match focus {
        Focus::None => handle_command(code, model),
        Focus::Date => edit_text(code, &model.date_text).map_or(KeyOutcome::Ignored, |text| {
            KeyOutcome::Send(Event::EditDateInput(text))
        }),
        Focus::Postcode => edit_text(code, &model.postcode_text)
            .map_or(KeyOutcome::Ignored, |text| {
                KeyOutcome::Send(Event::EditPostcodeInput(text))
            }),
        Focus::Window => match code {
            KeyCode::Up => cycle_window(model, -1),
            KeyCode::Down => cycle_window(model, 1),
            _ => KeyOutcome::Ignored,
        },
    }
}

fn handle_command(code: KeyCode, model: &RenderModel) -> KeyOutcome {
    match code {
        KeyCode::Char('q') => KeyOutcome::Quit,
        KeyCode::Char(' ') => KeyOutcome::Send(Event::ToggleTimer),
        KeyCode::Char('h') => KeyOutcome::Send(Event::ToggleControlsVisible),
        KeyCode::Char(c @ '1'..='9') => {
            let index = c as usize - '1' as usize;
            match model.sources.get(index) {
                Some(source) => {
                    KeyOutcome::Send(Event::ToggleSource(source.name.clone(), !source.included))
                }
                None => KeyOutcome::Ignored,
            }
        }
        _ => KeyOutcome::Ignored,
    }
}

/// New buffer contents after a key, or `None` when the key does not edit text
fn edit_text(code: KeyCode, current: &str) -> Option<String> {
    match code {
        KeyCode::Char(c) => {
            let mut text = current.to_string();
            text.push(c);
            Some(text)
        }
        KeyCode::Backspace => {
            let mut text = current.to_string();
            text.pop()?;
            Some(text)
        }
        _ => None,
    }
}

fn cycle_window(model: &RenderModel, step: isize) -> KeyOutcome {
    let options = &model.window_options;
    if options.is_empty() {
        return KeyOutcome::Ignored;
    }

    let current = options
        .iter()
        .position(|o| *o == model.window_selected)
        .unwrap_or(0) as isize;
    let next = (current + step).rem_euclid(options.len() as isize) as usize;
    KeyOutcome::Send(Event::SetWindow(options[next].clone()))
}
