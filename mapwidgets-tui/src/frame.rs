//! Command frame: a body area plus a one-row footer that switches between
//! the command line, a status message and a yes/no prompt.
//!
//! The frame owns the [`CommandController`] and exposes its footer to it
//! through [`CommandSurface`]. The body belongs to the caller: keys the
//! frame does not consume come back as [`FrameOutcome::Forward`].

use crossterm::event::{KeyCode, KeyEvent};
use mapwidgets_core::{
    Command, CommandController, CommandError, CommandRegistry, CommandSurface, Completion,
    Confirmation, EditOptions, KeyDisposition, DEFAULT_CAPTION,
};
use ratatui::{
    layout::{Constraint, Layout, Rect},
    style::{Color, Modifier, Style},
    text::Line,
    widgets::Paragraph,
    Frame,
};
use tracing::debug;

use crate::edit::{EditChange, KeyOutcome, MappedEdit};
use crate::keymap::{KeyBinding, Keymap};
use crate::wrap::MappedWrap;

/// Default text appended to yes/no prompts
pub const DEFAULT_CONFIRM_SUFFIX: &str = " [y/n]";

const STATUS: Style = Style::new().fg(Color::Yellow);
const HINT: Style = Style::new().fg(Color::DarkGray);
const PROMPT: Style = Style::new().fg(Color::Cyan).add_modifier(Modifier::BOLD);

/// Command line bindings
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditAction {
    Complete,
    Submit,
    DeleteAtStart,
    Cancel,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Answer {
    Yes,
    No,
}

/// Which part of the frame receives keys
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FocusPart {
    Body,
    Footer,
}

/// Signals emitted by the frame
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FrameEvent {
    /// The command line text changed by typing or completion
    Change { text: String, deleted: bool },
    /// Editing ended without a submit (escape or backspace on empty)
    Cancelled,
}

/// What the caller should do with a key after the frame saw it
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameOutcome {
    Consumed,
    Forward,
}

#[derive(Debug)]
enum Footer {
    CommandLine,
    Status(String),
    Confirm {
        prompt: MappedWrap<String, Answer>,
        confirmation: Confirmation,
    },
}

/// Footer state, split from the controller so both can be borrowed at once
#[derive(Debug)]
struct FrameSurface {
    command_line: MappedEdit<EditAction>,
    footer: Footer,
    focus: FocusPart,
    dirty: bool,
}

impl CommandSurface for FrameSurface {
    fn caption(&self) -> &str {
        self.command_line.caption()
    }

    fn set_caption(&mut self, caption: &str) {
        self.command_line.set_caption(caption);
        self.dirty = true;
    }

    fn text(&self) -> &str {
        self.command_line.text()
    }

    fn set_text(&mut self, text: &str) {
        self.command_line.set_text(text);
        self.dirty = true;
    }

    fn position(&self) -> usize {
        self.command_line.position()
    }

    fn set_position(&mut self, position: usize) {
        self.command_line.set_position(position);
        self.dirty = true;
    }

    fn focus_prompt(&mut self) {
        self.footer = Footer::CommandLine;
        self.focus = FocusPart::Footer;
        self.dirty = true;
    }

    fn stop_editing(&mut self) {
        self.command_line.set_caption("");
        self.command_line.set_text("");
        self.focus = FocusPart::Body;
        self.dirty = true;
    }

    fn escape(&mut self) {
        self.footer = Footer::CommandLine;
        self.focus = FocusPart::Body;
        self.dirty = true;
    }

    fn change_status(&mut self, status: &str) {
        self.footer = Footer::Status(status.to_string());
        self.focus = FocusPart::Body;
        self.dirty = true;
    }
}

#[derive(Debug)]
pub struct CommandFrame {
    controller: CommandController,
    surface: FrameSurface,
    command_key: KeyBinding,
    caption: String,
    confirm_suffix: String,
    events: Vec<FrameEvent>,
}

impl CommandFrame {
    pub fn new(registry: CommandRegistry) -> Self {
        let keymap = Keymap::new()
            .bind(KeyBinding::plain(KeyCode::Tab), EditAction::Complete)
            .bind(KeyBinding::plain(KeyCode::Enter), EditAction::Submit)
            .bind(KeyBinding::plain(KeyCode::Backspace), EditAction::DeleteAtStart)
            .bind(KeyBinding::plain(KeyCode::Esc), EditAction::Cancel);
        Self {
            controller: CommandController::new(registry),
            surface: FrameSurface {
                command_line: MappedEdit::new(keymap).caption_style(PROMPT),
                footer: Footer::CommandLine,
                focus: FocusPart::Body,
                dirty: true,
            },
            command_key: KeyBinding::char(':'),
            caption: DEFAULT_CAPTION.to_string(),
            confirm_suffix: DEFAULT_CONFIRM_SUFFIX.to_string(),
            events: Vec::new(),
        }
    }

    /// Key that opens the command line from the body
    pub fn with_command_key(mut self, key: KeyBinding) -> Self {
        self.command_key = key;
        self
    }

    pub fn with_caption(mut self, caption: impl Into<String>) -> Self {
        self.caption = caption.into();
        self
    }

    pub fn with_confirm_suffix(mut self, suffix: impl Into<String>) -> Self {
        self.confirm_suffix = suffix.into();
        self
    }

    pub fn focus(&self) -> FocusPart {
        self.surface.focus
    }

    pub fn is_editing(&self) -> bool {
        self.controller.is_editing()
    }

    pub fn controller(&self) -> &CommandController {
        &self.controller
    }

    pub fn command_line(&self) -> &MappedEdit<EditAction> {
        &self.surface.command_line
    }

    /// Status message currently shown, if any
    pub fn status(&self) -> Option<&str> {
        match &self.surface.footer {
            Footer::Status(text) => Some(text.as_str()),
            _ => None,
        }
    }

    /// Text of the open yes/no prompt, if any
    pub fn confirm_text(&self) -> Option<&str> {
        match &self.surface.footer {
            Footer::Confirm { prompt, .. } => Some(prompt.inner().as_str()),
            _ => None,
        }
    }

    pub fn start_editing(&mut self, options: EditOptions) {
        self.controller.start_editing(&mut self.surface, options);
    }

    /// Open the command line with the registry's names as vocabulary
    pub fn start_command(&mut self) {
        let vocabulary: Vec<String> = self
            .controller
            .registry()
            .names()
            .map(str::to_string)
            .collect();
        let options = EditOptions::new()
            .caption(self.caption.clone())
            .vocabulary(vocabulary);
        self.start_editing(options);
    }

    pub fn stop_editing(&mut self) {
        self.controller.stop_editing(&mut self.surface);
    }

    /// Drop any prompt or session and hand focus back to the body
    pub fn escape(&mut self) {
        if self.controller.is_editing() {
            self.controller.stop_editing(&mut self.surface);
        }
        self.surface.escape();
    }

    pub fn change_status(&mut self, status: &str) {
        self.surface.change_status(status);
    }

    /// Show `text` followed by the confirm suffix and wait for y/n/esc
    pub fn are_you_sure(
        &mut self,
        text: &str,
        yes: impl FnMut() + 'static,
        no: impl FnMut() + 'static,
    ) {
        let confirmation = self.controller.are_you_sure(yes, no);
        let keymap = Keymap::new()
            .bind(KeyBinding::char('y'), Answer::Yes)
            .bind(KeyBinding::char('Y'), Answer::Yes)
            .bind(KeyBinding::char('n'), Answer::No)
            .bind(KeyBinding::char('N'), Answer::No)
            .bind(KeyBinding::plain(KeyCode::Esc), Answer::No);
        let prompt = MappedWrap::new(format!("{text}{}", self.confirm_suffix))
            .with_style(STATUS)
            .with_keymap(keymap);
        self.surface.footer = Footer::Confirm {
            prompt,
            confirmation,
        };
        self.surface.focus = FocusPart::Footer;
        self.surface.dirty = true;
    }

    /// Dispatch `line` through the registry as if typed on the command line
    pub fn submit_command(&mut self, line: &str) -> Result<(), CommandError> {
        self.controller.submit_command(&mut self.surface, line)
    }

    /// Completion of the current buffer, without applying it
    pub fn completion_hint(&self) -> Option<Completion> {
        self.controller.start_completion(&self.surface)
    }

    pub fn handle_key(&mut self, key: KeyEvent) -> Result<FrameOutcome, CommandError> {
        match self.surface.focus {
            FocusPart::Body if self.command_key.matches(&key) => {
                self.start_command();
                Ok(FrameOutcome::Consumed)
            }
            FocusPart::Body => Ok(FrameOutcome::Forward),
            FocusPart::Footer => {
                if matches!(self.surface.footer, Footer::Confirm { .. }) {
                    self.handle_confirm(&key);
                } else {
                    self.handle_command_line(key)?;
                }
                Ok(FrameOutcome::Consumed)
            }
        }
    }

    pub fn drain_events(&mut self) -> Vec<FrameEvent> {
        std::mem::take(&mut self.events)
    }

    /// Whether the footer changed since the last [`take_redraw`](Self::take_redraw)
    pub fn needs_redraw(&self) -> bool {
        self.surface.dirty
    }

    pub fn take_redraw(&mut self) -> bool {
        std::mem::take(&mut self.surface.dirty)
    }

    fn handle_confirm(&mut self, key: &KeyEvent) {
        let answer = match &self.surface.footer {
            Footer::Confirm { prompt, .. } => prompt.keypress(key),
            _ => None,
        };
        let Some(answer) = answer else {
            return;
        };
        self.surface.dirty = true;
        let footer = std::mem::replace(&mut self.surface.footer, Footer::CommandLine);
        if let Footer::Confirm { mut confirmation, .. } = footer {
            debug!(?answer, "confirmation answered");
            match answer {
                Answer::Yes => confirmation.accept(&mut self.surface),
                Answer::No => confirmation.reject(&mut self.surface),
            }
        }
    }

    fn handle_command_line(&mut self, key: KeyEvent) -> Result<(), CommandError> {
        match self.surface.command_line.keypress(key) {
            KeyOutcome::Mapped(EditAction::Complete) => {
                let before = self.surface.text().to_string();
                self.controller.commit_completion(&mut self.surface);
                if self.surface.text() != before {
                    self.push_change(false);
                }
            }
            KeyOutcome::Mapped(EditAction::Submit) => {
                self.controller.submit(&mut self.surface)?;
            }
            KeyOutcome::Mapped(EditAction::DeleteAtStart) => {
                match self.controller.delete_at_start(&mut self.surface) {
                    KeyDisposition::Consumed => self.events.push(FrameEvent::Cancelled),
                    KeyDisposition::Forward => {
                        if let Some(change) = self.surface.command_line.edit_default(key) {
                            self.surface.dirty = true;
                            self.text_edited(change);
                        }
                    }
                }
            }
            KeyOutcome::Mapped(EditAction::Cancel) => {
                self.controller.stop_editing(&mut self.surface);
                self.events.push(FrameEvent::Cancelled);
            }
            KeyOutcome::Edited(change) => {
                self.surface.dirty = true;
                self.text_edited(change);
            }
            KeyOutcome::Unhandled => {}
        }
        Ok(())
    }

    fn text_edited(&mut self, change: EditChange) {
        if change.changed_text() {
            self.controller.invalidate_completion();
            self.push_change(change == EditChange::Deleted);
        }
    }

    fn push_change(&mut self, deleted: bool) {
        self.events.push(FrameEvent::Change {
            text: self.surface.text().to_string(),
            deleted,
        });
    }

    /// Split `area` into body and footer rows
    pub fn layout(area: Rect) -> (Rect, Rect) {
        let [body, footer] =
            Layout::vertical([Constraint::Min(0), Constraint::Length(1)]).areas(area);
        (body, footer)
    }

    pub fn render_footer(&self, frame: &mut Frame, area: Rect) {
        match &self.surface.footer {
            Footer::CommandLine => {
                let line = &self.surface.command_line;
                frame.render_widget(line, area);
                if self.surface.focus == FocusPart::Footer {
                    self.render_hint(frame, area);
                    frame.set_cursor_position(line.cursor_position(area));
                }
            }
            Footer::Status(text) => {
                frame.render_widget(Paragraph::new(text.as_str()).style(STATUS), area);
            }
            Footer::Confirm { prompt, .. } => {
                frame.render_widget(Paragraph::new(prompt.line(true)), area);
            }
        }
    }

    fn render_hint(&self, frame: &mut Frame, area: Rect) {
        let Some(hint) = self.completion_hint().filter(|c| c.matches.len() > 1) else {
            return;
        };
        let line = &self.surface.command_line;
        let used = line.caption().chars().count() + line.text().chars().count() + 2;
        let Ok(offset) = u16::try_from(used) else {
            return;
        };
        if offset >= area.width {
            return;
        }
        let hint_area = Rect {
            x: area.x + offset,
            width: area.width - offset,
            ..area
        };
        let text = hint.matches.join(" ");
        frame.render_widget(Line::styled(text, HINT), hint_area);
    }
}

/// Convenience for registries built inline in tests and demos
pub fn registry_from<I>(commands: I) -> CommandRegistry
where
    I: IntoIterator<Item = (&'static str, Command)>,
{
    commands
        .into_iter()
        .fold(CommandRegistry::new(), |registry, (name, command)| {
            registry.with(name, command)
        })
}
