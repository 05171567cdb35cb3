//! Single-line text entry with a keymap

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::{
    buffer::Buffer,
    layout::{Position, Rect},
    style::Style,
    text::{Line, Span},
    widgets::Widget,
};

use crate::keymap::{KeyBinding, Keymap};

/// What a key did to a text field
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyOutcome<A> {
    /// The keymap claimed the key; the caller runs the action
    Mapped(A),
    /// Default editing changed the buffer or moved the cursor
    Edited(EditChange),
    /// Nothing handled the key
    Unhandled,
}

/// Effect of default editing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditChange {
    Inserted,
    Deleted,
    Moved,
}

impl EditChange {
    /// Whether the buffer text changed
    pub fn changed_text(&self) -> bool {
        !matches!(self, EditChange::Moved)
    }
}

/// Caption + buffer + cursor, with keys intercepted by a keymap before the
/// default editing keys. A disabled field ignores default editing.
#[derive(Debug, Clone)]
pub struct MappedEdit<A> {
    caption: String,
    text: String,
    /// Cursor position in characters
    position: usize,
    disabled: bool,
    keymap: Keymap<A>,
    caption_style: Style,
    style: Style,
}

impl<A: Copy> Default for MappedEdit<A> {
    fn default() -> Self {
        Self::new(Keymap::new())
    }
}

impl<A: Copy> MappedEdit<A> {
    pub fn new(keymap: Keymap<A>) -> Self {
        Self {
            caption: String::new(),
            text: String::new(),
            position: 0,
            disabled: false,
            keymap,
            caption_style: Style::default(),
            style: Style::default(),
        }
    }

    pub fn disabled(mut self, disabled: bool) -> Self {
        self.disabled = disabled;
        self
    }

    pub fn caption_style(mut self, style: Style) -> Self {
        self.caption_style = style;
        self
    }

    pub fn style(mut self, style: Style) -> Self {
        self.style = style;
        self
    }

    pub fn caption(&self) -> &str {
        &self.caption
    }

    pub fn set_caption(&mut self, caption: &str) {
        self.caption = caption.to_string();
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    /// Replace the buffer, clamping the cursor into it
    pub fn set_text(&mut self, text: &str) {
        self.text = text.to_string();
        self.position = self.position.min(self.char_len());
    }

    pub fn position(&self) -> usize {
        self.position
    }

    pub fn set_position(&mut self, position: usize) {
        self.position = position.min(self.char_len());
    }

    pub fn is_disabled(&self) -> bool {
        self.disabled
    }

    pub fn set_disabled(&mut self, disabled: bool) {
        self.disabled = disabled;
    }

    pub fn keymap(&self) -> &Keymap<A> {
        &self.keymap
    }

    pub fn keymap_mut(&mut self) -> &mut Keymap<A> {
        &mut self.keymap
    }

    pub fn bind(&mut self, key: KeyBinding, action: A) {
        self.keymap.insert(key, action);
    }

    /// Keymap first, then default editing
    pub fn keypress(&mut self, key: KeyEvent) -> KeyOutcome<A> {
        if let Some(action) = self.keymap.lookup(&key) {
            return KeyOutcome::Mapped(action);
        }
        match self.edit_default(key) {
            Some(change) => KeyOutcome::Edited(change),
            None => KeyOutcome::Unhandled,
        }
    }

    /// Built-in editing keys, bypassing the keymap
    pub fn edit_default(&mut self, key: KeyEvent) -> Option<EditChange> {
        if self.disabled {
            return None;
        }
        if key
            .modifiers
            .intersects(KeyModifiers::CONTROL | KeyModifiers::ALT)
        {
            return None;
        }
        match key.code {
            KeyCode::Char(c) => {
                let at = self.byte_offset(self.position);
                self.text.insert(at, c);
                self.position += 1;
                Some(EditChange::Inserted)
            }
            KeyCode::Backspace if self.position > 0 => {
                let at = self.byte_offset(self.position - 1);
                self.text.remove(at);
                self.position -= 1;
                Some(EditChange::Deleted)
            }
            KeyCode::Delete if self.position < self.char_len() => {
                let at = self.byte_offset(self.position);
                self.text.remove(at);
                Some(EditChange::Deleted)
            }
            KeyCode::Left if self.position > 0 => {
                self.position -= 1;
                Some(EditChange::Moved)
            }
            KeyCode::Right if self.position < self.char_len() => {
                self.position += 1;
                Some(EditChange::Moved)
            }
            KeyCode::Home => {
                self.position = 0;
                Some(EditChange::Moved)
            }
            KeyCode::End => {
                self.position = self.char_len();
                Some(EditChange::Moved)
            }
            _ => None,
        }
    }

    /// Screen position of the text cursor when drawn into `area`
    pub fn cursor_position(&self, area: Rect) -> Position {
        let column = self.caption.chars().count() + self.position;
        let x = area
            .x
            .saturating_add(u16::try_from(column).unwrap_or(u16::MAX))
            .min(area.right().saturating_sub(1));
        Position::new(x, area.y)
    }

    fn char_len(&self) -> usize {
        self.text.chars().count()
    }

    fn byte_offset(&self, chars: usize) -> usize {
        self.text
            .char_indices()
            .nth(chars)
            .map_or(self.text.len(), |(byte, _)| byte)
    }
}

impl<A> Widget for &MappedEdit<A> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        Line::from(vec![
            Span::styled(self.caption.as_str(), self.caption_style),
            Span::styled(self.text.as_str(), self.style),
        ])
        .render(area, buf);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    enum Action {
        Submit,
    }

    fn press(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn typed(edit: &mut MappedEdit<Action>, text: &str) {
        for c in text.chars() {
            edit.keypress(press(KeyCode::Char(c)));
        }
    }

    #[test]
    fn test_typing_and_cursor_movement() {
        let mut edit: MappedEdit<Action> = MappedEdit::default();
        typed(&mut edit, "helo");
        edit.keypress(press(KeyCode::Left));
        typed(&mut edit, "l");
        assert_eq!(edit.text(), "hello");
        assert_eq!(edit.position(), 4);

        assert_eq!(
            edit.keypress(press(KeyCode::Backspace)),
            KeyOutcome::Edited(EditChange::Deleted)
        );
        assert_eq!(edit.text(), "helo");
        edit.keypress(press(KeyCode::Home));
        edit.keypress(press(KeyCode::Delete));
        assert_eq!(edit.text(), "elo");
        assert_eq!(edit.position(), 0);
    }

    #[test]
    fn test_backspace_at_start_is_unhandled() {
        let mut edit: MappedEdit<Action> = MappedEdit::default();
        assert_eq!(edit.keypress(press(KeyCode::Backspace)), KeyOutcome::Unhandled);
    }

    #[test]
    fn test_keymap_intercepts_before_default() {
        let keymap = Keymap::new().bind(KeyBinding::plain(KeyCode::Enter), Action::Submit);
        let mut edit = MappedEdit::new(keymap);
        typed(&mut edit, "x");
        assert_eq!(edit.keypress(press(KeyCode::Enter)), KeyOutcome::Mapped(Action::Submit));
        assert_eq!(edit.text(), "x");
    }

    #[test]
    fn test_disabled_ignores_editing_but_not_keymap() {
        let keymap = Keymap::new().bind(KeyBinding::char('q'), Action::Submit);
        let mut edit = MappedEdit::new(keymap).disabled(true);
        assert_eq!(edit.keypress(press(KeyCode::Char('a'))), KeyOutcome::Unhandled);
        assert_eq!(edit.keypress(press(KeyCode::Char('q'))), KeyOutcome::Mapped(Action::Submit));
        assert_eq!(edit.text(), "");
    }

    #[test]
    fn test_multibyte_editing() {
        let mut edit: MappedEdit<Action> = MappedEdit::default();
        typed(&mut edit, "héé");
        edit.keypress(press(KeyCode::Backspace));
        assert_eq!(edit.text(), "hé");
        assert_eq!(edit.position(), 2);
    }

    #[test]
    fn test_set_text_clamps_position() {
        let mut edit: MappedEdit<Action> = MappedEdit::default();
        edit.set_text("abcdef");
        edit.set_position(6);
        edit.set_text("ab");
        assert_eq!(edit.position(), 2);
        edit.set_position(99);
        assert_eq!(edit.position(), 2);
    }

    #[test]
    fn test_cursor_position_includes_caption() {
        let mut edit: MappedEdit<Action> = MappedEdit::default();
        edit.set_caption("> ");
        edit.set_text("abc");
        edit.set_position(3);
        let pos = edit.cursor_position(Rect::new(0, 9, 40, 1));
        assert_eq!(pos, Position::new(5, 9));
    }
}
