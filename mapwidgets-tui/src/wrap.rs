//! Styled, keymapped wrapper around display content
//!
//! `MappedWrap` gives a piece of content a normal style, a focus style, a
//! keymap, and a selectable flag. The wrapped value is reached only through
//! the accessors below.

use crossterm::event::KeyEvent;
use mapwidgets_core::Selectable;
use ratatui::{style::Style, text::Line};

use crate::keymap::{KeyBinding, Keymap};

#[derive(Debug, Clone)]
pub struct MappedWrap<W, A> {
    inner: W,
    style: Style,
    focus_style: Style,
    keymap: Keymap<A>,
    selectable: bool,
}

impl<W, A: Copy> MappedWrap<W, A> {
    /// Selectable, unstyled, with an empty keymap
    pub fn new(inner: W) -> Self {
        Self {
            inner,
            style: Style::default(),
            focus_style: Style::default(),
            keymap: Keymap::new(),
            selectable: true,
        }
    }

    pub fn with_style(mut self, style: Style) -> Self {
        self.style = style;
        self
    }

    pub fn with_focus_style(mut self, style: Style) -> Self {
        self.focus_style = style;
        self
    }

    pub fn with_keymap(mut self, keymap: Keymap<A>) -> Self {
        self.keymap = keymap;
        self
    }

    pub fn with_selectable(mut self, selectable: bool) -> Self {
        self.selectable = selectable;
        self
    }

    pub fn inner(&self) -> &W {
        &self.inner
    }

    pub fn inner_mut(&mut self) -> &mut W {
        &mut self.inner
    }

    pub fn set_inner(&mut self, inner: W) -> W {
        std::mem::replace(&mut self.inner, inner)
    }

    pub fn into_inner(self) -> W {
        self.inner
    }

    pub fn style(&self) -> Style {
        self.style
    }

    pub fn set_style(&mut self, style: Style) {
        self.style = style;
    }

    pub fn focus_style(&self) -> Style {
        self.focus_style
    }

    pub fn set_focus_style(&mut self, style: Style) {
        self.focus_style = style;
    }

    pub fn set_selectable(&mut self, selectable: bool) {
        self.selectable = selectable;
    }

    pub fn bind(&mut self, key: KeyBinding, action: A) {
        self.keymap.insert(key, action);
    }

    /// The action bound to `key`, if any
    pub fn keypress(&self, key: &KeyEvent) -> Option<A> {
        self.keymap.lookup(key)
    }

    /// Style for the current focus state
    pub fn current_style(&self, focused: bool) -> Style {
        if focused {
            self.style.patch(self.focus_style)
        } else {
            self.style
        }
    }
}

impl<W: AsRef<str>, A: Copy> MappedWrap<W, A> {
    /// One styled row of the wrapped text
    pub fn line(&self, focused: bool) -> Line<'_> {
        Line::styled(self.inner.as_ref(), self.current_style(focused))
    }
}

impl<W, A> Selectable for MappedWrap<W, A> {
    fn selectable(&self) -> bool {
        self.selectable
    }
}
