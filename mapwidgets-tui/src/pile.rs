//! Pile adapter: a vertical stack of wrapped rows where only selectable
//! rows take focus, optionally headed by a title row.

use crossterm::event::KeyEvent;
use mapwidgets_core::{Container, ContainerEvent, Transition};
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    text::Line,
    widgets::{Block, Paragraph, Widget},
};

use crate::keymap::{Keymap, NavAction};
use crate::list::navigate;
use crate::wrap::MappedWrap;

/// Result of a key delivered to a pile
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PileKey<A> {
    /// The focused row's keymap claimed the key
    Child(A),
    /// The pile's own navigation keymap claimed the key
    Nav(Transition),
}

pub struct MappedPile<W, A> {
    controller: Container<MappedWrap<W, A>>,
    keymap: Keymap<NavAction>,
    block: Option<Block<'static>>,
    scroll: usize,
}

impl<W, A> MappedPile<W, A>
where
    W: AsRef<str> + 'static,
    A: Copy + 'static,
{
    pub fn new(items: Vec<MappedWrap<W, A>>) -> Self {
        Self::from_controller(Container::pile(items))
    }

    /// Pile whose first row is a title that never takes focus
    pub fn titled(title: MappedWrap<W, A>, items: Vec<MappedWrap<W, A>>) -> Self {
        Self::from_controller(Container::titled(title.with_selectable(false), items))
    }

    fn from_controller(controller: Container<MappedWrap<W, A>>) -> Self {
        Self {
            controller,
            keymap: Keymap::navigation(),
            block: None,
            scroll: 0,
        }
    }

    /// Replace the default "row is selectable" constraint
    pub fn with_constraint(
        mut self,
        constraint: impl Fn(usize, &MappedWrap<W, A>) -> bool + 'static,
    ) -> Self {
        self.controller = self.controller.with_constraint(constraint);
        self
    }

    pub fn with_keymap(mut self, keymap: Keymap<NavAction>) -> Self {
        self.keymap = keymap;
        self
    }

    pub fn with_block(mut self, block: Block<'static>) -> Self {
        self.block = Some(block);
        self
    }

    pub fn controller(&self) -> &Container<MappedWrap<W, A>> {
        &self.controller
    }

    pub fn controller_mut(&mut self) -> &mut Container<MappedWrap<W, A>> {
        &mut self.controller
    }

    pub fn keymap_mut(&mut self) -> &mut Keymap<NavAction> {
        &mut self.keymap
    }

    pub fn add(&mut self, item: MappedWrap<W, A>) -> Transition {
        self.controller.add(item)
    }

    pub fn set(&mut self, items: Vec<MappedWrap<W, A>>) {
        self.controller.replace_all(items);
    }

    pub fn set_title(&mut self, title: MappedWrap<W, A>) -> Option<MappedWrap<W, A>> {
        self.controller.set_title(title.with_selectable(false))
    }

    /// Focused row first, then the pile's navigation keys
    pub fn keypress(&mut self, key: &KeyEvent) -> Option<PileKey<A>> {
        if let Some(action) = self.controller.focused().and_then(|row| row.keypress(key)) {
            return Some(PileKey::Child(action));
        }
        let action = self.keymap.lookup(key)?;
        Some(PileKey::Nav(navigate(&mut self.controller, action)))
    }

    pub fn drain_events(&mut self) -> Vec<ContainerEvent> {
        self.controller.drain_events()
    }

    /// Whether rows or focus changed since the last render
    pub fn needs_redraw(&self) -> bool {
        self.controller.needs_redraw()
    }

    /// Draw the pile and acknowledge the pending redraw
    pub fn render(&mut self, area: Rect, buf: &mut Buffer, focused: bool) {
        self.controller.take_redraw();
        let inner = self.block.as_ref().map_or(area, |block| block.inner(area));
        let height = usize::from(inner.height.max(1));

        let focus = self.controller.focus();
        if focus < self.scroll {
            self.scroll = focus;
        } else if focus >= self.scroll + height {
            self.scroll = focus + 1 - height;
        }

        let has_focus = focused && self.controller.is_eligible(focus);
        let lines: Vec<Line> = self
            .controller
            .items()
            .iter()
            .enumerate()
            .map(|(index, row)| row.line(has_focus && index == focus))
            .collect();

        let mut paragraph =
            Paragraph::new(lines).scroll((u16::try_from(self.scroll).unwrap_or(u16::MAX), 0));
        if let Some(block) = &self.block {
            paragraph = paragraph.block(block.clone());
        }
        paragraph.render(area, buf);
    }
}
