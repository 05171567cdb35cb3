//! Scrolling list adapter
//!
//! Draws a [`Container`] list with ratatui's `List` and turns navigation
//! keys into controller transitions.

use crossterm::event::KeyEvent;
use mapwidgets_core::{Container, ContainerEvent, Direction, Transition};
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Modifier, Style},
    widgets::{Block, List, ListItem, ListState, StatefulWidget},
};

use crate::keymap::{Keymap, NavAction};

/// Rows moved by page keys
pub const PAGE: usize = 10;

/// Run a navigation action against any container
pub fn navigate<T: 'static>(container: &mut Container<T>, action: NavAction) -> Transition {
    match action {
        NavAction::Up => container.shift_backward(1),
        NavAction::Down => container.shift_forward(1),
        NavAction::PageUp => container.shift_backward(PAGE),
        NavAction::PageDown => container.shift_forward(PAGE),
        NavAction::Top => container.top(),
        NavAction::Bottom => container.bottom(),
        NavAction::SearchNext => found(container, Container::search_next),
        NavAction::SearchPrevious => found(container, Container::search_previous),
    }
}

fn found<T: 'static>(
    container: &mut Container<T>,
    repeat: fn(&mut Container<T>) -> Option<usize>,
) -> Transition {
    let from = container.focus();
    match repeat(container) {
        Some(to) if to != from => Transition::Moved { from, to },
        _ => Transition::Stayed,
    }
}

pub struct MappedList<T> {
    controller: Container<T>,
    keymap: Keymap<NavAction>,
    state: ListState,
    block: Option<Block<'static>>,
    highlight: Style,
}

impl<T: AsRef<str> + 'static> MappedList<T> {
    pub fn new(items: Vec<T>) -> Self {
        Self::from_controller(Container::list(items))
    }

    pub fn from_controller(controller: Container<T>) -> Self {
        Self {
            controller,
            keymap: Keymap::navigation(),
            state: ListState::default(),
            block: None,
            highlight: Style::default().add_modifier(Modifier::REVERSED),
        }
    }

    pub fn with_keymap(mut self, keymap: Keymap<NavAction>) -> Self {
        self.keymap = keymap;
        self
    }

    pub fn with_block(mut self, block: Block<'static>) -> Self {
        self.block = Some(block);
        self
    }

    pub fn with_highlight(mut self, style: Style) -> Self {
        self.highlight = style;
        self
    }

    pub fn controller(&self) -> &Container<T> {
        &self.controller
    }

    pub fn controller_mut(&mut self) -> &mut Container<T> {
        &mut self.controller
    }

    pub fn keymap_mut(&mut self) -> &mut Keymap<NavAction> {
        &mut self.keymap
    }

    /// Apply the bound navigation action; `None` when the key is unbound
    pub fn keypress(&mut self, key: &KeyEvent) -> Option<Transition> {
        let action = self.keymap.lookup(key)?;
        Some(navigate(&mut self.controller, action))
    }

    /// Replace every item; focus returns to the first eligible one
    pub fn set(&mut self, items: Vec<T>) {
        self.controller.replace_all(items);
    }

    pub fn find(&self, predicate: impl Fn(&T) -> bool, start: usize, direction: Direction) -> Option<usize> {
        self.controller.find(predicate, start, direction)
    }

    pub fn drain_events(&mut self) -> Vec<ContainerEvent> {
        self.controller.drain_events()
    }

    /// Whether items or focus changed since the last render
    pub fn needs_redraw(&self) -> bool {
        self.controller.needs_redraw()
    }

    /// Draw the list and acknowledge the pending redraw
    pub fn render(&mut self, area: Rect, buf: &mut Buffer, focused: bool) {
        self.controller.take_redraw();
        let focus = self.controller.focus();
        let selected = self.controller.is_eligible(focus).then_some(focus);
        self.state.select(selected);

        let items: Vec<ListItem> = self
            .controller
            .items()
            .iter()
            .map(|item| ListItem::new(item.as_ref()))
            .collect();
        let mut list = List::new(items);
        if focused {
            list = list.highlight_style(self.highlight);
        }
        if let Some(block) = &self.block {
            list = list.block(block.clone());
        }
        StatefulWidget::render(list, area, buf, &mut self.state);
    }
}
