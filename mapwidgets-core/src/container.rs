//! Navigable container controller shared by lists and piles
//!
//! Holds an ordered collection of children, a focus cursor, a selectability
//! constraint and the search state. Every transition either moves focus
//! (queueing [`ContainerEvent::Shift`] and marking the container for redraw)
//! or reports a boundary (queueing `Top`/`Bottom`, no redraw).
//!
//! Three flavours:
//! - list: every item is steppable unless a constraint is installed
//! - pile: only items whose [`Selectable::selectable`] is true take focus
//! - titled pile: a pile whose index 0 holds a title that never takes focus

use std::fmt;

use tracing::debug;

use crate::cursor::ScrollCursor;
use crate::search::{cyclic_search, find_match, Direction, SearchState};

/// Items that know whether they can take focus
pub trait Selectable {
    fn selectable(&self) -> bool;
}

impl Selectable for String {
    fn selectable(&self) -> bool {
        true
    }
}

/// Predicate over `(index, item)` gating which children may take focus
pub type Constraint<T> = Box<dyn Fn(usize, &T) -> bool>;

/// Signals a container can emit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ContainerEvent {
    /// Focus moved
    Shift,
    /// Nothing eligible above the focus
    Top,
    /// Nothing eligible below the focus
    Bottom,
}

impl ContainerEvent {
    /// Every event a container may emit
    pub const ALL: [ContainerEvent; 3] = [Self::Shift, Self::Top, Self::Bottom];

    /// Signal name as seen by the embedding application
    pub fn name(&self) -> &'static str {
        match self {
            ContainerEvent::Shift => "shift",
            ContainerEvent::Top => "top",
            ContainerEvent::Bottom => "bottom",
        }
    }
}

/// Outcome of a focus transition
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    Moved { from: usize, to: usize },
    /// The target was the current focus
    Stayed,
    HitTop,
    HitBottom,
}

impl Transition {
    pub fn moved(&self) -> bool {
        matches!(self, Transition::Moved { .. })
    }
}

/// Focus-navigable group of child items
pub struct Container<T> {
    items: Vec<T>,
    /// Leading slots that never take focus (1 for a titled pile)
    reserved: usize,
    cursor: ScrollCursor,
    constraint: Constraint<T>,
    search: SearchState<T>,
    events: Vec<ContainerEvent>,
    dirty: bool,
}

impl<T> fmt::Debug for Container<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Container")
            .field("len", &self.items.len())
            .field("reserved", &self.reserved)
            .field("focus", &self.cursor.peek())
            .field("search", &self.search)
            .field("events", &self.events)
            .finish()
    }
}

impl<T: 'static> Container<T> {
    /// A list: every item may take focus
    pub fn list(items: Vec<T>) -> Self {
        Self::build(items, 0, Box::new(|_, _: &T| true))
    }

    /// A pile: items take focus when they are selectable
    pub fn pile(items: Vec<T>) -> Self
    where
        T: Selectable,
    {
        Self::build(items, 0, Box::new(|_, item: &T| item.selectable()))
    }

    /// A pile with a fixed title at index 0
    pub fn titled(title: T, items: Vec<T>) -> Self
    where
        T: Selectable,
    {
        let mut all = Vec::with_capacity(items.len() + 1);
        all.push(title);
        all.extend(items);
        Self::build(all, 1, Box::new(|_, item: &T| item.selectable()))
    }

    fn build(items: Vec<T>, reserved: usize, constraint: Constraint<T>) -> Self {
        let mut container = Self {
            cursor: ScrollCursor::new(items.len(), 0),
            items,
            reserved,
            constraint,
            search: SearchState::default(),
            events: Vec::new(),
            dirty: false,
        };
        container.snap_to_eligible();
        container
    }

    /// Replace the selectability constraint
    pub fn with_constraint(mut self, constraint: impl Fn(usize, &T) -> bool + 'static) -> Self {
        self.constraint = Box::new(constraint);
        self.snap_to_eligible();
        self
    }

    /// Start with focus on `index` when it is eligible
    pub fn with_focus(mut self, index: usize) -> Self {
        if self.is_eligible(index) {
            self.cursor.seek(index);
        }
        self
    }

    // ------------------------------------------------------------------
    // Queries
    // ------------------------------------------------------------------

    /// Total number of children, title included
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Number of content children (title excluded)
    pub fn content_len(&self) -> usize {
        self.items.len().saturating_sub(self.reserved)
    }

    /// Whether there are no content children.
    ///
    /// Counts slots, not eligibility: a pile of dividers is not empty but
    /// has nothing to focus. Use [`selectable`](Self::selectable) for that.
    pub fn is_empty(&self) -> bool {
        self.content_len() == 0
    }

    /// Whether at least one child may take focus
    pub fn selectable(&self) -> bool {
        (0..self.items.len()).any(|index| self.is_eligible(index))
    }

    pub fn is_titled(&self) -> bool {
        self.reserved > 0
    }

    pub fn title(&self) -> Option<&T> {
        if self.is_titled() {
            self.items.first()
        } else {
            None
        }
    }

    pub fn items(&self) -> &[T] {
        &self.items
    }

    /// Content children (title excluded)
    pub fn contents(&self) -> &[T] {
        &self.items[self.reserved.min(self.items.len())..]
    }

    pub fn get(&self, index: usize) -> Option<&T> {
        self.items.get(index)
    }

    pub fn get_mut(&mut self, index: usize) -> Option<&mut T> {
        self.dirty = true;
        self.items.get_mut(index)
    }

    /// Index of the focus cursor
    pub fn focus(&self) -> usize {
        self.cursor.peek()
    }

    /// The focused child, if the cursor rests on a content child
    pub fn focused(&self) -> Option<&T> {
        let index = self.focus();
        if index < self.reserved {
            return None;
        }
        self.items.get(index)
    }

    pub fn focused_mut(&mut self) -> Option<&mut T> {
        let index = self.focus();
        if index < self.reserved {
            return None;
        }
        self.dirty = true;
        self.items.get_mut(index)
    }

    /// Whether `index` may take focus
    pub fn is_eligible(&self, index: usize) -> bool {
        index >= self.reserved
            && self
                .items
                .get(index)
                .is_some_and(|item| (self.constraint)(index, item))
    }

    // ------------------------------------------------------------------
    // Focus transitions
    // ------------------------------------------------------------------

    /// Focus the first eligible child
    pub fn top(&mut self) -> Transition {
        match (0..self.items.len()).find(|&index| self.is_eligible(index)) {
            Some(index) => self.move_to(index),
            None => self.boundary(ContainerEvent::Top),
        }
    }

    /// Focus the last eligible child
    pub fn bottom(&mut self) -> Transition {
        match (0..self.items.len()).rev().find(|&index| self.is_eligible(index)) {
            Some(index) => self.move_to(index),
            None => self.boundary(ContainerEvent::Bottom),
        }
    }

    /// Move down across `amount` eligible children.
    ///
    /// Stops on the last eligible child when fewer remain; emits `Bottom`
    /// when none do. `amount == 0` only observes.
    pub fn shift_forward(&mut self, amount: usize) -> Transition {
        if amount == 0 {
            return Transition::Stayed;
        }
        let target = (self.focus() + 1..self.items.len())
            .filter(|&index| self.is_eligible(index))
            .take(amount)
            .last();
        match target {
            Some(index) => self.move_to(index),
            None => self.boundary(ContainerEvent::Bottom),
        }
    }

    /// Move up across `amount` eligible children.
    ///
    /// Stops on the first eligible child when fewer remain; emits `Top`
    /// when none do. `amount == 0` only observes.
    pub fn shift_backward(&mut self, amount: usize) -> Transition {
        if amount == 0 {
            return Transition::Stayed;
        }
        let target = (0..self.focus())
            .rev()
            .filter(|&index| self.is_eligible(index))
            .take(amount)
            .last();
        match target {
            Some(index) => self.move_to(index),
            None => self.boundary(ContainerEvent::Top),
        }
    }

    /// Focus `index` explicitly; ineligible targets are ignored
    pub fn set_focus(&mut self, index: usize) -> Transition {
        if !self.is_eligible(index) {
            debug!(index, "set_focus ignored: child not eligible");
            return Transition::Stayed;
        }
        self.move_to(index)
    }

    // ------------------------------------------------------------------
    // Contents
    // ------------------------------------------------------------------

    /// Append a child.
    ///
    /// A container with nothing eligible (empty, or only dividers) moves
    /// focus to the new child when it is eligible.
    pub fn add(&mut self, item: T) -> Transition {
        let had_eligible = self.selectable();
        self.items.push(item);
        self.cursor.rebuild(self.items.len());
        self.dirty = true;

        let index = self.items.len() - 1;
        if !had_eligible && self.is_eligible(index) {
            self.move_to(index)
        } else {
            Transition::Stayed
        }
    }

    /// Remove the content child at `index`
    pub fn remove(&mut self, index: usize) -> Option<T> {
        if index < self.reserved || index >= self.items.len() {
            return None;
        }
        let before = self.focus();
        let item = self.items.remove(index);
        if index < before {
            self.cursor.advance(-1);
        }
        self.cursor.rebuild(self.items.len());
        self.search.reset_anchor();
        self.snap_to_eligible();
        self.dirty = true;
        if index <= before {
            self.events.push(ContainerEvent::Shift);
        }
        Some(item)
    }

    /// Replace every content child, keeping the title.
    ///
    /// Focus goes to the first eligible child, or to the first content slot
    /// when nothing is eligible.
    pub fn replace_all(&mut self, items: impl IntoIterator<Item = T>) {
        self.items.truncate(self.reserved);
        self.items.extend(items);
        self.cursor.rebuild(self.items.len());
        self.search.reset_anchor();
        let first = (0..self.items.len())
            .find(|&index| self.is_eligible(index))
            .unwrap_or(self.reserved);
        self.cursor.seek(first);
        self.dirty = true;
    }

    /// Replace the title, turning a plain container into a titled one.
    ///
    /// Returns the previous title.
    pub fn set_title(&mut self, title: T) -> Option<T> {
        self.dirty = true;
        if self.is_titled() {
            return Some(std::mem::replace(&mut self.items[0], title));
        }
        self.items.insert(0, title);
        self.reserved = 1;
        self.cursor.rebuild(self.items.len());
        self.cursor.advance(1);
        self.snap_to_eligible();
        None
    }

    // ------------------------------------------------------------------
    // Search
    // ------------------------------------------------------------------

    /// Index of the first eligible child matching `predicate`, scanning
    /// cyclically from `start` (exclusive; `start` is visited last)
    pub fn find(
        &self,
        predicate: impl Fn(&T) -> bool,
        start: usize,
        direction: Direction,
    ) -> Option<usize> {
        let candidates = cyclic_search(&self.items, start, direction)
            .filter(|&(index, _)| self.is_eligible(index));
        find_match(candidates, |item| item, |item| predicate(*item)).map(|(index, _)| index)
    }

    /// One step of an incremental search.
    ///
    /// The first step of a session anchors on the current focus; every step
    /// searches from that anchor and falls back to it when nothing matches.
    pub fn inc_search(
        &mut self,
        predicate: impl Fn(&T) -> bool,
        direction: Direction,
    ) -> Option<usize> {
        let focus = self.focus();
        let anchor = self.search.begin_incremental(focus);
        let found = self.find(&predicate, anchor, direction);
        debug!(anchor, ?found, ?direction, "incremental search step");
        self.move_to(found.unwrap_or(anchor));
        found
    }

    /// Committed search from `start` (or the focus).
    ///
    /// Ends any incremental session and remembers `predicate` for
    /// [`search_next`](Self::search_next) / [`search_previous`](Self::search_previous).
    pub fn search(
        &mut self,
        predicate: impl Fn(&T) -> bool + 'static,
        direction: Direction,
        start: Option<usize>,
    ) -> Option<usize> {
        let start = start.unwrap_or_else(|| self.focus());
        let found = self.find(&predicate, start, direction);
        debug!(start, ?found, ?direction, "committed search");
        self.search.commit(Box::new(predicate), direction);
        if let Some(index) = found {
            self.move_to(index);
        }
        found
    }

    /// Repeat the committed search in its own direction
    pub fn search_next(&mut self) -> Option<usize> {
        self.repeat_search(false)
    }

    /// Repeat the committed search in the opposite direction
    pub fn search_previous(&mut self) -> Option<usize> {
        self.repeat_search(true)
    }

    fn repeat_search(&mut self, reverse: bool) -> Option<usize> {
        let mut direction = self.search.direction()?;
        if reverse {
            direction = direction.reverse();
        }
        let found = self.find(|item| self.search.matches(item), self.focus(), direction);
        if let Some(index) = found {
            self.move_to(index);
        }
        found
    }

    /// Abandon the incremental session, restoring the anchored focus
    pub fn cancel_search(&mut self) -> Transition {
        match self.search.take_anchor() {
            Some(anchor) => self.move_to(anchor),
            None => Transition::Stayed,
        }
    }

    /// End the incremental session where it stands
    pub fn reset_anchor(&mut self) {
        self.search.reset_anchor();
    }

    pub fn search_anchor(&self) -> Option<usize> {
        self.search.anchor()
    }

    /// Whether a committed search can be repeated
    pub fn has_search(&self) -> bool {
        self.search.is_active()
    }

    // ------------------------------------------------------------------
    // Signals
    // ------------------------------------------------------------------

    /// Drain queued signals in emission order
    pub fn drain_events(&mut self) -> Vec<ContainerEvent> {
        std::mem::take(&mut self.events)
    }

    /// Queued signals, oldest first
    pub fn pending_events(&self) -> &[ContainerEvent] {
        &self.events
    }

    /// Whether visual state changed since the last [`take_redraw`](Self::take_redraw)
    pub fn needs_redraw(&self) -> bool {
        self.dirty
    }

    /// Whether visual state changed since the last call; clears the flag
    pub fn take_redraw(&mut self) -> bool {
        std::mem::take(&mut self.dirty)
    }

    fn move_to(&mut self, target: usize) -> Transition {
        let from = self.cursor.peek();
        let offset = if target >= from {
            (target - from) as isize
        } else {
            -((from - target) as isize)
        };
        let to = self.cursor.advance(offset);
        if to == from {
            return Transition::Stayed;
        }
        debug!(from, to, "focus shifted");
        self.dirty = true;
        self.events.push(ContainerEvent::Shift);
        Transition::Moved { from, to }
    }

    fn boundary(&mut self, event: ContainerEvent) -> Transition {
        debug!(focus = self.focus(), signal = event.name(), "navigation hit boundary");
        self.events.push(event);
        match event {
            ContainerEvent::Top => Transition::HitTop,
            _ => Transition::HitBottom,
        }
    }

    /// Keep the cursor on an eligible child when one exists
    fn snap_to_eligible(&mut self) {
        let focus = self.focus();
        if self.is_eligible(focus) {
            return;
        }
        let fallback = (focus..self.items.len())
            .chain((0..focus).rev())
            .find(|&index| self.is_eligible(index))
            .unwrap_or(self.reserved);
        self.cursor.seek(fallback);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, PartialEq)]
    struct Row {
        label: &'static str,
        focusable: bool,
    }

    impl Selectable for Row {
        fn selectable(&self) -> bool {
            self.focusable
        }
    }

    fn row(label: &'static str) -> Row {
        Row {
            label,
            focusable: true,
        }
    }

    fn divider() -> Row {
        Row {
            label: "--",
            focusable: false,
        }
    }

    #[test]
    fn test_list_shift_and_boundaries() {
        let mut list = Container::list(vec!["a", "b", "c"]);
        assert_eq!(list.focus(), 0);
        assert_eq!(list.shift_forward(1), Transition::Moved { from: 0, to: 1 });
        assert_eq!(list.shift_forward(5), Transition::Moved { from: 1, to: 2 });
        assert_eq!(list.shift_forward(1), Transition::HitBottom);
        assert_eq!(list.focus(), 2);
        assert_eq!(
            list.drain_events(),
            vec![ContainerEvent::Shift, ContainerEvent::Shift, ContainerEvent::Bottom]
        );

        assert_eq!(list.top(), Transition::Moved { from: 2, to: 0 });
        assert_eq!(list.shift_backward(1), Transition::HitTop);
        assert_eq!(list.bottom(), Transition::Moved { from: 0, to: 2 });
    }

    #[test]
    fn test_boundary_does_not_redraw() {
        let mut list = Container::list(vec!["only"]);
        list.take_redraw();
        assert_eq!(list.shift_backward(1), Transition::HitTop);
        assert!(!list.needs_redraw());
        assert!(!list.take_redraw());
        assert_eq!(list.shift_forward(1), Transition::HitBottom);
        assert!(!list.take_redraw());
        assert_eq!(list.drain_events(), vec![ContainerEvent::Top, ContainerEvent::Bottom]);
    }

    #[test]
    fn test_move_requests_redraw() {
        let mut list = Container::list(vec!["a", "b"]);
        list.take_redraw();
        list.shift_forward(1);
        assert!(list.take_redraw());
        assert!(!list.take_redraw());
    }

    #[test]
    fn test_top_when_already_there_stays() {
        let mut list = Container::list(vec!["a", "b"]);
        assert_eq!(list.top(), Transition::Stayed);
        assert!(list.pending_events().is_empty());
    }

    #[test]
    fn test_pile_skips_unselectable() {
        let mut pile = Container::pile(vec![divider(), row("a"), divider(), divider(), row("b")]);
        assert_eq!(pile.focus(), 1);
        assert_eq!(pile.shift_forward(1), Transition::Moved { from: 1, to: 4 });
        assert_eq!(pile.shift_forward(1), Transition::HitBottom);
        assert_eq!(pile.shift_backward(1), Transition::Moved { from: 4, to: 1 });
        assert_eq!(pile.shift_backward(1), Transition::HitTop);
        assert!(pile.selectable());
    }

    #[test]
    fn test_custom_constraint() {
        let mut list = Container::list(vec![1, 2, 3, 4, 5, 6]).with_constraint(|_, n| n % 2 == 0);
        assert_eq!(list.focus(), 1);
        list.shift_forward(2);
        assert_eq!(list.focused(), Some(&6));
        list.top();
        assert_eq!(list.focused(), Some(&2));
    }

    #[test]
    fn test_nothing_eligible() {
        let mut pile = Container::pile(vec![divider(), divider()]);
        assert!(!pile.selectable());
        assert_eq!(pile.top(), Transition::HitTop);
        assert_eq!(pile.bottom(), Transition::HitBottom);
    }

    #[test]
    fn test_add_to_empty_focuses_item() {
        let mut pile: Container<Row> = Container::pile(Vec::new());
        assert!(pile.is_empty());
        pile.add(row("first"));
        assert_eq!(pile.focused(), Some(&row("first")));
        pile.drain_events();

        assert_eq!(pile.shift_forward(1), Transition::HitBottom);
        assert_eq!(pile.shift_backward(1), Transition::HitTop);
        assert_eq!(pile.focus(), 0);
        assert_eq!(pile.drain_events(), vec![ContainerEvent::Bottom, ContainerEvent::Top]);
    }

    #[test]
    fn test_add_to_nonempty_keeps_focus() {
        let mut list = Container::list(vec!["a"]);
        assert_eq!(list.add("b"), Transition::Stayed);
        assert_eq!(list.focus(), 0);
    }

    #[test]
    fn test_titled_reserves_index_zero() {
        let mut pile = Container::titled(row("title"), vec![row("a"), row("b")]);
        assert_eq!(pile.focus(), 1);
        assert_eq!(pile.content_len(), 2);
        assert_eq!(pile.shift_backward(1), Transition::HitTop);
        assert_eq!(pile.top(), Transition::Stayed);
        assert_eq!(pile.focus(), 1);
        assert!(!pile.is_eligible(0));
    }

    #[test]
    fn test_titled_empty_then_add() {
        let mut pile = Container::titled(row("title"), Vec::new());
        assert!(pile.is_empty());
        assert_eq!(pile.focused(), None);
        assert_eq!(pile.add(row("a")), Transition::Moved { from: 0, to: 1 });
        assert_eq!(pile.focused(), Some(&row("a")));
    }

    #[test]
    fn test_set_title() {
        let mut pile = Container::titled(row("old"), vec![row("a")]);
        let previous = pile.set_title(row("new"));
        assert_eq!(previous, Some(row("old")));
        assert_eq!(pile.title(), Some(&row("new")));

        let mut list = Container::pile(vec![row("a"), row("b")]);
        list.shift_forward(1);
        assert_eq!(list.set_title(row("t")), None);
        assert!(list.is_titled());
        assert_eq!(list.focused(), Some(&row("b")));
    }

    #[test]
    fn test_replace_all_focuses_first_child() {
        let mut list = Container::list(vec!["a", "b", "c", "d"]);
        list.bottom();
        list.replace_all(vec!["x", "y"]);
        assert_eq!(list.focus(), 0);

        list.replace_all(Vec::new());
        assert_eq!(list.focus(), 0);
        assert!(list.is_empty());
    }

    #[test]
    fn test_replace_all_after_bottom_resets_to_first_eligible() {
        let mut pile = Container::titled(divider(), vec![row("a"), row("b"), row("c")]);
        pile.bottom();
        assert_eq!(pile.focus(), 3);
        pile.replace_all(vec![row("x"), row("y"), row("z")]);
        assert_eq!(pile.focus(), 1);
        assert_eq!(pile.focused(), Some(&row("x")));
    }

    #[test]
    fn test_add_after_dividers_focuses_new_child() {
        let mut pile = Container::pile(vec![divider()]);
        assert!(!pile.is_empty());
        assert!(!pile.selectable());
        assert_eq!(pile.add(row("a")), Transition::Moved { from: 0, to: 1 });
        assert!(pile.is_eligible(pile.focus()));

        let mut titled = Container::titled(divider(), vec![divider()]);
        titled.add(row("b"));
        assert_eq!(titled.focus(), 2);
        assert_eq!(titled.focused(), Some(&row("b")));
    }

    #[test]
    fn test_add_divider_then_row_to_empty_pile() {
        let mut pile: Container<Row> = Container::pile(Vec::new());
        assert_eq!(pile.add(divider()), Transition::Stayed);
        pile.add(row("a"));
        assert_eq!(pile.focused(), Some(&row("a")));
        assert_eq!(pile.add(row("b")), Transition::Stayed);
        assert_eq!(pile.focus(), 1);
    }

    #[test]
    fn test_replace_all_snaps_to_first_eligible() {
        let mut pile = Container::titled(row("t"), vec![row("a")]);
        pile.replace_all(vec![divider(), row("b"), row("c")]);
        assert_eq!(pile.focused(), Some(&row("b")));
        assert_eq!(pile.title(), Some(&row("t")));
    }

    #[test]
    fn test_remove_adjusts_focus() {
        let mut list = Container::list(vec!["a", "b", "c"]);
        list.bottom();
        assert_eq!(list.remove(0), Some("a"));
        assert_eq!(list.focused(), Some(&"c"));
        assert_eq!(list.remove(1), Some("c"));
        assert_eq!(list.focused(), Some(&"b"));
        assert_eq!(list.remove(7), None);
    }

    #[test]
    fn test_set_focus_rejects_ineligible() {
        let mut pile = Container::pile(vec![row("a"), divider(), row("b")]);
        assert_eq!(pile.set_focus(1), Transition::Stayed);
        assert_eq!(pile.set_focus(2), Transition::Moved { from: 0, to: 2 });
    }

    #[test]
    fn test_find_wraps_and_visits_start_last() {
        let list = Container::list(vec!["apple", "banana", "avocado"]);
        assert_eq!(list.find(|s| s.starts_with('a'), 0, Direction::Forward), Some(2));
        assert_eq!(list.find(|s| s.starts_with('a'), 2, Direction::Forward), Some(0));
        assert_eq!(list.find(|s| s.starts_with('b'), 1, Direction::Backward), Some(1));
        assert_eq!(list.find(|s| s.starts_with('z'), 1, Direction::Backward), None);
    }

    #[test]
    fn test_inc_search_keeps_anchor() {
        let mut list = Container::list(vec!["alpha", "beta", "gamma", "beetle"]);
        list.set_focus(2);

        assert_eq!(list.inc_search(|s| s.starts_with('b'), Direction::Forward), Some(3));
        assert_eq!(list.search_anchor(), Some(2));

        // Refining the query searches again from the anchor, not from the hit.
        assert_eq!(list.inc_search(|s| s.starts_with("be"), Direction::Forward), Some(3));
        assert_eq!(list.inc_search(|s| s.starts_with("bet"), Direction::Forward), Some(1));

        // No match: focus returns to the anchor.
        assert_eq!(list.inc_search(|s| s.starts_with("betz"), Direction::Forward), None);
        assert_eq!(list.focus(), 2);
    }

    #[test]
    fn test_cancel_search_restores_anchor() {
        let mut list = Container::list(vec!["a", "b", "c"]);
        list.inc_search(|s| *s == "c", Direction::Forward);
        assert_eq!(list.focus(), 2);
        assert_eq!(list.cancel_search(), Transition::Moved { from: 2, to: 0 });
        assert_eq!(list.search_anchor(), None);
    }

    #[test]
    fn test_reset_anchor_keeps_focus() {
        let mut list = Container::list(vec!["a", "b", "c"]);
        list.inc_search(|s| *s == "b", Direction::Forward);
        list.reset_anchor();
        assert_eq!(list.focus(), 1);
        assert_eq!(list.cancel_search(), Transition::Stayed);
    }

    #[test]
    fn test_committed_search_repeats() {
        let mut list = Container::list(vec!["x1", "y", "x2", "z", "x3"]);
        list.inc_search(|s| s.starts_with('z'), Direction::Forward);
        assert_eq!(list.search(|s: &&str| s.starts_with('x'), Direction::Forward, Some(0)), Some(2));
        assert_eq!(list.search_anchor(), None);
        assert!(list.has_search());

        assert_eq!(list.search_next(), Some(4));
        assert_eq!(list.search_next(), Some(0));
        assert_eq!(list.search_previous(), Some(4));
    }

    #[test]
    fn test_search_next_without_search() {
        let mut list = Container::list(vec!["a"]);
        assert_eq!(list.search_next(), None);
        assert_eq!(list.search_previous(), None);
    }

    #[test]
    fn test_search_skips_ineligible() {
        let mut pile = Container::pile(vec![row("a"), divider(), row("b")]);
        let found = pile.search(|r: &Row| r.label == "--", Direction::Forward, None);
        assert_eq!(found, None);
        assert_eq!(pile.focus(), 0);
    }

    #[test]
    fn test_event_names_are_static() {
        let names: Vec<_> = ContainerEvent::ALL.iter().map(ContainerEvent::name).collect();
        assert_eq!(names, vec!["shift", "top", "bottom"]);
    }
}
