//! Cyclic search over indexed sequences
//!
//! Provides the scan order used by container search (a rotation of the
//! index range that wraps around the ends), a first-match helper with a
//! key projection, and the per-container [`SearchState`] that remembers the
//! incremental-search anchor and the last committed predicate.

use std::fmt;

/// Scan direction
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Direction {
    #[default]
    Forward,
    Backward,
}

impl Direction {
    /// The opposite direction
    pub fn reverse(self) -> Self {
        match self {
            Direction::Forward => Direction::Backward,
            Direction::Backward => Direction::Forward,
        }
    }
}

/// Rotation of `0..len` beginning just after `start` (forward) or just
/// before it (backward), wrapping at the ends and finishing on `start`.
///
/// Every index is produced exactly once. `start` past the end is clamped.
pub fn cyclic_order(len: usize, start: usize, direction: Direction) -> impl Iterator<Item = usize> {
    let start = start.min(len.saturating_sub(1));
    (1..=len).map(move |step| match direction {
        Direction::Forward => (start + step) % len,
        Direction::Backward => (start + len - step) % len,
    })
}

/// Pair each index of [`cyclic_order`] with its item
pub fn cyclic_search<T>(
    items: &[T],
    start: usize,
    direction: Direction,
) -> impl Iterator<Item = (usize, &T)> {
    cyclic_order(items.len(), start, direction).map(move |index| (index, &items[index]))
}

/// First element of `sequence` whose projected key satisfies `predicate`.
///
/// The sequence is taken as given; callers pass an already
/// direction-adjusted order such as [`cyclic_search`].
pub fn find_match<'a, T, K, I>(
    sequence: I,
    key: impl Fn(&'a T) -> K,
    predicate: impl Fn(&K) -> bool,
) -> Option<(usize, &'a T)>
where
    T: 'a,
    I: IntoIterator<Item = (usize, &'a T)>,
{
    sequence.into_iter().find(|&(_, item)| predicate(&key(item)))
}

/// Boxed item predicate kept between searches
pub type Predicate<T> = Box<dyn Fn(&T) -> bool>;

struct ActiveSearch<T> {
    predicate: Predicate<T>,
    direction: Direction,
}

/// Search session state owned by one container
pub struct SearchState<T> {
    anchor: Option<usize>,
    active: Option<ActiveSearch<T>>,
}

impl<T> Default for SearchState<T> {
    fn default() -> Self {
        Self {
            anchor: None,
            active: None,
        }
    }
}

impl<T> fmt::Debug for SearchState<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SearchState")
            .field("anchor", &self.anchor)
            .field("direction", &self.active.as_ref().map(|a| a.direction))
            .finish()
    }
}

impl<T> SearchState<T> {
    /// Anchor of the running incremental search, if any
    pub fn anchor(&self) -> Option<usize> {
        self.anchor
    }

    /// Fix the anchor on the first incremental step and return it.
    ///
    /// Later steps of the same session keep the original anchor.
    pub fn begin_incremental(&mut self, focus: usize) -> usize {
        *self.anchor.get_or_insert(focus)
    }

    /// End the incremental session, handing back its anchor
    pub fn take_anchor(&mut self) -> Option<usize> {
        self.anchor.take()
    }

    /// End the incremental session without moving anything
    pub fn reset_anchor(&mut self) {
        self.anchor = None;
    }

    /// Install a committed search for later `next`/`previous` calls.
    ///
    /// Clears the incremental anchor.
    pub fn commit(&mut self, predicate: Predicate<T>, direction: Direction) {
        self.anchor = None;
        self.active = Some(ActiveSearch {
            predicate,
            direction,
        });
    }

    /// Direction of the committed search
    pub fn direction(&self) -> Option<Direction> {
        self.active.as_ref().map(|active| active.direction)
    }

    /// Whether `next`/`previous` have something to repeat
    pub fn is_active(&self) -> bool {
        self.active.is_some()
    }

    /// Evaluate the committed predicate; `false` when none is installed
    pub fn matches(&self, item: &T) -> bool {
        self.active
            .as_ref()
            .is_some_and(|active| (active.predicate)(item))
    }

    /// Forget the anchor and the committed search
    pub fn clear(&mut self) {
        self.anchor = None;
        self.active = None;
    }
}
