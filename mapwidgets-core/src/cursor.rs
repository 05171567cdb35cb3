//! Bounded focus cursor
//!
//! A resumable position over `0..len` that accepts relative offsets and
//! saturates at both ends. Containers own one cursor each and rebuild it
//! whenever their contents are replaced.

/// Clamped cursor over an index range
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScrollCursor {
    index: usize,
    len: usize,
}

impl Default for ScrollCursor {
    fn default() -> Self {
        Self::new(0, 0)
    }
}

impl ScrollCursor {
    /// Create a cursor over `0..len` starting at `initial` (clamped).
    ///
    /// An empty range behaves as the single index `0`.
    pub fn new(len: usize, initial: usize) -> Self {
        let mut cursor = Self { index: 0, len };
        cursor.index = cursor.clamp(initial);
        cursor
    }

    /// Current index
    pub fn peek(&self) -> usize {
        self.index
    }

    /// Number of indices the cursor ranges over
    pub fn len(&self) -> usize {
        self.len
    }

    /// Whether the underlying range is empty
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Largest reachable index
    pub fn max_index(&self) -> usize {
        self.len.saturating_sub(1)
    }

    /// Move by `offset`, saturating at the range ends, and return the new index.
    ///
    /// `advance(0)` only observes.
    pub fn advance(&mut self, offset: isize) -> usize {
        let target = if offset >= 0 {
            self.index.saturating_add(offset.unsigned_abs())
        } else {
            self.index.saturating_sub(offset.unsigned_abs())
        };
        self.index = self.clamp(target);
        self.index
    }

    /// Jump to an absolute index (clamped) and return it
    pub fn seek(&mut self, index: usize) -> usize {
        self.index = self.clamp(index);
        self.index
    }

    /// Re-derive the range from a new length, keeping as much of the old
    /// position as fits and otherwise snapping to the last index.
    pub fn rebuild(&mut self, len: usize) {
        self.len = len;
        self.index = self.clamp(self.index);
    }

    fn clamp(&self, index: usize) -> usize {
        index.min(self.max_index())
    }
}
