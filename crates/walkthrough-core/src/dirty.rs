//! Dirty-flagged rebuild lists
//!
//! Clip planes and lights can change many times between two frames; the
//! engine only needs the final list once per tick.

/// A flattened list that is rebuilt at most once per tick
#[derive(Debug, Clone)]
pub struct RebuildList<T> {
    items: Vec<T>,
    dirty: bool,
    rebuilds: usize,
}

impl<T> RebuildList<T> {
    pub fn new() -> Self {
        Self {
            items: Vec::new(),
            dirty: false,
            rebuilds: 0,
        }
    }

    /// Returns true if the list changed since the last flush.
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Marks the list as needing a rebuild.
    pub fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    /// Rebuild if dirty, returning the fresh list; `None` when clean.
    pub fn flush(&mut self, rebuild: impl FnOnce() -> Vec<T>) -> Option<&[T]> {
        if !self.dirty {
            return None;
        }
        self.items = rebuild();
        self.dirty = false;
        self.rebuilds += 1;
        Some(&self.items)
    }

    /// The list as of the last flush
    pub fn items(&self) -> &[T] {
        &self.items
    }

    pub fn rebuilds(&self) -> usize {
        self.rebuilds
    }
}

impl<T> Default for RebuildList<T> {
    fn default() -> Self {
        Self::new()
    }
}
