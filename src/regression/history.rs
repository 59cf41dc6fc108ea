//! Linear undo/redo over full snapshots
//!
//! History is `[S0, S1, ..., Sk]` with a cursor `c` in `0..=k`. Pushing after
//! an undo drops everything past the cursor.

#[derive(Debug, Clone)]
pub struct HistoryLog<T> {
    snapshots: Vec<T>,
    cursor: usize,
}

impl<T: Clone + Default> Default for HistoryLog<T> {
    fn default() -> Self {
        Self::new(T::default())
    }
}

impl<T: Clone> HistoryLog<T> {
    /// Start with a single initial snapshot
    pub fn new(initial: T) -> Self {
        Self {
            snapshots: vec![initial],
            cursor: 0,
        }
    }

    /// Record a new state, discarding any redo future
    pub fn push(&mut self, snapshot: T) {
        self.snapshots.truncate(self.cursor + 1);
        self.snapshots.push(snapshot);
        self.cursor += 1;
        tracing::debug!(cursor = self.cursor, len = self.snapshots.len(), "history push");
    }

    /// Step back; `None` at the oldest snapshot
    pub fn undo(&mut self) -> Option<&T> {
        if self.cursor == 0 {
            return None;
        }
        self.cursor -= 1;
        tracing::debug!(cursor = self.cursor, "history undo");
        self.snapshots.get(self.cursor)
    }

    /// Step forward; `None` at the newest snapshot
    pub fn redo(&mut self) -> Option<&T> {
        if self.cursor + 1 >= self.snapshots.len() {
            return None;
        }
        self.cursor += 1;
        tracing::debug!(cursor = self.cursor, "history redo");
        self.snapshots.get(self.cursor)
    }

    pub fn current(&self) -> &T {
        &self.snapshots[self.cursor]
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }

    pub fn can_undo(&self) -> bool {
        self.cursor > 0
    }

    pub fn can_redo(&self) -> bool {
        self.cursor + 1 < self.snapshots.len()
    }
}
