//! Undo/redo as a list of full document snapshots.
//!
//! Snapshots are the serialized backup form, compared as strings: a commit
//! that produces the same serialization as the current state is not a new
//! history entry.

#[derive(Debug, Clone)]
pub struct History {
    snapshots: Vec<String>,
    cursor: usize,
}

impl History {
    /// A history whose first entry is the current document state.
    pub fn new(initial: String) -> Self {
        Self { snapshots: vec![initial], cursor: 0 }
    }

    /// Record a new state. Entries after the cursor (the redo tail) are
    /// discarded. Returns false when the state is unchanged.
    pub fn record(&mut self, snapshot: String) -> bool {
        if self.snapshots[self.cursor] == snapshot {
            return false;
        }
        self.snapshots.truncate(self.cursor + 1);
        self.snapshots.push(snapshot);
        self.cursor += 1;
        true
    }

    pub fn can_undo(&self) -> bool {
        self.cursor > 0
    }

    pub fn can_redo(&self) -> bool {
        self.cursor + 1 < self.snapshots.len()
    }

    /// Step back and return the snapshot to restore; `None` at the oldest
    /// state.
    pub fn undo(&mut self) -> Option<&str> {
        if !self.can_undo() {
            return None;
        }
        self.cursor -= 1;
        Some(&self.snapshots[self.cursor])
    }

    /// Step forward and return the snapshot to restore; `None` at the
    /// newest state.
    pub fn redo(&mut self) -> Option<&str> {
        if !self.can_redo() {
            return None;
        }
        self.cursor += 1;
        Some(&self.snapshots[self.cursor])
    }

    /// The snapshot at the cursor.
    pub fn current(&self) -> &str {
        &self.snapshots[self.cursor]
    }
}
