mod snapshot;

pub use snapshot::Snapshot;

use crate::error::SnapshotError;
use crate::surface::Surface;

/// A linear list of full-surface snapshots with a cursor.
///
/// The cursor is `None` exactly when the list is empty; otherwise it is a
/// valid index. Committing while the cursor is behind the end drops every
/// snapshot after it, so a new stroke invalidates redo.
#[derive(Debug, Default)]
pub struct History {
    snapshots: Vec<Snapshot>,
    cursor: Option<usize>,
}

impl History {
    /// Creates a new empty history
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }

    pub fn cursor(&self) -> Option<usize> {
        self.cursor
    }

    /// The snapshot the cursor points at
    pub fn current(&self) -> Option<&Snapshot> {
        self.cursor.and_then(|i| self.snapshots.get(i))
    }

    pub fn get(&self, index: usize) -> Option<&Snapshot> {
        self.snapshots.get(index)
    }

    /// Encodes `surface` and records it as the newest entry.
    /// Returns the new cursor.
    pub fn commit(&mut self, surface: &Surface) -> Result<usize, SnapshotError> {
        let snapshot = Snapshot::capture(surface)?;
        Ok(self.push(snapshot))
    }

    /// Truncates after the cursor, appends and moves the cursor to the end
    pub fn push(&mut self, snapshot: Snapshot) -> usize {
        let keep = self.cursor.map_or(0, |c| c + 1);
        if keep < self.snapshots.len() {
            log::debug!(
                "Discarding {} redo snapshot(s)",
                self.snapshots.len() - keep
            );
            self.snapshots.truncate(keep);
        }
        self.snapshots.push(snapshot);
        let cursor = self.snapshots.len() - 1;
        self.cursor = Some(cursor);
        cursor
    }

    /// Returns true if the cursor can move back
    pub fn can_undo(&self) -> bool {
        self.cursor.is_some_and(|c| c > 0)
    }

    /// Returns true if the cursor can move forward
    pub fn can_redo(&self) -> bool {
        self.cursor.is_some_and(|c| c + 1 < self.snapshots.len())
    }

    /// Moves the cursor back one entry and returns the snapshot now under it
    pub fn undo(&mut self) -> Option<&Snapshot> {
        if !self.can_undo() {
            return None;
        }
        let cursor = self.cursor? - 1;
        self.cursor = Some(cursor);
        self.snapshots.get(cursor)
    }

    /// Moves the cursor forward one entry and returns the snapshot now under it
    pub fn redo(&mut self) -> Option<&Snapshot> {
        if !self.can_redo() {
            return None;
        }
        let cursor = self.cursor? + 1;
        self.cursor = Some(cursor);
        self.snapshots.get(cursor)
    }
}
