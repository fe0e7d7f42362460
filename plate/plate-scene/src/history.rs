//! Bounded linear undo/redo history of transform edits.

use std::collections::VecDeque;

use crate::object::ObjectId;
use crate::transform::Transform;

/// Default number of entries kept.
pub const DEFAULT_MAX_DEPTH: usize = 50;

/// One recorded transform edit. Immutable once pushed.
#[derive(Debug, Clone, PartialEq)]
pub struct UndoEntry {
    /// Object the edit applied to.
    pub object_id: ObjectId,
    /// Human-readable label, e.g. `"Mirror X"`.
    pub label: String,
    /// Transform before the edit.
    pub before: Transform,
    /// Transform after the edit.
    pub after: Transform,
}

/// Linear undo/redo history with a cursor.
///
/// Entries before the cursor can be undone, entries at or after it redone.
/// Pushing discards everything after the cursor. Once more than `max_depth`
/// entries are held, the oldest is dropped.
///
/// # Example
///
/// ```
/// use plate_scene::{Transform, UndoRedoManager};
/// # use plate_scene::SceneManager;
/// # use plate_mesh::{IndexedMesh, Point3};
/// # let mut scene = SceneManager::new();
/// # let id = scene.add("part", IndexedMesh::cuboid(Point3::origin(), Point3::new(1.0, 1.0, 1.0)), None);
///
/// let mut history = UndoRedoManager::with_max_depth(2);
/// for label in ["a", "b", "c"] {
///     history.push(id, label, Transform::identity(), Transform::identity());
/// }
/// assert_eq!(history.len(), 2);
/// assert_eq!(history.undo().map(|e| e.label), Some("c".to_string()));
/// ```
#[derive(Debug, Clone)]
pub struct UndoRedoManager {
    entries: VecDeque<UndoEntry>,
    cursor: usize,
    max_depth: usize,
}

impl Default for UndoRedoManager {
    fn default() -> Self {
        Self::with_max_depth(DEFAULT_MAX_DEPTH)
    }
}

impl UndoRedoManager {
    /// Create an empty history with the default depth.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty history holding at most `max_depth` entries (minimum 1).
    #[must_use]
    pub fn with_max_depth(max_depth: usize) -> Self {
        Self {
            entries: VecDeque::new(),
            cursor: 0,
            max_depth: max_depth.max(1),
        }
    }

    /// Maximum number of entries kept.
    #[must_use]
    pub const fn max_depth(&self) -> usize {
        self.max_depth
    }

    /// Record an edit, truncating any redo history.
    pub fn push(
        &mut self,
        object_id: ObjectId,
        label: impl Into<String>,
        before: Transform,
        after: Transform,
    ) {
        self.entries.truncate(self.cursor);
        self.entries.push_back(UndoEntry {
            object_id,
            label: label.into(),
            before,
            after,
        });
        while self.entries.len() > self.max_depth {
            self.entries.pop_front();
        }
        self.cursor = self.entries.len();
    }

    /// Step back, returning the entry to revert.
    pub fn undo(&mut self) -> Option<UndoEntry> {
        if self.cursor == 0 {
            return None;
        }
        self.cursor -= 1;
        self.entries.get(self.cursor).cloned()
    }

    /// Step forward, returning the entry to reapply.
    pub fn redo(&mut self) -> Option<UndoEntry> {
        let entry = self.entries.get(self.cursor).cloned()?;
        self.cursor += 1;
        Some(entry)
    }

    /// True if there is something to undo.
    #[must_use]
    pub const fn can_undo(&self) -> bool {
        self.cursor > 0
    }

    /// True if there is something to redo.
    #[must_use]
    pub fn can_redo(&self) -> bool {
        self.cursor < self.entries.len()
    }

    /// Label of the entry [`undo`](Self::undo) would revert.
    #[must_use]
    pub fn undo_label(&self) -> Option<&str> {
        let index = self.cursor.checked_sub(1)?;
        self.entries.get(index).map(|e| e.label.as_str())
    }

    /// Label of the entry [`redo`](Self::redo) would reapply.
    #[must_use]
    pub fn redo_label(&self) -> Option<&str> {
        self.entries.get(self.cursor).map(|e| e.label.as_str())
    }

    /// Drop all entries.
    pub fn clear(&mut self) {
        self.entries.clear();
        self.cursor = 0;
    }

    /// Drop every entry that refers to `object_id`.
    pub(crate) fn forget(&mut self, object_id: ObjectId) {
        let before_cursor = self
            .entries
            .iter()
            .take(self.cursor)
            .filter(|e| e.object_id == object_id)
            .count();
        self.entries.retain(|e| e.object_id != object_id);
        self.cursor -= before_cursor;
    }

    /// Number of entries held.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True if no entries are held.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
