use crate::snapshot::{CustomizationSnapshot, Edit};

/// Linear undo/redo over full snapshots.
///
/// Invariant: `entries` is never empty and `cursor < entries.len()`. The entry at
/// `cursor` is the one applied to the preview.
#[derive(Debug, Clone)]
pub struct History {
    entries: Vec<CustomizationSnapshot>,
    cursor: usize,
    limit: Option<usize>,
}

impl Default for History {
    fn default() -> Self {
        Self::new(CustomizationSnapshot::default())
    }
}

impl History {
    pub fn new(initial: CustomizationSnapshot) -> Self {
        Self {
            entries: vec![initial],
            cursor: 0,
            limit: None,
        }
    }

    /// Keep at most `limit` snapshots, dropping the oldest ones first.
    pub fn with_limit(mut self, limit: Option<usize>) -> Self {
        self.limit = limit.map(|l| l.max(1));
        self.enforce_limit();
        self
    }

    pub fn current(&self) -> &CustomizationSnapshot {
        &self.entries[self.cursor]
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Apply `edit` on top of the current snapshot, discarding any redo entries.
    pub fn update(&mut self, edit: Edit) {
        let next = self.current().with_edit(edit);
        self.push(next);
    }

    /// Push a whole snapshot as the new current entry, discarding any redo entries.
    pub fn push(&mut self, snapshot: CustomizationSnapshot) {
        self.entries.truncate(self.cursor + 1);
        self.entries.push(snapshot);
        self.cursor = self.entries.len() - 1;
        self.enforce_limit();
    }

    /// Step back one entry. Returns false when already at the oldest entry.
    pub fn undo(&mut self) -> bool {
        if self.cursor == 0 {
            return false;
        }
        self.cursor -= 1;
        true
    }

    /// Step forward one entry. Returns false when there is nothing to redo.
    pub fn redo(&mut self) -> bool {
        if self.cursor + 1 >= self.entries.len() {
            return false;
        }
        self.cursor += 1;
        true
    }

    pub fn can_undo(&self) -> bool {
        self.cursor > 0
    }

    pub fn can_redo(&self) -> bool {
        self.cursor + 1 < self.entries.len()
    }

    fn enforce_limit(&mut self) {
        let Some(limit) = self.limit else {
            return;
        };
        if self.entries.len() > limit {
            let excess = self.entries.len() - limit;
            self.entries.drain(..excess);
            self.cursor = self.cursor.saturating_sub(excess);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::palette::ColorKey;
    use pretty_assertions::assert_eq;

    fn color(value: &str) -> Edit {
        Edit::Color(ColorKey::Primary, value.to_string())
    }

    #[test]
    fn test_new_history_has_single_empty_entry() {
        let history = History::default();
        assert_eq!(history.len(), 1);
        assert_eq!(history.cursor(), 0);
        assert!(history.current().is_empty());
        assert!(!history.can_undo());
        assert!(!history.can_redo());
    }

    #[test]
    fn test_undo_redo_inverse() {
        let mut history = History::default();
        history.update(color("#111111"));
        history.update(color("#222222"));
        let before = history.current().clone();

        assert!(history.undo());
        assert_eq!(history.current().color(ColorKey::Primary), Some("#111111"));
        assert!(history.redo());
        assert_eq!(history.current(), &before);
    }

    #[test]
    fn test_undo_and_redo_stop_at_bounds() {
        let mut history = History::default();
        history.update(color("#111111"));

        assert!(history.undo());
        assert!(!history.undo());
        assert_eq!(history.cursor(), 0);

        assert!(history.redo());
        assert!(!history.redo());
        assert_eq!(history.cursor(), 1);
    }

    #[test]
    fn test_update_after_undo_truncates_future() {
        let mut history = History::default();
        history.update(color("#111111"));
        history.update(color("#222222"));
        history.undo();
        history.update(color("#333333"));

        assert_eq!(history.len(), 3);
        assert!(!history.redo());
        assert_eq!(history.current().color(ColorKey::Primary), Some("#333333"));
        history.undo();
        assert_eq!(history.current().color(ColorKey::Primary), Some("#111111"));
    }

    #[test]
    fn test_limit_drops_oldest_entries() {
        let mut history = History::default().with_limit(Some(3));
        for value in ["#111111", "#222222", "#333333", "#444444"] {
            history.update(color(value));
        }

        assert_eq!(history.len(), 3);
        assert_eq!(history.cursor(), 2);
        assert!(history.undo());
        assert!(history.undo());
        assert!(!history.undo());
        assert_eq!(history.current().color(ColorKey::Primary), Some("#222222"));
    }
}
