use crate::canvas::Canvas;

/// Most snapshots kept before the oldest is dropped.
pub const MAX_SNAPSHOTS: usize = 25;

/// Bounded undo stack of full canvas snapshots. Snapshots are pushed
/// *before* a mutating commit, so undo is pop-and-restore. There is no
/// redo channel.
pub struct History {
    snapshots: Vec<Canvas>,
}

impl History {
    pub fn new() -> Self {
        Self {
            snapshots: Vec::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }

    pub fn push(&mut self, snapshot: Canvas) {
        self.snapshots.push(snapshot);
        if self.snapshots.len() > MAX_SNAPSHOTS {
            self.snapshots.remove(0);
        }
    }

    pub fn pop(&mut self) -> Option<Canvas> {
        self.snapshots.pop()
    }
}

impl Default for History {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn pop_restores_most_recent_snapshot() {
        let mut history = History::new();
        let mut canvas = Canvas::new(4, 4);
        history.push(canvas.clone());
        canvas.set_pixel(0, 0, (255, 0, 0));
        history.push(canvas.clone());

        let restored = history.pop().unwrap();
        assert_eq!(restored.get_pixel(0, 0), (255, 0, 0));
        let restored = history.pop().unwrap();
        assert_eq!(restored.get_pixel(0, 0), (0, 0, 0));
        assert!(history.pop().is_none());
    }

    #[test]
    fn oldest_snapshot_falls_off_at_the_bound() {
        let mut history = History::new();
        for i in 0..30u8 {
            let mut canvas = Canvas::new(2, 2);
            canvas.set_pixel(0, 0, (i, 0, 0));
            history.push(canvas);
        }
        assert_eq!(history.len(), MAX_SNAPSHOTS);
        // the 25 recoverable states are 5..=29; 0..=4 are gone
        let newest = history.pop().unwrap();
        assert_eq!(newest.get_pixel(0, 0), (29, 0, 0));
        let mut oldest = newest;
        while let Some(s) = history.pop() {
            oldest = s;
        }
        assert_eq!(oldest.get_pixel(0, 0), (5, 0, 0));
    }
}
