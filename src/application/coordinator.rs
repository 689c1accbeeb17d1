use serde::{Deserialize, Serialize};

/// A brush drag reported by the UI, in index space
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectionEvent {
    pub start: i64,
    pub end: i64,
}

impl SelectionEvent {
    pub fn new(start: i64, end: i64) -> Self {
        Self { start, end }
    }
}

/// Pending selection events in arrival order.
///
/// Rapid drags can produce many events between two frames; the session drains
/// them all at once and publishes a single viewport change.
#[derive(Debug, Clone, Default)]
pub struct SelectionQueue {
    pending: Vec<SelectionEvent>,
}

impl SelectionQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue an event; an exact replay of the newest pending event is dropped
    pub fn push(&mut self, event: SelectionEvent) {
        if self.pending.last() != Some(&event) {
            self.pending.push(event);
        }
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    pub fn clear(&mut self) {
        self.pending.clear();
    }

    pub fn drain(&mut self) -> Vec<SelectionEvent> {
        std::mem::take(&mut self.pending)
    }
}
