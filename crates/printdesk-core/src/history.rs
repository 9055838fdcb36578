//! Undo/redo history over design snapshots.

use crate::state::DesignState;
use std::collections::VecDeque;

/// Default maximum number of undo states to keep.
pub const DEFAULT_HISTORY_LIMIT: usize = 100;

/// Past/present/future triple of design snapshots.
///
/// `past` is ordered oldest first and `future` nearest redo first. Any
/// commit clears `future`. A gesture (drag, scale, rotate) can update
/// `present` through [`History::preview`] without creating entries; closing
/// it records the whole gesture as one step.
#[derive(Debug, Clone)]
pub struct History {
    past: VecDeque<DesignState>,
    present: DesignState,
    future: VecDeque<DesignState>,
    /// Maximum length of `past`; 0 means unbounded.
    limit: usize,
    /// Bumped whenever `present` changes.
    version: u64,
    /// State before the open gesture, if one is open.
    gesture_base: Option<DesignState>,
}

impl Default for History {
    fn default() -> Self {
        Self::new(DesignState::default())
    }
}

impl History {
    pub fn new(present: DesignState) -> Self {
        Self::with_limit(present, DEFAULT_HISTORY_LIMIT)
    }

    pub fn with_limit(present: DesignState, limit: usize) -> Self {
        Self {
            past: VecDeque::new(),
            present,
            future: VecDeque::new(),
            limit,
            version: 0,
            gesture_base: None,
        }
    }

    pub fn present(&self) -> &DesignState {
        &self.present
    }

    /// Snapshots available to undo, oldest first.
    pub fn past(&self) -> &VecDeque<DesignState> {
        &self.past
    }

    /// Snapshots available to redo, nearest first.
    pub fn future(&self) -> &VecDeque<DesignState> {
        &self.future
    }

    pub fn limit(&self) -> usize {
        self.limit
    }

    /// Change the history limit, evicting the oldest entries if needed.
    pub fn set_limit(&mut self, limit: usize) {
        self.limit = limit;
        self.evict();
    }

    pub fn version(&self) -> u64 {
        self.version
    }

    pub fn can_undo(&self) -> bool {
        !self.past.is_empty() || self.gesture_changed()
    }

    pub fn can_redo(&self) -> bool {
        !self.future.is_empty()
    }

    /// Record `next` as the new present.
    ///
    /// Returns false (and records nothing) when `next` equals the present.
    pub fn commit(&mut self, next: DesignState) -> bool {
        self.end_gesture();
        if next == self.present {
            return false;
        }
        let previous = std::mem::replace(&mut self.present, next);
        self.push_past(previous);
        self.future.clear();
        self.version += 1;
        true
    }

    /// Undo the last change.
    /// Returns true if undo was performed, false if nothing to undo.
    pub fn undo(&mut self) -> bool {
        self.end_gesture();
        let Some(previous) = self.past.pop_back() else {
            return false;
        };
        let current = std::mem::replace(&mut self.present, previous);
        self.future.push_front(current);
        self.version += 1;
        true
    }

    /// Redo the last undone change.
    /// Returns true if redo was performed, false if nothing to redo.
    pub fn redo(&mut self) -> bool {
        self.end_gesture();
        let Some(next) = self.future.pop_front() else {
            return false;
        };
        let current = std::mem::replace(&mut self.present, next);
        self.push_past(current);
        self.version += 1;
        true
    }

    /// Start a gesture at the current present. No-op if one is open.
    pub fn begin_gesture(&mut self) {
        if self.gesture_base.is_none() {
            self.gesture_base = Some(self.present.clone());
        }
    }

    pub fn is_gesture_active(&self) -> bool {
        self.gesture_base.is_some()
    }

    /// Replace the present without recording history, opening a gesture if
    /// none is open. Returns true if the present changed.
    pub fn preview(&mut self, next: DesignState) -> bool {
        self.begin_gesture();
        if next == self.present {
            return false;
        }
        self.present = next;
        self.version += 1;
        true
    }

    /// Close the open gesture, recording it as a single history entry when
    /// it changed anything. Returns true if an entry was recorded.
    pub fn end_gesture(&mut self) -> bool {
        let Some(base) = self.gesture_base.take() else {
            return false;
        };
        if base == self.present {
            return false;
        }
        self.push_past(base);
        self.future.clear();
        true
    }

    /// Abandon the open gesture and restore the state it started from.
    pub fn cancel_gesture(&mut self) {
        if let Some(base) = self.gesture_base.take() {
            if base != self.present {
                self.present = base;
                self.version += 1;
            }
        }
    }

    fn gesture_changed(&self) -> bool {
        self.gesture_base
            .as_ref()
            .is_some_and(|base| *base != self.present)
    }

    fn push_past(&mut self, state: DesignState) {
        self.past.push_back(state);
        self.evict();
    }

    fn evict(&mut self) {
        if self.limit == 0 {
            return;
        }
        while self.past.len() > self.limit {
            self.past.pop_front();
        }
    }
}
