//! Editing session store.
//!
//! An [`Editor`] is owned by one design session and handed to the UI layer
//! by reference. It runs every action through the reducer and records the
//! result in its [`History`].

use crate::config::EditorConfig;
use crate::history::History;
use crate::reducer::{Action, NoOp, Reduced, reduce_with_offset};
use crate::state::{DesignError, DesignState};
use crate::storage::{Storage, StorageError};
use kurbo::Vec2;
use thiserror::Error;

/// Errors from session-level persistence.
#[derive(Debug, Error)]
pub enum EditorError {
    #[error(transparent)]
    Storage(#[from] StorageError),
    #[error("Rejected design: {0}")]
    Invalid(#[from] DesignError),
}

/// What a dispatched action did to the session.
#[derive(Debug, Clone, PartialEq)]
pub enum Dispatch {
    /// The design changed and a history entry was recorded.
    Committed,
    /// The design changed as part of an open gesture; no entry yet.
    Previewed,
    /// Nothing changed.
    Ignored(NoOp),
}

impl Dispatch {
    pub fn changed(&self) -> bool {
        !matches!(self, Dispatch::Ignored(_))
    }
}

/// The design session: history plus configuration.
#[derive(Debug, Clone)]
pub struct Editor {
    history: History,
    config: EditorConfig,
}

impl Default for Editor {
    fn default() -> Self {
        Self::new(EditorConfig::default())
    }
}

impl Editor {
    /// Start a session from an empty design.
    pub fn new(config: EditorConfig) -> Self {
        Self::with_state(DesignState::default(), config)
    }

    /// Start a session from an existing design.
    pub fn with_state(state: DesignState, config: EditorConfig) -> Self {
        Self {
            history: History::with_limit(state, config.history_limit),
            config,
        }
    }

    pub fn present(&self) -> &DesignState {
        self.history.present()
    }

    pub fn history(&self) -> &History {
        &self.history
    }

    pub fn config(&self) -> &EditorConfig {
        &self.config
    }

    /// Monotonic counter of present-state changes.
    pub fn version(&self) -> u64 {
        self.history.version()
    }

    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    fn reduce(&self, action: &Action) -> Reduced {
        let offset = self.config.duplicate_offset;
        reduce_with_offset(self.present(), action, Vec2::new(offset, offset))
    }

    /// Apply an action and record it as one undo step.
    pub fn dispatch(&mut self, action: &Action) -> Dispatch {
        match self.reduce(action) {
            Reduced::Changed(next) => {
                if self.history.commit(next) {
                    Dispatch::Committed
                } else {
                    Dispatch::Ignored(NoOp::NoEffect)
                }
            }
            Reduced::Unchanged(reason) => {
                // An open gesture still ends here, as any commit would end it.
                if self.history.end_gesture() {
                    log::debug!("{} closed the open gesture", action.name());
                }
                Dispatch::Ignored(reason)
            }
        }
    }

    /// Apply an intermediate step of an interactive gesture.
    ///
    /// With gesture coalescing on, the change is visible immediately but is
    /// recorded only when [`Editor::end_gesture`] is called. With it off,
    /// this behaves like [`Editor::dispatch`].
    pub fn preview(&mut self, action: &Action) -> Dispatch {
        if !self.config.coalesce_gestures {
            return self.dispatch(action);
        }
        match self.reduce(action) {
            Reduced::Changed(next) => {
                self.history.preview(next);
                Dispatch::Previewed
            }
            Reduced::Unchanged(reason) => Dispatch::Ignored(reason),
        }
    }

    pub fn begin_gesture(&mut self) {
        if self.config.coalesce_gestures {
            self.history.begin_gesture();
        }
    }

    /// Finish the open gesture. Returns true if it recorded an undo step.
    pub fn end_gesture(&mut self) -> bool {
        self.history.end_gesture()
    }

    pub fn cancel_gesture(&mut self) {
        self.history.cancel_gesture();
    }

    pub fn is_gesture_active(&self) -> bool {
        self.history.is_gesture_active()
    }

    pub fn undo(&mut self) -> bool {
        self.history.undo()
    }

    pub fn redo(&mut self) -> bool {
        self.history.redo()
    }

    /// Validate `state` and replace the design with it.
    pub fn load_design(&mut self, state: DesignState) -> Result<Dispatch, DesignError> {
        state.validate()?;
        Ok(self.dispatch(&Action::LoadDesign { state }))
    }

    /// Save the present design under `key`.
    pub async fn save_to(&self, storage: &dyn Storage, key: &str) -> Result<(), EditorError> {
        storage.save(key, self.present()).await?;
        log::info!("Saved design '{}' as {}", self.present().name, key);
        Ok(())
    }

    /// Load the design saved under `key` as a new undoable step.
    pub async fn load_from(
        &mut self,
        storage: &dyn Storage,
        key: &str,
    ) -> Result<Dispatch, EditorError> {
        let state = storage.load(key).await?;
        let dispatch = self.load_design(state)?;
        log::info!("Loaded design {} ({} objects)", key, self.present().len());
        Ok(dispatch)
    }
}
