//! PrintDesk Core Library
//!
//! Design object model, immutable design snapshots, the mutation engine and
//! the undo/redo history behind the PrintDesk design tool.

pub mod config;
pub mod editor;
pub mod history;
pub mod model;
pub mod reducer;
pub mod state;
pub mod storage;

pub use config::{ConfigError, EditorConfig};
pub use editor::{Dispatch, Editor, EditorError};
pub use history::{DEFAULT_HISTORY_LIMIT, History};
pub use model::{DesignObject, GroupId, ObjectId, ObjectKind, ObjectPatch, RgbaColor};
pub use reducer::{Action, NoOp, Placement, Reduced, reduce};
pub use state::{DesignError, DesignState};
pub use storage::{FileStorage, MemoryStorage, Storage, StorageError};
