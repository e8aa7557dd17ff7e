//! Core document model and interaction logic for the fsmdraw state-machine
//! diagram editor.
//!
//! The crate is headless: it owns the diagram (nodes, links, labels), the
//! interaction state machine that turns pointer/keyboard events into edits,
//! full-snapshot undo/redo, and the backup record used for autosave and
//! import/export. Rendering lives in `fsmdraw-render`; windowing, timers,
//! and file dialogs belong to the embedding host.

pub mod controller;
pub mod geom;
pub mod history;
pub mod input;
pub mod persistence;
pub mod scene;
pub mod shapes;
pub mod storage;
pub mod text;

pub use controller::{Controller, PendingLink};
pub use persistence::{Backup, ImportError};
pub use scene::{Scene, SceneObject};
pub use shapes::{AnyLink, Link, Node, NodeId, SelfLink, StartLink, TemporaryLink};
pub use storage::{FileStorage, MemoryStorage, Storage, StorageError};
