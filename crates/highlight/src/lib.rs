//! Keeps a navigation tree's highlighted path in sync with the active item.
//!
//! Host notifications feed a debounced [`UpdateScheduler`]; each pass it runs
//! is a [`SyncEngine::run_pass`] that collapses and scrolls the tree when the
//! user has not just interacted with it, then rebuilds the
//! active/root/intermediate marks from a fresh [`classify`] of the active path.
//!
//! [`UpdateScheduler`]: trailmark_worker::UpdateScheduler

pub mod engine;
pub mod error;
pub mod host;
pub mod interaction;
pub mod memory;
pub mod path;
pub mod plugin;
pub mod resolver;

pub use engine::{PassReport, SyncEngine};
pub use error::{HostError, PassError};
pub use host::{FocusPolicy, FocusTarget, PointerHandler, StyleSink, TreeView, Workspace};
pub use interaction::{DEFAULT_INTERACTION_WINDOW, InteractionTracker};
pub use memory::{MemoryTree, MemoryWorkspace, RecordingStyles};
pub use path::ItemPath;
pub use plugin::{Highlighter, Host};
pub use resolver::{PathClassification, classify};
