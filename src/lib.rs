//! FlowStudio core: folder template trees, the finished-project catalog,
//! and workflow folder materialization.
//!
//! The GUI shell wires its screens to this crate: the folder manager edits
//! template trees through [`StudioDb`], the workflow screen materializes a
//! project through [`WorkflowBuilder`], and the history screen queries the
//! project catalog. Settings are read once into [`WorkflowSettings`] and
//! injected where needed; nothing here re-reads configuration per call.

pub mod db;
pub mod error;
mod migrations;
pub mod settings;
pub mod tree;
pub mod workflow;

pub use db::{DbError, FolderRow, NewProject, ProjectFilter, ProjectRecord, StudioDb};
pub use error::WorkflowError;
pub use settings::WorkflowSettings;
pub use tree::{build_forest, flatten_preorder, FolderNode};
pub use workflow::{CameraEntry, CreatedProject, ProjectRequest, WorkflowBuilder};
