//! Core logic of the family tree viewer/editor.
//! Storage, diagram synthesis, viewport and editor state live here; UI shells
//! only forward events and paint surfaces.

pub mod config;
pub mod db;
pub mod editor;
pub mod graph;
pub mod logging;
pub mod model;
pub mod render;
pub mod repo;
pub mod service;
pub mod viewport;

pub use config::{AppConfig, ConfigError};
pub use editor::{Editor, EditorError, EditorEvent, EditorMode, FormField, PersonForm};
pub use graph::sanitize::{node_token, sanitize_text, PairKey};
pub use graph::{
    synthesize, synthesize_with, synthesize_with_report, ChartOptions, Direction, Synthesis,
    SynthesisReport,
};
pub use logging::{default_log_level, init_logging, init_logging_from_config, logging_status};
pub use model::family::{index_people, people_from_json, sample_people, PersonMap};
pub use model::person::{Person, PersonDraft, PersonId, PersonValidationError};
pub use render::{DiagramRenderer, HtmlPage, HtmlPageRenderer, RenderError};
pub use repo::memory_repo::InMemoryPersonStore;
pub use repo::person_repo::{PersonStore, RepoError, RepoResult, SqlitePersonRepository};
pub use service::family_service::FamilyTreeService;
pub use service::tree_view::TreeView;
pub use viewport::controller::ViewportController;
pub use viewport::storage::{
    FileViewportStorage, MemoryViewportStorage, StorageError, ViewportStorage,
};
pub use viewport::{
    reduce, Rect, TransformMode, ViewState, Viewport, ViewportConfig, ViewportEvent,
};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::core_version;

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}
