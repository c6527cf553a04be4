//! Core library for Schemaboard, a table/schema editor.
//!
//! The primary entry point is [`TableEditor`], an editing session for one
//! table backed by a [`PersistenceGateway`]. All field-order mutations go
//! through it (or through a [`FieldListStore`] it owns); commits run through
//! the [`FormCommitPipeline`], which archives the previous version of a table
//! whenever its content changes.
//!
//! Types are re-exported from their respective sub-modules for convenience;
//! consumers should import from the crate root rather than the `core` module.

pub mod core;

// Re-export commonly used types.
#[doc(inline)]
pub use core::{
    change_log::{diff, ChangeLogRecorder, HistorySnapshot, LogEntry, LogOutcome, SnapshotChange},
    commit::{CommitOutcome, CommitTrigger, FormCommitPipeline, LogNotifier, NotificationSink},
    drag::{DragReorderController, DragState, DropTarget},
    editor::TableEditor,
    error::{Result, SchemaboardError},
    field::{new_field_id, Field},
    field_list::{EditedRows, FieldListStore, DEFAULT_NEW_FIELD_PREFIX},
    gateway::PersistenceGateway,
    settings::{
        default_database_path, load_settings, load_settings_from, save_settings, save_settings_to,
        settings_file_path, EditorSettings,
    },
    storage::{SqliteGateway, StoredLogEntry},
    table::{Table, TableMeta, TableRecord},
};
