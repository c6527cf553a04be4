//! Internal domain modules for the Schemaboard core library.
//!
//! All public types from these modules are re-exported at the crate root
//! with `#[doc(inline)]`; import from there in preference to this module.

pub mod change_log;
pub mod commit;
pub mod drag;
pub mod editor;
pub mod error;
pub mod field;
pub mod field_list;
pub mod gateway;
pub mod settings;
pub mod storage;
pub mod table;

#[cfg(test)]
pub(crate) mod testing;

#[doc(inline)]
pub use change_log::{ChangeLogRecorder, HistorySnapshot, LogEntry, LogOutcome};
#[doc(inline)]
pub use commit::{CommitTrigger, FormCommitPipeline, NotificationSink};
#[doc(inline)]
pub use drag::{DragReorderController, DropTarget};
#[doc(inline)]
pub use editor::TableEditor;
#[doc(inline)]
pub use error::{Result, SchemaboardError};
#[doc(inline)]
pub use field::Field;
#[doc(inline)]
pub use field_list::{EditedRows, FieldListStore};
#[doc(inline)]
pub use gateway::PersistenceGateway;
#[doc(inline)]
pub use settings::EditorSettings;
#[doc(inline)]
pub use storage::SqliteGateway;
#[doc(inline)]
pub use table::{Table, TableMeta, TableRecord};
