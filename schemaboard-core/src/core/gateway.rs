//! Storage seam consumed by the commit pipeline and the change-log recorder.

use crate::{LogEntry, Result, TableRecord};

/// Durable storage for table records and their change log.
///
/// Implementations own connection lifecycle; the core only borrows an
/// instance for the duration of a commit and performs one attempt per call.
pub trait PersistenceGateway {
    /// Fetches the current record for `id`.
    ///
    /// # Errors
    ///
    /// Returns [`crate::SchemaboardError::TableNotFound`] when no record
    /// exists. Must reflect the most recent completed [`put`](Self::put).
    fn get(&self, id: &str) -> Result<TableRecord>;

    /// Stores `table`, fully replacing any record with the same id.
    fn put(&mut self, table: &TableRecord) -> Result<()>;

    /// Appends `entry` to the change log of `entry.table_id`.
    fn append_log(&mut self, entry: &LogEntry) -> Result<()>;
}
