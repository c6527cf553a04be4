//! Append-only history of table contents.
//!
//! Each save compares the record that was in storage with the one replacing
//! it. Only when the history-relevant content (name, fields, relations)
//! differs is the *previous* version archived as a [`LogEntry`].

use crate::{Field, PersistenceGateway, Result, SchemaboardError, TableRecord};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// The part of a table that history tracks.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistorySnapshot {
    pub name: String,
    pub fields: Vec<Field>,
    pub relations: Value,
}

impl From<&TableRecord> for HistorySnapshot {
    fn from(record: &TableRecord) -> Self {
        Self {
            name: record.name.clone(),
            fields: record.fields.clone(),
            relations: record.relations.clone(),
        }
    }
}

/// An archived previous version of a table. Never modified once written.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LogEntry {
    pub table_id: String,
    /// `updatedAt` of the version being archived, not of the new save.
    pub updated_at: i64,
    #[serde(flatten)]
    pub snapshot: HistorySnapshot,
}

/// One detected difference between two snapshots.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SnapshotChange {
    Renamed,
    FieldCountChanged { from: usize, to: usize },
    FieldChanged { index: usize },
    RelationsChanged,
}

/// What [`ChangeLogRecorder::record_if_changed`] did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LogOutcome {
    /// A previous version was archived.
    Appended,
    /// Content was identical; nothing written.
    Unchanged,
    /// First save of this table; nothing to archive.
    NoPrevious,
    /// The append failed. The primary save is unaffected.
    Failed(String),
}

/// Compares `previous` and `next` on name, fields, and relations.
///
/// Fields are compared by count first, then attribute-by-attribute at each
/// index both sides share.
pub fn diff(previous: &HistorySnapshot, next: &HistorySnapshot) -> Vec<SnapshotChange> {
    let mut changes = Vec::new();
    if previous.name != next.name {
        changes.push(SnapshotChange::Renamed);
    }
    if previous.fields.len() != next.fields.len() {
        changes.push(SnapshotChange::FieldCountChanged {
            from: previous.fields.len(),
            to: next.fields.len(),
        });
    }
    for (index, (a, b)) in previous.fields.iter().zip(&next.fields).enumerate() {
        if !same_field(a, b) {
            changes.push(SnapshotChange::FieldChanged { index });
        }
    }
    if previous.relations != next.relations {
        changes.push(SnapshotChange::RelationsChanged);
    }
    changes
}

fn same_field(a: &Field, b: &Field) -> bool {
    a.id == b.id
        && a.name == b.name
        && a.field_type == b.field_type
        && a.note == b.note
        && a.default_value == b.default_value
        && a.primary_key == b.primary_key
        && a.unique == b.unique
        && a.not_null == b.not_null
        && a.auto_increment == b.auto_increment
}

/// Writes history entries through a [`PersistenceGateway`].
#[derive(Debug, Clone, Copy, Default)]
pub struct ChangeLogRecorder;

impl ChangeLogRecorder {
    pub fn new() -> Self {
        Self
    }

    /// Reads the stored record for `table_id` straight from the gateway.
    ///
    /// A missing record is `Ok(None)`: the first save of a table has nothing
    /// to archive.
    ///
    /// # Errors
    ///
    /// Propagates any gateway failure other than
    /// [`SchemaboardError::TableNotFound`].
    pub fn fetch_previous<G>(&self, gateway: &G, table_id: &str) -> Result<Option<TableRecord>>
    where
        G: PersistenceGateway + ?Sized,
    {
        match gateway.get(table_id) {
            Ok(record) => Ok(Some(record)),
            Err(SchemaboardError::TableNotFound(_)) => Ok(None),
            Err(e) => Err(e),
        }
    }

    /// Archives `previous` if its content differs from `next`.
    ///
    /// Never returns an error: an append failure is logged and reported as
    /// [`LogOutcome::Failed`] so it cannot undo the save that preceded it.
    pub fn record_if_changed<G>(
        &self,
        gateway: &mut G,
        table_id: &str,
        previous: Option<&TableRecord>,
        next: &TableRecord,
    ) -> LogOutcome
    where
        G: PersistenceGateway + ?Sized,
    {
        let Some(previous) = previous else {
            return LogOutcome::NoPrevious;
        };

        let before = HistorySnapshot::from(previous);
        let changes = diff(&before, &HistorySnapshot::from(next));
        if changes.is_empty() {
            return LogOutcome::Unchanged;
        }
        log::debug!("table {table_id}: {} change(s) since last save: {changes:?}", changes.len());

        let entry = LogEntry {
            table_id: table_id.to_string(),
            updated_at: previous.updated_at,
            snapshot: before,
        };
        match gateway.append_log(&entry) {
            Ok(()) => LogOutcome::Appended,
            Err(e) => {
                log::warn!("failed to append change log for table {table_id}: {e}");
                LogOutcome::Failed(e.to_string())
            }
        }
    }
}
