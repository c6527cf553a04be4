//! Turning edited form rows into a saved table record.
//!
//! A commit is all-or-nothing up to the primary save: rows are validated
//! before storage is touched, and a validation failure leaves storage
//! exactly as it was. History is written after the save and can fail on its
//! own without affecting it.

use crate::{
    ChangeLogRecorder, EditedRows, Field, LogOutcome, PersistenceGateway, Result,
    SchemaboardError, TableMeta, TableRecord,
};
use std::collections::HashSet;

/// Receives the outcome of the primary save for display.
pub trait NotificationSink {
    fn notify_success(&self);
    fn notify_failure(&self);
}

/// A sink that only writes to the log; for hosts without a toast layer.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogNotifier;

impl NotificationSink for LogNotifier {
    fn notify_success(&self) {
        log::info!("Save success");
    }

    fn notify_failure(&self) {
        log::error!("Save failed");
    }
}

/// Edge-triggered "please commit" flag owned by the surrounding UI.
///
/// The pipeline clears it after every attempt, successful or not, so a
/// failed commit is never re-fired automatically.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CommitTrigger {
    armed: bool,
}

impl CommitTrigger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn fire(&mut self) {
        self.armed = true;
    }

    pub fn is_armed(&self) -> bool {
        self.armed
    }

    pub fn clear(&mut self) {
        self.armed = false;
    }
}

/// Result of a commit whose primary save succeeded.
#[derive(Debug, Clone, PartialEq)]
pub struct CommitOutcome {
    pub record: TableRecord,
    pub log: LogOutcome,
}

/// Validates edited rows, saves the table, and records history.
#[derive(Debug, Clone, Copy, Default)]
pub struct FormCommitPipeline {
    recorder: ChangeLogRecorder,
}

impl FormCommitPipeline {
    pub fn new() -> Self {
        Self::default()
    }

    /// Checks every row in index order.
    ///
    /// # Errors
    ///
    /// Returns [`SchemaboardError::Validation`] for the first row with an
    /// empty `name` or `type`, or an empty or repeated `id`.
    pub fn validate(rows: &EditedRows) -> Result<()> {
        let mut seen = HashSet::with_capacity(rows.len());
        for (&row_index, field) in rows {
            if let Some(missing) = field.missing_required() {
                return Err(SchemaboardError::Validation { row_index, field: missing });
            }
            if field.id.is_empty() || !seen.insert(field.id.as_str()) {
                return Err(SchemaboardError::Validation { row_index, field: "id" });
            }
        }
        Ok(())
    }

    /// Field sequence in row-index order.
    pub fn build_fields(rows: &EditedRows) -> Vec<Field> {
        rows.values().cloned().collect()
    }

    /// Builds the record to store. Canvas coordinates are not part of it.
    pub fn assemble(
        table_id: &str,
        rows: &EditedRows,
        meta: &TableMeta,
        updated_at: i64,
    ) -> TableRecord {
        TableRecord {
            id: table_id.to_string(),
            name: meta.name.clone(),
            note: meta.note.clone(),
            fields: Self::build_fields(rows),
            relations: meta.relations.clone(),
            layout: meta.layout.clone(),
            updated_at,
        }
    }

    /// Runs one commit attempt and clears `trigger` afterwards.
    ///
    /// Order: validate, read the stored record, save, notify, record history.
    /// `sink` hears about the save exactly once unless validation fails
    /// first, in which case nothing was attempted and nothing is reported.
    ///
    /// # Errors
    ///
    /// Returns [`SchemaboardError::Validation`] without touching storage,
    /// or the gateway error if reading the previous record or saving fails.
    /// A history append failure is not an error; see [`CommitOutcome::log`].
    pub fn commit<G>(
        &self,
        gateway: &mut G,
        sink: &dyn NotificationSink,
        trigger: &mut CommitTrigger,
        table_id: &str,
        rows: &EditedRows,
        meta: &TableMeta,
    ) -> Result<CommitOutcome>
    where
        G: PersistenceGateway + ?Sized,
    {
        let result = self.run(gateway, sink, table_id, rows, meta);
        trigger.clear();
        result
    }

    fn run<G>(
        &self,
        gateway: &mut G,
        sink: &dyn NotificationSink,
        table_id: &str,
        rows: &EditedRows,
        meta: &TableMeta,
    ) -> Result<CommitOutcome>
    where
        G: PersistenceGateway + ?Sized,
    {
        Self::validate(rows)?;

        let previous = match self.recorder.fetch_previous(&*gateway, table_id) {
            Ok(previous) => previous,
            Err(e) => {
                log::error!("could not read table {table_id} before saving: {e}");
                sink.notify_failure();
                return Err(e);
            }
        };

        let record = Self::assemble(table_id, rows, meta, chrono::Utc::now().timestamp_millis());
        if let Err(e) = gateway.put(&record) {
            log::error!("failed to save table {table_id}: {e}");
            sink.notify_failure();
            return Err(e);
        }
        sink.notify_success();
        log::info!("saved table {table_id} with {} field(s)", record.fields.len());

        let history = self
            .recorder
            .record_if_changed(gateway, table_id, previous.as_ref(), &record);
        Ok(CommitOutcome { record, log: history })
    }
}
