//! SQLite-backed [`PersistenceGateway`].

use crate::{
    HistorySnapshot, LogEntry, PersistenceGateway, Result, SchemaboardError, TableRecord,
};
use rusqlite::{Connection, OptionalExtension};
use std::path::Path;

/// Version written to `editor_meta` when a database is created.
const SCHEMA_VERSION: &str = "1";

/// A change-log entry together with its insertion sequence number.
#[derive(Debug, Clone, PartialEq)]
pub struct StoredLogEntry {
    pub seq: i64,
    pub entry: LogEntry,
}

/// Table records and their history in one SQLite file.
pub struct SqliteGateway {
    conn: Connection,
}

type TableRow = (String, String, String, String, String, String, i64);

impl SqliteGateway {
    /// Creates (or initialises) a database at `path`.
    ///
    /// # Errors
    ///
    /// Returns [`SchemaboardError::Database`] for any SQLite failure.
    pub fn create<P: AsRef<Path>>(path: P) -> Result<Self> {
        let conn = Connection::open(path)?;
        conn.execute_batch(include_str!("schema.sql"))?;
        conn.execute(
            "INSERT OR IGNORE INTO editor_meta (key, value) VALUES ('schema_version', ?)",
            [SCHEMA_VERSION],
        )?;
        Ok(Self { conn })
    }

    /// Opens an existing database and checks that it has the expected tables.
    ///
    /// # Errors
    ///
    /// Returns [`SchemaboardError::InvalidDatabase`] if the file is not a
    /// Schemaboard database, or [`SchemaboardError::Database`] if SQLite
    /// cannot read it at all.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let conn = Connection::open(path)?;

        let table_count: i64 = conn.query_row(
            "SELECT COUNT(*) FROM sqlite_master
             WHERE type='table'
             AND name IN ('tables', 'table_logs', 'editor_meta')",
            [],
            |row| row.get(0),
        )?;

        if table_count != 3 {
            return Err(SchemaboardError::InvalidDatabase(
                "Not a valid Schemaboard database".to_string(),
            ));
        }

        Ok(Self { conn })
    }

    pub fn connection(&self) -> &Connection {
        &self.conn
    }

    /// The stored schema version, if the meta row exists.
    pub fn schema_version(&self) -> Result<Option<String>> {
        Ok(self
            .conn
            .query_row(
                "SELECT value FROM editor_meta WHERE key = 'schema_version'",
                [],
                |row| row.get(0),
            )
            .optional()?)
    }

    /// All archived versions of `table_id`, oldest first.
    pub fn history(&self, table_id: &str) -> Result<Vec<StoredLogEntry>> {
        let mut stmt = self.conn.prepare(
            "SELECT seq, updated_at, name, fields_json, relations_json
             FROM table_logs WHERE table_id = ?1 ORDER BY seq ASC",
        )?;
        let rows = stmt
            .query_map([table_id], |row| {
                Ok((
                    row.get::<_, i64>(0)?,
                    row.get::<_, i64>(1)?,
                    row.get::<_, String>(2)?,
                    row.get::<_, String>(3)?,
                    row.get::<_, String>(4)?,
                ))
            })?
            .collect::<rusqlite::Result<Vec<_>>>()?;

        rows.into_iter()
            .map(|(seq, updated_at, name, fields_json, relations_json)| -> Result<StoredLogEntry> {
                Ok(StoredLogEntry {
                    seq,
                    entry: LogEntry {
                        table_id: table_id.to_string(),
                        updated_at,
                        snapshot: HistorySnapshot {
                            name,
                            fields: serde_json::from_str(&fields_json)?,
                            relations: serde_json::from_str(&relations_json)?,
                        },
                    },
                })
            })
            .collect()
    }
}

impl PersistenceGateway for SqliteGateway {
    fn get(&self, id: &str) -> Result<TableRecord> {
        let row: Option<TableRow> = self
            .conn
            .query_row(
                "SELECT id, name, note, fields_json, relations_json, box_json, updated_at
                 FROM tables WHERE id = ?1",
                [id],
                |row| {
                    Ok((
                        row.get(0)?,
                        row.get(1)?,
                        row.get(2)?,
                        row.get(3)?,
                        row.get(4)?,
                        row.get(5)?,
                        row.get(6)?,
                    ))
                },
            )
            .optional()?;

        let Some((id, name, note, fields_json, relations_json, box_json, updated_at)) = row else {
            return Err(SchemaboardError::TableNotFound(id.to_string()));
        };
        Ok(TableRecord {
            id,
            name,
            note,
            fields: serde_json::from_str(&fields_json)?,
            relations: serde_json::from_str(&relations_json)?,
            layout: serde_json::from_str(&box_json)?,
            updated_at,
        })
    }

    fn put(&mut self, table: &TableRecord) -> Result<()> {
        self.conn.execute(
            "INSERT INTO tables (id, name, note, fields_json, relations_json, box_json, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
             ON CONFLICT(id) DO UPDATE SET
                name = excluded.name,
                note = excluded.note,
                fields_json = excluded.fields_json,
                relations_json = excluded.relations_json,
                box_json = excluded.box_json,
                updated_at = excluded.updated_at",
            rusqlite::params![
                table.id,
                table.name,
                table.note,
                serde_json::to_string(&table.fields)?,
                serde_json::to_string(&table.relations)?,
                serde_json::to_string(&table.layout)?,
                table.updated_at,
            ],
        )?;
        Ok(())
    }

    fn append_log(&mut self, entry: &LogEntry) -> Result<()> {
        self.conn.execute(
            "INSERT INTO table_logs (table_id, updated_at, name, fields_json, relations_json)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            rusqlite::params![
                entry.table_id,
                entry.updated_at,
                entry.snapshot.name,
                serde_json::to_string(&entry.snapshot.fields)?,
                serde_json::to_string(&entry.snapshot.relations)?,
            ],
        )?;
        Ok(())
    }
}
