//! Error types for the Schemaboard core library.

use thiserror::Error;

/// All errors that can occur within the Schemaboard core library.
#[derive(Debug, Error)]
pub enum SchemaboardError {
    /// A SQLite operation failed.
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    /// An edited row is missing a required attribute.
    ///
    /// `field` names the attribute (`"name"`, `"type"` or `"id"`).
    #[error("Validation failed: row {row_index} is missing '{field}'")]
    Validation { row_index: usize, field: &'static str },

    /// A table ID was requested that does not exist in storage.
    #[error("Table not found: {0}")]
    TableNotFound(String),

    /// A table handed to the editor breaks the field-list invariants.
    #[error("Invalid table: {0}")]
    InvalidTable(String),

    /// The opened file is not a valid Schemaboard database.
    #[error("Invalid database: {0}")]
    InvalidDatabase(String),

    /// Appending a change-log entry failed after the primary save succeeded.
    #[error("Change log append failed: {0}")]
    LogAppend(String),

    /// An I/O operation on the filesystem failed.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Stored table data could not be (de)serialized as JSON.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Convenience alias that pins the error type to [`SchemaboardError`].
pub type Result<T> = std::result::Result<T, SchemaboardError>;

impl SchemaboardError {
    /// Returns a short, human-readable message suitable for display to the end user.
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::Database(e) => format!("Failed to save: {e}"),
            Self::Validation { row_index, field } => match *field {
                "name" => format!("Please enter field name (row {})", row_index + 1),
                "type" => format!("Please choose field type (row {})", row_index + 1),
                other => format!("Row {} is missing '{other}'", row_index + 1),
            },
            Self::TableNotFound(_) => "Table no longer exists".to_string(),
            Self::InvalidTable(msg) => msg.clone(),
            Self::InvalidDatabase(_) => "Could not open database file".to_string(),
            Self::LogAppend(e) => format!("History could not be recorded: {e}"),
            Self::Io(e) => format!("File error: {e}"),
            Self::Json(e) => format!("Data format error: {e}"),
        }
    }

    /// Returns `true` for errors raised before anything touched storage.
    #[must_use]
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation { .. })
    }
}
