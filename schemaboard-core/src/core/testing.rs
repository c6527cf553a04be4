//! In-memory gateway and recording sink shared by unit tests.

use crate::{LogEntry, NotificationSink, PersistenceGateway, Result, SchemaboardError, TableRecord};
use std::cell::Cell;
use std::collections::HashMap;

#[derive(Default)]
pub(crate) struct MemoryGateway {
    pub tables: HashMap<String, TableRecord>,
    pub logs: Vec<LogEntry>,
    pub puts: usize,
    pub fail_get: bool,
    pub fail_put: bool,
    pub fail_append: bool,
}

impl PersistenceGateway for MemoryGateway {
    fn get(&self, id: &str) -> Result<TableRecord> {
        if self.fail_get {
            return Err(SchemaboardError::InvalidDatabase("get failed".to_string()));
        }
        self.tables
            .get(id)
            .cloned()
            .ok_or_else(|| SchemaboardError::TableNotFound(id.to_string()))
    }

    fn put(&mut self, table: &TableRecord) -> Result<()> {
        self.puts += 1;
        if self.fail_put {
            return Err(SchemaboardError::InvalidDatabase("put failed".to_string()));
        }
        self.tables.insert(table.id.clone(), table.clone());
        Ok(())
    }

    fn append_log(&mut self, entry: &LogEntry) -> Result<()> {
        if self.fail_append {
            return Err(SchemaboardError::LogAppend("append failed".to_string()));
        }
        self.logs.push(entry.clone());
        Ok(())
    }
}

#[derive(Default)]
pub(crate) struct RecordingSink {
    pub successes: Cell<usize>,
    pub failures: Cell<usize>,
}

impl NotificationSink for RecordingSink {
    fn notify_success(&self) {
        self.successes.set(self.successes.get() + 1);
    }

    fn notify_failure(&self) {
        self.failures.set(self.failures.get() + 1);
    }
}
