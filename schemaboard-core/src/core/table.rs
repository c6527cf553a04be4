//! Table shapes: the editor's input and the persisted record.

use crate::Field;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A table as handed to the editor by the canvas.
///
/// `x`/`y` belong to the canvas layout and are dropped on commit.
/// `relations` and `layout` are carried from the stored record so that a
/// commit writes them back unchanged.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Table {
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub note: String,
    #[serde(default)]
    pub fields: Vec<Field>,
    #[serde(default, skip_serializing_if = "Value::is_null")]
    pub relations: Value,
    #[serde(rename = "box", default, skip_serializing_if = "Value::is_null")]
    pub layout: Value,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub x: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub y: Option<f64>,
}

/// Table-level values gathered outside the row form at commit time.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct TableMeta {
    pub name: String,
    pub note: String,
    /// Link data owned by the relation subsystem; stored and diffed, never read.
    pub relations: Value,
    /// Layout box owned by the canvas; carried through untouched.
    pub layout: Value,
}

/// The durable form of a table, one per table id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TableRecord {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub note: String,
    pub fields: Vec<Field>,
    #[serde(default)]
    pub relations: Value,
    #[serde(rename = "box", default)]
    pub layout: Value,
    /// Unix milliseconds of the save that produced this record.
    pub updated_at: i64,
}

impl TableRecord {
    /// Rebuilds the editor-side view of this record (without canvas position).
    pub fn to_table(&self) -> Table {
        Table {
            id: self.id.clone(),
            name: self.name.clone(),
            note: self.note.clone(),
            fields: self.fields.clone(),
            relations: self.relations.clone(),
            layout: self.layout.clone(),
            x: None,
            y: None,
        }
    }
}
