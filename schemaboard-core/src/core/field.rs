//! A single column definition within a table.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// One row of a table schema.
///
/// Serialized with the keys stored table documents already use
/// (`type`, `dbdefault`, `pk`, `not_null`, `increment`), so records written by
/// earlier editors load unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Field {
    pub id: String,
    #[serde(default)]
    pub name: String,
    /// Opaque type name; the core never interprets it.
    #[serde(rename = "type", default)]
    pub field_type: String,
    #[serde(default)]
    pub note: String,
    #[serde(rename = "dbdefault", default)]
    pub default_value: String,
    #[serde(rename = "pk", default)]
    pub primary_key: bool,
    #[serde(default)]
    pub unique: bool,
    #[serde(default)]
    pub not_null: bool,
    #[serde(rename = "increment", default)]
    pub auto_increment: bool,
}

impl Field {
    /// Creates a blank field with a freshly generated id.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: new_field_id(),
            name: name.into(),
            ..Self::default()
        }
    }

    /// Builder-style setter for the type name.
    #[must_use]
    pub fn with_type(mut self, field_type: impl Into<String>) -> Self {
        self.field_type = field_type.into();
        self
    }

    /// Returns the first required attribute that is empty, if any.
    pub fn missing_required(&self) -> Option<&'static str> {
        if self.name.is_empty() {
            Some("name")
        } else if self.field_type.is_empty() {
            Some("type")
        } else {
            None
        }
    }
}

/// Generates a collision-resistant field id.
pub fn new_field_id() -> String {
    Uuid::new_v4().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_field_has_unique_id() {
        let a = Field::new("a");
        let b = Field::new("a");
        assert_ne!(a.id, b.id);
        assert!(!a.primary_key && !a.unique && !a.not_null && !a.auto_increment);
    }

    #[test]
    fn test_deserialize_stored_keys_with_defaults() {
        let json = r#"{"id":"f1","name":"id","type":"int","pk":true,"increment":true}"#;
        let field: Field = serde_json::from_str(json).unwrap();
        assert_eq!(field.field_type, "int");
        assert!(field.primary_key);
        assert!(field.auto_increment);
        assert!(!field.not_null);
        assert_eq!(field.note, "");
        assert_eq!(field.default_value, "");
    }

    #[test]
    fn test_serialize_uses_stored_keys() {
        let mut field = Field::new("email").with_type("varchar");
        field.default_value = "''".to_string();
        field.not_null = true;
        let json = serde_json::to_string(&field).unwrap();
        assert!(json.contains(r#""type":"varchar""#));
        assert!(json.contains(r#""dbdefault":"''""#));
        assert!(json.contains(r#""not_null":true"#));
    }

    #[test]
    fn test_missing_required_checks_name_before_type() {
        let field = Field::new("");
        assert_eq!(field.missing_required(), Some("name"));
        let field = Field::new("id");
        assert_eq!(field.missing_required(), Some("type"));
        let field = Field::new("id").with_type("int");
        assert_eq!(field.missing_required(), None);
    }
}
