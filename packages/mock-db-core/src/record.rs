//! Records and attribute value helpers.

use serde_json::{Map, Value};

use crate::error::DbError;

/// Record identifier, unique within a collection.
pub type RecordId = u64;

/// Attribute map of a record.
pub type Attrs = Map<String, Value>;

/// A single stored model instance.
#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    /// Record id
    pub id: RecordId,
    /// Attributes, never containing `id`
    pub attrs: Attrs,
}

impl Record {
    /// Creates a record, dropping any `id` key from the attributes.
    pub fn new(id: RecordId, mut attrs: Attrs) -> Self {
        attrs.remove("id");
        Self { id, attrs }
    }

    /// Returns an attribute value.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.attrs.get(key)
    }

    /// Returns a string attribute.
    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.attrs.get(key).and_then(Value::as_str)
    }

    /// Serializes the record as a JSON object with a string `id`.
    pub fn to_json(&self) -> Map<String, Value> {
        let mut map = Map::with_capacity(self.attrs.len() + 1);
        map.insert("id".to_string(), Value::String(self.id.to_string()));
        for (key, value) in &self.attrs {
            map.insert(key.clone(), value.clone());
        }
        map
    }

    /// Tests every query attribute against this record.
    ///
    /// `id` is compared against the record id, everything else against
    /// the attributes, using [`match_key`] on both sides.
    pub fn matches(&self, query: &Attrs) -> bool {
        query.iter().all(|(key, expected)| {
            if key == "id" {
                match_key(Some(&Value::from(self.id))) == match_key(Some(expected))
            } else {
                match_key(self.attrs.get(key)) == match_key(Some(expected))
            }
        })
    }
}

/// String form used for attribute equality: `"1"` and `1` compare equal.
pub fn match_key(value: Option<&Value>) -> String {
    match value {
        None | Some(Value::Null) => "null".to_string(),
        Some(Value::String(s)) => s.clone(),
        Some(other) => other.to_string(),
    }
}

/// Reads a record id from a JSON number or numeric string.
pub fn id_from_value(value: &Value) -> Result<RecordId, DbError> {
    match value {
        Value::Number(n) => n
            .as_u64()
            .ok_or_else(|| DbError::InvalidRecordId(n.to_string())),
        Value::String(s) => parse_id(s),
        other => Err(DbError::InvalidRecordId(other.to_string())),
    }
}

/// Parses a record id from text.
pub fn parse_id(s: &str) -> Result<RecordId, DbError> {
    s.trim()
        .parse::<RecordId>()
        .map_err(|_| DbError::InvalidRecordId(s.to_string()))
}

/// Reads an optional foreign key; null and absent keys yield `None`.
pub(crate) fn foreign_id(value: Option<&Value>) -> Option<RecordId> {
    match value {
        None | Some(Value::Null) => None,
        Some(v) => id_from_value(v).ok(),
    }
}
