//! Record definitions
//!
//! A record is a flat JSON object carrying a positive integer `Id`.
//! Every other field is opaque to the repository.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::{RepoError, Result};

/// Name of the mandatory identifier field
pub const ID_FIELD: &str = "Id";

/// Field set on a record returned from a conflicting add
pub const CONFLICT_FIELD: &str = "conflict";

/// One entity of a collection
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Record {
    fields: Map<String, Value>,
}

impl Record {
    /// Create an empty record (no `Id` yet)
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the record's `Id`, if it carries a non-negative integer one
    pub fn id(&self) -> Option<u64> {
        self.fields.get(ID_FIELD).and_then(Value::as_u64)
    }

    /// Set the record's `Id`
    pub fn set_id(&mut self, id: u64) {
        self.fields.insert(ID_FIELD.to_string(), Value::from(id));
    }

    /// Get a field value
    pub fn get(&self, field: &str) -> Option<&Value> {
        self.fields.get(field)
    }

    /// Set a field value, returning the previous one
    pub fn insert(&mut self, field: impl Into<String>, value: impl Into<Value>) -> Option<Value> {
        self.fields.insert(field.into(), value.into())
    }

    /// Remove a field
    pub fn remove(&mut self, field: &str) -> Option<Value> {
        self.fields.remove(field)
    }

    /// Check whether a field is present
    pub fn contains(&self, field: &str) -> bool {
        self.fields.contains_key(field)
    }

    /// Iterate over all fields
    pub fn fields(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.fields.iter()
    }

    /// Render a scalar field as text, the way the query engine sees it
    ///
    /// Strings are returned as-is, numbers and booleans in their JSON
    /// spelling. Null, arrays, objects and missing fields yield `None`.
    pub fn field_text(&self, field: &str) -> Option<String> {
        match self.fields.get(field)? {
            Value::String(s) => Some(s.clone()),
            Value::Number(n) => Some(n.to_string()),
            Value::Bool(b) => Some(b.to_string()),
            _ => None,
        }
    }

    /// Mark this record as rejected because of a key conflict
    pub fn mark_conflict(&mut self) {
        self.fields.insert(CONFLICT_FIELD.to_string(), Value::Bool(true));
    }

    /// Whether this record was marked as conflicting
    pub fn is_conflict(&self) -> bool {
        matches!(self.fields.get(CONFLICT_FIELD), Some(Value::Bool(true)))
    }

    /// Convert to a JSON value
    pub fn to_value(&self) -> Value {
        Value::Object(self.fields.clone())
    }
}

impl From<Map<String, Value>> for Record {
    fn from(fields: Map<String, Value>) -> Self {
        Self { fields }
    }
}

impl TryFrom<Value> for Record {
    type Error = RepoError;

    fn try_from(value: Value) -> Result<Self> {
        match value {
            Value::Object(fields) => Ok(Self { fields }),
            other => Err(RepoError::InvalidRecord(format!(
                "expected a JSON object, got {}",
                kind_of(&other)
            ))),
        }
    }
}

impl std::str::FromStr for Record {
    type Err = RepoError;

    fn from_str(s: &str) -> Result<Self> {
        let value: Value = serde_json::from_str(s)?;
        Self::try_from(value)
    }
}

fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
