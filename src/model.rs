//! Model contract
//!
//! A model describes one record type to its repository: the type name the
//! store file is derived from, the optional key field that must stay unique,
//! the validation predicate, and the set of fields a query may filter or
//! sort on.

use serde_json::Value;

use crate::record::{Record, ID_FIELD};

/// Descriptor names that are part of a model but never record fields
pub const RESERVED_DESCRIPTORS: [&str; 2] = ["validator", "key"];

/// Contract every record type supplies to its repository
pub trait Model {
    /// Stable type name, used to derive the store location
    fn type_name(&self) -> &str;

    /// Field whose value must be unique across the collection
    fn key_field(&self) -> Option<&str> {
        None
    }

    /// Validation predicate over a candidate record
    fn validate(&self, record: &Record) -> bool;

    /// Fields a query may filter or sort on
    fn queryable_fields(&self) -> Vec<String>;
}

/// A model declared at runtime from a field list
///
/// Validation checks that every required field is present, non-null and,
/// for strings, not blank.
#[derive(Debug, Clone)]
pub struct SchemaModel {
    type_name: String,
    fields: Vec<String>,
    key_field: Option<String>,
    required: Vec<String>,
}

impl SchemaModel {
    /// Start declaring a model for the given type name
    pub fn builder(type_name: impl Into<String>) -> SchemaModelBuilder {
        SchemaModelBuilder {
            model: SchemaModel {
                type_name: type_name.into(),
                fields: vec![ID_FIELD.to_string()],
                key_field: None,
                required: Vec::new(),
            },
        }
    }

    /// Declared fields, `Id` first
    pub fn fields(&self) -> &[String] {
        &self.fields
    }

    /// Fields checked by `validate`
    pub fn required_fields(&self) -> &[String] {
        &self.required
    }
}

impl Model for SchemaModel {
    fn type_name(&self) -> &str {
        &self.type_name
    }

    fn key_field(&self) -> Option<&str> {
        self.key_field.as_deref()
    }

    fn validate(&self, record: &Record) -> bool {
        self.required.iter().all(|field| match record.get(field) {
            None | Some(Value::Null) => false,
            Some(Value::String(s)) => !s.trim().is_empty(),
            Some(_) => true,
        })
    }

    fn queryable_fields(&self) -> Vec<String> {
        self.fields
            .iter()
            .filter(|f| !RESERVED_DESCRIPTORS.contains(&f.as_str()))
            .cloned()
            .collect()
    }
}

/// Builder for SchemaModel
pub struct SchemaModelBuilder {
    model: SchemaModel,
}

impl SchemaModelBuilder {
    /// Declare an optional field
    pub fn field(mut self, name: impl Into<String>) -> Self {
        self.push_field(name.into());
        self
    }

    /// Declare a field that must be present and non-blank
    pub fn required(mut self, name: impl Into<String>) -> Self {
        let name = name.into();
        self.push_field(name.clone());
        if !self.model.required.contains(&name) {
            self.model.required.push(name);
        }
        self
    }

    /// Declare the field whose value must be unique
    pub fn key(mut self, name: impl Into<String>) -> Self {
        let name = name.into();
        self.push_field(name.clone());
        self.model.key_field = Some(name);
        self
    }

    pub fn build(self) -> SchemaModel {
        self.model
    }

    fn push_field(&mut self, name: String) {
        if !self.model.fields.contains(&name) {
            self.model.fields.push(name);
        }
    }
}
