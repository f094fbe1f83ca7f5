//! # Schema-driven Record Binding
//!
//! The data source sends rows as plain JSON arrays together with the list of
//! column names. A [`Schema`] is built once per fetched dataset from that list,
//! and every row is bound to it, producing a [`Record`] whose values can be
//! looked up by field name. Nothing here knows which fields exist; adding a
//! column to the query on the server needs no change in this module.

use serde::ser::{Serialize, SerializeMap, Serializer};
use serde_json::Value;
use std::collections::HashMap;
use thiserror::Error;

/// Errors raised while binding rows to a schema.
#[derive(Debug, Error, PartialEq)]
pub enum MapError {
    #[error("duplicate column `{0}` in schema")]
    DuplicateColumn(String),

    #[error("schema is missing required column `{0}`")]
    MissingColumn(String),

    #[error("row {row} has {actual} values but the schema has {expected} columns")]
    LengthMismatch {
        row: usize,
        expected: usize,
        actual: usize,
    },

    #[error("row {row}: column `{column}` expected {expected}, got {value}")]
    WrongType {
        row: usize,
        column: String,
        expected: &'static str,
        value: Value,
    },
}

/// An ordered list of unique column names.
#[derive(Debug, Clone)]
pub struct Schema {
    columns: Vec<String>,
    index: HashMap<String, usize>,
}

impl Schema {
    /// Builds a schema, rejecting duplicate column names.
    pub fn new<I, S>(columns: I) -> Result<Self, MapError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let columns: Vec<String> = columns.into_iter().map(Into::into).collect();
        let mut index = HashMap::with_capacity(columns.len());
        for (i, name) in columns.iter().enumerate() {
            if index.insert(name.clone(), i).is_some() {
                return Err(MapError::DuplicateColumn(name.clone()));
            }
        }
        Ok(Schema { columns, index })
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    /// Position of a column, if the schema has it.
    pub fn position(&self, name: &str) -> Option<usize> {
        self.index.get(name).copied()
    }

    /// Fails with the first of `names` that the schema does not contain.
    pub fn require(&self, names: &[&str]) -> Result<(), MapError> {
        match names.iter().find(|n| !self.index.contains_key(**n)) {
            Some(missing) => Err(MapError::MissingColumn(missing.to_string())),
            None => Ok(()),
        }
    }

    /// Binds the `row`-th row of the dataset to this schema.
    ///
    /// Rows whose length differs from the schema are rejected instead of being
    /// padded or truncated, so a field never silently lands under the wrong name.
    pub fn bind(&self, row: usize, values: Vec<Value>) -> Result<Record<'_>, MapError> {
        if values.len() != self.columns.len() {
            return Err(MapError::LengthMismatch {
                row,
                expected: self.columns.len(),
                actual: values.len(),
            });
        }
        Ok(Record {
            schema: self,
            row,
            values,
        })
    }
}

/// One row with its values addressable by column name.
#[derive(Debug, Clone)]
pub struct Record<'s> {
    schema: &'s Schema,
    row: usize,
    values: Vec<Value>,
}

impl<'s> Record<'s> {
    /// Index of this row in the dataset.
    pub fn row(&self) -> usize {
        self.row
    }

    /// The raw value of a field. `None` if the schema has no such column.
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.schema.position(name).map(|i| &self.values[i])
    }

    /// Iterates `(column, value)` pairs in schema order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.schema
            .columns
            .iter()
            .map(String::as_str)
            .zip(self.values.iter())
    }

    fn wrong_type(&self, column: &str, expected: &'static str, value: &Value) -> MapError {
        MapError::WrongType {
            row: self.row,
            column: column.to_string(),
            expected,
            value: value.clone(),
        }
    }

    /// An integer field; JSON `null` and absent columns are `None`.
    pub fn i64_opt(&self, name: &str) -> Result<Option<i64>, MapError> {
        match self.get(name) {
            None | Some(Value::Null) => Ok(None),
            Some(v) => v
                .as_i64()
                .map(Some)
                .ok_or_else(|| self.wrong_type(name, "an integer", v)),
        }
    }

    /// An integer field that must not be null.
    pub fn i64(&self, name: &str) -> Result<i64, MapError> {
        self.i64_opt(name)?.ok_or_else(|| {
            self.wrong_type(name, "an integer", self.get(name).unwrap_or(&Value::Null))
        })
    }

    /// A string field; JSON `null` and absent columns are `None`.
    pub fn str_opt(&self, name: &str) -> Result<Option<&str>, MapError> {
        match self.get(name) {
            None | Some(Value::Null) => Ok(None),
            Some(v) => v
                .as_str()
                .map(Some)
                .ok_or_else(|| self.wrong_type(name, "a string", v)),
        }
    }

    /// A boolean field. Database exports use `0`/`1` as often as `true`/`false`.
    pub fn bool_opt(&self, name: &str) -> Result<Option<bool>, MapError> {
        match self.get(name) {
            None | Some(Value::Null) => Ok(None),
            Some(Value::Bool(b)) => Ok(Some(*b)),
            Some(v) => v
                .as_i64()
                .map(|i| Some(i != 0))
                .ok_or_else(|| self.wrong_type(name, "a boolean", v)),
        }
    }

    /// An object field; JSON `null` and absent columns are `None`.
    pub fn object_opt(
        &self,
        name: &str,
    ) -> Result<Option<&serde_json::Map<String, Value>>, MapError> {
        match self.get(name) {
            None | Some(Value::Null) => Ok(None),
            Some(v) => v
                .as_object()
                .map(Some)
                .ok_or_else(|| self.wrong_type(name, "an object", v)),
        }
    }
}

impl Serialize for Record<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.values.len()))?;
        for (k, v) in self.iter() {
            map.serialize_entry(k, v)?;
        }
        map.end()
    }
}
