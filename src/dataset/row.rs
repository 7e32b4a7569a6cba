//! Rows as they travel from source to target

use super::Table;
use crate::error::ReadError;
use std::collections::BTreeMap;

/// A single column value, keeping the source storage class
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Null,
    Integer(i64),
    Real(f64),
    Text(String),
    Blob(Vec<u8>),
}

impl Value {
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Value::Text(s) => Some(s),
            _ => None,
        }
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::Text(value.to_string())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Value::Text(value)
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Value::Integer(value)
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Value::Real(value)
    }
}

impl From<Vec<u8>> for Value {
    fn from(value: Vec<u8>) -> Self {
        Value::Blob(value)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(value: Option<T>) -> Self {
        value.map_or(Value::Null, Into::into)
    }
}

/// A row as a mapping from column name to value
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Row {
    columns: BTreeMap<String, Value>,
}

impl Row {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert
    pub fn with(mut self, column: impl Into<String>, value: impl Into<Value>) -> Self {
        self.insert(column, value);
        self
    }

    pub fn insert(&mut self, column: impl Into<String>, value: impl Into<Value>) {
        self.columns.insert(column.into(), value.into());
    }

    pub fn get(&self, column: &str) -> Option<&Value> {
        self.columns.get(column)
    }

    /// The primary key, when it is stored as text
    pub fn id(&self) -> Option<&str> {
        self.get("id").and_then(Value::as_text)
    }

    /// Re-key the row onto the target columns of `table`
    ///
    /// Each target column is looked up under its own name first, then its
    /// aliases. Columns the target does not know are dropped.
    ///
    /// # Errors
    /// Returns [`ReadError::MalformedRow`] if a target column is absent, or
    /// holds a BLOB while the target column is not `bytea`.
    pub fn conform_to(mut self, table: Table) -> Result<Row, ReadError> {
        let mut conformed = Row::new();
        for column in table.columns() {
            let value = column
                .source_names()
                .find_map(|name| self.columns.remove(name))
                .ok_or_else(|| ReadError::MalformedRow {
                    table,
                    reason: format!("missing column `{}`", column.name),
                })?;
            // A blob cast to text would be stored as its hex escape
            if matches!(value, Value::Blob(_)) && column.sql_type != "bytea" {
                return Err(ReadError::MalformedRow {
                    table,
                    reason: format!(
                        "column `{}` holds a BLOB, expected {}",
                        column.name, column.sql_type
                    ),
                });
            }
            conformed.columns.insert(column.name.to_string(), value);
        }
        Ok(conformed)
    }
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for Row {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            columns: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}
