use crate::{Error, Result};

/// Mapping between a record's field names and the columns of one table.
///
/// Field insertion order is the canonical enumeration order used for SELECT
/// and INSERT column lists. A subset of fields forms the primary key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldMapper {
    table: String,
    fields: Vec<(String, String)>,
    keys: Vec<String>,
}

impl FieldMapper {
    pub fn new(table: impl Into<String>) -> Self {
        Self {
            table: table.into(),
            fields: Vec::new(),
            keys: Vec::new(),
        }
    }

    /// Declare a field and the column it maps to. Re-declaring a field
    /// replaces its column, keeping the original position.
    pub fn field(mut self, field: impl Into<String>, column: impl Into<String>) -> Self {
        let field = field.into();
        let column = column.into();
        if let Some(entry) = self.fields.iter_mut().find(|(f, _)| *f == field) {
            entry.1 = column;
        } else {
            self.fields.push((field, column));
        }
        self
    }

    /// Mark a field as part of the primary key.
    pub fn key(mut self, field: impl Into<String>) -> Self {
        let field = field.into();
        if !self.keys.contains(&field) {
            self.keys.push(field);
        }
        self
    }

    /// Every key field must exist in the field map.
    pub fn validate(&self) -> Result<()> {
        for key in &self.keys {
            if self.column_of(key).is_none() {
                return Err(Error::msg(format!(
                    "FieldMapper: key field {:?} is not a mapped field of table {:?}",
                    key, self.table
                )));
            }
        }
        Ok(())
    }

    pub fn table(&self) -> &str {
        &self.table
    }

    /// Fields in declaration order as `(field, column)` pairs.
    pub fn fields(&self) -> impl ExactSizeIterator<Item = (&str, &str)> {
        self.fields.iter().map(|(f, c)| (f.as_str(), c.as_str()))
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn column_of(&self, field: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(f, _)| f == field)
            .map(|(_, c)| c.as_str())
    }

    pub fn index_of(&self, field: &str) -> Option<usize> {
        self.fields.iter().position(|(f, _)| f == field)
    }

    pub fn key_fields(&self) -> impl ExactSizeIterator<Item = &str> {
        self.keys.iter().map(String::as_str)
    }

    pub fn is_key(&self, field: &str) -> bool {
        self.keys.iter().any(|k| k == field)
    }

    pub fn has_keys(&self) -> bool {
        !self.keys.is_empty()
    }
}
