use crate::{Error, FieldMapper, FieldValue, Predicate, Result, RowLabeled, Value};
use std::sync::Arc;

/// Capability contract of a table-mapped record.
///
/// This is the prototype contract consumed by the list and iterator
/// components: `Clone` produces a fresh member, [`Record::load_from_row`]
/// populates it from a cursor row and [`Record::mapper`] exposes the
/// field/column translation. Implementors typically embed a [`TableRecord`]
/// and delegate.
pub trait Record: Clone {
    fn mapper(&self) -> &FieldMapper;

    /// Current state of a field, `None` when unset.
    fn get(&self, field: &str) -> Option<&FieldValue>;

    /// Assign a field. Unknown field names are a configuration error.
    fn set(&mut self, field: &str, value: FieldValue) -> Result<()>;

    /// Clear a field back to unset.
    fn unset(&mut self, field: &str);

    /// Populate every mapped field from a cursor row.
    fn load_from_row(&mut self, row: &RowLabeled) -> Result<()> {
        let mut values = Vec::with_capacity(self.mapper().len());
        for (field, column) in self.mapper().fields() {
            let value = row.get_column(column).ok_or_else(|| {
                Error::msg(format!(
                    "Record: column {:?} missing from result row of table {:?}",
                    column,
                    self.mapper().table()
                ))
            })?;
            values.push((field.to_owned(), value.clone()));
        }
        for (field, value) in values {
            self.set(&field, FieldValue::Scalar(value))?;
        }
        Ok(())
    }

    /// Currently set fields as `(field, value)` pairs in declaration order.
    fn set_values(&self) -> Vec<(&str, &FieldValue)> {
        self.mapper()
            .fields()
            .filter_map(|(field, _)| self.get(field).map(|value| (field, value)))
            .collect()
    }

    /// Whether all key fields are set. A record without declared keys is
    /// always considered valid.
    fn keys_set(&self) -> bool {
        let mapper = self.mapper();
        mapper.key_fields().all(|key| self.get(key).is_some())
    }

    /// Clear every mapped field.
    fn reset_values(&mut self) {
        let fields: Vec<String> = self.mapper().fields().map(|(f, _)| f.to_owned()).collect();
        for field in fields {
            self.unset(&field);
        }
    }

    /// Clear every non-key field except the given ones. Useful when only a
    /// specific field should be touched by a subsequent update.
    fn reset_all_except(&mut self, keep: &[&str]) {
        let fields: Vec<String> = self
            .mapper()
            .fields()
            .filter(|(f, _)| !self.mapper().is_key(f) && !keep.contains(f))
            .map(|(f, _)| f.to_owned())
            .collect();
        for field in fields {
            self.unset(&field);
        }
    }
}

/// Generic record over a shared [`FieldMapper`].
///
/// Field state lives in a slot vector aligned with the mapper's declaration
/// order. Typed entities hold one of these and delegate, instead of
/// inheriting mapping behavior.
#[derive(Debug, Clone)]
pub struct TableRecord {
    mapper: Arc<FieldMapper>,
    values: Vec<Option<FieldValue>>,
}

impl TableRecord {
    pub fn new(mapper: Arc<FieldMapper>) -> Result<Self> {
        mapper.validate()?;
        let values = vec![None; mapper.len()];
        Ok(Self { mapper, values })
    }

    /// Assign a plain scalar.
    pub fn set_value(&mut self, field: &str, value: impl Into<Value>) -> Result<()> {
        self.set(field, FieldValue::Scalar(value.into()))
    }

    /// Assign a predicate standing in for a raw SQL expression.
    pub fn set_predicate(&mut self, field: &str, predicate: Predicate) -> Result<()> {
        self.set(field, FieldValue::Predicate(predicate))
    }

    /// The scalar value of a field, `None` when unset or a predicate.
    pub fn scalar(&self, field: &str) -> Option<&Value> {
        self.get(field).and_then(FieldValue::as_scalar)
    }
}

impl Record for TableRecord {
    fn mapper(&self) -> &FieldMapper {
        &self.mapper
    }

    fn get(&self, field: &str) -> Option<&FieldValue> {
        self.mapper
            .index_of(field)
            .and_then(|i| self.values[i].as_ref())
    }

    fn set(&mut self, field: &str, value: FieldValue) -> Result<()> {
        let index = self.mapper.index_of(field).ok_or_else(|| {
            Error::msg(format!(
                "TableRecord: unknown field {:?} for table {:?}",
                field,
                self.mapper.table()
            ))
        })?;
        self.values[index] = Some(value);
        Ok(())
    }

    fn unset(&mut self, field: &str) {
        if let Some(index) = self.mapper.index_of(field) {
            self.values[index] = None;
        }
    }
}
