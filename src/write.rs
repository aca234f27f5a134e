use crate::{
    separated_by, Connection, Error, FieldValue, InsertBuffer, Predicate, Record, Result,
    SqlWriter, Value,
};

/// Translates a record's in-memory field state into INSERT / UPDATE / DELETE
/// statements.
///
/// Stateless; typed entities hold one and delegate their persistence calls
/// to it. Precondition failures (missing key fields, nothing to update) are
/// reported as `Ok(false)`, configuration errors propagate.
#[derive(Default, Debug, Clone, Copy)]
pub struct TableWriter;

impl TableWriter {
    pub const fn new() -> Self {
        Self {}
    }

    /// Insert every field currently set on `record`. Unset fields are left
    /// out of the column list entirely; partial inserts are intentional.
    /// A no-op when nothing is set.
    pub fn insert<R, C>(&self, record: &R, conn: &mut C) -> Result<()>
    where
        R: Record,
        C: Connection + ?Sized,
    {
        let Some((sql, values)) = self.build_insert(record, conn.writer())? else {
            log::debug!(
                "TableWriter: nothing set on record of {:?}, skipping insert",
                record.mapper().table()
            );
            return Ok(());
        };
        let mut rows = conn.execute(&sql, &values)?;
        rows.close()?;
        Ok(())
    }

    /// Queue the insert in `buffer` instead of executing it, to be merged
    /// into one multi-row statement per column-set shape on flush.
    ///
    /// Every value is quoted eagerly because rows sharing one physical
    /// statement cannot stay parameterized. `last_insert_id` is undefined
    /// while inserts are batched.
    pub fn insert_batched<R>(
        &self,
        record: &R,
        writer: &dyn SqlWriter,
        buffer: &mut dyn InsertBuffer,
    ) -> Result<()>
    where
        R: Record,
    {
        let mapper = record.mapper();
        let fields = record.set_values();
        if fields.is_empty() {
            log::debug!(
                "TableWriter: nothing set on record of {:?}, skipping insert",
                mapper.table()
            );
            return Ok(());
        }
        let mut prefix = String::with_capacity(128);
        prefix.push_str("INSERT INTO ");
        writer.write_identifier_quoted(&mut prefix, mapper.table());
        prefix.push_str(" (");
        separated_by(
            &mut prefix,
            fields.iter(),
            |out, (field, _)| {
                if let Some(column) = mapper.column_of(field) {
                    writer.write_identifier_quoted(out, column);
                }
            },
            ",",
        );
        prefix.push_str(") VALUES ");
        let mut tuple = String::with_capacity(64);
        tuple.push('(');
        let mut first = true;
        for (field, value) in &fields {
            if !first {
                tuple.push(',');
            }
            first = false;
            match value {
                FieldValue::Scalar(v) => writer.write_value(&mut tuple, v),
                FieldValue::Predicate(Predicate::Group { .. }) => {
                    return Err(Error::msg(format!(
                        "TableWriter: cannot insert a predicate group for field {:?}",
                        field
                    )));
                }
                FieldValue::Predicate(predicate) => {
                    predicate.write_substituted(writer, &mut tuple)?
                }
            }
        }
        tuple.push(')');
        buffer.buffer_insert(&prefix, tuple);
        Ok(())
    }

    /// Update all non-key fields currently set, addressing the row by its
    /// key fields. `Ok(false)` when a key field is missing or there is
    /// nothing to update.
    pub fn update<R, C>(&self, record: &R, conn: &mut C) -> Result<bool>
    where
        R: Record,
        C: Connection + ?Sized,
    {
        let mapper = record.mapper();
        if !mapper.has_keys() || !record.keys_set() {
            return Ok(false);
        }
        let writer = conn.writer();
        let fields = record.set_values();
        let mut set_part = String::with_capacity(64);
        let mut values = Vec::new();
        for (field, value) in fields.iter().filter(|(f, _)| !mapper.is_key(f)) {
            if !set_part.is_empty() {
                set_part.push_str(", ");
            }
            let column = mapper.column_of(field).ok_or_else(|| {
                Error::msg(format!("TableWriter: field {:?} is not mapped", field))
            })?;
            writer.write_identifier_quoted(&mut set_part, column);
            set_part.push('=');
            match value {
                FieldValue::Scalar(v) => {
                    set_part.push('?');
                    values.push(v.clone());
                }
                FieldValue::Predicate(Predicate::Group { .. }) => {
                    return Err(Error::msg(format!(
                        "TableWriter: cannot update with a predicate group for field {:?}",
                        field
                    )));
                }
                FieldValue::Predicate(predicate) => {
                    predicate.write_substituted(writer, &mut set_part)?
                }
            }
        }
        if set_part.is_empty() {
            // nothing to update
            return Ok(false);
        }
        let where_part = self.build_key_where(record, writer, &mut values)?;
        let mut sql = String::with_capacity(64 + set_part.len() + where_part.len());
        sql.push_str("UPDATE ");
        writer.write_identifier_quoted(&mut sql, mapper.table());
        sql.push_str(" SET ");
        sql.push_str(&set_part);
        sql.push_str(" WHERE ");
        sql.push_str(&where_part);
        let mut rows = conn.execute(&sql, &values)?;
        rows.close()?;
        Ok(true)
    }

    /// Delete the row addressed by the record's key fields. `Ok(false)` when
    /// a key field is missing or no key is declared.
    pub fn delete<R, C>(&self, record: &R, conn: &mut C) -> Result<bool>
    where
        R: Record,
        C: Connection + ?Sized,
    {
        let mapper = record.mapper();
        if !mapper.has_keys() || !record.keys_set() {
            return Ok(false);
        }
        let writer = conn.writer();
        let mut values = Vec::new();
        let where_part = self.build_key_where(record, writer, &mut values)?;
        let mut sql = String::with_capacity(32 + where_part.len());
        sql.push_str("DELETE FROM ");
        writer.write_identifier_quoted(&mut sql, mapper.table());
        sql.push_str(" WHERE ");
        sql.push_str(&where_part);
        let mut rows = conn.execute(&sql, &values)?;
        rows.close()?;
        Ok(true)
    }

    fn build_insert<R: Record>(
        &self,
        record: &R,
        writer: &dyn SqlWriter,
    ) -> Result<Option<(String, Vec<Value>)>> {
        let mapper = record.mapper();
        let fields = record.set_values();
        if fields.is_empty() {
            return Ok(None);
        }
        let mut sql = String::with_capacity(128);
        sql.push_str("INSERT INTO ");
        writer.write_identifier_quoted(&mut sql, mapper.table());
        sql.push_str(" (");
        separated_by(
            &mut sql,
            fields.iter(),
            |out, (field, _)| {
                if let Some(column) = mapper.column_of(field) {
                    writer.write_identifier_quoted(out, column);
                }
            },
            ",",
        );
        sql.push_str(") VALUES (");
        let mut values = Vec::new();
        let mut first = true;
        for (field, value) in &fields {
            if !first {
                sql.push(',');
            }
            first = false;
            match value {
                FieldValue::Scalar(v) => {
                    sql.push('?');
                    values.push(v.clone());
                }
                FieldValue::Predicate(Predicate::Group { .. }) => {
                    return Err(Error::msg(format!(
                        "TableWriter: cannot insert a predicate group for field {:?}",
                        field
                    )));
                }
                FieldValue::Predicate(predicate) => {
                    predicate.write_substituted(writer, &mut sql)?
                }
            }
        }
        sql.push(')');
        Ok(Some((sql, values)))
    }

    /// WHERE part addressing a row by its key fields. Key values are bound
    /// as placeholders appended to `values`; a predicate used as a key is
    /// suspicious and logged, a group is a hard error because row identity
    /// must be a single deterministic condition.
    fn build_key_where<R: Record>(
        &self,
        record: &R,
        writer: &dyn SqlWriter,
        values: &mut Vec<Value>,
    ) -> Result<String> {
        let mapper = record.mapper();
        let mut out = String::with_capacity(64);
        for key in mapper.key_fields() {
            if !out.is_empty() {
                out.push_str(" AND ");
            }
            let column = mapper.column_of(key).ok_or_else(|| {
                Error::msg(format!("TableWriter: key field {:?} is not mapped", key))
            })?;
            writer.write_identifier_quoted(&mut out, column);
            out.push('=');
            let value = record.get(key).ok_or_else(|| {
                Error::msg(format!("TableWriter: key field {:?} is not set", key))
            })?;
            match value {
                FieldValue::Scalar(v) => {
                    out.push('?');
                    values.push(v.clone());
                }
                FieldValue::Predicate(Predicate::Group { .. }) => {
                    return Err(Error::msg(format!(
                        "TableWriter: a predicate group cannot address a row, key field {:?}",
                        key
                    )));
                }
                FieldValue::Predicate(predicate) => {
                    log::warn!(
                        "TableWriter: using a predicate for key field {:?} of {:?}",
                        key,
                        mapper.table()
                    );
                    predicate.write_substituted(writer, &mut out)?;
                }
            }
        }
        Ok(out)
    }
}
