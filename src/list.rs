use crate::{
    query_by_example, Connection, Error, FieldValue, Record, Result, TableWriter, Value,
};

/// Eagerly cached collection of records selected by example.
///
/// The query runs once, on first access, and the full result set is drained
/// into memory; every later read is served from the cache until [`clear`]
/// forces a refetch. Optionally keyed by a field for lookup by value.
///
/// [`clear`]: RecordList::clear
pub struct RecordList<'c, C, R>
where
    C: Connection + ?Sized,
    R: Record,
{
    conn: &'c mut C,
    prototype: R,
    extra: String,
    limit: Option<u32>,
    offset: Option<u32>,
    key: Option<String>,
    raw: Option<(String, Vec<Value>)>,
    entries: Option<Vec<(Option<Value>, R)>>,
}

impl<'c, C, R> RecordList<'c, C, R>
where
    C: Connection + ?Sized,
    R: Record,
{
    /// The fields set on `prototype` become the selection conditions; the
    /// prototype is also cloned to materialize each fetched record.
    pub fn new(conn: &'c mut C, prototype: R) -> Self {
        Self {
            conn,
            prototype,
            extra: String::new(),
            limit: None,
            offset: None,
            key: None,
            raw: None,
            entries: None,
        }
    }

    /// Key the collection by a field: [`get_by_key`] then resolves members
    /// by that field's value. Unknown field names are a configuration error.
    /// Calling this after a fetch invalidates the cache.
    ///
    /// [`get_by_key`]: RecordList::get_by_key
    pub fn set_key(&mut self, field: &str) -> Result<()> {
        if self.prototype.mapper().index_of(field).is_none() {
            return Err(Error::msg(format!(
                "RecordList: unknown key field {:?} for table {:?}",
                field,
                self.prototype.mapper().table()
            )));
        }
        self.key = Some(field.to_owned());
        self.entries = None;
        Ok(())
    }

    /// Raw SQL appended after the WHERE clause, typically an ORDER BY.
    /// Invalidates the cache.
    pub fn set_extra(&mut self, extra: &str) {
        self.extra = extra.to_owned();
        self.entries = None;
    }

    /// Window the selection. Invalidates the cache.
    pub fn set_range(&mut self, limit: Option<u32>, offset: Option<u32>) {
        self.limit = limit;
        self.offset = offset;
        self.entries = None;
    }

    /// Replace the generated statement with a caller-supplied query whose
    /// result rows still carry all mapped columns. Invalidates the cache.
    pub fn set_raw_query(&mut self, sql: &str, values: &[Value]) {
        self.raw = Some((sql.to_owned(), values.to_vec()));
        self.entries = None;
    }

    /// Drop the cache and the keying, so the next access fetches fresh data.
    pub fn clear(&mut self) {
        self.entries = None;
        self.key = None;
    }

    pub fn is_fetched(&self) -> bool {
        self.entries.is_some()
    }

    pub fn is_assoc(&self) -> bool {
        self.key.is_some()
    }

    /// Execute the selection now and cache the complete result set.
    ///
    /// When keyed, members are stored under their key field's value and a
    /// duplicate key replaces the earlier member in place, keeping the
    /// position of the first occurrence.
    pub fn fetch(&mut self) -> Result<()> {
        let mut rows = match &self.raw {
            Some((sql, values)) => {
                if self.limit.is_none() && self.offset.is_none() {
                    self.conn.execute(sql, values)?
                } else {
                    self.conn.execute_ranged(sql, self.limit, self.offset, values)?
                }
            }
            None => query_by_example(
                &mut *self.conn,
                &self.prototype,
                &self.extra,
                self.limit,
                self.offset,
            )?,
        };
        let mut entries = Vec::new();
        let drained = (|| -> Result<()> {
            while let Some(row) = rows.fetch_row()? {
                let mut record = self.prototype.clone();
                record.reset_values();
                record.load_from_row(&row)?;
                let key = match &self.key {
                    Some(field) => Some(
                        record
                            .get(field)
                            .and_then(FieldValue::as_scalar)
                            .cloned()
                            .unwrap_or(Value::Null),
                    ),
                    None => None,
                };
                match key {
                    Some(key) => {
                        match entries
                            .iter_mut()
                            .find(|(k, _): &&mut (Option<Value>, R)| k.as_ref() == Some(&key))
                        {
                            // duplicate key, last one wins
                            Some(entry) => entry.1 = record,
                            None => entries.push((Some(key), record)),
                        }
                    }
                    None => entries.push((None, record)),
                }
            }
            Ok(())
        })();
        let closed = rows.close();
        drained?;
        closed?;
        log::debug!(
            "RecordList: fetched {} records from {:?}",
            entries.len(),
            self.prototype.mapper().table()
        );
        self.entries = Some(entries);
        Ok(())
    }

    fn ensure_fetched(&mut self) -> Result<()> {
        if self.entries.is_none() {
            self.fetch()?;
        }
        Ok(())
    }

    pub fn len(&mut self) -> Result<usize> {
        self.ensure_fetched()?;
        Ok(self.entries.as_ref().map(Vec::len).unwrap_or(0))
    }

    pub fn is_empty(&mut self) -> Result<bool> {
        Ok(self.len()? == 0)
    }

    /// Member at an ordinal position, in result order.
    pub fn get(&mut self, index: usize) -> Result<Option<&R>> {
        self.ensure_fetched()?;
        Ok(self
            .entries
            .as_ref()
            .and_then(|entries| entries.get(index))
            .map(|(_, record)| record))
    }

    /// Member stored under a key value. Always `None` when not keyed.
    pub fn get_by_key(&mut self, key: &Value) -> Result<Option<&R>> {
        self.ensure_fetched()?;
        Ok(self.entries.as_ref().and_then(|entries| {
            entries
                .iter()
                .find(|(k, _)| k.as_ref() == Some(key))
                .map(|(_, record)| record)
        }))
    }

    /// All cached members in order.
    pub fn records(&mut self) -> Result<impl Iterator<Item = &R>> {
        self.ensure_fetched()?;
        Ok(self
            .entries
            .as_ref()
            .into_iter()
            .flatten()
            .map(|(_, record)| record))
    }

    /// Append a record to the cache without touching the store.
    pub fn push(&mut self, record: R) -> Result<()> {
        self.ensure_fetched()?;
        if let Some(entries) = &mut self.entries {
            entries.push((None, record));
        }
        Ok(())
    }

    /// Replace the member at an ordinal position.
    pub fn set_at(&mut self, index: usize, record: R) -> Result<()> {
        self.ensure_fetched()?;
        let entries = self.entries.as_mut().ok_or_else(|| Error::msg("RecordList: unreachable, cache missing after fetch"))?;
        match entries.get_mut(index) {
            Some(entry) => {
                entry.1 = record;
                Ok(())
            }
            None => Err(Error::msg(format!(
                "RecordList: index {} out of bounds",
                index
            ))),
        }
    }

    /// Store a record under a key value, replacing any member already there.
    pub fn insert_by_key(&mut self, key: Value, record: R) -> Result<()> {
        self.ensure_fetched()?;
        if let Some(entries) = &mut self.entries {
            match entries.iter_mut().find(|(k, _)| k.as_ref() == Some(&key)) {
                Some(entry) => entry.1 = record,
                None => entries.push((Some(key), record)),
            }
        }
        Ok(())
    }

    /// Remove the member at an ordinal position from the cache only.
    pub fn remove(&mut self, index: usize) -> Result<Option<R>> {
        self.ensure_fetched()?;
        Ok(self.entries.as_mut().and_then(|entries| {
            (index < entries.len()).then(|| entries.remove(index).1)
        }))
    }

    /// Remove the member stored under a key value from the cache only.
    pub fn remove_by_key(&mut self, key: &Value) -> Result<Option<R>> {
        self.ensure_fetched()?;
        Ok(self.entries.as_mut().and_then(|entries| {
            entries
                .iter()
                .position(|(k, _)| k.as_ref() == Some(key))
                .map(|i| entries.remove(i).1)
        }))
    }

    /// Delete every cached member from the store and drop the cache.
    ///
    /// Fails on the first member whose key fields are not set; members
    /// already deleted stay deleted.
    pub fn delete_all(&mut self) -> Result<()> {
        self.ensure_fetched()?;
        let writer = TableWriter::new();
        if let Some(entries) = self.entries.take() {
            for (_, record) in &entries {
                if !writer.delete(record, &mut *self.conn)? {
                    return Err(Error::msg(format!(
                        "RecordList: cannot delete record of {:?}, key fields missing",
                        record.mapper().table()
                    )));
                }
            }
        }
        Ok(())
    }
}
