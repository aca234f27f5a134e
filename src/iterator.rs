use crate::{query_by_example, Connection, Record, Result, RowSource};

/// Single-pass streaming traversal of records selected by example.
///
/// Rows are materialized one at a time from a live cursor and not retained,
/// so memory stays constant regardless of result size. A rewind after the
/// cursor has been consumed re-executes the query; a rewind on a freshly
/// fetched, untouched cursor does not, which lets a count be taken before
/// iteration without paying for a second round trip.
pub struct RecordIterator<'c, C, R>
where
    C: Connection + ?Sized,
    R: Record,
{
    pub(crate) conn: &'c mut C,
    pub(crate) prototype: R,
    pub(crate) extra: String,
    pub(crate) limit: Option<u32>,
    pub(crate) offset: Option<u32>,
    rows: Option<Box<dyn RowSource>>,
    rows_closed: bool,
    current: Option<R>,
    row_nr: u64,
    consumed: bool,
    count: Option<u64>,
}

impl<'c, C, R> RecordIterator<'c, C, R>
where
    C: Connection + ?Sized,
    R: Record,
{
    pub fn new(conn: &'c mut C, prototype: R) -> Self {
        Self {
            conn,
            prototype,
            extra: String::new(),
            limit: None,
            offset: None,
            rows: None,
            rows_closed: false,
            current: None,
            row_nr: 0,
            consumed: false,
            count: None,
        }
    }

    /// Raw SQL appended after the WHERE clause, typically an ORDER BY.
    pub fn set_extra(&mut self, extra: &str) {
        self.extra = extra.to_owned();
    }

    /// Window the selection; takes effect on the next (re-)execution.
    pub fn set_range(&mut self, limit: Option<u32>, offset: Option<u32>) {
        self.limit = limit;
        self.offset = offset;
    }

    pub fn limit(&self) -> Option<u32> {
        self.limit
    }

    pub fn offset(&self) -> Option<u32> {
        self.offset
    }

    /// Execute the selection and position on the first record.
    pub fn fetch(&mut self) -> Result<()> {
        self.close_rows()?;
        self.row_nr = 0;
        self.count = None;
        let rows = query_by_example(
            &mut *self.conn,
            &self.prototype,
            &self.extra,
            self.limit,
            self.offset,
        )?;
        self.rows = Some(rows);
        self.rows_closed = false;
        self.advance()?;
        // taking the first record off the cursor is positioning, not
        // consumption, so an immediate rewind will not re-execute
        self.consumed = false;
        Ok(())
    }

    /// Position on the first record, re-executing the query only when the
    /// cursor has already been consumed (or never fetched).
    pub fn rewind(&mut self) -> Result<()> {
        if self.rows.is_none() || self.consumed {
            self.fetch()?;
        }
        Ok(())
    }

    /// Move to the next record. Returns the new current record, or `None`
    /// past the end of the result set.
    pub fn advance(&mut self) -> Result<Option<&R>> {
        let Some(rows) = &mut self.rows else {
            self.current = None;
            self.row_nr = 0;
            return Ok(None);
        };
        if self.rows_closed || !rows.has_more() {
            self.close_rows()?;
            self.current = None;
            self.row_nr = 0;
            return Ok(None);
        }
        match rows.fetch_row()? {
            Some(row) => {
                let mut record = self.prototype.clone();
                record.reset_values();
                record.load_from_row(&row)?;
                self.row_nr += 1;
                self.consumed = true;
                self.current = Some(record);
                Ok(self.current.as_ref())
            }
            None => {
                self.close_rows()?;
                self.current = None;
                self.row_nr = 0;
                Ok(None)
            }
        }
    }

    pub fn current(&self) -> Option<&R> {
        self.current.as_ref()
    }

    /// Zero-based position of the current record, `None` when not on one.
    pub fn key(&self) -> Option<u64> {
        self.current.as_ref().and_then(|_| self.row_nr.checked_sub(1))
    }

    pub fn valid(&self) -> bool {
        self.current.is_some()
    }

    /// Driver-reported size of the result set, fetched on demand and cached
    /// for the life of the cursor. `Ok(None)` when the driver cannot report
    /// one; never a silent zero.
    pub fn count(&mut self) -> Result<Option<u64>> {
        if self.rows.is_none() {
            self.fetch()?;
        }
        if self.count.is_none() {
            self.count = self.rows.as_ref().and_then(|rows| rows.row_count());
        }
        Ok(self.count)
    }

    /// Drop the cursor; the next access re-executes.
    pub fn clear(&mut self) -> Result<()> {
        self.close_rows()?;
        self.rows = None;
        self.rows_closed = false;
        self.current = None;
        self.row_nr = 0;
        self.consumed = false;
        self.count = None;
        Ok(())
    }

    fn close_rows(&mut self) -> Result<()> {
        if let Some(rows) = &mut self.rows {
            if !self.rows_closed {
                rows.close()?;
                self.rows_closed = true;
            }
        }
        Ok(())
    }
}
