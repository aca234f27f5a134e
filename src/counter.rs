use crate::{count_by_example, Connection, Record, Result};

/// Counts the records matching an example without materializing any of them.
///
/// The count runs lazily on first access and is cached until [`clear`].
///
/// [`clear`]: RecordCounter::clear
pub struct RecordCounter<'c, C, R>
where
    C: Connection + ?Sized,
    R: Record,
{
    conn: &'c mut C,
    prototype: R,
    extra: String,
    count: Option<u64>,
}

impl<'c, C, R> RecordCounter<'c, C, R>
where
    C: Connection + ?Sized,
    R: Record,
{
    pub fn new(conn: &'c mut C, prototype: R) -> Self {
        Self {
            conn,
            prototype,
            extra: String::new(),
            count: None,
        }
    }

    /// Raw SQL appended after the WHERE clause. Invalidates the cache.
    pub fn set_extra(&mut self, extra: &str) {
        self.extra = extra.to_owned();
        self.count = None;
    }

    /// Run the count query now.
    pub fn fetch(&mut self) -> Result<()> {
        self.count = Some(count_by_example(
            &mut *self.conn,
            &self.prototype,
            &self.extra,
        )?);
        Ok(())
    }

    pub fn count(&mut self) -> Result<u64> {
        if self.count.is_none() {
            self.fetch()?;
        }
        Ok(self.count.unwrap_or(0))
    }

    pub fn clear(&mut self) {
        self.count = None;
    }
}
