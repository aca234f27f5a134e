use crate::{Connection, Result};

/// Deferred accumulation of insert value tuples, merged into one multi-row
/// statement per statement shape on flush.
///
/// Buffered rows live in process memory only: whoever owns the buffer must
/// flush it before the end of its unit of work or the rows are silently
/// lost. Nothing is flushed on drop.
pub trait InsertBuffer {
    /// Queue one fully-quoted `(v1,v2,...)` tuple under the exact
    /// `INSERT INTO t (cols) VALUES ` prefix it belongs to. Different column
    /// sets produce different prefixes and therefore distinct buffers.
    fn buffer_insert(&mut self, prefix: &str, tuple: String);

    /// Number of tuples currently pending for a prefix.
    fn pending_rows(&self, prefix: &str) -> usize;

    /// Execute and clear the pending statement for one prefix.
    fn flush_prefix(&mut self, conn: &mut dyn Connection, prefix: &str) -> Result<()>;

    /// Execute and clear every pending statement. Statements already
    /// executed stay flushed if a later one fails.
    fn flush_all(&mut self, conn: &mut dyn Connection) -> Result<()>;
}

/// In-memory [`InsertBuffer`], one pending tuple list per statement prefix
/// in first-use order.
#[derive(Default, Debug)]
pub struct BatchBuffer {
    pending: Vec<(String, Vec<String>)>,
}

impl BatchBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    fn execute(conn: &mut dyn Connection, prefix: &str, tuples: &[String]) -> Result<()> {
        let mut sql = String::with_capacity(prefix.len() + tuples.iter().map(String::len).sum::<usize>());
        sql.push_str(prefix);
        sql.push_str(&tuples.join(","));
        log::debug!("BatchBuffer: flushing {} rows into {}", tuples.len(), prefix);
        let mut rows = conn.execute(&sql, &[])?;
        rows.close()?;
        Ok(())
    }
}

impl InsertBuffer for BatchBuffer {
    fn buffer_insert(&mut self, prefix: &str, tuple: String) {
        match self.pending.iter_mut().find(|(p, _)| p == prefix) {
            Some((_, tuples)) => tuples.push(tuple),
            None => self.pending.push((prefix.to_owned(), vec![tuple])),
        }
    }

    fn pending_rows(&self, prefix: &str) -> usize {
        self.pending
            .iter()
            .find(|(p, _)| p == prefix)
            .map(|(_, tuples)| tuples.len())
            .unwrap_or(0)
    }

    fn flush_prefix(&mut self, conn: &mut dyn Connection, prefix: &str) -> Result<()> {
        let Some(position) = self.pending.iter().position(|(p, _)| p == prefix) else {
            return Ok(());
        };
        let (prefix, tuples) = self.pending.remove(position);
        Self::execute(conn, &prefix, &tuples)
    }

    fn flush_all(&mut self, conn: &mut dyn Connection) -> Result<()> {
        while !self.pending.is_empty() {
            let (prefix, tuples) = self.pending.remove(0);
            Self::execute(conn, &prefix, &tuples)?;
        }
        Ok(())
    }
}
