use crate::{Result, RowSource, SqlWriter, Value};

/// Handle to the underlying store.
///
/// Everything in this crate runs in-process and blocking against this
/// abstraction; the physical driver behind it is supplied by the embedding
/// application. Object safe so components can hold `&mut dyn Connection`.
pub trait Connection {
    /// The dialect writer used for identifier and literal quoting.
    fn writer(&self) -> &dyn SqlWriter;

    /// Execute a statement with `?` placeholders bound to `values` and
    /// return a forward-only cursor over its results.
    fn execute(&mut self, sql: &str, values: &[Value]) -> Result<Box<dyn RowSource>>;

    /// Execute limiting the result window. `None` leaves the corresponding
    /// bound open.
    fn execute_ranged(
        &mut self,
        sql: &str,
        limit: Option<u32>,
        offset: Option<u32>,
        values: &[Value],
    ) -> Result<Box<dyn RowSource>>;

    /// Identifier generated by the most recent auto-increment insert, when
    /// the driver tracks one. Undefined while inserts are being batched.
    fn last_insert_id(&mut self) -> Result<Option<i64>>;
}
