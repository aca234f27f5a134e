use crate::{
    separated_by, Connection, Error, FieldMapper, Record, Result, RowSource, SqlWhere, SqlWriter,
    Value,
};

/// Compile the WHERE clause of a query-by-example: one condition per field
/// currently set on `record`, in declaration order.
pub fn where_by_example<R: Record>(writer: &dyn SqlWriter, record: &R) -> Result<SqlWhere> {
    let mapper = record.mapper();
    let fields = record.set_values();
    let pairs = fields
        .iter()
        .map(|(field, value)| {
            let column = mapper.column_of(field).ok_or_else(|| {
                Error::msg(format!(
                    "where_by_example: field {:?} is not mapped for table {:?}",
                    field,
                    mapper.table()
                ))
            })?;
            Ok((column, *value))
        })
        .collect::<Result<Vec<_>>>()?;
    SqlWhere::build(writer, pairs)
}

/// Render a SELECT over all mapped columns in declaration order.
///
/// When there is no condition but an extra suffix (e.g. `ORDER BY name`) is
/// present, a vacuous `WHERE 1` keeps the suffix after a valid clause
/// boundary.
pub fn build_select(
    writer: &dyn SqlWriter,
    mapper: &FieldMapper,
    clause: &SqlWhere,
    extra: &str,
) -> String {
    let mut out = String::with_capacity(128);
    out.push_str("SELECT ");
    separated_by(
        &mut out,
        mapper.fields(),
        |out, (_, column)| writer.write_identifier_quoted(out, column),
        ", ",
    );
    out.push_str(" FROM ");
    writer.write_identifier_quoted(&mut out, mapper.table());
    push_where(&mut out, clause, extra);
    out
}

/// Render the count form of the same query: `SELECT COUNT(*)` instead of the
/// column list, ignoring any limit/offset window.
pub fn build_count(
    writer: &dyn SqlWriter,
    mapper: &FieldMapper,
    clause: &SqlWhere,
    extra: &str,
) -> String {
    let mut out = String::with_capacity(128);
    out.push_str("SELECT COUNT(*) AS resultcount FROM ");
    writer.write_identifier_quoted(&mut out, mapper.table());
    push_where(&mut out, clause, extra);
    out
}

fn push_where(out: &mut String, clause: &SqlWhere, extra: &str) {
    if !clause.is_empty() {
        out.push_str(" WHERE ");
        out.push_str(&clause.text);
    } else if !extra.is_empty() {
        out.push_str(" WHERE 1");
    }
    if !extra.is_empty() {
        out.push(' ');
        out.push_str(extra);
    }
}

/// Execute the query-by-example SELECT and return its cursor.
pub fn query_by_example<C, R>(
    conn: &mut C,
    record: &R,
    extra: &str,
    limit: Option<u32>,
    offset: Option<u32>,
) -> Result<Box<dyn RowSource>>
where
    C: Connection + ?Sized,
    R: Record,
{
    let clause = where_by_example(conn.writer(), record)?;
    let sql = build_select(conn.writer(), record.mapper(), &clause, extra);
    if limit.is_none() && offset.is_none() {
        conn.execute(&sql, &clause.values)
    } else {
        conn.execute_ranged(&sql, limit, offset, &clause.values)
    }
}

/// Execute the count form of the query-by-example and read the result.
pub fn count_by_example<C, R>(conn: &mut C, record: &R, extra: &str) -> Result<u64>
where
    C: Connection + ?Sized,
    R: Record,
{
    let clause = where_by_example(conn.writer(), record)?;
    let sql = build_count(conn.writer(), record.mapper(), &clause, extra);
    let mut rows = conn.execute(&sql, &clause.values)?;
    let fetched = rows.fetch_row();
    let closed = rows.close();
    let row = fetched?;
    closed?;
    let row = row.ok_or_else(|| {
        Error::msg(format!(
            "count_by_example: count query returned no rows for table {:?}",
            record.mapper().table()
        ))
    })?;
    let value = row.get_column("resultcount").ok_or_else(|| {
        Error::msg("count_by_example: count query result has no resultcount column")
    })?;
    value_as_count(value)
}

fn value_as_count(value: &Value) -> Result<u64> {
    match value {
        Value::Int8(Some(v)) => Ok(*v as u64),
        Value::Int16(Some(v)) => Ok(*v as u64),
        Value::Int32(Some(v)) => Ok(*v as u64),
        Value::Int64(Some(v)) => Ok(*v as u64),
        Value::Int128(Some(v)) => Ok(*v as u64),
        Value::UInt8(Some(v)) => Ok(*v as u64),
        Value::UInt16(Some(v)) => Ok(*v as u64),
        Value::UInt32(Some(v)) => Ok(*v as u64),
        Value::UInt64(Some(v)) => Ok(*v),
        Value::UInt128(Some(v)) => Ok(*v as u64),
        other => Err(Error::msg(format!(
            "count_by_example: unexpected count value {:?}",
            other
        ))),
    }
}

/// Fetch a single record matching the fields currently set on `record` and
/// populate it in place. `Ok(false)` when no field is set or nothing matched.
pub fn load_from_table<C, R>(record: &mut R, conn: &mut C) -> Result<bool>
where
    C: Connection + ?Sized,
    R: Record,
{
    if record.set_values().is_empty() {
        // no where fields supplied
        return Ok(false);
    }
    let mut rows = query_by_example(conn, record, "", Some(1), None)?;
    let fetched = rows.fetch_row();
    let more = rows.has_more();
    let closed = rows.close();
    let row = fetched?;
    closed?;
    match row {
        Some(row) => {
            record.load_from_row(&row)?;
            if more {
                log::warn!(
                    "load_from_table: more than one record was found in {:?}, additional records are ignored",
                    record.mapper().table()
                );
            }
            log::debug!("load_from_table: loaded one record from {:?}", record.mapper().table());
            Ok(true)
        }
        None => Ok(false),
    }
}
