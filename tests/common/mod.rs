#![allow(dead_code)]

use cistern::{
    Connection, Error, FieldMapper, GenericSqlWriter, Result, Row, RowLabeled, RowNames,
    RowSource, SqlWriter, TableRecord, Value,
};
use std::cell::RefCell;
use std::rc::Rc;
use std::sync::Arc;

pub fn init_logs() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// One statement as the probe connection received it.
#[derive(Debug, Clone, PartialEq)]
pub struct Executed {
    pub sql: String,
    pub values: Vec<Value>,
    pub limit: Option<u32>,
    pub offset: Option<u32>,
}

pub type QueryLog = Rc<RefCell<Vec<Executed>>>;

/// Scripted in-memory connection. Serves the canned `rows` to any SELECT
/// (windowed by the ranged variant), answers `SELECT COUNT(*)` statements
/// from `total`, and records every statement it executes.
pub struct ProbeConnection {
    writer: GenericSqlWriter,
    pub rows: Vec<RowLabeled>,
    pub total: u64,
    pub report_row_count: bool,
    pub insert_id: Option<i64>,
    /// Zero-based row index at which every served cursor starts failing.
    pub fail_on_row: Option<usize>,
    log: QueryLog,
    closes: Rc<RefCell<usize>>,
}

impl ProbeConnection {
    pub fn new() -> Self {
        Self::with_rows(Vec::new())
    }

    pub fn with_rows(rows: Vec<RowLabeled>) -> Self {
        Self {
            writer: GenericSqlWriter::new(),
            total: rows.len() as u64,
            rows,
            report_row_count: true,
            insert_id: None,
            fail_on_row: None,
            log: Rc::new(RefCell::new(Vec::new())),
            closes: Rc::new(RefCell::new(0)),
        }
    }

    /// Handle to the statement log, usable while the connection is borrowed.
    pub fn log(&self) -> QueryLog {
        self.log.clone()
    }

    /// Number of cursors closed so far, usable while the connection is
    /// borrowed.
    pub fn closes(&self) -> Rc<RefCell<usize>> {
        self.closes.clone()
    }

    fn serve(&mut self, sql: &str, limit: Option<u32>, offset: Option<u32>) -> ProbeRows {
        let rows = if sql.starts_with("SELECT COUNT(*)") {
            vec![row(&[("resultcount", Value::UInt64(Some(self.total)))])]
        } else if sql.starts_with("SELECT") {
            let skip = offset.unwrap_or(0) as usize;
            let take = limit.map(|l| l as usize).unwrap_or(usize::MAX);
            self.rows.iter().skip(skip).take(take).cloned().collect()
        } else {
            Vec::new()
        };
        let count = self.report_row_count.then(|| rows.len() as u64);
        ProbeRows {
            rows,
            next: 0,
            count,
            fail_on: self.fail_on_row,
            closes: self.closes.clone(),
        }
    }
}

impl Connection for ProbeConnection {
    fn writer(&self) -> &dyn SqlWriter {
        &self.writer
    }

    fn execute(&mut self, sql: &str, values: &[Value]) -> Result<Box<dyn RowSource>> {
        self.log.borrow_mut().push(Executed {
            sql: sql.to_owned(),
            values: values.to_vec(),
            limit: None,
            offset: None,
        });
        Ok(Box::new(self.serve(sql, None, None)))
    }

    fn execute_ranged(
        &mut self,
        sql: &str,
        limit: Option<u32>,
        offset: Option<u32>,
        values: &[Value],
    ) -> Result<Box<dyn RowSource>> {
        self.log.borrow_mut().push(Executed {
            sql: sql.to_owned(),
            values: values.to_vec(),
            limit,
            offset,
        });
        Ok(Box::new(self.serve(sql, limit, offset)))
    }

    fn last_insert_id(&mut self) -> Result<Option<i64>> {
        Ok(self.insert_id)
    }
}

pub struct ProbeRows {
    rows: Vec<RowLabeled>,
    next: usize,
    count: Option<u64>,
    fail_on: Option<usize>,
    closes: Rc<RefCell<usize>>,
}

impl RowSource for ProbeRows {
    fn has_more(&self) -> bool {
        self.next < self.rows.len()
    }

    fn fetch_row(&mut self) -> Result<Option<RowLabeled>> {
        if self.fail_on == Some(self.next) {
            return Err(Error::msg("scripted cursor failure"));
        }
        match self.rows.get(self.next) {
            Some(row) => {
                self.next += 1;
                Ok(Some(row.clone()))
            }
            None => Ok(None),
        }
    }

    fn row_count(&self) -> Option<u64> {
        self.count
    }

    fn close(&mut self) -> Result<()> {
        *self.closes.borrow_mut() += 1;
        Ok(())
    }
}

pub fn row(columns: &[(&str, Value)]) -> RowLabeled {
    let labels: RowNames = columns
        .iter()
        .map(|(name, _)| (*name).to_owned())
        .collect::<Vec<_>>()
        .into();
    let values: Row = columns.iter().map(|(_, v)| v.clone()).collect();
    RowLabeled::new(labels, values)
}

pub fn test_mapper() -> Arc<FieldMapper> {
    Arc::new(
        FieldMapper::new("tabletest")
            .field("id", "id")
            .field("name", "name")
            .field("updated", "updated")
            .key("id"),
    )
}

pub fn test_record() -> TableRecord {
    TableRecord::new(test_mapper()).unwrap()
}

/// `count` rows with ids `1..=count` and names `name1..`.
pub fn test_rows(count: u32) -> Vec<RowLabeled> {
    (1..=count)
        .map(|i| {
            row(&[
                ("id", Value::Int32(Some(i as i32))),
                ("name", Value::Varchar(Some(format!("name{i}")))),
                ("updated", Value::Varchar(Some(format!("2026-01-{:02}", i % 28 + 1)))),
            ])
        })
        .collect()
}
