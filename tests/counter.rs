use cistern::{RecordCounter, Value};

mod common;
use common::{test_record, test_rows, ProbeConnection};

#[test]
fn counts_without_materializing_records() {
    let mut conn = ProbeConnection::with_rows(test_rows(7));
    let log = conn.log();
    let mut counter = RecordCounter::new(&mut conn, test_record());
    assert_eq!(counter.count().unwrap(), 7);
    assert_eq!(
        log.borrow()[0].sql,
        r#"SELECT COUNT(*) AS resultcount FROM "tabletest""#
    );
}

#[test]
fn example_fields_filter_the_count() {
    let mut conn = ProbeConnection::with_rows(test_rows(7));
    let log = conn.log();
    let mut prototype = test_record();
    prototype.set_value("name", "name1").unwrap();
    let mut counter = RecordCounter::new(&mut conn, prototype);
    counter.fetch().unwrap();
    let executed = &log.borrow()[0];
    assert_eq!(
        executed.sql,
        r#"SELECT COUNT(*) AS resultcount FROM "tabletest" WHERE "name" = ?"#
    );
    assert_eq!(executed.values, vec![Value::Varchar(Some("name1".into()))]);
}

#[test]
fn count_is_cached_until_cleared() {
    let mut conn = ProbeConnection::with_rows(test_rows(3));
    let log = conn.log();
    let mut counter = RecordCounter::new(&mut conn, test_record());
    counter.count().unwrap();
    counter.count().unwrap();
    assert_eq!(log.borrow().len(), 1);
    counter.clear();
    counter.count().unwrap();
    assert_eq!(log.borrow().len(), 2);
}

#[test]
fn changing_the_extra_sql_invalidates_the_cache() {
    let mut conn = ProbeConnection::with_rows(test_rows(3));
    let log = conn.log();
    let mut counter = RecordCounter::new(&mut conn, test_record());
    counter.count().unwrap();
    counter.set_extra("GROUP BY name");
    counter.count().unwrap();
    let log = log.borrow();
    assert_eq!(log.len(), 2);
    assert_eq!(
        log[1].sql,
        r#"SELECT COUNT(*) AS resultcount FROM "tabletest" WHERE 1 GROUP BY name"#
    );
}
