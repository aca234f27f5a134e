use cistern::{GenericSqlWriter, SqlWriter, Value};
use rust_decimal::Decimal;
use time::macros::{date, datetime, time};

const WRITER: GenericSqlWriter = GenericSqlWriter::new();

fn rendered(value: Value) -> String {
    let mut out = String::new();
    WRITER.write_value(&mut out, &value);
    out
}

#[test]
fn null_renders_for_every_empty_payload() {
    assert_eq!(rendered(Value::Null), "NULL");
    assert_eq!(rendered(Value::Int32(None)), "NULL");
    assert_eq!(rendered(Value::Varchar(None)), "NULL");
    assert_eq!(rendered(Value::Blob(None)), "NULL");
}

#[test]
fn strings_double_inner_quotes() {
    assert_eq!(rendered("o'clock".into()), "'o''clock'");
    assert_eq!(rendered("plain".into()), "'plain'");
}

#[test]
fn identifiers_double_inner_quotes() {
    let mut out = String::new();
    WRITER.write_identifier_quoted(&mut out, r#"odd"name"#);
    assert_eq!(out, r#""odd""name""#);
}

#[test]
fn numbers_render_bare() {
    assert_eq!(rendered((-42i32).into()), "-42");
    assert_eq!(rendered(3.5f64.into()), "3.5");
    assert_eq!(rendered(true.into()), "true");
    assert_eq!(
        rendered(Value::Decimal(Some(Decimal::new(12345, 2)), 10, 2)),
        "123.45"
    );
}

#[test]
fn non_finite_floats_are_cast_from_text()  {
    assert_eq!(rendered(f64::INFINITY.into()), "CAST('inf' AS DOUBLE)");
    assert_eq!(rendered(f64::NAN.into()), "CAST('NaN' AS DOUBLE)");
}

#[test]
fn blobs_render_as_hex_literals() {
    let blob: Box<[u8]> = Box::new([0xAB, 0x00, 0xFF]);
    assert_eq!(rendered(blob.into()), "X'AB00FF'");
}

#[test]
fn temporal_values_are_quoted() {
    assert_eq!(rendered(date!(2026 - 08 - 24).into()), "'2026-08-24'");
    assert_eq!(rendered(time!(09:05:00).into()), "'09:05:00'");
    assert_eq!(
        rendered(datetime!(2026-08-24 09:05:01.25).into()),
        "'2026-08-24 09:05:01.25'"
    );
    assert_eq!(
        rendered(datetime!(2026-08-24 09:05:01 +02:00).into()),
        "'2026-08-24 09:05:01+02:00'"
    );
}
