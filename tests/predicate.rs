use cistern::{
    BoolOperator, FieldValue, GenericSqlWriter, MultiOperator, Operator, Predicate, Value,
};

#[test]
fn in_requires_at_least_one_value() {
    assert!(Predicate::multi(Vec::new(), MultiOperator::In).is_err());
    assert!(Predicate::multi(vec![Value::Int32(Some(1))], MultiOperator::In).is_ok());
}

#[test]
fn between_requires_exactly_two_values() {
    assert!(Predicate::multi(vec![Value::Int32(Some(1))], MultiOperator::Between).is_err());
    assert!(Predicate::multi(
        vec![Value::Int32(Some(1)), Value::Int32(Some(2)), Value::Int32(Some(3))],
        MultiOperator::Between,
    )
    .is_err());
    assert!(Predicate::multi(
        vec![Value::Int32(Some(1)), Value::Int32(Some(2))],
        MultiOperator::Between,
    )
    .is_ok());
}

#[test]
fn in_renders_parenthesized_placeholders() {
    let predicate = Predicate::multi(
        vec![
            Value::Int32(Some(1)),
            Value::Int32(Some(2)),
            Value::Int32(Some(3)),
        ],
        MultiOperator::In,
    )
    .unwrap();
    let mut fragment = String::new();
    predicate.write_fragment(&mut fragment).unwrap();
    assert_eq!(fragment, "(?,?,?)");
    assert_eq!(predicate.operator_sql().unwrap(), "IN");
    assert_eq!(predicate.placeholder_values().len(), 3);
}

#[test]
fn between_renders_two_placeholders() {
    let predicate = Predicate::multi(
        vec![Value::Int32(Some(10)), Value::Int32(Some(20))],
        MultiOperator::Between,
    )
    .unwrap();
    let mut fragment = String::new();
    predicate.write_fragment(&mut fragment).unwrap();
    assert_eq!(fragment, "? AND ?");
    assert_eq!(predicate.operator_sql().unwrap(), "BETWEEN");
}

#[test]
fn empty_group_is_refused() {
    assert!(Predicate::group(Vec::new(), BoolOperator::And).is_err());
}

#[test]
fn group_has_no_flat_fragment() {
    let group = Predicate::group(
        vec![FieldValue::scalar(1), FieldValue::scalar(2)],
        BoolOperator::Or,
    )
    .unwrap();
    let mut fragment = String::new();
    assert!(group.write_fragment(&mut fragment).is_err());
    assert!(group.operator_sql().is_err());
}

#[test]
fn placeholders_match_values_for_every_flat_variant() {
    let predicates = [
        Predicate::raw("NOW()"),
        Predicate::equals("x"),
        Predicate::compare(5, Operator::Greater),
        Predicate::call("sha1", "secret"),
        Predicate::multi(
            vec![Value::Varchar(Some("a".into())), Value::Varchar(Some("b".into()))],
            MultiOperator::In,
        )
        .unwrap(),
        Predicate::multi(
            vec![Value::Int32(Some(1)), Value::Int32(Some(9))],
            MultiOperator::Between,
        )
        .unwrap(),
    ];
    for predicate in &predicates {
        let mut fragment = String::new();
        predicate.write_fragment(&mut fragment).unwrap();
        let placeholders = fragment.bytes().filter(|b| *b == b'?').count();
        assert_eq!(placeholders, predicate.placeholder_values().len());
    }
}

#[test]
fn substitution_quotes_the_bound_values() {
    let writer = GenericSqlWriter::new();
    let predicate = Predicate::call("sha1", "it's");
    let mut out = String::new();
    predicate.write_substituted(&writer, &mut out).unwrap();
    assert_eq!(out, "sha1('it''s')");
}

#[test]
fn substitution_refuses_stray_placeholders_in_raw_sql() {
    let writer = GenericSqlWriter::new();
    // a raw expression declares no values, so a ? inside it can never be
    // bound and must be rejected
    let predicate = Predicate::raw("COALESCE(?, 0)");
    let mut out = String::new();
    assert!(predicate.write_substituted(&writer, &mut out).is_err());
}

#[test]
fn raw_sql_is_rendered_verbatim() {
    let writer = GenericSqlWriter::new();
    let predicate = Predicate::raw_with("NOW()", Operator::GreaterEqual);
    let mut out = String::new();
    predicate.write_substituted(&writer, &mut out).unwrap();
    assert_eq!(out, "NOW()");
    assert_eq!(predicate.operator_sql().unwrap(), ">=");
}
