//! Integration tests exercising the column pipeline end to end, the way
//! the schema/model layer drives it.

use chrono::{TimeZone, Utc};
use cqlmap_core::{cql_quote, Column, DbValue, Error, Value, ValueManager};

/// Build the columns a small model would declare, with names assigned
/// the way the schema layer assigns them.
fn model_columns() -> Vec<Column> {
    let mut id = Column::uuid().primary_key();
    id.set_column_name("id");
    id.set_partition_key();

    let mut name = Column::text().with_max_length(64);
    name.set_column_name("name");

    let mut created = Column::datetime().optional();
    created.set_column_name("created");

    let mut tags = Column::set(Column::text(), false).unwrap();
    tags.set_column_name("tags");

    let mut scores = Column::map(Column::text(), Column::integer()).unwrap();
    scores.set_column_name("scores");

    vec![id, name, created, tags, scores]
}

#[test]
fn test_schema_assembly_from_fragments() {
    let columns = model_columns();
    let fragments: Vec<String> = columns.iter().map(|c| c.get_schema_fragment()).collect();
    assert_eq!(
        fragments,
        vec![
            "id uuid",
            "name text",
            "created timestamp",
            "tags set<text>",
            "scores map<text, int>",
        ]
    );

    let indexed: Vec<String> = columns
        .iter()
        .filter(|c| c.is_indexed())
        .map(|c| c.db_index_name())
        .collect();
    assert!(indexed.is_empty());
}

#[test]
fn test_declaration_order_matches_declaration_sequence() {
    let columns = model_columns();
    for pair in columns.windows(2) {
        assert!(pair[0].position() < pair[1].position());
    }
}

#[test]
fn test_instance_lifecycle_through_accessors() {
    let columns = model_columns();
    let mut managers: Vec<ValueManager> = columns
        .iter()
        .map(|_| ValueManager::new(Value::Null))
        .collect();

    // Write through the accessors.
    let name_accessor = columns[1].accessor();
    name_accessor.set(&mut managers[1], Value::Text("widget".into()));
    assert_eq!(name_accessor.get(&managers[1]), &Value::Text("widget".into()));

    // Primary key accessor refuses deletion.
    let id_accessor = columns[0].accessor();
    assert!(matches!(
        id_accessor.delete(&mut managers[0]),
        Err(Error::Validation(_))
    ));

    // Regular columns delete fine.
    name_accessor.delete(&mut managers[1]).unwrap();
    assert!(managers[1].deleted());
}

#[test]
fn test_missing_values_resolve_like_a_write_path() {
    let columns = model_columns();

    // id generates its default.
    assert!(matches!(
        columns[0].validate(Value::Null).unwrap(),
        Value::Uuid(_)
    ));
    // name is required with no default.
    assert!(columns[1].validate(Value::Null).is_err());
    // created is optional.
    assert_eq!(columns[2].validate(Value::Null).unwrap(), Value::Null);
}

#[test]
fn test_scalar_round_trips() {
    let col = Column::integer();
    let v = col.validate(Value::Text("42".into())).unwrap();
    assert_eq!(v, Value::Int(42));
    let db = col.to_database(v).unwrap();
    assert_eq!(col.to_python(Value::Int(42)).unwrap(), Value::Int(42));
    assert_eq!(db, DbValue::Int(42));

    let col = Column::float();
    let v = col.validate(Value::Text("2.5".into())).unwrap();
    assert_eq!(col.to_database(v).unwrap(), DbValue::Double(2.5));

    let col = Column::boolean();
    assert_eq!(col.to_python(Value::Int(3)).unwrap(), Value::Bool(true));
    assert_eq!(
        col.to_database(Value::Bool(false)).unwrap(),
        DbValue::Bool(false)
    );
}

#[test]
fn test_datetime_round_trip() {
    let col = Column::datetime();
    let instant = Utc.with_ymd_and_hms(1970, 1, 1, 0, 0, 1).unwrap();
    assert_eq!(
        col.to_database(Value::DateTime(instant)).unwrap(),
        DbValue::Timestamp(1000)
    );
    // Stored epoch seconds decode back to the same instant.
    assert_eq!(
        col.to_python(Value::Int(1)).unwrap(),
        Value::DateTime(instant)
    );
    assert!(col.to_database(Value::Text("soon".into())).is_err());
    // Fractional epoch seconds must be finite to decode.
    assert!(col.to_python(Value::Double(f64::NAN)).is_err());
}

#[test]
fn test_bytes_round_trip_and_hex_literal() {
    let col = Column::bytes();
    let v = col.validate(Value::Bytes(vec![0xca, 0xfe])).unwrap();
    assert_eq!(v, Value::Bytes(vec![0xca, 0xfe]));

    let db = col.to_database(v.clone()).unwrap();
    assert_eq!(db, DbValue::Bytes(vec![0xca, 0xfe]));
    assert_eq!(cql_quote(&db), "0xcafe");
    assert_eq!(col.to_python(v.clone()).unwrap(), v);

    assert!(col.to_database(Value::Int(1)).is_err());
}

#[test]
fn test_ascii_round_trip() {
    let col = Column::ascii();
    let v = col.validate(Value::Text("plain".into())).unwrap();
    assert_eq!(v, Value::Text("plain".into()));
    assert_eq!(col.to_database(v.clone()).unwrap(), DbValue::Text("plain".into()));
    assert_eq!(col.to_python(v.clone()).unwrap(), v);
}

#[test]
fn test_decimal_numeric_pass_through() {
    let col = Column::decimal();

    let v = col.validate(Value::Double(1.25)).unwrap();
    assert_eq!(v, Value::Double(1.25));
    assert_eq!(col.to_database(v.clone()).unwrap(), DbValue::Double(1.25));
    assert_eq!(col.to_python(v.clone()).unwrap(), v);

    let v = col.validate(Value::Int(10)).unwrap();
    assert_eq!(col.to_database(v).unwrap(), DbValue::Int(10));

    assert!(col.to_database(Value::Bool(true)).is_err());
}

#[test]
fn test_json_round_trip_with_representation_change() {
    let col = Column::json();
    let doc = Value::Json(serde_json::json!({"a": [1, 2], "b": "x"}));
    let db = col.to_database(doc.clone()).unwrap();
    let text = match db {
        DbValue::Text(s) => s,
        other => panic!("expected text, got {:?}", other),
    };
    assert!(!text.contains(' '));
    assert_eq!(col.to_python(Value::Text(text)).unwrap(), doc);
}

#[test]
fn test_uuid_round_trip() {
    let col = Column::uuid();
    let parsed = col
        .validate(Value::Text("123e4567-e89b-12d3-a456-426614174000".into()))
        .unwrap();
    let expected = uuid::Uuid::parse_str("123e4567-e89b-12d3-a456-426614174000").unwrap();
    assert_eq!(parsed, Value::Uuid(expected));
    assert_eq!(
        col.to_database(parsed.clone()).unwrap(),
        DbValue::Uuid(expected)
    );
    assert_eq!(col.to_python(parsed.clone()).unwrap(), parsed);

    assert!(col.validate(Value::Text("not-a-uuid".into())).is_err());
}

#[test]
fn test_container_literals_in_statement_position() {
    let tags = Column::set(Column::text(), false).unwrap();
    let db = tags
        .to_database(Value::Set(vec![Value::Text("a'b".into())]))
        .unwrap();
    assert_eq!(cql_quote(&db), "{'a''b'}");

    let items = Column::list(Column::integer()).unwrap();
    let db = items
        .to_database(Value::List(vec![Value::Int(3), Value::Int(1), Value::Int(2)]))
        .unwrap();
    assert_eq!(cql_quote(&db), "[3, 1, 2]");

    let scores = Column::map(Column::text(), Column::integer()).unwrap();
    let db = scores
        .to_database(Value::Map(vec![
            (Value::Text("a".into()), Value::Int(1)),
            (Value::Text("b".into()), Value::Int(2)),
        ]))
        .unwrap();
    assert_eq!(cql_quote(&db), "{'a':1, 'b':2}");
}

#[test]
fn test_map_to_python_decodes_both_sides() {
    let col = Column::map(Column::text(), Column::datetime()).unwrap();
    let decoded = col
        .to_python(Value::Map(vec![(Value::Text("at".into()), Value::Int(1))]))
        .unwrap();
    assert_eq!(
        decoded,
        Value::Map(vec![(
            Value::Text("at".into()),
            Value::DateTime(Utc.with_ymd_and_hms(1970, 1, 1, 0, 0, 1).unwrap())
        )])
    );
}

#[test]
fn test_counter_is_rejected_at_declaration() {
    assert!(matches!(Column::counter(), Err(Error::NotSupported(_))));
}
