//! Cross-crate flows: what a grid does between fetching rows and exporting
//! them.

use omniquery::{
    codec, compile_filters, create_filter, flatten, id_field, infer_column_type,
    is_filter_empty, parse_json, primary_key_projection, split_statements, to_sql, unflatten,
    validate_all, BackendType, CompiledQuery, FilterInput, FlattenOptions, JsonImportOptions,
    Logic, Scalar, SequentialIds, SkipReason, SqlExportOptions, ValueType,
};
use serde_json::{json, Value};

#[test]
fn mongo_documents_to_sql_inserts() {
    let input = r#"{"data": [
        {"_id": {"$oid": "507f1f77bcf86cd799439011"}, "name": "Ada", "joined": {"$date": "2024-01-02T03:04:05Z"}},
        {"_id": {"$oid": "507f1f77bcf86cd799439012"}, "name": "O'Hara"}
    ]}"#;
    let imported = parse_json(input, &JsonImportOptions::new().data_path("data")).unwrap();
    assert_eq!(imported.columns, ["_id", "name", "joined"]);

    let ids: Vec<Value> = imported.rows.iter().map(|r| r["_id"].clone()).collect();
    assert_eq!(
        infer_column_type(&ids, 100).primary_type,
        ValueType::ObjectId
    );

    let sql = to_sql(
        &imported.rows,
        &imported.columns,
        &SqlExportOptions::new("people").batch_size(10),
    )
    .unwrap();
    assert_eq!(
        sql,
        "INSERT INTO \"people\" (\"_id\", \"name\", \"joined\") VALUES\n  \
         ('507f1f77bcf86cd799439011', 'Ada', '2024-01-02T03:04:05.000Z'),\n  \
         ('507f1f77bcf86cd799439012', 'O''Hara', NULL);"
    );
    assert_eq!(split_statements(&sql).len(), 1);
}

#[test]
fn drafts_to_document_query() {
    let mut ids = SequentialIds::new("filter");
    let blank = create_filter("age", None, &mut ids);
    assert!(is_filter_empty(&blank));

    let drafts = vec![
        blank,
        FilterInput::new("f2", "age", "greater_than", Scalar::from("30")),
        FilterInput::new("f3", "tags", "in", Scalar::from("a, b,,c")),
    ];
    let (valid, invalid) = validate_all(&drafts);
    assert_eq!(valid.len(), 2);
    assert_eq!(invalid.len(), 1);

    let CompiledQuery::Document(doc) =
        compile_filters(BackendType::MongoDb, &valid, Logic::Or, None)
    else {
        panic!("expected a document query");
    };
    assert_eq!(
        doc.match_stage(),
        json!({"$match": {"$or": [
            {"age": {"$gt": 30}},
            {"tags": {"$in": ["a", "b", "c"]}}
        ]}})
    );
}

#[test]
fn redis_filters_are_reported_not_dropped() {
    let drafts = vec![FilterInput::new("f1", "key", "starts_with", Scalar::from("user:"))];
    let (valid, _) = validate_all(&drafts);
    let compiled = compile_filters(BackendType::Redis, &valid, Logic::And, None);
    assert!(compiled.is_empty());
    assert_eq!(compiled.skipped().len(), 1);
    assert_eq!(compiled.skipped()[0].reason, SkipReason::UnsupportedBackend);
    assert_eq!(id_field(None, BackendType::Redis), "key");
}

#[test]
fn edit_a_nested_field_and_target_the_update() {
    let doc = json!({
        "_id": {"$oid": "65a1b2c3d4e5f6a7b8c9d0e1"},
        "profile": {"name": "Ada", "langs": ["en", "fr"]}
    });
    let mut fields = flatten(&doc, &FlattenOptions::default());
    let lang = fields
        .iter_mut()
        .find(|f| f.path == "profile.langs.1")
        .unwrap();
    lang.value = json!("de");

    let edited = unflatten(&fields);
    assert_eq!(edited["profile"]["langs"], json!(["en", "de"]));

    let target = primary_key_projection(&edited, None, BackendType::MongoDb);
    assert_eq!(
        Value::Object(target),
        json!({"_id": {"$oid": "65a1b2c3d4e5f6a7b8c9d0e1"}})
    );
}

#[test]
fn formatted_scripts_split_back_into_statements() {
    let script = "insert into t (a) values ('x;y'); delete from t where a = 'z'";
    let formatted = codec::format_sql(script, BackendType::Sqlite);
    assert_eq!(
        split_statements(&formatted),
        [
            "INSERT INTO t (a)\nVALUES ('x;y')",
            "DELETE FROM t\nWHERE a = 'z'"
        ]
    );
}
