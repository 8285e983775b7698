use pretty_assertions::assert_eq;
use quarry_core::{
    schema::{Column, ColumnDef, Schema, Table, TableDef},
    stmt::{CrudKind, CrudRequest, InsertDefaults, ParamSource, Value, ValueRecord},
};
use quarry_sql::{CompileOptions, Serializer};

fn schema() -> Schema {
    Schema::builder()
        .table(
            TableDef::new("widget")
                .column(ColumnDef::new("id", "int").primary_key(0).auto_increment())
                .column(ColumnDef::new("name", "text"))
                .column(ColumnDef::new("status", "text").has_default())
                .column(ColumnDef::new("version", "int").concurrency_token()),
        )
        .table(
            TableDef::new("stamped")
                .column(ColumnDef::new("id", "int").primary_key(0))
                .column(ColumnDef::new("body", "text"))
                .column(
                    ColumnDef::new("stamp", "int")
                        .nullable()
                        .concurrency_token(),
                ),
        )
        .table(TableDef::new("keyless").column(ColumnDef::new("value", "int")))
        .table(TableDef::new("only_key").column(ColumnDef::new("id", "int").primary_key(0)))
        .build()
        .unwrap()
}

fn request(schema: &Schema, kind: CrudKind, table: &str) -> CrudRequest {
    CrudRequest::for_table(schema, kind, table).unwrap()
}

#[test]
fn insert_sqlite() {
    let schema = schema();
    let stmt = Serializer::sqlite(&schema)
        .compile_crud(&request(&schema, CrudKind::Insert, "widget"))
        .unwrap();

    assert_eq!(
        stmt.sql(),
        concat!(
            r#"INSERT INTO "widget" ("name", "version") VALUES (@p0, @p1);"#,
            "\n",
            r#"SELECT t0."id", t0."name", t0."status", t0."version" FROM "widget" AS t0 WHERE t0."id" = last_insert_rowid();"#,
        )
    );
    assert!(!stmt.rows_affected);
    assert_eq!(stmt.hydrate_columns.len(), 4);
    assert_eq!(stmt.mutated_columns.len(), 2);

    let names: Vec<_> = stmt.params.iter().map(|p| p.name.as_str()).collect();
    assert_eq!(names, ["name", "version"]);
}

#[test]
fn insert_postgresql_returns_columns() {
    let schema = schema();
    let stmt = Serializer::postgresql(&schema)
        .compile_crud(&request(&schema, CrudKind::Insert, "widget"))
        .unwrap();

    assert_eq!(
        stmt.sql(),
        r#"INSERT INTO "widget" ("name", "version") VALUES ($1, $2) RETURNING "id", "name", "status", "version";"#
    );
    assert!(stmt.verify.is_none());
    assert_eq!(stmt.hydrate_columns.len(), 4);
}

#[test]
fn insert_sql_server_reads_back_identity() {
    let schema = schema();
    let stmt = Serializer::sql_server(&schema)
        .compile_crud(&request(&schema, CrudKind::Insert, "widget"))
        .unwrap();

    assert_eq!(
        stmt.sql(),
        concat!(
            "INSERT INTO [widget] ([name], [version]) VALUES (@p0, @p1);\n",
            "SELECT t0.[id], t0.[name], t0.[status], t0.[version] FROM [widget] AS t0 WHERE t0.[id] = SCOPE_IDENTITY();",
        )
    );
}

#[test]
fn insert_with_only_generated_columns() {
    let schema = Schema::builder()
        .table(
            TableDef::new("counter")
                .column(ColumnDef::new("id", "integer").primary_key(0).auto_increment()),
        )
        .build()
        .unwrap();

    let stmt = Serializer::sqlite(&schema)
        .compile_crud(&request(&schema, CrudKind::Insert, "counter"))
        .unwrap();

    assert_eq!(stmt.mutation.sql, r#"INSERT INTO "counter" DEFAULT VALUES;"#);
    assert!(stmt.params.is_empty());
}

#[test]
fn insert_without_primary_key_skips_read_back() {
    let schema = schema();
    let stmt = Serializer::sqlite(&schema)
        .compile_crud(&request(&schema, CrudKind::Insert, "keyless"))
        .unwrap();

    assert_eq!(stmt.sql(), r#"INSERT INTO "keyless" ("value") VALUES (@p0);"#);
    assert!(stmt.hydrate_columns.is_empty());
}

#[test]
fn insert_defaults_policies() {
    let schema = schema();
    let widget = request(&schema, CrudKind::Insert, "widget");

    let always = Serializer::sqlite(&schema)
        .with_options(CompileOptions::new().insert_defaults(InsertDefaults::Always))
        .compile_crud(&widget)
        .unwrap();
    assert!(always
        .mutation
        .sql
        .starts_with(r#"INSERT INTO "widget" ("name", "status", "version")"#));

    let serializer = Serializer::sqlite(&schema)
        .with_options(CompileOptions::new().insert_defaults(InsertDefaults::WhenNonDefault));

    let unset = widget.clone().with_instance(vec![
        Value::I64(0),
        Value::from("w"),
        Value::from(""),
        Value::I64(1),
    ]);
    let stmt = serializer.compile_crud(&unset).unwrap();
    assert!(!stmt.mutation.sql.contains("status"));

    let set = widget.with_instance(vec![
        Value::I64(0),
        Value::from("w"),
        Value::from("archived"),
        Value::I64(1),
    ]);
    let stmt = serializer.compile_crud(&set).unwrap();
    assert!(stmt.mutation.sql.contains(r#""status""#));
}

#[test]
fn insert_defaults_closure_policy() {
    let schema = schema();
    let policy = |_: &Table, column: &Column, _: Option<&ValueRecord>, _: Option<&Value>| {
        column.name == "status"
    };

    let stmt = Serializer::sqlite(&schema)
        .with_options(CompileOptions::new().insert_defaults(policy))
        .compile_crud(&request(&schema, CrudKind::Insert, "widget"))
        .unwrap();
    assert!(stmt.mutation.sql.contains(r#""status""#));
}

#[test]
fn insert_record_width_is_checked() {
    let schema = schema();
    let req = request(&schema, CrudKind::Insert, "widget").with_instance(vec![Value::I64(1)]);

    let err = Serializer::sqlite(&schema).compile_crud(&req).unwrap_err();
    assert!(err.is_invalid_statement());
}

#[test]
fn update_sqlite() {
    let schema = schema();
    let stmt = Serializer::sqlite(&schema)
        .compile_crud(&request(&schema, CrudKind::Update, "widget"))
        .unwrap();

    assert_eq!(
        stmt.mutation.sql,
        r#"UPDATE "widget" SET "name" = @p0, "status" = @p1 WHERE "id" = @p2 AND "version" = @p3;"#
    );
    assert_eq!(
        stmt.verify.as_ref().unwrap().sql,
        r#"SELECT p.rows_affected, t0."id", t0."name", t0."status", t0."version" FROM (SELECT changes() AS rows_affected) AS p LEFT OUTER JOIN "widget" AS t0 ON t0."id" = @p2;"#
    );
    assert!(stmt.rows_affected);
    assert!(!stmt.token_stable_in_transaction);

    let verify = stmt.verify.as_ref().unwrap();
    let verify_params: Vec<_> = stmt.params_of(verify).map(|p| p.name.as_str()).collect();
    assert_eq!(verify_params, ["id"]);
    assert_eq!(stmt.identifier_columns.len(), 2);
}

#[test]
fn update_postgresql_renumbers_each_statement() {
    let schema = schema();
    let stmt = Serializer::postgresql(&schema)
        .compile_crud(&request(&schema, CrudKind::Update, "widget"))
        .unwrap();

    assert_eq!(
        stmt.mutation.sql,
        r#"UPDATE "widget" SET "name" = $1, "status" = $2 WHERE "id" = $3 AND "version" = $4;"#
    );
    assert_eq!(
        stmt.verify.as_ref().unwrap().sql,
        r#"SELECT p.rows_affected, t0."id", t0."name", t0."status", t0."version" FROM (SELECT -1 AS rows_affected) AS p LEFT OUTER JOIN "widget" AS t0 ON t0."id" = $1;"#
    );
    assert!(stmt.token_stable_in_transaction);
}

#[test]
fn nullable_token_matches_null() {
    let schema = schema();
    let stmt = Serializer::sqlite(&schema)
        .compile_crud(&request(&schema, CrudKind::Update, "stamped"))
        .unwrap();

    assert_eq!(
        stmt.mutation.sql,
        r#"UPDATE "stamped" SET "body" = @p0 WHERE "id" = @p1 AND ("stamp" = @p2 OR ("stamp" IS NULL AND @p2 IS NULL));"#
    );

    let stmt = Serializer::postgresql(&schema)
        .compile_crud(&request(&schema, CrudKind::Update, "stamped"))
        .unwrap();
    assert!(stmt
        .mutation
        .sql
        .ends_with(r#"("stamp" = $3 OR ("stamp" IS NULL AND $3 IS NULL));"#));
}

#[test]
fn update_needs_a_writable_column() {
    let schema = schema();
    let err = Serializer::sqlite(&schema)
        .compile_crud(&request(&schema, CrudKind::Update, "only_key"))
        .unwrap_err();

    assert!(err.is_invalid_statement());
    assert_eq!(
        err.to_string(),
        "compiling update on `only_key`: invalid statement: table `only_key` has no columns an update could write"
    );
}

#[test]
fn delete_sql_server() {
    let schema = schema();
    let stmt = Serializer::sql_server(&schema)
        .compile_crud(&request(&schema, CrudKind::Delete, "widget"))
        .unwrap();

    assert_eq!(
        stmt.sql(),
        "DELETE FROM [widget] WHERE [id] = @p0 AND [version] = @p1;\nSELECT @@ROWCOUNT AS rows_affected;"
    );
    assert!(stmt.hydrate_columns.is_empty());

    let verify = stmt.verify.as_ref().unwrap();
    assert_eq!(stmt.params_of(verify).count(), 0);
    assert!(matches!(stmt.params[0].source, ParamSource::Column(_)));
}

#[test]
fn delete_needs_a_primary_key() {
    let schema = schema();
    let err = Serializer::sqlite(&schema)
        .compile_crud(&request(&schema, CrudKind::Delete, "keyless"))
        .unwrap_err();

    assert!(err.is_invalid_statement());
    assert!(err.to_string().contains("has no primary key"));
}
