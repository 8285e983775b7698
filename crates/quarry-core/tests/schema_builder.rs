use pretty_assertions::assert_eq;
use quarry_core::schema::{ColumnDef, ForeignKeyDef, Schema, TableDef};

fn foo() -> TableDef {
    TableDef::new("foo")
        .column(ColumnDef::new("id", "int").primary_key(0).auto_increment())
        .column(ColumnDef::new("nullable_int", "int").nullable())
}

#[test]
fn foreign_keys_resolve_regardless_of_declaration_order() {
    let schema = Schema::builder()
        .table(
            TableDef::new("child_of_foo")
                .column(ColumnDef::new("id", "int").primary_key(0))
                .column(ColumnDef::new("foo_id", "int"))
                .foreign_key(ForeignKeyDef::new("FooId", "foo").column("foo_id", "id")),
        )
        .table(foo())
        .build()
        .unwrap();

    let child = schema.find_table("child_of_foo").unwrap();
    let foo = schema.find_table("foo").unwrap();
    let fk = child.foreign_key_by_name("FooId").unwrap();

    assert_eq!(fk.target, foo.id);
    assert_eq!(fk.source(), child.id);
    assert_eq!(fk.columns.len(), 1);
    assert_eq!(schema.column(fk.columns[0].source).name, "foo_id");
    assert_eq!(schema.column(fk.columns[0].target).name, "id");
}

#[test]
fn duplicate_table_is_rejected() {
    let err = Schema::builder()
        .table(foo())
        .table(foo())
        .build()
        .unwrap_err();

    assert!(err.is_invalid_schema());
    assert_eq!(
        err.to_string(),
        "invalid schema: table `foo` is declared more than once"
    );
}

#[test]
fn same_name_in_two_schemas_requires_qualification() {
    let schema = Schema::builder()
        .table(foo().in_schema("dbo"))
        .table(foo().in_schema("audit"))
        .build()
        .unwrap();

    assert!(schema.find_table("foo").unwrap_err().is_invalid_schema());
    assert_eq!(
        schema.find_table("audit.foo").unwrap().schema.as_deref(),
        Some("audit")
    );
}

#[test]
fn unknown_foreign_key_column_is_a_lookup_error() {
    let err = Schema::builder()
        .table(foo())
        .table(
            TableDef::new("bar")
                .column(ColumnDef::new("id", "int").primary_key(0))
                .foreign_key(ForeignKeyDef::new("Foo", "foo").column("missing", "id")),
        )
        .build()
        .unwrap_err();

    assert!(err.is_schema_lookup());
    assert_eq!(
        err.to_string(),
        "schema lookup failed: no column named `missing` on table `bar`"
    );
}

#[test]
fn unknown_referenced_table_carries_context() {
    let err = Schema::builder()
        .table(
            TableDef::new("bar")
                .column(ColumnDef::new("id", "int").primary_key(0))
                .foreign_key(ForeignKeyDef::new("Foo", "foo").column("id", "id")),
        )
        .build()
        .unwrap_err();

    assert!(err.is_schema_lookup());
    assert_eq!(
        err.to_string(),
        "resolving foreign key `Foo` on table `bar`: schema lookup failed: no table named `foo` on this schema"
    );
}

#[test]
fn identifier_columns_are_key_then_tokens() {
    let schema = Schema::builder()
        .table(
            TableDef::new("widget")
                .column(ColumnDef::new("version", "rowversion").concurrency_token().computed())
                .column(ColumnDef::new("name", "text"))
                .column(ColumnDef::new("tenant", "int").primary_key(1))
                .column(ColumnDef::new("id", "int").primary_key(0)),
        )
        .build()
        .unwrap();

    let widget = schema.find_table("widget").unwrap();
    let names: Vec<_> = widget
        .identifier_columns()
        .into_iter()
        .map(|column| column.name.as_str())
        .collect();

    assert_eq!(names, ["id", "tenant", "version"]);
}
