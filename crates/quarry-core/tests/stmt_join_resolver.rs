use pretty_assertions::assert_eq;
use quarry_core::{
    schema::{ColumnDef, ForeignKeyDef, Schema, TableDef},
    stmt::{JoinDirection, JoinKind, JoinRequest, QuerySpec, TableRefId},
};

fn schema() -> Schema {
    Schema::builder()
        .table(
            TableDef::new("foo")
                .column(ColumnDef::new("id", "int").primary_key(0))
                .column(ColumnDef::new("nullable_int", "int").nullable()),
        )
        .table(
            TableDef::new("child_of_foo")
                .column(ColumnDef::new("id", "int").primary_key(0))
                .column(ColumnDef::new("foo_id", "int").nullable())
                .foreign_key(ForeignKeyDef::new("FooId", "foo").column("foo_id", "id")),
        )
        .table(
            TableDef::new("grandchild")
                .column(ColumnDef::new("id", "int").primary_key(0))
                .column(ColumnDef::new("child_id", "int"))
                .foreign_key(ForeignKeyDef::new("Child", "child_of_foo").column("child_id", "id")),
        )
        .table(
            TableDef::new("foo_audit")
                .column(ColumnDef::new("foo_id", "int"))
                .column(ColumnDef::new("message", "text"))
                .foreign_key(ForeignKeyDef::new("Foo", "foo").column("foo_id", "id")),
        )
        .build()
        .unwrap()
}

#[test]
fn aliases_are_assigned_in_discovery_order() {
    let schema = schema();
    let mut query = QuerySpec::builder(&schema, "grandchild").unwrap();

    let child = query.join(JoinRequest::inner("Child")).unwrap();
    let foo = query.join(JoinRequest::left("FooId")).unwrap();

    assert_eq!(child, TableRefId(1));
    assert_eq!(foo, TableRefId(2));

    let spec = query.build();
    assert_eq!(spec.tables.len(), 3);
    assert_eq!(spec.joins[0].source, TableRefId(0));
    assert_eq!(spec.joins[1].source, TableRefId(1));
    assert_eq!(spec.joins[1].kind, JoinKind::Left);
}

#[test]
fn left_join_marks_only_the_new_table_nullable() {
    let schema = schema();
    let mut query = QuerySpec::builder(&schema, "grandchild").unwrap();

    let child = query.join(JoinRequest::inner("Child")).unwrap();
    let foo = query.join(JoinRequest::left("FooId").from(child)).unwrap();

    let spec = query.build();
    assert!(!spec.tables[0].may_be_null);
    assert!(!spec.tables[child.0].may_be_null);
    assert!(spec.tables[foo.0].may_be_null);
}

#[test]
fn inverse_join_binds_the_referencing_table() {
    let schema = schema();
    let mut query = QuerySpec::builder(&schema, "foo").unwrap();

    let children = query
        .join(JoinRequest::left_inverse("child_of_foo", "FooId"))
        .unwrap();

    let spec = query.build();
    let edge = &spec.joins[0];
    assert_eq!(edge.direction, JoinDirection::Inverse);
    assert_eq!(
        spec.tables[children.0].table,
        schema.find_table("child_of_foo").unwrap().id
    );

    let fk = schema.foreign_key(edge.foreign_key);
    let on = edge.on_columns(fk);
    // child_of_foo.foo_id = foo.id
    assert_eq!(on[0].0.table, children);
    assert_eq!(on[0].0.column, 1);
    assert_eq!(on[0].1.table, TableRefId(0));
    assert_eq!(on[0].1.column, 0);
}

#[test]
fn inverse_join_must_point_back_at_the_source() {
    let schema = schema();
    let mut query = QuerySpec::builder(&schema, "foo").unwrap();

    let err = query
        .join(JoinRequest::inner_inverse("grandchild", "Child"))
        .unwrap_err();

    assert!(err.is_invalid_statement());
}

#[test]
fn left_join_needs_a_keyed_target() {
    let schema = schema();
    let mut query = QuerySpec::builder(&schema, "foo").unwrap();

    let err = query
        .join(JoinRequest::left_inverse("foo_audit", "Foo"))
        .unwrap_err();
    assert!(err.is_unsupported_expr());
    assert_eq!(
        err.to_string(),
        "unsupported expression: left join to table `foo_audit`, which has no primary key"
    );
    assert_eq!(query.build().tables.len(), 1);

    let mut query = QuerySpec::builder(&schema, "foo").unwrap();
    let audit = query
        .join(JoinRequest::inner_inverse("foo_audit", "Foo"))
        .unwrap();
    assert!(!query.build().tables[audit.0].may_be_null);
}

#[test]
fn unknown_foreign_key_field_is_a_lookup_error() {
    let schema = schema();
    let mut query = QuerySpec::builder(&schema, "child_of_foo").unwrap();

    let err = query.join(JoinRequest::inner("Foo")).unwrap_err();

    assert!(err.is_schema_lookup());
    assert_eq!(
        err.to_string(),
        "schema lookup failed: no foreign key named `Foo` on table `child_of_foo`"
    );

    // A failed join binds nothing.
    assert_eq!(query.build().tables.len(), 1);
}

#[test]
fn unknown_root_table() {
    let schema = schema();
    let err = QuerySpec::builder(&schema, "nope").unwrap_err();
    assert!(err.is_schema_lookup());
}
