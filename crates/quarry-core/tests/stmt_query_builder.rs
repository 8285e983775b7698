use pretty_assertions::assert_eq;
use quarry_core::{
    schema::{ColumnDef, Schema, TableDef},
    stmt::{Direction, Expr, Lock, LogicalOp, OuterParam, Projection, QuerySpec, TableRefId, Type},
};

fn schema() -> Schema {
    Schema::builder()
        .table(
            TableDef::new("foo")
                .column(ColumnDef::new("id", "int").primary_key(0))
                .column(ColumnDef::new("nullable_int", "int").nullable()),
        )
        .build()
        .unwrap()
}

#[test]
fn limit_twice_is_rejected() {
    let schema = schema();
    let mut query = QuerySpec::builder(&schema, "foo").unwrap();

    query.limit(10).unwrap();
    let err = query.limit(20).unwrap_err();

    assert!(err.is_duplicate_clause());
    assert_eq!(query.build().limit, Some(10));
}

#[test]
fn lock_twice_is_rejected() {
    let schema = schema();
    let mut query = QuerySpec::builder(&schema, "foo").unwrap();

    query.lock(Lock::Update).unwrap();
    let err = query.lock(Lock::Share).unwrap_err();

    assert_eq!(
        err.to_string(),
        "duplicate clause: lock was already specified for this query"
    );
}

#[test]
fn projection_twice_is_rejected() {
    let schema = schema();
    let mut query = QuerySpec::builder(&schema, "foo").unwrap();
    let root = query.root();

    query.project(root).unwrap();
    assert!(query.project(root).unwrap_err().is_duplicate_clause());
}

#[test]
fn projection_of_unbound_table_is_rejected() {
    let schema = schema();
    let mut query = QuerySpec::builder(&schema, "foo").unwrap();

    let err = query
        .project(Projection::Tuple(vec![TableRefId(0), TableRefId(4)]))
        .unwrap_err();

    assert!(err.is_invalid_statement());
    assert!(query.build().projection.is_none());
}

#[test]
fn second_filter_is_combined_with_and() {
    let schema = schema();
    let mut query = QuerySpec::builder(&schema, "foo").unwrap();
    let root = query.root();

    let id = query.column(root, "id").unwrap();
    let nullable_int = query.column(root, "nullable_int").unwrap();

    query.filter(Expr::gt(id.clone(), 1));
    query.filter(Expr::eq(nullable_int.clone(), Expr::null()));
    query.filter(Expr::lt(id.clone(), 10));

    let Some(Expr::Logical(filter)) = query.build().filter else {
        panic!("expected a logical filter");
    };

    assert_eq!(filter.op, LogicalOp::And);
    assert_eq!(
        filter.operands,
        vec![
            Expr::gt(id.clone(), 1),
            Expr::eq(nullable_int, Expr::null()),
            Expr::lt(id, 10),
        ]
    );
}

#[test]
fn params_are_unique() {
    let schema = schema();
    let mut query = QuerySpec::builder(&schema, "foo").unwrap();

    query.param(OuterParam::new("min", Type::I32)).unwrap();
    assert!(query
        .param(OuterParam::new("min", Type::I64))
        .unwrap_err()
        .is_invalid_statement());
}

#[test]
fn order_by_resolves_column_names() {
    let schema = schema();
    let mut query = QuerySpec::builder(&schema, "foo").unwrap();
    let root = query.root();

    query.order_by(root, "nullable_int", Direction::Desc).unwrap();
    assert!(query
        .order_by(root, "missing", Direction::Asc)
        .unwrap_err()
        .is_schema_lookup());

    let spec = query.build();
    assert_eq!(spec.order_by.len(), 1);
    assert_eq!(spec.order_by[0].column, 1);
    assert_eq!(spec.order_by[0].direction, Direction::Desc);
}
