use pretty_assertions::assert_eq;
use quarry_core::{
    schema::{ColumnDef, Schema, TableDef},
    stmt::{Expr, OuterParam, ParamSource, QuerySpec, Type},
};
use quarry_sql::{CompileOptions, Serializer};

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

fn by_param(schema: &Schema, name: &str) -> QuerySpec {
    let mut query = QuerySpec::builder(schema, "foo").unwrap();
    let id = query.column(query.root(), "id").unwrap();
    let nullable_int = query.column(query.root(), "nullable_int").unwrap();
    query.param(OuterParam::new(name, Type::I32)).unwrap();
    query.filter(Expr::or([
        Expr::eq(id, Expr::param(name)),
        Expr::eq(nullable_int, Expr::param(name)),
    ]));
    query.build()
}

#[test]
fn repeated_param_shares_one_binding() {
    let schema = schema();
    let compiled = Serializer::sqlite(&schema)
        .compile(&by_param(&schema, "x"))
        .unwrap();

    assert_eq!(
        compiled.sql,
        r#"SELECT t0."id", t0."nullable_int" FROM "foo" AS t0 WHERE t0."id" = @p0 OR t0."nullable_int" = @p0;"#
    );
    assert_eq!(compiled.params.len(), 1);
    assert_eq!(compiled.params[0].name, "x");
    assert_eq!(compiled.params[0].sql_name, "p0");
    assert_eq!(compiled.params[0].source, ParamSource::OuterParam("x".into()));
}

#[test]
fn repeated_param_reuses_postgres_position() {
    let schema = schema();
    let compiled = Serializer::postgresql(&schema)
        .compile(&by_param(&schema, "x"))
        .unwrap();

    assert!(compiled
        .sql
        .ends_with(r#"WHERE t0."id" = $1 OR t0."nullable_int" = $1;"#));
}

#[test]
fn compiling_twice_is_deterministic() {
    let schema = schema();
    let spec = by_param(&schema, "x");
    let serializer = Serializer::sql_server(&schema);

    assert_eq!(
        serializer.compile(&spec).unwrap(),
        serializer.compile(&spec).unwrap()
    );
}

#[test]
fn literals_are_bound_in_first_use_order() {
    let schema = schema();
    let mut query = QuerySpec::builder(&schema, "foo").unwrap();
    let id = query.column(query.root(), "id").unwrap();
    query.param(OuterParam::new("x", Type::I32)).unwrap();
    query.filter(Expr::and([
        Expr::gt(id.clone(), 5),
        Expr::lt(id.clone(), Expr::param("x")),
        Expr::ne(id, 5),
    ]));

    let compiled = Serializer::sqlite(&schema)
        .compile(&query.build())
        .unwrap();

    let names: Vec<_> = compiled.params.iter().map(|p| p.name.as_str()).collect();
    assert_eq!(names, ["p0", "x", "p2"]);
    assert!(compiled
        .sql
        .ends_with(r#"WHERE t0."id" > @p0 AND t0."id" < @p1 AND t0."id" <> @p2;"#));
}

#[test]
fn reserved_param_is_renamed() {
    let schema = schema();
    let options = CompileOptions::new().reserved_names(["sql", "p_sql"]);
    let compiled = Serializer::sqlite(&schema)
        .with_options(options)
        .compile(&by_param(&schema, "sql"))
        .unwrap();

    assert_eq!(compiled.method_params.len(), 1);
    assert_eq!(compiled.method_params[0].name, "p_p_sql");
    assert_eq!(compiled.params[0].name, "p_p_sql");
    assert_eq!(
        compiled.params[0].source,
        ParamSource::OuterParam("p_p_sql".into())
    );

    // SQL parameter names are positional and unaffected.
    assert_eq!(compiled.params[0].sql_name, "p0");
}

#[test]
fn rename_avoids_other_params() {
    let schema = schema();
    let mut query = QuerySpec::builder(&schema, "foo").unwrap();
    let id = query.column(query.root(), "id").unwrap();
    query.param(OuterParam::new("row", Type::I32)).unwrap();
    query.param(OuterParam::new("x_row", Type::I32)).unwrap();
    query.filter(Expr::and([
        Expr::eq(id.clone(), Expr::param("row")),
        Expr::ne(id, Expr::param("x_row")),
    ]));

    let options = CompileOptions::new()
        .reserved(|name| name == "row")
        .rename_prefix("x_");
    let compiled = Serializer::sqlite(&schema)
        .with_options(options)
        .compile(&query.build())
        .unwrap();

    let names: Vec<_> = compiled
        .method_params
        .iter()
        .map(|p| p.name.as_str())
        .collect();
    assert_eq!(names, ["x_x_row", "x_row"]);
    assert_eq!(compiled.params[0].name, "x_x_row");
    assert_eq!(compiled.params[1].name, "x_row");
}

#[test]
fn undeclared_param_is_a_lookup_error() {
    let schema = schema();
    let mut query = QuerySpec::builder(&schema, "foo").unwrap();
    let id = query.column(query.root(), "id").unwrap();
    query.filter(Expr::eq(id, Expr::param("missing")));

    let err = Serializer::sqlite(&schema)
        .compile(&query.build())
        .unwrap_err();

    assert!(err.is_schema_lookup());
    assert_eq!(
        err.to_string(),
        "compiling query on `foo`: schema lookup failed: no parameter named `missing` on this query"
    );
}
