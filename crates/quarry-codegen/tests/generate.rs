use pretty_assertions::assert_eq;
use quarry_codegen::{Generator, QueryMethod};
use quarry_core::{
    schema::{Column, ColumnDef, DefaultNaming, ForeignKeyDef, Schema, Table, TableDef},
    stmt::{Expr, InsertDefaults, JoinRequest, OuterParam, QuerySpec, Type, Value, ValueRecord},
};
use quarry_sql::{CompileOptions, Postgresql, Sqlite};
use quote::{quote, ToTokens};

fn schema() -> Schema {
    Schema::builder()
        .table(
            TableDef::new("foo")
                .column(ColumnDef::new("id", "integer").primary_key(0).auto_increment())
                .column(ColumnDef::new("nullable_int", "int").nullable()),
        )
        .table(
            TableDef::new("child_of_foo")
                .column(ColumnDef::new("id", "integer").primary_key(0))
                .column(ColumnDef::new("foo_id", "integer").nullable())
                .column(ColumnDef::new("type", "text"))
                .foreign_key(ForeignKeyDef::new("FooId", "foo").column("foo_id", "id")),
        )
        .table(TableDef::new("audit_log").column(ColumnDef::new("message", "text")))
        .build()
        .unwrap()
}

fn parse(tokens: proc_macro2::TokenStream) -> syn::File {
    syn::parse2(tokens).unwrap()
}

fn impl_fns<'a>(file: &'a syn::File, ty: &str) -> Vec<&'a syn::ImplItemFn> {
    file.items
        .iter()
        .filter_map(|item| match item {
            syn::Item::Impl(item) => Some(item),
            _ => None,
        })
        .filter(|item| matches!(&*item.self_ty, syn::Type::Path(path) if path.path.is_ident(ty)))
        .flat_map(|item| &item.items)
        .filter_map(|item| match item {
            syn::ImplItem::Fn(item) => Some(item),
            _ => None,
        })
        .collect()
}

fn fn_names(file: &syn::File, ty: &str) -> Vec<String> {
    impl_fns(file, ty)
        .iter()
        .map(|item| item.sig.ident.to_string())
        .collect()
}

fn find_fn<'a>(file: &'a syn::File, ty: &str, name: &str) -> &'a syn::ImplItemFn {
    impl_fns(file, ty)
        .into_iter()
        .find(|item| item.sig.ident == name)
        .unwrap()
}

fn find_struct<'a>(file: &'a syn::File, name: &str) -> &'a syn::ItemStruct {
    file.items
        .iter()
        .find_map(|item| match item {
            syn::Item::Struct(item) if item.ident == name => Some(item),
            _ => None,
        })
        .unwrap()
}

#[test]
fn records_and_crud_methods() {
    let schema = schema();
    let generator = Generator::new(&schema, &Sqlite, CompileOptions::new(), &DefaultNaming);
    let file = parse(generator.generate(&[]).unwrap());

    let foo = find_struct(&file, "Foo");
    let fields: Vec<_> = foo
        .fields
        .iter()
        .map(|field| {
            let name = field.ident.as_ref().unwrap();
            let ty = &field.ty;
            quote!(#name: #ty).to_string()
        })
        .collect();
    assert_eq!(
        fields,
        [
            quote!(id: i64).to_string(),
            quote!(nullable_int: Option<i64>).to_string()
        ]
    );

    assert_eq!(
        fn_names(&file, "Foo"),
        ["from_record", "to_record", "insert", "update", "delete"]
    );

    let insert = find_fn(&file, "Foo", "insert").to_token_stream().to_string();
    assert!(insert.contains(r#""INSERT INTO \"foo\" (\"nullable_int\") VALUES (@p0);""#), "{insert}");
}

#[test]
fn keyword_columns_become_raw_identifiers() {
    let schema = schema();
    let generator = Generator::new(&schema, &Sqlite, CompileOptions::new(), &DefaultNaming);
    let file = parse(generator.generate(&[]).unwrap());

    let child = find_struct(&file, "ChildOfFoo");
    let names: Vec<_> = child
        .fields
        .iter()
        .map(|field| field.ident.as_ref().unwrap().to_string())
        .collect();
    assert_eq!(names, ["id", "foo_id", "r#type"]);
}

#[test]
fn keyless_table_only_inserts() {
    let schema = schema();
    let generator = Generator::new(&schema, &Sqlite, CompileOptions::new(), &DefaultNaming);
    let file = parse(generator.generate(&[]).unwrap());

    assert_eq!(
        fn_names(&file, "AuditLog"),
        ["from_record", "to_record", "insert"]
    );
}

#[test]
fn query_params_avoid_scratch_names() {
    let schema = schema();

    let mut query = QuerySpec::builder(&schema, "foo").unwrap();
    let nullable_int = query.column(query.root(), "nullable_int").unwrap();
    query
        .param(OuterParam::new("sql", Type::option(Type::I32)))
        .unwrap();
    query.filter(Expr::eq(nullable_int, Expr::param("sql")));

    let queries = [QueryMethod::new("by_nullable_int", query.build())];
    let generator = Generator::new(&schema, &Postgresql, CompileOptions::new(), &DefaultNaming);
    let file = parse(generator.generate(&queries).unwrap());

    let method = find_fn(&file, "Foo", "by_nullable_int");
    let sig = &method.sig;
    assert_eq!(
        quote!(#sig).to_string(),
        quote!(pub fn by_nullable_int(p_sql: Option<i32>) -> (&'static str, Vec<quarry_core::stmt::Value>))
            .to_string()
            .replace("pub ", "")
    );

    let body = method.block.to_token_stream().to_string();
    assert!(body.contains(&quote!(quarry_core::stmt::Value::from(p_sql)).to_string()), "{body}");
    assert!(body.contains(r#"t0.\"nullable_int\" = $1;"#), "{body}");
}

#[test]
fn user_reserved_names_are_renamed_too() {
    let schema = schema();

    let mut query = QuerySpec::builder(&schema, "foo").unwrap();
    let id = query.column(query.root(), "id").unwrap();
    query.param(OuterParam::new("id", Type::I64)).unwrap();
    query.filter(Expr::eq(id, Expr::param("id")));

    let queries = [QueryMethod::new("find", query.build())];
    let options = CompileOptions::new()
        .reserved_names(["id"])
        .rename_prefix("arg_");
    let generator = Generator::new(&schema, &Sqlite, options, &DefaultNaming);
    let file = parse(generator.generate(&queries).unwrap());

    let sig = &find_fn(&file, "Foo", "find").sig;
    assert_eq!(
        sig.inputs.to_token_stream().to_string(),
        quote!(arg_id: i64).to_string()
    );
}

#[test]
fn left_join_loader_returns_optional_record() {
    let schema = schema();

    let mut query = QuerySpec::builder(&schema, "child_of_foo").unwrap();
    query.join(JoinRequest::left("FooId")).unwrap();

    let queries = [QueryMethod::new("with_foo", query.build())];
    let generator = Generator::new(&schema, &Sqlite, CompileOptions::new(), &DefaultNaming);
    let file = parse(generator.generate(&queries).unwrap());

    let loader = &find_fn(&file, "ChildOfFoo", "with_foo_row").sig.output;
    assert_eq!(
        loader.to_token_stream().to_string(),
        quote!(-> quarry_core::Result<(ChildOfFoo, Option<Foo>,)>).to_string()
    );

    let body = find_fn(&file, "ChildOfFoo", "with_foo_row")
        .block
        .to_token_stream()
        .to_string();
    assert!(body.contains(&quote!(row[3usize].is_null()).to_string()) || body.contains(&quote!(row[3].is_null()).to_string()), "{body}");
}

#[test]
fn unsupported_column_type_names_the_table() {
    let schema = Schema::builder()
        .table(
            TableDef::new("shapes")
                .column(ColumnDef::new("id", "integer").primary_key(0))
                .column(ColumnDef::new("outline", "polygon")),
        )
        .build()
        .unwrap();

    let generator = Generator::new(&schema, &Sqlite, CompileOptions::new(), &DefaultNaming);
    let err = generator.generate(&[]).unwrap_err();

    assert!(err.is_unsupported_feature());
    assert!(err
        .to_string()
        .starts_with("generating code for table `shapes`: mapping the type of column `outline`"));
}

fn widget() -> Schema {
    Schema::builder()
        .table(
            TableDef::new("widget")
                .column(ColumnDef::new("id", "integer").primary_key(0).auto_increment())
                .column(ColumnDef::new("status", "text").has_default()),
        )
        .build()
        .unwrap()
}

fn widget_insert(schema: &Schema, options: CompileOptions) -> String {
    let generator = Generator::new(schema, &Sqlite, options, &DefaultNaming);
    let file = parse(generator.generate(&[]).unwrap());
    find_fn(&file, "Widget", "insert").block.to_token_stream().to_string()
}

const WIDGET_DEFAULT_VALUES: &str = r#""INSERT INTO \"widget\" DEFAULT VALUES;""#;
const WIDGET_WITH_STATUS: &str = r#""INSERT INTO \"widget\" (\"status\") VALUES (@p0);""#;

#[test]
fn insert_defaults_never_leaves_column_to_database() {
    let schema = widget();
    let body = widget_insert(&schema, CompileOptions::new().insert_defaults(InsertDefaults::Never));

    assert!(body.contains(WIDGET_DEFAULT_VALUES), "{body}");
    assert!(!body.contains(WIDGET_WITH_STATUS), "{body}");
    assert!(!body.contains("looks_default"), "{body}");
}

#[test]
fn insert_defaults_always_writes_column() {
    let schema = widget();
    let body = widget_insert(&schema, CompileOptions::new().insert_defaults(InsertDefaults::Always));

    assert!(body.contains(WIDGET_WITH_STATUS), "{body}");
    assert!(!body.contains(WIDGET_DEFAULT_VALUES), "{body}");
    assert!(!body.contains("looks_default"), "{body}");
}

#[test]
fn insert_defaults_when_non_default_picks_statement_per_record() {
    let schema = widget();
    let body = widget_insert(
        &schema,
        CompileOptions::new().insert_defaults(InsertDefaults::WhenNonDefault),
    );

    assert!(body.contains("looks_default"), "{body}");
    assert!(body.contains(&quote!(self.status.clone()).to_string()), "{body}");

    let default_values = body.find(WIDGET_DEFAULT_VALUES).expect(&body);
    let with_status = body.find(WIDGET_WITH_STATUS).expect(&body);
    assert!(default_values < with_status, "{body}");
}

#[test]
fn insert_defaults_closure_is_rejected() {
    let schema = widget();
    let policy = |_: &Table, _: &Column, _: Option<&ValueRecord>, proposed: Option<&Value>| {
        proposed.is_some()
    };

    let generator = Generator::new(
        &schema,
        &Sqlite,
        CompileOptions::new().insert_defaults(policy),
        &DefaultNaming,
    );
    let err = generator.generate(&[]).unwrap_err();

    assert!(err.is_invalid_statement());
    assert!(err.to_string().contains("column `status`"), "{err}");
}
