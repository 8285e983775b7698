#[macro_use]
mod fmt;
use fmt::ToSql;

mod crud;
pub use crud::CrudStatement;

mod delim;
use delim::{Comma, Delimited};

mod expr;
use expr::Condition;

mod ident;
use ident::{ColumnName, TableName};

mod options;
pub use options::CompileOptions;

mod params;
use params::{Binder, Placeholder};

mod select;
pub use select::CompiledQuery;

mod transaction;
pub use transaction::{IsolationLevel, Transaction};

use crate::{Dialect, Postgresql, SqlServer, Sqlite};

use quarry_core::{
    schema::{Schema, Table},
    stmt::{ExprColumn, OuterParam, QuerySpec, TableRefId},
    Result,
};

/// Compiles query specs and CRUD requests to SQL for one dialect.
///
/// A serializer holds no per-compilation state: every call to
/// [`Serializer::compile`] or [`Serializer::compile_crud`] starts with a fresh
/// parameter binder, so one instance may be shared between threads.
#[derive(Debug)]
pub struct Serializer<'a> {
    /// Schema against which statements are compiled
    schema: &'a Schema,

    /// Handles the differences between SQL dialects and supported features.
    dialect: &'a dyn Dialect,

    options: CompileOptions,
}

/// One SQL statement and the bindings it references.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SqlText {
    pub sql: String,

    /// Indices into the compiled statement's parameter bindings, in the order
    /// the statement first uses them. Positional dialects bind in this order.
    pub params: Vec<usize>,
}

struct Formatter<'a> {
    /// Handle to the serializer
    serializer: &'a Serializer<'a>,

    /// Where to write the serialized SQL
    dst: String,

    /// Allocates bindings; shared by every statement of one compilation.
    binder: &'a mut Binder,

    /// Bindings used by this statement, in first-use order.
    params: Vec<usize>,

    /// The query whose table aliases are in scope, if any.
    query: Option<&'a QuerySpec>,
}

impl<'a> Serializer<'a> {
    pub fn new(schema: &'a Schema, dialect: &'a dyn Dialect) -> Serializer<'a> {
        Serializer {
            schema,
            dialect,
            options: CompileOptions::default(),
        }
    }

    pub fn sqlite(schema: &'a Schema) -> Serializer<'a> {
        Serializer::new(schema, &Sqlite)
    }

    pub fn postgresql(schema: &'a Schema) -> Serializer<'a> {
        Serializer::new(schema, &Postgresql)
    }

    pub fn sql_server(schema: &'a Schema) -> Serializer<'a> {
        Serializer::new(schema, &SqlServer)
    }

    pub fn with_options(mut self, options: CompileOptions) -> Serializer<'a> {
        self.options = options;
        self
    }

    pub fn schema(&self) -> &'a Schema {
        self.schema
    }

    pub fn dialect(&self) -> &'a dyn Dialect {
        self.dialect
    }

    pub fn options(&self) -> &CompileOptions {
        &self.options
    }

    fn table(&self, id: impl Into<quarry_core::schema::TableId>) -> Result<&'a Table> {
        self.schema.get_table(id.into())
    }
}

impl<'a> Formatter<'a> {
    fn new(
        serializer: &'a Serializer<'a>,
        binder: &'a mut Binder,
        query: Option<&'a QuerySpec>,
    ) -> Formatter<'a> {
        Formatter {
            serializer,
            dst: String::new(),
            binder,
            params: vec![],
            query,
        }
    }

    fn dialect(&self) -> &'a dyn Dialect {
        self.serializer.dialect
    }

    /// Terminates the statement.
    fn finish(mut self) -> SqlText {
        self.dst.push(';');
        SqlText {
            sql: self.dst,
            params: self.params,
        }
    }

    /// Runs `write` against an empty buffer and returns what it wrote.
    /// Bindings used by `write` are recorded as usual.
    fn capture(&mut self, write: impl FnOnce(&mut Self) -> Result<()>) -> Result<String> {
        let outer = std::mem::take(&mut self.dst);
        let res = write(self);
        let captured = std::mem::replace(&mut self.dst, outer);
        res.map(|_| captured)
    }

    /// Resolves a column reference against the query in scope.
    fn column(&self, expr: ExprColumn) -> Result<ColumnName<'a>> {
        let query = self
            .query
            .ok_or_else(|| quarry_core::err!("column reference outside of a query"))?;
        let table_ref = query.table_ref(expr.table)?;
        let table = self.serializer.table(table_ref.table)?;

        let column = table.columns.get(expr.column).ok_or_else(|| {
            quarry_core::Error::schema_lookup(
                "column",
                format!("#{}", expr.column),
                table.describe(),
            )
        })?;

        Ok(ColumnName::qualified(expr.table, column))
    }

    /// Parameters declared by the query in scope.
    fn outer_params(&self) -> &'a [OuterParam] {
        match self.query {
            Some(query) => &query.params,
            None => &[],
        }
    }

    fn query_table(&self, id: TableRefId) -> Result<&'a Table> {
        let query = self
            .query
            .ok_or_else(|| quarry_core::err!("table alias outside of a query"))?;
        self.serializer.table(query.table_ref(id)?.table)
    }
}
