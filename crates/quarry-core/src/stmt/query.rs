use super::{Expr, JoinEdge, OuterParam, QueryBuilder, TableRef, TableRefId};
use crate::{schema::Schema, Error, Result};

/// A multi-table query request.
///
/// Produced by [`QueryBuilder`], which resolves joins and rejects duplicate
/// clauses. A `QuerySpec` is never modified once built; compiling it is a pure
/// function of the spec, the schema and the dialect.
#[derive(Debug, Clone, PartialEq)]
pub struct QuerySpec {
    /// Every bound table. The root is always at index 0, and the position of
    /// each entry is its [`TableRefId`].
    pub tables: Vec<TableRef>,

    /// Joins, in the order they were requested.
    pub joins: Vec<JoinEdge>,

    /// The `WHERE` predicate.
    pub filter: Option<Expr>,

    /// Tables to return. `None` returns every bound table in binding order.
    pub projection: Option<Projection>,

    pub order_by: Vec<OrderByExpr>,

    pub limit: Option<u64>,

    pub lock: Option<Lock>,

    /// Parameters of the generated method, in signature order.
    pub params: Vec<OuterParam>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Projection {
    /// Return a single table.
    Table(TableRefId),

    /// Return several tables as a tuple.
    Tuple(Vec<TableRefId>),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OrderByExpr {
    pub table: TableRefId,
    pub column: usize,
    pub direction: Direction,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Direction {
    #[default]
    Asc,
    Desc,
}

/// Row locking clause appended to a `SELECT`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Lock {
    /// `FOR UPDATE`
    Update,

    /// `FOR SHARE`
    Share,

    /// `FOR <clause>`, passed through as written (e.g. `NO KEY UPDATE`).
    Custom(String),
}

impl QuerySpec {
    /// Starts building a query rooted at the table named `root`.
    pub fn builder<'a>(schema: &'a Schema, root: &str) -> Result<QueryBuilder<'a>> {
        QueryBuilder::new(schema, root)
    }

    pub fn root(&self) -> &TableRef {
        &self.tables[0]
    }

    pub fn table_ref(&self, id: TableRefId) -> Result<&TableRef> {
        self.tables.get(id.0).ok_or_else(|| {
            Error::invalid_statement(format!("table alias `{id}` is not bound in this query"))
        })
    }

    pub fn param(&self, name: &str) -> Option<&OuterParam> {
        self.params.iter().find(|param| param.name == name)
    }

    /// The tables a result row carries, in column order.
    pub fn output_tables(&self) -> Vec<TableRefId> {
        match &self.projection {
            Some(projection) => projection.tables().to_vec(),
            None => self.tables.iter().map(|table| table.id).collect(),
        }
    }
}

impl Projection {
    pub fn tables(&self) -> &[TableRefId] {
        match self {
            Projection::Table(table) => std::slice::from_ref(table),
            Projection::Tuple(tables) => tables,
        }
    }
}

impl From<TableRefId> for Projection {
    fn from(value: TableRefId) -> Self {
        Projection::Table(value)
    }
}

impl From<Vec<TableRefId>> for Projection {
    fn from(value: Vec<TableRefId>) -> Self {
        Projection::Tuple(value)
    }
}

impl Lock {
    /// The text following `FOR`.
    pub fn clause(&self) -> &str {
        match self {
            Lock::Update => "UPDATE",
            Lock::Share => "SHARE",
            Lock::Custom(clause) => clause,
        }
    }
}
