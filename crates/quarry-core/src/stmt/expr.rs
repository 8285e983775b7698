use super::*;

/// A node in a query's predicate tree.
///
/// The set of variants is closed: the compiler matches on every one of them,
/// and shapes it cannot express in SQL are rejected with an
/// [`unsupported_expr`](crate::Error::unsupported_expr) error.
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    /// `lhs <op> rhs`
    Comparison(ExprComparison),

    /// `AND`, `OR` and `NOT`
    Logical(ExprLogical),

    /// A column of a table bound in the query
    Column(ExprColumn),

    /// A literal value
    Value(Value),

    /// A reference to a parameter of the generated method, by name
    OuterParam(String),

    /// Whether the entity of a (left-joined) table is absent, by checking its
    /// whole primary key against null
    EntityNullCheck(ExprEntityNullCheck),

    /// `column IS [NOT] NULL`
    ColumnNullCheck(ExprColumnNullCheck),

    /// Whether a scalar is contained in a collection parameter
    Membership(ExprMembership),
}

impl Expr {
    pub fn param(name: impl Into<String>) -> Expr {
        Expr::OuterParam(name.into())
    }

    pub fn null() -> Expr {
        Expr::Value(Value::Null)
    }

    pub fn is_value_null(&self) -> bool {
        matches!(self, Expr::Value(Value::Null))
    }

    pub fn as_bool_literal(&self) -> Option<bool> {
        match self {
            Expr::Value(value) => value.as_bool(),
            _ => None,
        }
    }

    /// True for variants that evaluate to a boolean condition rather than a
    /// scalar value.
    pub fn is_condition(&self) -> bool {
        matches!(
            self,
            Expr::Comparison(_)
                | Expr::Logical(_)
                | Expr::EntityNullCheck(_)
                | Expr::ColumnNullCheck(_)
                | Expr::Membership(_)
        )
    }

    /// Short, human-readable name of the variant for error messages.
    pub fn shape(&self) -> &'static str {
        match self {
            Expr::Comparison(_) => "comparison",
            Expr::Logical(expr) => match expr.op {
                LogicalOp::And => "AND",
                LogicalOp::Or => "OR",
                LogicalOp::Not => "NOT",
            },
            Expr::Column(_) => "column reference",
            Expr::Value(Value::Null) => "null literal",
            Expr::Value(Value::Bool(_)) => "boolean literal",
            Expr::Value(Value::List(_)) => "list literal",
            Expr::Value(_) => "literal",
            Expr::OuterParam(_) => "parameter reference",
            Expr::EntityNullCheck(_) => "entity null check",
            Expr::ColumnNullCheck(_) => "column null check",
            Expr::Membership(_) => "membership test",
        }
    }
}

impl From<Value> for Expr {
    fn from(value: Value) -> Self {
        Self::Value(value)
    }
}

impl From<bool> for Expr {
    fn from(value: bool) -> Self {
        Self::Value(Value::Bool(value))
    }
}

impl From<i32> for Expr {
    fn from(value: i32) -> Self {
        Self::Value(Value::I32(value))
    }
}

impl From<i64> for Expr {
    fn from(value: i64) -> Self {
        Self::Value(Value::I64(value))
    }
}

impl From<&str> for Expr {
    fn from(value: &str) -> Self {
        Self::Value(Value::from(value))
    }
}

impl From<String> for Expr {
    fn from(value: String) -> Self {
        Self::Value(Value::String(value))
    }
}
