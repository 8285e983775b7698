use quarry_codegen::QueryMethod;
use quarry_core::{
    err,
    stmt::{
        BinaryOp, Direction, Expr, JoinRequest, Lock, OuterParam, QueryBuilder, QuerySpec,
        TableRefId, Type, Value,
    },
    Error, Result, Schema,
};
use quarry_sql::Dialect;
use serde::Deserialize;
use std::collections::HashSet;

/// A query declared in `quarry.toml` under `[[query]]`.
///
/// Filters are combined with `AND`. Parameters are declared by the filters
/// that use them and take the type of the column they are compared with.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct QueryEntry {
    /// Name of the generated method
    pub name: String,

    /// Table the query starts from
    pub root: String,

    #[serde(default, rename = "join")]
    pub joins: Vec<JoinEntry>,

    #[serde(default)]
    pub filter: Vec<FilterEntry>,

    #[serde(default)]
    pub order_by: Vec<OrderByEntry>,

    pub limit: Option<u64>,

    /// `update`, `share`, or any other clause to place after `FOR`
    pub lock: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct JoinEntry {
    /// Field name of the foreign key to follow
    pub foreign_key: String,

    #[serde(default)]
    pub kind: JoinKindEntry,

    /// For joins against the direction of the foreign key: the table that
    /// declares it.
    pub inverse: Option<String>,

    /// Alias (`t0`, `t1`, ...) of the table to join from. Defaults to the
    /// most recently joined table.
    pub from: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum JoinKindEntry {
    #[default]
    Inner,
    Left,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FilterEntry {
    /// `column` on the root table, or `tN.column` on a joined one
    pub column: String,

    #[serde(default)]
    pub op: FilterOp,

    /// Compare against this method parameter
    pub param: Option<String>,

    /// Compare against a literal
    pub value: Option<toml::Value>,

    /// Compare against NULL
    #[serde(default)]
    pub null: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
pub enum FilterOp {
    #[default]
    #[serde(rename = "==")]
    Eq,
    #[serde(rename = "!=")]
    Ne,
    #[serde(rename = "<")]
    Lt,
    #[serde(rename = "<=")]
    Le,
    #[serde(rename = ">")]
    Gt,
    #[serde(rename = ">=")]
    Ge,
    #[serde(rename = "in")]
    In,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct OrderByEntry {
    pub column: String,

    #[serde(default)]
    pub direction: DirectionEntry,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DirectionEntry {
    #[default]
    Asc,
    Desc,
}

impl QueryEntry {
    /// The query as a method of its root table's record type.
    pub fn method(&self, schema: &Schema, dialect: &dyn Dialect) -> Result<QueryMethod> {
        let spec = self
            .build(schema, dialect)
            .map_err(|err| err.context(err!("building query `{}`", self.name)))?;

        Ok(QueryMethod::new(&self.name, spec))
    }

    pub fn build(&self, schema: &Schema, dialect: &dyn Dialect) -> Result<QuerySpec> {
        let mut query = QuerySpec::builder(schema, &self.root)?;

        for join in &self.joins {
            let mut request = match (&join.inverse, join.kind) {
                (None, JoinKindEntry::Inner) => JoinRequest::inner(&join.foreign_key),
                (None, JoinKindEntry::Left) => JoinRequest::left(&join.foreign_key),
                (Some(table), JoinKindEntry::Inner) => {
                    JoinRequest::inner_inverse(table, &join.foreign_key)
                }
                (Some(table), JoinKindEntry::Left) => {
                    JoinRequest::left_inverse(table, &join.foreign_key)
                }
            };

            if let Some(from) = &join.from {
                request = request.from(parse_alias(from)?);
            }

            query.join(request)?;
        }

        let mut params = HashSet::new();
        for filter in &self.filter {
            let expr = filter.build(&mut query, &mut params, dialect)?;
            query.filter(expr);
        }

        for order_by in &self.order_by {
            let (table, column) = column_ref(&query, &order_by.column);
            let direction = match order_by.direction {
                DirectionEntry::Asc => Direction::Asc,
                DirectionEntry::Desc => Direction::Desc,
            };
            query.order_by(table, column, direction)?;
        }

        if let Some(limit) = self.limit {
            query.limit(limit)?;
        }

        if let Some(lock) = &self.lock {
            query.lock(match lock.to_ascii_lowercase().as_str() {
                "update" => Lock::Update,
                "share" => Lock::Share,
                _ => Lock::Custom(lock.clone()),
            })?;
        }

        Ok(query.build())
    }
}

impl FilterEntry {
    fn build(
        &self,
        query: &mut QueryBuilder<'_>,
        params: &mut HashSet<String>,
        dialect: &dyn Dialect,
    ) -> Result<Expr> {
        let (table, name) = column_ref(query, &self.column);
        let lhs = query.column(table, name)?;

        let rhs = match (&self.param, &self.value, self.null) {
            (Some(param), None, false) => {
                if params.insert(param.clone()) {
                    let column = query.table(table)?.column_by_name(name)?;
                    let ty = dialect.column_type(column)?;
                    let ty = match self.op {
                        FilterOp::In => Type::list(ty.non_null().clone()),
                        _ => ty,
                    };
                    query.param(OuterParam::new(param, ty))?;
                }

                if self.op == FilterOp::In {
                    return Ok(Expr::in_param(lhs, param));
                }

                Expr::param(param)
            }
            (None, Some(value), false) => Expr::from(literal(value)?),
            (None, None, true) => Expr::null(),
            _ => {
                return Err(Error::invalid_statement(format!(
                    "filter on `{}` needs exactly one of `param`, `value`, or `null`",
                    self.column
                )))
            }
        };

        let op = match self.op {
            FilterOp::Eq => BinaryOp::Eq,
            FilterOp::Ne => BinaryOp::Ne,
            FilterOp::Lt => BinaryOp::Lt,
            FilterOp::Le => BinaryOp::Le,
            FilterOp::Gt => BinaryOp::Gt,
            FilterOp::Ge => BinaryOp::Ge,
            FilterOp::In => {
                return Err(Error::invalid_statement(format!(
                    "`in` filter on `{}` must compare against a `param`",
                    self.column
                )))
            }
        };

        Ok(Expr::binary_op(lhs, op, rhs))
    }
}

/// Splits `tN.column` into the alias and the column name. Anything else names
/// a column of the root table.
fn column_ref<'s>(query: &QueryBuilder<'_>, column: &'s str) -> (TableRefId, &'s str) {
    match column.split_once('.') {
        Some((alias, name)) => match parse_alias(alias) {
            Ok(table) => (table, name),
            Err(_) => (query.root(), column),
        },
        None => (query.root(), column),
    }
}

fn parse_alias(alias: &str) -> Result<TableRefId> {
    alias
        .strip_prefix('t')
        .and_then(|index| index.parse().ok())
        .map(TableRefId)
        .ok_or_else(|| Error::invalid_statement(format!("`{alias}` is not a table alias")))
}

fn literal(value: &toml::Value) -> Result<Value> {
    Ok(match value {
        toml::Value::Boolean(value) => Value::Bool(*value),
        toml::Value::Integer(value) => Value::I64(*value),
        toml::Value::Float(value) => Value::F64(*value),
        toml::Value::String(value) => Value::String(value.clone()),
        toml::Value::Array(items) => {
            Value::List(items.iter().map(literal).collect::<Result<_>>()?)
        }
        other => {
            return Err(Error::invalid_statement(format!(
                "unsupported literal {other}"
            )))
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn aliases() {
        assert_eq!(parse_alias("t2").unwrap(), TableRefId(2));
        assert!(parse_alias("x2").unwrap_err().is_invalid_statement());
        assert!(parse_alias("t").is_err());
    }

    #[test]
    fn literals() {
        let table: toml::Table = toml::from_str("v = [1, 2]").unwrap();
        assert_eq!(
            literal(&table["v"]).unwrap(),
            Value::List(vec![Value::I64(1), Value::I64(2)])
        );
    }
}
