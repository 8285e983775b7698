use super::{ColumnName, Delimited, Formatter, Placeholder, ToSql};

use quarry_core::{
    stmt::{
        BinaryOp, Expr, ExprColumn, ExprComparison, ExprEntityNullCheck, ExprLogical,
        ExprMembership, LogicalOp, TableRefId, Value,
    },
    Error, Result,
};

/// An expression in predicate position.
///
/// `top` is set only for the predicate that forms the entire `WHERE` clause;
/// a lone boolean literal there renders as the dialect's tautology instead of
/// its boolean token.
pub(super) struct Condition<'a> {
    expr: &'a Expr,
    top: bool,
}

/// An expression in scalar position.
pub(super) struct Operand<'a>(pub(super) &'a Expr);

/// An operand of `AND` / `OR`, parenthesized when it is itself compound.
struct Grouped<'a>(&'a Expr);

/// `column IS [NOT] NULL`
struct NullCheck<'a>(ColumnName<'a>, bool);

impl<'a> Condition<'a> {
    pub(super) fn top(expr: &'a Expr) -> Condition<'a> {
        Condition { expr, top: true }
    }

    fn nested(expr: &'a Expr) -> Condition<'a> {
        Condition { expr, top: false }
    }
}

impl ToSql for Condition<'_> {
    fn to_sql(self, f: &mut Formatter<'_>) -> Result<()> {
        match self.expr {
            Expr::Comparison(expr) => comparison(expr, f),
            Expr::Logical(expr) => logical(expr, f),
            Expr::EntityNullCheck(expr) => entity_null_check(expr.table, expr.is_null, f),
            Expr::ColumnNullCheck(expr) => {
                let column = f.column(ExprColumn {
                    table: expr.table,
                    column: expr.column,
                })?;
                fmt!(f, NullCheck(column, expr.is_null));
                Ok(())
            }
            Expr::Membership(expr) => membership(expr, f),
            Expr::Value(Value::Bool(value)) => {
                let token = if self.top {
                    f.dialect().tautology(*value)
                } else {
                    f.dialect().bool_literal(*value)
                };
                fmt!(f, token);
                Ok(())
            }
            expr => Err(Error::unsupported_expr(format!(
                "{} used as a predicate",
                expr.shape()
            ))),
        }
    }
}

impl ToSql for Operand<'_> {
    fn to_sql(self, f: &mut Formatter<'_>) -> Result<()> {
        match self.0 {
            Expr::Column(expr) => {
                let column = f.column(*expr)?;
                fmt!(f, column);
            }
            Expr::Value(Value::Null) => {
                return Err(Error::unsupported_expr(
                    "null literal outside of an equality comparison",
                ))
            }
            Expr::Value(Value::List(_)) => {
                return Err(Error::unsupported_expr("list literal used as a scalar operand"))
            }
            Expr::Value(value) => {
                let index = f.binder.literal(value);
                fmt!(f, Placeholder(index));
            }
            Expr::OuterParam(name) => {
                let params = f.outer_params();
                if params
                    .iter()
                    .any(|param| param.name == *name && param.ty.is_list())
                {
                    require_collection_params(f)?;
                    return Err(Error::unsupported_expr(format!(
                        "list parameter `{name}` used as a scalar operand"
                    )));
                }

                let index = f.binder.outer(params, name)?;
                fmt!(f, Placeholder(index));
            }
            expr => {
                return Err(Error::unsupported_expr(format!(
                    "{} used as a scalar operand",
                    expr.shape()
                )))
            }
        }

        Ok(())
    }
}

impl ToSql for Grouped<'_> {
    fn to_sql(self, f: &mut Formatter<'_>) -> Result<()> {
        if self.0.is_compound() {
            fmt!(f, "(" Condition::nested(self.0) ")");
        } else {
            fmt!(f, Condition::nested(self.0));
        }
        Ok(())
    }
}

impl ToSql for NullCheck<'_> {
    fn to_sql(self, f: &mut Formatter<'_>) -> Result<()> {
        let check = if self.1 { " IS NULL" } else { " IS NOT NULL" };
        fmt!(f, self.0 check);
        Ok(())
    }
}

fn comparison(expr: &ExprComparison, f: &mut Formatter<'_>) -> Result<()> {
    let (lhs, rhs) = (&*expr.lhs, &*expr.rhs);

    if lhs.is_value_null() || rhs.is_value_null() {
        if lhs.is_value_null() && rhs.is_value_null() {
            return Err(Error::unsupported_expr("comparison of NULL with NULL"));
        }

        if !expr.op.is_equality() {
            return Err(Error::unsupported_expr(format!(
                "ordering comparison (`{}`) against NULL",
                expr.op
            )));
        }

        let operand = if lhs.is_value_null() { rhs } else { lhs };

        // `= NULL` is never true; compare with `IS` instead.
        return match operand {
            Expr::Column(column) => {
                let column = f.column(*column)?;
                fmt!(f, NullCheck(column, expr.op == BinaryOp::Eq));
                Ok(())
            }
            // The check stands for the entity it tests.
            Expr::EntityNullCheck(check) => {
                entity_null_check(check.table, expr.op == BinaryOp::Eq, f)
            }
            _ => {
                let check = if expr.op == BinaryOp::Eq {
                    " IS NULL"
                } else {
                    " IS NOT NULL"
                };
                fmt!(f, Operand(operand) check);
                Ok(())
            }
        };
    }

    if let Some((check, literal)) = entity_check_against_bool(lhs, rhs) {
        if !expr.op.is_equality() {
            return Err(Error::unsupported_expr(format!(
                "ordering comparison (`{}`) of an entity null check",
                expr.op
            )));
        }

        // `check == true` keeps the check; `== false` and `!= true` negate it.
        let keep = literal == (expr.op == BinaryOp::Eq);
        return entity_null_check(check.table, check.is_null == keep, f);
    }

    let op = expr.op.as_sql();
    fmt!(f, Operand(lhs) " " op " " Operand(rhs));
    Ok(())
}

fn entity_check_against_bool<'a>(
    lhs: &'a Expr,
    rhs: &'a Expr,
) -> Option<(&'a ExprEntityNullCheck, bool)> {
    match (lhs, rhs) {
        (Expr::EntityNullCheck(check), other) | (other, Expr::EntityNullCheck(check)) => {
            other.as_bool_literal().map(|literal| (check, literal))
        }
        _ => None,
    }
}

fn logical(expr: &ExprLogical, f: &mut Formatter<'_>) -> Result<()> {
    let separator = match expr.op {
        LogicalOp::Not => {
            let [operand] = &expr.operands[..] else {
                return Err(Error::unsupported_expr(format!(
                    "NOT with {} operands",
                    expr.operands.len()
                )));
            };

            fmt!(f, "NOT (" Condition::nested(operand) ")");
            return Ok(());
        }
        LogicalOp::And => " AND ",
        LogicalOp::Or => " OR ",
    };

    if expr.operands.is_empty() {
        return Err(Error::unsupported_expr(format!(
            "{} with no operands",
            separator.trim()
        )));
    }

    fmt!(f, Delimited(expr.operands.iter().map(Grouped), separator));
    Ok(())
}

/// Checks every primary key column of the table against null.
fn entity_null_check(
    table_ref: TableRefId,
    is_null: bool,
    f: &mut Formatter<'_>,
) -> Result<()> {
    let table = f.query_table(table_ref)?;

    let checks: Vec<_> = table
        .primary_key_columns()
        .map(|column| NullCheck(ColumnName::qualified(table_ref, column), is_null))
        .collect();

    match checks.len() {
        0 => Err(Error::unsupported_expr(format!(
            "entity null check on {}, which has no primary key",
            table.describe()
        ))),
        1 => {
            fmt!(f, Delimited(checks, " AND "));
            Ok(())
        }
        _ => {
            fmt!(f, "(" Delimited(checks, " AND ") ")");
            Ok(())
        }
    }
}

fn membership(expr: &ExprMembership, f: &mut Formatter<'_>) -> Result<()> {
    require_collection_params(f)?;

    let params = f.outer_params();
    let param = params
        .iter()
        .find(|param| param.name == expr.param)
        .ok_or_else(|| Error::schema_lookup("parameter", &expr.param, "this query"))?;

    if !param.ty.is_list() {
        return Err(Error::invalid_statement(format!(
            "parameter `{}` is used in a membership test but is not a list",
            param.name
        )));
    }

    let operand = f.capture(|f| Operand(&expr.expr).to_sql(f))?;
    let index = f.binder.outer(params, &expr.param)?;
    let collection = f.capture(|f| Placeholder(index).to_sql(f))?;

    let sql = f.dialect().membership(&operand, &collection)?;
    f.dst.push_str(&sql);
    Ok(())
}

fn require_collection_params(f: &Formatter<'_>) -> Result<()> {
    let dialect = f.dialect();
    if dialect.capability().collection_params {
        Ok(())
    } else {
        Err(Error::unsupported_feature(
            dialect.name(),
            "membership tests against collection parameters",
        ))
    }
}
