use super::Expr;

/// `AND` / `OR` over any number of operands, or `NOT` over exactly one.
#[derive(Debug, Clone, PartialEq)]
pub struct ExprLogical {
    pub op: LogicalOp,
    pub operands: Vec<Expr>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LogicalOp {
    And,
    Or,
    Not,
}

impl Expr {
    pub fn and(operands: impl IntoIterator<Item = Expr>) -> Self {
        ExprLogical {
            op: LogicalOp::And,
            operands: operands.into_iter().collect(),
        }
        .into()
    }

    pub fn or(operands: impl IntoIterator<Item = Expr>) -> Self {
        ExprLogical {
            op: LogicalOp::Or,
            operands: operands.into_iter().collect(),
        }
        .into()
    }

    /// Negates the expression. The operand is wrapped, never rewritten.
    pub fn not(expr: impl Into<Self>) -> Self {
        ExprLogical {
            op: LogicalOp::Not,
            operands: vec![expr.into()],
        }
        .into()
    }

    /// Returns true if this is an `AND` or `OR` with more than one operand.
    pub fn is_compound(&self) -> bool {
        match self {
            Expr::Logical(expr) => expr.op != LogicalOp::Not && expr.operands.len() > 1,
            _ => false,
        }
    }
}

impl From<ExprLogical> for Expr {
    fn from(value: ExprLogical) -> Self {
        Self::Logical(value)
    }
}
