use super::Expr;

/// Tests whether a scalar is present in a collection-valued outer parameter.
///
/// How containment is expressed depends on the dialect; dialects that cannot
/// express it reject the predicate at compile time.
#[derive(Debug, Clone, PartialEq)]
pub struct ExprMembership {
    pub expr: Box<Expr>,

    /// Name of the collection parameter.
    pub param: String,
}

impl Expr {
    pub fn in_param(expr: impl Into<Self>, param: impl Into<String>) -> Self {
        ExprMembership {
            expr: Box::new(expr.into()),
            param: param.into(),
        }
        .into()
    }
}

impl From<ExprMembership> for Expr {
    fn from(value: ExprMembership) -> Self {
        Self::Membership(value)
    }
}
