use super::{Type, Value};
use crate::schema::ColumnId;

/// A SQL-level parameter produced while compiling one statement.
#[derive(Debug, Clone, PartialEq)]
pub struct SqlParamBinding {
    /// Name used by generated code to refer to the binding.
    pub name: String,

    /// Wire-level name (`p0`, `p1`, ...). Dialects decorate it when rendering
    /// the placeholder.
    pub sql_name: String,

    pub ty: Type,

    pub source: ParamSource,
}

/// Where the value bound to a SQL parameter comes from.
#[derive(Debug, Clone, PartialEq)]
pub enum ParamSource {
    /// A literal lifted out of the predicate.
    Literal(Value),

    /// A parameter of the generated method, by name.
    OuterParam(String),

    /// A field of the record being inserted, updated or deleted.
    Column(ColumnId),
}

impl ParamSource {
    pub fn as_outer_param(&self) -> Option<&str> {
        match self {
            ParamSource::OuterParam(name) => Some(name),
            _ => None,
        }
    }
}
