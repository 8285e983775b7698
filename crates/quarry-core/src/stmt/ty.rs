use super::Value;

/// A host type descriptor: the type a generated method uses for a value.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Type {
    /// Boolean value
    Bool,

    /// Signed 16-bit integer
    I16,

    /// Signed 32-bit integer
    I32,

    /// Signed 64-bit integer
    I64,

    /// 32-bit floating point
    F32,

    /// 64-bit floating point
    F64,

    /// Exact numeric, carried in its textual form
    Decimal,

    /// String type
    String,

    /// Raw bytes
    Bytes,

    Uuid,

    Date,

    Time,

    /// Timestamp without a zone
    DateTime,

    /// Timestamp with a zone or offset
    DateTimeOffset,

    Json,

    /// A list of a single type
    List(Box<Type>),

    /// A nullable value of the inner type
    Option(Box<Type>),

    /// A type that could not be inferred (e.g., a null literal or an empty list)
    Unknown,
}

impl Type {
    pub fn list(ty: impl Into<Self>) -> Self {
        Self::List(Box::new(ty.into()))
    }

    pub fn option(ty: impl Into<Self>) -> Self {
        match ty.into() {
            ty @ Self::Option(_) => ty,
            ty => Self::Option(Box::new(ty)),
        }
    }

    pub fn is_list(&self) -> bool {
        match self {
            Self::List(_) => true,
            Self::Option(inner) => inner.is_list(),
            _ => false,
        }
    }

    pub fn is_option(&self) -> bool {
        matches!(self, Self::Option(_))
    }

    /// The type with any nullability wrapper removed.
    pub fn non_null(&self) -> &Type {
        match self {
            Self::Option(inner) => inner.non_null(),
            ty => ty,
        }
    }

    /// Infers the host type of a literal value.
    pub fn of(value: &Value) -> Type {
        match value {
            Value::Bool(_) => Type::Bool,
            Value::I32(_) => Type::I32,
            Value::I64(_) => Type::I64,
            Value::F64(_) => Type::F64,
            Value::String(_) => Type::String,
            Value::Bytes(_) => Type::Bytes,
            Value::List(items) => match items.first() {
                Some(item) => Type::list(Type::of(item)),
                None => Type::list(Type::Unknown),
            },
            Value::Null => Type::Unknown,
        }
    }
}
