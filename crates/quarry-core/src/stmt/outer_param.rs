use super::{Type, Value};

/// A parameter of the generated data-access method.
#[derive(Debug, Clone, PartialEq)]
pub struct OuterParam {
    pub name: String,

    /// The host type the method accepts.
    pub ty: Type,

    /// Literal the method signature uses when the caller omits the argument.
    pub default: Option<Value>,
}

impl OuterParam {
    pub fn new(name: impl Into<String>, ty: impl Into<Type>) -> OuterParam {
        OuterParam {
            name: name.into(),
            ty: ty.into(),
            default: None,
        }
    }

    pub fn with_default(mut self, default: impl Into<Value>) -> OuterParam {
        self.default = Some(default.into());
        self
    }
}
