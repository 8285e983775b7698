use super::Error;

/// Error when a predicate or join has a shape the compiler does not handle.
///
/// The message identifies the unhandled shape so that gaps can be diagnosed
/// instead of being silently mis-compiled.
#[derive(Debug)]
pub(super) struct UnsupportedExpr {
    shape: Box<str>,
}

impl std::error::Error for UnsupportedExpr {}

impl core::fmt::Display for UnsupportedExpr {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        write!(f, "unsupported expression: {}", self.shape)
    }
}

impl Error {
    /// Creates an unsupported expression error.
    pub fn unsupported_expr(shape: impl Into<String>) -> Error {
        Error::from(super::ErrorKind::UnsupportedExpr(UnsupportedExpr {
            shape: shape.into().into(),
        }))
    }

    /// Returns `true` if this error is an unsupported expression error.
    pub fn is_unsupported_expr(&self) -> bool {
        self.any(|kind| matches!(kind, super::ErrorKind::UnsupportedExpr(_)))
    }
}
