use super::Error;

/// Error when a dialect does not support a requested capability.
///
/// This occurs when:
/// - A locking clause is requested against a dialect without row locking
/// - A membership predicate is compiled for a dialect without collection parameters
/// - A column's SQL type has no host type mapping in the dialect
///
/// Raised at generation time, never deferred to query execution.
#[derive(Debug)]
pub(super) struct UnsupportedFeature {
    dialect: &'static str,
    feature: Box<str>,
}

impl std::error::Error for UnsupportedFeature {}

impl core::fmt::Display for UnsupportedFeature {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        write!(
            f,
            "unsupported by this dialect ({}): {}",
            self.dialect, self.feature
        )
    }
}

impl Error {
    /// Creates an unsupported feature error for the named dialect.
    pub fn unsupported_feature(dialect: &'static str, feature: impl Into<String>) -> Error {
        Error::from(super::ErrorKind::UnsupportedFeature(UnsupportedFeature {
            dialect,
            feature: feature.into().into(),
        }))
    }

    /// Returns `true` if this error is an unsupported feature error.
    pub fn is_unsupported_feature(&self) -> bool {
        self.any(|kind| matches!(kind, super::ErrorKind::UnsupportedFeature(_)))
    }
}
