use super::Error;

/// Error when a statement references a schema element that does not exist.
///
/// This occurs when:
/// - A query names a table that is not part of the schema
/// - A column name does not exist on the table it is looked up on
/// - A join names a foreign key field that the owning table does not declare
/// - A predicate references an outer parameter that the query never declared
///
/// Lookups are always fatal to the compilation that triggered them.
#[derive(Debug)]
pub(super) struct SchemaLookup {
    item: &'static str,
    name: Box<str>,
    scope: Box<str>,
}

impl std::error::Error for SchemaLookup {}

impl core::fmt::Display for SchemaLookup {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        write!(
            f,
            "schema lookup failed: no {} named `{}` on {}",
            self.item, self.name, self.scope
        )
    }
}

impl Error {
    /// Creates a schema lookup error.
    ///
    /// `item` names the kind of element (`"table"`, `"column"`, `"foreign key"`,
    /// ...), `name` is the name that failed to resolve and `scope` describes
    /// where it was looked up.
    pub fn schema_lookup(
        item: &'static str,
        name: impl Into<String>,
        scope: impl Into<String>,
    ) -> Error {
        Error::from(super::ErrorKind::SchemaLookup(SchemaLookup {
            item,
            name: name.into().into(),
            scope: scope.into().into(),
        }))
    }

    /// Returns `true` if this error is a schema lookup error.
    pub fn is_schema_lookup(&self) -> bool {
        self.any(|kind| matches!(kind, super::ErrorKind::SchemaLookup(_)))
    }
}
