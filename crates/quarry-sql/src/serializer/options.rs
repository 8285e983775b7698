use quarry_core::stmt::{InsertDefaultPolicy, InsertDefaults};

use std::{fmt, sync::Arc};

/// Options for compiling statements
#[derive(Clone)]
pub struct CompileOptions {
    /// Returns true for method parameter names that collide with names the
    /// generated code uses internally.
    pub reserved: Arc<dyn Fn(&str) -> bool + Send + Sync>,

    /// Prepended to reserved parameter names until they are free.
    pub rename_prefix: String,

    /// Decides which defaultable columns an insert writes.
    pub insert_defaults: Arc<dyn InsertDefaultPolicy + Send + Sync>,
}

impl Default for CompileOptions {
    fn default() -> Self {
        Self {
            reserved: Arc::new(|_: &str| false),
            rename_prefix: "p_".to_string(),
            insert_defaults: Arc::new(InsertDefaults::default()),
        }
    }
}

impl CompileOptions {
    /// Create a new CompileOptions with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the reserved-name predicate
    pub fn reserved(mut self, reserved: impl Fn(&str) -> bool + Send + Sync + 'static) -> Self {
        self.reserved = Arc::new(reserved);
        self
    }

    /// Reserve a fixed list of names
    pub fn reserved_names<I, S>(self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let names: Vec<String> = names.into_iter().map(Into::into).collect();
        self.reserved(move |name| names.iter().any(|reserved| reserved == name))
    }

    /// Set the prefix used to rename reserved parameters
    pub fn rename_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.rename_prefix = prefix.into();
        self
    }

    /// Set the insert-defaults policy
    pub fn insert_defaults(
        mut self,
        policy: impl InsertDefaultPolicy + Send + Sync + 'static,
    ) -> Self {
        self.insert_defaults = Arc::new(policy);
        self
    }

    pub(super) fn is_reserved(&self, name: &str) -> bool {
        (self.reserved)(name)
    }
}

impl fmt::Debug for CompileOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CompileOptions")
            .field("rename_prefix", &self.rename_prefix)
            .finish_non_exhaustive()
    }
}
