mod expand;
mod reserved;
mod util;

pub use reserved::{is_reserved, KEYWORDS, SCRATCH_NAMES};

use proc_macro2::TokenStream;
use quarry_core::{
    schema::{NamingConvention, Table},
    stmt::QuerySpec,
    Result, Schema,
};
use quarry_sql::{CompileOptions, Dialect, Serializer};
use quote::quote;

/// A query emitted as an associated function of its root table's record type.
#[derive(Debug, Clone)]
pub struct QueryMethod {
    pub name: String,
    pub spec: QuerySpec,
}

/// Emits Rust source for the tables of a schema.
///
/// Method parameter names that collide with identifiers the generated bodies
/// use are renamed by the serializer; see [`is_reserved`].
pub struct Generator<'a> {
    schema: &'a Schema,
    serializer: Serializer<'a>,
    naming: &'a dyn NamingConvention,
}

impl QueryMethod {
    pub fn new(name: impl Into<String>, spec: QuerySpec) -> QueryMethod {
        QueryMethod {
            name: name.into(),
            spec,
        }
    }
}

impl<'a> Generator<'a> {
    pub fn new(
        schema: &'a Schema,
        dialect: &'a dyn Dialect,
        options: CompileOptions,
        naming: &'a dyn NamingConvention,
    ) -> Generator<'a> {
        let user = options.reserved.clone();
        let options = options.reserved(move |name| is_reserved(name) || user(name));

        Generator {
            schema,
            serializer: Serializer::new(schema, dialect).with_options(options),
            naming,
        }
    }

    pub fn serializer(&self) -> &Serializer<'a> {
        &self.serializer
    }

    /// Record types for every table, with CRUD methods and the given queries.
    pub fn generate(&self, queries: &[QueryMethod]) -> Result<TokenStream> {
        let mut items = vec![];

        for table in &self.schema.tables {
            let queries: Vec<_> = queries
                .iter()
                .filter(|query| query.spec.root().table == table.id)
                .collect();

            items.push(self.table(table, &queries)?);
        }

        Ok(quote!(#( #items )*))
    }

    /// The record type of one table and its methods.
    pub fn table(&self, table: &Table, queries: &[&QueryMethod]) -> Result<TokenStream> {
        expand::table(self, table, queries).map_err(|err| {
            err.context(quarry_core::err!("generating code for {}", table.describe()))
        })
    }
}
