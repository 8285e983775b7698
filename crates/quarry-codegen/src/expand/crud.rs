use super::{ty, Expand};
use crate::util;

use proc_macro2::TokenStream;
use quarry_core::{
    schema::{Column, Table},
    stmt::{
        CrudKind, CrudRequest, GeneratedDefault, InsertDefaultPolicy, ParamSource, Value,
        ValueRecord,
    },
    Error, Result,
};
use quarry_sql::{CrudStatement, Serializer};
use quote::{format_ident, quote};

/// Columns decided per record multiply the insert statements emitted.
const MAX_PER_RECORD_DEFAULTS: usize = 6;

/// Writes exactly the listed defaultable columns.
struct WriteColumns(Vec<usize>);

impl InsertDefaultPolicy for WriteColumns {
    fn include(
        &self,
        _table: &Table,
        column: &Column,
        _instance: Option<&ValueRecord>,
        _proposed: Option<&Value>,
    ) -> bool {
        self.0.contains(&column.id.index)
    }
}

impl Expand<'_> {
    /// `insert`, `update` and `delete` on the record type.
    ///
    /// Tables an update or delete cannot target (no primary key, nothing to
    /// write) get no method for it.
    pub(super) fn expand_crud_methods(&self) -> Result<TokenStream> {
        let mut methods = vec![self.expand_insert()?];

        for kind in [CrudKind::Update, CrudKind::Delete] {
            let request = CrudRequest {
                kind,
                table: self.table.id,
                instance: None,
            };

            let stmt = match self.generator.serializer.compile_crud(&request) {
                Ok(stmt) => stmt,
                Err(err) if err.is_invalid_statement() => {
                    tracing::debug!(table = %self.table.name, %kind, %err, "skipping method");
                    continue;
                }
                Err(err) => return Err(err),
            };

            let doc = match kind {
                CrudKind::Update => {
                    " Updates the record by its identifier columns. The first column of the \
                     second statement is the number of rows affected, followed by the row."
                }
                _ => {
                    " Deletes the record by its identifier columns. The second statement \
                     returns the number of rows affected."
                }
            };

            let name = format_ident!("{}", kind.as_str());
            let statements = self.expand_statements(&stmt)?;
            methods.push(quote! {
                #[doc = #doc]
                pub fn #name(&self) -> Vec<(&'static str, Vec<quarry_core::stmt::Value>)> {
                    #statements
                }
            });
        }

        Ok(quote!(#( #methods )*))
    }

    /// The insert-defaults policy is applied ahead of time. Columns it leaves
    /// to the record's values get one statement per combination, picked when
    /// the method runs.
    fn expand_insert(&self) -> Result<TokenStream> {
        let policy = &self.generator.serializer.options().insert_defaults;

        let mut written = vec![];
        let mut per_record = vec![];
        for column in &self.table.columns {
            if !column.has_default || column.auto_increment || column.computed {
                continue;
            }

            match policy.generated(self.table, column) {
                Some(GeneratedDefault::Write) => written.push(column.id.index),
                Some(GeneratedDefault::Skip) => {}
                Some(GeneratedDefault::WhenNonDefault) => per_record.push(column.id.index),
                None => {
                    return Err(Error::invalid_statement(format!(
                        "the insert-defaults policy for column `{}` needs values generated code cannot supply",
                        column.name
                    )))
                }
            }
        }

        if per_record.len() > MAX_PER_RECORD_DEFAULTS {
            return Err(Error::invalid_statement(format!(
                "{} has {} columns whose defaults are decided per record; at most {} are supported",
                self.table.describe(),
                per_record.len(),
                MAX_PER_RECORD_DEFAULTS
            )));
        }

        let mut variants = vec![];
        for mask in 0..1usize << per_record.len() {
            let mut columns = written.clone();
            columns.extend(
                per_record
                    .iter()
                    .enumerate()
                    .filter(|(bit, _)| mask & (1 << bit) != 0)
                    .map(|(_, index)| *index),
            );

            let stmt = self.compile_insert(columns)?;
            variants.push(self.expand_statements(&stmt)?);
        }

        let body = if per_record.is_empty() {
            variants.remove(0)
        } else {
            let checks = per_record.iter().enumerate().map(|(bit, index)| {
                let field = &self.field(*index).ident;
                let bit = util::int(bit);
                quote! {
                    if !quarry_core::stmt::Value::from(self.#field.clone()).looks_default() {
                        variant |= 1 << #bit;
                    }
                }
            });

            let last = variants.pop();
            let arms = variants.iter().enumerate().map(|(mask, statements)| {
                let mask = util::int(mask);
                quote!(#mask => #statements,)
            });

            quote! {
                let mut variant = 0usize;
                #( #checks )*
                match variant {
                    #( #arms )*
                    _ => #last,
                }
            }
        };

        let doc = if per_record.is_empty() {
            " Inserts the record and reads it back."
        } else {
            " Inserts the record and reads it back. Defaultable columns holding a \
             default-looking value are left to the database."
        };

        Ok(quote! {
            #[doc = #doc]
            pub fn insert(&self) -> Vec<(&'static str, Vec<quarry_core::stmt::Value>)> {
                #body
            }
        })
    }

    fn compile_insert(&self, columns: Vec<usize>) -> Result<CrudStatement> {
        let serializer = &self.generator.serializer;
        let options = serializer.options().clone().insert_defaults(WriteColumns(columns));

        Serializer::new(self.generator.schema, serializer.dialect())
            .with_options(options)
            .compile_crud(&CrudRequest::insert(self.table.id))
    }

    /// `vec![(sql, values), ...]` for each statement.
    fn expand_statements(&self, stmt: &CrudStatement) -> Result<TokenStream> {
        let mut statements = vec![];
        for text in stmt.statements() {
            let sql = &text.sql;

            let mut values = vec![];
            for binding in stmt.params_of(text) {
                values.push(match &binding.source {
                    ParamSource::Column(column) => {
                        let field = &self.field(column.index).ident;
                        quote!(quarry_core::stmt::Value::from(self.#field.clone()))
                    }
                    ParamSource::Literal(value) => ty::literal(value),
                    ParamSource::OuterParam(name) => {
                        return Err(Error::invalid_statement(format!(
                            "{} statement binds method parameter `{name}`",
                            stmt.kind
                        )))
                    }
                });
            }

            statements.push(quote!((#sql, vec![#( #values ),*])));
        }

        Ok(quote!(vec![#( #statements ),*]))
    }
}
