use super::{ty, Expand};
use crate::{util, QueryMethod};

use proc_macro2::{Ident, TokenStream};
use quarry_core::{
    stmt::{OuterParam, ParamSource},
    Error, Result,
};
use quarry_sql::CompiledQuery;
use quote::{format_ident, quote};

impl Expand<'_> {
    /// A function returning the query's SQL and arguments, and a `_row`
    /// function that loads a result row into the projected records.
    pub(super) fn expand_query_method(&self, query: &QueryMethod) -> Result<TokenStream> {
        let compiled = self
            .generator
            .serializer
            .compile(&query.spec)
            .map_err(|err| err.context(quarry_core::err!("query `{}`", query.name)))?;

        let name = util::ident(&query.name)?;
        let method = self.expand_query_fn(&name, &compiled)?;
        let loader = self.expand_row_loader(&format_ident!("{}_row", name), &compiled)?;

        Ok(quote! {
            #method
            #loader
        })
    }

    fn expand_query_fn(&self, name: &Ident, compiled: &CompiledQuery) -> Result<TokenStream> {
        let sql = &compiled.sql;

        let mut args = vec![];
        let mut docs = vec![];
        for param in &compiled.method_params {
            let ident = util::ident(&param.name)?;
            let ty = ty::param(&param.ty);
            args.push(quote!(#ident: #ty));

            if let Some(default) = &param.default {
                let doc = format!(" `{}` defaults to `{default:?}`.", param.name);
                docs.push(quote!(#[doc = #doc]));
            }
        }

        let mut values = vec![];
        for binding in &compiled.params {
            values.push(match &binding.source {
                ParamSource::Literal(value) => ty::literal(value),
                ParamSource::OuterParam(name) => {
                    let param = method_param(&compiled.method_params, name)?;
                    ty::into_value(&util::ident(&param.name)?, &param.ty)
                }
                ParamSource::Column(_) => {
                    return Err(Error::invalid_statement(
                        "query binds a record field; only CRUD statements may",
                    ))
                }
            });
        }

        // Declared parameters the predicate never references.
        let unused = compiled.method_params.iter().any(|param| {
            !compiled
                .params
                .iter()
                .any(|binding| binding.source.as_outer_param() == Some(param.name.as_str()))
        });
        let allow = unused.then(|| quote!(#[allow(unused_variables)]));

        Ok(quote! {
            #( #docs )*
            #allow
            pub fn #name(#( #args ),*) -> (&'static str, Vec<quarry_core::stmt::Value>) {
                let sql = #sql;
                let params = vec![#( #values ),*];
                (sql, params)
            }
        })
    }

    fn expand_row_loader(&self, name: &Ident, compiled: &CompiledQuery) -> Result<TokenStream> {
        let width = util::int(compiled.layout.width);

        let mut tys = vec![];
        let mut loads = vec![];

        for table in &compiled.layout.tables {
            let schema_table = self.generator.schema.get_table(table.table)?;
            let record = util::ident(
                &self
                    .generator
                    .naming
                    .table_name_to_type_name(&schema_table.name),
            )?;

            let start = util::int(table.offset);
            let end = util::int(table.offset + table.len);
            let load = quote! {
                #record::from_record(quarry_core::stmt::ValueRecord::from_vec(
                    row[#start..#end].to_vec(),
                ))?
            };

            if table.may_be_null && !table.primary_key.is_empty() {
                let key = table
                    .primary_key
                    .iter()
                    .map(|index| util::int(table.offset + index));

                tys.push(quote!(Option<#record>));
                loads.push(quote! {
                    if #( row[#key].is_null() )&&* {
                        None
                    } else {
                        Some(#load)
                    }
                });
            } else {
                tys.push(quote!(#record));
                loads.push(load);
            }
        }

        Ok(quote! {
            pub fn #name(row: Vec<quarry_core::stmt::Value>) -> quarry_core::Result<(#( #tys, )*)> {
                if row.len() != #width {
                    return Err(quarry_core::Error::invalid_result(format!(
                        "expected a row of {} columns, got {}",
                        #width,
                        row.len()
                    )));
                }

                Ok((#( #loads, )*))
            }
        })
    }
}

fn method_param<'a>(params: &'a [OuterParam], name: &str) -> Result<&'a OuterParam> {
    params
        .iter()
        .find(|param| param.name == name)
        .ok_or_else(|| Error::schema_lookup("parameter", name, "this query"))
}
