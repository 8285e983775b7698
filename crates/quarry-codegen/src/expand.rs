mod crud;
mod query;
mod record;
mod ty;

use crate::{util, Generator, QueryMethod};

use proc_macro2::{Ident, TokenStream};
use quarry_core::{
    schema::{Column, Table},
    Result,
};
use quote::quote;

struct Expand<'a> {
    generator: &'a Generator<'a>,
    table: &'a Table,

    /// The record type's identifier
    ident: Ident,

    /// One per column, in column order
    fields: Vec<Field<'a>>,
}

struct Field<'a> {
    column: &'a Column,
    ident: Ident,
    ty: TokenStream,
}

pub(crate) fn table(
    generator: &Generator<'_>,
    table: &Table,
    queries: &[&QueryMethod],
) -> Result<TokenStream> {
    let naming = generator.naming;
    let ident = util::ident(&naming.table_name_to_type_name(&table.name))?;

    let mut fields = Vec::with_capacity(table.columns.len());
    for column in &table.columns {
        let name = naming.column_name_to_field_name(
            table.id.0,
            &table.name,
            column.id.index,
            &column.name,
        );
        let host = generator.serializer.dialect().column_type(column)?;

        fields.push(Field {
            column,
            ident: util::ident(&name)?,
            ty: ty::field(&host),
        });
    }

    let expand = Expand {
        generator,
        table,
        ident,
        fields,
    };

    let record = expand.expand_record();
    let crud = expand.expand_crud_methods()?;

    let mut query_methods = vec![];
    for query in queries {
        query_methods.push(expand.expand_query_method(query)?);
    }

    tracing::debug!(
        table = %table.name,
        record = %expand.ident,
        queries = queries.len(),
        "generated record type"
    );

    let ident = &expand.ident;
    Ok(quote! {
        #record

        impl #ident {
            #crud
            #( #query_methods )*
        }
    })
}

impl Expand<'_> {
    fn field(&self, index: usize) -> &Field<'_> {
        &self.fields[index]
    }
}
