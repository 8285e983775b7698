use super::Expand;
use crate::util;

use proc_macro2::TokenStream;
use quote::quote;

impl Expand<'_> {
    pub(super) fn expand_record(&self) -> TokenStream {
        let ident = &self.ident;
        let table_name = &self.table.name;
        let width = util::int(self.fields.len());
        let doc = format!(" A row of {}.", self.table.describe());

        let field_decls = self.fields.iter().map(|field| {
            let name = &field.ident;
            let ty = &field.ty;
            let column = format!(" `{}` ({})", field.column.name, field.column.sql_type);
            quote! {
                #[doc = #column]
                pub #name: #ty,
            }
        });

        let loads = self.fields.iter().map(|field| {
            let name = &field.ident;
            quote! {
                #name: quarry_core::stmt::Primitive::load(fields.next().unwrap_or_default())?,
            }
        });

        let values = self.fields.iter().map(|field| {
            let name = &field.ident;
            quote!(quarry_core::stmt::Value::from(self.#name.clone()))
        });

        quote! {
            #[doc = #doc]
            #[derive(Debug, Clone, PartialEq)]
            pub struct #ident {
                #( #field_decls )*
            }

            impl #ident {
                pub const TABLE: &'static str = #table_name;

                /// Loads a record from one value per column, in column order.
                pub fn from_record(record: quarry_core::stmt::ValueRecord) -> quarry_core::Result<#ident> {
                    if record.len() != #width {
                        return Err(quarry_core::Error::invalid_result(format!(
                            "expected {} fields for `{}`, got {}",
                            #width,
                            Self::TABLE,
                            record.len()
                        )));
                    }

                    let mut fields = record.fields.into_iter();

                    Ok(#ident {
                        #( #loads )*
                    })
                }

                pub fn to_record(&self) -> quarry_core::stmt::ValueRecord {
                    quarry_core::stmt::ValueRecord::from_vec(vec![
                        #( #values ),*
                    ])
                }
            }
        }
    }
}
