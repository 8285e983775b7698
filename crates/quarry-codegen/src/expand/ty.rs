use proc_macro2::{Ident, Literal, TokenStream};
use quarry_core::stmt::{Type, Value};
use quote::quote;

/// The host type of a record field.
///
/// Lists have no record representation and stay as raw values.
pub(super) fn field(ty: &Type) -> TokenStream {
    match ty {
        Type::Option(inner) => {
            let inner = field(inner);
            quote!(Option<#inner>)
        }
        Type::List(_) | Type::Unknown => quote!(quarry_core::stmt::Value),
        ty => scalar(ty),
    }
}

/// The host type of a method parameter.
pub(super) fn param(ty: &Type) -> TokenStream {
    match ty {
        Type::Option(inner) => {
            let inner = param(inner);
            quote!(Option<#inner>)
        }
        Type::List(item) => {
            let item = param(item);
            quote!(Vec<#item>)
        }
        Type::Unknown => quote!(quarry_core::stmt::Value),
        ty => scalar(ty),
    }
}

fn scalar(ty: &Type) -> TokenStream {
    match ty {
        Type::Bool => quote!(bool),
        Type::I16 => quote!(i16),
        Type::I32 => quote!(i32),
        Type::I64 => quote!(i64),
        Type::F32 => quote!(f32),
        Type::F64 => quote!(f64),
        Type::Bytes => quote!(Vec<u8>),
        // Carried in their textual form.
        Type::String
        | Type::Decimal
        | Type::Uuid
        | Type::Date
        | Type::Time
        | Type::DateTime
        | Type::DateTimeOffset
        | Type::Json => quote!(String),
        Type::List(_) | Type::Option(_) | Type::Unknown => quote!(quarry_core::stmt::Value),
    }
}

/// Converts a method argument named `ident` of type `ty` into a value.
pub(super) fn into_value(ident: &Ident, ty: &Type) -> TokenStream {
    match ty {
        Type::List(_) => quote!(quarry_core::stmt::Value::list(#ident)),
        Type::Option(inner) if inner.is_list() => quote! {
            #ident
                .map(|items| quarry_core::stmt::Value::list(items))
                .unwrap_or_default()
        },
        _ => quote!(quarry_core::stmt::Value::from(#ident)),
    }
}

/// A literal value as an expression.
pub(super) fn literal(value: &Value) -> TokenStream {
    match value {
        Value::Bool(v) => quote!(quarry_core::stmt::Value::Bool(#v)),
        Value::I32(v) => quote!(quarry_core::stmt::Value::I32(#v)),
        Value::I64(v) => quote!(quarry_core::stmt::Value::I64(#v)),
        Value::F64(v) => {
            let v = Literal::f64_suffixed(*v);
            quote!(quarry_core::stmt::Value::F64(#v))
        }
        Value::String(v) => quote!(quarry_core::stmt::Value::String(#v.to_string())),
        Value::Bytes(v) => quote!(quarry_core::stmt::Value::Bytes(vec![#( #v ),*])),
        Value::List(items) => {
            let items = items.iter().map(literal);
            quote!(quarry_core::stmt::Value::List(vec![#( #items ),*]))
        }
        Value::Null => quote!(quarry_core::stmt::Value::Null),
    }
}
