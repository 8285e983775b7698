use crate::reserved::KEYWORDS;

use proc_macro2::{Ident, Span, TokenStream};
use quarry_core::{Error, Result};

pub(crate) fn int(v: usize) -> TokenStream {
    let lit = proc_macro2::Literal::usize_unsuffixed(v);
    quote::quote!(#lit)
}

/// Parses `name` as an identifier, falling back to a raw identifier for
/// keywords (`r#type`).
pub(crate) fn ident(name: &str) -> Result<Ident> {
    if let Ok(ident) = syn::parse_str::<Ident>(name) {
        return Ok(ident);
    }

    // `self`, `Self`, `super` and `crate` cannot be raw.
    if KEYWORDS.contains(&name) && !matches!(name, "self" | "Self" | "super" | "crate") {
        return Ok(Ident::new_raw(name, Span::call_site()));
    }

    Err(Error::invalid_statement(format!(
        "`{name}` is not a valid Rust identifier"
    )))
}
