//! FieldSource derive macro implementation

use proc_macro2::TokenStream;
use quote::quote;
use syn::{DeriveInput, Result};

use crate::attrs::struct_fields;

pub fn derive_field_source_impl(input: DeriveInput) -> Result<TokenStream> {
    let name = &input.ident;
    let (impl_generics, ty_generics, where_clause) = input.generics.split_for_impl();

    let field_configs = struct_fields(&input)?;

    // Declaration order is column order
    let pairs: Vec<TokenStream> = field_configs
        .iter()
        .filter(|c| !c.skip)
        .map(|config| {
            let field_ident = &config.ident;
            let column_name = &config.column_name;
            quote! {
                (
                    ::std::string::String::from(#column_name),
                    litedao::ToValue::to_value(&self.#field_ident),
                )
            }
        })
        .collect();

    let expanded = quote! {
        impl #impl_generics litedao::FieldSource for #name #ty_generics #where_clause {
            fn fields(&self) -> ::std::vec::Vec<(::std::string::String, litedao::Value)> {
                ::std::vec![#(#pairs),*]
            }
        }
    };

    Ok(expanded)
}
