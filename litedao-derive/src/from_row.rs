//! FromRow derive macro implementation

use proc_macro2::TokenStream;
use quote::quote;
use syn::{DeriveInput, Result};

use crate::attrs::struct_fields;

pub fn derive_from_row_impl(input: DeriveInput) -> Result<TokenStream> {
    let name = &input.ident;
    let (impl_generics, ty_generics, where_clause) = input.generics.split_for_impl();

    let field_configs = struct_fields(&input)?;

    let field_extractions: Vec<TokenStream> = field_configs
        .iter()
        .map(|config| {
            let field_ident = &config.ident;
            let column_name = &config.column_name;
            let ty = &config.ty;

            if config.skip {
                quote! {
                    #field_ident: <#ty as ::std::default::Default>::default()
                }
            } else {
                quote! {
                    #field_ident: row.get::<#ty>(#column_name)?
                }
            }
        })
        .collect();

    let expanded = quote! {
        impl #impl_generics litedao::FromRow for #name #ty_generics #where_clause {
            fn from_row(row: &litedao::Row) -> litedao::Result<Self> {
                Ok(Self {
                    #(#field_extractions),*
                })
            }
        }
    };

    Ok(expanded)
}
