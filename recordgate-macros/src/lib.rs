//! Procedural macros for the recordgate project.
//!
//! This crate provides the `#[derive(Record)]` macro, used through the main
//! `recordgate` crate. The expansion refers to `::recordgate`, so the macro
//! is only usable alongside the facade crate.

#[allow(unused_extern_crates)]
extern crate self as recordgate_macros;

use proc_macro::TokenStream;
use quote::quote;
use syn::{parse_macro_input, Data, DeriveInput, Fields, LitStr};

/// Derives the `Record` trait for a named-field struct.
///
/// The collection name is required via a struct-level attribute. The identity
/// field is the one marked `#[record(id)]`, or the field named `id` when no
/// marker is present. The identity field must still be serde-renamed to
/// `_id`, since that is the key backends address.
///
/// # Usage
///
/// ```ignore
/// use recordgate::{Record, RecordId};
/// use serde::{Serialize, Deserialize};
///
/// #[derive(Debug, Clone, Serialize, Deserialize, Record)]
/// #[record(collection = "users")]
/// pub struct User {
///     #[serde(rename = "_id")]
///     pub id: RecordId,
///     pub name: String,
/// }
/// ```
///
/// With a differently named identity field:
///
/// ```ignore
/// #[derive(Debug, Clone, Serialize, Deserialize, Record)]
/// #[record(collection = "sessions")]
/// pub struct Session {
///     #[record(id)]
///     #[serde(rename = "_id")]
///     pub session_id: RecordId,
/// }
/// ```
#[proc_macro_derive(Record, attributes(record))]
pub fn derive_record(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    let name = &input.ident;

    let mut collection: Option<LitStr> = None;

    for attr in &input.attrs {
        if attr.path().is_ident("record") {
            let parsed = attr.parse_nested_meta(|meta| {
                if meta.path.is_ident("collection") {
                    collection = Some(meta.value()?.parse()?);
                    Ok(())
                } else {
                    Err(meta.error("unsupported record attribute; expected `collection`"))
                }
            });

            if let Err(err) = parsed {
                return err.to_compile_error().into();
            }
        }
    }

    let Some(collection) = collection else {
        return syn::Error::new_spanned(
            &input.ident,
            "#[derive(Record)] requires #[record(collection = \"...\")]",
        )
        .to_compile_error()
        .into();
    };

    let fields = match &input.data {
        Data::Struct(data) => match &data.fields {
            Fields::Named(named) => &named.named,
            _ => {
                return syn::Error::new_spanned(
                    &input.ident,
                    "#[derive(Record)] requires named fields",
                )
                .to_compile_error()
                .into();
            }
        },
        _ => {
            return syn::Error::new_spanned(&input.ident, "#[derive(Record)] requires a struct")
                .to_compile_error()
                .into();
        }
    };

    let id_field = fields
        .iter()
        .find(|field| {
            field.attrs.iter().any(|attr| {
                if !attr.path().is_ident("record") {
                    return false;
                }

                let mut is_id = false;
                let _ = attr.parse_nested_meta(|meta| {
                    if meta.path.is_ident("id") {
                        is_id = true;
                    }
                    Ok(())
                });
                is_id
            })
        })
        .or_else(|| {
            fields
                .iter()
                .find(|field| field.ident.as_ref().is_some_and(|ident| ident == "id"))
        })
        .and_then(|field| field.ident.clone());

    let Some(id_field) = id_field else {
        return syn::Error::new_spanned(
            &input.ident,
            "#[derive(Record)] requires a field named `id` or marked #[record(id)]",
        )
        .to_compile_error()
        .into();
    };

    quote! {
        impl ::recordgate::record::Record for #name {
            fn id(&self) -> &::recordgate::record::RecordId {
                &self.#id_field
            }

            fn collection_name() -> &'static str {
                #collection
            }
        }
    }
    .into()
}
