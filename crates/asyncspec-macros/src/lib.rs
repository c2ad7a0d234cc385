//! Derive macro for extension-preserving AsyncAPI records.
//!
//! `#[derive(Record)]` implements `asyncspec::codec::Record` plus `serde`'s
//! `Serialize` and `Deserialize` for a struct with named fields. Declared
//! fields are written under their canonical key; every other key of the
//! input mapping lands in the field marked `#[record(extensions)]`.
//!
//! # Example
//!
//! ```ignore
//! use asyncspec::{Extensions, Record};
//!
//! #[derive(Debug, Clone, Default, PartialEq, Record)]
//! pub struct CorrelationId {
//!     pub description: String,
//!     #[record(always)]
//!     pub location: String,
//!     #[record(extensions)]
//!     pub extensions: Extensions,
//! }
//! ```
//!
//! Field attributes:
//! - `rename = "key"`: canonical key (default: the field name in camelCase)
//! - `always`: emit the field even when it holds its default value
//! - `flatten`: embed another record's declared fields in the same mapping.
//!   Its extension bag is written too, under the declared fields; on decode
//!   every leftover key lands in the outer record's bag.
//! - `extensions`: the extension bag (exactly one per record)

use proc_macro::TokenStream;
use proc_macro2::TokenStream as TokenStream2;
use quote::quote;
use syn::ext::IdentExt;
use syn::{parse_macro_input, Data, DeriveInput, Error, Field, Fields, Ident, LitStr, Type};

/// Derives the extension-preserving codec for a record struct.
///
/// The generated code refers to the `asyncspec` crate by absolute path, so
/// the deriving crate must either depend on it or be it.
#[proc_macro_derive(Record, attributes(record))]
pub fn derive_record(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    expand_record(&input)
        .unwrap_or_else(Error::into_compile_error)
        .into()
}

enum FieldKind {
    Plain { key: String, always: bool },
    Flatten,
    Extensions,
}

struct RecordField {
    ident: Ident,
    ty: Type,
    kind: FieldKind,
}

fn expand_record(input: &DeriveInput) -> syn::Result<TokenStream2> {
    let name = &input.ident;

    if !input.generics.params.is_empty() {
        return Err(Error::new_spanned(
            &input.generics,
            "Record cannot be derived for generic types",
        ));
    }

    let named = match &input.data {
        Data::Struct(data) => match &data.fields {
            Fields::Named(named) => &named.named,
            _ => {
                return Err(Error::new_spanned(
                    name,
                    "Record requires a struct with named fields",
                ))
            }
        },
        _ => return Err(Error::new_spanned(name, "Record can only be derived for structs")),
    };

    let fields = named
        .iter()
        .map(parse_field)
        .collect::<syn::Result<Vec<_>>>()?;

    let mut bags = fields
        .iter()
        .filter(|f| matches!(f.kind, FieldKind::Extensions));
    let ext = match (bags.next(), bags.next()) {
        (Some(field), None) => &field.ident,
        _ => {
            return Err(Error::new_spanned(
                name,
                "Record requires exactly one #[record(extensions)] field",
            ))
        }
    };

    let krate = quote!(::asyncspec);
    let mut merge = Vec::new();
    let mut encode = Vec::new();
    let mut decode = Vec::new();
    let mut idents = Vec::new();

    for field in &fields {
        let ident = &field.ident;
        let ty = &field.ty;
        match &field.kind {
            FieldKind::Extensions => continue,
            FieldKind::Flatten => {
                merge.push(quote! {
                    encoder.extend(#krate::codec::Record::extensions(&self.#ident));
                });
                encode.push(quote! {
                    #krate::codec::Record::encode_fields(&self.#ident, encoder)?;
                });
                decode.push(quote! {
                    let #ident = <#ty as #krate::codec::Record>::decode_fields(decoder)?;
                });
            }
            FieldKind::Plain { key, always } => {
                if *always {
                    encode.push(quote! { encoder.always(#key, &self.#ident)?; });
                } else {
                    encode.push(quote! { encoder.field(#key, &self.#ident)?; });
                }
                decode.push(quote! { let #ident = decoder.field(#key)?; });
            }
        }
        idents.push(ident);
    }

    Ok(quote! {
        impl #krate::codec::Record for #name {
            fn extensions(&self) -> &#krate::Extensions {
                &self.#ext
            }

            fn extensions_mut(&mut self) -> &mut #krate::Extensions {
                &mut self.#ext
            }

            #[allow(unused_variables)]
            fn encode_fields(
                &self,
                encoder: &mut #krate::codec::Encoder,
            ) -> ::core::result::Result<(), #krate::SpecError> {
                #(#merge)*
                #(#encode)*
                ::core::result::Result::Ok(())
            }

            #[allow(unused_variables)]
            fn decode_fields(
                decoder: &mut #krate::codec::Decoder,
            ) -> ::core::result::Result<Self, #krate::SpecError> {
                #(#decode)*
                ::core::result::Result::Ok(Self {
                    #(#idents,)*
                    #ext: ::core::default::Default::default(),
                })
            }
        }

        impl ::serde::Serialize for #name {
            fn serialize<__S>(&self, serializer: __S) -> ::core::result::Result<__S::Ok, __S::Error>
            where
                __S: ::serde::Serializer,
            {
                let map = #krate::codec::encode(self)
                    .map_err(<__S::Error as ::serde::ser::Error>::custom)?;
                ::serde::Serialize::serialize(&map, serializer)
            }
        }

        impl<'de> ::serde::Deserialize<'de> for #name {
            fn deserialize<__D>(deserializer: __D) -> ::core::result::Result<Self, __D::Error>
            where
                __D: ::serde::Deserializer<'de>,
            {
                let map = <#krate::codec::Map as ::serde::Deserialize>::deserialize(deserializer)?;
                #krate::codec::decode(map).map_err(<__D::Error as ::serde::de::Error>::custom)
            }
        }
    })
}

fn parse_field(field: &Field) -> syn::Result<RecordField> {
    let ident = field
        .ident
        .clone()
        .ok_or_else(|| Error::new_spanned(field, "Record fields must be named"))?;

    let mut rename = None;
    let mut always = false;
    let mut flatten = false;
    let mut extensions = false;

    for attr in &field.attrs {
        if !attr.path().is_ident("record") {
            continue;
        }
        attr.parse_nested_meta(|meta| {
            if meta.path.is_ident("rename") {
                let lit: LitStr = meta.value()?.parse()?;
                rename = Some(lit.value());
            } else if meta.path.is_ident("always") {
                always = true;
            } else if meta.path.is_ident("flatten") {
                flatten = true;
            } else if meta.path.is_ident("extensions") {
                extensions = true;
            } else {
                return Err(meta.error("unsupported record attribute"));
            }
            Ok(())
        })?;
    }

    let kind = if extensions {
        FieldKind::Extensions
    } else if flatten {
        FieldKind::Flatten
    } else {
        let key = rename.unwrap_or_else(|| camel_case(&ident.unraw().to_string()));
        FieldKind::Plain { key, always }
    };

    Ok(RecordField {
        ident,
        ty: field.ty.clone(),
        kind,
    })
}

/// `protocol_version` -> `protocolVersion`.
fn camel_case(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    let mut upper = false;
    for ch in name.chars() {
        if ch == '_' {
            upper = true;
        } else if upper {
            out.extend(ch.to_uppercase());
            upper = false;
        } else {
            out.push(ch);
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn camel_case_joins_words() {
        assert_eq!(camel_case("protocol_version"), "protocolVersion");
        assert_eq!(camel_case("open_id_connect_url"), "openIdConnectUrl");
    }

    #[test]
    fn camel_case_keeps_single_word() {
        assert_eq!(camel_case("url"), "url");
    }

    #[test]
    fn parse_field_reads_rename() {
        let field: Field = syn::parse_quote! {
            #[record(rename = "$ref")]
            pub pointer: String
        };
        let parsed = parse_field(&field).unwrap();
        assert!(matches!(parsed.kind, FieldKind::Plain { ref key, always: false } if key == "$ref"));
    }

    #[test]
    fn parse_field_unraws_keywords() {
        let field: Field = syn::parse_quote! { pub r#in: String };
        let parsed = parse_field(&field).unwrap();
        assert!(matches!(parsed.kind, FieldKind::Plain { ref key, .. } if key == "in"));
    }

    #[test]
    fn parse_field_rejects_unknown_attribute() {
        let field: Field = syn::parse_quote! {
            #[record(skip)]
            pub url: String
        };
        assert!(parse_field(&field).is_err());
    }
}
