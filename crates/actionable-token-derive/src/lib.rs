//! Payload declaration macro for actionable-token.

use proc_macro::TokenStream;
use proc_macro2::TokenStream as TokenStream2;
use quote::{format_ident, quote};
use syn::{DeriveInput, parse_macro_input};

/// Registered claims every token payload carries: field, wire name, type.
const REGISTERED: [(&str, &str, &str); 7] = [
    ("issuer", "iss", "string"),
    ("subject", "sub", "string"),
    ("audience", "aud", "audience"),
    ("expiration", "exp", "time"),
    ("not_before", "nbf", "time"),
    ("issued_at", "iat", "time"),
    ("jwt_id", "jti", "string"),
];

/// Declare an actionable message payload.
///
/// Prepends the registered claims (`iss`, `sub`, `aud`, `exp`, `nbf`, `iat`, `jti`) as
/// optional public fields, derives `Debug`, `Clone` and `miniserde::Deserialize`, and
/// implements `actionable_token::StandardClaims`. The acting user of a message is the
/// generated `subject` field. `aud` deserializes into `actionable_token::Audience`, so
/// both the string and the array form are accepted.
///
/// ```ignore
/// #[actionable_token::claims]
/// pub struct ExpenseClaims {
///     #[serde(rename = "sender")]
///     pub sender: Option<String>,
/// }
/// ```
#[proc_macro_attribute]
pub fn claims(_args: TokenStream, input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    match expand(&input) {
        Ok(tokens) => tokens.into(),
        Err(err) => err.to_compile_error().into(),
    }
}

fn expand(input: &DeriveInput) -> syn::Result<TokenStream2> {
    let syn::Data::Struct(syn::DataStruct {
        fields: syn::Fields::Named(named),
        ..
    }) = &input.data
    else {
        return Err(syn::Error::new_spanned(
            &input.ident,
            "#[claims] needs a struct with named fields",
        ));
    };

    let DeriveInput {
        attrs,
        vis,
        ident,
        generics,
        ..
    } = input;
    let (impl_generics, ty_generics, where_clause) = generics.split_for_impl();
    let payload_fields = &named.named;

    let registered_fields = REGISTERED.iter().map(|(field, wire, kind)| {
        let field = format_ident!("{field}");
        let ty = match *kind {
            "audience" => quote!(Option<actionable_token::Audience>),
            "time" => quote!(Option<i64>),
            _ => quote!(Option<String>),
        };
        quote! {
            #[serde(rename = #wire)]
            pub #field: #ty,
        }
    });

    Ok(quote! {
        #(#attrs)*
        #[derive(Debug, Clone, miniserde::Deserialize)]
        #vis struct #ident #generics #where_clause {
            #(#registered_fields)*
            #payload_fields
        }

        impl #impl_generics actionable_token::StandardClaims for #ident #ty_generics #where_clause {
            fn issuer(&self) -> Option<&str> {
                self.issuer.as_deref()
            }
            fn subject(&self) -> Option<&str> {
                self.subject.as_deref()
            }
            fn audience(&self) -> Option<&str> {
                self.audience.as_ref().and_then(actionable_token::Audience::single)
            }
            fn audiences(&self) -> Option<&actionable_token::Audience> {
                self.audience.as_ref()
            }
            fn expiration(&self) -> Option<i64> {
                self.expiration
            }
            fn not_before(&self) -> Option<i64> {
                self.not_before
            }
            fn issued_at(&self) -> Option<i64> {
                self.issued_at
            }
            fn jwt_id(&self) -> Option<&str> {
                self.jwt_id.as_deref()
            }
        }
    })
}
