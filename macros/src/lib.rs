//! Derive macros for todolists action enums
//!
//! # Available Macros
//!
//! - `#[derive(Action)]` - Classifies action variants as intents or outcomes
//!
//! # Example
//!
//! ```ignore
//! use todolists_macros::Action;
//!
//! #[derive(Action, Clone, Debug)]
//! enum TodoAction {
//!     #[intent]
//!     AddTask { list_id: ListId, title: String },
//!
//!     #[outcome]
//!     TaskCreated { task: TaskRecord },
//! }
//!
//! // Generated methods:
//! assert!(TodoAction::AddTask { .. }.is_intent());
//! assert_eq!(action.name(), "AddTask");
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

use proc_macro::TokenStream;
use quote::quote;
use syn::{Attribute, Data, DeriveInput, Fields, Variant, parse_macro_input};

/// Derive macro for Action enums
///
/// Generates helper methods for action enums:
/// - `is_intent()` - Returns true if this variant is a caller intent
/// - `is_outcome()` - Returns true if this variant is a remote outcome
/// - `name()` - Returns the variant name, for logs
///
/// # Attributes
///
/// - `#[intent]` - Mark a variant as a caller intent
/// - `#[outcome]` - Mark a variant as an outcome fed back by an effect
///
/// # Errors
///
/// Produces a compile error if:
/// - Applied to a non-enum type
/// - A variant has both `#[intent]` and `#[outcome]`
/// - A variant has neither
#[proc_macro_derive(Action, attributes(intent, outcome))]
pub fn derive_action(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    let name = &input.ident;

    let Data::Enum(data_enum) = &input.data else {
        return syn::Error::new_spanned(input, "#[derive(Action)] can only be used on enums")
            .to_compile_error()
            .into();
    };

    let mut intent_arms = Vec::new();
    let mut outcome_arms = Vec::new();
    let mut name_arms = Vec::new();

    for variant in &data_enum.variants {
        let is_intent = has_attribute(&variant.attrs, "intent");
        let is_outcome = has_attribute(&variant.attrs, "outcome");

        if is_intent && is_outcome {
            return syn::Error::new_spanned(variant, "Variant cannot be both #[intent] and #[outcome]")
                .to_compile_error()
                .into();
        }

        if !is_intent && !is_outcome {
            return syn::Error::new_spanned(variant, "Variant must be marked #[intent] or #[outcome]")
                .to_compile_error()
                .into();
        }

        let pattern = variant_pattern(variant);
        let variant_name = variant.ident.to_string();

        if is_intent {
            intent_arms.push(quote! { #pattern => true, });
        } else {
            outcome_arms.push(quote! { #pattern => true, });
        }
        name_arms.push(quote! { #pattern => #variant_name, });
    }

    let expanded = quote! {
        impl #name {
            /// Returns true if this action is a caller intent
            #[must_use]
            pub const fn is_intent(&self) -> bool {
                match self {
                    #(#intent_arms)*
                    _ => false,
                }
            }

            /// Returns true if this action is an outcome produced by an effect
            #[must_use]
            pub const fn is_outcome(&self) -> bool {
                match self {
                    #(#outcome_arms)*
                    _ => false,
                }
            }

            /// Returns the variant name
            #[must_use]
            pub const fn name(&self) -> &'static str {
                match self {
                    #(#name_arms)*
                }
            }
        }
    };

    TokenStream::from(expanded)
}

/// Match pattern ignoring the variant's fields
fn variant_pattern(variant: &Variant) -> proc_macro2::TokenStream {
    let ident = &variant.ident;
    match variant.fields {
        Fields::Named(_) => quote! { Self::#ident { .. } },
        Fields::Unnamed(_) => quote! { Self::#ident(..) },
        Fields::Unit => quote! { Self::#ident },
    }
}

/// Helper function to check if an attribute list contains a specific attribute
fn has_attribute(attrs: &[Attribute], name: &str) -> bool {
    attrs.iter().any(|attr| attr.path().is_ident(name))
}
