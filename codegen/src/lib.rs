use proc_macro2::TokenStream;
use syn::DeriveInput;

use codegen::Codegen;

mod codegen;
mod preprocessor;
mod types;

/// Expands `#[derive(Describe)]` for `input`.
pub fn derive_describe(input: &DeriveInput) -> syn::Result<TokenStream> {
    let container = preprocessor::preprocess(input)?;
    Ok(container.codegen())
}
