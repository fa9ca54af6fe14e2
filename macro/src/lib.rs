extern crate proc_macro;

use proc_macro::TokenStream;
use syn::{parse_macro_input, DeriveInput};
use wsdlgen_codegen as codegen;

#[proc_macro_derive(Describe, attributes(soap))]
pub fn describe(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    codegen::derive_describe(&input)
        .unwrap_or_else(|err| err.to_compile_error())
        .into()
}
