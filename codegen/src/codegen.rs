use super::types::{Body, Container, ContainerKind, Field, MessageContract, Variant};
use proc_macro2::TokenStream;
use quote::quote;

pub trait Codegen {
    fn codegen(&self) -> TokenStream;
}

fn codegen_all(all: &[impl Codegen]) -> Vec<TokenStream> {
    all.iter().map(Codegen::codegen).collect()
}

impl Codegen for Container {
    fn codegen(&self) -> TokenStream {
        let ident = &self.ident;
        let name = &self.name;

        let descriptor = match &self.kind {
            ContainerKind::Object {
                message_contract: None,
                fields,
            } => {
                let members = codegen_all(fields);
                quote! {
                    ::wsdlgen_wsdl::types::TypeDescriptor::object(#name)
                        #(#members)*
                }
            }

            ContainerKind::Object {
                message_contract: Some(message_contract),
                fields,
            } => {
                let wrapped = *message_contract == MessageContract::Wrapped;
                let members = codegen_all(fields);
                quote! {
                    ::wsdlgen_wsdl::types::TypeDescriptor::message_contract(#name, #wrapped)
                        #(#members)*
                }
            }

            ContainerKind::Enum(variants) => {
                let values = codegen_all(variants);
                quote! {
                    ::wsdlgen_wsdl::types::TypeDescriptor::enumeration(
                        #name,
                        ::std::vec![#(#values),*],
                    )
                }
            }
        };

        let uses_registry = match &self.kind {
            ContainerKind::Object { fields, .. } => fields.iter().any(|field| !field.ignore),
            ContainerKind::Enum(_) => false,
        };
        let registry = if uses_registry {
            quote! { registry }
        } else {
            quote! { _ }
        };

        let schema_name = self
            .schema_name
            .as_ref()
            .map(|schema_name| quote! { .with_schema_name(#schema_name) });

        quote! {
            impl ::wsdlgen_wsdl::Describe for #ident {
                fn describe(
                    registry: &mut ::wsdlgen_wsdl::registry::TypeRegistry,
                ) -> ::wsdlgen_wsdl::types::TypeRef {
                    registry.define(
                        ::std::concat!(::std::module_path!(), "::", #name),
                        |#registry| {
                            #descriptor
                                #schema_name
                        },
                    )
                }
            }
        }
    }
}

/// One `.with_member(...)` call; ignored fields contribute nothing, so their
/// types need not be describable.
impl Codegen for Field {
    fn codegen(&self) -> TokenStream {
        if self.ignore {
            return quote! {};
        }

        let name = &self.name;
        let ty = &self.ty;

        let body = match &self.body {
            Some(Body { order, namespace }) => {
                let namespace = namespace
                    .as_ref()
                    .map(|namespace| quote! { .body_namespace(#namespace) });
                quote! { .body(#order) #namespace }
            }

            None => quote! {},
        };

        quote! {
            .with_member(
                ::wsdlgen_wsdl::types::Member::new(
                    #name,
                    <#ty as ::wsdlgen_wsdl::Describe>::describe(registry),
                )
                #body
            )
        }
    }
}

impl Codegen for Variant {
    fn codegen(&self) -> TokenStream {
        let name = &self.name;
        quote! { ::std::string::String::from(#name) }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::preprocessor::preprocess;
    use syn::parse_quote;

    fn expand(input: syn::DeriveInput) -> String {
        preprocess(&input)
            .unwrap()
            .codegen()
            .to_string()
            .chars()
            .filter(|c| !c.is_whitespace())
            .collect()
    }

    #[test]
    fn object_members() {
        let tokens = expand(parse_quote! {
            #[soap(name = "Person")]
            struct Human {
                name: String,
                #[soap(ignore)]
                cache: Vec<u8>,
            }
        });

        assert!(tokens.contains("TypeDescriptor::object(\"Human\")"));
        assert!(tokens.contains(".with_schema_name(\"Person\")"));
        assert!(tokens.contains("Member::new(\"name\","));
        assert!(!tokens.contains("cache"));
    }

    #[test]
    fn message_contract_body() {
        let tokens = expand(parse_quote! {
            #[soap(message_contract, unwrapped)]
            struct Request {
                #[soap(order = 3, namespace = "http://other/")]
                payload: i32,
            }
        });

        assert!(tokens.contains("message_contract(\"Request\",false)"));
        assert!(tokens.contains(".body(3i32)"));
        assert!(tokens.contains(".body_namespace(\"http://other/\")"));
    }

    #[test]
    fn enumeration_values() {
        let tokens = expand(parse_quote! {
            enum Color {
                Red,
                #[soap(rename = "DarkGreen")]
                Green,
            }
        });

        assert!(tokens.contains("enumeration"));
        assert!(tokens.contains("\"Red\""));
        assert!(tokens.contains("\"DarkGreen\""));
    }
}
