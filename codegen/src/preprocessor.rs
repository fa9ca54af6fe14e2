use syn::{
    spanned::Spanned, Attribute, Data, DataEnum, DataStruct, DeriveInput, Error, Fields, Lit,
    Meta, NestedMeta, Result,
};

use super::types::{Body, Container, ContainerKind, Field, MessageContract, Variant};

const ATTRIBUTE: &str = "soap";

/// Flattens every `#[soap(...)]` attribute into its nested items.
fn soap_items(attributes: &[Attribute]) -> Result<Vec<NestedMeta>> {
    let mut items = Vec::new();

    for attribute in attributes.iter().filter(|attribute| attribute.path.is_ident(ATTRIBUTE)) {
        match attribute.parse_meta()? {
            Meta::List(list) => items.extend(list.nested),
            other => return Err(Error::new(other.span(), "expected #[soap(...)]")),
        }
    }

    Ok(items)
}

fn string_value(lit: &Lit) -> Result<String> {
    match lit {
        Lit::Str(lit) => Ok(lit.value()),
        other => Err(Error::new(other.span(), "expected a string literal")),
    }
}

fn int_value(lit: &Lit) -> Result<i32> {
    match lit {
        Lit::Int(lit) => lit.base10_parse(),
        other => Err(Error::new(other.span(), "expected an integer literal")),
    }
}

fn unknown(item: &NestedMeta) -> Error {
    Error::new(item.span(), "unknown soap attribute")
}

fn identifier(ident: &syn::Ident) -> String {
    let name = ident.to_string();
    match name.strip_prefix("r#") {
        Some(name) => name.to_owned(),
        None => name,
    }
}

pub fn preprocess(input: &DeriveInput) -> Result<Container> {
    if !input.generics.params.is_empty() {
        return Err(Error::new(
            input.generics.span(),
            "Describe cannot be derived for generic types",
        ));
    }

    let mut schema_name = None;
    let mut message_contract = None;
    let mut unwrapped = false;

    for item in soap_items(&input.attrs)? {
        match &item {
            NestedMeta::Meta(Meta::NameValue(value)) if value.path.is_ident("name") => {
                schema_name = Some(string_value(&value.lit)?);
            }

            NestedMeta::Meta(Meta::Path(path)) if path.is_ident("message_contract") => {
                message_contract = Some(MessageContract::Wrapped);
            }

            NestedMeta::Meta(Meta::Path(path)) if path.is_ident("unwrapped") => {
                unwrapped = true;
            }

            _ => return Err(unknown(&item)),
        }
    }

    if unwrapped {
        match message_contract {
            Some(_) => message_contract = Some(MessageContract::Unwrapped),
            None => {
                return Err(Error::new(
                    input.ident.span(),
                    "`unwrapped` requires `message_contract`",
                ))
            }
        }
    }

    let kind = match &input.data {
        Data::Struct(data) => ContainerKind::Object {
            message_contract,
            fields: preprocess_fields(data)?,
        },

        Data::Enum(data) => {
            if message_contract.is_some() {
                return Err(Error::new(
                    input.ident.span(),
                    "message contracts must be structs",
                ));
            }

            ContainerKind::Enum(preprocess_variants(data)?)
        }

        Data::Union(_) => {
            return Err(Error::new(
                input.ident.span(),
                "Describe cannot be derived for unions",
            ))
        }
    };

    Ok(Container {
        ident: input.ident.clone(),
        name: identifier(&input.ident),
        schema_name,
        kind,
    })
}

fn preprocess_fields(data: &DataStruct) -> Result<Vec<Field>> {
    let fields = match &data.fields {
        Fields::Named(fields) => &fields.named,
        Fields::Unit => return Ok(Vec::new()),
        Fields::Unnamed(fields) => {
            return Err(Error::new(
                fields.span(),
                "Describe requires named fields",
            ))
        }
    };

    let mut result = Vec::new();

    for field in fields {
        let mut name = field.ident.as_ref().map(identifier).unwrap_or_default();
        let mut ignore = false;
        let mut body: Option<Body> = None;

        for item in soap_items(&field.attrs)? {
            match &item {
                NestedMeta::Meta(Meta::NameValue(value)) if value.path.is_ident("rename") => {
                    name = string_value(&value.lit)?;
                }

                NestedMeta::Meta(Meta::Path(path)) if path.is_ident("ignore") => {
                    ignore = true;
                }

                NestedMeta::Meta(Meta::Path(path)) if path.is_ident("body") => {
                    body.get_or_insert_with(Body::default);
                }

                NestedMeta::Meta(Meta::NameValue(value)) if value.path.is_ident("order") => {
                    body.get_or_insert_with(Body::default).order = int_value(&value.lit)?;
                }

                NestedMeta::Meta(Meta::NameValue(value)) if value.path.is_ident("namespace") => {
                    body.get_or_insert_with(Body::default).namespace =
                        Some(string_value(&value.lit)?);
                }

                _ => return Err(unknown(&item)),
            }
        }

        result.push(Field {
            name,
            ty: field.ty.clone(),
            ignore,
            body,
        });
    }

    Ok(result)
}

fn preprocess_variants(data: &DataEnum) -> Result<Vec<Variant>> {
    let mut result = Vec::new();

    for variant in &data.variants {
        if !matches!(variant.fields, Fields::Unit) {
            return Err(Error::new(
                variant.fields.span(),
                "only unit variants can be described",
            ));
        }

        let mut name = identifier(&variant.ident);
        for item in soap_items(&variant.attrs)? {
            match &item {
                NestedMeta::Meta(Meta::NameValue(value)) if value.path.is_ident("rename") => {
                    name = string_value(&value.lit)?;
                }

                _ => return Err(unknown(&item)),
            }
        }

        result.push(Variant { name });
    }

    Ok(result)
}
