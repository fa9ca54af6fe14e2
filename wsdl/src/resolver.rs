use crate::{
    error::Error,
    namespaces::{QualifiedName, XSD_NS},
    types::{Primitive, TypeDescriptor, TypeKind},
};

/// Maps a primitive to its XML Schema built-in type.
pub fn resolve(primitive: &Primitive) -> Result<QualifiedName, Error> {
    let name = match primitive {
        Primitive::Boolean => "boolean",
        Primitive::UnsignedByte => "unsignedByte",
        Primitive::SignedByte => "byte",
        Primitive::Short => "short",
        Primitive::UnsignedShort => "unsignedShort",
        Primitive::Int => "int",
        Primitive::UnsignedInt => "unsignedInt",
        Primitive::Long => "long",
        Primitive::UnsignedLong => "unsignedLong",
        Primitive::Decimal => "decimal",
        Primitive::Double => "double",
        Primitive::Float => "float",
        Primitive::DateTime => "dateTime",
        Primitive::Duration => "duration",
        Primitive::String | Primitive::Guid | Primitive::Char => "string",
        Primitive::Bytes => "base64Binary",
        Primitive::DateTimeOffset | Primitive::Other(..) => {
            return Err(Error::UnsupportedPrimitiveType {
                type_name: primitive.key().to_owned(),
                member: None,
            })
        }
    };

    Ok(QualifiedName::new(XSD_NS, name))
}

/// Resolves a primitive-like descriptor. Enumerations resolve through their
/// underlying integral type.
pub fn resolve_descriptor(descriptor: &TypeDescriptor) -> Result<QualifiedName, Error> {
    match &descriptor.kind {
        TypeKind::Primitive(primitive) => resolve(primitive),
        TypeKind::Enum { underlying, .. } => resolve(underlying),
        _ => Err(Error::UnsupportedPrimitiveType {
            type_name: descriptor.name.clone(),
            member: None,
        }),
    }
}
