use std::time::{Duration, SystemTime};

use crate::{
    registry::TypeRegistry,
    types::{Primitive, TypeRef},
};

/// Host types that can appear in a service contract.
///
/// Implementations register a descriptor for the type (and, transitively,
/// for everything it mentions) and hand back its key. `#[derive(Describe)]`
/// covers structs and unit enums.
pub trait Describe {
    fn describe(registry: &mut TypeRegistry) -> TypeRef;
}

macro_rules! describe_primitive {
    ($($ty:ty => $primitive:expr),* $(,)?) => {
        $(
            impl Describe for $ty {
                fn describe(registry: &mut TypeRegistry) -> TypeRef {
                    registry.primitive($primitive)
                }
            }
        )*
    };
}

describe_primitive! {
    bool => Primitive::Boolean,
    u8 => Primitive::UnsignedByte,
    i8 => Primitive::SignedByte,
    i16 => Primitive::Short,
    u16 => Primitive::UnsignedShort,
    i32 => Primitive::Int,
    u32 => Primitive::UnsignedInt,
    i64 => Primitive::Long,
    u64 => Primitive::UnsignedLong,
    f32 => Primitive::Float,
    f64 => Primitive::Double,
    char => Primitive::Char,
    String => Primitive::String,
    str => Primitive::String,
    bytes::Bytes => Primitive::Bytes,
    Duration => Primitive::Duration,
    SystemTime => Primitive::DateTime,
}

impl<T: Describe> Describe for Vec<T> {
    fn describe(registry: &mut TypeRegistry) -> TypeRef {
        let item = T::describe(registry);
        registry.sequence_of(item)
    }
}

impl<T: Describe, const N: usize> Describe for [T; N] {
    fn describe(registry: &mut TypeRegistry) -> TypeRef {
        let item = T::describe(registry);
        registry.array_of(item)
    }
}

impl<T: Describe> Describe for Box<[T]> {
    fn describe(registry: &mut TypeRegistry) -> TypeRef {
        let item = T::describe(registry);
        registry.array_of(item)
    }
}

impl<T: Describe> Describe for Option<T> {
    fn describe(registry: &mut TypeRegistry) -> TypeRef {
        let inner = T::describe(registry);
        registry.nullable(inner)
    }
}
