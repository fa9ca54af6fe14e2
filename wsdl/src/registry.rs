use log::debug;
use serde::Deserialize;
use std::collections::{HashMap, HashSet};

use crate::{
    describe::Describe,
    error::Error,
    types::{Primitive, TypeDescriptor, TypeKind, TypeRef},
};

/// Every host type a contract can mention, keyed by host type name.
#[derive(Debug, Clone, Deserialize)]
#[serde(from = "HashMap<String, TypeDescriptor>")]
pub struct TypeRegistry {
    types: HashMap<String, TypeDescriptor>,
}

impl Default for TypeRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl From<HashMap<String, TypeDescriptor>> for TypeRegistry {
    fn from(types: HashMap<String, TypeDescriptor>) -> Self {
        let mut registry = Self::new();
        for (key, mut descriptor) in types {
            if descriptor.name.is_empty() {
                descriptor.name = key.clone();
            }

            registry.insert(key, descriptor);
        }

        registry
    }
}

impl TypeRegistry {
    /// A registry holding the built-in primitives and `Stream`.
    pub fn new() -> Self {
        let mut types = HashMap::new();
        for primitive in Primitive::ALL {
            types.insert(
                primitive.key().to_owned(),
                TypeDescriptor::primitive(primitive),
            );
        }

        types.insert("Stream".to_owned(), TypeDescriptor::stream());
        Self { types }
    }

    pub fn len(&self) -> usize {
        self.types.len()
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }

    pub fn contains(&self, ty: &TypeRef) -> bool {
        self.types.contains_key(ty.key())
    }

    pub fn get(&self, ty: &TypeRef) -> Result<&TypeDescriptor, Error> {
        self.types
            .get(ty.key())
            .ok_or_else(|| Error::UnknownType(ty.key().to_owned()))
    }

    pub fn insert<S: Into<String>>(&mut self, key: S, descriptor: TypeDescriptor) -> TypeRef {
        let key = key.into();
        debug!("registering type {} as {:?}", key, descriptor.kind);
        self.types.insert(key.clone(), descriptor);
        TypeRef::new(key)
    }

    /// Registers `key` once. The key is reserved before `build` runs, so
    /// types that refer back to themselves terminate.
    pub fn define<F>(&mut self, key: &str, build: F) -> TypeRef
    where
        F: FnOnce(&mut TypeRegistry) -> TypeDescriptor,
    {
        if self.types.contains_key(key) {
            return TypeRef::new(key);
        }

        self.types
            .insert(key.to_owned(), TypeDescriptor::object(key));
        let descriptor = build(self);
        self.insert(key, descriptor)
    }

    pub fn primitive(&self, primitive: Primitive) -> TypeRef {
        TypeRef::new(primitive.key())
    }

    pub fn stream(&self) -> TypeRef {
        TypeRef::new("Stream")
    }

    pub fn describe<T: Describe + ?Sized>(&mut self) -> TypeRef {
        T::describe(self)
    }

    pub fn sequence_of(&mut self, item: TypeRef) -> TypeRef {
        let key = format!("Vec<{}>", item);
        self.define(&key, |_| TypeDescriptor::sequence(item))
    }

    pub fn array_of(&mut self, item: TypeRef) -> TypeRef {
        let key = format!("[{}]", item);
        self.define(&key, |_| TypeDescriptor::array(item))
    }

    pub fn nullable(&mut self, inner: TypeRef) -> TypeRef {
        let key = format!("Option<{}>", inner);
        self.define(&key, |_| TypeDescriptor::nullable(inner))
    }

    pub fn task(&mut self, result: Option<TypeRef>) -> TypeRef {
        let key = match &result {
            Some(result) => format!("Task<{}>", result),
            None => "Task".to_owned(),
        };

        self.define(&key, |_| TypeDescriptor::task(result))
    }

    /// Result type of a possibly asynchronous return; `None` means void.
    pub fn unwrap_task<'a>(&'a self, ty: &'a TypeRef) -> Result<Option<&'a TypeRef>, Error> {
        match &self.get(ty)?.kind {
            TypeKind::Task(result) => Ok(result.as_ref()),
            _ => Ok(Some(ty)),
        }
    }

    /// Innermost type of a chain of nullables, with its descriptor.
    pub fn strip_nullable<'a>(
        &'a self,
        ty: &'a TypeRef,
    ) -> Result<(&'a TypeRef, &'a TypeDescriptor), Error> {
        let mut seen = HashSet::new();
        let mut current = ty;

        loop {
            let descriptor = self.get(current)?;
            match &descriptor.kind {
                TypeKind::Nullable(inner) if seen.insert(current) => current = inner,
                TypeKind::Nullable(..) => return Err(Error::CyclicCollection(descriptor.name.clone())),
                _ => return Ok((current, descriptor)),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Member;

    #[test]
    fn builtins_are_registered() {
        let registry = TypeRegistry::new();
        for primitive in Primitive::ALL {
            let ty = registry.primitive(primitive.clone());
            assert_eq!(
                registry.get(&ty).unwrap().kind,
                TypeKind::Primitive(primitive)
            );
        }

        assert_eq!(registry.get(&registry.stream()).unwrap().kind, TypeKind::Stream);
    }

    #[test]
    fn unknown_key_fails() {
        let registry = TypeRegistry::new();
        assert!(matches!(
            registry.get(&TypeRef::new("Missing")),
            Err(Error::UnknownType(key)) if key == "Missing"
        ));
    }

    #[test]
    fn define_terminates_on_self_reference() {
        let mut registry = TypeRegistry::new();
        let node = registry.define("Node", |registry| {
            let next = registry.define("Node", |_| unreachable!());
            TypeDescriptor::object("Node").with_member(Member::new("Next", next))
        });

        let descriptor = registry.get(&node).unwrap();
        assert_eq!(descriptor.members.len(), 1);
        assert_eq!(descriptor.members[0].ty, node);
    }

    #[test]
    fn task_unwrapping() {
        let mut registry = TypeRegistry::new();
        let int = registry.primitive(Primitive::Int);
        let task = registry.task(Some(int.clone()));
        let void = registry.task(None);

        assert_eq!(registry.unwrap_task(&task).unwrap(), Some(&int));
        assert_eq!(registry.unwrap_task(&void).unwrap(), None);
        assert_eq!(registry.unwrap_task(&int).unwrap(), Some(&int));
    }

    #[test]
    fn nested_nullables_strip_to_the_innermost_type() {
        let mut registry = TypeRegistry::new();
        let int = registry.primitive(Primitive::Int);
        let nullable = registry.nullable(int.clone());
        let nested = registry.nullable(nullable);

        let (inner, descriptor) = registry.strip_nullable(&nested).unwrap();
        assert_eq!(inner, &int);
        assert_eq!(descriptor.kind, TypeKind::Primitive(Primitive::Int));
        assert_eq!(registry.strip_nullable(&int).unwrap().0, &int);

        let looped = registry.define("Loop", |_| TypeDescriptor::nullable(TypeRef::new("Loop")));
        assert!(matches!(
            registry.strip_nullable(&looped),
            Err(Error::CyclicCollection(..))
        ));
    }

    #[test]
    fn deserialized_entries_default_their_name() {
        let registry: TypeRegistry = serde_json::from_str(
            r#"{ "Person": { "kind": "object", "members": [{ "name": "Age", "ty": "i32" }] } }"#,
        )
        .unwrap();

        let person = registry.get(&TypeRef::new("Person")).unwrap();
        assert_eq!(person.name, "Person");
        assert!(registry.contains(&TypeRef::new("i32")));
    }
}
