use log::{debug, trace, warn};
use std::{
    collections::{HashSet, VecDeque},
    io::Write,
};
use wsdlgen_util::xml::NO_ATTRIBUTES;

use crate::{
    config::DrainOrder,
    error::Error,
    namespaces::{QualifiedName, ARRAYS_NS, SERIALIZATION_NS, SYSTEM_NS},
    naming::schema_name,
    registry::TypeRegistry,
    resolver::resolve_descriptor,
    session::Session,
    types::{Primitive, SchemaProvider, TypeDescriptor, TypeKind, TypeRef},
};

pub(crate) const XSD_SCHEMA: &str = "xsd:schema";
pub(crate) const XSD_IMPORT: &str = "xsd:import";
pub(crate) const XSD_ELEMENT: &str = "xsd:element";
pub(crate) const XSD_COMPLEX_TYPE: &str = "xsd:complexType";
pub(crate) const XSD_SEQUENCE: &str = "xsd:sequence";
const XSD_SIMPLE_TYPE: &str = "xsd:simpleType";
const XSD_RESTRICTION: &str = "xsd:restriction";
const XSD_ENUMERATION: &str = "xsd:enumeration";
const XSD_ANY: &str = "xsd:any";
const XSD_ANNOTATION: &str = "xsd:annotation";
const XSD_APPINFO: &str = "xsd:appinfo";

const STREAM_BODY: &str = "StreamBody";
const DATE_TIME_OFFSET: &str = "DateTimeOffset";

/// Types waiting for a full definition, and the names already defined.
///
/// Complex and array types are keyed by canonical schema name, enumerations
/// by their declared name. Global elements are tracked separately so an
/// alias is never written twice.
#[derive(Debug, Default)]
pub(crate) struct BuildQueues {
    complex: VecDeque<TypeRef>,
    enums: VecDeque<TypeRef>,
    arrays: VecDeque<TypeRef>,
    built_complex: HashSet<String>,
    built_enums: HashSet<String>,
    built_arrays: HashSet<String>,
    elements: HashSet<String>,
}

/// Attributes of a single `xsd:element` inside a sequence.
#[derive(Debug, Default)]
struct ElementDecl {
    xmlns: Option<(String, String)>,
    name: String,
    type_name: String,
    min_occurs: Option<&'static str>,
    max_occurs: Option<&'static str>,
    nillable: bool,
}

impl BuildQueues {
    pub(crate) fn enqueue_complex(&mut self, ty: &TypeRef) {
        debug!("queueing complex type {}", ty);
        self.complex.push_back(ty.clone());
    }

    pub(crate) fn enqueue_enum(&mut self, ty: &TypeRef) {
        debug!("queueing enumeration {}", ty);
        self.enums.push_back(ty.clone());
    }

    pub(crate) fn enqueue_array(&mut self, ty: &TypeRef) {
        debug!("queueing array type {}", ty);
        self.arrays.push_back(ty.clone());
    }

    pub(crate) fn is_complex_built(&self, name: &str) -> bool {
        self.built_complex.contains(name)
    }

    pub(crate) fn is_enum_built(&self, name: &str) -> bool {
        self.built_enums.contains(name)
    }

    pub(crate) fn is_array_built(&self, name: &str) -> bool {
        self.built_arrays.contains(name)
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.complex.is_empty() && self.enums.is_empty() && self.arrays.is_empty()
    }

    /// Queued complex and enumeration types that have no definition yet.
    fn undefined_schema_types(&self, registry: &TypeRegistry) -> Result<usize, Error> {
        let mut count = 0;
        for ty in &self.complex {
            let name = schema_name(registry, registry.get(ty)?)?;
            if !self.built_complex.contains(&name) {
                count += 1;
            }
        }

        for ty in &self.enums {
            if !self.built_enums.contains(&registry.get(ty)?.name) {
                count += 1;
            }
        }

        Ok(count)
    }
}

impl ElementDecl {
    fn with_name(mut self, name: &str) -> Self {
        self.name = name.to_owned();
        self
    }

    fn declare_prefix(&mut self, prefix: &str, namespace: &str) {
        self.xmlns = Some((format!("xmlns:{}", prefix), namespace.to_owned()));
    }

    /// Occurrence of inline (primitive-like) elements.
    fn inline_occurs(&mut self, is_array_item: bool, is_value_type: bool) {
        if is_array_item {
            self.min_occurs = Some("0");
            self.max_occurs = Some("unbounded");
            self.nillable = true;
        } else {
            self.min_occurs = Some(if is_value_type { "1" } else { "0" });
            self.max_occurs = Some("1");
        }
    }

    /// Occurrence of elements referring to a named type.
    fn reference_occurs(&mut self, is_array_item: bool) {
        self.min_occurs = Some("0");
        if is_array_item {
            self.max_occurs = Some("unbounded");
            self.nillable = true;
        } else {
            self.max_occurs = Some("1");
        }
    }

    fn attributes(&self) -> Vec<(String, String)> {
        let mut attributes = Vec::new();
        if let Some((key, namespace)) = &self.xmlns {
            attributes.push((key.clone(), namespace.clone()));
        }

        if let Some(min_occurs) = self.min_occurs {
            attributes.push(("minOccurs".to_owned(), min_occurs.to_owned()));
        }

        if let Some(max_occurs) = self.max_occurs {
            attributes.push(("maxOccurs".to_owned(), max_occurs.to_owned()));
        }

        attributes.push(("name".to_owned(), self.name.clone()));
        if self.nillable {
            attributes.push(("nillable".to_owned(), "true".to_owned()));
        }

        attributes.push(("type".to_owned(), self.type_name.clone()));
        attributes
    }
}

fn is_inline(descriptor: &TypeDescriptor) -> bool {
    matches!(
        descriptor.kind,
        TypeKind::Primitive(..) | TypeKind::Enum { .. } | TypeKind::Nullable(..)
    )
}

fn is_string_sequence(registry: &TypeRegistry, descriptor: &TypeDescriptor) -> Result<bool, Error> {
    match &descriptor.kind {
        TypeKind::Sequence(item) => Ok(matches!(
            registry.get(item)?.kind,
            TypeKind::Primitive(Primitive::String)
        )),
        _ => Ok(false),
    }
}

impl<'a, W: Write> Session<'a, W> {
    /// Writes the `xsd:element` for one member of type `ty` and queues the
    /// type for a full definition when it is not primitive.
    pub(crate) fn add_schema_type(
        &mut self,
        ty: &TypeRef,
        element_name: Option<&str>,
        is_array_item: bool,
        namespace: Option<&str>,
    ) -> Result<(), Error> {
        let registry: &'a TypeRegistry = self.registry;
        let descriptor = registry.get(ty)?;

        if let Some(provider) = &descriptor.schema_provider {
            return self.write_provided_element(descriptor, provider, element_name, is_array_item);
        }

        if let Some(namespace) = namespace {
            if !is_inline(descriptor) {
                return self.write_foreign_element(descriptor, element_name, is_array_item, namespace);
            }
        }

        let string_sequence = is_string_sequence(registry, descriptor)?;
        let mut element = ElementDecl::default();
        let default_name = match &descriptor.kind {
            TypeKind::Primitive(..) | TypeKind::Enum { .. } => {
                let local_name = self
                    .inline_type(ty, descriptor, &mut element)
                    .map_err(|error| error.with_member(element_name.unwrap_or(&descriptor.name)))?;
                element.inline_occurs(is_array_item, descriptor.is_value_type());
                local_name
            }

            TypeKind::Nullable(..) => {
                let (inner, inner_descriptor) = registry.strip_nullable(ty)?;
                if !is_inline(inner_descriptor) {
                    return self.add_schema_type(inner, element_name, is_array_item, namespace);
                }

                let local_name = self
                    .inline_type(inner, inner_descriptor, &mut element)
                    .map_err(|error| error.with_member(element_name.unwrap_or(&descriptor.name)))?;
                element.inline_occurs(is_array_item, true);
                element.nillable = true;
                local_name
            }

            TypeKind::Stream => {
                element.reference_occurs(is_array_item);
                element.name = STREAM_BODY.to_owned();
                element.type_name = self.xsd_name("base64Binary")?;
                self.out.empty(XSD_ELEMENT, element.attributes())?;
                return Ok(());
            }

            TypeKind::Array(..) => {
                let name = schema_name(registry, descriptor)?;
                element.type_name = self.target_name(&name)?;
                element.reference_occurs(is_array_item);
                self.queues.enqueue_complex(ty);
                name
            }

            TypeKind::Sequence(..) if string_sequence => {
                let name = schema_name(registry, descriptor)?;
                let prefix = self.namespaces.allocate();
                element.declare_prefix(&prefix, ARRAYS_NS);
                element.type_name = format!("{}:{}", prefix, name);
                element.reference_occurs(is_array_item);
                element.nillable = true;
                self.queues.enqueue_array(ty);
                name
            }

            TypeKind::Sequence(..) => {
                let name = schema_name(registry, descriptor)?;
                element.type_name = self.target_name(&name)?;
                element.reference_occurs(is_array_item);
                element.nillable = !is_array_item;
                self.queues.enqueue_complex(ty);
                name
            }

            TypeKind::Object | TypeKind::MessageContract { .. } => {
                let name = schema_name(registry, descriptor)?;
                element.type_name = self.target_name(&name)?;
                element.reference_occurs(is_array_item);
                element.nillable = true;
                self.queues.enqueue_complex(ty);
                name
            }

            TypeKind::Task(result) => {
                return match result {
                    Some(result) => self.add_schema_type(result, element_name, is_array_item, namespace),
                    None => Ok(()),
                };
            }
        };

        element.name = element_name.map(ToOwned::to_owned).unwrap_or(default_name);
        self.out.empty(XSD_ELEMENT, element.attributes())?;
        Ok(())
    }

    /// Fills in the type of an inline element and returns the local type
    /// name, which doubles as the default element name.
    fn inline_type(
        &mut self,
        ty: &TypeRef,
        descriptor: &TypeDescriptor,
        element: &mut ElementDecl,
    ) -> Result<String, Error> {
        match &descriptor.kind {
            TypeKind::Primitive(Primitive::DateTimeOffset) => {
                let prefix = self.namespaces.allocate();
                element.declare_prefix(&prefix, SYSTEM_NS);
                element.type_name = format!("{}:{}", prefix, DATE_TIME_OFFSET);

                if !self.needs_date_time_offset {
                    debug!("{} shape requested", DATE_TIME_OFFSET);
                    self.needs_date_time_offset = true;
                }

                Ok(DATE_TIME_OFFSET.to_owned())
            }

            TypeKind::Enum { .. } => {
                resolve_descriptor(descriptor)?;
                let name = schema_name(self.registry, descriptor)?;
                element.type_name = self.target_name(&name)?;
                self.queues.enqueue_enum(ty);
                Ok(name)
            }

            _ => {
                let name = resolve_descriptor(descriptor)?;
                element.type_name = self.namespaces.qualify(&name)?;
                Ok(name.name)
            }
        }
    }

    fn write_provided_element(
        &mut self,
        descriptor: &TypeDescriptor,
        provider: &SchemaProvider,
        element_name: Option<&str>,
        is_array_item: bool,
    ) -> Result<(), Error> {
        let name = match element_name {
            Some(name) => name.to_owned(),
            None => schema_name(self.registry, descriptor)?,
        };

        match provider {
            SchemaProvider::Any => {
                self.out.start(XSD_ELEMENT, [("name", name.as_str())])?;
                self.out.start(XSD_COMPLEX_TYPE, NO_ATTRIBUTES)?;
                self.out.start(XSD_SEQUENCE, NO_ATTRIBUTES)?;
                self.out
                    .empty(XSD_ANY, [("minOccurs", "0"), ("processContents", "lax")])?;
                self.out.end()?;
                self.out.end()?;
                self.out.end()?;
            }

            SchemaProvider::Type {
                namespace,
                name: type_name,
            } => {
                let mut element = ElementDecl::default().with_name(&name);
                let prefix = match self.namespaces.prefix_of(namespace) {
                    Some(prefix) => prefix.to_owned(),
                    None => {
                        let prefix = self.namespaces.allocate();
                        element.declare_prefix(&prefix, namespace);
                        prefix
                    }
                };

                element.type_name = format!("{}:{}", prefix, type_name);
                element.reference_occurs(is_array_item);
                self.out.empty(XSD_ELEMENT, element.attributes())?;
            }
        }

        Ok(())
    }

    /// A member whose type lives in another namespace; that namespace owns
    /// the definition, so nothing is queued.
    fn write_foreign_element(
        &mut self,
        descriptor: &TypeDescriptor,
        element_name: Option<&str>,
        is_array_item: bool,
        namespace: &str,
    ) -> Result<(), Error> {
        let type_name = schema_name(self.registry, descriptor)?;
        let prefix = self.namespaces.allocate();

        let mut element =
            ElementDecl::default().with_name(element_name.unwrap_or(&type_name));
        element.declare_prefix(&prefix, namespace);
        element.type_name = format!("{}:{}", prefix, type_name);
        element.reference_occurs(is_array_item);
        element.nillable = true;

        self.out.empty(XSD_ELEMENT, element.attributes())?;
        Ok(())
    }

    /// Opens a schema block for the contract's target namespace.
    pub(crate) fn open_target_schema(&mut self) -> Result<(), Error> {
        self.out.start(
            XSD_SCHEMA,
            [
                ("elementFormDefault", "qualified"),
                ("targetNamespace", self.contract.namespace.as_str()),
            ],
        )?;
        self.out.empty(XSD_IMPORT, [("namespace", ARRAYS_NS)])?;
        self.out.empty(XSD_IMPORT, [("namespace", SYSTEM_NS)])?;
        Ok(())
    }

    fn open_complex_type(&mut self, name: &str) -> Result<(), Error> {
        self.out.start(XSD_COMPLEX_TYPE, [("name", name)])?;
        self.out.start(XSD_SEQUENCE, NO_ATTRIBUTES)?;
        Ok(())
    }

    fn close_complex_type(&mut self) -> Result<(), Error> {
        self.out.end()?;
        self.out.end()?;
        Ok(())
    }

    /// Top-level nillable element aliasing a complex type of the same name.
    fn write_global_element(&mut self, name: &str, type_name: &str) -> Result<(), Error> {
        if self.queues.elements.insert(name.to_owned()) {
            self.out.empty(
                XSD_ELEMENT,
                [("name", name), ("nillable", "true"), ("type", type_name)],
            )?;
        }

        Ok(())
    }

    /// Writes one element per serializable member. Message contracts list
    /// their plain members first, then body members by order key.
    fn add_members(&mut self, descriptor: &'a TypeDescriptor) -> Result<(), Error> {
        if !descriptor.is_message_contract() {
            for member in descriptor.members.iter().filter(|member| !member.ignore) {
                self.add_schema_type(&member.ty, Some(&member.name), false, None)?;
            }

            return Ok(());
        }

        for member in descriptor.declared_members() {
            self.add_schema_type(&member.ty, Some(&member.name), false, None)?;
        }

        for (member, body) in descriptor.body_members() {
            let name = body.name.as_deref().unwrap_or(&member.name);
            self.add_schema_type(&member.ty, Some(name), false, body.namespace.as_deref())?;
        }

        Ok(())
    }

    /// Type carried by a message contract: its first body member by order.
    pub(crate) fn message_body_type(
        &self,
        descriptor: &'a TypeDescriptor,
    ) -> Result<&'a TypeRef, Error> {
        descriptor
            .body_members()
            .into_iter()
            .next()
            .map(|(member, _)| &member.ty)
            .ok_or_else(|| Error::MalformedMessageContract {
                type_name: descriptor.name.clone(),
            })
    }

    /// An unwrapped contract is represented by the type its body carries,
    /// defined under that type's own name with a matching global element.
    fn build_unwrapped_contract(&mut self, descriptor: &'a TypeDescriptor) -> Result<(), Error> {
        let registry: &'a TypeRegistry = self.registry;
        let body = registry.get(self.message_body_type(descriptor)?)?;
        let body_name = schema_name(registry, body)?;

        if !self.queues.is_complex_built(&body_name) {
            self.open_complex_type(&body_name)?;
            self.add_members(body)?;
            self.close_complex_type()?;
            self.queues.built_complex.insert(body_name.clone());
        }

        let type_name = self.target_name(&body_name)?;
        self.write_global_element(&body_name, &type_name)
    }

    pub(crate) fn drain_complex_types(&mut self) -> Result<(), Error> {
        let registry: &'a TypeRegistry = self.registry;

        while let Some(ty) = self.queues.complex.pop_front() {
            let descriptor = registry.get(&ty)?;
            let name = schema_name(registry, descriptor)?;
            if self.queues.is_complex_built(&name) {
                continue;
            }

            trace!("defining complex type {}", name);
            match &descriptor.kind {
                TypeKind::Array(item) | TypeKind::Sequence(item) => {
                    self.open_complex_type(&name)?;
                    self.add_schema_type(item, None, true, None)?;
                    self.close_complex_type()?;
                }

                TypeKind::MessageContract { wrapped: false } => {
                    self.build_unwrapped_contract(descriptor)?;
                }

                TypeKind::MessageContract { wrapped: true } | TypeKind::Object => {
                    self.open_complex_type(&name)?;
                    self.add_members(descriptor)?;
                    self.close_complex_type()?;

                    if descriptor.is_wrapped_message_contract() {
                        let type_name = self.target_name(&name)?;
                        self.write_global_element(&name, &type_name)?;
                    }
                }

                _ => debug!("{} needs no complex type definition", name),
            }

            self.queues.built_complex.insert(name);
        }

        Ok(())
    }

    pub(crate) fn drain_enums(&mut self) -> Result<(), Error> {
        let registry: &'a TypeRegistry = self.registry;
        let base = self.xsd_name("string")?;

        while let Some(ty) = self.queues.enums.pop_front() {
            let descriptor = registry.get(&ty)?;
            if self.queues.is_enum_built(&descriptor.name) {
                continue;
            }

            let values = match &descriptor.kind {
                TypeKind::Enum { values, .. } => values,
                _ => continue,
            };

            let name = schema_name(registry, descriptor)?;
            trace!("defining enumeration {}", name);

            self.out.start(XSD_SIMPLE_TYPE, [("name", name.as_str())])?;
            self.out.start(XSD_RESTRICTION, [("base", base.as_str())])?;
            for value in values {
                self.out.empty(XSD_ENUMERATION, [("value", value.as_str())])?;
            }
            self.out.end()?;
            self.out.end()?;

            self.queues.built_enums.insert(descriptor.name.clone());
        }

        Ok(())
    }

    /// Each array wrapper gets its own schema block in the arrays namespace,
    /// where `tns` is rebound to that namespace.
    pub(crate) fn drain_arrays(&mut self) -> Result<(), Error> {
        let registry: &'a TypeRegistry = self.registry;

        while let Some(ty) = self.queues.arrays.pop_front() {
            let descriptor = registry.get(&ty)?;
            let name = schema_name(registry, descriptor)?;
            if self.queues.is_array_built(&name) {
                continue;
            }

            let item = match descriptor.kind.item() {
                Some(item) => item,
                None => continue,
            };

            trace!("defining array type {}", name);
            self.out.start(
                XSD_SCHEMA,
                [
                    ("xmlns:tns", ARRAYS_NS),
                    ("elementFormDefault", "qualified"),
                    ("targetNamespace", ARRAYS_NS),
                ],
            )?;
            self.open_complex_type(&name)?;
            self.add_schema_type(item, None, true, None)?;
            self.close_complex_type()?;

            let type_name = format!("tns:{}", name);
            self.out.empty(
                XSD_ELEMENT,
                [
                    ("name", name.as_str()),
                    ("nillable", "true"),
                    ("type", type_name.as_str()),
                ],
            )?;
            self.out.end()?;

            self.queues.built_arrays.insert(name);
        }

        Ok(())
    }

    /// Runs the array drain, then settles whatever it queued according to
    /// the configured [`DrainOrder`]. The target schema block must already
    /// be closed.
    pub(crate) fn drain_array_blocks(&mut self) -> Result<(), Error> {
        self.drain_arrays()?;

        match self.options.drain_order {
            DrainOrder::ThreePhase => {
                let undefined = self.queues.undefined_schema_types(self.registry)?;
                if undefined > 0 {
                    warn!(
                        "{} type(s) first referenced from array types are left undefined",
                        undefined
                    );
                }
            }

            DrainOrder::FixedPoint => {
                while !self.queues.is_empty() {
                    if self.queues.undefined_schema_types(self.registry)? > 0 {
                        self.open_target_schema()?;
                        self.drain_complex_types()?;
                        self.drain_enums()?;
                        self.out.end()?;
                    } else {
                        self.queues.complex.clear();
                        self.queues.enums.clear();
                    }

                    self.drain_arrays()?;
                }
            }
        }

        Ok(())
    }

    /// Global two-field shape standing in for offset-aware date/times.
    pub(crate) fn write_date_time_offset(&mut self) -> Result<(), Error> {
        let value_type = self
            .namespaces
            .qualify(&QualifiedName::new(SERIALIZATION_NS, "IsValueType"))?;
        let date_time = self.xsd_name("dateTime")?;
        let short = self.xsd_name("short")?;
        let type_name = format!("tns:{}", DATE_TIME_OFFSET);

        self.out.start(
            XSD_SCHEMA,
            [
                ("xmlns:tns", SYSTEM_NS),
                ("elementFormDefault", "qualified"),
                ("targetNamespace", SYSTEM_NS),
            ],
        )?;
        self.out.empty(XSD_IMPORT, [("namespace", SERIALIZATION_NS)])?;

        self.out.start(XSD_COMPLEX_TYPE, [("name", DATE_TIME_OFFSET)])?;
        self.out.start(XSD_ANNOTATION, NO_ATTRIBUTES)?;
        self.out.start(XSD_APPINFO, NO_ATTRIBUTES)?;
        self.out.start(&value_type, NO_ATTRIBUTES)?;
        self.out.text("true")?;
        self.out.end()?;
        self.out.end()?;
        self.out.end()?;

        self.out.start(XSD_SEQUENCE, NO_ATTRIBUTES)?;
        self.out.empty(
            XSD_ELEMENT,
            [("name", "DateTime"), ("type", date_time.as_str())],
        )?;
        self.out.empty(
            XSD_ELEMENT,
            [("name", "OffsetMinutes"), ("type", short.as_str())],
        )?;
        self.out.end()?;
        self.out.end()?;

        self.out.empty(
            XSD_ELEMENT,
            [
                ("name", DATE_TIME_OFFSET),
                ("nillable", "true"),
                ("type", type_name.as_str()),
            ],
        )?;
        self.out.end()?;
        Ok(())
    }
}
