use serde::{Deserialize, Serialize};
use std::fmt;

/// Key of a host type inside a [`TypeRegistry`](crate::registry::TypeRegistry).
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TypeRef(String);

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Primitive {
    Boolean,
    UnsignedByte,
    SignedByte,
    Short,
    UnsignedShort,
    Int,
    UnsignedInt,
    Long,
    UnsignedLong,
    Decimal,
    Double,
    Float,
    DateTime,
    DateTimeOffset,
    Duration,
    String,
    Guid,
    Char,
    Bytes,
    Other(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TypeKind {
    Primitive(Primitive),
    Enum {
        #[serde(default = "default_underlying")]
        underlying: Primitive,
        values: Vec<String>,
    },
    Nullable(TypeRef),
    Array(TypeRef),
    Sequence(TypeRef),
    Stream,
    Task(Option<TypeRef>),
    Object,
    MessageContract {
        #[serde(default = "default_wrapped")]
        wrapped: bool,
    },
}

/// Self-describing schema representation that bypasses the builder.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SchemaProvider {
    Any,
    Type { namespace: String, name: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct BodyMember {
    #[serde(default)]
    pub order: i32,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub namespace: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Member {
    pub name: String,
    pub ty: TypeRef,
    #[serde(default)]
    pub ignore: bool,
    #[serde(default)]
    pub body: Option<BodyMember>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TypeDescriptor {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub schema_name: Option<String>,
    pub kind: TypeKind,
    #[serde(default)]
    pub members: Vec<Member>,
    #[serde(default)]
    pub schema_provider: Option<SchemaProvider>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Parameter {
    pub name: String,
    pub ty: TypeRef,
    #[serde(default)]
    pub element_name: Option<String>,
    #[serde(default)]
    pub namespace: Option<String>,
    #[serde(default)]
    pub message_name: Option<String>,
    #[serde(default)]
    pub order: Option<i32>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OperationStyle {
    #[default]
    Document,
    Rpc,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BodyUse {
    #[default]
    Literal,
    Encoded,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Operation {
    pub name: String,
    #[serde(default)]
    pub in_parameters: Vec<Parameter>,
    #[serde(default)]
    pub out_parameters: Vec<Parameter>,
    #[serde(default)]
    pub return_type: Option<TypeRef>,
    #[serde(default)]
    pub soap_action: Option<String>,
    #[serde(default)]
    pub style: OperationStyle,
    #[serde(default)]
    pub body_use: BodyUse,
    #[serde(default)]
    pub is_message_contract_request: bool,
    #[serde(default)]
    pub is_message_contract_response: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceContract {
    pub name: String,
    pub namespace: String,
    #[serde(default)]
    pub service_name: Option<String>,
    #[serde(default)]
    pub operations: Vec<Operation>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EnvelopeVersion {
    #[default]
    Soap11,
    Soap12,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AddressingVersion {
    #[default]
    None,
    WsAddressing10,
    WsAddressingAugust2004,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct MessageVersion {
    #[serde(default)]
    pub envelope: EnvelopeVersion,
    #[serde(default)]
    pub addressing: AddressingVersion,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BindingDescriptor {
    pub name: String,
    #[serde(default)]
    pub message_version: MessageVersion,
}

fn default_underlying() -> Primitive {
    Primitive::Int
}

fn default_wrapped() -> bool {
    true
}

impl TypeRef {
    pub fn new<S: Into<String>>(key: S) -> Self {
        Self(key.into())
    }

    pub fn key(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TypeRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for TypeRef {
    fn from(key: &str) -> Self {
        Self::new(key)
    }
}

impl Primitive {
    pub const ALL: [Primitive; 19] = [
        Primitive::Boolean,
        Primitive::UnsignedByte,
        Primitive::SignedByte,
        Primitive::Short,
        Primitive::UnsignedShort,
        Primitive::Int,
        Primitive::UnsignedInt,
        Primitive::Long,
        Primitive::UnsignedLong,
        Primitive::Decimal,
        Primitive::Double,
        Primitive::Float,
        Primitive::DateTime,
        Primitive::DateTimeOffset,
        Primitive::Duration,
        Primitive::String,
        Primitive::Guid,
        Primitive::Char,
        Primitive::Bytes,
    ];

    /// Registry key of the built-in descriptor.
    pub fn key(&self) -> &str {
        match self {
            Primitive::Boolean => "bool",
            Primitive::UnsignedByte => "u8",
            Primitive::SignedByte => "i8",
            Primitive::Short => "i16",
            Primitive::UnsignedShort => "u16",
            Primitive::Int => "i32",
            Primitive::UnsignedInt => "u32",
            Primitive::Long => "i64",
            Primitive::UnsignedLong => "u64",
            Primitive::Decimal => "decimal",
            Primitive::Double => "f64",
            Primitive::Float => "f32",
            Primitive::DateTime => "DateTime",
            Primitive::DateTimeOffset => "DateTimeOffset",
            Primitive::Duration => "Duration",
            Primitive::String => "String",
            Primitive::Guid => "Uuid",
            Primitive::Char => "char",
            Primitive::Bytes => "Bytes",
            Primitive::Other(name) => name,
        }
    }

    /// Declared name, which is what `ArrayOf` names are built from.
    pub fn declared_name(&self) -> &str {
        match self {
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
            Primitive::DateTimeOffset => "DateTimeOffset",
            Primitive::Duration => "duration",
            Primitive::String => "string",
            Primitive::Guid => "guid",
            Primitive::Char => "char",
            Primitive::Bytes => "base64Binary",
            Primitive::Other(name) => name,
        }
    }

    /// Text and byte sequences are reference types; everything else is a value.
    pub fn is_value_type(&self) -> bool {
        !matches!(self, Primitive::String | Primitive::Bytes)
    }
}

impl TypeKind {
    /// Element type of an array or generic sequence.
    pub fn item(&self) -> Option<&TypeRef> {
        match self {
            TypeKind::Array(item) | TypeKind::Sequence(item) => Some(item),
            _ => None,
        }
    }
}

impl BodyMember {
    pub fn new(order: i32) -> Self {
        Self {
            order,
            ..Default::default()
        }
    }
}

impl Member {
    pub fn new<S: Into<String>>(name: S, ty: TypeRef) -> Self {
        Self {
            name: name.into(),
            ty,
            ignore: false,
            body: None,
        }
    }

    pub fn ignored(mut self) -> Self {
        self.ignore = true;
        self
    }

    pub fn body(mut self, order: i32) -> Self {
        self.body.get_or_insert_with(Default::default).order = order;
        self
    }

    pub fn body_name<S: Into<String>>(mut self, name: S) -> Self {
        self.body.get_or_insert_with(Default::default).name = Some(name.into());
        self
    }

    pub fn body_namespace<S: Into<String>>(mut self, namespace: S) -> Self {
        self.body.get_or_insert_with(Default::default).namespace = Some(namespace.into());
        self
    }
}

impl TypeDescriptor {
    fn new<S: Into<String>>(name: S, kind: TypeKind) -> Self {
        Self {
            name: name.into(),
            schema_name: None,
            kind,
            members: Vec::new(),
            schema_provider: None,
        }
    }

    pub fn primitive(primitive: Primitive) -> Self {
        Self::new(primitive.declared_name().to_owned(), TypeKind::Primitive(primitive))
    }

    pub fn object<S: Into<String>>(name: S) -> Self {
        Self::new(name, TypeKind::Object)
    }

    pub fn message_contract<S: Into<String>>(name: S, wrapped: bool) -> Self {
        Self::new(name, TypeKind::MessageContract { wrapped })
    }

    pub fn enumeration<S: Into<String>>(name: S, values: Vec<String>) -> Self {
        Self::new(
            name,
            TypeKind::Enum {
                underlying: Primitive::Int,
                values,
            },
        )
    }

    pub fn array(item: TypeRef) -> Self {
        Self::new("Array", TypeKind::Array(item))
    }

    pub fn sequence(item: TypeRef) -> Self {
        Self::new("Sequence", TypeKind::Sequence(item))
    }

    pub fn nullable(inner: TypeRef) -> Self {
        Self::new("Nullable", TypeKind::Nullable(inner))
    }

    pub fn task(result: Option<TypeRef>) -> Self {
        Self::new("Task", TypeKind::Task(result))
    }

    pub fn stream() -> Self {
        Self::new("Stream", TypeKind::Stream)
    }

    pub fn with_schema_name<S: Into<String>>(mut self, name: S) -> Self {
        self.schema_name = Some(name.into());
        self
    }

    pub fn with_member(mut self, member: Member) -> Self {
        self.members.push(member);
        self
    }

    pub fn with_schema_provider(mut self, provider: SchemaProvider) -> Self {
        self.schema_provider = Some(provider);
        self
    }

    pub fn is_value_type(&self) -> bool {
        match &self.kind {
            TypeKind::Primitive(primitive) => primitive.is_value_type(),
            TypeKind::Enum { .. } | TypeKind::Nullable(..) => true,
            _ => false,
        }
    }

    pub fn is_message_contract(&self) -> bool {
        matches!(self.kind, TypeKind::MessageContract { .. })
    }

    pub fn is_wrapped_message_contract(&self) -> bool {
        matches!(self.kind, TypeKind::MessageContract { wrapped: true })
    }

    pub fn is_unwrapped_message_contract(&self) -> bool {
        matches!(self.kind, TypeKind::MessageContract { wrapped: false })
    }

    /// Members that serialize as plain declared members.
    pub fn declared_members(&self) -> impl Iterator<Item = &Member> {
        self.members
            .iter()
            .filter(|member| !member.ignore && member.body.is_none())
    }

    /// Message body members ordered by their order key; declaration order
    /// breaks ties.
    pub fn body_members(&self) -> Vec<(&Member, &BodyMember)> {
        let mut members = self
            .members
            .iter()
            .filter(|member| !member.ignore)
            .filter_map(|member| member.body.as_ref().map(|body| (member, body)))
            .collect::<Vec<_>>();

        members.sort_by_key(|(_, body)| body.order);
        members
    }
}

impl Parameter {
    pub fn new<S: Into<String>>(name: S, ty: TypeRef) -> Self {
        Self {
            name: name.into(),
            ty,
            ..Default::default()
        }
    }

    pub fn element_name<S: Into<String>>(mut self, name: S) -> Self {
        self.element_name = Some(name.into());
        self
    }

    pub fn message_name<S: Into<String>>(mut self, name: S) -> Self {
        self.message_name = Some(name.into());
        self
    }

    pub fn namespace<S: Into<String>>(mut self, namespace: S) -> Self {
        self.namespace = Some(namespace.into());
        self
    }

    pub fn order(mut self, order: i32) -> Self {
        self.order = Some(order);
        self
    }

    /// Sorts message-contract parameters by their order key. Parameters
    /// without one sort as zero; declaration order breaks ties.
    pub fn sort_by_order(parameters: &mut [&Parameter]) {
        parameters.sort_by_key(|parameter| parameter.order.unwrap_or_default());
    }

    /// Element name: explicit element override, then message-contract
    /// override, then the parameter's own name.
    pub fn member_name(&self) -> &str {
        self.element_name
            .as_deref()
            .or(self.message_name.as_deref())
            .unwrap_or(&self.name)
    }
}

impl Operation {
    pub fn new<S: Into<String>>(name: S) -> Self {
        Self {
            name: name.into(),
            in_parameters: Vec::new(),
            out_parameters: Vec::new(),
            return_type: None,
            soap_action: None,
            style: OperationStyle::Document,
            body_use: BodyUse::Literal,
            is_message_contract_request: false,
            is_message_contract_response: false,
        }
    }

    pub fn input(mut self, parameter: Parameter) -> Self {
        self.in_parameters.push(parameter);
        self
    }

    pub fn output(mut self, parameter: Parameter) -> Self {
        self.out_parameters.push(parameter);
        self
    }

    pub fn returns(mut self, ty: TypeRef) -> Self {
        self.return_type = Some(ty);
        self
    }

    pub fn action<S: Into<String>>(mut self, action: S) -> Self {
        self.soap_action = Some(action.into());
        self
    }

    pub fn style(mut self, style: OperationStyle) -> Self {
        self.style = style;
        self
    }

    pub fn body_use(mut self, body_use: BodyUse) -> Self {
        self.body_use = body_use;
        self
    }

    pub fn message_contract_request(mut self) -> Self {
        self.is_message_contract_request = true;
        self
    }

    pub fn message_contract_response(mut self) -> Self {
        self.is_message_contract_response = true;
        self
    }

    /// Request parameters in the order they appear in the request message.
    pub fn request_parameters(&self) -> Vec<&Parameter> {
        let mut parameters = self.in_parameters.iter().collect::<Vec<_>>();
        if self.is_message_contract_request {
            Parameter::sort_by_order(&mut parameters);
        }

        parameters
    }
}

impl ServiceContract {
    pub fn new<N: Into<String>, S: Into<String>>(name: N, namespace: S) -> Self {
        Self {
            name: name.into(),
            namespace: namespace.into(),
            service_name: None,
            operations: Vec::new(),
        }
    }

    pub fn service_name<S: Into<String>>(mut self, name: S) -> Self {
        self.service_name = Some(name.into());
        self
    }

    pub fn operation(mut self, operation: Operation) -> Self {
        self.operations.push(operation);
        self
    }

    pub fn service(&self) -> &str {
        self.service_name.as_deref().unwrap_or(&self.name)
    }

    pub fn soap_action(&self, operation: &Operation) -> String {
        match &operation.soap_action {
            Some(action) => action.clone(),
            None => format!(
                "{}/{}/{}",
                self.namespace.trim_end_matches('/'),
                self.name,
                operation.name
            ),
        }
    }
}

impl MessageVersion {
    pub const SOAP11: MessageVersion = MessageVersion {
        envelope: EnvelopeVersion::Soap11,
        addressing: AddressingVersion::None,
    };

    pub const SOAP12: MessageVersion = MessageVersion {
        envelope: EnvelopeVersion::Soap12,
        addressing: AddressingVersion::None,
    };

    pub const SOAP11_WS_ADDRESSING10: MessageVersion = MessageVersion {
        envelope: EnvelopeVersion::Soap11,
        addressing: AddressingVersion::WsAddressing10,
    };

    pub const SOAP12_WS_ADDRESSING10: MessageVersion = MessageVersion {
        envelope: EnvelopeVersion::Soap12,
        addressing: AddressingVersion::WsAddressing10,
    };

    pub const SOAP12_WS_ADDRESSING_AUGUST2004: MessageVersion = MessageVersion {
        envelope: EnvelopeVersion::Soap12,
        addressing: AddressingVersion::WsAddressingAugust2004,
    };
}

impl BindingDescriptor {
    pub fn new<S: Into<String>>(name: S, message_version: MessageVersion) -> Self {
        Self {
            name: name.into(),
            message_version,
        }
    }

    /// Binding used when the host supplies none.
    pub fn basic_http(contract: &ServiceContract) -> Self {
        Self::new(
            format!("BasicHttpBinding_{}", contract.name),
            MessageVersion::SOAP11,
        )
    }
}
