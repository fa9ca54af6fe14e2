use proc_macro2::Ident;

#[derive(Debug, Clone)]
pub struct Container {
    pub ident: Ident,
    pub name: String,
    pub schema_name: Option<String>,
    pub kind: ContainerKind,
}

#[derive(Debug, Clone)]
pub enum ContainerKind {
    Object {
        message_contract: Option<MessageContract>,
        fields: Vec<Field>,
    },
    Enum(Vec<Variant>),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageContract {
    Wrapped,
    Unwrapped,
}

#[derive(Debug, Clone)]
pub struct Field {
    pub name: String,
    pub ty: syn::Type,
    pub ignore: bool,
    pub body: Option<Body>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Body {
    pub order: i32,
    pub namespace: Option<String>,
}

#[derive(Debug, Clone)]
pub struct Variant {
    pub name: String,
}
