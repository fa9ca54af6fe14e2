use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error(
        "No XML Schema mapping for primitive type `{type_name}` (member `{}`)",
        .member.as_deref().unwrap_or("?")
    )]
    UnsupportedPrimitiveType {
        type_name: String,
        member: Option<String>,
    },

    #[error("Message contract `{type_name}` declares no body members")]
    MalformedMessageContract { type_name: String },

    #[error("Type `{0}` is not registered")]
    UnknownType(String),

    #[error("Collection type `{0}` contains itself")]
    CyclicCollection(String),

    #[error("No prefix declared for namespace {0}")]
    UndeclaredNamespace(String),

    #[error("Error writing XML output")]
    XmlWriteError(#[from] quick_xml::Error),

    #[error("Unable to parse provided URL")]
    UrlParseError(#[from] url::ParseError),

    #[error("Unable to convert provided path")]
    PathConversionError(Option<std::io::Error>),

    #[error("Unable to open file")]
    FileOpenError(std::io::Error),

    #[error("Unable to get file from server")]
    ReqwestError(#[from] reqwest::Error),

    #[error("Unsupported URL scheme {0}")]
    UnsupportedScheme(String),

    #[error("Error parsing service description")]
    JsonError(#[from] serde_json::Error),
}

impl Error {
    /// Attaches the offending member name to an unsupported type error.
    pub(crate) fn with_member(self, name: &str) -> Self {
        match self {
            Error::UnsupportedPrimitiveType {
                type_name,
                member: None,
            } => Error::UnsupportedPrimitiveType {
                type_name,
                member: Some(name.to_owned()),
            },
            other => other,
        }
    }
}
