use log::info;
use serde::Deserialize;
use std::{fs::File, io::BufReader, path::Path};
use url::Url;

use crate::{
    error::Error,
    registry::TypeRegistry,
    types::{BindingDescriptor, ServiceContract},
};

/// A service contract together with the types it mentions, as read from a
/// JSON document.
#[derive(Debug, Clone, Deserialize)]
pub struct ServiceDescription {
    pub contract: ServiceContract,
    #[serde(default)]
    pub types: TypeRegistry,
    #[serde(default)]
    pub binding: Option<BindingDescriptor>,
}

impl ServiceDescription {
    pub fn from_json(json: &str) -> Result<Self, Error> {
        Ok(serde_json::from_str(json)?)
    }
}

/// Turns a URL or a (possibly relative) file path into a URL.
pub fn locate<S: AsRef<str>>(location: S) -> Result<Url, Error> {
    match Url::parse(location.as_ref()) {
        Ok(url) => Ok(url),
        Err(url::ParseError::RelativeUrlWithoutBase) => {
            let path = Path::new(location.as_ref())
                .canonicalize()
                .map_err(|err| Error::PathConversionError(Some(err)))?;

            Url::from_file_path(path).map_err(|()| Error::PathConversionError(None))
        }

        Err(err) => Err(err.into()),
    }
}

/// Reads a service description from a local file or over http(s).
pub fn load<S: AsRef<str>>(location: S) -> Result<ServiceDescription, Error> {
    let url = locate(location)?;
    info!("loading service description from {}", url);

    let description: ServiceDescription = match url.scheme() {
        "file" => {
            let path = url
                .to_file_path()
                .map_err(|()| Error::PathConversionError(None))?;
            let file = File::open(path).map_err(Error::FileOpenError)?;

            serde_json::from_reader(BufReader::new(file))?
        }

        "http" | "https" => {
            let body = reqwest::blocking::get(url.clone())?
                .error_for_status()?
                .bytes()?;

            serde_json::from_slice(&body)?
        }

        other => return Err(Error::UnsupportedScheme(other.into())),
    };

    info!(
        "loaded contract {} with {} operation(s)",
        description.contract.name,
        description.contract.operations.len()
    );

    Ok(description)
}
