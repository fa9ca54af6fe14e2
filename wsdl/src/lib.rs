use log::info;
use std::io::Write;

mod document;
mod schema;
mod session;

pub mod config;
pub mod describe;
pub mod description;
pub mod error;
pub mod namespaces;
pub mod naming;
pub mod registry;
pub mod resolver;
pub mod types;

pub use config::{DrainOrder, Options};
pub use describe::Describe;
pub use description::{load, ServiceDescription};
pub use error::Error;
pub use registry::TypeRegistry;

#[cfg(feature = "derive")]
pub use wsdlgen_macro::Describe;

use session::Session;
use types::ServiceContract;

/// Writes the WSDL document for `contract` into `sink` and returns the sink.
///
/// Every type mentioned by the contract must be present in `registry`.
pub fn generate<W: Write>(
    contract: &ServiceContract,
    registry: &TypeRegistry,
    options: &Options,
    sink: W,
) -> Result<W, Error> {
    info!(
        "generating description for {} ({} operation(s))",
        contract.name,
        contract.operations.len()
    );

    Session::new(contract, registry, options, sink).write_document()
}

/// [`generate`] into a string.
pub fn generate_string(
    contract: &ServiceContract,
    registry: &TypeRegistry,
    options: &Options,
) -> Result<String, Error> {
    let bytes = generate(contract, registry, options, Vec::<u8>::new())?;
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}
