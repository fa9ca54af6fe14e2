use std::io::Write;
use wsdlgen_util::xml::XmlWriter;

use crate::{
    config::Options,
    error::Error,
    namespaces::{
        NamespaceTable, QualifiedName, SERIALIZATION_NS, SOAP11_NS, SOAP12_NS, WSAM_NS, WSAW_NS,
        WSDL_NS, XSD_NS,
    },
    registry::TypeRegistry,
    schema::BuildQueues,
    types::{AddressingVersion, BindingDescriptor, EnvelopeVersion, ServiceContract},
};

/// All mutable state needed to write one document. A session is consumed by
/// the write and never reused.
pub(crate) struct Session<'a, W: Write> {
    pub(crate) contract: &'a ServiceContract,
    pub(crate) registry: &'a TypeRegistry,
    pub(crate) options: &'a Options,
    pub(crate) binding: BindingDescriptor,
    pub(crate) out: XmlWriter<W>,
    pub(crate) namespaces: NamespaceTable,
    pub(crate) queues: BuildQueues,
    pub(crate) needs_date_time_offset: bool,
}

impl<'a, W: Write> Session<'a, W> {
    pub(crate) fn new(
        contract: &'a ServiceContract,
        registry: &'a TypeRegistry,
        options: &'a Options,
        sink: W,
    ) -> Self {
        let binding = options
            .binding
            .clone()
            .unwrap_or_else(|| BindingDescriptor::basic_http(contract));

        let out = match options.indent {
            Some(indent) => XmlWriter::with_indent(sink, indent),
            None => XmlWriter::new(sink),
        };

        let mut namespaces = NamespaceTable::new();
        namespaces.declare("wsdl", WSDL_NS);
        namespaces.declare("xsd", XSD_NS);
        namespaces.declare("soap", SOAP11_NS);
        namespaces.declare("soap12", SOAP12_NS);
        namespaces.declare("tns", &contract.namespace);
        namespaces.declare("ser", SERIALIZATION_NS);

        match binding.message_version.addressing {
            AddressingVersion::None => (),
            AddressingVersion::WsAddressing10 => namespaces.declare("wsam", WSAM_NS),
            AddressingVersion::WsAddressingAugust2004 => namespaces.declare("wsaw", WSAW_NS),
        }

        Self {
            contract,
            registry,
            options,
            binding,
            out,
            namespaces,
            queues: BuildQueues::default(),
            needs_date_time_offset: false,
        }
    }

    /// Qualifies a name in the contract's target namespace.
    pub(crate) fn target_name(&self, name: &str) -> Result<String, Error> {
        self.namespaces
            .qualify(&QualifiedName::new(self.contract.namespace.as_str(), name))
    }

    pub(crate) fn xsd_name(&self, name: &str) -> Result<String, Error> {
        self.namespaces.qualify(&QualifiedName::new(XSD_NS, name))
    }

    /// Prefix of the SOAP binding extension elements.
    pub(crate) fn soap_prefix(&self) -> Result<&str, Error> {
        let namespace = match self.binding.message_version.envelope {
            EnvelopeVersion::Soap11 => SOAP11_NS,
            EnvelopeVersion::Soap12 => SOAP12_NS,
        };

        self.namespaces
            .prefix_of(namespace)
            .ok_or_else(|| Error::UndeclaredNamespace(namespace.to_owned()))
    }
}
