use crate::error::Error;

pub const WSDL_NS: &str = "http://schemas.xmlsoap.org/wsdl/";
pub const XSD_NS: &str = "http://www.w3.org/2001/XMLSchema";
pub const SOAP11_NS: &str = "http://schemas.xmlsoap.org/wsdl/soap/";
pub const SOAP12_NS: &str = "http://schemas.xmlsoap.org/wsdl/soap12/";
pub const HTTP_TRANSPORT: &str = "http://schemas.xmlsoap.org/soap/http";
pub const ARRAYS_NS: &str = "http://schemas.microsoft.com/2003/10/Serialization/Arrays";
pub const SYSTEM_NS: &str = "http://schemas.datacontract.org/2004/07/System";
pub const SERIALIZATION_NS: &str = "http://schemas.microsoft.com/2003/10/Serialization/";
pub const WSAM_NS: &str = "http://www.w3.org/2007/05/addressing/metadata";
pub const WSAW_NS: &str = "http://www.w3.org/2006/05/addressing/wsdl";
pub const SOAP11_ENCODING: &str = "http://schemas.xmlsoap.org/soap/encoding/";
pub const SOAP12_ENCODING: &str = "http://www.w3.org/2003/05/soap-encoding";

/// A namespace URI paired with a local name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QualifiedName {
    pub namespace: String,
    pub name: String,
}

/// Prefixes declared for the document, in declaration order.
#[derive(Debug, Clone, Default)]
pub struct NamespaceTable {
    declared: Vec<(String, String)>,
    counter: usize,
}

impl QualifiedName {
    pub fn new<N: Into<String>, S: Into<String>>(namespace: N, name: S) -> Self {
        Self {
            namespace: namespace.into(),
            name: name.into(),
        }
    }
}

impl NamespaceTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Declares `prefix` for `namespace` unless the namespace already has one.
    pub fn declare(&mut self, prefix: &str, namespace: &str) {
        if self.prefix_of(namespace).is_none() {
            self.declared.push((prefix.to_owned(), namespace.to_owned()));
        }
    }

    pub fn prefix_of(&self, namespace: &str) -> Option<&str> {
        self.declared
            .iter()
            .find(|(_, value)| value == namespace)
            .map(|(prefix, _)| prefix.as_str())
    }

    /// Hands out a fresh `qN` prefix. Allocated prefixes are declared on the
    /// element that uses them, so they never enter the document-wide table.
    pub fn allocate(&mut self) -> String {
        self.counter += 1;
        format!("q{}", self.counter)
    }

    pub fn qualify(&self, name: &QualifiedName) -> Result<String, Error> {
        match self.prefix_of(&name.namespace) {
            Some(prefix) => Ok(format!("{}:{}", prefix, name.name)),
            None => Err(Error::UndeclaredNamespace(name.namespace.clone())),
        }
    }

    /// `xmlns:` attributes for every declared prefix.
    pub fn declarations(&self) -> impl Iterator<Item = (String, &str)> {
        self.declared
            .iter()
            .map(|(prefix, namespace)| (format!("xmlns:{}", prefix), namespace.as_str()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_declaration_wins() {
        let mut namespaces = NamespaceTable::new();
        namespaces.declare("xsd", XSD_NS);
        namespaces.declare("xs", XSD_NS);

        assert_eq!(namespaces.prefix_of(XSD_NS), Some("xsd"));
        assert_eq!(namespaces.declarations().count(), 1);
    }

    #[test]
    fn allocation_is_monotonic() {
        let mut namespaces = NamespaceTable::new();
        assert_eq!(namespaces.allocate(), "q1");
        assert_eq!(namespaces.allocate(), "q2");
        assert_eq!(namespaces.allocate(), "q3");
        assert_eq!(namespaces.prefix_of(ARRAYS_NS), None);
    }

    #[test]
    fn qualify_uses_declared_prefix() {
        let mut namespaces = NamespaceTable::new();
        namespaces.declare("tns", "http://tempuri.org/");

        let name = QualifiedName::new("http://tempuri.org/", "Person");
        assert_eq!(namespaces.qualify(&name).unwrap(), "tns:Person");
    }

    #[test]
    fn qualify_unknown_namespace_fails() {
        let namespaces = NamespaceTable::new();
        let name = QualifiedName::new(SYSTEM_NS, "DateTimeOffset");

        assert!(matches!(
            namespaces.qualify(&name),
            Err(Error::UndeclaredNamespace(ns)) if ns == SYSTEM_NS
        ));
    }

    #[test]
    fn declarations_keep_insertion_order() {
        let mut namespaces = NamespaceTable::new();
        namespaces.declare("wsdl", WSDL_NS);
        namespaces.declare("xsd", XSD_NS);
        namespaces.declare("tns", "urn:test");

        let declared = namespaces
            .declarations()
            .map(|(attribute, _)| attribute)
            .collect::<Vec<_>>();
        assert_eq!(declared, vec!["xmlns:wsdl", "xmlns:xsd", "xmlns:tns"]);
    }
}
