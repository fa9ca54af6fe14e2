#![allow(dead_code)]

use quick_xml::{events::Event, Reader};
use wsdlgen_wsdl::{
    config::Options,
    registry::TypeRegistry,
    types::ServiceContract,
};

pub const TARGET_NS: &str = "http://tempuri.org/";
pub const BASE_URL: &str = "http://localhost:8080/service.svc";

/// An element of a parsed document, kept in document order.
#[derive(Debug, Clone, Default)]
pub struct Node {
    pub name: String,
    pub attributes: Vec<(String, String)>,
    pub children: Vec<Node>,
    pub text: String,
}

impl Node {
    pub fn attr(&self, key: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(name, _)| name == key)
            .map(|(_, value)| value.as_str())
    }

    pub fn children_named<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a Node> + 'a {
        self.children.iter().filter(move |child| child.name == name)
    }

    /// Every element below this one, depth first.
    pub fn descendants(&self) -> Vec<&Node> {
        let mut result = Vec::new();
        for child in &self.children {
            result.push(child);
            result.extend(child.descendants());
        }

        result
    }

    pub fn find_all<'a>(&'a self, name: &str, key: &str, value: &str) -> Vec<&'a Node> {
        self.descendants()
            .into_iter()
            .filter(|node| node.name == name && node.attr(key) == Some(value))
            .collect()
    }

    /// The single element named `name` whose `key` attribute equals `value`.
    pub fn find(&self, name: &str, key: &str, value: &str) -> &Node {
        let found = self.find_all(name, key, value);
        assert_eq!(
            found.len(),
            1,
            "expected exactly one <{} {}=\"{}\">",
            name,
            key,
            value
        );
        found[0]
    }

    /// `xsd:element` children of the first sequence below this node.
    pub fn sequence(&self) -> Vec<&Node> {
        self.descendants()
            .into_iter()
            .find(|node| node.name == "xsd:sequence")
            .map(|sequence| sequence.children_named("xsd:element").collect())
            .unwrap_or_default()
    }

    pub fn count(&self, name: &str) -> usize {
        self.descendants()
            .into_iter()
            .filter(|node| node.name == name)
            .count()
    }
}

/// Parses `xml` into its root element.
pub fn parse(xml: &str) -> Node {
    let mut reader = Reader::from_str(xml);
    reader.trim_text(true);

    let mut buffer = Vec::new();
    let mut stack: Vec<Node> = vec![Node::default()];

    loop {
        match reader.read_event(&mut buffer).unwrap() {
            Event::Start(start) => {
                stack.push(node(&reader, &start));
            }

            Event::Empty(start) => {
                let node = node(&reader, &start);
                stack.last_mut().unwrap().children.push(node);
            }

            Event::Text(text) => {
                let text = text.unescape_and_decode(&reader).unwrap();
                stack.last_mut().unwrap().text.push_str(&text);
            }

            Event::End(_) => {
                let node = stack.pop().unwrap();
                stack.last_mut().unwrap().children.push(node);
            }

            Event::Eof => break,
            _ => (),
        }

        buffer.clear();
    }

    assert_eq!(stack.len(), 1, "unbalanced document");
    let mut document = stack.pop().unwrap();
    assert_eq!(document.children.len(), 1, "expected a single root element");
    document.children.remove(0)
}

fn node(reader: &Reader<&[u8]>, start: &quick_xml::events::BytesStart<'_>) -> Node {
    let name = reader.decode(start.name()).unwrap().to_owned();
    let attributes = start
        .attributes()
        .map(|attribute| {
            let attribute = attribute.unwrap();
            (
                reader.decode(attribute.key).unwrap().to_owned(),
                attribute.unescape_and_decode_value(reader).unwrap(),
            )
        })
        .collect();

    Node {
        name,
        attributes,
        ..Default::default()
    }
}

pub fn options() -> Options {
    Options::new(BASE_URL.parse().unwrap())
}

pub fn generate(contract: &ServiceContract, registry: &TypeRegistry, options: &Options) -> String {
    wsdlgen_wsdl::generate_string(contract, registry, options).unwrap()
}

pub fn generate_tree(contract: &ServiceContract, registry: &TypeRegistry) -> Node {
    parse(&generate(contract, registry, &options()))
}

/// The first `xsd:schema` block, which targets the contract namespace.
pub fn target_schema(root: &Node) -> &Node {
    root.find_all("xsd:schema", "targetNamespace", TARGET_NS)[0]
}
