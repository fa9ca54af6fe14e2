use url::Url;

use crate::types::BindingDescriptor;

/// How the builder treats complex types discovered while writing the array
/// schema blocks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DrainOrder {
    /// Complex types, then enumerations, then arrays, each drained once.
    /// Complex types first queued by the array drain stay undefined.
    #[default]
    ThreePhase,
    /// Keeps draining until every queue is empty, writing late complex and
    /// enumeration types in extra schema blocks for the target namespace.
    FixedPoint,
}

#[derive(Debug, Clone)]
pub struct Options {
    pub base_url: Url,
    pub binding: Option<BindingDescriptor>,
    pub drain_order: DrainOrder,
    pub indent: Option<usize>,
}

impl Options {
    pub fn new(base_url: Url) -> Self {
        Self {
            base_url,
            binding: None,
            drain_order: DrainOrder::default(),
            indent: None,
        }
    }

    pub fn with_binding(mut self, binding: BindingDescriptor) -> Self {
        self.binding = Some(binding);
        self
    }

    pub fn with_drain_order(mut self, drain_order: DrainOrder) -> Self {
        self.drain_order = drain_order;
        self
    }

    pub fn with_indent(mut self, indent: usize) -> Self {
        self.indent = Some(indent);
        self
    }
}
