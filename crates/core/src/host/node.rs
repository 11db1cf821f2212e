use std::sync::Arc;

use super::error::HostError;

/// Node kinds of the mutable host tree; the XML value kinds plus the two
/// container kinds that only exist host-side.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum HostNodeKind {
    Element,
    Text,
    Comment,
    ProcessingInstruction,
    Attribute,
    Document,
    DocumentFragment,
}

/// Identity tag of the owning document; used to police cross-document
/// attachment.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct DocumentId(u64);

impl DocumentId {
    pub const fn new(raw: u64) -> Self {
        Self(raw)
    }

    pub const fn raw(self) -> u64 {
        self.0
    }
}

/// A mutable, identity-bearing node of the host tree.
///
/// Host nodes are handles: cloning the `Arc` clones the identity, not the
/// node. Every node belongs to exactly one owning document at a time;
/// attaching a node under a parent owned by a different document must fail
/// with [`HostError::WrongDocument`] until the node has been adopted.
pub trait HostNode: Send + Sync {
    fn kind(&self) -> HostNodeKind;

    fn document_id(&self) -> DocumentId;

    fn namespace_uri(&self) -> Option<String>;

    /// Local name of elements and attributes, target of processing
    /// instructions.
    fn local_name(&self) -> Option<String>;

    /// Payload of text, comment and processing-instruction nodes, value of
    /// attribute nodes.
    fn node_value(&self) -> Option<String>;

    /// Assigns the payload/value; attribute constructors take no value
    /// argument, so freshly created attribute nodes receive theirs here.
    fn set_value(&self, value: &str) -> Result<(), HostError>;

    /// Ordered child list. Empty for leaves and attributes.
    fn children(&self) -> Vec<Arc<dyn HostNode>>;

    /// Ordered attribute nodes of an element. Empty for every other kind.
    fn attributes(&self) -> Vec<Arc<dyn HostNode>>;

    fn append_child(&self, child: Arc<dyn HostNode>) -> Result<(), HostError>;

    /// Sets a namespace-qualified attribute, replacing the value when the
    /// qualified name is already present and preserving its slot order.
    fn set_attribute_ns(
        &self,
        namespace: Option<&str>,
        local_name: &str,
        value: &str,
    ) -> Result<(), HostError>;

    /// Implementation hook used by documents to recover their concrete node
    /// type during adoption; foreign handles fail with
    /// [`HostError::ForeignNode`].
    fn as_any(self: Arc<Self>) -> Arc<dyn std::any::Any + Send + Sync>;
}
