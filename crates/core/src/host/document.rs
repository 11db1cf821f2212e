use std::sync::Arc;

use super::error::HostError;
use super::node::{DocumentId, HostNode};

/// The ambient factory for host nodes.
///
/// Every element, text, comment, processing-instruction, attribute and
/// fragment node is allocated from a document; a node allocated by one
/// document cannot be attached under a node owned by another until
/// [`HostDocument::adopt_node`] has re-tagged it.
pub trait HostDocument: Send + Sync {
    fn id(&self) -> DocumentId;

    fn create_element_ns(
        &self,
        namespace: Option<&str>,
        local_name: &str,
    ) -> Result<Arc<dyn HostNode>, HostError>;

    fn create_text_node(&self, data: &str) -> Arc<dyn HostNode>;

    fn create_comment(&self, data: &str) -> Arc<dyn HostNode>;

    fn create_processing_instruction(
        &self,
        target: &str,
        data: &str,
    ) -> Result<Arc<dyn HostNode>, HostError>;

    /// Creates a detached attribute node; its value is assigned afterwards
    /// via [`HostNode::set_value`].
    fn create_attribute_ns(
        &self,
        namespace: Option<&str>,
        local_name: &str,
    ) -> Result<Arc<dyn HostNode>, HostError>;

    fn create_document_fragment(&self) -> Arc<dyn HostNode>;

    /// Re-tags `node` and its whole subtree as owned by this document and
    /// returns the same handle.
    fn adopt_node(&self, node: Arc<dyn HostNode>) -> Result<Arc<dyn HostNode>, HostError>;

    fn document_element(&self) -> Option<Arc<dyn HostNode>>;

    /// Installs the root element of an otherwise empty document.
    fn set_document_element(&self, element: Arc<dyn HostNode>) -> Result<(), HostError>;

    /// The document itself viewed as a node of kind
    /// [`HostNodeKind::Document`](super::node::HostNodeKind::Document).
    fn as_node(&self) -> Arc<dyn HostNode>;
}

/// Creates fresh, empty host documents; the query bridge uses one per
/// evaluation so expressions never run against shared document state.
pub trait DocumentFactory: Send + Sync {
    fn new_document(&self) -> Result<Arc<dyn HostDocument>, HostError>;
}
