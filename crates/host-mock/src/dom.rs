//! In-memory host document and node implementation.
//!
//! Nodes are `Arc` handles with interior mutability; identity is the handle
//! itself. Each document draws a fresh [`DocumentId`] from a global counter,
//! and every node carries the id of its current owner so cross-document
//! attachment is caught before any mutation happens.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

use domx_core::{
    DocumentFactory, DocumentId, HostDocument, HostError, HostNode, HostNodeKind,
};

static NEXT_DOCUMENT_ID: AtomicU64 = AtomicU64::new(1);

fn next_document_id() -> DocumentId {
    DocumentId::new(NEXT_DOCUMENT_ID.fetch_add(1, Ordering::Relaxed))
}

pub struct MockNode {
    kind: HostNodeKind,
    document_id: Mutex<DocumentId>,
    namespace: Option<String>,
    local_name: Option<String>,
    value: Mutex<Option<String>>,
    children: Mutex<Vec<Arc<MockNode>>>,
    attributes: Mutex<Vec<Arc<MockNode>>>,
}

impl MockNode {
    fn new(
        kind: HostNodeKind,
        document_id: DocumentId,
        namespace: Option<&str>,
        local_name: Option<&str>,
        value: Option<&str>,
    ) -> Arc<Self> {
        Arc::new(Self {
            kind,
            document_id: Mutex::new(document_id),
            namespace: namespace.map(str::to_owned),
            local_name: local_name.map(str::to_owned),
            value: Mutex::new(value.map(str::to_owned)),
            children: Mutex::new(Vec::new()),
            attributes: Mutex::new(Vec::new()),
        })
    }

    pub(crate) fn children_snapshot(&self) -> Vec<Arc<MockNode>> {
        self.children.lock().expect("node children lock poisoned").clone()
    }

    pub(crate) fn attributes_snapshot(&self) -> Vec<Arc<MockNode>> {
        self.attributes.lock().expect("node attributes lock poisoned").clone()
    }

    pub(crate) fn kind_raw(&self) -> HostNodeKind {
        self.kind
    }

    pub(crate) fn namespace_raw(&self) -> Option<&str> {
        self.namespace.as_deref()
    }

    pub(crate) fn local_name_raw(&self) -> Option<&str> {
        self.local_name.as_deref()
    }

    pub(crate) fn value_snapshot(&self) -> Option<String> {
        self.value.lock().expect("node value lock poisoned").clone()
    }

    fn owner(&self) -> DocumentId {
        *self.document_id.lock().expect("node owner lock poisoned")
    }

    fn retag(self: &Arc<Self>, document_id: DocumentId) {
        *self.document_id.lock().expect("node owner lock poisoned") = document_id;
        for attribute in self.attributes_snapshot() {
            attribute.retag(document_id);
        }
        for child in self.children_snapshot() {
            child.retag(document_id);
        }
    }

    fn check_same_document(&self, child: &MockNode) -> Result<(), HostError> {
        let expected = self.owner();
        let found = child.owner();
        if expected == found {
            Ok(())
        } else {
            Err(HostError::WrongDocument { expected, found })
        }
    }

    fn downcast(node: Arc<dyn HostNode>) -> Result<Arc<MockNode>, HostError> {
        node.as_any().downcast::<MockNode>().map_err(|_| HostError::ForeignNode)
    }
}

impl HostNode for MockNode {
    fn kind(&self) -> HostNodeKind {
        self.kind
    }

    fn document_id(&self) -> DocumentId {
        self.owner()
    }

    fn namespace_uri(&self) -> Option<String> {
        self.namespace.clone()
    }

    fn local_name(&self) -> Option<String> {
        self.local_name.clone()
    }

    fn node_value(&self) -> Option<String> {
        self.value_snapshot()
    }

    fn set_value(&self, value: &str) -> Result<(), HostError> {
        match self.kind {
            HostNodeKind::Text
            | HostNodeKind::Comment
            | HostNodeKind::ProcessingInstruction
            | HostNodeKind::Attribute => {
                *self.value.lock().expect("node value lock poisoned") = Some(value.to_owned());
                Ok(())
            }
            other => Err(HostError::UnsupportedOperation(other)),
        }
    }

    fn children(&self) -> Vec<Arc<dyn HostNode>> {
        self.children_snapshot().into_iter().map(|child| child as Arc<dyn HostNode>).collect()
    }

    fn attributes(&self) -> Vec<Arc<dyn HostNode>> {
        self.attributes_snapshot().into_iter().map(|attr| attr as Arc<dyn HostNode>).collect()
    }

    fn append_child(&self, child: Arc<dyn HostNode>) -> Result<(), HostError> {
        match self.kind {
            HostNodeKind::Element | HostNodeKind::Document | HostNodeKind::DocumentFragment => {}
            other => return Err(HostError::UnsupportedOperation(other)),
        }
        let child = MockNode::downcast(child)?;
        match child.kind {
            HostNodeKind::Attribute | HostNodeKind::Document | HostNodeKind::DocumentFragment => {
                return Err(HostError::InvalidHierarchy { parent: self.kind, child: child.kind });
            }
            _ => {}
        }
        self.check_same_document(&child)?;
        self.children.lock().expect("node children lock poisoned").push(child);
        Ok(())
    }

    fn set_attribute_ns(
        &self,
        namespace: Option<&str>,
        local_name: &str,
        value: &str,
    ) -> Result<(), HostError> {
        if self.kind != HostNodeKind::Element {
            return Err(HostError::UnsupportedOperation(self.kind));
        }
        if local_name.is_empty() {
            return Err(HostError::InvalidName { what: "attribute", name: local_name.to_owned() });
        }
        let mut attributes = self.attributes.lock().expect("node attributes lock poisoned");
        if let Some(existing) = attributes.iter().find(|attr| {
            attr.namespace.as_deref() == namespace && attr.local_name.as_deref() == Some(local_name)
        }) {
            *existing.value.lock().expect("node value lock poisoned") = Some(value.to_owned());
            return Ok(());
        }
        attributes.push(MockNode::new(
            HostNodeKind::Attribute,
            self.owner(),
            namespace,
            Some(local_name),
            Some(value),
        ));
        Ok(())
    }

    fn as_any(self: Arc<Self>) -> Arc<dyn std::any::Any + Send + Sync> {
        self
    }
}

pub struct MockDocument {
    node: Arc<MockNode>,
}

impl MockDocument {
    pub fn new() -> Arc<Self> {
        let id = next_document_id();
        Arc::new(Self { node: MockNode::new(HostNodeKind::Document, id, None, None, None) })
    }

    pub(crate) fn document_node(&self) -> Arc<MockNode> {
        Arc::clone(&self.node)
    }

    fn check_name(what: &'static str, name: &str) -> Result<(), HostError> {
        let valid = !name.is_empty()
            && !name.contains(|c: char| c.is_whitespace() || matches!(c, '<' | '>' | '&' | '/'));
        if valid {
            Ok(())
        } else {
            Err(HostError::InvalidName { what, name: name.to_owned() })
        }
    }
}

impl HostDocument for MockDocument {
    fn id(&self) -> DocumentId {
        self.node.owner()
    }

    fn create_element_ns(
        &self,
        namespace: Option<&str>,
        local_name: &str,
    ) -> Result<Arc<dyn HostNode>, HostError> {
        Self::check_name("element", local_name)?;
        Ok(MockNode::new(HostNodeKind::Element, self.id(), namespace, Some(local_name), None))
    }

    fn create_text_node(&self, data: &str) -> Arc<dyn HostNode> {
        MockNode::new(HostNodeKind::Text, self.id(), None, None, Some(data))
    }

    fn create_comment(&self, data: &str) -> Arc<dyn HostNode> {
        MockNode::new(HostNodeKind::Comment, self.id(), None, None, Some(data))
    }

    fn create_processing_instruction(
        &self,
        target: &str,
        data: &str,
    ) -> Result<Arc<dyn HostNode>, HostError> {
        Self::check_name("processing-instruction target", target)?;
        Ok(MockNode::new(
            HostNodeKind::ProcessingInstruction,
            self.id(),
            None,
            Some(target),
            Some(data),
        ))
    }

    fn create_attribute_ns(
        &self,
        namespace: Option<&str>,
        local_name: &str,
    ) -> Result<Arc<dyn HostNode>, HostError> {
        Self::check_name("attribute", local_name)?;
        Ok(MockNode::new(HostNodeKind::Attribute, self.id(), namespace, Some(local_name), None))
    }

    fn create_document_fragment(&self) -> Arc<dyn HostNode> {
        MockNode::new(HostNodeKind::DocumentFragment, self.id(), None, None, None)
    }

    fn adopt_node(&self, node: Arc<dyn HostNode>) -> Result<Arc<dyn HostNode>, HostError> {
        let mock = MockNode::downcast(Arc::clone(&node))?;
        mock.retag(self.id());
        Ok(node)
    }

    fn document_element(&self) -> Option<Arc<dyn HostNode>> {
        self.node
            .children_snapshot()
            .into_iter()
            .find(|child| child.kind_raw() == HostNodeKind::Element)
            .map(|element| element as Arc<dyn HostNode>)
    }

    fn set_document_element(&self, element: Arc<dyn HostNode>) -> Result<(), HostError> {
        if element.kind() != HostNodeKind::Element {
            return Err(HostError::InvalidHierarchy {
                parent: HostNodeKind::Document,
                child: element.kind(),
            });
        }
        if self.document_element().is_some() {
            return Err(HostError::DocumentElementTaken);
        }
        self.node.append_child(element)
    }

    fn as_node(&self) -> Arc<dyn HostNode> {
        self.document_node()
    }
}

/// Hands out fresh [`MockDocument`]s; one per query-bridge evaluation.
#[derive(Default)]
pub struct MockDocumentFactory;

impl DocumentFactory for MockDocumentFactory {
    fn new_document(&self) -> Result<Arc<dyn HostDocument>, HostError> {
        Ok(MockDocument::new())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    fn nodes_are_tagged_with_their_owning_document() {
        let doc = MockDocument::new();
        let element = doc.create_element_ns(None, "a").unwrap();
        assert_eq!(element.document_id(), doc.id());
    }

    #[rstest]
    fn cross_document_append_fails_without_adoption() {
        let doc_a = MockDocument::new();
        let doc_b = MockDocument::new();
        let parent = doc_a.create_element_ns(None, "a").unwrap();
        let stray = doc_b.create_element_ns(None, "b").unwrap();
        let err = parent.append_child(Arc::clone(&stray)).unwrap_err();
        assert_eq!(err, HostError::WrongDocument { expected: doc_a.id(), found: doc_b.id() });

        let adopted = doc_a.adopt_node(stray).unwrap();
        parent.append_child(adopted).unwrap();
        assert_eq!(parent.children().len(), 1);
    }

    #[rstest]
    fn adoption_retags_the_whole_subtree() {
        let doc_a = MockDocument::new();
        let doc_b = MockDocument::new();
        let parent = doc_a.create_element_ns(None, "a").unwrap();
        let child = doc_a.create_element_ns(None, "b").unwrap();
        child.set_attribute_ns(None, "x", "1").unwrap();
        parent.append_child(child).unwrap();

        let adopted = doc_b.adopt_node(parent).unwrap();
        assert_eq!(adopted.document_id(), doc_b.id());
        let child = &adopted.children()[0];
        assert_eq!(child.document_id(), doc_b.id());
        assert_eq!(child.attributes()[0].document_id(), doc_b.id());
    }

    #[rstest]
    fn set_attribute_replaces_value_in_slot_order() {
        let doc = MockDocument::new();
        let element = doc.create_element_ns(None, "a").unwrap();
        element.set_attribute_ns(None, "x", "1").unwrap();
        element.set_attribute_ns(None, "y", "2").unwrap();
        element.set_attribute_ns(None, "x", "3").unwrap();
        let attributes = element.attributes();
        let names: Vec<_> = attributes.iter().filter_map(|a| a.local_name()).collect();
        assert_eq!(names, ["x", "y"]);
        assert_eq!(attributes[0].node_value().as_deref(), Some("3"));
    }

    #[rstest]
    fn attributes_cannot_be_appended_as_children() {
        let doc = MockDocument::new();
        let element = doc.create_element_ns(None, "a").unwrap();
        let attribute = doc.create_attribute_ns(None, "x").unwrap();
        let err = element.append_child(attribute).unwrap_err();
        assert!(matches!(err, HostError::InvalidHierarchy { .. }));
    }

    #[rstest]
    fn document_element_can_be_installed_once() {
        let doc = MockDocument::new();
        let root = doc.create_element_ns(None, "root").unwrap();
        doc.set_document_element(root).unwrap();
        let second = doc.create_element_ns(None, "other").unwrap();
        assert_eq!(doc.set_document_element(second).unwrap_err(), HostError::DocumentElementTaken);
    }

    #[rstest]
    fn detached_attribute_receives_value_after_construction() {
        let doc = MockDocument::new();
        let attribute = doc.create_attribute_ns(None, "x").unwrap();
        assert_eq!(attribute.node_value(), None);
        attribute.set_value("1").unwrap();
        assert_eq!(attribute.node_value().as_deref(), Some("1"));
    }
}
