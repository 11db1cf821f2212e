//! XML value model to host tree conversion.
//!
//! [`leaf_to_host`] maps the non-element kinds, [`element_to_host`] builds an
//! element recursively, and the two entry points [`to_host_node`] and
//! [`to_host_node_list`] handle the singleton/sequence duality explicitly.

use std::sync::Arc;

use domx_core::{HostNode, XmlElement, XmlNode, XmlValue};
use tracing::trace;

use crate::context::BridgeContext;
use crate::error::BridgeError;

/// Maps a single text, comment, processing-instruction or attribute node to
/// its host equivalent, decoding the kind-specific textual wrappers.
///
/// Element nodes are not leaves and fail with [`BridgeError::NotALeaf`]; they
/// belong to [`element_to_host`].
pub fn leaf_to_host(
    context: &BridgeContext,
    node: &XmlNode,
) -> Result<Arc<dyn HostNode>, BridgeError> {
    let document = context.document();
    match node {
        XmlNode::Text(data) => Ok(document.create_text_node(data)),
        XmlNode::Comment(_) => {
            // Strip the `<!--` and `-->` markers from the textual form.
            let text = node.xml_string();
            Ok(document.create_comment(&text[4..text.len() - 3]))
        }
        XmlNode::ProcessingInstruction(pi) => {
            // Strip the `<?` and `?>` markers, then the leading target name
            // and the whitespace separating it from the data.
            let text = node.xml_string();
            let body = &text[2..text.len() - 2];
            let data = body.strip_prefix(pi.target()).map_or(body, str::trim_start);
            Ok(document.create_processing_instruction(pi.target(), data)?)
        }
        XmlNode::Attribute(attribute) => {
            // Attribute constructors take no value argument; the value is
            // assigned after construction.
            let host =
                document.create_attribute_ns(attribute.namespace(), attribute.local_name())?;
            host.set_value(attribute.value())?;
            Ok(host)
        }
        XmlNode::Element(_) => Err(BridgeError::NotALeaf(node.kind())),
    }
}

/// Recursively builds a host element: namespace and local name first, then
/// the attribute set in order, then the children in order.
pub fn element_to_host(
    context: &BridgeContext,
    element: &XmlElement,
) -> Result<Arc<dyn HostNode>, BridgeError> {
    let document = context.document();
    let namespace = context.element_namespace(element.namespace());
    let host = document.create_element_ns(namespace, element.local_name())?;
    for attribute in element.attributes() {
        host.set_attribute_ns(attribute.namespace(), attribute.local_name(), attribute.value())?;
    }
    for child in element.children() {
        let converted = match child {
            XmlNode::Element(inner) => element_to_host(context, inner)?,
            other => leaf_to_host(context, other)?,
        };
        host.append_child(converted)?;
    }
    Ok(host)
}

/// Singleton conversion.
///
/// A value whose length is not exactly one has no single host identity and
/// yields `Ok(None)`; callers check the cardinality first. A length-one value
/// always yields exactly one host node or a propagated fault.
pub fn to_host_node(
    context: &BridgeContext,
    value: &XmlValue,
) -> Result<Option<Arc<dyn HostNode>>, BridgeError> {
    let Some(node) = value.as_single() else {
        trace!(len = value.len(), "no singleton host conversion for this cardinality");
        return Ok(None);
    };
    let host = match node {
        XmlNode::Element(element) => element_to_host(context, element)?,
        other => leaf_to_host(context, other)?,
    };
    Ok(Some(host))
}

/// Sequence conversion: converts every member in order through a document
/// fragment and returns the fragment's child collection, adopted into the
/// context's allocation document. Succeeds for any sequence, including the
/// empty one.
pub fn to_host_node_list(
    context: &BridgeContext,
    value: &XmlValue,
) -> Result<Vec<Arc<dyn HostNode>>, BridgeError> {
    let document = context.document();
    let fragment = document.create_document_fragment();
    for node in value.iter() {
        let converted = match node {
            XmlNode::Element(element) => element_to_host(context, element)?,
            other => leaf_to_host(context, other)?,
        };
        fragment.append_child(converted)?;
    }
    let mut out = Vec::with_capacity(value.len());
    for child in fragment.children() {
        out.push(document.adopt_node(child)?);
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use domx_core::{HostDocument, HostNodeKind, XmlAttribute, XmlPi};
    use domx_host_mock::{MockCodec, MockDocument, MockDocumentFactory, MockEvaluator};
    use rstest::{fixture, rstest};

    #[fixture]
    fn context() -> BridgeContext {
        let document: Arc<dyn HostDocument> = MockDocument::new();
        BridgeContext::new(
            document,
            Arc::new(MockDocumentFactory::default()),
            Arc::new(MockCodec::new()),
            Arc::new(MockEvaluator::new()),
        )
    }

    #[rstest]
    fn text_maps_verbatim(context: BridgeContext) {
        let host = leaf_to_host(&context, &XmlNode::Text("a < b".into())).unwrap();
        assert_eq!(host.kind(), HostNodeKind::Text);
        assert_eq!(host.node_value().as_deref(), Some("a < b"));
    }

    #[rstest]
    fn comment_markers_are_stripped(context: BridgeContext) {
        let node = XmlNode::Comment("hi".into());
        assert_eq!(node.xml_string(), "<!--hi-->");
        let host = leaf_to_host(&context, &node).unwrap();
        assert_eq!(host.kind(), HostNodeKind::Comment);
        assert_eq!(host.node_value().as_deref(), Some("hi"));
    }

    #[rstest]
    fn processing_instruction_keeps_target_and_data(context: BridgeContext) {
        let node = XmlNode::ProcessingInstruction(XmlPi::new("xml-stylesheet", "href=\"x.css\""));
        let host = leaf_to_host(&context, &node).unwrap();
        assert_eq!(host.local_name().as_deref(), Some("xml-stylesheet"));
        assert_eq!(host.node_value().as_deref(), Some("href=\"x.css\""));
    }

    #[rstest]
    fn processing_instruction_without_data_maps_to_empty(context: BridgeContext) {
        let node = XmlNode::ProcessingInstruction(XmlPi::new("marker", ""));
        let host = leaf_to_host(&context, &node).unwrap();
        assert_eq!(host.node_value().as_deref(), Some(""));
    }

    #[rstest]
    fn attribute_becomes_detached_host_attribute(context: BridgeContext) {
        let node = XmlNode::Attribute(XmlAttribute::new(None, "x", "1"));
        let host = leaf_to_host(&context, &node).unwrap();
        assert_eq!(host.kind(), HostNodeKind::Attribute);
        assert_eq!(host.local_name().as_deref(), Some("x"));
        assert_eq!(host.node_value().as_deref(), Some("1"));
    }

    #[rstest]
    fn element_is_not_a_leaf(context: BridgeContext) {
        let node = XmlNode::Element(XmlElement::builder("a").build());
        assert!(matches!(leaf_to_host(&context, &node), Err(BridgeError::NotALeaf(_))));
    }

    #[rstest]
    fn element_conversion_preserves_attribute_and_child_order(context: BridgeContext) {
        let element = XmlElement::builder("a")
            .attribute(None, "x", "1")
            .attribute(None, "y", "2")
            .attribute(None, "z", "3")
            .child(XmlElement::builder("c1").build())
            .child(XmlElement::builder("c2").build())
            .child(XmlElement::builder("c3").build())
            .build();
        let host = element_to_host(&context, &element).unwrap();
        let attrs: Vec<_> =
            host.attributes().iter().filter_map(|attr| attr.local_name()).collect();
        assert_eq!(attrs, ["x", "y", "z"]);
        let children: Vec<_> =
            host.children().iter().filter_map(|child| child.local_name()).collect();
        assert_eq!(children, ["c1", "c2", "c3"]);
    }

    #[rstest]
    fn missing_element_namespace_uses_configured_default(context: BridgeContext) {
        let context = context.with_default_namespace(domx_core::ns::XHTML);
        let element = XmlElement::builder("p").build();
        let host = element_to_host(&context, &element).unwrap();
        assert_eq!(host.namespace_uri().as_deref(), Some(domx_core::ns::XHTML));
    }

    #[rstest]
    fn declared_namespace_wins_over_default(context: BridgeContext) {
        let context = context.with_default_namespace(domx_core::ns::XHTML);
        let element = XmlElement::builder("svg").namespace(domx_core::ns::SVG).build();
        let host = element_to_host(&context, &element).unwrap();
        assert_eq!(host.namespace_uri().as_deref(), Some(domx_core::ns::SVG));
    }

    #[rstest]
    #[case("")]
    #[case("<a/><b/>")]
    fn singleton_conversion_needs_length_one(context: BridgeContext, #[case] text: &str) {
        let value = XmlValue::parse(text).unwrap();
        assert!(to_host_node(&context, &value).unwrap().is_none());
    }

    #[rstest]
    fn singleton_conversion_of_concrete_element(context: BridgeContext) {
        let value = XmlValue::parse(r#"<a x="1"><b/>text</a>"#).unwrap();
        let host = to_host_node(&context, &value).unwrap().unwrap();
        assert_eq!(host.local_name().as_deref(), Some("a"));
        assert_eq!(host.attributes().len(), 1);
        let children = host.children();
        assert_eq!(children.len(), 2);
        assert_eq!(children[0].kind(), HostNodeKind::Element);
        assert_eq!(children[0].local_name().as_deref(), Some("b"));
        assert_eq!(children[1].kind(), HostNodeKind::Text);
        assert_eq!(children[1].node_value().as_deref(), Some("text"));
    }

    #[rstest]
    fn list_conversion_handles_any_cardinality(context: BridgeContext) {
        assert!(to_host_node_list(&context, &XmlValue::empty()).unwrap().is_empty());
        let value = XmlValue::parse("<a/><!--note--><b/>").unwrap();
        let hosts = to_host_node_list(&context, &value).unwrap();
        assert_eq!(hosts.len(), 3);
        assert_eq!(hosts[0].local_name().as_deref(), Some("a"));
        assert_eq!(hosts[1].kind(), HostNodeKind::Comment);
        assert_eq!(hosts[2].local_name().as_deref(), Some("b"));
        // Adopted into the allocation document, attachable right away.
        for host in hosts {
            assert_eq!(host.document_id(), context.document().id());
        }
    }
}
