//! Host tree to XML value model conversion.
//!
//! The decode direction never walks the host node's structure. A host node is
//! serialized to text by the codec and that text is reparsed through the XML
//! model's own constructor, so structural fidelity is delegated entirely to
//! the serializer/parser pair. Serialization runs with pretty-printing forced
//! off so the round-tripped text is canonical.

use std::sync::Arc;

use domx_core::{FormatGuard, HostNode, XmlValue};

use crate::context::BridgeContext;
use crate::error::BridgeError;

/// Converts one host node back into the XML value model.
pub fn host_to_xml(
    context: &BridgeContext,
    node: &Arc<dyn HostNode>,
) -> Result<XmlValue, BridgeError> {
    let codec = context.codec();
    let _plain = FormatGuard::plain(codec);
    let text = codec.serialize(node)?;
    Ok(XmlValue::parse(&text)?)
}

/// Converts an ordered collection of host nodes into one XML sequence by
/// flattening the per-node conversions in collection order.
pub fn host_list_to_xml(
    context: &BridgeContext,
    nodes: &[Arc<dyn HostNode>],
) -> Result<XmlValue, BridgeError> {
    let mut out = XmlValue::empty();
    for node in nodes {
        out = out.concat(host_to_xml(context, node)?);
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::convert::{to_host_node, to_host_node_list};
    use domx_core::{HostDocument, XmlNode};
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
    fn element_round_trip_is_structurally_equivalent(context: BridgeContext) {
        let value = XmlValue::parse(r#"<a x="1" y="2"><b/>text<c><d/></c></a>"#).unwrap();
        let host = to_host_node(&context, &value).unwrap().unwrap();
        let back = host_to_xml(&context, &host).unwrap();
        assert_eq!(back, value);
    }

    #[rstest]
    fn decoding_runs_plain_even_when_pretty_is_on(context: BridgeContext) {
        context.codec().set_pretty_printing(true);
        let value = XmlValue::parse("<a><b/><c/></a>").unwrap();
        let host = to_host_node(&context, &value).unwrap().unwrap();
        let back = host_to_xml(&context, &host).unwrap();
        assert_eq!(back, value);
        // The prior mode is restored afterwards.
        assert!(context.codec().pretty_printing());
    }

    #[rstest]
    fn comment_round_trip_keeps_content(context: BridgeContext) {
        let value = XmlValue::parse("<a><!--hi--></a>").unwrap();
        let host = to_host_node(&context, &value).unwrap().unwrap();
        let back = host_to_xml(&context, &host).unwrap();
        let Some(XmlNode::Element(element)) = back.as_single() else {
            panic!("expected a single element")
        };
        assert_eq!(element.children(), [XmlNode::Comment("hi".into())]);
    }

    #[rstest]
    fn list_decoding_flattens_in_order(context: BridgeContext) {
        let value = XmlValue::parse("<a/><b/><c/>").unwrap();
        let hosts = to_host_node_list(&context, &value).unwrap();
        let back = host_list_to_xml(&context, &hosts).unwrap();
        let names: Vec<_> = back.iter().filter_map(XmlNode::local_name).collect();
        assert_eq!(names, ["a", "b", "c"]);
    }

    #[rstest]
    fn empty_list_decodes_to_empty_sequence(context: BridgeContext) {
        let back = host_list_to_xml(&context, &[]).unwrap();
        assert!(back.is_empty());
    }
}
