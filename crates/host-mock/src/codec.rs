//! Text codec over the mock DOM.
//!
//! The serializer walks host nodes through the `HostNode` trait only, so it
//! serializes any host implementation. The parser builds a [`MockDocument`]
//! from the XML value model's own fragment parser. Pretty-printing puts
//! element-only content on indented lines; the plain mode emits canonical
//! text with no insignificant whitespace.

use std::fmt::Write as _;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use domx_core::{
    CodecError, HostDocument, HostError, HostNode, HostNodeKind, TextCodec, XmlElement, XmlNode,
    XmlValue,
};
use quick_xml::escape::escape;

use crate::dom::MockDocument;

pub struct MockCodec {
    pretty: AtomicBool,
}

impl MockCodec {
    pub fn new() -> Self {
        Self { pretty: AtomicBool::new(false) }
    }
}

impl Default for MockCodec {
    fn default() -> Self {
        Self::new()
    }
}

impl TextCodec for MockCodec {
    fn parse(&self, text: &str) -> Result<Arc<dyn HostDocument>, CodecError> {
        let value = XmlValue::parse(text).map_err(|err| CodecError::Parse(err.to_string()))?;
        let document = MockDocument::new();
        let mut saw_element = false;
        for node in value.iter() {
            match node {
                XmlNode::Element(element) => {
                    if saw_element {
                        return Err(CodecError::Parse("multiple document elements".into()));
                    }
                    let host = build_element(document.as_ref(), element)?;
                    document.set_document_element(host)?;
                    saw_element = true;
                }
                XmlNode::Comment(data) => {
                    document.as_node().append_child(document.create_comment(data))?;
                }
                XmlNode::ProcessingInstruction(pi) => {
                    let host = document.create_processing_instruction(pi.target(), pi.data())?;
                    document.as_node().append_child(host)?;
                }
                XmlNode::Text(_) | XmlNode::Attribute(_) => {
                    return Err(CodecError::Parse(
                        "content not allowed at document level".into(),
                    ));
                }
            }
        }
        if !saw_element {
            return Err(CodecError::Parse("no document element".into()));
        }
        Ok(document)
    }

    fn serialize(&self, node: &Arc<dyn HostNode>) -> Result<String, CodecError> {
        let mut out = String::new();
        write_node(&mut out, node, &Scope::default(), self.pretty_printing(), 0)?;
        Ok(out)
    }

    fn pretty_printing(&self) -> bool {
        self.pretty.load(Ordering::SeqCst)
    }

    fn set_pretty_printing(&self, enabled: bool) {
        self.pretty.store(enabled, Ordering::SeqCst);
    }
}

fn build_element(
    document: &MockDocument,
    element: &XmlElement,
) -> Result<Arc<dyn HostNode>, HostError> {
    let host = document.create_element_ns(element.namespace(), element.local_name())?;
    for attribute in element.attributes() {
        host.set_attribute_ns(attribute.namespace(), attribute.local_name(), attribute.value())?;
    }
    for child in element.children() {
        let converted = match child {
            XmlNode::Element(inner) => build_element(document, inner)?,
            XmlNode::Text(data) => document.create_text_node(data),
            XmlNode::Comment(data) => document.create_comment(data),
            XmlNode::ProcessingInstruction(pi) => {
                document.create_processing_instruction(pi.target(), pi.data())?
            }
            XmlNode::Attribute(_) => {
                return Err(HostError::InvalidHierarchy {
                    parent: HostNodeKind::Element,
                    child: HostNodeKind::Attribute,
                });
            }
        };
        host.append_child(converted)?;
    }
    Ok(host)
}

#[derive(Clone, Default)]
struct Scope {
    default_ns: Option<String>,
    prefixes: Vec<(String, String)>,
}

impl Scope {
    fn prefix_for(&self, uri: &str) -> Option<&str> {
        self.prefixes.iter().find(|(_, bound)| bound == uri).map(|(prefix, _)| prefix.as_str())
    }
}

fn write_node(
    out: &mut String,
    node: &Arc<dyn HostNode>,
    scope: &Scope,
    pretty: bool,
    depth: usize,
) -> Result<(), CodecError> {
    match node.kind() {
        HostNodeKind::Element => write_element(out, node, scope, pretty, depth),
        HostNodeKind::Text => {
            out.push_str(&escape(&node.node_value().unwrap_or_default()));
            Ok(())
        }
        HostNodeKind::Comment => {
            out.push_str("<!--");
            out.push_str(&node.node_value().unwrap_or_default());
            out.push_str("-->");
            Ok(())
        }
        HostNodeKind::ProcessingInstruction => {
            out.push_str("<?");
            out.push_str(&node.local_name().unwrap_or_default());
            let data = node.node_value().unwrap_or_default();
            if !data.is_empty() {
                out.push(' ');
                out.push_str(&data);
            }
            out.push_str("?>");
            Ok(())
        }
        // A detached attribute serializes as its value text.
        HostNodeKind::Attribute => {
            out.push_str(&escape(&node.node_value().unwrap_or_default()));
            Ok(())
        }
        HostNodeKind::Document | HostNodeKind::DocumentFragment => {
            for (index, child) in node.children().iter().enumerate() {
                if pretty && index > 0 {
                    out.push('\n');
                }
                write_node(out, child, scope, pretty, depth)?;
            }
            Ok(())
        }
    }
}

fn write_element(
    out: &mut String,
    element: &Arc<dyn HostNode>,
    scope: &Scope,
    pretty: bool,
    depth: usize,
) -> Result<(), CodecError> {
    let mut scope = scope.clone();
    let local_name = element
        .local_name()
        .ok_or_else(|| CodecError::Serialize("element without a local name".into()))?;

    out.push('<');
    out.push_str(&local_name);

    match (element.namespace_uri(), scope.default_ns.as_deref()) {
        (Some(uri), current) if current != Some(uri.as_str()) => {
            let _ = write!(out, " xmlns=\"{}\"", escape(&uri));
            scope.default_ns = Some(uri);
        }
        (None, Some(_)) => {
            out.push_str(" xmlns=\"\"");
            scope.default_ns = None;
        }
        _ => {}
    }

    for attribute in element.attributes() {
        let name = attribute
            .local_name()
            .ok_or_else(|| CodecError::Serialize("attribute without a local name".into()))?;
        let value = attribute.node_value().unwrap_or_default();
        match attribute.namespace_uri() {
            None => {
                let _ = write!(out, " {}=\"{}\"", name, escape(&value));
            }
            Some(uri) => {
                let prefix = match scope.prefix_for(&uri) {
                    Some(prefix) => prefix.to_owned(),
                    None => {
                        let prefix = format!("ns{}", scope.prefixes.len() + 1);
                        let _ = write!(out, " xmlns:{}=\"{}\"", prefix, escape(&uri));
                        scope.prefixes.push((prefix.clone(), uri));
                        prefix
                    }
                };
                let _ = write!(out, " {}:{}=\"{}\"", prefix, name, escape(&value));
            }
        }
    }

    let children = element.children();
    if children.is_empty() {
        out.push_str("/>");
        return Ok(());
    }

    out.push('>');
    let indented = pretty && children.iter().all(|child| child.kind() != HostNodeKind::Text);
    for child in &children {
        if indented {
            out.push('\n');
            out.push_str(&"  ".repeat(depth + 1));
        }
        write_node(out, child, &scope, pretty, depth + 1)?;
    }
    if indented {
        out.push('\n');
        out.push_str(&"  ".repeat(depth));
    }
    out.push_str("</");
    out.push_str(&local_name);
    out.push('>');
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::{fixture, rstest};

    #[fixture]
    fn codec() -> MockCodec {
        MockCodec::new()
    }

    fn sample_document(codec: &MockCodec) -> Arc<dyn HostDocument> {
        codec.parse(r#"<a x="1"><b/>text</a>"#).unwrap()
    }

    #[rstest]
    fn parse_builds_identity_bearing_tree(codec: MockCodec) {
        let document = sample_document(&codec);
        let root = document.document_element().unwrap();
        assert_eq!(root.kind(), HostNodeKind::Element);
        assert_eq!(root.local_name().as_deref(), Some("a"));
        assert_eq!(root.children().len(), 2);
        assert_eq!(root.attributes().len(), 1);
        assert_eq!(root.document_id(), document.id());
    }

    #[rstest]
    fn serialize_is_canonical_when_plain(codec: MockCodec) {
        let document = sample_document(&codec);
        let root = document.document_element().unwrap();
        assert_eq!(codec.serialize(&root).unwrap(), r#"<a x="1"><b/>text</a>"#);
    }

    #[rstest]
    fn serialize_indents_when_pretty(codec: MockCodec) {
        let document = codec.parse("<a><b/><c/></a>").unwrap();
        let root = document.document_element().unwrap();
        codec.set_pretty_printing(true);
        assert_eq!(codec.serialize(&root).unwrap(), "<a>\n  <b/>\n  <c/>\n</a>");
    }

    #[rstest]
    fn namespaces_survive_a_parse_serialize_cycle(codec: MockCodec) {
        let text = r##"<svg xmlns="http://www.w3.org/2000/svg"><use xmlns:ns1="http://www.w3.org/1999/xlink" ns1:href="#it"/></svg>"##;
        let document = codec.parse(text).unwrap();
        let root = document.document_element().unwrap();
        assert_eq!(codec.serialize(&root).unwrap(), text);
    }

    #[rstest]
    #[case("")]
    #[case("just text")]
    #[case("<a/><b/>")]
    fn parse_requires_exactly_one_document_element(codec: MockCodec, #[case] text: &str) {
        assert!(codec.parse(text).is_err());
    }
}
