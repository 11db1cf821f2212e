//! Textual construction of the XML value model, built on quick-xml.
//!
//! Parses *fragments*: zero or more top-level nodes. Namespace prefixes are
//! resolved against the declaration scopes seen so far; unprefixed attributes
//! stay in no namespace (the default declaration applies to elements only).

use quick_xml::Reader;
use quick_xml::events::{BytesStart, Event};
use thiserror::Error;

use super::node::{XmlAttribute, XmlNode, XmlPi};
use super::value::XmlValue;

const XML_NS: &str = "http://www.w3.org/XML/1998/namespace";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error("malformed XML at byte {position}: {message}")]
    Malformed { position: usize, message: String },
    #[error("undeclared namespace prefix `{0}`")]
    UnknownPrefix(String),
}

/// One `(prefix, uri)` declaration; `prefix` of `None` is the default
/// namespace, `uri` of `None` un-declares it (`xmlns=""`).
type Declaration = (Option<String>, Option<String>);

struct PendingElement {
    namespace: Option<String>,
    local_name: String,
    attributes: Vec<XmlAttribute>,
    children: Vec<XmlNode>,
}

impl PendingElement {
    fn close(self) -> XmlNode {
        let mut builder = super::node::XmlElement::builder(self.local_name);
        if let Some(uri) = self.namespace {
            builder = builder.namespace(uri);
        }
        for attr in &self.attributes {
            builder = builder.attribute(attr.namespace(), attr.local_name(), attr.value());
        }
        XmlNode::Element(builder.children(self.children).build())
    }
}

pub(crate) fn parse_fragment(text: &str) -> Result<XmlValue, ParseError> {
    let mut reader = Reader::from_str(text);
    let mut scopes: Vec<Vec<Declaration>> = Vec::new();
    let mut stack: Vec<PendingElement> = Vec::new();
    let mut top: Vec<XmlNode> = Vec::new();

    loop {
        let event = reader.read_event().map_err(|err| malformed(&reader, err))?;
        match event {
            Event::Start(start) => {
                scopes.push(declarations_of(&reader, &start)?);
                let pending = open_element(&reader, &start, &scopes)?;
                stack.push(pending);
            }
            Event::Empty(start) => {
                scopes.push(declarations_of(&reader, &start)?);
                let pending = open_element(&reader, &start, &scopes)?;
                scopes.pop();
                attach(&mut stack, &mut top, pending.close());
            }
            Event::End(_) => {
                scopes.pop();
                match stack.pop() {
                    Some(pending) => attach(&mut stack, &mut top, pending.close()),
                    None => {
                        return Err(ParseError::Malformed {
                            position: reader.buffer_position(),
                            message: "unexpected closing tag".into(),
                        });
                    }
                }
            }
            Event::Text(data) => {
                let content = data.unescape().map_err(|err| malformed(&reader, err))?;
                // Whitespace-only text carries no value-model content.
                if !content.trim().is_empty() {
                    attach(&mut stack, &mut top, XmlNode::Text(content.into_owned()));
                }
            }
            Event::CData(data) => {
                let content = String::from_utf8_lossy(data.as_ref()).into_owned();
                attach(&mut stack, &mut top, XmlNode::Text(content));
            }
            Event::Comment(data) => {
                let content = String::from_utf8_lossy(data.as_ref()).into_owned();
                attach(&mut stack, &mut top, XmlNode::Comment(content));
            }
            Event::PI(data) => {
                let raw = String::from_utf8_lossy(data.as_ref()).into_owned();
                let (target, rest) = match raw.split_once(char::is_whitespace) {
                    Some((target, rest)) => (target.to_owned(), rest.trim_start().to_owned()),
                    None => (raw, String::new()),
                };
                attach(&mut stack, &mut top, XmlNode::ProcessingInstruction(XmlPi::new(target, rest)));
            }
            Event::Decl(_) | Event::DocType(_) => {}
            Event::Eof => break,
        }
    }

    if !stack.is_empty() {
        return Err(ParseError::Malformed {
            position: reader.buffer_position(),
            message: "unclosed element".into(),
        });
    }

    if top.len() == 1 {
        if let Some(node) = top.pop() {
            return Ok(XmlValue::Single(node));
        }
    }
    Ok(XmlValue::Sequence(top))
}

fn attach(stack: &mut [PendingElement], top: &mut Vec<XmlNode>, node: XmlNode) {
    match stack.last_mut() {
        Some(parent) => parent.children.push(node),
        None => top.push(node),
    }
}

fn declarations_of(
    reader: &Reader<&[u8]>,
    start: &BytesStart<'_>,
) -> Result<Vec<Declaration>, ParseError> {
    let mut declarations = Vec::new();
    for attr in start.attributes() {
        let attr = attr.map_err(|err| malformed(reader, err))?;
        let key = attr.key.as_ref();
        let prefix = if key == b"xmlns" {
            None
        } else if let Some(prefix) = key.strip_prefix(b"xmlns:") {
            Some(String::from_utf8_lossy(prefix).into_owned())
        } else {
            continue;
        };
        let uri = attr.unescape_value().map_err(|err| malformed(reader, err))?.into_owned();
        declarations.push((prefix, (!uri.is_empty()).then_some(uri)));
    }
    Ok(declarations)
}

fn open_element(
    reader: &Reader<&[u8]>,
    start: &BytesStart<'_>,
    scopes: &[Vec<Declaration>],
) -> Result<PendingElement, ParseError> {
    let qname = String::from_utf8_lossy(start.name().as_ref()).into_owned();
    let (prefix, local_name) = split_qname(&qname);
    let namespace = resolve_prefix(scopes, prefix)?;

    let mut attributes: Vec<XmlAttribute> = Vec::new();
    for attr in start.attributes() {
        let attr = attr.map_err(|err| malformed(reader, err))?;
        let key = attr.key.as_ref();
        if key == b"xmlns" || key.starts_with(b"xmlns:") {
            continue;
        }
        let key_str = String::from_utf8_lossy(key).into_owned();
        let (attr_prefix, attr_local) = split_qname(&key_str);
        let attr_namespace = match attr_prefix {
            None => None,
            prefix => resolve_prefix(scopes, prefix)?,
        };
        let value = attr.unescape_value().map_err(|err| malformed(reader, err))?.into_owned();
        attributes.push(XmlAttribute::new(attr_namespace.as_deref(), attr_local, value));
    }

    Ok(PendingElement {
        namespace,
        local_name: local_name.to_owned(),
        attributes,
        children: Vec::new(),
    })
}

fn resolve_prefix(
    scopes: &[Vec<Declaration>],
    prefix: Option<&str>,
) -> Result<Option<String>, ParseError> {
    if prefix == Some("xml") {
        return Ok(Some(XML_NS.to_owned()));
    }
    for frame in scopes.iter().rev() {
        for (declared, uri) in frame.iter().rev() {
            if declared.as_deref() == prefix {
                return Ok(uri.clone());
            }
        }
    }
    match prefix {
        None => Ok(None),
        Some(p) => Err(ParseError::UnknownPrefix(p.to_owned())),
    }
}

fn split_qname(qname: &str) -> (Option<&str>, &str) {
    match qname.split_once(':') {
        Some((prefix, local)) => (Some(prefix), local),
        None => (None, qname),
    }
}

fn malformed(reader: &Reader<&[u8]>, err: impl std::fmt::Display) -> ParseError {
    ParseError::Malformed { position: reader.buffer_position(), message: err.to_string() }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::xml::node::XmlNodeKind;
    use rstest::rstest;

    #[rstest]
    fn parses_element_with_attributes_and_mixed_children() {
        let value = XmlValue::parse(r#"<a x="1"><b/>text</a>"#).unwrap();
        let XmlValue::Single(XmlNode::Element(element)) = value else {
            panic!("expected a single element");
        };
        assert_eq!(element.local_name(), "a");
        assert_eq!(element.attributes().len(), 1);
        assert_eq!(element.attribute(None, "x").map(XmlAttribute::value), Some("1"));
        assert_eq!(element.children().len(), 2);
        assert_eq!(element.children()[0].local_name(), Some("b"));
        assert_eq!(element.children()[1], XmlNode::Text("text".into()));
    }

    #[rstest]
    fn resolves_default_and_prefixed_namespaces() {
        let value = XmlValue::parse(
            r##"<svg xmlns="http://www.w3.org/2000/svg" xmlns:xlink="http://www.w3.org/1999/xlink"><use xlink:href="#it"/></svg>"##,
        )
        .unwrap();
        let XmlValue::Single(XmlNode::Element(svg)) = value else {
            panic!("expected a single element");
        };
        assert_eq!(svg.namespace(), Some(crate::ns::SVG));
        let XmlNode::Element(use_el) = &svg.children()[0] else {
            panic!("expected element child");
        };
        assert_eq!(use_el.namespace(), Some(crate::ns::SVG));
        let href = use_el.attribute(Some(crate::ns::XLINK), "href").unwrap();
        assert_eq!(href.value(), "#it");
    }

    #[rstest]
    fn unprefixed_attributes_ignore_the_default_namespace() {
        let value =
            XmlValue::parse(r#"<a xmlns="http://www.w3.org/1999/xhtml" x="1"/>"#).unwrap();
        let XmlValue::Single(XmlNode::Element(element)) = value else {
            panic!("expected a single element");
        };
        assert!(element.attribute(None, "x").is_some());
        assert!(element.attribute(Some(crate::ns::XHTML), "x").is_none());
    }

    #[rstest]
    fn parses_comment_and_processing_instruction() {
        let value = XmlValue::parse("<a><!--hi--><?robot do this?></a>").unwrap();
        let XmlValue::Single(XmlNode::Element(element)) = value else {
            panic!("expected a single element");
        };
        assert_eq!(element.children()[0], XmlNode::Comment("hi".into()));
        assert_eq!(
            element.children()[1],
            XmlNode::ProcessingInstruction(XmlPi::new("robot", "do this"))
        );
    }

    #[rstest]
    fn fragment_with_multiple_top_level_nodes_parses_to_sequence() {
        let value = XmlValue::parse("<a/><b/>").unwrap();
        assert_eq!(value.len(), 2);
        assert!(matches!(value, XmlValue::Sequence(_)));
    }

    #[rstest]
    fn empty_input_parses_to_empty_sequence() {
        let value = XmlValue::parse("").unwrap();
        assert!(value.is_empty());
    }

    #[rstest]
    fn whitespace_between_nodes_is_dropped() {
        let value = XmlValue::parse("<a>\n  <b/>\n</a>").unwrap();
        let XmlValue::Single(XmlNode::Element(element)) = value else {
            panic!("expected a single element");
        };
        assert_eq!(element.children().len(), 1);
        assert_eq!(element.children()[0].kind(), XmlNodeKind::Element);
    }

    #[rstest]
    fn entities_are_unescaped_in_text_and_attributes() {
        let value = XmlValue::parse(r#"<a x="a&lt;b">1 &amp; 2</a>"#).unwrap();
        let XmlValue::Single(XmlNode::Element(element)) = value else {
            panic!("expected a single element");
        };
        assert_eq!(element.attribute(None, "x").map(XmlAttribute::value), Some("a<b"));
        assert_eq!(element.children()[0], XmlNode::Text("1 & 2".into()));
    }

    #[rstest]
    #[case("<a><b></a>")]
    #[case("<a>")]
    #[case("</a>")]
    fn malformed_input_is_rejected(#[case] text: &str) {
        assert!(XmlValue::parse(text).is_err());
    }

    #[rstest]
    fn undeclared_prefix_is_rejected() {
        let err = XmlValue::parse("<x:a/>").unwrap_err();
        assert_eq!(err, ParseError::UnknownPrefix("x".into()));
    }

    #[rstest]
    fn render_then_reparse_is_structure_preserving() {
        let value = XmlValue::parse(
            r#"<a xmlns="http://www.w3.org/2000/svg" x="1"><b y="2">text</b><!--note--></a>"#,
        )
        .unwrap();
        let reparsed = XmlValue::parse(&value.xml_string()).unwrap();
        assert_eq!(reparsed, value);
    }
}
