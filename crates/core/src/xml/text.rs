//! Canonical textual rendering of the XML value model.
//!
//! Output carries no insignificant whitespace, so a render/reparse cycle is
//! structure-preserving. Namespace URIs are emitted as a default `xmlns`
//! declaration on elements and as generated `ns1`, `ns2`, … prefixes on
//! attributes, reusing a prefix already in scope for the same URI.

use std::fmt::Write as _;

use quick_xml::escape::escape;

use super::node::{XmlElement, XmlNode};

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

pub(crate) fn node_to_string(node: &XmlNode) -> String {
    let mut out = String::new();
    write_node(&mut out, node, &Scope::default());
    out
}

fn write_node(out: &mut String, node: &XmlNode, scope: &Scope) {
    match node {
        XmlNode::Element(element) => write_element(out, element, scope),
        XmlNode::Text(data) => out.push_str(&escape(data)),
        XmlNode::Comment(data) => {
            out.push_str("<!--");
            out.push_str(data);
            out.push_str("-->");
        }
        XmlNode::ProcessingInstruction(pi) => {
            out.push_str("<?");
            out.push_str(pi.target());
            if !pi.data().is_empty() {
                out.push(' ');
                out.push_str(pi.data());
            }
            out.push_str("?>");
        }
        // A detached attribute renders as its value text.
        XmlNode::Attribute(attribute) => out.push_str(&escape(attribute.value())),
    }
}

fn write_element(out: &mut String, element: &XmlElement, scope: &Scope) {
    let mut scope = scope.clone();
    out.push('<');
    out.push_str(element.local_name());

    match (element.namespace(), scope.default_ns.as_deref()) {
        (Some(uri), current) if current != Some(uri) => {
            let _ = write!(out, " xmlns=\"{}\"", escape(uri));
            scope.default_ns = Some(uri.to_owned());
        }
        (None, Some(_)) => {
            out.push_str(" xmlns=\"\"");
            scope.default_ns = None;
        }
        _ => {}
    }

    for attribute in element.attributes() {
        match attribute.namespace() {
            None => {
                let _ =
                    write!(out, " {}=\"{}\"", attribute.local_name(), escape(attribute.value()));
            }
            Some(uri) => {
                let prefix = match scope.prefix_for(uri) {
                    Some(prefix) => prefix.to_owned(),
                    None => {
                        let prefix = format!("ns{}", scope.prefixes.len() + 1);
                        let _ = write!(out, " xmlns:{}=\"{}\"", prefix, escape(uri));
                        scope.prefixes.push((prefix.clone(), uri.to_owned()));
                        prefix
                    }
                };
                let _ = write!(
                    out,
                    " {}:{}=\"{}\"",
                    prefix,
                    attribute.local_name(),
                    escape(attribute.value())
                );
            }
        }
    }

    if element.children().is_empty() {
        out.push_str("/>");
        return;
    }

    out.push('>');
    for child in element.children() {
        write_node(out, child, &scope);
    }
    out.push_str("</");
    out.push_str(element.local_name());
    out.push('>');
}
