use std::ops::Add;
use std::slice;

use super::node::XmlNode;
use super::parse::{self, ParseError};

/// A value of the XML model: either a single node or an ordered, possibly
/// empty sequence of nodes.
///
/// The two arms are deliberately explicit. Every conversion entry point
/// pattern-matches on the cardinality instead of coercing through an implicit
/// length check; a `Sequence` of length one is still addressable as a single
/// node via [`XmlValue::as_single`].
#[derive(Clone, Debug, PartialEq)]
pub enum XmlValue {
    Single(XmlNode),
    Sequence(Vec<XmlNode>),
}

impl XmlValue {
    /// The empty sequence.
    pub const fn empty() -> Self {
        XmlValue::Sequence(Vec::new())
    }

    /// Parses a textual XML fragment (zero or more top-level nodes).
    ///
    /// A fragment with exactly one top-level node parses to `Single`,
    /// everything else to `Sequence`. Whitespace-only text between nodes is
    /// dropped, matching the model's ignore-whitespace construction rule.
    pub fn parse(text: &str) -> Result<Self, ParseError> {
        parse::parse_fragment(text)
    }

    pub fn len(&self) -> usize {
        match self {
            XmlValue::Single(_) => 1,
            XmlValue::Sequence(nodes) => nodes.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The sole member, when the value has length exactly one.
    pub fn as_single(&self) -> Option<&XmlNode> {
        match self {
            XmlValue::Single(node) => Some(node),
            XmlValue::Sequence(nodes) if nodes.len() == 1 => Some(&nodes[0]),
            XmlValue::Sequence(_) => None,
        }
    }

    /// The members as an ordered slice.
    pub fn nodes(&self) -> &[XmlNode] {
        match self {
            XmlValue::Single(node) => slice::from_ref(node),
            XmlValue::Sequence(nodes) => nodes,
        }
    }

    pub fn iter(&self) -> slice::Iter<'_, XmlNode> {
        self.nodes().iter()
    }

    pub fn into_nodes(self) -> Vec<XmlNode> {
        match self {
            XmlValue::Single(node) => vec![node],
            XmlValue::Sequence(nodes) => nodes,
        }
    }

    /// Order-preserving, flattening concatenation.
    pub fn concat(self, other: XmlValue) -> XmlValue {
        let mut nodes = self.into_nodes();
        nodes.extend(other.into_nodes());
        XmlValue::Sequence(nodes)
    }

    /// Canonical textual form of all members, in order.
    pub fn xml_string(&self) -> String {
        self.iter().map(XmlNode::xml_string).collect()
    }
}

impl Add for XmlValue {
    type Output = XmlValue;

    fn add(self, other: XmlValue) -> XmlValue {
        self.concat(other)
    }
}

impl From<XmlNode> for XmlValue {
    fn from(node: XmlNode) -> Self {
        XmlValue::Single(node)
    }
}

impl From<super::node::XmlElement> for XmlValue {
    fn from(element: super::node::XmlElement) -> Self {
        XmlValue::Single(XmlNode::Element(element))
    }
}

impl FromIterator<XmlNode> for XmlValue {
    fn from_iter<I: IntoIterator<Item = XmlNode>>(iter: I) -> Self {
        XmlValue::Sequence(iter.into_iter().collect())
    }
}

impl IntoIterator for XmlValue {
    type Item = XmlNode;
    type IntoIter = std::vec::IntoIter<XmlNode>;

    fn into_iter(self) -> Self::IntoIter {
        self.into_nodes().into_iter()
    }
}

impl<'a> IntoIterator for &'a XmlValue {
    type Item = &'a XmlNode;
    type IntoIter = slice::Iter<'a, XmlNode>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::xml::node::XmlElement;
    use rstest::rstest;

    fn elem(name: &str) -> XmlNode {
        XmlNode::Element(XmlElement::builder(name).build())
    }

    #[rstest]
    fn single_and_length_one_sequence_agree_on_cardinality() {
        let single = XmlValue::Single(elem("a"));
        let seq = XmlValue::Sequence(vec![elem("a")]);
        assert_eq!(single.len(), 1);
        assert_eq!(seq.len(), 1);
        assert!(single.as_single().is_some());
        assert!(seq.as_single().is_some());
    }

    #[rstest]
    fn as_single_rejects_other_lengths() {
        assert!(XmlValue::empty().as_single().is_none());
        let two = XmlValue::Sequence(vec![elem("a"), elem("b")]);
        assert!(two.as_single().is_none());
    }

    #[rstest]
    fn concat_flattens_and_preserves_order() {
        let left = XmlValue::Single(elem("a"));
        let right = XmlValue::Sequence(vec![elem("b"), elem("c")]);
        let joined = left + right;
        let names: Vec<_> = joined.iter().filter_map(XmlNode::local_name).collect();
        assert_eq!(names, ["a", "b", "c"]);
        assert!(matches!(joined, XmlValue::Sequence(_)));
    }

    #[rstest]
    fn concat_with_empty_is_identity_on_members() {
        let value = XmlValue::Sequence(vec![elem("a")]);
        let joined = value.clone() + XmlValue::empty();
        assert_eq!(joined.nodes(), value.nodes());
    }
}
