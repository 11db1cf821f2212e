use super::text;

/// Kind tag of an [`XmlNode`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum XmlNodeKind {
    Element,
    Text,
    Comment,
    ProcessingInstruction,
    Attribute,
}

/// A namespaced attribute with a string value.
///
/// Attributes never own children; they exist as members of an element's
/// attribute set or as detached values produced by a query.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct XmlAttribute {
    namespace: Option<String>,
    local_name: String,
    value: String,
}

impl XmlAttribute {
    pub fn new(
        namespace: Option<&str>,
        local_name: impl Into<String>,
        value: impl Into<String>,
    ) -> Self {
        Self {
            namespace: namespace.map(str::to_owned),
            local_name: local_name.into(),
            value: value.into(),
        }
    }

    pub fn namespace(&self) -> Option<&str> {
        self.namespace.as_deref()
    }

    pub fn local_name(&self) -> &str {
        &self.local_name
    }

    pub fn value(&self) -> &str {
        &self.value
    }

    /// Two attributes share a slot in an element's attribute set when their
    /// qualified names match.
    pub fn same_qualified_name(&self, other: &XmlAttribute) -> bool {
        self.namespace == other.namespace && self.local_name == other.local_name
    }
}

/// A processing instruction: target local name plus data payload.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct XmlPi {
    target: String,
    data: String,
}

impl XmlPi {
    pub fn new(target: impl Into<String>, data: impl Into<String>) -> Self {
        Self { target: target.into(), data: data.into() }
    }

    pub fn target(&self) -> &str {
        &self.target
    }

    pub fn data(&self) -> &str {
        &self.data
    }
}

/// An element: optional namespace URI, local name, ordered attribute set
/// (unique by qualified name) and ordered children.
#[derive(Clone, Debug, PartialEq)]
pub struct XmlElement {
    namespace: Option<String>,
    local_name: String,
    attributes: Vec<XmlAttribute>,
    children: Vec<XmlNode>,
}

impl XmlElement {
    pub fn builder(local_name: impl Into<String>) -> XmlElementBuilder {
        XmlElementBuilder::new(local_name.into())
    }

    pub fn namespace(&self) -> Option<&str> {
        self.namespace.as_deref()
    }

    pub fn local_name(&self) -> &str {
        &self.local_name
    }

    pub fn attributes(&self) -> &[XmlAttribute] {
        &self.attributes
    }

    pub fn children(&self) -> &[XmlNode] {
        &self.children
    }

    pub fn attribute(&self, namespace: Option<&str>, local_name: &str) -> Option<&XmlAttribute> {
        self.attributes
            .iter()
            .find(|attr| attr.namespace() == namespace && attr.local_name() == local_name)
    }
}

/// Builder for [`XmlElement`]; attribute insertion keeps first-write order and
/// replaces the value when the qualified name is already present.
pub struct XmlElementBuilder {
    namespace: Option<String>,
    local_name: String,
    attributes: Vec<XmlAttribute>,
    children: Vec<XmlNode>,
}

impl XmlElementBuilder {
    fn new(local_name: String) -> Self {
        Self { namespace: None, local_name, attributes: Vec::new(), children: Vec::new() }
    }

    pub fn namespace(mut self, uri: impl Into<String>) -> Self {
        self.namespace = Some(uri.into());
        self
    }

    pub fn attribute(
        mut self,
        namespace: Option<&str>,
        local_name: &str,
        value: impl Into<String>,
    ) -> Self {
        let attr = XmlAttribute::new(namespace, local_name, value);
        match self.attributes.iter_mut().find(|existing| existing.same_qualified_name(&attr)) {
            Some(existing) => *existing = attr,
            None => self.attributes.push(attr),
        }
        self
    }

    pub fn child(mut self, child: impl Into<XmlNode>) -> Self {
        self.children.push(child.into());
        self
    }

    pub fn children<I>(mut self, children: I) -> Self
    where
        I: IntoIterator<Item = XmlNode>,
    {
        self.children.extend(children);
        self
    }

    pub fn text(self, data: impl Into<String>) -> Self {
        self.child(XmlNode::Text(data.into()))
    }

    pub fn build(self) -> XmlElement {
        let XmlElementBuilder { namespace, local_name, attributes, children } = self;
        XmlElement { namespace, local_name, attributes, children }
    }
}

/// A single node of the XML value model.
#[derive(Clone, Debug, PartialEq)]
pub enum XmlNode {
    Element(XmlElement),
    Text(String),
    Comment(String),
    ProcessingInstruction(XmlPi),
    Attribute(XmlAttribute),
}

impl XmlNode {
    pub fn kind(&self) -> XmlNodeKind {
        match self {
            XmlNode::Element(_) => XmlNodeKind::Element,
            XmlNode::Text(_) => XmlNodeKind::Text,
            XmlNode::Comment(_) => XmlNodeKind::Comment,
            XmlNode::ProcessingInstruction(_) => XmlNodeKind::ProcessingInstruction,
            XmlNode::Attribute(_) => XmlNodeKind::Attribute,
        }
    }

    pub fn namespace(&self) -> Option<&str> {
        match self {
            XmlNode::Element(element) => element.namespace(),
            XmlNode::Attribute(attribute) => attribute.namespace(),
            _ => None,
        }
    }

    /// Local name of elements and attributes, target of processing
    /// instructions; text and comments have none.
    pub fn local_name(&self) -> Option<&str> {
        match self {
            XmlNode::Element(element) => Some(element.local_name()),
            XmlNode::Attribute(attribute) => Some(attribute.local_name()),
            XmlNode::ProcessingInstruction(pi) => Some(pi.target()),
            XmlNode::Text(_) | XmlNode::Comment(_) => None,
        }
    }

    /// The node's string value: the payload for leaves, the concatenated
    /// descendant text for elements.
    pub fn string_value(&self) -> String {
        match self {
            XmlNode::Element(element) => {
                let mut out = String::new();
                collect_text(element, &mut out);
                out
            }
            XmlNode::Text(data) | XmlNode::Comment(data) => data.clone(),
            XmlNode::ProcessingInstruction(pi) => pi.data().to_owned(),
            XmlNode::Attribute(attribute) => attribute.value().to_owned(),
        }
    }

    /// Canonical (non-pretty) textual form, markers included: comments render
    /// as `<!--…-->`, processing instructions as `<?target data?>`.
    pub fn xml_string(&self) -> String {
        text::node_to_string(self)
    }
}

impl From<XmlElement> for XmlNode {
    fn from(element: XmlElement) -> Self {
        XmlNode::Element(element)
    }
}

fn collect_text(element: &XmlElement, out: &mut String) {
    for child in element.children() {
        match child {
            XmlNode::Text(data) => out.push_str(data),
            XmlNode::Element(inner) => collect_text(inner, out),
            _ => {}
        }
    }
}
