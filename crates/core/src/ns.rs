//! Well-known namespace URIs for callers building query expressions or
//! configuring a default element namespace.

pub const XHTML: &str = "http://www.w3.org/1999/xhtml";
pub const MATHML: &str = "http://www.w3.org/1998/Math/MathML";
pub const SVG: &str = "http://www.w3.org/2000/svg";
pub const XLINK: &str = "http://www.w3.org/1999/xlink";
pub const XFORMS: &str = "http://www.w3.org/2002/xforms";
pub const XML_EVENTS: &str = "http://www.w3.org/2001/xml-events";

const WELL_KNOWN: &[(&str, &str)] = &[
    ("xhtml", XHTML),
    ("mathml", MATHML),
    ("svg", SVG),
    ("xlink", XLINK),
    ("xforms", XFORMS),
    ("ev", XML_EVENTS),
];

/// All well-known `(prefix, uri)` pairs in a stable order.
pub fn well_known() -> &'static [(&'static str, &'static str)] {
    WELL_KNOWN
}

/// Resolves a well-known prefix to its namespace URI.
pub fn resolve(prefix: &str) -> Option<&'static str> {
    WELL_KNOWN.iter().find(|(p, _)| *p == prefix).map(|(_, uri)| *uri)
}
