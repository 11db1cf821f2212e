//! The immutable, value-semantics XML tree model.

pub mod node;
pub mod parse;
pub mod value;

mod text;

pub use node::{XmlAttribute, XmlElement, XmlElementBuilder, XmlNode, XmlNodeKind, XmlPi};
pub use parse::ParseError;
pub use value::XmlValue;
