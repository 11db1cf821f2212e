//! Core data model and collaborator contracts for the domx bridge.
//!
//! The crate defines two tree representations and the seams between them:
//!
//! * the immutable, value-semantics XML model ([`XmlNode`], [`XmlValue`]),
//!   produced by parsing or by query results and never mutated once observed;
//! * the mutable, identity-bearing host tree behind the [`HostNode`] /
//!   [`HostDocument`] traits, where every node belongs to exactly one owning
//!   document and must be adopted before crossing document boundaries.
//!
//! Text codecs and path evaluators are injected through the [`TextCodec`] and
//! [`PathEvaluator`] traits; nothing in this crate probes for capabilities at
//! runtime.

pub mod host;
pub mod ns;
pub mod xml;

pub use host::{
    CodecError, DocumentFactory, DocumentId, EvaluateError, FormatGuard, HostDocument, HostError,
    HostNode, HostNodeKind, NamespaceResolver, PathEvaluator, QueryResult, TextCodec,
};
pub use xml::{
    ParseError, XmlAttribute, XmlElement, XmlElementBuilder, XmlNode, XmlNodeKind, XmlPi, XmlValue,
};
