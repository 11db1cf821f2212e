use domx_core::{CodecError, EvaluateError, HostError, ParseError, XmlNodeKind};
use thiserror::Error;

/// Faults crossing the conversion boundary.
///
/// Evaluator and codec faults propagate unmodified; the bridge adds no
/// wrapping or translation of its collaborators' errors.
#[derive(Debug, Error)]
pub enum BridgeError {
    #[error(transparent)]
    Host(#[from] HostError),
    #[error(transparent)]
    Codec(#[from] CodecError),
    #[error(transparent)]
    Evaluate(#[from] EvaluateError),
    #[error("serialized host node failed to reparse: {0}")]
    Reparse(#[from] ParseError),
    #[error("query context must be a single element node, got {0:?}")]
    ContextNotElement(XmlNodeKind),
    #[error("{0:?} nodes have no leaf host mapping")]
    NotALeaf(XmlNodeKind),
}
