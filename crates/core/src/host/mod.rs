//! Contracts for the mutable host tree and its collaborators.

pub mod codec;
pub mod document;
pub mod error;
pub mod evaluator;
pub mod node;

pub use codec::{CodecError, FormatGuard, TextCodec};
pub use document::{DocumentFactory, HostDocument};
pub use error::HostError;
pub use evaluator::{EvaluateError, NamespaceResolver, PathEvaluator, QueryResult};
pub use node::{DocumentId, HostNode, HostNodeKind};
