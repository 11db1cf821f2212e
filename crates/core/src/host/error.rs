use thiserror::Error;

use super::node::{DocumentId, HostNodeKind};

/// Structural faults raised by a host document implementation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum HostError {
    #[error("node owned by document {found:?} cannot attach under document {expected:?} without adoption")]
    WrongDocument { expected: DocumentId, found: DocumentId },
    #[error("{parent:?} node cannot contain {child:?} children")]
    InvalidHierarchy { parent: HostNodeKind, child: HostNodeKind },
    #[error("operation not supported on {0:?} nodes")]
    UnsupportedOperation(HostNodeKind),
    #[error("invalid {what} name `{name}`")]
    InvalidName { what: &'static str, name: String },
    #[error("document already has a document element")]
    DocumentElementTaken,
    #[error("node handle does not belong to this host implementation")]
    ForeignNode,
}
