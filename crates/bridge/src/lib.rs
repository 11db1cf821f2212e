//! Bidirectional bridge between the immutable XML value model of
//! [`domx-core`](domx_core) and a mutable host document tree, plus a path
//! query bridge that delegates expression evaluation to the host.
//!
//! Conversion into the host direction is a structural build from an explicit
//! [`BridgeContext`]; conversion back is serialize-then-reparse through the
//! host codec. Queries rebuild their context element inside a fresh
//! single-rooted document and hand it to the host's path evaluator, decoding
//! node results and passing scalars through unchanged.

pub mod context;
pub mod convert;
pub mod decode;
pub mod error;
pub mod ext;
pub mod query;

pub use context::BridgeContext;
pub use convert::{element_to_host, leaf_to_host, to_host_node, to_host_node_list};
pub use decode::{host_list_to_xml, host_to_xml};
pub use error::BridgeError;
pub use ext::{HostNodeExt, HostNodeListExt, XmlValueExt};
pub use query::{QueryOutcome, evaluate};
