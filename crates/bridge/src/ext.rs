//! Extension traits binding the conversion and query operations onto the XML
//! value and host node types. Bound once at compile time; callers depend on
//! the trait, not on any runtime capability check.

use std::sync::Arc;

use domx_core::{HostNode, XmlValue};

use crate::context::BridgeContext;
use crate::convert::{to_host_node, to_host_node_list};
use crate::decode::{host_list_to_xml, host_to_xml};
use crate::error::BridgeError;
use crate::query::{QueryOutcome, evaluate};

/// Host-side operations of an XML value.
pub trait XmlValueExt {
    /// Singleton host-node conversion; `None` unless the value's length is
    /// exactly one.
    fn dom_node(&self, context: &BridgeContext)
    -> Result<Option<Arc<dyn HostNode>>, BridgeError>;

    /// Sequence host-node conversion; succeeds for any cardinality.
    fn dom_node_list(&self, context: &BridgeContext)
    -> Result<Vec<Arc<dyn HostNode>>, BridgeError>;

    /// Evaluates a path expression against this value.
    fn xpath(
        &self,
        context: &BridgeContext,
        expression: &str,
    ) -> Result<QueryOutcome, BridgeError>;
}

impl XmlValueExt for XmlValue {
    fn dom_node(
        &self,
        context: &BridgeContext,
    ) -> Result<Option<Arc<dyn HostNode>>, BridgeError> {
        to_host_node(context, self)
    }

    fn dom_node_list(
        &self,
        context: &BridgeContext,
    ) -> Result<Vec<Arc<dyn HostNode>>, BridgeError> {
        to_host_node_list(context, self)
    }

    fn xpath(
        &self,
        context: &BridgeContext,
        expression: &str,
    ) -> Result<QueryOutcome, BridgeError> {
        evaluate(context, self, expression)
    }
}

/// XML-side view of a single host node.
pub trait HostNodeExt {
    fn to_xml(&self, context: &BridgeContext) -> Result<XmlValue, BridgeError>;
}

impl HostNodeExt for Arc<dyn HostNode> {
    fn to_xml(&self, context: &BridgeContext) -> Result<XmlValue, BridgeError> {
        host_to_xml(context, self)
    }
}

/// XML-side view of an ordered host node collection.
pub trait HostNodeListExt {
    fn to_xml(&self, context: &BridgeContext) -> Result<XmlValue, BridgeError>;
}

impl HostNodeListExt for [Arc<dyn HostNode>] {
    fn to_xml(&self, context: &BridgeContext) -> Result<XmlValue, BridgeError> {
        host_list_to_xml(context, self)
    }
}
