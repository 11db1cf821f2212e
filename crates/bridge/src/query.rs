//! Path-query bridge.
//!
//! Expressions are never evaluated here. A single-element context is rebuilt
//! as the document element of a fresh host document and handed to the
//! external [`PathEvaluator`](domx_core::PathEvaluator) together with a
//! namespace resolver bound to that root element. Node results come back
//! through the serialize-then-reparse decode path; scalar results pass
//! through unmodified.

use std::sync::Arc;

use domx_core::{
    FormatGuard, NamespaceResolver, QueryResult, XmlElement, XmlNode, XmlValue, ns,
};
use tracing::trace;

use crate::context::BridgeContext;
use crate::convert::element_to_host;
use crate::decode::host_to_xml;
use crate::error::BridgeError;

/// Result of a path query over an XML value.
#[derive(Clone, Debug, PartialEq)]
pub enum QueryOutcome {
    Xml(XmlValue),
    Number(f64),
    String(String),
    Boolean(bool),
}

impl QueryOutcome {
    /// The outcome as sequence members: XML results keep their nodes, scalar
    /// results coerce to a text node carrying the scalar's textual form.
    /// Used when per-member results of a sequence evaluation are flattened
    /// into one combined sequence.
    fn into_members(self) -> XmlValue {
        match self {
            QueryOutcome::Xml(value) => value,
            QueryOutcome::Number(n) => XmlValue::Single(XmlNode::Text(format_number(n))),
            QueryOutcome::String(s) => XmlValue::Single(XmlNode::Text(s)),
            QueryOutcome::Boolean(b) => XmlValue::Single(XmlNode::Text(b.to_string())),
        }
    }
}

/// Evaluates `expression` against `value`.
///
/// A value of length one evaluates directly; its node must be an element. Any
/// other length evaluates member-wise in order and flattens the per-member
/// results into one XML sequence, so the empty value evaluates to the empty
/// sequence. Evaluator faults propagate unmodified.
pub fn evaluate(
    context: &BridgeContext,
    value: &XmlValue,
    expression: &str,
) -> Result<QueryOutcome, BridgeError> {
    match value.as_single() {
        Some(node) => evaluate_single(context, node, expression),
        None => {
            let mut combined = XmlValue::empty();
            for node in value.iter() {
                let outcome = evaluate_single(context, node, expression)?;
                combined = combined.concat(outcome.into_members());
            }
            Ok(QueryOutcome::Xml(combined))
        }
    }
}

fn evaluate_single(
    context: &BridgeContext,
    node: &XmlNode,
    expression: &str,
) -> Result<QueryOutcome, BridgeError> {
    let XmlNode::Element(element) = node else {
        return Err(BridgeError::ContextNotElement(node.kind()));
    };

    // Canonical text through the whole evaluation, restored on every exit
    // path including evaluator faults.
    let _plain = FormatGuard::plain(context.codec());

    // A fresh single-rooted document: expressions never run against shared
    // document state, and the context node is legitimately its root.
    let scratch = context.factory().new_document()?;
    let root = element_to_host(&context.with_document(Arc::clone(&scratch)), element)?;
    scratch.set_document_element(Arc::clone(&root))?;

    let resolver = RootResolver::for_root(context, element);
    trace!(expression, "delegating path evaluation to the host");
    let result = context.evaluator().evaluate_ordered(expression, &scratch, &root, &resolver)?;

    match result {
        QueryResult::Nodes(nodes) => {
            let mut out = XmlValue::empty();
            // Strictly in yield order, which the evaluator contract makes
            // document order.
            for node in nodes {
                out = out.concat(host_to_xml(context, &node)?);
            }
            Ok(QueryOutcome::Xml(out))
        }
        QueryResult::Number(n) => Ok(QueryOutcome::Number(n)),
        QueryResult::String(s) => Ok(QueryOutcome::String(s)),
        QueryResult::Boolean(b) => Ok(QueryOutcome::Boolean(b)),
    }
}

/// Namespace resolver bound to the evaluation document's root element: the
/// default namespace is the root's effective namespace, prefixes resolve
/// through the well-known table.
struct RootResolver {
    default_namespace: Option<String>,
}

impl RootResolver {
    fn for_root(context: &BridgeContext, root: &XmlElement) -> Self {
        Self {
            default_namespace: context.element_namespace(root.namespace()).map(str::to_owned),
        }
    }
}

impl NamespaceResolver for RootResolver {
    fn lookup_namespace_uri(&self, prefix: Option<&str>) -> Option<String> {
        match prefix {
            None => self.default_namespace.clone(),
            Some(prefix) => ns::resolve(prefix).map(str::to_owned),
        }
    }
}

fn format_number(value: f64) -> String {
    let s = format!("{value}");
    if s.contains('.') { s.trim_end_matches('0').trim_end_matches('.').to_string() } else { s }
}
