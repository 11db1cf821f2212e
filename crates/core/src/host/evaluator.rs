use std::fmt;
use std::sync::Arc;

use thiserror::Error;

use super::document::HostDocument;
use super::error::HostError;
use super::node::HostNode;

/// Result of a delegated path-expression evaluation: matching nodes in strict
/// document order, or a typed scalar passed through unmodified.
#[derive(Clone)]
pub enum QueryResult {
    Nodes(Vec<Arc<dyn HostNode>>),
    Number(f64),
    String(String),
    Boolean(bool),
}

impl fmt::Debug for QueryResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            QueryResult::Nodes(nodes) => f.debug_tuple("Nodes").field(&nodes.len()).finish(),
            QueryResult::Number(n) => f.debug_tuple("Number").field(n).finish(),
            QueryResult::String(s) => f.debug_tuple("String").field(s).finish(),
            QueryResult::Boolean(b) => f.debug_tuple("Boolean").field(b).finish(),
        }
    }
}

/// Prefix-to-URI lookup handed to the evaluator; the query bridge binds one
/// to the root element of the evaluation document.
pub trait NamespaceResolver {
    /// `None` asks for the default namespace.
    fn lookup_namespace_uri(&self, prefix: Option<&str>) -> Option<String>;
}

/// The external path-expression evaluator.
///
/// Implementations evaluate `expression` with `context` as the context node
/// inside `document`, resolving prefixes through `resolver`, and yield node
/// results in document order. Malformed expressions are reported as
/// [`EvaluateError::InvalidExpression`] and propagate to the caller
/// unmodified.
pub trait PathEvaluator: Send + Sync {
    fn evaluate_ordered(
        &self,
        expression: &str,
        document: &Arc<dyn HostDocument>,
        context: &Arc<dyn HostNode>,
        resolver: &dyn NamespaceResolver,
    ) -> Result<QueryResult, EvaluateError>;
}

#[derive(Debug, Error)]
pub enum EvaluateError {
    #[error("invalid path expression `{expression}`: {message}")]
    InvalidExpression { expression: String, message: String },
    #[error(transparent)]
    Host(#[from] HostError),
}
