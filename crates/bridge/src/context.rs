use std::sync::Arc;

use domx_core::{DocumentFactory, HostDocument, PathEvaluator, TextCodec};

/// The host collaborators every conversion and query call threads through
/// explicitly: the ambient allocation document, a factory for fresh
/// evaluation documents, the text codec and the path evaluator.
///
/// Conversions allocate host nodes from [`BridgeContext::document`]; it is a
/// write-only-by-allocation scratch context, never inspected for prior
/// contents, so reentrant calls sharing one context are safe.
#[derive(Clone)]
pub struct BridgeContext {
    document: Arc<dyn HostDocument>,
    factory: Arc<dyn DocumentFactory>,
    codec: Arc<dyn TextCodec>,
    evaluator: Arc<dyn PathEvaluator>,
    default_namespace: Option<String>,
}

impl BridgeContext {
    pub fn new(
        document: Arc<dyn HostDocument>,
        factory: Arc<dyn DocumentFactory>,
        codec: Arc<dyn TextCodec>,
        evaluator: Arc<dyn PathEvaluator>,
    ) -> Self {
        Self { document, factory, codec, evaluator, default_namespace: None }
    }

    /// Namespace assigned to elements that declare none. Without it such
    /// elements stay in no namespace.
    pub fn with_default_namespace(mut self, uri: impl Into<String>) -> Self {
        self.default_namespace = Some(uri.into());
        self
    }

    pub fn document(&self) -> &Arc<dyn HostDocument> {
        &self.document
    }

    pub fn factory(&self) -> &Arc<dyn DocumentFactory> {
        &self.factory
    }

    pub fn codec(&self) -> &dyn TextCodec {
        self.codec.as_ref()
    }

    pub fn evaluator(&self) -> &dyn PathEvaluator {
        self.evaluator.as_ref()
    }

    pub fn default_namespace(&self) -> Option<&str> {
        self.default_namespace.as_deref()
    }

    /// The same collaborators with a different allocation document; the query
    /// bridge uses this to build context trees inside a fresh document.
    pub fn with_document(&self, document: Arc<dyn HostDocument>) -> Self {
        Self { document, ..self.clone() }
    }

    /// Resolves an element's effective namespace: the declared one when
    /// present, otherwise the configured default. Never invented.
    pub fn element_namespace<'a>(&'a self, declared: Option<&'a str>) -> Option<&'a str> {
        declared.or(self.default_namespace.as_deref())
    }
}
