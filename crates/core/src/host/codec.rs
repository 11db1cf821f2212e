use std::sync::Arc;

use thiserror::Error;

use super::document::HostDocument;
use super::error::HostError;
use super::node::HostNode;

/// The host text codec: parser (text to host document) and serializer (host
/// node to text), plus the codec-wide pretty-printing mode.
pub trait TextCodec: Send + Sync {
    fn parse(&self, text: &str) -> Result<Arc<dyn HostDocument>, CodecError>;

    fn serialize(&self, node: &Arc<dyn HostNode>) -> Result<String, CodecError>;

    fn pretty_printing(&self) -> bool;

    fn set_pretty_printing(&self, enabled: bool);
}

#[derive(Debug, Error)]
pub enum CodecError {
    #[error("XML parse failed: {0}")]
    Parse(String),
    #[error("serialization failed: {0}")]
    Serialize(String),
    #[error(transparent)]
    Host(#[from] HostError),
}

/// Forces pretty-printing off for its lifetime and restores the prior mode on
/// drop, on every exit path including unwinding faults.
///
/// Round-tripped text must be canonical: nested conversions would otherwise
/// observe or clobber each other's formatting mode.
pub struct FormatGuard<'a> {
    codec: &'a dyn TextCodec,
    saved: bool,
}

impl<'a> FormatGuard<'a> {
    pub fn plain(codec: &'a dyn TextCodec) -> Self {
        let saved = codec.pretty_printing();
        codec.set_pretty_printing(false);
        Self { codec, saved }
    }
}

impl Drop for FormatGuard<'_> {
    fn drop(&mut self) {
        self.codec.set_pretty_printing(self.saved);
    }
}
