//! Deterministic in-memory host implementation for testing and development.
//!
//! Provides a small DOM with document identity tracking, a text codec with a
//! switchable pretty-printing mode and a path evaluator covering the
//! expression subset the integration tests use. Everything here is plain
//! `std` state behind the `domx-core` host traits, so tests get real
//! adoption, hierarchy and formatting behavior without a browser or native
//! XML library.

pub mod codec;
pub mod dom;
pub mod evaluator;

pub use codec::MockCodec;
pub use dom::{MockDocument, MockDocumentFactory, MockNode};
pub use evaluator::MockEvaluator;
