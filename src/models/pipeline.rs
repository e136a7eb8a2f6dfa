//! The opaque scoring capability.

use thiserror::Error;

use crate::domain::FeatureVector;

/// Failure raised while scoring a record.
///
/// Only the message is carried; the service decides how to surface it.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{0}")]
pub struct PipelineError(pub String);

impl PipelineError {
    pub fn new(message: impl Into<String>) -> Self {
        Self(message.into())
    }
}

/// A trained binary classifier, including its own preprocessing.
///
/// Implementations are immutable after construction and shared across request
/// handlers, hence `Send + Sync`.
pub trait Pipeline: Send + Sync {
    /// Predicted class (`0` or `1`).
    fn predict(&self, row: &FeatureVector) -> Result<u8, PipelineError>;

    /// `[p(class = 0), p(class = 1)]`.
    fn predict_probability(&self, row: &FeatureVector) -> Result<[f64; 2], PipelineError>;
}
