//! Scoring pipelines.
//!
//! The service only knows the `Pipeline` capability (predict + predict-probability).
//! `LogisticPipeline` is the artifact-backed implementation loaded at startup.

pub mod logistic;
pub mod pipeline;

pub use logistic::*;
pub use pipeline::*;
