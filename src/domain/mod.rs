//! Domain types shared by the scoring service and the form.
//!
//! This module defines:
//!
//! - the fixed 13-field borrower record (`FeatureVector`, `FEATURES`)
//! - the prediction response (`PredictionResult`)
//! - the form's category selectors (`ResidenceType`, `LoanPurpose`, `LoanType`)

pub mod types;

pub use types::*;
