//! Request-level failures of `/predict` and how they map to HTTP.

use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};
use serde::Serialize;
use thiserror::Error;

use crate::models::PipelineError;

/// Pipeline messages containing one of these are the caller's fault.
pub const CLIENT_ERROR_MARKERS: [&str; 2] = ["Missing required feature", "could not convert"];

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PredictError {
    #[error("Missing required feature: {0}")]
    MissingFeature(String),

    #[error("could not convert {found} to {expected} for '{field}'")]
    TypeConversion {
        field: String,
        expected: &'static str,
        found: String,
    },

    #[error("Unexpected feature: {0}")]
    UnexpectedFeature(String),

    #[error("Invalid JSON body: {0}")]
    InvalidBody(String),

    /// A pipeline failure whose message reads as an input problem.
    #[error("{0}")]
    Rejected(String),

    #[error("Inference error: {0}")]
    Inference(String),
}

impl PredictError {
    /// Classify a free-form failure message by its text.
    pub fn classify(message: String) -> Self {
        if CLIENT_ERROR_MARKERS.iter().any(|m| message.contains(m)) {
            Self::Rejected(message)
        } else {
            Self::Inference(message)
        }
    }
}

impl From<PipelineError> for PredictError {
    fn from(err: PipelineError) -> Self {
        Self::classify(err.0)
    }
}

#[derive(Debug, Serialize)]
struct ErrorBody {
    detail: String,
}

impl ResponseError for PredictError {
    fn status_code(&self) -> StatusCode {
        match self {
            Self::Inference(_) => StatusCode::INTERNAL_SERVER_ERROR,
            _ => StatusCode::BAD_REQUEST,
        }
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code()).json(ErrorBody {
            detail: self.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn markers_select_client_errors() {
        let e = PredictError::classify("Missing required feature: age".to_string());
        assert_eq!(e.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(e.to_string(), "Missing required feature: age");

        let e = PredictError::from(PipelineError::new("could not convert string to float: 'x'"));
        assert_eq!(e.status_code(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn other_messages_are_wrapped_as_server_errors() {
        let e = PredictError::from(PipelineError::new("matrix is singular"));
        assert_eq!(e.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(e.to_string(), "Inference error: matrix is singular");
    }

    #[test]
    fn validation_errors_reuse_the_marker_text() {
        let missing = PredictError::MissingFeature("loan_to_income".to_string());
        let conversion = PredictError::TypeConversion {
            field: "age".to_string(),
            expected: "float",
            found: "string 'abc'".to_string(),
        };
        for e in [missing, conversion] {
            let text = e.to_string();
            assert!(CLIENT_ERROR_MARKERS.iter().any(|m| text.contains(m)), "{text}");
            assert_eq!(PredictError::classify(text).status_code(), StatusCode::BAD_REQUEST);
        }
    }
}
