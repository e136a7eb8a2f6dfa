//! Blocking HTTP client the form uses to reach the scoring service.

use reqwest::StatusCode;
use reqwest::blocking::Client;

use crate::domain::{FeatureVector, PredictionResult};

/// Where the scoring service is expected to run.
pub const BASE_URL: &str = "http://127.0.0.1:8000";

/// What the form shows after a submission.
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    Success(PredictionResult),
    /// The service answered with a non-200 status.
    Rejected { status: u16, body: String },
    /// The request never produced a usable answer.
    Failed(String),
}

impl Outcome {
    /// Classify a received response.
    pub fn from_response(status: StatusCode, body: &str) -> Self {
        if status != StatusCode::OK {
            return Outcome::Rejected {
                status: status.as_u16(),
                body: body.to_string(),
            };
        }
        match serde_json::from_str::<PredictionResult>(body) {
            Ok(result) => Outcome::Success(result),
            Err(e) => Outcome::Failed(format!("invalid response body: {e}")),
        }
    }

    /// Lines of text as rendered by the form.
    pub fn lines(&self) -> Vec<String> {
        match self {
            Outcome::Success(r) => vec![
                format!("Predicted Risk Class: {}", r.predicted_class),
                format!("Probability Score: {:.3}", r.probability_score),
            ],
            Outcome::Rejected { status, body } => vec![format!("Error: {status} - {body}")],
            Outcome::Failed(e) => vec![format!("Failed to connect to prediction API: {e}")],
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Outcome::Success(_))
    }
}

pub struct ScoringClient {
    client: Client,
    base_url: String,
}

impl Default for ScoringClient {
    fn default() -> Self {
        Self::new()
    }
}

impl ScoringClient {
    pub fn new() -> Self {
        Self::with_base_url(BASE_URL)
    }

    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// POST one record to `/predict`. Never retries.
    pub fn submit(&self, payload: &FeatureVector) -> Outcome {
        let url = format!("{}/predict", self.base_url);
        let resp = match self.client.post(&url).json(payload).send() {
            Ok(resp) => resp,
            Err(e) => return Outcome::Failed(e.to_string()),
        };

        let status = resp.status();
        match resp.text() {
            Ok(body) => Outcome::from_response(status, &body),
            Err(e) => Outcome::Failed(format!("failed to read response: {e}")),
        }
    }
}
