//! Min-max scaled logistic regression loaded from a JSON artifact.
//!
//! The artifact is produced offline. Scoring is three steps:
//! - min-max scale the columns listed by the scaler
//! - order columns by `features`
//! - `p1 = sigmoid(intercept + w·x)`, class is `p1 >= threshold`

use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

use nalgebra::DVector;
use serde::Deserialize;

use crate::domain::FeatureVector;
use crate::error::AppError;
use crate::models::{Pipeline, PipelineError};

/// Location of the model artifact, fixed relative to the crate directory.
pub fn default_artifact_path() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("artifacts")
        .join("model_data.json")
}

/// On-disk schema of the model artifact.
#[derive(Debug, Clone, Deserialize)]
pub struct LogisticArtifact {
    pub features: Vec<String>,
    pub scaler: MinMaxScaler,
    pub coefficients: Vec<f64>,
    pub intercept: f64,
    #[serde(default = "default_threshold")]
    pub threshold: f64,
}

fn default_threshold() -> f64 {
    0.5
}

#[derive(Debug, Clone, Deserialize)]
pub struct MinMaxScaler {
    pub columns: Vec<String>,
    pub min: Vec<f64>,
    pub max: Vec<f64>,
}

#[derive(Debug, Clone)]
pub struct LogisticPipeline {
    features: Vec<String>,
    /// Per feature (aligned with `features`): `(min, max - min)` if scaled.
    scaling: Vec<Option<(f64, f64)>>,
    weights: DVector<f64>,
    intercept: f64,
    threshold: f64,
}

impl LogisticPipeline {
    /// Load and validate the artifact at `path`.
    ///
    /// Any failure here is fatal for the service.
    pub fn load(path: &Path) -> Result<Self, AppError> {
        if !path.exists() {
            return Err(AppError::model_load(format!(
                "Model file not found at: {}",
                path.display()
            )));
        }

        let file = File::open(path)
            .map_err(|e| AppError::model_load(format!("Failed to load model: {e}")))?;
        let artifact: LogisticArtifact = serde_json::from_reader(BufReader::new(file))
            .map_err(|e| AppError::model_load(format!("Failed to load model: {e}")))?;

        Self::from_artifact(artifact)
            .map_err(|e| AppError::model_load(format!("Failed to load model: {e}")))
    }

    pub fn from_artifact(artifact: LogisticArtifact) -> Result<Self, PipelineError> {
        let LogisticArtifact {
            features,
            scaler,
            coefficients,
            intercept,
            threshold,
        } = artifact;

        if features.is_empty() {
            return Err(PipelineError::new("artifact lists no features"));
        }
        if coefficients.len() != features.len() {
            return Err(PipelineError::new(format!(
                "expected {} coefficients, found {}",
                features.len(),
                coefficients.len()
            )));
        }
        if scaler.min.len() != scaler.columns.len() || scaler.max.len() != scaler.columns.len() {
            return Err(PipelineError::new(
                "scaler columns, min and max must have the same length",
            ));
        }
        if !(threshold > 0.0 && threshold < 1.0) {
            return Err(PipelineError::new(format!(
                "threshold must be in (0, 1), found {threshold}"
            )));
        }
        if !intercept.is_finite() || coefficients.iter().any(|c| !c.is_finite()) {
            return Err(PipelineError::new("coefficients must be finite"));
        }

        let mut scaling = vec![None; features.len()];
        for (i, column) in scaler.columns.iter().enumerate() {
            let idx = features
                .iter()
                .position(|f| f == column)
                .ok_or_else(|| PipelineError::new(format!("scaler column '{column}' is not a feature")))?;
            let (lo, hi) = (scaler.min[i], scaler.max[i]);
            if !(lo.is_finite() && hi.is_finite() && hi > lo) {
                return Err(PipelineError::new(format!(
                    "scaler range for '{column}' is invalid ({lo}..{hi})"
                )));
            }
            scaling[idx] = Some((lo, hi - lo));
        }

        Ok(Self {
            features,
            scaling,
            weights: DVector::from_vec(coefficients),
            intercept,
            threshold,
        })
    }

    pub fn features(&self) -> &[String] {
        &self.features
    }

    /// Scale and order the record into the model's input vector.
    fn transform(&self, row: &FeatureVector) -> Result<DVector<f64>, PipelineError> {
        let mut x = DVector::zeros(self.features.len());
        for (i, name) in self.features.iter().enumerate() {
            let raw = row
                .value(name)
                .ok_or_else(|| PipelineError::new(format!("Missing required feature: {name}")))?;
            x[i] = match self.scaling[i] {
                Some((lo, range)) => (raw - lo) / range,
                None => raw,
            };
        }
        Ok(x)
    }

    fn positive_probability(&self, row: &FeatureVector) -> Result<f64, PipelineError> {
        let x = self.transform(row)?;
        let z = self.intercept + self.weights.dot(&x);
        if !z.is_finite() {
            return Err(PipelineError::new(format!("decision value is not finite ({z})")));
        }
        Ok(sigmoid(z))
    }
}

impl Pipeline for LogisticPipeline {
    fn predict(&self, row: &FeatureVector) -> Result<u8, PipelineError> {
        let p1 = self.positive_probability(row)?;
        Ok(u8::from(p1 >= self.threshold))
    }

    fn predict_probability(&self, row: &FeatureVector) -> Result<[f64; 2], PipelineError> {
        let p1 = self.positive_probability(row)?;
        Ok([1.0 - p1, p1])
    }
}

fn sigmoid(z: f64) -> f64 {
    if z >= 0.0 {
        1.0 / (1.0 + (-z).exp())
    } else {
        let e = z.exp();
        e / (1.0 + e)
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;
    use crate::domain::FEATURES;
    use crate::error::EXIT_MODEL_LOAD;

    fn row() -> FeatureVector {
        FeatureVector {
            age: 28.0,
            loan_tenure_months: 36.0,
            number_of_open_accounts: 2.0,
            credit_utilization_ratio: 30.0,
            loan_to_income: 2.1333,
            delinquency_ratio: 30.0,
            avg_dpd_per_delinquency: 20.0,
            residence_type_owned: true,
            residence_type_rented: false,
            loan_purpose_education: true,
            loan_purpose_home: false,
            loan_purpose_personal: false,
            loan_type_unsecured: true,
        }
    }

    fn artifact(coefficients: Vec<f64>, intercept: f64) -> LogisticArtifact {
        LogisticArtifact {
            features: FEATURES.iter().map(|s| s.to_string()).collect(),
            scaler: MinMaxScaler {
                columns: vec!["age".to_string()],
                min: vec![18.0],
                max: vec![70.0],
            },
            coefficients,
            intercept,
            threshold: 0.5,
        }
    }

    #[test]
    fn zero_weights_give_even_odds() {
        let p = LogisticPipeline::from_artifact(artifact(vec![0.0; 13], 0.0)).unwrap();
        let [p0, p1] = p.predict_probability(&row()).unwrap();
        assert!((p0 - 0.5).abs() < 1e-12);
        assert!((p1 - 0.5).abs() < 1e-12);
        // Ties go to the positive class.
        assert_eq!(p.predict(&row()).unwrap(), 1);
    }

    #[test]
    fn scaled_column_is_min_max_normalized() {
        // Only age carries weight: x = (28 - 18) / 52.
        let mut w = vec![0.0; 13];
        w[0] = 1.0;
        let p = LogisticPipeline::from_artifact(artifact(w, 0.0)).unwrap();
        let [_, p1] = p.predict_probability(&row()).unwrap();
        assert!((p1 - sigmoid(10.0 / 52.0)).abs() < 1e-12);
    }

    #[test]
    fn class_follows_threshold() {
        let p = LogisticPipeline::from_artifact(artifact(vec![0.0; 13], -3.0)).unwrap();
        assert_eq!(p.predict(&row()).unwrap(), 0);
        let p = LogisticPipeline::from_artifact(artifact(vec![0.0; 13], 3.0)).unwrap();
        assert_eq!(p.predict(&row()).unwrap(), 1);
    }

    #[test]
    fn unknown_feature_is_reported_as_missing() {
        let mut a = artifact(vec![0.0; 14], 0.0);
        a.features.push("income".to_string());
        let p = LogisticPipeline::from_artifact(a).unwrap();
        let err = p.predict(&row()).unwrap_err();
        assert_eq!(err.to_string(), "Missing required feature: income");
    }

    #[test]
    fn rejects_inconsistent_artifacts() {
        assert!(LogisticPipeline::from_artifact(artifact(vec![0.0; 12], 0.0)).is_err());

        let mut a = artifact(vec![0.0; 13], 0.0);
        a.scaler.max = vec![18.0];
        assert!(LogisticPipeline::from_artifact(a).is_err());

        let mut a = artifact(vec![0.0; 13], 0.0);
        a.scaler.columns = vec!["salary".to_string()];
        assert!(LogisticPipeline::from_artifact(a).is_err());

        let mut a = artifact(vec![0.0; 13], 0.0);
        a.threshold = 1.0;
        assert!(LogisticPipeline::from_artifact(a).is_err());
    }

    #[test]
    fn load_reports_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("model_data.json");
        let err = LogisticPipeline::load(&path).unwrap_err();
        assert_eq!(err.exit_code(), EXIT_MODEL_LOAD);
        assert!(err.to_string().starts_with("Model file not found at:"));
    }

    #[test]
    fn load_reports_unparseable_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "{{ not json").unwrap();
        let err = LogisticPipeline::load(file.path()).unwrap_err();
        assert!(err.to_string().starts_with("Failed to load model:"));
    }

    #[test]
    fn shipped_artifact_loads_and_scores() {
        let p = LogisticPipeline::load(&default_artifact_path()).unwrap();
        assert_eq!(p.features().len(), FEATURES.len());
        let [p0, p1] = p.predict_probability(&row()).unwrap();
        assert!((0.0..=1.0).contains(&p1));
        assert!((p0 + p1 - 1.0).abs() < 1e-12);
    }
}
