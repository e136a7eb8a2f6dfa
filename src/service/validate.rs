//! Turn a `/predict` body into a `FeatureVector`.
//!
//! Rules:
//! - the body must be a JSON object
//! - every name in `FEATURES` must be present and non-null (checked in order)
//! - numbers accept JSON numbers and numeric strings
//! - flags accept booleans, `0`/`1`, and the usual true/false spellings
//! - any other key is rejected
//!
//! No range checks: an age of 3 is passed to the pipeline as-is.

use serde_json::{Map, Value};

use crate::domain::{FEATURE_COUNT, FEATURES, FeatureVector, NUMERIC_FEATURE_COUNT};
use crate::service::PredictError;

/// Parse and validate a raw request body.
pub fn parse_record(body: &[u8]) -> Result<FeatureVector, PredictError> {
    let value: Value =
        serde_json::from_slice(body).map_err(|e| PredictError::InvalidBody(e.to_string()))?;
    record_from_value(&value)
}

pub fn record_from_value(value: &Value) -> Result<FeatureVector, PredictError> {
    let obj = value.as_object().ok_or_else(|| {
        PredictError::InvalidBody(format!("expected a JSON object, found {}", describe(value)))
    })?;

    let mut numbers = [0.0; NUMERIC_FEATURE_COUNT];
    for (slot, name) in numbers.iter_mut().zip(FEATURES.iter()) {
        *slot = number(obj, name)?;
    }
    let mut flags = [false; FEATURE_COUNT - NUMERIC_FEATURE_COUNT];
    for (slot, name) in flags.iter_mut().zip(FEATURES[NUMERIC_FEATURE_COUNT..].iter()) {
        *slot = flag(obj, name)?;
    }

    if let Some(extra) = obj.keys().find(|k| !FEATURES.contains(&k.as_str())) {
        return Err(PredictError::UnexpectedFeature(extra.clone()));
    }

    let [
        age,
        loan_tenure_months,
        number_of_open_accounts,
        credit_utilization_ratio,
        loan_to_income,
        delinquency_ratio,
        avg_dpd_per_delinquency,
    ] = numbers;
    let [
        residence_type_owned,
        residence_type_rented,
        loan_purpose_education,
        loan_purpose_home,
        loan_purpose_personal,
        loan_type_unsecured,
    ] = flags;

    Ok(FeatureVector {
        age,
        loan_tenure_months,
        number_of_open_accounts,
        credit_utilization_ratio,
        loan_to_income,
        delinquency_ratio,
        avg_dpd_per_delinquency,
        residence_type_owned,
        residence_type_rented,
        loan_purpose_education,
        loan_purpose_home,
        loan_purpose_personal,
        loan_type_unsecured,
    })
}

fn required<'a>(obj: &'a Map<String, Value>, name: &str) -> Result<&'a Value, PredictError> {
    match obj.get(name) {
        None | Some(Value::Null) => Err(PredictError::MissingFeature(name.to_string())),
        Some(v) => Ok(v),
    }
}

fn number(obj: &Map<String, Value>, name: &str) -> Result<f64, PredictError> {
    let raw = required(obj, name)?;
    let parsed = match raw {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    };
    parsed
        .filter(|v| v.is_finite())
        .ok_or_else(|| conversion(name, "float", raw))
}

fn flag(obj: &Map<String, Value>, name: &str) -> Result<bool, PredictError> {
    let raw = required(obj, name)?;
    let parsed = match raw {
        Value::Bool(b) => Some(*b),
        Value::Number(n) => match n.as_f64() {
            Some(v) if v == 0.0 => Some(false),
            Some(v) if v == 1.0 => Some(true),
            _ => None,
        },
        Value::String(s) => match s.trim().to_ascii_lowercase().as_str() {
            "true" | "1" | "yes" | "on" => Some(true),
            "false" | "0" | "no" | "off" => Some(false),
            _ => None,
        },
        _ => None,
    };
    parsed.ok_or_else(|| conversion(name, "bool", raw))
}

fn conversion(name: &str, expected: &'static str, raw: &Value) -> PredictError {
    PredictError::TypeConversion {
        field: name.to_string(),
        expected,
        found: describe(raw),
    }
}

fn describe(v: &Value) -> String {
    match v {
        Value::Null => "null".to_string(),
        Value::Bool(b) => format!("bool {b}"),
        Value::Number(n) => format!("number {n}"),
        Value::String(s) => format!("string '{s}'"),
        Value::Array(_) => "array".to_string(),
        Value::Object(_) => "object".to_string(),
    }
}
