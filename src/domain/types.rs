//! Shared domain types.
//!
//! These types are intentionally kept lightweight and serializable so they can be:
//!
//! - deserialized from the `/predict` request body (after validation)
//! - serialized by the form client as the request payload
//! - handed to a `Pipeline` for scoring

use serde::{Deserialize, Serialize};

/// Number of features the pipeline was trained on.
pub const FEATURE_COUNT: usize = 13;

/// Feature names in the order the pipeline expects them.
pub const FEATURES: [&str; FEATURE_COUNT] = [
    "age",
    "loan_tenure_months",
    "number_of_open_accounts",
    "credit_utilization_ratio",
    "loan_to_income",
    "delinquency_ratio",
    "avg_dpd_per_delinquency",
    "residence_type_Owned",
    "residence_type_Rented",
    "loan_purpose_Education",
    "loan_purpose_Home",
    "loan_purpose_Personal",
    "loan_type_Unsecured",
];

/// The first seven features are numeric, the rest are one-hot flags.
pub const NUMERIC_FEATURE_COUNT: usize = 7;

/// One borrower, as seen by the model.
///
/// Field names on the wire match `FEATURES` exactly (including the mixed-case
/// one-hot flag names).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureVector {
    pub age: f64,
    pub loan_tenure_months: f64,
    pub number_of_open_accounts: f64,
    pub credit_utilization_ratio: f64,
    pub loan_to_income: f64,
    pub delinquency_ratio: f64,
    pub avg_dpd_per_delinquency: f64,
    #[serde(rename = "residence_type_Owned")]
    pub residence_type_owned: bool,
    #[serde(rename = "residence_type_Rented")]
    pub residence_type_rented: bool,
    #[serde(rename = "loan_purpose_Education")]
    pub loan_purpose_education: bool,
    #[serde(rename = "loan_purpose_Home")]
    pub loan_purpose_home: bool,
    #[serde(rename = "loan_purpose_Personal")]
    pub loan_purpose_personal: bool,
    #[serde(rename = "loan_type_Unsecured")]
    pub loan_type_unsecured: bool,
}

impl FeatureVector {
    /// Look up a feature by its wire name. Flags are returned as `0.0`/`1.0`.
    pub fn value(&self, name: &str) -> Option<f64> {
        let v = match name {
            "age" => self.age,
            "loan_tenure_months" => self.loan_tenure_months,
            "number_of_open_accounts" => self.number_of_open_accounts,
            "credit_utilization_ratio" => self.credit_utilization_ratio,
            "loan_to_income" => self.loan_to_income,
            "delinquency_ratio" => self.delinquency_ratio,
            "avg_dpd_per_delinquency" => self.avg_dpd_per_delinquency,
            "residence_type_Owned" => flag(self.residence_type_owned),
            "residence_type_Rented" => flag(self.residence_type_rented),
            "loan_purpose_Education" => flag(self.loan_purpose_education),
            "loan_purpose_Home" => flag(self.loan_purpose_home),
            "loan_purpose_Personal" => flag(self.loan_purpose_personal),
            "loan_type_Unsecured" => flag(self.loan_type_unsecured),
            _ => return None,
        };
        Some(v)
    }

    /// All features as a dense row, in `FEATURES` order.
    pub fn values(&self) -> [f64; FEATURE_COUNT] {
        [
            self.age,
            self.loan_tenure_months,
            self.number_of_open_accounts,
            self.credit_utilization_ratio,
            self.loan_to_income,
            self.delinquency_ratio,
            self.avg_dpd_per_delinquency,
            flag(self.residence_type_owned),
            flag(self.residence_type_rented),
            flag(self.loan_purpose_education),
            flag(self.loan_purpose_home),
            flag(self.loan_purpose_personal),
            flag(self.loan_type_unsecured),
        ]
    }
}

fn flag(b: bool) -> f64 {
    if b { 1.0 } else { 0.0 }
}

/// Response body of a successful `/predict`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PredictionResult {
    /// Probability of default (class 1), rounded to 3 decimals.
    pub probability_score: f64,
    /// 1 = predicted default risk.
    pub predicted_class: i32,
}

impl PredictionResult {
    pub fn new(probability: f64, class: u8) -> Self {
        Self {
            probability_score: round3(probability),
            predicted_class: i32::from(class),
        }
    }
}

/// Round half away from zero to 3 decimals.
pub fn round3(v: f64) -> f64 {
    (v * 1000.0).round() / 1000.0
}

/// Residence type selector.
///
/// `Mortgage` has no flag of its own: it is sent as both residence flags `false`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ResidenceType {
    #[default]
    Owned,
    Rented,
    Mortgage,
}

impl ResidenceType {
    pub const ALL: [ResidenceType; 3] = [Self::Owned, Self::Rented, Self::Mortgage];

    pub fn display_name(self) -> &'static str {
        match self {
            Self::Owned => "Owned",
            Self::Rented => "Rented",
            Self::Mortgage => "Mortgage",
        }
    }

    /// `(residence_type_Owned, residence_type_Rented)`
    pub fn flags(self) -> (bool, bool) {
        (self == Self::Owned, self == Self::Rented)
    }

    pub fn next(self) -> Self {
        cycle(&Self::ALL, self, 1)
    }

    pub fn prev(self) -> Self {
        cycle(&Self::ALL, self, -1)
    }
}

/// Loan purpose selector.
///
/// `Auto` has no flag of its own: it is sent as all purpose flags `false`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum LoanPurpose {
    #[default]
    Education,
    Home,
    Auto,
    Personal,
}

impl LoanPurpose {
    pub const ALL: [LoanPurpose; 4] = [Self::Education, Self::Home, Self::Auto, Self::Personal];

    pub fn display_name(self) -> &'static str {
        match self {
            Self::Education => "Education",
            Self::Home => "Home",
            Self::Auto => "Auto",
            Self::Personal => "Personal",
        }
    }

    /// `(loan_purpose_Education, loan_purpose_Home, loan_purpose_Personal)`
    pub fn flags(self) -> (bool, bool, bool) {
        (self == Self::Education, self == Self::Home, self == Self::Personal)
    }

    pub fn next(self) -> Self {
        cycle(&Self::ALL, self, 1)
    }

    pub fn prev(self) -> Self {
        cycle(&Self::ALL, self, -1)
    }
}

/// Loan type selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum LoanType {
    #[default]
    Unsecured,
    Secured,
}

impl LoanType {
    pub const ALL: [LoanType; 2] = [Self::Unsecured, Self::Secured];

    pub fn display_name(self) -> &'static str {
        match self {
            Self::Unsecured => "Unsecured",
            Self::Secured => "Secured",
        }
    }

    /// `loan_type_Unsecured`
    pub fn flag(self) -> bool {
        self == Self::Unsecured
    }

    pub fn next(self) -> Self {
        cycle(&Self::ALL, self, 1)
    }

    pub fn prev(self) -> Self {
        cycle(&Self::ALL, self, -1)
    }
}

fn cycle<T: Copy + PartialEq>(all: &[T], cur: T, delta: isize) -> T {
    let n = all.len() as isize;
    let idx = all.iter().position(|v| *v == cur).unwrap_or(0) as isize;
    all[(idx + delta).rem_euclid(n) as usize]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> FeatureVector {
        FeatureVector {
            age: 28.0,
            loan_tenure_months: 36.0,
            number_of_open_accounts: 2.0,
            credit_utilization_ratio: 30.0,
            loan_to_income: 2.13,
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

    #[test]
    fn values_follow_feature_order() {
        let fv = sample();
        let row = fv.values();
        for (i, name) in FEATURES.iter().enumerate() {
            assert_eq!(fv.value(name), Some(row[i]), "mismatch at {name}");
        }
        assert_eq!(fv.value("income"), None);
    }

    #[test]
    fn serializes_with_wire_names() {
        let json = serde_json::to_value(sample()).unwrap();
        let obj = json.as_object().unwrap();
        assert_eq!(obj.len(), FEATURE_COUNT);
        for name in FEATURES {
            assert!(obj.contains_key(name), "missing {name}");
        }
        assert_eq!(obj["residence_type_Owned"], serde_json::json!(true));
    }

    #[test]
    fn prediction_is_rounded_to_three_decimals() {
        let r = PredictionResult::new(0.123_56, 1);
        assert_eq!(r.probability_score, 0.124);
        assert_eq!(r.predicted_class, 1);
        assert_eq!(round3(0.0004), 0.0);
        assert_eq!(round3(1.0), 1.0);
    }

    #[test]
    fn selectors_without_a_flag_send_all_false() {
        assert_eq!(ResidenceType::Mortgage.flags(), (false, false));
        assert_eq!(LoanPurpose::Auto.flags(), (false, false, false));
        assert_eq!(ResidenceType::Rented.flags(), (false, true));
        assert!(!LoanType::Secured.flag());
    }

    #[test]
    fn selectors_cycle_both_ways() {
        assert_eq!(ResidenceType::Mortgage.next(), ResidenceType::Owned);
        assert_eq!(ResidenceType::Owned.prev(), ResidenceType::Mortgage);
        assert_eq!(LoanPurpose::Home.next(), LoanPurpose::Auto);
        assert_eq!(LoanType::Unsecured.prev(), LoanType::Secured);
    }
}
