//! Form state for the presenter.
//!
//! Holds the raw borrower inputs, enforces the widget-level bounds, derives the
//! loan-to-income ratio, and assembles the `/predict` payload. Nothing here
//! touches the terminal or the network, so the whole form is testable as data.

use crate::domain::{FeatureVector, LoanPurpose, LoanType, ResidenceType};

/// One row of the form, in display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    Age,
    Income,
    LoanAmount,
    LoanTenure,
    AvgDpd,
    DelinquencyRatio,
    CreditUtilization,
    OpenAccounts,
    Residence,
    Purpose,
    LoanType,
    Submit,
}

/// Bounds and default of a numeric input.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NumericBounds {
    pub min: f64,
    pub max: Option<f64>,
    /// Increment used by the arrow keys.
    pub step: f64,
    pub default: f64,
}

impl NumericBounds {
    const fn new(min: f64, max: Option<f64>, step: f64, default: f64) -> Self {
        Self {
            min,
            max,
            step,
            default,
        }
    }

    /// Round to a whole number and clamp into `[min, max]`.
    pub fn clamp(&self, v: f64) -> f64 {
        let v = v.round().max(self.min);
        match self.max {
            Some(max) => v.min(max),
            None => v,
        }
    }
}

impl Field {
    pub const ALL: [Field; 12] = [
        Field::Age,
        Field::Income,
        Field::LoanAmount,
        Field::LoanTenure,
        Field::AvgDpd,
        Field::DelinquencyRatio,
        Field::CreditUtilization,
        Field::OpenAccounts,
        Field::Residence,
        Field::Purpose,
        Field::LoanType,
        Field::Submit,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Field::Age => "Age",
            Field::Income => "Income",
            Field::LoanAmount => "Loan Amount",
            Field::LoanTenure => "Loan Tenure (months)",
            Field::AvgDpd => "Avg DPD",
            Field::DelinquencyRatio => "Delinquency Ratio",
            Field::CreditUtilization => "Credit Utilization Ratio",
            Field::OpenAccounts => "Open Loan Accounts",
            Field::Residence => "Residence Type",
            Field::Purpose => "Loan Purpose",
            Field::LoanType => "Loan Type",
            Field::Submit => "Calculate Risk",
        }
    }

    /// `None` for selectors and the submit button.
    pub fn bounds(self) -> Option<NumericBounds> {
        let b = match self {
            Field::Age => NumericBounds::new(18.0, Some(100.0), 1.0, 28.0),
            Field::Income => NumericBounds::new(0.0, None, 10_000.0, 1_200_000.0),
            Field::LoanAmount => NumericBounds::new(0.0, None, 10_000.0, 2_560_000.0),
            Field::LoanTenure => NumericBounds::new(0.0, None, 1.0, 36.0),
            Field::AvgDpd => NumericBounds::new(0.0, None, 1.0, 20.0),
            Field::DelinquencyRatio => NumericBounds::new(0.0, Some(100.0), 1.0, 30.0),
            Field::CreditUtilization => NumericBounds::new(0.0, Some(100.0), 1.0, 30.0),
            Field::OpenAccounts => NumericBounds::new(1.0, Some(4.0), 1.0, 2.0),
            Field::Residence | Field::Purpose | Field::LoanType | Field::Submit => return None,
        };
        Some(b)
    }

    pub fn is_numeric(self) -> bool {
        self.bounds().is_some()
    }
}

/// `loan_amount / income`, or `0` when income is not positive.
pub fn loan_to_income(loan_amount: f64, income: f64) -> f64 {
    if income > 0.0 { loan_amount / income } else { 0.0 }
}

#[derive(Debug, Clone, PartialEq)]
pub struct FormState {
    pub age: f64,
    pub income: f64,
    pub loan_amount: f64,
    pub loan_tenure_months: f64,
    pub avg_dpd_per_delinquency: f64,
    pub delinquency_ratio: f64,
    pub credit_utilization_ratio: f64,
    pub number_of_open_accounts: f64,
    pub residence: ResidenceType,
    pub purpose: LoanPurpose,
    pub loan_type: LoanType,
}

impl Default for FormState {
    fn default() -> Self {
        let d = |f: Field| f.bounds().map(|b| b.default).unwrap_or_default();
        Self {
            age: d(Field::Age),
            income: d(Field::Income),
            loan_amount: d(Field::LoanAmount),
            loan_tenure_months: d(Field::LoanTenure),
            avg_dpd_per_delinquency: d(Field::AvgDpd),
            delinquency_ratio: d(Field::DelinquencyRatio),
            credit_utilization_ratio: d(Field::CreditUtilization),
            number_of_open_accounts: d(Field::OpenAccounts),
            residence: ResidenceType::default(),
            purpose: LoanPurpose::default(),
            loan_type: LoanType::default(),
        }
    }
}

impl FormState {
    pub fn numeric(&self, field: Field) -> Option<f64> {
        let v = match field {
            Field::Age => self.age,
            Field::Income => self.income,
            Field::LoanAmount => self.loan_amount,
            Field::LoanTenure => self.loan_tenure_months,
            Field::AvgDpd => self.avg_dpd_per_delinquency,
            Field::DelinquencyRatio => self.delinquency_ratio,
            Field::CreditUtilization => self.credit_utilization_ratio,
            Field::OpenAccounts => self.number_of_open_accounts,
            Field::Residence | Field::Purpose | Field::LoanType | Field::Submit => return None,
        };
        Some(v)
    }

    /// Set a numeric input, clamped into its bounds. Returns the stored value.
    pub fn set_numeric(&mut self, field: Field, value: f64) -> Option<f64> {
        let bounds = field.bounds()?;
        let v = if value.is_finite() {
            bounds.clamp(value)
        } else {
            bounds.default
        };
        let slot = match field {
            Field::Age => &mut self.age,
            Field::Income => &mut self.income,
            Field::LoanAmount => &mut self.loan_amount,
            Field::LoanTenure => &mut self.loan_tenure_months,
            Field::AvgDpd => &mut self.avg_dpd_per_delinquency,
            Field::DelinquencyRatio => &mut self.delinquency_ratio,
            Field::CreditUtilization => &mut self.credit_utilization_ratio,
            Field::OpenAccounts => &mut self.number_of_open_accounts,
            Field::Residence | Field::Purpose | Field::LoanType | Field::Submit => return None,
        };
        *slot = v;
        Some(v)
    }

    /// Parse typed text into a numeric input.
    pub fn set_from_text(&mut self, field: Field, text: &str) -> Result<f64, String> {
        let cleaned: String = text.chars().filter(|c| *c != ',' && *c != '_').collect();
        let value = cleaned
            .trim()
            .parse::<f64>()
            .map_err(|_| format!("'{}' is not a number", text.trim()))?;
        self.set_numeric(field, value)
            .ok_or_else(|| format!("{} is not a numeric input", field.label()))
    }

    /// Step a numeric input or cycle a selector.
    pub fn adjust(&mut self, field: Field, delta: i32) {
        let forward = delta >= 0;
        match field {
            Field::Residence => {
                self.residence = if forward { self.residence.next() } else { self.residence.prev() };
            }
            Field::Purpose => {
                self.purpose = if forward { self.purpose.next() } else { self.purpose.prev() };
            }
            Field::LoanType => {
                self.loan_type = if forward { self.loan_type.next() } else { self.loan_type.prev() };
            }
            Field::Submit => {}
            numeric => {
                if let (Some(b), Some(cur)) = (numeric.bounds(), self.numeric(numeric)) {
                    self.set_numeric(numeric, cur + b.step * f64::from(delta));
                }
            }
        }
    }

    pub fn loan_to_income(&self) -> f64 {
        loan_to_income(self.loan_amount, self.income)
    }

    /// Text shown next to a field's label.
    pub fn display_value(&self, field: Field) -> String {
        match field {
            Field::Residence => self.residence.display_name().to_string(),
            Field::Purpose => self.purpose.display_name().to_string(),
            Field::LoanType => self.loan_type.display_name().to_string(),
            Field::Submit => String::new(),
            numeric => self
                .numeric(numeric)
                .map(|v| format!("{v:.0}"))
                .unwrap_or_default(),
        }
    }

    /// Selections that have no one-hot flag and go out as all-false.
    pub fn unflagged_selections(&self) -> Vec<&'static str> {
        let mut out = Vec::new();
        if self.residence == ResidenceType::Mortgage {
            out.push(self.residence.display_name());
        }
        if self.purpose == LoanPurpose::Auto {
            out.push(self.purpose.display_name());
        }
        out
    }

    /// Assemble the `/predict` payload.
    pub fn to_payload(&self) -> FeatureVector {
        let (owned, rented) = self.residence.flags();
        let (education, home, personal) = self.purpose.flags();
        FeatureVector {
            age: self.age,
            loan_tenure_months: self.loan_tenure_months,
            number_of_open_accounts: self.number_of_open_accounts,
            credit_utilization_ratio: self.credit_utilization_ratio,
            loan_to_income: self.loan_to_income(),
            delinquency_ratio: self.delinquency_ratio,
            avg_dpd_per_delinquency: self.avg_dpd_per_delinquency,
            residence_type_owned: owned,
            residence_type_rented: rented,
            loan_purpose_education: education,
            loan_purpose_home: home,
            loan_purpose_personal: personal,
            loan_type_unsecured: self.loan_type.flag(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ratio_of_default_inputs() {
        let form = FormState::default();
        assert!((form.loan_to_income() - 2_560_000.0 / 1_200_000.0).abs() < 1e-12);
        assert!((form.loan_to_income() - 2.1333).abs() < 1e-4);
    }

    #[test]
    fn zero_income_gives_zero_ratio() {
        assert_eq!(loan_to_income(2_560_000.0, 0.0), 0.0);
        let mut form = FormState::default();
        form.set_numeric(Field::Income, 0.0);
        assert_eq!(form.loan_to_income(), 0.0);
    }

    #[test]
    fn default_payload_flags() {
        let p = FormState::default().to_payload();
        assert_eq!(p.age, 28.0);
        assert_eq!(p.loan_tenure_months, 36.0);
        assert_eq!(p.number_of_open_accounts, 2.0);
        assert_eq!(p.credit_utilization_ratio, 30.0);
        assert_eq!(p.delinquency_ratio, 30.0);
        assert_eq!(p.avg_dpd_per_delinquency, 20.0);
        assert!(p.residence_type_owned);
        assert!(!p.residence_type_rented);
        assert!(p.loan_purpose_education);
        assert!(!p.loan_purpose_home);
        assert!(!p.loan_purpose_personal);
        assert!(p.loan_type_unsecured);
    }

    #[test]
    fn mortgage_and_auto_send_all_false() {
        let mut form = FormState::default();
        form.residence = ResidenceType::Mortgage;
        form.purpose = LoanPurpose::Auto;
        let p = form.to_payload();
        assert!(!p.residence_type_owned && !p.residence_type_rented);
        assert!(!p.loan_purpose_education && !p.loan_purpose_home && !p.loan_purpose_personal);
        assert_eq!(form.unflagged_selections(), vec!["Mortgage", "Auto"]);
    }

    #[test]
    fn inputs_are_clamped_to_widget_bounds() {
        let mut form = FormState::default();
        assert_eq!(form.set_numeric(Field::Age, 7.0), Some(18.0));
        assert_eq!(form.set_numeric(Field::Age, 140.0), Some(100.0));
        assert_eq!(form.set_numeric(Field::OpenAccounts, 9.0), Some(4.0));
        assert_eq!(form.set_numeric(Field::Income, -1.0), Some(0.0));
        assert_eq!(form.set_numeric(Field::Residence, 1.0), None);
    }

    #[test]
    fn arrows_step_and_cycle() {
        let mut form = FormState::default();
        form.adjust(Field::Income, 1);
        assert_eq!(form.income, 1_210_000.0);
        form.adjust(Field::OpenAccounts, -1);
        form.adjust(Field::OpenAccounts, -1);
        assert_eq!(form.number_of_open_accounts, 1.0);
        form.adjust(Field::LoanType, 1);
        assert_eq!(form.loan_type, LoanType::Secured);
        form.adjust(Field::Purpose, -1);
        assert_eq!(form.purpose, LoanPurpose::Personal);
    }

    #[test]
    fn typed_values_are_parsed() {
        let mut form = FormState::default();
        assert_eq!(form.set_from_text(Field::LoanAmount, "3,000,000"), Ok(3_000_000.0));
        assert_eq!(form.set_from_text(Field::Age, "41.6"), Ok(42.0));
        assert!(form.set_from_text(Field::Age, "old").is_err());
        assert_eq!(form.age, 42.0);
    }
}
