//! Typed rows for the derived analytical views.
//!
//! These are the read-side contract: `RiskFeatureRow` is what the
//! downstream churn classifier trains on, so every field is non-null
//! by construction (the view fills defaults before the rows get here).

use crate::types::CustomerId;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// One row of the `customer_ltv` view.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CustomerLtvRow {
    pub customer_id: CustomerId,
    pub name: String,
    pub customer_segment: String,
    pub signup_date: NaiveDate,
    pub subscription_count: i64,
    pub total_revenue: f64,
    pub avg_monthly_charges: f64,
    pub last_churn_date: Option<NaiveDate>,
    pub current_status: String,
    pub tenure_days: i64,
}

/// One row of the `churn_analysis` segment rollup.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChurnAnalysisRow {
    pub customer_segment: String,
    pub total_customers: i64,
    pub churned_customers: i64,
    pub churn_rate_pct: f64,
    pub avg_ltv: f64,
    pub avg_tenure_days: f64,
}

/// One row of the `customer_risk_features` feature vector.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RiskFeatureRow {
    pub customer_id: CustomerId,
    pub customer_segment: String,
    pub age: i64,
    pub subscription_count: i64,
    pub avg_monthly_charges: f64,
    pub total_spent: f64,
    pub has_churned: i64,
    pub has_paperless_billing: bool,
    pub avg_data_usage_gb: f64,
    pub avg_satisfaction: f64,
    pub total_support_tickets: i64,
    pub failed_payments_count: i64,
    pub avg_late_fees: f64,
    pub risk_category: RiskCategory,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RiskCategory {
    #[serde(rename = "High Risk")]
    High,
    #[serde(rename = "Medium Risk")]
    Medium,
    #[serde(rename = "Low Risk")]
    Low,
}

impl RiskCategory {
    pub fn as_label(&self) -> &'static str {
        match self {
            Self::High => "High Risk",
            Self::Medium => "Medium Risk",
            Self::Low => "Low Risk",
        }
    }

    pub fn from_label(label: &str) -> Option<Self> {
        match label {
            "High Risk" => Some(Self::High),
            "Medium Risk" => Some(Self::Medium),
            "Low Risk" => Some(Self::Low),
            _ => None,
        }
    }

    /// The rule the view evaluates, in the same branch order: the
    /// conjunction wins first, then the disjunction, then Low.
    pub fn classify(
        avg_satisfaction: f64,
        total_support_tickets: i64,
        failed_payments_count: i64,
    ) -> Self {
        if avg_satisfaction < 5.0 && total_support_tickets > 2 {
            Self::High
        } else if avg_satisfaction < 7.0 || failed_payments_count > 1 {
            Self::Medium
        } else {
            Self::Low
        }
    }
}

impl std::fmt::Display for RiskCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_label())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn high_risk_needs_both_conditions() {
        assert_eq!(RiskCategory::classify(3.0, 4, 0), RiskCategory::High);
        // Low satisfaction alone falls through to the disjunction.
        assert_eq!(RiskCategory::classify(3.0, 2, 0), RiskCategory::Medium);
        // Many tickets with decent satisfaction is not High.
        assert_eq!(RiskCategory::classify(8.0, 10, 0), RiskCategory::Low);
    }

    #[test]
    fn medium_risk_is_a_disjunction() {
        assert_eq!(RiskCategory::classify(6.5, 0, 0), RiskCategory::Medium);
        assert_eq!(RiskCategory::classify(9.0, 0, 2), RiskCategory::Medium);
    }

    #[test]
    fn neutral_defaults_land_low() {
        // A customer with no history: satisfaction defaults to 7,
        // counts to 0 — exactly the Low branch.
        assert_eq!(RiskCategory::classify(7.0, 0, 0), RiskCategory::Low);
    }

    #[test]
    fn labels_round_trip() {
        for cat in [RiskCategory::High, RiskCategory::Medium, RiskCategory::Low] {
            assert_eq!(RiskCategory::from_label(cat.as_label()), Some(cat));
        }
        assert_eq!(RiskCategory::from_label("Unknown"), None);
    }
}
