//! Generator configuration: the fixed distributional rules and the
//! static service catalog. Constants are not learned and not tunable
//! beyond this struct; `default()` is the production dataset shape,
//! `default_test()` a small population for fast test runs.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceConfig {
    pub service_id: String,
    pub service_name: String,
    pub service_type: String,
    pub monthly_price: f64,
    pub setup_fee: f64,
    pub contract_length_months: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneratorConfig {
    pub customer_count: usize,

    /// Segment assignment is two chained Bernoulli draws, not one
    /// categorical draw: first roll < premium_threshold => Premium,
    /// else an independent roll < standard_threshold => Standard,
    /// else Basic. Effective shares: 20% / 32% / 48%.
    pub premium_threshold: f64,
    pub standard_threshold: f64,

    /// Signup falls uniformly in [today - (min + window), today - min].
    pub signup_min_age_days: i64,
    pub signup_window_days: i64,

    pub churn_probability: f64,
    pub churn_offset_min_days: i64,
    pub churn_offset_max_days: i64,
    pub paperless_probability: f64,

    /// Per-month emission probability for usage rows (missing
    /// telemetry), independent of the null rate on data_usage_gb.
    pub usage_emission_probability: f64,
    pub data_usage_null_rate: f64,
    pub usage_window_months: u32,
    /// Records within this many days before churn score low.
    pub pre_churn_window_days: i64,

    pub data_usage_range_gb: (f64, f64),
    pub call_minutes_range: (f64, f64),
    pub support_tickets_max: i64,
    pub website_visits_max: i64,
    pub app_logins_max: i64,

    pub payment_success_probability: f64,
    pub payment_failed_probability: f64,
    pub late_fee_probability: f64,
    pub late_fee_rate: f64,

    pub payment_methods: Vec<String>,
    pub churn_reasons: Vec<String>,
    pub genders: Vec<String>,
    pub services: Vec<ServiceConfig>,
}

impl Default for GeneratorConfig {
    /// Production dataset shape: 1000 customers over the full catalog.
    fn default() -> Self {
        Self {
            customer_count: 1000,
            premium_threshold: 0.20,
            standard_threshold: 0.40,
            signup_min_age_days: 30,
            signup_window_days: 1095,
            churn_probability: 0.27,
            churn_offset_min_days: 30,
            churn_offset_max_days: 530,
            paperless_probability: 0.5,
            usage_emission_probability: 0.8,
            data_usage_null_rate: 0.1,
            usage_window_months: 12,
            pre_churn_window_days: 30,
            data_usage_range_gb: (5.0, 500.0),
            call_minutes_range: (0.0, 1200.0),
            support_tickets_max: 3,
            website_visits_max: 50,
            app_logins_max: 60,
            payment_success_probability: 0.85,
            payment_failed_probability: 0.10,
            late_fee_probability: 0.15,
            late_fee_rate: 0.05,
            payment_methods: vec![
                "Credit Card".into(),
                "Bank Transfer".into(),
                "Electronic Check".into(),
                "Mailed Check".into(),
            ],
            churn_reasons: vec![
                "Price too high".into(),
                "Moved to competitor".into(),
                "Poor service quality".into(),
                "Relocation".into(),
                "Billing disputes".into(),
                "No longer needed".into(),
            ],
            genders: vec!["Male".into(), "Female".into(), "Other".into()],
            services: vec![
                ServiceConfig {
                    service_id: "svc-dsl-basic".into(),
                    service_name: "DSL Basic".into(),
                    service_type: "Internet".into(),
                    monthly_price: 29.99,
                    setup_fee: 25.0,
                    contract_length_months: 12,
                },
                ServiceConfig {
                    service_id: "svc-fiber-300".into(),
                    service_name: "Fiber 300".into(),
                    service_type: "Internet".into(),
                    monthly_price: 49.99,
                    setup_fee: 49.99,
                    contract_length_months: 12,
                },
                ServiceConfig {
                    service_id: "svc-fiber-gig".into(),
                    service_name: "Fiber Gigabit".into(),
                    service_type: "Internet".into(),
                    monthly_price: 79.99,
                    setup_fee: 99.0,
                    contract_length_months: 24,
                },
                ServiceConfig {
                    service_id: "svc-talk-text".into(),
                    service_name: "Unlimited Talk & Text".into(),
                    service_type: "Phone".into(),
                    monthly_price: 34.99,
                    setup_fee: 0.0,
                    contract_length_months: 12,
                },
                ServiceConfig {
                    service_id: "svc-tv-essentials".into(),
                    service_name: "TV Essentials".into(),
                    service_type: "TV".into(),
                    monthly_price: 59.99,
                    setup_fee: 25.0,
                    contract_length_months: 12,
                },
                ServiceConfig {
                    service_id: "svc-tv-premium".into(),
                    service_name: "TV Premium".into(),
                    service_type: "TV".into(),
                    monthly_price: 89.99,
                    setup_fee: 25.0,
                    contract_length_months: 24,
                },
                ServiceConfig {
                    service_id: "svc-double-play".into(),
                    service_name: "Double Play".into(),
                    service_type: "Bundle".into(),
                    monthly_price: 99.99,
                    setup_fee: 75.0,
                    contract_length_months: 24,
                },
                ServiceConfig {
                    service_id: "svc-triple-play".into(),
                    service_name: "Triple Play".into(),
                    service_type: "Bundle".into(),
                    monthly_price: 129.99,
                    setup_fee: 99.0,
                    contract_length_months: 24,
                },
            ],
        }
    }
}

impl GeneratorConfig {
    /// Small population for unit and integration tests.
    pub fn default_test() -> Self {
        Self {
            customer_count: 50,
            ..Self::default()
        }
    }

    /// Load a full config override from a JSON file.
    pub fn load(path: &str) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| anyhow::anyhow!("Cannot read {path}: {e}"))?;
        let config: GeneratorConfig = serde_json::from_str(&content)?;
        Ok(config)
    }

    /// Structural sanity checks, run once before seeding.
    pub fn validate(&self) -> crate::error::DataResult<()> {
        use crate::error::DataError;
        if self.services.is_empty() {
            return Err(DataError::EmptyCatalog);
        }
        let probs = [
            ("premium_threshold", self.premium_threshold),
            ("standard_threshold", self.standard_threshold),
            ("churn_probability", self.churn_probability),
            ("paperless_probability", self.paperless_probability),
            ("usage_emission_probability", self.usage_emission_probability),
            ("data_usage_null_rate", self.data_usage_null_rate),
            ("payment_success_probability", self.payment_success_probability),
            ("payment_failed_probability", self.payment_failed_probability),
            ("late_fee_probability", self.late_fee_probability),
        ];
        for (name, p) in probs {
            if !(0.0..=1.0).contains(&p) {
                return Err(DataError::Config {
                    reason: format!("{name} = {p} is not a probability"),
                });
            }
        }
        if self.payment_success_probability + self.payment_failed_probability > 1.0 {
            return Err(DataError::Config {
                reason: "payment status probabilities exceed 1.0".into(),
            });
        }
        if self.churn_offset_min_days > self.churn_offset_max_days {
            return Err(DataError::Config {
                reason: "churn offset range is inverted".into(),
            });
        }
        Ok(())
    }
}
