//! Usage telemetry stage.
//!
//! One candidate row per calendar month inside the window
//! [max(subscription start, today - 12 months), min(churn-or-today,
//! today)]. Two independent missingness mechanisms apply: a month is
//! emitted with p = 0.8 at all, and an emitted row's data_usage_gb is
//! nulled with p = 0.1. Satisfaction scores drop to 1-3 inside the 30
//! days before churn and sit at 3-10 otherwise.

use crate::{
    clock::{days_between, month_steps, DatasetClock},
    config::GeneratorConfig,
    error::DataResult,
    rng::StageRng,
    stage::{SeedStage, StageReport},
    store::DataStore,
    types::CustomerId,
};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UsageMetricRecord {
    pub customer_id: CustomerId,
    pub record_date: NaiveDate,
    pub data_usage_gb: Option<f64>,
    pub call_minutes: f64,
    pub support_tickets: i64,
    pub website_visits: i64,
    pub app_logins: i64,
    pub satisfaction_score: i64,
}

pub struct UsageStage {
    config: GeneratorConfig,
}

impl UsageStage {
    pub fn new(config: GeneratorConfig) -> Self {
        Self { config }
    }

    fn in_pre_churn_window(&self, record_date: NaiveDate, churn_date: Option<NaiveDate>) -> bool {
        match churn_date {
            Some(cd) => {
                let days_to_churn = days_between(record_date, cd);
                (0..=self.config.pre_churn_window_days).contains(&days_to_churn)
            }
            None => false,
        }
    }

    fn generate_row(
        &self,
        customer_id: &str,
        record_date: NaiveDate,
        churn_date: Option<NaiveDate>,
        rng: &mut StageRng,
    ) -> UsageMetricRecord {
        let data_usage_gb = if rng.chance(self.config.data_usage_null_rate) {
            None
        } else {
            let (lo, hi) = self.config.data_usage_range_gb;
            Some(rng.uniform_in(lo, hi))
        };
        let (call_lo, call_hi) = self.config.call_minutes_range;

        let satisfaction_score = if self.in_pre_churn_window(record_date, churn_date) {
            rng.int_between(1, 3)
        } else {
            rng.int_between(3, 10)
        };

        UsageMetricRecord {
            customer_id: customer_id.to_string(),
            record_date,
            data_usage_gb,
            call_minutes: rng.uniform_in(call_lo, call_hi),
            support_tickets: rng.int_between(0, self.config.support_tickets_max),
            website_visits: rng.int_between(0, self.config.website_visits_max),
            app_logins: rng.int_between(0, self.config.app_logins_max),
            satisfaction_score,
        }
    }
}

impl SeedStage for UsageStage {
    fn name(&self) -> &'static str {
        "usage"
    }

    fn run(
        &mut self,
        store: &DataStore,
        clock: &DatasetClock,
        rng: &mut StageRng,
    ) -> DataResult<StageReport> {
        let subscriptions = store.all_subscriptions()?;
        let today = clock.today();
        let lookback_start = clock.months_ago(self.config.usage_window_months);

        let mut report = StageReport::default();
        for sub in &subscriptions {
            let window_start = sub.start_date.max(lookback_start);
            let window_end = sub.churn_date.unwrap_or(today).min(today);

            for record_date in month_steps(window_start, window_end) {
                if !rng.chance(self.config.usage_emission_probability) {
                    report.skipped += 1;
                    continue;
                }
                let row =
                    self.generate_row(&sub.customer_id, record_date, sub.churn_date, rng);
                store.insert_usage_metric(&row)?;
                report.inserted += 1;
            }
        }
        Ok(report)
    }
}
