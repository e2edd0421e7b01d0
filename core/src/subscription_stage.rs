//! Subscription stage: one subscription per customer.
//!
//! The schema allows multiple subscriptions per customer (the old
//! uniqueness constraint is gone), but the generator still emits
//! exactly one. Churn hits 27% of subscriptions with the churn date
//! 30-530 days after start; dates past today stay as-is.

use crate::{
    clock::{whole_months_between, DatasetClock},
    config::GeneratorConfig,
    error::DataResult,
    rng::StageRng,
    stage::{SeedStage, StageReport},
    store::DataStore,
    types::{CustomerId, ServiceId, SubscriptionId},
};
use chrono::{Duration, NaiveDate};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubscriptionRecord {
    pub subscription_id: SubscriptionId,
    pub customer_id: CustomerId,
    pub service_id: ServiceId,
    pub start_date: NaiveDate,
    /// Never populated by the generator; the valid_dates constraint
    /// covers it anyway.
    pub end_date: Option<NaiveDate>,
    pub monthly_charges: f64,
    pub total_charges: f64,
    pub payment_method: String,
    pub paperless_billing: bool,
    pub is_active: bool,
    pub churn_date: Option<NaiveDate>,
    pub churn_reason: Option<String>,
}

pub struct SubscriptionStage {
    config: GeneratorConfig,
}

impl SubscriptionStage {
    pub fn new(config: GeneratorConfig) -> Self {
        Self { config }
    }

    /// monthly_charges x whole months from start to churn-or-today,
    /// floored at one month. The floor is the policy for zero or
    /// negative elapsed time and must hold exactly.
    pub fn total_charges(
        monthly_charges: f64,
        start: NaiveDate,
        churn_date: Option<NaiveDate>,
        today: NaiveDate,
    ) -> f64 {
        let end = churn_date.unwrap_or(today);
        let months = whole_months_between(start, end).max(1);
        monthly_charges * months as f64
    }
}

impl SeedStage for SubscriptionStage {
    fn name(&self) -> &'static str {
        "subscription"
    }

    fn run(
        &mut self,
        store: &DataStore,
        clock: &DatasetClock,
        rng: &mut StageRng,
    ) -> DataResult<StageReport> {
        let customers = store.all_customers()?;
        let services = store.all_services()?;
        if services.is_empty() {
            return Err(crate::error::DataError::EmptyCatalog);
        }

        let mut report = StageReport::default();
        for (idx, customer) in customers.iter().enumerate() {
            let service = rng.pick(&services);
            let start_date = customer.signup_date;

            let churn_date = if rng.chance(self.config.churn_probability) {
                let offset = rng.int_between(
                    self.config.churn_offset_min_days,
                    self.config.churn_offset_max_days,
                );
                Some(start_date + Duration::days(offset))
            } else {
                None
            };

            let monthly_charges = service.monthly_price;
            let total_charges =
                Self::total_charges(monthly_charges, start_date, churn_date, clock.today());

            let churn_reason = churn_date
                .is_some()
                .then(|| rng.pick(&self.config.churn_reasons).clone());

            let record = SubscriptionRecord {
                subscription_id: format!("s-{idx:06}"),
                customer_id: customer.customer_id.clone(),
                service_id: service.service_id.clone(),
                start_date,
                end_date: None,
                monthly_charges,
                total_charges,
                payment_method: rng.pick(&self.config.payment_methods).clone(),
                paperless_billing: rng.chance(self.config.paperless_probability),
                is_active: churn_date.is_none(),
                churn_date,
                churn_reason,
            };
            store.insert_subscription(&record)?;
            report.inserted += 1;
        }
        Ok(report)
    }
}
