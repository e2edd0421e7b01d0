//! Billing stage: one payment per calendar month from subscription
//! start to churn-or-today. Status lands 85% Success / 10% Failed /
//! 5% Pending; a 5% late fee applies with probability 0.15.

use crate::{
    clock::{month_steps, DatasetClock},
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
pub struct PaymentRecord {
    pub customer_id: CustomerId,
    pub payment_date: NaiveDate,
    pub amount: f64,
    pub status: String,
    pub late_fee: f64,
}

pub struct PaymentStage {
    config: GeneratorConfig,
}

impl PaymentStage {
    pub fn new(config: GeneratorConfig) -> Self {
        Self { config }
    }

    fn draw_status(&self, rng: &mut StageRng) -> &'static str {
        let roll = rng.next_f64();
        if roll < self.config.payment_success_probability {
            "Success"
        } else if roll
            < self.config.payment_success_probability + self.config.payment_failed_probability
        {
            "Failed"
        } else {
            "Pending"
        }
    }

    fn generate_row(
        &self,
        customer_id: &str,
        payment_date: NaiveDate,
        monthly_charges: f64,
        rng: &mut StageRng,
    ) -> PaymentRecord {
        let status = self.draw_status(rng).to_string();
        let late_fee = if rng.chance(self.config.late_fee_probability) {
            monthly_charges * self.config.late_fee_rate
        } else {
            0.0
        };
        PaymentRecord {
            customer_id: customer_id.to_string(),
            payment_date,
            amount: monthly_charges,
            status,
            late_fee,
        }
    }
}

impl SeedStage for PaymentStage {
    fn name(&self) -> &'static str {
        "payment"
    }

    fn run(
        &mut self,
        store: &DataStore,
        clock: &DatasetClock,
        rng: &mut StageRng,
    ) -> DataResult<StageReport> {
        let subscriptions = store.all_subscriptions()?;
        let today = clock.today();

        let mut report = StageReport::default();
        for sub in &subscriptions {
            let billing_end = sub.churn_date.unwrap_or(today);
            for payment_date in month_steps(sub.start_date, billing_end) {
                let row = self.generate_row(
                    &sub.customer_id,
                    payment_date,
                    sub.monthly_charges,
                    rng,
                );
                store.insert_payment(&row)?;
                report.inserted += 1;
            }
        }
        Ok(report)
    }
}
