//! Customer population stage.
//!
//! Uniform demographics over curated pools; signup dates uniform in a
//! three-year lookback offset 30 days from today; segment assignment
//! by two chained Bernoulli draws (see GeneratorConfig).

use crate::{
    clock::DatasetClock,
    config::GeneratorConfig,
    error::DataResult,
    name_generator::NameGenerator,
    rng::StageRng,
    stage::{SeedStage, StageReport},
    store::DataStore,
    types::CustomerId,
};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CustomerRecord {
    pub customer_id: CustomerId,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub age: i64,
    pub gender: String,
    pub city: String,
    pub state: String,
    pub country: String,
    pub signup_date: NaiveDate,
    pub customer_segment: String,
}

pub struct CustomerStage {
    config: GeneratorConfig,
}

impl CustomerStage {
    pub fn new(config: GeneratorConfig) -> Self {
        Self { config }
    }

    /// Sequential threshold assignment: the second draw happens only
    /// when the first misses, so effective shares are 20/32/48 — this
    /// is deliberate and must not become a single categorical draw.
    fn pick_segment(&self, rng: &mut StageRng) -> &'static str {
        if rng.chance(self.config.premium_threshold) {
            "Premium"
        } else if rng.chance(self.config.standard_threshold) {
            "Standard"
        } else {
            "Basic"
        }
    }

    fn generate_one(
        &self,
        ordinal: usize,
        clock: &DatasetClock,
        rng: &mut StageRng,
    ) -> CustomerRecord {
        let (first, last) = NameGenerator::full_name(rng);
        let email = NameGenerator::email(&first, &last, ordinal, rng);
        let phone = NameGenerator::phone(rng);
        let age = rng.int_between(18, 100);
        let gender = rng.pick(&self.config.genders).clone();
        let (city, state) = NameGenerator::city_state(rng);

        let offset = self.config.signup_min_age_days
            + rng.int_between(0, self.config.signup_window_days - 1);
        let signup_date = clock.days_ago(offset);

        let segment = self.pick_segment(rng);

        CustomerRecord {
            customer_id: format!("c-{ordinal:06}"),
            name: format!("{first} {last}"),
            email,
            phone,
            age,
            gender,
            city: city.to_string(),
            state: state.to_string(),
            country: "USA".to_string(),
            signup_date,
            customer_segment: segment.to_string(),
        }
    }
}

impl SeedStage for CustomerStage {
    fn name(&self) -> &'static str {
        "customer"
    }

    fn run(
        &mut self,
        store: &DataStore,
        clock: &DatasetClock,
        rng: &mut StageRng,
    ) -> DataResult<StageReport> {
        let mut report = StageReport::default();
        for i in 0..self.config.customer_count {
            let record = self.generate_one(i, clock, rng);
            if store.insert_customer(&record)? {
                report.inserted += 1;
            } else {
                // Duplicate email: silently skipped so a re-run over a
                // seeded database stays idempotent.
                log::debug!("customer {} skipped: email already present", record.customer_id);
                report.skipped += 1;
            }
        }
        Ok(report)
    }
}
