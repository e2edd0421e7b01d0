//! The seeding engine — drives one batch construction of the dataset.
//!
//! EXECUTION ORDER (fixed, documented, never reordered):
//!   1. Catalog stage       (static service reference data)
//!   2. Customer stage      (population + demographics + segments)
//!   3. Subscription stage  (one per customer, churn simulation)
//!   4. Usage stage         (monthly telemetry, two missingness draws)
//!   5. Payment stage       (monthly billing events)
//!
//! RULES:
//!   - Stages execute in registration order, exactly once per run.
//!   - Later stages read earlier stages' output only through the store.
//!   - All randomness flows through the RngBank.

use crate::{
    catalog_stage::CatalogStage,
    clock::DatasetClock,
    config::GeneratorConfig,
    customer_stage::CustomerStage,
    error::DataResult,
    payment_stage::PaymentStage,
    rng::{RngBank, StageSlot},
    stage::SeedStage,
    store::DataStore,
    subscription_stage::SubscriptionStage,
    types::DatasetId,
    usage_stage::UsageStage,
};

/// Row counts for one completed seeding run.
#[derive(Debug, Clone, Default)]
pub struct SeedSummary {
    pub dataset_id: DatasetId,
    pub services: usize,
    pub customers: usize,
    pub customers_skipped: usize,
    pub subscriptions: usize,
    pub usage_rows: usize,
    pub usage_months_dropped: usize,
    pub payments: usize,
}

pub struct SeedEngine {
    dataset_id: DatasetId,
    seed: u64,
    customer_count: usize,
    clock: DatasetClock,
    rng_bank: RngBank,
    stages: Vec<(StageSlot, Box<dyn SeedStage>)>,
    store: DataStore,
}

impl SeedEngine {
    /// Build a fully wired engine with all stages registered.
    pub fn build(
        store: DataStore,
        config: GeneratorConfig,
        clock: DatasetClock,
        seed: u64,
    ) -> DataResult<Self> {
        config.validate()?;
        let mut engine = Self {
            dataset_id: uuid::Uuid::new_v4().to_string(),
            seed,
            customer_count: config.customer_count,
            clock,
            rng_bank: RngBank::new(seed),
            stages: Vec::new(),
            store,
        };
        // EXECUTION ORDER — fixed, documented, never reordered.
        engine.register(StageSlot::Catalog, Box::new(CatalogStage::new(config.clone())));
        engine.register(StageSlot::Customer, Box::new(CustomerStage::new(config.clone())));
        engine.register(
            StageSlot::Subscription,
            Box::new(SubscriptionStage::new(config.clone())),
        );
        engine.register(StageSlot::Usage, Box::new(UsageStage::new(config.clone())));
        engine.register(StageSlot::Payment, Box::new(PaymentStage::new(config)));
        Ok(engine)
    }

    /// In-memory engine with the small test config (used in tests).
    pub fn build_test(seed: u64) -> DataResult<Self> {
        let store = DataStore::in_memory()?;
        store.migrate()?;
        Self::build(store, GeneratorConfig::default_test(), DatasetClock::now(), seed)
    }

    fn register(&mut self, slot: StageSlot, stage: Box<dyn SeedStage>) {
        self.stages.push((slot, stage));
    }

    /// Run every stage once, in order. Records provenance first so a
    /// partially failed run is still attributable.
    pub fn run(&mut self) -> DataResult<SeedSummary> {
        self.store.insert_seed_run(
            &self.dataset_id,
            self.seed,
            self.customer_count,
            env!("CARGO_PKG_VERSION"),
        )?;

        let mut summary = SeedSummary {
            dataset_id: self.dataset_id.clone(),
            ..SeedSummary::default()
        };

        for (slot, stage) in &mut self.stages {
            let mut rng = self.rng_bank.for_stage(*slot);
            let report = stage.run(&self.store, &self.clock, &mut rng)?;
            log::info!(
                "stage {}: {} inserted, {} skipped",
                stage.name(),
                report.inserted,
                report.skipped
            );
            match slot {
                StageSlot::Catalog => summary.services = report.inserted,
                StageSlot::Customer => {
                    summary.customers = report.inserted;
                    summary.customers_skipped = report.skipped;
                }
                StageSlot::Subscription => summary.subscriptions = report.inserted,
                StageSlot::Usage => {
                    summary.usage_rows = report.inserted;
                    summary.usage_months_dropped = report.skipped;
                }
                StageSlot::Payment => summary.payments = report.inserted,
            }
        }
        Ok(summary)
    }

    pub fn store(&self) -> &DataStore {
        &self.store
    }

    pub fn clock(&self) -> &DatasetClock {
        &self.clock
    }

    pub fn dataset_id(&self) -> &str {
        &self.dataset_id
    }
}
