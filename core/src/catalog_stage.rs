//! Seeds the static service catalog. Reference data only: created
//! once, never mutated afterwards.

use crate::{
    clock::DatasetClock,
    config::GeneratorConfig,
    error::DataResult,
    rng::StageRng,
    stage::{SeedStage, StageReport},
    store::DataStore,
};

pub struct CatalogStage {
    config: GeneratorConfig,
}

impl CatalogStage {
    pub fn new(config: GeneratorConfig) -> Self {
        Self { config }
    }
}

impl SeedStage for CatalogStage {
    fn name(&self) -> &'static str {
        "catalog"
    }

    fn run(
        &mut self,
        store: &DataStore,
        _clock: &DatasetClock,
        _rng: &mut StageRng,
    ) -> DataResult<StageReport> {
        let mut report = StageReport::default();
        for service in &self.config.services {
            store.insert_service(service)?;
            report.inserted += 1;
        }
        Ok(report)
    }
}
