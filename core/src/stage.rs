//! Generator stage trait.
//!
//! RULE: Every generator stage implements SeedStage. The engine calls
//! run() on each registered stage exactly once, in registration order.
//! Execution order is fixed and documented in engine.rs.

use crate::{clock::DatasetClock, error::DataResult, rng::StageRng, store::DataStore};

/// Row counts reported by one stage run.
#[derive(Debug, Clone, Copy, Default)]
pub struct StageReport {
    pub inserted: usize,
    /// Rows deliberately not written: duplicate-email skips for the
    /// customer stage, emission-dropped months for the usage stage.
    pub skipped: usize,
}

/// The contract every generator stage fulfills.
pub trait SeedStage {
    /// Unique stable name for this stage.
    fn name(&self) -> &'static str;

    /// Called once per seeding run by the engine.
    ///
    /// - `store`: the only path to the database
    /// - `clock`: the run's anchor date
    /// - `rng`:   this stage's deterministic stream
    fn run(
        &mut self,
        store: &DataStore,
        clock: &DatasetClock,
        rng: &mut StageRng,
    ) -> DataResult<StageReport>;
}
