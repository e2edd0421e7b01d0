//! dataset-runner: headless seeding runner for churnlab.
//!
//! Usage:
//!   dataset-runner --seed 12345 --db churn.db
//!   dataset-runner --seed 12345 --customers 1000 --export-dir out/

use anyhow::Result;
use churnlab_core::{
    clock::DatasetClock, config::GeneratorConfig, engine::SeedEngine, store::DataStore,
};
use std::env;
use std::fs;
use std::io::Write;

#[derive(serde::Serialize)]
struct ExportManifest {
    dataset_id: String,
    seed: u64,
    generated_at: String,
    feature_rows: usize,
    segments: usize,
}

fn main() -> Result<()> {
    env_logger::init();

    let args: Vec<String> = env::args().collect();
    let seed = parse_arg(&args, "--seed", 42u64);
    let db = str_arg(&args, "--db").unwrap_or(":memory:");
    let config_path = str_arg(&args, "--config");
    let export_dir = str_arg(&args, "--export-dir");

    let mut config = match config_path {
        Some(path) => GeneratorConfig::load(path)?,
        None => GeneratorConfig::default(),
    };
    if let Some(n) = opt_arg::<usize>(&args, "--customers") {
        config.customer_count = n;
    }

    println!("churnlab — dataset-runner");
    println!("  seed:      {seed}");
    println!("  customers: {}", config.customer_count);
    println!("  db:        {db}");
    println!();

    let store = DataStore::open(db)?;
    store.migrate()?;

    let mut engine = SeedEngine::build(store, config, DatasetClock::now(), seed)?;
    let summary = engine.run()?;
    log::info!("seeding complete: dataset {}", summary.dataset_id);

    println!("Seeded dataset {}", summary.dataset_id);
    println!("  services:       {}", summary.services);
    println!(
        "  customers:      {} ({} skipped)",
        summary.customers, summary.customers_skipped
    );
    println!("  subscriptions:  {}", summary.subscriptions);
    println!(
        "  usage rows:     {} ({} months dropped)",
        summary.usage_rows, summary.usage_months_dropped
    );
    println!("  payments:       {}", summary.payments);
    println!();

    print_churn_analysis(&engine)?;

    if let Some(dir) = export_dir {
        export(&engine, seed, dir)?;
    }

    Ok(())
}

fn print_churn_analysis(engine: &SeedEngine) -> Result<()> {
    println!("Churn analysis by segment:");
    println!("  {:<10} {:>6} {:>8} {:>8} {:>12} {:>12}", "segment", "total", "churned", "rate%", "avg LTV", "avg tenure");
    for row in engine.store().churn_analysis()? {
        println!(
            "  {:<10} {:>6} {:>8} {:>8.2} {:>12.2} {:>12.2}",
            row.customer_segment,
            row.total_customers,
            row.churned_customers,
            row.churn_rate_pct,
            row.avg_ltv,
            row.avg_tenure_days,
        );
    }
    println!();

    let features = engine.store().customer_risk_features()?;
    let mut high = 0usize;
    let mut medium = 0usize;
    let mut low = 0usize;
    for row in &features {
        match row.risk_category {
            churnlab_core::features::RiskCategory::High => high += 1,
            churnlab_core::features::RiskCategory::Medium => medium += 1,
            churnlab_core::features::RiskCategory::Low => low += 1,
        }
    }
    println!("Risk categories: {high} high / {medium} medium / {low} low");
    println!();
    Ok(())
}

fn export(engine: &SeedEngine, seed: u64, dir: &str) -> Result<()> {
    fs::create_dir_all(dir)?;

    let features = engine.store().customer_risk_features()?;
    let features_path = format!("{dir}/customer_risk_features.jsonl");
    let mut file = fs::File::create(&features_path)?;
    for row in &features {
        writeln!(file, "{}", serde_json::to_string(row)?)?;
    }

    let analysis = engine.store().churn_analysis()?;
    fs::write(
        format!("{dir}/churn_analysis.json"),
        serde_json::to_string_pretty(&analysis)?,
    )?;

    let manifest = ExportManifest {
        dataset_id: engine.dataset_id().to_string(),
        seed,
        generated_at: chrono::Utc::now().to_rfc3339(),
        feature_rows: features.len(),
        segments: analysis.len(),
    };
    fs::write(
        format!("{dir}/manifest.json"),
        serde_json::to_string_pretty(&manifest)?,
    )?;

    println!("Exported {} feature rows to {features_path}", features.len());
    Ok(())
}

fn parse_arg<T: std::str::FromStr>(args: &[String], flag: &str, default: T) -> T {
    opt_arg(args, flag).unwrap_or(default)
}

fn opt_arg<T: std::str::FromStr>(args: &[String], flag: &str) -> Option<T> {
    args.windows(2)
        .find(|w| w[0] == flag)
        .and_then(|w| w[1].parse().ok())
}

fn str_arg<'a>(args: &'a [String], flag: &str) -> Option<&'a str> {
    args.windows(2).find(|w| w[0] == flag).map(|w| w[1].as_str())
}
