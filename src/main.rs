//! keyorder_bench - primary-key ordering benchmark
//!
//! ```text
//! ┌──────────┐    ┌─────────────┐    ┌──────────┐    ┌──────────────┐
//! │  Config  │───▶│ IdGenerator │───▶│  Store   │───▶│ Read back x2 │
//! │  (YAML)  │    │ (pre-insert)│    │ (insert) │    │ + compare    │
//! └──────────┘    └─────────────┘    └──────────┘    └──────────────┘
//! ```
//!
//! Usage:
//!   keyorder_bench [--env dev] [--mode ordering|workload] [--strategy random|time_ordered]
//!                  [--records N] [--delay-ms MS] [--samples N] [--seed S]
//!                  [--database-url URL] [--store postgres|memory] [--json]

use keyorder_bench::bench::{SystemClock, run_ordering_bench, run_workload};
use keyorder_bench::config::{AppConfig, ConfigError};
use keyorder_bench::db::Database;
use keyorder_bench::error::BenchError;
use keyorder_bench::id::{IdGenerator, IdStrategy};
use keyorder_bench::store::{MemoryStore, PgStore, RecordStore};

// ============================================================
// COMMAND LINE
// ============================================================

fn get_arg(names: &[&str]) -> Option<String> {
    let args: Vec<String> = std::env::args().collect();
    for i in 0..args.len() {
        if names.contains(&args[i].as_str()) && i + 1 < args.len() {
            return Some(args[i + 1].clone());
        }
    }
    None
}

fn has_flag(name: &str) -> bool {
    std::env::args().any(|a| a == name)
}

fn get_env() -> String {
    get_arg(&["--env", "-e"]).unwrap_or_else(|| "dev".to_string())
}

fn parse_arg<T: std::str::FromStr>(name: &str) -> Result<Option<T>, ConfigError> {
    match get_arg(&[name]) {
        Some(raw) => raw
            .parse()
            .map(Some)
            .map_err(|_| ConfigError::Invalid(format!("{} expects a number, got '{}'", name, raw))),
        None => Ok(None),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mode {
    Ordering,
    Workload,
}

fn get_mode() -> Result<Mode, ConfigError> {
    match get_arg(&["--mode"]).as_deref() {
        None | Some("ordering") => Ok(Mode::Ordering),
        Some("workload") => Ok(Mode::Workload),
        Some(other) => Err(ConfigError::Invalid(format!(
            "unknown mode '{}', expected ordering|workload",
            other
        ))),
    }
}

fn use_memory_store() -> Result<bool, ConfigError> {
    match get_arg(&["--store"]).as_deref() {
        None | Some("postgres") => Ok(false),
        Some("memory") => Ok(true),
        Some(other) => Err(ConfigError::Invalid(format!(
            "unknown store '{}', expected postgres|memory",
            other
        ))),
    }
}

/// Command line values win over the YAML file
fn apply_overrides(config: &mut AppConfig) -> Result<(), ConfigError> {
    if let Some(raw) = get_arg(&["--strategy"]) {
        config.bench.strategy = raw.parse::<IdStrategy>().map_err(ConfigError::Invalid)?;
    }
    if let Some(records) = parse_arg("--records")? {
        config.bench.ordering.records = records;
    }
    if let Some(delay_ms) = parse_arg("--delay-ms")? {
        config.bench.ordering.delay_ms = delay_ms;
    }
    if let Some(samples) = parse_arg("--samples")? {
        config.bench.workload.samples = samples;
    }
    if let Some(seed) = parse_arg("--seed")? {
        config.bench.seed = Some(seed);
    }
    if let Some(url) = get_arg(&["--database-url"]) {
        config.database.url = Some(url);
    }
    config.validate()
}

// ============================================================
// RUN
// ============================================================

async fn open_store(
    config: &AppConfig,
    memory: bool,
) -> Result<Box<dyn RecordStore>, BenchError> {
    if memory {
        tracing::info!("Using in-memory store (dry run, no database)");
        return Ok(Box::new(MemoryStore::new()));
    }

    let db = Database::open(&config.database).await?;
    Ok(Box::new(PgStore::from_database(&db)))
}

async fn run(config: &AppConfig, mode: Mode, memory: bool, json: bool) -> anyhow::Result<()> {
    let store = open_store(config, memory).await?;
    store.migrate().await?;

    let bench = &config.bench;
    let mut ids = match bench.seed {
        Some(seed) => {
            tracing::info!(seed, "Seeding id generator");
            IdGenerator::seeded(bench.strategy, seed)
        }
        None => IdGenerator::from_entropy(bench.strategy)?,
    };

    match mode {
        Mode::Ordering => {
            let report = run_ordering_bench(
                store.as_ref(),
                &SystemClock,
                &mut ids,
                &bench.ordering,
                bench.metrics_sample_rate,
            )
            .await?;
            report.log_summary();
            if json {
                println!("{}", serde_json::to_string_pretty(&report)?);
            }
        }
        Mode::Workload => {
            let report = run_workload(
                store.as_ref(),
                &SystemClock,
                &mut ids,
                &bench.workload,
                bench.metrics_sample_rate,
            )
            .await?;
            report.log_summary();
            if json {
                println!("{}", serde_json::to_string_pretty(&report)?);
            }
        }
    }
    Ok(())
}

// ============================================================
// MAIN
// ============================================================

#[tokio::main(flavor = "current_thread")]
async fn main() {
    let env = get_env();

    let setup = AppConfig::load(&env).and_then(|mut config| {
        apply_overrides(&mut config)?;
        let mode = get_mode()?;
        let memory = use_memory_store()?;
        Ok((config, mode, memory))
    });
    let (app_config, mode, memory) = match setup {
        Ok(v) => v,
        Err(e) => {
            eprintln!("❌ {}", e);
            std::process::exit(1);
        }
    };

    let log_guard = keyorder_bench::logging::init_logging(&app_config);
    tracing::info!("Starting keyorder_bench in {} env, {:?} mode", env, mode);
    app_config.warn_on_tight_delay();

    let code = match run(&app_config, mode, memory, has_flag("--json")).await {
        Ok(()) => 0,
        Err(e) => {
            tracing::error!("{:#}", e);
            1
        }
    };

    // Flush the file writer before exiting
    drop(log_guard);
    std::process::exit(code);
}
