//! Adhera — Adherence Analytics Pipeline Demo CLI
//!
//! Runs the synthetic-cohort pipeline end to end: generate a cohort,
//! persist it through the store boundary, aggregate adherence statistics,
//! and print the dashboard tables the visualization collaborator consumes.
//!
//! Usage:
//!   cargo run -p demo -- generate
//!   cargo run -p demo -- report
//!   cargo run -p demo -- report --patients 50 --threshold 80 --out report.json
//!   cargo run -p demo -- --config pipeline.toml report

use std::fs::File;
use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use adhera_analytics::{AdherenceCategory, AdherenceReport, PatientSummary};
use adhera_cohort::generate_seeded;
use adhera_contracts::config::PipelineConfig;
use adhera_contracts::error::{AdheraError, AdheraResult};
use adhera_contracts::run::RunId;
use adhera_store::{CohortStore, InMemoryStore};

// ── CLI definition ────────────────────────────────────────────────────────────

/// Adhera — synthetic medication-adherence analytics pipeline.
///
/// Generates a reproducible synthetic cohort, persists it through the
/// relational-store boundary, and derives per-patient adherence summaries
/// and the intervention shortlist.
#[derive(Parser)]
#[command(
    name = "adhera",
    about = "Adhera adherence analytics pipeline demo",
    long_about = "Runs the Adhera pipeline: deterministic cohort generation,\n\
                  store persistence, and adherence aggregation with an\n\
                  intervention shortlist for digital outreach planning."
)]
struct Cli {
    /// Optional TOML configuration file; CLI flags override its values.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Seed for the generator's pseudo-random stream.
    #[arg(long, global = true)]
    seed: Option<u64>,

    /// Number of patients to generate.
    #[arg(long, global = true)]
    patients: Option<u32>,

    /// Adherence percentage below which a patient becomes an
    /// intervention candidate.
    #[arg(long, global = true)]
    threshold: Option<f64>,

    /// Maximum length of the intervention shortlist.
    #[arg(long, global = true)]
    limit: Option<usize>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Generate a cohort and persist it; print table counts.
    Generate,
    /// Full pipeline: generate, persist, aggregate, print the dashboard
    /// tables; optionally export the report as JSON.
    Report {
        /// Write the full report to this path as JSON.
        #[arg(long)]
        out: Option<PathBuf>,
    },
}

// ── Entry point ───────────────────────────────────────────────────────────────

fn main() {
    // Initialize structured logging.  Set RUST_LOG=debug for verbose output.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_target(false)
        .compact()
        .init();

    let cli = Cli::parse();

    print_banner();

    let result = resolve_config(&cli).and_then(|config| match &cli.command {
        Command::Generate => run_generate(&config),
        Command::Report { out } => run_report(&config, out.as_deref()),
    });

    if let Err(e) = result {
        eprintln!("Pipeline error: {}", e);
        std::process::exit(1);
    }
}

/// Layer the configuration: defaults, then the TOML file, then CLI flags.
///
/// The merged configuration is validated before anything runs.
fn resolve_config(cli: &Cli) -> AdheraResult<PipelineConfig> {
    let mut config = match &cli.config {
        Some(path) => PipelineConfig::from_file(path)?,
        None => PipelineConfig::default(),
    };
    if let Some(seed) = cli.seed {
        config.seed = seed;
    }
    if let Some(patients) = cli.patients {
        config.n_patients = patients;
    }
    if let Some(threshold) = cli.threshold {
        config.intervention_threshold = threshold;
    }
    if let Some(limit) = cli.limit {
        config.intervention_limit = limit;
    }
    config.validate()?;
    Ok(config)
}

// ── Subcommands ───────────────────────────────────────────────────────────────

fn run_generate(config: &PipelineConfig) -> AdheraResult<()> {
    println!(
        "[INFO] Generating synthetic adherence data for {} patients (seed {})...",
        config.n_patients, config.seed
    );

    let cohort = generate_seeded(config)?;
    let store = InMemoryStore::new();
    store.save_cohort(&cohort)?;

    let (patients, medications, dose_records) = store.table_counts()?;
    println!("[SUCCESS] Cohort persisted:");
    println!("  patients:     {}", patients);
    println!("  medications:  {}", medications);
    println!("  dose records: {}", dose_records);
    Ok(())
}

fn run_report(config: &PipelineConfig, out: Option<&std::path::Path>) -> AdheraResult<()> {
    let run_id = RunId::new();
    println!(
        "[INFO] Pipeline run {} — {} patients, seed {}",
        run_id, config.n_patients, config.seed
    );

    let cohort = generate_seeded(config)?;
    let store = InMemoryStore::new();
    store.save_cohort(&cohort)?;

    // Aggregation always runs over the loaded dataset, never the store.
    let loaded = store.load_cohort()?;
    let report = AdherenceReport::build(run_id, config, &loaded)?;

    print_adherence_trends(&report);
    print_intervention_candidates(&report, config);
    print_condition_table(&report);
    print_drug_table(&report);
    print_summary_footer(&report);

    if let Some(path) = out {
        let file = File::create(path).map_err(|e| AdheraError::StoreWrite {
            reason: format!("failed to create report file '{}': {}", path.display(), e),
        })?;
        serde_json::to_writer_pretty(file, &report).map_err(|e| AdheraError::StoreWrite {
            reason: format!("failed to serialize report: {}", e),
        })?;
        println!("\n[SUCCESS] Report exported to {}", path.display());
    }

    Ok(())
}

// ── Report rendering ──────────────────────────────────────────────────────────

fn fmt_avg(avg: Option<f64>) -> String {
    match avg {
        Some(v) => format!("{:6.1}", v),
        None => "   n/a".to_string(),
    }
}

fn print_patient_rows(rows: &[PatientSummary]) {
    println!(
        "  {:>10}  {:>3}  {:<14}  {:>6}  {:>8}  {:<9}",
        "patient_id", "age", "condition", "avg%", "num_meds", "category"
    );
    for row in rows {
        println!(
            "  {:>10}  {:>3}  {:<14}  {}  {:>8}  {:<9}",
            row.patient_id,
            row.age,
            row.chronic_condition.label(),
            fmt_avg(row.avg_adherence),
            row.num_medications,
            row.adherence_category
                .map(|c| c.label())
                .unwrap_or("n/a"),
        );
    }
}

fn print_adherence_trends(report: &AdherenceReport) {
    println!("\n[ANALYSIS] Patient Adherence Trends");
    println!("\nTop 10 Compliant Patients (High Adherence):");
    let top = &report.patient_summary[..report.patient_summary.len().min(10)];
    print_patient_rows(top);

    println!("\nAdherence Category Distribution:");
    let dist = &report.category_distribution;
    let total = dist.total().max(1);
    for category in AdherenceCategory::ALL {
        let count = dist.count(category);
        println!(
            "  {}: {} patients ({:.1}%)",
            category.label(),
            count,
            count as f64 / total as f64 * 100.0
        );
    }
    if dist.unscored > 0 {
        println!(
            "  Unscored (no dose records): {} patients ({:.1}%)",
            dist.unscored,
            dist.unscored as f64 / total as f64 * 100.0
        );
    }
}

fn print_intervention_candidates(report: &AdherenceReport, config: &PipelineConfig) {
    println!("\n[INTERVENTION] Patients Requiring Digital Intervention");
    println!(
        "\nIdentified {} patients with poor adherence (<{}%)",
        report.intervention_list.len(),
        config.intervention_threshold
    );
    print_patient_rows(&report.intervention_list);
}

fn print_condition_table(report: &AdherenceReport) {
    println!("\nAverage Adherence by Chronic Condition:");
    for row in &report.condition_summary {
        println!(
            "  {:<14} {}",
            row.chronic_condition.label(),
            fmt_avg(row.avg_adherence)
        );
    }
}

fn print_drug_table(report: &AdherenceReport) {
    println!("\nMedication Distribution:");
    for row in &report.drug_summary {
        println!("  {:<14} {:>5}", row.drug_name.label(), row.count);
    }
}

fn print_summary_footer(report: &AdherenceReport) {
    let ages: Vec<u8> = report.patient_summary.iter().map(|s| s.age).collect();
    println!("\n{}", "=".repeat(70));
    println!("[SUMMARY] Dashboard Insights:");
    println!("  - Total Patients Analyzed: {}", report.n_patients);
    println!(
        "  - Patients Needing Intervention: {}",
        report.intervention_list.len()
    );
    println!(
        "  - Average System Adherence: {}%",
        report
            .overall_average
            .map(|v| format!("{:.1}", v))
            .unwrap_or_else(|| "n/a".to_string())
    );
    if let (Some(min), Some(max)) = (ages.iter().min(), ages.iter().max()) {
        let mean = ages.iter().map(|&a| f64::from(a)).sum::<f64>() / ages.len() as f64;
        println!(
            "  - Patient Age Range: {}–{} (mean {:.1})",
            min, max, mean
        );
    }
    println!("{}", "=".repeat(70));
}

// ── Banner ────────────────────────────────────────────────────────────────────

fn print_banner() {
    println!();
    println!("ADHERA — Adherence Analytics Pipeline");
    println!("Synthetic Cohort & Intervention Planning Demo");
    println!("=============================================");
    println!();
    println!("Pipeline stages per run:");
    println!("  [1] Deterministic cohort generation from a seeded random stream");
    println!("  [2] Persistence through the append-only store boundary");
    println!("  [3] Left-outer per-patient adherence aggregation");
    println!("  [4] Intervention shortlist + condition/drug roll-ups");
    println!();
}
