mod costing;
mod inputs;
mod io;
mod power;
mod registry;
mod report;
mod sensitivity;
mod validate;

#[cfg(test)]
mod tests;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::fs;
use std::time::Instant;

use inputs::{Inputs, MachineType};
use report::{create_manifest, create_summary, print_run, print_sensitivity};

#[derive(Parser, Debug)]
#[command(name = "fusecost")]
#[command(version)]
#[command(about = "fusecost - Fusion power plant cost and LCOE model with sensitivity analysis")]
struct Args {
    #[command(subcommand)]
    command: Commands,

    /// Machine family for built-in cases
    #[arg(short, long, global = true, value_enum, default_value = "mfe")]
    machine: MachineType,

    /// Built-in case name
    #[arg(long, global = true, default_value = "catf_baseline")]
    case: String,

    /// Path to a TOML plant configuration (overrides --machine/--case)
    #[arg(short, long, global = true)]
    config: Option<String>,

    /// Output path (CSV; JSON bundle lands next to it)
    #[arg(short, long, global = true)]
    out: Option<String>,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Evaluate the cost model once and report the breakdown
    Run {
        /// Generate JSON manifest and result bundle
        #[arg(long)]
        json: bool,
    },
    /// Rank every numeric input by its finite-difference LCOE elasticity
    Sensitivity {
        /// Relative perturbation applied to each parameter
        #[arg(long, default_value = "0.01")]
        fraction: f64,
        /// Use central instead of forward differencing (2x evaluations)
        #[arg(long)]
        central: bool,
        /// Suppress per-parameter progress output
        #[arg(long)]
        quiet: bool,
        /// Generate JSON outputs
        #[arg(long)]
        json: bool,
    },
    /// Check a configuration and list every problem found
    Validate,
    /// Print version information
    Version,
}

/// Resolve the plant configuration: an explicit file wins over the built-in
/// case registry. Returns the inputs plus the text hashed into the manifest.
fn resolve_inputs(args: &Args) -> Result<(Inputs, String, String)> {
    match &args.config {
        Some(path) => {
            let (inputs, text) = io::load_toml(path)?;
            Ok((inputs, text, path.clone()))
        }
        None => {
            let inputs = registry::builtin(args.machine, &args.case)?;
            let text = toml::to_string(&inputs).context("failed to serialize built-in case")?;
            Ok((inputs, text, args.case.clone()))
        }
    }
}

fn print_warnings(report: &validate::ValidationReport) {
    for warning in report.surfaced_warnings() {
        eprintln!("[fusecost] warning: {}: {}", warning.path, warning.message);
    }
}

fn run_once(inputs: &Inputs, cfg_text: &str, case: &str, out_path: &str, json_output: bool) -> Result<()> {
    let report = validate::ensure_valid(inputs)?;
    print_warnings(&report);

    let start = Instant::now();
    let result = costing::evaluate(inputs)?;
    let wall_time_ms = start.elapsed().as_secs_f64() * 1000.0;

    let mut w = io::CsvWriter::create(out_path)?;
    w.write_costs(&result)?;
    w.flush()?;

    print_run(&result);

    if json_output {
        let json_path = out_path.replace(".csv", ".json");
        let bundle = report::RunBundle {
            manifest: create_manifest(inputs, case, cfg_text),
            summary: create_summary(&result, wall_time_ms),
            result,
        };
        let json = serde_json::to_string_pretty(&bundle)?;
        fs::write(&json_path, json)?;
        eprintln!("[fusecost] JSON bundle: {}", json_path);
    }

    Ok(())
}

fn run_sensitivity(
    inputs: &Inputs,
    cfg_text: &str,
    case: &str,
    out_path: &str,
    fraction: f64,
    scheme: sensitivity::Differencing,
    quiet: bool,
    json_output: bool,
) -> Result<()> {
    let report = validate::ensure_valid(inputs)?;
    print_warnings(&report);

    let baseline = costing::evaluate(inputs).context("baseline evaluation failed")?;

    let start = Instant::now();
    let result = sensitivity::analyze(
        inputs,
        |perturbed: &Inputs| costing::evaluate(perturbed).map(|r| r.lcoe.c1000000),
        fraction,
        scheme,
        quiet,
    )?;
    let wall_time_ms = start.elapsed().as_secs_f64() * 1000.0;

    let mut w = io::CsvWriter::create(out_path)?;
    w.write_sensitivity(&result)?;
    w.write_capital_section(&baseline, 20)?;
    w.flush()?;

    print_sensitivity(&result);
    eprintln!("[fusecost] CSV: {}", out_path);

    if json_output {
        let json_path = out_path.replace(".csv", ".json");
        let bundle = report::SensitivityBundle {
            manifest: create_manifest(inputs, case, cfg_text),
            baseline_lcoe_usd_per_mwh: result.baseline_objective,
            fraction,
            analyzed: result.entries.len(),
            skipped: result.failures.len(),
            wall_time_ms,
            top_capital: report::top_capital_categories(&baseline, 20),
            result,
        };
        let json = serde_json::to_string_pretty(&bundle)?;
        fs::write(&json_path, json)?;
        eprintln!("[fusecost] JSON: {}", json_path);
    }

    Ok(())
}

fn run_validate(inputs: &Inputs, case: &str) -> Result<()> {
    let report = validate::validate(inputs);

    print_warnings(&report);
    if report.is_ok() {
        eprintln!("[fusecost] config valid: {}", case);
        eprintln!(
            "  machine: {:?}, confinement: {:?}, fuel: {:?}",
            inputs.basic.machine_type, inputs.basic.confinement, inputs.basic.fuel_type
        );
        eprintln!(
            "  p_nrl={} MW, n_mod={}, availability={}, lifetime={} yr",
            inputs.basic.p_nrl,
            inputs.basic.n_mod,
            inputs.basic.plant_availability,
            inputs.basic.plant_lifetime
        );
        Ok(())
    } else {
        for error in &report.errors {
            eprintln!("[fusecost] error: {}: {}", error.path, error.message);
        }
        anyhow::bail!("{} validation errors", report.errors.len());
    }
}

fn print_version() {
    eprintln!("fusecost - Fusion Power Plant Cost and LCOE Model");
    eprintln!();
    eprintln!("  Program ID:      {}", report::PROGRAM_ID);
    eprintln!("  Tool Version:    {}", report::VERSION);
    eprintln!("  Schema Version:  {}", report::SCHEMA_VERSION);
    eprintln!("  Platform:        {}", std::env::consts::OS);
    eprintln!("  Architecture:    {}", std::env::consts::ARCH);
    eprintln!();
    eprintln!("Built-in cases:");
    for machine in [MachineType::Mfe, MachineType::Ife] {
        for case in registry::case_names(machine) {
            eprintln!("  {:?}: {}", machine, case);
        }
    }
    eprintln!();
    eprintln!("Cost accounts follow the Generomak/ARIES CAS numbering:");
    eprintln!("  - CAS 10 pre-construction, CAS 20 direct, CAS 30 indirect");
    eprintln!("  - CAS 50 supplementary, CAS 60 interest during construction");
    eprintln!("  - CAS 70/80/90 annualized O&M, fuel, and capital");
}

fn main() -> Result<()> {
    let args = Args::parse();

    match &args.command {
        Commands::Version => {
            print_version();
            Ok(())
        }
        Commands::Run { json } => {
            let (inputs, cfg_text, case) = resolve_inputs(&args)?;
            let out_path = args
                .out
                .clone()
                .unwrap_or_else(|| "results/costs.csv".to_string());
            eprintln!("[fusecost] v{} - case: {}", report::VERSION, case);
            run_once(&inputs, &cfg_text, &case, &out_path, *json)
        }
        Commands::Sensitivity {
            fraction,
            central,
            quiet,
            json,
        } => {
            let (inputs, cfg_text, case) = resolve_inputs(&args)?;
            let out_path = args
                .out
                .clone()
                .unwrap_or_else(|| "results/sensitivity.csv".to_string());
            if !quiet {
                eprintln!("[fusecost] v{} - case: {}", report::VERSION, case);
            }
            let scheme = if *central {
                sensitivity::Differencing::Central
            } else {
                sensitivity::Differencing::Forward
            };
            run_sensitivity(
                &inputs, &cfg_text, &case, &out_path, *fraction, scheme, *quiet, *json,
            )
        }
        Commands::Validate => {
            let (inputs, _, case) = resolve_inputs(&args)?;
            run_validate(&inputs, &case)
        }
    }
}
