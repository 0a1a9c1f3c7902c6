use serde::Serialize;
use std::time::{SystemTime, UNIX_EPOCH};

use crate::costing::CostResult;
use crate::inputs::{Inputs, MachineType};
use crate::sensitivity::{scalar_leaves, SensitivityResult};

pub const VERSION: &str = "0.3.0";
pub const SCHEMA_VERSION: &str = "1.0.0";
pub const PROGRAM_ID: &str = "FUSECOST";

// ============================================================================
// JSON result bundles
// ============================================================================

#[derive(Serialize)]
pub struct Manifest {
    pub schema_version: String,
    pub tool_version: String,
    pub program_id: String,
    pub timestamp_utc: String,
    pub platform: String,
    pub machine: MachineType,
    pub case: String,
    pub config_hash: String,
    pub config_snapshot: Inputs,
}

#[derive(Serialize)]
pub struct RunSummary {
    pub lcoe_usd_per_mwh: f64,
    pub lcoh_usd_per_mwh: f64,
    pub p_net_mw: f64,
    pub p_et_mw: f64,
    pub q_sci: f64,
    pub q_eng: f64,
    pub recirculating_fraction: f64,
    pub total_capital_musd: f64,
    pub annualized_capital_musd: f64,
    pub levelized_om_musd: f64,
    pub levelized_fuel_musd: f64,
    pub wall_time_ms: f64,
}

#[derive(Serialize)]
pub struct RunBundle {
    pub manifest: Manifest,
    pub summary: RunSummary,
    pub result: CostResult,
}

#[derive(Serialize)]
pub struct SensitivityBundle {
    pub manifest: Manifest,
    pub baseline_lcoe_usd_per_mwh: f64,
    pub fraction: f64,
    pub analyzed: usize,
    pub skipped: usize,
    pub wall_time_ms: f64,
    pub top_capital: Vec<CapitalCategory>,
    pub result: SensitivityResult,
}

#[derive(Serialize, Clone)]
pub struct CapitalCategory {
    pub path: String,
    pub value_musd: f64,
}

// ============================================================================
// Helpers
// ============================================================================

pub fn compute_hash(data: &str) -> String {
    use std::collections::hash_map::DefaultHasher;
    use std::hash::{Hash, Hasher};
    let mut hasher = DefaultHasher::new();
    data.hash(&mut hasher);
    format!("{:016x}", hasher.finish())
}

pub fn get_timestamp() -> String {
    let now = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0);
    let secs_per_day = 86400u64;
    let days_since_epoch = now / secs_per_day;
    let secs_today = now % secs_per_day;
    let hours = secs_today / 3600;
    let mins = (secs_today % 3600) / 60;
    let secs = secs_today % 60;

    let mut year = 1970u64;
    let mut remaining_days = days_since_epoch;
    loop {
        let leap = year % 4 == 0 && (year % 100 != 0 || year % 400 == 0);
        let days_in_year = if leap { 366 } else { 365 };
        if remaining_days < days_in_year {
            break;
        }
        remaining_days -= days_in_year;
        year += 1;
    }
    let month_days = [31, 28, 31, 30, 31, 30, 31, 31, 30, 31, 30, 31];
    let mut month = 1u64;
    for &days in &month_days {
        let leap = year % 4 == 0 && (year % 100 != 0 || year % 400 == 0);
        let d = if month == 2 && leap { 29 } else { days };
        if remaining_days < d {
            break;
        }
        remaining_days -= d;
        month += 1;
    }
    let day = remaining_days + 1;

    format!(
        "{:04}-{:02}-{:02}T{:02}:{:02}:{:02}Z",
        year, month, day, hours, mins, secs
    )
}

pub fn create_manifest(inputs: &Inputs, case: &str, cfg_text: &str) -> Manifest {
    Manifest {
        schema_version: SCHEMA_VERSION.to_string(),
        tool_version: VERSION.to_string(),
        program_id: PROGRAM_ID.to_string(),
        timestamp_utc: get_timestamp(),
        platform: std::env::consts::OS.to_string(),
        machine: inputs.basic.machine_type,
        case: case.to_string(),
        config_hash: compute_hash(cfg_text),
        config_snapshot: inputs.clone(),
    }
}

pub fn create_summary(result: &CostResult, wall_time_ms: f64) -> RunSummary {
    RunSummary {
        lcoe_usd_per_mwh: result.lcoe.c1000000,
        lcoh_usd_per_mwh: result.lcoe.c2000000,
        p_net_mw: result.power.p_net,
        p_et_mw: result.power.p_et,
        q_sci: result.power.q_sci,
        q_eng: result.power.q_eng,
        recirculating_fraction: result.power.rec_frac,
        total_capital_musd: result.capital.c990000,
        annualized_capital_musd: result.annualized.c900000,
        levelized_om_musd: result.annualized.c700000,
        levelized_fuel_musd: result.annualized.c800000,
        wall_time_ms,
    }
}

/// Human-readable label for a parameter path; unregistered paths fall back
/// to the final segment, underscores to spaces, title-cased.
pub fn display_name(path: &str) -> String {
    const NAMES: &[(&str, &str)] = &[
        ("basic.p_nrl", "Fusion power"),
        ("basic.n_mod", "Number of modules"),
        ("basic.construction_time", "Construction time"),
        ("basic.plant_lifetime", "Plant lifetime"),
        ("basic.plant_availability", "Availability factor"),
        ("basic.yearly_inflation", "Inflation rate"),
        ("power_input.mn", "Neutron multiplication"),
        ("power_input.eta_th", "Thermal efficiency"),
        ("power_input.eta_p", "Pump heat recovery"),
        ("power_input.eta_pin", "Heating wall-plug efficiency"),
        ("power_input.f_sub", "Subsystem power fraction"),
        ("power_input.p_input", "Injected heating power"),
        ("power_input.p_cryo", "Cryogenic power"),
        ("power_input.p_pump", "Pumping power"),
        ("radial_build.elon", "Plasma elongation"),
        ("radial_build.axis_t", "Major radius"),
        ("coils.b_max", "Peak coil field"),
        ("coils.r_coil", "Coil radius"),
        ("financial.interest_rate", "Interest rate"),
        ("constants.om_usd_per_kw_year", "O&M unit cost"),
        ("constants.deuterium_usd_per_kg", "Deuterium cost"),
        ("constants.indirect_fraction", "Indirect cost fraction"),
        ("constants.contingency_rate", "Contingency rate"),
    ];
    for &(p, name) in NAMES {
        if p == path {
            return name.to_string();
        }
    }
    let last = path.rsplit('.').next().unwrap_or(path);
    last.split('_')
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// Largest positive capital line items, excluding rollup subtotals, sorted
/// descending. Works by walking the serialized capital tree so new accounts
/// show up without touching this code.
pub fn top_capital_categories(result: &CostResult, n: usize) -> Vec<CapitalCategory> {
    const ROLLUPS: &[&str] = &[
        "c100000", "c200000", "c210000", "c220000", "c220100", "c500000", "c990000",
    ];
    let tree = match serde_json::to_value(&result.capital) {
        Ok(v) => v,
        Err(_) => return Vec::new(),
    };
    let mut items: Vec<CapitalCategory> = scalar_leaves(&tree)
        .into_iter()
        .filter(|leaf| {
            leaf.value > 0.0
                && !ROLLUPS
                    .iter()
                    .any(|r| leaf.path.rsplit('.').next() == Some(r))
        })
        .map(|leaf| CapitalCategory {
            path: leaf.path,
            value_musd: leaf.value,
        })
        .collect();
    items.sort_by(|a, b| {
        b.value_musd
            .partial_cmp(&a.value_musd)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then_with(|| a.path.cmp(&b.path))
    });
    items.truncate(n);
    items
}

// ============================================================================
// Console rendering
// ============================================================================

pub fn print_run(result: &CostResult) {
    let pt = &result.power;
    eprintln!(
        "[fusecost] p_net={:.1} MW p_et={:.1} MW q_sci={:.1} q_eng={:.2} rec_frac={:.3}",
        pt.p_net, pt.p_et, pt.q_sci, pt.q_eng, pt.rec_frac
    );
    eprintln!(
        "[fusecost] capital={:.0} M$ annualized={:.1} M$/yr om={:.1} M$/yr fuel={:.2} M$/yr",
        result.capital.c990000,
        result.annualized.c900000,
        result.annualized.c700000,
        result.annualized.c800000
    );
    eprintln!(
        "[fusecost] LCOE={:.2} $/MWh LCOH={:.2} $/MWh",
        result.lcoe.c1000000, result.lcoe.c2000000
    );

    eprintln!();
    eprintln!("  Top capital cost categories:");
    eprintln!("  {:<46} {:>12}", "Account", "M$");
    eprintln!("  {}", "-".repeat(60));
    for cat in top_capital_categories(result, 10) {
        eprintln!("  {:<46} {:>12.1}", cat.path, cat.value_musd);
    }
}

pub fn print_sensitivity(result: &SensitivityResult) {
    eprintln!(
        "[fusecost] baseline LCOE={:.2} $/MWh, {} parameters analyzed, {} skipped",
        result.baseline_objective,
        result.entries.len(),
        result.failures.len()
    );

    eprintln!();
    eprintln!("  Most influential parameters (elasticity of LCOE):");
    eprintln!(
        "  {:<32} {:<34} {:>10} {:>12}",
        "Parameter", "Path", "Value", "Elasticity"
    );
    eprintln!("  {}", "-".repeat(92));
    for entry in result.entries.iter().take(10) {
        eprintln!(
            "  {:<32} {:<34} {:>10.4} {:>+12.4}",
            display_name(&entry.path),
            entry.path,
            entry.value,
            entry.elasticity
        );
    }
}
