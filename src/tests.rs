//! Test suite for fusecost
//!
//! Includes:
//! - Unit tests for the power balance, financial math, and geometry
//! - Regression tests for the built-in reference cases
//! - Property tests for the generic sensitivity engine

use anyhow::Result;
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::costing::{
    capital_recovery_factor, cas220103_coils, coil_geometry_factor, coil_total_kam, evaluate,
    idc_fraction, levelized_annual_cost, sphere_shell_volume, torus_shell_volume,
};
use crate::inputs::{CoilMaterial, Confinement, FuelType, Inputs, MachineType};
use crate::power::{ash_fraction, power_balance};
use crate::registry;
use crate::report::{compute_hash, display_name, get_timestamp, top_capital_categories};
use crate::sensitivity::{analyze, perturbation_delta, scalar_leaves, set_leaf, Differencing};
use crate::validate::{ensure_valid, validate};

fn mfe_baseline() -> Inputs {
    registry::builtin(MachineType::Mfe, "catf_baseline").unwrap()
}

fn ife_baseline() -> Inputs {
    registry::builtin(MachineType::Ife, "laser_baseline").unwrap()
}

// =============================================================================
// Power Balance Tests
// =============================================================================

#[test]
fn test_ash_fraction_dt() {
    let inputs = mfe_baseline();
    let f = ash_fraction(FuelType::Dt, &inputs.power_input);
    assert!((f - 3.52 / 17.58).abs() < 1e-12, "DT ash fraction is the alpha share");
}

#[test]
fn test_ash_fraction_pb11_aneutronic() {
    let inputs = mfe_baseline();
    let f = ash_fraction(FuelType::Pb11, &inputs.power_input);
    assert_eq!(f, 1.0, "p-B11 is fully aneutronic");
}

#[test]
fn test_ash_fraction_dd_between_dt_and_pb11() {
    let inputs = mfe_baseline();
    let dt = ash_fraction(FuelType::Dt, &inputs.power_input);
    let dd = ash_fraction(FuelType::Dd, &inputs.power_input);
    assert!(dd > dt && dd < 1.0, "DD charged fraction {dd} out of range");
}

#[test]
fn test_power_balance_mfe_baseline() {
    let inputs = mfe_baseline();
    let pt = power_balance(&inputs.basic, &inputs.power_input).unwrap();

    assert!(pt.p_net > 0.0, "baseline plant should be net-positive");
    assert!(pt.q_eng > 1.0, "engineering Q must exceed unity for net power");
    assert!((pt.p_et - (pt.p_the + pt.p_dee)).abs() < 1e-9);
    assert!((pt.rec_frac - 1.0 / pt.q_eng).abs() < 1e-12);
    assert!(pt.p_th > pt.p_the, "thermal conversion cannot exceed input heat");
    // Q_sci = 2600 / 50
    assert!((pt.q_sci - 52.0).abs() < 1e-9);
}

#[test]
fn test_power_balance_energy_split() {
    let inputs = mfe_baseline();
    let pt = power_balance(&inputs.basic, &inputs.power_input).unwrap();
    assert!((pt.p_ash + pt.p_neutron - inputs.basic.p_nrl).abs() < 1e-9);
}

#[test]
fn test_power_balance_ife_baseline() {
    let inputs = ife_baseline();
    let pt = power_balance(&inputs.basic, &inputs.power_input).unwrap();
    assert!(pt.p_net > 0.0);
    assert!(pt.q_eng > 1.0);
}

#[test]
fn test_power_balance_requires_eta_pin() {
    let mut inputs = mfe_baseline();
    inputs.power_input.eta_pin = None;
    let err = power_balance(&inputs.basic, &inputs.power_input).unwrap_err();
    assert!(err.to_string().contains("eta_pin"));
}

#[test]
fn test_power_balance_dec_diverts_ash() {
    let mut inputs = mfe_baseline();
    inputs.power_input.f_dec = Some(0.5);
    inputs.power_input.eta_de = Some(0.8);
    let pt = power_balance(&inputs.basic, &inputs.power_input).unwrap();
    assert!(pt.p_dee > 0.0, "DEC should produce electric output");
    assert!((pt.p_dee - 0.5 * 0.8 * pt.p_ash).abs() < 1e-9);
    assert!((pt.p_dec_waste - 0.5 * 0.2 * pt.p_ash).abs() < 1e-6);
}

// =============================================================================
// Financial Math Tests
// =============================================================================

#[test]
fn test_capital_recovery_factor() {
    // Standard annuity table value: 7% over 30 years
    let crf = capital_recovery_factor(0.07, 30.0);
    assert!((crf - 0.080586).abs() < 1e-5, "CRF(7%, 30y) = {crf}");
}

#[test]
fn test_idc_fraction_baseline() {
    // ((1.07^6 - 1) / (0.07 * 6)) - 1
    let f = idc_fraction(0.07, 6.0);
    assert!((f - 0.19222).abs() < 1e-4, "f_IDC = {f}");
}

#[test]
fn test_idc_fraction_degenerate() {
    assert_eq!(idc_fraction(0.0, 6.0), 0.0);
    assert_eq!(idc_fraction(0.07, 0.0), 0.0);
}

#[test]
fn test_levelized_cost_exceeds_nominal_with_inflation() {
    // Growing costs discounted at a higher rate still levelize above the
    // year-zero nominal because of the construction-period shift
    let lev = levelized_annual_cost(100.0, 0.07, 0.0245, 30.0, 6.0);
    assert!(lev > 100.0, "levelized = {lev}");
    assert!(lev < 200.0, "levelized = {lev}");
}

#[test]
fn test_levelized_cost_rate_equals_inflation_limit() {
    let near = levelized_annual_cost(100.0, 0.05, 0.05 - 1e-6, 30.0, 0.0);
    let exact = levelized_annual_cost(100.0, 0.05, 0.05, 30.0, 0.0);
    assert!(
        (near - exact).abs() / exact < 1e-3,
        "limit branch must be continuous: {near} vs {exact}"
    );
}

#[test]
fn test_levelized_cost_degenerate_returns_nominal() {
    assert_eq!(levelized_annual_cost(100.0, 0.0, 0.02, 30.0, 6.0), 100.0);
}

// =============================================================================
// Geometry and Coil Model Tests
// =============================================================================

#[test]
fn test_torus_shell_volume_monotonic() {
    let thin = torus_shell_volume(3.0, 3.0, 1.2, 0.1);
    let thick = torus_shell_volume(3.0, 3.0, 1.2, 0.2);
    assert!(thin > 0.0);
    assert!(thick > thin);
}

#[test]
fn test_sphere_shell_volume() {
    // Full sphere when inner radius is zero
    let v = sphere_shell_volume(0.0, 1.0);
    assert!((v - 4.0 / 3.0 * std::f64::consts::PI).abs() < 1e-12);
}

#[test]
fn test_tokamak_geometry_factor_coil_count_free() {
    let a = coil_geometry_factor(Confinement::ConventionalTokamak, 12.0, 2.0);
    let b = coil_geometry_factor(Confinement::ConventionalTokamak, 24.0, 2.0);
    assert_eq!(a, b, "tokamak conductor total is set by Ampere's law, not coil count");
}

#[test]
fn test_mirror_geometry_scales_with_coils() {
    let four = coil_geometry_factor(Confinement::MagneticMirror, 4.0, 2.0);
    let eight = coil_geometry_factor(Confinement::MagneticMirror, 8.0, 2.0);
    assert!((eight - 2.0 * four).abs() < 1e-12);
}

#[test]
fn test_coil_cost_sparc_calibration() {
    // SPARC-class coil set: B = 20 T at R = 1.85 m in REBCO. Conductor cost
    // lands near $107M, total near $645M with the compact-tokamak markup.
    let mut inputs = mfe_baseline();
    inputs.basic.confinement = Confinement::SphericalTokamak;
    let coils = inputs.coils.as_mut().unwrap();
    coils.b_max = 20.0;
    coils.r_coil = 1.85;
    coils.coil_material = Some(CoilMaterial::RebcoHts);
    coils.cost_per_kam = None;
    coils.coil_markup = None;

    let (total_kam, conductor, total) = cas220103_coils(&inputs).unwrap();
    assert!(total_kam > 2.0e6 && total_kam < 2.3e6, "kAm = {total_kam}");
    assert!((conductor - 107.5).abs() < 3.0, "conductor = {conductor} M$");
    assert!((total - 645.0).abs() < 20.0, "total = {total} M$");
}

#[test]
fn test_coil_cost_quadratic_in_field_radius() {
    let base = cas220103_coils(&mfe_baseline()).unwrap().0;
    let mut doubled = mfe_baseline();
    doubled.coils.as_mut().unwrap().r_coil *= 2.0;
    let scaled = cas220103_coils(&doubled).unwrap().0;
    assert!((scaled - 4.0 * base).abs() / base < 1e-9, "kAm scales as R^2");
}

#[test]
fn test_coil_material_default_costs() {
    assert_eq!(CoilMaterial::RebcoHts.default_cost_per_kam(), 50.0);
    assert_eq!(CoilMaterial::Nb3sn.default_cost_per_kam(), 7.0);
    assert_eq!(CoilMaterial::Copper.default_cost_per_kam(), 1.0);
}

#[test]
fn test_coil_kam_matches_formula() {
    let g = coil_geometry_factor(Confinement::ConventionalTokamak, 18.0, 2.0);
    let kam = coil_total_kam(g, 18.0, 1.85);
    let expected = g * 18.0 * 1.85 * 1.85 / 1.256_637_062_12e-6 / 1000.0;
    assert!((kam - expected).abs() < 1e-6);
}

// =============================================================================
// Cost Pipeline Tests
// =============================================================================

#[test]
fn test_evaluate_mfe_baseline() {
    let result = evaluate(&mfe_baseline()).unwrap();

    assert!(result.lcoe.c1000000.is_finite() && result.lcoe.c1000000 > 0.0);
    assert!((result.lcoe.c2000000 - result.lcoe.c1000000 / 10.0).abs() < 1e-9);
    assert!(result.capital.c990000 > result.capital.c200000);
    assert!(result.capital.c600000 > 0.0, "IDC accrues at positive interest");
    assert!(result.annualized.c900000 > 0.0);
    assert!(result.annualized.c800000 > 0.0, "deuterium is never free");
}

#[test]
fn test_evaluate_lcoe_identity() {
    let inputs = mfe_baseline();
    let result = evaluate(&inputs).unwrap();
    let annual_mwh =
        8760.0 * result.power.p_net * inputs.basic.n_mod * inputs.basic.plant_availability;
    let expected = (result.annualized.c900000
        + result.annualized.c700000
        + result.annualized.c800000)
        * 1e6
        / annual_mwh;
    assert!((result.lcoe.c1000000 - expected).abs() < 1e-9);
}

#[test]
fn test_evaluate_capital_rollup() {
    let result = evaluate(&mfe_baseline()).unwrap();
    let cap = &result.capital;
    let overnight = cap.cas10.c100000 + cap.c200000 + cap.c300000 + cap.cas50.c500000;
    assert!((cap.c990000 - (overnight + cap.c600000)).abs() < 1e-6);
}

#[test]
fn test_evaluate_ife_baseline() {
    let result = evaluate(&ife_baseline()).unwrap();
    assert!(result.lcoe.c1000000.is_finite() && result.lcoe.c1000000 > 0.0);
    assert_eq!(result.capital.cas22.c220103, 0.0, "no coil account for IFE");
    assert!(result.capital.cas21.target_factory > 0.0, "IFE needs a target factory");
}

#[test]
fn test_foak_costs_more_than_noak() {
    let noak = evaluate(&mfe_baseline()).unwrap();
    let mut foak_inputs = mfe_baseline();
    foak_inputs.basic.noak = false;
    let foak = evaluate(&foak_inputs).unwrap();
    assert!(
        foak.capital.c990000 > noak.capital.c990000,
        "FOAK carries contingency and licensing time"
    );
}

#[test]
fn test_evaluate_deterministic() {
    let a = evaluate(&mfe_baseline()).unwrap();
    let b = evaluate(&mfe_baseline()).unwrap();
    assert_eq!(a.lcoe.c1000000, b.lcoe.c1000000);
    assert_eq!(a.capital.c990000, b.capital.c990000);
}

#[test]
fn test_longer_construction_raises_idc() {
    let base = evaluate(&mfe_baseline()).unwrap();
    let mut slow = mfe_baseline();
    slow.basic.construction_time = 12.0;
    let result = evaluate(&slow).unwrap();
    assert!(result.capital.c600000 > base.capital.c600000);
    assert!(result.capital.c300000 > base.capital.c300000, "indirects scale with schedule");
}

#[test]
fn test_divertor_account_mfe_only() {
    let mfe = evaluate(&mfe_baseline()).unwrap();
    assert!(mfe.capital.cas22.c220108 > 0.0, "tokamaks carry a divertor");
    // 11.5 m3 of tungsten at the baseline build, manufacturing and
    // complexity factors included
    assert!(
        (mfe.capital.cas22.c220108 - 530.0).abs() < 50.0,
        "divertor = {} M$",
        mfe.capital.cas22.c220108
    );
    let ife = evaluate(&ife_baseline()).unwrap();
    assert_eq!(ife.capital.cas22.c220108, 0.0, "spherical chambers have no divertor");
}

#[test]
fn test_isotope_separation_fuel_dependence() {
    let dt = evaluate(&mfe_baseline()).unwrap();
    assert!(dt.capital.cas22.c220112 > 0.0);

    let mut dd_inputs = mfe_baseline();
    dd_inputs.basic.fuel_type = FuelType::Dd;
    let dd = evaluate(&dd_inputs).unwrap();
    assert!(
        dt.capital.cas22.c220112 > dd.capital.cas22.c220112,
        "Li-6 enrichment is a D-T-only plant"
    );
}

#[test]
fn test_tritium_containment_fuel_dependence() {
    let dt = evaluate(&mfe_baseline()).unwrap();
    let mut dd_inputs = mfe_baseline();
    dd_inputs.basic.fuel_type = FuelType::Dd;
    let dd = evaluate(&dd_inputs).unwrap();
    assert!(
        dt.capital.cas22.c220500 > dd.capital.cas22.c220500,
        "DT containment dominates the fuel handling account"
    );
}

// =============================================================================
// Validation Tests
// =============================================================================

#[test]
fn test_baseline_cases_validate() {
    assert!(validate(&mfe_baseline()).is_ok());
    assert!(validate(&ife_baseline()).is_ok());
}

#[test]
fn test_validation_aggregates_errors() {
    let mut inputs = mfe_baseline();
    inputs.basic.plant_availability = 1.5;
    inputs.basic.p_nrl = -100.0;
    let report = validate(&inputs);
    assert!(report.errors.len() >= 2, "both problems must be reported");
    assert!(report.errors.iter().any(|e| e.path == "basic.plant_availability"));
    assert!(report.errors.iter().any(|e| e.path == "basic.p_nrl"));
}

#[test]
fn test_validation_axis_t_machine_dependence() {
    // A spherical IFE chamber has no major radius; a torus needs one
    let mut ife = ife_baseline();
    ife.radial_build.axis_t = 0.0;
    assert!(validate(&ife).is_ok());

    let mut mfe = mfe_baseline();
    mfe.radial_build.axis_t = 0.0;
    let report = validate(&mfe);
    assert!(report.errors.iter().any(|e| e.path == "radial_build.axis_t"));
}

#[test]
fn test_warnings_suppressed_while_errors_exist() {
    let mut inputs = mfe_baseline();
    inputs.shield.f_bfs = 0.5; // fractions sum to 0.6: warning
    inputs.basic.p_nrl = -1.0; // hard error
    let report = validate(&inputs);
    assert!(!report.warnings.is_empty());
    assert!(report.surfaced_warnings().is_empty(), "errors mute warnings");

    inputs.basic.p_nrl = 2600.0;
    let clean = validate(&inputs);
    assert!(clean.is_ok());
    assert!(!clean.surfaced_warnings().is_empty());
}

#[test]
fn test_validation_mfe_requires_coils() {
    let mut inputs = mfe_baseline();
    inputs.coils = None;
    let report = validate(&inputs);
    assert!(report.errors.iter().any(|e| e.path == "coils"));
}

#[test]
fn test_validation_warns_on_shield_fractions() {
    let mut inputs = mfe_baseline();
    inputs.shield.f_bfs = 0.5; // sum now 0.6
    let report = validate(&inputs);
    assert!(report.is_ok(), "unbalanced fractions are a warning, not an error");
    assert!(report.warnings.iter().any(|w| w.path == "shield"));
}

#[test]
fn test_ensure_valid_lists_paths() {
    let mut inputs = mfe_baseline();
    inputs.financial.interest_rate = -0.07;
    let err = ensure_valid(&inputs).unwrap_err();
    assert!(err.to_string().contains("financial.interest_rate"));
}

// =============================================================================
// Sensitivity Engine Tests
// =============================================================================

#[derive(Serialize, Deserialize)]
struct Toy {
    a: f64,
    b: f64,
}

fn toy_objective(t: &Toy) -> Result<f64> {
    Ok(t.a + 10.0 * t.b)
}

#[test]
fn test_scalar_leaves_skip_non_numeric() {
    let tree = json!({
        "outer": {
            "x": 1.5,
            "flag": true,
            "name": "plant",
            "missing": null,
            "list": [1.0, 2.0],
            "inner": { "y": -2.0 }
        },
        "z": 0.0
    });
    let leaves = scalar_leaves(&tree);
    let paths: Vec<&str> = leaves.iter().map(|l| l.path.as_str()).collect();
    assert_eq!(paths, vec!["outer.inner.y", "outer.x", "z"]);
}

#[test]
fn test_set_leaf_roundtrip() {
    let mut tree = json!({ "a": { "b": 1.0 } });
    set_leaf(&mut tree, "a.b", 2.5).unwrap();
    assert_eq!(tree["a"]["b"].as_f64(), Some(2.5));
}

#[test]
fn test_set_leaf_rejects_bad_paths() {
    let mut tree = json!({ "a": { "b": 1.0, "s": "text" } });
    assert!(set_leaf(&mut tree, "a.missing", 1.0).is_err());
    assert!(set_leaf(&mut tree, "a.s", 1.0).is_err());
}

#[test]
fn test_perturbation_delta() {
    assert_eq!(perturbation_delta(100.0, 0.01), 1.0);
    assert_eq!(perturbation_delta(-100.0, 0.01), 1.0);
    assert_eq!(perturbation_delta(0.0, 0.01), 1.0, "zeros get a unit step");
}

#[test]
fn test_analyze_toy_model() {
    let toy = Toy { a: 100.0, b: 0.0 };
    let result = analyze(&toy, toy_objective, 0.01, Differencing::Forward, true).unwrap();

    assert_eq!(result.baseline_objective, 100.0);
    assert_eq!(result.entries.len(), 2);
    assert!(result.failures.is_empty());

    // a: delta 1.0, derivative 1.0, elasticity 1.0. b: zero baseline gets a
    // unit step, derivative 10.0, elasticity 0 (zero value).
    let a = result.entries.iter().find(|e| e.path == "a").unwrap();
    assert!((a.derivative - 1.0).abs() < 1e-9);
    assert!((a.elasticity - 1.0).abs() < 1e-9);

    let b = result.entries.iter().find(|e| e.path == "b").unwrap();
    assert_eq!(b.delta, 1.0);
    assert!((b.derivative - 10.0).abs() < 1e-9);
    assert_eq!(b.elasticity, 0.0);

    // Ranking: a (|1.0|) ahead of b (|0.0|)
    assert_eq!(result.entries[0].path, "a");
}

#[test]
fn test_analyze_isolates_leaf_failures() {
    let toy = Toy { a: 100.0, b: 0.0 };
    let objective = |t: &Toy| -> Result<f64> {
        if t.b > 0.0 {
            anyhow::bail!("b must stay zero");
        }
        Ok(t.a)
    };
    let result = analyze(&toy, objective, 0.01, Differencing::Forward, true).unwrap();

    assert_eq!(result.entries.len(), 1);
    assert_eq!(result.entries[0].path, "a");
    assert_eq!(result.failures.len(), 1);
    assert_eq!(result.failures[0].path, "b");
    assert!(result.failures[0].error.contains("b must stay zero"));
}

#[test]
fn test_analyze_central_matches_forward_on_linear_objective() {
    // The toy objective is linear, so both schemes give the exact derivative
    let toy = Toy { a: 100.0, b: 0.0 };
    let forward = analyze(&toy, toy_objective, 0.01, Differencing::Forward, true).unwrap();
    let central = analyze(&toy, toy_objective, 0.01, Differencing::Central, true).unwrap();
    for (f, c) in forward.entries.iter().zip(central.entries.iter()) {
        assert_eq!(f.path, c.path);
        assert!((f.derivative - c.derivative).abs() < 1e-9);
    }
}

#[test]
fn test_analyze_repeatable_on_identical_trees() {
    // The parallel leaf loop must not change what gets computed
    let inputs = mfe_baseline();
    let objective = |x: &Inputs| evaluate(x).map(|r| r.lcoe.c1000000);
    let first = analyze(&inputs, objective, 0.01, Differencing::Forward, true).unwrap();
    let second = analyze(&inputs, objective, 0.01, Differencing::Forward, true).unwrap();

    assert_eq!(first.baseline_objective, second.baseline_objective);
    assert_eq!(first.entries.len(), second.entries.len());
    for (a, b) in first.entries.iter().zip(second.entries.iter()) {
        assert_eq!(a.path, b.path);
        assert_eq!(a.value, b.value);
        assert_eq!(a.derivative, b.derivative);
        assert_eq!(a.elasticity, b.elasticity);
    }
}

#[test]
fn test_analyze_rejects_zero_baseline() {
    let toy = Toy { a: 0.0, b: 0.0 };
    let err = analyze(&toy, toy_objective, 0.01, Differencing::Forward, true).unwrap_err();
    assert!(err.to_string().contains("zero"));
}

#[test]
fn test_analyze_rejects_bad_fraction() {
    let toy = Toy { a: 100.0, b: 0.0 };
    assert!(analyze(&toy, toy_objective, 0.0, Differencing::Forward, true).is_err());
    assert!(analyze(&toy, toy_objective, -0.01, Differencing::Forward, true).is_err());
}

#[test]
fn test_analyze_full_cost_model() {
    let inputs = mfe_baseline();
    let result = analyze(
        &inputs,
        |x: &Inputs| evaluate(x).map(|r| r.lcoe.c1000000),
        0.01,
        Differencing::Forward,
        true,
    )
    .unwrap();

    assert!(result.entries.len() > 50, "the whole tree is in scope");
    assert!(result.failures.is_empty(), "baseline neighborhood is smooth");

    // Ranked by |elasticity| descending
    for pair in result.entries.windows(2) {
        assert!(pair[0].elasticity.abs() >= pair[1].elasticity.abs());
    }

    // Categorical fields never appear as parameters
    assert!(result.entries.iter().all(|e| e.path != "basic.machine_type"));
    assert!(result.entries.iter().all(|e| e.path != "basic.noak"));

    // More available plant -> cheaper electricity
    let availability = result
        .entries
        .iter()
        .find(|e| e.path == "basic.plant_availability")
        .unwrap();
    assert!(availability.elasticity < 0.0);

    // Costlier money -> costlier electricity
    let interest = result
        .entries
        .iter()
        .find(|e| e.path == "financial.interest_rate")
        .unwrap();
    assert!(interest.elasticity > 0.0);
}

// =============================================================================
// Registry and Reporting Tests
// =============================================================================

#[test]
fn test_registry_unknown_case() {
    let err = registry::builtin(MachineType::Mfe, "nope").unwrap_err();
    assert!(err.to_string().contains("catf_baseline"), "error lists known cases");
}

#[test]
fn test_registry_case_names() {
    assert!(!registry::case_names(MachineType::Mfe).is_empty());
    assert!(!registry::case_names(MachineType::Ife).is_empty());
}

#[test]
fn test_builtin_cases_toml_roundtrip() {
    for inputs in [mfe_baseline(), ife_baseline()] {
        let text = toml::to_string(&inputs).unwrap();
        let parsed: Inputs = toml::from_str(&text).unwrap();
        assert_eq!(parsed.basic.p_nrl, inputs.basic.p_nrl);
        assert_eq!(parsed.coils.is_some(), inputs.coils.is_some());
    }
}

#[test]
fn test_display_name_lookup_and_fallback() {
    assert_eq!(display_name("basic.p_nrl"), "Fusion power");
    assert_eq!(display_name("constants.unknown_thing"), "Unknown Thing");
}

#[test]
fn test_top_capital_categories_excludes_rollups() {
    let result = evaluate(&mfe_baseline()).unwrap();
    let top = top_capital_categories(&result, 10);
    assert_eq!(top.len(), 10);
    for pair in top.windows(2) {
        assert!(pair[0].value_musd >= pair[1].value_musd, "descending order");
    }
    assert!(top.iter().all(|c| !c.path.ends_with("c990000")));
    assert!(top.iter().all(|c| !c.path.ends_with("c200000")));
    assert!(top.iter().all(|c| c.value_musd > 0.0));
}

#[test]
fn test_compute_hash_stable() {
    assert_eq!(compute_hash("abc"), compute_hash("abc"));
    assert_ne!(compute_hash("abc"), compute_hash("abd"));
    assert_eq!(compute_hash("abc").len(), 16);
}

#[test]
fn test_timestamp_format() {
    let ts = get_timestamp();
    assert_eq!(ts.len(), 20);
    assert!(ts.ends_with('Z'));
    assert_eq!(&ts[4..5], "-");
    assert_eq!(&ts[10..11], "T");
}
