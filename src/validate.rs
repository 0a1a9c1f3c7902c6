use anyhow::{bail, Result};
use serde::Serialize;

use crate::inputs::{Inputs, MachineType};

/// One validation finding, addressed by dotted field path.
#[derive(Debug, Clone, Serialize)]
pub struct FieldError {
    pub path: String,
    pub message: String,
}

/// Aggregated validation outcome. Errors make the case unrunnable; warnings
/// flag physically dubious but computable inputs.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ValidationReport {
    pub errors: Vec<FieldError>,
    pub warnings: Vec<FieldError>,
}

impl ValidationReport {
    pub fn is_ok(&self) -> bool {
        self.errors.is_empty()
    }

    /// Warnings worth surfacing: suppressed while hard errors exist so a
    /// broken case file reads as errors only.
    pub fn surfaced_warnings(&self) -> &[FieldError] {
        if self.errors.is_empty() {
            &self.warnings
        } else {
            &[]
        }
    }

    fn error(&mut self, path: &str, message: impl Into<String>) {
        self.errors.push(FieldError {
            path: path.to_string(),
            message: message.into(),
        });
    }

    fn warn(&mut self, path: &str, message: impl Into<String>) {
        self.warnings.push(FieldError {
            path: path.to_string(),
            message: message.into(),
        });
    }

    fn require_positive(&mut self, path: &str, value: f64) {
        if !value.is_finite() || value <= 0.0 {
            self.error(path, format!("must be positive, got {value}"));
        }
    }

    fn require_non_negative(&mut self, path: &str, value: f64) {
        if !value.is_finite() || value < 0.0 {
            self.error(path, format!("must be non-negative, got {value}"));
        }
    }

    fn require_fraction(&mut self, path: &str, value: f64) {
        if !value.is_finite() || !(0.0..=1.0).contains(&value) {
            self.error(path, format!("must be in [0, 1], got {value}"));
        }
    }
}

/// Check every rule and return the full report; never stops at the first
/// problem so a bad case file is fixable in one pass.
pub fn validate(inputs: &Inputs) -> ValidationReport {
    let mut r = ValidationReport::default();
    let basic = &inputs.basic;
    let pin = &inputs.power_input;
    let rb = &inputs.radial_build;

    // Positive-quantity rules
    let positives: &[(&str, f64)] = &[
        ("basic.p_nrl", basic.p_nrl),
        ("basic.n_mod", basic.n_mod),
        ("basic.construction_time", basic.construction_time),
        ("basic.plant_lifetime", basic.plant_lifetime),
        ("power_input.eta_th", pin.eta_th),
        ("power_input.eta_p", pin.eta_p),
        ("radial_build.elon", rb.elon),
        ("radial_build.plasma_t", rb.plasma_t),
        ("financial.interest_rate", inputs.financial.interest_rate),
        ("installation.labor_rate", inputs.installation.labor_rate),
    ];
    for &(path, value) in positives {
        r.require_positive(path, value);
    }

    // Non-negative rules
    let non_negatives: &[(&str, f64)] = &[
        ("basic.yearly_inflation", basic.yearly_inflation),
        // Spherical IFE chambers have no major radius; a torus needs one
        ("radial_build.axis_t", rb.axis_t),
        ("power_input.p_input", pin.p_input),
        ("power_input.p_trit", pin.p_trit),
        ("power_input.p_house", pin.p_house),
        ("power_input.p_cryo", pin.p_cryo),
        ("power_input.p_pump", pin.p_pump),
        ("radial_build.vacuum_t", rb.vacuum_t),
        ("radial_build.firstwall_t", rb.firstwall_t),
        ("radial_build.blanket1_t", rb.blanket1_t),
        ("radial_build.reflector_t", rb.reflector_t),
        ("radial_build.ht_shield_t", rb.ht_shield_t),
        ("radial_build.structure_t", rb.structure_t),
        ("radial_build.vessel_t", rb.vessel_t),
        ("radial_build.lt_shield_t", rb.lt_shield_t),
        ("radial_build.bioshield_t", rb.bioshield_t),
    ];
    for &(path, value) in non_negatives {
        r.require_non_negative(path, value);
    }

    // Fraction rules
    let fractions: &[(&str, f64)] = &[
        ("basic.plant_availability", basic.plant_availability),
        ("power_input.f_sub", pin.f_sub),
        ("power_input.eta_th", pin.eta_th),
        ("power_input.eta_p", pin.eta_p),
        ("shield.f_sic", inputs.shield.f_sic),
        ("shield.f_pbli", inputs.shield.f_pbli),
        ("shield.f_w", inputs.shield.f_w),
        ("shield.f_bfs", inputs.shield.f_bfs),
        (
            "primary_structure.learning_credit",
            inputs.primary_structure.learning_credit,
        ),
        (
            "vacuum_system.learning_credit",
            inputs.vacuum_system.learning_credit,
        ),
        (
            "power_supplies.learning_credit",
            inputs.power_supplies.learning_credit,
        ),
        (
            "fuel_handling.learning_curve_credit",
            inputs.fuel_handling.learning_curve_credit,
        ),
    ];
    for &(path, value) in fractions {
        r.require_fraction(path, value);
    }

    // Machine-type structural requirements
    match basic.machine_type {
        MachineType::Mfe => {
            r.require_positive("radial_build.axis_t", rb.axis_t);
            match &inputs.coils {
                Some(coils) => {
                    r.require_positive("coils.b_max", coils.b_max);
                    r.require_positive("coils.r_coil", coils.r_coil);
                    if coils.b_max > 25.0 {
                        r.warn(
                            "coils.b_max",
                            format!("{} T exceeds demonstrated HTS coil fields", coils.b_max),
                        );
                    }
                }
                None => r.error("coils", "required for MFE machines"),
            }
            match pin.eta_pin {
                Some(v) => r.require_fraction("power_input.eta_pin", v),
                None => r.error("power_input.eta_pin", "required for MFE machines"),
            }
        }
        MachineType::Ife => {
            if pin.eta_pin1.is_none() || pin.eta_pin2.is_none() {
                r.error(
                    "power_input.eta_pin1",
                    "eta_pin1 and eta_pin2 required for IFE machines",
                );
            }
            if pin.p_implosion.is_none() || pin.p_ignition.is_none() {
                r.error(
                    "power_input.p_implosion",
                    "p_implosion and p_ignition required for IFE machines",
                );
            }
        }
    }

    // Physically dubious but computable
    let shield_sum =
        inputs.shield.f_sic + inputs.shield.f_pbli + inputs.shield.f_w + inputs.shield.f_bfs;
    if (shield_sum - 1.0).abs() > 0.05 {
        r.warn(
            "shield",
            format!("material fractions sum to {shield_sum:.3}, expected ~1.0"),
        );
    }
    if pin.eta_th > 0.65 {
        r.warn(
            "power_input.eta_th",
            format!("{} exceeds realistic thermal conversion efficiency", pin.eta_th),
        );
    }
    if basic.plant_availability < 0.2 && basic.plant_availability > 0.0 {
        r.warn(
            "basic.plant_availability",
            format!("{} is very low for a power plant", basic.plant_availability),
        );
    }

    r
}

/// Run validation and fail with every error listed, one per line.
pub fn ensure_valid(inputs: &Inputs) -> Result<ValidationReport> {
    let report = validate(inputs);
    if !report.is_ok() {
        let joined = report
            .errors
            .iter()
            .map(|e| format!("  {}: {}", e.path, e.message))
            .collect::<Vec<_>>()
            .join("\n");
        bail!("invalid inputs ({} errors):\n{}", report.errors.len(), joined);
    }
    Ok(report)
}
