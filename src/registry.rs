//! Built-in reference cases, registered explicitly by machine type and name.

use anyhow::{bail, Result};

use crate::inputs::{
    Basic, CoilMaterial, Coils, Confinement, Constants, Financial, FuelHandling, FuelType, Heating,
    Inputs, Installation, MachineType, PowerInput, PowerSupplies, PrimaryStructure, RadialBuild,
    Shield, VacuumSystem,
};

/// Names of the cases registered for a machine type.
pub fn case_names(machine: MachineType) -> &'static [&'static str] {
    match machine {
        MachineType::Mfe => &["catf_baseline"],
        MachineType::Ife => &["laser_baseline"],
    }
}

/// Look up a built-in case. Unknown names list the registered alternatives.
pub fn builtin(machine: MachineType, case: &str) -> Result<Inputs> {
    match (machine, case) {
        (MachineType::Mfe, "catf_baseline") => Ok(catf_baseline_mfe()),
        (MachineType::Ife, "laser_baseline") => Ok(laser_baseline_ife()),
        _ => bail!(
            "unknown case `{case}` for {machine:?}; registered: {}",
            case_names(machine).join(", ")
        ),
    }
}

/// CATF-style conventional tokamak, D-T, single module, NOAK.
fn catf_baseline_mfe() -> Inputs {
    Inputs {
        basic: Basic {
            machine_type: MachineType::Mfe,
            confinement: Confinement::ConventionalTokamak,
            fuel_type: FuelType::Dt,
            p_nrl: 2600.0,
            n_mod: 1.0,
            construction_time: 6.0,
            plant_lifetime: 30.0,
            plant_availability: 0.85,
            yearly_inflation: 0.0245,
            time_to_replace: 10.0,
            downtime: 1.0,
            noak: true,
        },
        power_input: PowerInput {
            f_sub: 0.03,
            mn: 1.1,
            eta_p: 0.5,
            eta_th: 0.46,
            p_trit: 10.0,
            p_house: 4.0,
            p_input: 50.0,
            p_cryo: 0.5,
            p_pump: 1.0,
            eta_pin: Some(0.5),
            p_cool: Some(13.7),
            p_coils: Some(2.0),
            f_dec: Some(0.0),
            eta_de: Some(0.85),
            ..Default::default()
        },
        radial_build: RadialBuild {
            elon: 3.0,
            axis_t: 3.0,
            plasma_t: 1.1,
            vacuum_t: 0.1,
            firstwall_t: 0.2,
            blanket1_t: 0.8,
            reflector_t: 0.2,
            ht_shield_t: 0.2,
            structure_t: 0.2,
            gap1_t: 0.5,
            vessel_t: 0.2,
            gap2_t: 0.5,
            lt_shield_t: 0.3,
            bioshield_t: 1.0,
            coil_t: Some(0.25),
        },
        shield: Shield {
            f_sic: 0.0,
            f_pbli: 0.1,
            f_w: 0.0,
            f_bfs: 0.9,
            ife_shield_scaling: 5.0,
        },
        coils: Some(Coils {
            b_max: 18.0,
            r_coil: 1.85,
            coil_material: Some(CoilMaterial::RebcoHts),
            n_coils: Some(18.0),
            cost_per_kam: None,
            coil_markup: None,
            path_factor: None,
        }),
        heating: Some(Heating {
            nbi_power: 50.0,
            icrf_power: 0.0,
        }),
        primary_structure: PrimaryStructure {
            learning_credit: 0.5,
            replacement_factor: 0.1,
        },
        vacuum_system: VacuumSystem {
            learning_credit: 0.5,
        },
        power_supplies: PowerSupplies {
            learning_credit: 0.5,
            cost_per_watt: 1.0,
        },
        installation: Installation { labor_rate: 1600.0 },
        fuel_handling: FuelHandling {
            learning_curve_credit: 0.8,
        },
        financial: Financial {
            interest_rate: 0.07,
        },
        constants: Constants::default(),
    }
}

/// Laser-driven IFE plant, D-T, single module, NOAK.
fn laser_baseline_ife() -> Inputs {
    Inputs {
        basic: Basic {
            machine_type: MachineType::Ife,
            confinement: Confinement::LaserDriven,
            fuel_type: FuelType::Dt,
            p_nrl: 2800.0,
            n_mod: 1.0,
            construction_time: 6.0,
            plant_lifetime: 30.0,
            plant_availability: 0.85,
            yearly_inflation: 0.0245,
            time_to_replace: 10.0,
            downtime: 1.0,
            noak: true,
        },
        power_input: PowerInput {
            f_sub: 0.03,
            mn: 1.05,
            eta_p: 0.5,
            eta_th: 0.46,
            p_trit: 10.0,
            p_house: 4.0,
            p_input: 0.0,
            p_cryo: 0.5,
            p_pump: 1.0,
            eta_pin1: Some(0.1),
            eta_pin2: Some(0.1),
            p_implosion: Some(10.0),
            p_ignition: Some(0.1),
            p_target: Some(1.0),
            f_dec: Some(0.0),
            eta_de: Some(0.85),
            ..Default::default()
        },
        radial_build: RadialBuild {
            elon: 1.0,
            axis_t: 0.0,
            plasma_t: 5.0,
            vacuum_t: 0.5,
            firstwall_t: 0.1,
            blanket1_t: 1.0,
            reflector_t: 0.1,
            ht_shield_t: 0.3,
            structure_t: 0.2,
            gap1_t: 0.5,
            vessel_t: 0.2,
            gap2_t: 0.5,
            lt_shield_t: 0.3,
            bioshield_t: 1.0,
            coil_t: None,
        },
        shield: Shield {
            f_sic: 0.0,
            f_pbli: 0.1,
            f_w: 0.0,
            f_bfs: 0.9,
            ife_shield_scaling: 5.0,
        },
        coils: None,
        heating: None,
        primary_structure: PrimaryStructure {
            learning_credit: 0.5,
            replacement_factor: 0.1,
        },
        vacuum_system: VacuumSystem {
            learning_credit: 0.5,
        },
        power_supplies: PowerSupplies {
            learning_credit: 0.5,
            cost_per_watt: 1.0,
        },
        installation: Installation { labor_rate: 1600.0 },
        fuel_handling: FuelHandling {
            learning_curve_credit: 0.8,
        },
        financial: Financial {
            interest_rate: 0.07,
        },
        constants: Constants::default(),
    }
}
