use anyhow::{Context, Result};
use serde::Serialize;
use std::f64::consts::PI;

use crate::inputs::{Confinement, FuelType, Inputs, MachineType};
use crate::power::{power_balance, PowerTable};

const MU0: f64 = 1.256_637_062_12e-6;

// ============================================================================
// Result tree
// ============================================================================

/// CAS 10: Pre-construction costs [M$].
#[derive(Debug, Clone, Default, Serialize)]
pub struct Cas10 {
    /// Land and land rights
    pub c110000: f64,
    /// Site permits
    pub c120000: f64,
    /// Plant licensing
    pub c130000: f64,
    /// Plant permits
    pub c140000: f64,
    /// Plant studies
    pub c150000: f64,
    /// Plant reports
    pub c160000: f64,
    /// Other pre-construction
    pub c170000: f64,
    /// Contingency (FOAK only)
    pub c190000: f64,
    pub c100000: f64,
}

/// CAS 21: Buildings [M$], scaled on gross electric power.
#[derive(Debug, Clone, Default, Serialize)]
pub struct Cas21 {
    pub site_improvements: f64,
    pub fusion_heat_island: f64,
    pub turbine_building: f64,
    pub heat_exchanger_building: f64,
    pub power_supply_building: f64,
    pub reactor_auxiliaries: f64,
    pub hot_cell: f64,
    pub reactor_services: f64,
    pub service_water: f64,
    pub fuel_storage: f64,
    pub control_room: f64,
    pub onsite_ac_power: f64,
    pub administration: f64,
    pub site_services: f64,
    pub cryogenics: f64,
    pub security: f64,
    pub ventilation_stack: f64,
    pub isotope_separation: f64,
    pub target_factory: f64,
    pub direct_energy_building: f64,
    pub assembly_hall: f64,
    pub contingency: f64,
    pub c210000: f64,
}

/// CAS 22: Reactor plant equipment [M$].
#[derive(Debug, Clone, Default, Serialize)]
pub struct Cas22 {
    /// First wall and blanket
    pub c220101: f64,
    /// High-temperature shield
    pub c220102: f64,
    /// Coils (simplified conductor-scaling model)
    pub c220103: f64,
    /// Supplementary heating
    pub c220104: f64,
    /// Primary structure
    pub c220105: f64,
    /// Vacuum system
    pub c220106: f64,
    /// Power supplies
    pub c220107: f64,
    /// Divertor (volumetric tungsten model, MFE only)
    pub c220108: f64,
    /// Installation labor
    pub c220111: f64,
    /// Isotope separation plants (D2O, Li-6, H-1, B-11 per fuel cycle)
    pub c220112: f64,
    /// Reactor equipment total, all modules
    pub c220100: f64,
    /// Main heat transfer and transport
    pub c220200: f64,
    /// Auxiliary cooling
    pub c220300: f64,
    /// Fuel handling and storage, incl. tritium containment
    pub c220500: f64,
    /// Instrumentation and control
    pub c220700: f64,
    /// Reactor plant equipment total, all modules
    pub c220000: f64,
}

/// CAS 23-29: Turbine, electric, and miscellaneous plant [M$].
#[derive(Debug, Clone, Default, Serialize)]
pub struct BalanceOfPlant {
    /// Turbine plant equipment
    pub c230000: f64,
    /// Electric plant equipment
    pub c240000: f64,
    /// Miscellaneous plant equipment
    pub c250000: f64,
    /// Heat rejection
    pub c260000: f64,
    /// Special materials
    pub c270000: f64,
    /// Digital twin
    pub c280000: f64,
    /// Contingency on direct costs (FOAK only)
    pub c290000: f64,
}

/// CAS 50: Capitalized supplementary costs [M$].
#[derive(Debug, Clone, Default, Serialize)]
pub struct Cas50 {
    pub c510000: f64,
    pub c520000: f64,
    pub c530000: f64,
    pub c540000: f64,
    pub c550000: f64,
    pub c580000: f64,
    pub c590000: f64,
    pub c500000: f64,
}

/// All capitalized cost accounts [M$].
#[derive(Debug, Clone, Default, Serialize)]
pub struct CapitalCosts {
    pub cas10: Cas10,
    pub cas21: Cas21,
    pub cas22: Cas22,
    pub bop: BalanceOfPlant,
    /// Total direct cost (CAS 20)
    pub c200000: f64,
    /// Indirect service costs (CAS 30)
    pub c300000: f64,
    pub cas50: Cas50,
    /// Interest during construction (CAS 60)
    pub c600000: f64,
    /// Total capital cost (CAS 99)
    pub c990000: f64,
}

/// Annualized cost accounts [M$/year].
#[derive(Debug, Clone, Default, Serialize)]
pub struct AnnualizedCosts {
    /// Levelized O&M (CAS 70)
    pub c700000: f64,
    /// Levelized fuel (CAS 80)
    pub c800000: f64,
    /// Annualized capital (CAS 90)
    pub c900000: f64,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct Lcoe {
    /// Levelized cost of electricity [$ per MWh]
    pub c1000000: f64,
    /// Levelized cost of heat [$ per MWh thermal-equivalent]
    pub c2000000: f64,
}

/// Output of one cost model evaluation. Built fresh per call, never mutated
/// afterwards. Serializable so reporting can walk the numeric fields without
/// schema knowledge.
#[derive(Debug, Clone, Serialize)]
pub struct CostResult {
    pub power: PowerTable,
    pub capital: CapitalCosts,
    pub annualized: AnnualizedCosts,
    pub lcoe: Lcoe,
}

// ============================================================================
// Financial helpers
// ============================================================================

/// Capital Recovery Factor: CRF = i*(1+i)^n / ((1+i)^n - 1).
pub fn capital_recovery_factor(interest_rate: f64, plant_lifetime: f64) -> f64 {
    let i = interest_rate;
    let n = plant_lifetime;
    (i * (1.0 + i).powf(n)) / ((1.0 + i).powf(n) - 1.0)
}

/// Levelized annual cost of a nominally-growing cost stream [M$/year].
///
/// Inflates `annual_cost` (today's dollars) to first-year-of-operation
/// dollars, takes the present value of the growing annuity at the nominal
/// rate, and annualizes with the plain CRF. Construction-period financing is
/// handled separately by CAS 60.
pub fn levelized_annual_cost(
    annual_cost: f64,
    interest_rate: f64,
    inflation_rate: f64,
    plant_lifetime: f64,
    construction_time: f64,
) -> f64 {
    let i = interest_rate;
    let g = inflation_rate;
    let n = plant_lifetime;

    if i <= 0.0 || n <= 0.0 {
        return annual_cost;
    }

    let a1 = annual_cost * (1.0 + g).powf(construction_time);
    let pv = if (i - g).abs() < 1e-9 {
        // L'Hopital limit when discount rate equals inflation
        a1 * n / (1.0 + i)
    } else {
        a1 * (1.0 - ((1.0 + g) / (1.0 + i)).powf(n)) / (i - g)
    };

    capital_recovery_factor(i, n) * pv
}

/// Interest-during-construction fraction assuming uniform capital spending:
/// f_IDC = ((1+i)^T - 1) / (i*T) - 1.
pub fn idc_fraction(interest_rate: f64, construction_time: f64) -> f64 {
    let i = interest_rate;
    let t = construction_time;
    if i <= 0.0 || t <= 0.0 {
        return 0.0;
    }
    ((1.0 + i).powf(t) - 1.0) / (i * t) - 1.0
}

// ============================================================================
// Geometry helpers
// ============================================================================

/// Volume of an elongated torus shell between minor radii ir and ir+t [m^3].
pub fn torus_shell_volume(elon: f64, major_r: f64, ir: f64, t: f64) -> f64 {
    elon * 2.0 * PI * PI * major_r * ((ir + t).powi(2) - ir.powi(2))
}

/// Volume of a spherical shell between radii ir and ir+t [m^3].
pub fn sphere_shell_volume(ir: f64, t: f64) -> f64 {
    4.0 / 3.0 * PI * ((ir + t).powi(3) - ir.powi(3))
}

/// Conductor geometry factor for the simplified coil model.
///
/// Tokamaks: 4*pi^2 regardless of coil count. Mirrors: n_coils * 4*pi.
/// Stellarators: tokamak factor times the coil path length multiplier.
pub fn coil_geometry_factor(confinement: Confinement, n_coils: f64, path_factor: f64) -> f64 {
    match confinement {
        Confinement::SphericalTokamak | Confinement::ConventionalTokamak => 4.0 * PI * PI,
        Confinement::MagneticMirror => n_coils * 4.0 * PI,
        Confinement::Stellarator => 4.0 * PI * PI * path_factor,
        Confinement::LaserDriven => 0.0,
    }
}

fn default_coil_markup(confinement: Confinement) -> f64 {
    match confinement {
        Confinement::MagneticMirror => 2.5,
        Confinement::SphericalTokamak => 6.0,
        Confinement::ConventionalTokamak => 8.0,
        Confinement::Stellarator => 12.0,
        Confinement::LaserDriven => 0.0,
    }
}

/// Simplified coil conductor quantity [kAm]: G * B * R^2 / mu0, in kA.
pub fn coil_total_kam(geometry_factor: f64, b_max: f64, r_coil: f64) -> f64 {
    geometry_factor * b_max * r_coil * r_coil / MU0 / 1000.0
}

// ============================================================================
// Scaling lookups
// ============================================================================

/// Tritium-containment building scaling: D-T needs full containment
/// structure, other fuels roughly half.
fn fuel_scaling_factor(machine: MachineType, fuel: FuelType) -> f64 {
    match (machine, fuel) {
        (MachineType::Mfe, FuelType::Dt) => 1.0,
        (MachineType::Mfe, _) => 0.5,
        (MachineType::Ife, _) => 1.0,
    }
}

fn isotope_separation_scaling(fuel: FuelType) -> f64 {
    match fuel {
        FuelType::Dt => 1.0,
        FuelType::Dd => 0.6,
        FuelType::Dhe3 => 0.8,
        FuelType::Pb11 => 1.2,
    }
}

fn cryogenics_scaling(machine: MachineType) -> f64 {
    match machine {
        MachineType::Mfe => 1.0,
        MachineType::Ife => 0.3,
    }
}

fn dec_building_scaling(fuel: FuelType) -> f64 {
    match fuel {
        FuelType::Dt => 0.2,
        FuelType::Dd => 0.4,
        FuelType::Dhe3 => 1.0,
        FuelType::Pb11 => 1.5,
    }
}

// ============================================================================
// Stages
// ============================================================================

fn cas10_pre_construction(inputs: &Inputs, pt: &PowerTable) -> Cas10 {
    let c = &inputs.constants;
    let basic = &inputs.basic;
    let mut cas10 = Cas10::default();

    // Land intensity approach: site area from net electric power, with
    // multi-module plants sharing infrastructure as sqrt(n_mod).
    let site_area_acres = c.land_intensity_acres_per_mwe * pt.p_net * basic.n_mod.sqrt();
    cas10.c110000 = site_area_acres * c.land_cost_usd_per_acre / 1e6;

    cas10.c120000 = c.site_permits;
    cas10.c130000 = inputs.licensing_cost();
    cas10.c140000 = c.plant_permits;
    cas10.c150000 = if basic.noak {
        c.plant_studies_noak
    } else {
        c.plant_studies_foak
    };
    cas10.c160000 = c.plant_reports;
    cas10.c170000 = c.other_pre_construction;

    let subtotal = cas10.c110000
        + cas10.c120000
        + cas10.c130000
        + cas10.c140000
        + cas10.c150000
        + cas10.c160000
        + cas10.c170000;
    cas10.c190000 = if basic.noak {
        0.0
    } else {
        c.contingency_rate * subtotal
    };
    cas10.c100000 = subtotal + cas10.c190000;
    cas10
}

fn cas21_buildings(inputs: &Inputs, pt: &PowerTable) -> Cas21 {
    let c = &inputs.constants;
    let basic = &inputs.basic;
    let p_et = pt.p_et;
    let mut cas21 = Cas21::default();

    let fuel_scale = fuel_scaling_factor(basic.machine_type, basic.fuel_type);
    let isotope_scale = isotope_separation_scaling(basic.fuel_type);
    let cryo_scale = cryogenics_scaling(basic.machine_type);
    let dec_scale = dec_building_scaling(basic.fuel_type);

    // $/kW on gross electric, converted to M$
    let per_kw = |rate: f64| rate / 1e3 * p_et;

    cas21.site_improvements = per_kw(c.site_improvements_per_kw) * fuel_scale;
    cas21.fusion_heat_island = per_kw(c.fusion_heat_island_per_kw) * fuel_scale;
    cas21.turbine_building = per_kw(c.turbine_building_per_kw);
    cas21.heat_exchanger_building = per_kw(c.heat_exchanger_building_per_kw);
    cas21.power_supply_building = per_kw(c.power_supply_building_per_kw);
    cas21.reactor_auxiliaries = per_kw(c.reactor_auxiliaries_per_kw);
    cas21.hot_cell = per_kw(c.hot_cell_per_kw) * fuel_scale;
    cas21.reactor_services = per_kw(c.reactor_services_per_kw);
    cas21.service_water = per_kw(c.service_water_per_kw);
    cas21.fuel_storage = per_kw(c.fuel_storage_per_kw) * fuel_scale;
    cas21.control_room = per_kw(c.control_room_per_kw);
    cas21.onsite_ac_power = per_kw(c.onsite_ac_power_per_kw);
    cas21.administration = per_kw(c.administration_per_kw);
    cas21.site_services = per_kw(c.site_services_per_kw);
    cas21.cryogenics = per_kw(c.cryogenics_per_kw) * cryo_scale;
    cas21.security = per_kw(c.security_per_kw);
    cas21.ventilation_stack = per_kw(c.ventilation_stack_per_kw);
    cas21.isotope_separation = per_kw(c.isotope_separation_per_kw) * isotope_scale;
    cas21.target_factory = match basic.machine_type {
        MachineType::Ife => per_kw(c.target_factory_per_kw),
        MachineType::Mfe => 0.0,
    };
    cas21.direct_energy_building = per_kw(c.direct_energy_building_per_kw) * dec_scale;
    cas21.assembly_hall = per_kw(c.assembly_hall_per_kw);

    let subtotal = cas21.site_improvements
        + cas21.fusion_heat_island
        + cas21.turbine_building
        + cas21.heat_exchanger_building
        + cas21.power_supply_building
        + cas21.reactor_auxiliaries
        + cas21.hot_cell
        + cas21.reactor_services
        + cas21.service_water
        + cas21.fuel_storage
        + cas21.control_room
        + cas21.onsite_ac_power
        + cas21.administration
        + cas21.site_services
        + cas21.cryogenics
        + cas21.security
        + cas21.ventilation_stack
        + cas21.isotope_separation
        + cas21.target_factory
        + cas21.direct_energy_building
        + cas21.assembly_hall;
    cas21.contingency = if basic.noak {
        0.0
    } else {
        c.contingency_rate * subtotal
    };
    cas21.c210000 = subtotal + cas21.contingency;
    cas21
}

/// Simplified coil costing: conductor kAm from Ampere's-law scaling, material
/// cost per kAm, confinement-dependent manufacturing markup.
pub fn cas220103_coils(inputs: &Inputs) -> Result<(f64, f64, f64)> {
    let coils = inputs
        .coils
        .as_ref()
        .context("coils section required for MFE reactor equipment")?;
    let confinement = inputs.basic.confinement;

    let n_coils = coils.n_coils.unwrap_or(match confinement {
        Confinement::MagneticMirror => 4.0,
        _ => 20.0,
    });
    let path_factor = coils.path_factor.unwrap_or(2.0);
    let g = coil_geometry_factor(confinement, n_coils, path_factor);

    let cost_per_kam = coils.cost_per_kam.unwrap_or_else(|| {
        coils
            .coil_material
            .unwrap_or(crate::inputs::CoilMaterial::RebcoHts)
            .default_cost_per_kam()
    });
    let markup = coils
        .coil_markup
        .unwrap_or_else(|| default_coil_markup(confinement));

    let total_kam = coil_total_kam(g, coils.b_max, coils.r_coil);
    let conductor_cost = total_kam * cost_per_kam / 1e6;
    Ok((total_kam, conductor_cost, conductor_cost * markup))
}

fn cas22_reactor_equipment(inputs: &Inputs, pt: &PowerTable) -> Result<Cas22> {
    let c = &inputs.constants;
    let basic = &inputs.basic;
    let rb = &inputs.radial_build;
    let mut cas22 = Cas22::default();

    // Minor radii build outward from the plasma centerline.
    let fw_ir = rb.plasma_t + rb.vacuum_t;
    let bl_ir = fw_ir + rb.firstwall_t;
    let refl_ir = bl_ir + rb.blanket1_t;
    let shield_ir = refl_ir + rb.reflector_t;

    let (fw_vol, bl_vol, shield_vol) = match basic.machine_type {
        MachineType::Mfe => (
            torus_shell_volume(rb.elon, rb.axis_t, fw_ir, rb.firstwall_t),
            torus_shell_volume(rb.elon, rb.axis_t, bl_ir, rb.blanket1_t),
            torus_shell_volume(rb.elon, rb.axis_t, shield_ir, rb.ht_shield_t),
        ),
        MachineType::Ife => (
            sphere_shell_volume(fw_ir, rb.firstwall_t),
            sphere_shell_volume(bl_ir, rb.blanket1_t),
            sphere_shell_volume(shield_ir, rb.ht_shield_t),
        ),
    };

    // 22.01.01 First wall and blanket
    cas22.c220101 = fw_vol * c.firstwall_musd_per_m3 + bl_vol * c.blanket_musd_per_m3;

    // 22.01.02 High-temperature shield: blended material fractions
    let sh = &inputs.shield;
    let blend = sh.f_sic * c.shield_sic_musd_per_m3
        + sh.f_pbli * c.shield_pbli_musd_per_m3
        + sh.f_w * c.shield_w_musd_per_m3
        + sh.f_bfs * c.shield_bfs_musd_per_m3;
    let shield_scale = match basic.machine_type {
        MachineType::Ife => sh.ife_shield_scaling,
        MachineType::Mfe => 1.0,
    };
    cas22.c220102 = shield_vol * blend * shield_scale;

    // 22.01.03 Coils (MFE only)
    cas22.c220103 = match basic.machine_type {
        MachineType::Mfe => cas220103_coils(inputs)?.2,
        MachineType::Ife => 0.0,
    };

    // 22.01.04 Supplementary heating ($/W == M$/MW)
    cas22.c220104 = match &inputs.heating {
        Some(h) => h.nbi_power * c.nbi_usd_per_w + h.icrf_power * c.icrf_usd_per_w,
        None => 0.0,
    };

    // 22.01.05 Primary structure: economy-of-scale on gross electric
    cas22.c220105 = c.primary_structure_reference_musd
        * (pt.p_et / c.primary_structure_reference_mwe).powf(0.6)
        * inputs.primary_structure.learning_credit;

    // 22.01.06 Vacuum system
    cas22.c220106 = c.vacuum_system_reference_musd * inputs.vacuum_system.learning_credit;

    // 22.01.07 Power supplies, sized on driver wall-plug power
    let supply_mw = match basic.machine_type {
        MachineType::Mfe => {
            let eta_pin = inputs
                .power_input
                .eta_pin
                .context("power_input.eta_pin required for power supply sizing")?;
            inputs.power_input.p_input / eta_pin
        }
        MachineType::Ife => {
            let pin = &inputs.power_input;
            pin.p_implosion.unwrap_or(0.0) / pin.eta_pin1.unwrap_or(1.0)
                + pin.p_ignition.unwrap_or(0.0) / pin.eta_pin2.unwrap_or(1.0)
        }
    };
    cas22.c220107 =
        supply_mw * inputs.power_supplies.cost_per_watt * inputs.power_supplies.learning_credit;

    // 22.01.08 Divertor: annular tungsten volume spanning the in-vessel
    // build, raw material cost times manufacturing and complexity factors.
    // IFE chambers have no divertor.
    cas22.c220108 = match basic.machine_type {
        MachineType::Mfe => {
            let min_rad = rb.plasma_t + rb.vacuum_t;
            let maj_rad = min_rad
                + rb.firstwall_t
                + rb.blanket1_t
                + rb.reflector_t
                + rb.ht_shield_t
                + rb.structure_t
                + rb.gap1_t
                + rb.vessel_t
                + rb.lt_shield_t;
            let thickness_r = 2.0 * min_rad;
            let vol = ((maj_rad + thickness_r).powi(2) - (maj_rad - thickness_r).powi(2))
                * PI
                * c.divertor_thickness_z_m
                * c.divertor_vol_frac;
            vol * c.tungsten_kg_per_m3 * c.tungsten_usd_per_kg
                * c.tungsten_manufacturing_factor
                * c.divertor_complexity_factor
                / 1e6
        }
        MachineType::Ife => 0.0,
    };

    // 22.01.11 Installation labor, per module
    let labor_musd = inputs.installation.labor_rate / 1e6;
    let crew = c.installation_base_crew * rb.axis_t / 4.0;
    cas22.c220111 = basic.construction_time
        * labor_musd
        * c.installation_base_crew
        * c.installation_base_days
        + labor_musd * c.installation_system_multiplier * crew;

    // 22.01.12 Isotope separation plants, scaled on net electric output:
    // deuterium extraction for D-bearing fuels, Li-6 enrichment for tritium
    // breeding, protium purification and B-11 enrichment for p-B11.
    let throughput = (pt.p_net / 1000.0).powf(c.isotope_scaling_exponent);
    cas22.c220112 = match basic.fuel_type {
        FuelType::Dt => (c.isotope_d2o_musd_per_gwe + c.isotope_li6_musd_per_gwe) * throughput,
        FuelType::Dd | FuelType::Dhe3 => c.isotope_d2o_musd_per_gwe * throughput,
        FuelType::Pb11 => (c.isotope_h1_musd_per_gwe + c.isotope_b11_musd_per_gwe) * throughput,
    };

    cas22.c220100 = (cas22.c220101
        + cas22.c220102
        + cas22.c220103
        + cas22.c220104
        + cas22.c220105
        + cas22.c220106
        + cas22.c220107
        + cas22.c220108
        + cas22.c220111
        + cas22.c220112)
        * basic.n_mod;

    // 22.02 / 22.03 scale on thermal power
    cas22.c220200 = c.heat_transfer_musd_per_mw_th * pt.p_th;
    cas22.c220300 = c.aux_cooling_musd_per_mw_th * pt.p_th;

    // 22.05 Fuel handling: ITER-derived base with learning credit, plus
    // fuel-dependent tritium containment power law.
    let electric_gwe = pt.p_net / 1000.0;
    let containment = match basic.fuel_type {
        FuelType::Dt => {
            c.tritium_containment_dt_musd_per_gwe * electric_gwe.powf(c.tritium_containment_exponent)
        }
        FuelType::Dd => {
            c.tritium_containment_dd_musd_per_gwe * electric_gwe.powf(c.tritium_containment_exponent)
        }
        _ => 0.0,
    };
    cas22.c220500 =
        c.fuel_handling_iter_musd * inputs.fuel_handling.learning_curve_credit + containment;

    // 22.07 Instrumentation and control: economy-of-scale on thermal power
    cas22.c220700 =
        c.ic_reference_cost_musd * (pt.p_th / c.ic_reference_p_th_mw).powf(c.ic_scaling_exponent);

    cas22.c220000 = cas22.c220100
        + (cas22.c220200 + cas22.c220300 + cas22.c220500 + cas22.c220700) * basic.n_mod;
    Ok(cas22)
}

fn balance_of_plant(inputs: &Inputs, pt: &PowerTable, cas21: &Cas21, cas22: &Cas22) -> BalanceOfPlant {
    let c = &inputs.constants;
    let basic = &inputs.basic;
    let mut bop = BalanceOfPlant::default();
    let scaled = basic.n_mod * pt.p_et;

    bop.c230000 = scaled * c.turbine_plant_per_mw;
    bop.c240000 = scaled * c.electric_plant_per_mw;
    bop.c250000 = scaled * c.misc_plant_per_mw;
    bop.c260000 = scaled * c.heat_rejection_per_mw * c.inflation_2019_to_present;
    bop.c270000 = c.special_materials_musd;
    bop.c280000 = c.digital_twin_musd;

    let direct = cas21.c210000
        + cas22.c220000
        + bop.c230000
        + bop.c240000
        + bop.c250000
        + bop.c260000
        + bop.c270000
        + bop.c280000;
    bop.c290000 = if basic.noak {
        0.0
    } else {
        c.contingency_rate * direct
    };
    bop
}

fn cas50_supplementary(inputs: &Inputs, pt: &PowerTable, bop: &BalanceOfPlant) -> Cas50 {
    let c = &inputs.constants;
    let mut cas50 = Cas50::default();

    cas50.c510000 = c.shipping_musd;
    // Spare parts as a fraction of non-reactor plant equipment
    cas50.c520000 = c.spare_parts_fraction
        * (bop.c230000 + bop.c240000 + bop.c250000 + bop.c260000 + bop.c270000 + bop.c280000);
    cas50.c530000 = c.taxes_musd;
    cas50.c540000 = c.insurance_musd;
    cas50.c550000 =
        pt.p_net / c.fuel_load_reference_power_mw * c.fuel_load_reference_cost_musd;
    cas50.c580000 = c.decommissioning_musd;

    let subtotal = cas50.c510000
        + cas50.c520000
        + cas50.c530000
        + cas50.c540000
        + cas50.c550000
        + cas50.c580000;
    cas50.c590000 = if inputs.basic.noak {
        0.0
    } else {
        c.contingency_rate * subtotal
    };
    cas50.c500000 = subtotal + cas50.c590000;
    cas50
}

/// Annual deuterium fuel cost [M$/year] from the burn rate implied by the
/// fusion power (STARFIRE-derived unit cost, DT reaction energy 17.58 MeV).
fn annual_fuel_cost(inputs: &Inputs) -> f64 {
    const M_D_KG: f64 = 3.342e-27;
    const J_PER_MEV: f64 = 1.6021e-13;
    let basic = &inputs.basic;
    let usd_per_year = basic.n_mod
        * basic.p_nrl
        * 1e6
        * 3600.0
        * 8760.0
        * inputs.constants.deuterium_usd_per_kg
        * M_D_KG
        * basic.plant_availability
        / (17.58 * J_PER_MEV);
    usd_per_year / 1e6
}

// ============================================================================
// Pipeline
// ============================================================================

/// Evaluate the full staged cost model: power balance, capitalized cost
/// accounts, annualized accounts, LCOE. Pure and deterministic; no I/O.
pub fn evaluate(inputs: &Inputs) -> Result<CostResult> {
    let basic = &inputs.basic;
    let fin = &inputs.financial;
    let c = &inputs.constants;

    let power = power_balance(basic, &inputs.power_input)?;

    let cas10 = cas10_pre_construction(inputs, &power);
    let cas21 = cas21_buildings(inputs, &power);
    let cas22 = cas22_reactor_equipment(inputs, &power)?;
    let bop = balance_of_plant(inputs, &power, &cas21, &cas22);

    let c200000 = cas21.c210000
        + cas22.c220000
        + bop.c230000
        + bop.c240000
        + bop.c250000
        + bop.c260000
        + bop.c270000
        + bop.c280000
        + bop.c290000;

    if c.reference_construction_time <= 0.0 {
        anyhow::bail!("constants.reference_construction_time must be positive");
    }
    let c300000 = c.indirect_fraction * c200000
        * (basic.construction_time / c.reference_construction_time);

    let cas50 = cas50_supplementary(inputs, &power, &bop);

    let overnight = cas10.c100000 + c200000 + c300000 + cas50.c500000;
    let c600000 = idc_fraction(fin.interest_rate, basic.construction_time) * overnight;
    let c990000 = overnight + c600000;

    let capital = CapitalCosts {
        cas10,
        cas21,
        cas22,
        bop,
        c200000,
        c300000,
        cas50,
        c600000,
        c990000,
    };

    // Annualization: CRF over the operating lifetime, with OPEX and fuel
    // levelized as growing annuities shifted by the total project time.
    if fin.interest_rate <= 0.0 || basic.plant_lifetime <= 0.0 {
        anyhow::bail!("financial.interest_rate and basic.plant_lifetime must be positive");
    }
    let crf = capital_recovery_factor(fin.interest_rate, basic.plant_lifetime);
    let project_time = inputs.total_project_time();

    let annual_om = c.om_usd_per_kw_year * power.p_net * 1000.0 / 1e6;
    let annualized = AnnualizedCosts {
        c700000: levelized_annual_cost(
            annual_om,
            fin.interest_rate,
            basic.yearly_inflation,
            basic.plant_lifetime,
            project_time,
        ),
        c800000: levelized_annual_cost(
            annual_fuel_cost(inputs),
            fin.interest_rate,
            basic.yearly_inflation,
            basic.plant_lifetime,
            project_time,
        ),
        c900000: crf * capital.c990000,
    };

    let annual_energy_mwh = 8760.0 * power.p_net * basic.n_mod * basic.plant_availability;
    if annual_energy_mwh <= 0.0 {
        anyhow::bail!("annual energy production is zero; LCOE undefined");
    }
    let c1000000 =
        (annualized.c900000 + annualized.c700000 + annualized.c800000) * 1e6 / annual_energy_mwh;
    let lcoe = Lcoe {
        c1000000,
        c2000000: c1000000 / 10.0,
    };

    Ok(CostResult {
        power,
        capital,
        annualized,
        lcoe,
    })
}
