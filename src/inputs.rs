use serde::{Deserialize, Serialize};

/// Top-level fusion machine family.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum MachineType {
    /// Magnetic fusion energy (tokamaks, mirrors, stellarators)
    Mfe,
    /// Inertial fusion energy (laser-driven)
    Ife,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Confinement {
    SphericalTokamak,
    ConventionalTokamak,
    MagneticMirror,
    Stellarator,
    LaserDriven,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FuelType {
    Dt,
    Dd,
    Dhe3,
    Pb11,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CoilMaterial {
    RebcoHts,
    Nb3sn,
    Nbti,
    Copper,
}

impl CoilMaterial {
    /// Default conductor cost in $/kAm.
    pub fn default_cost_per_kam(self) -> f64 {
        match self {
            CoilMaterial::RebcoHts => 50.0,
            CoilMaterial::Nb3sn => 7.0,
            CoilMaterial::Nbti => 7.0,
            CoilMaterial::Copper => 1.0,
        }
    }
}

/// The full parameter tree for one plant design. Numeric fields are the
/// sensitivity parameter population; enums and booleans are categorical and
/// excluded from perturbation. Optional sections/fields are machine-type
/// dependent and left unset (null) when not applicable.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Inputs {
    pub basic: Basic,
    pub power_input: PowerInput,
    pub radial_build: RadialBuild,
    pub shield: Shield,
    pub coils: Option<Coils>,
    pub heating: Option<Heating>,
    pub primary_structure: PrimaryStructure,
    pub vacuum_system: VacuumSystem,
    pub power_supplies: PowerSupplies,
    pub installation: Installation,
    pub fuel_handling: FuelHandling,
    pub financial: Financial,
    #[serde(default)]
    pub constants: Constants,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Basic {
    pub machine_type: MachineType,
    pub confinement: Confinement,
    pub fuel_type: FuelType,
    /// Total fusion power [MW]
    pub p_nrl: f64,
    /// Number of identical fusion modules
    pub n_mod: f64,
    /// Physical construction duration [years]
    pub construction_time: f64,
    /// Operating lifetime [years]
    pub plant_lifetime: f64,
    /// Capacity factor, fraction in [0, 1]
    pub plant_availability: f64,
    pub yearly_inflation: f64,
    /// Component replacement interval [years]
    pub time_to_replace: f64,
    /// Scheduled downtime [years]
    pub downtime: f64,
    /// Nth-of-a-kind plant: drops contingency and FOAK licensing time
    #[serde(default)]
    pub noak: bool,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PowerInput {
    /// Subsystem and control power fraction of gross electric
    pub f_sub: f64,
    /// Neutron energy multiplication in the blanket
    pub mn: f64,
    /// Pumping power heat capture efficiency
    pub eta_p: f64,
    /// Thermal conversion efficiency
    pub eta_th: f64,
    /// Tritium systems power [MW]
    pub p_trit: f64,
    /// Housekeeping power [MW]
    pub p_house: f64,
    /// Auxiliary heating power injected into the plasma [MW]
    pub p_input: f64,
    /// Cryogenic plant power [MW]
    pub p_cryo: f64,
    /// Primary coolant pumping power [MW]
    pub p_pump: f64,
    /// Heating wall-plug efficiency (MFE)
    pub eta_pin: Option<f64>,
    /// Coil cooling power [MW] (MFE)
    pub p_cool: Option<f64>,
    /// Power delivered into coils [MW] (MFE)
    pub p_coils: Option<f64>,
    /// Direct energy converter capture fraction (MFE, 0 disables DEC)
    pub f_dec: Option<f64>,
    /// Direct energy conversion efficiency
    pub eta_de: Option<f64>,
    /// Implosion driver wall-plug efficiency (IFE)
    pub eta_pin1: Option<f64>,
    /// Ignition driver wall-plug efficiency (IFE)
    pub eta_pin2: Option<f64>,
    /// Implosion laser power [MW] (IFE)
    pub p_implosion: Option<f64>,
    /// Ignition laser power [MW] (IFE)
    pub p_ignition: Option<f64>,
    /// Target factory power [MW] (IFE)
    pub p_target: Option<f64>,
    /// DD tritium burn fraction override
    pub dd_f_t: Option<f64>,
    /// DD He-3 burn fraction override
    pub dd_f_he3: Option<f64>,
    /// D-He3 energy fraction from D-D side reactions
    pub dhe3_dd_frac: Option<f64>,
    /// D-He3 tritium burn fraction in D-D sides
    pub dhe3_f_t: Option<f64>,
}

/// Radial build thicknesses [m], ordered outward from the plasma axis.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RadialBuild {
    /// Plasma elongation (vertical stretch of the torus cross-section)
    pub elon: f64,
    /// Major radius of the plasma axis [m]
    pub axis_t: f64,
    pub plasma_t: f64,
    pub vacuum_t: f64,
    pub firstwall_t: f64,
    pub blanket1_t: f64,
    pub reflector_t: f64,
    pub ht_shield_t: f64,
    pub structure_t: f64,
    pub gap1_t: f64,
    pub vessel_t: f64,
    pub gap2_t: f64,
    pub lt_shield_t: f64,
    pub bioshield_t: f64,
    pub coil_t: Option<f64>,
}

/// High-temperature shield material fractions (should sum to ~1).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Shield {
    pub f_sic: f64,
    pub f_pbli: f64,
    pub f_w: f64,
    pub f_bfs: f64,
    /// IFE shield cost multiplier relative to MFE
    #[serde(default = "default_ife_shield_scaling")]
    pub ife_shield_scaling: f64,
}

fn default_ife_shield_scaling() -> f64 {
    5.0
}

/// Simplified coil costing model: conductor quantity from Ampere's law
/// scaling, markup per confinement geometry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Coils {
    /// Peak field at the coil [T]
    pub b_max: f64,
    /// Major radius at the coil bore [m]
    pub r_coil: f64,
    pub coil_material: Option<CoilMaterial>,
    /// Number of physical coils (mirrors only; tokamak G is coil-count free)
    pub n_coils: Option<f64>,
    /// Conductor cost [$ per kAm]; defaults from coil_material
    pub cost_per_kam: Option<f64>,
    /// Manufacturing markup; defaults from confinement
    pub coil_markup: Option<f64>,
    /// Stellarator coil path length multiplier
    pub path_factor: Option<f64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Heating {
    /// Neutral beam injection power [MW]
    pub nbi_power: f64,
    /// Ion cyclotron RF power [MW]
    pub icrf_power: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PrimaryStructure {
    pub learning_credit: f64,
    pub replacement_factor: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VacuumSystem {
    pub learning_credit: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PowerSupplies {
    pub learning_credit: f64,
    /// Power supply cost [$ per W delivered]
    pub cost_per_watt: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Installation {
    /// Installation labor rate [$ per worker-day]
    pub labor_rate: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FuelHandling {
    /// Tenth-of-a-kind learning credit on ITER-derived subsystem costs
    pub learning_curve_credit: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Financial {
    /// Nominal discount rate, decimal
    pub interest_rate: f64,
}

/// Calibration constants for the cost model. All values carry literature or
/// reference-plant provenance; every one is a legitimate sensitivity
/// parameter, which is why they live in the input tree rather than in code.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Constants {
    // CAS 10: pre-construction
    pub land_intensity_acres_per_mwe: f64,
    pub land_cost_usd_per_acre: f64,
    pub site_permits: f64,
    pub licensing_dt: f64,
    pub licensing_dd: f64,
    pub licensing_dhe3: f64,
    pub licensing_pb11: f64,
    pub licensing_time_dt: f64,
    pub licensing_time_dd: f64,
    pub licensing_time_dhe3: f64,
    pub licensing_time_pb11: f64,
    pub plant_permits: f64,
    pub plant_studies_foak: f64,
    pub plant_studies_noak: f64,
    pub plant_reports: f64,
    pub other_pre_construction: f64,
    pub contingency_rate: f64,

    // CAS 21: building costs [$ per kW gross electric]
    pub site_improvements_per_kw: f64,
    pub fusion_heat_island_per_kw: f64,
    pub turbine_building_per_kw: f64,
    pub heat_exchanger_building_per_kw: f64,
    pub power_supply_building_per_kw: f64,
    pub reactor_auxiliaries_per_kw: f64,
    pub hot_cell_per_kw: f64,
    pub reactor_services_per_kw: f64,
    pub service_water_per_kw: f64,
    pub fuel_storage_per_kw: f64,
    pub control_room_per_kw: f64,
    pub onsite_ac_power_per_kw: f64,
    pub administration_per_kw: f64,
    pub site_services_per_kw: f64,
    pub cryogenics_per_kw: f64,
    pub security_per_kw: f64,
    pub ventilation_stack_per_kw: f64,
    pub isotope_separation_per_kw: f64,
    pub target_factory_per_kw: f64,
    pub direct_energy_building_per_kw: f64,
    pub assembly_hall_per_kw: f64,

    // CAS 22: reactor equipment material and subsystem calibration
    pub firstwall_musd_per_m3: f64,
    pub blanket_musd_per_m3: f64,
    pub shield_sic_musd_per_m3: f64,
    pub shield_pbli_musd_per_m3: f64,
    pub shield_w_musd_per_m3: f64,
    pub shield_bfs_musd_per_m3: f64,
    pub nbi_usd_per_w: f64,
    pub icrf_usd_per_w: f64,
    pub primary_structure_reference_musd: f64,
    pub primary_structure_reference_mwe: f64,
    pub vacuum_system_reference_musd: f64,
    pub installation_base_days: f64,
    pub installation_base_crew: f64,
    pub installation_system_multiplier: f64,
    pub divertor_thickness_z_m: f64,
    pub divertor_vol_frac: f64,
    pub divertor_complexity_factor: f64,
    pub tungsten_kg_per_m3: f64,
    pub tungsten_usd_per_kg: f64,
    pub tungsten_manufacturing_factor: f64,
    pub isotope_d2o_musd_per_gwe: f64,
    pub isotope_li6_musd_per_gwe: f64,
    pub isotope_h1_musd_per_gwe: f64,
    pub isotope_b11_musd_per_gwe: f64,
    pub isotope_scaling_exponent: f64,
    pub fuel_handling_iter_musd: f64,
    pub tritium_containment_dt_musd_per_gwe: f64,
    pub tritium_containment_dd_musd_per_gwe: f64,
    pub tritium_containment_exponent: f64,
    pub heat_transfer_musd_per_mw_th: f64,
    pub aux_cooling_musd_per_mw_th: f64,
    pub ic_reference_cost_musd: f64,
    pub ic_reference_p_th_mw: f64,
    pub ic_scaling_exponent: f64,

    // CAS 23-28: balance of plant [M$ per MW gross electric]
    pub turbine_plant_per_mw: f64,
    pub electric_plant_per_mw: f64,
    pub misc_plant_per_mw: f64,
    pub heat_rejection_per_mw: f64,
    pub inflation_2019_to_present: f64,
    pub special_materials_musd: f64,
    pub digital_twin_musd: f64,

    // CAS 30: indirect services
    pub indirect_fraction: f64,
    pub reference_construction_time: f64,

    // CAS 50: supplementary
    pub shipping_musd: f64,
    pub spare_parts_fraction: f64,
    pub taxes_musd: f64,
    pub insurance_musd: f64,
    pub fuel_load_reference_cost_musd: f64,
    pub fuel_load_reference_power_mw: f64,
    pub decommissioning_musd: f64,

    // CAS 70/80: annualized operations and fuel
    pub om_usd_per_kw_year: f64,
    pub deuterium_usd_per_kg: f64,
}

impl Default for Constants {
    fn default() -> Self {
        Self {
            land_intensity_acres_per_mwe: 0.25,
            land_cost_usd_per_acre: 10_000.0,
            site_permits: 3.0,
            licensing_dt: 5.0,
            licensing_dd: 3.0,
            licensing_dhe3: 1.0,
            licensing_pb11: 0.1,
            licensing_time_dt: 2.5,
            licensing_time_dd: 1.5,
            licensing_time_dhe3: 0.75,
            licensing_time_pb11: 0.0,
            plant_permits: 2.0,
            plant_studies_foak: 20.0,
            plant_studies_noak: 4.0,
            plant_reports: 2.0,
            other_pre_construction: 1.0,
            contingency_rate: 0.1,

            site_improvements_per_kw: 268.0,
            fusion_heat_island_per_kw: 186.8,
            turbine_building_per_kw: 54.0,
            heat_exchanger_building_per_kw: 37.8,
            power_supply_building_per_kw: 10.8,
            reactor_auxiliaries_per_kw: 5.4,
            hot_cell_per_kw: 93.4,
            reactor_services_per_kw: 18.7,
            service_water_per_kw: 0.3,
            fuel_storage_per_kw: 1.1,
            control_room_per_kw: 0.9,
            onsite_ac_power_per_kw: 0.8,
            administration_per_kw: 4.4,
            site_services_per_kw: 1.6,
            cryogenics_per_kw: 2.4,
            security_per_kw: 0.9,
            ventilation_stack_per_kw: 27.0,
            isotope_separation_per_kw: 15.0,
            target_factory_per_kw: 10.0,
            direct_energy_building_per_kw: 5.0,
            assembly_hall_per_kw: 8.0,

            firstwall_musd_per_m3: 1.7,
            blanket_musd_per_m3: 0.4,
            shield_sic_musd_per_m3: 0.046,
            shield_pbli_musd_per_m3: 0.15,
            shield_w_musd_per_m3: 0.19,
            shield_bfs_musd_per_m3: 0.03,
            nbi_usd_per_w: 5.6,
            icrf_usd_per_w: 3.0,
            primary_structure_reference_musd: 120.0,
            primary_structure_reference_mwe: 1000.0,
            vacuum_system_reference_musd: 250.0,
            installation_base_days: 300.0,
            installation_base_crew: 20.0,
            installation_system_multiplier: 68.0,
            divertor_thickness_z_m: 0.5,
            divertor_vol_frac: 0.2,
            divertor_complexity_factor: 8.0,
            tungsten_kg_per_m3: 19_300.0,
            tungsten_usd_per_kg: 100.0,
            tungsten_manufacturing_factor: 3.0,
            isotope_d2o_musd_per_gwe: 300.0,
            isotope_li6_musd_per_gwe: 100.0,
            isotope_h1_musd_per_gwe: 30.0,
            isotope_b11_musd_per_gwe: 125.0,
            isotope_scaling_exponent: 0.6,
            fuel_handling_iter_musd: 186.0,
            tritium_containment_dt_musd_per_gwe: 200.0,
            tritium_containment_dd_musd_per_gwe: 20.0,
            tritium_containment_exponent: 0.7,
            heat_transfer_musd_per_mw_th: 0.04,
            aux_cooling_musd_per_mw_th: 0.011,
            ic_reference_cost_musd: 85.0,
            ic_reference_p_th_mw: 3500.0,
            ic_scaling_exponent: 0.6,

            turbine_plant_per_mw: 0.219,
            electric_plant_per_mw: 0.054,
            misc_plant_per_mw: 0.038,
            heat_rejection_per_mw: 0.107,
            inflation_2019_to_present: 1.22,
            special_materials_musd: 15.0,
            digital_twin_musd: 5.0,

            indirect_fraction: 0.2,
            reference_construction_time: 6.0,

            shipping_musd: 8.0,
            spare_parts_fraction: 0.1,
            taxes_musd: 100.0,
            insurance_musd: 1.0,
            fuel_load_reference_cost_musd: 34.0,
            fuel_load_reference_power_mw: 150.0,
            decommissioning_musd: 200.0,

            om_usd_per_kw_year: 60.0,
            deuterium_usd_per_kg: 2175.0,
        }
    }
}

impl Inputs {
    /// Licensing cost [M$] for the configured fuel type.
    pub fn licensing_cost(&self) -> f64 {
        match self.basic.fuel_type {
            FuelType::Dt => self.constants.licensing_dt,
            FuelType::Dd => self.constants.licensing_dd,
            FuelType::Dhe3 => self.constants.licensing_dhe3,
            FuelType::Pb11 => self.constants.licensing_pb11,
        }
    }

    /// Regulatory review duration [years] for the configured fuel type.
    /// FOAK-only: NOAK plants reuse the approved design.
    pub fn licensing_time(&self) -> f64 {
        if self.basic.noak {
            return 0.0;
        }
        match self.basic.fuel_type {
            FuelType::Dt => self.constants.licensing_time_dt,
            FuelType::Dd => self.constants.licensing_time_dd,
            FuelType::Dhe3 => self.constants.licensing_time_dhe3,
            FuelType::Pb11 => self.constants.licensing_time_pb11,
        }
    }

    /// Total time from project start to commercial operation [years].
    pub fn total_project_time(&self) -> f64 {
        self.basic.construction_time + self.licensing_time()
    }
}
