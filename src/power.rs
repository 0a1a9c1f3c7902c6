use anyhow::{Context, Result};
use serde::Serialize;

use crate::inputs::{Basic, FuelType, MachineType, PowerInput};

/// Plant power balance. All entries in MW except the dimensionless Q values.
#[derive(Debug, Clone, Default, Serialize)]
pub struct PowerTable {
    /// Charged fusion product power (alphas, protons, tritons, He-3)
    pub p_ash: f64,
    pub p_neutron: f64,
    /// Ash thermal power deposited on walls
    pub p_wall: f64,
    /// Direct energy converter electric output
    pub p_dee: f64,
    /// DEC conversion waste heat (separately cooled, lost)
    pub p_dec_waste: f64,
    pub p_aux: f64,
    pub p_cool: f64,
    pub p_coils: f64,
    pub p_pump: f64,
    /// Thermal power delivered to the conversion cycle
    pub p_th: f64,
    /// Thermal-cycle electric output
    pub p_the: f64,
    /// Gross electric power
    pub p_et: f64,
    pub p_loss: f64,
    /// Subsystem and control power
    pub p_sub: f64,
    /// Scientific Q (fusion power / injected power)
    pub q_sci: f64,
    /// Engineering Q (gross electric / recirculating power)
    pub q_eng: f64,
    /// Recirculating power fraction, 1 / q_eng
    pub rec_frac: f64,
    /// Net electric power
    pub p_net: f64,
}

/// Charged-particle (ash) energy fraction of total fusion power.
///
/// DT:   3.52 / 17.58 (He4 alpha only)
/// DD:   semi-catalyzed burn with secondary DT and DHe3 reactions
/// DHe3: primary fully charged, with parameterized D-D side reactions
/// PB11: fully aneutronic
pub fn ash_fraction(fuel: FuelType, pin: &PowerInput) -> f64 {
    match fuel {
        FuelType::Dt => 3.52 / 17.58,
        FuelType::Dd => {
            let f_t = pin.dd_f_t.unwrap_or(0.969);
            let f_he3 = pin.dd_f_he3.unwrap_or(0.689);
            // Per-DD-event energies averaged over the 50/50 branches [MeV]
            let e_charged = 2.425 + 0.5 * f_t * 3.52 + 0.5 * f_he3 * 18.35;
            let e_total = 3.65 + 0.5 * f_t * 17.58 + 0.5 * f_he3 * 18.35;
            e_charged / e_total
        }
        FuelType::Dhe3 => {
            let dd_frac = pin.dhe3_dd_frac.unwrap_or(0.07);
            let f_t = pin.dhe3_f_t.unwrap_or(0.97);
            let e_n_dd = 1.225 + 0.5 * f_t * 14.06;
            let e_c_dd = 2.425 + 0.5 * f_t * 3.52;
            (1.0 - dd_frac) + dd_frac * e_c_dd / (e_n_dd + e_c_dd)
        }
        FuelType::Pb11 => 1.0,
    }
}

/// Compute the full power balance from fusion power down to net electric.
///
/// Fails when a machine-type-required field is unset or when the
/// recirculating power denominator reaches zero.
pub fn power_balance(basic: &Basic, pin: &PowerInput) -> Result<PowerTable> {
    let mut pt = PowerTable::default();

    let ash_frac = ash_fraction(basic.fuel_type, pin);
    pt.p_ash = basic.p_nrl * ash_frac;
    pt.p_neutron = basic.p_nrl * (1.0 - ash_frac);

    pt.p_aux = pin.p_trit + pin.p_house;

    // Charged-particle routing: MFE may divert a fraction to a DEC.
    let p_ash_thermal = match basic.machine_type {
        MachineType::Mfe => {
            let f_dec = pin.f_dec.unwrap_or(0.0);
            let eta_de = pin.eta_de.unwrap_or(0.0);
            pt.p_dee = f_dec * eta_de * pt.p_ash;
            pt.p_dec_waste = f_dec * (1.0 - eta_de) * pt.p_ash;
            pt.p_cool = pin.p_cool.unwrap_or(0.0);
            pt.p_coils = pin.p_coils.unwrap_or(0.0);
            (1.0 - f_dec) * pt.p_ash
        }
        MachineType::Ife => pt.p_ash,
    };
    pt.p_wall = p_ash_thermal;
    pt.p_pump = pin.p_pump;

    // Power injected into the plasma or target by the drivers.
    let injected = match basic.machine_type {
        MachineType::Mfe => pin.p_input,
        MachineType::Ife => pin.p_implosion.unwrap_or(0.0) + pin.p_ignition.unwrap_or(0.0),
    };

    // Thermal power to the turbine: neutron blanket heating, ash wall heat,
    // injected driver power, pump heat recovery.
    pt.p_th = pin.mn * pt.p_neutron + p_ash_thermal + injected + pin.eta_p * pt.p_pump;
    pt.p_the = pin.eta_th * pt.p_th;
    pt.p_et = pt.p_dee + pt.p_the;
    pt.p_loss = (pt.p_th - pt.p_the) + pt.p_dec_waste;
    pt.p_sub = pin.f_sub * pt.p_et;

    if injected <= 0.0 {
        anyhow::bail!("injected driver power must be positive to form Q_sci");
    }
    pt.q_sci = basic.p_nrl / injected;

    let recirculating = match basic.machine_type {
        MachineType::Mfe => {
            let eta_pin = pin
                .eta_pin
                .context("power_input.eta_pin required for MFE power balance")?;
            if eta_pin <= 0.0 {
                anyhow::bail!("power_input.eta_pin must be positive");
            }
            pt.p_coils
                + pt.p_pump
                + pt.p_sub
                + pt.p_aux
                + pt.p_cool
                + pin.p_cryo
                + pin.p_input / eta_pin
        }
        MachineType::Ife => {
            let eta_pin1 = pin
                .eta_pin1
                .context("power_input.eta_pin1 required for IFE power balance")?;
            let eta_pin2 = pin
                .eta_pin2
                .context("power_input.eta_pin2 required for IFE power balance")?;
            let p_implosion = pin
                .p_implosion
                .context("power_input.p_implosion required for IFE power balance")?;
            let p_ignition = pin
                .p_ignition
                .context("power_input.p_ignition required for IFE power balance")?;
            let p_target = pin
                .p_target
                .context("power_input.p_target required for IFE power balance")?;
            if eta_pin1 <= 0.0 || eta_pin2 <= 0.0 {
                anyhow::bail!("power_input.eta_pin1 and eta_pin2 must be positive");
            }
            p_target
                + pt.p_pump
                + pt.p_sub
                + pt.p_aux
                + pin.p_cryo
                + p_implosion / eta_pin1
                + p_ignition / eta_pin2
        }
    };

    if recirculating <= 0.0 {
        anyhow::bail!("recirculating power is zero; engineering Q undefined");
    }
    pt.q_eng = pt.p_et / recirculating;
    if pt.q_eng == 0.0 {
        anyhow::bail!("engineering Q is zero; recirculating fraction undefined");
    }
    pt.rec_frac = 1.0 / pt.q_eng;
    pt.p_net = (1.0 - 1.0 / pt.q_eng) * pt.p_et;

    Ok(pt)
}
