//! # Field-aware Eyring acceleration
//!
//! The rate enhancement produced by a local electric field `E` is split into
//! two multiplicative terms:
//!
//! 1. **Orientation gain**: the reactive encounter requires the substrate
//!    dipole to lie inside a cone of half-angle `θc`. With the reduced field
//!    `ξ = μ_eff E / (kB T)` the Boltzmann-weighted probability of the cone is
//!    ```text
//!    P(ξ, θc) = (e^ξ - e^(ξ cosθc)) / (e^ξ - e^(-ξ))
//!    ```
//!    and the gain is `P / P0` with the isotropic baseline `P0 = (1 - cosθc)/2`.
//! 2. **Barrier gain**: the field shifts the activation free energy by
//!    `Δμ E + ½ Δα E²`, giving `exp[(Δμ E + ½ Δα E²) / (R T)]`.
//!
//! Dielectric focusing enters only through the field: everything is evaluated
//! at `E_loc = F_eps * E`.
//!
//! ## Numerics
//! `P(ξ, θc)` is 0/0 at `ξ = 0` and overflows for large `|ξ|` when written as
//! above. [`orientation_probability`] uses the equivalent `expm1` form, which is
//! finite for every finite `ξ`, and the first-order series
//! `P/P0 ≈ 1 + ξ (1 + cosθc)/2` for `|ξ| < 1e-8`, so the gain goes smoothly to
//! exactly 1 at zero field.
use serde::{Deserialize, Serialize};

use super::constants::{DEBYE_TO_C_M, KB, R_GAS, polarizability_volume_to_si};
use super::kinetics_error::{KinError, check_finite, check_positive};

/// below this |ξ| the orientation gain is taken from its series expansion
const XI_SERIES_LIMIT: f64 = 1e-8;

/// Energy scale the barrier shift is divided by
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum EnergyBasis {
    /// R*T [J/mol]
    #[default]
    PerMole,
    /// kB*T [J]
    PerMolecule,
}

impl EnergyBasis {
    pub fn thermal_energy(&self, temperature_k: f64) -> f64 {
        match self {
            EnergyBasis::PerMole => R_GAS * temperature_k,
            EnergyBasis::PerMolecule => KB * temperature_k,
        }
    }
}

/// Molecular parameters coupling the substrate to the field
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[allow(non_snake_case)]
pub struct FieldCoupling {
    /// dipole-moment change on activation [D]
    pub delta_mu_D: f64,
    /// effective orienting dipole [D]
    pub mu_eff_D: f64,
    /// cone half-angle of reactive orientations [deg], (0, 180)
    pub theta_c_deg: f64,
    /// polarizability-volume change on activation [A^3]
    pub delta_alpha_A3: f64,
    /// temperature [K]
    pub temperature_K: f64,
    pub energy_basis: EnergyBasis,
}

impl Default for FieldCoupling {
    fn default() -> Self {
        Self {
            delta_mu_D: 15.0,
            mu_eff_D: 2.0,
            theta_c_deg: 30.0,
            delta_alpha_A3: 0.0,
            temperature_K: 310.0,
            energy_basis: EnergyBasis::PerMole,
        }
    }
}

impl FieldCoupling {
    pub fn check(&self) -> Result<(), KinError> {
        check_finite("delta_mu_D", self.delta_mu_D)?;
        check_finite("mu_eff_D", self.mu_eff_D)?;
        check_finite("delta_alpha_A3", self.delta_alpha_A3)?;
        check_positive("temperature_K", self.temperature_K)?;
        check_cone_angle(self.theta_c_deg)?;
        Ok(())
    }
}

fn check_cone_angle(theta_c_deg: f64) -> Result<f64, KinError> {
    check_finite("theta_c_deg", theta_c_deg)?;
    if theta_c_deg > 0.0 && theta_c_deg < 180.0 {
        Ok(theta_c_deg)
    } else {
        Err(KinError::OutOfRange {
            name: "theta_c_deg",
            value: theta_c_deg,
            range: "(0, 180) degrees",
        })
    }
}

/// ξ = μ_eff E / (kB T), dimensionless
#[allow(non_snake_case)]
pub fn reduced_field(mu_eff_D: f64, field_v_per_m: f64, temperature_K: f64) -> f64 {
    mu_eff_D * DEBYE_TO_C_M * field_v_per_m / (KB * temperature_K)
}

/// Restricted orientational probability P(ξ, θc); `cos_theta_c` in (-1, 1)
pub fn orientation_probability(xi: f64, cos_theta_c: f64) -> f64 {
    let p0 = 0.5 * (1.0 - cos_theta_c);
    if xi.abs() < XI_SERIES_LIMIT {
        return p0 * (1.0 + 0.5 * xi * (1.0 + cos_theta_c));
    }
    // numerator and denominator multiplied by e^(-|ξ|) so nothing overflows
    let s = xi.abs();
    let ratio = (-s * (1.0 - cos_theta_c)).exp_m1() / (-2.0 * s).exp_m1();
    if xi > 0.0 {
        ratio
    } else {
        (-s * (1.0 + cos_theta_c)).exp() * ratio
    }
}

/// Orientation gain P/P0 for a field `E` [V/m]
#[allow(non_snake_case)]
pub fn orient_gain(
    mu_eff_D: f64,
    field_v_per_m: f64,
    theta_c_deg: f64,
    temperature_K: f64,
) -> Result<f64, KinError> {
    check_finite("field", field_v_per_m)?;
    check_finite("mu_eff_D", mu_eff_D)?;
    check_positive("temperature_K", temperature_K)?;
    let cos_th = check_cone_angle(theta_c_deg)?.to_radians().cos();
    let xi = reduced_field(mu_eff_D, field_v_per_m, temperature_K);
    let p0 = 0.5 * (1.0 - cos_th);
    Ok(orientation_probability(xi, cos_th) / p0)
}

/// Eyring barrier gain exp[(Δμ E + ½ Δα E²)/(R T)] (or kB T per molecule)
#[allow(non_snake_case)]
pub fn barrier_gain(
    delta_mu_D: f64,
    field_v_per_m: f64,
    delta_alpha_A3: f64,
    temperature_K: f64,
    basis: EnergyBasis,
) -> Result<f64, KinError> {
    check_finite("field", field_v_per_m)?;
    check_finite("delta_mu_D", delta_mu_D)?;
    check_finite("delta_alpha_A3", delta_alpha_A3)?;
    check_positive("temperature_K", temperature_K)?;
    let dmu = delta_mu_D * DEBYE_TO_C_M;
    let dalpha = polarizability_volume_to_si(delta_alpha_A3);
    let exponent = (dmu * field_v_per_m + 0.5 * dalpha * field_v_per_m.powi(2))
        / basis.thermal_energy(temperature_K);
    let gain = exponent.exp();
    if gain.is_finite() {
        Ok(gain)
    } else {
        Err(KinError::Unreachable(format!(
            "barrier gain overflows: exponent {:.3e} at E = {:.3e} V/m",
            exponent, field_v_per_m
        )))
    }
}

/// Total fold-acceleration k(E)/k0 at the focused local field F_eps * E
#[allow(non_snake_case)]
pub fn fold_accel(field_v_per_m: f64, coupling: &FieldCoupling, F_eps: f64) -> Result<f64, KinError> {
    let e_loc = focused_field(field_v_per_m, F_eps)?;
    let orient = orient_gain(
        coupling.mu_eff_D,
        e_loc,
        coupling.theta_c_deg,
        coupling.temperature_K,
    )?;
    let barrier = barrier_gain(
        coupling.delta_mu_D,
        e_loc,
        coupling.delta_alpha_A3,
        coupling.temperature_K,
        coupling.energy_basis,
    )?;
    let fold = orient * barrier;
    if fold.is_finite() {
        Ok(fold)
    } else {
        Err(KinError::Unreachable(format!(
            "fold-acceleration overflows at local field {:.3e} V/m",
            e_loc
        )))
    }
}

/// Effective second-order rate constant k0 * fold [1/(M s)]
#[allow(non_snake_case)]
pub fn effective_rate_constant(
    k0: f64,
    field_v_per_m: f64,
    coupling: &FieldCoupling,
    F_eps: f64,
) -> Result<f64, KinError> {
    check_positive("k0", k0)?;
    Ok(k0 * fold_accel(field_v_per_m, coupling, F_eps)?)
}

/// Local field after dielectric focusing, F_eps >= 1
#[allow(non_snake_case)]
pub fn focused_field(field_v_per_m: f64, F_eps: f64) -> Result<f64, KinError> {
    check_finite("field", field_v_per_m)?;
    check_finite("F_eps", F_eps)?;
    if F_eps < 1.0 {
        return Err(KinError::OutOfRange {
            name: "F_eps",
            value: F_eps,
            range: "[1, inf)",
        });
    }
    Ok(F_eps * field_v_per_m)
}
