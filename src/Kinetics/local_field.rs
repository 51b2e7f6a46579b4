//! # Local electric field at a reactive site near a charged membrane
//!
//! Two sources contribute to the field along the membrane normal (z):
//! - the diffuse layer of a membrane with surface potential `φ0`, decaying as
//!   `E(z) = (φ0/λD) exp(-z/λD)`;
//! - nearby charged residues (Lys/Arg), each a Debye–Hückel screened point
//!   charge, summed as vectors before the z projection is taken.
//!
//! The Debye length follows from the ionic strength `I` [mol/L]:
//! `λD = sqrt(εr ε0 kB T / (2 NA e² I 1000))`.
//! Both contributions are multiplied by the dielectric focusing factor when
//! evaluated inside a low-permittivity shell around the site.
use nalgebra::Vector3;
use serde::{Deserialize, Serialize};

use super::constants::{E_CHARGE, EPS0, KB, NA, NM_TO_M};
use super::kinetics_error::{KinError, check_finite, check_positive};

/// separations below this [m] are clamped to avoid the 1/r^2 singularity
pub const MIN_SEPARATION_M: f64 = 1e-12;

/// Point charge located relative to the reactive site (site at origin)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PointCharge {
    /// position [nm]
    pub position_nm: [f64; 3],
    /// charge in units of e
    pub charge_e: f64,
}

impl PointCharge {
    pub fn new(position_nm: [f64; 3], charge_e: f64) -> Self {
        Self {
            position_nm,
            charge_e,
        }
    }

    pub fn position_m(&self) -> Vector3<f64> {
        Vector3::from(self.position_nm) * NM_TO_M
    }

    pub fn charge_c(&self) -> f64 {
        self.charge_e * E_CHARGE
    }
}

/// Debye screening length [m]
#[allow(non_snake_case)]
pub fn debye_length(eps_r: f64, ionic_strength_M: f64, temperature_K: f64) -> Result<f64, KinError> {
    check_positive("eps_r", eps_r)?;
    check_positive("ionic_strength_M", ionic_strength_M)?;
    check_positive("temperature_K", temperature_K)?;
    Ok(((eps_r * EPS0 * KB * temperature_K)
        / (2.0 * NA * E_CHARGE.powi(2) * ionic_strength_M * 1000.0))
        .sqrt())
}

/// Normal field of the membrane diffuse layer at distance `z_m` [V/m]
pub fn membrane_normal_field(z_m: f64, phi0_v: f64, lambda_d_m: f64) -> Result<f64, KinError> {
    check_finite("z", z_m)?;
    check_finite("phi0", phi0_v)?;
    check_positive("lambda_D", lambda_d_m)?;
    Ok((phi0_v / lambda_d_m) * (-z_m / lambda_d_m).exp())
}

/// Screened Coulomb field [V/m] at displacement `r_vec_m` from a charge `q_c`
pub fn screened_point_charge_field(
    r_vec_m: &Vector3<f64>,
    q_c: f64,
    eps_r: f64,
    lambda_d_m: f64,
) -> Vector3<f64> {
    let r = r_vec_m.norm().max(MIN_SEPARATION_M);
    let kappa = 1.0 / lambda_d_m;
    let pref = q_c / (4.0 * std::f64::consts::PI * EPS0 * eps_r) * (-kappa * r).exp()
        * (1.0 + kappa * r)
        / r.powi(3);
    r_vec_m * pref
}

/// Vector sum of the residue fields at the site (origin)
pub fn residue_field_at_site(
    charges: &[PointCharge],
    eps_r: f64,
    lambda_d_m: f64,
) -> Result<Vector3<f64>, KinError> {
    check_positive("eps_r", eps_r)?;
    check_positive("lambda_D", lambda_d_m)?;
    let total = charges.iter().fold(Vector3::zeros(), |acc, charge| {
        // displacement from the charge to the site
        let r_vec = -charge.position_m();
        acc + screened_point_charge_field(&r_vec, charge.charge_c(), eps_r, lambda_d_m)
    });
    if total.iter().all(|c| c.is_finite()) {
        Ok(total)
    } else {
        Err(KinError::Unreachable(
            "residue field is not finite; check charges and positions".to_string(),
        ))
    }
}

/// Default focusing factor of a low-permittivity shell: εr_bulk / εr_shell
pub fn dielectric_focusing(eps_r_bulk: f64, eps_r_shell: f64) -> Result<f64, KinError> {
    check_positive("eps_r_bulk", eps_r_bulk)?;
    check_positive("eps_r_shell", eps_r_shell)?;
    Ok(eps_r_bulk / eps_r_shell)
}
