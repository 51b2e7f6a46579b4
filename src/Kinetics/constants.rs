//! Physical constants (CODATA 2018 exact values where defined) and the unit
//! conversions used by the kinetics and field models. SI throughout.

/// Boltzmann constant [J/K]
pub const KB: f64 = 1.380649e-23;
/// Avogadro constant [1/mol]
pub const NA: f64 = 6.02214076e23;
/// universal gas constant [J/(mol K)]
pub const R_GAS: f64 = 8.314462618;
/// vacuum permittivity [F/m]
pub const EPS0: f64 = 8.8541878128e-12;
/// elementary charge [C]
pub const E_CHARGE: f64 = 1.602176634e-19;

/// 1 Debye in C*m
pub const DEBYE_TO_C_M: f64 = 3.33564e-30;
/// 1 cubic angstrom in m^3
pub const ANGSTROM3_TO_M3: f64 = 1e-30;

pub const NM_TO_M: f64 = 1e-9;
pub const UM_TO_M: f64 = 1e-6;
pub const NM_CONC_TO_M: f64 = 1e-9;
/// 1 pL in L
pub const PL_TO_L: f64 = 1e-12;
pub const SECONDS_PER_MINUTE: f64 = 60.0;

/// Polarizability volume [A^3] to SI polarizability [C m^2/V]
pub fn polarizability_volume_to_si(alpha_a3: f64) -> f64 {
    4.0 * std::f64::consts::PI * EPS0 * alpha_a3 * ANGSTROM3_TO_M3
}
