//! # Pseudo-first-order oxidation kinetics
//!
//! With H2O2 held constant (replenished), the bimolecular rate law
//! `d[S_ox]/dt = k2 [H2O2] [S_red]` reduces to first-order decay of the reduced
//! site with `k' = k2 [H2O2]`. The oxidized fraction after time `t` is
//!
//! ```text
//! f(t) = 1 - exp(-k' t)
//! ```
//!
//! and every function here is a rearrangement of that identity:
//! - [`time_to_fraction`]: `t = -ln(1-f) / (k2 C)`
//! - [`required_concentration`]: `C = -ln(1-f) / (k2 t)`
//! - [`required_k2`]: `k2 = -ln(1-f) / (t C)`
//! - [`fraction_after`]: `f = 1 - exp(-k2 C t)`
//!
//! Concentrations are in M, times in s, `k2` in M^-1 s^-1.
//! Out-of-domain input is rejected with a [`KinError`] instead of producing
//! NaN or infinity.
//!
//! ```rust, ignore
//! let f = TargetFraction::new(0.05)?;
//! let t5 = time_to_fraction(f, 10.0, 1e-6)?; // ~5129 s
//! ```
use super::constants::{NA, PL_TO_L};
use super::kinetics_error::{KinError, check_finite, check_positive};

/// Oxidized fraction to reach, validated to lie in (0, 1)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TargetFraction(f64);

impl TargetFraction {
    pub fn new(f: f64) -> Result<Self, KinError> {
        if f.is_finite() && f > 0.0 && f < 1.0 {
            Ok(TargetFraction(f))
        } else {
            Err(KinError::FractionOutOfRange(f))
        }
    }

    pub fn value(&self) -> f64 {
        self.0
    }

    /// -ln(1 - f), strictly positive for f in (0, 1)
    pub fn ln_term(&self) -> f64 {
        -(-self.0).ln_1p()
    }

    /// percent without float noise, "5" for 0.05
    pub fn percent_label(&self) -> String {
        let percent = self.0 * 100.0;
        if (percent - percent.round()).abs() < 1e-9 {
            format!("{}", percent.round() as i64)
        } else {
            format!("{}", percent)
        }
    }

    /// label used in column names and reports, e.g. "t5" for 5 %
    pub fn time_label(&self) -> String {
        format!("t{}", self.percent_label())
    }
}

/// Effective first-order rate constant k' = k2 * C [1/s]
pub fn effective_rate(k2: f64, conc_m: f64) -> Result<f64, KinError> {
    check_positive("k2", k2)?;
    check_positive("concentration", conc_m)?;
    let k_prime = k2 * conc_m;
    if k_prime > 0.0 && k_prime.is_finite() {
        Ok(k_prime)
    } else {
        Err(KinError::Unreachable(format!(
            "k' = k2 * C = {} * {} is not a usable rate",
            k2, conc_m
        )))
    }
}

/// Time [s] to reach the target fraction at constant concentration
pub fn time_to_fraction(f: TargetFraction, k2: f64, conc_m: f64) -> Result<f64, KinError> {
    let k_prime = effective_rate(k2, conc_m)?;
    finite_or_unreachable(f.ln_term() / k_prime, || {
        format!("time to {} with k' = {} 1/s", f.time_label(), k_prime)
    })
}

/// Concentration [M] needed to reach `f` within `t_s` seconds for a given k2
pub fn required_concentration(f: TargetFraction, k2: f64, t_s: f64) -> Result<f64, KinError> {
    check_positive("k2", k2)?;
    check_positive("target time", t_s)?;
    finite_or_unreachable(f.ln_term() / (k2 * t_s), || {
        format!("concentration for k2 = {}, t = {} s", k2, t_s)
    })
}

/// Second-order rate constant [1/(M s)] needed to reach `f` within `t_s` at a given concentration
pub fn required_k2(f: TargetFraction, conc_m: f64, t_s: f64) -> Result<f64, KinError> {
    check_positive("concentration", conc_m)?;
    check_positive("target time", t_s)?;
    finite_or_unreachable(f.ln_term() / (t_s * conc_m), || {
        format!("k2 for C = {} M, t = {} s", conc_m, t_s)
    })
}

/// Oxidized fraction reached after `t_s` seconds
pub fn fraction_after(k2: f64, conc_m: f64, t_s: f64) -> Result<f64, KinError> {
    let k_prime = effective_rate(k2, conc_m)?;
    check_finite("time", t_s)?;
    if t_s < 0.0 {
        return Err(KinError::NonPositive {
            name: "time",
            value: t_s,
        });
    }
    Ok(-(-k_prime * t_s).exp_m1())
}

/// Number of molecules present in a cell of `volume_pl` picolitres at `conc_m`
pub fn molecules_in_volume(conc_m: f64, volume_pl: f64) -> f64 {
    conc_m * NA * (volume_pl * PL_TO_L)
}

fn finite_or_unreachable(value: f64, what: impl FnOnce() -> String) -> Result<f64, KinError> {
    if value.is_finite() && value > 0.0 {
        Ok(value)
    } else {
        Err(KinError::Unreachable(what()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_target_fraction_validation() {
        assert!(TargetFraction::new(0.05).is_ok());
        assert!(matches!(
            TargetFraction::new(0.0),
            Err(KinError::FractionOutOfRange(_))
        ));
        assert!(TargetFraction::new(1.0).is_err());
        assert!(TargetFraction::new(1.5).is_err());
        assert!(TargetFraction::new(-0.1).is_err());
        assert!(TargetFraction::new(f64::NAN).is_err());
    }

    #[test]
    fn test_time_label() {
        assert_eq!(TargetFraction::new(0.05).unwrap().time_label(), "t5");
        assert_eq!(TargetFraction::new(0.5).unwrap().time_label(), "t50");
        assert_eq!(TargetFraction::new(0.025).unwrap().time_label(), "t2.5");
    }

    #[test]
    fn test_t5_bulk_scenario() {
        // k2 = 10 M^-1 s^-1, 1 uM H2O2
        let f = TargetFraction::new(0.05).unwrap();
        assert_relative_eq!(effective_rate(10.0, 1e-6).unwrap(), 1e-5, max_relative = 1e-12);
        let t5 = time_to_fraction(f, 10.0, 1e-6).unwrap();
        assert_relative_eq!(t5, 5129.329438755058, max_relative = 1e-9);
        assert_relative_eq!(t5 / 60.0, 85.48882397925097, max_relative = 1e-9);
    }

    #[test]
    fn test_reverse_scenario() {
        let f = TargetFraction::new(0.05).unwrap();
        let c = required_concentration(f, 10.0, 300.0).unwrap();
        assert_relative_eq!(c, 1.7097764795850194e-05, max_relative = 1e-9);
        assert_relative_eq!(c * 1e6, 17.097764795850194, max_relative = 1e-9);
    }

    #[test]
    fn test_round_trip_law() {
        let f = TargetFraction::new(0.05).unwrap();
        for &k2 in &[0.1, 10.0, 1e3, 1e7] {
            for &c in &[1e-9, 3e-7, 1e-6, 1e-3] {
                let t = time_to_fraction(f, k2, c).unwrap();
                let c_back = required_concentration(f, k2, t).unwrap();
                let k2_back = required_k2(f, c, t).unwrap();
                assert_relative_eq!(c_back, c, max_relative = 1e-12);
                assert_relative_eq!(k2_back, k2, max_relative = 1e-12);
                assert_relative_eq!(time_to_fraction(f, k2, c_back).unwrap(), t, max_relative = 1e-12);
                assert_relative_eq!(fraction_after(k2, c, t).unwrap(), 0.05, max_relative = 1e-12);
            }
        }
    }

    #[test]
    fn test_t5_strictly_decreasing() {
        let f = TargetFraction::new(0.05).unwrap();
        let grid = [1e-9, 1e-8, 1e-7, 1e-6, 1e-5];
        for pair in grid.windows(2) {
            let a = time_to_fraction(f, 10.0, pair[0]).unwrap();
            let b = time_to_fraction(f, 10.0, pair[1]).unwrap();
            assert!(b < a);
        }
        let k2s = [0.1, 1.0, 10.0, 100.0];
        for pair in k2s.windows(2) {
            let a = time_to_fraction(f, pair[0], 1e-6).unwrap();
            let b = time_to_fraction(f, pair[1], 1e-6).unwrap();
            assert!(b < a);
        }
    }

    #[test]
    fn test_domain_errors() {
        let f = TargetFraction::new(0.05).unwrap();
        assert!(matches!(
            time_to_fraction(f, 0.0, 1e-6),
            Err(KinError::NonPositive { name: "k2", .. })
        ));
        assert!(time_to_fraction(f, 10.0, -1e-6).is_err());
        assert!(required_concentration(f, 10.0, 0.0).is_err());
        assert!(required_k2(f, 0.0, 300.0).is_err());
        assert!(time_to_fraction(f, f64::INFINITY, 1e-6).is_err());
        // k' underflows to zero: the requirement cannot be met
        assert!(matches!(
            time_to_fraction(f, 1e-200, 1e-200),
            Err(KinError::Unreachable(_))
        ));
    }

    #[test]
    fn test_molecules_in_volume() {
        // 1 uM in a 3 pL HeLa cell
        let n = molecules_in_volume(1e-6, 3.0);
        assert_relative_eq!(n, 1e-6 * 6.02214076e23 * 3e-12, max_relative = 1e-12);
        assert_relative_eq!(n, 1806642.228, max_relative = 1e-9);
    }
}
