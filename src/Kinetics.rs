/// Error type shared by the kinetics functions, the sweep pipeline and the tasks
pub mod kinetics_error;
/// Physical constants and unit conversions
pub mod constants;
/// Closed-form pseudo-first-order kinetics of H2O2 oxidation:
/// time to a target oxidized fraction and its inverse forms
/// (required [H2O2] for a given k2, required k2 for a given [H2O2]).
///
///  # Examples
/// ```
/// use PeroxiKin::Kinetics::pseudo_first_order::{TargetFraction, time_to_fraction, required_concentration};
/// let f = TargetFraction::new(0.05).unwrap();
/// let t5 = time_to_fraction(f, 10.0, 1e-6).unwrap();
/// assert!((t5 - 5129.33).abs() < 0.01);
/// let c = required_concentration(f, 10.0, 300.0).unwrap();
/// assert!((c * 1e6 - 17.10).abs() < 0.01);
/// ```
pub mod pseudo_first_order;
/// Field-aware Eyring model: orientation gain, barrier gain, fold-acceleration
/// and effective rate constant at a dielectrically focused local field.
///
///  # Examples
/// ```
/// use PeroxiKin::Kinetics::field_acceleration::{FieldCoupling, fold_accel};
/// let coupling = FieldCoupling::default(); // Δμ = 15 D, μ_eff = 2 D, θc = 30°
/// let fold = fold_accel(1e8, &coupling, 1.0).unwrap();
/// assert!(fold > 1.0);
/// assert_eq!(fold_accel(0.0, &coupling, 3.0).unwrap(), 1.0);
/// ```
pub mod field_acceleration;
/// Local field near a charged membrane with screened residue charges
pub mod local_field;
