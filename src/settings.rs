//! # Settings Module
//!
//! ## Purpose
//! Every tunable constant of the six calculations in one explicit structure. Defaults
//! reproduce the reference parameter values; a JSON file may override any subset of fields
//! (missing fields keep their defaults).
//!
//! ## Structure
//! | Section | Used by | Content |
//! |---------|---------|---------|
//! | `output` | all tasks | output directory, figure switch and pixel size |
//! | `pseudo_first_order` | PseudoFirstOrder | k2, [H2O2] grid, target fraction, cell context |
//! | `bulk_figure` | BulkKineticsFigure | the same sweep plus fixed limits and annotation |
//! | `reverse` | ReverseCalculator | target fraction and time, k2 / [H2O2] for both modes, sweep grids |
//! | `emf_rates` | EmfAcceleratedRates | baseline k2, fold enhancements, summary doses |
//! | `field_sweep` | FieldSweep | field grid, Δμ, θc, μ_eff, F_eps lists, figure slices, printed cases |
//! | `local_fields` | LocalFields | dielectric environment, membrane potential, residues |
//!
//! ## Usage Pattern
//! ```rust, ignore
//! use PeroxiKin::settings::Settings;
//!
//! let settings = Settings::from_json_file("my_settings.json")?; // validated on load
//! settings.pretty_print();
//! ```
//!
//! A partial settings file:
//! ```json
//! { "output": { "dir": "results" }, "emf_rates": { "folds": [1, 10, 100] } }
//! ```
use std::fs;
use std::path::{Path, PathBuf};

use log::info;
use prettytable::{Table, row};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::Kinetics::field_acceleration::{EnergyBasis, FieldCoupling};
use crate::Kinetics::kinetics_error::KinError;
use crate::Kinetics::local_field::PointCharge;
use crate::Sweep::axis::{Axis, Column};

/// n_points values between min and max (inclusive)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GridRange {
    pub min: f64,
    pub max: f64,
    pub n_points: usize,
}

impl GridRange {
    pub fn new(min: f64, max: f64, n_points: usize) -> Self {
        Self { min, max, n_points }
    }

    pub fn log_axis(&self, column: Column) -> Result<Axis, KinError> {
        Axis::logspace(column, self.min, self.max, self.n_points)
    }

    pub fn linear_axis(&self, column: Column) -> Result<Axis, KinError> {
        Axis::linspace(column, self.min, self.max, self.n_points)
    }

    fn check_task(&self, name: &str, log_spaced: bool) -> Result<(), String> {
        if !(self.min.is_finite() && self.max.is_finite()) {
            return Err(format!("{}: bounds must be finite", name));
        }
        if log_spaced && self.min <= 0.0 {
            return Err(format!("{}: log-spaced bounds must be positive", name));
        }
        if self.n_points == 0 {
            return Err(format!("{}: n_points must be at least 1", name));
        }
        if self.n_points > 1 && self.max <= self.min {
            return Err(format!("{}: max must exceed min", name));
        }
        if self.n_points == 1 && self.max != self.min {
            return Err(format!("{}: a single point needs min == max", name));
        }
        Ok(())
    }

    fn describe(&self) -> String {
        format!("{:e} .. {:e} ({} pts)", self.min, self.max, self.n_points)
    }
}

/// Where and how results are written
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputSettings {
    pub dir: PathBuf,
    /// create `dir` when it does not exist; otherwise a missing directory is an error
    pub create_dir: bool,
    /// PNG figures are skipped when false, CSV files are always written
    pub render_figures: bool,
    /// figure size [px]
    pub figure_width: u32,
    pub figure_height: u32,
    /// table rows echoed to the console per task, 0 disables the preview
    pub preview_rows: usize,
}

impl Default for OutputSettings {
    fn default() -> Self {
        Self {
            dir: PathBuf::from("output"),
            create_dir: true,
            render_figures: true,
            figure_width: 1200,
            figure_height: 800,
            preview_rows: 5,
        }
    }
}

impl OutputSettings {
    pub fn in_dir(dir: &Path) -> Self {
        Self {
            dir: dir.to_path_buf(),
            ..Self::default()
        }
    }

    pub fn figure_size(&self) -> (u32, u32) {
        (self.figure_width, self.figure_height)
    }

    /// Output directory, created on demand when allowed
    pub fn prepare(&self) -> Result<&Path, KinError> {
        if !self.dir.is_dir() {
            if !self.create_dir {
                return Err(KinError::MissingOutputDir(self.dir.display().to_string()));
            }
            fs::create_dir_all(&self.dir)?;
            info!("created output directory {}", self.dir.display());
        }
        Ok(&self.dir)
    }

    pub fn check_task(&self) -> Result<(), String> {
        if self.dir.as_os_str().is_empty() {
            return Err("output directory not set".to_string());
        }
        if self.figure_width < 100 || self.figure_height < 100 {
            return Err("figure size must be at least 100 x 100 px".to_string());
        }
        Ok(())
    }
}

/// t5 vs [H2O2] under pseudo-first-order kinetics
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
#[allow(non_snake_case)]
pub struct PseudoFirstOrderSettings {
    /// second-order rate constant [1/(M s)], > 0
    pub k2: f64,
    /// [H2O2] grid [µM], log-spaced, > 0
    pub h2o2_uM: GridRange,
    /// target oxidized fraction, (0, 1)
    pub target_fraction: f64,
    /// copies of the target protein per cell (context column only)
    pub expr_copies: f64,
    /// cell volume [pL], > 0
    pub cell_volume_pL: f64,
}

impl Default for PseudoFirstOrderSettings {
    fn default() -> Self {
        Self {
            k2: 10.0,
            h2o2_uM: GridRange::new(1e-3, 1.0, 300),
            target_fraction: 0.05,
            expr_copies: 100000.0,
            cell_volume_pL: 3.0,
        }
    }
}

impl PseudoFirstOrderSettings {
    pub fn check_task(&self) -> Result<(), String> {
        if !(self.k2 > 0.0 && self.k2.is_finite()) {
            return Err("k2 must be positive".to_string());
        }
        self.h2o2_uM.check_task("h2o2_uM", true)?;
        check_fraction(self.target_fraction)?;
        if !(self.expr_copies >= 0.0 && self.expr_copies.is_finite()) {
            return Err("expr_copies must be non-negative".to_string());
        }
        if !(self.cell_volume_pL > 0.0 && self.cell_volume_pL.is_finite()) {
            return Err("cell_volume_pL must be positive".to_string());
        }
        Ok(())
    }
}

/// Text with an arrow pointing at a data point
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnnotationSettings {
    pub text: String,
    /// arrow tip [µM, min]
    pub xy: (f64, f64),
    /// text anchor [µM, min]
    pub text_xy: (f64, f64),
}

/// Publication panel of the bulk sweep
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
#[allow(non_snake_case)]
pub struct BulkFigureSettings {
    pub kinetics: PseudoFirstOrderSettings,
    /// x axis limits [µM]
    pub x_limits_uM: (f64, f64),
    /// y axis limits [min]
    pub y_limits_min: (f64, f64),
    pub annotation: Option<AnnotationSettings>,
}

impl Default for BulkFigureSettings {
    fn default() -> Self {
        Self {
            kinetics: PseudoFirstOrderSettings::default(),
            x_limits_uM: (1e-3, 1.0),
            y_limits_min: (1e2, 1e5),
            annotation: Some(AnnotationSettings {
                text: "Bulk kinetics too slow".to_string(),
                xy: (1e-2, 1.5e4),
                text_xy: (8e-2, 4e4),
            }),
        }
    }
}

impl BulkFigureSettings {
    pub fn check_task(&self) -> Result<(), String> {
        self.kinetics.check_task()?;
        for (name, (lo, hi)) in [("x_limits_uM", self.x_limits_uM), ("y_limits_min", self.y_limits_min)] {
            if !(lo > 0.0 && hi > lo && hi.is_finite()) {
                return Err(format!("{} must be positive and increasing", name));
            }
        }
        Ok(())
    }
}

/// Reverse calculator: what it takes to reach the target fraction within the target time
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
#[allow(non_snake_case)]
pub struct ReverseSettings {
    pub target_fraction: f64,
    /// target time [min], > 0
    pub target_time_min: f64,
    /// mode A: given k2 [1/(M s)], solve for [H2O2]
    pub k2: f64,
    /// mode B: given [H2O2] [µM], solve for k2
    pub h2o2_uM: f64,
    /// cell volume [pL] for the molecule count at the required [H2O2]
    pub cell_volume_pL: f64,
    /// k2 grid [1/(M s)] of the required-[H2O2] sweep
    pub k2_sweep: GridRange,
    /// [H2O2] grid [µM] of the required-k2 sweep
    pub h2o2_sweep_uM: GridRange,
}

impl Default for ReverseSettings {
    fn default() -> Self {
        Self {
            target_fraction: 0.05,
            target_time_min: 5.0,
            k2: 10.0,
            h2o2_uM: 1.0,
            cell_volume_pL: 3.0,
            k2_sweep: GridRange::new(0.1, 1000.0, 200),
            h2o2_sweep_uM: GridRange::new(1e-3, 10.0, 200),
        }
    }
}

impl ReverseSettings {
    pub fn check_task(&self) -> Result<(), String> {
        check_fraction(self.target_fraction)?;
        for (name, value) in [
            ("target_time_min", self.target_time_min),
            ("k2", self.k2),
            ("h2o2_uM", self.h2o2_uM),
            ("cell_volume_pL", self.cell_volume_pL),
        ] {
            if !(value > 0.0 && value.is_finite()) {
                return Err(format!("{} must be positive", name));
            }
        }
        self.k2_sweep.check_task("k2_sweep", true)?;
        self.h2o2_sweep_uM.check_task("h2o2_sweep_uM", true)?;
        Ok(())
    }
}

/// t5 for EMF-accelerated k2 = baseline * fold
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
#[allow(non_snake_case)]
pub struct EmfRatesSettings {
    /// field-free k2 [1/(M s)]
    pub k2_baseline: f64,
    /// rate enhancements, strictly increasing, >= 1
    pub folds: Vec<f64>,
    pub h2o2_uM: GridRange,
    pub target_fraction: f64,
    /// doses [µM] of the summary table
    pub summary_doses_uM: Vec<f64>,
}

impl Default for EmfRatesSettings {
    fn default() -> Self {
        Self {
            k2_baseline: 10.0,
            folds: vec![1.0, 3.0, 10.0, 30.0, 100.0, 300.0, 1000.0],
            h2o2_uM: GridRange::new(1e-3, 1.0, 300),
            target_fraction: 0.05,
            summary_doses_uM: vec![0.01, 0.1, 1.0],
        }
    }
}

impl EmfRatesSettings {
    pub fn check_task(&self) -> Result<(), String> {
        if !(self.k2_baseline > 0.0 && self.k2_baseline.is_finite()) {
            return Err("k2_baseline must be positive".to_string());
        }
        check_increasing("folds", &self.folds, 1.0)?;
        self.h2o2_uM.check_task("h2o2_uM", true)?;
        check_fraction(self.target_fraction)?;
        check_increasing("summary_doses_uM", &self.summary_doses_uM, f64::MIN_POSITIVE)?;
        Ok(())
    }
}

/// Fixed values of the axes that are not drawn in a figure slice
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[allow(non_snake_case)]
pub struct SliceValues {
    pub delta_mu_D: f64,
    pub theta_c_deg: f64,
    pub mu_eff_D: f64,
    pub F_eps: f64,
}

/// One printed representative case
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[allow(non_snake_case)]
pub struct FieldCase {
    /// bulk field [V/m]
    pub field_V_per_m: f64,
    pub delta_mu_D: f64,
    pub mu_eff_D: f64,
    pub theta_c_deg: f64,
    pub F_eps: f64,
}

impl FieldCase {
    #[allow(non_snake_case)]
    pub fn new(field_V_per_m: f64, delta_mu_D: f64, mu_eff_D: f64, theta_c_deg: f64, F_eps: f64) -> Self {
        Self {
            field_V_per_m,
            delta_mu_D,
            mu_eff_D,
            theta_c_deg,
            F_eps,
        }
    }
}

/// Field-aware Eyring sweep over E x Δμ x θc x μ_eff x F_eps
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
#[allow(non_snake_case)]
pub struct FieldSweepSettings {
    /// bulk field grid [V/m], log-spaced
    pub field_V_per_m: GridRange,
    pub delta_mu_D: Vec<f64>,
    pub theta_c_deg: Vec<f64>,
    pub mu_eff_D: Vec<f64>,
    /// dielectric focusing multipliers, >= 1
    pub F_eps: Vec<f64>,
    /// polarizability-volume change [A^3], try 40 to see the quadratic term
    pub delta_alpha_A3: f64,
    /// field-free rate constant [1/(M s)]
    pub k0: f64,
    pub temperature_K: f64,
    pub energy_basis: EnergyBasis,
    /// Figure A: one curve per Δμ at these θc, μ_eff, F_eps
    pub figure_a: SliceValues,
    /// Figure B: one curve per F_eps at these Δμ, θc, μ_eff
    pub figure_b: SliceValues,
    pub cases: Vec<FieldCase>,
}

impl Default for FieldSweepSettings {
    fn default() -> Self {
        let slice = SliceValues {
            delta_mu_D: 15.0,
            theta_c_deg: 30.0,
            mu_eff_D: 2.0,
            F_eps: 1.0,
        };
        Self {
            field_V_per_m: GridRange::new(1e7, 3e8, 200),
            delta_mu_D: vec![10.0, 15.0, 20.0],
            theta_c_deg: vec![20.0, 30.0, 45.0],
            mu_eff_D: vec![1.0, 2.0, 3.0],
            F_eps: vec![1.0, 2.0, 3.0, 5.0],
            delta_alpha_A3: 0.0,
            k0: 10.0,
            temperature_K: 310.0,
            energy_basis: EnergyBasis::PerMole,
            figure_a: slice,
            figure_b: slice,
            cases: vec![
                FieldCase::new(1e8, 15.0, 2.0, 30.0, 1.0),
                FieldCase::new(1e8, 20.0, 3.0, 30.0, 1.0),
                FieldCase::new(2e8, 15.0, 2.0, 30.0, 2.0),
                FieldCase::new(3e8, 20.0, 3.0, 20.0, 3.0),
            ],
        }
    }
}

impl FieldSweepSettings {
    /// Coupling with the given Δμ, μ_eff, θc and the shared Δα, T, basis
    #[allow(non_snake_case)]
    pub fn coupling(&self, delta_mu_D: f64, mu_eff_D: f64, theta_c_deg: f64) -> FieldCoupling {
        FieldCoupling {
            delta_mu_D,
            mu_eff_D,
            theta_c_deg,
            delta_alpha_A3: self.delta_alpha_A3,
            temperature_K: self.temperature_K,
            energy_basis: self.energy_basis,
        }
    }

    pub fn check_task(&self) -> Result<(), String> {
        self.field_V_per_m.check_task("field_V_per_m", true)?;
        check_increasing("delta_mu_D", &self.delta_mu_D, f64::MIN)?;
        check_increasing("theta_c_deg", &self.theta_c_deg, f64::MIN_POSITIVE)?;
        if self.theta_c_deg.iter().any(|t| *t >= 180.0) {
            return Err("theta_c_deg values must lie in (0, 180)".to_string());
        }
        check_increasing("mu_eff_D", &self.mu_eff_D, f64::MIN)?;
        check_increasing("F_eps", &self.F_eps, 1.0)?;
        if !self.delta_alpha_A3.is_finite() {
            return Err("delta_alpha_A3 must be finite".to_string());
        }
        if !(self.k0 > 0.0 && self.k0.is_finite()) {
            return Err("k0 must be positive".to_string());
        }
        if !(self.temperature_K > 0.0 && self.temperature_K.is_finite()) {
            return Err("temperature_K must be positive".to_string());
        }
        let on_axes = |slice: &SliceValues, name: &str, skip: &str| -> Result<(), String> {
            for (axis, list, value) in [
                ("delta_mu_D", &self.delta_mu_D, slice.delta_mu_D),
                ("theta_c_deg", &self.theta_c_deg, slice.theta_c_deg),
                ("mu_eff_D", &self.mu_eff_D, slice.mu_eff_D),
                ("F_eps", &self.F_eps, slice.F_eps),
            ] {
                if axis != skip && !list.contains(&value) {
                    return Err(format!("{}: {} = {} is not one of the swept values", name, axis, value));
                }
            }
            Ok(())
        };
        on_axes(&self.figure_a, "figure_a", "delta_mu_D")?;
        on_axes(&self.figure_b, "figure_b", "F_eps")?;
        for case in &self.cases {
            self.coupling(case.delta_mu_D, case.mu_eff_D, case.theta_c_deg)
                .check()
                .map_err(|e| format!("case {:?}: {}", case, e))?;
            if !(case.F_eps >= 1.0 && case.field_V_per_m.is_finite()) {
                return Err(format!("case {:?}: F_eps must be >= 1 and E finite", case));
            }
        }
        Ok(())
    }
}

/// Field-aware rates at the site, evaluated at the focused total normal field
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SiteRateSettings {
    pub coupling: FieldCoupling,
    /// field-free rate constant [1/(M s)]
    pub k0: f64,
}

impl Default for SiteRateSettings {
    fn default() -> Self {
        Self {
            coupling: FieldCoupling::default(),
            k0: 10.0,
        }
    }
}

/// Membrane plus charged residues near the reactive site
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
#[allow(non_snake_case)]
pub struct LocalFieldSettings {
    /// bulk water permittivity
    pub eps_r_bulk: f64,
    /// permittivity of the low-ε shell around the site
    pub eps_r_shell: f64,
    /// focusing factor; eps_r_bulk / eps_r_shell when not given
    pub F_eps: Option<f64>,
    /// ionic strength [M]
    pub ionic_strength_M: f64,
    pub temperature_K: f64,
    /// membrane surface potential [V]
    pub phi0_V: f64,
    /// distance grid along the membrane normal [nm], linear
    pub z_nm: GridRange,
    /// residues, positions relative to the site
    pub residues: Vec<PointCharge>,
    /// add fold-acceleration and k_eff columns; none skips them
    pub site_rates: Option<SiteRateSettings>,
}

impl Default for LocalFieldSettings {
    fn default() -> Self {
        Self {
            eps_r_bulk: 80.0,
            eps_r_shell: 10.0,
            F_eps: None,
            ionic_strength_M: 0.15,
            temperature_K: 310.0,
            phi0_V: -0.070,
            z_nm: GridRange::new(1.0, 5.0, 41),
            residues: vec![
                PointCharge::new([0.6, 0.0, 0.2], 1.0),
                PointCharge::new([-0.3, 0.5, -0.1], 1.0),
                PointCharge::new([0.0, -0.6, 0.3], 1.0),
            ],
            site_rates: Some(SiteRateSettings::default()),
        }
    }
}

impl LocalFieldSettings {
    pub fn check_task(&self) -> Result<(), String> {
        for (name, value) in [
            ("eps_r_bulk", self.eps_r_bulk),
            ("eps_r_shell", self.eps_r_shell),
            ("ionic_strength_M", self.ionic_strength_M),
            ("temperature_K", self.temperature_K),
        ] {
            if !(value > 0.0 && value.is_finite()) {
                return Err(format!("{} must be positive", name));
            }
        }
        if let Some(f) = self.F_eps {
            if !(f >= 1.0 && f.is_finite()) {
                return Err("F_eps must be >= 1".to_string());
            }
        } else if self.eps_r_shell > self.eps_r_bulk {
            return Err("eps_r_shell above eps_r_bulk would defocus the field (F_eps < 1)".to_string());
        }
        if !self.phi0_V.is_finite() {
            return Err("phi0_V must be finite".to_string());
        }
        self.z_nm.check_task("z_nm", false)?;
        for residue in &self.residues {
            if !(residue.charge_e.is_finite() && residue.position_nm.iter().all(|x| x.is_finite())) {
                return Err(format!("residue {:?} is not finite", residue));
            }
        }
        if let Some(rates) = &self.site_rates {
            rates.coupling.check().map_err(|e| format!("site_rates: {}", e))?;
            if !(rates.k0 > 0.0 && rates.k0.is_finite()) {
                return Err("site_rates: k0 must be positive".to_string());
            }
        }
        Ok(())
    }
}

/// All settings of a run
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub output: OutputSettings,
    pub pseudo_first_order: PseudoFirstOrderSettings,
    pub bulk_figure: BulkFigureSettings,
    pub reverse: ReverseSettings,
    pub emf_rates: EmfRatesSettings,
    pub field_sweep: FieldSweepSettings,
    pub local_fields: LocalFieldSettings,
}

impl Settings {
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads a (partial) settings file and validates the result
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self, KinError> {
        let content = fs::read_to_string(path.as_ref())?;
        let settings = Self::from_json_str(&content)?;
        info!("settings loaded from {}", path.as_ref().display());
        Ok(settings)
    }

    /// Defaults with the given JSON merged on top, at any depth; arrays are replaced whole
    pub fn from_json_str(content: &str) -> Result<Self, KinError> {
        let mut merged = serde_json::to_value(Settings::default())?;
        let overrides: Value = serde_json::from_str(content)?;
        merge_json(&mut merged, overrides);
        let settings: Settings = serde_json::from_value(merged)?;
        settings.check()?;
        Ok(settings)
    }

    pub fn to_json_string(&self) -> Result<String, KinError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Validates every section; the message names the section at fault
    pub fn check(&self) -> Result<(), KinError> {
        let sections: [(&str, Result<(), String>); 7] = [
            ("output", self.output.check_task()),
            ("pseudo_first_order", self.pseudo_first_order.check_task()),
            ("bulk_figure", self.bulk_figure.check_task()),
            ("reverse", self.reverse.check_task()),
            ("emf_rates", self.emf_rates.check_task()),
            ("field_sweep", self.field_sweep.check_task()),
            ("local_fields", self.local_fields.check_task()),
        ];
        for (section, result) in sections {
            result.map_err(|e| KinError::InvalidSettings(format!("{}: {}", section, e)))?;
        }
        Ok(())
    }

    pub fn pretty_print(&self) {
        let mut table = Table::new();
        table.add_row(row!["Section", "Parameter", "Value"]);
        let out = &self.output;
        table.add_row(row!["output", "dir", out.dir.display()]);
        table.add_row(row!["", "render_figures", out.render_figures]);
        table.add_row(row!["", "figure size [px]", format!("{} x {}", out.figure_width, out.figure_height)]);

        let p = &self.pseudo_first_order;
        table.add_row(row!["pseudo_first_order", "k2 [1/(M s)]", p.k2]);
        table.add_row(row!["", "[H2O2] [µM]", p.h2o2_uM.describe()]);
        table.add_row(row!["", "target fraction", p.target_fraction]);
        table.add_row(row!["", "cell volume [pL]", p.cell_volume_pL]);

        let b = &self.bulk_figure;
        table.add_row(row!["bulk_figure", "x limits [µM]", format!("{:?}", b.x_limits_uM)]);
        table.add_row(row!["", "y limits [min]", format!("{:?}", b.y_limits_min)]);

        let r = &self.reverse;
        table.add_row(row!["reverse", "target", format!("{} in {} min", r.target_fraction, r.target_time_min)]);
        table.add_row(row!["", "k2 [1/(M s)]", r.k2]);
        table.add_row(row!["", "[H2O2] [µM]", r.h2o2_uM]);
        table.add_row(row!["", "k2 sweep", r.k2_sweep.describe()]);
        table.add_row(row!["", "[H2O2] sweep [µM]", r.h2o2_sweep_uM.describe()]);

        let e = &self.emf_rates;
        table.add_row(row!["emf_rates", "k2 baseline [1/(M s)]", e.k2_baseline]);
        table.add_row(row!["", "folds", format!("{:?}", e.folds)]);
        table.add_row(row!["", "summary doses [µM]", format!("{:?}", e.summary_doses_uM)]);

        let f = &self.field_sweep;
        table.add_row(row!["field_sweep", "E [V/m]", f.field_V_per_m.describe()]);
        table.add_row(row!["", "Δμ [D]", format!("{:?}", f.delta_mu_D)]);
        table.add_row(row!["", "θc [deg]", format!("{:?}", f.theta_c_deg)]);
        table.add_row(row!["", "μ_eff [D]", format!("{:?}", f.mu_eff_D)]);
        table.add_row(row!["", "F_eps", format!("{:?}", f.F_eps)]);
        table.add_row(row!["", "Δα [A^3]", f.delta_alpha_A3]);
        table.add_row(row!["", "energy basis", format!("{:?}", f.energy_basis)]);

        let l = &self.local_fields;
        table.add_row(row!["local_fields", "εr bulk / shell", format!("{} / {}", l.eps_r_bulk, l.eps_r_shell)]);
        table.add_row(row!["", "I [M]", l.ionic_strength_M]);
        table.add_row(row!["", "φ0 [V]", l.phi0_V]);
        table.add_row(row!["", "z [nm]", l.z_nm.describe()]);
        table.add_row(row!["", "residues", l.residues.len()]);
        table.printstd();
    }
}

fn merge_json(base: &mut Value, overrides: Value) {
    match (base, overrides) {
        (Value::Object(base), Value::Object(overrides)) => {
            for (key, value) in overrides {
                match base.get_mut(&key) {
                    Some(slot) => merge_json(slot, value),
                    None => {
                        base.insert(key, value);
                    }
                }
            }
        }
        (slot, value) => *slot = value,
    }
}

fn check_fraction(f: f64) -> Result<(), String> {
    if f > 0.0 && f < 1.0 {
        Ok(())
    } else {
        Err(format!("target_fraction must lie in (0, 1), got {}", f))
    }
}

fn check_increasing(name: &str, values: &[f64], lower: f64) -> Result<(), String> {
    if values.is_empty() {
        return Err(format!("{} is empty", name));
    }
    if values.iter().any(|v| !v.is_finite() || *v < lower) {
        return Err(format!("{} values must be finite and >= {:e}", name, lower));
    }
    if values.windows(2).any(|w| w[1] <= w[0]) {
        return Err(format!("{} must be strictly increasing", name));
    }
    Ok(())
}
