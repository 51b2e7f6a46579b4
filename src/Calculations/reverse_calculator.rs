//! Reverse calculator: [H2O2] or k2 needed to reach the target fraction within the target time.
//!
//! From `f = 1 - exp(-k2 [H2O2] t)`:
//! - mode A, given k2: `[H2O2] = -ln(1-f) / (k2 t)`
//! - mode B, given [H2O2]: `k2 = -ln(1-f) / (t [H2O2])`
//!
//! Both answers are substituted back through `fraction_after` and reported together with the
//! number of H2O2 molecules a cell of the given volume holds at the required concentration.
//! The two intuition sweeps (required [H2O2] vs k2, required k2 vs [H2O2]) are written as
//! CSV and log-log figures.
use super::{Calculation, CalculationReport, invalid};
use crate::Kinetics::constants::{SECONDS_PER_MINUTE, UM_TO_M};
use crate::Kinetics::kinetics_error::KinError;
use crate::Kinetics::pseudo_first_order::{
    TargetFraction, fraction_after, molecules_in_volume, required_concentration, required_k2,
};
use crate::Sweep::axis::Column;
use crate::Sweep::plot::FigureSpec;
use crate::Sweep::sweep_pipeline::SweepPipeline;
use crate::Sweep::table::Table;
use crate::settings::{OutputSettings, ReverseSettings};

pub const H2O2_SWEEP_FILE: &str = "required_H2O2_vs_k2";
pub const K2_SWEEP_FILE: &str = "required_k2_vs_H2O2";

/// Closed-form answers of both modes
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ReverseResult {
    /// mode A: required [H2O2] [M]
    pub required_conc_m: f64,
    /// molecules per cell at the required [H2O2]
    pub molecules_per_cell: f64,
    /// mode B: required k2 [1/(M s)]
    pub required_k2: f64,
    /// fraction reached with the mode A answer, equals the target
    pub check_fraction_a: f64,
    /// fraction reached with the mode B answer, equals the target
    pub check_fraction_b: f64,
}

#[derive(Debug, Clone)]
pub struct ReverseCalculatorTask {
    pub settings: ReverseSettings,
}

impl ReverseCalculatorTask {
    pub fn new(settings: ReverseSettings) -> Self {
        Self { settings }
    }

    fn target_seconds(&self) -> f64 {
        self.settings.target_time_min * SECONDS_PER_MINUTE
    }

    pub fn solve(&self) -> Result<ReverseResult, KinError> {
        let s = &self.settings;
        let f = TargetFraction::new(s.target_fraction)?;
        let t = self.target_seconds();
        let conc = required_concentration(f, s.k2, t)?;
        let given_conc = s.h2o2_uM * UM_TO_M;
        let k2 = required_k2(f, given_conc, t)?;
        Ok(ReverseResult {
            required_conc_m: conc,
            molecules_per_cell: molecules_in_volume(conc, s.cell_volume_pL),
            required_k2: k2,
            check_fraction_a: fraction_after(s.k2, conc, t)?,
            check_fraction_b: fraction_after(k2, given_conc, t)?,
        })
    }

    /// required [H2O2] [µM] over the k2 grid
    pub fn required_h2o2_table(&self) -> Result<Table, KinError> {
        let f = TargetFraction::new(self.settings.target_fraction)?;
        let t = self.target_seconds();
        SweepPipeline::new(vec![Column::new("required_H2O2", "µM")])
            .with_axis(self.settings.k2_sweep.log_axis(Column::new("k2", "1/(M s)"))?)
            .run(|p| Ok(vec![required_concentration(f, p[0], t)? / UM_TO_M]))
    }

    /// required k2 [1/(M s)] over the [H2O2] grid
    pub fn required_k2_table(&self) -> Result<Table, KinError> {
        let f = TargetFraction::new(self.settings.target_fraction)?;
        let t = self.target_seconds();
        SweepPipeline::new(vec![Column::new("required_k2", "1/(M s)")])
            .with_axis(self.settings.h2o2_sweep_uM.log_axis(Column::new("H2O2", "µM"))?)
            .run(|p| Ok(vec![required_k2(f, p[0] * UM_TO_M, t)?]))
    }

    fn goal(&self) -> Result<String, KinError> {
        let f = TargetFraction::new(self.settings.target_fraction)?;
        Ok(format!(
            "{}% in {} min",
            f.percent_label(),
            self.settings.target_time_min
        ))
    }
}

impl Calculation for ReverseCalculatorTask {
    fn name(&self) -> &'static str {
        "ReverseCalculator"
    }

    fn run(&self, output: &OutputSettings) -> Result<CalculationReport, KinError> {
        self.settings
            .check_task()
            .map_err(|e| invalid(self.name(), e))?;
        let s = &self.settings;
        let result = self.solve()?;
        let goal = self.goal()?;

        let mut report = CalculationReport::new(self.name());
        report.add_summary(format!(
            "(a) Given k2 = {:.3} M^-1 s^-1 -> required [H2O2] = {:.3} µM for {}",
            s.k2,
            result.required_conc_m / UM_TO_M,
            goal
        ));
        report.add_summary(format!(
            "    (~{:.0} H2O2 molecules present in a {} pL cell at that concentration)",
            result.molecules_per_cell, s.cell_volume_pL
        ));
        report.add_summary(format!(
            "(b) Given [H2O2] = {:.3} µM -> required k2 = {:.1} M^-1 s^-1 for {}",
            s.h2o2_uM, result.required_k2, goal
        ));
        report.add_summary(format!(
            "check: fraction reached in {} min is {:.6} (a) and {:.6} (b)",
            s.target_time_min, result.check_fraction_a, result.check_fraction_b
        ));

        let by_k2 = self.required_h2o2_table()?;
        report.save_table(&by_k2, &format!("{}.csv", H2O2_SWEEP_FILE), output)?;
        let spec = FigureSpec::loglog(&format!("{}.png", H2O2_SWEEP_FILE), "k2", "required_H2O2", &[])
            .with_title(&format!("Required [H2O2] for {}", goal))
            .with_labels("k2 (M^-1 s^-1)", "Required [H2O2] (µM)");
        report.save_figure(&by_k2, &spec, output)?;

        let by_conc = self.required_k2_table()?;
        report.save_table(&by_conc, &format!("{}.csv", K2_SWEEP_FILE), output)?;
        let spec = FigureSpec::loglog(&format!("{}.png", K2_SWEEP_FILE), "H2O2", "required_k2", &[])
            .with_title(&format!("Required k2 for {}", goal))
            .with_labels("[H2O2] (µM)", "Required k2 (M^-1 s^-1)");
        report.save_figure(&by_conc, &spec, output)?;
        Ok(report)
    }
}
