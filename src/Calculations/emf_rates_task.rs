//! t5 vs [H2O2] when an external field multiplies the baseline k2 by a fold enhancement.
//!
//! The full grid (fold x [H2O2]) goes to one CSV and one figure with a curve per fold; a
//! second, wide table gives t5 in minutes at a few selected doses, one column per dose.
use super::pseudo_first_order_task::time_axis_label;
use super::{Calculation, CalculationReport, invalid};
use crate::Kinetics::constants::{SECONDS_PER_MINUTE, UM_TO_M};
use crate::Kinetics::kinetics_error::KinError;
use crate::Kinetics::pseudo_first_order::{TargetFraction, time_to_fraction};
use crate::Sweep::axis::{Axis, Column};
use crate::Sweep::plot::FigureSpec;
use crate::Sweep::sweep_pipeline::SweepPipeline;
use crate::Sweep::table::Table;
use crate::settings::{EmfRatesSettings, OutputSettings};

pub const SWEEP_CSV: &str = "t5_sweep_EMF_enhancements.csv";
pub const SWEEP_FIGURE: &str = "t5_vs_H2O2_by_enhancement.png";
pub const SUMMARY_CSV: &str = "t5_summary_selected_doses.csv";

#[derive(Debug, Clone)]
pub struct EmfAcceleratedRatesTask {
    pub settings: EmfRatesSettings,
}

impl EmfAcceleratedRatesTask {
    pub fn new(settings: EmfRatesSettings) -> Self {
        Self { settings }
    }

    fn fold_axis(&self) -> Result<Axis, KinError> {
        Axis::from_values(
            Column::dimensionless("fold_enhancement"),
            self.settings.folds.clone(),
        )
    }

    /// fold x [H2O2] grid with k2_eff, t5 [s] and t5 [min]
    pub fn sweep_table(&self) -> Result<Table, KinError> {
        let f = TargetFraction::new(self.settings.target_fraction)?;
        let label = f.time_label();
        let k2_baseline = self.settings.k2_baseline;
        SweepPipeline::new(vec![
            Column::new("k2_eff", "1/(M s)"),
            Column::new(&format!("{}_seconds", label), "s"),
            Column::new(&format!("{}_minutes", label), "min"),
        ])
        .with_axis(self.fold_axis()?)
        .with_axis(self.settings.h2o2_uM.log_axis(Column::new("H2O2", "µM"))?)
        .run(|p| {
            let k2_eff = k2_baseline * p[0];
            let t = time_to_fraction(f, k2_eff, p[1] * UM_TO_M)?;
            Ok(vec![k2_eff, t, t / SECONDS_PER_MINUTE])
        })
    }

    /// one row per fold, one t5 [min] column per selected dose
    pub fn summary_table(&self) -> Result<Table, KinError> {
        let f = TargetFraction::new(self.settings.target_fraction)?;
        let label = f.time_label();
        let doses = &self.settings.summary_doses_uM;
        let columns = doses
            .iter()
            .map(|dose| Column::new(&format!("{}_at_{}_uM", label, dose), "min"))
            .collect();
        let k2_baseline = self.settings.k2_baseline;
        SweepPipeline::new(columns)
            .with_axis(self.fold_axis()?)
            .run(|p| {
                doses
                    .iter()
                    .map(|dose| -> Result<f64, KinError> {
                        Ok(time_to_fraction(f, k2_baseline * p[0], dose * UM_TO_M)? / SECONDS_PER_MINUTE)
                    })
                    .collect()
            })
    }
}

impl Calculation for EmfAcceleratedRatesTask {
    fn name(&self) -> &'static str {
        "EmfAcceleratedRates"
    }

    fn run(&self, output: &OutputSettings) -> Result<CalculationReport, KinError> {
        self.settings
            .check_task()
            .map_err(|e| invalid(self.name(), e))?;
        let f = TargetFraction::new(self.settings.target_fraction)?;
        let mut report = CalculationReport::new(self.name());

        let table = self.sweep_table()?;
        report.save_table(&table, SWEEP_CSV, output)?;
        let spec = FigureSpec::loglog(
            SWEEP_FIGURE,
            "H2O2",
            &format!("{}_minutes", f.time_label()),
            &["fold_enhancement"],
        )
        .with_title(&format!(
            "{} vs [H2O2] for EMF-accelerated k2 (baseline {} M^-1 s^-1)",
            f.time_label(),
            self.settings.k2_baseline
        ))
        .with_labels("[H2O2] (µM)", &time_axis_label(f))
        .with_legend_title("Rate enhancement");
        report.save_figure(&table, &spec, output)?;

        let summary = self.summary_table()?;
        report.save_table(&summary, SUMMARY_CSV, output)?;
        for sample in summary.samples() {
            let times: Vec<String> = sample
                .derived
                .iter()
                .zip(&self.settings.summary_doses_uM)
                .map(|(t, dose)| format!("{:.3e} min at {} µM", t, dose))
                .collect();
            report.add_summary(format!("{}x: {}", sample.axis_values[0], times.join(", ")));
        }
        Ok(report)
    }
}
