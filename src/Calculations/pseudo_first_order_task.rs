//! t5 vs [H2O2] with replenished H2O2.
//!
//! Columns: `H2O2 [µM]` (axis), `k_prime [1/s]`, `t5_seconds [s]`, `t5_minutes [min]`,
//! `copies`, `cell_volume [pL]`, `H2O2_molecules`. Under pseudo-first-order kinetics the time
//! does not depend on how many copies of the target protein the cell expresses; the copy
//! number is carried along as context only.
use log::info;

use super::{Calculation, CalculationReport, invalid};
use crate::Kinetics::constants::{SECONDS_PER_MINUTE, UM_TO_M};
use crate::Kinetics::kinetics_error::KinError;
use crate::Kinetics::pseudo_first_order::{
    TargetFraction, effective_rate, molecules_in_volume, time_to_fraction,
};
use crate::Sweep::axis::Column;
use crate::Sweep::plot::FigureSpec;
use crate::Sweep::sweep_pipeline::SweepPipeline;
use crate::Sweep::table::Table;
use crate::settings::{OutputSettings, PseudoFirstOrderSettings};

pub const CSV_FILE: &str = "pseudo_first_order_kinetics.csv";
pub const FIGURE_FILE: &str = "pseudo_first_order_kinetics.png";

/// name of the minutes column for a target fraction, e.g. "t5_minutes"
pub fn minutes_column(f: TargetFraction) -> String {
    format!("{}_minutes", f.time_label())
}

/// The bulk sweep shared by the plain and the publication figure
pub fn bulk_time_table(settings: &PseudoFirstOrderSettings) -> Result<Table, KinError> {
    let f = TargetFraction::new(settings.target_fraction)?;
    let label = f.time_label();
    let axis = settings.h2o2_uM.log_axis(Column::new("H2O2", "µM"))?;
    SweepPipeline::new(vec![
        Column::new("k_prime", "1/s"),
        Column::new(&format!("{}_seconds", label), "s"),
        Column::new(&minutes_column(f), "min"),
        Column::dimensionless("copies"),
        Column::new("cell_volume", "pL"),
        Column::dimensionless("H2O2_molecules"),
    ])
    .with_axis(axis)
    .run(|point| {
        let conc_m = point[0] * UM_TO_M;
        let k_prime = effective_rate(settings.k2, conc_m)?;
        let t = time_to_fraction(f, settings.k2, conc_m)?;
        Ok(vec![
            k_prime,
            t,
            t / SECONDS_PER_MINUTE,
            settings.expr_copies,
            settings.cell_volume_pL,
            molecules_in_volume(conc_m, settings.cell_volume_pL),
        ])
    })
}

pub fn time_axis_label(f: TargetFraction) -> String {
    format!("Time to {}% oxidation (min)", f.percent_label())
}

#[derive(Debug, Clone)]
pub struct PseudoFirstOrderTask {
    pub settings: PseudoFirstOrderSettings,
}

impl PseudoFirstOrderTask {
    pub fn new(settings: PseudoFirstOrderSettings) -> Self {
        Self { settings }
    }
}

impl Calculation for PseudoFirstOrderTask {
    fn name(&self) -> &'static str {
        "PseudoFirstOrder"
    }

    fn run(&self, output: &OutputSettings) -> Result<CalculationReport, KinError> {
        self.settings
            .check_task()
            .map_err(|e| invalid(self.name(), e))?;
        let f = TargetFraction::new(self.settings.target_fraction)?;
        let table = bulk_time_table(&self.settings)?;
        info!("{} rows for k2 = {} 1/(M s)", table.len(), self.settings.k2);

        let mut report = CalculationReport::new(self.name());
        report.add_summary(format!(
            "Time to {}% oxidation is independent of copy number under pseudo-first-order kinetics (with replenished H2O2).",
            f.percent_label()
        ));
        let last = table.column_values(&minutes_column(f))?;
        if let (Some(first), Some(end)) = (last.first(), last.last()) {
            report.add_summary(format!(
                "{} falls from {:.3e} min at {} µM to {:.3e} min at {} µM",
                f.time_label(),
                first,
                self.settings.h2o2_uM.min,
                end,
                self.settings.h2o2_uM.max
            ));
        }
        report.save_table(&table, CSV_FILE, output)?;

        let spec = FigureSpec::loglog(FIGURE_FILE, "H2O2", &minutes_column(f), &[])
            .with_labels("[H2O2] (µM)", &time_axis_label(f));
        report.save_figure(&table, &spec, output)?;
        Ok(report)
    }
}
