//! Publication panel of the bulk sweep: fixed axis limits and one interpretive annotation.
use super::pseudo_first_order_task::{bulk_time_table, minutes_column, time_axis_label};
use super::{Calculation, CalculationReport, invalid};
use crate::Kinetics::kinetics_error::KinError;
use crate::Kinetics::pseudo_first_order::TargetFraction;
use crate::Sweep::plot::{Annotation, FigureSpec};
use crate::settings::{BulkFigureSettings, OutputSettings};

pub const CSV_FILE: &str = "Fig1A_bulk_kinetics.csv";
pub const FIGURE_FILE: &str = "Fig1A_bulk_kinetics.png";

#[derive(Debug, Clone)]
pub struct BulkKineticsFigureTask {
    pub settings: BulkFigureSettings,
}

impl BulkKineticsFigureTask {
    pub fn new(settings: BulkFigureSettings) -> Self {
        Self { settings }
    }

    pub fn figure_spec(&self) -> Result<FigureSpec, KinError> {
        let f = TargetFraction::new(self.settings.kinetics.target_fraction)?;
        let mut spec = FigureSpec::loglog(FIGURE_FILE, "H2O2", &minutes_column(f), &[])
            .with_labels("[H2O2] (µM)", &time_axis_label(f));
        spec.x_limits = Some(self.settings.x_limits_uM);
        spec.y_limits = Some(self.settings.y_limits_min);
        spec.annotation = self.settings.annotation.as_ref().map(|a| Annotation {
            text: a.text.clone(),
            xy: a.xy,
            text_xy: a.text_xy,
        });
        Ok(spec)
    }
}

impl Calculation for BulkKineticsFigureTask {
    fn name(&self) -> &'static str {
        "BulkKineticsFigure"
    }

    fn run(&self, output: &OutputSettings) -> Result<CalculationReport, KinError> {
        self.settings
            .check_task()
            .map_err(|e| invalid(self.name(), e))?;
        let table = bulk_time_table(&self.settings.kinetics)?;
        let mut report = CalculationReport::new(self.name());
        report.save_table(&table, CSV_FILE, output)?;
        report.save_figure(&table, &self.figure_spec()?, output)?;
        Ok(report)
    }
}
