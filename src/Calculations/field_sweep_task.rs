//! Field-aware Eyring sweep.
//!
//! The fold-acceleration `k(E)/k0 = orient_gain * barrier_gain` at the focused local field
//! `F_eps * E` is evaluated over E x Δμ x θc x μ_eff x F_eps (E outermost) and written as one
//! CSV. Two slices of the same table are drawn:
//! - Figure A, one curve per Δμ at fixed θc, μ_eff, F_eps;
//! - Figure B, one curve per F_eps at fixed Δμ, θc, μ_eff.
//!
//! The representative cases from the settings are reported one line each.
use log::info;

use super::{Calculation, CalculationReport, invalid};
use crate::Kinetics::field_acceleration::{effective_rate_constant, fold_accel};
use crate::Kinetics::kinetics_error::KinError;
use crate::Sweep::axis::{Axis, Column};
use crate::Sweep::plot::FigureSpec;
use crate::Sweep::sweep_pipeline::SweepPipeline;
use crate::Sweep::table::Table;
use crate::settings::{FieldCase, FieldSweepSettings, OutputSettings};

pub const CSV_FILE: &str = "field_sweep_results.csv";
pub const FIGURE_A_FILE: &str = "FigA_fold_accel_vs_E.png";
pub const FIGURE_B_FILE: &str = "FigB_focusing.png";

const E: &str = "E";
const DELTA_MU: &str = "delta_mu";
const THETA_C: &str = "theta_c";
const MU_EFF: &str = "mu_eff";
const F_EPS: &str = "F_eps";
const FOLD: &str = "fold_accel";
const K_EFF: &str = "k_eff";

/// Fold-acceleration and k_eff of one printed case
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CaseResult {
    pub case: FieldCase,
    pub fold: f64,
    pub k_eff: f64,
}

impl CaseResult {
    pub fn describe(&self) -> String {
        let c = &self.case;
        format!(
            "E={:.2e} V/m, Δμ={} D, μ_eff={} D, θc={}°, Fε={} -> x{:.1}, k≈{:.1} M^-1 s^-1",
            c.field_V_per_m, c.delta_mu_D, c.mu_eff_D, c.theta_c_deg, c.F_eps, self.fold, self.k_eff
        )
    }
}

#[derive(Debug, Clone)]
pub struct FieldSweepTask {
    pub settings: FieldSweepSettings,
}

impl FieldSweepTask {
    pub fn new(settings: FieldSweepSettings) -> Self {
        Self { settings }
    }

    pub fn sweep_table(&self) -> Result<Table, KinError> {
        let s = &self.settings;
        let pipeline = SweepPipeline::new(vec![Column::dimensionless(FOLD), Column::new(K_EFF, "1/(M s)")])
            .with_axis(s.field_V_per_m.log_axis(Column::new(E, "V/m"))?)
            .with_axis(Axis::from_values(Column::new(DELTA_MU, "D"), s.delta_mu_D.clone())?)
            .with_axis(Axis::from_values(Column::new(THETA_C, "deg"), s.theta_c_deg.clone())?)
            .with_axis(Axis::from_values(Column::new(MU_EFF, "D"), s.mu_eff_D.clone())?)
            .with_axis(Axis::from_values(Column::dimensionless(F_EPS), s.F_eps.clone())?);
        info!("field sweep: {} combinations", pipeline.n_combinations());
        pipeline.run(|p| {
            let coupling = s.coupling(p[1], p[3], p[2]);
            let fold = fold_accel(p[0], &coupling, p[4])?;
            Ok(vec![fold, s.k0 * fold])
        })
    }

    pub fn cases(&self) -> Result<Vec<CaseResult>, KinError> {
        let s = &self.settings;
        s.cases
            .iter()
            .map(|case| {
                let coupling = s.coupling(case.delta_mu_D, case.mu_eff_D, case.theta_c_deg);
                Ok(CaseResult {
                    case: *case,
                    fold: fold_accel(case.field_V_per_m, &coupling, case.F_eps)?,
                    k_eff: effective_rate_constant(s.k0, case.field_V_per_m, &coupling, case.F_eps)?,
                })
            })
            .collect()
    }

    pub fn figure_a(&self, table: &Table) -> Result<(Table, FigureSpec), KinError> {
        let a = &self.settings.figure_a;
        let slice = table.filter(&[(THETA_C, a.theta_c_deg), (MU_EFF, a.mu_eff_D), (F_EPS, a.F_eps)])?;
        let spec = FigureSpec::loglog(FIGURE_A_FILE, E, FOLD, &[DELTA_MU])
            .with_title(&format!(
                "Fold-acceleration vs E (θc = {}°, μ_eff = {} D, Fε = {})",
                a.theta_c_deg, a.mu_eff_D, a.F_eps
            ))
            .with_labels("Local field, E (V/m)", "Fold-acceleration, k(E)/k0");
        Ok((slice, spec))
    }

    pub fn figure_b(&self, table: &Table) -> Result<(Table, FigureSpec), KinError> {
        let b = &self.settings.figure_b;
        let slice = table.filter(&[(DELTA_MU, b.delta_mu_D), (THETA_C, b.theta_c_deg), (MU_EFF, b.mu_eff_D)])?;
        let spec = FigureSpec::loglog(FIGURE_B_FILE, E, FOLD, &[F_EPS])
            .with_title("Dielectric focusing multiplies E")
            .with_labels("Local field, E (V/m)", "Fold-acceleration, k(E)/k0")
            .with_legend_title("Amplification");
        Ok((slice, spec))
    }
}

impl Calculation for FieldSweepTask {
    fn name(&self) -> &'static str {
        "FieldSweep"
    }

    fn run(&self, output: &OutputSettings) -> Result<CalculationReport, KinError> {
        self.settings
            .check_task()
            .map_err(|e| invalid(self.name(), e))?;
        let mut report = CalculationReport::new(self.name());
        let table = self.sweep_table()?;
        report.save_table(&table, CSV_FILE, output)?;

        let (slice_a, spec_a) = self.figure_a(&table)?;
        report.save_figure(&slice_a, &spec_a, output)?;
        let (slice_b, spec_b) = self.figure_b(&table)?;
        report.save_figure(&slice_b, &spec_b, output)?;

        for case in self.cases()? {
            report.add_summary(case.describe());
        }
        Ok(report)
    }
}
