//! Local normal field near a plasma membrane with charged residues around the site.
//!
//! Membrane diffuse layer: `E(z) = (φ0/λD) exp(-z/λD)` along the normal. Residues: screened
//! Coulomb fields summed as vectors at the site, projected onto the normal (z). Both are
//! multiplied by the focusing factor of the low-ε shell. The residue term does not depend on
//! the distance to the membrane, so it is constant along z.
//!
//! When site rates are enabled the fold-acceleration and k_eff are evaluated at the magnitude
//! of the focused total normal field; that field is already local, so no further focusing is
//! applied.
use log::info;

use super::{Calculation, CalculationReport, invalid};
use crate::Kinetics::constants::NM_TO_M;
use crate::Kinetics::field_acceleration::fold_accel;
use crate::Kinetics::kinetics_error::KinError;
use crate::Kinetics::local_field::{
    debye_length, dielectric_focusing, membrane_normal_field, residue_field_at_site,
};
use crate::Sweep::axis::Column;
use crate::Sweep::plot::{Curves, FigureSpec, Scale};
use crate::Sweep::sweep_pipeline::SweepPipeline;
use crate::Sweep::table::Table;
use crate::settings::{LocalFieldSettings, OutputSettings};

pub const CSV_FILE: &str = "local_field_membrane_plus_residues.csv";
pub const FIGURE_FILE: &str = "local_field_vs_distance.png";

#[derive(Debug, Clone)]
pub struct LocalFieldsTask {
    pub settings: LocalFieldSettings,
}

impl LocalFieldsTask {
    pub fn new(settings: LocalFieldSettings) -> Self {
        Self { settings }
    }

    /// F_eps from the settings or εr_bulk / εr_shell
    #[allow(non_snake_case)]
    pub fn focusing(&self) -> Result<f64, KinError> {
        match self.settings.F_eps {
            Some(F_eps) => Ok(F_eps),
            None => dielectric_focusing(self.settings.eps_r_bulk, self.settings.eps_r_shell),
        }
    }

    pub fn field_table(&self) -> Result<Table, KinError> {
        let s = &self.settings;
        let lambda_d = debye_length(s.eps_r_bulk, s.ionic_strength_M, s.temperature_K)?;
        let focusing = self.focusing()?;
        let residue_normal = residue_field_at_site(&s.residues, s.eps_r_bulk, lambda_d)?.z;
        info!(
            "λD = {:.4} nm, F_eps = {:.2}, residue normal field {:.3e} V/m",
            lambda_d / NM_TO_M,
            focusing,
            residue_normal
        );

        let mut columns = vec![
            Column::new("lambda_D", "nm"),
            Column::new("E_mem", "V/m"),
            Column::new("E_mem_focused", "V/m"),
            Column::new("E_res_normal", "V/m"),
            Column::new("E_res_focused", "V/m"),
            Column::new("E_total_normal", "V/m"),
        ];
        if s.site_rates.is_some() {
            columns.push(Column::dimensionless("fold_accel"));
            columns.push(Column::new("k_eff", "1/(M s)"));
        }
        SweepPipeline::new(columns)
            .with_axis(s.z_nm.linear_axis(Column::new("z", "nm"))?)
            .run(|p| {
                let e_mem = membrane_normal_field(p[0] * NM_TO_M, s.phi0_V, lambda_d)?;
                let e_mem_focused = focusing * e_mem;
                let e_res_focused = focusing * residue_normal;
                let e_total = e_mem_focused + e_res_focused;
                let mut row = vec![
                    lambda_d / NM_TO_M,
                    e_mem,
                    e_mem_focused,
                    residue_normal,
                    e_res_focused,
                    e_total,
                ];
                if let Some(rates) = &s.site_rates {
                    let fold = fold_accel(e_total.abs(), &rates.coupling, 1.0)?;
                    row.push(fold);
                    row.push(rates.k0 * fold);
                }
                Ok(row)
            })
    }

    pub fn figure_spec(&self) -> Result<FigureSpec, KinError> {
        let s = &self.settings;
        Ok(FigureSpec {
            file_name: FIGURE_FILE.to_string(),
            title: Some(format!(
                "Local normal electric field (φ0 = {:.0} mV, I = {:.0} mM, ε_shell = {}, Fε ≈ {:.1})",
                s.phi0_V * 1e3,
                s.ionic_strength_M * 1e3,
                s.eps_r_shell,
                self.focusing()?
            )),
            x_column: "z".to_string(),
            curves: Curves::Columns(vec![
                ("E_mem_focused".to_string(), "Membrane (focused)".to_string()),
                (
                    "E_res_focused".to_string(),
                    "Pos. residues (focused normal)".to_string(),
                ),
                ("E_total_normal".to_string(), "Total normal field".to_string()),
            ]),
            x_label: "Distance from membrane (nm)".to_string(),
            y_label: "|E| (V/m)".to_string(),
            x_scale: Scale::Linear,
            y_scale: Scale::Log,
            abs_y: true,
            x_limits: None,
            y_limits: None,
            legend_title: None,
            annotation: None,
        })
    }
}

impl Calculation for LocalFieldsTask {
    fn name(&self) -> &'static str {
        "LocalFields"
    }

    fn run(&self, output: &OutputSettings) -> Result<CalculationReport, KinError> {
        self.settings
            .check_task()
            .map_err(|e| invalid(self.name(), e))?;
        let mut report = CalculationReport::new(self.name());
        let table = self.field_table()?;
        report.save_table(&table, CSV_FILE, output)?;
        report.save_figure(&table, &self.figure_spec()?, output)?;

        let lambda = table.column_values("lambda_D")?;
        let total = table.column_values("E_total_normal")?;
        if let (Some(l), Some(near), Some(far)) = (lambda.first(), total.first(), total.last()) {
            report.add_summary(format!(
                "λD = {:.3} nm; total normal field {:.3e} V/m at {} nm, {:.3e} V/m at {} nm",
                l, near, self.settings.z_nm.min, far, self.settings.z_nm.max
            ));
        }
        if self.settings.site_rates.is_some() {
            let fold = table.column_values("fold_accel")?;
            if let Some(max) = fold.iter().copied().reduce(f64::max) {
                report.add_summary(format!("largest fold-acceleration at the site: x{:.3}", max));
            }
        }
        Ok(report)
    }
}
