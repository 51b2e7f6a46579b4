//! # Calculations Module
//!
//! The six calculations of the package. Each one reads its section of
//! [`Settings`], builds the sweep axes, runs the
//! [`SweepPipeline`](crate::Sweep::sweep_pipeline::SweepPipeline) and writes its CSV files and
//! figures into the output directory.
//!
//! | Task | CLI name | Files |
//! |------|----------|-------|
//! | PseudoFirstOrder | `first-order` | pseudo_first_order_kinetics.csv/.png |
//! | BulkKineticsFigure | `fig1a` | Fig1A_bulk_kinetics.csv/.png |
//! | ReverseCalculator | `reverse` | required_H2O2_vs_k2.csv/.png, required_k2_vs_H2O2.csv/.png |
//! | EmfAcceleratedRates | `emf-rates` | t5_sweep_EMF_enhancements.csv, t5_vs_H2O2_by_enhancement.png, t5_summary_selected_doses.csv |
//! | FieldSweep | `field-sweep` | field_sweep_results.csv, FigA_fold_accel_vs_E.png, FigB_focusing.png |
//! | LocalFields | `local-fields` | local_field_membrane_plus_residues.csv, local_field_vs_distance.png |
//!
//! All tasks go through [`Calculation::run`], dispatched with `enum_dispatch` over
//! [`CalculatorTask`]:
//! ```rust, ignore
//! let settings = Settings::new();
//! let task = create_task(TaskKind::FieldSweep, &settings);
//! let report = task.run(&settings.output)?;
//! report.pretty_print();
//! ```
use std::path::{Path, PathBuf};

use enum_dispatch::enum_dispatch;
use log::{debug, info};
use prettytable::{Table as PrettyTable, row};

use crate::Kinetics::kinetics_error::KinError;
use crate::Sweep::csv_output::write_csv;
use crate::Sweep::plot::{FigureSpec, render_figure};
use crate::Sweep::table::Table;
use crate::settings::{OutputSettings, Settings};

pub mod bulk_figure_task;
pub mod emf_rates_task;
pub mod field_sweep_task;
pub mod local_fields_task;
pub mod pseudo_first_order_task;
pub mod reverse_calculator;

mod calculations_tests;

use bulk_figure_task::BulkKineticsFigureTask;
use emf_rates_task::EmfAcceleratedRatesTask;
use field_sweep_task::FieldSweepTask;
use local_fields_task::LocalFieldsTask;
use pseudo_first_order_task::PseudoFirstOrderTask;
use reverse_calculator::ReverseCalculatorTask;

/// What a task wrote and what it has to say
#[derive(Debug, Clone, PartialEq, Default)]
pub struct CalculationReport {
    pub task: String,
    pub csv_files: Vec<PathBuf>,
    pub figures: Vec<PathBuf>,
    /// one-line human readable results
    pub summary: Vec<String>,
}

impl CalculationReport {
    pub fn new(task: &str) -> Self {
        Self {
            task: task.to_string(),
            ..Self::default()
        }
    }

    /// Writes `table` as `dir/file_name` and records the file
    pub fn save_table(
        &mut self,
        table: &Table,
        file_name: &str,
        output: &OutputSettings,
    ) -> Result<(), KinError> {
        let path = output.prepare()?.join(file_name);
        write_csv(table, &path)?;
        if output.preview_rows > 0 {
            println!("{}", file_name);
            table.pretty_print_head(output.preview_rows);
        }
        self.csv_files.push(path);
        Ok(())
    }

    /// Renders the figure unless figures are disabled
    pub fn save_figure(
        &mut self,
        table: &Table,
        spec: &FigureSpec,
        output: &OutputSettings,
    ) -> Result<(), KinError> {
        if !output.render_figures {
            debug!("figures disabled, skipping {}", spec.file_name);
            return Ok(());
        }
        let dir: &Path = output.prepare()?;
        let path = render_figure(table, spec, dir, output.figure_size())?;
        self.figures.push(path);
        Ok(())
    }

    pub fn add_summary(&mut self, line: String) {
        info!("{}: {}", self.task, line);
        self.summary.push(line);
    }

    pub fn pretty_print(&self) {
        let mut table = PrettyTable::new();
        table.add_row(row![self.task, ""]);
        for line in &self.summary {
            table.add_row(row!["result", line]);
        }
        for path in &self.csv_files {
            table.add_row(row!["csv", path.display()]);
        }
        for path in &self.figures {
            table.add_row(row!["figure", path.display()]);
        }
        table.printstd();
    }
}

#[enum_dispatch]
pub trait Calculation {
    fn name(&self) -> &'static str;
    /// Evaluates the task and writes its outputs
    fn run(&self, output: &OutputSettings) -> Result<CalculationReport, KinError>;
}

#[derive(Debug, Clone)]
#[enum_dispatch(Calculation)]
pub enum CalculatorTask {
    PseudoFirstOrder(PseudoFirstOrderTask),
    BulkKineticsFigure(BulkKineticsFigureTask),
    ReverseCalculator(ReverseCalculatorTask),
    EmfAcceleratedRates(EmfAcceleratedRatesTask),
    FieldSweep(FieldSweepTask),
    LocalFields(LocalFieldsTask),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskKind {
    PseudoFirstOrder,
    BulkKineticsFigure,
    ReverseCalculator,
    EmfAcceleratedRates,
    FieldSweep,
    LocalFields,
}

impl TaskKind {
    pub const ALL: [TaskKind; 6] = [
        TaskKind::PseudoFirstOrder,
        TaskKind::BulkKineticsFigure,
        TaskKind::ReverseCalculator,
        TaskKind::EmfAcceleratedRates,
        TaskKind::FieldSweep,
        TaskKind::LocalFields,
    ];

    /// name used on the command line
    pub fn cli_name(&self) -> &'static str {
        match self {
            TaskKind::PseudoFirstOrder => "first-order",
            TaskKind::BulkKineticsFigure => "fig1a",
            TaskKind::ReverseCalculator => "reverse",
            TaskKind::EmfAcceleratedRates => "emf-rates",
            TaskKind::FieldSweep => "field-sweep",
            TaskKind::LocalFields => "local-fields",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            TaskKind::PseudoFirstOrder => "t5 vs [H2O2] under pseudo-first-order kinetics",
            TaskKind::BulkKineticsFigure => "bulk kinetics panel with fixed limits and annotation",
            TaskKind::ReverseCalculator => "required [H2O2] or k2 for a target fraction in a target time",
            TaskKind::EmfAcceleratedRates => "t5 vs [H2O2] for EMF-accelerated k2",
            TaskKind::FieldSweep => "field-aware Eyring parameter sweep",
            TaskKind::LocalFields => "membrane plus residue normal field vs distance",
        }
    }

    pub fn from_name(name: &str) -> Option<TaskKind> {
        let lower = name.to_lowercase();
        TaskKind::ALL.into_iter().find(|kind| {
            kind.cli_name() == lower || format!("{:?}", kind).to_lowercase() == lower
        })
    }
}

pub fn create_task(kind: TaskKind, settings: &Settings) -> CalculatorTask {
    match kind {
        TaskKind::PseudoFirstOrder => {
            CalculatorTask::from(PseudoFirstOrderTask::new(settings.pseudo_first_order.clone()))
        }
        TaskKind::BulkKineticsFigure => {
            CalculatorTask::from(BulkKineticsFigureTask::new(settings.bulk_figure.clone()))
        }
        TaskKind::ReverseCalculator => {
            CalculatorTask::from(ReverseCalculatorTask::new(settings.reverse.clone()))
        }
        TaskKind::EmfAcceleratedRates => {
            CalculatorTask::from(EmfAcceleratedRatesTask::new(settings.emf_rates.clone()))
        }
        TaskKind::FieldSweep => CalculatorTask::from(FieldSweepTask::new(settings.field_sweep.clone())),
        TaskKind::LocalFields => {
            CalculatorTask::from(LocalFieldsTask::new(settings.local_fields.clone()))
        }
    }
}

/// Validates the settings, then runs the tasks in order; the first failure aborts the run
pub fn run_tasks(kinds: &[TaskKind], settings: &Settings) -> Result<Vec<CalculationReport>, KinError> {
    settings.check()?;
    let mut reports = Vec::with_capacity(kinds.len());
    for kind in kinds {
        let task = create_task(*kind, settings);
        info!("running {}", task.name());
        reports.push(task.run(&settings.output)?);
    }
    Ok(reports)
}

/// Maps a task-level validation message into the shared error type
pub(crate) fn invalid(task: &str, message: String) -> KinError {
    KinError::InvalidSettings(format!("{}: {}", task, message))
}
