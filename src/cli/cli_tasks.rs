use log::info;

use super::cli_args::CliOptions;
use super::cli_main::run_interactive_menu;
use crate::Calculations::{CalculationReport, TaskKind, run_tasks};
use crate::Kinetics::kinetics_error::KinError;
use crate::settings::Settings;

/// Defaults or the settings file, with the command line overrides applied
pub fn load_settings(options: &CliOptions) -> Result<Settings, KinError> {
    let mut settings = match &options.config {
        Some(path) => Settings::from_json_file(path)?,
        None => Settings::new(),
    };
    if let Some(dir) = &options.out_dir {
        settings.output.dir = dir.clone();
    }
    if options.no_figures {
        settings.output.render_figures = false;
    }
    settings.check()?;
    Ok(settings)
}

/// Runs the tasks and prints one report table per task
pub fn run_and_report(kinds: &[TaskKind], settings: &Settings) -> Result<Vec<CalculationReport>, KinError> {
    let reports = run_tasks(kinds, settings)?;
    for report in &reports {
        report.pretty_print();
    }
    info!(
        "{} calculation(s) done, output in {}",
        reports.len(),
        settings.output.dir.display()
    );
    Ok(reports)
}

/// Entry point of the binary after argument parsing
pub fn run_cli(options: &CliOptions) -> Result<(), KinError> {
    let settings = load_settings(options)?;
    if options.show_settings {
        settings.pretty_print();
    }
    if options.is_interactive() {
        run_interactive_menu(settings);
        return Ok(());
    }
    if !options.tasks.is_empty() {
        run_and_report(&options.tasks, &settings)?;
    }
    Ok(())
}
