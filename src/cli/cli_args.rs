//! Command line arguments.
//!
//! ```text
//! peroxikin                              interactive menu
//! peroxikin all                          every calculation
//! peroxikin field-sweep local-fields     selected calculations
//!     --out <dir>        output directory (default: output)
//!     --config <file>    JSON settings overriding the defaults
//!     --no-figures       write CSV files only
//!     --show-settings    print the settings tables
//!     -v / -vv, -q       more / less logging
//! ```
use std::path::PathBuf;

use crate::Calculations::TaskKind;

#[derive(Debug, Clone, PartialEq, Default)]
pub struct CliOptions {
    pub tasks: Vec<TaskKind>,
    pub out_dir: Option<PathBuf>,
    pub config: Option<PathBuf>,
    pub no_figures: bool,
    pub show_settings: bool,
    pub verbosity: u8,
    pub quiet: bool,
    pub help: bool,
}

impl CliOptions {
    /// nothing to run directly: open the menu
    pub fn is_interactive(&self) -> bool {
        self.tasks.is_empty() && !self.show_settings && !self.help
    }
}

pub fn parse_args<I>(args: I) -> Result<CliOptions, String>
where
    I: IntoIterator<Item = String>,
{
    let mut options = CliOptions::default();
    let mut args = args.into_iter();
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--out" | "-o" => {
                let dir = args.next().ok_or("--out needs a directory")?;
                options.out_dir = Some(PathBuf::from(dir));
            }
            "--config" | "-c" => {
                let file = args.next().ok_or("--config needs a file")?;
                options.config = Some(PathBuf::from(file));
            }
            "--no-figures" => options.no_figures = true,
            "--show-settings" => options.show_settings = true,
            "-q" | "--quiet" => options.quiet = true,
            "-v" => options.verbosity = options.verbosity.saturating_add(1),
            "-vv" => options.verbosity = options.verbosity.saturating_add(2),
            "-h" | "--help" => options.help = true,
            "all" => push_unique(&mut options.tasks, &TaskKind::ALL),
            other if other.starts_with('-') => {
                return Err(format!("unknown option '{}'", other));
            }
            name => {
                let kind = TaskKind::from_name(name).ok_or_else(|| {
                    format!(
                        "unknown calculation '{}', expected one of: all, {}",
                        name,
                        TaskKind::ALL
                            .iter()
                            .map(|k| k.cli_name())
                            .collect::<Vec<_>>()
                            .join(", ")
                    )
                })?;
                push_unique(&mut options.tasks, &[kind]);
            }
        }
    }
    Ok(options)
}

// keeps the first occurrence so every task runs once, in the order given
fn push_unique(tasks: &mut Vec<TaskKind>, new: &[TaskKind]) {
    for kind in new {
        if !tasks.contains(kind) {
            tasks.push(*kind);
        }
    }
}

pub fn usage() -> String {
    let mut text = String::from(
        "usage: peroxikin [all | <calculation>...] [--out <dir>] [--config <file>] [--no-figures] [--show-settings] [-v|-vv|-q]\n\ncalculations:\n",
    );
    for kind in TaskKind::ALL {
        text.push_str(&format!("  {:<14} {}\n", kind.cli_name(), kind.description()));
    }
    text.push_str("\nwithout a calculation the interactive menu opens\n");
    text
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_no_args_is_interactive() {
        let options = parse_args(args(&[])).unwrap();
        assert!(options.is_interactive());
        assert_eq!(options, CliOptions::default());
    }

    #[test]
    fn test_tasks_and_flags() {
        let options = parse_args(args(&[
            "field-sweep",
            "reverse",
            "field-sweep",
            "--out",
            "results",
            "--no-figures",
            "-v",
        ]))
        .unwrap();
        assert_eq!(
            options.tasks,
            vec![TaskKind::FieldSweep, TaskKind::ReverseCalculator]
        );
        assert_eq!(options.out_dir, Some(PathBuf::from("results")));
        assert!(options.no_figures);
        assert_eq!(options.verbosity, 1);
        assert!(!options.is_interactive());
    }

    #[test]
    fn test_all() {
        let options = parse_args(args(&["local-fields", "all"])).unwrap();
        assert_eq!(options.tasks.len(), 6);
        assert_eq!(options.tasks[0], TaskKind::LocalFields);
    }

    #[test]
    fn test_errors() {
        assert!(parse_args(args(&["--out"])).is_err());
        assert!(parse_args(args(&["--config"])).is_err());
        assert!(parse_args(args(&["--fast"])).is_err());
        let err = parse_args(args(&["fig2"])).unwrap_err();
        assert!(err.contains("fig2"));
        assert!(err.contains("first-order"));
    }

    #[test]
    fn test_usage_lists_tasks() {
        let text = usage();
        for kind in TaskKind::ALL {
            assert!(text.contains(kind.cli_name()));
        }
    }
}
