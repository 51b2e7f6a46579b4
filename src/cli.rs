//! Command line interface: argument parsing, the interactive menu and the task runner.
pub mod cli_args;
pub mod cli_main;
pub mod cli_tasks;
