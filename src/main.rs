use std::process::ExitCode;

use PeroxiKin::Utils::logger::{init_logger, level_from_flags};
use PeroxiKin::cli::cli_args::{parse_args, usage};
use PeroxiKin::cli::cli_tasks::run_cli;

pub fn main() -> ExitCode {
    let options = match parse_args(std::env::args().skip(1)) {
        Ok(options) => options,
        Err(message) => {
            eprintln!("error: {}\n\n{}", message, usage());
            return ExitCode::from(2);
        }
    };
    if options.help {
        println!("{}", usage());
        return ExitCode::SUCCESS;
    }
    init_logger(level_from_flags(options.verbosity, options.quiet));

    match run_cli(&options) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {}", e);
            ExitCode::FAILURE
        }
    }
}
