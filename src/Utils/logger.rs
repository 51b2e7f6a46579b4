//! Terminal logging through `simplelog`.
//!
//! Library code only uses the `log` macros; the binary calls [`init_logger`] once. Time stamps
//! are switched off so that two runs print the same thing.
use log::LevelFilter;
use simplelog::{ColorChoice, ConfigBuilder, TermLogger, TerminalMode};

/// Level from the number of `-v` flags, `quiet` wins
pub fn level_from_flags(verbosity: u8, quiet: bool) -> LevelFilter {
    if quiet {
        return LevelFilter::Warn;
    }
    match verbosity {
        0 => LevelFilter::Info,
        1 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    }
}

/// Installs the terminal logger; a second call keeps the first logger
pub fn init_logger(level: LevelFilter) {
    let config = ConfigBuilder::new()
        .set_time_level(LevelFilter::Off)
        .set_target_level(LevelFilter::Off)
        .set_thread_level(LevelFilter::Off)
        .build();
    if TermLogger::init(level, config, TerminalMode::Mixed, ColorChoice::Auto).is_err() {
        log::debug!("logger already initialised");
    }
}
