use std::env;

use log::LevelFilter;

/// Environment variable that turns on debug logging, same as `--debug`.
pub const DEBUG_ENV_VAR: &str = "CROSSFILL_DEBUG";

/// Initialize logging for the CLI.
///
/// Logs at `Debug` if `debug_enabled` is true and `Info` otherwise; `RUST_LOG`, if set, overrides
/// both.
pub fn init_logger(debug_enabled: bool) {
    let level = if debug_enabled {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };

    let mut builder = env_logger::Builder::new();
    builder
        .filter(None, level)
        .format_timestamp(None)
        .format_module_path(false)
        .format_target(false);

    if let Ok(spec) = env::var("RUST_LOG") {
        builder.parse_filters(&spec);
    }

    // A logger may already be installed (e.g. by a test harness); keep that one.
    if builder.try_init().is_ok() {
        log::debug!("Logger initialized at {level:?} level");
    }
}
