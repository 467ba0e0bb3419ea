//! Diagnostic logging setup
//!
//! Library code only emits `tracing` events; the binary installs a compact
//! stderr subscriber so stdout stays free for the run summary.

use tracing::Level;

/// Level for a `-v` count. Warnings are always shown.
pub fn level_for(verbosity: u8, debug: bool) -> Level {
    match (verbosity, debug) {
        (0, false) => Level::WARN,
        (0, true) | (1, _) => Level::INFO,
        (2, _) => Level::DEBUG,
        _ => Level::TRACE,
    }
}

/// Install the global subscriber. Later calls are ignored.
pub fn init(verbosity: u8, debug: bool) {
    let level = level_for(verbosity, debug);
    let installed = tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .with_target(false)
        .without_time()
        .try_init()
        .is_ok();
    if installed {
        tracing::debug!("Logging initialized at {level}");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_level_for_verbosity() {
        assert_eq!(level_for(0, false), Level::WARN);
        assert_eq!(level_for(0, true), Level::INFO);
        assert_eq!(level_for(1, false), Level::INFO);
        assert_eq!(level_for(2, false), Level::DEBUG);
        assert_eq!(level_for(5, false), Level::TRACE);
    }

    #[test]
    fn test_init_twice_is_harmless() {
        init(0, false);
        init(3, true);
    }
}
