use env_logger::{Builder, Env};
use log::LevelFilter;
use std::time::Duration;
use sysinfo::{ProcessExt, System, SystemExt};

/// Env var holding an `env_logger` filter that overrides the verbosity flags.
pub static LOG_ENV: &str = "STRESS_LOG";

/// Log target of the library; both binaries log through it.
pub static LOG_TARGET: &str = "stress_survey";

pub fn level_for(verbose: u8) -> LevelFilter {
    match verbose {
        0 => LevelFilter::Info,
        1 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    }
}

pub fn init_logging(level: LevelFilter) {
    let env = Env::new().filter(LOG_ENV);
    // A second init (tests, repeated runs in one process) keeps the first logger.
    let _ = Builder::new()
        .filter(Some(LOG_TARGET), level)
        .parse_env(env)
        .try_init();
}

/// Closing line printed by the binaries, e.g. `Time elapsed: 1.2s, memory used: 4096 bytes`.
pub fn usage_report(elapsed: Duration, memory_used: u64) -> String {
    format!("Time elapsed: {elapsed:?}, memory used: {memory_used} bytes")
}

/// Resident memory of this process in bytes, 0 when the platform does not report it.
pub fn monitor_memory() -> u64 {
    let Ok(pid) = sysinfo::get_current_pid() else {
        return 0;
    };
    let mut sys = System::new();
    sys.refresh_process(pid);
    sys.process(pid).map(|process| process.memory()).unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn verbosity_flags_map_to_levels() {
        assert_eq!(level_for(0), LevelFilter::Info);
        assert_eq!(level_for(1), LevelFilter::Debug);
        assert_eq!(level_for(7), LevelFilter::Trace);
    }

    #[test]
    fn library_modules_fall_under_the_log_target() {
        assert!(module_path!().starts_with(LOG_TARGET));
        assert_eq!(module_path!().split("::").next(), Some(LOG_TARGET));
    }

    #[test]
    fn usage_report_names_time_and_memory() {
        assert_eq!(
            usage_report(Duration::from_millis(1500), 4096),
            "Time elapsed: 1.5s, memory used: 4096 bytes"
        );
    }

    #[test]
    fn init_twice_does_not_panic() {
        init_logging(LevelFilter::Warn);
        init_logging(LevelFilter::Debug);
    }
}
