use std::{
    io::Write,
    sync::OnceLock,
    time::Instant,
};

use log::{set_logger, set_max_level, Level, LevelFilter, Log, Metadata, Record, SetLoggerError};

/// Prints records with the time since start-up. Warnings and errors go to
/// stderr, everything else to stdout. Records from other crates are only
/// shown from `Warn` up.
pub struct Logger {
    started: OnceLock<Instant>,
}

impl Logger {
    pub fn init(filter: LevelFilter) -> Result<(), SetLoggerError> {
        LOGGER.started.get_or_init(Instant::now);
        set_logger(&LOGGER).map(|()| set_max_level(filter))
    }

    fn elapsed(&self) -> f64 {
        self.started
            .get_or_init(Instant::now)
            .elapsed()
            .as_secs_f64()
    }
}

fn is_ours(target: &str) -> bool {
    target == "celestial" || target.starts_with("celestial::")
}

impl Log for Logger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        if !is_ours(metadata.target()) && metadata.level() > Level::Warn {
            return false;
        }
        metadata.level() <= log::max_level()
    }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }
        let line = format!(
            "{:>9.3}s {:<5} {}: {}\n",
            self.elapsed(),
            record.level(),
            record.target(),
            record.args()
        );
        // a closed pipe is no reason to bring the simulation down
        let _ = match record.level() {
            Level::Error | Level::Warn => std::io::stderr().write_all(line.as_bytes()),
            _ => std::io::stdout().write_all(line.as_bytes()),
        };
    }

    fn flush(&self) {
        let _ = std::io::stdout().flush();
    }
}

static LOGGER: Logger = Logger {
    started: OnceLock::new(),
};
