//! A `log` backend printing to stdout.

use log::{LevelFilter, Log, Metadata, Record};
use std::{
    env,
    io::{self, Write},
    time::Instant,
};

/// Environment variable selecting the maximum log level (`error` .. `trace`).
const LEVEL_VAR: &str = "UPTIME_LOG";

/// Prints every record with the time elapsed since the logger was created.
struct StampedLogger {
    start: Instant,
}

impl Log for StampedLogger {
    fn enabled(&self, metadata: &Metadata<'_>) -> bool {
        metadata.level() <= log::max_level()
    }

    fn log(&self, record: &Record<'_>) {
        if self.enabled(record.metadata()) {
            let stamp = self.start.elapsed();
            let stdout = io::stdout();
            let mut out = stdout.lock();
            // Nothing sensible to do if stdout is gone
            let _ = writeln!(
                out,
                "{:>4}.{:03} {:<5} {} - {}",
                stamp.as_secs(),
                stamp.subsec_millis(),
                record.level(),
                record.target(),
                record.args()
            );
        }
    }

    fn flush(&self) {
        let _ = io::stdout().flush();
    }
}

/// Installs the logger. The level defaults to `info` unless overridden through `UPTIME_LOG`.
pub fn init() {
    let level = match env::var(LEVEL_VAR) {
        Ok(level) => level.parse().unwrap_or(LevelFilter::Info),
        Err(_) => LevelFilter::Info,
    };

    let logger = Box::leak(Box::new(StampedLogger {
        start: Instant::now(),
    }));
    if log::set_logger(logger).is_ok() {
        log::set_max_level(level);
    }

    log::info!("Logger ready ({})", level);
}
