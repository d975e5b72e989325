use log::{Level, LevelFilter, Log, Metadata, Record};

/// Log backend emitting systemd journal priority prefixes.
pub struct SystemdLogger {
    level: LevelFilter,
}

impl SystemdLogger {
    pub fn new() -> Self {
        Self {
            level: LevelFilter::Info,
        }
    }

    pub fn with_level(level: LevelFilter) -> Self {
        Self { level }
    }
}

impl Default for SystemdLogger {
    fn default() -> Self {
        Self::new()
    }
}

impl Log for SystemdLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.level
    }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }

        let level = match record.level() {
            Level::Error => "<3>",
            Level::Warn => "<4>",
            Level::Info => "<6>",
            Level::Debug => "<7>",
            Level::Trace => "<7>",
        };

        if record.level() == Level::Error {
            eprintln!("{}{}", level, record.args());
        } else {
            println!("{}{}", level, record.args());
        }
    }

    fn flush(&self) {}
}
