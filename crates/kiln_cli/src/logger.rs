use log::{Level, Log, Metadata, Record};

/// Console logger of the `kiln` binary: one `kiln <level>: ...` line per
/// record, warnings and errors to stderr, the rest to stdout. The level
/// cut-off is whatever `main` set as the max level from `--verbose`.
pub struct Logger;

impl Logger {
    fn render(record: &Record) -> String {
        format!(
            "kiln {}: {}",
            record.level().as_str().to_lowercase(),
            record.args()
        )
    }
}

impl Log for Logger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= log::max_level()
    }

    fn log(&self, record: &Record) {
        if self.enabled(record.metadata()) {
            let line = Self::render(record);
            if record.level() <= Level::Warn {
                eprintln!("{line}");
            } else {
                println!("{line}");
            }
        }
    }

    fn flush(&self) {}
}
