//! Diagnostic sink for the `log` facade.
//!
//! The host chooses a level with the integer scale below and either a log
//! file or stderr. Library code only ever uses the `log` macros.

use std::fs::File;
use std::io::{self, Write};
use std::path::Path;

use log::{LevelFilter, Log, Metadata, Record};
use parking_lot::Mutex;

/// Log levels on the host's integer scale
#[repr(i32)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogLevel {
    Nothing = 0,
    User = 1,
    Error = 2,
    Warning = 3,
    #[default]
    Info = 4,
    Debug = 5,
    All = 6,
}

impl LogLevel {
    /// Create a LogLevel from an integer
    pub fn from_i32(level: i32) -> Self {
        match level {
            0 => LogLevel::Nothing,
            1 => LogLevel::User,
            2 => LogLevel::Error,
            3 => LogLevel::Warning,
            4 => LogLevel::Info,
            5 => LogLevel::Debug,
            6 => LogLevel::All,
            _ => LogLevel::Info,
        }
    }

    /// Get the integer representation for the C interface
    pub fn as_i32(&self) -> i32 {
        *self as i32
    }

    pub fn to_level_filter(self) -> LevelFilter {
        match self {
            LogLevel::Nothing => LevelFilter::Off,
            LogLevel::User | LogLevel::Error => LevelFilter::Error,
            LogLevel::Warning => LevelFilter::Warn,
            LogLevel::Info => LevelFilter::Info,
            LogLevel::Debug => LevelFilter::Debug,
            LogLevel::All => LevelFilter::Trace,
        }
    }
}

enum Sink {
    Stderr,
    File(File),
}

/// Line-oriented `log::Log` backend writing to a file or stderr.
pub struct BridgeLogger {
    sink: Mutex<Option<Sink>>,
}

static LOGGER: BridgeLogger = BridgeLogger::empty();

impl BridgeLogger {
    const fn empty() -> Self {
        Self {
            sink: parking_lot::const_mutex(None),
        }
    }

    /// A logger writing to stderr.
    pub fn stderr() -> Self {
        Self {
            sink: Mutex::new(Some(Sink::Stderr)),
        }
    }

    /// A logger writing to `path`, truncating it.
    pub fn to_file(path: &Path) -> io::Result<Self> {
        let file = File::create(path)?;
        Ok(Self {
            sink: Mutex::new(Some(Sink::File(file))),
        })
    }

    fn replace_sink(&self, sink: Sink) {
        *self.sink.lock() = Some(sink);
    }
}

impl Log for BridgeLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= log::max_level()
    }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }
        let line = format!("[{}] {}: {}", record.level(), record.target(), record.args());

        let mut guard = self.sink.lock();
        match guard.as_mut() {
            Some(Sink::File(file)) => {
                let _ = writeln!(file, "{}", line);
                let _ = file.flush();
            }
            Some(Sink::Stderr) => eprintln!("{}", line),
            None => {}
        }
    }

    fn flush(&self) {
        if let Some(Sink::File(file)) = self.sink.lock().as_mut() {
            let _ = file.flush();
        }
    }
}

/// Install the process-wide logger.
///
/// `path` of `None` logs to stderr. May be called again to switch the sink
/// or level.
pub fn init(path: Option<&Path>, level: LogLevel) -> io::Result<()> {
    let sink = match path {
        Some(path) => Sink::File(File::create(path)?),
        None => Sink::Stderr,
    };
    LOGGER.replace_sink(sink);

    // Already installed on re-init; the sink swap above is what matters.
    let _ = log::set_logger(&LOGGER);
    log::set_max_level(level.to_level_filter());
    Ok(())
}
