use famiboy_core::diagnostics::{self, Level, LogSink};
use std::fmt;

/// Forwards core diagnostics into the `log` facade.
struct LogBridge;

impl LogSink for LogBridge {
    fn log(&self, level: Level, target: &'static str, args: fmt::Arguments) {
        let level = match level {
            Level::Trace => log::Level::Trace,
            Level::Info => log::Level::Info,
            Level::Warn => log::Level::Warn,
        };
        log::log!(target: target, level, "{args}");
    }
}

/// Route core diagnostics through `log`. Safe to call more than once.
pub fn install() {
    if !diagnostics::has_log_sink() {
        let _ = diagnostics::try_set_log_sink(Box::new(LogBridge));
    }
}
