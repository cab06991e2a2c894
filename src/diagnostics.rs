//! Diagnostics sink handed to the client and the fetcher.
//!
//! Production code forwards to the `log` facade; tests capture lines in memory.

use log::Level;
use std::sync::Mutex;

pub trait Diagnostics {
    fn log(&self, level: Level, message: &str);

    fn info(&self, message: &str) {
        self.log(Level::Info, message);
    }

    fn error(&self, message: &str) {
        self.log(Level::Error, message);
    }
}

/// Sink that forwards everything to the global logger.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogDiagnostics;

impl Diagnostics for LogDiagnostics {
    fn log(&self, level: Level, message: &str) {
        log::log!(target: "rednew", level, "{}", message);
    }
}

/// Sink that records every line, for assertions in tests.
#[derive(Debug, Default)]
pub struct MemoryDiagnostics {
    lines: Mutex<Vec<(Level, String)>>,
}

impl MemoryDiagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn lines(&self) -> Vec<(Level, String)> {
        match self.lines.lock() {
            Ok(lines) => lines.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    /// Messages logged at exactly `level`.
    pub fn messages_at(&self, level: Level) -> Vec<String> {
        self.lines()
            .into_iter()
            .filter(|(l, _)| *l == level)
            .map(|(_, message)| message)
            .collect()
    }
}

impl Diagnostics for MemoryDiagnostics {
    fn log(&self, level: Level, message: &str) {
        let mut lines = match self.lines.lock() {
            Ok(lines) => lines,
            Err(poisoned) => poisoned.into_inner(),
        };
        lines.push((level, message.to_string()));
    }
}

impl<D: Diagnostics + ?Sized> Diagnostics for &D {
    fn log(&self, level: Level, message: &str) {
        (**self).log(level, message);
    }
}
