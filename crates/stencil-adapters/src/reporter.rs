//! Reporter adapters.

use std::sync::{Arc, Mutex, PoisonError};

use stencil_core::application::ports::Reporter;
use tracing::{info, warn};

/// Forwards messages to `tracing` events.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingReporter;

impl Reporter for TracingReporter {
    fn info(&self, message: &str) {
        info!(target: "stencil::report", "{message}");
    }

    fn warn(&self, message: &str) {
        warn!(target: "stencil::report", "{message}");
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportLevel {
    Info,
    Warn,
}

/// Keeps every message; clones share the record.
#[derive(Debug, Clone, Default)]
pub struct RecordingReporter {
    messages: Arc<Mutex<Vec<(ReportLevel, String)>>>,
}

impl RecordingReporter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn messages(&self) -> Vec<(ReportLevel, String)> {
        self.messages
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn warnings(&self) -> Vec<String> {
        self.messages()
            .into_iter()
            .filter(|(level, _)| *level == ReportLevel::Warn)
            .map(|(_, m)| m)
            .collect()
    }

    fn record(&self, level: ReportLevel, message: &str) {
        self.messages
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push((level, message.to_string()));
    }
}

impl Reporter for RecordingReporter {
    fn info(&self, message: &str) {
        self.record(ReportLevel::Info, message);
    }

    fn warn(&self, message: &str) {
        self.record(ReportLevel::Warn, message);
    }
}
