//! Events published by the recording engine and the topics they travel on.

use std::fmt;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::symbol::Contract;

/// Named event category with its own ordering guarantee.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Topic {
    ContractDiscovered,
    LogLine,
    StatusUpdate,
    ExceptionRaised,
}

impl Topic {
    pub const ALL: [Topic; 4] = [
        Topic::ContractDiscovered,
        Topic::LogLine,
        Topic::StatusUpdate,
        Topic::ExceptionRaised,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Topic::ContractDiscovered => "contract",
            Topic::LogLine => "log",
            Topic::StatusUpdate => "status",
            Topic::ExceptionRaised => "exception",
        }
    }
}

impl fmt::Display for Topic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Complete recording state at one instant. Never a diff.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordingStatus {
    pub bar: Vec<String>,
    pub tick: Vec<String>,
}

/// One line in the log pane.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogEntry {
    pub timestamp: NaiveDateTime,
    pub message: String,
}

impl LogEntry {
    pub fn new(timestamp: NaiveDateTime, message: impl Into<String>) -> Self {
        Self {
            timestamp,
            message: message.into(),
        }
    }

    /// Stamp `message` with the current local time.
    pub fn now(message: impl Into<String>) -> Self {
        Self::new(chrono::Local::now().naive_local(), message)
    }

    /// `HH:MM:SS<TAB>message`
    pub fn format_line(&self) -> String {
        format!("{}\t{}", self.timestamp.format("%H:%M:%S"), self.message)
    }
}

/// A fault captured on the engine thread, carried across to the view.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
#[error("{error} (while {context})")]
pub struct ExceptionCapsule {
    /// Rendered error value.
    pub error: String,
    /// What the engine thread was doing when the fault happened.
    pub context: String,
}

impl ExceptionCapsule {
    pub fn new(error: impl Into<String>, context: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            context: context.into(),
        }
    }

    /// Capture any error value together with its execution context.
    pub fn capture<E: std::error::Error + ?Sized>(err: &E, context: impl Into<String>) -> Self {
        let mut error = err.to_string();
        let mut source = err.source();
        while let Some(cause) = source {
            error.push_str(": ");
            error.push_str(&cause.to_string());
            source = cause.source();
        }
        Self::new(error, context)
    }
}

/// Everything the engine can say to the view.
#[derive(Debug, Clone, PartialEq)]
pub enum RecorderEvent {
    ContractDiscovered(Contract),
    LogLine(String),
    StatusUpdate(RecordingStatus),
    ExceptionRaised(ExceptionCapsule),
}

impl RecorderEvent {
    pub fn topic(&self) -> Topic {
        match self {
            RecorderEvent::ContractDiscovered(_) => Topic::ContractDiscovered,
            RecorderEvent::LogLine(_) => Topic::LogLine,
            RecorderEvent::StatusUpdate(_) => Topic::StatusUpdate,
            RecorderEvent::ExceptionRaised(_) => Topic::ExceptionRaised,
        }
    }
}
