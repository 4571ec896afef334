//! Recording engine contract as seen from the view, plus the flush interval.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::symbol::Contract;

/// Command and query surface of a recording engine.
///
/// Commands are fire-and-forget: they return as soon as the request is handed
/// off. Their effect shows up later as a status update on the event bus.
/// Implementations own all validation (unknown symbols, interval range).
pub trait RecorderEngine: Send + Sync {
    fn add_bar_recording(&self, vt_symbol: &str);
    fn remove_bar_recording(&self, vt_symbol: &str);
    fn add_tick_recording(&self, vt_symbol: &str);
    fn remove_tick_recording(&self, vt_symbol: &str);

    /// Current flush interval in seconds.
    fn flush_interval(&self) -> u32;
    fn set_flush_interval(&self, secs: u32);

    /// Every contract known right now.
    fn all_contracts(&self) -> Vec<Contract>;

    /// Ask the engine to publish a fresh status snapshot.
    fn put_event(&self);
}

/// Flush interval as shown in the view's selector, always within 1–60 seconds.
///
/// This is a display bound only; the engine decides what it accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u32", into = "u32")]
pub struct FlushInterval(u32);

impl FlushInterval {
    pub const MIN: u32 = 1;
    pub const MAX: u32 = 60;

    /// Pull any value into the selector range.
    pub fn clamped(secs: u32) -> Self {
        Self(secs.clamp(Self::MIN, Self::MAX))
    }

    pub fn secs(self) -> u32 {
        self.0
    }

    pub fn increment(self) -> Self {
        Self::clamped(self.0.saturating_add(1))
    }

    pub fn decrement(self) -> Self {
        Self::clamped(self.0.saturating_sub(1))
    }
}

impl Default for FlushInterval {
    fn default() -> Self {
        Self(10)
    }
}

impl TryFrom<u32> for FlushInterval {
    type Error = String;

    fn try_from(secs: u32) -> Result<Self, Self::Error> {
        if (Self::MIN..=Self::MAX).contains(&secs) {
            Ok(Self(secs))
        } else {
            Err(format!(
                "flush interval {secs}s outside {}..={}",
                Self::MIN,
                Self::MAX
            ))
        }
    }
}

impl From<FlushInterval> for u32 {
    fn from(value: FlushInterval) -> Self {
        value.0
    }
}

impl fmt::Display for FlushInterval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} s", self.0)
    }
}
