//! RecorderLab Core: everything between the recording engine and the view.
//!
//! - Instrument identifiers and the append-only symbol index behind completion
//! - Engine events, topics and the exception capsule
//! - Topic-keyed event bus the engine publishes on
//! - Event bridge: unbounded tagged FIFO drained on the presentation thread
//! - Recording controller: fire-and-forget commands, snapshot rendering
//! - Local recorder: an in-process engine on its own thread
//! - TOML configuration

pub mod bridge;
pub mod bus;
pub mod config;
pub mod controller;
pub mod engine;
pub mod event;
pub mod recorder;
pub mod symbol;
pub mod symbol_index;
#[cfg(any(test, feature = "test-util"))]
pub mod testing;

pub use bridge::{BridgeError, EventBridge};
pub use bus::{EventBus, SubscriptionId};
pub use config::{ConfigError, RecorderLabConfig};
pub use controller::RecordingController;
pub use engine::{FlushInterval, RecorderEngine};
pub use event::{ExceptionCapsule, LogEntry, RecorderEvent, RecordingStatus, Topic};
pub use recorder::{LocalRecorder, RecorderError, RecorderSettings};
pub use symbol::{Contract, VtSymbol};
pub use symbol_index::SymbolIndex;
