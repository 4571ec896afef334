//! In-process recording engine running on its own thread.
//!
//! Owns the bar and tick recording sets, the flush interval, and the book of
//! known contracts. Commands arrive over a channel and are handled on the
//! recorder thread; everything the view learns comes back through the
//! [`EventBus`]. A status snapshot is also published once per flush interval.
//!
//! A panic while handling a command, or a failure to persist the recording
//! set, is captured as an [`ExceptionCapsule`] and published instead of
//! taking the thread down.

use std::any::Any;
use std::collections::{BTreeSet, HashSet};
use std::panic::{self, AssertUnwindSafe};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use crossbeam::channel::{self, Receiver, RecvTimeoutError, Sender};
use parking_lot::{Mutex, RwLock};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::bus::EventBus;
use crate::config::RecorderConfig;
use crate::engine::{FlushInterval, RecorderEngine};
use crate::event::{ExceptionCapsule, RecorderEvent, RecordingStatus};
use crate::symbol::{Contract, VtSymbol};

#[derive(Debug, Error)]
pub enum RecorderError {
    #[error("recorder settings I/O: {0}")]
    Io(#[from] std::io::Error),

    #[error("recorder settings JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("spawn recorder thread: {0}")]
    Spawn(std::io::Error),
}

/// Persisted recording set.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecorderSettings {
    #[serde(default)]
    pub bar: BTreeSet<String>,
    #[serde(default)]
    pub tick: BTreeSet<String>,
    #[serde(default)]
    pub flush_interval_secs: Option<u32>,
}

impl RecorderSettings {
    /// A missing file is an empty recording set.
    pub fn load(path: &Path) -> Result<Self, RecorderError> {
        match std::fs::read_to_string(path) {
            Ok(content) => Ok(serde_json::from_str(&content)?),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(Self::default()),
            Err(e) => Err(e.into()),
        }
    }

    pub fn save(&self, path: &Path) -> Result<(), RecorderError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)?;
        Ok(())
    }

    pub fn status(&self) -> RecordingStatus {
        RecordingStatus {
            bar: self.bar.iter().cloned().collect(),
            tick: self.tick.iter().cloned().collect(),
        }
    }

    fn set(&self, kind: RecordingKind) -> &BTreeSet<String> {
        match kind {
            RecordingKind::Bar => &self.bar,
            RecordingKind::Tick => &self.tick,
        }
    }

    fn set_mut(&mut self, kind: RecordingKind) -> &mut BTreeSet<String> {
        match kind {
            RecordingKind::Bar => &mut self.bar,
            RecordingKind::Tick => &mut self.tick,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum RecordingKind {
    Bar,
    Tick,
}

impl RecordingKind {
    fn label(self) -> &'static str {
        match self {
            RecordingKind::Bar => "bar",
            RecordingKind::Tick => "tick",
        }
    }
}

#[derive(Debug)]
enum Command {
    Add(RecordingKind, String),
    Remove(RecordingKind, String),
    SetInterval(u32),
    PutEvent,
    Shutdown,
}

impl Command {
    fn describe(&self) -> String {
        match self {
            Command::Add(kind, s) => format!("adding {} recording {s:?}", kind.label()),
            Command::Remove(kind, s) => format!("removing {} recording {s:?}", kind.label()),
            Command::SetInterval(secs) => format!("setting flush interval to {secs}s"),
            Command::PutEvent => "publishing recording status".into(),
            Command::Shutdown => "shutting down".into(),
        }
    }
}

#[derive(Debug, Default)]
struct ContractBook {
    contracts: Vec<Contract>,
    known: HashSet<VtSymbol>,
}

/// Recording engine handle. Cheap to share behind an `Arc`.
pub struct LocalRecorder {
    bus: Arc<EventBus>,
    tx: Sender<Command>,
    contracts: Arc<RwLock<ContractBook>>,
    interval: Arc<AtomicU32>,
    handle: Mutex<Option<JoinHandle<()>>>,
}

impl LocalRecorder {
    /// Load persisted settings (if configured) and start the recorder thread.
    pub fn start(bus: Arc<EventBus>, config: &RecorderConfig) -> Result<Self, RecorderError> {
        let settings = match &config.settings_path {
            Some(path) => RecorderSettings::load(path)?,
            None => RecorderSettings::default(),
        };
        let requested = settings
            .flush_interval_secs
            .unwrap_or(config.flush_interval_secs);
        let interval_secs = FlushInterval::clamped(requested).secs();
        if interval_secs != requested {
            tracing::warn!(requested, used = interval_secs, "flush interval out of range, clamped");
        }

        let (tx, rx) = channel::unbounded();
        let contracts = Arc::new(RwLock::new(ContractBook::default()));
        let interval = Arc::new(AtomicU32::new(interval_secs));

        tracing::info!(
            bar = settings.bar.len(),
            tick = settings.tick.len(),
            flush_interval = interval_secs,
            "starting recorder"
        );

        let worker = RecorderLoop {
            rx,
            bus: Arc::clone(&bus),
            contracts: Arc::clone(&contracts),
            interval: Arc::clone(&interval),
            settings,
            settings_path: config.settings_path.clone(),
        };
        let handle = thread::Builder::new()
            .name("recorderlab-recorder".into())
            .spawn(move || worker.run())
            .map_err(RecorderError::Spawn)?;

        Ok(Self {
            bus,
            tx,
            contracts,
            interval,
            handle: Mutex::new(Some(handle)),
        })
    }

    /// Record a newly tradable contract and announce it on the bus.
    /// Returns false if it was already known.
    pub fn discover_contract(&self, contract: Contract) -> bool {
        {
            let mut book = self.contracts.write();
            if !book.known.insert(contract.vt_symbol.clone()) {
                return false;
            }
            book.contracts.push(contract.clone());
        }
        tracing::debug!(vt_symbol = %contract.vt_symbol, "contract discovered");
        self.bus.publish(RecorderEvent::ContractDiscovered(contract));
        true
    }

    /// Stop the recorder thread and wait for it. Idempotent.
    pub fn shutdown(&self) {
        let Some(handle) = self.handle.lock().take() else {
            return;
        };
        let _ = self.tx.send(Command::Shutdown);
        if handle.join().is_err() {
            tracing::error!("recorder thread panicked during shutdown");
        }
    }

    fn send(&self, command: Command) {
        if self.tx.send(command).is_err() {
            tracing::warn!("recorder thread gone, command dropped");
        }
    }
}

impl RecorderEngine for LocalRecorder {
    fn add_bar_recording(&self, vt_symbol: &str) {
        self.send(Command::Add(RecordingKind::Bar, vt_symbol.to_string()));
    }

    fn remove_bar_recording(&self, vt_symbol: &str) {
        self.send(Command::Remove(RecordingKind::Bar, vt_symbol.to_string()));
    }

    fn add_tick_recording(&self, vt_symbol: &str) {
        self.send(Command::Add(RecordingKind::Tick, vt_symbol.to_string()));
    }

    fn remove_tick_recording(&self, vt_symbol: &str) {
        self.send(Command::Remove(RecordingKind::Tick, vt_symbol.to_string()));
    }

    fn flush_interval(&self) -> u32 {
        self.interval.load(Ordering::Relaxed)
    }

    fn set_flush_interval(&self, secs: u32) {
        let secs = secs.max(1);
        self.interval.store(secs, Ordering::Relaxed);
        self.send(Command::SetInterval(secs));
    }

    fn all_contracts(&self) -> Vec<Contract> {
        self.contracts.read().contracts.clone()
    }

    fn put_event(&self) {
        self.send(Command::PutEvent);
    }
}

impl Drop for LocalRecorder {
    fn drop(&mut self) {
        self.shutdown();
    }
}

struct RecorderLoop {
    rx: Receiver<Command>,
    bus: Arc<EventBus>,
    contracts: Arc<RwLock<ContractBook>>,
    interval: Arc<AtomicU32>,
    settings: RecorderSettings,
    settings_path: Option<PathBuf>,
}

impl RecorderLoop {
    fn run(mut self) {
        let mut next_flush = Instant::now() + self.interval_duration();
        loop {
            let timeout = next_flush.saturating_duration_since(Instant::now());
            match self.rx.recv_timeout(timeout) {
                Ok(Command::Shutdown) | Err(RecvTimeoutError::Disconnected) => break,
                Ok(command) => {
                    let reschedule = matches!(command, Command::SetInterval(_));
                    self.dispatch(command);
                    if reschedule {
                        next_flush = Instant::now() + self.interval_duration();
                    }
                }
                Err(RecvTimeoutError::Timeout) => {
                    self.dispatch(Command::PutEvent);
                    next_flush = Instant::now() + self.interval_duration();
                }
            }
        }
        tracing::info!("recorder stopped");
    }

    fn interval_duration(&self) -> Duration {
        Duration::from_secs(u64::from(self.interval.load(Ordering::Relaxed).max(1)))
    }

    fn dispatch(&mut self, command: Command) {
        let context = command.describe();
        let outcome = panic::catch_unwind(AssertUnwindSafe(|| self.handle(command)));
        if let Err(payload) = outcome {
            let error = panic_message(payload.as_ref());
            tracing::error!(%error, %context, "recorder command panicked");
            self.bus
                .publish(RecorderEvent::ExceptionRaised(ExceptionCapsule::new(error, context)));
        }
    }

    fn handle(&mut self, command: Command) {
        match command {
            Command::Add(kind, vt_symbol) => self.add_recording(kind, vt_symbol),
            Command::Remove(kind, vt_symbol) => self.remove_recording(kind, vt_symbol),
            Command::SetInterval(secs) => {
                self.settings.flush_interval_secs = Some(secs);
                self.save_settings();
                self.write_log(format!("Flush interval set to {secs}s"));
            }
            Command::PutEvent => self.put_event(),
            Command::Shutdown => {}
        }
    }

    fn add_recording(&mut self, kind: RecordingKind, vt_symbol: String) {
        if self.settings.set(kind).contains(&vt_symbol) {
            self.write_log(format!("Already in {} recording list: {vt_symbol}", kind.label()));
            return;
        }
        let known = self
            .contracts
            .read()
            .known
            .contains(&VtSymbol::from(vt_symbol.as_str()));
        if !known {
            self.write_log(format!("Contract not found: {vt_symbol}"));
            return;
        }

        self.settings.set_mut(kind).insert(vt_symbol.clone());
        self.save_settings();
        self.put_event();
        self.write_log(format!("Added {} recording: {vt_symbol}", kind.label()));
    }

    fn remove_recording(&mut self, kind: RecordingKind, vt_symbol: String) {
        if !self.settings.set_mut(kind).remove(&vt_symbol) {
            self.write_log(format!("Not in {} recording list: {vt_symbol}", kind.label()));
            return;
        }
        self.save_settings();
        self.put_event();
        self.write_log(format!("Removed {} recording: {vt_symbol}", kind.label()));
    }

    fn put_event(&self) {
        self.bus
            .publish(RecorderEvent::StatusUpdate(self.settings.status()));
    }

    fn write_log(&self, message: String) {
        tracing::info!("{message}");
        self.bus.publish(RecorderEvent::LogLine(message));
    }

    fn save_settings(&self) {
        let Some(path) = &self.settings_path else {
            return;
        };
        if let Err(e) = self.settings.save(path) {
            tracing::error!(path = %path.display(), error = %e, "failed to save recorder settings");
            self.bus.publish(RecorderEvent::ExceptionRaised(ExceptionCapsule::capture(
                &e,
                format!("saving recorder settings to {}", path.display()),
            )));
        }
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "recorder thread panicked".into()
    }
}
