//! Recording controller: operator commands out, engine snapshots in.
//!
//! Lives on the presentation thread. Holds only what the view renders: the
//! two recording lists, the log, the completion source, and a display copy of
//! the flush interval. There is no notion of a pending command; every command
//! goes straight to the engine and its effect arrives with a later snapshot.

use std::sync::Arc;

use crate::bridge::{BridgeError, EventBridge};
use crate::engine::{FlushInterval, RecorderEngine};
use crate::event::{ExceptionCapsule, LogEntry, RecorderEvent, RecordingStatus, Topic};
use crate::symbol::{Contract, VtSymbol};
use crate::symbol_index::SymbolIndex;

pub struct RecordingController {
    engine: Arc<dyn RecorderEngine>,
    symbols: SymbolIndex,
    bar_recordings: Vec<String>,
    tick_recordings: Vec<String>,
    log: Vec<String>,
    flush_interval: FlushInterval,
}

impl RecordingController {
    /// Seed the symbol index and interval from the engine, then ask it for a
    /// first status snapshot.
    pub fn new(engine: Arc<dyn RecorderEngine>) -> Self {
        let symbols = SymbolIndex::seeded(engine.all_contracts().into_iter().map(|c| c.vt_symbol));
        let flush_interval = FlushInterval::clamped(engine.flush_interval());
        tracing::debug!(
            contracts = symbols.len(),
            flush_interval = flush_interval.secs(),
            "recording controller seeded"
        );

        let controller = Self {
            engine,
            symbols,
            bar_recordings: Vec::new(),
            tick_recordings: Vec::new(),
            log: Vec::new(),
            flush_interval,
        };
        controller.engine.put_event();
        controller
    }

    /// Route all four topics on `bridge` into this controller.
    pub fn wire(bridge: &mut EventBridge<RecordingController>) {
        for topic in Topic::ALL {
            bridge.subscribe(topic, |controller, event| controller.handle(event));
        }
    }

    pub fn handle(&mut self, event: RecorderEvent) -> Result<(), BridgeError> {
        match event {
            RecorderEvent::ContractDiscovered(contract) => self.on_contract_discovered(contract),
            RecorderEvent::LogLine(message) => self.on_log_line(message),
            RecorderEvent::StatusUpdate(status) => self.on_status_update(status),
            RecorderEvent::ExceptionRaised(capsule) => return self.on_exception(capsule),
        }
        Ok(())
    }

    // ── Commands (fire-and-forget) ───────────────────────────────────

    pub fn add_bar_recording(&self, vt_symbol: &str) {
        tracing::debug!(vt_symbol, "add bar recording");
        self.engine.add_bar_recording(vt_symbol);
    }

    pub fn remove_bar_recording(&self, vt_symbol: &str) {
        tracing::debug!(vt_symbol, "remove bar recording");
        self.engine.remove_bar_recording(vt_symbol);
    }

    pub fn add_tick_recording(&self, vt_symbol: &str) {
        tracing::debug!(vt_symbol, "add tick recording");
        self.engine.add_tick_recording(vt_symbol);
    }

    pub fn remove_tick_recording(&self, vt_symbol: &str) {
        tracing::debug!(vt_symbol, "remove tick recording");
        self.engine.remove_tick_recording(vt_symbol);
    }

    /// Cache for display and push to the engine right away.
    pub fn set_flush_interval(&mut self, interval: FlushInterval) {
        self.flush_interval = interval;
        self.engine.set_flush_interval(interval.secs());
    }

    // ── Event handlers ───────────────────────────────────────────────

    /// Replace both lists wholesale.
    pub fn on_status_update(&mut self, status: RecordingStatus) {
        self.bar_recordings.clear();
        self.bar_recordings.extend(status.bar);
        self.tick_recordings.clear();
        self.tick_recordings.extend(status.tick);
    }

    pub fn on_log_line(&mut self, message: String) {
        self.on_log_entry(LogEntry::now(message));
    }

    pub fn on_log_entry(&mut self, entry: LogEntry) {
        self.log.push(entry.format_line());
    }

    pub fn on_contract_discovered(&mut self, contract: Contract) {
        self.symbols.observe(contract.vt_symbol);
    }

    /// Engine faults are never absorbed here.
    pub fn on_exception(&mut self, capsule: ExceptionCapsule) -> Result<(), BridgeError> {
        tracing::error!(error = %capsule.error, context = %capsule.context, "engine exception");
        Err(BridgeError::EngineException(capsule))
    }

    // ── Rendered state ───────────────────────────────────────────────

    pub fn bar_recordings(&self) -> &[String] {
        &self.bar_recordings
    }

    pub fn tick_recordings(&self) -> &[String] {
        &self.tick_recordings
    }

    pub fn log(&self) -> &[String] {
        &self.log
    }

    pub fn flush_interval(&self) -> FlushInterval {
        self.flush_interval
    }

    /// The list the completion popup is built from.
    pub fn completion_source(&self) -> &[VtSymbol] {
        self.symbols.as_slice()
    }

    /// Completion candidates containing `query` (case-insensitive).
    pub fn completions(&self, query: &str) -> Vec<&VtSymbol> {
        self.symbols.matches(query)
    }
}
