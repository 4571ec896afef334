//! Application state: single-owner, main-thread only.
//!
//! All view state lives here. The recorder thread reaches it only through the
//! event bridge, which is drained once per frame.

use std::sync::Arc;

use chrono::{Local, NaiveTime};

use recorderlab_core::{
    BridgeError, EventBridge, EventBus, ExceptionCapsule, RecorderEngine, RecordingController,
    VtSymbol,
};

/// Which overlay (if any) is shown on top.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Overlay {
    None,
    Welcome,
    Help,
    ErrorHistory,
}

/// Status message severity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusLevel {
    Info,
    Warning,
}

/// An engine exception as it reached the view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineFault {
    pub received_at: NaiveTime,
    pub error: String,
    pub context: String,
}

/// The four operator actions on the recording set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordingCommand {
    AddBar,
    RemoveBar,
    AddTick,
    RemoveTick,
}

impl RecordingCommand {
    pub fn label(self) -> &'static str {
        match self {
            RecordingCommand::AddBar => "add bar recording",
            RecordingCommand::RemoveBar => "remove bar recording",
            RecordingCommand::AddTick => "add tick recording",
            RecordingCommand::RemoveTick => "remove tick recording",
        }
    }
}

/// Top-level application state.
pub struct AppState {
    pub running: bool,

    // Engine-facing
    pub controller: RecordingController,
    pub bridge: EventBridge<RecordingController>,

    // Symbol entry
    pub symbol_input: String,
    pub completion_cursor: Option<usize>,

    // Cross-cutting
    /// Lines scrolled up from the newest log entry; 0 follows the tail.
    pub log_scroll: usize,
    pub overlay: Overlay,
    pub status_message: Option<(String, StatusLevel)>,
    pub error_history: Vec<EngineFault>,
    pub error_scroll: usize,
}

impl AppState {
    /// Wire the bridge before building the controller so the snapshot the
    /// controller requests on construction is not missed.
    pub fn new(bus: Arc<EventBus>, engine: Arc<dyn RecorderEngine>) -> Self {
        let mut bridge = EventBridge::new(bus);
        RecordingController::wire(&mut bridge);
        let controller = RecordingController::new(engine);

        Self {
            running: true,
            controller,
            bridge,
            symbol_input: String::new(),
            completion_cursor: None,
            log_scroll: 0,
            overlay: Overlay::None,
            status_message: None,
            error_history: Vec::new(),
            error_scroll: 0,
        }
    }

    /// Deliver everything the engine queued since the last frame.
    pub fn drain_events(&mut self) -> Result<usize, BridgeError> {
        let before = self.controller.log().len();
        let delivered = self.bridge.drain(&mut self.controller)?;
        if self.log_scroll > 0 {
            // Keep the viewport pinned while scrolled back.
            self.log_scroll += self.controller.log().len() - before;
        }
        Ok(delivered)
    }

    /// Per-frame delivery. An engine exception still fails its handler, but
    /// here it is reported in the error history and the view keeps running.
    /// Events queued behind it are delivered on the next frame.
    pub fn pump_events(&mut self) -> Result<(), BridgeError> {
        match self.drain_events() {
            Ok(_) => Ok(()),
            Err(BridgeError::EngineException(capsule)) => {
                self.push_engine_fault(capsule);
                Ok(())
            }
            Err(e) => Err(e),
        }
    }

    pub fn push_engine_fault(&mut self, capsule: ExceptionCapsule) {
        tracing::warn!(error = %capsule.error, context = %capsule.context, "engine fault reported");
        self.set_warning(format!("Engine fault: {capsule}"));
        self.error_history.push(EngineFault {
            received_at: Local::now().time(),
            error: capsule.error,
            context: capsule.context,
        });
        self.error_scroll = self.error_history.len() - 1;
        self.overlay = Overlay::ErrorHistory;
    }

    /// Unsubscribe from the engine. Call before dropping the view.
    pub fn close(&mut self) {
        self.bridge.close();
    }

    // ── Symbol entry ─────────────────────────────────────────────────

    pub fn push_char(&mut self, c: char) {
        self.symbol_input.push(c);
        self.completion_cursor = None;
    }

    pub fn pop_char(&mut self) {
        self.symbol_input.pop();
        self.completion_cursor = None;
    }

    pub fn clear_input(&mut self) {
        self.symbol_input.clear();
        self.completion_cursor = None;
    }

    /// Completion candidates for the popup. Hidden once the input is exactly
    /// the only candidate.
    pub fn completions(&self) -> Vec<&VtSymbol> {
        let hits = self.controller.completions(&self.symbol_input);
        if hits.len() == 1 && hits[0].as_str() == self.symbol_input {
            return Vec::new();
        }
        hits
    }

    pub fn select_next_completion(&mut self) {
        let count = self.completions().len();
        if count == 0 {
            return;
        }
        self.completion_cursor = Some(match self.completion_cursor {
            Some(i) if i + 1 < count => i + 1,
            Some(_) => 0,
            None => 0,
        });
    }

    pub fn select_prev_completion(&mut self) {
        let count = self.completions().len();
        if count == 0 {
            return;
        }
        self.completion_cursor = Some(match self.completion_cursor {
            Some(0) | None => count - 1,
            Some(i) => i - 1,
        });
    }

    /// Replace the input with the highlighted (or first) candidate.
    pub fn accept_completion(&mut self) -> bool {
        let chosen = {
            let hits = self.completions();
            let idx = self.completion_cursor.unwrap_or(0);
            hits.get(idx).map(|s| s.to_string())
        };
        match chosen {
            Some(symbol) => {
                self.symbol_input = symbol;
                self.completion_cursor = None;
                true
            }
            None => false,
        }
    }

    // ── Commands ─────────────────────────────────────────────────────

    /// Hand the entered text to the engine as-is. The lists change only when
    /// the engine's next snapshot arrives.
    pub fn run_command(&mut self, command: RecordingCommand) {
        let symbol = self.symbol_input.clone();
        match command {
            RecordingCommand::AddBar => self.controller.add_bar_recording(&symbol),
            RecordingCommand::RemoveBar => self.controller.remove_bar_recording(&symbol),
            RecordingCommand::AddTick => self.controller.add_tick_recording(&symbol),
            RecordingCommand::RemoveTick => self.controller.remove_tick_recording(&symbol),
        }
        if symbol.is_empty() {
            self.set_warning(format!("Sent {} with empty symbol", command.label()));
        } else {
            self.set_status(format!("Sent {} for {symbol}", command.label()));
        }
    }

    /// Step the interval selector; every change goes to the engine.
    pub fn step_interval(&mut self, up: bool) {
        let current = self.controller.flush_interval();
        let next = if up { current.increment() } else { current.decrement() };
        if next != current {
            self.controller.set_flush_interval(next);
            self.set_status(format!("Flush interval {next}"));
        }
    }

    // ── Log viewport ─────────────────────────────────────────────────

    pub fn scroll_log_up(&mut self) {
        if self.log_scroll + 1 < self.controller.log().len() {
            self.log_scroll += 1;
        }
    }

    pub fn scroll_log_down(&mut self) {
        self.log_scroll = self.log_scroll.saturating_sub(1);
    }

    pub fn follow_log(&mut self) {
        self.log_scroll = 0;
    }

    // ── Status line ──────────────────────────────────────────────────

    pub fn set_status(&mut self, msg: impl Into<String>) {
        self.status_message = Some((msg.into(), StatusLevel::Info));
    }

    pub fn set_warning(&mut self, msg: impl Into<String>) {
        self.status_message = Some((msg.into(), StatusLevel::Warning));
    }
}
