//! Engine double shared by unit tests here and by dependent crates
//! (enable the `test-util` feature).

use std::sync::Arc;

use parking_lot::Mutex;

use crate::engine::RecorderEngine;
use crate::symbol::Contract;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    AddBar(String),
    RemoveBar(String),
    AddTick(String),
    RemoveTick(String),
    SetInterval(u32),
    PutEvent,
}

/// Engine double that only records what it was asked to do.
pub struct ScriptedEngine {
    contracts: Vec<Contract>,
    interval: u32,
    calls: Mutex<Vec<Call>>,
}

impl ScriptedEngine {
    pub fn new(contracts: &[&str], interval: u32) -> Arc<Self> {
        Arc::new(Self {
            contracts: contracts.iter().map(|s| Contract::new(*s)).collect(),
            interval,
            calls: Mutex::new(Vec::new()),
        })
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().clone()
    }

    fn record(&self, call: Call) {
        self.calls.lock().push(call);
    }
}

impl RecorderEngine for ScriptedEngine {
    fn add_bar_recording(&self, vt_symbol: &str) {
        self.record(Call::AddBar(vt_symbol.into()));
    }
    fn remove_bar_recording(&self, vt_symbol: &str) {
        self.record(Call::RemoveBar(vt_symbol.into()));
    }
    fn add_tick_recording(&self, vt_symbol: &str) {
        self.record(Call::AddTick(vt_symbol.into()));
    }
    fn remove_tick_recording(&self, vt_symbol: &str) {
        self.record(Call::RemoveTick(vt_symbol.into()));
    }
    fn flush_interval(&self) -> u32 {
        self.interval
    }
    fn set_flush_interval(&self, secs: u32) {
        self.record(Call::SetInterval(secs));
    }
    fn all_contracts(&self) -> Vec<Contract> {
        self.contracts.clone()
    }
    fn put_event(&self) {
        self.record(Call::PutEvent);
    }
}
