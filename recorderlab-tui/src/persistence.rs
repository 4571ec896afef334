//! View state persistence: JSON save/load across restarts.
//!
//! The recording set and flush interval belong to the engine and are not
//! stored here.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::app::{AppState, Overlay};

/// Serializable subset of view state that persists across restarts.
#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PersistedState {
    pub last_symbol: String,
    pub welcome_dismissed: bool,
}

/// Load persisted state from disk. Returns defaults if file is missing or corrupt.
pub fn load(path: &Path) -> PersistedState {
    match std::fs::read_to_string(path) {
        Ok(content) => serde_json::from_str(&content).unwrap_or_default(),
        Err(_) => PersistedState::default(),
    }
}

/// Save persisted state to disk. Creates parent directories if needed.
pub fn save(path: &Path, state: &PersistedState) -> anyhow::Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let json = serde_json::to_string_pretty(state)?;
    std::fs::write(path, json)?;
    Ok(())
}

pub fn extract(app: &AppState) -> PersistedState {
    PersistedState {
        last_symbol: app.symbol_input.clone(),
        welcome_dismissed: app.overlay != Overlay::Welcome,
    }
}

pub fn apply(app: &mut AppState, state: PersistedState) {
    app.symbol_input = state.last_symbol;
    if !state.welcome_dismissed {
        app.overlay = Overlay::Welcome;
    }
}
