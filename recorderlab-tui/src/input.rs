//! Keyboard input dispatch: overlays → global keys → symbol entry.

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use crate::app::{AppState, Overlay, RecordingCommand};

pub fn handle_key(app: &mut AppState, key: KeyEvent) {
    // Only handle key press events (Windows sends both Press and Release).
    if key.kind != KeyEventKind::Press {
        return;
    }

    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
        app.running = false;
        return;
    }

    // 1. Overlays consume input first.
    match app.overlay {
        Overlay::Welcome => {
            app.overlay = Overlay::None;
            return;
        }
        Overlay::Help => {
            if matches!(key.code, KeyCode::Esc | KeyCode::F(1)) {
                app.overlay = Overlay::None;
            }
            return;
        }
        Overlay::ErrorHistory => {
            handle_error_overlay(app, key);
            return;
        }
        Overlay::None => {}
    }

    // 2. Global keys.
    match key.code {
        KeyCode::Esc => {
            if app.completion_cursor.is_some() {
                app.completion_cursor = None;
            } else {
                app.running = false;
            }
        }
        KeyCode::F(1) => app.overlay = Overlay::Help,
        KeyCode::F(2) => app.run_command(RecordingCommand::AddBar),
        KeyCode::F(3) => app.run_command(RecordingCommand::RemoveBar),
        KeyCode::F(4) => app.run_command(RecordingCommand::AddTick),
        KeyCode::F(5) => app.run_command(RecordingCommand::RemoveTick),
        KeyCode::F(6) => app.overlay = Overlay::ErrorHistory,
        KeyCode::PageUp => app.step_interval(true),
        KeyCode::PageDown => app.step_interval(false),
        KeyCode::End => app.follow_log(),
        _ => handle_entry_key(app, key),
    }
}

fn handle_error_overlay(app: &mut AppState, key: KeyEvent) {
    match key.code {
        KeyCode::Esc | KeyCode::F(6) => app.overlay = Overlay::None,
        KeyCode::Down => {
            if app.error_scroll + 1 < app.error_history.len() {
                app.error_scroll += 1;
            }
        }
        KeyCode::Up => app.error_scroll = app.error_scroll.saturating_sub(1),
        _ => {}
    }
}

/// Symbol entry, completion popup and log scrolling.
fn handle_entry_key(app: &mut AppState, key: KeyEvent) {
    let popup_open = !app.completions().is_empty();
    match key.code {
        KeyCode::Down if popup_open => app.select_next_completion(),
        KeyCode::Up if popup_open => app.select_prev_completion(),
        KeyCode::Down => app.scroll_log_down(),
        KeyCode::Up => app.scroll_log_up(),
        KeyCode::Tab | KeyCode::Enter => {
            app.accept_completion();
        }
        KeyCode::Backspace => app.pop_char(),
        KeyCode::Char('u') if key.modifiers.contains(KeyModifiers::CONTROL) => app.clear_input(),
        KeyCode::Char(c) if !key.modifiers.contains(KeyModifiers::CONTROL) => app.push_char(c),
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crossterm::event::KeyEventState;
    use recorderlab_core::testing::{Call, ScriptedEngine};
    use recorderlab_core::{EventBus, ExceptionCapsule, RecorderEvent};

    fn press(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn ctrl(c: char) -> KeyEvent {
        KeyEvent::new(KeyCode::Char(c), KeyModifiers::CONTROL)
    }

    fn type_str(app: &mut AppState, s: &str) {
        for c in s.chars() {
            handle_key(app, press(KeyCode::Char(c)));
        }
    }

    fn setup(contracts: &[&str]) -> (AppState, Arc<EventBus>, Arc<ScriptedEngine>) {
        let bus = Arc::new(EventBus::new());
        let engine = ScriptedEngine::new(contracts, 10);
        let app = AppState::new(Arc::clone(&bus), engine.clone());
        (app, bus, engine)
    }

    #[test]
    fn release_events_are_ignored() {
        let (mut app, _bus, _engine) = setup(&[]);
        let release = KeyEvent {
            code: KeyCode::Char('x'),
            modifiers: KeyModifiers::NONE,
            kind: KeyEventKind::Release,
            state: KeyEventState::NONE,
        };
        handle_key(&mut app, release);
        assert!(app.symbol_input.is_empty());
    }

    #[test]
    fn welcome_is_dismissed_by_any_key() {
        let (mut app, _bus, _engine) = setup(&[]);
        app.overlay = Overlay::Welcome;
        handle_key(&mut app, press(KeyCode::Char('r')));
        assert_eq!(app.overlay, Overlay::None);
        assert!(app.symbol_input.is_empty());
    }

    #[test]
    fn help_overlay_swallows_commands() {
        let (mut app, _bus, engine) = setup(&[]);
        handle_key(&mut app, press(KeyCode::F(1)));
        assert_eq!(app.overlay, Overlay::Help);

        handle_key(&mut app, press(KeyCode::F(2)));
        assert_eq!(engine.calls(), vec![Call::PutEvent]);

        handle_key(&mut app, press(KeyCode::Esc));
        assert_eq!(app.overlay, Overlay::None);
        assert!(app.running);
    }

    #[test]
    fn function_keys_send_commands() {
        let (mut app, _bus, engine) = setup(&[]);
        type_str(&mut app, "au2402.SHFE");
        for f in 2..=5 {
            handle_key(&mut app, press(KeyCode::F(f)));
        }
        let sym = "au2402.SHFE".to_string();
        assert_eq!(
            engine.calls(),
            vec![
                Call::PutEvent,
                Call::AddBar(sym.clone()),
                Call::RemoveBar(sym.clone()),
                Call::AddTick(sym.clone()),
                Call::RemoveTick(sym),
            ]
        );
    }

    #[test]
    fn page_keys_step_interval() {
        let (mut app, _bus, engine) = setup(&[]);
        handle_key(&mut app, press(KeyCode::PageUp));
        handle_key(&mut app, press(KeyCode::PageDown));
        handle_key(&mut app, press(KeyCode::PageDown));
        assert_eq!(app.controller.flush_interval().secs(), 9);
        assert_eq!(engine.calls().len(), 4);
    }

    #[test]
    fn tab_accepts_selected_completion() {
        let (mut app, _bus, _engine) = setup(&["rb2401.SHFE", "rb2405.SHFE"]);
        type_str(&mut app, "RB24");
        handle_key(&mut app, press(KeyCode::Down));
        handle_key(&mut app, press(KeyCode::Down));
        handle_key(&mut app, press(KeyCode::Tab));
        assert_eq!(app.symbol_input, "rb2405.SHFE");
    }

    #[test]
    fn arrows_scroll_log_without_popup() {
        let (mut app, bus, _engine) = setup(&[]);
        for i in 0..3 {
            bus.publish(RecorderEvent::LogLine(format!("line {i}")));
        }
        app.drain_events().unwrap();

        handle_key(&mut app, press(KeyCode::Up));
        assert_eq!(app.log_scroll, 1);
        handle_key(&mut app, press(KeyCode::Down));
        assert_eq!(app.log_scroll, 0);
    }

    #[test]
    fn editing_keys() {
        let (mut app, _bus, _engine) = setup(&[]);
        type_str(&mut app, "abc");
        handle_key(&mut app, press(KeyCode::Backspace));
        assert_eq!(app.symbol_input, "ab");
        handle_key(&mut app, ctrl('u'));
        assert!(app.symbol_input.is_empty());
    }

    #[test]
    fn esc_clears_selection_then_quits() {
        let (mut app, _bus, _engine) = setup(&["rb2401.SHFE", "rb2405.SHFE"]);
        type_str(&mut app, "rb");
        handle_key(&mut app, press(KeyCode::Down));
        assert!(app.completion_cursor.is_some());

        handle_key(&mut app, press(KeyCode::Esc));
        assert!(app.running);
        assert!(app.completion_cursor.is_none());

        handle_key(&mut app, press(KeyCode::Esc));
        assert!(!app.running);
    }

    #[test]
    fn error_history_overlay_scrolls_and_closes() {
        let (mut app, _bus, engine) = setup(&[]);
        for i in 0..3 {
            app.push_engine_fault(ExceptionCapsule::new(format!("fault {i}"), "flushing"));
        }
        assert_eq!(app.overlay, Overlay::ErrorHistory);
        assert_eq!(app.error_scroll, 2);

        handle_key(&mut app, press(KeyCode::Up));
        handle_key(&mut app, press(KeyCode::Up));
        handle_key(&mut app, press(KeyCode::Up));
        assert_eq!(app.error_scroll, 0);
        handle_key(&mut app, press(KeyCode::Down));
        assert_eq!(app.error_scroll, 1);

        // Commands are swallowed while the overlay is up.
        handle_key(&mut app, press(KeyCode::F(2)));
        assert_eq!(engine.calls(), vec![Call::PutEvent]);

        handle_key(&mut app, press(KeyCode::Esc));
        assert_eq!(app.overlay, Overlay::None);
        assert!(app.running);

        handle_key(&mut app, press(KeyCode::F(6)));
        assert_eq!(app.overlay, Overlay::ErrorHistory);
    }

    #[test]
    fn ctrl_c_quits_from_any_overlay() {
        let (mut app, _bus, _engine) = setup(&[]);
        app.overlay = Overlay::Help;
        handle_key(&mut app, ctrl('c'));
        assert!(!app.running);
    }
}
