//! Keyboard input dispatch: overlays first, then dashboard keys.

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind};

use crate::app::{AppState, Overlay};

/// Raw table rows moved per PgUp/PgDn.
pub const PAGE_ROWS: usize = 10;

/// Handle a key event.
pub fn handle_key(app: &mut AppState, key: KeyEvent) {
    // Only handle key press events (Windows sends both Press and Release).
    if key.kind != KeyEventKind::Press {
        return;
    }

    match app.overlay {
        Overlay::Welcome | Overlay::Help => {
            app.overlay = Overlay::None;
            return;
        }
        Overlay::ErrorHistory => {
            handle_error_overlay(app, key);
            return;
        }
        Overlay::None => {}
    }

    match key.code {
        KeyCode::Char('q') => app.running = false,
        KeyCode::Char('?') => app.overlay = Overlay::Help,
        KeyCode::Char('e') => {
            app.error_scroll = 0;
            app.overlay = Overlay::ErrorHistory;
        }
        KeyCode::Enter | KeyCode::Char('f') => {
            app.request_fetch();
        }
        KeyCode::Char('s') => app.request_export(),
        KeyCode::Tab | KeyCode::BackTab => app.picker.toggle_focus(),
        KeyCode::Char('+') | KeyCode::Char('k') | KeyCode::Up => app.picker.increment(),
        KeyCode::Char('-') | KeyCode::Char('j') | KeyCode::Down => app.picker.decrement(),
        KeyCode::PageDown => app.scroll_rows(1, PAGE_ROWS),
        KeyCode::PageUp => app.scroll_rows(-1, PAGE_ROWS),
        _ => {}
    }
}

fn handle_error_overlay(app: &mut AppState, key: KeyEvent) {
    match key.code {
        KeyCode::Esc | KeyCode::Char('q') | KeyCode::Char('e') => {
            app.overlay = Overlay::None;
        }
        KeyCode::Char('j') | KeyCode::Down => {
            if app.error_scroll + 1 < app.error_history.len() {
                app.error_scroll += 1;
            }
        }
        KeyCode::Char('k') | KeyCode::Up => {
            app.error_scroll = app.error_scroll.saturating_sub(1);
        }
        _ => {}
    }
}
