//! Keyboard input handling.
//!
//! Keys stand in for the page's clicks and scrolling: list movement reports
//! the scroll position to the controller, topic and region keys select
//! controls, `a` is the reset button.

use crate::app::{App, AppEvent};
use crossterm::event::{KeyCode, KeyModifiers};
use tokio::sync::mpsc;

use super::events::spawn_load;
use super::Action;

/// Main input dispatch function.
pub(super) fn handle_input(
    app: &mut App,
    code: KeyCode,
    modifiers: KeyModifiers,
    event_tx: &mpsc::Sender<AppEvent>,
) -> Action {
    if modifiers.contains(KeyModifiers::CONTROL) && code == KeyCode::Char('c') {
        return Action::Quit;
    }

    // Help overlay captures all keys while visible
    if app.show_help {
        if matches!(
            code,
            KeyCode::Esc | KeyCode::Char('q') | KeyCode::Char('?')
        ) {
            app.show_help = false;
        }
        return Action::Continue;
    }

    match code {
        KeyCode::Char('q') | KeyCode::Esc => return Action::Quit,
        KeyCode::Char('?') => app.show_help = true,

        // List movement
        KeyCode::Char('j') | KeyCode::Down => app.nav_down(),
        KeyCode::Char('k') | KeyCode::Up => app.nav_up(),
        KeyCode::PageDown | KeyCode::Char(' ') => app.page_down(),
        KeyCode::PageUp => app.page_up(),
        KeyCode::Char('g') | KeyCode::Home => app.nav_first(),
        KeyCode::Char('G') | KeyCode::End => app.nav_last(),

        // Filters
        KeyCode::Char('t') => app.cycle_topic(true),
        KeyCode::Char('T') => app.cycle_topic(false),
        KeyCode::Char(']') => app.cycle_region(true),
        KeyCode::Char('[') => app.cycle_region(false),
        KeyCode::Char(c @ '1'..='9') => {
            let index = c as usize - '1' as usize;
            if index < app.controller.regions().len() {
                app.select_region_at(index);
            }
        }
        KeyCode::Char('a') => app.reset_filters(),

        // Feed
        KeyCode::Char('r') => {
            if spawn_load(app, event_tx) {
                app.set_status("Се вчитуваат вестите...");
            } else {
                app.set_status("Вчитувањето е веќе во тек");
            }
        }
        KeyCode::Char('o') | KeyCode::Enter => open_selected(app),

        _ => {}
    }
    Action::Continue
}

/// Open the selected article's link in the system browser.
fn open_selected(app: &mut App) {
    let url = match app.selected_link() {
        Ok(url) => url,
        Err(e) => {
            tracing::debug!(error = %e, "Not opening selected article");
            app.set_status(format!("Не може да се отвори: {}", e));
            return;
        }
    };

    match open::that(url.as_str()) {
        Ok(()) => {
            tracing::info!(url = %url, "Opened article in browser");
            app.set_status("Отворено во прелистувач");
        }
        Err(e) => {
            tracing::warn!(url = %url, error = %e, "Failed to open browser");
            app.set_status(format!("Не може да се отвори прелистувач: {}", e));
        }
    }
}
