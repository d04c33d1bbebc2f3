use crate::app::App;
use ratatui::{
    layout::Rect,
    style::{Color, Style},
    widgets::Paragraph,
    Frame,
};

const KEY_HINTS: &str =
    "[j/k] движење [t] тема [[/]] регион [a] ресет [r] освежи [o] отвори [?] помош [q] излез";

/// Render the status bar
pub fn render(f: &mut Frame, app: &App, area: Rect) {
    if area.width < 1 || area.height < 1 {
        return;
    }

    let text: &str = if let Some((msg, _)) = &app.status_message {
        msg
    } else if app.is_loading() {
        "Се вчитуваат вестите..."
    } else {
        KEY_HINTS
    };

    let style = Style::default().bg(Color::DarkGray).fg(Color::White);
    f.render_widget(Paragraph::new(text).style(style), area);
}
