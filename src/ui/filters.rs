//! Topic and region control bars.

use crate::app::App;
use crate::filter::Control;
use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

/// Render the topic bar; the active topic is highlighted.
pub fn render_topics(f: &mut Frame, app: &App, area: Rect) {
    let line = control_line("Теми", app.controller.topics(), app.view.topic, false);
    f.render_widget(Paragraph::new(line), area);
}

/// Render the region bar with the number key for each region.
pub fn render_regions(f: &mut Frame, app: &App, area: Rect) {
    let line = control_line("Региони", app.controller.regions(), app.view.region, true);
    f.render_widget(Paragraph::new(line), area);
}

fn control_line<'a>(
    heading: &'a str,
    controls: &'a [Control],
    active: Option<usize>,
    numbered: bool,
) -> Line<'a> {
    let active_style = Style::default()
        .bg(Color::Cyan)
        .fg(Color::Black)
        .add_modifier(Modifier::BOLD);
    let key_style = Style::default().fg(Color::DarkGray);

    let mut spans = vec![Span::styled(
        format!("{}: ", heading),
        Style::default().add_modifier(Modifier::BOLD),
    )];

    for (idx, control) in controls.iter().enumerate() {
        if numbered && idx < 9 {
            spans.push(Span::styled(format!("{}", idx + 1), key_style));
        }
        let style = if active == Some(idx) {
            active_style
        } else {
            Style::default()
        };
        spans.push(Span::styled(format!(" {} ", control.label), style));
        spans.push(Span::raw(" "));
    }

    Line::from(spans)
}
