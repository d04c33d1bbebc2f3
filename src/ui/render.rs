//! Render functions for the TUI.
//!
//! Screen layout, top to bottom: header, topic bar, region bar, article
//! area, status bar. The help overlay draws on top.

use crate::app::{App, FeedState, EMPTY_FEED_MESSAGE};
use crate::feed::card::PLACEHOLDER_TIME;
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};

use super::{articles, filters, help, status};

/// Minimum terminal dimensions required for normal operation.
pub(super) const MIN_WIDTH: u16 = 60;
pub(super) const MIN_HEIGHT: u16 = 12;

const APP_TITLE: &str = "📰 Makedon World News";
const ERROR_HEADING: &str = "⚠️ Привремен проблем со вестите";
const ERROR_BODY: &str =
    "Системот за вести моментално се ажурира. Ве молиме обидете се повторно за неколку минути.";
const LOADING_MESSAGE: &str = "Се вчитуваат вестите...";
const TOO_SMALL_SHORT: &str = "Премал екран";
const TOO_SMALL_HEADING: &str = "Терминалот е премал";

/// Main render dispatch function.
pub(super) fn render(f: &mut Frame, app: &mut App) {
    let area = f.area();

    // Guard against zero-size areas before any layout math
    if area.width < 1 || area.height < 1 {
        return;
    }

    if area.width < MIN_WIDTH || area.height < MIN_HEIGHT {
        f.render_widget(too_small_message(area), area);
        return;
    }

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Min(0),
            Constraint::Length(1),
        ])
        .split(area);

    render_header(f, app, chunks[0]);
    filters::render_topics(f, app, chunks[1]);
    filters::render_regions(f, app, chunks[2]);
    render_body(f, app, chunks[3]);
    status::render(f, app, chunks[4]);

    if app.show_help {
        help::render(f);
    }
}

/// Notice shown instead of the layout when the terminal is too small.
fn too_small_message(area: Rect) -> Paragraph<'static> {
    if area.height < 3 || area.width < 20 {
        Paragraph::new(TOO_SMALL_SHORT)
    } else {
        Paragraph::new(format!(
            "{}\n\nНајмалку: {}x{}\nМоментално: {}x{}",
            TOO_SMALL_HEADING, MIN_WIDTH, MIN_HEIGHT, area.width, area.height
        ))
        .alignment(Alignment::Center)
    }
}

/// Title, loaded-articles counter and last update time.
fn render_header(f: &mut Frame, app: &App, area: Rect) {
    let (updated, total) = match &app.feed_state {
        FeedState::Ready {
            last_updated,
            article_count,
        } => (
            last_updated.as_deref().unwrap_or(PLACEHOLDER_TIME),
            Some(*article_count),
        ),
        _ => (PLACEHOLDER_TIME, None),
    };

    let dim = Style::default().fg(Color::DarkGray);
    let mut spans = vec![
        Span::styled(
            APP_TITLE,
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        ),
        Span::styled("  │  ", dim),
        Span::raw("Вчитани Вести: "),
        Span::styled(
            app.view.counter.to_string(),
            Style::default().add_modifier(Modifier::BOLD),
        ),
    ];
    if let Some(total) = total {
        spans.push(Span::styled(format!(" / {}", total), dim));
    }
    spans.push(Span::styled("  │  ", dim));
    spans.push(Span::styled(format!("Ажурирано: {}", updated), dim));

    f.render_widget(Paragraph::new(Line::from(spans)), area);
}

fn render_body(f: &mut Frame, app: &mut App, area: Rect) {
    if matches!(app.feed_state, FeedState::Ready { .. }) {
        articles::render(f, app, area);
        return;
    }

    match &app.feed_state {
        FeedState::Loading => render_message(f, area, vec![Line::from(LOADING_MESSAGE)]),
        FeedState::Empty => render_message(f, area, vec![Line::from(EMPTY_FEED_MESSAGE)]),
        FeedState::Failed { message } => {
            let lines = vec![
                Line::styled(
                    ERROR_HEADING,
                    Style::default()
                        .fg(Color::Yellow)
                        .add_modifier(Modifier::BOLD),
                ),
                Line::from(""),
                Line::from(ERROR_BODY),
                Line::from(""),
                Line::styled(
                    format!("Технички детали: {}", message),
                    Style::default().fg(Color::DarkGray),
                ),
            ];
            render_message(f, area, lines);
        }
        FeedState::Ready { .. } => {}
    }
}

/// Bordered, centered replacement content for the article area.
fn render_message(f: &mut Frame, area: Rect, lines: Vec<Line<'_>>) {
    let paragraph = Paragraph::new(lines)
        .block(Block::default().borders(Borders::ALL))
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true });
    f.render_widget(paragraph, area);
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratatui::{backend::TestBackend, Terminal};

    fn screen_text(width: u16, height: u16) -> String {
        let mut terminal = Terminal::new(TestBackend::new(width, height)).unwrap();
        terminal
            .draw(|f| {
                let area = f.area();
                f.render_widget(too_small_message(area), area);
            })
            .unwrap();
        terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|cell| cell.symbol())
            .collect()
    }

    #[test]
    fn test_too_small_message_is_localized() {
        let text = screen_text(40, 8);
        assert!(text.contains(TOO_SMALL_HEADING));
        assert!(text.contains("Најмалку: 60x12"));
        assert!(text.contains("Моментално: 40x8"));
        assert!(!text.contains("Terminal"));

        assert!(screen_text(15, 2).contains(TOO_SMALL_SHORT));
    }
}
