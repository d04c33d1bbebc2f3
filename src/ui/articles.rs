use crate::app::{App, CARD_ROWS};
use crate::feed::ArticleCard;
use crate::util::{truncate_to_width, wrap_to_width};
use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

/// Summary lines shown per card.
const SUMMARY_LINES: usize = 2;

/// Render the article card list.
///
/// Records the viewport height on `app`, which may report a scroll position
/// to the controller and request the next page.
pub fn render(f: &mut Frame, app: &mut App, area: Rect) {
    if area.width < 3 || area.height < 3 {
        return;
    }
    let inner_rows = area.height.saturating_sub(2) as usize;
    let inner_width = area.width.saturating_sub(2) as usize;
    app.set_viewport_rows(inner_rows);

    let shown = app.shown_cards();
    let first_card = app.scroll_offset / CARD_ROWS;
    let skip_rows = app.scroll_offset % CARD_ROWS;
    let cards_needed = inner_rows / CARD_ROWS + 2;

    let mut lines: Vec<Line> = Vec::with_capacity(cards_needed * CARD_ROWS);
    for (pos, card) in shown.iter().enumerate().skip(first_card).take(cards_needed) {
        lines.extend(card_lines(card, inner_width, pos == app.selected));
    }

    if shown.is_empty() {
        let hint = if app.controller.scroll().in_flight {
            "..."
        } else {
            "Нема вести за избраниот регион."
        };
        lines.push(Line::styled(hint, Style::default().fg(Color::DarkGray)));
    }

    let title = format!(
        " Вести {}/{} ",
        shown.len(),
        app.controller.filtered_count()
    );
    let paragraph = Paragraph::new(lines)
        .block(Block::default().borders(Borders::ALL).title(title))
        .scroll((skip_rows as u16, 0));

    f.render_widget(paragraph, area);
}

/// Exactly [`CARD_ROWS`] lines for one card.
fn card_lines(card: &ArticleCard, width: usize, selected: bool) -> Vec<Line<'static>> {
    let gutter = if selected { "▌ " } else { "  " };
    let text_width = width.saturating_sub(2);
    let gutter_style = Style::default().fg(Color::Cyan);

    let title_style = if selected {
        Style::default()
            .bg(Color::DarkGray)
            .fg(Color::White)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default().add_modifier(Modifier::BOLD)
    };

    let row = |text: String, style: Style| {
        Line::from(vec![
            Span::styled(gutter, gutter_style),
            Span::styled(text, style),
        ])
    };

    let mut lines = Vec::with_capacity(CARD_ROWS);
    lines.push(row(
        truncate_to_width(&card.badges(), text_width).into_owned(),
        Style::default().fg(Color::Cyan),
    ));
    lines.push(row(
        truncate_to_width(&card.title, text_width).into_owned(),
        title_style,
    ));

    let summary = wrap_to_width(&card.summary, text_width.max(1));
    for idx in 0..SUMMARY_LINES {
        let text = match summary.get(idx) {
            // Last summary row gets an ellipsis when more text was cut
            Some(line) if idx + 1 == SUMMARY_LINES && summary.len() > SUMMARY_LINES => {
                truncate_to_width(&format!("{} ...", line), text_width).into_owned()
            }
            Some(line) => line.clone(),
            None => String::new(),
        };
        lines.push(row(text, Style::default()));
    }

    lines.push(row(
        truncate_to_width(&card.footer(), text_width).into_owned(),
        Style::default().fg(Color::DarkGray),
    ));
    lines.push(Line::from(""));

    lines
}
