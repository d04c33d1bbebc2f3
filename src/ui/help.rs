//! Help overlay with the key table.

use ratatui::{
    layout::{Constraint, Rect},
    style::{Color, Modifier, Style},
    widgets::{Block, Borders, Clear, Row, Table},
    Frame,
};

/// Key bindings grouped by section, in display order.
const SECTIONS: &[(&str, &[(&str, &str)])] = &[
    (
        "Листа",
        &[
            ("j / ↓", "Следна вест"),
            ("k / ↑", "Претходна вест"),
            ("Space / PgDn", "Страница надолу"),
            ("PgUp", "Страница нагоре"),
            ("g / G", "Почеток / крај"),
            ("o / Enter", "Отвори во прелистувач"),
        ],
    ),
    (
        "Филтри",
        &[
            ("t / T", "Следна / претходна тема"),
            ("] / [", "Следен / претходен регион"),
            ("1-9", "Избери регион"),
            ("a", "Ресетирај ги сите филтри"),
        ],
    ),
    (
        "Општо",
        &[
            ("r", "Освежи ги вестите"),
            ("?", "Помош"),
            ("q / Esc", "Излез"),
        ],
    ),
];

/// Render the help overlay on top of the current view.
pub fn render(f: &mut Frame) {
    let overlay = centered_rect(70, 80, f.area());
    if overlay.width < 20 || overlay.height < 6 {
        return;
    }

    f.render_widget(Clear, overlay);

    let heading = Style::default()
        .fg(Color::Cyan)
        .add_modifier(Modifier::BOLD);
    let mut rows: Vec<Row> = Vec::new();
    for (idx, (section, bindings)) in SECTIONS.iter().enumerate() {
        if idx > 0 {
            rows.push(Row::new(vec![String::new(), String::new()]));
        }
        rows.push(Row::new(vec![format!("-- {} --", section), String::new()]).style(heading));
        for (keys, description) in bindings.iter() {
            rows.push(Row::new(vec![format!("  {}", keys), description.to_string()]));
        }
    }

    let widths = [Constraint::Length(16), Constraint::Min(20)];
    let table = Table::new(rows, widths).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Cyan))
            .title(" Помош (? за затворање) "),
    );

    f.render_widget(table, overlay);
}

/// Create a centered rectangle with the given percentage of the parent area.
fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let width = area.width * percent_x / 100;
    let height = area.height * percent_y / 100;
    let x = area.x + (area.width.saturating_sub(width)) / 2;
    let y = area.y + (area.height.saturating_sub(height)) / 2;
    Rect::new(x, y, width, height)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_centered_rect_within_parent() {
        let area = Rect::new(0, 0, 100, 40);
        let rect = centered_rect(70, 80, area);
        assert_eq!(rect, Rect::new(15, 4, 70, 32));
    }
}
