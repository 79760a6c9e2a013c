//! Field rendering utilities for forms

use crate::state::FormField;
use ratatui::{
    layout::Rect,
    style::{Color, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};

/// Draw a registered form field; invalid fields get a red border
pub fn draw_field(frame: &mut Frame, area: Rect, field: &FormField, is_active: bool) {
    let style = if field.disabled {
        Style::default().fg(Color::DarkGray)
    } else if is_active {
        Style::default().fg(Color::Cyan)
    } else {
        Style::default()
    };

    let border_style = if !field.is_valid() {
        Style::default().fg(Color::Red)
    } else if is_active && !field.disabled {
        Style::default().fg(Color::Cyan)
    } else {
        Style::default().fg(Color::DarkGray)
    };

    let display_value = field.display_value();
    let display_str = if display_value.is_empty() && !is_active {
        "(empty)".to_string()
    } else {
        display_value
    };

    let cursor = if is_active && !field.disabled { "▌" } else { "" };

    let mut title = format!(" {} ", field.label);
    if field.required {
        title.push_str("* ");
    }

    let content = Paragraph::new(Line::from(vec![
        Span::styled(display_str, style),
        Span::styled(cursor, Style::default().fg(Color::Cyan)),
    ]));

    let block = Block::default()
        .title(title)
        .borders(Borders::ALL)
        .border_style(border_style);

    frame.render_widget(content.wrap(Wrap { trim: false }).block(block), area);
}

/// Draw a free-text input that is not part of a form (e.g. a prompt)
pub fn draw_field_raw(frame: &mut Frame, area: Rect, label: &str, value: &str) {
    let content = Paragraph::new(Line::from(vec![
        Span::styled(value, Style::default().fg(Color::Cyan)),
        Span::styled("▌", Style::default().fg(Color::Cyan)),
    ]));
    let block = Block::default()
        .title(format!(" {label} "))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Yellow));
    frame.render_widget(content.block(block), area);
}
