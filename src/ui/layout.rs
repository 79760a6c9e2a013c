//! Layout components (content area, toast, status bar)

use crate::app::App;
use crate::feedback::Severity;
use crate::platform::{CHOOSE_FILE_SHORTCUT, CLEAR_FILE_SHORTCUT, SAVE_SHORTCUT};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Style},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

/// Split the screen into content, toast line and status bar
pub fn create_layout(area: Rect) -> (Rect, Rect, Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(0),    // Content
            Constraint::Length(1), // Toast
            Constraint::Length(1), // Status bar
        ])
        .split(area);

    (chunks[0], chunks[1], chunks[2])
}

/// Draw the latest notice
pub fn draw_toast(frame: &mut Frame, area: Rect, app: &App) {
    let Some(notice) = &app.toast else {
        return;
    };
    let color = match notice.severity {
        Severity::Success => Color::Green,
        Severity::Error => Color::Red,
    };
    let toast = Paragraph::new(Span::styled(
        format!(" {} ", notice.message),
        Style::default().fg(color),
    ));
    frame.render_widget(toast, area);
}

pub fn draw_status_bar(frame: &mut Frame, area: Rect, app: &App) {
    let mut spans = vec![];

    let session_status = if app.session.is_active() {
        Span::styled(" ● ", Style::default().fg(Color::Green))
    } else {
        Span::styled(" ○ ", Style::default().fg(Color::Red))
    };
    spans.push(session_status);

    let hints = if app.prompt.is_some() {
        "Enter:select  Esc:cancel".to_string()
    } else {
        format!(
            "Tab:next  {SAVE_SHORTCUT}:submit  {CHOOSE_FILE_SHORTCUT}:avatar  {CLEAR_FILE_SHORTCUT}:clear avatar  Esc:quit"
        )
    };
    spans.push(Span::styled(hints, Style::default().fg(Color::Gray)));

    if let Ok(user) = app.session.user() {
        spans.push(Span::raw(" | "));
        spans.push(Span::styled(user.email, Style::default().fg(Color::Blue)));
    }

    let status = Paragraph::new(Line::from(spans)).style(Style::default().bg(Color::DarkGray));
    frame.render_widget(status, area);
}
