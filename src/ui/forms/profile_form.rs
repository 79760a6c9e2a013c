//! Profile form rendering

use super::field_renderer::{draw_field, draw_field_raw};
use crate::app::{App, Focus, FIELD_ORDER};
use crate::ui::components::{render_button, BUTTON_HEIGHT};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

/// Draw the "Your Profile" screen
pub fn draw_profile(frame: &mut Frame, area: Rect, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(2),             // Heading
            Constraint::Length(3),             // Avatar
            Constraint::Length(3),             // Name
            Constraint::Length(3),             // Email
            Constraint::Length(BUTTON_HEIGHT), // Submit
            Constraint::Length(3),             // Prompt
            Constraint::Min(0),
        ])
        .split(area);

    let heading = Paragraph::new(Line::from(Span::styled(
        "Your Profile",
        Style::default().add_modifier(Modifier::BOLD),
    )));
    frame.render_widget(heading, chunks[0]);

    let avatar = Paragraph::new(app.avatar_label()).block(
        Block::default()
            .title(" Avatar ")
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::DarkGray)),
    );
    frame.render_widget(avatar, chunks[1]);

    for (i, name) in FIELD_ORDER.iter().enumerate() {
        if let Some(field) = app.form.field(name) {
            draw_field(frame, chunks[2 + i], &field, app.focus == Focus::Field(i));
        }
    }

    let state = app.form.state();
    let label = if state.submitting {
        "Submitting..."
    } else {
        "Submit"
    };
    // Disabled while invalid or while a submission is in flight.
    let enabled = state.valid && !state.submitting;
    render_button(frame, chunks[4], label, app.focus == Focus::Submit, enabled);

    if let Some(prompt) = &app.prompt {
        draw_field_raw(frame, chunks[5], "Avatar file path (Enter to select, Esc to cancel)", prompt);
    }
}
