//! UI module for rendering the TUI

mod components;
mod forms;
mod layout;

use crate::app::App;
use ratatui::Frame;

/// Main draw function
pub fn draw(frame: &mut Frame, app: &App) {
    let (main_area, toast_area, status_area) = layout::create_layout(frame.area());

    forms::draw_profile(frame, main_area, app);
    layout::draw_toast(frame, toast_area, app);
    layout::draw_status_bar(frame, status_area, app);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AppConfig;
    use ratatui::{backend::TestBackend, Terminal};
    use tempfile::TempDir;

    fn screen_text(terminal: &Terminal<TestBackend>) -> String {
        let buffer = terminal.backend().buffer();
        buffer
            .content()
            .chunks(buffer.area.width as usize)
            .map(|row| row.iter().map(|cell| cell.symbol()).collect::<String>())
            .collect::<Vec<_>>()
            .join("\n")
    }

    #[tokio::test]
    async fn test_profile_screen_renders() {
        let dir = TempDir::new().unwrap();
        let config = AppConfig {
            storage_root: Some(dir.path().join("objects")),
            identity_path: Some(dir.path().join("identity.json")),
            ..Default::default()
        };
        let app = App::new(&config).await.unwrap();

        let mut terminal = Terminal::new(TestBackend::new(100, 24)).unwrap();
        terminal.draw(|frame| draw(frame, &app)).unwrap();

        let text = screen_text(&terminal);
        assert!(text.contains("Your Profile"));
        assert!(text.contains("Name *"));
        assert!(text.contains("(no avatar)"));
        assert!(text.contains("Submit"));
    }
}
