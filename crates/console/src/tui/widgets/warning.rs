//! Warning banner shown above a form

use ratatui::{
    Frame,
    layout::{Alignment, Rect},
    style::{Color, Modifier, Style},
    widgets::Paragraph,
};

use super::colors;

/// One-line error banner, hidden until a message is shown
#[derive(Debug, Clone, Default)]
pub struct Warning {
    message: Option<String>,
}

impl Warning {
    pub fn show(&mut self, message: &str) {
        self.message = Some(message.to_string());
    }

    pub fn clear(&mut self) {
        self.message = None;
    }

    pub fn message(&self) -> Option<&str> {
        self.message.as_deref()
    }

    pub fn render(&self, frame: &mut Frame, area: Rect) {
        let Some(message) = self.message() else {
            return;
        };

        let banner = Paragraph::new(format!("! {}", message))
            .style(
                Style::default()
                    .fg(Color::White)
                    .bg(colors::WARNING_BG)
                    .add_modifier(Modifier::BOLD),
            )
            .alignment(Alignment::Center);
        frame.render_widget(banner, area);
    }
}
