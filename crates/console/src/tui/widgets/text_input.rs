//! Single-line labelled text input

use ratatui::{
    Frame,
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
};

use super::colors;

/// What characters the input accepts
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputKind {
    /// Any printable character
    Text,
    /// ASCII digits only
    Number,
}

/// Labelled single-line input with an optional error highlight
#[derive(Debug, Clone)]
pub struct TextInput {
    label: String,
    kind: InputKind,
    value: String,
    disabled: bool,
    /// Message shown under the field when it failed validation
    error: Option<String>,
}

impl TextInput {
    pub fn new(label: &str, kind: InputKind) -> Self {
        Self {
            label: label.to_string(),
            kind,
            value: String::new(),
            disabled: false,
            error: None,
        }
    }

    pub fn value(&self) -> &str {
        &self.value
    }

    /// Append a typed character; ignored while disabled or when the kind rejects it
    pub fn push_char(&mut self, c: char) {
        if self.disabled || c.is_control() {
            return;
        }
        if self.kind == InputKind::Number && !c.is_ascii_digit() {
            return;
        }
        self.value.push(c);
        self.error = None;
    }

    pub fn backspace(&mut self) {
        if !self.disabled {
            self.value.pop();
        }
    }

    pub fn is_disabled(&self) -> bool {
        self.disabled
    }

    pub fn set_disabled(&mut self, disabled: bool) {
        self.disabled = disabled;
    }

    /// Mark the field invalid with a short message
    pub fn show_error(&mut self, message: &str) {
        self.error = Some(message.to_string());
    }

    pub fn clear_error(&mut self) {
        self.error = None;
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Rows needed to draw the field (border box plus error line)
    pub const HEIGHT: u16 = 4;

    pub fn render(&self, frame: &mut Frame, area: Rect, focused: bool) {
        let border_color = if self.error().is_some() {
            colors::ERROR
        } else if focused && !self.disabled {
            colors::FOCUSED
        } else {
            colors::UNFOCUSED
        };

        let text_style = if self.disabled {
            Style::default().fg(colors::DISABLED)
        } else {
            Style::default()
        };

        let cursor = if focused && !self.disabled { "_" } else { "" };
        let box_area = Rect {
            height: area.height.min(3),
            ..area
        };

        let input = Paragraph::new(format!("{}{}", self.value, cursor))
            .style(text_style)
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_style(Style::default().fg(border_color))
                    .title(format!(" {} ", self.label))
                    .title_style(if focused {
                        Style::default().add_modifier(Modifier::BOLD)
                    } else {
                        Style::default()
                    }),
            );
        frame.render_widget(input, box_area);

        if let Some(error) = self.error() {
            if area.height > 3 {
                let error_area = Rect {
                    y: area.y + 3,
                    height: 1,
                    ..area
                };
                let line = Line::from(Span::styled(
                    format!(" {}", error),
                    Style::default().fg(colors::ERROR),
                ));
                frame.render_widget(Paragraph::new(line), error_area);
            }
        }
    }
}
