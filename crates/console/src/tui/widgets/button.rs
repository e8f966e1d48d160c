//! Push button

use ratatui::{
    style::{Modifier, Style},
    text::Span,
};

use super::colors;

/// A labelled button that can be disabled
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Button {
    label: String,
    disabled: bool,
}

impl Button {
    pub fn new(label: &str) -> Self {
        Self {
            label: label.to_string(),
            disabled: false,
        }
    }

    pub fn is_disabled(&self) -> bool {
        self.disabled
    }

    pub fn set_disabled(&mut self, disabled: bool) {
        self.disabled = disabled;
    }

    /// Styled span for inline layouts
    pub fn span(&self, focused: bool) -> Span<'static> {
        let style = if self.disabled {
            Style::default().fg(colors::DISABLED)
        } else if focused {
            Style::default()
                .fg(colors::FOCUSED)
                .add_modifier(Modifier::BOLD | Modifier::REVERSED)
        } else {
            Style::default().add_modifier(Modifier::BOLD)
        };

        Span::styled(format!("[ {} ]", self.label), style)
    }
}
