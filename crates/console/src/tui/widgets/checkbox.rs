//! Checkbox

use ratatui::{style::Style, text::Span};

use super::colors;

/// Two-state checkbox
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Checkbox {
    checked: bool,
}

impl Checkbox {
    pub fn is_checked(&self) -> bool {
        self.checked
    }

    pub fn set_checked(&mut self, checked: bool) {
        self.checked = checked;
    }

    pub fn toggle(&mut self) {
        self.checked = !self.checked;
    }

    pub fn symbol(&self) -> &'static str {
        if self.checked { "[x]" } else { "[ ]" }
    }

    pub fn span(&self) -> Span<'static> {
        let style = if self.checked {
            Style::default().fg(colors::CHECKED)
        } else {
            Style::default()
        };
        Span::styled(self.symbol(), style)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_toggle() {
        let mut checkbox = Checkbox::default();
        assert_eq!(checkbox.symbol(), "[ ]");
        checkbox.toggle();
        assert!(checkbox.is_checked());
        assert_eq!(checkbox.symbol(), "[x]");
    }
}
