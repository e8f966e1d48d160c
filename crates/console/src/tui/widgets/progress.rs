//! Indeterminate linear progress bar

use ratatui::{Frame, layout::Rect, style::Style, text::Span, widgets::Paragraph};

use super::colors;

/// Width of the moving segment, in cells
const SEGMENT: usize = 6;

/// Progress indicator that is either hidden or sweeping
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LinearProgress {
    visible: bool,
}

impl LinearProgress {
    pub fn is_visible(&self) -> bool {
        self.visible
    }

    pub fn set_visible(&mut self, visible: bool) {
        self.visible = visible;
    }

    /// Bar contents for a given width and animation tick
    pub fn bar(width: usize, tick: u64) -> String {
        if width == 0 {
            return String::new();
        }
        let span = width + SEGMENT;
        let head = (tick as usize) % span;
        (0..width)
            .map(|i| {
                if i + SEGMENT > head && i <= head {
                    '█'
                } else {
                    '░'
                }
            })
            .collect()
    }

    pub fn render(&self, frame: &mut Frame, area: Rect, tick: u64) {
        if !self.is_visible() {
            return;
        }
        let bar = Self::bar(area.width as usize, tick);
        frame.render_widget(
            Paragraph::new(Span::styled(bar, Style::default().fg(colors::PROGRESS))),
            area,
        );
    }
}
