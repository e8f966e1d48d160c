//! Form widgets shared by the dialogs and the user list
//!
//! Each widget keeps its own state (value, enabled flag, error highlight)
//! and knows how to draw itself into a `Rect`. None of them handle keys on
//! their own; the owning dialog routes input to the focused widget.

pub mod button;
pub mod checkbox;
pub mod progress;
pub mod text_input;
pub mod warning;

pub use button::Button;
pub use checkbox::Checkbox;
pub use progress::LinearProgress;
pub use text_input::{InputKind, TextInput};
pub use warning::Warning;

/// Colors used by the widgets
pub mod colors {
    use ratatui::style::Color;

    pub const FOCUSED: Color = Color::Cyan;
    pub const UNFOCUSED: Color = Color::DarkGray;
    pub const DISABLED: Color = Color::DarkGray;
    pub const ERROR: Color = Color::Red;
    pub const WARNING_BG: Color = Color::Red;
    pub const PROGRESS: Color = Color::Cyan;
    pub const CHECKED: Color = Color::Green;
}
