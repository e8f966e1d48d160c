//! TUI rendering with ratatui
//!
//! Renders the terminal user interface using ratatui widgets and layouts.

use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span, Text},
    widgets::{Block, Borders, Clear, List, ListItem, ListState, Paragraph, Wrap},
};

use super::app::{ActivePane, App, InputMode};
use super::dialogs::centered_rect;

/// Colors used in the UI chrome
mod colors {
    use ratatui::style::Color;

    pub const ACTIVE_BORDER: Color = Color::Cyan;
    pub const INACTIVE_BORDER: Color = Color::Gray;

    pub const HIGHLIGHT_BG: Color = Color::DarkGray;
    pub const STATUS_BAR_BG: Color = Color::Blue;
    pub const HELP_BAR_BG: Color = Color::DarkGray;
}

/// Render the complete UI
pub fn render(frame: &mut Frame, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Status bar
            Constraint::Min(10),   // Main content (two panes)
            Constraint::Length(1), // Help bar
        ])
        .split(frame.area());

    render_status_bar(frame, app, chunks[0]);
    render_main_content(frame, app, chunks[1]);
    render_help_bar(frame, app, chunks[2]);

    // Render overlays based on input mode
    match &app.input_mode {
        InputMode::AddServer(dialog) => dialog.render(frame, app.tick),
        InputMode::SendMessage(dialog) => dialog.render(frame, app.tick),
        InputMode::KillUsers(dialog) => dialog.render(frame, app.tick),
        InputMode::Help => render_help_overlay(frame),
        InputMode::ConfirmQuit => render_quit_dialog(frame),
        InputMode::Normal => {}
    }
}

/// Render the top status bar
fn render_status_bar(frame: &mut Frame, app: &App, area: Rect) {
    let bound = app
        .user_list
        .server()
        .map(|server| format!("{}:{}", server.address(), server.port()))
        .unwrap_or_else(|| "none".to_string());

    let status_text = format!(
        " Servers: {} | Bound: {} | Users: {} ({} selected)",
        app.servers.len(),
        bound,
        app.user_list.rows().len(),
        app.user_list.checked_count()
    );

    let status_message = app
        .status_message
        .as_ref()
        .map(|m| format!(" | {}", m))
        .unwrap_or_default();

    let paragraph = Paragraph::new(Line::from(vec![
        Span::styled(status_text, Style::default().fg(Color::White)),
        Span::styled(status_message, Style::default().fg(Color::Yellow)),
    ]))
    .style(Style::default().bg(colors::STATUS_BAR_BG))
    .block(
        Block::default()
            .borders(Borders::ALL)
            .title(" Monitor Console ")
            .title_style(Style::default().add_modifier(Modifier::BOLD)),
    );

    frame.render_widget(paragraph, area);
}

/// Render the server pane and the user pane side by side
fn render_main_content(frame: &mut Frame, app: &App, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage(25), // Server list
            Constraint::Percentage(75), // User list
        ])
        .split(area);

    render_server_list(frame, app, chunks[0]);
    app.user_list
        .render(frame, chunks[1], app.active_pane == ActivePane::Users);
}

/// Render the server list pane
fn render_server_list(frame: &mut Frame, app: &App, area: Rect) {
    let is_active = app.active_pane == ActivePane::Servers;
    let border_color = if is_active {
        colors::ACTIVE_BORDER
    } else {
        colors::INACTIVE_BORDER
    };

    let bound = app.user_list.server();
    let items: Vec<ListItem> = app
        .servers
        .iter()
        .map(|entry| {
            let is_bound = bound.is_some_and(|server| {
                server.address() == entry.address && server.port() == entry.port
            });
            let (icon, icon_color) = if is_bound {
                ("[*]", Color::Green)
            } else {
                ("[ ]", Color::DarkGray)
            };

            ListItem::new(Line::from(vec![
                Span::styled(format!("{} ", icon), Style::default().fg(icon_color)),
                Span::raw(entry.name.clone()),
                Span::styled(
                    format!(" {}:{}", entry.address, entry.port),
                    Style::default().fg(Color::DarkGray),
                ),
            ]))
        })
        .collect();

    let title = if is_active {
        " Servers (active) "
    } else {
        " Servers "
    };

    let list = List::new(items)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(border_color))
                .title(title)
                .title_style(if is_active {
                    Style::default()
                        .fg(colors::ACTIVE_BORDER)
                        .add_modifier(Modifier::BOLD)
                } else {
                    Style::default()
                }),
        )
        .highlight_style(
            Style::default()
                .bg(colors::HIGHLIGHT_BG)
                .add_modifier(Modifier::BOLD),
        )
        .highlight_symbol("> ");

    let mut state = ListState::default();
    if !app.servers.is_empty() {
        state.select(Some(app.selected_server));
    }

    frame.render_stateful_widget(list, area, &mut state);
}

/// Render the bottom help bar
fn render_help_bar(frame: &mut Frame, app: &App, area: Rect) {
    let help_text = match &app.input_mode {
        InputMode::Normal => {
            if app.active_pane == ActivePane::Servers {
                "Tab: Switch | j/k: Navigate | Enter: Open | a: Add | r: Refresh | q: Quit | ?: Help"
            } else {
                "Tab: Switch | j/k: Navigate | Space: Select | A: All | m: Message | x: Disconnect | r: Refresh | ?: Help"
            }
        }
        InputMode::AddServer(dialog) if dialog.is_blocked() => "Validating server...",
        InputMode::AddServer(_) | InputMode::SendMessage(_) | InputMode::KillUsers(_) => {
            "Tab: Next field | Enter: Confirm | Esc: Cancel"
        }
        InputMode::Help => "Press Esc or ? to close",
        InputMode::ConfirmQuit => "y: Quit | n: Cancel",
    };

    let paragraph = Paragraph::new(help_text)
        .style(Style::default().fg(Color::White).bg(colors::HELP_BAR_BG))
        .alignment(Alignment::Center);

    frame.render_widget(paragraph, area);
}

/// Render the help overlay
fn render_help_overlay(frame: &mut Frame) {
    let area = centered_rect(70, 70, frame.area());

    frame.render_widget(Clear, area);

    let heading = Style::default().add_modifier(Modifier::BOLD);
    let help_text = Text::from(vec![
        Line::from(Span::styled(
            "Keyboard Shortcuts",
            Style::default()
                .add_modifier(Modifier::BOLD)
                .add_modifier(Modifier::UNDERLINED),
        )),
        Line::from(""),
        Line::from(Span::styled("Navigation", heading)),
        Line::from("  Tab          Switch between server and user pane"),
        Line::from("  Up / k       Move selection up"),
        Line::from("  Down / j     Move selection down"),
        Line::from(""),
        Line::from(Span::styled("Servers", heading)),
        Line::from("  Enter        Show users of the selected server"),
        Line::from("  a            Add a new server"),
        Line::from("  r            Refresh the user list"),
        Line::from(""),
        Line::from(Span::styled("Users", heading)),
        Line::from("  Space/Enter  Check or uncheck the user under the cursor"),
        Line::from("  A            Check or uncheck all users"),
        Line::from("  m            Send a message to checked users"),
        Line::from("  x            Disconnect checked users"),
        Line::from(""),
        Line::from(Span::styled("General", heading)),
        Line::from("  ?            Show this help"),
        Line::from("  q            Quit (with confirmation)"),
        Line::from("  Ctrl+C       Quit immediately"),
    ]);

    let paragraph = Paragraph::new(help_text)
        .block(
            Block::default()
                .title(" Help ")
                .title_style(Style::default().add_modifier(Modifier::BOLD))
                .borders(Borders::ALL)
                .border_style(Style::default().fg(colors::ACTIVE_BORDER)),
        )
        .wrap(Wrap { trim: false })
        .alignment(Alignment::Left);

    frame.render_widget(paragraph, area);
}

/// Render the quit confirmation dialog
fn render_quit_dialog(frame: &mut Frame) {
    let area = centered_rect(40, 15, frame.area());

    frame.render_widget(Clear, area);

    let text = Text::from(vec![
        Line::from(""),
        Line::from(Span::styled(
            "Are you sure you want to quit?",
            Style::default().add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        Line::from(vec![
            Span::styled("  [Y]es  ", Style::default().fg(Color::Green)),
            Span::styled("  [N]o  ", Style::default().fg(Color::Red)),
        ]),
    ]);

    let paragraph = Paragraph::new(text)
        .block(
            Block::default()
                .title(" Quit ")
                .title_style(Style::default().add_modifier(Modifier::BOLD))
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Yellow)),
        )
        .alignment(Alignment::Center);

    frame.render_widget(paragraph, area);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{ConsoleConfig, ServerSettings};
    use crate::tui::app::AppAction;
    use common::test_utils::create_mock_user_list;
    use monitor::SimulatedClient;
    use ratatui::{Terminal, backend::TestBackend, buffer::Buffer};

    fn buffer_text(buffer: &Buffer) -> String {
        buffer
            .content()
            .iter()
            .map(|cell| cell.symbol())
            .collect::<String>()
    }

    fn draw(app: &App) -> String {
        let mut terminal = Terminal::new(TestBackend::new(240, 40)).unwrap();
        terminal.draw(|f| render(f, app)).unwrap();
        buffer_text(terminal.backend().buffer())
    }

    fn app() -> App {
        let mut settings = ConsoleConfig::default();
        settings.add_server(ServerSettings {
            name: "prod".to_string(),
            address: "10.0.0.1".to_string(),
            port: 1234,
        });
        App::new(settings, &SimulatedClient::demo())
    }

    #[test]
    fn test_render_main_screen() {
        let mut app = app();
        let AppAction::FetchUsers(request) = app.handle_enter() else {
            panic!("Expected a fetch");
        };
        app.user_list
            .apply_users(request.generation, create_mock_user_list(2));

        let screen = draw(&app);
        assert!(screen.contains("Monitor Console"));
        assert!(screen.contains("prod"));
        assert!(screen.contains("user2"));
    }

    #[test]
    fn test_render_overlays() {
        let mut app = app();

        app.start_add_server();
        assert!(draw(&app).contains("Add New Server"));

        app.show_help();
        assert!(draw(&app).contains("Keyboard Shortcuts"));

        app.show_quit_confirm();
        assert!(draw(&app).contains("Are you sure you want to quit?"));
    }

    #[test]
    fn test_render_tiny_terminal_does_not_panic() {
        let mut app = app();
        app.start_add_server();
        let mut terminal = Terminal::new(TestBackend::new(20, 6)).unwrap();
        terminal.draw(|f| render(f, &app)).unwrap();
    }
}
