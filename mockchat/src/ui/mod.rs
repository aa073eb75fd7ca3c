//! Terminal UI rendering.

pub mod chat_panel;
pub mod login;
pub mod sidebar;
pub mod status_bar;
pub mod theme;

use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
};

use mockchat_relay::clock::Clock;
use mockchat_relay::responder::RandomSource;

use crate::app::{App, PanelFocus};

/// Main draw function for the entire UI.
pub fn draw<C: Clock, R: RandomSource>(frame: &mut Frame, app: &App<C, R>) {
    // Create main layout with status bar at bottom
    let main_chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(3), Constraint::Length(1)])
        .split(frame.area());

    let content_area = main_chunks[0];
    let status_area = main_chunks[1];

    if app.is_joined() {
        let content_chunks = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([
                Constraint::Percentage(25), // Channels
                Constraint::Percentage(75), // Chat
            ])
            .split(content_area);

        sidebar::render(frame, content_chunks[0], app);
        chat_panel::render(frame, content_chunks[1], app);
    } else {
        login::render(frame, content_area, app);
    }

    status_bar::render(frame, status_area, app);
}

/// Render the input box with a block cursor while it has focus.
fn render_input<C: Clock, R: RandomSource>(
    frame: &mut Frame,
    area: Rect,
    app: &App<C, R>,
    placeholder: &str,
) {
    let is_focused = app.focus == PanelFocus::Input;

    let mut display_text = app.input.clone();
    if is_focused {
        let at = display_text
            .char_indices()
            .nth(app.cursor_position)
            .map_or(display_text.len(), |(index, _)| index);
        display_text.insert(at, '█');
    }

    let input_line = if display_text.is_empty() {
        Line::from(Span::styled(placeholder, theme::dimmed()))
    } else {
        Line::from(Span::styled(display_text, theme::normal()))
    };

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(if is_focused {
            theme::highlighted()
        } else {
            theme::normal()
        });

    frame.render_widget(Paragraph::new(input_line).block(block), area);
}
