//! Status bar rendering.

use ratatui::{
    Frame,
    layout::Rect,
    text::{Line, Span},
    widgets::Paragraph,
};

use mockchat_relay::clock::Clock;
use mockchat_relay::responder::RandomSource;

use super::theme;
use crate::app::{App, PanelFocus};

/// Render the status bar at the bottom of the screen.
pub fn render<C: Clock, R: RandomSource>(frame: &mut Frame, area: Rect, app: &App<C, R>) {
    let help_text = match app.focus {
        PanelFocus::Input => "Enter: send | Tab: channels | Esc: quit | /help",
        PanelFocus::Sidebar => "↑↓/jk: navigate | Enter: open | Tab: input | Esc: quit",
    };

    let identity = app
        .client()
        .session()
        .identity()
        .map_or_else(|| "-".to_string(), ToString::to_string);
    let online = app.client().roster().len();

    let status_line = Line::from(vec![
        Span::styled(concat!("MockChat v", env!("CARGO_PKG_VERSION")), theme::bold()),
        Span::raw(" | "),
        Span::raw(format!("ID: {identity}")),
        Span::raw(" | "),
        Span::styled("●", theme::normal()),
        Span::raw(format!(" {online} online")),
        Span::raw(" | "),
        Span::styled(app.notice.as_deref().unwrap_or(help_text), theme::dimmed()),
    ]);

    let paragraph = Paragraph::new(status_line).style(theme::status_bar_bg());
    frame.render_widget(paragraph, area);
}
