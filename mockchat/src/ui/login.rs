//! Login screen rendering.

use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
};

use mockchat_relay::clock::Clock;
use mockchat_relay::responder::RandomSource;

use super::theme;
use crate::app::App;

/// Render the identity prompt centred on screen.
pub fn render<C: Clock, R: RandomSource>(frame: &mut Frame, area: Rect, app: &App<C, R>) {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(0),
            Constraint::Length(9),
            Constraint::Min(0),
        ])
        .split(area);
    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Min(0),
            Constraint::Length(48),
            Constraint::Min(0),
        ])
        .split(rows[1]);
    let form = columns[1];

    let block = Block::default()
        .title("MOCKCHAT // NEURAL NET")
        .borders(Borders::ALL)
        .border_style(theme::highlighted());
    let inner = block.inner(form);
    frame.render_widget(block, form);

    let parts = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Length(3),
            Constraint::Length(1),
            Constraint::Length(1),
        ])
        .split(inner);

    frame.render_widget(Paragraph::new(Span::styled("ENTER IDENTITY:", theme::bold())), parts[0]);
    super::render_input(frame, parts[1], app, "");

    if let Some(error) = app.login_error {
        let line = Line::from(Span::styled(error, theme::bold().fg(theme::ERROR)));
        frame.render_widget(Paragraph::new(line), parts[2]);
    }
    let hint = app.notice.as_deref().unwrap_or("Enter: connect | /quit: exit");
    frame.render_widget(Paragraph::new(Span::styled(hint, theme::dimmed())), parts[3]);
}
