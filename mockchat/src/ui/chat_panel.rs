//! Chat panel rendering (channel header + message list + input box).

use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, Paragraph},
};

use mockchat_relay::clock::Clock;
use mockchat_relay::responder::RandomSource;

use super::theme;
use crate::app::{App, LineKind, MessageLine};

/// Render the chat panel.
pub fn render<C: Clock, R: RandomSource>(frame: &mut Frame, area: Rect, app: &App<C, R>) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(4),
            Constraint::Min(3),
            Constraint::Length(3),
        ])
        .split(area);

    render_header(frame, chunks[0], app);
    render_messages(frame, chunks[1], app);
    super::render_input(frame, chunks[2], app, "Type a message...");
}

/// Render the header of the channel on screen.
fn render_header<C: Clock, R: RandomSource>(frame: &mut Frame, area: Rect, app: &App<C, R>) {
    let header = app.header();
    let lines = vec![
        Line::from(Span::styled(header.title, theme::highlighted())),
        Line::from(Span::styled(header.status, theme::dimmed())),
    ];
    let block = Block::default().borders(Borders::ALL).border_style(theme::normal());
    frame.render_widget(Paragraph::new(lines).block(block), area);
}

/// Render the thread on screen, newest at the bottom.
fn render_messages<C: Clock, R: RandomSource>(frame: &mut Frame, area: Rect, app: &App<C, R>) {
    let lines = app.current_lines();
    let visible = usize::from(area.height.saturating_sub(2));
    let skip = lines.len().saturating_sub(visible);

    let items: Vec<ListItem> = lines.iter().skip(skip).map(message_item).collect();

    let block = Block::default().borders(Borders::ALL).border_style(theme::normal());
    frame.render_widget(List::new(items).block(block), area);
}

fn message_item(line: &MessageLine) -> ListItem<'_> {
    let spans = match line.kind {
        LineKind::System => vec![
            Span::styled(&line.timestamp, theme::timestamp()),
            Span::raw(" "),
            Span::styled(format!("-- {} --", line.text), theme::system_message()),
        ],
        LineKind::Own | LineKind::Peer => {
            let color = if line.kind == LineKind::Own {
                theme::OWN_MESSAGE
            } else {
                theme::sender_color(&line.author)
            };
            vec![
                Span::styled(&line.timestamp, theme::timestamp()),
                Span::raw(" "),
                Span::styled(&line.author, theme::bold().fg(color)),
                Span::raw(": "),
                Span::styled(&line.text, theme::normal()),
            ]
        }
    };
    ListItem::new(Line::from(spans))
}
