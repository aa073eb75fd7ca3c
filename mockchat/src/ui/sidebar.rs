//! Sidebar rendering for the channel list.

use ratatui::{
    Frame,
    layout::Rect,
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem},
};

use mockchat_proto::ChannelRef;
use mockchat_relay::clock::Clock;
use mockchat_relay::responder::RandomSource;

use super::theme;
use crate::app::{App, PanelFocus};

/// Render the sidebar: `global` first, then every direct channel.
pub fn render<C: Clock, R: RandomSource>(frame: &mut Frame, area: Rect, app: &App<C, R>) {
    let is_focused = app.focus == PanelFocus::Sidebar;
    let current = app.client().session().current_channel();

    let channels = app.channels();

    let items: Vec<ListItem> = channels
        .iter()
        .enumerate()
        .map(|(idx, channel)| {
            let is_selected = idx == app.selected_channel;

            let mut spans = match channel {
                ChannelRef::Global => vec![Span::raw("# global")],
                ChannelRef::Direct(peer) => vec![
                    Span::styled("● ", theme::normal()),
                    Span::raw(peer.as_str()),
                ],
            };

            let unread = app.unread_count(channel);
            if unread > 0 {
                spans.push(Span::raw(" "));
                spans.push(Span::styled(
                    format!("({unread})"),
                    theme::normal().fg(theme::WARNING),
                ));
            }

            let style = if is_selected && is_focused {
                theme::selected()
            } else if channel == current {
                theme::highlighted()
            } else {
                theme::normal()
            };

            ListItem::new(Line::from(spans)).style(style)
        })
        .collect();

    let block = Block::default()
        .title("NETWORK")
        .borders(Borders::ALL)
        .border_style(if is_focused {
            theme::highlighted()
        } else {
            theme::normal()
        });

    frame.render_widget(List::new(items).block(block), area);
}
