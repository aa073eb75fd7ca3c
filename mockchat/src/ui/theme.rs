//! Theme and styling constants for the TUI.
//!
//! A green-phosphor terminal palette.

use ratatui::style::{Color, Modifier, Style};

/// Main phosphor foreground.
pub const PHOSPHOR: Color = Color::Green;

/// Dimmed phosphor for metadata.
pub const PHOSPHOR_DIM: Color = Color::Rgb(60, 140, 60);

/// Highlight color for focused elements.
pub const HIGHLIGHT: Color = Color::LightGreen;

/// Unread badge color.
pub const WARNING: Color = Color::Yellow;

/// Login error color.
pub const ERROR: Color = Color::Red;

/// Color for the local user's messages.
pub const OWN_MESSAGE: Color = Color::LightCyan;

/// Colors for remote sender names.
pub const SENDER_COLORS: [Color; 6] = [
    Color::Green,
    Color::LightGreen,
    Color::Cyan,
    Color::LightYellow,
    Color::LightMagenta,
    Color::Rgb(180, 255, 120),
];

/// Normal text style.
#[must_use]
pub fn normal() -> Style {
    Style::default().fg(PHOSPHOR)
}

/// Dimmed text style (subtitles, hints).
#[must_use]
pub fn dimmed() -> Style {
    Style::default().fg(PHOSPHOR_DIM)
}

/// Bold text style.
#[must_use]
pub fn bold() -> Style {
    Style::default().fg(PHOSPHOR).add_modifier(Modifier::BOLD)
}

/// Highlighted text style (focused panel borders, headers).
#[must_use]
pub fn highlighted() -> Style {
    Style::default().fg(HIGHLIGHT).add_modifier(Modifier::BOLD)
}

/// Selected item style (in lists).
#[must_use]
pub fn selected() -> Style {
    Style::default()
        .fg(Color::Black)
        .bg(PHOSPHOR)
        .add_modifier(Modifier::BOLD)
}

/// Get a color for a sender based on their name.
#[must_use]
pub fn sender_color(name: &str) -> Color {
    let hash = name.bytes().fold(0u32, |acc, b| {
        acc.wrapping_mul(31).wrapping_add(u32::from(b))
    });
    SENDER_COLORS[(hash as usize) % SENDER_COLORS.len()]
}

/// Style for system announcements (italic, gray).
#[must_use]
pub fn system_message() -> Style {
    Style::default()
        .fg(Color::Gray)
        .add_modifier(Modifier::ITALIC)
}

/// Style for timestamps.
#[must_use]
pub fn timestamp() -> Style {
    Style::default().fg(Color::DarkGray)
}

/// Style for the status bar background.
#[must_use]
pub fn status_bar_bg() -> Style {
    Style::default().fg(PHOSPHOR).bg(Color::Rgb(10, 30, 10))
}
