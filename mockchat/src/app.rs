//! Application state and event handling.
//!
//! [`App`] owns the [`ChatClient`] and everything the terminal UI draws:
//! the input line, panel focus, sidebar selection and unread counters.
//! Rendering lives in [`crate::ui`].

use std::collections::HashMap;
use std::fmt;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use mockchat_proto::{ChannelRef, Identity, StoredMessage, ValidationError};
use mockchat_relay::clock::Clock;
use mockchat_relay::responder::RandomSource;

use crate::chat::{ChatClient, ChatError, ChatView};

/// Shown when the login form is submitted without an identity.
pub const LOGIN_ERROR: &str = "ERR: IDENTITY_REQUIRED";

/// Shown when the login form is submitted with a reserved name.
pub const RESERVED_ERROR: &str = "ERR: IDENTITY_RESERVED";

/// Shown when a chat command is typed at the login prompt.
pub const LOGIN_REQUIRED: &str = "ERR: LOGIN_REQUIRED";

/// Title and subtitle of the channel on screen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChannelHeader {
    /// Main heading.
    pub title: String,
    /// Subtitle describing the channel kind.
    pub status: &'static str,
}

impl ChannelHeader {
    /// Header for `channel`.
    #[must_use]
    pub fn for_channel(channel: &ChannelRef) -> Self {
        match channel {
            ChannelRef::Global => Self {
                title: "GLOBAL_NET".to_string(),
                status: "PUBLIC BROADCAST",
            },
            ChannelRef::Direct(peer) => Self {
                title: format!("LINK: {}", peer.as_str().to_uppercase()),
                status: "ENCRYPTED P2P CHANNEL",
            },
        }
    }
}

/// Who a rendered line belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineKind {
    /// Sent by the local user.
    Own,
    /// Sent by a remote participant.
    Peer,
    /// Relay announcement.
    System,
}

/// A message formatted for display.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessageLine {
    /// `YOU` for own messages, the sender otherwise.
    pub author: String,
    /// Timestamp as stamped by the relay.
    pub timestamp: String,
    /// Message body.
    pub text: String,
    /// Styling hint.
    pub kind: LineKind,
}

impl MessageLine {
    /// Format `stored` from the point of view of `local`.
    #[must_use]
    pub fn new(stored: &StoredMessage, local: Option<&Identity>) -> Self {
        let message = &stored.message;
        let kind = if message.is_system() {
            LineKind::System
        } else if local == Some(&message.sender) {
            LineKind::Own
        } else {
            LineKind::Peer
        };
        let author = match kind {
            LineKind::Own => "YOU".to_string(),
            LineKind::Peer | LineKind::System => message.sender.to_string(),
        };
        Self {
            author,
            timestamp: message.timestamp.clone(),
            text: message.text.clone(),
            kind,
        }
    }
}

impl fmt::Display for MessageLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            LineKind::System => write!(f, "[{}] -- {} --", self.timestamp, self.text),
            LineKind::Own | LineKind::Peer => {
                write!(f, "[{}] {}: {}", self.timestamp, self.author, self.text)
            }
        }
    }
}

/// A line of user input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Send text to the current channel.
    Say(String),
    /// Put a channel on screen.
    Switch(ChannelRef),
    /// Show the roster.
    Who,
    /// Show the available commands.
    Help,
    /// End the session.
    Logout,
    /// Exit the program.
    Quit,
}

/// Errors parsing a slash command.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CommandError {
    /// The command is not recognised.
    #[error("unknown command: /{0}")]
    Unknown(String),

    /// `/dm` was given no peer.
    #[error("usage: /dm <peer>")]
    MissingPeer,

    /// `/dm` was given a name that cannot be a peer.
    #[error("invalid peer: {0}")]
    InvalidPeer(ValidationError),
}

impl From<ValidationError> for CommandError {
    fn from(err: ValidationError) -> Self {
        match err {
            ValidationError::IdentityRequired => Self::MissingPeer,
            other => Self::InvalidPeer(other),
        }
    }
}

/// One-line summary of the slash commands.
pub const HELP: &str = "/dm <peer> | /global | /who | /logout | /quit";

impl Command {
    /// Parse one input line. Anything not starting with `/` is chat text.
    ///
    /// # Errors
    ///
    /// Returns [`CommandError`] for unknown commands or a `/dm` without a
    /// peer.
    pub fn parse(line: &str) -> Result<Self, CommandError> {
        let Some(rest) = line.trim_start().strip_prefix('/') else {
            return Ok(Self::Say(line.to_string()));
        };
        let (name, arg) = rest.split_once(char::is_whitespace).unwrap_or((rest, ""));
        match name {
            "dm" => Ok(Self::Switch(ChannelRef::parse(arg)?)),
            "global" => Ok(Self::Switch(ChannelRef::Global)),
            "who" => Ok(Self::Who),
            "help" => Ok(Self::Help),
            "logout" => Ok(Self::Logout),
            "quit" | "exit" => Ok(Self::Quit),
            other => Err(CommandError::Unknown(other.to_string())),
        }
    }
}

/// Something a [`RenderQueue`] was told about.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ViewEvent {
    /// New roster snapshot.
    Roster(Vec<Identity>),
    /// New archived message.
    Message(StoredMessage),
}

/// A [`ChatView`] that buffers notifications until the front end is ready
/// to draw them.
#[derive(Debug, Default)]
pub struct RenderQueue {
    events: Vec<ViewEvent>,
}

impl RenderQueue {
    /// Take everything buffered so far.
    pub fn take(&mut self) -> Vec<ViewEvent> {
        std::mem::take(&mut self.events)
    }

    /// Buffered events, oldest first.
    #[must_use]
    pub fn events(&self) -> &[ViewEvent] {
        &self.events
    }

    /// Buffered messages, oldest first.
    pub fn messages(&self) -> impl Iterator<Item = &StoredMessage> {
        self.events.iter().filter_map(|event| match event {
            ViewEvent::Message(stored) => Some(stored),
            ViewEvent::Roster(_) => None,
        })
    }
}

impl ChatView for RenderQueue {
    fn on_roster_changed(&mut self, roster: &[Identity]) {
        self.events.push(ViewEvent::Roster(roster.to_vec()));
    }

    fn on_message(&mut self, message: &StoredMessage) {
        self.events.push(ViewEvent::Message(message.clone()));
    }
}

/// Comma-separated roster, or a placeholder when nobody else is around.
#[must_use]
pub fn roster_summary(roster: &[Identity]) -> String {
    if roster.is_empty() {
        return "(no one else)".to_string();
    }
    roster
        .iter()
        .map(Identity::as_str)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Which panel is currently focused.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PanelFocus {
    /// Input box is focused (default).
    Input,
    /// Channel list is focused.
    Sidebar,
}

/// Main application state.
pub struct App<C, R> {
    client: ChatClient<C, R>,
    view: RenderQueue,
    /// Current text input.
    pub input: String,
    /// Cursor position in input (character index).
    pub cursor_position: usize,
    /// Which panel is focused.
    pub focus: PanelFocus,
    /// Index into [`App::channels`] highlighted in the sidebar.
    pub selected_channel: usize,
    /// Messages received per thread while another channel was on screen.
    pub unread: HashMap<ChannelRef, usize>,
    /// Direct threads not backed by a roster entry, in first-seen order.
    threads: Vec<ChannelRef>,
    /// Error shown under the login prompt.
    pub login_error: Option<&'static str>,
    /// One-line feedback shown in the status bar.
    pub notice: Option<String>,
    /// Whether the app should quit.
    pub should_quit: bool,
}

impl<C: Clock, R: RandomSource> App<C, R> {
    /// Wrap `client`; nobody is logged in yet.
    pub fn new(client: ChatClient<C, R>) -> Self {
        Self {
            client,
            view: RenderQueue::default(),
            input: String::new(),
            cursor_position: 0,
            focus: PanelFocus::Input,
            selected_channel: 0,
            unread: HashMap::new(),
            threads: Vec::new(),
            login_error: None,
            notice: None,
            should_quit: false,
        }
    }

    /// The underlying chat client.
    pub const fn client(&self) -> &ChatClient<C, R> {
        &self.client
    }

    /// Whether the login prompt has been passed.
    pub const fn is_joined(&self) -> bool {
        self.client.session().is_joined()
    }

    /// Channels listed in the sidebar: `global`, then the roster, then any
    /// other direct thread that has been opened or has received messages.
    pub fn channels(&self) -> Vec<ChannelRef> {
        let mut channels = vec![ChannelRef::Global];
        channels.extend(self.client.roster().iter().cloned().map(ChannelRef::Direct));
        for thread in &self.threads {
            if !channels.contains(thread) {
                channels.push(thread.clone());
            }
        }
        channels
    }

    /// Header of the channel on screen.
    pub fn header(&self) -> ChannelHeader {
        ChannelHeader::for_channel(self.client.session().current_channel())
    }

    /// The thread on screen, formatted for display.
    pub fn current_lines(&self) -> Vec<MessageLine> {
        let local = self.client.session().identity();
        self.client
            .current_messages()
            .into_iter()
            .map(|stored| MessageLine::new(stored, local))
            .collect()
    }

    /// Unread count for `channel`.
    pub fn unread_count(&self, channel: &ChannelRef) -> usize {
        self.unread.get(channel).copied().unwrap_or(0)
    }

    /// Let the simulation catch up with the clock and fold whatever arrived
    /// into the UI state.
    pub fn tick(&mut self) {
        if let Err(e) = self.client.pump(&mut self.view) {
            tracing::warn!(error = %e, "relay dispatch failed");
            self.notice = Some(e.to_string());
        }

        let current = self.client.session().current_channel().clone();
        for event in self.view.take() {
            match event {
                ViewEvent::Roster(roster) => {
                    tracing::debug!(peers = roster.len(), "roster redrawn");
                }
                ViewEvent::Message(stored) => {
                    let channel = stored.storage_channel;
                    self.remember(&channel);
                    if channel != current {
                        *self.unread.entry(channel).or_insert(0) += 1;
                    }
                }
            }
        }
        self.sync_selection();
    }

    /// Handle a key event.
    pub fn handle_key_event(&mut self, key: KeyEvent) {
        // Global shortcuts
        match (key.code, key.modifiers) {
            (KeyCode::Char('c'), KeyModifiers::CONTROL) | (KeyCode::Esc, _) => {
                self.should_quit = true;
                return;
            }
            (KeyCode::Tab | KeyCode::BackTab, _) => {
                self.toggle_focus();
                return;
            }
            _ => {}
        }

        match self.focus {
            PanelFocus::Input => self.handle_input_key(key),
            PanelFocus::Sidebar => self.handle_sidebar_key(key),
        }
    }

    /// Act on one submitted line of input.
    ///
    /// Before joining, the line is the identity to join with; only `/quit`
    /// and `/help` are understood at the login prompt. Afterwards it is
    /// either a slash command or text for the channel on screen.
    pub fn submit_line(&mut self, line: &str) {
        if self.is_joined() {
            self.run_command(line);
        } else {
            self.login(line);
        }
    }

    /// Join as `name`, reporting failures under the login prompt.
    pub fn join(&mut self, name: &str) {
        match self.client.join(name) {
            Ok(identity) => {
                tracing::debug!(identity = %identity, "login accepted");
                self.login_error = None;
                self.notice = None;
                self.focus = PanelFocus::Input;
                self.sync_selection();
            }
            Err(ChatError::Validation(ValidationError::ReservedIdentity)) => {
                self.login_error = Some(RESERVED_ERROR);
            }
            Err(e) => {
                tracing::debug!(error = %e, "login rejected");
                self.login_error = Some(LOGIN_ERROR);
            }
        }
    }

    /// Put `channel` on screen.
    pub fn open(&mut self, channel: ChannelRef) {
        self.unread.remove(&channel);
        self.remember(&channel);
        let shown = self.client.switch_channel(channel).len();
        tracing::trace!(shown, "channel opened");
        self.sync_selection();
    }

    fn login(&mut self, line: &str) {
        match Command::parse(line) {
            Ok(Command::Say(name)) => self.join(&name),
            Ok(Command::Quit) => self.should_quit = true,
            Ok(Command::Help) => self.notice = Some(HELP.to_string()),
            _ => self.login_error = Some(LOGIN_REQUIRED),
        }
    }

    fn run_command(&mut self, line: &str) {
        let command = match Command::parse(line) {
            Ok(command) => command,
            Err(e) => {
                self.notice = Some(e.to_string());
                return;
            }
        };

        match command {
            Command::Say(text) => match self.client.send_current(&text) {
                Ok(()) => self.notice = None,
                Err(ChatError::Validation(ValidationError::EmptyMessage)) => {
                    tracing::debug!("blank message dropped");
                }
                Err(e) => self.notice = Some(e.to_string()),
            },
            Command::Switch(channel) => self.open(channel),
            Command::Who => {
                self.notice = Some(format!("online: {}", roster_summary(self.client.roster())));
            }
            Command::Help => self.notice = Some(HELP.to_string()),
            Command::Logout => self.logout(),
            Command::Quit => self.should_quit = true,
        }
    }

    fn logout(&mut self) {
        self.client.logout();
        self.view.take();
        self.unread.clear();
        self.threads.clear();
        self.focus = PanelFocus::Input;
        self.selected_channel = 0;
        self.login_error = None;
        self.notice = None;
    }

    fn remember(&mut self, channel: &ChannelRef) {
        if !channel.is_global() && !self.threads.contains(channel) {
            self.threads.push(channel.clone());
        }
    }

    fn sync_selection(&mut self) {
        let current = self.client.session().current_channel();
        if let Some(index) = self.channels().iter().position(|c| c == current) {
            self.selected_channel = index;
        }
    }

    fn toggle_focus(&mut self) {
        if !self.is_joined() {
            return;
        }
        self.focus = match self.focus {
            PanelFocus::Input => PanelFocus::Sidebar,
            PanelFocus::Sidebar => PanelFocus::Input,
        };
    }

    /// Handle key event when input is focused.
    fn handle_input_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Enter => {
                let line = std::mem::take(&mut self.input);
                self.cursor_position = 0;
                self.submit_line(&line);
            }
            KeyCode::Char(c) => self.enter_char(c),
            KeyCode::Backspace => self.delete_char(),
            KeyCode::Left => self.cursor_position = self.cursor_position.saturating_sub(1),
            KeyCode::Right => {
                if self.cursor_position < self.input.chars().count() {
                    self.cursor_position += 1;
                }
            }
            KeyCode::Home => self.cursor_position = 0,
            KeyCode::End => self.cursor_position = self.input.chars().count(),
            _ => {}
        }
    }

    /// Handle key event when the sidebar is focused.
    fn handle_sidebar_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Up | KeyCode::Char('k') => {
                self.selected_channel = self.selected_channel.saturating_sub(1);
            }
            KeyCode::Down | KeyCode::Char('j') => {
                if self.selected_channel + 1 < self.channels().len() {
                    self.selected_channel += 1;
                }
            }
            KeyCode::Enter => {
                if let Some(channel) = self.channels().get(self.selected_channel).cloned() {
                    self.open(channel);
                    self.focus = PanelFocus::Input;
                }
            }
            _ => {}
        }
    }

    /// Insert a character at the cursor position.
    fn enter_char(&mut self, c: char) {
        let at = self.byte_index(self.cursor_position);
        self.input.insert(at, c);
        self.cursor_position += 1;
    }

    /// Delete the character before the cursor.
    fn delete_char(&mut self) {
        if self.cursor_position > 0 {
            self.cursor_position -= 1;
            let at = self.byte_index(self.cursor_position);
            self.input.remove(at);
        }
    }

    fn byte_index(&self, chars: usize) -> usize {
        self.input
            .char_indices()
            .nth(chars)
            .map_or(self.input.len(), |(index, _)| index)
    }
}
