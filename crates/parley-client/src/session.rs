//! Chat session controller.
//!
//! Translates user actions (connect, disconnect, send) into channel
//! operations and channel events into log entries, nickname updates and
//! affordance changes. All methods run on the single session loop; nothing
//! here blocks or awaits.
//!
//! State transitions:
//!
//! ```text
//! Disconnected --connect()--> Connecting --Opened--> Open
//!      ^                          |                   |
//!      +------ Closed / disconnect() -----------------+
//! ```

use tracing::{debug, info, trace, warn};
use url::Url;

use parley_shared::constants::NICKNAME_PLACEHOLDER;
use parley_shared::protocol::InboundMessage;

use crate::activity::ActivityLog;
use crate::channel::{Channel, Connector};
use crate::display::{Affordances, DisplaySurface};
use crate::events::{ChannelEvent, ChannelEventKind, ChannelId};
use crate::state::{ChannelState, LiveChannel, Session};

pub const MSG_ALREADY_CONNECTED: &str = "Already connected.";
pub const MSG_NOT_CONNECTED: &str = "Not connected to server.";
pub const MSG_CONNECTED: &str = "Connected to server";
pub const MSG_DISCONNECTED: &str = "Connection to server closed.";

/// Result of [`ChatController::send_chat`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SendOutcome {
    /// Frame handed to the channel and input cleared.
    Sent,
    /// Nothing but whitespace; nothing sent or logged.
    Empty,
    /// No open channel; a notice was logged.
    NotConnected,
    /// The channel refused the frame; the error was logged.
    Failed,
}

pub struct ChatController<C: Connector, D: DisplaySurface> {
    endpoint: Url,
    connector: C,
    display: D,
    session: Session<C::Channel>,
    log: ActivityLog,
    next_channel: u64,
}

impl<C: Connector, D: DisplaySurface> ChatController<C, D> {
    /// Create a disconnected controller and render the initial state.
    pub fn new(endpoint: Url, connector: C, mut display: D) -> Self {
        display.set_nickname(NICKNAME_PLACEHOLDER);
        display.set_affordances(Affordances::DISCONNECTED);

        Self {
            endpoint,
            connector,
            display,
            session: Session::new(),
            log: ActivityLog::new(),
            next_channel: 1,
        }
    }

    /// Open a channel unless one is already present.
    pub fn connect(&mut self) {
        if let Some(current) = self.session.current_id() {
            debug!(channel = %current, "Connect requested while a channel is present");
            self.record(MSG_ALREADY_CONNECTED);
            return;
        }

        // A channel abandoned by disconnect() may not have reported its
        // closure yet; its nickname must not carry over.
        self.show_disconnected();

        let id = ChannelId(self.next_channel);
        self.next_channel += 1;

        info!(channel = %id, endpoint = %self.endpoint, "Opening channel");
        let handle = self.connector.open(id, &self.endpoint);
        self.session.channel = Some(LiveChannel {
            id,
            state: ChannelState::Connecting,
            handle,
        });
    }

    /// Request closure and forget the channel immediately.
    ///
    /// The channel's `Closed` event still arrives later and performs the
    /// display reset.
    pub fn disconnect(&mut self) {
        if let Some(mut live) = self.session.channel.take() {
            info!(channel = %live.id, "Closing channel");
            live.handle.close();
        }
    }

    /// Send one chat line. The payload is the trimmed text itself.
    pub fn send_chat(&mut self, text: &str) -> SendOutcome {
        if !self.session.is_open() {
            self.record(MSG_NOT_CONNECTED);
            return SendOutcome::NotConnected;
        }

        let text = text.trim();
        if text.is_empty() {
            return SendOutcome::Empty;
        }

        let sent = match self.session.channel.as_mut() {
            Some(live) => live.handle.send_text(text),
            None => return SendOutcome::NotConnected,
        };

        match sent {
            Ok(()) => {
                trace!(len = text.len(), "Chat line sent");
                self.display.clear_input();
                SendOutcome::Sent
            }
            Err(e) => {
                warn!(error = %e, "Failed to send chat line");
                self.record(format!("Error: {e}"));
                SendOutcome::Failed
            }
        }
    }

    /// React to one event from a channel.
    pub fn handle_event(&mut self, event: ChannelEvent) {
        if !self.session.accepts(event.channel) {
            if event.kind == ChannelEventKind::Closed {
                self.close_superseded(event.channel);
            } else {
                trace!(
                    channel = %event.channel,
                    kind = ?event.kind,
                    "Dropping event from superseded channel"
                );
            }
            return;
        }

        match event.kind {
            ChannelEventKind::Opened => {
                if !self.session.mark_open(event.channel) {
                    debug!(channel = %event.channel, "Channel opened after disconnect");
                    return;
                }
                info!(channel = %event.channel, "Channel open");
                self.record(MSG_CONNECTED);
                self.display.set_affordances(Affordances::CONNECTED);
            }

            ChannelEventKind::Message(raw) => {
                let message = InboundMessage::decode(&raw);
                debug!(channel = %event.channel, message = ?message, "Frame received");

                let reaction = message.reaction();
                if let Some(nickname) = reaction.nickname {
                    self.display.set_nickname(&nickname);
                    self.session.assigned_nickname = nickname;
                }
                self.record(reaction.log_line);
            }

            ChannelEventKind::Closed => {
                info!(channel = %event.channel, "Channel closed");
                self.record(MSG_DISCONNECTED);
                self.session.reset();
                self.show_disconnected();
            }

            ChannelEventKind::Error(description) => {
                warn!(channel = %event.channel, error = %description, "Channel error");
                self.record(format!("Error: {description}"));
            }
        }
    }

    /// Whether a channel is present, opening or open.
    pub fn has_channel(&self) -> bool {
        self.session.has_channel()
    }

    pub fn is_open(&self) -> bool {
        self.session.is_open()
    }

    pub fn current_channel(&self) -> Option<ChannelId> {
        self.session.current_id()
    }

    pub fn nickname(&self) -> &str {
        &self.session.assigned_nickname
    }

    pub fn log(&self) -> &ActivityLog {
        &self.log
    }

    pub fn display(&self) -> &D {
        &self.display
    }

    pub fn display_mut(&mut self) -> &mut D {
        &mut self.display
    }

    pub fn connector(&self) -> &C {
        &self.connector
    }

    /// A channel replaced after disconnect() finally closed. The newer
    /// channel keeps its reference; the display only reverts while that
    /// channel has not opened yet.
    fn close_superseded(&mut self, id: ChannelId) {
        info!(channel = %id, "Superseded channel closed");
        self.record(MSG_DISCONNECTED);
        if !self.session.is_open() {
            self.show_disconnected();
        }
    }

    fn show_disconnected(&mut self) {
        self.session.assigned_nickname = NICKNAME_PLACEHOLDER.to_string();
        self.display.set_nickname(NICKNAME_PLACEHOLDER);
        self.display.set_affordances(Affordances::DISCONNECTED);
    }

    fn record(&mut self, message: impl Into<String>) {
        let entry = self.log.append(message);
        self.display.append_log(entry);
    }
}
