//! Session state owned by the chat controller.
//!
//! The [`Session`] replaces free-floating globals: it holds the single
//! channel handle and the nickname the server assigned. It is only ever
//! touched from the session event loop, so it needs no locking.

use parley_shared::constants::NICKNAME_PLACEHOLDER;

use crate::events::ChannelId;

/// Where a live channel is in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChannelState {
    /// Open requested, `Opened` not yet received.
    Connecting,
    /// Frames may be sent.
    Open,
}

/// A channel handle together with its identity and lifecycle.
#[derive(Debug)]
pub struct LiveChannel<C> {
    pub id: ChannelId,
    pub state: ChannelState,
    pub handle: C,
}

/// Central session state.
#[derive(Debug)]
pub struct Session<C> {
    /// The single channel, if any. `None` means Disconnected.
    pub channel: Option<LiveChannel<C>>,

    /// Nickname assigned by the server's welcome frame, or the placeholder.
    pub assigned_nickname: String,
}

impl<C> Session<C> {
    /// Create a disconnected session.
    pub fn new() -> Self {
        Self {
            channel: None,
            assigned_nickname: NICKNAME_PLACEHOLDER.to_string(),
        }
    }

    /// Whether a channel is present, opening or open.
    pub fn has_channel(&self) -> bool {
        self.channel.is_some()
    }

    /// Whether a channel is present and open for sending.
    pub fn is_open(&self) -> bool {
        matches!(
            self.channel,
            Some(LiveChannel {
                state: ChannelState::Open,
                ..
            })
        )
    }

    pub fn current_id(&self) -> Option<ChannelId> {
        self.channel.as_ref().map(|live| live.id)
    }

    /// Whether events from `id` concern this session.
    ///
    /// Events from the current channel always do. With no channel present,
    /// a just-closed channel may still report back. A different live channel
    /// means `id` was superseded and its events are stale.
    pub fn accepts(&self, id: ChannelId) -> bool {
        match self.current_id() {
            Some(current) => current == id,
            None => true,
        }
    }

    /// Mark the channel `id` as open. Returns false if it is not current.
    pub fn mark_open(&mut self, id: ChannelId) -> bool {
        match self.channel.as_mut() {
            Some(live) if live.id == id => {
                live.state = ChannelState::Open;
                true
            }
            _ => false,
        }
    }

    /// Return to the disconnected state.
    pub fn reset(&mut self) {
        self.channel = None;
        self.assigned_nickname = NICKNAME_PLACEHOLDER.to_string();
    }
}

impl<C> Default for Session<C> {
    fn default() -> Self {
        Self::new()
    }
}
