//! Channel abstraction the session controller drives.
//!
//! A [`Connector`] opens channels without blocking; everything a channel
//! does afterwards is reported as a [`ChannelEvent`](crate::events::ChannelEvent)
//! on the queue the connector was built with.

use parley_shared::ChannelError;
use url::Url;

use crate::events::ChannelId;

/// Owned handle to one open (or opening) channel.
pub trait Channel {
    /// Queue a text frame for sending.
    fn send_text(&mut self, text: &str) -> Result<(), ChannelError>;

    /// Request closure. The `Closed` event follows asynchronously.
    fn close(&mut self);
}

/// Opens channels to an endpoint.
pub trait Connector {
    type Channel: Channel;

    fn open(&mut self, id: ChannelId, endpoint: &Url) -> Self::Channel;
}
