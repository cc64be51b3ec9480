//! Wire contract shared by Parley front ends.
//!
//! Inbound frame decoding, endpoint derivation, and the error types used
//! across the workspace.

pub mod constants;
pub mod endpoint;
pub mod error;
pub mod protocol;

pub use endpoint::derive_endpoint;
pub use error::{ChannelError, EndpointError};
pub use protocol::{InboundMessage, Reaction};
