use serde::Deserialize;

/// Frames the chat server sends, tagged by their `type` field.
///
/// Unknown fields are ignored: the server attaches a greeting `message` to
/// welcome frames that the client never displays. The server omits empty
/// strings, so absent text fields decode as empty.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ServerFrame {
    /// Assigns the client's display nickname
    Welcome {
        #[serde(default)]
        nickname: String,
    },

    /// Informational notice unrelated to chat content
    System {
        #[serde(default)]
        message: String,
    },

    /// Another user's chat line
    Chat {
        #[serde(default)]
        nickname: String,
        #[serde(default)]
        message: String,
    },
}

/// One received frame after decoding.
///
/// Decoding is total: every frame maps to exactly one variant, so callers
/// handle all outcomes through a single `match`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InboundMessage {
    Welcome { nickname: String },
    System { message: String },
    Chat { nickname: String, message: String },
    /// Valid JSON without a recognised `type`, or with mistyped fields
    Unknown { raw: String },
    /// Not valid JSON at all
    Unparseable { raw: String },
}

/// What the client should do in response to an inbound message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reaction {
    /// Line appended to the activity log
    pub log_line: String,
    /// New nickname, only ever present for welcome frames
    pub nickname: Option<String>,
}

impl InboundMessage {
    /// Parse a received text frame, then tag it.
    pub fn decode(raw: &str) -> Self {
        let value: serde_json::Value = match serde_json::from_str(raw) {
            Ok(v) => v,
            Err(_) => {
                return Self::Unparseable {
                    raw: raw.to_string(),
                }
            }
        };

        match serde_json::from_value::<ServerFrame>(value) {
            Ok(frame) => frame.into(),
            Err(_) => Self::Unknown {
                raw: raw.to_string(),
            },
        }
    }

    /// The dispatch table: variant to log line and nickname update.
    pub fn reaction(&self) -> Reaction {
        match self {
            Self::Welcome { nickname } => Reaction {
                log_line: format!("Nickname assigned by server: {nickname}"),
                nickname: Some(nickname.clone()),
            },
            Self::System { message } => Reaction {
                log_line: format!("SYSTEM: {message}"),
                nickname: None,
            },
            Self::Chat { nickname, message } => Reaction {
                log_line: format!("{nickname}: {message}"),
                nickname: None,
            },
            Self::Unknown { raw } => Reaction {
                log_line: format!("UNKNOWN MESSAGE: {raw}"),
                nickname: None,
            },
            Self::Unparseable { raw } => Reaction {
                log_line: format!("RAW: {raw}"),
                nickname: None,
            },
        }
    }
}

impl From<ServerFrame> for InboundMessage {
    fn from(frame: ServerFrame) -> Self {
        match frame {
            ServerFrame::Welcome { nickname } => Self::Welcome { nickname },
            ServerFrame::System { message } => Self::System { message },
            ServerFrame::Chat { nickname, message } => Self::Chat { nickname, message },
        }
    }
}
