//! Display surface the session controller renders into.
//!
//! The controller only speaks to [`DisplaySurface`]; the terminal front end
//! is one implementation, tests use a recording one.

use std::io::Write;

use tracing::warn;

use crate::activity::LogEntry;

/// Which user actions are currently available.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Affordances {
    pub connect: bool,
    pub disconnect: bool,
    pub send: bool,
}

impl Affordances {
    /// Idle: only connecting makes sense.
    pub const DISCONNECTED: Self = Self {
        connect: true,
        disconnect: false,
        send: false,
    };

    /// Channel open: chatting and disconnecting are available.
    pub const CONNECTED: Self = Self {
        connect: false,
        disconnect: true,
        send: true,
    };
}

pub trait DisplaySurface {
    /// Update the nickname indicator.
    fn set_nickname(&mut self, nickname: &str);

    /// Append one entry to the visible log and keep the newest line in view.
    fn append_log(&mut self, entry: &LogEntry);

    /// Enable or disable the connect, disconnect and send controls.
    fn set_affordances(&mut self, affordances: Affordances);

    /// Empty the chat input after a successful send.
    fn clear_input(&mut self);
}

/// Line-oriented display for a terminal.
///
/// Writes the log to `out` as it grows, so the newest line is always at the
/// bottom. Nickname and available commands are printed whenever they change.
pub struct TerminalDisplay<W: Write> {
    out: W,
    nickname: Option<String>,
    affordances: Option<Affordances>,
}

impl<W: Write> TerminalDisplay<W> {
    pub fn new(out: W) -> Self {
        Self {
            out,
            nickname: None,
            affordances: None,
        }
    }

    /// Print the command reference.
    pub fn show_help(&mut self) {
        self.write_line(
            "Commands: /connect, /disconnect, /help, /quit. Any other line is sent as chat.",
        );
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    fn write_line(&mut self, line: &str) {
        let result = writeln!(self.out, "{line}").and_then(|_| self.out.flush());
        if let Err(e) = result {
            warn!(error = %e, "Failed to write to terminal");
        }
    }
}

impl<W: Write> DisplaySurface for TerminalDisplay<W> {
    fn set_nickname(&mut self, nickname: &str) {
        if self.nickname.as_deref() == Some(nickname) {
            return;
        }
        self.nickname = Some(nickname.to_string());
        self.write_line(&format!("* nickname: {nickname}"));
    }

    fn append_log(&mut self, entry: &LogEntry) {
        self.write_line(&entry.to_string());
    }

    fn set_affordances(&mut self, affordances: Affordances) {
        if self.affordances == Some(affordances) {
            return;
        }
        self.affordances = Some(affordances);

        let mut available = Vec::new();
        if affordances.connect {
            available.push("/connect");
        }
        if affordances.disconnect {
            available.push("/disconnect");
        }
        if affordances.send {
            available.push("<text> to send");
        }
        self.write_line(&format!("* available: {}", available.join(", ")));
    }

    fn clear_input(&mut self) {
        // A submitted terminal line has already been consumed.
    }
}
