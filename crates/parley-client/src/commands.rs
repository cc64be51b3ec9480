//! User input parsing for the terminal front end.
//!
//! Each submitted line maps to exactly one action. The three buttons of the
//! chat surface become slash commands, and pressing Enter on any other line
//! is the send action.

/// One user action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UiAction {
    Connect,
    Disconnect,
    /// Send the line as chat text. Trimming is left to the controller.
    Send(String),
    Help,
    Quit,
}

impl UiAction {
    pub fn parse(line: &str) -> Self {
        match line.trim() {
            "/connect" => Self::Connect,
            "/disconnect" => Self::Disconnect,
            "/help" => Self::Help,
            "/quit" | "/exit" => Self::Quit,
            _ => Self::Send(line.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_commands() {
        assert_eq!(UiAction::parse("/connect"), UiAction::Connect);
        assert_eq!(UiAction::parse("  /disconnect "), UiAction::Disconnect);
        assert_eq!(UiAction::parse("/help"), UiAction::Help);
        assert_eq!(UiAction::parse("/quit"), UiAction::Quit);
        assert_eq!(UiAction::parse("/exit"), UiAction::Quit);
    }

    #[test]
    fn test_other_lines_are_chat_text() {
        assert_eq!(
            UiAction::parse("  hello  "),
            UiAction::Send("  hello  ".to_string())
        );
        assert_eq!(
            UiAction::parse("/connect now"),
            UiAction::Send("/connect now".to_string())
        );
        assert_eq!(UiAction::parse(""), UiAction::Send(String::new()));
    }
}
