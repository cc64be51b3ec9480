/// Application name
pub const APP_NAME: &str = "Parley";

/// Fixed path of the chat channel on the server host
pub const CHAT_PATH: &str = "/ws";

/// Nickname shown while no server has assigned one
pub const NICKNAME_PLACEHOLDER: &str = "(not connected)";

/// Page URL used when none is configured (reference server listens on :8080)
pub const DEFAULT_PAGE_URL: &str = "http://localhost:8080/";

/// Local wall-clock format used for activity log timestamps
pub const LOG_TIME_FORMAT: &str = "%H:%M:%S";
