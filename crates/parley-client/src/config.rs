//! Client configuration loaded from environment variables.
//!
//! Every setting has a default, so the client starts with zero configuration
//! against a server on the local machine.

use url::Url;

use parley_shared::constants::DEFAULT_PAGE_URL;

/// Client configuration.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// URL of the page the chat is served from. The channel endpoint is
    /// derived from it.
    /// Env: `PARLEY_PAGE_URL`, or the first command-line argument
    /// Default: `http://localhost:8080/`
    pub page_url: Url,

    /// Connect as soon as the client starts.
    /// Env: `PARLEY_AUTO_CONNECT` (true/false)
    /// Default: `false`
    pub auto_connect: bool,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            page_url: default_page_url(),
            auto_connect: false,
        }
    }
}

impl ClientConfig {
    /// Load configuration from the process environment and arguments.
    pub fn load() -> Self {
        let mut config = Self::from_vars(|key| std::env::var(key).ok());
        if let Some(arg) = std::env::args().nth(1) {
            config.apply_page_url(&arg, "argument");
        }
        config
    }

    /// Build configuration from a variable lookup, falling back to defaults.
    pub fn from_vars<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(url) = lookup("PARLEY_PAGE_URL") {
            config.apply_page_url(&url, "PARLEY_PAGE_URL");
        }

        if let Some(val) = lookup("PARLEY_AUTO_CONNECT") {
            config.auto_connect = parse_flag(&val);
        }

        // RUST_LOG is handled directly by tracing-subscriber's EnvFilter.

        config
    }

    fn apply_page_url(&mut self, value: &str, source: &str) {
        match Url::parse(value.trim()) {
            Ok(url) => self.page_url = url,
            Err(e) => {
                tracing::warn!(
                    value = %value,
                    source,
                    error = %e,
                    "Invalid page URL, using default"
                );
            }
        }
    }
}

fn default_page_url() -> Url {
    Url::parse(DEFAULT_PAGE_URL).expect("valid default page URL")
}

fn parse_flag(val: &str) -> bool {
    matches!(
        val.trim().to_ascii_lowercase().as_str(),
        "true" | "1" | "yes" | "on"
    )
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn from_map(vars: &[(&str, &str)]) -> ClientConfig {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        ClientConfig::from_vars(|key| map.get(key).cloned())
    }

    #[test]
    fn test_default_config() {
        let config = ClientConfig::default();
        assert_eq!(config.page_url.as_str(), "http://localhost:8080/");
        assert!(!config.auto_connect);
    }

    #[test]
    fn test_env_overrides() {
        let config = from_map(&[
            ("PARLEY_PAGE_URL", "https://chat.example.org/"),
            ("PARLEY_AUTO_CONNECT", "true"),
        ]);
        assert_eq!(config.page_url.as_str(), "https://chat.example.org/");
        assert!(config.auto_connect);
    }

    #[test]
    fn test_invalid_url_keeps_default() {
        let config = from_map(&[("PARLEY_PAGE_URL", "not a url")]);
        assert_eq!(config.page_url.as_str(), "http://localhost:8080/");
    }

    #[test]
    fn test_parse_flag() {
        assert!(parse_flag("1"));
        assert!(parse_flag("TRUE"));
        assert!(!parse_flag("false"));
        assert!(!parse_flag("0"));
        assert!(!parse_flag(""));
    }
}
