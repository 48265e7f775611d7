//! Frontend configuration structures and loaders.
//!
//! UI-specific configuration shared across frontend implementations.

use std::env;

/// Frontend-specific configuration.
#[derive(Clone, Debug, Default)]
pub struct FrontendConfig {
    pub messages: MessageConfig,
}

impl FrontendConfig {
    pub const fn new(messages: MessageConfig) -> Self {
        Self { messages }
    }

    /// Construct configuration from process environment variables.
    ///
    /// Environment variables:
    /// - `KOT_MESSAGE_CAPACITY` - Message log capacity (default: 64)
    /// - `KOT_SHOW_EXPLORER_LINKS` - Append explorer links to messages (default: true)
    /// - `KOT_SHOW_TX_HASHES` - Log a message for every submitted transaction (default: true)
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Some(capacity) = read_env::<usize>("KOT_MESSAGE_CAPACITY") {
            config.messages.capacity = capacity.max(1);
        }
        if let Some(show) = read_env_bool("KOT_SHOW_EXPLORER_LINKS") {
            config.messages.show_explorer_links = show;
        }
        if let Some(show) = read_env_bool("KOT_SHOW_TX_HASHES") {
            config.messages.show_submissions = show;
        }

        config
    }
}

#[derive(Clone, Debug)]
pub struct MessageConfig {
    pub capacity: usize,
    pub show_explorer_links: bool,
    /// Announce each transaction as soon as the wallet returns its hash.
    pub show_submissions: bool,
}

impl Default for MessageConfig {
    fn default() -> Self {
        Self {
            capacity: 64,
            show_explorer_links: true,
            show_submissions: true,
        }
    }
}

fn read_env<T>(key: &str) -> Option<T>
where
    T: std::str::FromStr,
{
    env::var(key).ok()?.parse().ok()
}

fn read_env_bool(key: &str) -> Option<bool> {
    match env::var(key).ok()?.to_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Some(true),
        "false" | "0" | "no" | "off" => Some(false),
        _ => None,
    }
}
