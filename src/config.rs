//! Server configuration read from environment variables.

use crate::logic::DEFAULT_SWISS_ROUNDS;
use std::str::FromStr;

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

fn default_event_capacity() -> usize {
    64
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Config {
    /// Bind host (`HOST`).
    pub host: String,
    /// Bind port (`PORT`).
    pub port: u16,
    /// Rounds for swiss tournaments created without an explicit count (`SWISS_ROUNDS`).
    pub swiss_rounds: u32,
    /// Buffered change events per subscriber (`EVENT_CHANNEL_CAPACITY`).
    pub event_capacity: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            swiss_rounds: DEFAULT_SWISS_ROUNDS,
            event_capacity: default_event_capacity(),
        }
    }
}

impl Config {
    /// Load from the process environment; unset or invalid values use defaults.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load from an arbitrary key lookup (used by tests).
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        Self {
            host: lookup("HOST").unwrap_or(defaults.host),
            port: parse_or("PORT", lookup("PORT"), defaults.port),
            swiss_rounds: parse_or("SWISS_ROUNDS", lookup("SWISS_ROUNDS"), defaults.swiss_rounds)
                .max(1),
            event_capacity: parse_or(
                "EVENT_CHANNEL_CAPACITY",
                lookup("EVENT_CHANNEL_CAPACITY"),
                defaults.event_capacity,
            )
            .max(1),
        }
    }
}

fn parse_or<T: FromStr + std::fmt::Display>(key: &str, raw: Option<String>, default: T) -> T {
    match raw {
        None => default,
        Some(raw) => raw.trim().parse().unwrap_or_else(|_| {
            log::warn!("Invalid {key}={raw:?}, using default {default}");
            default
        }),
    }
}
