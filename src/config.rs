//! Sync configuration parsed from environment variables.
//!
//! Optional:
//! - `CLASSROOM_SYNC_PREFIX`: key namespace, default `educode:sync:`
//! - `CLASSROOM_SYNC_POLL_MS`: polling interval, default 300
//! - `CLASSROOM_SYNC_LISTEN`: `false` disables external notifications
//! - `CLASSROOM_SYNC_POLL`: `false` disables polling
//!
//! Browser builds have no process environment, so `from_env` falls back to
//! the defaults there.

#[cfg(test)]
#[path = "config_test.rs"]
mod config_test;

use std::env::VarError;
use std::fmt::Display;
use std::time::Duration;

use tracing::warn;

pub const DEFAULT_PREFIX: &str = "educode:sync:";
pub const DEFAULT_POLL_INTERVAL_MS: u64 = 300;

/// Change-detection configuration for one synced value.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SyncOptions {
    /// React to change notifications fired by other contexts.
    pub listen: bool,
    /// Re-read the key on a fixed interval.
    pub poll: bool,
    pub interval: Duration,
}

impl SyncOptions {
    /// No change detection at all: the value only changes through its own writes.
    #[must_use]
    pub fn local() -> Self {
        Self { listen: false, poll: false, interval: Duration::from_millis(DEFAULT_POLL_INTERVAL_MS) }
    }
}

impl Default for SyncOptions {
    fn default() -> Self {
        Self { listen: true, poll: true, interval: Duration::from_millis(DEFAULT_POLL_INTERVAL_MS) }
    }
}

/// Crate-wide sync settings shared by every store.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SyncConfig {
    pub prefix: String,
    pub poll_interval: Duration,
    pub listen: bool,
    pub poll: bool,
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            prefix: DEFAULT_PREFIX.to_owned(),
            poll_interval: Duration::from_millis(DEFAULT_POLL_INTERVAL_MS),
            listen: true,
            poll: true,
        }
    }
}

impl SyncConfig {
    /// Build config from environment variables, defaulting anything unset or invalid.
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env_value(key, std::env::var(key)))
    }

    /// Build config from an arbitrary variable lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let prefix = match lookup("CLASSROOM_SYNC_PREFIX") {
            Some(p) if !p.is_empty() => p,
            _ => DEFAULT_PREFIX.to_owned(),
        };
        let poll_ms = lookup_parse(&lookup, "CLASSROOM_SYNC_POLL_MS", DEFAULT_POLL_INTERVAL_MS).max(1);

        Self {
            prefix,
            poll_interval: Duration::from_millis(poll_ms),
            listen: lookup_parse(&lookup, "CLASSROOM_SYNC_LISTEN", true),
            poll: lookup_parse(&lookup, "CLASSROOM_SYNC_POLL", true),
        }
    }

    /// Change-detection options for values that follow the crate-wide settings.
    #[must_use]
    pub fn options(&self) -> SyncOptions {
        SyncOptions { listen: self.listen, poll: self.poll, interval: self.poll_interval }
    }
}

fn env_value(key: &str, var: Result<String, VarError>) -> Option<String> {
    match var {
        Ok(value) => Some(value),
        Err(VarError::NotPresent) => None,
        Err(VarError::NotUnicode(raw)) => {
            warn!(key, value = ?raw, "ignoring non-unicode environment variable");
            None
        }
    }
}

fn lookup_parse<T>(lookup: &impl Fn(&str) -> Option<String>, key: &str, default: T) -> T
where
    T: std::str::FromStr + Copy,
    T::Err: Display,
{
    let Some(raw) = lookup(key) else {
        return default;
    };
    match raw.trim().parse::<T>() {
        Ok(value) => value,
        Err(err) => {
            warn!(key, value = %raw, error = %err, "invalid config value; using default");
            default
        }
    }
}
