// src/constants.rs

/// Milliseconds in one day (24 * 60 * 60 * 1000)
pub const MS_PER_DAY: i64 = 86_400_000;

/// Number of day buckets in the weekly history (today plus six days back)
pub const HISTORY_DAYS: usize = 7;

/// Identity provider "who am I" endpoint used when the config does not set one
pub const DEFAULT_IDENTITY_ENDPOINT: &str = "https://graph.facebook.com/v2.10/me";

/// Default timeout for the identity provider round trip, in seconds
pub const DEFAULT_IDENTITY_TIMEOUT_SECS: u64 = 10;

/// Upper bound for the configurable identity provider timeout, in seconds
pub const MAX_IDENTITY_TIMEOUT_SECS: u64 = 120;

/// Default config file location
pub const DEFAULT_CONFIG_PATH: &str = "/etc/gtd/gtd.conf";
