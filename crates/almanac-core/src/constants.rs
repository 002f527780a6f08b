/// Application name, used as the environment variable prefix and config file stem.
pub const APP_NAME: &str = "almanac";
pub const ENV_PREFIX: &str = "ALMANAC";
pub const CONFIG_FILE: &str = const_str::concat!(APP_NAME, ".toml");

pub const DEFAULT_LOG_LEVEL: &str = "info";
pub const DEFAULT_TIMEZONE: &str = "UTC";

/// Upper bound on the occurrences a single expansion may return.
pub const DEFAULT_MAX_OCCURRENCES: u32 = 1000;

/// Window length used when a query asks for occurrences without an end date.
pub const DEFAULT_HORIZON_DAYS: u32 = 730;

pub const DEFAULT_UPCOMING_DAYS: u32 = 30;
