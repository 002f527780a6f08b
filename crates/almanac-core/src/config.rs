use anyhow::Result;
use chrono_tz::Tz;
use config::{Config, ConfigBuilder, builder::DefaultState};
use serde::Deserialize;

use crate::constants::{
    CONFIG_FILE, DEFAULT_HORIZON_DAYS, DEFAULT_LOG_LEVEL, DEFAULT_MAX_OCCURRENCES,
    DEFAULT_TIMEZONE, DEFAULT_UPCOMING_DAYS, ENV_PREFIX,
};
use crate::error::{CoreError, CoreResult};

#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub logging: LoggingConfig,
    pub calendar: CalendarConfig,
    pub expansion: ExpansionConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    pub level: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CalendarConfig {
    /// IANA zone in which occurrence dates and wall-clock times are evaluated.
    pub timezone: String,
}

impl CalendarConfig {
    /// ## Summary
    /// Resolves the configured IANA timezone name.
    ///
    /// ## Errors
    /// Returns `CoreError::UnknownTimezone` if the name is not in the tz database.
    pub fn tz(&self) -> CoreResult<Tz> {
        self.timezone
            .parse::<Tz>()
            .map_err(|_err| CoreError::UnknownTimezone(self.timezone.clone()))
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct ExpansionConfig {
    pub max_occurrences: u32,
    pub default_horizon_days: u32,
    pub upcoming_days: u32,
}

impl Settings {
    /// ## Summary
    /// Returns a config builder pre-populated with every default.
    ///
    /// ## Errors
    /// Returns an error if a default cannot be registered.
    pub fn builder() -> Result<ConfigBuilder<DefaultState>> {
        Ok(Config::builder()
            .set_default("logging.level", DEFAULT_LOG_LEVEL)?
            .set_default("calendar.timezone", DEFAULT_TIMEZONE)?
            .set_default(
                "expansion.max_occurrences",
                i64::from(DEFAULT_MAX_OCCURRENCES),
            )?
            .set_default(
                "expansion.default_horizon_days",
                i64::from(DEFAULT_HORIZON_DAYS),
            )?
            .set_default("expansion.upcoming_days", i64::from(DEFAULT_UPCOMING_DAYS))?)
    }

    /// ## Summary
    /// Loads configuration from the environment and an optional TOML file.
    /// Environment variables (`ALMANAC_SECTION__KEY`) take precedence over the file.
    ///
    /// ## Errors
    /// Returns an error if building the configuration or deserializing it fails.
    pub fn load(path: Option<&str>) -> Result<Self> {
        let file = match path {
            Some(path) => config::File::with_name(path).required(true),
            None => config::File::with_name(CONFIG_FILE).required(false),
        };

        let settings = Self::builder()?
            // TOML file
            .add_source(file)
            // Env
            .add_source(
                config::Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("_")
                    .separator("__")
                    .ignore_empty(true)
                    .try_parsing(true),
            )
            .build()?
            .try_deserialize::<Settings>()?;

        settings.validate()?;
        Ok(settings)
    }

    /// ## Summary
    /// Checks values that deserialize fine but cannot be used.
    ///
    /// ## Errors
    /// Returns an error for an unknown timezone or a zero occurrence cap.
    pub fn validate(&self) -> CoreResult<()> {
        self.calendar.tz()?;
        if self.expansion.max_occurrences == 0 {
            return Err(CoreError::ConfigError(
                "expansion.max_occurrences must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

/// ## Summary
/// Loads configuration from environment variables, `.env` file and `almanac.toml`.
///
/// ## Errors
/// Returns an error if loading or deserializing the configuration fails.
pub fn load_config(path: Option<&str>) -> Result<Settings> {
    if let Err(err) = dotenvy::dotenv() {
        tracing::trace!(error = %err, "No .env file loaded");
    }

    Settings::load(path)
}
