use std::{fmt, str::FromStr, time::Duration};

use regex::Regex;
use serde::Deserialize;

use crate::error::ConfigError;

/// Which event a line lacking the continuation marker belongs to.
#[derive(Debug, Clone, Copy, Default, Eq, PartialEq)]
pub enum What {
    /// The line starts the next event; buffered lines are flushed before it.
    #[default]
    Previous,
    /// The line closes the current event and is flushed with it.
    Next,
}

impl What {
    pub fn as_str(self) -> &'static str {
        match self {
            What::Previous => "previous",
            What::Next => "next",
        }
    }
}

impl fmt::Display for What {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for What {
    type Err = ConfigError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "" | "previous" => Ok(What::Previous),
            "next" => Ok(What::Next),
            other => Err(ConfigError::InvalidWhat {
                value: other.to_string(),
            }),
        }
    }
}

impl<'de> Deserialize<'de> for What {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

/// Unvalidated multiline settings as embedded in an outer configuration file.
#[derive(Debug, Clone, Default, Deserialize, Eq, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct MultilineSettings {
    pub pattern: String,
    pub what: Option<What>,
    pub negate: bool,
    /// Idle-flush timeout in milliseconds; `0` disables it.
    pub previous_timeout_ms: u64,
}

/// Validated, immutable multiline configuration.
///
/// The compiled pattern is built once here and shared read-only (via `Arc`)
/// by every codec created from this configuration.
#[derive(Debug, Clone)]
pub struct MultilineConfig {
    matcher: Regex,
    what: What,
    negate: bool,
    previous_timeout: Duration,
}

impl MultilineConfig {
    pub fn new(
        pattern: &str,
        what: What,
        negate: bool,
        previous_timeout: Duration,
    ) -> Result<Self, ConfigError> {
        if pattern.is_empty() {
            return Err(ConfigError::EmptyPattern);
        }
        let matcher = Regex::new(pattern).map_err(|source| ConfigError::InvalidPattern {
            pattern: pattern.to_string(),
            source,
        })?;
        Ok(Self {
            matcher,
            what,
            negate,
            previous_timeout,
        })
    }

    pub fn pattern(&self) -> &str {
        self.matcher.as_str()
    }

    pub fn what(&self) -> What {
        self.what
    }

    pub fn negate(&self) -> bool {
        self.negate
    }

    /// Idle-flush timeout; [`Duration::ZERO`] means disabled.
    pub fn previous_timeout(&self) -> Duration {
        self.previous_timeout
    }

    pub(crate) fn timeout_enabled(&self) -> bool {
        !self.previous_timeout.is_zero()
    }

    /// Returns `true` when `text` extends the current event.
    pub fn is_continuation(&self, text: &str) -> bool {
        self.matcher.is_match(text) != self.negate
    }
}

impl TryFrom<MultilineSettings> for MultilineConfig {
    type Error = ConfigError;

    fn try_from(settings: MultilineSettings) -> Result<Self, Self::Error> {
        MultilineConfig::new(
            &settings.pattern,
            settings.what.unwrap_or_default(),
            settings.negate,
            Duration::from_millis(settings.previous_timeout_ms),
        )
    }
}
