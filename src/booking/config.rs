use std::path::Path;

use chrono::NaiveTime;
use serde::{Deserialize, Serialize};

use super::value::SectionRange;
use crate::RegramError;

/// Tunables of the booking grammar.
///
/// Every field has a default, so an empty YAML document is a valid config:
///
/// ```yaml
/// year_horizon: 10
/// morning: { start: "00:00:00", end: "12:59:59" }
/// evening: { start: "12:00:00", end: "23:59:59" }
/// punctuation: ",，。!！?？"
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GrammarConfig {
    /// Accepted years are `[this year, this year + year_horizon)`.
    pub year_horizon: i32,
    pub morning: SectionRange,
    pub evening: SectionRange,
    /// Characters removed from a message before interpretation.
    pub punctuation: String,
}

impl Default for GrammarConfig {
    fn default() -> Self {
        Self {
            year_horizon: 10,
            morning: SectionRange::new(NaiveTime::MIN, hms(12, 59, 59)),
            evening: SectionRange::new(hms(12, 0, 0), hms(23, 59, 59)),
            punctuation: ",，。!！?？".to_owned(),
        }
    }
}

impl GrammarConfig {
    /// Load from a YAML file.
    ///
    /// # Errors
    ///
    /// Returns [`RegramError::Io`] if the file cannot be read and
    /// [`RegramError::Config`] if it is not a valid config document.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, RegramError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml(&content)
    }

    /// Load from a YAML string.
    ///
    /// # Errors
    ///
    /// Returns [`RegramError::Config`] on malformed YAML or field values.
    pub fn from_yaml(yaml: &str) -> Result<Self, RegramError> {
        if yaml.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_yaml::from_str(yaml)?)
    }
}

fn hms(hour: u32, minute: u32, second: u32) -> NaiveTime {
    NaiveTime::from_hms_opt(hour, minute, second).unwrap_or(NaiveTime::MIN)
}
