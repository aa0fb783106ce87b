//! Day key model

use std::fmt;
use std::str::FromStr;
use std::sync::OnceLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::Error;

fn day_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"^\d{8}$").expect("Invalid regex"))
}

/// A journal day key in `YYYYMMDD` form (e.g. `20240101`).
///
/// Days are plain eight-digit strings rather than calendar dates: entries are
/// bucketed by the day string the editor produced, and the key participates
/// in record identity verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Day(String);

impl Day {
    /// Create a day key, validating the `YYYYMMDD` shape.
    pub fn new(raw: impl Into<String>) -> Result<Self, Error> {
        let raw = raw.into();
        if day_pattern().is_match(&raw) {
            Ok(Self(raw))
        } else {
            Err(Error::InvalidInput(format!(
                "day must be 8 digits (YYYYMMDD), got '{raw}'"
            )))
        }
    }

    /// Today's day key in UTC.
    #[must_use]
    pub fn today() -> Self {
        Self(chrono::Utc::now().format("%Y%m%d").to_string())
    }

    /// Get the string representation of this day
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Day {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for Day {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl TryFrom<String> for Day {
    type Error = Error;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Day> for String {
    fn from(day: Day) -> Self {
        day.0
    }
}
