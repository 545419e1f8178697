//! Shared display trait and the time unit enum used across the planner.

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

/// Converts an entity into a user-facing display label.
pub trait Displayable {
    fn display_label(&self) -> String;
}

/// Period used to express the savings rate and the target horizon.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum TimeUnit {
    Day,
    Week,
    #[default]
    Month,
    Year,
}

impl TimeUnit {
    pub const ALL: [TimeUnit; 4] = [TimeUnit::Day, TimeUnit::Week, TimeUnit::Month, TimeUnit::Year];

    /// Lowercase key used in persisted data and on the command line.
    pub fn as_str(self) -> &'static str {
        match self {
            TimeUnit::Day => "day",
            TimeUnit::Week => "week",
            TimeUnit::Month => "month",
            TimeUnit::Year => "year",
        }
    }

    /// Returns the unit name with a plural suffix when `count != 1`.
    pub fn pluralize(self, count: u64) -> String {
        if count == 1 {
            self.as_str().to_string()
        } else {
            format!("{}s", self.as_str())
        }
    }

    /// Lenient parser for user input and legacy records; accepts plurals and any case.
    pub fn parse_loose(value: &str) -> Option<Self> {
        let lowered = value.trim().to_ascii_lowercase();
        let key = lowered.strip_suffix('s').unwrap_or(&lowered);
        match key {
            "day" => Some(TimeUnit::Day),
            "week" => Some(TimeUnit::Week),
            "month" => Some(TimeUnit::Month),
            "year" => Some(TimeUnit::Year),
            _ => None,
        }
    }
}

impl fmt::Display for TimeUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            TimeUnit::Day => "Day",
            TimeUnit::Week => "Week",
            TimeUnit::Month => "Month",
            TimeUnit::Year => "Year",
        };
        f.write_str(label)
    }
}

/// Error returned when a string does not name a known enum variant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownVariant(pub String);

impl fmt::Display for UnknownVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown value `{}`", self.0)
    }
}

impl std::error::Error for UnknownVariant {}

impl FromStr for TimeUnit {
    type Err = UnknownVariant;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        TimeUnit::parse_loose(value).ok_or_else(|| UnknownVariant(value.trim().to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_case_insensitive_and_plural_units() {
        assert_eq!("Month".parse::<TimeUnit>(), Ok(TimeUnit::Month));
        assert_eq!("weeks".parse::<TimeUnit>(), Ok(TimeUnit::Week));
        assert_eq!(" DAY ".parse::<TimeUnit>(), Ok(TimeUnit::Day));
        assert!("fortnight".parse::<TimeUnit>().is_err());
    }

    #[test]
    fn pluralizes_only_when_count_differs_from_one() {
        assert_eq!(TimeUnit::Month.pluralize(1), "month");
        assert_eq!(TimeUnit::Month.pluralize(7), "months");
        assert_eq!(TimeUnit::Year.pluralize(0), "years");
    }

    #[test]
    fn serializes_lowercase() {
        let json = serde_json::to_string(&TimeUnit::Week).unwrap();
        assert_eq!(json, "\"week\"");
    }
}
