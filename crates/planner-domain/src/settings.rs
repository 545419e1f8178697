//! Scalar planner settings persisted alongside the ledger.

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::common::{TimeUnit, UnknownVariant};

pub const DEFAULT_SAVING_PERCENTAGE: u8 = 20;
pub const DEFAULT_WALLET: f64 = 1_000_000.0;

/// Share of the monthly income set aside for savings, always within `1..=100`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct SavingPercentage(u8);

impl SavingPercentage {
    pub const MIN: u8 = 1;
    pub const MAX: u8 = 100;

    /// Returns `None` when `value` falls outside `1..=100`.
    pub fn new(value: u8) -> Option<Self> {
        (Self::MIN..=Self::MAX)
            .contains(&value)
            .then_some(Self(value))
    }

    /// Forces any integer into the valid range.
    pub fn clamped(value: i64) -> Self {
        Self(value.clamp(Self::MIN as i64, Self::MAX as i64) as u8)
    }

    pub fn get(self) -> u8 {
        self.0
    }

    /// Percentage as a fraction, e.g. `20` becomes `0.2`.
    pub fn fraction(self) -> f64 {
        f64::from(self.0) / 100.0
    }
}

impl Default for SavingPercentage {
    fn default() -> Self {
        Self(DEFAULT_SAVING_PERCENTAGE)
    }
}

impl TryFrom<u8> for SavingPercentage {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::new(value).ok_or_else(|| format!("saving percentage {value} outside 1..=100"))
    }
}

impl From<SavingPercentage> for u8 {
    fn from(value: SavingPercentage) -> Self {
        value.0
    }
}

impl fmt::Display for SavingPercentage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}%", self.0)
    }
}

/// Explicit colour scheme choice. Absence means "follow the OS".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ThemePreference {
    Dark,
    Light,
}

impl ThemePreference {
    pub fn from_dark(dark: bool) -> Self {
        if dark {
            ThemePreference::Dark
        } else {
            ThemePreference::Light
        }
    }

    pub fn is_dark(self) -> bool {
        matches!(self, ThemePreference::Dark)
    }

    pub fn toggled(self) -> Self {
        match self {
            ThemePreference::Dark => ThemePreference::Light,
            ThemePreference::Light => ThemePreference::Dark,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ThemePreference::Dark => "dark",
            ThemePreference::Light => "light",
        }
    }
}

impl fmt::Display for ThemePreference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ThemePreference {
    type Err = UnknownVariant;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "dark" => Ok(ThemePreference::Dark),
            "light" => Ok(ThemePreference::Light),
            _ => Err(UnknownVariant(value.trim().to_string())),
        }
    }
}

/// User-controlled inputs to the projection plus presentation preferences.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub income: Option<f64>,
    #[serde(default)]
    pub saving_percentage: SavingPercentage,
    #[serde(default)]
    pub time_unit: TimeUnit,
    #[serde(default = "Settings::default_wallet")]
    pub wallet: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub theme: Option<ThemePreference>,
}

impl Settings {
    pub fn default_wallet() -> f64 {
        DEFAULT_WALLET
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            income: None,
            saving_percentage: SavingPercentage::default(),
            time_unit: TimeUnit::default(),
            wallet: DEFAULT_WALLET,
            theme: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_first_run_values() {
        let settings = Settings::default();
        assert_eq!(settings.income, None);
        assert_eq!(settings.saving_percentage.get(), 20);
        assert_eq!(settings.time_unit, TimeUnit::Month);
        assert_eq!(settings.wallet, 1_000_000.0);
        assert_eq!(settings.theme, None);
    }

    #[test]
    fn saving_percentage_rejects_out_of_range() {
        assert!(SavingPercentage::new(0).is_none());
        assert!(SavingPercentage::new(101).is_none());
        assert_eq!(SavingPercentage::new(100).map(SavingPercentage::get), Some(100));
        assert_eq!(SavingPercentage::clamped(250).get(), 100);
        assert_eq!(SavingPercentage::clamped(-4).get(), 1);
    }

    #[test]
    fn saving_percentage_deserialization_validates_range() {
        assert!(serde_json::from_str::<SavingPercentage>("0").is_err());
        let parsed: SavingPercentage = serde_json::from_str("35").unwrap();
        assert_eq!(parsed.get(), 35);
    }

    #[test]
    fn theme_toggles_between_modes() {
        assert_eq!(ThemePreference::Dark.toggled(), ThemePreference::Light);
        assert_eq!(ThemePreference::from_dark(false), ThemePreference::Light);
        assert_eq!("DARK".parse::<ThemePreference>(), Ok(ThemePreference::Dark));
    }
}
