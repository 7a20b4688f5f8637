//! Stake selection.
//!
//! A stake is the amount a user commits to one side. Panels offer three
//! quantized presets plus free-form numeric entry; whichever was set last
//! wins. Free-form entry is recorded even when it does not parse to a
//! positive amount, so validation surfaces at submission time instead of
//! silently dropping keystrokes.

use std::str::FromStr;

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Why an entered stake cannot be submitted.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InvalidStake {
    /// The entry is not a number.
    #[error("stake is not a number: {0:?}")]
    NotNumeric(String),
    /// The entry is zero or negative.
    #[error("stake must be positive, got {0}")]
    NonPositive(Decimal),
}

/// A strictly positive monetary amount.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "Decimal", into = "Decimal")]
pub struct Stake(Decimal);

impl Stake {
    /// Validate an amount.
    ///
    /// # Errors
    /// Returns `InvalidStake::NonPositive` for zero or negative amounts.
    pub fn new(amount: Decimal) -> Result<Self, InvalidStake> {
        if amount <= Decimal::ZERO {
            return Err(InvalidStake::NonPositive(amount));
        }
        Ok(Self(amount))
    }

    /// Parse free-form text the way a numeric input field would.
    ///
    /// Accepts plain decimals and scientific notation, ignoring
    /// surrounding whitespace.
    ///
    /// # Errors
    /// `NotNumeric` when the text is not a number, `NonPositive` when it
    /// parses to zero or less.
    pub fn parse(raw: &str) -> Result<Self, InvalidStake> {
        let trimmed = raw.trim();
        let amount = Decimal::from_str(trimmed)
            .or_else(|_| Decimal::from_scientific(trimmed))
            .map_err(|_| InvalidStake::NotNumeric(raw.to_string()))?;
        Self::new(amount)
    }

    /// The amount as a decimal.
    pub const fn amount(self) -> Decimal {
        self.0
    }
}

impl TryFrom<Decimal> for Stake {
    type Error = InvalidStake;

    fn try_from(amount: Decimal) -> Result<Self, Self::Error> {
        Self::new(amount)
    }
}

impl From<Stake> for Decimal {
    fn from(stake: Stake) -> Self {
        stake.0
    }
}

impl std::fmt::Display for Stake {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&super::format::format_usd(self.0))
    }
}

// ────────────────────────────────────────────
// Presets
// ────────────────────────────────────────────

/// Quantized stake amounts offered as one-tap buttons.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Preset {
    Ten,
    Fifty,
    Hundred,
}

impl Preset {
    /// All presets in display order.
    pub const ALL: [Self; 3] = [Self::Ten, Self::Fifty, Self::Hundred];

    /// Preset a freshly mounted panel starts with.
    pub const DEFAULT: Self = Self::Ten;

    /// Amount this preset stands for.
    pub const fn amount(self) -> Decimal {
        match self {
            Self::Ten => dec!(10),
            Self::Fifty => dec!(50),
            Self::Hundred => dec!(100),
        }
    }

    /// The preset as a validated stake.
    pub const fn stake(self) -> Stake {
        Stake(self.amount())
    }

    /// Find the preset with exactly this amount.
    pub fn from_amount(amount: Decimal) -> Option<Self> {
        Self::ALL.into_iter().find(|p| p.amount() == amount)
    }
}

// ────────────────────────────────────────────
// Selector
// ────────────────────────────────────────────

/// What the user last chose.
#[derive(Debug, Clone, PartialEq, Eq)]
enum StakeEntry {
    Preset(Preset),
    Custom(Result<Stake, InvalidStake>),
}

/// Holds exactly one stake entry; presets and custom text overwrite
/// each other.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StakeSelector {
    entry: StakeEntry,
}

impl StakeSelector {
    /// Create a selector at the default preset.
    pub const fn new() -> Self {
        Self {
            entry: StakeEntry::Preset(Preset::DEFAULT),
        }
    }

    /// Select a preset. Always succeeds and discards any custom entry.
    pub fn select_preset(&mut self, preset: Preset) {
        self.entry = StakeEntry::Preset(preset);
    }

    /// Record free-form numeric input.
    ///
    /// The entry is kept even when invalid; the parse result is returned
    /// so callers can show a validation hint right away.
    pub fn set_custom(&mut self, raw: &str) -> Result<Stake, InvalidStake> {
        let parsed = Stake::parse(raw);
        self.entry = StakeEntry::Custom(parsed.clone());
        parsed
    }

    /// The presently selected stake.
    ///
    /// # Errors
    /// Returns the recorded `InvalidStake` when the last custom entry did
    /// not parse to a positive amount.
    pub fn current_stake(&self) -> Result<Stake, InvalidStake> {
        match &self.entry {
            StakeEntry::Preset(preset) => Ok(preset.stake()),
            StakeEntry::Custom(parsed) => parsed.clone(),
        }
    }

    /// Preset whose amount matches the current stake, if any.
    pub fn selected_preset(&self) -> Option<Preset> {
        match &self.entry {
            StakeEntry::Preset(preset) => Some(*preset),
            StakeEntry::Custom(Ok(stake)) => Preset::from_amount(stake.amount()),
            StakeEntry::Custom(Err(_)) => None,
        }
    }
}

impl Default for StakeSelector {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_ten() {
        let selector = StakeSelector::new();
        assert_eq!(selector.current_stake().unwrap().amount(), dec!(10));
        assert_eq!(selector.selected_preset(), Some(Preset::Ten));
    }

    #[test]
    fn test_preset_is_idempotent() {
        let mut selector = StakeSelector::new();
        selector.select_preset(Preset::Fifty);
        let first = selector.current_stake();
        selector.select_preset(Preset::Fifty);
        assert_eq!(selector.current_stake(), first);
        assert_eq!(first.unwrap().amount(), dec!(50));
    }

    #[test]
    fn test_custom_overrides_preset() {
        let mut selector = StakeSelector::new();
        selector.select_preset(Preset::Fifty);
        selector.set_custom("25").unwrap();
        assert_eq!(selector.current_stake().unwrap().amount(), dec!(25));
        assert_eq!(selector.selected_preset(), None);
    }

    #[test]
    fn test_preset_overrides_invalid_custom() {
        let mut selector = StakeSelector::new();
        assert!(selector.set_custom("abc").is_err());
        assert!(selector.current_stake().is_err());
        selector.select_preset(Preset::Hundred);
        assert_eq!(selector.current_stake().unwrap().amount(), dec!(100));
    }

    #[test]
    fn test_custom_matching_preset_highlights_it() {
        let mut selector = StakeSelector::new();
        selector.set_custom("100").unwrap();
        assert_eq!(selector.selected_preset(), Some(Preset::Hundred));
    }

    #[test]
    fn test_invalid_entries() {
        assert_eq!(
            Stake::parse("abc"),
            Err(InvalidStake::NotNumeric("abc".to_string()))
        );
        assert_eq!(Stake::parse(""), Err(InvalidStake::NotNumeric(String::new())));
        assert_eq!(Stake::parse("0"), Err(InvalidStake::NonPositive(dec!(0))));
        assert_eq!(Stake::parse("-5"), Err(InvalidStake::NonPositive(dec!(-5))));
    }

    #[test]
    fn test_parse_accepts_whitespace_and_scientific() {
        assert_eq!(Stake::parse(" 12.5 ").unwrap().amount(), dec!(12.5));
        assert_eq!(Stake::parse("1e2").unwrap().amount(), dec!(100));
    }

    #[test]
    fn test_stake_serde_rejects_non_positive() {
        let ok: Stake = serde_json::from_str("\"25\"").unwrap();
        assert_eq!(ok.amount(), dec!(25));
        assert!(serde_json::from_str::<Stake>("\"0\"").is_err());
    }

    #[test]
    fn test_stake_display() {
        assert_eq!(Stake::new(dec!(50)).unwrap().to_string(), "$50");
    }
}
