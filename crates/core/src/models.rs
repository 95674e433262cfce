use chrono::{DateTime, Utc};
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

// ---------------------------------------------------------------------------
// Asset
// ---------------------------------------------------------------------------

/// The market an asset is quoted on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AssetClass {
    Crypto,
    Stock,
}

impl AssetClass {
    /// Upper-case label used in report headers.
    pub fn label(&self) -> &'static str {
        match self {
            AssetClass::Crypto => "CRYPTO",
            AssetClass::Stock => "STOCK",
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            AssetClass::Crypto => "crypto",
            AssetClass::Stock => "stock",
        }
    }
}

impl fmt::Display for AssetClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Market Data
// ---------------------------------------------------------------------------

/// A point-in-time quote from an upstream price provider.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceSnapshot {
    pub symbol: String,
    pub asset_class: AssetClass,
    /// Last price in USD.
    pub price: Decimal,
    /// Percent change over the trailing 24 hours (or since previous close for equities).
    pub change_24h: Decimal,
    /// Market capitalization in USD. Zero when the provider does not report it.
    pub market_cap: Decimal,
    /// Trailing 24h traded volume in USD, when reported.
    pub volume_24h: Option<Decimal>,
}

impl PriceSnapshot {
    /// 24h change at two decimals, as shown to callers.
    pub fn change_24h_display(&self) -> Decimal {
        round_half_away(self.change_24h, 2)
    }
}

/// Round to `dp` places with midpoints going away from zero (0.125 -> 0.13).
pub fn round_half_away(value: Decimal, dp: u32) -> Decimal {
    value.round_dp_with_strategy(dp, RoundingStrategy::MidpointAwayFromZero)
}

/// Latest reading of the crypto Fear & Greed index.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FearGreedReading {
    /// Index value, 0 (extreme fear) to 100 (extreme greed).
    pub value: u8,
    pub classification: String,
    pub timestamp: Option<DateTime<Utc>>,
}

// ---------------------------------------------------------------------------
// Signal
// ---------------------------------------------------------------------------

/// Directional bias derived from the 24h change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Direction {
    #[serde(rename = "STRONG SHORT")]
    StrongShort,
    #[serde(rename = "SHORT")]
    Short,
    #[serde(rename = "NEUTRAL/SHORT")]
    NeutralShort,
    #[serde(rename = "NEUTRAL/LONG")]
    NeutralLong,
    #[serde(rename = "LONG")]
    Long,
    #[serde(rename = "STRONG LONG")]
    StrongLong,
}

impl Direction {
    pub fn label(&self) -> &'static str {
        match self {
            Direction::StrongShort => "STRONG SHORT",
            Direction::Short => "SHORT",
            Direction::NeutralShort => "NEUTRAL/SHORT",
            Direction::NeutralLong => "NEUTRAL/LONG",
            Direction::Long => "LONG",
            Direction::StrongLong => "STRONG LONG",
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A direction label paired with a 0-100 sentiment score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Signal {
    pub direction: Direction,
    pub score: u8,
}

// ---------------------------------------------------------------------------
// Tier
// ---------------------------------------------------------------------------

/// Response depth of a signal request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tier {
    #[default]
    Sentiment,
    FullAlpha,
    Premium,
}

impl Tier {
    pub const ALL: [Tier; 3] = [Tier::Sentiment, Tier::FullAlpha, Tier::Premium];

    pub fn as_str(&self) -> &'static str {
        match self {
            Tier::Sentiment => "sentiment",
            Tier::FullAlpha => "fullalpha",
            Tier::Premium => "premium",
        }
    }

    /// Only the base tier grants a free query.
    pub fn has_free_query(&self) -> bool {
        matches!(self, Tier::Sentiment)
    }
}

impl fmt::Display for Tier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unknown tier '{0}' (expected sentiment, fullalpha, or premium)")]
pub struct UnknownTier(pub String);

impl FromStr for Tier {
    type Err = UnknownTier;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "sentiment" => Ok(Tier::Sentiment),
            "fullalpha" | "alpha" => Ok(Tier::FullAlpha),
            "premium" => Ok(Tier::Premium),
            _ => Err(UnknownTier(s.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_tier_parsing() {
        assert_eq!("sentiment".parse::<Tier>().unwrap(), Tier::Sentiment);
        assert_eq!("FullAlpha".parse::<Tier>().unwrap(), Tier::FullAlpha);
        assert_eq!("alpha".parse::<Tier>().unwrap(), Tier::FullAlpha);
        assert_eq!("premium".parse::<Tier>().unwrap(), Tier::Premium);
        assert!("gold".parse::<Tier>().is_err());
    }

    #[test]
    fn test_direction_serializes_as_label() {
        let json = serde_json::to_string(&Direction::NeutralLong).unwrap();
        assert_eq!(json, "\"NEUTRAL/LONG\"");
        assert_eq!(Direction::StrongShort.to_string(), "STRONG SHORT");
    }

    #[test]
    fn test_direction_ordering() {
        assert!(Direction::StrongShort < Direction::Short);
        assert!(Direction::NeutralLong < Direction::Long);
        assert!(Direction::Long < Direction::StrongLong);
    }

    #[test]
    fn test_round_half_away_from_zero() {
        assert_eq!(round_half_away(dec!(0.125), 2), dec!(0.13));
        assert_eq!(round_half_away(dec!(-0.125), 2), dec!(-0.13));
        assert_eq!(round_half_away(dec!(2.344), 2), dec!(2.34));
        assert_eq!(round_half_away(dec!(1.005), 2), dec!(1.01));
    }
}
