use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

/// Entry zone, target, and stop derived as fixed multiples of the spot price.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TradeLevels {
    pub entry_low: Decimal,
    pub entry_high: Decimal,
    /// +10% from spot.
    pub target: Decimal,
    /// -5% from spot.
    pub stop_loss: Decimal,
}

impl TradeLevels {
    pub fn from_price(price: Decimal) -> Self {
        Self {
            entry_low: (price * dec!(0.98)).normalize(),
            entry_high: (price * dec!(1.01)).normalize(),
            target: (price * dec!(1.10)).normalize(),
            stop_loss: (price * dec!(0.95)).normalize(),
        }
    }
}

/// Static sizing guidance attached to premium signals.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RiskGuidance {
    pub position_size: String,
    pub risk_reward: String,
}

impl Default for RiskGuidance {
    fn default() -> Self {
        Self {
            position_size: "2-5% max".to_string(),
            risk_reward: "2:1".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_levels_are_exact_multiples() {
        let levels = TradeLevels::from_price(dec!(3300));
        assert_eq!(levels.entry_low, dec!(3234));
        assert_eq!(levels.entry_high, dec!(3333));
        assert_eq!(levels.target, dec!(3630));
        assert_eq!(levels.stop_loss, dec!(3135));
    }

    #[test]
    fn test_levels_keep_fractional_precision() {
        let levels = TradeLevels::from_price(dec!(0.5));
        assert_eq!(levels.entry_low, dec!(0.49));
        assert_eq!(levels.entry_high, dec!(0.505));
        assert_eq!(levels.target, dec!(0.55));
        assert_eq!(levels.stop_loss, dec!(0.475));
    }

    #[test]
    fn test_levels_ordering() {
        let levels = TradeLevels::from_price(dec!(187.42));
        assert!(levels.stop_loss < levels.entry_low);
        assert!(levels.entry_low < levels.entry_high);
        assert!(levels.entry_high < levels.target);
    }
}
