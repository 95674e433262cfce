use hedgealpha_core::PriceSnapshot;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

/// How unusual the last 24h of trading looks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum WhaleLevel {
    Normal,
    Elevated,
    High,
}

/// Which side large flows appear to be on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum FlowBias {
    Accumulation,
    Distribution,
    Balanced,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WhaleAlert {
    pub level: WhaleLevel,
    pub flow: FlowBias,
    /// Volume / market cap, when both are known.
    pub turnover: Option<Decimal>,
    pub basis: &'static str,
}

/// Heuristic whale-activity flag.
///
/// Uses 24h turnover (volume over market cap) when the provider reports both,
/// otherwise falls back on the size of the price move.
pub fn assess_whale_activity(snapshot: &PriceSnapshot) -> WhaleAlert {
    let turnover = match snapshot.volume_24h {
        Some(vol) if vol > Decimal::ZERO && snapshot.market_cap > Decimal::ZERO => {
            Some((vol / snapshot.market_cap).round_dp(4))
        }
        _ => None,
    };

    let (level, basis) = match turnover {
        Some(t) if t >= dec!(0.20) => (WhaleLevel::High, "turnover"),
        Some(t) if t >= dec!(0.10) => (WhaleLevel::Elevated, "turnover"),
        Some(_) => (WhaleLevel::Normal, "turnover"),
        None => {
            let abs = snapshot.change_24h.abs();
            let level = if abs > dec!(5) {
                WhaleLevel::High
            } else if abs > dec!(2) {
                WhaleLevel::Elevated
            } else {
                WhaleLevel::Normal
            };
            (level, "price_change")
        }
    };

    let flow = if snapshot.change_24h > Decimal::ZERO {
        FlowBias::Accumulation
    } else if snapshot.change_24h < Decimal::ZERO {
        FlowBias::Distribution
    } else {
        FlowBias::Balanced
    };

    WhaleAlert {
        level,
        flow,
        turnover,
        basis,
    }
}
