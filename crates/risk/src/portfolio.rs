use hedgealpha_core::assets::is_stablecoin;
use hedgealpha_core::{round_half_away, AssetClass, PriceSnapshot};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::Serialize;
use tracing::debug;

/// Stablecoins are pinned at this score regardless of the day's move.
const STABLECOIN_RISK: u8 = 5;
/// Each percentage point of 24h movement adds this much risk.
const VOLATILITY_WEIGHT: Decimal = dec!(8);

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum RiskLevel {
    Low,
    Moderate,
    High,
    Extreme,
}

impl RiskLevel {
    pub fn from_score(score: u8) -> Self {
        match score {
            0..=34 => RiskLevel::Low,
            35..=59 => RiskLevel::Moderate,
            60..=79 => RiskLevel::High,
            _ => RiskLevel::Extreme,
        }
    }
}

/// Risk contribution of a single holding.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AssetRisk {
    pub symbol: String,
    pub asset_type: AssetClass,
    #[serde(with = "rust_decimal::serde::float")]
    pub change_24h: Decimal,
    pub score: u8,
}

/// Equal-weight risk summary for a basket of assets.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PortfolioRisk {
    pub score: u8,
    pub level: RiskLevel,
    /// Share of holdings that are crypto, in percent.
    #[serde(with = "rust_decimal::serde::float")]
    pub crypto_allocation: Decimal,
    pub assets: Vec<AssetRisk>,
}

fn base_risk(class: AssetClass) -> Decimal {
    match class {
        AssetClass::Crypto => dec!(30),
        AssetClass::Stock => dec!(15),
    }
}

pub fn score_asset(snapshot: &PriceSnapshot) -> AssetRisk {
    let score = if is_stablecoin(&snapshot.symbol) {
        STABLECOIN_RISK
    } else {
        let raw = base_risk(snapshot.asset_class) + snapshot.change_24h.abs() * VOLATILITY_WEIGHT;
        raw.min(dec!(100)).round().to_u8().unwrap_or(100)
    };

    AssetRisk {
        symbol: snapshot.symbol.clone(),
        asset_type: snapshot.asset_class,
        change_24h: snapshot.change_24h_display(),
        score,
    }
}

/// Score a basket. Returns `None` for an empty basket.
pub fn score_portfolio(snapshots: &[PriceSnapshot]) -> Option<PortfolioRisk> {
    if snapshots.is_empty() {
        return None;
    }

    let assets: Vec<AssetRisk> = snapshots.iter().map(score_asset).collect();
    let n = Decimal::from(assets.len());
    let total: Decimal = assets.iter().map(|a| Decimal::from(a.score)).sum();
    let score = (total / n).round().to_u8().unwrap_or(100);

    let crypto_count = assets
        .iter()
        .filter(|a| a.asset_type == AssetClass::Crypto)
        .count();
    let crypto_allocation =
        round_half_away(Decimal::from(crypto_count) / n * Decimal::ONE_HUNDRED, 2);

    let level = RiskLevel::from_score(score);
    debug!(assets = assets.len(), score, ?level, "Scored portfolio");

    Some(PortfolioRisk {
        score,
        level,
        crypto_allocation,
        assets,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn snap(symbol: &str, class: AssetClass, change: Decimal) -> PriceSnapshot {
        PriceSnapshot {
            symbol: symbol.to_string(),
            asset_class: class,
            price: dec!(100),
            change_24h: change,
            market_cap: Decimal::ZERO,
            volume_24h: None,
        }
    }

    #[test]
    fn test_asset_scores() {
        assert_eq!(score_asset(&snap("BTC", AssetClass::Crypto, dec!(2.5))).score, 50);
        assert_eq!(score_asset(&snap("AAPL", AssetClass::Stock, dec!(-1))).score, 23);
        assert_eq!(score_asset(&snap("USDT", AssetClass::Crypto, dec!(0.4))).score, 5);
    }

    #[test]
    fn test_asset_score_is_capped() {
        assert_eq!(score_asset(&snap("DOGE", AssetClass::Crypto, dec!(-40))).score, 100);
    }

    #[test]
    fn test_reported_change_rounds_half_away_from_zero() {
        let risk = score_asset(&snap("ETH", AssetClass::Crypto, dec!(0.125)));
        assert_eq!(risk.change_24h, dec!(0.13));
        let risk = score_asset(&snap("AAPL", AssetClass::Stock, dec!(-0.125)));
        assert_eq!(risk.change_24h, dec!(-0.13));
    }

    #[test]
    fn test_portfolio_mean_and_allocation() {
        let basket = vec![
            snap("BTC", AssetClass::Crypto, dec!(2.5)),
            snap("AAPL", AssetClass::Stock, dec!(-1)),
            snap("USDC", AssetClass::Crypto, dec!(0)),
            snap("MSFT", AssetClass::Stock, dec!(0)),
        ];
        let risk = score_portfolio(&basket).unwrap();
        // (50 + 23 + 5 + 15) / 4 = 23.25
        assert_eq!(risk.score, 23);
        assert_eq!(risk.level, RiskLevel::Low);
        assert_eq!(risk.crypto_allocation, dec!(50));
        assert_eq!(risk.assets.len(), 4);
    }

    #[test]
    fn test_empty_portfolio() {
        assert!(score_portfolio(&[]).is_none());
    }

    #[test]
    fn test_level_thresholds() {
        assert_eq!(RiskLevel::from_score(34), RiskLevel::Low);
        assert_eq!(RiskLevel::from_score(35), RiskLevel::Moderate);
        assert_eq!(RiskLevel::from_score(60), RiskLevel::High);
        assert_eq!(RiskLevel::from_score(80), RiskLevel::Extreme);
    }
}
