use hedgealpha_core::Tier;
use rust_decimal::Decimal;
use serde::Serialize;

/// Network name shown in 402 responses.
pub const NETWORK: &str = "base-mainnet";
/// CAIP-2 id of Base mainnet, used in the discovery document.
pub const CHAIN_ID: &str = "eip155:8453";
pub const ASSET: &str = "USDC";
/// USDC contract on Base.
pub const ASSET_CONTRACT: &str = "0x833589fCD6eDb6E08f4c7C32D4f71b54bdA02913";
pub const FACILITATOR: &str = "https://x402.org/facilitator";
/// USDC has six decimals.
const USDC_SCALE: u32 = 6;

/// A paid resource and its price.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Offering {
    Signal(Tier),
    FearGreed,
    WhaleAlert,
    PortfolioRisk,
}

impl Offering {
    pub const ALL: [Offering; 6] = [
        Offering::Signal(Tier::Sentiment),
        Offering::Signal(Tier::FullAlpha),
        Offering::Signal(Tier::Premium),
        Offering::FearGreed,
        Offering::WhaleAlert,
        Offering::PortfolioRisk,
    ];

    pub fn id(&self) -> &'static str {
        match self {
            Offering::Signal(tier) => tier.as_str(),
            Offering::FearGreed => "fear-greed",
            Offering::WhaleAlert => "whale-alert",
            Offering::PortfolioRisk => "risk-score",
        }
    }

    /// Price in USDC base units.
    pub fn price_units(&self) -> u64 {
        match self {
            Offering::Signal(Tier::Sentiment) => 50_000,
            Offering::Signal(Tier::FullAlpha) => 100_000,
            Offering::Signal(Tier::Premium) => 200_000,
            Offering::FearGreed => 20_000,
            Offering::WhaleAlert => 150_000,
            Offering::PortfolioRisk => 250_000,
        }
    }

    pub fn price_usd(&self) -> Decimal {
        Decimal::from_i128_with_scale(i128::from(self.price_units()), USDC_SCALE)
    }

    /// e.g. `$0.05`
    pub fn price_display(&self) -> String {
        format!("${:.2}", self.price_usd())
    }

    /// Only the base sentiment tier grants a free query.
    pub fn has_free_query(&self) -> bool {
        matches!(self, Offering::Signal(tier) if tier.has_free_query())
    }

    /// Route template relative to the public base URL.
    pub fn resource_path(&self) -> String {
        match self {
            Offering::Signal(tier) => format!("/signal/:asset?tier={}", tier.as_str()),
            Offering::FearGreed => "/market/fear-greed".to_string(),
            Offering::WhaleAlert => "/market/whale-alert/:asset".to_string(),
            Offering::PortfolioRisk => "/portfolio/risk-score?assets=BTC,ETH,AAPL".to_string(),
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            Offering::Signal(Tier::Sentiment) => {
                "Sentiment signal for crypto or stocks. First query FREE."
            }
            Offering::Signal(Tier::FullAlpha) => {
                "Full alpha signal with entry zone, target and stop loss."
            }
            Offering::Signal(Tier::Premium) => {
                "Premium signal with full thesis and risk assessment."
            }
            Offering::FearGreed => "Crypto Fear & Greed index reading.",
            Offering::WhaleAlert => "Whale activity heuristic from 24h volume and price action.",
            Offering::PortfolioRisk => "Equal-weight risk score for up to 10 assets.",
        }
    }
}

/// Where payments go. Built once from configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaymentTerms {
    pub pay_to: String,
}

/// Body of an HTTP 402 response.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentChallenge {
    pub error: &'static str,
    pub message: String,
    pub price: String,
    pub pay_to: String,
    pub network: &'static str,
    pub asset: &'static str,
    pub facilitator: &'static str,
    pub instructions: &'static str,
}

impl PaymentTerms {
    pub fn new(pay_to: impl Into<String>) -> Self {
        Self {
            pay_to: pay_to.into(),
        }
    }

    /// Build the 402 body. `reason` overrides the default message when a proof
    /// was supplied but rejected.
    pub fn challenge(&self, offering: Offering, reason: Option<String>) -> PaymentChallenge {
        PaymentChallenge {
            error: "Payment Required",
            message: reason
                .unwrap_or_else(|| "This endpoint requires payment via x402 protocol".to_string()),
            price: offering.price_display(),
            pay_to: self.pay_to.clone(),
            network: NETWORK,
            asset: ASSET,
            facilitator: FACILITATOR,
            instructions: "Send USDC on Base network and include transaction signature in x-payment-signature header",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_price_display() {
        assert_eq!(Offering::Signal(Tier::Sentiment).price_display(), "$0.05");
        assert_eq!(Offering::Signal(Tier::FullAlpha).price_display(), "$0.10");
        assert_eq!(Offering::Signal(Tier::Premium).price_display(), "$0.20");
        assert_eq!(Offering::PortfolioRisk.price_display(), "$0.25");
    }

    #[test]
    fn test_only_sentiment_is_free() {
        let free: Vec<_> = Offering::ALL.iter().filter(|o| o.has_free_query()).collect();
        assert_eq!(free, vec![&Offering::Signal(Tier::Sentiment)]);
    }

    #[test]
    fn test_offering_ids_are_unique() {
        let mut ids: Vec<_> = Offering::ALL.iter().map(|o| o.id()).collect();
        ids.sort();
        ids.dedup();
        assert_eq!(ids.len(), Offering::ALL.len());
    }

    #[test]
    fn test_challenge_body() {
        let terms = PaymentTerms::new("0xabc");
        let body = serde_json::to_value(terms.challenge(Offering::WhaleAlert, None)).unwrap();
        assert_eq!(body["error"], "Payment Required");
        assert_eq!(body["price"], "$0.15");
        assert_eq!(body["payTo"], "0xabc");
        assert_eq!(body["network"], "base-mainnet");
        assert_eq!(body["asset"], "USDC");
    }
}
