pub mod coingecko;
pub mod fear_greed;
pub mod finnhub;

use hedgealpha_core::assets;
use hedgealpha_core::{
    AssetClass, FearGreedReading, PriceProvider, PriceSnapshot, ProviderError, SentimentProvider,
};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;

pub use coingecko::CoinGeckoClient;
pub use fear_greed::FearGreedClient;
pub use finnhub::FinnhubClient;

/// Convert an upstream float into a `Decimal`, rejecting NaN/infinity.
pub(crate) fn to_decimal(value: f64, field: &str) -> Result<Decimal, ProviderError> {
    Decimal::try_from(value)
        .map_err(|_| ProviderError::Parse(format!("field '{field}' is not a finite number")))
}

/// Where and how to reach the upstream APIs.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct UpstreamConfig {
    pub coingecko_base_url: String,
    pub finnhub_base_url: String,
    pub finnhub_token: String,
    pub fear_greed_base_url: String,
    /// Per-request timeout for outbound calls.
    pub timeout_secs: u64,
}

impl Default for UpstreamConfig {
    fn default() -> Self {
        Self {
            coingecko_base_url: coingecko::DEFAULT_BASE_URL.to_string(),
            finnhub_base_url: finnhub::DEFAULT_BASE_URL.to_string(),
            finnhub_token: "demo".to_string(),
            fear_greed_base_url: fear_greed::DEFAULT_BASE_URL.to_string(),
            timeout_secs: 10,
        }
    }
}

/// Routes quote requests to the provider for the symbol's market.
#[derive(Clone)]
pub struct MarketData {
    crypto: Arc<dyn PriceProvider>,
    stocks: Arc<dyn PriceProvider>,
    sentiment: Arc<dyn SentimentProvider>,
}

impl MarketData {
    pub fn new(
        crypto: Arc<dyn PriceProvider>,
        stocks: Arc<dyn PriceProvider>,
        sentiment: Arc<dyn SentimentProvider>,
    ) -> Self {
        Self {
            crypto,
            stocks,
            sentiment,
        }
    }

    /// Build the live CoinGecko / Finnhub / alternative.me stack sharing one HTTP client.
    pub fn live(config: &UpstreamConfig) -> Result<Self, ProviderError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .user_agent(concat!("hedgealpha/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| ProviderError::Http(e.to_string()))?;

        Ok(Self::new(
            Arc::new(CoinGeckoClient::new(
                client.clone(),
                config.coingecko_base_url.clone(),
            )),
            Arc::new(FinnhubClient::new(
                client.clone(),
                config.finnhub_base_url.clone(),
                config.finnhub_token.clone(),
            )),
            Arc::new(FearGreedClient::new(
                client,
                config.fear_greed_base_url.clone(),
            )),
        ))
    }

    pub fn provider_for(&self, class: AssetClass) -> &dyn PriceProvider {
        match class {
            AssetClass::Crypto => self.crypto.as_ref(),
            AssetClass::Stock => self.stocks.as_ref(),
        }
    }

    /// Fetch a quote for any supported symbol.
    pub async fn quote(&self, symbol: &str) -> Result<PriceSnapshot, ProviderError> {
        let class = assets::classify(symbol)
            .ok_or_else(|| ProviderError::UnsupportedSymbol(symbol.to_string()))?;
        self.provider_for(class).quote(symbol).await
    }

    pub async fn fear_greed(&self) -> Result<FearGreedReading, ProviderError> {
        self.sentiment.fear_greed().await
    }
}
