use crate::models::*;
use async_trait::async_trait;

// ---------------------------------------------------------------------------
// Price Provider Trait
// ---------------------------------------------------------------------------

/// Errors that can occur while talking to an upstream data API.
#[derive(Debug, thiserror::Error)]
pub enum ProviderError {
    #[error("Unsupported symbol: {0}")]
    UnsupportedSymbol(String),
    #[error("HTTP error: {0}")]
    Http(String),
    #[error("Parse error: {0}")]
    Parse(String),
    #[error("No data for {0}")]
    NotFound(String),
    #[error("Invalid price for {0}")]
    InvalidPrice(String),
}

/// Fetches a single spot quote for a symbol.
#[async_trait]
pub trait PriceProvider: Send + Sync {
    /// Short provider name for logs.
    fn name(&self) -> &str;

    /// Fetch the latest quote for `symbol`.
    async fn quote(&self, symbol: &str) -> Result<PriceSnapshot, ProviderError>;
}

// ---------------------------------------------------------------------------
// Sentiment Provider Trait
// ---------------------------------------------------------------------------

/// Fetches a market-wide sentiment index.
#[async_trait]
pub trait SentimentProvider: Send + Sync {
    fn name(&self) -> &str;

    async fn fear_greed(&self) -> Result<FearGreedReading, ProviderError>;
}
