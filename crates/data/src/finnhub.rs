//! Finnhub equity quotes via `/quote`.
//!
//! The `c` (current) field is zero or absent for unknown tickers; that is
//! treated as an invalid price rather than a real quote.

use crate::to_decimal;
use async_trait::async_trait;
use hedgealpha_core::{AssetClass, PriceProvider, PriceSnapshot, ProviderError};
use reqwest::Client;
use rust_decimal::Decimal;
use serde::Deserialize;
use tracing::debug;

pub const DEFAULT_BASE_URL: &str = "https://finnhub.io/api/v1";

#[derive(Debug, Deserialize)]
struct QuoteResponse {
    /// Current price
    c: Option<f64>,
    /// Previous close
    pc: Option<f64>,
}

pub struct FinnhubClient {
    client: Client,
    base_url: String,
    token: String,
}

impl FinnhubClient {
    pub fn new(client: Client, base_url: impl Into<String>, token: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            token: token.into(),
        }
    }
}

#[async_trait]
impl PriceProvider for FinnhubClient {
    fn name(&self) -> &str {
        "finnhub"
    }

    async fn quote(&self, symbol: &str) -> Result<PriceSnapshot, ProviderError> {
        let symbol = symbol.to_ascii_uppercase();
        let url = format!("{}/quote", self.base_url);
        debug!(symbol = %symbol, "Fetching Finnhub quote");

        let body = self
            .client
            .get(&url)
            .query(&[("symbol", symbol.as_str()), ("token", self.token.as_str())])
            .send()
            .await
            .map_err(|e| ProviderError::Http(e.to_string()))?
            .error_for_status()
            .map_err(|e| ProviderError::Http(e.to_string()))?
            .bytes()
            .await
            .map_err(|e| ProviderError::Http(e.to_string()))?;

        parse_quote(&symbol, &body)
    }
}

pub(crate) fn parse_quote(symbol: &str, body: &[u8]) -> Result<PriceSnapshot, ProviderError> {
    let quote: QuoteResponse =
        serde_json::from_slice(body).map_err(|e| ProviderError::Parse(e.to_string()))?;

    let price = match quote.c {
        Some(c) if c > 0.0 => to_decimal(c, "c")?,
        _ => return Err(ProviderError::InvalidPrice(symbol.to_string())),
    };
    let change_24h = match quote.pc {
        Some(pc) if pc > 0.0 => {
            let prev = to_decimal(pc, "pc")?;
            (price - prev) / prev * Decimal::ONE_HUNDRED
        }
        _ => Decimal::ZERO,
    };

    Ok(PriceSnapshot {
        symbol: symbol.to_string(),
        asset_class: AssetClass::Stock,
        price,
        change_24h,
        market_cap: Decimal::ZERO,
        volume_24h: None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_change_from_previous_close() {
        let body = br#"{"c":210.0,"d":10.0,"dp":5.0,"h":211.0,"l":199.0,"o":200.0,"pc":200.0,"t":1700000000}"#;
        let snap = parse_quote("AAPL", body).unwrap();
        assert_eq!(snap.asset_class, AssetClass::Stock);
        assert_eq!(snap.price, dec!(210));
        assert_eq!(snap.change_24h, dec!(5));
        assert_eq!(snap.market_cap, Decimal::ZERO);
    }

    #[test]
    fn test_zero_current_price_is_sentinel() {
        let body = br#"{"c":0,"d":null,"dp":null,"h":0,"l":0,"o":0,"pc":0,"t":0}"#;
        assert!(matches!(
            parse_quote("NOPE", body),
            Err(ProviderError::InvalidPrice(_))
        ));
    }

    #[test]
    fn test_missing_previous_close_means_flat() {
        let snap = parse_quote("MSFT", br#"{"c":415.5}"#).unwrap();
        assert_eq!(snap.change_24h, Decimal::ZERO);
    }
}
