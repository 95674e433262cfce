use crate::to_decimal;
use async_trait::async_trait;
use hedgealpha_core::assets::coingecko_id;
use hedgealpha_core::{AssetClass, PriceProvider, PriceSnapshot, ProviderError};
use reqwest::Client;
use rust_decimal::Decimal;
use serde::Deserialize;
use std::collections::HashMap;
use tracing::debug;

pub const DEFAULT_BASE_URL: &str = "https://api.coingecko.com/api/v3";

/// One entry of the `/simple/price` response, keyed by CoinGecko id.
#[derive(Debug, Deserialize)]
struct SimplePrice {
    usd: Option<f64>,
    usd_market_cap: Option<f64>,
    usd_24h_vol: Option<f64>,
    usd_24h_change: Option<f64>,
}

/// CoinGecko-backed crypto quotes via `/simple/price`.
pub struct CoinGeckoClient {
    client: Client,
    base_url: String,
}

impl CoinGeckoClient {
    pub fn new(client: Client, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }
}

#[async_trait]
impl PriceProvider for CoinGeckoClient {
    fn name(&self) -> &str {
        "coingecko"
    }

    async fn quote(&self, symbol: &str) -> Result<PriceSnapshot, ProviderError> {
        let id = coingecko_id(symbol)
            .ok_or_else(|| ProviderError::UnsupportedSymbol(symbol.to_string()))?;
        let url = format!("{}/simple/price", self.base_url);
        debug!(symbol, id, "Fetching CoinGecko quote");

        let body = self
            .client
            .get(&url)
            .query(&[
                ("ids", id),
                ("vs_currencies", "usd"),
                ("include_24hr_change", "true"),
                ("include_market_cap", "true"),
                ("include_24hr_vol", "true"),
            ])
            .header("accept", "application/json")
            .send()
            .await
            .map_err(|e| ProviderError::Http(e.to_string()))?
            .error_for_status()
            .map_err(|e| ProviderError::Http(e.to_string()))?
            .bytes()
            .await
            .map_err(|e| ProviderError::Http(e.to_string()))?;

        parse_simple_price(symbol, id, &body)
    }
}

/// Parse a body like `{"bitcoin": {"usd": 67000.0, "usd_24h_change": 2.3}}`.
pub(crate) fn parse_simple_price(
    symbol: &str,
    id: &str,
    body: &[u8],
) -> Result<PriceSnapshot, ProviderError> {
    let parsed: HashMap<String, SimplePrice> =
        serde_json::from_slice(body).map_err(|e| ProviderError::Parse(e.to_string()))?;
    let entry = parsed
        .get(id)
        .ok_or_else(|| ProviderError::NotFound(symbol.to_string()))?;

    let price = match entry.usd {
        Some(p) if p > 0.0 => to_decimal(p, "usd")?,
        _ => return Err(ProviderError::InvalidPrice(symbol.to_string())),
    };
    let change_24h = entry
        .usd_24h_change
        .map(|c| to_decimal(c, "usd_24h_change"))
        .transpose()?
        .unwrap_or(Decimal::ZERO);
    let market_cap = entry
        .usd_market_cap
        .map(|c| to_decimal(c, "usd_market_cap"))
        .transpose()?
        .unwrap_or(Decimal::ZERO);
    let volume_24h = entry
        .usd_24h_vol
        .map(|v| to_decimal(v, "usd_24h_vol"))
        .transpose()?;

    Ok(PriceSnapshot {
        symbol: symbol.to_ascii_uppercase(),
        asset_class: AssetClass::Crypto,
        price,
        change_24h,
        market_cap,
        volume_24h,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_parse_full_entry() {
        let body = br#"{"ethereum":{"usd":3300.0,"usd_market_cap":396000000000.0,"usd_24h_vol":15000000000.0,"usd_24h_change":1.0}}"#;
        let snap = parse_simple_price("eth", "ethereum", body).unwrap();
        assert_eq!(snap.symbol, "ETH");
        assert_eq!(snap.asset_class, AssetClass::Crypto);
        assert_eq!(snap.price, dec!(3300));
        assert_eq!(snap.change_24h, dec!(1));
        assert_eq!(snap.market_cap, dec!(396000000000));
        assert_eq!(snap.volume_24h, Some(dec!(15000000000)));
    }

    #[test]
    fn test_missing_optional_fields_default() {
        let body = br#"{"bitcoin":{"usd":67000.5}}"#;
        let snap = parse_simple_price("BTC", "bitcoin", body).unwrap();
        assert_eq!(snap.change_24h, Decimal::ZERO);
        assert_eq!(snap.market_cap, Decimal::ZERO);
        assert!(snap.volume_24h.is_none());
    }

    #[test]
    fn test_missing_id_is_not_found() {
        let body = br#"{"bitcoin":{"usd":67000.5}}"#;
        let err = parse_simple_price("ETH", "ethereum", body).unwrap_err();
        assert!(matches!(err, ProviderError::NotFound(_)));
    }

    #[test]
    fn test_zero_or_missing_price_is_invalid() {
        let zero = br#"{"bitcoin":{"usd":0}}"#;
        assert!(matches!(
            parse_simple_price("BTC", "bitcoin", zero),
            Err(ProviderError::InvalidPrice(_))
        ));
        let missing = br#"{"bitcoin":{"usd_24h_change":1.5}}"#;
        assert!(matches!(
            parse_simple_price("BTC", "bitcoin", missing),
            Err(ProviderError::InvalidPrice(_))
        ));
    }

    #[test]
    fn test_garbage_body_is_parse_error() {
        let err = parse_simple_price("BTC", "bitcoin", b"<html>rate limited</html>").unwrap_err();
        assert!(matches!(err, ProviderError::Parse(_)));
    }
}
