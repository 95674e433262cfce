use async_trait::async_trait;
use chrono::{TimeZone, Utc};
use hedgealpha_core::{FearGreedReading, ProviderError, SentimentProvider};
use reqwest::Client;
use serde::Deserialize;
use tracing::debug;

pub const DEFAULT_BASE_URL: &str = "https://api.alternative.me";

#[derive(Debug, Deserialize)]
struct FngResponse {
    #[serde(default)]
    data: Vec<FngEntry>,
}

/// The API encodes every field as a string.
#[derive(Debug, Deserialize)]
struct FngEntry {
    value: String,
    value_classification: String,
    timestamp: Option<String>,
}

/// Crypto Fear & Greed index from alternative.me.
pub struct FearGreedClient {
    client: Client,
    base_url: String,
}

impl FearGreedClient {
    pub fn new(client: Client, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }
}

#[async_trait]
impl SentimentProvider for FearGreedClient {
    fn name(&self) -> &str {
        "alternative.me"
    }

    async fn fear_greed(&self) -> Result<FearGreedReading, ProviderError> {
        let url = format!("{}/fng/", self.base_url);
        debug!("Fetching Fear & Greed index");

        let body = self
            .client
            .get(&url)
            .query(&[("limit", "1")])
            .send()
            .await
            .map_err(|e| ProviderError::Http(e.to_string()))?
            .error_for_status()
            .map_err(|e| ProviderError::Http(e.to_string()))?
            .bytes()
            .await
            .map_err(|e| ProviderError::Http(e.to_string()))?;

        parse_fng(&body)
    }
}

pub(crate) fn parse_fng(body: &[u8]) -> Result<FearGreedReading, ProviderError> {
    let parsed: FngResponse =
        serde_json::from_slice(body).map_err(|e| ProviderError::Parse(e.to_string()))?;
    let entry = parsed
        .data
        .into_iter()
        .next()
        .ok_or_else(|| ProviderError::NotFound("fear & greed index".to_string()))?;

    let value: u8 = entry
        .value
        .trim()
        .parse()
        .map_err(|_| ProviderError::Parse(format!("invalid index value '{}'", entry.value)))?;
    if value > 100 {
        return Err(ProviderError::Parse(format!("index value {value} out of range")));
    }

    let timestamp = entry
        .timestamp
        .and_then(|t| t.trim().parse::<i64>().ok())
        .and_then(|secs| Utc.timestamp_opt(secs, 0).single());

    Ok(FearGreedReading {
        value,
        classification: entry.value_classification,
        timestamp,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_latest_reading() {
        let body = br#"{"name":"Fear and Greed Index","data":[{"value":"54","value_classification":"Neutral","timestamp":"1700000000","time_until_update":"3600"}],"metadata":{"error":null}}"#;
        let reading = parse_fng(body).unwrap();
        assert_eq!(reading.value, 54);
        assert_eq!(reading.classification, "Neutral");
        assert_eq!(reading.timestamp.unwrap().timestamp(), 1_700_000_000);
    }

    #[test]
    fn test_empty_data_is_not_found() {
        let err = parse_fng(br#"{"data":[]}"#).unwrap_err();
        assert!(matches!(err, ProviderError::NotFound(_)));
    }

    #[test]
    fn test_non_numeric_value_is_parse_error() {
        let body = br#"{"data":[{"value":"high","value_classification":"Greed"}]}"#;
        assert!(matches!(parse_fng(body), Err(ProviderError::Parse(_))));
    }
}
