use anyhow::Context;
use hedgealpha_data::UpstreamConfig;
use hedgealpha_payments::VerificationMode;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

pub const DEFAULT_WALLET: &str = "0x3278657Fd9013D48692C146Bb7FC730e67EAa192";
pub const DEFAULT_BASE_URL: &str = "https://hedgealphaoracle-production.up.railway.app";
pub const DEFAULT_LANDING_URL: &str = "https://nwright38-ops.github.io/HedgeAlphaOracle";

/// Gateway settings, loadable from TOML. Missing keys fall back to defaults.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GatewayConfig {
    /// Address payments are sent to.
    pub wallet_address: String,
    /// Public URL advertised in the discovery document.
    pub base_url: String,
    /// Where `GET /` redirects.
    pub landing_url: String,
    pub free_tier_ttl_secs: u64,
    pub free_tier_capacity: usize,
    pub verification: VerificationMode,
    pub upstream: UpstreamConfig,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            wallet_address: DEFAULT_WALLET.to_string(),
            base_url: DEFAULT_BASE_URL.to_string(),
            landing_url: DEFAULT_LANDING_URL.to_string(),
            free_tier_ttl_secs: 24 * 60 * 60,
            free_tier_capacity: 100_000,
            verification: VerificationMode::default(),
            upstream: UpstreamConfig::default(),
        }
    }
}

impl GatewayConfig {
    pub fn from_toml_str(s: &str) -> anyhow::Result<Self> {
        toml::from_str(s).context("invalid gateway config")
    }

    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config file {}", path.display()))?;
        Self::from_toml_str(&raw)
    }

    pub fn free_tier_ttl(&self) -> Duration {
        Duration::from_secs(self.free_tier_ttl_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let cfg = GatewayConfig::from_toml_str(
            r#"
            wallet_address = "0xfeed"
            verification = "tx-hash"

            [upstream]
            finnhub_token = "live-token"
            "#,
        )
        .unwrap();
        assert_eq!(cfg.wallet_address, "0xfeed");
        assert_eq!(cfg.verification, VerificationMode::TxHash);
        assert_eq!(cfg.upstream.finnhub_token, "live-token");
        assert_eq!(cfg.upstream.timeout_secs, 10);
        assert_eq!(cfg.base_url, DEFAULT_BASE_URL);
        assert_eq!(cfg.free_tier_ttl(), Duration::from_secs(86_400));
    }

    #[test]
    fn test_rejects_bad_verification_mode() {
        assert!(GatewayConfig::from_toml_str(r#"verification = "chain""#).is_err());
    }
}
