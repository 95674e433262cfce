use crate::offerings::Offering;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PaymentError {
    #[error("Payment proof missing")]
    Missing,
    #[error("Payment proof rejected: {0}")]
    Malformed(String),
}

/// Decides whether a submitted payment proof unlocks an offering.
pub trait PaymentVerifier: Send + Sync {
    fn name(&self) -> &str;

    /// Check `proof` for `offering`. Callers pass `None` when no proof was sent.
    fn verify(&self, proof: Option<&str>, offering: Offering) -> Result<(), PaymentError>;
}

/// Accepts any non-empty proof.
///
/// Nothing is checked against the chain: the string's presence is the payment.
#[derive(Debug, Default, Clone, Copy)]
pub struct PresenceVerifier;

impl PaymentVerifier for PresenceVerifier {
    fn name(&self) -> &str {
        "presence"
    }

    fn verify(&self, proof: Option<&str>, _offering: Offering) -> Result<(), PaymentError> {
        match proof {
            Some(p) if !p.is_empty() => Ok(()),
            _ => Err(PaymentError::Missing),
        }
    }
}

/// Requires the proof to look like an EVM transaction hash (`0x` + 64 hex chars).
///
/// This is a shape check only; the transaction itself is not looked up.
#[derive(Debug, Default, Clone, Copy)]
pub struct TxHashFormatVerifier;

impl PaymentVerifier for TxHashFormatVerifier {
    fn name(&self) -> &str {
        "tx-hash"
    }

    fn verify(&self, proof: Option<&str>, _offering: Offering) -> Result<(), PaymentError> {
        let proof = match proof.map(str::trim) {
            Some(p) if !p.is_empty() => p,
            _ => return Err(PaymentError::Missing),
        };
        let hex = proof
            .strip_prefix("0x")
            .or_else(|| proof.strip_prefix("0X"))
            .ok_or_else(|| PaymentError::Malformed("expected 0x-prefixed transaction hash".into()))?;
        if hex.len() != 64 {
            return Err(PaymentError::Malformed(format!(
                "expected 64 hex characters, got {}",
                hex.len()
            )));
        }
        if !hex.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(PaymentError::Malformed(
                "transaction hash contains non-hex characters".into(),
            ));
        }
        Ok(())
    }
}

/// Which verifier the gateway runs with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum VerificationMode {
    #[default]
    Presence,
    TxHash,
}

impl VerificationMode {
    pub fn build(&self) -> Arc<dyn PaymentVerifier> {
        match self {
            VerificationMode::Presence => Arc::new(PresenceVerifier),
            VerificationMode::TxHash => Arc::new(TxHashFormatVerifier),
        }
    }
}

impl fmt::Display for VerificationMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            VerificationMode::Presence => f.write_str("presence"),
            VerificationMode::TxHash => f.write_str("tx-hash"),
        }
    }
}

impl FromStr for VerificationMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "presence" => Ok(VerificationMode::Presence),
            "tx-hash" | "txhash" => Ok(VerificationMode::TxHash),
            other => Err(format!(
                "unknown verification mode '{other}' (expected presence or tx-hash)"
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hedgealpha_core::Tier;

    const PREMIUM: Offering = Offering::Signal(Tier::Premium);

    #[test]
    fn test_presence_accepts_any_non_empty_value() {
        let v = PresenceVerifier;
        assert!(v.verify(Some("anything"), PREMIUM).is_ok());
        assert!(v.verify(Some("x"), Offering::PortfolioRisk).is_ok());
        assert_eq!(v.verify(Some(""), PREMIUM), Err(PaymentError::Missing));
        assert_eq!(v.verify(None, PREMIUM), Err(PaymentError::Missing));
    }

    #[test]
    fn test_tx_hash_shape() {
        let v = TxHashFormatVerifier;
        let good = format!("0x{}", "ab".repeat(32));
        assert!(v.verify(Some(&good), PREMIUM).is_ok());
        assert!(matches!(
            v.verify(Some("anything"), PREMIUM),
            Err(PaymentError::Malformed(_))
        ));
        assert!(matches!(
            v.verify(Some("0x1234"), PREMIUM),
            Err(PaymentError::Malformed(_))
        ));
        let bad_chars = format!("0x{}", "zz".repeat(32));
        assert!(matches!(
            v.verify(Some(&bad_chars), PREMIUM),
            Err(PaymentError::Malformed(_))
        ));
        assert_eq!(v.verify(Some("  "), PREMIUM), Err(PaymentError::Missing));
    }

    #[test]
    fn test_mode_parsing() {
        assert_eq!("presence".parse::<VerificationMode>().unwrap(), VerificationMode::Presence);
        assert_eq!("TX-HASH".parse::<VerificationMode>().unwrap(), VerificationMode::TxHash);
        assert!("chain".parse::<VerificationMode>().is_err());
        assert_eq!(VerificationMode::TxHash.build().name(), "tx-hash");
    }
}
