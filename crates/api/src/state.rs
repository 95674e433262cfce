use crate::config::GatewayConfig;
use crate::error::ApiError;
use crate::extract::Caller;
use hedgealpha_data::MarketData;
use hedgealpha_payments::{
    FreeTierTracker, Offering, PaymentError, PaymentTerms, PaymentVerifier,
};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// How a request was let through the payment gate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Access {
    /// The caller's one free query.
    Free,
    /// A payment proof was accepted.
    Paid,
}

impl Access {
    pub fn is_free(&self) -> bool {
        matches!(self, Access::Free)
    }
}

/// Shared application state accessible by all route handlers.
pub struct AppState {
    pub config: GatewayConfig,
    pub market: MarketData,
    pub terms: PaymentTerms,
    pub verifier: Arc<dyn PaymentVerifier>,
    pub free_tier: FreeTierTracker,
}

impl AppState {
    pub fn new(config: GatewayConfig, market: MarketData) -> Self {
        let verifier = config.verification.build();
        Self::with_verifier(config, market, verifier)
    }

    pub fn with_verifier(
        config: GatewayConfig,
        market: MarketData,
        verifier: Arc<dyn PaymentVerifier>,
    ) -> Self {
        Self {
            terms: PaymentTerms::new(config.wallet_address.clone()),
            free_tier: FreeTierTracker::new(config.free_tier_ttl(), config.free_tier_capacity),
            verifier,
            market,
            config,
        }
    }

    /// Run the payment gate for `offering`.
    ///
    /// An accepted proof never consumes the free query. Without one, the base
    /// tier falls back on the caller's free query before answering 402.
    pub async fn authorize(&self, offering: Offering, caller: &Caller) -> Result<Access, ApiError> {
        let rejection = match self
            .verifier
            .verify(caller.payment_proof.as_deref(), offering)
        {
            Ok(()) => {
                debug!(client = %caller.client_id, offering = offering.id(), "Payment proof accepted");
                return Ok(Access::Paid);
            }
            Err(err) => err,
        };

        if offering.has_free_query() && self.free_tier.try_claim(&caller.client_id).await {
            info!(client = %caller.client_id, offering = offering.id(), "Granted free query");
            return Ok(Access::Free);
        }

        let reason = match rejection {
            PaymentError::Missing => None,
            PaymentError::Malformed(_) => {
                warn!(
                    client = %caller.client_id,
                    verifier = self.verifier.name(),
                    "Rejected payment proof: {}",
                    rejection
                );
                Some(rejection.to_string())
            }
        };
        Err(ApiError::PaymentRequired(Box::new(
            self.terms.challenge(offering, reason),
        )))
    }

    /// Hand back a free query after a failed upstream call.
    pub async fn refund(&self, access: Access, caller: &Caller) {
        if access.is_free() {
            self.free_tier.release(&caller.client_id).await;
        }
    }
}
