use axum::{
    extract::{ConnectInfo, FromRequestParts, Query},
    http::request::Parts,
};
use serde::Deserialize;
use std::convert::Infallible;
use std::net::SocketAddr;

pub const PAYMENT_HEADER: &str = "x-payment-signature";
pub const PAYMENT_QUERY: &str = "paymentSig";

#[derive(Deserialize)]
struct ProofQuery {
    #[serde(rename = "paymentSig")]
    payment_sig: Option<String>,
}

/// Who is calling and what payment proof they sent, if any.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Caller {
    /// First `x-forwarded-for` hop, else the peer IP, else `"unknown"`.
    pub client_id: String,
    /// `x-payment-signature` header, else the `paymentSig` query parameter.
    pub payment_proof: Option<String>,
}

impl<S> FromRequestParts<S> for Caller
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let forwarded = parts
            .headers
            .get("x-forwarded-for")
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.split(',').next())
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty());
        let client_id = forwarded
            .or_else(|| {
                parts
                    .extensions
                    .get::<ConnectInfo<SocketAddr>>()
                    .map(|ConnectInfo(addr)| addr.ip().to_string())
            })
            .unwrap_or_else(|| "unknown".to_string());

        // Opaque header bytes are accepted as-is, not only visible ASCII.
        let header_proof = parts
            .headers
            .get(PAYMENT_HEADER)
            .map(|v| String::from_utf8_lossy(v.as_bytes()).into_owned())
            .filter(|v| !v.is_empty());
        let payment_proof = header_proof.or_else(|| {
            Query::<ProofQuery>::try_from_uri(&parts.uri)
                .ok()
                .and_then(|Query(q)| q.payment_sig)
                .filter(|v| !v.is_empty())
        });

        Ok(Caller {
            client_id,
            payment_proof,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::{HeaderValue, Request};

    async fn caller_for(req: Request<()>) -> Caller {
        let (mut parts, _) = req.into_parts();
        Caller::from_request_parts(&mut parts, &()).await.unwrap()
    }

    #[tokio::test]
    async fn test_forwarded_for_first_hop() {
        let req = Request::builder()
            .uri("/signal/BTC")
            .header("x-forwarded-for", "9.9.9.9, 10.0.0.1")
            .body(())
            .unwrap();
        let caller = caller_for(req).await;
        assert_eq!(caller.client_id, "9.9.9.9");
        assert!(caller.payment_proof.is_none());
    }

    #[tokio::test]
    async fn test_peer_address_fallback() {
        let mut req = Request::builder().uri("/health").body(()).unwrap();
        req.extensions_mut()
            .insert(ConnectInfo(SocketAddr::from(([127, 0, 0, 1], 4000))));
        assert_eq!(caller_for(req).await.client_id, "127.0.0.1");

        let bare = Request::builder().uri("/health").body(()).unwrap();
        assert_eq!(caller_for(bare).await.client_id, "unknown");
    }

    #[tokio::test]
    async fn test_header_proof_wins_over_query() {
        let req = Request::builder()
            .uri("/signal/BTC?tier=premium&paymentSig=from-query")
            .header(PAYMENT_HEADER, "from-header")
            .body(())
            .unwrap();
        assert_eq!(caller_for(req).await.payment_proof.as_deref(), Some("from-header"));

        let query_only = Request::builder()
            .uri("/signal/BTC?tier=premium&paymentSig=from-query")
            .body(())
            .unwrap();
        assert_eq!(
            caller_for(query_only).await.payment_proof.as_deref(),
            Some("from-query")
        );
    }

    #[tokio::test]
    async fn test_non_ascii_header_proof_is_kept() {
        let mut req = Request::builder().uri("/premium/BTC").body(()).unwrap();
        req.headers_mut().insert(
            PAYMENT_HEADER,
            HeaderValue::from_bytes("proof-café".as_bytes()).unwrap(),
        );
        assert_eq!(caller_for(req).await.payment_proof.as_deref(), Some("proof-café"));

        let mut raw = Request::builder().uri("/premium/BTC").body(()).unwrap();
        raw.headers_mut()
            .insert(PAYMENT_HEADER, HeaderValue::from_bytes(b"sig-\xff").unwrap());
        assert_eq!(caller_for(raw).await.payment_proof.as_deref(), Some("sig-\u{fffd}"));
    }

    #[tokio::test]
    async fn test_empty_proofs_are_absent() {
        let req = Request::builder()
            .uri("/premium/BTC?paymentSig=")
            .header(PAYMENT_HEADER, "")
            .body(())
            .unwrap();
        assert!(caller_for(req).await.payment_proof.is_none());
    }
}
