use crate::error::{ApiError, ApiResult};
use crate::extract::Caller;
use crate::state::AppState;
use axum::{
    extract::{Path, Query, State},
    http::{header, StatusCode},
    response::IntoResponse,
    routing::get,
    Json, Router,
};
use chrono::{DateTime, Utc};
use futures_util::future::join_all;
use hedgealpha_core::assets::{self, CRYPTO_ASSETS, STOCK_ASSETS};
use hedgealpha_core::{AssetClass, Direction, Tier};
use hedgealpha_payments::offerings::{ASSET_CONTRACT, CHAIN_ID, NETWORK};
use hedgealpha_payments::Offering;
use hedgealpha_risk::{score_portfolio, PortfolioRisk};
use hedgealpha_signals::{
    assess_whale_activity, classify_change, render_report, FlowBias, ReportContext, RiskGuidance,
    TradeLevels, WhaleLevel,
};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{info, warn};
use uuid::Uuid;

pub const SERVICE_NAME: &str = "HedgeAlphaOracle";
const DEFAULT_TIMEFRAME: &str = "1D";
const MAX_PORTFOLIO_ASSETS: usize = 10;

pub fn api_routes() -> Router<Arc<AppState>> {
    Router::new()
        // Discovery
        .route("/", get(landing))
        .route("/health", get(health_check))
        .route("/.well-known/x402.json", get(x402_discovery))
        // Signals
        .route("/signal/{asset}", get(signal))
        .route("/sentiment/{asset}", get(sentiment_signal))
        .route("/alpha/{asset}", get(alpha_signal))
        .route("/premium/{asset}", get(premium_signal))
        // Market
        .route("/market/fear-greed", get(fear_greed))
        .route("/market/whale-alert/{asset}", get(whale_alert))
        // Portfolio
        .route("/portfolio/risk-score", get(portfolio_risk_score))
}

/// Normalize a path symbol and make sure one of the providers can quote it.
fn supported_asset(raw: &str) -> ApiResult<(String, AssetClass)> {
    let symbol = raw.trim().to_ascii_uppercase();
    match assets::classify(&symbol) {
        Some(class) => Ok((symbol, class)),
        None => Err(ApiError::UnsupportedAsset(symbol)),
    }
}

// ---------------------------------------------------------------------------
// Discovery
// ---------------------------------------------------------------------------

async fn landing(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    (
        StatusCode::FOUND,
        [(header::LOCATION, state.config.landing_url.clone())],
    )
}

async fn health_check(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let pricing: serde_json::Map<String, serde_json::Value> = Offering::ALL
        .iter()
        .map(|o| {
            let label = if o.has_free_query() {
                format!("{} (first FREE)", o.price_display())
            } else {
                o.price_display()
            };
            (o.id().to_string(), serde_json::Value::String(label))
        })
        .collect();

    Json(serde_json::json!({
        "status": "OK",
        "service": SERVICE_NAME,
        "version": env!("CARGO_PKG_VERSION"),
        "wallet": state.config.wallet_address,
        "x402": "enabled",
        "network": NETWORK,
        "verification": state.verifier.name(),
        "freeTier": "1 free sentiment query per user",
        "supportedAssets": {
            "crypto": CRYPTO_ASSETS,
            "stocks": STOCK_ASSETS,
        },
        "pricing": pricing,
    }))
}

async fn x402_discovery(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let base = state.config.base_url.trim_end_matches('/');
    let resources: Vec<_> = Offering::ALL
        .iter()
        .map(|o| {
            serde_json::json!({
                "resource": format!("{}{}", base, o.resource_path()),
                "description": o.description(),
                "method": "GET",
                "scheme": "exact",
                "network": CHAIN_ID,
                "asset": ASSET_CONTRACT,
                "payTo": state.config.wallet_address,
                "maxAmountRequired": o.price_units().to_string(),
                "mimeType": "application/json",
            })
        })
        .collect();

    Json(serde_json::json!({
        "x402Version": 2,
        "name": SERVICE_NAME,
        "description": "Real-time crypto AND stock market signals.",
        "url": base,
        "resources": resources,
    }))
}

// ---------------------------------------------------------------------------
// Signals
// ---------------------------------------------------------------------------

#[derive(Deserialize)]
struct SignalQuery {
    tier: Option<String>,
    timeframe: Option<String>,
}

#[derive(Deserialize)]
struct TimeframeQuery {
    timeframe: Option<String>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct LevelsView {
    #[serde(with = "rust_decimal::serde::float")]
    entry_low: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    entry_high: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    target: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    stop_loss: Decimal,
}

impl From<TradeLevels> for LevelsView {
    fn from(l: TradeLevels) -> Self {
        Self {
            entry_low: l.entry_low,
            entry_high: l.entry_high,
            target: l.target,
            stop_loss: l.stop_loss,
        }
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct PremiumView {
    #[serde(with = "rust_decimal::serde::float")]
    market_cap: Decimal,
    position_size: String,
    risk_reward: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct SignalResponse {
    success: bool,
    id: Uuid,
    asset: String,
    asset_type: AssetClass,
    tier: Tier,
    timeframe: String,
    data: String,
    #[serde(with = "rust_decimal::serde::float")]
    price: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    change_24h: Decimal,
    direction: Direction,
    sentiment_score: u8,
    payment_address: String,
    free_query: bool,
    generated_at: DateTime<Utc>,
    #[serde(flatten)]
    levels: Option<LevelsView>,
    #[serde(flatten)]
    premium: Option<PremiumView>,
}

async fn signal(
    State(state): State<Arc<AppState>>,
    Path(asset): Path<String>,
    Query(query): Query<SignalQuery>,
    caller: Caller,
) -> ApiResult<Json<SignalResponse>> {
    let tier = match query.tier.as_deref() {
        None | Some("") => Tier::default(),
        Some(raw) => raw
            .parse::<Tier>()
            .map_err(|e| ApiError::BadRequest(e.to_string()))?,
    };
    serve_signal(&state, &asset, tier, query.timeframe, &caller).await
}

async fn sentiment_signal(
    State(state): State<Arc<AppState>>,
    Path(asset): Path<String>,
    Query(query): Query<TimeframeQuery>,
    caller: Caller,
) -> ApiResult<Json<SignalResponse>> {
    serve_signal(&state, &asset, Tier::Sentiment, query.timeframe, &caller).await
}

async fn alpha_signal(
    State(state): State<Arc<AppState>>,
    Path(asset): Path<String>,
    Query(query): Query<TimeframeQuery>,
    caller: Caller,
) -> ApiResult<Json<SignalResponse>> {
    serve_signal(&state, &asset, Tier::FullAlpha, query.timeframe, &caller).await
}

async fn premium_signal(
    State(state): State<Arc<AppState>>,
    Path(asset): Path<String>,
    Query(query): Query<TimeframeQuery>,
    caller: Caller,
) -> ApiResult<Json<SignalResponse>> {
    serve_signal(&state, &asset, Tier::Premium, query.timeframe, &caller).await
}

async fn serve_signal(
    state: &AppState,
    asset: &str,
    tier: Tier,
    timeframe: Option<String>,
    caller: &Caller,
) -> ApiResult<Json<SignalResponse>> {
    let (symbol, asset_class) = supported_asset(asset)?;
    let access = state.authorize(Offering::Signal(tier), caller).await?;

    let snapshot = match state.market.quote(&symbol).await {
        Ok(s) => s,
        Err(e) => {
            warn!(asset = %symbol, error = %e, "Price fetch failed");
            state.refund(access, caller).await;
            return Err(ApiError::PriceUnavailable(symbol));
        }
    };

    let timeframe = timeframe
        .filter(|t| !t.trim().is_empty())
        .unwrap_or_else(|| DEFAULT_TIMEFRAME.to_string());
    let signal = classify_change(snapshot.change_24h);
    let data = render_report(&ReportContext {
        snapshot: &snapshot,
        tier,
        timeframe: &timeframe,
        signal,
        free_query: access.is_free(),
    });

    let levels = match tier {
        Tier::Sentiment => None,
        Tier::FullAlpha | Tier::Premium => Some(TradeLevels::from_price(snapshot.price).into()),
    };
    let premium = match tier {
        Tier::Premium => {
            let guidance = RiskGuidance::default();
            Some(PremiumView {
                market_cap: snapshot.market_cap,
                position_size: guidance.position_size,
                risk_reward: guidance.risk_reward,
            })
        }
        _ => None,
    };

    info!(
        asset = %symbol,
        tier = %tier,
        direction = %signal.direction,
        free = access.is_free(),
        "Served signal"
    );

    Ok(Json(SignalResponse {
        success: true,
        id: Uuid::new_v4(),
        asset: symbol,
        asset_type: asset_class,
        tier,
        timeframe,
        data,
        price: snapshot.price,
        change_24h: snapshot.change_24h_display(),
        direction: signal.direction,
        sentiment_score: signal.score,
        payment_address: state.config.wallet_address.clone(),
        free_query: access.is_free(),
        generated_at: Utc::now(),
        levels,
        premium,
    }))
}

// ---------------------------------------------------------------------------
// Market
// ---------------------------------------------------------------------------

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct FearGreedResponse {
    success: bool,
    value: u8,
    classification: String,
    timestamp: Option<DateTime<Utc>>,
    payment_address: String,
}

async fn fear_greed(
    State(state): State<Arc<AppState>>,
    caller: Caller,
) -> ApiResult<Json<FearGreedResponse>> {
    let access = state.authorize(Offering::FearGreed, &caller).await?;

    let reading = match state.market.fear_greed().await {
        Ok(r) => r,
        Err(e) => {
            warn!(error = %e, "Fear & Greed fetch failed");
            state.refund(access, &caller).await;
            return Err(ApiError::UpstreamUnavailable("sentiment index data".to_string()));
        }
    };

    Ok(Json(FearGreedResponse {
        success: true,
        value: reading.value,
        classification: reading.classification,
        timestamp: reading.timestamp,
        payment_address: state.config.wallet_address.clone(),
    }))
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct WhaleAlertResponse {
    success: bool,
    asset: String,
    asset_type: AssetClass,
    #[serde(with = "rust_decimal::serde::float")]
    price: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    change_24h: Decimal,
    level: WhaleLevel,
    flow: FlowBias,
    #[serde(with = "rust_decimal::serde::float_option")]
    turnover: Option<Decimal>,
    basis: &'static str,
    payment_address: String,
    generated_at: DateTime<Utc>,
}

async fn whale_alert(
    State(state): State<Arc<AppState>>,
    Path(asset): Path<String>,
    caller: Caller,
) -> ApiResult<Json<WhaleAlertResponse>> {
    let (symbol, asset_class) = supported_asset(&asset)?;
    let access = state.authorize(Offering::WhaleAlert, &caller).await?;

    let snapshot = match state.market.quote(&symbol).await {
        Ok(s) => s,
        Err(e) => {
            warn!(asset = %symbol, error = %e, "Price fetch failed");
            state.refund(access, &caller).await;
            return Err(ApiError::PriceUnavailable(symbol));
        }
    };
    let alert = assess_whale_activity(&snapshot);

    Ok(Json(WhaleAlertResponse {
        success: true,
        asset: symbol,
        asset_type: asset_class,
        price: snapshot.price,
        change_24h: snapshot.change_24h_display(),
        level: alert.level,
        flow: alert.flow,
        turnover: alert.turnover,
        basis: alert.basis,
        payment_address: state.config.wallet_address.clone(),
        generated_at: Utc::now(),
    }))
}

// ---------------------------------------------------------------------------
// Portfolio
// ---------------------------------------------------------------------------

#[derive(Deserialize)]
struct RiskScoreQuery {
    assets: Option<String>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct RiskScoreResponse {
    success: bool,
    #[serde(flatten)]
    risk: PortfolioRisk,
    payment_address: String,
    generated_at: DateTime<Utc>,
}

/// Split `BTC, eth,BTC` into `[BTC, ETH]`, keeping first-seen order.
fn parse_asset_list(raw: &str) -> Vec<String> {
    let mut out: Vec<String> = Vec::new();
    for sym in raw.split(',').map(|s| s.trim().to_ascii_uppercase()) {
        if !sym.is_empty() && !out.contains(&sym) {
            out.push(sym);
        }
    }
    out
}

async fn portfolio_risk_score(
    State(state): State<Arc<AppState>>,
    Query(query): Query<RiskScoreQuery>,
    caller: Caller,
) -> ApiResult<Json<RiskScoreResponse>> {
    let symbols = parse_asset_list(query.assets.as_deref().unwrap_or_default());
    if symbols.is_empty() {
        return Err(ApiError::BadRequest(
            "assets query parameter is required, e.g. ?assets=BTC,ETH,AAPL".to_string(),
        ));
    }
    if symbols.len() > MAX_PORTFOLIO_ASSETS {
        return Err(ApiError::BadRequest(format!(
            "at most {MAX_PORTFOLIO_ASSETS} assets per request, got {}",
            symbols.len()
        )));
    }
    if let Some(unsupported) = symbols.iter().find(|s| assets::classify(s).is_none()) {
        return Err(ApiError::UnsupportedAsset(unsupported.clone()));
    }

    let access = state.authorize(Offering::PortfolioRisk, &caller).await?;

    let results = join_all(symbols.iter().map(|s| state.market.quote(s))).await;
    let mut snapshots = Vec::with_capacity(results.len());
    for (symbol, result) in symbols.iter().zip(results) {
        match result {
            Ok(s) => snapshots.push(s),
            Err(e) => {
                warn!(asset = %symbol, error = %e, "Price fetch failed");
                state.refund(access, &caller).await;
                return Err(ApiError::PriceUnavailable(symbol.clone()));
            }
        }
    }

    let risk = score_portfolio(&snapshots)
        .ok_or_else(|| ApiError::BadRequest("no assets to score".to_string()))?;
    info!(assets = snapshots.len(), score = risk.score, "Served portfolio risk score");

    Ok(Json(RiskScoreResponse {
        success: true,
        risk,
        payment_address: state.config.wallet_address.clone(),
        generated_at: Utc::now(),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_asset_list_dedupes_and_uppercases() {
        assert_eq!(parse_asset_list("btc, ETH,,btc ,aapl"), vec!["BTC", "ETH", "AAPL"]);
        assert!(parse_asset_list(" , ").is_empty());
    }

    #[test]
    fn test_supported_asset() {
        assert_eq!(
            supported_asset(" eth ").unwrap(),
            ("ETH".to_string(), AssetClass::Crypto)
        );
        assert!(matches!(
            supported_asset("pepe"),
            Err(ApiError::UnsupportedAsset(s)) if s == "PEPE"
        ));
    }
}
