use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use hedgealpha_payments::PaymentChallenge;
use serde::Serialize;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("{0} not supported.")]
    UnsupportedAsset(String),
    #[error("Could not fetch price data for {0}")]
    PriceUnavailable(String),
    #[error("Could not fetch {0}")]
    UpstreamUnavailable(String),
    #[error("Payment Required")]
    PaymentRequired(Box<PaymentChallenge>),
    #[error("{0}")]
    BadRequest(String),
}

#[derive(Serialize)]
struct ErrorBody {
    success: bool,
    error: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self {
            ApiError::UnsupportedAsset(_)
            | ApiError::PriceUnavailable(_)
            | ApiError::UpstreamUnavailable(_) => StatusCode::NOT_FOUND,
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::PaymentRequired(challenge) => {
                return (StatusCode::PAYMENT_REQUIRED, Json(challenge)).into_response();
            }
        };
        let body = Json(ErrorBody {
            success: false,
            error: self.to_string(),
        });
        (status, body).into_response()
    }
}

pub type ApiResult<T> = Result<T, ApiError>;
