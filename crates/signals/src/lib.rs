//! Pure signal derivation for the gateway.
//!
//! Everything here is a deterministic function of a [`PriceSnapshot`]; no I/O.
//!
//! [`PriceSnapshot`]: hedgealpha_core::PriceSnapshot

pub mod classifier;
pub mod levels;
pub mod report;
pub mod whale;

pub use classifier::classify_change;
pub use levels::{RiskGuidance, TradeLevels};
pub use report::{render_report, ReportContext, DISCLAIMER};
pub use whale::{assess_whale_activity, FlowBias, WhaleAlert, WhaleLevel};
