pub mod portfolio;

pub use portfolio::{score_asset, score_portfolio, AssetRisk, PortfolioRisk, RiskLevel};
