use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use hedgealpha_api::{AppState, GatewayConfig};
use hedgealpha_core::assets::{CRYPTO_ASSETS, STOCK_ASSETS};
use hedgealpha_core::Tier;
use hedgealpha_data::MarketData;
use hedgealpha_payments::{Offering, VerificationMode};
use hedgealpha_signals::{classify_change, render_report, ReportContext};
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::{fmt, EnvFilter};

#[derive(Parser)]
#[command(name = "hedgealpha")]
#[command(about = "HedgeAlphaOracle: pay-per-call crypto and stock signals over x402")]
#[command(version)]
struct Cli {
    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, default_value = "info")]
    log_level: String,

    /// Gateway config file (TOML)
    #[arg(short, long, env = "HEDGEALPHA_CONFIG")]
    config: Option<PathBuf>,

    /// Wallet that receives payments
    #[arg(long, env = "WALLET_ADDRESS")]
    wallet_address: Option<String>,

    /// Public base URL advertised in the discovery document
    #[arg(long, env = "BASE_URL")]
    base_url: Option<String>,

    /// Landing page for `GET /`
    #[arg(long, env = "LANDING_URL")]
    landing_url: Option<String>,

    /// Finnhub API token
    #[arg(long, env = "FINNHUB_TOKEN", hide_env_values = true)]
    finnhub_token: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the API server
    Server {
        /// Bind address (defaults to 0.0.0.0:$PORT)
        #[arg(short, long, env = "BIND_ADDR")]
        bind: Option<String>,

        /// Port used when no bind address is given
        #[arg(long, env = "PORT", default_value = "8080")]
        port: u16,

        /// Payment proof check (presence, tx-hash)
        #[arg(long, env = "PAYMENT_VERIFICATION")]
        verification: Option<VerificationMode>,
    },

    /// Fetch a signal and print its report
    Signal {
        /// Asset symbol (e.g. "BTC", "AAPL")
        asset: String,

        /// Tier (sentiment, fullalpha, premium)
        #[arg(short, long, default_value = "sentiment")]
        tier: Tier,

        /// Timeframe label echoed in the report
        #[arg(long, default_value = "1D")]
        timeframe: String,
    },

    /// List supported assets
    Assets,

    /// List offerings and prices
    Pricing,
}

impl Cli {
    /// File config (or defaults) with flag and env overrides applied.
    fn gateway_config(&self) -> Result<GatewayConfig> {
        let mut config = match &self.config {
            Some(path) => GatewayConfig::load(path)?,
            None => GatewayConfig::default(),
        };
        if let Some(wallet) = &self.wallet_address {
            config.wallet_address = wallet.clone();
        }
        if let Some(url) = &self.base_url {
            config.base_url = url.clone();
        }
        if let Some(url) = &self.landing_url {
            config.landing_url = url.clone();
        }
        if let Some(token) = &self.finnhub_token {
            config.upstream.finnhub_token = token.clone();
        }
        Ok(config)
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize tracing
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&cli.log_level));
    fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();

    let mut config = cli.gateway_config()?;

    match cli.command {
        Commands::Server {
            bind,
            port,
            verification,
        } => {
            if let Some(mode) = verification {
                config.verification = mode;
            }
            let bind = bind.unwrap_or_else(|| format!("0.0.0.0:{port}"));
            let market = MarketData::live(&config.upstream)
                .context("failed to build upstream HTTP client")?;
            let state = Arc::new(AppState::new(config, market));
            hedgealpha_api::start_server(state, &bind).await?;
        }
        Commands::Signal {
            asset,
            tier,
            timeframe,
        } => {
            run_signal(&config, &asset, tier, &timeframe).await?;
        }
        Commands::Assets => {
            println!("Crypto ({}):", CRYPTO_ASSETS.len());
            println!("  {}", CRYPTO_ASSETS.join(" "));
            println!("Stocks ({}):", STOCK_ASSETS.len());
            println!("  {}", STOCK_ASSETS.join(" "));
        }
        Commands::Pricing => {
            println!("Offerings (USDC on Base):");
            for offering in Offering::ALL {
                let free = if offering.has_free_query() {
                    "  (first query FREE)"
                } else {
                    ""
                };
                println!(
                    "  {:<12} {:>6}  {}{}",
                    offering.id(),
                    offering.price_display(),
                    offering.resource_path(),
                    free
                );
            }
        }
    }

    Ok(())
}

async fn run_signal(config: &GatewayConfig, asset: &str, tier: Tier, timeframe: &str) -> Result<()> {
    let symbol = asset.trim().to_ascii_uppercase();
    let market = MarketData::live(&config.upstream)?;

    tracing::info!(asset = %symbol, tier = %tier, "Fetching signal");
    let snapshot = market
        .quote(&symbol)
        .await
        .with_context(|| format!("could not fetch price data for {symbol}"))?;

    let signal = classify_change(snapshot.change_24h);
    let report = render_report(&ReportContext {
        snapshot: &snapshot,
        tier,
        timeframe,
        signal,
        free_query: false,
    });

    let sep = "=".repeat(60);
    println!("\n{sep}");
    println!("{report}");
    println!("{sep}");
    println!(
        "{}",
        serde_json::json!({
            "asset": snapshot.symbol,
            "direction": signal.direction,
            "sentimentScore": signal.score,
        })
    );

    Ok(())
}
