use crate::models::AssetClass;

/// Crypto symbols served through CoinGecko.
pub const CRYPTO_ASSETS: [&str; 20] = [
    "BTC", "ETH", "SOL", "BNB", "XRP", "ADA", "AVAX", "DOGE", "DOT", "MATIC", "LINK", "UNI", "LTC",
    "ATOM", "BCH", "SHIB", "TRX", "XMR", "USDT", "USDC",
];

/// Equity symbols served through Finnhub.
pub const STOCK_ASSETS: [&str; 20] = [
    "AAPL", "MSFT", "GOOGL", "AMZN", "NVDA", "META", "TSLA", "BRK-B", "V", "JNJ", "WMT", "JPM",
    "PG", "MA", "HD", "DIS", "BAC", "ADBE", "NFLX", "CRM",
];

const STABLECOINS: [&str; 2] = ["USDT", "USDC"];

/// Resolve which market a symbol belongs to. Case-insensitive.
pub fn classify(symbol: &str) -> Option<AssetClass> {
    let upper = symbol.trim().to_ascii_uppercase();
    if CRYPTO_ASSETS.contains(&upper.as_str()) {
        Some(AssetClass::Crypto)
    } else if STOCK_ASSETS.contains(&upper.as_str()) {
        Some(AssetClass::Stock)
    } else {
        None
    }
}

pub fn is_stablecoin(symbol: &str) -> bool {
    STABLECOINS.contains(&symbol.to_ascii_uppercase().as_str())
}

/// Map a crypto ticker to its CoinGecko asset id.
pub fn coingecko_id(symbol: &str) -> Option<&'static str> {
    match symbol.to_ascii_uppercase().as_str() {
        "BTC" => Some("bitcoin"),
        "ETH" => Some("ethereum"),
        "SOL" => Some("solana"),
        "BNB" => Some("binancecoin"),
        "XRP" => Some("ripple"),
        "ADA" => Some("cardano"),
        "AVAX" => Some("avalanche-2"),
        "DOGE" => Some("dogecoin"),
        "DOT" => Some("polkadot"),
        "MATIC" => Some("matic-network"),
        "LINK" => Some("chainlink"),
        "UNI" => Some("uniswap"),
        "LTC" => Some("litecoin"),
        "ATOM" => Some("cosmos"),
        "BCH" => Some("bitcoin-cash"),
        "SHIB" => Some("shiba-inu"),
        "TRX" => Some("tron"),
        "XMR" => Some("monero"),
        // Stables
        "USDT" => Some("tether"),
        "USDC" => Some("usd-coin"),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_asset_sets_are_disjoint() {
        for sym in CRYPTO_ASSETS {
            assert!(!STOCK_ASSETS.contains(&sym), "{sym} listed as both crypto and stock");
        }
    }

    #[test]
    fn test_classify_never_crosses_lists() {
        for sym in CRYPTO_ASSETS {
            assert_eq!(classify(sym), Some(AssetClass::Crypto));
        }
        for sym in STOCK_ASSETS {
            assert_eq!(classify(sym), Some(AssetClass::Stock));
        }
    }

    #[test]
    fn test_classify_is_case_insensitive() {
        assert_eq!(classify("btc"), Some(AssetClass::Crypto));
        assert_eq!(classify("brk-b"), Some(AssetClass::Stock));
        assert_eq!(classify("PEPE"), None);
        assert_eq!(classify(""), None);
    }

    #[test]
    fn test_every_crypto_asset_has_coingecko_id() {
        for sym in CRYPTO_ASSETS {
            assert!(coingecko_id(sym).is_some(), "missing CoinGecko id for {sym}");
        }
        assert_eq!(coingecko_id("avax"), Some("avalanche-2"));
        assert!(coingecko_id("AAPL").is_none());
    }

    #[test]
    fn test_stablecoins() {
        assert!(is_stablecoin("usdc"));
        assert!(!is_stablecoin("BTC"));
    }
}
