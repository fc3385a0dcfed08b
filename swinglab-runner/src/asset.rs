//! Asset classification and on-disk layout.
//!
//! Artifacts land under `<root>/<AssetClass dir>/<SYMBOL>/features/`.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Quote suffixes that mark a symbol as a crypto pair.
pub const CRYPTO_SUFFIXES: [&str; 6] = ["USDT", "BUSD", "BTC", "ETH", "BNB", "USDC"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AssetClass {
    Crypto,
    Stock,
}

impl AssetClass {
    /// Case-insensitive suffix match; anything else is a stock.
    pub fn detect(symbol: &str) -> Self {
        let upper = symbol.to_ascii_uppercase();
        if CRYPTO_SUFFIXES.iter().any(|s| upper.ends_with(s)) {
            AssetClass::Crypto
        } else {
            AssetClass::Stock
        }
    }

    pub fn dir_name(self) -> &'static str {
        match self {
            AssetClass::Crypto => "Cryptocurrencies",
            AssetClass::Stock => "Stocks",
        }
    }
}

/// `<root>/<class>/<SYMBOL>`
pub fn asset_dir(root: &Path, symbol: &str) -> PathBuf {
    root.join(AssetClass::detect(symbol).dir_name()).join(symbol)
}

/// `<root>/<class>/<SYMBOL>/features`
pub fn features_dir(root: &Path, symbol: &str) -> PathBuf {
    asset_dir(root, symbol).join("features")
}

/// Symbol from an input path's file stem (`data/BTCUSDT.csv` → `BTCUSDT`).
pub fn symbol_from_path(path: &Path) -> Option<String> {
    path.file_stem()
        .and_then(|s| s.to_str())
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn detects_crypto_pairs() {
        assert_eq!(AssetClass::detect("BTCUSDT"), AssetClass::Crypto);
        assert_eq!(AssetClass::detect("ethbtc"), AssetClass::Crypto);
        assert_eq!(AssetClass::detect("SOLUSDC"), AssetClass::Crypto);
    }

    #[test]
    fn everything_else_is_stock() {
        assert_eq!(AssetClass::detect("AAPL"), AssetClass::Stock);
        assert_eq!(AssetClass::detect("SPY"), AssetClass::Stock);
        // suffix, not substring
        assert_eq!(AssetClass::detect("BTCX"), AssetClass::Stock);
    }

    #[test]
    fn layout_follows_class() {
        let root = Path::new("out");
        assert_eq!(
            features_dir(root, "BTCUSDT"),
            Path::new("out/Cryptocurrencies/BTCUSDT/features")
        );
        assert_eq!(features_dir(root, "AAPL"), Path::new("out/Stocks/AAPL/features"));
    }

    #[test]
    fn symbol_from_file_stem() {
        assert_eq!(
            symbol_from_path(Path::new("data/ETHUSDT.csv")).as_deref(),
            Some("ETHUSDT")
        );
        assert_eq!(symbol_from_path(Path::new("/")), None);
    }
}
