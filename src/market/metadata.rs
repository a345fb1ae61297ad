//! Symbol metadata snapshot

use crate::api::{ExchangeInfo, SymbolInfo};
use std::collections::HashMap;

/// Symbol → static description, loaded once when the service starts
#[derive(Debug, Clone, Default)]
pub struct ExchangeMetadata {
    symbols: HashMap<String, SymbolInfo>,
}

impl ExchangeMetadata {
    pub fn from_exchange_info(info: ExchangeInfo) -> Self {
        let symbols = info
            .symbols
            .into_iter()
            .map(|s| (s.symbol.clone(), s))
            .collect();
        Self { symbols }
    }

    pub fn get(&self, symbol: &str) -> Option<&SymbolInfo> {
        self.symbols.get(symbol)
    }

    /// Quote asset of a symbol, if the symbol is known
    pub fn quote_asset(&self, symbol: &str) -> Option<&str> {
        self.symbols.get(symbol).map(|s| s.quote_asset.as_str())
    }

    /// Whether `symbol` is quoted in `quote_asset`
    pub fn is_quoted_in(&self, symbol: &str, quote_asset: &str) -> bool {
        self.quote_asset(symbol) == Some(quote_asset)
    }

    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }
}
