use serde::{Deserialize, Serialize};

/// An analysable equity market or index, identified by a stable id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Market {
    /// Stable identifier used in selections and report keys (e.g. "Japan")
    pub id: String,
    /// Instrument ticker at the price-history provider (e.g. "^N225")
    pub ticker: String,
    /// Display name
    pub name: String,
    pub region: String,
    /// Whether an options put/call ratio is meaningful for this market
    pub put_call_eligible: bool,
}

impl Market {
    pub fn new(id: &str, ticker: &str, name: &str, region: &str, put_call_eligible: bool) -> Self {
        Market {
            id: id.to_string(),
            ticker: ticker.to_string(),
            name: name.to_string(),
            region: region.to_string(),
            put_call_eligible,
        }
    }
}

/// Immutable list of markets the analysis can run over.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MarketCatalog {
    markets: Vec<Market>,
}

impl MarketCatalog {
    pub fn new(markets: Vec<Market>) -> Self {
        MarketCatalog { markets }
    }

    /// Country and regional equity benchmarks, mostly via US-listed ETFs.
    pub fn standard() -> Self {
        MarketCatalog::new(vec![
            Market::new("Global", "^GSPC", "Global", "Global", true),
            Market::new("Japan", "^N225", "Japan", "Developed Asia", true),
            Market::new("Emerging Markets", "EEM", "Emerging Markets", "EM", true),
            Market::new("Asia ex-Japan", "AAXJ", "Asia ex-Japan", "Asia", false),
            Market::new("China", "FXI", "China", "Asia", false),
            Market::new("India", "INDA", "India", "Asia", false),
            Market::new("Taiwan", "EWT", "Taiwan", "Asia", false),
            Market::new("Korea", "EWY", "Korea", "Asia", false),
            Market::new("Hong Kong", "EWH", "Hong Kong", "Asia", false),
            Market::new("Singapore", "EWS", "Singapore", "Asia", false),
            Market::new("Indonesia", "EIDO", "Indonesia", "EM Asia", false),
            Market::new("Brazil", "EWZ", "Brazil", "Latin America", false),
            Market::new("Mexico", "EWW", "Mexico", "Latin America", false),
            Market::new("South Africa", "EZA", "South Africa", "EMEA", false),
            Market::new("Türkiye", "TUR", "Türkiye", "EMEA", false),
        ])
    }

    /// Selection used when the caller does not name any markets
    pub fn default_selection() -> Vec<String> {
        ["Global", "Japan", "China", "India", "Emerging Markets"]
            .iter()
            .map(|s| s.to_string())
            .collect()
    }

    /// Case-insensitive lookup by id
    pub fn get(&self, id: &str) -> Option<&Market> {
        self.markets
            .iter()
            .find(|m| m.id.eq_ignore_ascii_case(id.trim()))
    }

    pub fn markets(&self) -> &[Market] {
        &self.markets
    }

    pub fn len(&self) -> usize {
        self.markets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.markets.is_empty()
    }
}

impl Default for MarketCatalog {
    fn default() -> Self {
        MarketCatalog::standard()
    }
}
