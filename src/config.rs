use std::net::SocketAddr;

use crate::domain::entities::market::MarketCatalog;
use crate::domain::services::scoring::{AuxiliaryPolicy, FactorWeights, WeightingScheme};

/// Configuration for an analysis run and the HTTP server around it
#[derive(Debug, Clone, PartialEq)]
pub struct AnalysisConfig {
    /// Market ids analysed when the caller gives no selection
    pub markets: Vec<String>,
    pub lookback_months: u32,
    pub weighting: WeightingScheme,
    /// Set together with `WeightingScheme::Custom`
    pub custom_weights: Option<FactorWeights>,
    pub aux_policy: AuxiliaryPolicy,
    /// Fixed put/call ratio applied to eligible markets; absent when unset
    pub put_call_ratio: Option<f64>,
    /// Ticker of the volatility index; `None` disables the gauge
    pub volatility_index_ticker: Option<String>,
    pub max_concurrent_fetches: usize,
    /// Outbound request budget for the price-history client
    pub requests_per_minute: u32,
    pub fetch_timeout_secs: u64,
    pub bind_addr: SocketAddr,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        AnalysisConfig {
            markets: MarketCatalog::default_selection(),
            lookback_months: 6,
            weighting: WeightingScheme::default(),
            custom_weights: None,
            aux_policy: AuxiliaryPolicy::default(),
            put_call_ratio: None,
            volatility_index_ticker: Some("^VIX".to_string()),
            max_concurrent_fetches: 4,
            requests_per_minute: 60,
            fetch_timeout_secs: 10,
            bind_addr: SocketAddr::from(([127, 0, 0, 1], 3000)),
        }
    }
}

impl AnalysisConfig {
    /// Weights the scorer runs with
    pub fn weights(&self) -> FactorWeights {
        match (self.weighting, self.custom_weights) {
            (WeightingScheme::Custom, Some(weights)) => weights,
            (scheme, _) => FactorWeights::for_scheme(scheme),
        }
    }

    /// Load configuration from environment variables
    pub fn from_env() -> AnalysisConfig {
        AnalysisConfig::from_lookup(|key| std::env::var(key).ok())
    }

    /// Defaults overridden by whatever `lookup` returns. Invalid values are
    /// logged and ignored.
    pub fn from_lookup<F>(lookup: F) -> AnalysisConfig
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = AnalysisConfig::default();

        if let Some(markets) = lookup("SENTIMENT_MARKETS") {
            let selection = parse_market_list(&markets);
            if selection.is_empty() {
                tracing::warn!(
                    "SENTIMENT_MARKETS is empty, using default: {:?}",
                    config.markets
                );
            } else {
                config.markets = selection;
            }
        }

        if let Some(months) = lookup("SENTIMENT_LOOKBACK_MONTHS") {
            match months.trim().parse::<u32>() {
                Ok(value) if (1..=24).contains(&value) => {
                    config.lookback_months = value;
                }
                Ok(value) => {
                    tracing::warn!(
                        "Invalid SENTIMENT_LOOKBACK_MONTHS value: {} (must be between 1 and 24), using default: {}",
                        value, config.lookback_months
                    );
                }
                Err(e) => {
                    tracing::warn!(
                        "Failed to parse SENTIMENT_LOOKBACK_MONTHS '{}': {}, using default: {}",
                        months,
                        e,
                        config.lookback_months
                    );
                }
            }
        }

        if let Some(weighting) = lookup("SENTIMENT_WEIGHTING") {
            match weighting.parse::<WeightingScheme>() {
                Ok(value) => config.weighting = value,
                Err(e) => {
                    tracing::warn!("{}, using default: {:?}", e, config.weighting);
                }
            }
        }

        // Explicit weights override any named scheme
        if let Some(weights) = lookup("SENTIMENT_WEIGHTS") {
            match weights.parse::<FactorWeights>() {
                Ok(value) => {
                    config.weighting = WeightingScheme::Custom;
                    config.custom_weights = Some(value);
                }
                Err(e) => {
                    tracing::warn!(
                        "Invalid SENTIMENT_WEIGHTS '{}': {}, using scheme: {:?}",
                        weights,
                        e,
                        config.weighting
                    );
                }
            }
        }

        if let Some(policy) = lookup("SENTIMENT_AUX_POLICY") {
            match policy.parse::<AuxiliaryPolicy>() {
                Ok(value) => config.aux_policy = value,
                Err(e) => {
                    tracing::warn!("{}, using default: {:?}", e, config.aux_policy);
                }
            }
        }

        if let Some(ratio) = lookup("SENTIMENT_PUT_CALL_RATIO") {
            match ratio.trim().parse::<f64>() {
                Ok(value) if value > 0.0 && value <= 5.0 => {
                    config.put_call_ratio = Some(value);
                }
                _ => {
                    tracing::warn!(
                        "Invalid SENTIMENT_PUT_CALL_RATIO '{}' (must be in (0, 5]), leaving put/call absent",
                        ratio
                    );
                }
            }
        }

        if let Some(ticker) = lookup("SENTIMENT_VOLATILITY_INDEX_TICKER") {
            let ticker = ticker.trim();
            config.volatility_index_ticker =
                if ticker.is_empty() || ticker.eq_ignore_ascii_case("none") {
                    None
                } else {
                    Some(ticker.to_string())
                };
        }

        if let Some(max_fetches) = lookup("SENTIMENT_MAX_CONCURRENT_FETCHES") {
            match max_fetches.trim().parse::<usize>() {
                Ok(value) if (1..=16).contains(&value) => {
                    config.max_concurrent_fetches = value;
                }
                _ => {
                    tracing::warn!(
                        "Invalid SENTIMENT_MAX_CONCURRENT_FETCHES '{}' (must be between 1 and 16), using default: {}",
                        max_fetches, config.max_concurrent_fetches
                    );
                }
            }
        }

        if let Some(rpm) = lookup("SENTIMENT_REQUESTS_PER_MINUTE") {
            match rpm.trim().parse::<u32>() {
                Ok(value) if value > 0 => config.requests_per_minute = value,
                _ => {
                    tracing::warn!(
                        "Invalid SENTIMENT_REQUESTS_PER_MINUTE '{}', using default: {}",
                        rpm,
                        config.requests_per_minute
                    );
                }
            }
        }

        if let Some(timeout) = lookup("SENTIMENT_FETCH_TIMEOUT_SECS") {
            match timeout.trim().parse::<u64>() {
                Ok(value) if (1..=120).contains(&value) => config.fetch_timeout_secs = value,
                _ => {
                    tracing::warn!(
                        "Invalid SENTIMENT_FETCH_TIMEOUT_SECS '{}', using default: {}",
                        timeout,
                        config.fetch_timeout_secs
                    );
                }
            }
        }

        if let Some(addr) = lookup("SENTIMENT_BIND_ADDR") {
            match addr.trim().parse::<SocketAddr>() {
                Ok(value) => config.bind_addr = value,
                Err(e) => {
                    tracing::warn!(
                        "Failed to parse SENTIMENT_BIND_ADDR '{}': {}, using default: {}",
                        addr,
                        e,
                        config.bind_addr
                    );
                }
            }
        }

        config
    }
}

/// Split a comma-separated market list, dropping blanks
pub fn parse_market_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}
