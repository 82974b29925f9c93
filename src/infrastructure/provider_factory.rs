//! Provider Factory
//!
//! Builds the price-history client and the auxiliary gauge chain from
//! configuration. The history client is created once and shared between the
//! analysis service and the volatility-index provider, so both draw on the
//! same outbound rate limit.

use std::sync::Arc;
use std::time::Duration;

use tracing::info;

use crate::config::AnalysisConfig;
use crate::domain::repositories::{
    AuxiliaryIndicatorProvider, PriceHistoryProvider, ProviderResult,
};
use crate::infrastructure::auxiliary::{
    CompositeAuxiliaryProvider, FixedPutCallProvider, NoAuxiliaryProvider,
    VolatilityIndexProvider,
};
use crate::infrastructure::yahoo_client::YahooChartClient;
use crate::rate_limit::{create_rate_limiter, RateLimiterConfig};

pub struct Providers {
    pub history: Arc<dyn PriceHistoryProvider>,
    pub auxiliary: Arc<dyn AuxiliaryIndicatorProvider>,
}

pub struct ProviderFactory;

impl ProviderFactory {
    pub fn create(config: &AnalysisConfig) -> ProviderResult<Providers> {
        let limiter = create_rate_limiter(RateLimiterConfig {
            requests_per_minute: config.requests_per_minute,
        });
        let client = YahooChartClient::new(Duration::from_secs(config.fetch_timeout_secs))?
            .with_rate_limiter(limiter);
        let history: Arc<dyn PriceHistoryProvider> = Arc::new(client);

        let auxiliary = Self::create_auxiliary(config, history.clone());

        info!(
            provider = history.name(),
            requests_per_minute = config.requests_per_minute,
            timeout_secs = config.fetch_timeout_secs,
            "Created market data providers"
        );

        Ok(Providers { history, auxiliary })
    }

    /// Auxiliary chain for the configured gauges; `NoAuxiliaryProvider` when
    /// none is configured
    pub fn create_auxiliary(
        config: &AnalysisConfig,
        history: Arc<dyn PriceHistoryProvider>,
    ) -> Arc<dyn AuxiliaryIndicatorProvider> {
        let mut providers: Vec<Arc<dyn AuxiliaryIndicatorProvider>> = Vec::new();

        if let Some(ticker) = &config.volatility_index_ticker {
            info!(ticker = %ticker, "Volatility index gauge enabled");
            providers.push(Arc::new(VolatilityIndexProvider::new(
                history,
                ticker.clone(),
            )));
        }

        if let Some(ratio) = config.put_call_ratio {
            info!(ratio = ratio, "Fixed put/call ratio gauge enabled");
            providers.push(Arc::new(FixedPutCallProvider::new(Some(ratio))));
        }

        if providers.is_empty() {
            info!("No auxiliary gauges configured");
            Arc::new(NoAuxiliaryProvider)
        } else {
            Arc::new(CompositeAuxiliaryProvider::new(providers))
        }
    }
}
