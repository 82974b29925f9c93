//! Auxiliary sentiment gauge providers
//!
//! The volatility index is a single market-wide reading, taken once per
//! analysis run through `snapshot` and owned by that run. The put/call ratio
//! has no free public feed, so it comes from configuration and only applies
//! to markets where it is meaningful.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{debug, warn};

use crate::domain::entities::market::Market;
use crate::domain::errors::ProviderError;
use crate::domain::repositories::{
    AuxiliaryIndicatorProvider, AuxiliaryIndicators, PriceHistoryProvider, ProviderResult,
};

/// Latest close of a volatility index such as `^VIX`
pub struct VolatilityIndexProvider {
    history: Arc<dyn PriceHistoryProvider>,
    ticker: String,
}

impl VolatilityIndexProvider {
    pub fn new(history: Arc<dyn PriceHistoryProvider>, ticker: impl Into<String>) -> Self {
        VolatilityIndexProvider {
            history,
            ticker: ticker.into(),
        }
    }
}

#[async_trait]
impl AuxiliaryIndicatorProvider for VolatilityIndexProvider {
    async fn snapshot(&self) -> ProviderResult<AuxiliaryIndicators> {
        let bars = self.history.fetch_history(&self.ticker, 1).await?;
        let close = bars
            .last()
            .map(|b| b.close)
            .filter(|c| c.is_finite())
            .ok_or_else(|| ProviderError::NoData(self.ticker.clone()))?;

        debug!(ticker = %self.ticker, value = close, "Fetched volatility index");
        Ok(AuxiliaryIndicators {
            put_call_ratio: None,
            volatility_index: Some(close),
        })
    }

    async fn indicators(&self, _market: &Market) -> ProviderResult<AuxiliaryIndicators> {
        Ok(AuxiliaryIndicators::absent())
    }
}

/// Put/call ratio supplied by configuration, applied to eligible markets
pub struct FixedPutCallProvider {
    ratio: Option<f64>,
}

impl FixedPutCallProvider {
    pub fn new(ratio: Option<f64>) -> Self {
        FixedPutCallProvider {
            ratio: ratio.filter(|r| r.is_finite() && *r > 0.0),
        }
    }
}

#[async_trait]
impl AuxiliaryIndicatorProvider for FixedPutCallProvider {
    async fn indicators(&self, market: &Market) -> ProviderResult<AuxiliaryIndicators> {
        Ok(AuxiliaryIndicators {
            put_call_ratio: self.ratio.filter(|_| market.put_call_eligible),
            volatility_index: None,
        })
    }
}

/// Never reports any gauge
pub struct NoAuxiliaryProvider;

#[async_trait]
impl AuxiliaryIndicatorProvider for NoAuxiliaryProvider {
    async fn indicators(&self, _market: &Market) -> ProviderResult<AuxiliaryIndicators> {
        Ok(AuxiliaryIndicators::absent())
    }
}

/// Merges several providers. Earlier providers win when two report the same
/// gauge; a failing provider only loses its own gauges.
pub struct CompositeAuxiliaryProvider {
    providers: Vec<Arc<dyn AuxiliaryIndicatorProvider>>,
}

impl CompositeAuxiliaryProvider {
    pub fn new(providers: Vec<Arc<dyn AuxiliaryIndicatorProvider>>) -> Self {
        CompositeAuxiliaryProvider { providers }
    }
}

#[async_trait]
impl AuxiliaryIndicatorProvider for CompositeAuxiliaryProvider {
    async fn snapshot(&self) -> ProviderResult<AuxiliaryIndicators> {
        let mut merged = AuxiliaryIndicators::absent();
        for provider in &self.providers {
            match provider.snapshot().await {
                Ok(aux) => merged = merged.or(aux),
                Err(e) => warn!(error = %e, "Auxiliary provider snapshot failed"),
            }
        }
        Ok(merged)
    }

    async fn indicators(&self, market: &Market) -> ProviderResult<AuxiliaryIndicators> {
        let mut merged = AuxiliaryIndicators::absent();
        for provider in &self.providers {
            match provider.indicators(market).await {
                Ok(aux) => merged = merged.or(aux),
                Err(e) => {
                    warn!(market = %market.id, error = %e, "Auxiliary provider failed");
                }
            }
        }
        Ok(merged)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::market::MarketCatalog;
    use crate::domain::value_objects::PriceBar;
    use chrono::NaiveDate;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct CountingHistory {
        closes: Vec<f64>,
        calls: AtomicUsize,
    }

    #[async_trait]
    impl PriceHistoryProvider for CountingHistory {
        async fn fetch_history(&self, ticker: &str, _months: u32) -> ProviderResult<Vec<PriceBar>> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self.closes.is_empty() {
                return Err(ProviderError::NoData(ticker.to_string()));
            }
            let date = NaiveDate::from_ymd_opt(2024, 3, 1).unwrap();
            Ok(self
                .closes
                .iter()
                .map(|c| PriceBar::new(date, *c, 0.0).unwrap())
                .collect())
        }

        fn name(&self) -> &str {
            "counting"
        }
    }

    struct FailingProvider;

    #[async_trait]
    impl AuxiliaryIndicatorProvider for FailingProvider {
        async fn snapshot(&self) -> ProviderResult<AuxiliaryIndicators> {
            Err(ProviderError::Network("down".to_string()))
        }

        async fn indicators(&self, _market: &Market) -> ProviderResult<AuxiliaryIndicators> {
            Err(ProviderError::Network("down".to_string()))
        }
    }

    fn market(id: &str) -> Market {
        MarketCatalog::standard().get(id).unwrap().clone()
    }

    #[tokio::test]
    async fn test_volatility_index_fetched_once_per_snapshot() {
        let history = Arc::new(CountingHistory {
            closes: vec![14.0, 16.5],
            calls: AtomicUsize::new(0),
        });
        let provider = VolatilityIndexProvider::new(history.clone(), "^VIX");

        let snapshot = provider.snapshot().await.unwrap();
        assert_eq!(snapshot.volatility_index, Some(16.5));
        assert_eq!(snapshot.put_call_ratio, None);

        for id in ["Global", "Japan", "Brazil"] {
            let aux = provider.indicators(&market(id)).await.unwrap();
            assert!(aux.is_empty());
        }
        assert_eq!(history.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_volatility_index_failed_snapshot_is_error() {
        let history = Arc::new(CountingHistory {
            closes: vec![],
            calls: AtomicUsize::new(0),
        });
        let provider = VolatilityIndexProvider::new(history, "^VIX");
        let err = provider.snapshot().await.unwrap_err();
        assert!(matches!(err, ProviderError::NoData(ref t) if t == "^VIX"));
    }

    #[tokio::test]
    async fn test_fixed_put_call_only_for_eligible_markets() {
        let provider = FixedPutCallProvider::new(Some(0.95));
        for (id, expected) in [
            ("Global", Some(0.95)),
            ("Japan", Some(0.95)),
            ("Emerging Markets", Some(0.95)),
            ("China", None),
            ("Türkiye", None),
        ] {
            let aux = provider.indicators(&market(id)).await.unwrap();
            assert_eq!(aux.put_call_ratio, expected, "market {}", id);
        }
        assert!(provider.snapshot().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_fixed_put_call_rejects_invalid_ratio() {
        let provider = FixedPutCallProvider::new(Some(f64::NAN));
        let aux = provider.indicators(&market("Global")).await.unwrap();
        assert!(aux.is_empty());
    }

    #[tokio::test]
    async fn test_composite_merges_and_survives_failures() {
        let history = Arc::new(CountingHistory {
            closes: vec![31.0],
            calls: AtomicUsize::new(0),
        });
        let composite = CompositeAuxiliaryProvider::new(vec![
            Arc::new(FailingProvider),
            Arc::new(VolatilityIndexProvider::new(history, "^VIX")),
            Arc::new(FixedPutCallProvider::new(Some(1.1))),
        ]);

        let snapshot = composite.snapshot().await.unwrap();
        assert_eq!(snapshot.volatility_index, Some(31.0));
        assert_eq!(snapshot.put_call_ratio, None);

        let global = composite.indicators(&market("Global")).await.unwrap();
        assert_eq!(global.put_call_ratio, Some(1.1));
        assert_eq!(global.or(snapshot).volatility_index, Some(31.0));

        let india = composite.indicators(&market("India")).await.unwrap();
        assert!(india.is_empty());
    }

    #[tokio::test]
    async fn test_no_auxiliary_provider() {
        let aux = NoAuxiliaryProvider.indicators(&market("Global")).await.unwrap();
        assert!(aux.is_empty());
        assert!(NoAuxiliaryProvider.snapshot().await.unwrap().is_empty());
    }
}
