//! Market Data Provider Traits
//!
//! The scoring engine is pure; everything it needs from the outside world
//! comes through these two traits. Adapters live in `infrastructure`, and
//! tests substitute in-memory implementations.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::domain::entities::market::Market;
use crate::domain::errors::ProviderError;
use crate::domain::value_objects::PriceBar;

pub type ProviderResult<T> = Result<T, ProviderError>;

/// Optional fear/greed gauges for one market
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct AuxiliaryIndicators {
    pub put_call_ratio: Option<f64>,
    pub volatility_index: Option<f64>,
}

impl AuxiliaryIndicators {
    pub fn absent() -> Self {
        AuxiliaryIndicators::default()
    }

    pub fn is_empty(&self) -> bool {
        self.put_call_ratio.is_none() && self.volatility_index.is_none()
    }

    /// Fill gaps in `self` with values from `other`
    pub fn or(self, other: AuxiliaryIndicators) -> Self {
        AuxiliaryIndicators {
            put_call_ratio: self.put_call_ratio.or(other.put_call_ratio),
            volatility_index: self.volatility_index.or(other.volatility_index),
        }
    }
}

/// Source of chronological daily price history
#[async_trait]
pub trait PriceHistoryProvider: Send + Sync {
    /// Fetch bars for `ticker` covering the last `lookback_months` months,
    /// oldest first. An empty vector is a valid answer.
    async fn fetch_history(
        &self,
        ticker: &str,
        lookback_months: u32,
    ) -> ProviderResult<Vec<PriceBar>>;

    fn name(&self) -> &str;
}

/// Source of auxiliary sentiment gauges
#[async_trait]
pub trait AuxiliaryIndicatorProvider: Send + Sync {
    /// Market-wide gauges, taken once per analysis run before any market is
    /// evaluated. The caller owns the reading for that run; implementations
    /// must not cache it for later runs.
    async fn snapshot(&self) -> ProviderResult<AuxiliaryIndicators> {
        Ok(AuxiliaryIndicators::absent())
    }

    /// Gauges specific to `market`
    async fn indicators(&self, market: &Market) -> ProviderResult<AuxiliaryIndicators>;
}
