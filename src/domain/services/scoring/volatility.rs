use crate::domain::services::market_metrics::MarketMetrics;
use crate::domain::services::scoring::buckets::{BucketTable, VOLATILITY_BUCKETS};
use crate::domain::services::scoring::score_calculator::ScoreCalculator;
use crate::domain::services::scoring::weights::Factor;

/// Scores annualized volatility. Low volatility is complacency and scores high.
pub struct VolatilityScoreCalculator {
    pub buckets: BucketTable,
}

impl Default for VolatilityScoreCalculator {
    fn default() -> Self {
        VolatilityScoreCalculator {
            buckets: VOLATILITY_BUCKETS,
        }
    }
}

impl ScoreCalculator for VolatilityScoreCalculator {
    fn factor(&self) -> Factor {
        Factor::Volatility
    }

    fn calculate(&self, metrics: &MarketMetrics) -> Option<u8> {
        Some(self.buckets.score(metrics.volatility))
    }
}
