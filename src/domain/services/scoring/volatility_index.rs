use crate::domain::services::market_metrics::MarketMetrics;
use crate::domain::services::scoring::buckets::{BucketTable, VOLATILITY_INDEX_BUCKETS};
use crate::domain::services::scoring::score_calculator::ScoreCalculator;
use crate::domain::services::scoring::weights::Factor;

/// Scores the market-wide fear gauge level
pub struct VolatilityIndexScoreCalculator {
    pub buckets: BucketTable,
}

impl Default for VolatilityIndexScoreCalculator {
    fn default() -> Self {
        VolatilityIndexScoreCalculator {
            buckets: VOLATILITY_INDEX_BUCKETS,
        }
    }
}

impl ScoreCalculator for VolatilityIndexScoreCalculator {
    fn factor(&self) -> Factor {
        Factor::VolatilityIndex
    }

    fn calculate(&self, metrics: &MarketMetrics) -> Option<u8> {
        metrics
            .volatility_index
            .filter(|v| v.is_finite())
            .map(|v| self.buckets.score(v))
    }
}
