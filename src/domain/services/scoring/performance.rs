use crate::domain::services::market_metrics::MarketMetrics;
use crate::domain::services::scoring::buckets::{BucketTable, PERFORMANCE_BUCKETS};
use crate::domain::services::scoring::score_calculator::ScoreCalculator;
use crate::domain::services::scoring::weights::Factor;

/// Scores the mean of 1-month and 3-month returns
pub struct PerformanceScoreCalculator {
    pub buckets: BucketTable,
}

impl Default for PerformanceScoreCalculator {
    fn default() -> Self {
        PerformanceScoreCalculator {
            buckets: PERFORMANCE_BUCKETS,
        }
    }
}

impl ScoreCalculator for PerformanceScoreCalculator {
    fn factor(&self) -> Factor {
        Factor::Performance
    }

    fn calculate(&self, metrics: &MarketMetrics) -> Option<u8> {
        Some(self.buckets.score(metrics.average_performance()))
    }
}
