use crate::domain::services::market_metrics::MarketMetrics;
use crate::domain::services::scoring::buckets::{BucketTable, MOMENTUM_BUCKETS};
use crate::domain::services::scoring::score_calculator::ScoreCalculator;
use crate::domain::services::scoring::weights::Factor;

/// Scores 60-period momentum. Strong momentum reads as a crowded long and
/// scores high (bearish signal).
pub struct MomentumScoreCalculator {
    pub buckets: BucketTable,
}

impl Default for MomentumScoreCalculator {
    fn default() -> Self {
        MomentumScoreCalculator {
            buckets: MOMENTUM_BUCKETS,
        }
    }
}

impl ScoreCalculator for MomentumScoreCalculator {
    fn factor(&self) -> Factor {
        Factor::Momentum
    }

    fn calculate(&self, metrics: &MarketMetrics) -> Option<u8> {
        Some(self.buckets.score(metrics.momentum_60d))
    }
}
