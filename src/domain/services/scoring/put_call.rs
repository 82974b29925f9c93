use crate::domain::services::market_metrics::MarketMetrics;
use crate::domain::services::scoring::buckets::{BucketTable, PUT_CALL_BUCKETS};
use crate::domain::services::scoring::score_calculator::ScoreCalculator;
use crate::domain::services::scoring::weights::Factor;

/// Scores the options put/call ratio. Heavy put buying is fear and scores low.
pub struct PutCallScoreCalculator {
    pub buckets: BucketTable,
}

impl Default for PutCallScoreCalculator {
    fn default() -> Self {
        PutCallScoreCalculator {
            buckets: PUT_CALL_BUCKETS,
        }
    }
}

impl ScoreCalculator for PutCallScoreCalculator {
    fn factor(&self) -> Factor {
        Factor::PutCall
    }

    fn calculate(&self, metrics: &MarketMetrics) -> Option<u8> {
        metrics
            .put_call_ratio
            .filter(|r| r.is_finite())
            .map(|r| self.buckets.score(r))
    }
}
