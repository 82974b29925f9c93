use crate::domain::services::market_metrics::MarketMetrics;
use crate::domain::services::scoring::buckets::{BucketTable, VOLUME_BUCKETS};
use crate::domain::services::scoring::score_calculator::ScoreCalculator;
use crate::domain::services::scoring::weights::Factor;

/// Scores the volume trend. A volume surge only reads as euphoria when it
/// comes with rising prices; otherwise the ordinary buckets apply.
pub struct VolumeScoreCalculator {
    /// Volume trend (%) above which a surge is considered
    pub surge_volume_trend: f64,
    /// 1-month performance (%) a surge must coincide with
    pub surge_min_perf_1m: f64,
    pub surge_score: u8,
    pub buckets: BucketTable,
}

impl Default for VolumeScoreCalculator {
    fn default() -> Self {
        VolumeScoreCalculator {
            surge_volume_trend: 50.0,
            surge_min_perf_1m: 5.0,
            surge_score: 80,
            buckets: VOLUME_BUCKETS,
        }
    }
}

impl ScoreCalculator for VolumeScoreCalculator {
    fn factor(&self) -> Factor {
        Factor::Volume
    }

    fn calculate(&self, metrics: &MarketMetrics) -> Option<u8> {
        if metrics.volume_trend > self.surge_volume_trend
            && metrics.perf_1m > self.surge_min_perf_1m
        {
            return Some(self.surge_score);
        }
        Some(self.buckets.score(metrics.volume_trend))
    }
}
