use crate::domain::services::market_metrics::MarketMetrics;
use crate::domain::services::scoring::weights::Factor;

/// Common trait for all component sub-score calculators
///
/// Each calculator reads one dimension of `MarketMetrics` and maps it to a
/// contrarian sub-score in [0, 100].
pub trait ScoreCalculator: Send + Sync {
    /// Which composite dimension this calculator feeds
    fn factor(&self) -> Factor;

    /// Calculate the sub-score
    ///
    /// # Returns
    /// `None` when the input dimension is absent (auxiliary gauges only).
    /// The aggregator decides how absence is weighted.
    fn calculate(&self, metrics: &MarketMetrics) -> Option<u8>;

    fn name(&self) -> &str {
        self.factor().name()
    }

    fn validate_score(score: u8) -> bool
    where
        Self: Sized,
    {
        score <= 100
    }
}
