pub mod aggregator;
pub mod buckets;
pub mod momentum;
pub mod performance;
pub mod put_call;
pub mod score_calculator;
pub mod volatility;
pub mod volatility_index;
pub mod volume;
pub mod weights;

pub use aggregator::{ComponentScores, RiskLoveScorer, ScoreBreakdown, NEUTRAL_SCORE};
pub use buckets::{BucketTable, Threshold};
pub use momentum::MomentumScoreCalculator;
pub use performance::PerformanceScoreCalculator;
pub use put_call::PutCallScoreCalculator;
pub use score_calculator::ScoreCalculator;
pub use volatility::VolatilityScoreCalculator;
pub use volatility_index::VolatilityIndexScoreCalculator;
pub use volume::VolumeScoreCalculator;
pub use weights::{AuxiliaryPolicy, Factor, FactorWeights, WeightingScheme};

#[cfg(test)]
pub(crate) mod test_support {
    use crate::domain::services::market_metrics::MarketMetrics;

    /// Metrics that land every price dimension in its middle bucket
    pub fn neutral_metrics() -> MarketMetrics {
        MarketMetrics {
            momentum_20d: 0.0,
            momentum_60d: 0.0,
            volatility: 20.0,
            volume_trend: 0.0,
            perf_1m: 0.0,
            perf_3m: 0.0,
            current_price: 100.0,
            put_call_ratio: None,
            volatility_index: None,
        }
    }
}
