use serde::Serialize;
use tracing::debug;

use crate::domain::services::market_metrics::MarketMetrics;
use crate::domain::services::scoring::buckets::NEUTRAL_SUB_SCORE;
use crate::domain::services::scoring::{
    AuxiliaryPolicy, Factor, FactorWeights, MomentumScoreCalculator, PerformanceScoreCalculator,
    PutCallScoreCalculator, ScoreCalculator, VolatilityIndexScoreCalculator,
    VolatilityScoreCalculator, VolumeScoreCalculator,
};

/// Score returned when no metrics could be extracted
pub const NEUTRAL_SCORE: u8 = 50;

/// Sub-scores of every dimension. `None` on an auxiliary dimension means the
/// gauge was absent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ComponentScores {
    pub momentum: u8,
    pub volatility: u8,
    pub performance: u8,
    pub volume: u8,
    pub put_call: Option<u8>,
    pub volatility_index: Option<u8>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ScoreBreakdown {
    pub components: ComponentScores,
    /// Weighted sum before clamping and rounding
    pub composite: f64,
    pub score: u8,
}

/// Combines component sub-scores into the risk-love percentile
pub struct RiskLoveScorer {
    weights: FactorWeights,
    policy: AuxiliaryPolicy,
    calculators: Vec<Box<dyn ScoreCalculator>>,
}

impl Default for RiskLoveScorer {
    fn default() -> Self {
        RiskLoveScorer::new(FactorWeights::default(), AuxiliaryPolicy::default())
    }
}

impl RiskLoveScorer {
    pub fn new(weights: FactorWeights, policy: AuxiliaryPolicy) -> Self {
        RiskLoveScorer {
            weights,
            policy,
            calculators: vec![
                Box::new(MomentumScoreCalculator::default()),
                Box::new(VolatilityScoreCalculator::default()),
                Box::new(PerformanceScoreCalculator::default()),
                Box::new(VolumeScoreCalculator::default()),
                Box::new(PutCallScoreCalculator::default()),
                Box::new(VolatilityIndexScoreCalculator::default()),
            ],
        }
    }

    pub fn weights(&self) -> &FactorWeights {
        &self.weights
    }

    pub fn policy(&self) -> AuxiliaryPolicy {
        self.policy
    }

    /// Risk-love score in [0, 100]; 50 when metrics are absent
    pub fn score(&self, metrics: Option<&MarketMetrics>) -> u8 {
        match metrics {
            Some(m) => self.breakdown(m).score,
            None => {
                debug!("No metrics available, using neutral score");
                NEUTRAL_SCORE
            }
        }
    }

    pub fn breakdown(&self, metrics: &MarketMetrics) -> ScoreBreakdown {
        let mut components = ComponentScores {
            momentum: NEUTRAL_SUB_SCORE,
            volatility: NEUTRAL_SUB_SCORE,
            performance: NEUTRAL_SUB_SCORE,
            volume: NEUTRAL_SUB_SCORE,
            put_call: None,
            volatility_index: None,
        };
        let mut weighted_sum = 0.0;
        let mut applied_weight = 0.0;

        for calc in &self.calculators {
            let factor = calc.factor();
            let weight = self.weights.weight(factor);
            // Zero-weight gauges contribute nothing and are reported absent
            let sub_score = if factor.is_auxiliary() && weight == 0.0 {
                None
            } else {
                calc.calculate(metrics)
            };

            match factor {
                Factor::Momentum => components.momentum = sub_score.unwrap_or(NEUTRAL_SUB_SCORE),
                Factor::Volatility => {
                    components.volatility = sub_score.unwrap_or(NEUTRAL_SUB_SCORE)
                }
                Factor::Performance => {
                    components.performance = sub_score.unwrap_or(NEUTRAL_SUB_SCORE)
                }
                Factor::Volume => components.volume = sub_score.unwrap_or(NEUTRAL_SUB_SCORE),
                Factor::PutCall => components.put_call = sub_score,
                Factor::VolatilityIndex => components.volatility_index = sub_score,
            }

            let effective = match (sub_score, self.policy) {
                (Some(s), _) => Some(s),
                (None, AuxiliaryPolicy::NeutralFill) => Some(NEUTRAL_SUB_SCORE),
                (None, AuxiliaryPolicy::Renormalize) => None,
            };
            if let Some(s) = effective {
                weighted_sum += f64::from(s) * weight;
                applied_weight += weight;
            }

            debug!(
                factor = calc.name(),
                sub_score = ?sub_score,
                weight = weight,
                "Calculated component sub-score"
            );
        }

        let composite = match self.policy {
            AuxiliaryPolicy::Renormalize if applied_weight > 0.0 => {
                weighted_sum * self.weights.total() / applied_weight
            }
            _ => weighted_sum,
        };
        let score = round_composite(composite);

        debug!(
            composite = composite,
            score = score,
            policy = ?self.policy,
            "Completed risk-love composite"
        );

        ScoreBreakdown {
            components,
            composite,
            score,
        }
    }
}

/// Clamp to [0, 100] and round half-to-even. Floating noise is snapped first
/// so that sums like 51.4999999999 land on the tie they represent.
pub fn round_composite(composite: f64) -> u8 {
    if !composite.is_finite() {
        return NEUTRAL_SCORE;
    }
    let clamped = composite.clamp(0.0, 100.0);
    let snapped = (clamped * 1e9).round() / 1e9;
    snapped.round_ties_even() as u8
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::services::scoring::test_support::neutral_metrics;
    use crate::domain::services::scoring::WeightingScheme;

    fn scorer(scheme: WeightingScheme, policy: AuxiliaryPolicy) -> RiskLoveScorer {
        RiskLoveScorer::new(FactorWeights::for_scheme(scheme), policy)
    }

    fn four_factor() -> RiskLoveScorer {
        scorer(WeightingScheme::FourFactor, AuxiliaryPolicy::NeutralFill)
    }

    fn flat_market() -> MarketMetrics {
        MarketMetrics {
            volatility: 0.0,
            ..neutral_metrics()
        }
    }

    #[test]
    fn test_absent_metrics_score_neutral() {
        assert_eq!(RiskLoveScorer::default().score(None), 50);
        assert_eq!(four_factor().score(None), 50);
    }

    #[test]
    fn test_flat_market_four_factor() {
        // 55*0.30 + 85*0.25 + 50*0.25 + 50*0.20 = 60.25
        let breakdown = four_factor().breakdown(&flat_market());
        assert_eq!(breakdown.components.momentum, 55);
        assert_eq!(breakdown.components.volatility, 85);
        assert_eq!(breakdown.components.performance, 50);
        assert_eq!(breakdown.components.volume, 50);
        assert!((breakdown.composite - 60.25).abs() < 1e-9);
        assert_eq!(breakdown.score, 60);
    }

    #[test]
    fn test_flat_market_six_factor_without_auxiliary() {
        // 55*0.20 + 85*0.15 + 50*0.15 + 50*0.15 + 50*0.15 + 50*0.20 = 56.25
        let breakdown = RiskLoveScorer::default().breakdown(&flat_market());
        assert_eq!(breakdown.components.put_call, None);
        assert_eq!(breakdown.components.volatility_index, None);
        assert!((breakdown.composite - 56.25).abs() < 1e-9);
        assert_eq!(breakdown.score, 56);
    }

    #[test]
    fn test_neutral_inputs_land_in_neutral_band() {
        // volatility 20% sits in the 50 bucket: 16.5 + 12.5 + 12.5 + 10 = 51.5
        let score = four_factor().score(Some(&neutral_metrics()));
        assert!((41..=60).contains(&score), "score {}", score);
        assert_eq!(score, 52);
    }

    #[test]
    fn test_six_factor_with_auxiliary() {
        let metrics = MarketMetrics {
            put_call_ratio: Some(1.1),
            volatility_index: Some(35.0),
            ..neutral_metrics()
        };
        // 55*0.2 + 50*0.15 + 50*0.15 + 50*0.15 + 20*0.15 + 15*0.2 = 39.5
        let breakdown = RiskLoveScorer::default().breakdown(&metrics);
        assert_eq!(breakdown.components.put_call, Some(20));
        assert_eq!(breakdown.components.volatility_index, Some(15));
        assert!((breakdown.composite - 39.5).abs() < 1e-9);
        assert_eq!(breakdown.score, 40);
    }

    #[test]
    fn test_four_factor_ignores_auxiliary_values() {
        let with_aux = MarketMetrics {
            put_call_ratio: Some(0.3),
            volatility_index: Some(9.0),
            ..flat_market()
        };
        assert_eq!(
            four_factor().score(Some(&with_aux)),
            four_factor().score(Some(&flat_market()))
        );

        let breakdown = four_factor().breakdown(&with_aux);
        assert_eq!(breakdown.components.put_call, None);
        assert_eq!(breakdown.components.volatility_index, None);
        assert!((breakdown.composite - 60.25).abs() < 1e-9);
    }

    #[test]
    fn test_zero_weight_gauge_with_renormalize() {
        let weights = FactorWeights::custom(0.2, 0.2, 0.2, 0.2, 0.2, 0.0).unwrap();
        let scorer = RiskLoveScorer::new(weights, AuxiliaryPolicy::Renormalize);
        let metrics = MarketMetrics {
            put_call_ratio: Some(1.1),
            volatility_index: Some(35.0),
            ..flat_market()
        };
        // (55 + 85 + 50 + 50 + 20) * 0.2 = 52
        let breakdown = scorer.breakdown(&metrics);
        assert_eq!(breakdown.components.put_call, Some(20));
        assert_eq!(breakdown.components.volatility_index, None);
        assert!((breakdown.composite - 52.0).abs() < 1e-9);
        assert_eq!(breakdown.score, 52);
    }

    #[test]
    fn test_renormalize_drops_absent_auxiliary() {
        let renorm = scorer(WeightingScheme::SixFactor, AuxiliaryPolicy::Renormalize);
        // (55*0.2 + 85*0.15 + 50*0.15 + 50*0.15) / 0.65 = 38.75 / 0.65
        let breakdown = renorm.breakdown(&flat_market());
        assert!((breakdown.composite - 38.75 / 0.65).abs() < 1e-9);
        assert_eq!(breakdown.score, 60);
    }

    #[test]
    fn test_renormalize_matches_neutral_fill_when_all_present() {
        let metrics = MarketMetrics {
            put_call_ratio: Some(0.7),
            volatility_index: Some(18.0),
            ..flat_market()
        };
        let fill = RiskLoveScorer::default().breakdown(&metrics);
        let renorm = scorer(WeightingScheme::SixFactor, AuxiliaryPolicy::Renormalize)
            .breakdown(&metrics);
        assert!((fill.composite - renorm.composite).abs() < 1e-9);
        assert_eq!(fill.score, renorm.score);
    }

    #[test]
    fn test_extreme_euphoria_and_panic() {
        let euphoric = MarketMetrics {
            momentum_60d: 30.0,
            volatility: 5.0,
            volume_trend: 80.0,
            perf_1m: 30.0,
            perf_3m: 40.0,
            put_call_ratio: Some(0.4),
            volatility_index: Some(11.0),
            ..neutral_metrics()
        };
        let panicked = MarketMetrics {
            momentum_60d: -30.0,
            volatility: 50.0,
            volume_trend: -40.0,
            perf_1m: -25.0,
            perf_3m: -35.0,
            put_call_ratio: Some(1.3),
            volatility_index: Some(45.0),
            ..neutral_metrics()
        };
        let scorer = RiskLoveScorer::default();
        assert!(scorer.score(Some(&euphoric)) > 80);
        assert!(scorer.score(Some(&panicked)) <= 20);
    }

    #[test]
    fn test_composite_always_in_range() {
        let scorer = RiskLoveScorer::default();
        for momentum in [-100.0, 0.0, 100.0] {
            for volatility in [0.0, 20.0, 200.0] {
                for pc in [None, Some(0.0), Some(5.0)] {
                    let metrics = MarketMetrics {
                        momentum_60d: momentum,
                        volatility,
                        put_call_ratio: pc,
                        ..neutral_metrics()
                    };
                    assert!(scorer.score(Some(&metrics)) <= 100);
                }
            }
        }
    }

    #[test]
    fn test_round_composite_clamps() {
        assert_eq!(round_composite(-12.0), 0);
        assert_eq!(round_composite(140.0), 100);
        assert_eq!(round_composite(f64::NAN), 50);
    }

    #[test]
    fn test_round_composite_ties_to_even() {
        assert_eq!(round_composite(60.25), 60);
        assert_eq!(round_composite(51.5), 52);
        assert_eq!(round_composite(52.5), 52);
        assert_eq!(round_composite(52.500001), 53);
        assert_eq!(round_composite(0.15 * 10.0 + 51.0), 52);
    }
}
