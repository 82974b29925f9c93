use serde::{Deserialize, Serialize};

use crate::domain::errors::ValidationError;

/// Input dimensions of the risk-love composite
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Factor {
    Momentum,
    Volatility,
    Performance,
    Volume,
    PutCall,
    VolatilityIndex,
}

impl Factor {
    pub const ALL: [Factor; 6] = [
        Factor::Momentum,
        Factor::Volatility,
        Factor::Performance,
        Factor::Volume,
        Factor::PutCall,
        Factor::VolatilityIndex,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Factor::Momentum => "momentum",
            Factor::Volatility => "volatility",
            Factor::Performance => "performance",
            Factor::Volume => "volume",
            Factor::PutCall => "put_call",
            Factor::VolatilityIndex => "volatility_index",
        }
    }

    /// Externally sourced gauge that may be absent
    pub fn is_auxiliary(&self) -> bool {
        matches!(self, Factor::PutCall | Factor::VolatilityIndex)
    }
}

/// Named weighting schemes.
///
/// `SixFactor` is canonical. `FourFactor` is the older price-only variant,
/// kept selectable; it ignores auxiliary gauges entirely. `Custom` marks
/// weights supplied through configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WeightingScheme {
    #[default]
    SixFactor,
    FourFactor,
    Custom,
}

impl std::str::FromStr for WeightingScheme {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().replace('-', "_").as_str() {
            "six_factor" | "6" => Ok(WeightingScheme::SixFactor),
            "four_factor" | "4" => Ok(WeightingScheme::FourFactor),
            _ => Err(format!("Unknown weighting scheme: {}", s)),
        }
    }
}

/// What to do with an auxiliary dimension that has no data
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuxiliaryPolicy {
    /// Score it 50 and keep its full weight. Pulls composites toward 50.
    #[default]
    NeutralFill,
    /// Drop it and rescale the remaining weights to sum to 1
    Renormalize,
}

impl std::str::FromStr for AuxiliaryPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().replace('-', "_").as_str() {
            "neutral" | "neutral_fill" => Ok(AuxiliaryPolicy::NeutralFill),
            "renormalize" => Ok(AuxiliaryPolicy::Renormalize),
            _ => Err(format!("Unknown auxiliary policy: {}", s)),
        }
    }
}

/// Per-factor weights. Always non-negative and summing to 1.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FactorWeights {
    pub momentum: f64,
    pub volatility: f64,
    pub performance: f64,
    pub volume: f64,
    pub put_call: f64,
    pub volatility_index: f64,
}

impl FactorWeights {
    const SUM_TOLERANCE: f64 = 1e-6;

    /// Fixed table of a named scheme. `Custom` has no table of its own and
    /// starts from the six-factor weights.
    pub fn for_scheme(scheme: WeightingScheme) -> Self {
        match scheme {
            WeightingScheme::SixFactor | WeightingScheme::Custom => FactorWeights {
                momentum: 0.20,
                volatility: 0.15,
                performance: 0.15,
                volume: 0.15,
                put_call: 0.15,
                volatility_index: 0.20,
            },
            WeightingScheme::FourFactor => FactorWeights {
                momentum: 0.30,
                volatility: 0.25,
                performance: 0.25,
                volume: 0.20,
                put_call: 0.0,
                volatility_index: 0.0,
            },
        }
    }

    /// Validated custom weights
    pub fn custom(
        momentum: f64,
        volatility: f64,
        performance: f64,
        volume: f64,
        put_call: f64,
        volatility_index: f64,
    ) -> Result<Self, ValidationError> {
        let weights = FactorWeights {
            momentum,
            volatility,
            performance,
            volume,
            put_call,
            volatility_index,
        };

        for factor in Factor::ALL {
            let w = weights.weight(factor);
            if !w.is_finite() {
                return Err(ValidationError::MustBeFinite);
            }
            if w < 0.0 {
                return Err(ValidationError::InvalidWeights(format!(
                    "{} weight is negative: {}",
                    factor.name(),
                    w
                )));
            }
        }

        let total = weights.total();
        if (total - 1.0).abs() > Self::SUM_TOLERANCE {
            return Err(ValidationError::InvalidWeights(format!(
                "weights must sum to 1.0, got {}",
                total
            )));
        }

        Ok(weights)
    }

    pub fn weight(&self, factor: Factor) -> f64 {
        match factor {
            Factor::Momentum => self.momentum,
            Factor::Volatility => self.volatility,
            Factor::Performance => self.performance,
            Factor::Volume => self.volume,
            Factor::PutCall => self.put_call,
            Factor::VolatilityIndex => self.volatility_index,
        }
    }

    pub fn total(&self) -> f64 {
        Factor::ALL.iter().map(|f| self.weight(*f)).sum()
    }
}

/// Six comma-separated weights in factor order: momentum, volatility,
/// performance, volume, put/call, volatility index
impl std::str::FromStr for FactorWeights {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let values = s
            .split(',')
            .map(|v| {
                v.trim().parse::<f64>().map_err(|e| {
                    ValidationError::InvalidWeights(format!("'{}': {}", v.trim(), e))
                })
            })
            .collect::<Result<Vec<f64>, _>>()?;

        match values.as_slice() {
            &[momentum, volatility, performance, volume, put_call, volatility_index] => {
                FactorWeights::custom(
                    momentum,
                    volatility,
                    performance,
                    volume,
                    put_call,
                    volatility_index,
                )
            }
            _ => Err(ValidationError::InvalidWeights(format!(
                "expected {} weights, got {}",
                Factor::ALL.len(),
                values.len()
            ))),
        }
    }
}

impl Default for FactorWeights {
    fn default() -> Self {
        FactorWeights::for_scheme(WeightingScheme::default())
    }
}
