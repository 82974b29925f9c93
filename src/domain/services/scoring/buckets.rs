use serde::Serialize;

/// Sub-score used when an optional dimension has no data
pub const NEUTRAL_SUB_SCORE: u8 = 50;

/// Strict comparison against a bucket boundary
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "op", content = "value", rename_all = "snake_case")]
pub enum Threshold {
    /// value > bound
    Above(f64),
    /// value < bound
    Below(f64),
}

impl Threshold {
    pub fn matches(&self, value: f64) -> bool {
        match *self {
            Threshold::Above(bound) => value > bound,
            Threshold::Below(bound) => value < bound,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Bucket {
    pub threshold: Threshold,
    pub score: u8,
}

const fn above(bound: f64, score: u8) -> Bucket {
    Bucket {
        threshold: Threshold::Above(bound),
        score,
    }
}

const fn below(bound: f64, score: u8) -> Bucket {
    Bucket {
        threshold: Threshold::Below(bound),
        score,
    }
}

/// Ordered piecewise-constant mapping from a metric to a sub-score.
///
/// Buckets are evaluated top-down and the first match wins; `fallback`
/// applies when none match (including NaN input).
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct BucketTable {
    pub buckets: &'static [Bucket],
    pub fallback: u8,
}

impl BucketTable {
    pub fn score(&self, value: f64) -> u8 {
        self.buckets
            .iter()
            .find(|b| b.threshold.matches(value))
            .map(|b| b.score)
            .unwrap_or(self.fallback)
    }
}

// The tables are contrarian: bullish or complacent readings score high
// (euphoria, sell), bearish or fearful readings score low (panic, buy).

pub const MOMENTUM_BUCKETS: BucketTable = BucketTable {
    buckets: &[
        above(20.0, 90),
        above(10.0, 75),
        above(-5.0, 55),
        above(-15.0, 30),
    ],
    fallback: 10,
};

pub const VOLATILITY_BUCKETS: BucketTable = BucketTable {
    buckets: &[
        below(8.0, 85),
        below(15.0, 65),
        below(25.0, 50),
        below(35.0, 25),
    ],
    fallback: 10,
};

pub const PERFORMANCE_BUCKETS: BucketTable = BucketTable {
    buckets: &[
        above(25.0, 90),
        above(10.0, 70),
        above(-5.0, 50),
        above(-20.0, 25),
    ],
    fallback: 10,
};

/// Volume buckets below the surge rule (volume > 50% with 1-month gains > 5%)
pub const VOLUME_BUCKETS: BucketTable = BucketTable {
    buckets: &[above(20.0, 65), above(-20.0, 50)],
    fallback: 35,
};

pub const PUT_CALL_BUCKETS: BucketTable = BucketTable {
    buckets: &[above(1.0, 20), above(0.8, 40), above(0.6, 60)],
    fallback: 80,
};

pub const VOLATILITY_INDEX_BUCKETS: BucketTable = BucketTable {
    buckets: &[
        above(30.0, 15),
        above(25.0, 30),
        above(20.0, 50),
        above(15.0, 70),
    ],
    fallback: 85,
};
