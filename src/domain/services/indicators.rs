//! Scalar statistics over closing-price and volume series.
//!
//! Every helper returns a finite value or `None`; callers decide the fallback.

/// Trading days per year, used to annualize daily volatility
pub const TRADING_DAYS_PER_YEAR: f64 = 252.0;

pub trait Indicator {
    fn calculate(&self, values: &[f64]) -> Option<f64>;
}

/// Simple moving average of the trailing `period` values
pub struct SMA {
    pub period: usize,
}

impl SMA {
    pub fn new(period: usize) -> Self {
        SMA { period }
    }
}

impl Indicator for SMA {
    /// `None` when fewer than `period` values exist
    fn calculate(&self, values: &[f64]) -> Option<f64> {
        if self.period == 0 || values.len() < self.period {
            return None;
        }
        let window = &values[values.len() - self.period..];
        let avg = window.iter().sum::<f64>() / self.period as f64;
        avg.is_finite().then_some(avg)
    }
}

/// Mean of the trailing `period` values, or of all values if there are fewer
pub struct TrailingMean {
    pub period: usize,
}

impl TrailingMean {
    pub fn new(period: usize) -> Self {
        TrailingMean { period }
    }
}

impl Indicator for TrailingMean {
    fn calculate(&self, values: &[f64]) -> Option<f64> {
        if values.is_empty() || self.period == 0 {
            return None;
        }
        let count = values.len().min(self.period);
        let window = &values[values.len() - count..];
        let avg = window.iter().sum::<f64>() / count as f64;
        avg.is_finite().then_some(avg)
    }
}

/// Annualized volatility in percent: `stdev(returns) * sqrt(252) * 100`
pub struct AnnualizedVolatility;

impl Indicator for AnnualizedVolatility {
    fn calculate(&self, closes: &[f64]) -> Option<f64> {
        let returns = pct_returns(closes);
        let stdev = sample_std_dev(&returns)?;
        let vol = stdev * TRADING_DAYS_PER_YEAR.sqrt() * 100.0;
        vol.is_finite().then_some(vol)
    }
}

/// Period-over-period fractional returns. Pairs whose base price is zero are skipped.
pub fn pct_returns(closes: &[f64]) -> Vec<f64> {
    closes
        .windows(2)
        .filter(|w| w[0] != 0.0)
        .map(|w| w[1] / w[0] - 1.0)
        .filter(|r| r.is_finite())
        .collect()
}

/// Sample standard deviation (n - 1 denominator). Needs at least two values.
pub fn sample_std_dev(values: &[f64]) -> Option<f64> {
    if values.len() < 2 {
        return None;
    }
    let n = values.len() as f64;
    let mean = values.iter().sum::<f64>() / n;
    let variance = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / (n - 1.0);
    let std = variance.sqrt();
    std.is_finite().then_some(std)
}

/// `(current / base - 1) * 100`, or 0 when the base is zero
pub fn percent_change(current: f64, base: f64) -> f64 {
    if base == 0.0 {
        return 0.0;
    }
    let change = (current / base - 1.0) * 100.0;
    if change.is_finite() {
        change
    } else {
        0.0
    }
}
