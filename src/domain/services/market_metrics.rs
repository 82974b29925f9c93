use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::domain::repositories::market_data_provider::AuxiliaryIndicators;
use crate::domain::services::indicators::{
    percent_change, AnnualizedVolatility, Indicator, TrailingMean, SMA,
};
use crate::domain::value_objects::PriceBar;

pub const SHORT_MA_PERIOD: usize = 20;
pub const LONG_MA_PERIOD: usize = 60;
pub const VOLUME_AVG_PERIOD: usize = 20;
pub const RECENT_VOLUME_PERIOD: usize = 5;
/// Trading-day look-backs for 1-month and 3-month performance
pub const ONE_MONTH_PERIODS: usize = 21;
pub const THREE_MONTH_PERIODS: usize = 63;

/// Technical statistics for one market in one analysis run.
///
/// All percentage fields are finite. Auxiliary gauges are only set once the
/// metrics are joined with provider data.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MarketMetrics {
    /// % deviation of the current price from its 20-period SMA
    pub momentum_20d: f64,
    /// % deviation of the current price from its 60-period SMA
    pub momentum_60d: f64,
    /// Annualized volatility of periodic returns, in percent
    pub volatility: f64,
    /// % deviation of 5-period mean volume from 20-period mean volume
    pub volume_trend: f64,
    pub perf_1m: f64,
    pub perf_3m: f64,
    pub current_price: f64,
    pub put_call_ratio: Option<f64>,
    pub volatility_index: Option<f64>,
}

impl MarketMetrics {
    /// Attach auxiliary gauges, dropping any non-finite value
    pub fn with_auxiliary(mut self, aux: &AuxiliaryIndicators) -> Self {
        self.put_call_ratio = aux.put_call_ratio.filter(|v| v.is_finite());
        self.volatility_index = aux.volatility_index.filter(|v| v.is_finite());
        self
    }

    /// Mean of 1-month and 3-month performance
    pub fn average_performance(&self) -> f64 {
        (self.perf_1m + self.perf_3m) / 2.0
    }
}

/// Derive `MarketMetrics` from a chronological price history.
///
/// Returns `None` for an empty history. Short histories never fail: missing
/// moving averages fall back to the current price and missing look-backs to 0.
pub fn extract_metrics(history: &[PriceBar]) -> Option<MarketMetrics> {
    let last = history.last()?;
    let current_price = last.close;

    let closes: Vec<f64> = history.iter().map(|b| b.close).collect();
    let volumes: Vec<f64> = history.iter().map(|b| b.volume).collect();

    let momentum = |period: usize| {
        let ma = SMA::new(period)
            .calculate(&closes)
            .filter(|ma| *ma != 0.0)
            .unwrap_or(current_price);
        percent_change(current_price, ma)
    };
    let momentum_20d = momentum(SHORT_MA_PERIOD);
    let momentum_60d = momentum(LONG_MA_PERIOD);

    let volatility = AnnualizedVolatility.calculate(&closes).unwrap_or(0.0);

    let volume_trend = match (
        SMA::new(VOLUME_AVG_PERIOD).calculate(&volumes),
        TrailingMean::new(RECENT_VOLUME_PERIOD).calculate(&volumes),
    ) {
        (Some(avg), Some(recent)) if avg > 0.0 => percent_change(recent, avg),
        _ => 0.0,
    };

    let performance = |periods: usize| {
        if closes.len() >= periods {
            percent_change(current_price, closes[closes.len() - periods])
        } else {
            0.0
        }
    };
    let perf_1m = performance(ONE_MONTH_PERIODS);
    let perf_3m = performance(THREE_MONTH_PERIODS);

    debug!(
        bars = history.len(),
        current_price = current_price,
        momentum_20d = momentum_20d,
        momentum_60d = momentum_60d,
        volatility = volatility,
        volume_trend = volume_trend,
        perf_1m = perf_1m,
        perf_3m = perf_3m,
        "Extracted market metrics"
    );

    Some(MarketMetrics {
        momentum_20d,
        momentum_60d,
        volatility,
        volume_trend,
        perf_1m,
        perf_3m,
        current_price,
        put_call_ratio: None,
        volatility_index: None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, NaiveDate};

    fn history(closes: &[f64], volumes: &[f64]) -> Vec<PriceBar> {
        let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        closes
            .iter()
            .zip(volumes.iter())
            .enumerate()
            .map(|(i, (&c, &v))| PriceBar::new(start + Duration::days(i as i64), c, v).unwrap())
            .collect()
    }

    fn flat(n: usize) -> Vec<PriceBar> {
        history(&vec![100.0; n], &vec![1_000.0; n])
    }

    #[test]
    fn test_empty_history_yields_none() {
        assert!(extract_metrics(&[]).is_none());
    }

    #[test]
    fn test_single_bar_history() {
        let metrics = extract_metrics(&flat(1)).unwrap();
        assert_eq!(metrics.momentum_20d, 0.0);
        assert_eq!(metrics.momentum_60d, 0.0);
        assert_eq!(metrics.volatility, 0.0);
        assert_eq!(metrics.volume_trend, 0.0);
        assert_eq!(metrics.perf_1m, 0.0);
        assert_eq!(metrics.perf_3m, 0.0);
        assert_eq!(metrics.current_price, 100.0);
    }

    #[test]
    fn test_short_history_momentum_falls_back_to_zero() {
        let closes: Vec<f64> = (0..10).map(|i| 100.0 + i as f64).collect();
        let metrics = extract_metrics(&history(&closes, &[1_000.0; 10])).unwrap();
        assert_eq!(metrics.momentum_20d, 0.0);
        assert_eq!(metrics.momentum_60d, 0.0);
        assert!(metrics.volatility > 0.0);
    }

    #[test]
    fn test_short_history_performance_is_zero() {
        let closes: Vec<f64> = (0..20).map(|i| 100.0 + i as f64).collect();
        let metrics = extract_metrics(&history(&closes, &[1_000.0; 20])).unwrap();
        assert_eq!(metrics.perf_1m, 0.0);
        assert_eq!(metrics.perf_3m, 0.0);
        assert!(metrics.perf_1m.is_finite());
    }

    #[test]
    fn test_flat_history_all_zero() {
        let metrics = extract_metrics(&flat(70)).unwrap();
        assert_eq!(metrics.momentum_20d, 0.0);
        assert_eq!(metrics.momentum_60d, 0.0);
        assert_eq!(metrics.volatility, 0.0);
        assert_eq!(metrics.volume_trend, 0.0);
        assert_eq!(metrics.perf_1m, 0.0);
        assert_eq!(metrics.perf_3m, 0.0);
        assert_eq!(metrics.put_call_ratio, None);
        assert_eq!(metrics.volatility_index, None);
    }

    #[test]
    fn test_momentum_against_moving_average() {
        // 19 bars at 100 then one at 120: SMA20 = 101, momentum = 120/101 - 1
        let mut closes = vec![100.0; 19];
        closes.push(120.0);
        let metrics = extract_metrics(&history(&closes, &[1_000.0; 20])).unwrap();
        let expected = (120.0 / 101.0 - 1.0) * 100.0;
        assert!((metrics.momentum_20d - expected).abs() < 1e-9);
        assert_eq!(metrics.momentum_60d, 0.0);
    }

    #[test]
    fn test_performance_lookbacks() {
        // close[len - 21] = 100, close[len - 63] = 80, current = 110
        let mut closes = vec![80.0; 42];
        closes.extend(vec![100.0; 20]);
        closes.push(110.0);
        let closes_len = closes.len();
        assert_eq!(closes_len, 63);
        let metrics = extract_metrics(&history(&closes, &vec![1_000.0; closes_len])).unwrap();
        assert!((metrics.perf_1m - 10.0).abs() < 1e-9);
        assert!((metrics.perf_3m - 37.5).abs() < 1e-9);
        assert!((metrics.average_performance() - 23.75).abs() < 1e-9);
    }

    #[test]
    fn test_volume_trend() {
        // 15 bars at 1000 then 5 at 2000: avg20 = 1250, recent = 2000 → +60%
        let mut volumes = vec![1_000.0; 15];
        volumes.extend(vec![2_000.0; 5]);
        let metrics = extract_metrics(&history(&[100.0; 20], &volumes)).unwrap();
        assert!((metrics.volume_trend - 60.0).abs() < 1e-9);
    }

    #[test]
    fn test_volume_trend_zero_average_volume() {
        let metrics = extract_metrics(&history(&[100.0; 25], &[0.0; 25])).unwrap();
        assert_eq!(metrics.volume_trend, 0.0);
    }

    #[test]
    fn test_volume_trend_short_history() {
        let metrics = extract_metrics(&history(&[100.0; 10], &[5_000.0; 10])).unwrap();
        assert_eq!(metrics.volume_trend, 0.0);
    }

    #[test]
    fn test_zero_base_price_guards() {
        let mut closes = vec![0.0; 21];
        closes.push(50.0);
        let metrics = extract_metrics(&history(&closes, &[1_000.0; 22])).unwrap();
        assert!(metrics.perf_1m.is_finite());
        assert!(metrics.momentum_20d.is_finite());
        assert!(metrics.volatility.is_finite());
    }

    #[test]
    fn test_with_auxiliary_drops_non_finite() {
        let metrics = extract_metrics(&flat(5)).unwrap().with_auxiliary(&AuxiliaryIndicators {
            put_call_ratio: Some(f64::NAN),
            volatility_index: Some(18.5),
        });
        assert_eq!(metrics.put_call_ratio, None);
        assert_eq!(metrics.volatility_index, Some(18.5));
    }
}
