use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::domain::errors::ValidationError;

/// One period of price history: closing price and traded volume.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PriceBar {
    pub date: NaiveDate,
    pub close: f64,
    pub volume: f64,
}

impl PriceBar {
    pub fn new(date: NaiveDate, close: f64, volume: f64) -> Result<Self, ValidationError> {
        if !close.is_finite() || !volume.is_finite() {
            return Err(ValidationError::MustBeFinite);
        }
        if close < 0.0 {
            return Err(ValidationError::InvalidPrice(close.to_string()));
        }
        if volume < 0.0 {
            return Err(ValidationError::InvalidVolume(volume.to_string()));
        }
        Ok(PriceBar {
            date,
            close,
            volume,
        })
    }
}
