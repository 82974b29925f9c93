use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum ValidationError {
    #[error("Invalid price: {0}")]
    InvalidPrice(String),

    #[error("Invalid volume: {0}")]
    InvalidVolume(String),

    #[error("Score out of range [0, 100]: {0}")]
    ScoreOutOfRange(i64),

    #[error("Invalid weights: {0}")]
    InvalidWeights(String),

    #[error("Value must be finite")]
    MustBeFinite,
}

/// Errors raised by price-history and auxiliary-indicator providers.
///
/// These never abort an analysis run: the service logs them and falls back to
/// the neutral path.
#[derive(Debug, Error, Clone)]
pub enum ProviderError {
    #[error("Network error: {0}")]
    Network(String),

    #[error("Unexpected HTTP status {status} for {ticker}")]
    HttpStatus { ticker: String, status: u16 },

    #[error("Failed to parse response for {ticker}: {reason}")]
    Parse { ticker: String, reason: String },

    #[error("No data returned for {0}")]
    NoData(String),
}

impl From<reqwest::Error> for ProviderError {
    fn from(e: reqwest::Error) -> Self {
        ProviderError::Network(e.to_string())
    }
}

#[derive(Debug, Error, Clone, PartialEq)]
pub enum AnalysisError {
    #[error("Unknown market: {0}")]
    UnknownMarket(String),

    #[error("No markets selected")]
    EmptySelection,
}

impl From<ValidationError> for String {
    fn from(error: ValidationError) -> Self {
        error.to_string()
    }
}
