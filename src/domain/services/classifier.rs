//! Maps risk-love scores onto the five contrarian sentiment bands.

use crate::domain::entities::sentiment::ScoreResult;
use crate::domain::errors::ValidationError;

/// Classify a scorer output. Values above 100 are clamped.
pub fn classify(score: u8) -> ScoreResult {
    ScoreResult::new(score.min(100))
}

/// Classify a score coming from outside the engine, rejecting anything
/// outside [0, 100].
pub fn classify_external(score: i64) -> Result<ScoreResult, ValidationError> {
    if !(0..=100).contains(&score) {
        return Err(ValidationError::ScoreOutOfRange(score));
    }
    Ok(ScoreResult::new(score as u8))
}

/// Classify a score coming from outside the engine, clamping it into range
pub fn classify_clamped(score: i64) -> ScoreResult {
    ScoreResult::new(score.clamp(0, 100) as u8)
}
