pub mod classifier;
pub mod indicators;
pub mod market_metrics;
pub mod scoring;
pub mod sentiment_analysis;
