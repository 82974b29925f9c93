//! Risk-Love Sentiment Engine Library
//!
//! Contrarian sentiment percentiles for equity markets: price history in,
//! a 0-100 risk-love score and its trading signal out.

pub mod application;
pub mod config;
pub mod domain;
pub mod infrastructure;
pub mod rate_limit;
