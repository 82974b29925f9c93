//! Yahoo Finance chart API client
//!
//! Fetches daily close/volume series from the public v8 chart endpoint. No
//! credentials are needed; requests are throttled through the shared
//! outbound rate limiter when one is attached.

use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Months, Utc};
use reqwest::Client;
use serde::Deserialize;
use tracing::{debug, warn};
use url::Url;

use crate::domain::errors::ProviderError;
use crate::domain::repositories::{PriceHistoryProvider, ProviderResult};
use crate::domain::value_objects::PriceBar;
use crate::rate_limit::{acquire, GlobalRateLimiter};

const YAHOO_CHART_BASE: &str = "https://query1.finance.yahoo.com/v8/finance/chart/";
const USER_AGENT: &str = "risklove/0.1.0";

#[derive(Debug, Deserialize)]
struct ChartEnvelope {
    chart: ChartBody,
}

#[derive(Debug, Deserialize)]
struct ChartBody {
    result: Option<Vec<ChartResult>>,
    error: Option<ChartError>,
}

#[derive(Debug, Deserialize)]
struct ChartError {
    code: String,
    description: String,
}

#[derive(Debug, Deserialize)]
struct ChartResult {
    #[serde(default)]
    timestamp: Vec<i64>,
    indicators: ChartIndicators,
}

#[derive(Debug, Deserialize)]
struct ChartIndicators {
    #[serde(default)]
    quote: Vec<ChartQuote>,
}

#[derive(Debug, Deserialize)]
struct ChartQuote {
    #[serde(default)]
    close: Vec<Option<f64>>,
    #[serde(default)]
    volume: Vec<Option<f64>>,
}

/// Parse a chart API response body into chronological bars.
///
/// Bars with a null or invalid close are skipped; a null volume counts as 0.
pub fn parse_chart(ticker: &str, body: &str) -> ProviderResult<Vec<PriceBar>> {
    let envelope: ChartEnvelope =
        serde_json::from_str(body).map_err(|e| ProviderError::Parse {
            ticker: ticker.to_string(),
            reason: e.to_string(),
        })?;

    if let Some(err) = envelope.chart.error {
        return Err(ProviderError::Parse {
            ticker: ticker.to_string(),
            reason: format!("{}: {}", err.code, err.description),
        });
    }

    let Some(result) = envelope.chart.result.and_then(|r| r.into_iter().next()) else {
        return Err(ProviderError::NoData(ticker.to_string()));
    };
    let Some(quote) = result.indicators.quote.into_iter().next() else {
        return Ok(Vec::new());
    };

    let mut bars = Vec::with_capacity(result.timestamp.len());
    let mut skipped = 0usize;

    for (i, ts) in result.timestamp.iter().enumerate() {
        let close = quote.close.get(i).copied().flatten();
        let volume = quote.volume.get(i).copied().flatten().unwrap_or(0.0);
        let date = DateTime::from_timestamp(*ts, 0).map(|d| d.date_naive());

        match (date, close) {
            (Some(date), Some(close)) => match PriceBar::new(date, close, volume) {
                Ok(bar) => bars.push(bar),
                Err(_) => skipped += 1,
            },
            _ => skipped += 1,
        }
    }

    if skipped > 0 {
        debug!(ticker = %ticker, skipped = skipped, "Skipped incomplete chart bars");
    }

    Ok(bars)
}

/// Price-history provider backed by Yahoo Finance
pub struct YahooChartClient {
    client: Client,
    base_url: Url,
    limiter: Option<GlobalRateLimiter>,
}

impl YahooChartClient {
    pub fn new(timeout: Duration) -> ProviderResult<Self> {
        let client = Client::builder()
            .user_agent(USER_AGENT)
            .timeout(timeout)
            .build()
            .map_err(|e| ProviderError::Network(format!("Failed to create HTTP client: {}", e)))?;
        let base_url = Url::parse(YAHOO_CHART_BASE)
            .map_err(|e| ProviderError::Network(format!("Invalid base URL: {}", e)))?;

        Ok(Self {
            client,
            base_url,
            limiter: None,
        })
    }

    pub fn with_rate_limiter(mut self, limiter: GlobalRateLimiter) -> Self {
        self.limiter = Some(limiter);
        self
    }

    /// Daily-interval chart URL covering `lookback_months` up to `now`
    pub fn chart_url(
        &self,
        ticker: &str,
        lookback_months: u32,
        now: DateTime<Utc>,
    ) -> ProviderResult<Url> {
        let mut url = self
            .base_url
            .join(ticker)
            .map_err(|e| ProviderError::Parse {
                ticker: ticker.to_string(),
                reason: format!("invalid ticker in URL: {}", e),
            })?;
        let start = now
            .checked_sub_months(Months::new(lookback_months))
            .unwrap_or(now);

        url.query_pairs_mut()
            .append_pair("period1", &start.timestamp().to_string())
            .append_pair("period2", &now.timestamp().to_string())
            .append_pair("interval", "1d")
            .append_pair("includePrePost", "false");
        Ok(url)
    }
}

#[async_trait]
impl PriceHistoryProvider for YahooChartClient {
    async fn fetch_history(
        &self,
        ticker: &str,
        lookback_months: u32,
    ) -> ProviderResult<Vec<PriceBar>> {
        let url = self.chart_url(ticker, lookback_months, Utc::now())?;

        if let Some(limiter) = &self.limiter {
            acquire(limiter).await;
        }

        debug!(ticker = %ticker, url = %url, "Fetching price history");

        let response = self.client.get(url).send().await?;

        if !response.status().is_success() {
            let status = response.status();
            warn!(ticker = %ticker, status = status.as_u16(), "Chart API error");
            return Err(ProviderError::HttpStatus {
                ticker: ticker.to_string(),
                status: status.as_u16(),
            });
        }

        let body = response.text().await?;
        let bars = parse_chart(ticker, &body)?;

        debug!(ticker = %ticker, bars = bars.len(), "Fetched price history");
        Ok(bars)
    }

    fn name(&self) -> &str {
        "yahoo"
    }
}
