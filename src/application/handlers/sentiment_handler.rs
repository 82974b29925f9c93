use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    middleware,
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use tower::ServiceBuilder;
use tower_http::{limit::RequestBodyLimitLayer, trace::TraceLayer};

use crate::config::parse_market_list;
use crate::domain::entities::sentiment::{SentimentBand, TradingSignal};
use crate::domain::errors::AnalysisError;
use crate::domain::services::market_metrics::MarketMetrics;
use crate::domain::services::scoring::buckets::{
    Bucket, BucketTable, MOMENTUM_BUCKETS, PERFORMANCE_BUCKETS, PUT_CALL_BUCKETS,
    VOLATILITY_BUCKETS, VOLATILITY_INDEX_BUCKETS, VOLUME_BUCKETS,
};
use crate::domain::services::scoring::{
    AuxiliaryPolicy, ComponentScores, Factor, FactorWeights, VolumeScoreCalculator,
    WeightingScheme,
};
use crate::domain::services::sentiment_analysis::{
    ExtremeSignal, MarketSentiment, SentimentAnalysisService,
};
use crate::rate_limit::{rate_limit_middleware, GlobalRateLimiter};

pub type AppState = Arc<SentimentAnalysisService>;

/// The API is read-only; anything larger than this is not a valid request
const MAX_REQUEST_BODY_BYTES: usize = 4 * 1024;
/// Each sentiment request fans out to the price provider
const MAX_IN_FLIGHT_REQUESTS: usize = 32;

/// Query parameters for the sentiment endpoint
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct SentimentQuery {
    /// Comma-separated market ids; the configured default selection when omitted
    pub markets: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct MarketResponse {
    pub id: String,
    pub ticker: String,
    pub name: String,
    pub region: String,
    pub put_call_eligible: bool,
}

/// One market in the sentiment response
#[derive(Debug, Serialize)]
pub struct MarketSentimentResponse {
    pub market: String,
    pub name: String,
    pub ticker: String,
    pub score: u8,
    pub color: String,
    pub band: SentimentBand,
    pub icon: String,
    pub label: String,
    pub signal: String,
    pub signal_rationale: String,
    pub raw_metrics: Option<MarketMetrics>,
    pub components: Option<ComponentScores>,
    pub composite: Option<f64>,
}

impl From<&MarketSentiment> for MarketSentimentResponse {
    fn from(entry: &MarketSentiment) -> Self {
        let result = &entry.result;
        MarketSentimentResponse {
            market: entry.market.id.clone(),
            name: entry.market.name.clone(),
            ticker: entry.market.ticker.clone(),
            score: result.score,
            color: result.color_hex().to_string(),
            band: result.band,
            icon: result.band.icon().to_string(),
            label: result.label.to_string(),
            signal: result.signal.name().to_string(),
            signal_rationale: result.signal.rationale().to_string(),
            raw_metrics: entry.raw_metrics,
            components: entry.breakdown.map(|b| b.components),
            composite: entry.breakdown.map(|b| b.composite),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct SentimentResponse {
    pub generated_at: String,
    pub weighting: WeightingScheme,
    pub aux_policy: AuxiliaryPolicy,
    pub markets: Vec<MarketSentimentResponse>,
    pub extreme_signals: Vec<ExtremeSignal>,
    pub global: Option<MarketSentimentResponse>,
}

#[derive(Debug, Serialize)]
pub struct FactorMethodology {
    pub factor: Factor,
    pub weight: f64,
    pub buckets: &'static [Bucket],
    pub fallback: u8,
    /// Rule evaluated before the buckets, if any
    pub override_rule: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct BandMethodology {
    pub band: SentimentBand,
    pub max_score: u8,
    pub label: &'static str,
    pub color: &'static str,
    pub signal: &'static str,
    pub rationale: &'static str,
}

#[derive(Debug, Serialize)]
pub struct MethodologyResponse {
    pub weighting: WeightingScheme,
    pub aux_policy: AuxiliaryPolicy,
    pub weights: FactorWeights,
    pub factors: Vec<FactorMethodology>,
    pub bands: Vec<BandMethodology>,
}

/// Error response
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}

type ApiError = (StatusCode, Json<ErrorResponse>);

fn api_error(err: AnalysisError) -> ApiError {
    let status = match err {
        AnalysisError::UnknownMarket(_) => StatusCode::NOT_FOUND,
        AnalysisError::EmptySelection => StatusCode::BAD_REQUEST,
    };
    (
        status,
        Json(ErrorResponse {
            error: err.to_string(),
        }),
    )
}

/// Routes with request tracing; inbound calls are throttled when a limiter
/// is given
pub fn create_router(state: AppState, limiter: Option<GlobalRateLimiter>) -> Router {
    let api = Router::new()
        .route("/markets", get(list_markets))
        .route("/sentiment", get(get_sentiment))
        .route("/sentiment/:market", get(get_market_sentiment))
        .route("/methodology", get(get_methodology))
        .with_state(state);

    let api = match limiter {
        Some(limiter) => api.layer(middleware::from_fn_with_state(
            limiter,
            rate_limit_middleware,
        )),
        None => api,
    };

    Router::new()
        .route("/health", get(health_check))
        .merge(api)
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(RequestBodyLimitLayer::new(MAX_REQUEST_BODY_BYTES))
                .concurrency_limit(MAX_IN_FLIGHT_REQUESTS),
        )
}

pub async fn health_check() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "status": "ok" }))
}

/// List every analysable market
pub async fn list_markets(State(service): State<AppState>) -> Json<Vec<MarketResponse>> {
    Json(
        service
            .catalog()
            .markets()
            .iter()
            .map(|m| MarketResponse {
                id: m.id.clone(),
                ticker: m.ticker.clone(),
                name: m.name.clone(),
                region: m.region.clone(),
                put_call_eligible: m.put_call_eligible,
            })
            .collect(),
    )
}

/// Run an analysis over the requested markets
pub async fn get_sentiment(
    State(service): State<AppState>,
    Query(params): Query<SentimentQuery>,
) -> Result<Json<SentimentResponse>, ApiError> {
    let report = match params.markets {
        Some(raw) => service.analyze(&parse_market_list(&raw)).await,
        None => service.analyze_default().await,
    }
    .map_err(api_error)?;

    Ok(Json(SentimentResponse {
        generated_at: report.generated_at.to_rfc3339(),
        weighting: report.weighting,
        aux_policy: report.aux_policy,
        markets: report.entries.iter().map(Into::into).collect(),
        extreme_signals: report.extreme_signals(),
        global: report.global().map(Into::into),
    }))
}

/// Sentiment for a single market
pub async fn get_market_sentiment(
    State(service): State<AppState>,
    Path(market): Path<String>,
) -> Result<Json<MarketSentimentResponse>, ApiError> {
    let report = service
        .analyze(&[market.clone()])
        .await
        .map_err(api_error)?;

    report
        .entries
        .first()
        .map(|entry| Json(entry.into()))
        .ok_or_else(|| api_error(AnalysisError::UnknownMarket(market)))
}

/// Bucket tables, active weights and band thresholds
pub async fn get_methodology(State(service): State<AppState>) -> Json<MethodologyResponse> {
    let scorer = service.scorer();
    let weights = *scorer.weights();
    let volume = VolumeScoreCalculator::default();

    let factor = |factor: Factor, table: BucketTable, override_rule: Option<String>| {
        FactorMethodology {
            factor,
            weight: weights.weight(factor),
            buckets: table.buckets,
            fallback: table.fallback,
            override_rule,
        }
    };

    let factors = vec![
        factor(Factor::Momentum, MOMENTUM_BUCKETS, None),
        factor(Factor::Volatility, VOLATILITY_BUCKETS, None),
        factor(Factor::Performance, PERFORMANCE_BUCKETS, None),
        factor(
            Factor::Volume,
            VOLUME_BUCKETS,
            Some(format!(
                "volume_trend > {} and perf_1m > {} scores {}",
                volume.surge_volume_trend, volume.surge_min_perf_1m, volume.surge_score
            )),
        ),
        factor(Factor::PutCall, PUT_CALL_BUCKETS, None),
        factor(Factor::VolatilityIndex, VOLATILITY_INDEX_BUCKETS, None),
    ];

    let bands = [
        (SentimentBand::Panic, 20),
        (SentimentBand::Bearish, 40),
        (SentimentBand::Neutral, 60),
        (SentimentBand::Bullish, 80),
        (SentimentBand::Euphoria, 100),
    ]
    .into_iter()
    .map(|(band, max_score)| {
        let signal: TradingSignal = band.signal();
        BandMethodology {
            band,
            max_score,
            label: band.label(),
            color: band.color_hex(),
            signal: signal.name(),
            rationale: signal.rationale(),
        }
    })
    .collect();

    Json(MethodologyResponse {
        weighting: service.weighting(),
        aux_policy: scorer.policy(),
        weights,
        factors,
        bands,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AnalysisConfig;
    use crate::domain::entities::market::Market;
    use crate::domain::errors::ProviderError;
    use crate::domain::repositories::{
        AuxiliaryIndicatorProvider, AuxiliaryIndicators, PriceHistoryProvider, ProviderResult,
    };
    use crate::domain::value_objects::PriceBar;
    use async_trait::async_trait;
    use chrono::{Duration, NaiveDate};

    struct FlatHistory;

    #[async_trait]
    impl PriceHistoryProvider for FlatHistory {
        async fn fetch_history(&self, ticker: &str, _months: u32) -> ProviderResult<Vec<PriceBar>> {
            if ticker == "EWZ" {
                return Err(ProviderError::NoData(ticker.to_string()));
            }
            let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
            Ok((0..70)
                .map(|i| PriceBar::new(start + Duration::days(i), 100.0, 1_000.0).unwrap())
                .collect())
        }

        fn name(&self) -> &str {
            "flat"
        }
    }

    struct Absent;

    #[async_trait]
    impl AuxiliaryIndicatorProvider for Absent {
        async fn indicators(&self, _market: &Market) -> ProviderResult<AuxiliaryIndicators> {
            Ok(AuxiliaryIndicators::absent())
        }
    }

    fn state(weighting: WeightingScheme) -> AppState {
        let config = AnalysisConfig {
            weighting,
            ..AnalysisConfig::default()
        };
        Arc::new(SentimentAnalysisService::from_config(
            &config,
            Arc::new(FlatHistory),
            Arc::new(Absent),
        ))
    }

    fn query(markets: Option<&str>) -> Query<SentimentQuery> {
        Query(SentimentQuery {
            markets: markets.map(str::to_string),
        })
    }

    #[tokio::test]
    async fn test_health_check() {
        let Json(body) = health_check().await;
        assert_eq!(body, serde_json::json!({"status": "ok"}));
    }

    #[tokio::test]
    async fn test_list_markets() {
        let Json(markets) = list_markets(State(state(WeightingScheme::SixFactor))).await;
        assert_eq!(markets.len(), 15);
        assert_eq!(markets[0].id, "Global");
        assert!(markets.iter().any(|m| m.ticker == "TUR"));
    }

    #[tokio::test]
    async fn test_get_sentiment_default_selection() {
        let result = get_sentiment(State(state(WeightingScheme::FourFactor)), query(None)).await;
        let response = result.unwrap().0;

        assert_eq!(response.markets.len(), 5);
        assert_eq!(response.markets[0].market, "Global");
        assert_eq!(response.markets[0].score, 60);
        assert_eq!(response.markets[0].label, "Neutral Territory");
        assert_eq!(response.markets[0].color, "#fed976");
        assert_eq!(response.markets[0].signal, "Neutral");
        assert_eq!(response.global.unwrap().score, 60);
        assert!(response.extreme_signals.is_empty());
    }

    #[tokio::test]
    async fn test_get_sentiment_selection_order_and_degraded_market() {
        let result = get_sentiment(
            State(state(WeightingScheme::SixFactor)),
            query(Some("Brazil, Japan")),
        )
        .await;
        let response = result.unwrap().0;

        let ids: Vec<&str> = response.markets.iter().map(|m| m.market.as_str()).collect();
        assert_eq!(ids, vec!["Brazil", "Japan"]);
        assert_eq!(response.markets[0].score, 50);
        assert!(response.markets[0].raw_metrics.is_none());
        assert_eq!(response.markets[1].score, 56);
        assert!(response.global.is_none());
    }

    #[tokio::test]
    async fn test_get_sentiment_unknown_market() {
        let result = get_sentiment(
            State(state(WeightingScheme::SixFactor)),
            query(Some("Global,Narnia")),
        )
        .await;
        let (status, Json(body)) = result.err().unwrap();
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body.error, "Unknown market: Narnia");
    }

    #[tokio::test]
    async fn test_get_sentiment_empty_selection() {
        let result = get_sentiment(State(state(WeightingScheme::SixFactor)), query(Some(" , "))).await;
        assert_eq!(result.err().unwrap().0, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_get_market_sentiment() {
        let result = get_market_sentiment(
            State(state(WeightingScheme::FourFactor)),
            Path("japan".to_string()),
        )
        .await;
        let response = result.unwrap().0;
        assert_eq!(response.market, "Japan");
        assert_eq!(response.ticker, "^N225");
        assert_eq!(response.score, 60);
        let components = response.components.unwrap();
        assert_eq!(components.momentum, 55);
        assert_eq!(components.volatility, 85);
    }

    #[tokio::test]
    async fn test_get_market_sentiment_not_found() {
        let result = get_market_sentiment(
            State(state(WeightingScheme::SixFactor)),
            Path("Atlantis".to_string()),
        )
        .await;
        assert_eq!(result.err().unwrap().0, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_get_methodology() {
        let Json(response) = get_methodology(State(state(WeightingScheme::FourFactor))).await;
        assert_eq!(response.weighting, WeightingScheme::FourFactor);
        assert_eq!(response.factors.len(), 6);
        assert_eq!(response.factors[0].weight, 0.30);
        assert_eq!(response.factors[4].weight, 0.0);
        assert!(response.factors[3].override_rule.is_some());
        assert_eq!(response.bands.len(), 5);
        assert_eq!(response.bands[0].max_score, 20);
        assert_eq!(response.bands[0].signal, "Strong Buy");
    }

    #[tokio::test]
    async fn test_methodology_serializes() {
        let Json(response) = get_methodology(State(state(WeightingScheme::SixFactor))).await;
        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(json["factors"][0]["factor"], "momentum");
        assert_eq!(
            json["factors"][0]["buckets"][0]["threshold"],
            serde_json::json!({"op": "above", "value": 20.0})
        );
    }
}
