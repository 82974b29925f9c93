use std::collections::HashSet;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use futures_util::stream::{self, StreamExt};
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::config::AnalysisConfig;
use crate::domain::entities::market::{Market, MarketCatalog};
use crate::domain::entities::sentiment::ScoreResult;
use crate::domain::errors::AnalysisError;
use crate::domain::repositories::{
    AuxiliaryIndicatorProvider, AuxiliaryIndicators, PriceHistoryProvider,
};
use crate::domain::services::classifier::classify;
use crate::domain::services::market_metrics::{extract_metrics, MarketMetrics};
use crate::domain::services::scoring::{
    AuxiliaryPolicy, RiskLoveScorer, ScoreBreakdown, WeightingScheme,
};
use crate::domain::value_objects::PriceBar;

/// Scores at or below this raise a buy alert
pub const BUY_ALERT_THRESHOLD: u8 = 20;
/// Scores at or above this raise a sell alert
pub const SELL_ALERT_THRESHOLD: u8 = 80;

/// One report entry
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MarketSentiment {
    pub market: Market,
    pub result: ScoreResult,
    /// `None` when no history was available
    pub raw_metrics: Option<MarketMetrics>,
    pub breakdown: Option<ScoreBreakdown>,
}

impl MarketSentiment {
    pub fn score(&self) -> u8 {
        self.result.score
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ExtremeKind {
    BuyAlert,
    SellAlert,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExtremeSignal {
    pub market: String,
    pub score: u8,
    pub kind: ExtremeKind,
}

/// Result of one analysis run, entries in selection order
#[derive(Debug, Clone, Serialize)]
pub struct SentimentReport {
    pub generated_at: DateTime<Utc>,
    pub weighting: WeightingScheme,
    pub aux_policy: AuxiliaryPolicy,
    pub entries: Vec<MarketSentiment>,
}

impl SentimentReport {
    pub fn get(&self, market_id: &str) -> Option<&MarketSentiment> {
        self.entries
            .iter()
            .find(|e| e.market.id.eq_ignore_ascii_case(market_id.trim()))
    }

    pub fn global(&self) -> Option<&MarketSentiment> {
        self.get("Global")
    }

    /// Markets whose score sits at either alert threshold or beyond
    pub fn extreme_signals(&self) -> Vec<ExtremeSignal> {
        self.entries
            .iter()
            .filter_map(|e| {
                let kind = if e.score() <= BUY_ALERT_THRESHOLD {
                    ExtremeKind::BuyAlert
                } else if e.score() >= SELL_ALERT_THRESHOLD {
                    ExtremeKind::SellAlert
                } else {
                    return None;
                };
                Some(ExtremeSignal {
                    market: e.market.id.clone(),
                    score: e.score(),
                    kind,
                })
            })
            .collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Runs the risk-love pipeline over a selection of markets
pub struct SentimentAnalysisService {
    history: Arc<dyn PriceHistoryProvider>,
    auxiliary: Arc<dyn AuxiliaryIndicatorProvider>,
    catalog: MarketCatalog,
    scorer: RiskLoveScorer,
    weighting: WeightingScheme,
    default_selection: Vec<String>,
    lookback_months: u32,
    max_concurrent: usize,
}

impl SentimentAnalysisService {
    pub fn from_config(
        config: &AnalysisConfig,
        history: Arc<dyn PriceHistoryProvider>,
        auxiliary: Arc<dyn AuxiliaryIndicatorProvider>,
    ) -> Self {
        SentimentAnalysisService {
            history,
            auxiliary,
            catalog: MarketCatalog::standard(),
            scorer: RiskLoveScorer::new(config.weights(), config.aux_policy),
            weighting: config.weighting,
            default_selection: config.markets.clone(),
            lookback_months: config.lookback_months,
            max_concurrent: config.max_concurrent_fetches.max(1),
        }
    }

    pub fn catalog(&self) -> &MarketCatalog {
        &self.catalog
    }

    pub fn scorer(&self) -> &RiskLoveScorer {
        &self.scorer
    }

    pub fn weighting(&self) -> WeightingScheme {
        self.weighting
    }

    pub async fn analyze_default(&self) -> Result<SentimentReport, AnalysisError> {
        let selection = self.default_selection.clone();
        self.analyze(&selection).await
    }

    /// Analyse the given market ids. Unknown ids fail the whole request;
    /// provider failures only degrade the affected market.
    pub async fn analyze(&self, selection: &[String]) -> Result<SentimentReport, AnalysisError> {
        let markets = self.resolve(selection)?;

        debug!(
            markets = markets.len(),
            lookback_months = self.lookback_months,
            max_concurrent = self.max_concurrent,
            "Starting sentiment analysis"
        );

        // Market-wide gauges belong to this run only
        let shared = match self.auxiliary.snapshot().await {
            Ok(aux) => aux,
            Err(e) => {
                warn!(error = %e, "Auxiliary snapshot failed, market-wide gauges will be absent");
                AuxiliaryIndicators::absent()
            }
        };

        let entries: Vec<MarketSentiment> = stream::iter(markets)
            .map(|market| self.analyze_market(market, shared))
            .buffered(self.max_concurrent)
            .collect()
            .await;

        let report = SentimentReport {
            generated_at: Utc::now(),
            weighting: self.weighting,
            aux_policy: self.scorer.policy(),
            entries,
        };

        info!(
            markets = report.len(),
            extreme_signals = report.extreme_signals().len(),
            global_score = ?report.global().map(|g| g.score()),
            "Completed sentiment analysis"
        );

        Ok(report)
    }

    /// Pure per-market step: history and auxiliary gauges in, classified
    /// score out. An empty history scores the neutral 50.
    pub fn evaluate(
        &self,
        market: Market,
        history: &[PriceBar],
        aux: AuxiliaryIndicators,
    ) -> MarketSentiment {
        let raw_metrics = extract_metrics(history).map(|m| m.with_auxiliary(&aux));
        let breakdown = raw_metrics.as_ref().map(|m| self.scorer.breakdown(m));
        let score = match &breakdown {
            Some(b) => b.score,
            None => self.scorer.score(None),
        };
        let result = classify(score);

        debug!(
            market = %market.id,
            ticker = %market.ticker,
            bars = history.len(),
            score = result.score,
            band = ?result.band,
            "Evaluated market sentiment"
        );

        MarketSentiment {
            market,
            result,
            raw_metrics,
            breakdown,
        }
    }

    async fn analyze_market(
        &self,
        market: Market,
        shared: AuxiliaryIndicators,
    ) -> MarketSentiment {
        let history = match self
            .history
            .fetch_history(&market.ticker, self.lookback_months)
            .await
        {
            Ok(bars) => bars,
            Err(e) => {
                warn!(
                    market = %market.id,
                    ticker = %market.ticker,
                    provider = self.history.name(),
                    error = %e,
                    "Price history unavailable, using neutral score"
                );
                Vec::new()
            }
        };

        let aux = match self.auxiliary.indicators(&market).await {
            Ok(aux) => aux.or(shared),
            Err(e) => {
                warn!(
                    market = %market.id,
                    error = %e,
                    "Auxiliary indicators unavailable"
                );
                shared
            }
        };

        self.evaluate(market, &history, aux)
    }

    /// Resolve ids against the catalog, dropping repeats
    fn resolve(&self, selection: &[String]) -> Result<Vec<Market>, AnalysisError> {
        let mut seen = HashSet::new();
        let mut markets = Vec::with_capacity(selection.len());

        for id in selection.iter().map(|s| s.trim()).filter(|s| !s.is_empty()) {
            let market = self
                .catalog
                .get(id)
                .ok_or_else(|| AnalysisError::UnknownMarket(id.to_string()))?;
            if seen.insert(market.id.clone()) {
                markets.push(market.clone());
            }
        }

        if markets.is_empty() {
            return Err(AnalysisError::EmptySelection);
        }
        Ok(markets)
    }
}
