use serde::{Deserialize, Serialize};

/// Contrarian sentiment band of a risk-love score
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SentimentBand {
    /// Score 0-20 - maximum fear, bullish signal
    Panic,
    /// Score 21-40
    Bearish,
    /// Score 41-60
    Neutral,
    /// Score 61-80
    Bullish,
    /// Score 81-100 - maximum optimism, bearish signal
    Euphoria,
}

impl SentimentBand {
    /// Bands use inclusive upper bounds: 20 is still panic, 21 is bearish.
    pub fn from_score(score: u8) -> Self {
        match score {
            0..=20 => SentimentBand::Panic,
            21..=40 => SentimentBand::Bearish,
            41..=60 => SentimentBand::Neutral,
            61..=80 => SentimentBand::Bullish,
            _ => SentimentBand::Euphoria,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            SentimentBand::Panic => "Panic (Bullish Signal)",
            SentimentBand::Bearish => "Bearish Sentiment",
            SentimentBand::Neutral => "Neutral Territory",
            SentimentBand::Bullish => "Bullish Sentiment",
            SentimentBand::Euphoria => "Euphoria (Bearish Signal)",
        }
    }

    /// Heatmap color, dark green through red
    pub fn color_hex(&self) -> &'static str {
        match self {
            SentimentBand::Panic => "#006837",
            SentimentBand::Bearish => "#31a354",
            SentimentBand::Neutral => "#fed976",
            SentimentBand::Bullish => "#fd8d3c",
            SentimentBand::Euphoria => "#e31a1c",
        }
    }

    pub fn icon(&self) -> &'static str {
        match self {
            SentimentBand::Panic => "🟢",
            SentimentBand::Bearish => "🟡",
            SentimentBand::Neutral => "⚪",
            SentimentBand::Bullish => "🟠",
            SentimentBand::Euphoria => "🔴",
        }
    }

    pub fn signal(&self) -> TradingSignal {
        match self {
            SentimentBand::Panic => TradingSignal::StrongBuy,
            SentimentBand::Bearish => TradingSignal::Buy,
            SentimentBand::Neutral => TradingSignal::Neutral,
            SentimentBand::Bullish => TradingSignal::Caution,
            SentimentBand::Euphoria => TradingSignal::StrongSell,
        }
    }
}

/// Contrarian trading signal derived from a sentiment band
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TradingSignal {
    StrongBuy,
    Buy,
    Neutral,
    Caution,
    StrongSell,
}

impl TradingSignal {
    pub fn name(&self) -> &'static str {
        match self {
            TradingSignal::StrongBuy => "Strong Buy",
            TradingSignal::Buy => "Buy",
            TradingSignal::Neutral => "Neutral",
            TradingSignal::Caution => "Caution",
            TradingSignal::StrongSell => "Strong Sell",
        }
    }

    pub fn rationale(&self) -> &'static str {
        match self {
            TradingSignal::StrongBuy => "Panic conditions = Maximum opportunity",
            TradingSignal::Buy => "Bearish sentiment = Good entry point",
            TradingSignal::Neutral => "Mixed signals = Wait for extremes",
            TradingSignal::Caution => "Bullish sentiment = Reduce risk",
            TradingSignal::StrongSell => "Euphoria conditions = Maximum risk",
        }
    }
}

/// Classified risk-love score for one market
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ScoreResult {
    /// Composite score in [0, 100]
    pub score: u8,
    pub band: SentimentBand,
    pub label: &'static str,
    pub signal: TradingSignal,
}

impl ScoreResult {
    /// Callers outside the crate go through `classifier`, which bounds the
    /// score first.
    ///
    /// # Panics
    /// Panics if score is greater than 100
    pub(crate) fn new(score: u8) -> Self {
        assert!(score <= 100, "score must be in [0, 100], got {}", score);

        let band = SentimentBand::from_score(score);
        ScoreResult {
            score,
            band,
            label: band.label(),
            signal: band.signal(),
        }
    }

    pub fn color_hex(&self) -> &'static str {
        self.band.color_hex()
    }
}
