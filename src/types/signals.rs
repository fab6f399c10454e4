use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Directional bias of a pattern, indicator or timeframe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum SignalBias {
    Bullish,
    Bearish,
    #[default]
    Neutral,
}

impl SignalBias {
    /// Get display label for this bias.
    pub fn label(&self) -> &'static str {
        match self {
            SignalBias::Bullish => "bullish",
            SignalBias::Bearish => "bearish",
            SignalBias::Neutral => "neutral",
        }
    }
}

/// A detected candlestick pattern.
///
/// Only detections are ever emitted; a missing record means "not found".
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PatternMatch {
    /// Catalogue name (e.g. "hammer", "engulfing").
    pub name: String,
    pub detected: bool,
    pub signal: SignalBias,
    /// Fixed catalogue weight.
    pub weight: u32,
    /// Detection confidence in [0, 1].
    pub confidence: f64,
}

/// Output from a single technical indicator calculation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IndicatorOutput {
    /// Catalogue name (e.g. "rsi", "macd").
    pub name: String,
    /// Raw indicator value, rounded for presentation.
    pub value: f64,
    pub signal: SignalBias,
    /// Fixed catalogue weight.
    pub weight: u32,
}

/// Scored view of one timeframe.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimeframeAnalysis {
    pub timeframe: String,
    pub patterns: Vec<PatternMatch>,
    pub indicators: Vec<IndicatorOutput>,
    pub overall_signal: SignalBias,
    /// Bullish minus bearish evidence. Sign matches `overall_signal`.
    pub score: f64,
}

/// One external advisor's opinion on a proposed recommendation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Judgment {
    pub source_id: String,
    pub approval: bool,
    /// Confidence percentage (0-100).
    pub confidence: f64,
    pub reasoning: String,
}

/// Simple recommendation: Buy, Sell, or Hold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecommendationAction {
    Buy,
    Sell,
    Hold,
}

impl RecommendationAction {
    /// Get display label.
    pub fn label(&self) -> &'static str {
        match self {
            RecommendationAction::Buy => "Buy",
            RecommendationAction::Sell => "Sell",
            RecommendationAction::Hold => "Hold",
        }
    }
}

/// Final output of one analysis run.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TradingSignal {
    /// Unique signal ID.
    pub id: Uuid,
    /// Asset this signal is for.
    pub asset: String,
    pub recommendation: RecommendationAction,
    /// Confidence from price-series computation. Not bounded above by 100.
    pub technical_confidence: f64,
    /// Mean confidence of approving advisors (0-100).
    pub advisory_confidence: f64,
    /// Blend of technical and advisory confidence, rounded to 2 decimals.
    pub final_confidence: f64,
    pub timeframe_analyses: Vec<TimeframeAnalysis>,
    pub judgments: Vec<Judgment>,
    pub created_at: DateTime<Utc>,
}
