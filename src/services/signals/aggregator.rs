//! Cross-timeframe aggregation.

use serde::{Deserialize, Serialize};

use crate::config::AnalysisConfig;
use crate::types::{RecommendationAction, SignalBias, TimeframeAnalysis};

/// Technical outcome of all timeframes combined.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TechnicalVerdict {
    pub recommendation: RecommendationAction,
    /// `|final_score| * 100`, not clamped.
    pub technical_confidence: f64,
    pub final_score: f64,
}

impl TechnicalVerdict {
    fn hold() -> Self {
        Self {
            recommendation: RecommendationAction::Hold,
            technical_confidence: 0.0,
            final_score: 0.0,
        }
    }
}

/// Weight each timeframe's score by its configured timeframe weight and
/// derive a single recommendation.
///
/// A timeframe adds `|score| * weight` to the side named by its
/// `overall_signal`; neutral timeframes only add to the total weight.
pub fn aggregate_timeframes(
    analyses: &[TimeframeAnalysis],
    config: &AnalysisConfig,
) -> TechnicalVerdict {
    let mut weighted_bullish = 0.0;
    let mut weighted_bearish = 0.0;
    let mut total_weight = 0.0;

    for analysis in analyses {
        let weight = config.timeframe_weight(&analysis.timeframe);
        match analysis.overall_signal {
            SignalBias::Bullish => weighted_bullish += analysis.score.abs() * weight,
            SignalBias::Bearish => weighted_bearish += analysis.score.abs() * weight,
            SignalBias::Neutral => {}
        }
        total_weight += weight;
    }

    if total_weight == 0.0 {
        return TechnicalVerdict::hold();
    }

    let final_score = (weighted_bullish - weighted_bearish) / total_weight;

    let recommendation = if final_score > config.signal_threshold {
        RecommendationAction::Buy
    } else if final_score < -config.signal_threshold {
        RecommendationAction::Sell
    } else {
        RecommendationAction::Hold
    };

    TechnicalVerdict {
        recommendation,
        technical_confidence: final_score.abs() * 100.0,
        final_score,
    }
}
