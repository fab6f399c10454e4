//! End-to-end analysis runs.
//!
//! `evaluate_technical` covers everything computable from price data alone;
//! `finalize` folds in advisor judgments. The HTTP layer calls them
//! separately so advisors can see the technical result before judging.

use chrono::Utc;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;
use uuid::Uuid;

use super::aggregator::{aggregate_timeframes, TechnicalVerdict};
use super::blender::{advisory_confidence, blend_confidence};
use super::indicators::IndicatorEngine;
use super::patterns::detect_patterns;
use super::scorer::score_timeframe;
use crate::config::AnalysisConfig;
use crate::types::{Judgment, TimeframeAnalysis, TimeframeSeries, TradingSignal};

/// Input shape errors that stop an analysis run.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum AnalysisError {
    #[error("no timeframes supplied")]
    NoTimeframes,

    #[error("malformed candle {index} in timeframe {timeframe}: {reason}")]
    MalformedCandle {
        timeframe: String,
        index: usize,
        reason: String,
    },
}

/// Technical result of one run, before advisory input.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TechnicalAssessment {
    pub analyses: Vec<TimeframeAnalysis>,
    pub verdict: TechnicalVerdict,
}

/// Score every timeframe and aggregate into a technical verdict.
///
/// Every candle is validated before any scoring; the first violation aborts
/// the run. Timeframes with too little history still produce an analysis,
/// just an empty one.
pub fn evaluate_technical(
    series: &[TimeframeSeries],
    config: &AnalysisConfig,
) -> Result<TechnicalAssessment, AnalysisError> {
    if series.is_empty() {
        return Err(AnalysisError::NoTimeframes);
    }

    for s in series {
        for (index, candle) in s.candles.iter().enumerate() {
            if let Some(reason) = candle.violation() {
                return Err(AnalysisError::MalformedCandle {
                    timeframe: s.timeframe.clone(),
                    index,
                    reason: reason.to_string(),
                });
            }
        }
    }

    let engine = IndicatorEngine::new();

    let analyses: Vec<TimeframeAnalysis> = series
        .iter()
        .map(|s| {
            let patterns = detect_patterns(&s.candles);
            let indicators = engine.calculate(&s.candles);
            let analysis = score_timeframe(&s.timeframe, patterns, indicators);

            debug!(
                "Scored {} with {} candles: {} ({:.2}), {} patterns, {} indicators",
                s.timeframe,
                s.candles.len(),
                analysis.overall_signal.label(),
                analysis.score,
                analysis.patterns.len(),
                analysis.indicators.len()
            );

            analysis
        })
        .collect();

    let verdict = aggregate_timeframes(&analyses, config);

    debug!(
        "Technical verdict {:?}: score {:.4}, confidence {:.2}",
        verdict.recommendation, verdict.final_score, verdict.technical_confidence
    );

    Ok(TechnicalAssessment { analyses, verdict })
}

/// Blend a technical assessment with advisor judgments into the final signal.
pub fn finalize(
    asset: &str,
    assessment: TechnicalAssessment,
    judgments: Vec<Judgment>,
    config: &AnalysisConfig,
) -> TradingSignal {
    let technical = assessment.verdict.technical_confidence;
    let advisory = advisory_confidence(&judgments);
    let final_confidence = blend_confidence(technical, advisory, config);

    debug!(
        "Final confidence for {}: {:.2} (technical {:.2}, advisory {:.2}, {} judgments)",
        asset,
        final_confidence,
        technical,
        advisory,
        judgments.len()
    );

    TradingSignal {
        id: Uuid::new_v4(),
        asset: asset.to_string(),
        recommendation: assessment.verdict.recommendation,
        technical_confidence: technical,
        advisory_confidence: advisory,
        final_confidence,
        timeframe_analyses: assessment.analyses,
        judgments,
        created_at: Utc::now(),
    }
}

/// Run the whole pipeline with an already collected judgment set.
pub fn analyze(
    asset: &str,
    series: &[TimeframeSeries],
    judgments: Vec<Judgment>,
    config: &AnalysisConfig,
) -> Result<TradingSignal, AnalysisError> {
    let assessment = evaluate_technical(series, config)?;
    Ok(finalize(asset, assessment, judgments, config))
}
