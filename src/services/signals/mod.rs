//! Signal analysis pipeline.
//!
//! Candle pattern detection, technical indicator calculation, per-timeframe
//! scoring, cross-timeframe aggregation and advisory confidence blending.
//! Every stage is a synchronous, deterministic function of its inputs.

pub mod aggregator;
pub mod blender;
pub mod indicators;
pub mod patterns;
pub mod pipeline;
pub mod scorer;

pub use aggregator::{aggregate_timeframes, TechnicalVerdict};
pub use blender::{advisory_confidence, blend_confidence};
pub use indicators::IndicatorEngine;
pub use patterns::{detect_patterns, CandlePattern};
pub use pipeline::{analyze, evaluate_technical, finalize, AnalysisError, TechnicalAssessment};
pub use scorer::score_timeframe;

use crate::types::{Candle, IndicatorOutput, SignalBias};

/// Trait for implementing technical indicators.
pub trait Indicator: Send + Sync {
    /// Catalogue name, also used as the output record name.
    fn id(&self) -> &str;

    /// Fixed scoring weight.
    fn weight(&self) -> u32;

    /// Minimum number of candles required for calculation.
    fn min_periods(&self) -> usize;

    /// Calculate the indicator from candle data.
    /// Returns None if there is not enough history.
    fn calculate(&self, candles: &[Candle]) -> Option<IndicatorOutput>;
}

/// Helper to create an IndicatorOutput.
pub fn make_indicator_output(
    name: &str,
    value: f64,
    signal: SignalBias,
    weight: u32,
) -> IndicatorOutput {
    IndicatorOutput {
        name: name.to_string(),
        value,
        signal,
        weight,
    }
}

/// Round to a fixed number of decimal places, ties to even.
pub fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round_ties_even() / factor
}

/// Oscillator reading: bullish below `oversold`, bearish above `overbought`.
pub fn oscillator_bias(value: f64, oversold: f64, overbought: f64) -> SignalBias {
    if value < oversold {
        SignalBias::Bullish
    } else if value > overbought {
        SignalBias::Bearish
    } else {
        SignalBias::Neutral
    }
}
