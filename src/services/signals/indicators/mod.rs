//! Technical indicator implementations.

pub mod bollinger;
pub mod ema;
pub mod macd;
pub mod rsi;
pub mod stochastic;

pub use bollinger::BollingerBands;
pub use ema::{ema_series, EmaCross};
pub use macd::Macd;
pub use rsi::Rsi;
pub use stochastic::Stochastic;

use super::Indicator;
use crate::types::{Candle, IndicatorOutput};

/// Below this many candles no indicator is reported at all.
pub const MIN_CANDLES: usize = 20;

/// Get all catalogued indicators, in output order.
pub fn all_indicators() -> Vec<Box<dyn Indicator>> {
    vec![
        // Momentum
        Box::new(Rsi::default()),
        // Trend
        Box::new(Macd::default()),
        // Volatility
        Box::new(BollingerBands::default()),
        // Trend
        Box::new(EmaCross::default()),
        // Momentum
        Box::new(Stochastic::default()),
    ]
}

/// Runs the indicator catalogue over a candle series.
pub struct IndicatorEngine {
    indicators: Vec<Box<dyn Indicator>>,
}

impl IndicatorEngine {
    pub fn new() -> Self {
        Self {
            indicators: all_indicators(),
        }
    }

    /// Calculate every indicator with enough history.
    ///
    /// Indicators whose minimum is unmet are omitted individually; a series
    /// shorter than [`MIN_CANDLES`] yields an empty list.
    pub fn calculate(&self, candles: &[Candle]) -> Vec<IndicatorOutput> {
        if candles.len() < MIN_CANDLES {
            return Vec::new();
        }

        self.indicators
            .iter()
            .filter(|indicator| candles.len() >= indicator.min_periods())
            .filter_map(|indicator| indicator.calculate(candles))
            .collect()
    }
}

impl Default for IndicatorEngine {
    fn default() -> Self {
        Self::new()
    }
}
