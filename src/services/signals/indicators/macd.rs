//! MACD (Moving Average Convergence Divergence) indicator.

use super::ema::ema_series;
use crate::services::signals::{make_indicator_output, round_to, Indicator};
use crate::types::{Candle, IndicatorOutput, SignalBias};

/// MACD indicator.
///
/// Shows the relationship between two EMAs:
/// - MACD Line = EMA(12) - EMA(26)
/// - Signal Line = EMA(9) of MACD Line
///
/// Bullish only when the line is above its signal line and above zero;
/// bearish only when below its signal line and below zero. Anything else,
/// including a line under its signal but still positive, is neutral.
pub struct Macd {
    fast_period: usize,
    slow_period: usize,
    signal_period: usize,
}

impl Default for Macd {
    fn default() -> Self {
        Self {
            fast_period: 12,
            slow_period: 26,
            signal_period: 9,
        }
    }
}

impl Macd {
    fn classify(macd: f64, signal: f64) -> SignalBias {
        if macd > signal && macd > 0.0 {
            SignalBias::Bullish
        } else if macd < signal && macd < 0.0 {
            SignalBias::Bearish
        } else {
            SignalBias::Neutral
        }
    }
}

impl Indicator for Macd {
    fn id(&self) -> &str {
        "macd"
    }

    fn weight(&self) -> u32 {
        20
    }

    fn min_periods(&self) -> usize {
        self.slow_period
    }

    fn calculate(&self, candles: &[Candle]) -> Option<IndicatorOutput> {
        if candles.len() < self.min_periods() {
            return None;
        }

        let closes: Vec<f64> = candles.iter().map(|c| c.close).collect();

        let fast_ema = ema_series(&closes, self.fast_period);
        let slow_ema = ema_series(&closes, self.slow_period);

        // Both series are full length, so they align index by index
        let macd_line: Vec<f64> = fast_ema
            .iter()
            .zip(slow_ema.iter())
            .map(|(f, s)| f - s)
            .collect();

        let signal_line = ema_series(&macd_line, self.signal_period);

        let macd = *macd_line.last()?;
        let signal = *signal_line.last()?;
        if !macd.is_finite() || !signal.is_finite() {
            return None;
        }

        Some(make_indicator_output(
            self.id(),
            round_to(macd, 5),
            Self::classify(macd, signal),
            self.weight(),
        ))
    }
}
