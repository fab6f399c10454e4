//! Relative Strength Index (RSI) indicator.

use crate::services::signals::{make_indicator_output, oscillator_bias, round_to, Indicator};
use crate::types::{Candle, IndicatorOutput};

/// RSI (Relative Strength Index) indicator.
///
/// Measures momentum by comparing the magnitude of recent gains to recent losses.
/// Values range from 0-100:
/// - Below 30: Oversold (bullish)
/// - Above 70: Overbought (bearish)
pub struct Rsi {
    period: usize,
}

impl Default for Rsi {
    fn default() -> Self {
        Self { period: 14 }
    }
}

impl Rsi {
    pub fn new(period: usize) -> Self {
        Self { period }
    }

    /// RSI over the last `period` close-to-close changes, using plain means.
    fn calculate_rsi(candles: &[Candle], period: usize) -> Option<f64> {
        if period == 0 || candles.len() < period + 1 {
            return None;
        }

        let recent = &candles[candles.len() - (period + 1)..];
        let mut gains = 0.0;
        let mut losses = 0.0;

        for pair in recent.windows(2) {
            let change = pair[1].close - pair[0].close;
            if change > 0.0 {
                gains += change;
            } else {
                losses -= change;
            }
        }

        let avg_gain = gains / period as f64;
        let avg_loss = losses / period as f64;

        if avg_loss == 0.0 {
            return Some(100.0);
        }

        let rs = avg_gain / avg_loss;
        let rsi = 100.0 - (100.0 / (1.0 + rs));
        // Overflowing changes leave nothing meaningful to report
        rsi.is_finite().then_some(rsi)
    }
}

impl Indicator for Rsi {
    fn id(&self) -> &str {
        "rsi"
    }

    fn weight(&self) -> u32 {
        15
    }

    fn min_periods(&self) -> usize {
        self.period + 1
    }

    fn calculate(&self, candles: &[Candle]) -> Option<IndicatorOutput> {
        let rsi = Self::calculate_rsi(candles, self.period)?;

        Some(make_indicator_output(
            self.id(),
            round_to(rsi, 2),
            oscillator_bias(rsi, 30.0, 70.0),
            self.weight(),
        ))
    }
}
