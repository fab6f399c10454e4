//! Stochastic Oscillator indicator.

use crate::services::signals::{make_indicator_output, oscillator_bias, round_to, Indicator};
use crate::types::{Candle, IndicatorOutput};

/// Stochastic Oscillator (%K only).
///
/// Compares closing price to price range over a period:
/// %K = (Current Close - Lowest Low) / (Highest High - Lowest Low) * 100
///
/// Signals:
/// - Below 20: Oversold (bullish)
/// - Above 80: Overbought (bearish)
pub struct Stochastic {
    k_period: usize,
}

impl Default for Stochastic {
    fn default() -> Self {
        Self { k_period: 14 }
    }
}

impl Indicator for Stochastic {
    fn id(&self) -> &str {
        "stochastic"
    }

    fn weight(&self) -> u32 {
        10
    }

    fn min_periods(&self) -> usize {
        self.k_period
    }

    fn calculate(&self, candles: &[Candle]) -> Option<IndicatorOutput> {
        if self.k_period == 0 || candles.len() < self.k_period {
            return None;
        }

        let window = &candles[candles.len() - self.k_period..];

        let lowest_low = window.iter().map(|c| c.low).fold(f64::INFINITY, f64::min);
        let highest_high = window
            .iter()
            .map(|c| c.high)
            .fold(f64::NEG_INFINITY, f64::max);

        let current_close = candles.last()?.close;
        if !(highest_high - lowest_low).is_finite() {
            return None;
        }

        let k = if highest_high != lowest_low {
            ((current_close - lowest_low) / (highest_high - lowest_low)) * 100.0
        } else {
            50.0
        };

        Some(make_indicator_output(
            self.id(),
            round_to(k, 2),
            oscillator_bias(k, 20.0, 80.0),
            self.weight(),
        ))
    }
}
