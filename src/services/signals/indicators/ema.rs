//! Exponential Moving Average (EMA) series and the EMA(20)/EMA(50) cross.

use crate::services::signals::{make_indicator_output, round_to, Indicator};
use crate::types::{Candle, IndicatorOutput, SignalBias};

/// Full-length EMA series.
///
/// Seeded with the first value rather than an SMA, so the output has the same
/// length as the input: `ema[0] = v[0]`, `ema[i] = a*v[i] + (1-a)*ema[i-1]`
/// with `a = 2 / (period + 1)`.
pub fn ema_series(values: &[f64], period: usize) -> Vec<f64> {
    let Some(&first) = values.first() else {
        return Vec::new();
    };

    let alpha = 2.0 / (period as f64 + 1.0);
    let mut ema = Vec::with_capacity(values.len());
    ema.push(first);

    for value in &values[1..] {
        let prev = ema[ema.len() - 1];
        ema.push(alpha * value + (1.0 - alpha) * prev);
    }

    ema
}

/// EMA cross indicator.
///
/// Compares a fast EMA against a slow EMA on closes:
/// - Fast above slow (or just crossed above) = bullish
/// - Fast below slow (or just crossed below) = bearish
/// - Exactly equal = neutral
pub struct EmaCross {
    fast_period: usize,
    slow_period: usize,
}

impl Default for EmaCross {
    fn default() -> Self {
        Self {
            fast_period: 20,
            slow_period: 50,
        }
    }
}

impl EmaCross {
    fn classify(current_diff: f64, prev_diff: f64) -> SignalBias {
        if current_diff > 0.0 && prev_diff <= 0.0 {
            // Fresh golden cross
            SignalBias::Bullish
        } else if current_diff < 0.0 && prev_diff >= 0.0 {
            // Fresh death cross
            SignalBias::Bearish
        } else if current_diff > 0.0 {
            SignalBias::Bullish
        } else if current_diff < 0.0 {
            SignalBias::Bearish
        } else {
            SignalBias::Neutral
        }
    }
}

impl Indicator for EmaCross {
    fn id(&self) -> &str {
        "ema_cross"
    }

    fn weight(&self) -> u32 {
        10
    }

    fn min_periods(&self) -> usize {
        self.slow_period
    }

    fn calculate(&self, candles: &[Candle]) -> Option<IndicatorOutput> {
        if candles.len() < self.min_periods() {
            return None;
        }

        let closes: Vec<f64> = candles.iter().map(|c| c.close).collect();
        let fast = ema_series(&closes, self.fast_period);
        let slow = ema_series(&closes, self.slow_period);

        let n = closes.len();
        let current_diff = fast[n - 1] - slow[n - 1];
        let prev_diff = if n > 1 {
            fast[n - 2] - slow[n - 2]
        } else {
            0.0
        };
        if !current_diff.is_finite() || !prev_diff.is_finite() {
            return None;
        }

        Some(make_indicator_output(
            self.id(),
            round_to(current_diff, 5),
            Self::classify(current_diff, prev_diff),
            self.weight(),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::signals::fixtures::{candles_from_closes, falling, rising};

    #[test]
    fn test_ema_series_seed_and_length() {
        let ema = ema_series(&[10.0, 20.0, 30.0], 3);
        assert_eq!(ema.len(), 3);
        assert_eq!(ema[0], 10.0);
        // alpha = 0.5
        assert_eq!(ema[1], 15.0);
        assert_eq!(ema[2], 22.5);
    }

    #[test]
    fn test_ema_series_empty() {
        assert!(ema_series(&[], 12).is_empty());
    }

    #[test]
    fn test_ema_cross_min_periods() {
        let cross = EmaCross::default();
        assert_eq!(cross.min_periods(), 50);
        assert!(cross.calculate(&rising(49)).is_none());
        assert!(cross.calculate(&rising(50)).is_some());
    }

    #[test]
    fn test_ema_cross_uptrend_bullish() {
        let output = EmaCross::default().calculate(&rising(60)).unwrap();
        assert_eq!(output.name, "ema_cross");
        assert_eq!(output.weight, 10);
        assert_eq!(output.signal, SignalBias::Bullish);
        assert!(output.value > 0.0);
    }

    #[test]
    fn test_ema_cross_downtrend_bearish() {
        let output = EmaCross::default().calculate(&falling(60)).unwrap();
        assert_eq!(output.signal, SignalBias::Bearish);
        assert!(output.value < 0.0);
    }

    #[test]
    fn test_ema_cross_flat_neutral() {
        let candles = candles_from_closes(&[1.0; 55]);
        let output = EmaCross::default().calculate(&candles).unwrap();
        assert_eq!(output.signal, SignalBias::Neutral);
        assert_eq!(output.value, 0.0);
    }

    #[test]
    fn test_classify_fresh_crosses() {
        assert_eq!(EmaCross::classify(0.5, -0.1), SignalBias::Bullish);
        assert_eq!(EmaCross::classify(0.5, 0.0), SignalBias::Bullish);
        assert_eq!(EmaCross::classify(-0.5, 0.2), SignalBias::Bearish);
        assert_eq!(EmaCross::classify(-0.5, -0.2), SignalBias::Bearish);
        assert_eq!(EmaCross::classify(0.0, 1.0), SignalBias::Neutral);
    }
}
