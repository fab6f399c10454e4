//! Bollinger Bands indicator.

use crate::services::signals::{make_indicator_output, round_to, Indicator};
use crate::types::{Candle, IndicatorOutput, SignalBias};

/// Bollinger Bands position indicator.
///
/// Consists of:
/// - Middle band: SMA(20)
/// - Upper band: SMA + 2 * StdDev
/// - Lower band: SMA - 2 * StdDev
///
/// Reports where the latest close sits between the bands (0 = lower, 1 = upper).
/// Close above the upper band is bearish, below the lower band bullish.
pub struct BollingerBands {
    period: usize,
    std_dev_multiplier: f64,
}

impl Default for BollingerBands {
    fn default() -> Self {
        Self {
            period: 20,
            std_dev_multiplier: 2.0,
        }
    }
}

impl BollingerBands {
    /// Population standard deviation.
    fn std_dev(values: &[f64], mean: f64) -> f64 {
        if values.is_empty() {
            return 0.0;
        }
        let variance: f64 =
            values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / values.len() as f64;
        variance.sqrt()
    }
}

impl Indicator for BollingerBands {
    fn id(&self) -> &str {
        "bollinger_bands"
    }

    fn weight(&self) -> u32 {
        15
    }

    fn min_periods(&self) -> usize {
        self.period
    }

    fn calculate(&self, candles: &[Candle]) -> Option<IndicatorOutput> {
        if self.period == 0 || candles.len() < self.period {
            return None;
        }

        let closes: Vec<f64> = candles[candles.len() - self.period..]
            .iter()
            .map(|c| c.close)
            .collect();

        let middle = closes.iter().sum::<f64>() / self.period as f64;
        let std_dev = Self::std_dev(&closes, middle);

        let upper = middle + self.std_dev_multiplier * std_dev;
        let lower = middle - self.std_dev_multiplier * std_dev;
        let band_width = upper - lower;
        if !band_width.is_finite() {
            return None;
        }

        let current_price = candles.last()?.close;

        let signal = if current_price > upper {
            SignalBias::Bearish
        } else if current_price < lower {
            SignalBias::Bullish
        } else {
            SignalBias::Neutral
        };

        // Collapsed bands: the close sits on the mean, report the midpoint
        let position = if band_width > 0.0 {
            (current_price - lower) / band_width
        } else {
            0.5
        };

        Some(make_indicator_output(
            self.id(),
            round_to(position, 3),
            signal,
            self.weight(),
        ))
    }
}
