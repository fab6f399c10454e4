use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// OHLC(V) price bar.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Candle {
    pub timestamp: DateTime<Utc>,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub volume: Option<f64>,
}

impl Candle {
    /// Real body size.
    pub fn body(&self) -> f64 {
        (self.close - self.open).abs()
    }

    /// High-low range.
    pub fn range(&self) -> f64 {
        self.high - self.low
    }

    pub fn upper_shadow(&self) -> f64 {
        self.high - self.open.max(self.close)
    }

    pub fn lower_shadow(&self) -> f64 {
        self.open.min(self.close) - self.low
    }

    /// Close strictly above open.
    pub fn is_bullish(&self) -> bool {
        self.close > self.open
    }

    /// Describe why this candle breaks the OHLC invariant, if it does.
    ///
    /// Requires finite prices and `low <= min(open, close) <= max(open, close) <= high`.
    pub fn violation(&self) -> Option<&'static str> {
        let prices = [self.open, self.high, self.low, self.close];
        if prices.iter().any(|p| !p.is_finite()) {
            return Some("non-finite price");
        }
        if self.low > self.open.min(self.close) {
            return Some("low above body");
        }
        if self.high < self.open.max(self.close) {
            return Some("high below body");
        }
        None
    }
}

/// Candles for one timeframe, most recent last.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimeframeSeries {
    /// Bar interval label (e.g. "5m", "1h").
    pub timeframe: String,
    #[serde(default)]
    pub candles: Vec<Candle>,
}

impl TimeframeSeries {
    pub fn new(timeframe: impl Into<String>, candles: Vec<Candle>) -> Self {
        Self {
            timeframe: timeframe.into(),
            candles,
        }
    }
}
