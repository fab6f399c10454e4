//! Candlestick pattern detection on the most recent bar(s).
//!
//! Single-bar shapes (hammer, doji, shooting star) are judged on the last
//! candle using body and shadow ratios against the full high-low range.
//! Engulfing compares the last two candles' bodies.

use crate::types::{Candle, PatternMatch, SignalBias};

// ============================================================
// RATIO THRESHOLDS (fraction of the high-low range)
// ============================================================

/// Body is small: body / range < SMALL_BODY_RATIO
const SMALL_BODY_RATIO: f64 = 0.3;
/// Doji body: body / range < DOJI_BODY_RATIO
const DOJI_BODY_RATIO: f64 = 0.1;
/// Dominant shadow: shadow / range > LONG_SHADOW_RATIO
const LONG_SHADOW_RATIO: f64 = 0.6;
/// Negligible shadow: shadow / range < SHORT_SHADOW_RATIO
const SHORT_SHADOW_RATIO: f64 = 0.1;

const HAMMER_CONFIDENCE: f64 = 0.8;
const DOJI_CONFIDENCE: f64 = 0.7;
const SHOOTING_STAR_CONFIDENCE: f64 = 0.8;
const ENGULFING_CONFIDENCE: f64 = 0.9;

/// Pattern catalogue.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CandlePattern {
    Hammer,
    Doji,
    Engulfing,
    ShootingStar,
    /// Catalogued with a weight but no detection rule produces it.
    SpinningTop,
}

impl CandlePattern {
    pub const ALL: [CandlePattern; 5] = [
        CandlePattern::Hammer,
        CandlePattern::Doji,
        CandlePattern::Engulfing,
        CandlePattern::ShootingStar,
        CandlePattern::SpinningTop,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            CandlePattern::Hammer => "hammer",
            CandlePattern::Doji => "doji",
            CandlePattern::Engulfing => "engulfing",
            CandlePattern::ShootingStar => "shooting_star",
            CandlePattern::SpinningTop => "spinning_top",
        }
    }

    /// Fixed scoring weight.
    pub fn weight(&self) -> u32 {
        match self {
            CandlePattern::Hammer => 8,
            CandlePattern::Doji => 6,
            CandlePattern::Engulfing => 10,
            CandlePattern::ShootingStar => 6,
            CandlePattern::SpinningTop => 4,
        }
    }

    fn matched(self, signal: SignalBias, confidence: f64) -> PatternMatch {
        PatternMatch {
            name: self.name().to_string(),
            detected: true,
            signal,
            weight: self.weight(),
            confidence,
        }
    }
}

/// Scan the latest candles for catalogued patterns.
///
/// Needs at least two candles; otherwise nothing is reported. Every rule is
/// evaluated independently, so a single bar can match several patterns.
pub fn detect_patterns(candles: &[Candle]) -> Vec<PatternMatch> {
    let [.., previous, current] = candles else {
        return Vec::new();
    };

    [
        detect_hammer(current),
        detect_doji(current),
        detect_engulfing(previous, current),
        detect_shooting_star(current),
    ]
    .into_iter()
    .flatten()
    .collect()
}

/// Small body near the high with a long lower shadow.
pub fn detect_hammer(candle: &Candle) -> Option<PatternMatch> {
    let range = candle.range();
    if range <= 0.0 {
        return None;
    }

    let small_body = candle.body() / range < SMALL_BODY_RATIO;
    let long_lower = candle.lower_shadow() / range > LONG_SHADOW_RATIO;
    let short_upper = candle.upper_shadow() / range < SHORT_SHADOW_RATIO;

    (small_body && long_lower && short_upper)
        .then(|| CandlePattern::Hammer.matched(SignalBias::Bullish, HAMMER_CONFIDENCE))
}

/// Open and close nearly equal relative to the range.
pub fn detect_doji(candle: &Candle) -> Option<PatternMatch> {
    let range = candle.range();
    if range <= 0.0 {
        return None;
    }

    (candle.body() / range < DOJI_BODY_RATIO)
        .then(|| CandlePattern::Doji.matched(SignalBias::Neutral, DOJI_CONFIDENCE))
}

/// Small body near the low with a long upper shadow.
pub fn detect_shooting_star(candle: &Candle) -> Option<PatternMatch> {
    let range = candle.range();
    if range <= 0.0 {
        return None;
    }

    let small_body = candle.body() / range < SMALL_BODY_RATIO;
    let long_upper = candle.upper_shadow() / range > LONG_SHADOW_RATIO;
    let short_lower = candle.lower_shadow() / range < SHORT_SHADOW_RATIO;

    (small_body && long_upper && short_lower).then(|| {
        CandlePattern::ShootingStar.matched(SignalBias::Bearish, SHOOTING_STAR_CONFIDENCE)
    })
}

/// Current body swallows the previous body in the opposite direction.
pub fn detect_engulfing(previous: &Candle, current: &Candle) -> Option<PatternMatch> {
    let prev_bullish = previous.is_bullish();
    let curr_bullish = current.is_bullish();

    if !prev_bullish
        && curr_bullish
        && current.open < previous.close
        && current.close > previous.open
    {
        return Some(CandlePattern::Engulfing.matched(SignalBias::Bullish, ENGULFING_CONFIDENCE));
    }

    if prev_bullish
        && !curr_bullish
        && current.open > previous.close
        && current.close < previous.open
    {
        return Some(CandlePattern::Engulfing.matched(SignalBias::Bearish, ENGULFING_CONFIDENCE));
    }

    None
}
