//! Per-timeframe scoring.

use crate::types::{IndicatorOutput, PatternMatch, SignalBias, TimeframeAnalysis};

/// Combine detected patterns and indicator readings for one timeframe.
///
/// Patterns contribute `weight * confidence` to their side, indicators their
/// full weight. Neutral evidence contributes nothing.
pub fn score_timeframe(
    timeframe: &str,
    patterns: Vec<PatternMatch>,
    indicators: Vec<IndicatorOutput>,
) -> TimeframeAnalysis {
    let mut bullish = 0.0;
    let mut bearish = 0.0;

    for pattern in patterns.iter().filter(|p| p.detected) {
        let strength = pattern.weight as f64 * pattern.confidence;
        match pattern.signal {
            SignalBias::Bullish => bullish += strength,
            SignalBias::Bearish => bearish += strength,
            SignalBias::Neutral => {}
        }
    }

    for indicator in &indicators {
        match indicator.signal {
            SignalBias::Bullish => bullish += indicator.weight as f64,
            SignalBias::Bearish => bearish += indicator.weight as f64,
            SignalBias::Neutral => {}
        }
    }

    let overall_signal = if bullish > bearish {
        SignalBias::Bullish
    } else if bearish > bullish {
        SignalBias::Bearish
    } else {
        SignalBias::Neutral
    };

    TimeframeAnalysis {
        timeframe: timeframe.to_string(),
        patterns,
        indicators,
        overall_signal,
        score: bullish - bearish,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::signals::make_indicator_output;

    fn pattern(name: &str, signal: SignalBias, weight: u32, confidence: f64) -> PatternMatch {
        PatternMatch {
            name: name.to_string(),
            detected: true,
            signal,
            weight,
            confidence,
        }
    }

    #[test]
    fn test_empty_inputs_neutral_zero() {
        let analysis = score_timeframe("5m", vec![], vec![]);
        assert_eq!(analysis.timeframe, "5m");
        assert_eq!(analysis.overall_signal, SignalBias::Neutral);
        assert_eq!(analysis.score, 0.0);
    }

    #[test]
    fn test_patterns_weighted_by_confidence() {
        let analysis = score_timeframe(
            "1m",
            vec![pattern("engulfing", SignalBias::Bullish, 10, 0.9)],
            vec![],
        );
        assert_eq!(analysis.overall_signal, SignalBias::Bullish);
        assert!((analysis.score - 9.0).abs() < 1e-9);
    }

    #[test]
    fn test_indicators_full_weight() {
        let analysis = score_timeframe(
            "15m",
            vec![pattern("hammer", SignalBias::Bullish, 8, 0.8)],
            vec![
                make_indicator_output("rsi", 75.0, SignalBias::Bearish, 15),
                make_indicator_output("stochastic", 50.0, SignalBias::Neutral, 10),
            ],
        );
        // 6.4 bullish vs 15 bearish
        assert_eq!(analysis.overall_signal, SignalBias::Bearish);
        assert!((analysis.score + 8.6).abs() < 1e-9);
        assert_eq!(analysis.indicators.len(), 2);
    }

    #[test]
    fn test_neutral_evidence_ignored() {
        let analysis = score_timeframe(
            "1h",
            vec![pattern("doji", SignalBias::Neutral, 6, 0.7)],
            vec![make_indicator_output("bollinger_bands", 0.5, SignalBias::Neutral, 15)],
        );
        assert_eq!(analysis.overall_signal, SignalBias::Neutral);
        assert_eq!(analysis.score, 0.0);
        assert_eq!(analysis.patterns.len(), 1);
    }

    #[test]
    fn test_balanced_evidence_is_neutral() {
        let analysis = score_timeframe(
            "30m",
            vec![],
            vec![
                make_indicator_output("rsi", 25.0, SignalBias::Bullish, 15),
                make_indicator_output("bollinger_bands", 1.2, SignalBias::Bearish, 15),
            ],
        );
        assert_eq!(analysis.overall_signal, SignalBias::Neutral);
        assert_eq!(analysis.score, 0.0);
    }
}
