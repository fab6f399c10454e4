//! Technical and advisory confidence blending.

use super::round_to;
use crate::config::AnalysisConfig;
use crate::types::Judgment;

/// Mean confidence of the approving judgments, 0 when none approve.
pub fn advisory_confidence(judgments: &[Judgment]) -> f64 {
    let approving: Vec<f64> = judgments
        .iter()
        .filter(|j| j.approval)
        .map(|j| j.confidence)
        .collect();

    if approving.is_empty() {
        return 0.0;
    }
    approving.iter().sum::<f64>() / approving.len() as f64
}

/// Weighted blend rounded to 2 decimals. No clamping is applied.
pub fn blend_confidence(technical: f64, advisory: f64, config: &AnalysisConfig) -> f64 {
    round_to(
        technical * config.technical_weight + advisory * config.advisory_weight,
        2,
    )
}
