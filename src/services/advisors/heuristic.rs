//! Offline advisor with a fixed decision rule.

use async_trait::async_trait;

use super::{Advisor, AdvisorError, AdvisoryContext};
use crate::types::{Judgment, RecommendationAction};

/// Technical confidence needed before the heuristic approves.
const APPROVAL_THRESHOLD: f64 = 85.0;
const MAX_APPROVAL_CONFIDENCE: f64 = 90.0;
const HOLD_CONFIDENCE: f64 = 20.0;
const REJECT_CONFIDENCE: f64 = 40.0;

/// Deterministic stand-in for a remote advisor.
///
/// Rejects `hold` outright, approves strong technical calls and rejects the
/// rest. Useful for demos and for running without API keys.
pub struct HeuristicAdvisor {
    id: String,
}

impl HeuristicAdvisor {
    pub fn new(id: impl Into<String>) -> Self {
        Self { id: id.into() }
    }

    fn decide(context: &AdvisoryContext) -> (bool, f64) {
        if context.recommendation == RecommendationAction::Hold {
            (false, HOLD_CONFIDENCE)
        } else if context.technical_confidence >= APPROVAL_THRESHOLD {
            (true, context.technical_confidence.min(MAX_APPROVAL_CONFIDENCE))
        } else {
            (false, REJECT_CONFIDENCE)
        }
    }
}

impl Default for HeuristicAdvisor {
    fn default() -> Self {
        Self::new("heuristic")
    }
}

#[async_trait]
impl Advisor for HeuristicAdvisor {
    fn id(&self) -> &str {
        &self.id
    }

    async fn judge(&self, context: &AdvisoryContext) -> Result<Judgment, AdvisorError> {
        let (approval, confidence) = Self::decide(context);

        Ok(Judgment {
            source_id: self.id.clone(),
            approval,
            confidence,
            reasoning: format!(
                "Simulated review by {} of {} at {:.2}% technical confidence",
                self.id,
                context.recommendation.label(),
                context.technical_confidence
            ),
        })
    }
}
