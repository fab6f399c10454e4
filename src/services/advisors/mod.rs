//! Advisory panel.
//!
//! Independent advisors review a proposed recommendation and each return a
//! [`Judgment`]. The panel asks all of them at once and keeps whatever comes
//! back in time.

pub mod heuristic;
pub mod prompt;

pub use heuristic::HeuristicAdvisor;
pub use prompt::{build_prompt, parse_response, SYSTEM_PROMPT};

use async_trait::async_trait;
use futures_util::future::join_all;
use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, warn};

use crate::services::signals::TechnicalAssessment;
use crate::types::{IndicatorOutput, Judgment, PatternMatch, RecommendationAction, SignalBias};

/// Reasons an advisor produced no judgment.
#[derive(Error, Debug)]
pub enum AdvisorError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("unexpected status {status}: {body}")]
    Status { status: u16, body: String },

    #[error("timed out after {0:?}")]
    Timeout(Duration),

    #[error("unparseable reply: {0}")]
    Parse(String),

    #[error("reply carried no message content")]
    MissingContent,
}

/// One timeframe's outcome as shown to advisors.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TimeframeSummary {
    pub timeframe: String,
    pub signal: SignalBias,
    pub score: f64,
}

/// Everything an advisor gets to see.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AdvisoryContext {
    pub asset: String,
    pub recommendation: RecommendationAction,
    pub technical_confidence: f64,
    /// Detected patterns across all timeframes.
    pub patterns: Vec<PatternMatch>,
    /// Indicator readings across all timeframes.
    pub indicators: Vec<IndicatorOutput>,
    pub timeframes: Vec<TimeframeSummary>,
}

impl AdvisoryContext {
    pub fn from_assessment(asset: &str, assessment: &TechnicalAssessment) -> Self {
        let analyses = &assessment.analyses;

        Self {
            asset: asset.to_string(),
            recommendation: assessment.verdict.recommendation,
            technical_confidence: assessment.verdict.technical_confidence,
            patterns: analyses
                .iter()
                .flat_map(|a| a.patterns.iter().filter(|p| p.detected).cloned())
                .collect(),
            indicators: analyses
                .iter()
                .flat_map(|a| a.indicators.iter().cloned())
                .collect(),
            timeframes: analyses
                .iter()
                .map(|a| TimeframeSummary {
                    timeframe: a.timeframe.clone(),
                    signal: a.overall_signal,
                    score: a.score,
                })
                .collect(),
        }
    }
}

/// A source of second opinions on a recommendation.
#[async_trait]
pub trait Advisor: Send + Sync {
    /// Stable identifier, copied into `Judgment::source_id`.
    fn id(&self) -> &str;

    async fn judge(&self, context: &AdvisoryContext) -> Result<Judgment, AdvisorError>;
}

/// Fan-out over a fixed set of advisors.
pub struct AdvisorPanel {
    advisors: Vec<Arc<dyn Advisor>>,
    timeout: Duration,
}

impl AdvisorPanel {
    pub fn new(advisors: Vec<Arc<dyn Advisor>>, timeout: Duration) -> Self {
        Self { advisors, timeout }
    }

    /// Registered advisor ids, in registration order.
    pub fn ids(&self) -> Vec<String> {
        self.advisors.iter().map(|a| a.id().to_string()).collect()
    }

    pub fn is_empty(&self) -> bool {
        self.advisors.is_empty()
    }

    /// Ask every advisor concurrently, each bounded by the panel timeout.
    ///
    /// Failures and timeouts are logged and dropped; they never affect the
    /// other advisors. Judgments come back in registration order.
    pub async fn collect(&self, context: &AdvisoryContext) -> Vec<Judgment> {
        let futures: Vec<_> = self
            .advisors
            .iter()
            .map(|advisor| async move {
                let result = match tokio::time::timeout(self.timeout, advisor.judge(context)).await
                {
                    Ok(result) => result,
                    Err(_) => Err(AdvisorError::Timeout(self.timeout)),
                };
                (advisor.id(), result)
            })
            .collect();

        let results = join_all(futures).await;

        let mut judgments = Vec::with_capacity(results.len());
        for (advisor_id, result) in results {
            match result {
                Ok(judgment) => {
                    debug!(
                        advisor = advisor_id,
                        approval = judgment.approval,
                        confidence = judgment.confidence,
                        "Advisor judgment received"
                    );
                    judgments.push(judgment);
                }
                Err(e) => {
                    warn!(
                        advisor = advisor_id,
                        asset = %context.asset,
                        error = %e,
                        "Advisor produced no judgment"
                    );
                }
            }
        }

        judgments
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AnalysisConfig;
    use crate::services::signals::evaluate_technical;
    use crate::types::{TimeframeAnalysis, TimeframeSeries};

    struct FixedAdvisor {
        id: &'static str,
        confidence: f64,
        delay: Duration,
    }

    #[async_trait]
    impl Advisor for FixedAdvisor {
        fn id(&self) -> &str {
            self.id
        }

        async fn judge(&self, _context: &AdvisoryContext) -> Result<Judgment, AdvisorError> {
            tokio::time::sleep(self.delay).await;
            Ok(Judgment {
                source_id: self.id.to_string(),
                approval: true,
                confidence: self.confidence,
                reasoning: "fixed".to_string(),
            })
        }
    }

    struct FailingAdvisor;

    #[async_trait]
    impl Advisor for FailingAdvisor {
        fn id(&self) -> &str {
            "failing"
        }

        async fn judge(&self, _context: &AdvisoryContext) -> Result<Judgment, AdvisorError> {
            Err(AdvisorError::Status {
                status: 503,
                body: "unavailable".to_string(),
            })
        }
    }

    fn fixed(id: &'static str, confidence: f64, delay_ms: u64) -> Arc<dyn Advisor> {
        Arc::new(FixedAdvisor {
            id,
            confidence,
            delay: Duration::from_millis(delay_ms),
        })
    }

    fn context() -> AdvisoryContext {
        AdvisoryContext {
            asset: "EURUSD_OTC".to_string(),
            recommendation: RecommendationAction::Buy,
            technical_confidence: 90.0,
            patterns: vec![],
            indicators: vec![],
            timeframes: vec![],
        }
    }

    #[tokio::test]
    async fn test_collect_preserves_registration_order() {
        // Slowest first: completion order differs from registration order
        let panel = AdvisorPanel::new(
            vec![fixed("a", 10.0, 40), fixed("b", 20.0, 0), fixed("c", 30.0, 10)],
            Duration::from_secs(2),
        );
        let judgments = panel.collect(&context()).await;
        let ids: Vec<&str> = judgments.iter().map(|j| j.source_id.as_str()).collect();
        assert_eq!(ids, vec!["a", "b", "c"]);
    }

    #[tokio::test]
    async fn test_failures_and_timeouts_are_isolated() {
        let panel = AdvisorPanel::new(
            vec![
                fixed("fast", 70.0, 0),
                Arc::new(FailingAdvisor),
                fixed("slow", 99.0, 5_000),
                fixed("steady", 80.0, 5),
            ],
            Duration::from_millis(200),
        );
        let judgments = panel.collect(&context()).await;
        let ids: Vec<&str> = judgments.iter().map(|j| j.source_id.as_str()).collect();
        assert_eq!(ids, vec!["fast", "steady"]);
    }

    #[tokio::test]
    async fn test_empty_panel() {
        let panel = AdvisorPanel::new(vec![], Duration::from_millis(10));
        assert!(panel.is_empty());
        assert!(panel.collect(&context()).await.is_empty());
    }

    #[test]
    fn test_panel_ids() {
        let panel = AdvisorPanel::new(
            vec![fixed("chatgpt", 0.0, 0), Arc::new(FailingAdvisor)],
            Duration::from_secs(1),
        );
        assert_eq!(panel.ids(), vec!["chatgpt", "failing"]);
    }

    #[test]
    fn test_context_from_assessment() {
        let assessment = TechnicalAssessment {
            analyses: vec![TimeframeAnalysis {
                timeframe: "5m".to_string(),
                patterns: vec![PatternMatch {
                    name: "doji".to_string(),
                    detected: true,
                    signal: SignalBias::Neutral,
                    weight: 6,
                    confidence: 0.7,
                }],
                indicators: vec![],
                overall_signal: SignalBias::Neutral,
                score: 0.0,
            }],
            verdict: evaluate_technical(
                &[TimeframeSeries::new("5m", vec![])],
                &AnalysisConfig::default(),
            )
            .unwrap()
            .verdict,
        };

        let ctx = AdvisoryContext::from_assessment("GBPUSD", &assessment);
        assert_eq!(ctx.asset, "GBPUSD");
        assert_eq!(ctx.recommendation, RecommendationAction::Hold);
        assert_eq!(ctx.patterns.len(), 1);
        assert_eq!(ctx.timeframes.len(), 1);
        assert_eq!(ctx.timeframes[0].timeframe, "5m");
    }
}
