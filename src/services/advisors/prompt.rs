//! Prompt construction and reply parsing for text-based advisors.

use serde::Deserialize;

use super::{AdvisorError, AdvisoryContext};
use crate::types::Judgment;

pub const SYSTEM_PROMPT: &str = "You are a technical analysis expert for forex and binary options \
markets. When given a signal, decide whether it is suitable to trade, how confident you are, \
and why.";

const DEFAULT_TEXT_CONFIDENCE: f64 = 50.0;
const MAX_REASONING_CHARS: usize = 200;

/// Render the user message for a chat-completion advisor.
pub fn build_prompt(context: &AdvisoryContext) -> String {
    let patterns = if context.patterns.is_empty() {
        "No patterns detected".to_string()
    } else {
        context
            .patterns
            .iter()
            .map(|p| format!("- {}: {} (confidence: {})", p.name, p.signal.label(), p.confidence))
            .collect::<Vec<_>>()
            .join("\n")
    };

    let indicators = if context.indicators.is_empty() {
        "No indicators".to_string()
    } else {
        context
            .indicators
            .iter()
            .map(|i| format!("- {}: {} (value: {})", i.name, i.signal.label(), i.value))
            .collect::<Vec<_>>()
            .join("\n")
    };

    format!(
        r#"Analyze the following trading signal:

Asset: {asset}
Proposed recommendation: {recommendation}
Technical confidence: {confidence:.2}%

Detected candle patterns:
{patterns}

Technical indicators:
{indicators}

Required:
1. Do you agree with this recommendation? (yes/no)
2. How confident are you in this analysis? (0-100%)
3. What is the reason for your assessment?

Reply in JSON as follows:
{{
    "approval": true/false,
    "confidence": a number from 0 to 100,
    "reasoning": "a short explanation"
}}
"#,
        asset = context.asset,
        recommendation = context.recommendation.label(),
        confidence = context.technical_confidence,
        patterns = patterns,
        indicators = indicators,
    )
}

#[derive(Debug, Deserialize)]
struct StructuredReply {
    #[serde(default)]
    approval: bool,
    confidence: Confidence,
    #[serde(default)]
    reasoning: String,
}

/// Models sometimes quote the number.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum Confidence {
    Number(f64),
    Text(String),
}

impl Confidence {
    fn value(&self) -> Result<f64, AdvisorError> {
        let value = match self {
            Confidence::Number(n) => *n,
            Confidence::Text(s) => s
                .trim()
                .parse::<f64>()
                .map_err(|_| AdvisorError::Parse(format!("confidence is not a number: {:?}", s)))?,
        };
        if !value.is_finite() {
            return Err(AdvisorError::Parse(format!("confidence is not finite: {}", value)));
        }
        Ok(value)
    }
}

/// Turn a free-form advisor reply into a judgment.
///
/// Tried in order: the whole reply as JSON (when it starts with `{`), the
/// first `{...}` block inside it, then plain-text heuristics. Confidence is
/// always clamped to `[0, 100]`.
pub fn parse_response(source_id: &str, text: &str) -> Result<Judgment, AdvisorError> {
    let trimmed = text.trim();

    if trimmed.starts_with('{') {
        return parse_structured(source_id, trimmed);
    }

    if let Some(block) = first_object(text) {
        return parse_structured(source_id, block);
    }

    Ok(parse_free_text(source_id, text))
}

fn parse_structured(source_id: &str, json: &str) -> Result<Judgment, AdvisorError> {
    let reply: StructuredReply =
        serde_json::from_str(json).map_err(|e| AdvisorError::Parse(e.to_string()))?;

    Ok(Judgment {
        source_id: source_id.to_string(),
        approval: reply.approval,
        confidence: reply.confidence.value()?.clamp(0.0, 100.0),
        reasoning: reply.reasoning,
    })
}

/// First `{` followed by at least one non-`}` character and a closing `}`.
fn first_object(text: &str) -> Option<&str> {
    let mut offset = 0;
    while let Some(start) = text[offset..].find('{').map(|i| i + offset) {
        match text[start + 1..].find('}') {
            Some(0) => offset = start + 1,
            Some(len) => return Some(&text[start..start + len + 2]),
            None => return None,
        }
    }
    None
}

fn parse_free_text(source_id: &str, text: &str) -> Judgment {
    let lower = text.to_lowercase();
    let approval = lower.contains("yes") || lower.contains("agree");

    let confidence = first_number(text)
        .unwrap_or(DEFAULT_TEXT_CONFIDENCE)
        .clamp(0.0, 100.0);

    let reasoning = if text.chars().count() > MAX_REASONING_CHARS {
        let head: String = text.chars().take(MAX_REASONING_CHARS).collect();
        format!("{}...", head)
    } else {
        text.to_string()
    };

    Judgment {
        source_id: source_id.to_string(),
        approval,
        confidence,
        reasoning,
    }
}

/// Leading run of ASCII digits, read as a whole number.
fn first_number(text: &str) -> Option<f64> {
    let start = text.find(|c: char| c.is_ascii_digit())?;
    let digits: String = text[start..]
        .chars()
        .take_while(|c| c.is_ascii_digit())
        .collect();
    digits.parse().ok()
}
