use crate::config::ProviderConfig;
use crate::services::advisors::{
    build_prompt, parse_response, Advisor, AdvisorError, AdvisoryContext, SYSTEM_PROMPT,
};
use crate::types::Judgment;
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::debug;

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: [ChatMessage<'a>; 2],
    temperature: f64,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: Option<ChatReply>,
}

#[derive(Debug, Deserialize)]
struct ChatReply {
    content: Option<String>,
}

/// Advisor backed by an OpenAI-compatible chat-completion endpoint.
#[derive(Clone)]
pub struct ChatCompletionAdvisor {
    client: Client,
    id: String,
    api_url: String,
    api_key: String,
    model: String,
    temperature: f64,
}

impl ChatCompletionAdvisor {
    /// Create a new advisor for a configured provider.
    pub fn new(provider: &ProviderConfig) -> Self {
        let client = Client::builder()
            .user_agent("Augur/1.0")
            .build()
            .unwrap_or_else(|_| Client::new());

        Self {
            client,
            id: provider.id.clone(),
            api_url: provider.api_url.clone(),
            api_key: provider.api_key.clone().unwrap_or_default(),
            model: provider.model.clone(),
            temperature: provider.temperature,
        }
    }

    async fn complete(&self, prompt: &str) -> Result<String, AdvisorError> {
        let request = ChatRequest {
            model: &self.model,
            messages: [
                ChatMessage {
                    role: "system",
                    content: SYSTEM_PROMPT,
                },
                ChatMessage {
                    role: "user",
                    content: prompt,
                },
            ],
            temperature: self.temperature,
        };

        let response = self
            .client
            .post(&self.api_url)
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(AdvisorError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let reply: ChatResponse = response.json().await?;
        first_content(reply)
    }
}

fn first_content(reply: ChatResponse) -> Result<String, AdvisorError> {
    reply
        .choices
        .into_iter()
        .next()
        .and_then(|choice| choice.message)
        .and_then(|message| message.content)
        .filter(|content| !content.trim().is_empty())
        .ok_or(AdvisorError::MissingContent)
}

#[async_trait]
impl Advisor for ChatCompletionAdvisor {
    fn id(&self) -> &str {
        &self.id
    }

    async fn judge(&self, context: &AdvisoryContext) -> Result<Judgment, AdvisorError> {
        let prompt = build_prompt(context);
        let content = self.complete(&prompt).await?;
        debug!("{} replied with {} chars", self.id, content.len());
        parse_response(&self.id, &content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::RecommendationAction;
    use axum::http::header::{AUTHORIZATION, USER_AGENT};
    use axum::http::{HeaderMap, StatusCode};
    use axum::{routing::post, Json, Router};
    use serde_json::{json, Value};

    fn provider(url: String) -> ProviderConfig {
        ProviderConfig {
            id: "deepseek".to_string(),
            api_url: url,
            model: "deepseek-chat".to_string(),
            temperature: 0.4,
            api_key: Some("sk-test".to_string()),
            enabled: true,
        }
    }

    fn context() -> AdvisoryContext {
        AdvisoryContext {
            asset: "EURUSD_OTC".to_string(),
            recommendation: RecommendationAction::Buy,
            technical_confidence: 91.0,
            patterns: vec![],
            indicators: vec![],
            timeframes: vec![],
        }
    }

    /// Serve `router` on an ephemeral local port and return its base URL.
    async fn serve(router: Router) -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, router).await.unwrap();
        });
        format!("http://{}/v1/chat/completions", addr)
    }

    #[test]
    fn test_first_content() {
        let reply: ChatResponse = serde_json::from_value(json!({
            "choices": [{"message": {"role": "assistant", "content": "{\"confidence\": 1}"}}]
        }))
        .unwrap();
        assert_eq!(first_content(reply).unwrap(), "{\"confidence\": 1}");

        let empty: ChatResponse = serde_json::from_value(json!({ "choices": [] })).unwrap();
        assert!(matches!(first_content(empty), Err(AdvisorError::MissingContent)));

        let blank: ChatResponse =
            serde_json::from_value(json!({ "choices": [{"message": {"content": "  "}}] }))
                .unwrap();
        assert!(matches!(first_content(blank), Err(AdvisorError::MissingContent)));
    }

    #[tokio::test]
    async fn test_judge_against_local_endpoint() {
        let (tx, mut rx) = tokio::sync::mpsc::unbounded_channel::<(HeaderMap, Value)>();
        let router = Router::new().route(
            "/v1/chat/completions",
            post(move |headers: HeaderMap, Json(body): Json<Value>| {
                let tx = tx.clone();
                async move {
                    let _ = tx.send((headers, body));
                    Json(json!({
                        "choices": [{
                            "message": {
                                "role": "assistant",
                                "content": "{\"approval\": true, \"confidence\": 77, \"reasoning\": \"trend\"}"
                            }
                        }]
                    }))
                }
            }),
        );
        let advisor = ChatCompletionAdvisor::new(&provider(serve(router).await));

        let judgment = advisor.judge(&context()).await.unwrap();
        assert_eq!(judgment.source_id, "deepseek");
        assert!(judgment.approval);
        assert_eq!(judgment.confidence, 77.0);
        assert_eq!(judgment.reasoning, "trend");

        let (headers, body) = rx.recv().await.unwrap();
        assert_eq!(headers[AUTHORIZATION], "Bearer sk-test");
        assert_eq!(headers[USER_AGENT], "Augur/1.0");
        assert_eq!(body["model"], "deepseek-chat");
        assert_eq!(body["temperature"], 0.4);
        assert_eq!(body["messages"][0]["role"], "system");
        assert_eq!(body["messages"][0]["content"], SYSTEM_PROMPT);
        assert_eq!(body["messages"][1]["role"], "user");
        assert!(body["messages"][1]["content"]
            .as_str()
            .unwrap()
            .contains("Asset: EURUSD_OTC"));
    }

    #[tokio::test]
    async fn test_judge_reports_http_status() {
        let router = Router::new().route(
            "/v1/chat/completions",
            post(|| async { (StatusCode::UNAUTHORIZED, "bad key") }),
        );
        let advisor = ChatCompletionAdvisor::new(&provider(serve(router).await));

        match advisor.judge(&context()).await {
            Err(AdvisorError::Status { status, body }) => {
                assert_eq!(status, 401);
                assert_eq!(body, "bad key");
            }
            other => panic!("unexpected result: {other:?}"),
        }
    }
}
