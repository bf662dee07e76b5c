use crate::core::reasoning::{build_prompt, ReasoningError, ReasoningGenerator};
use crate::models::{MenteeProfile, MentorProfile};
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Token cap for a reasoning completion
const MAX_TOKENS: u32 = 200;

/// Reasoning generator backed by an OpenAI-compatible chat completions API
pub struct LlmReasoningClient {
    base_url: String,
    api_key: String,
    model: String,
    client: Client,
}

impl From<reqwest::Error> for ReasoningError {
    fn from(err: reqwest::Error) -> Self {
        ReasoningError::Transport(Box::new(err))
    }
}

#[derive(Debug, Serialize)]
struct ChatCompletionRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    max_tokens: u32,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChatChoiceMessage {
    #[serde(default)]
    content: Option<String>,
}

impl LlmReasoningClient {
    /// Create a new client
    pub fn new(
        base_url: String,
        api_key: String,
        model: String,
        timeout: Duration,
    ) -> Result<Self, ReasoningError> {
        let client = Client::builder().timeout(timeout).build()?;

        Ok(Self {
            base_url,
            api_key,
            model,
            client,
        })
    }

    fn completions_url(&self) -> String {
        format!("{}/chat/completions", self.base_url.trim_end_matches('/'))
    }
}

#[async_trait]
impl ReasoningGenerator for LlmReasoningClient {
    async fn generate_reasoning(
        &self,
        mentee: &MenteeProfile,
        mentor: &MentorProfile,
        score: u8,
    ) -> Result<String, ReasoningError> {
        let prompt = build_prompt(mentee, mentor, score);
        let request = ChatCompletionRequest {
            model: &self.model,
            messages: vec![ChatMessage {
                role: "user",
                content: &prompt,
            }],
            max_tokens: MAX_TOKENS,
        };

        tracing::debug!("Requesting reasoning for {} -> {}", mentee.id, mentor.id);

        let response = self
            .client
            .post(self.completions_url())
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "Unable to read body".to_string());
            return Err(ReasoningError::ApiError(format!(
                "Completion request failed: {} - {}",
                status, body
            )));
        }

        let completion: ChatCompletionResponse = response.json().await?;

        let text = completion
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .map(|content| content.trim().to_string())
            .unwrap_or_default();

        if text.is_empty() {
            return Err(ReasoningError::EmptyResponse);
        }

        Ok(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_profiles() -> (MenteeProfile, MentorProfile) {
        let mentee = MenteeProfile {
            id: "mentee".to_string(),
            industry_focus: vec!["FinTech".to_string()],
            startup_stage: Some("seed".to_string()),
        };
        let mentor = MentorProfile {
            id: "mentor".to_string(),
            expertise_areas: vec!["Fundraising".to_string()],
            name: Some("Grace".to_string()),
            ..Default::default()
        };
        (mentee, mentor)
    }

    fn create_client(base_url: String) -> LlmReasoningClient {
        LlmReasoningClient::new(
            base_url,
            "test-key".to_string(),
            "gpt-4o-mini".to_string(),
            Duration::from_secs(5),
        )
        .unwrap()
    }

    #[tokio::test]
    async fn test_parses_completion() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/chat/completions")
            .match_header("authorization", "Bearer test-key")
            .match_body(mockito::Matcher::PartialJson(serde_json::json!({
                "model": "gpt-4o-mini",
                "max_tokens": 200
            })))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"choices":[{"message":{"role":"assistant","content":"  Grace has raised three seed rounds.  "}}]}"#)
            .create_async()
            .await;

        let client = create_client(server.url());
        let (mentee, mentor) = create_profiles();

        let text = client.generate_reasoning(&mentee, &mentor, 82).await.unwrap();

        assert_eq!(text, "Grace has raised three seed rounds.");
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_error_status_is_reported() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/chat/completions")
            .with_status(500)
            .with_body("upstream unavailable")
            .create_async()
            .await;

        let client = create_client(server.url());
        let (mentee, mentor) = create_profiles();

        let result = client.generate_reasoning(&mentee, &mentor, 82).await;

        assert!(matches!(result, Err(ReasoningError::ApiError(_))));
    }

    #[tokio::test]
    async fn test_empty_choices_is_an_error() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/chat/completions")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"choices":[]}"#)
            .create_async()
            .await;

        let client = create_client(format!("{}/", server.url()));
        let (mentee, mentor) = create_profiles();

        let result = client.generate_reasoning(&mentee, &mentor, 82).await;

        assert!(matches!(result, Err(ReasoningError::EmptyResponse)));
    }

    #[tokio::test]
    async fn test_malformed_body_is_a_transport_error() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/chat/completions")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body("not json")
            .create_async()
            .await;

        let client = create_client(server.url());
        let (mentee, mentor) = create_profiles();

        let err = client.generate_reasoning(&mentee, &mentor, 82).await.unwrap_err();

        assert!(matches!(err, ReasoningError::Transport(_)));
        assert!(err.to_string().starts_with("Reasoning request failed"));
    }
}
