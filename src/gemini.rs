//! The chat relay: forwards a prompt to the Gemini `generateContent`
//! operation and returns the text of the first candidate unmodified.

use crate::error::GatewayError;
use serde::{Deserialize, Serialize};
use tracing::debug;

const API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta/models";

#[derive(Serialize)]
struct GenerateContentRequest {
    contents: Vec<Content>,
}

#[derive(Serialize)]
struct Content {
    parts: Vec<Part>,
}

#[derive(Serialize)]
struct Part {
    text: String,
}

#[derive(Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Deserialize)]
struct Candidate {
    content: CandidateContent,
}

#[derive(Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<CandidatePart>,
}

#[derive(Deserialize)]
struct CandidatePart {
    text: Option<String>,
}

/// A client for one Gemini model. The credential comes from configuration,
/// never from source.
#[derive(Debug)]
pub struct ChatRelay {
    http: reqwest::Client,
    api_key: String,
    model: String,
}

impl ChatRelay {
    pub fn new(api_key: String, model: String) -> Self {
        ChatRelay {
            http: reqwest::Client::new(),
            api_key,
            model,
        }
    }

    /// Relay `prompt` to the provider and return its text completion.
    ///
    /// An empty prompt fails with `MissingQuery` before any network I/O.
    /// Transport failures, non-2xx statuses and unparseable bodies all
    /// surface as `Provider` errors; there is no retry.
    pub async fn generate(&self, prompt: &str) -> Result<String, GatewayError> {
        if prompt.trim().is_empty() {
            return Err(GatewayError::MissingQuery);
        }

        let url = format!("{API_BASE}/{}:generateContent", self.model);
        let body = GenerateContentRequest {
            contents: vec![Content {
                parts: vec![Part {
                    text: prompt.to_string(),
                }],
            }],
        };

        let response = self
            .http
            .post(&url)
            .query(&[("key", self.api_key.as_str())])
            .json(&body)
            .send()
            .await
            .map_err(|e| GatewayError::Provider(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(GatewayError::Provider(format!(
                "provider returned status {status}"
            )));
        }

        let payload: GenerateContentResponse = response
            .json()
            .await
            .map_err(|e| GatewayError::Provider(format!("unparseable provider response: {e}")))?;
        debug!("provider returned {} candidates", payload.candidates.len());

        extract_text(payload)
    }
}

/// Pull the first candidate's first text part out of a provider response
fn extract_text(payload: GenerateContentResponse) -> Result<String, GatewayError> {
    payload
        .candidates
        .into_iter()
        .next()
        .and_then(|c| c.content.parts.into_iter().next())
        .and_then(|p| p.text)
        .ok_or_else(|| GatewayError::Provider("response contained no text candidate".to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_empty_query_fails_before_network() {
        let relay = ChatRelay::new("test-key".into(), "gemini-1.5-flash".into());
        for prompt in ["", "   ", "\n"] {
            let err = relay.generate(prompt).await.unwrap_err();
            assert!(matches!(err, GatewayError::MissingQuery));
        }
    }

    #[test]
    fn test_request_body_shape() {
        let body = GenerateContentRequest {
            contents: vec![Content {
                parts: vec![Part {
                    text: "hello".into(),
                }],
            }],
        };
        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"contents": [{"parts": [{"text": "hello"}]}]})
        );
    }

    #[test]
    fn test_extract_text_passes_payload_through() {
        let payload: GenerateContentResponse = serde_json::from_value(serde_json::json!({
            "candidates": [
                {"content": {"parts": [{"text": "the answer"}, {"text": "ignored"}]}}
            ]
        }))
        .unwrap();
        assert_eq!(extract_text(payload).unwrap(), "the answer");
    }

    #[test]
    fn test_extract_text_rejects_empty_candidates() {
        let payload: GenerateContentResponse =
            serde_json::from_value(serde_json::json!({"candidates": []})).unwrap();
        let err = extract_text(payload).unwrap_err();
        assert!(matches!(err, GatewayError::Provider(_)));
    }

    #[test]
    fn test_extract_text_rejects_partless_candidate() {
        let payload: GenerateContentResponse = serde_json::from_value(serde_json::json!({
            "candidates": [{"content": {"parts": []}}]
        }))
        .unwrap();
        assert!(extract_text(payload).is_err());
    }
}
