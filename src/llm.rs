//! Generation client abstraction.
//!
//! Labs send one prompt and expect one JSON object back. The
//! [`GenerationClient`] trait is the seam between the lab runner and the
//! hosted model, so tests can substitute a stub.
//!
//! # Providers
//!
//! | Provider | Client | Notes |
//! |----------|--------|-------|
//! | `gemini` | [`GeminiClient`] | Google Generative Language API, JSON response mode |
//! | `disabled` | [`DisabledClient`] | Every call fails with [`LabError::Disabled`] |

use anyhow::Result;
use async_trait::async_trait;
use excel_lab_core::error::LabError;
use serde_json::{json, Value};
use std::sync::Arc;
use std::time::Duration;

use crate::config::LlmConfig;

/// A model that answers a prompt with a JSON value.
#[async_trait]
pub trait GenerationClient: Send + Sync {
    fn model_name(&self) -> &str;

    /// Sends `prompt` and parses the reply as JSON.
    async fn generate_json(&self, prompt: &str) -> Result<Value, LabError>;
}

/// Builds the client named by `config.provider`.
///
/// A missing API key is not an error here: it is reported on the first
/// lab submission so the rest of the course stays usable.
pub fn create_client(config: &LlmConfig) -> Result<Arc<dyn GenerationClient>> {
    match config.provider.as_str() {
        "disabled" => Ok(Arc::new(DisabledClient)),
        "gemini" => Ok(Arc::new(GeminiClient::new(config)?)),
        other => anyhow::bail!("Unknown llm provider: {}", other),
    }
}

// ============ Disabled ============

pub struct DisabledClient;

#[async_trait]
impl GenerationClient for DisabledClient {
    fn model_name(&self) -> &str {
        "disabled"
    }

    async fn generate_json(&self, _prompt: &str) -> Result<Value, LabError> {
        Err(LabError::Disabled)
    }
}

// ============ Gemini ============

/// Client for `POST {base_url}/models/{model}:generateContent`.
pub struct GeminiClient {
    http: reqwest::Client,
    base_url: String,
    model: String,
    api_key: Option<String>,
    api_key_env: String,
}

impl GeminiClient {
    pub fn new(config: &LlmConfig) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;
        let api_key = config.api_key();
        if api_key.is_none() {
            tracing::warn!(
                env_var = %config.api_key_env,
                "API key not set; lab submissions will fail until it is"
            );
        }
        Ok(Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            model: config.model.clone(),
            api_key,
            api_key_env: config.api_key_env.clone(),
        })
    }

    fn endpoint(&self) -> String {
        format!("{}/models/{}:generateContent", self.base_url, self.model)
    }
}

#[async_trait]
impl GenerationClient for GeminiClient {
    fn model_name(&self) -> &str {
        &self.model
    }

    async fn generate_json(&self, prompt: &str) -> Result<Value, LabError> {
        let api_key = self
            .api_key
            .as_deref()
            .ok_or_else(|| LabError::MissingCredential {
                env_var: self.api_key_env.clone(),
            })?;

        let body = json!({
            "contents": [{ "parts": [{ "text": prompt }] }],
            "generationConfig": { "responseMimeType": "application/json" },
        });

        let response = self
            .http
            .post(self.endpoint())
            .header("x-goog-api-key", api_key)
            .header("Content-Type", "application/json")
            .json(&body)
            .send()
            .await
            .map_err(|e| LabError::Request(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(LabError::Api {
                status: status.as_u16(),
                body,
            });
        }

        let json: Value = response
            .json()
            .await
            .map_err(|e| LabError::Request(e.to_string()))?;
        let text = reply_text(&json)?;
        parse_reply(&text)
    }
}

/// Concatenates `candidates[0].content.parts[*].text`.
fn reply_text(json: &Value) -> Result<String, LabError> {
    let parts = json
        .pointer("/candidates/0/content/parts")
        .and_then(Value::as_array)
        .ok_or(LabError::EmptyReply)?;

    let text: String = parts
        .iter()
        .filter_map(|p| p.get("text").and_then(Value::as_str))
        .collect();

    if text.trim().is_empty() {
        return Err(LabError::EmptyReply);
    }
    Ok(text)
}

fn parse_reply(text: &str) -> Result<Value, LabError> {
    serde_json::from_str(text.trim()).map_err(|e| LabError::NotJson(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config_without_key() -> LlmConfig {
        LlmConfig {
            api_key_env: "EXCEL_LAB_TEST_KEY_THAT_IS_NEVER_SET".to_string(),
            ..LlmConfig::default()
        }
    }

    #[test]
    fn test_reply_text_joins_parts() {
        let json = json!({
            "candidates": [{
                "content": { "parts": [{ "text": "{\"reply\":" }, { "text": " \"hi\"}" }] }
            }]
        });
        assert_eq!(reply_text(&json).unwrap(), "{\"reply\": \"hi\"}");
    }

    #[test]
    fn test_reply_text_without_candidates() {
        let err = reply_text(&json!({ "promptFeedback": {} })).unwrap_err();
        assert!(matches!(err, LabError::EmptyReply));
    }

    #[test]
    fn test_reply_text_blank() {
        let json = json!({ "candidates": [{ "content": { "parts": [{ "text": "  " }] } }] });
        assert!(matches!(reply_text(&json).unwrap_err(), LabError::EmptyReply));
    }

    #[test]
    fn test_parse_reply() {
        assert_eq!(
            parse_reply("\n{\"reply\": \"ok\"}\n").unwrap(),
            json!({ "reply": "ok" })
        );
        assert!(matches!(
            parse_reply("Sure! Here you go").unwrap_err(),
            LabError::NotJson(_)
        ));
    }

    #[test]
    fn test_endpoint() {
        let config = LlmConfig {
            base_url: "http://localhost:9999/v1beta/".to_string(),
            ..config_without_key()
        };
        let client = GeminiClient::new(&config).unwrap();
        assert_eq!(
            client.endpoint(),
            "http://localhost:9999/v1beta/models/gemini-2.5-flash-lite:generateContent"
        );
    }

    #[tokio::test]
    async fn test_missing_key_fails_before_request() {
        let config = LlmConfig {
            // Unroutable; the call must never get this far.
            base_url: "http://127.0.0.1:1".to_string(),
            ..config_without_key()
        };
        let client = GeminiClient::new(&config).unwrap();
        let err = client.generate_json("hello").await.unwrap_err();
        assert_eq!(
            err.to_string(),
            "API Key missing. Please set your EXCEL_LAB_TEST_KEY_THAT_IS_NEVER_SET in the environment."
        );
    }

    #[tokio::test]
    async fn test_disabled_client() {
        let client = create_client(&LlmConfig {
            provider: "disabled".to_string(),
            ..LlmConfig::default()
        })
        .unwrap();
        assert_eq!(client.model_name(), "disabled");
        assert!(matches!(
            client.generate_json("x").await.unwrap_err(),
            LabError::Disabled
        ));
    }

    /// What the mock Gemini endpoint saw.
    #[derive(Debug, Clone)]
    struct Recorded {
        path: String,
        api_key: Option<String>,
        body: Value,
    }

    /// Serves `reply` with `status` on every request and records them.
    async fn spawn_gemini_mock(
        status: axum::http::StatusCode,
        reply: Value,
    ) -> (String, Arc<std::sync::Mutex<Vec<Recorded>>>) {
        use axum::extract::State;
        use axum::http::{HeaderMap, Uri};

        type Seen = Arc<std::sync::Mutex<Vec<Recorded>>>;
        let seen: Seen = Arc::new(std::sync::Mutex::new(Vec::new()));

        let handler = move |State(seen): State<Seen>,
                            uri: Uri,
                            headers: HeaderMap,
                            body: String| {
            let reply = reply.clone();
            async move {
                seen.lock().unwrap().push(Recorded {
                    path: uri.path().to_string(),
                    api_key: headers
                        .get("x-goog-api-key")
                        .and_then(|v| v.to_str().ok())
                        .map(str::to_string),
                    body: serde_json::from_str(&body).unwrap_or(Value::Null),
                });
                (status, axum::Json(reply))
            }
        };
        let app = axum::Router::new()
            .fallback(handler)
            .with_state(seen.clone());

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move { axum::serve(listener, app).await });

        (format!("http://{}/v1beta", addr), seen)
    }

    fn client_with_key(base_url: &str, key: &str) -> GeminiClient {
        GeminiClient {
            http: reqwest::Client::new(),
            base_url: base_url.to_string(),
            model: "gemini-2.5-flash-lite".to_string(),
            api_key: Some(key.to_string()),
            api_key_env: "API_KEY".to_string(),
        }
    }

    #[tokio::test]
    async fn test_generate_json_request_and_reply() {
        let reply = json!({
            "candidates": [{ "content": { "parts": [{ "text": "{\"reply\": \"hi\"}" }] } }]
        });
        let (base_url, seen) = spawn_gemini_mock(axum::http::StatusCode::OK, reply).await;
        let client = client_with_key(&base_url, "k");

        let value = client.generate_json("p").await.unwrap();
        assert_eq!(value, json!({ "reply": "hi" }));

        let seen = seen.lock().unwrap();
        assert_eq!(seen.len(), 1);
        assert_eq!(
            seen[0].path,
            "/v1beta/models/gemini-2.5-flash-lite:generateContent"
        );
        assert_eq!(seen[0].api_key.as_deref(), Some("k"));
        assert_eq!(
            seen[0].body,
            json!({
                "contents": [{ "parts": [{ "text": "p" }] }],
                "generationConfig": { "responseMimeType": "application/json" },
            })
        );
    }

    #[tokio::test]
    async fn test_generate_json_non_success_status() {
        let (base_url, _) = spawn_gemini_mock(
            axum::http::StatusCode::TOO_MANY_REQUESTS,
            json!({ "error": { "message": "quota exceeded" } }),
        )
        .await;
        let client = client_with_key(&base_url, "k");

        let err = client.generate_json("p").await.unwrap_err();
        match err {
            LabError::Api { status, body } => {
                assert_eq!(status, 429);
                assert!(body.contains("quota exceeded"));
            }
            other => panic!("expected Api error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_generate_json_rejects_prose_reply() {
        let reply = json!({
            "candidates": [{ "content": { "parts": [{ "text": "Here is your formula" }] } }]
        });
        let (base_url, _) = spawn_gemini_mock(axum::http::StatusCode::OK, reply).await;
        let client = client_with_key(&base_url, "k");

        let err = client.generate_json("p").await.unwrap_err();
        assert!(matches!(err, LabError::NotJson(_)));
    }
}
