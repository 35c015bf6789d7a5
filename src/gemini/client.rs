use std::future::Future;
use std::time::Duration;

use reqwest::{Client, StatusCode};
use tracing::debug;

use super::error::CallError;
use super::types::{GenerateContentRequest, GenerateContentResponse};
use crate::config::ApiConfig;

/// A single prompt-in, text-out exchange with a text-generation provider.
///
/// Implementations perform exactly one request per call and never retry;
/// retrying is the executor's job.
pub trait ContentGenerator {
    fn generate(&self, prompt: &str) -> impl Future<Output = Result<String, CallError>> + Send;
}

pub struct GeminiClient {
    client: Client,
    endpoint: String,
    api_key: String,
}

impl GeminiClient {
    pub fn new(config: &ApiConfig) -> Result<Self, CallError> {
        let client = Client::builder()
            .connect_timeout(Duration::from_secs(config.connect_timeout_secs))
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()?;
        Ok(Self {
            client,
            endpoint: config.endpoint(),
            api_key: config.api_key.clone(),
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    pub async fn send(&self, req: &GenerateContentRequest) -> Result<String, CallError> {
        let response = self
            .client
            .post(&self.endpoint)
            .query(&[("key", self.api_key.as_str())])
            .header("content-type", "application/json")
            .json(req)
            .send()
            .await?;

        let status = response.status();
        debug!(status = status.as_u16(), "generateContent responded");

        if status == StatusCode::TOO_MANY_REQUESTS {
            let retry_after_secs = response
                .headers()
                .get("retry-after")
                .and_then(|v| v.to_str().ok())
                .and_then(|v| v.trim().parse::<u64>().ok());
            return Err(CallError::RateLimited { retry_after_secs });
        }

        if !status.is_success() {
            let text = response
                .text()
                .await
                .unwrap_or_else(|_| "unknown error".to_string());
            return Err(CallError::Server {
                status: status.as_u16(),
                body: compact_body(text),
            });
        }

        let bytes = response.bytes().await?;
        let body: GenerateContentResponse = serde_json::from_slice(&bytes)
            .map_err(|e| CallError::Structural(format!("response is not valid JSON: {e}")))?;
        body.first_text()
            .map(str::to_string)
            .map_err(|reason| CallError::Structural(reason.to_string()))
    }
}

impl ContentGenerator for GeminiClient {
    async fn generate(&self, prompt: &str) -> Result<String, CallError> {
        self.send(&GenerateContentRequest::from_prompt(prompt)).await
    }
}

/// Re-serializes JSON error bodies onto one line; anything else is kept as-is.
fn compact_body(text: String) -> String {
    match serde_json::from_str::<serde_json::Value>(&text) {
        Ok(value) => value.to_string(),
        Err(_) => text,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{body_json, header, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    const MODEL_PATH: &str = "/models/test-model:generateContent";

    fn config_for(server: &MockServer) -> ApiConfig {
        ApiConfig {
            base_url: server.uri(),
            model: "test-model".into(),
            api_key: "test-key".into(),
            connect_timeout_secs: 5,
            request_timeout_secs: 5,
        }
    }

    fn success_body(text: &str) -> serde_json::Value {
        serde_json::json!({"candidates": [{"content": {"parts": [{"text": text}]}}]})
    }

    #[tokio::test]
    async fn posts_prompt_with_key_as_query_param() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path(MODEL_PATH))
            .and(query_param("key", "test-key"))
            .and(header("content-type", "application/json"))
            .and(body_json(
                serde_json::json!({"contents": [{"parts": [{"text": "say hi"}]}]}),
            ))
            .respond_with(ResponseTemplate::new(200).set_body_json(success_body("hi")))
            .expect(1)
            .mount(&server)
            .await;

        let client = GeminiClient::new(&config_for(&server)).unwrap();
        assert_eq!(client.generate("say hi").await.unwrap(), "hi");
    }

    #[tokio::test]
    async fn too_many_requests_maps_to_rate_limited() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(429).insert_header("retry-after", "7"))
            .mount(&server)
            .await;

        let client = GeminiClient::new(&config_for(&server)).unwrap();
        let err = client.generate("x").await.unwrap_err();
        assert!(matches!(
            err,
            CallError::RateLimited {
                retry_after_secs: Some(7)
            }
        ));
    }

    #[tokio::test]
    async fn error_status_keeps_compacted_body() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(500).set_body_string(
                "{\n  \"error\": {\n    \"code\": 500,\n    \"message\": \"internal\"\n  }\n}",
            ))
            .mount(&server)
            .await;

        let client = GeminiClient::new(&config_for(&server)).unwrap();
        match client.generate("x").await.unwrap_err() {
            CallError::Server { status, body } => {
                assert_eq!(status, 500);
                assert_eq!(body, r#"{"error":{"code":500,"message":"internal"}}"#);
            }
            other => panic!("expected Server error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn error_status_with_plain_text_body() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(503).set_body_string("upstream unavailable"))
            .mount(&server)
            .await;

        let client = GeminiClient::new(&config_for(&server)).unwrap();
        match client.generate("x").await.unwrap_err() {
            CallError::Server { status, body } => {
                assert_eq!(status, 503);
                assert_eq!(body, "upstream unavailable");
            }
            other => panic!("expected Server error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn success_without_candidates_is_structural() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({})))
            .mount(&server)
            .await;

        let client = GeminiClient::new(&config_for(&server)).unwrap();
        let err = client.generate("x").await.unwrap_err();
        assert!(matches!(err, CallError::Structural(_)));
        assert!(!err.is_retryable());
    }

    #[tokio::test]
    async fn success_with_non_json_body_is_structural() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
            .mount(&server)
            .await;

        let client = GeminiClient::new(&config_for(&server)).unwrap();
        let err = client.generate("x").await.unwrap_err();
        assert!(matches!(err, CallError::Structural(_)));
    }

    #[tokio::test]
    async fn unreachable_host_is_transport_failure() {
        let config = ApiConfig {
            base_url: "http://127.0.0.1:9".into(),
            model: "m".into(),
            api_key: "k".into(),
            connect_timeout_secs: 1,
            request_timeout_secs: 1,
        };
        let client = GeminiClient::new(&config).unwrap();
        let err = client.generate("x").await.unwrap_err();
        assert!(matches!(err, CallError::Transport(_)));
        assert!(err.is_retryable());
    }
}
