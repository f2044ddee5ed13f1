use std::time::Duration;

use reqwest::Client;

use super::ContentGenerator;
use super::error::GeminiError;
use super::types::{GenerateRequest, GenerateResponse};

const API_URL: &str = "https://generativelanguage.googleapis.com/v1beta/models";

pub struct GeminiClient {
    api_key: String,
    client: Client,
    base_url: String,
}

impl GeminiClient {
    pub fn new(api_key: String) -> Self {
        Self::with_base_url(api_key, API_URL.to_string())
    }

    /// Create a client pointing at a custom base URL (useful for testing).
    pub fn with_base_url(api_key: String, base_url: String) -> Self {
        let client = Client::builder()
            .connect_timeout(Duration::from_secs(10))
            .timeout(Duration::from_secs(120))
            .build()
            .expect("failed to build HTTP client");
        Self {
            api_key,
            client,
            base_url,
        }
    }
}

impl ContentGenerator for GeminiClient {
    async fn generate(
        &self,
        model: &str,
        req: &GenerateRequest,
    ) -> Result<GenerateResponse, GeminiError> {
        let url = format!("{}/{model}:generateContent", self.base_url);
        let response = self
            .client
            .post(&url)
            .header("x-goog-api-key", &self.api_key)
            .header("content-type", "application/json")
            .json(req)
            .send()
            .await?;

        let status = response.status();

        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            let retry_after = response
                .headers()
                .get("retry-after")
                .and_then(|v| v.to_str().ok())
                .and_then(|v| v.parse::<u64>().ok())
                .map(|secs| secs * 1000)
                .unwrap_or(1000);
            return Err(GeminiError::RateLimited {
                retry_after_ms: retry_after,
            });
        }

        if !status.is_success() {
            let message = response
                .text()
                .await
                .unwrap_or_else(|_| "unknown error".to_string());
            return Err(GeminiError::ApiError {
                status: status.as_u16(),
                message,
            });
        }

        let body = response.json::<GenerateResponse>().await?;
        Ok(body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn response_body(text: &str) -> serde_json::Value {
        serde_json::json!({
            "candidates": [{"content": {"parts": [{"text": text}]}}]
        })
    }

    #[tokio::test]
    async fn generate_posts_to_model_endpoint() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/gemini-1.5-flash-latest:generateContent"))
            .and(header("x-goog-api-key", "test-key"))
            .respond_with(ResponseTemplate::new(200).set_body_json(response_body("ok")))
            .mount(&server)
            .await;

        let client = GeminiClient::with_base_url("test-key".into(), server.uri());
        let resp = client
            .generate(
                "gemini-1.5-flash-latest",
                &GenerateRequest::from_text("hello"),
            )
            .await
            .unwrap();
        assert_eq!(resp.text().as_deref(), Some("ok"));
    }

    #[tokio::test]
    async fn generate_maps_429_to_rate_limited() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(429).insert_header("retry-after", "7"))
            .mount(&server)
            .await;

        let client = GeminiClient::with_base_url("test-key".into(), server.uri());
        let err = client
            .generate("gemini-1.5-flash-latest", &GenerateRequest::from_text("x"))
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            GeminiError::RateLimited {
                retry_after_ms: 7000
            }
        ));
    }

    #[tokio::test]
    async fn generate_maps_non_success_to_api_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(400).set_body_string("API key not valid"))
            .mount(&server)
            .await;

        let client = GeminiClient::with_base_url("bad-key".into(), server.uri());
        let err = client
            .generate("gemini-1.5-flash-latest", &GenerateRequest::from_text("x"))
            .await
            .unwrap_err();
        match err {
            GeminiError::ApiError { status, message } => {
                assert_eq!(status, 400);
                assert_eq!(message, "API key not valid");
            }
            other => panic!("expected ApiError, got {other:?}"),
        }
    }
}
