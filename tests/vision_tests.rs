//! # Vision Client Tests
//!
//! Uses wiremock to stand in for the chat completions endpoint and checks the
//! exact request shape and the handling of each response kind.

use homework_bot::config::VisionConfig;
use homework_bot::errors::VisionError;
use homework_bot::vision::{OpenAiVisionClient, VisionModel};
use serde_json::json;
use wiremock::matchers::{body_partial_json, body_string_contains, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const API_PATH: &str = "/v1/chat/completions";

fn client_for(server: &MockServer) -> OpenAiVisionClient {
    let config = VisionConfig {
        endpoint: format!("{}{}", server.uri(), API_PATH),
        request_timeout_secs: 5,
        ..Default::default()
    };
    OpenAiVisionClient::new("test-key", config).unwrap()
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Test the answer comes from choices[0].message.content
    #[tokio::test]
    async fn test_describe_returns_first_choice() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path(API_PATH))
            .and(header("authorization", "Bearer test-key"))
            .and(header("content-type", "application/json"))
            .and(body_partial_json(json!({
                "model": "gpt-4o-mini",
                "max_tokens": 300
            })))
            .and(body_string_contains("data:image/jpeg;base64,/9j/"))
            .and(body_string_contains("\"type\":\"image_url\""))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "id": "chatcmpl-123",
                "object": "chat.completion",
                "choices": [
                    {"index": 0, "message": {"role": "assistant", "content": "2 + 2 = 4"}},
                    {"index": 1, "message": {"role": "assistant", "content": "ignored"}}
                ]
            })))
            .expect(1)
            .mount(&server)
            .await;

        let answer = client_for(&server)
            .describe(vec![0xFF, 0xD8, 0xFF, 0xE0])
            .await
            .unwrap();
        assert_eq!(answer, "2 + 2 = 4");
    }

    /// Test a body without choices is reported as malformed
    #[tokio::test]
    async fn test_missing_choices_is_malformed() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path(API_PATH))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"object": "chat.completion"})))
            .mount(&server)
            .await;

        let result = client_for(&server).describe(vec![1, 2, 3]).await;
        assert!(matches!(result, Err(VisionError::MalformedResponse(_))));
    }

    /// Test non-success statuses carry the status code and a body excerpt
    #[tokio::test]
    async fn test_error_status() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path(API_PATH))
            .respond_with(
                ResponseTemplate::new(401).set_body_string("{\"error\":{\"message\":\"Incorrect API key\"}}"),
            )
            .mount(&server)
            .await;

        match client_for(&server).describe(vec![1, 2, 3]).await {
            Err(VisionError::Status { status, body }) => {
                assert_eq!(status, 401);
                assert!(body.contains("Incorrect API key"));
            }
            other => panic!("expected status error, got {other:?}"),
        }
    }

    /// Test an unreachable endpoint is an HTTP error, not a panic
    #[tokio::test]
    async fn test_unreachable_endpoint() {
        let config = VisionConfig {
            endpoint: "http://127.0.0.1:9/v1/chat/completions".to_string(),
            request_timeout_secs: 2,
            ..Default::default()
        };
        let client = OpenAiVisionClient::new("test-key", config).unwrap();

        let result = client.describe(vec![1, 2, 3]).await;
        assert!(matches!(result, Err(VisionError::Http(_))));
    }

    /// Test error messages are readable
    #[test]
    fn test_error_display() {
        let err = VisionError::Status {
            status: 500,
            body: "oops".to_string(),
        };
        assert_eq!(err.to_string(), "API returned status 500: oops");

        let err = VisionError::MalformedResponse("response has no choices".to_string());
        assert_eq!(
            err.to_string(),
            "Malformed API response: response has no choices"
        );
    }
}
