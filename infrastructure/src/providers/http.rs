//! HTTP plumbing shared by the provider adapters

use curlgen_application::ports::llm_gateway::GatewayError;
use reqwest::{RequestBuilder, StatusCode};
use serde_json::Value;
use tracing::debug;

/// Map a non-success HTTP status to a gateway error.
pub(crate) fn status_error(status: StatusCode, body: &str) -> GatewayError {
    let message = error_message(body);
    match status.as_u16() {
        401 | 403 => GatewayError::Authentication(message),
        429 => GatewayError::RateLimited(message),
        code => GatewayError::RequestFailed {
            status: code,
            message,
        },
    }
}

/// Pull `error.message` out of a provider error body, falling back to the raw body.
fn error_message(body: &str) -> String {
    serde_json::from_str::<Value>(body)
        .ok()
        .and_then(|v| {
            v.get("error")
                .and_then(|e| e.get("message").or(Some(e)))
                .and_then(|m| m.as_str().map(String::from))
        })
        .unwrap_or_else(|| body.trim().to_string())
}

fn send_error(err: reqwest::Error) -> GatewayError {
    if err.is_timeout() {
        GatewayError::Timeout
    } else {
        GatewayError::ConnectionError(err.to_string())
    }
}

/// Send a request and decode the JSON body, mapping every failure mode.
pub(crate) async fn send_json(request: RequestBuilder) -> Result<Value, GatewayError> {
    let response = request.send().await.map_err(send_error)?;
    let status = response.status();
    let text = response.text().await.map_err(send_error)?;

    if !status.is_success() {
        debug!(status = status.as_u16(), "Provider returned an error");
        return Err(status_error(status, &text));
    }

    serde_json::from_str(&text)
        .map_err(|e| GatewayError::InvalidResponse(format!("{}: {}", e, truncate(&text))))
}

fn truncate(text: &str) -> &str {
    curlgen_domain::util::truncate_str(text, 200)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        assert!(matches!(
            status_error(StatusCode::UNAUTHORIZED, "bad key"),
            GatewayError::Authentication(m) if m == "bad key"
        ));
        assert!(matches!(
            status_error(StatusCode::FORBIDDEN, ""),
            GatewayError::Authentication(_)
        ));
        assert!(matches!(
            status_error(StatusCode::TOO_MANY_REQUESTS, ""),
            GatewayError::RateLimited(_)
        ));
        assert_eq!(
            status_error(StatusCode::BAD_GATEWAY, "upstream down"),
            GatewayError::RequestFailed {
                status: 502,
                message: "upstream down".to_string()
            }
        );
    }

    #[test]
    fn test_error_message_extracted_from_json() {
        let body = r#"{"error": {"type": "invalid_request_error", "message": "model not found"}}"#;
        assert!(matches!(
            status_error(StatusCode::NOT_FOUND, body),
            GatewayError::RequestFailed { status: 404, message } if message == "model not found"
        ));
    }

    #[test]
    fn test_error_message_string_error_field() {
        let body = r#"{"error": "quota exceeded"}"#;
        assert_eq!(error_message(body), "quota exceeded");
    }
}
