//! Remote data gateway: authenticated GraphQL execution against the backend.
//!
//! The gateway attaches a bearer token obtained just-in-time, posts the
//! operation, and normalizes every outcome into [`GatewayError`]. It performs
//! no retries; callers surface the error and leave cache state unchanged.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use serde_json::Value;
use tracing::debug;

use crate::config::Config;
use crate::error::{GatewayError, GatewayResult, TokenError};

/// Supplies a bearer token on demand. Acquisition may suspend (e.g. a silent
/// refresh against an identity provider); failure aborts the operation with
/// [`GatewayError::AuthFailed`].
#[async_trait]
pub trait TokenProvider: Send + Sync {
    async fn token(&self) -> Result<String, TokenError>;
}

/// A token provider returning a fixed value, for setups where the token is
/// issued out of band (and for tests).
#[derive(Debug, Clone)]
pub struct StaticTokenProvider(pub String);

#[async_trait]
impl TokenProvider for StaticTokenProvider {
    async fn token(&self) -> Result<String, TokenError> {
        Ok(self.0.clone())
    }
}

#[derive(Debug, Deserialize)]
struct Envelope {
    data: Option<Value>,
    errors: Option<Vec<RemoteError>>,
}

#[derive(Debug, Deserialize)]
struct RemoteError {
    message: String,
}

pub struct Gateway {
    client: Client,
    endpoint: String,
    tokens: Box<dyn TokenProvider>,
}

impl Gateway {
    pub fn new(config: &Config, tokens: Box<dyn TokenProvider>) -> GatewayResult<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()
            .map_err(|e| GatewayError::Remote(format!("failed to create HTTP client: {}", e)))?;
        Ok(Self {
            client,
            endpoint: config.backend_url.clone(),
            tokens,
        })
    }

    /// Execute one GraphQL operation and return its `data` value.
    pub async fn execute(&self, query: &str, variables: Value) -> GatewayResult<Value> {
        let token = self
            .tokens
            .token()
            .await
            .map_err(|e| GatewayError::AuthFailed(e.0))?;

        debug!(endpoint = %self.endpoint, "executing remote operation");

        let response = self
            .client
            .post(&self.endpoint)
            .bearer_auth(token)
            .json(&serde_json::json!({
                "query": query,
                "variables": variables,
            }))
            .send()
            .await
            .map_err(|e| GatewayError::Remote(e.to_string()))?;

        let status = response.status();
        let body = response
            .bytes()
            .await
            .map_err(|e| GatewayError::Remote(e.to_string()))?;

        interpret_envelope(status.is_success(), status.as_u16(), &body)
    }
}

/// Map a transport status + response body onto the gateway error taxonomy.
///
/// An `errors` list wins over the transport status (the first message is
/// surfaced); a non-2xx response without one becomes a generic `Remote`
/// error; a 2xx response without usable `data` is `Malformed`.
fn interpret_envelope(success: bool, status: u16, body: &[u8]) -> GatewayResult<Value> {
    let envelope: Option<Envelope> = serde_json::from_slice(body).ok();

    if let Some(errors) = envelope.as_ref().and_then(|e| e.errors.as_ref()) {
        if let Some(first) = errors.first() {
            return Err(GatewayError::Remote(first.message.clone()));
        }
    }

    if !success {
        return Err(GatewayError::Remote(format!("server returned {}", status)));
    }

    match envelope.and_then(|e| e.data) {
        Some(data) => Ok(data),
        None => Err(GatewayError::Malformed),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_data_envelope() {
        let body = br#"{"data": {"budgets": []}}"#;
        let result = interpret_envelope(true, 200, body).unwrap();
        assert!(result.get("budgets").is_some());
    }

    #[test]
    fn test_errors_envelope_surfaces_first_message() {
        let body = br#"{"errors": [{"message": "Unauthorized"}, {"message": "second"}]}"#;
        let err = interpret_envelope(true, 200, body).unwrap_err();
        assert_eq!(err, GatewayError::Remote("Unauthorized".into()));
    }

    #[test]
    fn test_errors_envelope_wins_over_status() {
        let body = br#"{"errors": [{"message": "Forbidden"}]}"#;
        let err = interpret_envelope(false, 403, body).unwrap_err();
        assert_eq!(err, GatewayError::Remote("Forbidden".into()));
    }

    #[test]
    fn test_non_2xx_without_envelope() {
        let err = interpret_envelope(false, 502, b"Bad Gateway").unwrap_err();
        assert_eq!(err, GatewayError::Remote("server returned 502".into()));
    }

    #[test]
    fn test_missing_data_is_malformed() {
        let err = interpret_envelope(true, 200, b"{}").unwrap_err();
        assert_eq!(err, GatewayError::Malformed);
    }

    #[test]
    fn test_unparseable_body_is_malformed() {
        let err = interpret_envelope(true, 200, b"<html>oops</html>").unwrap_err();
        assert_eq!(err, GatewayError::Malformed);
    }

    #[tokio::test]
    async fn test_static_token_provider() {
        let provider = StaticTokenProvider("abc123".into());
        assert_eq!(provider.token().await.unwrap(), "abc123");
    }
}
