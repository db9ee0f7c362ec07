use serde::{Deserialize, Serialize};
use thiserror::Error;
use tokio::time::Duration;
use tracing::{debug, warn};

/// Default deadline for a single query round-trip
pub const REQUEST_TIMEOUT_SECS: u64 = 30;

/// Request body for the query endpoint
#[derive(Debug, Clone, Serialize)]
pub struct QueryRequest {
    pub message: String,
}

/// Successful reply from the query endpoint
#[derive(Debug, Clone, Deserialize)]
pub struct QueryReply {
    pub response: String,
}

/// Error payload carried by non-2xx replies
#[derive(Debug, Clone, Deserialize)]
struct ErrorBody {
    detail: Option<String>,
}

/// Everything that can go wrong with a query, classified for display
#[derive(Debug, Error)]
pub enum QueryError {
    /// The request exceeded the transport deadline
    #[error("request timed out")]
    Timeout,

    /// The server answered with a non-success status
    #[error("server returned status {status}")]
    Server {
        status: u16,
        detail: Option<String>,
    },

    /// No response was received at all
    #[error("could not reach the server")]
    Connect,

    /// A 2xx reply whose body did not contain a `response` string
    #[error("response body was malformed")]
    MalformedReply,

    /// Anything else
    #[error("query failed: {0}")]
    Other(anyhow::Error),
}

impl QueryError {
    /// The text shown to the user in place of an assistant reply
    pub fn user_message(&self) -> String {
        match self {
            QueryError::Timeout => {
                "Request timed out. Please try again with a simpler question.".to_string()
            }
            QueryError::Server { detail, .. } => {
                format!("Error: {}", detail.as_deref().unwrap_or("Server error"))
            }
            QueryError::Connect => {
                "Cannot connect to the server. Please make sure the backend is running."
                    .to_string()
            }
            QueryError::MalformedReply | QueryError::Other(_) => {
                "Sorry, I encountered an error. Please try again.".to_string()
            }
        }
    }

    fn from_transport(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            QueryError::Timeout
        } else if err.is_connect() || err.is_request() {
            QueryError::Connect
        } else {
            QueryError::Other(err.into())
        }
    }
}

/// HTTP client for the assistant query endpoint
#[derive(Clone)]
pub struct QueryClient {
    base_url: String,
    client: reqwest::Client,
}

impl QueryClient {
    #[allow(dead_code)]
    pub fn new(base_url: String) -> Self {
        Self::with_timeout(base_url, Duration::from_secs(REQUEST_TIMEOUT_SECS))
    }

    pub fn with_timeout(base_url: String, timeout: Duration) -> Self {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .expect("Failed to create HTTP client");

        Self { base_url, client }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Send one message to the backend and return its reply text
    pub async fn query(&self, message: &str) -> Result<String, QueryError> {
        let url = format!("{}/query", self.base_url);
        debug!(url = %url, "sending query");

        let payload = QueryRequest {
            message: message.to_string(),
        };

        let response = self
            .client
            .post(&url)
            .header("Content-Type", "application/json")
            .json(&payload)
            .send()
            .await
            .map_err(|e| {
                warn!(error = %e, "query transport failed");
                QueryError::from_transport(e)
            })?;

        let status = response.status();
        if !status.is_success() {
            let detail = response
                .json::<ErrorBody>()
                .await
                .ok()
                .and_then(|body| body.detail);
            warn!(status = status.as_u16(), "query rejected by server");
            return Err(QueryError::Server {
                status: status.as_u16(),
                detail,
            });
        }

        let reply = response
            .json::<QueryReply>()
            .await
            .map_err(|_| QueryError::MalformedReply)?;

        debug!(chars = reply.response.len(), "query succeeded");
        Ok(reply.response)
    }

    /// Check the backend health endpoint
    pub async fn health(&self) -> Result<(), QueryError> {
        let url = format!("{}/health", self.base_url);

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(QueryError::from_transport)?;

        let status = response.status();
        if !status.is_success() {
            return Err(QueryError::Server {
                status: status.as_u16(),
                detail: None,
            });
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn timeout_message_is_literal() {
        assert_eq!(
            QueryError::Timeout.user_message(),
            "Request timed out. Please try again with a simpler question."
        );
    }

    #[test]
    fn server_error_includes_detail_when_present() {
        let err = QueryError::Server {
            status: 500,
            detail: Some("db down".to_string()),
        };
        assert_eq!(err.user_message(), "Error: db down");
    }

    #[test]
    fn server_error_falls_back_without_detail() {
        let err = QueryError::Server {
            status: 502,
            detail: None,
        };
        assert_eq!(err.user_message(), "Error: Server error");
    }

    #[test]
    fn connect_message_is_literal() {
        assert_eq!(
            QueryError::Connect.user_message(),
            "Cannot connect to the server. Please make sure the backend is running."
        );
    }

    #[test]
    fn malformed_reply_uses_generic_fallback() {
        assert_eq!(
            QueryError::MalformedReply.user_message(),
            "Sorry, I encountered an error. Please try again."
        );
    }

    #[test]
    fn reply_body_requires_response_field() {
        let ok: Result<QueryReply, _> = serde_json::from_str(r#"{"response":"hi"}"#);
        assert_eq!(ok.unwrap().response, "hi");

        let missing: Result<QueryReply, _> = serde_json::from_str(r#"{"answer":"hi"}"#);
        assert!(missing.is_err());
    }

    #[test]
    fn error_body_detail_is_optional() {
        let body: ErrorBody = serde_json::from_str(r#"{"detail":"db down"}"#).unwrap();
        assert_eq!(body.detail.as_deref(), Some("db down"));

        let empty: ErrorBody = serde_json::from_str(r#"{}"#).unwrap();
        assert!(empty.detail.is_none());
    }
}
