use reqwest::StatusCode;

/// Errors raised by the HTTP gateway
#[derive(Debug, thiserror::Error)]
pub enum GatewayError {
    /// Base URL or API key missing; no request was sent
    #[error("Backend is not configured")]
    NotConfigured,

    /// Backend answered with a non-success status
    #[error("{message}")]
    Status { status: StatusCode, message: String },

    /// Connection, TLS or timeout failure before a response arrived
    #[error("Request failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// Response body did not have the expected shape
    #[error("Unexpected response: {0}")]
    Decode(String),
}

impl GatewayError {
    /// Human-readable message supplied by the backend, if it rejected the call
    #[must_use]
    pub fn remote_message(&self) -> Option<&str> {
        match self {
            GatewayError::Status { message, .. } => Some(message),
            _ => None,
        }
    }

    #[must_use]
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            GatewayError::Status { status, .. } => Some(*status),
            _ => None,
        }
    }
}

/// Pull a readable message out of an error body, trying the shapes the
/// backend is known to use in order, then the status reason phrase
#[must_use]
pub fn extract_error_message(status: StatusCode, raw: &str) -> String {
    const MESSAGE_FIELDS: [&str; 4] = ["error_description", "msg", "message", "error"];

    let from_body = serde_json::from_str::<serde_json::Value>(raw)
        .ok()
        .and_then(|payload| {
            MESSAGE_FIELDS
                .iter()
                .find_map(|field| payload.get(field)?.as_str().map(ToString::to_string))
        });

    from_body
        .or_else(|| status.canonical_reason().map(ToString::to_string))
        .unwrap_or_else(|| "Request failed.".to_string())
}
