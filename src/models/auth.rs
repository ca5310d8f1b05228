//! Uniform outcome of every session lifecycle operation
//!
//! Callers render success or failure from this value; lifecycle operations
//! never return an `Err` or panic past their own boundary.

use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct AuthResult {
    pub ok: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub requires_email_verification: bool,
}

impl AuthResult {
    #[must_use]
    pub fn success() -> Self {
        Self {
            ok: true,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn success_with_message(message: impl Into<String>) -> Self {
        Self {
            ok: true,
            message: Some(message.into()),
            ..Self::default()
        }
    }

    /// Account exists but the provider wants the email confirmed before a
    /// session is issued
    #[must_use]
    pub fn verification_required(message: impl Into<String>) -> Self {
        Self {
            ok: true,
            message: Some(message.into()),
            requires_email_verification: true,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn failure(error: impl Into<String>) -> Self {
        Self {
            ok: false,
            error: Some(error.into()),
            ..Self::default()
        }
    }
}
