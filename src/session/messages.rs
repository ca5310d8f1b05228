//! User-facing error copy
//!
//! Remote rejections keep the provider's wording unless it matches one of
//! the known rate-limit or duplicate-account messages. Transport failures
//! never leak their details; they get the per-operation fallback.

use crate::identity::IdentityError;

pub const NOT_CONFIGURED: &str =
    "Backend is not configured. Set BACKEND_URL and BACKEND_API_KEY (or add them to Settings.toml).";

pub const VERIFY_EMAIL: &str = "Account created. Check your email to verify your account, then sign in.";

pub const RESET_EMAIL_SENT: &str = "Password reset email sent. Check your inbox.";

/// Lifecycle operation an error came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    SignIn,
    SignUp,
    PasswordReset,
    Google,
}

impl Operation {
    #[must_use]
    pub fn fallback(self) -> &'static str {
        match self {
            Operation::SignIn => "Unable to sign in right now.",
            Operation::SignUp => "Unable to create your account right now.",
            Operation::PasswordReset => "Unable to send reset email right now.",
            Operation::Google => "Unable to continue with Google right now.",
        }
    }
}

/// Rewrite known provider messages into friendlier copy
#[must_use]
pub fn friendly_message(raw: &str) -> String {
    let normalized = raw.to_lowercase();

    if normalized.contains("rate limit") {
        return "Too many signup attempts. Wait a minute and use the verification email already sent."
            .to_string();
    }
    if normalized.contains("security purposes") && normalized.contains("request") {
        return "Too many verification requests. Please wait before trying again.".to_string();
    }
    if normalized.contains("user already registered") {
        return "This email is already registered. Try signing in instead.".to_string();
    }

    raw.to_string()
}

/// Message shown for a failed identity call
#[must_use]
pub fn auth_error_message(err: &IdentityError, operation: Operation) -> String {
    if err.is_not_configured() {
        return NOT_CONFIGURED.to_string();
    }
    err.remote_message()
        .map_or_else(|| operation.fallback().to_string(), friendly_message)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gateway::GatewayError;
    use reqwest::StatusCode;

    fn rejected(message: &str) -> IdentityError {
        IdentityError::Gateway(GatewayError::Status {
            status: StatusCode::BAD_REQUEST,
            message: message.to_string(),
        })
    }

    #[test]
    fn test_known_messages_are_rewritten() {
        assert_eq!(
            friendly_message("Email rate limit exceeded"),
            "Too many signup attempts. Wait a minute and use the verification email already sent."
        );
        assert_eq!(
            friendly_message("For security purposes, you can only request this after 42 seconds."),
            "Too many verification requests. Please wait before trying again."
        );
        assert_eq!(
            friendly_message("User already registered"),
            "This email is already registered. Try signing in instead."
        );
    }

    #[test]
    fn test_unknown_message_passes_through() {
        assert_eq!(friendly_message("Invalid login credentials"), "Invalid login credentials");
        assert_eq!(
            auth_error_message(&rejected("Invalid login credentials"), Operation::SignIn),
            "Invalid login credentials"
        );
    }

    #[test]
    fn test_security_purposes_needs_request() {
        assert_eq!(friendly_message("For security purposes only"), "For security purposes only");
    }

    #[test]
    fn test_non_remote_errors_use_fallback() {
        let err = IdentityError::Gateway(GatewayError::Decode("empty".to_string()));
        assert_eq!(auth_error_message(&err, Operation::SignUp), "Unable to create your account right now.");

        let err = IdentityError::Gateway(GatewayError::NotConfigured);
        assert_eq!(auth_error_message(&err, Operation::PasswordReset), NOT_CONFIGURED);
    }
}
