//! Local input validation
//!
//! Runs before any network call; a failure here means no request is sent.

use once_cell::sync::Lazy;
use regex::Regex;

pub const MIN_PASSWORD_LENGTH: usize = 6;

static EMAIL_PATTERN: Lazy<Regex> = Lazy::new(|| Regex::new(r"\S+@\S+\.\S+").expect("static regex"));

/// Validation failures, displayed as the user-facing error
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("Enter a valid email address.")]
    InvalidEmail,
    #[error("Enter a valid email before requesting reset.")]
    InvalidResetEmail,
    #[error("Password must be at least 6 characters.")]
    PasswordTooShort,
    #[error("Enter your full name.")]
    MissingName,
}

/// Normalized email and password ready to send
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

/// Trim and lowercase
#[must_use]
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

/// `text@text.text` with no whitespace in any part
#[must_use]
pub fn is_valid_email(email: &str) -> bool {
    EMAIL_PATTERN.is_match(email)
}

/// Validate and normalize an email for a password reset request
///
/// # Errors
///
/// Returns `InvalidResetEmail` if the normalized email does not look like an address
pub fn validate_reset_email(email: &str) -> Result<String, ValidationError> {
    let email = normalize_email(email);
    if is_valid_email(&email) {
        Ok(email)
    } else {
        Err(ValidationError::InvalidResetEmail)
    }
}

/// Validate and normalize sign-in credentials. The password is trimmed.
///
/// # Errors
///
/// Returns the first failing check: email shape, then password length
pub fn validate_credentials(email: &str, password: &str) -> Result<Credentials, ValidationError> {
    let email = normalize_email(email);
    if !is_valid_email(&email) {
        return Err(ValidationError::InvalidEmail);
    }

    let password = password.trim();
    if password.chars().count() < MIN_PASSWORD_LENGTH {
        return Err(ValidationError::PasswordTooShort);
    }

    Ok(Credentials {
        email,
        password: password.to_string(),
    })
}

/// Validate sign-up input: name first, then email and password
///
/// # Errors
///
/// Returns the first failing check
pub fn validate_sign_up(name: &str, email: &str, password: &str) -> Result<(String, Credentials), ValidationError> {
    let name = name.trim();
    if name.is_empty() {
        return Err(ValidationError::MissingName);
    }
    let credentials = validate_credentials(email, password)?;
    Ok((name.to_string(), credentials))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_email_shapes() {
        for valid in ["user@example.com", "a@b.c", "first.last+tag@sub.domain.io"] {
            assert!(is_valid_email(valid), "{valid} should be accepted");
        }
        for invalid in ["", "user", "user@", "user@example", "@example.com", "user@.", "a b@c"] {
            assert!(!is_valid_email(invalid), "{invalid} should be rejected");
        }
    }

    #[test]
    fn test_credentials_are_normalized() {
        let credentials = validate_credentials(" USER@Example.com ", "  secret1 ").unwrap();
        assert_eq!(credentials.email, "user@example.com");
        assert_eq!(credentials.password, "secret1");
    }

    #[test]
    fn test_password_length_counts_trimmed_characters() {
        assert_eq!(
            validate_credentials("a@b.co", " 12345 "),
            Err(ValidationError::PasswordTooShort)
        );
        assert!(validate_credentials("a@b.co", "123456").is_ok());
        assert!(validate_credentials("a@b.co", "éééééé").is_ok());
    }

    #[test]
    fn test_email_checked_before_password() {
        assert_eq!(validate_credentials("nope", "1"), Err(ValidationError::InvalidEmail));
    }

    #[test]
    fn test_sign_up_requires_name() {
        assert_eq!(
            validate_sign_up("   ", "a@b.co", "123456"),
            Err(ValidationError::MissingName)
        );
        let (name, credentials) = validate_sign_up(" Jane ", "A@B.co", "123456").unwrap();
        assert_eq!(name, "Jane");
        assert_eq!(credentials.email, "a@b.co");
    }

    #[test]
    fn test_reset_email_message() {
        assert_eq!(
            validate_reset_email("bad").unwrap_err().to_string(),
            "Enter a valid email before requesting reset."
        );
        assert_eq!(validate_reset_email(" X@Y.io").unwrap(), "x@y.io");
    }
}
