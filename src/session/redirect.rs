//! Redirect capture
//!
//! OAuth and email-link flows come back to the app on a URL carrying the
//! tokens, either in the fragment (`#access_token=…`) or in the query.
//! Parsing goes through [`url::Url`] so extra `#` or `?` characters inside
//! values cannot shift the split.

use crate::models::{BackendUser, Session, DEFAULT_EXPIRES_IN};
use std::collections::HashMap;
use url::Url;

/// Tokens carried by a redirect URL
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RedirectTokens {
    pub access_token: String,
    pub refresh_token: String,
    pub expires_in: i64,
    pub expires_at: Option<i64>,
    pub token_type: String,
}

impl RedirectTokens {
    /// Build the session for the user the token belongs to
    #[must_use]
    pub fn into_session(self, user: BackendUser, now: i64) -> Session {
        Session {
            access_token: self.access_token,
            refresh_token: self.refresh_token,
            expires_in: self.expires_in,
            expires_at: self.expires_at,
            token_type: self.token_type,
            user,
        }
        .with_derived_expiry(now)
    }
}

/// Extract tokens from a redirect URL
///
/// Fragment parameters win when they carry an `access_token`; otherwise the
/// query is used. Returns `None` when the URL does not parse or neither part
/// has a non-empty token.
#[must_use]
pub fn parse_redirect(raw_url: &str) -> Option<RedirectTokens> {
    let url = Url::parse(raw_url.trim()).ok()?;

    let from_fragment = url.fragment().map(parse_params).filter(has_access_token);
    let params = from_fragment.or_else(|| {
        let query: HashMap<String, String> = url.query_pairs().into_owned().collect();
        Some(query).filter(has_access_token)
    })?;

    let access_token = params.get("access_token")?.clone();
    let expires_in = params
        .get("expires_in")
        .and_then(|v| v.trim().parse::<i64>().ok())
        .unwrap_or(DEFAULT_EXPIRES_IN);
    let expires_at = params.get("expires_at").and_then(|v| v.trim().parse::<i64>().ok());

    Some(RedirectTokens {
        access_token,
        refresh_token: params.get("refresh_token").cloned().unwrap_or_default(),
        expires_in,
        expires_at,
        token_type: params
            .get("token_type")
            .cloned()
            .unwrap_or_else(|| "bearer".to_string()),
    })
}

fn parse_params(encoded: &str) -> HashMap<String, String> {
    url::form_urlencoded::parse(encoded.as_bytes())
        .into_owned()
        .collect()
}

fn has_access_token(params: &HashMap<String, String>) -> bool {
    params.get("access_token").is_some_and(|token| !token.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fragment_tokens() {
        let tokens = parse_redirect(
            "https://app.example.com/reset-password#access_token=abc&refresh_token=def&expires_in=7200&expires_at=1700000000&token_type=bearer&type=recovery",
        )
        .unwrap();

        assert_eq!(tokens.access_token, "abc");
        assert_eq!(tokens.refresh_token, "def");
        assert_eq!(tokens.expires_in, 7200);
        assert_eq!(tokens.expires_at, Some(1_700_000_000));
        assert_eq!(tokens.token_type, "bearer");
    }

    #[test]
    fn test_query_tokens_on_custom_scheme() {
        let tokens = parse_redirect("trainer://auth/callback?access_token=q-token&expires_in=60").unwrap();
        assert_eq!(tokens.access_token, "q-token");
        assert_eq!(tokens.expires_in, 60);
        assert!(tokens.refresh_token.is_empty());
        assert!(tokens.expires_at.is_none());
    }

    #[test]
    fn test_fragment_wins_over_query() {
        let tokens =
            parse_redirect("trainer://auth/callback?access_token=from-query#access_token=from-fragment").unwrap();
        assert_eq!(tokens.access_token, "from-fragment");
    }

    #[test]
    fn test_fragment_without_token_falls_back_to_query() {
        let tokens = parse_redirect("https://app.example.com/?access_token=q#error=none").unwrap();
        assert_eq!(tokens.access_token, "q");
    }

    #[test]
    fn test_no_token_yields_none() {
        assert!(parse_redirect("https://app.example.com/home").is_none());
        assert!(parse_redirect("https://app.example.com/#access_token=").is_none());
        assert!(parse_redirect("not a url").is_none());
    }

    #[test]
    fn test_bad_numbers_fall_back() {
        let tokens = parse_redirect("https://a.example/#access_token=t&expires_in=soon&expires_at=later").unwrap();
        assert_eq!(tokens.expires_in, DEFAULT_EXPIRES_IN);
        assert!(tokens.expires_at.is_none());

        let session = tokens.into_session(
            BackendUser {
                id: "u1".to_string(),
                email: None,
                user_metadata: None,
            },
            1_000,
        );
        assert_eq!(session.expires_at, Some(1_000 + DEFAULT_EXPIRES_IN));
    }

    #[test]
    fn test_huge_expires_in_saturates() {
        let tokens =
            parse_redirect("trainer://auth/callback#access_token=t&expires_in=9223372036854775807").unwrap();
        assert_eq!(tokens.expires_in, i64::MAX);

        let session = tokens.into_session(
            BackendUser {
                id: "u1".to_string(),
                email: None,
                user_metadata: None,
            },
            1_700_000_000,
        );
        assert_eq!(session.expires_at, Some(i64::MAX));
        assert!(!session.is_expired_at(1_700_000_000));
    }

    #[test]
    fn test_encoded_values_are_decoded() {
        let tokens = parse_redirect("https://a.example/#access_token=a%2Bb%3Dc&token_type=Bearer").unwrap();
        assert_eq!(tokens.access_token, "a+b=c");
        assert_eq!(tokens.token_type, "Bearer");
    }
}
