use crate::gateway::{Gateway, GatewayError, RequestOptions};
use crate::identity::profiles::{self, ProfileUpsert};
use crate::models::{BackendUser, Session};
use async_trait::async_trait;
use serde::Deserialize;
use serde_json::json;

/// Identity API errors
#[derive(Debug, thiserror::Error)]
pub enum IdentityError {
    #[error(transparent)]
    Gateway(#[from] GatewayError),

    #[error("Invalid backend URL: {0}")]
    InvalidUrl(#[from] url::ParseError),
}

impl IdentityError {
    /// Message supplied by the backend when it rejected the call
    #[must_use]
    pub fn remote_message(&self) -> Option<&str> {
        match self {
            IdentityError::Gateway(err) => err.remote_message(),
            IdentityError::InvalidUrl(_) => None,
        }
    }

    #[must_use]
    pub fn is_not_configured(&self) -> bool {
        matches!(self, IdentityError::Gateway(GatewayError::NotConfigured))
    }
}

/// Result of account creation. `session` is absent while the provider waits
/// for the email address to be confirmed.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct SignUpResponse {
    #[serde(default)]
    pub user: Option<BackendUser>,
    #[serde(default)]
    pub session: Option<Session>,
}

/// Remote identity operations used by the session manager
#[async_trait]
pub trait IdentityBackend: Send + Sync {
    /// Whether base URL and API key are present
    fn is_configured(&self) -> bool;

    /// Exchange email and password for a session
    ///
    /// # Errors
    ///
    /// Returns an error if the credentials are rejected or the call fails
    async fn sign_in_with_password(&self, email: &str, password: &str) -> Result<Session, IdentityError>;

    /// Create an account, storing `name` as the `full_name` metadata
    ///
    /// # Errors
    ///
    /// Returns an error if the account cannot be created or the call fails
    async fn sign_up_with_password(
        &self,
        name: &str,
        email: &str,
        password: &str,
    ) -> Result<SignUpResponse, IdentityError>;

    /// Exchange a refresh token for a new session
    ///
    /// # Errors
    ///
    /// Returns an error if the refresh token is rejected or the call fails
    async fn refresh_session(&self, refresh_token: &str) -> Result<Session, IdentityError>;

    /// Revoke the session behind `access_token`
    ///
    /// # Errors
    ///
    /// Returns an error if the revoke call fails
    async fn sign_out(&self, access_token: &str) -> Result<(), IdentityError>;

    /// Fetch the user the token belongs to; doubles as token validation
    ///
    /// # Errors
    ///
    /// Returns an error if the token is rejected or the call fails
    async fn current_user(&self, access_token: &str) -> Result<BackendUser, IdentityError>;

    /// Ask the provider to send a password reset email
    ///
    /// # Errors
    ///
    /// Returns an error if the provider rejects the request or the call fails
    async fn request_password_reset(&self, email: &str, redirect_to: Option<&str>) -> Result<(), IdentityError>;

    /// Authorization URL for a third-party provider such as `google`
    ///
    /// # Errors
    ///
    /// Returns an error if the configured base URL is not a valid URL
    fn authorize_url(&self, provider: &str, redirect_to: Option<&str>) -> Result<String, IdentityError>;

    /// Insert or merge the profile row for the signed-in user
    ///
    /// # Errors
    ///
    /// Returns an error if the upsert is rejected or the call fails
    async fn upsert_profile(&self, access_token: &str, profile: &ProfileUpsert) -> Result<(), IdentityError>;
}

/// [`IdentityBackend`] backed by the hosted auth endpoints
#[derive(Clone)]
pub struct RemoteIdentity {
    gateway: Gateway,
}

impl RemoteIdentity {
    #[must_use]
    pub fn new(gateway: Gateway) -> Self {
        Self { gateway }
    }

    #[must_use]
    pub fn gateway(&self) -> &Gateway {
        &self.gateway
    }
}

#[async_trait]
impl IdentityBackend for RemoteIdentity {
    fn is_configured(&self) -> bool {
        self.gateway.is_configured()
    }

    async fn sign_in_with_password(&self, email: &str, password: &str) -> Result<Session, IdentityError> {
        let session = self
            .gateway
            .request_json(
                "/auth/v1/token?grant_type=password",
                RequestOptions::post().json(json!({ "email": email, "password": password })),
            )
            .await?;
        Ok(session)
    }

    async fn sign_up_with_password(
        &self,
        name: &str,
        email: &str,
        password: &str,
    ) -> Result<SignUpResponse, IdentityError> {
        let body = json!({
            "email": email,
            "password": password,
            "data": { "full_name": name },
        });
        let response = self
            .gateway
            .request_json("/auth/v1/signup", RequestOptions::post().json(body))
            .await?;
        Ok(response)
    }

    async fn refresh_session(&self, refresh_token: &str) -> Result<Session, IdentityError> {
        let session = self
            .gateway
            .request_json(
                "/auth/v1/token?grant_type=refresh_token",
                RequestOptions::post().json(json!({ "refresh_token": refresh_token })),
            )
            .await?;
        Ok(session)
    }

    async fn sign_out(&self, access_token: &str) -> Result<(), IdentityError> {
        self.gateway
            .request("/auth/v1/logout", RequestOptions::post().bearer(access_token))
            .await?;
        Ok(())
    }

    async fn current_user(&self, access_token: &str) -> Result<BackendUser, IdentityError> {
        let user = self
            .gateway
            .request_json("/auth/v1/user", RequestOptions::get().bearer(access_token))
            .await?;
        Ok(user)
    }

    async fn request_password_reset(&self, email: &str, redirect_to: Option<&str>) -> Result<(), IdentityError> {
        let mut body = json!({ "email": email });
        if let Some(redirect_to) = redirect_to {
            body["redirect_to"] = json!(redirect_to);
        }
        self.gateway
            .request("/auth/v1/recover", RequestOptions::post().json(body))
            .await?;
        Ok(())
    }

    fn authorize_url(&self, provider: &str, redirect_to: Option<&str>) -> Result<String, IdentityError> {
        build_authorize_url(self.gateway.base_url(), provider, redirect_to)
    }

    async fn upsert_profile(&self, access_token: &str, profile: &ProfileUpsert) -> Result<(), IdentityError> {
        profiles::upsert_profile(&self.gateway, access_token, profile).await
    }
}

/// Build `<base>/auth/v1/authorize?provider=<p>[&redirect_to=<r>]` with proper
/// query encoding
///
/// # Errors
///
/// Returns an error if `base_url` is not an absolute URL
pub fn build_authorize_url(
    base_url: &str,
    provider: &str,
    redirect_to: Option<&str>,
) -> Result<String, IdentityError> {
    let mut url = url::Url::parse(&format!("{base_url}/auth/v1/authorize"))?;
    {
        let mut query = url.query_pairs_mut();
        query.append_pair("provider", provider);
        if let Some(redirect_to) = redirect_to {
            query.append_pair("redirect_to", redirect_to);
        }
    }
    Ok(url.to_string())
}
