//! Mock objects and fake implementations for testing
//!
//! [`MockIdentityBackend`] answers every identity call from memory and
//! records what it was asked; behaviour is adjusted with builder methods.
//! [`RecordingNavigator`] records every URL it is told to open.

use crate::gateway::GatewayError;
use crate::identity::service::build_authorize_url;
use crate::identity::{IdentityBackend, IdentityError, ProfileUpsert, SignUpResponse};
use crate::models::{BackendUser, Session};
use crate::platform::{NavigationError, Navigator, Platform};
use async_trait::async_trait;
use reqwest::StatusCode;
use std::collections::HashSet;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use super::constants::TEST_BACKEND_URL;
use super::fixtures::TestFixtures;

fn rejected(status: StatusCode, message: &str) -> IdentityError {
    IdentityError::Gateway(GatewayError::Status {
        status,
        message: message.to_string(),
    })
}

/// In-memory identity backend
#[derive(Default)]
pub struct MockIdentityBackend {
    unconfigured: bool,
    sign_in_rejection: Option<String>,
    sign_in_transport_failure: bool,
    sign_up_rejection: Option<String>,
    sign_up_without_session: bool,
    failing_sign_out: bool,
    failing_profile_sync: bool,
    rejected_tokens: HashSet<String>,

    requests: AtomicUsize,
    sign_outs: AtomicUsize,
    last_sign_in: Mutex<Option<(String, String)>>,
    last_sign_up_name: Mutex<Option<String>>,
    last_password_reset: Mutex<Option<(String, Option<String>)>>,
    synced_profiles: Mutex<Vec<ProfileUpsert>>,
}

impl MockIdentityBackend {
    /// Access token issued by `refresh_session`
    pub const REFRESHED_TOKEN: &'static str = "refreshed-access-token";

    /// Backend that accepts everything
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Backend reporting missing URL/key
    #[must_use]
    pub fn unconfigured() -> Self {
        Self {
            unconfigured: true,
            ..Self::default()
        }
    }

    /// User returned by `current_user` for `token`
    #[must_use]
    pub fn user_for_token(token: &str) -> BackendUser {
        BackendUser {
            id: format!("id-{token}"),
            email: Some(format!("{token}@example.com")),
            user_metadata: None,
        }
    }

    #[must_use]
    pub fn reject_sign_in(mut self, message: &str) -> Self {
        self.sign_in_rejection = Some(message.to_string());
        self
    }

    #[must_use]
    pub fn fail_sign_in_transport(mut self) -> Self {
        self.sign_in_transport_failure = true;
        self
    }

    #[must_use]
    pub fn reject_sign_up(mut self, message: &str) -> Self {
        self.sign_up_rejection = Some(message.to_string());
        self
    }

    /// Sign-up returns a user but holds the session back
    #[must_use]
    pub fn sign_up_without_session(mut self) -> Self {
        self.sign_up_without_session = true;
        self
    }

    #[must_use]
    pub fn fail_sign_out(mut self) -> Self {
        self.failing_sign_out = true;
        self
    }

    #[must_use]
    pub fn fail_profile_sync(mut self) -> Self {
        self.failing_profile_sync = true;
        self
    }

    /// `current_user` answers 401 for `token`
    #[must_use]
    pub fn reject_token(mut self, token: &str) -> Self {
        self.rejected_tokens.insert(token.to_string());
        self
    }

    /// Number of remote calls made, profile syncs excluded
    pub fn request_count(&self) -> usize {
        self.requests.load(Ordering::SeqCst)
    }

    pub fn sign_out_count(&self) -> usize {
        self.sign_outs.load(Ordering::SeqCst)
    }

    /// Email and password of the last sign-in call
    pub fn last_sign_in(&self) -> Option<(String, String)> {
        self.last_sign_in.lock().unwrap().clone()
    }

    pub fn last_sign_up_name(&self) -> Option<String> {
        self.last_sign_up_name.lock().unwrap().clone()
    }

    /// Email and redirect of the last password reset call
    pub fn last_password_reset(&self) -> Option<(String, Option<String>)> {
        self.last_password_reset.lock().unwrap().clone()
    }

    pub fn synced_profiles(&self) -> Vec<ProfileUpsert> {
        self.synced_profiles.lock().unwrap().clone()
    }

    fn record(&self) {
        self.requests.fetch_add(1, Ordering::SeqCst);
    }
}

#[async_trait]
impl IdentityBackend for MockIdentityBackend {
    fn is_configured(&self) -> bool {
        !self.unconfigured
    }

    async fn sign_in_with_password(&self, email: &str, password: &str) -> Result<Session, IdentityError> {
        self.record();
        *self.last_sign_in.lock().unwrap() = Some((email.to_string(), password.to_string()));

        if self.sign_in_transport_failure {
            return Err(GatewayError::Decode("connection reset".to_string()).into());
        }
        if let Some(message) = &self.sign_in_rejection {
            return Err(rejected(StatusCode::BAD_REQUEST, message));
        }
        Ok(TestFixtures::session())
    }

    async fn sign_up_with_password(
        &self,
        name: &str,
        _email: &str,
        _password: &str,
    ) -> Result<SignUpResponse, IdentityError> {
        self.record();
        *self.last_sign_up_name.lock().unwrap() = Some(name.to_string());

        if let Some(message) = &self.sign_up_rejection {
            return Err(rejected(StatusCode::UNPROCESSABLE_ENTITY, message));
        }
        let session = (!self.sign_up_without_session).then(TestFixtures::session);
        Ok(SignUpResponse {
            user: Some(TestFixtures::backend_user()),
            session,
        })
    }

    async fn refresh_session(&self, _refresh_token: &str) -> Result<Session, IdentityError> {
        self.record();
        Ok(Session {
            access_token: Self::REFRESHED_TOKEN.to_string(),
            expires_at: None,
            ..TestFixtures::session()
        })
    }

    async fn sign_out(&self, _access_token: &str) -> Result<(), IdentityError> {
        self.record();
        self.sign_outs.fetch_add(1, Ordering::SeqCst);
        if self.failing_sign_out {
            return Err(rejected(StatusCode::INTERNAL_SERVER_ERROR, "logout failed"));
        }
        Ok(())
    }

    async fn current_user(&self, access_token: &str) -> Result<BackendUser, IdentityError> {
        self.record();
        if self.rejected_tokens.contains(access_token) {
            return Err(rejected(StatusCode::UNAUTHORIZED, "invalid JWT"));
        }
        Ok(Self::user_for_token(access_token))
    }

    async fn request_password_reset(&self, email: &str, redirect_to: Option<&str>) -> Result<(), IdentityError> {
        self.record();
        *self.last_password_reset.lock().unwrap() =
            Some((email.to_string(), redirect_to.map(ToString::to_string)));
        Ok(())
    }

    fn authorize_url(&self, provider: &str, redirect_to: Option<&str>) -> Result<String, IdentityError> {
        build_authorize_url(TEST_BACKEND_URL, provider, redirect_to)
    }

    async fn upsert_profile(&self, _access_token: &str, profile: &ProfileUpsert) -> Result<(), IdentityError> {
        self.synced_profiles.lock().unwrap().push(profile.clone());
        if self.failing_profile_sync {
            return Err(rejected(StatusCode::FORBIDDEN, "permission denied for table profiles"));
        }
        Ok(())
    }
}

/// Navigator that records instead of opening anything
#[derive(Debug)]
pub struct RecordingNavigator {
    platform: Platform,
    launch_url: Mutex<Option<String>>,
    failing: bool,
    navigated: Mutex<Vec<String>>,
    opened_external: Mutex<Vec<String>>,
    cleared: AtomicUsize,
}

impl RecordingNavigator {
    fn with_platform(platform: Platform, launch_url: Option<String>) -> Self {
        Self {
            platform,
            launch_url: Mutex::new(launch_url),
            failing: false,
            navigated: Mutex::default(),
            opened_external: Mutex::default(),
            cleared: AtomicUsize::new(0),
        }
    }

    #[must_use]
    pub fn web(launch_url: Option<String>) -> Self {
        Self::with_platform(Platform::Web, launch_url)
    }

    #[must_use]
    pub fn native(launch_url: Option<String>) -> Self {
        Self::with_platform(Platform::Native, launch_url)
    }

    /// Every navigation attempt fails
    #[must_use]
    pub fn failing(mut self) -> Self {
        self.failing = true;
        self
    }

    pub fn navigated(&self) -> Vec<String> {
        self.navigated.lock().unwrap().clone()
    }

    pub fn opened_external(&self) -> Vec<String> {
        self.opened_external.lock().unwrap().clone()
    }

    pub fn cleared_count(&self) -> usize {
        self.cleared.load(Ordering::SeqCst)
    }

    fn visit(&self, log: &Mutex<Vec<String>>, url: &str) -> Result<(), NavigationError> {
        if self.failing {
            return Err(NavigationError::OpenFailed(url.to_string()));
        }
        log.lock().unwrap().push(url.to_string());
        Ok(())
    }
}

impl Navigator for RecordingNavigator {
    fn platform(&self) -> Platform {
        self.platform
    }

    fn launch_url(&self) -> Option<String> {
        self.launch_url.lock().unwrap().clone()
    }

    fn navigate(&self, url: &str) -> Result<(), NavigationError> {
        self.visit(&self.navigated, url)
    }

    fn open_external(&self, url: &str) -> Result<(), NavigationError> {
        self.visit(&self.opened_external, url)
    }

    fn clear_redirect(&self) {
        self.cleared.fetch_add(1, Ordering::SeqCst);
        *self.launch_url.lock().unwrap() = None;
    }
}
