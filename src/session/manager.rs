//! Session Manager - client-side authentication lifecycle
//!
//! `SessionManager` is the single authority for authentication state. It
//! delegates remote calls to an [`IdentityBackend`], persistence to a
//! [`SessionStore`] and URL handling to a [`Navigator`], and publishes every
//! state change on a `watch` channel.
//!
//! ## Organization
//!
//! 1. **Construction** - wiring collaborators and redirect defaults
//! 2. **State Access** - snapshots and subscriptions
//! 3. **Startup** - hydration and redirect capture
//! 4. **Credential Flows** - sign-in, sign-up, password reset, Google
//! 5. **Sign-out**
//! 6. **Internals** - session adoption and the loading guard
//!
//! Overlapping calls are not serialized against each other; callers that
//! need that should gate on [`SessionManager::is_loading`].

use crate::identity::{spawn_profile_sync, IdentityBackend, IdentityError, ProfileUpsert};
use crate::gateway::GatewayError;
use crate::models::{AuthResult, Session, User};
use crate::platform::{Navigator, Platform};
use crate::session::messages::{self, auth_error_message, Operation};
use crate::session::redirect::parse_redirect;
use crate::session::state::{ActiveSession, AuthSnapshot, AuthState};
use crate::session::validation::{validate_credentials, validate_reset_email, validate_sign_up};
use crate::store::SessionStore;
use crate::utils::logging::LoggingHelper;
use chrono::Utc;
use log::debug;
use std::sync::{Arc, Mutex};
use tokio::sync::watch;
use tokio::task::JoinHandle;

/// Redirect targets used when a caller does not pass one
#[derive(Debug, Clone, Default)]
pub struct RedirectDefaults {
    pub password_reset: Option<String>,
    pub oauth: Option<String>,
}

// =============================================================================
// 1. Construction
// =============================================================================

/// Client-side authentication lifecycle manager
pub struct SessionManager {
    backend: Arc<dyn IdentityBackend>,
    store: SessionStore,
    navigator: Arc<dyn Navigator>,
    redirects: RedirectDefaults,
    state: watch::Sender<AuthSnapshot>,
    /// Profile syncs not yet awaited by [`SessionManager::flush_background_tasks`]
    background: Mutex<Vec<JoinHandle<()>>>,
}

impl SessionManager {
    /// Create a manager in the `Initializing` state; call [`Self::hydrate`] next
    #[must_use]
    pub fn new(backend: Arc<dyn IdentityBackend>, store: SessionStore, navigator: Arc<dyn Navigator>) -> Self {
        let (state, _) = watch::channel(AuthSnapshot::initializing());
        Self {
            backend,
            store,
            navigator,
            redirects: RedirectDefaults::default(),
            state,
            background: Mutex::default(),
        }
    }

    /// Configure default redirect targets
    #[must_use]
    pub fn with_redirects(mut self, redirects: RedirectDefaults) -> Self {
        self.redirects = redirects;
        self
    }
}

// =============================================================================
// 2. State Access
// =============================================================================

impl SessionManager {
    /// Current state snapshot
    #[must_use]
    pub fn state(&self) -> AuthSnapshot {
        self.state.borrow().clone()
    }

    /// Receive every subsequent state change
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<AuthSnapshot> {
        self.state.subscribe()
    }

    #[must_use]
    pub fn user(&self) -> Option<User> {
        self.state.borrow().user().cloned()
    }

    #[must_use]
    pub fn access_token(&self) -> Option<String> {
        self.state.borrow().access_token().map(ToString::to_string)
    }

    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.state.borrow().is_authenticated()
    }

    #[must_use]
    pub fn is_initializing(&self) -> bool {
        self.state.borrow().is_initializing()
    }

    #[must_use]
    pub fn is_loading(&self) -> bool {
        self.state.borrow().loading
    }

    #[must_use]
    pub fn is_backend_configured(&self) -> bool {
        self.backend.is_configured()
    }
}

// =============================================================================
// 3. Startup
// =============================================================================

impl SessionManager {
    /// Settle the startup state
    ///
    /// A launch URL carrying tokens wins over anything persisted. Otherwise
    /// the persisted session is refreshed if expired, then revalidated by
    /// fetching its user. Any failure clears storage. Always ends in
    /// `Authenticated` or `Unauthenticated`.
    pub async fn hydrate(&self) {
        if !self.backend.is_configured() {
            self.set_unauthenticated();
            LoggingHelper::log_hydration_settled(false);
            return;
        }

        let launch_url = self.navigator.launch_url();
        LoggingHelper::log_hydration_start(launch_url.is_some());

        if let Some(url) = launch_url {
            if self.consume_auth_redirect(&url, true).await {
                LoggingHelper::log_hydration_settled(true);
                return;
            }
        }

        let Some(stored) = self.store.load() else {
            self.discard_persisted();
            self.set_unauthenticated();
            LoggingHelper::log_hydration_settled(false);
            return;
        };

        let restored = match self.revalidate(stored).await {
            Ok(session) => self.adopt_session(session, true),
            Err(e) => {
                LoggingHelper::log_persisted_session_discarded(&e);
                false
            }
        };
        if !restored {
            self.discard_persisted();
            self.set_unauthenticated();
        }
        LoggingHelper::log_hydration_settled(restored);
    }

    /// Try to establish a session from a redirect URL
    ///
    /// Returns `false` without touching state when the URL carries no token,
    /// and `false` with state unchanged when the token cannot be used.
    pub async fn consume_auth_redirect(&self, url: &str, remember_me: bool) -> bool {
        let Some(tokens) = parse_redirect(url) else {
            return false;
        };
        if !self.backend.is_configured() {
            return false;
        }

        let _loading = LoadingGuard::start(&self.state);

        match self.backend.current_user(&tokens.access_token).await {
            Ok(user) => {
                let session = tokens.into_session(user, now());
                if !self.adopt_session(session, remember_me) {
                    return false;
                }
                let platform = self.navigator.platform();
                if platform == Platform::Web {
                    self.navigator.clear_redirect();
                }
                LoggingHelper::log_redirect_captured(platform);
                true
            }
            Err(e) => {
                LoggingHelper::log_redirect_rejected(&e);
                false
            }
        }
    }

    /// Handle a URL delivered while the app is running
    pub async fn handle_incoming_url(&self, url: &str) -> bool {
        self.consume_auth_redirect(url, true).await
    }

    async fn revalidate(&self, stored: Session) -> Result<Session, IdentityError> {
        let now = now();
        let session = if stored.is_expired_at(now) && !stored.refresh_token.is_empty() {
            debug!("Persisted session expired, exchanging refresh token");
            self.backend
                .refresh_session(&stored.refresh_token)
                .await?
                .with_derived_expiry(now)
        } else {
            stored
        };

        if !session.has_access_token() {
            return Err(GatewayError::Decode("session has no access token".to_string()).into());
        }

        let user = self.backend.current_user(&session.access_token).await?;
        Ok(Session { user, ..session })
    }
}

// =============================================================================
// 4. Credential Flows
// =============================================================================

impl SessionManager {
    /// Sign in with email and password
    ///
    /// With `remember_me` false any previously persisted session is removed
    /// so it cannot come back on the next start.
    pub async fn sign_in(&self, email: &str, password: &str, remember_me: bool) -> AuthResult {
        if !self.backend.is_configured() {
            return AuthResult::failure(messages::NOT_CONFIGURED);
        }
        let credentials = match validate_credentials(email, password) {
            Ok(credentials) => credentials,
            Err(e) => return AuthResult::failure(e.to_string()),
        };

        let _loading = LoadingGuard::start(&self.state);

        match self
            .backend
            .sign_in_with_password(&credentials.email, &credentials.password)
            .await
        {
            Ok(session) => {
                if self.adopt_session(session, remember_me) {
                    AuthResult::success()
                } else {
                    AuthResult::failure(Operation::SignIn.fallback())
                }
            }
            Err(e) => {
                LoggingHelper::log_operation_failed("Sign-in", &e);
                AuthResult::failure(auth_error_message(&e, Operation::SignIn))
            }
        }
    }

    /// Create an account
    ///
    /// When the provider holds the session back until the email is
    /// confirmed, the result is `ok` with `requires_email_verification` and
    /// the manager stays unauthenticated.
    pub async fn sign_up(&self, name: &str, email: &str, password: &str) -> AuthResult {
        if !self.backend.is_configured() {
            return AuthResult::failure(messages::NOT_CONFIGURED);
        }
        let (name, credentials) = match validate_sign_up(name, email, password) {
            Ok(validated) => validated,
            Err(e) => return AuthResult::failure(e.to_string()),
        };

        let _loading = LoadingGuard::start(&self.state);

        let response = match self
            .backend
            .sign_up_with_password(&name, &credentials.email, &credentials.password)
            .await
        {
            Ok(response) => response,
            Err(e) => {
                LoggingHelper::log_operation_failed("Sign-up", &e);
                return AuthResult::failure(auth_error_message(&e, Operation::SignUp));
            }
        };

        match (response.session, response.user) {
            (Some(session), Some(_)) => {
                if self.adopt_session(session, true) {
                    AuthResult::success()
                } else {
                    AuthResult::failure(Operation::SignUp.fallback())
                }
            }
            _ => {
                debug!("Sign-up for {} awaits email verification", credentials.email);
                AuthResult::verification_required(messages::VERIFY_EMAIL)
            }
        }
    }

    /// Ask for a password reset email
    ///
    /// Success copy is the same whether or not the address is registered.
    pub async fn request_password_reset(&self, email: &str, redirect_to: Option<&str>) -> AuthResult {
        if !self.backend.is_configured() {
            return AuthResult::failure(messages::NOT_CONFIGURED);
        }
        let email = match validate_reset_email(email) {
            Ok(email) => email,
            Err(e) => return AuthResult::failure(e.to_string()),
        };
        let redirect_to = redirect_to.or(self.redirects.password_reset.as_deref());

        let _loading = LoadingGuard::start(&self.state);

        match self.backend.request_password_reset(&email, redirect_to).await {
            Ok(()) => AuthResult::success_with_message(messages::RESET_EMAIL_SENT),
            Err(e) => {
                LoggingHelper::log_operation_failed("Password reset", &e);
                AuthResult::failure(auth_error_message(&e, Operation::PasswordReset))
            }
        }
    }

    /// Start the Google authorization flow
    ///
    /// Only hands the authorization URL to the navigator; the flow completes
    /// through [`Self::consume_auth_redirect`].
    pub async fn continue_with_google(&self, redirect_to: Option<&str>) -> AuthResult {
        if !self.backend.is_configured() {
            return AuthResult::failure(messages::NOT_CONFIGURED);
        }
        let redirect_to = redirect_to.or(self.redirects.oauth.as_deref());

        let url = match self.backend.authorize_url("google", redirect_to) {
            Ok(url) => url,
            Err(e) => {
                LoggingHelper::log_operation_failed("Google authorization", &e);
                return AuthResult::failure(auth_error_message(&e, Operation::Google));
            }
        };

        let platform = self.navigator.platform();
        LoggingHelper::log_oauth_redirect("google", platform);
        let opened = match platform {
            Platform::Web => self.navigator.navigate(&url),
            Platform::Native => self.navigator.open_external(&url),
        };

        match opened {
            Ok(()) => AuthResult::success(),
            Err(e) => {
                LoggingHelper::log_operation_failed("Google authorization", &e);
                AuthResult::failure(Operation::Google.fallback())
            }
        }
    }
}

// =============================================================================
// 5. Sign-out
// =============================================================================

impl SessionManager {
    /// Revoke remotely if possible, then always clear local state
    pub async fn sign_out(&self) {
        let token = self.access_token();
        let _loading = LoadingGuard::start(&self.state);

        let mut remote_revoked = false;
        if let Some(token) = token {
            match self.backend.sign_out(&token).await {
                Ok(()) => remote_revoked = true,
                Err(e) => LoggingHelper::log_operation_failed("Remote sign-out", &e),
            }
        }

        self.discard_persisted();
        self.set_unauthenticated();
        LoggingHelper::log_signed_out(remote_revoked);
    }
}

impl SessionManager {
    /// Wait for profile syncs started by earlier sign-ins
    ///
    /// Short-lived hosts call this before shutting the runtime down so the
    /// sync is not dropped mid-flight. Sync failures are only logged.
    pub async fn flush_background_tasks(&self) {
        let pending = match self.background.lock() {
            Ok(mut background) => std::mem::take(&mut *background),
            Err(_) => return,
        };
        for task in pending {
            if let Err(e) = task.await {
                LoggingHelper::log_operation_failed("Profile sync task", &e);
            }
        }
    }
}

// =============================================================================
// 6. Internals
// =============================================================================

impl SessionManager {
    /// Make `session` the active one and persist or forget it
    ///
    /// Returns `false` (state untouched) for a session without an access token.
    fn adopt_session(&self, session: Session, remember_me: bool) -> bool {
        if !session.has_access_token() {
            LoggingHelper::log_operation_failed("Session adoption", &"no access token in session");
            return false;
        }

        let session = session.with_derived_expiry(now());
        let user = User::from(&session.user);

        let persisted = if remember_me {
            self.store.save(&session)
        } else {
            self.store.clear()
        };
        if let Err(e) = persisted {
            LoggingHelper::log_operation_failed("Updating persisted session", &e);
        }

        if let Some(task) = spawn_profile_sync(
            Arc::clone(&self.backend),
            session.access_token.clone(),
            ProfileUpsert::from(&user),
        ) {
            if let Ok(mut background) = self.background.lock() {
                background.retain(|pending| !pending.is_finished());
                background.push(task);
            }
        }
        LoggingHelper::log_session_adopted(&user, remember_me);

        self.state.send_modify(|snapshot| {
            snapshot.state = AuthState::Authenticated(ActiveSession { session, user });
        });
        true
    }

    fn set_unauthenticated(&self) {
        self.state.send_modify(|snapshot| snapshot.state = AuthState::Unauthenticated);
    }

    fn discard_persisted(&self) {
        if let Err(e) = self.store.clear() {
            LoggingHelper::log_operation_failed("Clearing persisted session", &e);
        }
    }
}

/// Raises the loading flag for its lifetime
struct LoadingGuard<'a> {
    state: &'a watch::Sender<AuthSnapshot>,
}

impl<'a> LoadingGuard<'a> {
    fn start(state: &'a watch::Sender<AuthSnapshot>) -> Self {
        state.send_modify(|snapshot| snapshot.loading = true);
        Self { state }
    }
}

impl Drop for LoadingGuard<'_> {
    fn drop(&mut self) {
        self.state.send_modify(|snapshot| snapshot.loading = false);
    }
}

fn now() -> i64 {
    Utc::now().timestamp()
}
