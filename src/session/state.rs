use crate::models::{Session, User};

/// Authentication state owned by the session manager
///
/// The user only exists next to the session it was derived from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthState {
    /// Startup hydration has not finished
    Initializing,
    Unauthenticated,
    Authenticated(ActiveSession),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActiveSession {
    pub session: Session,
    pub user: User,
}

/// What subscribers observe: the state plus the in-flight flag
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthSnapshot {
    pub state: AuthState,
    /// Set while a sign-in, redirect capture or sign-out is running
    pub loading: bool,
}

impl AuthSnapshot {
    #[must_use]
    pub fn initializing() -> Self {
        Self {
            state: AuthState::Initializing,
            loading: false,
        }
    }

    #[must_use]
    pub fn active(&self) -> Option<&ActiveSession> {
        match &self.state {
            AuthState::Authenticated(active) => Some(active),
            _ => None,
        }
    }

    #[must_use]
    pub fn user(&self) -> Option<&User> {
        self.active().map(|active| &active.user)
    }

    #[must_use]
    pub fn access_token(&self) -> Option<&str> {
        self.active().map(|active| active.session.access_token.as_str())
    }

    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.active().is_some()
    }

    #[must_use]
    pub fn is_initializing(&self) -> bool {
        self.state == AuthState::Initializing
    }
}
