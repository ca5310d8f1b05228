//! Session Management Module
//!
//! Client-side authentication lifecycle: startup hydration, credential
//! flows, redirect capture and sign-out.
//!
//! # Modules
//!
//! - [`manager`] - The session manager owning the authentication state
//! - [`state`] - State snapshots published to subscribers
//! - [`validation`] - Local credential checks run before any request
//! - [`redirect`] - Token extraction from OAuth and email-link redirects
//! - [`messages`] - User-facing error copy

pub mod manager;
pub mod messages;
pub mod redirect;
pub mod state;
pub mod validation;

pub use manager::{RedirectDefaults, SessionManager};
pub use redirect::{parse_redirect, RedirectTokens};
pub use state::{ActiveSession, AuthSnapshot, AuthState};
pub use validation::{Credentials, ValidationError};
