//! Authentication module: wiring of the identity, storage and session
//! services from settings.

pub mod factory;

pub use factory::{AuthenticationConfig, AuthenticationServiceFactory, AuthenticationServices};
