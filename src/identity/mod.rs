//! Identity API
//!
//! Typed wrappers over the hosted auth and profile endpoints. The session
//! manager only sees the [`IdentityBackend`] trait, so it can be driven by
//! [`RemoteIdentity`] in production and by an in-memory double in tests.

pub mod profiles;
pub mod service;

pub use profiles::{spawn_profile_sync, ProfileUpsert};
pub use service::{IdentityBackend, IdentityError, RemoteIdentity, SignUpResponse};
