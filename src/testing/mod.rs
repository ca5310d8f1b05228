//! Unified testing utilities for the trainer auth crate
//!
//! ## Organization
//!
//! - [`fixtures`] - Pre-built test data (sessions, users, settings)
//! - [`mock`] - Recording fakes for the identity backend and navigator
//!
//! ## Usage
//!
//! ```rust,ignore
//! use trainer_auth::testing::{MockIdentityBackend, RecordingNavigator, TestFixtures};
//!
//! let backend = MockIdentityBackend::new().reject_sign_in("Invalid login credentials");
//! let navigator = RecordingNavigator::native(None);
//! let session = TestFixtures::session();
//! ```

pub mod fixtures;
pub mod mock;

pub use fixtures::TestFixtures;
pub use mock::{MockIdentityBackend, RecordingNavigator};

/// Common test constants
pub mod constants {
    /// Default test email address
    pub const TEST_EMAIL: &str = "user@example.com";

    /// Default test user name
    pub const TEST_USER_NAME: &str = "Test User";

    /// Default test user id
    pub const TEST_USER_ID: &str = "user-123";

    pub const TEST_ACCESS_TOKEN: &str = "test-access-token";

    pub const TEST_REFRESH_TOKEN: &str = "test-refresh-token";

    /// Base URL used by fakes that build provider URLs
    pub const TEST_BACKEND_URL: &str = "https://project.example.co";
}
