/// Version of the trainer auth library
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub mod authentication;
pub mod gateway;
pub mod identity;
pub mod models;
pub mod platform;
pub mod session;
pub mod settings;
pub mod store;
pub mod utils;
pub mod workouts;

#[cfg(any(test, feature = "testing"))]
pub mod testing;

/// Re-export commonly used items
pub use authentication::{AuthenticationServiceFactory, AuthenticationServices};
pub use gateway::{Gateway, GatewayError};
pub use identity::{IdentityBackend, RemoteIdentity};
pub use models::{AuthResult, Session, User};
pub use platform::{ConsoleNavigator, Navigator, Platform};
pub use session::{AuthSnapshot, AuthState, SessionManager};
pub use settings::TrainerSettings;
pub use store::{FileStorage, MemoryStorage, SessionStore};
pub use workouts::WorkoutsApi;
