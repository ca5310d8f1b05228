//! Service factory for creating configured authentication services
//!
//! Builds the gateway, identity backend, session store and session manager
//! from [`TrainerSettings`]. A missing backend URL or key still yields a
//! working manager that reports itself as not configured.

use crate::gateway::{Gateway, GatewayError};
use crate::identity::{IdentityBackend, RemoteIdentity};
use crate::platform::Navigator;
use crate::session::{RedirectDefaults, SessionManager};
use crate::settings::TrainerSettings;
use crate::store::{FileStorage, KeyValueStorage, SessionStore};
use crate::utils::logging::LoggingHelper;
use crate::workouts::WorkoutsApi;
use std::path::PathBuf;
use std::sync::Arc;

/// Configuration for creating authentication services
#[derive(Debug, Clone)]
pub struct AuthenticationConfig {
    pub storage_directory: PathBuf,
    pub session_key: String,
    pub redirects: RedirectDefaults,
}

impl AuthenticationConfig {
    /// Create authentication configuration from settings
    #[must_use]
    pub fn from_settings(settings: &TrainerSettings) -> Self {
        Self {
            storage_directory: settings.storage_directory(),
            session_key: settings.storage.session_key.clone(),
            redirects: RedirectDefaults {
                password_reset: settings.auth.password_reset_redirect.clone(),
                oauth: settings.auth.oauth_redirect.clone(),
            },
        }
    }
}

/// Everything a host needs to drive authentication
pub struct AuthenticationServices {
    pub manager: SessionManager,
    pub workouts: WorkoutsApi,
}

/// Factory for creating authentication services with dependency injection
pub struct AuthenticationServiceFactory;

impl AuthenticationServiceFactory {
    /// Create the session manager and workout API backed by on-disk storage
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be constructed
    pub fn create(
        settings: &TrainerSettings,
        navigator: Arc<dyn Navigator>,
    ) -> Result<AuthenticationServices, GatewayError> {
        let config = AuthenticationConfig::from_settings(settings);
        let storage = Arc::new(FileStorage::new(config.storage_directory.clone()));
        log::info!("🗄️  Session storage at {}", config.storage_directory.display());

        Self::create_with_storage(settings, &config, storage, navigator)
    }

    /// Create services on top of an explicit storage backend
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be constructed
    pub fn create_with_storage(
        settings: &TrainerSettings,
        config: &AuthenticationConfig,
        storage: Arc<dyn KeyValueStorage>,
        navigator: Arc<dyn Navigator>,
    ) -> Result<AuthenticationServices, GatewayError> {
        log::info!("🏭 Starting authentication service factory...");

        let gateway = Gateway::new(&settings.backend)?;
        LoggingHelper::log_backend_status(gateway.is_configured(), gateway.base_url());

        let backend: Arc<dyn IdentityBackend> = Arc::new(RemoteIdentity::new(gateway.clone()));
        let store = SessionStore::new(storage, config.session_key.clone());

        let manager = SessionManager::new(backend, store, navigator).with_redirects(config.redirects.clone());
        log::info!("   └─ Platform: {}", settings.auth.platform);

        log::info!("🏭 Authentication service factory completed successfully");
        Ok(AuthenticationServices {
            manager,
            workouts: WorkoutsApi::new(gateway),
        })
    }
}
