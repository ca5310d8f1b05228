use crate::platform::Platform;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;
use std::time::Duration;

/// Storage key used for the persisted session blob
pub const DEFAULT_SESSION_KEY: &str = "@ai-gym-trainer/auth-session";

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct TrainerSettings {
    pub backend: BackendSettings,
    pub storage: StorageSettings,
    pub auth: AuthSettings,
    pub logging: LoggingSettings,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct BackendSettings {
    /// Base URL of the hosted backend, e.g. `https://project.example.co`
    pub url: String,
    /// Public (anon) API key sent as `apikey` on every request
    pub api_key: String,
    /// Per-request timeout in seconds. 0 leaves the HTTP client default in place.
    pub timeout_seconds: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageSettings {
    /// Directory holding the on-device key/value files
    pub directory: String,
    pub session_key: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AuthSettings {
    pub platform: Platform,
    /// Where password-reset emails send the user back to
    pub password_reset_redirect: Option<String>,
    /// Where the Google authorization flow returns to
    pub oauth_redirect: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingSettings {
    pub level: String,
}

impl Default for StorageSettings {
    fn default() -> Self {
        Self {
            directory: ".trainer".to_string(),
            session_key: DEFAULT_SESSION_KEY.to_string(),
        }
    }
}

impl Default for AuthSettings {
    fn default() -> Self {
        Self {
            platform: Platform::Native,
            password_reset_redirect: Some("trainer://auth/reset-password".to_string()),
            oauth_redirect: Some("trainer://auth/callback".to_string()),
        }
    }
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

impl BackendSettings {
    /// Both the base URL and the API key must be present for any network call
    #[must_use]
    pub fn is_configured(&self) -> bool {
        !self.url.trim().is_empty() && !self.api_key.trim().is_empty()
    }

    /// Base URL without a trailing slash
    #[must_use]
    pub fn base_url(&self) -> &str {
        self.url.trim().trim_end_matches('/')
    }

    #[must_use]
    pub fn timeout(&self) -> Option<Duration> {
        (self.timeout_seconds > 0).then(|| Duration::from_secs(self.timeout_seconds))
    }
}

impl TrainerSettings {
    /// Load settings from configuration files and environment variables,
    /// then initialize logging from the resolved level
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - A settings file exists but cannot be read
    /// - TOML parsing fails
    pub fn load() -> Result<Self, Box<dyn std::error::Error>> {
        Self::load_env_file();

        let mut settings = Self::load_base_settings()?;
        Self::apply_env_overrides(&mut settings);

        Self::initialize_logging(&settings.logging);
        Ok(settings)
    }

    /// Load base settings from TOML file(s) or use defaults
    /// Settings are loaded with the following priority (highest to lowest):
    /// 1. Environment variables (applied separately after loading base settings)
    /// 2. Settings.toml in `TRAINER_SECRETS_DIR` (if specified and exists)
    /// 3. Settings.toml in current directory (if exists)
    /// 4. Default settings
    fn load_base_settings() -> Result<Self, Box<dyn std::error::Error>> {
        let mut settings = Self::default();

        let default_config_path = PathBuf::from("Settings.toml");
        if default_config_path.exists() {
            let toml_content = fs::read_to_string(&default_config_path)?;
            settings = Self::from_toml(&toml_content)?;
            println!(
                "✓ Loaded base settings from {}",
                default_config_path.display()
            );
        }

        if let Ok(secrets_dir) = std::env::var("TRAINER_SECRETS_DIR") {
            let secrets_path = std::path::Path::new(&secrets_dir).join("Settings.toml");
            if secrets_path.exists() {
                let secrets_toml_content = fs::read_to_string(&secrets_path)?;
                settings = Self::from_toml(&secrets_toml_content)?;
                println!("✓ Overriding settings from {}", secrets_path.display());
            } else {
                println!(
                    "ℹ TRAINER_SECRETS_DIR set but no Settings.toml found at: {}",
                    secrets_path.display()
                );
            }
        }

        Ok(settings)
    }

    /// Parse settings from a TOML document; missing tables fall back to defaults
    ///
    /// # Errors
    ///
    /// Returns an error if the document is not valid TOML for this shape
    pub fn from_toml(content: &str) -> Result<Self, basic_toml::Error> {
        basic_toml::from_str(content)
    }

    /// Apply environment variable overrides to settings
    pub fn apply_env_overrides(settings: &mut Self) {
        Self::apply_backend_env_overrides(&mut settings.backend);
        Self::apply_storage_env_overrides(&mut settings.storage);
        Self::apply_auth_env_overrides(&mut settings.auth);
        Self::apply_logging_env_overrides(&mut settings.logging);
    }

    /// Apply environment overrides for backend settings
    pub fn apply_backend_env_overrides(backend: &mut BackendSettings) {
        if let Some(url) = env_value("BACKEND_URL") {
            backend.url = url;
        }
        if let Some(key) = env_value("BACKEND_API_KEY").or_else(|| env_value("BACKEND_ANON_KEY")) {
            backend.api_key = key;
        }
        if let Some(timeout) = env_value("BACKEND_TIMEOUT_SECONDS") {
            if let Ok(seconds) = timeout.parse::<u64>() {
                backend.timeout_seconds = seconds;
            }
        }
        backend.url = backend.url.trim().to_string();
        backend.api_key = backend.api_key.trim().to_string();
    }

    fn apply_storage_env_overrides(storage: &mut StorageSettings) {
        if let Some(directory) = env_value("TRAINER_STORAGE_DIR") {
            storage.directory = directory;
        }
        if let Some(key) = env_value("TRAINER_SESSION_KEY") {
            storage.session_key = key;
        }
    }

    /// Apply environment overrides for auth flow settings
    pub fn apply_auth_env_overrides(auth: &mut AuthSettings) {
        if let Some(platform) = env_value("TRAINER_PLATFORM") {
            match platform.parse::<Platform>() {
                Ok(platform) => auth.platform = platform,
                Err(e) => eprintln!("⚠️  Ignoring TRAINER_PLATFORM: {e}"),
            }
        }
        if let Some(redirect) = env_value("PASSWORD_RESET_REDIRECT") {
            auth.password_reset_redirect = Some(redirect);
        }
        if let Some(redirect) = env_value("OAUTH_REDIRECT") {
            auth.oauth_redirect = Some(redirect);
        }
    }

    fn apply_logging_env_overrides(logging: &mut LoggingSettings) {
        if let Some(level) = env_value("RUST_LOG") {
            logging.level = level;
        }
    }

    /// Initialize `env_logger` once; later calls keep the first logger
    fn initialize_logging(logging: &LoggingSettings) {
        let initialized = env_logger::Builder::new()
            .parse_filters(&logging.level)
            .try_init();
        if initialized.is_err() {
            log::debug!("Logger already initialized, keeping existing configuration");
        }
    }

    /// Load environment variables from .env file
    fn load_env_file() {
        if let Ok(contents) = fs::read_to_string(".env") {
            for line in contents.lines() {
                let line = line.trim();
                if line.starts_with('#') {
                    continue;
                }
                if let Some((key, value)) = line.split_once('=') {
                    std::env::set_var(key.trim(), value.trim().trim_matches('"'));
                }
            }
        }
    }

    /// Path of the storage directory
    #[must_use]
    pub fn storage_directory(&self) -> PathBuf {
        PathBuf::from(&self.storage.directory)
    }
}

/// Read an environment variable, treating blank values as unset
fn env_value(name: &str) -> Option<String> {
    std::env::var(name)
        .ok()
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}
