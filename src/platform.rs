//! Platform navigation
//!
//! The session manager never touches a browser window or an OS URL handler
//! directly. It asks a [`Navigator`] for the URL the app was launched with
//! and hands it the URLs it needs opened.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::sync::Mutex;

/// Runtime hosting the application
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Platform {
    /// Browser-hosted: redirects are full-page navigations
    Web,
    /// Native app: redirects open in the system browser
    Native,
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Platform::Web => write!(f, "web"),
            Platform::Native => write!(f, "native"),
        }
    }
}

impl FromStr for Platform {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "web" => Ok(Platform::Web),
            "native" | "ios" | "android" => Ok(Platform::Native),
            other => Err(format!("unknown platform '{other}'")),
        }
    }
}

/// Navigation errors
#[derive(Debug, thiserror::Error)]
pub enum NavigationError {
    #[error("Unable to open URL: {0}")]
    OpenFailed(String),
}

/// Host-side navigation hooks used by the session manager
pub trait Navigator: Send + Sync {
    fn platform(&self) -> Platform;

    /// URL the app was launched or navigated with, if any
    fn launch_url(&self) -> Option<String>;

    /// Full-page navigation (browser runtimes)
    ///
    /// # Errors
    ///
    /// Returns an error if the host refuses the navigation
    fn navigate(&self, url: &str) -> Result<(), NavigationError>;

    /// Open a URL outside the app (native runtimes)
    ///
    /// # Errors
    ///
    /// Returns an error if no handler accepts the URL
    fn open_external(&self, url: &str) -> Result<(), NavigationError>;

    /// Strip a consumed token fragment from the visible location
    fn clear_redirect(&self) {}
}

/// Navigator for headless and command-line hosts
///
/// Holds the launch URL handed over at startup and prints every URL it is
/// asked to open so the user can follow it in a browser.
#[derive(Debug)]
pub struct ConsoleNavigator {
    platform: Platform,
    launch_url: Mutex<Option<String>>,
}

impl ConsoleNavigator {
    #[must_use]
    pub fn new(platform: Platform, launch_url: Option<String>) -> Self {
        Self {
            platform,
            launch_url: Mutex::new(launch_url),
        }
    }
}

impl Navigator for ConsoleNavigator {
    fn platform(&self) -> Platform {
        self.platform
    }

    fn launch_url(&self) -> Option<String> {
        self.launch_url.lock().ok().and_then(|url| url.clone())
    }

    fn navigate(&self, url: &str) -> Result<(), NavigationError> {
        println!("Continue in your browser: {url}");
        Ok(())
    }

    fn open_external(&self, url: &str) -> Result<(), NavigationError> {
        println!("Open this link to continue: {url}");
        Ok(())
    }

    fn clear_redirect(&self) {
        if let Ok(mut url) = self.launch_url.lock() {
            *url = None;
        }
    }
}
