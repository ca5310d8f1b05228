// Centralized logging for session lifecycle events. Tokens are never logged.
use crate::models::User;
use crate::platform::Platform;
use log::{debug, info, warn};

pub struct LoggingHelper;

impl LoggingHelper {
    /// Log backend configuration status at startup
    pub fn log_backend_status(configured: bool, base_url: &str) {
        if configured {
            info!("✅ Backend configured ({base_url})");
        } else {
            warn!("❌ Backend not configured - set BACKEND_URL and BACKEND_API_KEY");
        }
    }

    pub fn log_hydration_start(has_launch_url: bool) {
        debug!("🔄 Hydrating session (launch URL present: {has_launch_url})");
    }

    pub fn log_hydration_settled(authenticated: bool) {
        if authenticated {
            info!("🔐 Session restored");
        } else {
            info!("🔓 No active session");
        }
    }

    /// Log session adoption
    pub fn log_session_adopted(user: &User, remember_me: bool) {
        info!(
            "Session established for user {} ({}), persisted: {remember_me}",
            user.id, user.email
        );
    }

    pub fn log_persisted_session_discarded(reason: &dyn std::fmt::Display) {
        warn!("Discarding persisted session: {reason}");
    }

    pub fn log_redirect_captured(platform: Platform) {
        info!("🔗 Captured session from {platform} redirect");
    }

    pub fn log_redirect_rejected(reason: &dyn std::fmt::Display) {
        warn!("Redirect token could not be used: {reason}");
    }

    pub fn log_oauth_redirect(provider: &str, platform: Platform) {
        info!("🔍 Sending user to {provider} authorization ({platform})");
    }

    pub fn log_operation_failed(operation: &str, reason: &dyn std::fmt::Display) {
        warn!("{operation} failed: {reason}");
    }

    pub fn log_signed_out(remote_revoked: bool) {
        if remote_revoked {
            info!("Signed out");
        } else {
            info!("Signed out locally (remote revoke skipped or failed)");
        }
    }
}
