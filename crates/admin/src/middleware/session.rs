//! Session middleware configuration for admin.
//!
//! Sessions hold per-operator view state only (the order draft and flash
//! messages), so they live in memory and are lost on restart. Expired
//! sessions are swept every [`SESSION_SWEEP_PERIOD`].

use std::time::Duration;

use tower_sessions::{Expiry, SessionManagerLayer};

use super::session_store::SweepingMemoryStore;
use crate::config::AdminConfig;

/// Session cookie name for admin.
pub const SESSION_COOKIE_NAME: &str = "shopdesk_admin_session";

/// Session expiry time in seconds (8 hours of inactivity).
const SESSION_EXPIRY_SECONDS: i64 = 8 * 60 * 60;

/// How often expired sessions are deleted.
pub const SESSION_SWEEP_PERIOD: Duration = Duration::from_secs(5 * 60);

/// Create the session layer over `store`.
///
/// Cookies are marked `Secure` when the admin's base URL is `https://`.
#[must_use]
pub fn create_session_layer(
    store: SweepingMemoryStore,
    config: &AdminConfig,
) -> SessionManagerLayer<SweepingMemoryStore> {
    SessionManagerLayer::new(store)
        .with_name(SESSION_COOKIE_NAME)
        .with_expiry(Expiry::OnInactivity(
            tower_sessions::cookie::time::Duration::seconds(SESSION_EXPIRY_SECONDS),
        ))
        .with_secure(config.is_secure())
        .with_same_site(tower_sessions::cookie::SameSite::Strict)
        .with_http_only(true)
        .with_path("/")
}
