//! HTTP middleware stack for admin.
//!
//! # Middleware Order (outermost first)
//!
//! 1. Sentry layers (added by the binary)
//! 2. `TraceLayer` (request tracing)
//! 3. Session layer (tower-sessions over a swept in-memory store)

pub mod session;
pub mod session_store;

pub use session::{SESSION_COOKIE_NAME, SESSION_SWEEP_PERIOD, create_session_layer};
pub use session_store::SweepingMemoryStore;
