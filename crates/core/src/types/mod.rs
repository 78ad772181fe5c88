//! Core types for Shopdesk.
//!
//! This module provides type-safe wrappers for common domain concepts.

pub mod email;
pub mod id;
pub mod money;
pub mod status;
pub mod timestamp;

pub use email::{Email, EmailError};
pub use id::*;
pub use money::{MAX_AMOUNT, MoneyError, format_amount, parse_amount};
pub use status::OrderStatus;
pub use timestamp::Timestamp;
