//! Shopdesk Core - Shared types library.
//!
//! This crate provides the types shared by the Shopdesk components:
//! - `admin` - Server-rendered administration panel over the REST backend
//! - `integration-tests` - In-process mock backend and end-to-end tests
//!
//! # Architecture
//!
//! The core crate contains only types and pure logic - no I/O, no HTTP
//! clients. This keeps it lightweight and allows it to be used anywhere.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for IDs, money, timestamps, emails, and statuses
//! - [`models`] - Entity records and request payloads mirrored from the backend API
//! - [`draft`] - Order composition: line selection, quantities, and totals

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod draft;
pub mod models;
pub mod types;

pub use draft::{DraftError, DraftLine, OrderDraft, parse_quantity};
pub use models::*;
pub use types::*;
