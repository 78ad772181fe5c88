//! Entity records and request payloads.
//!
//! These mirror the backend's JSON shapes one-to-one. Records are what the
//! backend returns; `*Create` and `*Update` are what the admin sends.

pub mod item;
pub mod order;
pub mod user;

pub use item::{Item, ItemCreate, ItemUpdate};
pub use order::{Order, OrderCreate, OrderLine, OrderLineCreate, OrderUpdate};
pub use user::{User, UserCreate, UserUpdate};
