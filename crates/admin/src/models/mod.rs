//! Session-held view state for admin.

pub mod session;

pub use session::{Flash, FlashLevel, keys};
