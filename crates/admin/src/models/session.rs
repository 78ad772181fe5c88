//! Session-related types for the admin views.
//!
//! The session carries the operator's in-progress order draft and one-shot
//! flash messages shown on the next rendered page.

use serde::{Deserialize, Serialize};
use shopdesk_core::OrderDraft;
use tower_sessions::Session;

/// Session keys for admin view state.
pub mod keys {
    /// Key for the order being composed on the order-create page.
    pub const ORDER_DRAFT: &str = "orders.draft";

    /// Key for pending flash messages.
    pub const FLASH: &str = "flash";
}

/// Severity of a flash message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FlashLevel {
    Success,
    Warning,
    Error,
}

impl FlashLevel {
    /// CSS class used by the base layout.
    #[must_use]
    pub const fn css_class(self) -> &'static str {
        match self {
            Self::Success => "flash-success",
            Self::Warning => "flash-warning",
            Self::Error => "flash-error",
        }
    }
}

/// A message shown once on the next rendered page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Flash {
    pub level: FlashLevel,
    pub message: String,
}

impl Flash {
    #[must_use]
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            level: FlashLevel::Success,
            message: message.into(),
        }
    }

    #[must_use]
    pub fn warning(message: impl Into<String>) -> Self {
        Self {
            level: FlashLevel::Warning,
            message: message.into(),
        }
    }

    #[must_use]
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            level: FlashLevel::Error,
            message: message.into(),
        }
    }

    /// CSS class for the template.
    #[must_use]
    pub const fn css_class(&self) -> &'static str {
        self.level.css_class()
    }
}

/// Queue a flash message.
///
/// A session failure only loses the message, so it is logged and ignored.
pub async fn push_flash(session: &Session, flash: Flash) {
    let result = async {
        let mut pending: Vec<Flash> = session.get(keys::FLASH).await?.unwrap_or_default();
        pending.push(flash);
        session.insert(keys::FLASH, pending).await
    }
    .await;

    if let Err(e) = result {
        tracing::warn!("Failed to store flash message: {e}");
    }
}

/// Take every pending flash message, leaving none behind.
pub async fn take_flashes(session: &Session) -> Vec<Flash> {
    session
        .remove::<Vec<Flash>>(keys::FLASH)
        .await
        .ok()
        .flatten()
        .unwrap_or_default()
}

/// The operator's order draft, or an empty one.
///
/// # Errors
///
/// Returns an error if the session store fails.
pub async fn load_draft(session: &Session) -> Result<OrderDraft, tower_sessions::session::Error> {
    Ok(session
        .get::<OrderDraft>(keys::ORDER_DRAFT)
        .await?
        .unwrap_or_default())
}

/// Store the operator's order draft.
///
/// # Errors
///
/// Returns an error if the session store fails.
pub async fn save_draft(
    session: &Session,
    draft: &OrderDraft,
) -> Result<(), tower_sessions::session::Error> {
    session.insert(keys::ORDER_DRAFT, draft).await
}

/// Drop the operator's order draft.
///
/// # Errors
///
/// Returns an error if the session store fails.
pub async fn clear_draft(session: &Session) -> Result<(), tower_sessions::session::Error> {
    session.remove::<OrderDraft>(keys::ORDER_DRAFT).await?;
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::Arc;

    use rust_decimal::Decimal;
    use shopdesk_core::{DraftLine, ItemId, Uuid};

    use super::*;
    use crate::middleware::SweepingMemoryStore;

    fn session() -> Session {
        Session::new(None, Arc::new(SweepingMemoryStore::default()), None)
    }

    #[tokio::test]
    async fn test_flashes_are_taken_once() {
        let session = session();
        push_flash(&session, Flash::warning("This item has already been added.")).await;
        push_flash(&session, Flash::error("Please select a user.")).await;

        let flashes = take_flashes(&session).await;
        assert_eq!(flashes.len(), 2);
        assert_eq!(flashes[0].level, FlashLevel::Warning);
        assert_eq!(flashes[1].css_class(), "flash-error");

        assert!(take_flashes(&session).await.is_empty());
    }

    #[tokio::test]
    async fn test_draft_round_trips_through_session() {
        let session = session();
        assert!(load_draft(&session).await.unwrap().is_empty());

        let mut draft = OrderDraft::default();
        draft
            .push_line(DraftLine::new(
                ItemId::new(Uuid::new_v4()),
                "Sencha",
                Decimal::new(1000, 0),
            ))
            .unwrap();
        save_draft(&session, &draft).await.unwrap();
        assert_eq!(load_draft(&session).await.unwrap(), draft);

        clear_draft(&session).await.unwrap();
        assert!(load_draft(&session).await.unwrap().is_empty());
    }
}
