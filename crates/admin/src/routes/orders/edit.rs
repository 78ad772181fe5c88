//! Order edit handlers.
//!
//! Only the order header is editable: status, shipping address, and notes.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::{Path, State},
    response::{IntoResponse, Redirect, Response},
};
use serde::Deserialize;
use shopdesk_core::{Order, OrderId, OrderStatus, OrderUpdate};
use tower_sessions::Session;
use tracing::instrument;

use crate::error::AppError;
use crate::filters;
use crate::models::Flash;
use crate::models::session::{push_flash, take_flashes};
use crate::resource::{Loadable, Orders, Resource};
use crate::state::AppState;

use super::types::{OptionView, status_options};

/// Order edit form input.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct OrderEditForm {
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub shipping_address: String,
    #[serde(default)]
    pub notes: String,
}

impl From<&Order> for OrderEditForm {
    fn from(order: &Order) -> Self {
        Self {
            status: order.status.as_str().to_string(),
            shipping_address: order.shipping_address.clone().unwrap_or_default(),
            notes: order.notes.clone().unwrap_or_default(),
        }
    }
}

impl OrderEditForm {
    /// Build the update payload. Blank address or notes clear the field.
    ///
    /// # Errors
    ///
    /// Returns a message when the status is not a known value.
    pub fn to_update(&self) -> Result<OrderUpdate, String> {
        let status = self
            .status
            .parse::<OrderStatus>()
            .map_err(|_| "Status is invalid".to_string())?;
        let non_empty = |value: &str| {
            let trimmed = value.trim();
            (!trimmed.is_empty()).then(|| trimmed.to_string())
        };

        Ok(OrderUpdate {
            status: Some(status),
            shipping_address: non_empty(&self.shipping_address),
            notes: non_empty(&self.notes),
        })
    }

    fn status_options(&self) -> Vec<OptionView> {
        status_options(self.status.parse().unwrap_or_default())
    }
}

/// Order edit page template.
#[derive(Template, WebTemplate)]
#[template(path = "orders/edit.html")]
pub struct OrderEditTemplate {
    pub current_path: String,
    pub flashes: Vec<Flash>,
    pub order_id: String,
    pub form: Option<OrderEditForm>,
    pub statuses: Vec<OptionView>,
    pub error: Option<String>,
}

impl OrderEditTemplate {
    fn new(id: OrderId, form: Option<OrderEditForm>, error: Option<String>) -> Self {
        Self {
            current_path: Orders::list_path(),
            flashes: Vec::new(),
            order_id: id.to_string(),
            statuses: form
                .as_ref()
                .map(OrderEditForm::status_options)
                .unwrap_or_default(),
            form,
            error,
        }
    }
}

/// Order edit page handler.
#[instrument(skip(state, session))]
pub async fn edit(
    State(state): State<AppState>,
    session: Session,
    Path(id): Path<OrderId>,
) -> OrderEditTemplate {
    let (form, error) = match Loadable::from_result(
        state.backend().fetch::<Orders>(id).await,
        Orders::load_failed_message(),
    ) {
        Loadable::Ready(order) => (Some(OrderEditForm::from(&order)), None),
        Loadable::Failed(message) => (None, Some(message)),
    };

    OrderEditTemplate {
        flashes: take_flashes(&session).await,
        ..OrderEditTemplate::new(id, form, error)
    }
}

/// Order update handler.
#[instrument(skip(state, session))]
pub async fn update(
    State(state): State<AppState>,
    session: Session,
    Path(id): Path<OrderId>,
    Form(form): Form<OrderEditForm>,
) -> Result<Response, AppError> {
    let payload = match form.to_update() {
        Ok(payload) => payload,
        Err(message) => {
            return Ok(OrderEditTemplate::new(id, Some(form), Some(message)).into_response());
        }
    };

    match state.backend().update::<Orders>(id, &payload).await {
        Ok(_) => {
            tracing::info!(order_id = %id, "Updated order");
            push_flash(&session, Flash::success("Order updated.")).await;
            Ok(Redirect::to(&Orders::detail_path(id)).into_response())
        }
        Err(e) if e.is_not_found() => Err(AppError::from(e)),
        Err(e) => {
            tracing::error!("Failed to update order: {e}");
            let message = e.detail_or("Failed to update order. Please try again.").to_string();
            Ok(OrderEditTemplate::new(id, Some(form), Some(message)).into_response())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_to_update_clears_blank_fields() {
        let form = OrderEditForm {
            status: "shipped".to_string(),
            shipping_address: "  ".to_string(),
            notes: " Leave at the door ".to_string(),
        };
        let update = form.to_update().unwrap_or_default();
        assert_eq!(update.status, Some(OrderStatus::Shipped));
        assert_eq!(update.shipping_address, None);
        assert_eq!(update.notes.as_deref(), Some("Leave at the door"));
    }

    #[test]
    fn test_to_update_rejects_unknown_status() {
        let form = OrderEditForm {
            status: "lost".to_string(),
            ..OrderEditForm::default()
        };
        assert_eq!(form.to_update(), Err("Status is invalid".to_string()));
    }
}
