//! Order detail page handler.

use askama::Template;
use askama_web::WebTemplate;
use axum::extract::{Path, State};
use shopdesk_core::OrderId;
use tower_sessions::Session;
use tracing::instrument;

use crate::filters;
use crate::models::Flash;
use crate::models::session::take_flashes;
use crate::resource::{Items, Loadable, Orders, Resource, Users};
use crate::state::AppState;

use super::types::OrderDetailView;

/// Order detail page template.
#[derive(Template, WebTemplate)]
#[template(path = "orders/show.html")]
pub struct OrderShowTemplate {
    pub current_path: String,
    pub flashes: Vec<Flash>,
    pub order: Option<OrderDetailView>,
    pub error: Option<String>,
}

/// Order detail page handler.
///
/// Loads the order, then its user, then the item catalogue for line names.
/// Only the order itself is required.
#[instrument(skip(state, session))]
pub async fn show(
    State(state): State<AppState>,
    session: Session,
    Path(id): Path<OrderId>,
) -> OrderShowTemplate {
    let backend = state.backend();

    let (order, error) = match Loadable::from_result(
        backend.fetch::<Orders>(id).await,
        Orders::load_failed_message(),
    ) {
        Loadable::Ready(order) => {
            let user = backend
                .fetch::<Users>(order.user_id)
                .await
                .inspect_err(|e| tracing::warn!("Failed to fetch order user: {e}"))
                .ok();
            let items = backend
                .list::<Items>()
                .await
                .inspect_err(|e| tracing::warn!("Failed to fetch items for order lines: {e}"))
                .unwrap_or_default();
            let view = OrderDetailView::new(&order, user.as_ref(), &items, state.display());
            (Some(view), None)
        }
        Loadable::Failed(message) => (None, Some(message)),
    };

    OrderShowTemplate {
        current_path: Orders::list_path(),
        flashes: take_flashes(&session).await,
        order,
        error,
    }
}
