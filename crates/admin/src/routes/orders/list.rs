//! Orders list page handler.

use std::collections::HashMap;

use askama::Template;
use askama_web::WebTemplate;
use axum::extract::{Query, State};
use shopdesk_core::{Order, UserId};
use tower_sessions::Session;
use tracing::instrument;

use crate::error::AppError;
use crate::filters;
use crate::models::Flash;
use crate::models::session::take_flashes;
use crate::resource::{Loadable, Orders, Resource, Users};
use crate::state::AppState;

use super::types::{OrderRowView, OrdersQuery, user_names};

/// Orders list page template.
#[derive(Template, WebTemplate)]
#[template(path = "orders/index.html")]
pub struct OrdersIndexTemplate {
    pub current_path: String,
    pub flashes: Vec<Flash>,
    pub orders: Vec<OrderRowView>,
    /// Name of the user the list is filtered to.
    pub filter_user: Option<String>,
    /// Path of this page, used as the delete return target.
    pub return_to: String,
    pub error: Option<String>,
}

/// Orders list page handler.
///
/// Fetches the orders, then the users to resolve names. A failed user fetch
/// only degrades names to "Unknown user".
#[instrument(skip(state, session))]
pub async fn index(
    State(state): State<AppState>,
    session: Session,
    Query(query): Query<OrdersQuery>,
) -> Result<OrdersIndexTemplate, AppError> {
    let user_filter = query
        .user_id
        .as_deref()
        .map(str::trim)
        .filter(|raw| !raw.is_empty())
        .map(|raw| {
            raw.parse::<UserId>()
                .map_err(|e| AppError::BadRequest(e.to_string()))
        })
        .transpose()?;

    let backend = state.backend();
    let orders = match user_filter {
        Some(user_id) => backend.list_orders_for_user(user_id).await,
        None => backend.list::<Orders>().await,
    };
    let orders: Loadable<Vec<Order>> =
        Loadable::from_result(orders, Orders::load_failed_message());

    let names = match backend.list::<Users>().await {
        Ok(users) => user_names(&users),
        Err(e) => {
            tracing::warn!("Failed to fetch users for order list: {e}");
            HashMap::new()
        }
    };

    let display = state.display();
    let (orders, error) = orders
        .map(|orders| {
            orders
                .iter()
                .map(|o| OrderRowView::new(o, names.get(&o.user_id).map(String::as_str), display))
                .collect::<Vec<_>>()
        })
        .into_parts();

    let return_to = user_filter.map_or_else(Orders::list_path, |id| {
        format!("{}?user_id={id}", Orders::list_path())
    });

    Ok(OrdersIndexTemplate {
        current_path: Orders::list_path(),
        flashes: take_flashes(&session).await,
        orders,
        filter_user: user_filter
            .map(|id| names.get(&id).cloned().unwrap_or_else(|| id.to_string())),
        return_to,
        error,
    })
}
