//! HTTP route handlers for admin.
//!
//! # Route Structure
//!
//! ```text
//! GET  /                       - Dashboard
//! GET  /health                 - Liveness check
//! GET  /health/ready           - Readiness check (backend reachable)
//!
//! # Users
//! GET  /users                  - User list
//! GET  /users/new              - Create form
//! POST /users                  - Create
//! GET  /users/{id}             - Detail (with the user's orders)
//! GET  /users/{id}/edit        - Edit form
//! POST /users/{id}/edit        - Update (changed fields only)
//! GET  /users/{id}/delete      - Delete confirmation
//! POST /users/{id}/delete      - Delete (requires confirm=yes)
//!
//! # Items
//! GET  /items                  - Item list
//! GET  /items/new              - Create form
//! POST /items                  - Create
//! GET  /items/{id}             - Detail
//! GET  /items/{id}/edit        - Edit form
//! POST /items/{id}/edit        - Update (full replace)
//! GET  /items/{id}/delete      - Delete confirmation
//! POST /items/{id}/delete      - Delete (requires confirm=yes)
//!
//! # Orders
//! GET  /orders[?user_id=]      - Order list
//! GET  /orders/new             - Order composition
//! POST /orders/new             - Draft actions (add_item, update, remove:N, reset, submit)
//! GET  /orders/{id}            - Detail
//! GET  /orders/{id}/edit       - Edit form
//! POST /orders/{id}/edit       - Update status, address, notes
//! GET  /orders/{id}/delete     - Delete confirmation
//! POST /orders/{id}/delete     - Delete (requires confirm=yes)
//! ```

pub mod dashboard;
pub mod delete;
pub mod health;
pub mod items;
pub mod orders;
pub mod users;

use axum::{Router, routing::get};

use crate::resource::{Items, Orders, Users};
use crate::state::AppState;

/// Build the admin router.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(dashboard::index))
        .route("/health", get(health::health))
        .route("/health/ready", get(health::readiness))
        .merge(user_routes())
        .merge(item_routes())
        .merge(order_routes())
}

fn user_routes() -> Router<AppState> {
    Router::new()
        .route("/users", get(users::index).post(users::create))
        .route("/users/new", get(users::new))
        .route("/users/{id}", get(users::show))
        .route("/users/{id}/edit", get(users::edit).post(users::update))
        .route(
            "/users/{id}/delete",
            get(delete::confirm::<Users>).post(delete::delete::<Users>),
        )
}

fn item_routes() -> Router<AppState> {
    Router::new()
        .route("/items", get(items::index).post(items::create))
        .route("/items/new", get(items::new))
        .route("/items/{id}", get(items::show))
        .route("/items/{id}/edit", get(items::edit).post(items::update))
        .route(
            "/items/{id}/delete",
            get(delete::confirm::<Items>).post(delete::delete::<Items>),
        )
}

fn order_routes() -> Router<AppState> {
    Router::new()
        .route("/orders", get(orders::index))
        .route("/orders/new", get(orders::new).post(orders::apply))
        .route("/orders/{id}", get(orders::show))
        .route("/orders/{id}/edit", get(orders::edit).post(orders::update))
        .route(
            "/orders/{id}/delete",
            get(delete::confirm::<Orders>).post(delete::delete::<Orders>),
        )
}
