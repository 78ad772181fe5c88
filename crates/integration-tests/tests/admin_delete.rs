//! Two-step deletes through the admin.

#![allow(clippy::unwrap_used)]

use reqwest::{Method, StatusCode};
use serde_json::json;
use shopdesk_integration_tests::{MockBackend, TestApp, location};

/// Seed a user with three orders and return the order ids.
fn seed_orders(backend: &MockBackend) -> Vec<String> {
    let user = backend.seed_user("Hanako Sato", "hanako@example.com");
    [1000.0, 2500.0, 400.0]
        .into_iter()
        .map(|total| {
            backend.seed(
                "orders",
                json!({ "user_id": user, "status": "pending", "total_amount": total, "items": [] }),
            )
        })
        .collect()
}

#[tokio::test]
async fn test_confirmation_page_makes_no_backend_call() {
    let backend = MockBackend::new();
    let id = backend.seed_item("Matcha", 1000.0, 1);
    let app = TestApp::with_backend(backend).await;

    let page = app.page(&format!("/items/{id}/delete")).await;

    assert!(page.contains("Delete item"));
    assert!(page.contains(&format!("action=\"/items/{id}/delete\"")));
    assert!(app.backend.calls().is_empty());
}

#[tokio::test]
async fn test_declined_delete_leaves_record() {
    let backend = MockBackend::new();
    let id = backend.seed_item("Matcha", 1000.0, 1);
    let app = TestApp::with_backend(backend).await;

    let response = app
        .post_form(
            &format!("/items/{id}/delete"),
            &[("confirm", "no"), ("return_to", format!("/items/{id}").as_str())],
        )
        .await;

    assert_eq!(location(&response), format!("/items/{id}"));
    assert!(app.backend.calls().is_empty());
    assert!(app.backend.record("items", &id).is_some());
}

#[tokio::test]
async fn test_confirmed_delete_removes_record() {
    let backend = MockBackend::new();
    let id = backend.seed_user("Hanako Sato", "hanako@example.com");
    let app = TestApp::with_backend(backend).await;

    let response = app
        .post_form(&format!("/users/{id}/delete"), &[("confirm", "yes")])
        .await;

    assert_eq!(location(&response), "/users");
    let deletes = app.backend.calls_to(&Method::DELETE, "users");
    assert_eq!(deletes.len(), 1);
    assert_eq!(deletes[0].path, format!("/users/{id}"));
    assert!(app.backend.records("users").is_empty());
}

#[tokio::test]
async fn test_htmx_delete_returns_empty_row() {
    let backend = MockBackend::new();
    let id = backend.seed_item("Matcha", 1000.0, 1);
    let app = TestApp::with_backend(backend).await;

    let response = app
        .post_htmx(
            &format!("/items/{id}/delete"),
            &[("confirm", "yes"), ("return_to", "/items")],
        )
        .await;

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.text().await.unwrap(), "");
    assert!(app.backend.records("items").is_empty());
}

#[tokio::test]
async fn test_failed_delete_flashes_error() {
    let backend = MockBackend::new();
    let id = backend.seed_item("Matcha", 1000.0, 1);
    backend.fail(Method::DELETE, "items", 409, "Item is referenced by orders");
    let app = TestApp::with_backend(backend).await;

    let response = app
        .post_form(
            &format!("/items/{id}/delete"),
            &[("confirm", "yes"), ("return_to", "/items")],
        )
        .await;

    assert_eq!(location(&response), "/items");
    let page = app.page("/items").await;
    assert!(page.contains("Failed to delete item. Please try again."));
    assert!(page.contains("Matcha"));
}

#[tokio::test]
async fn test_offsite_return_target_is_ignored() {
    let backend = MockBackend::new();
    let id = backend.seed_item("Matcha", 1000.0, 1);
    let app = TestApp::with_backend(backend).await;

    let response = app
        .post_form(
            &format!("/items/{id}/delete"),
            &[("confirm", "no"), ("return_to", "https://evil.example")],
        )
        .await;

    assert_eq!(location(&response), "/items");
}

#[tokio::test]
async fn test_confirmed_order_delete_removes_only_that_order() {
    let backend = MockBackend::new();
    let ids = seed_orders(&backend);
    let app = TestApp::with_backend(backend).await;

    let page = app.page("/orders").await;
    assert!(ids.iter().all(|id| page.contains(id.as_str())));

    let response = app
        .post_htmx(
            &format!("/orders/{}/delete", ids[1]),
            &[("confirm", "yes"), ("return_to", "/orders")],
        )
        .await;

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.text().await.unwrap(), "");
    let deletes = app.backend.calls_to(&Method::DELETE, "orders");
    assert_eq!(deletes.len(), 1);
    assert_eq!(deletes[0].path, format!("/orders/{}", ids[1]));

    let page = app.page("/orders").await;
    assert!(!page.contains(ids[1].as_str()));
    assert!(page.contains(ids[0].as_str()));
    assert!(page.contains(ids[2].as_str()));
    assert_eq!(app.backend.records("orders").len(), 2);
}

#[tokio::test]
async fn test_declined_order_delete_changes_nothing() {
    let backend = MockBackend::new();
    let ids = seed_orders(&backend);
    let app = TestApp::with_backend(backend).await;

    let response = app
        .post_form(
            &format!("/orders/{}/delete", ids[0]),
            &[("confirm", "no"), ("return_to", "/orders")],
        )
        .await;

    assert_eq!(location(&response), "/orders");
    assert!(app.backend.calls().is_empty());

    let page = app.page("/orders").await;
    assert!(ids.iter().all(|id| page.contains(id.as_str())));
    assert_eq!(app.backend.records("orders").len(), 3);
}
