//! User management through the admin.

#![allow(clippy::unwrap_used)]

use reqwest::{Method, StatusCode};
use serde_json::json;
use shopdesk_integration_tests::{MockBackend, TestApp, location};

#[tokio::test]
async fn test_user_list() {
    let backend = MockBackend::new();
    backend.seed_user("Hanako Sato", "hanako@example.com");
    backend.seed("users", json!({ "full_name": "Taro Yamada", "email": "taro@example.com", "is_active": false }));
    let app = TestApp::with_backend(backend).await;

    let page = app.page("/users").await;

    assert!(page.contains("Hanako Sato"));
    assert!(page.contains("hanako@example.com"));
    assert!(page.contains("Taro Yamada"));
    assert!(page.contains("Inactive"));
    assert!(page.contains("2024/05/01 09:00:00"));
}

#[tokio::test]
async fn test_user_list_failure_is_reported() {
    let backend = MockBackend::new();
    backend.fail(Method::GET, "users", 503, "Service unavailable");
    let app = TestApp::with_backend(backend).await;

    let page = app.page("/users").await;

    assert!(page.contains("Failed to load users. Please try again later."));
}

#[tokio::test]
async fn test_create_user() {
    let app = TestApp::spawn().await;

    let response = app
        .post_form(
            "/users",
            &[
                ("email", "jiro@example.com"),
                ("full_name", "Jiro Suzuki"),
                ("password", "correct horse"),
                ("is_active", "on"),
            ],
        )
        .await;

    assert_eq!(location(&response), "/users");
    let posts = app.backend.calls_to(&Method::POST, "users");
    assert_eq!(
        posts[0].body,
        Some(json!({
            "email": "jiro@example.com",
            "full_name": "Jiro Suzuki",
            "password": "correct horse",
            "is_active": true,
        }))
    );

    let page = app.page("/users").await;
    assert!(page.contains("User created."));
    assert!(page.contains("Jiro Suzuki"));
}

#[tokio::test]
async fn test_invalid_user_is_not_sent() {
    let app = TestApp::spawn().await;

    let response = app
        .post_form(
            "/users",
            &[("email", "jiro@"), ("full_name", "J"), ("password", "short")],
        )
        .await;

    assert_eq!(response.status(), StatusCode::OK);
    let page = response.text().await.unwrap();
    assert!(page.contains("Email is invalid"));
    assert!(page.contains("Full name must be at least 2 characters"));
    assert!(page.contains("Password must be at least 8 characters"));
    assert!(page.contains("value=\"J\""));
    assert!(app.backend.calls().is_empty());
}

#[tokio::test]
async fn test_backend_rejection_shows_detail() {
    let backend = MockBackend::new();
    backend.fail(Method::POST, "users", 400, "Email already registered");
    let app = TestApp::with_backend(backend).await;

    let response = app
        .post_form(
            "/users",
            &[
                ("email", "hanako@example.com"),
                ("full_name", "Hanako Sato"),
                ("password", "password123"),
            ],
        )
        .await;

    let page = response.text().await.unwrap();
    assert!(page.contains("Email already registered"));
}

#[tokio::test]
async fn test_edit_sends_only_changed_fields() {
    let backend = MockBackend::new();
    let id = backend.seed_user("Hanako Sato", "hanako@example.com");
    let app = TestApp::with_backend(backend).await;

    let page = app.page(&format!("/users/{id}/edit")).await;
    assert!(page.contains("value=\"Hanako Sato\""));

    let response = app
        .post_form(
            &format!("/users/{id}/edit"),
            &[
                ("email", "hanako@example.com"),
                ("full_name", "Hanako Yamada"),
                ("password", ""),
                ("is_active", "on"),
                ("original_email", "hanako@example.com"),
                ("original_full_name", "Hanako Sato"),
                ("original_is_active", "true"),
            ],
        )
        .await;

    assert_eq!(location(&response), "/users");
    let puts = app.backend.calls_to(&Method::PUT, "users");
    assert_eq!(puts.len(), 1);
    assert_eq!(puts[0].body, Some(json!({ "full_name": "Hanako Yamada" })));
    assert_eq!(
        app.backend.record("users", &id).unwrap()["full_name"],
        "Hanako Yamada"
    );
}

#[tokio::test]
async fn test_edit_without_changes_sends_nothing() {
    let backend = MockBackend::new();
    let id = backend.seed_user("Hanako Sato", "hanako@example.com");
    let app = TestApp::with_backend(backend).await;

    let response = app
        .post_form(
            &format!("/users/{id}/edit"),
            &[
                ("email", "hanako@example.com"),
                ("full_name", "Hanako Sato"),
                ("is_active", "on"),
                ("original_email", "hanako@example.com"),
                ("original_full_name", "Hanako Sato"),
                ("original_is_active", "true"),
            ],
        )
        .await;

    assert_eq!(location(&response), "/users");
    assert!(app.backend.calls_to(&Method::PUT, "users").is_empty());
}

#[tokio::test]
async fn test_user_detail_lists_their_orders() {
    let backend = MockBackend::new();
    let hanako = backend.seed_user("Hanako Sato", "hanako@example.com");
    let taro = backend.seed_user("Taro Yamada", "taro@example.com");
    let mine = backend.seed(
        "orders",
        json!({ "user_id": hanako, "status": "delivered", "total_amount": 4200.0, "items": [] }),
    );
    let theirs = backend.seed(
        "orders",
        json!({ "user_id": taro, "status": "pending", "total_amount": 100.0, "items": [] }),
    );
    let app = TestApp::with_backend(backend).await;

    let page = app.page(&format!("/users/{hanako}")).await;

    assert!(page.contains("Hanako Sato"));
    assert!(page.contains(&mine));
    assert!(!page.contains(&theirs));
    assert!(page.contains("¥4,200"));
    assert!(page.contains("Delivered"));
}

#[tokio::test]
async fn test_user_detail_survives_order_failure() {
    let backend = MockBackend::new();
    let id = backend.seed_user("Hanako Sato", "hanako@example.com");
    backend.fail(Method::GET, "orders", 500, "boom");
    let app = TestApp::with_backend(backend).await;

    let page = app.page(&format!("/users/{id}")).await;

    assert!(page.contains("Hanako Sato"));
    assert!(page.contains("Failed to load orders. Please try again later."));
}
