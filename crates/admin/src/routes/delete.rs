//! Delete confirmation and delete handlers, shared by every resource.
//!
//! Deleting is a two-step interaction. `GET /{collection}/{id}/delete`
//! renders a confirmation page and makes no backend call. `POST` to the same
//! path deletes only when the form carries `confirm=yes`; anything else
//! returns the operator to where they came from untouched.
//!
//! List rows post directly from HTMX after the browser's own confirm
//! dialog. Those requests get an empty body on success so the row can be
//! swapped out in place.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::{Path, Query, State},
    http::{HeaderMap, HeaderValue, StatusCode},
    response::{Html, IntoResponse, Redirect, Response},
};
use serde::Deserialize;
use tower_sessions::Session;
use tracing::instrument;

use crate::filters;
use crate::models::Flash;
use crate::models::session::{push_flash, take_flashes};
use crate::resource::Resource;
use crate::state::AppState;

/// Value of the `confirm` field that authorizes a delete.
pub const CONFIRM_YES: &str = "yes";

/// Query parameters for the confirmation page.
#[derive(Debug, Deserialize)]
pub struct ConfirmQuery {
    pub return_to: Option<String>,
}

/// Delete form input.
#[derive(Debug, Deserialize)]
pub struct DeleteForm {
    pub confirm: Option<String>,
    pub return_to: Option<String>,
}

/// Delete confirmation page template.
#[derive(Template, WebTemplate)]
#[template(path = "delete/confirm.html")]
pub struct ConfirmDeleteTemplate {
    pub current_path: String,
    pub flashes: Vec<Flash>,
    pub singular: &'static str,
    pub record_id: String,
    pub action: String,
    pub return_to: String,
}

/// Whether the request was issued by HTMX.
pub(crate) fn is_htmx(headers: &HeaderMap) -> bool {
    headers
        .get("HX-Request")
        .is_some_and(|value| value.as_bytes().eq_ignore_ascii_case(b"true"))
}

/// Accept only local absolute paths as return targets.
pub(crate) fn safe_return_to(candidate: Option<&str>) -> Option<String> {
    candidate
        .map(str::trim)
        .filter(|path| path.starts_with('/') && !path.starts_with("//") && !path.contains('\\'))
        .map(str::to_string)
}

/// Delete confirmation page handler.
#[instrument(skip(session), fields(collection = R::COLLECTION))]
pub async fn confirm<R: Resource>(
    session: Session,
    Path(id): Path<R::Id>,
    Query(query): Query<ConfirmQuery>,
) -> ConfirmDeleteTemplate {
    ConfirmDeleteTemplate {
        current_path: R::list_path(),
        flashes: take_flashes(&session).await,
        singular: R::SINGULAR,
        record_id: id.to_string(),
        action: format!("{}/delete", R::detail_path(id)),
        return_to: safe_return_to(query.return_to.as_deref())
            .unwrap_or_else(|| R::detail_path(id)),
    }
}

/// Delete handler.
#[instrument(skip(state, session, headers, form), fields(collection = R::COLLECTION))]
pub async fn delete<R: Resource>(
    State(state): State<AppState>,
    session: Session,
    headers: HeaderMap,
    Path(id): Path<R::Id>,
    Form(form): Form<DeleteForm>,
) -> Response {
    let return_to =
        safe_return_to(form.return_to.as_deref()).unwrap_or_else(R::list_path);

    if form.confirm.as_deref() != Some(CONFIRM_YES) {
        tracing::debug!(%id, "Delete not confirmed");
        return Redirect::to(&return_to).into_response();
    }

    match state.backend().delete::<R>(id).await {
        Ok(()) => {
            tracing::info!(%id, "Deleted {}", R::SINGULAR);
            if is_htmx(&headers) {
                return (StatusCode::OK, Html(String::new())).into_response();
            }
            Redirect::to(&R::list_path()).into_response()
        }
        Err(e) => {
            tracing::error!(%id, "Failed to delete {}: {e}", R::SINGULAR);
            push_flash(&session, Flash::error(R::delete_failed_message())).await;
            if is_htmx(&headers) {
                // Reload where the operator was so the flash is shown
                let mut response = StatusCode::OK.into_response();
                if let Ok(location) = HeaderValue::from_str(&return_to) {
                    response.headers_mut().insert("HX-Redirect", location);
                }
                return response;
            }
            Redirect::to(&return_to).into_response()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_safe_return_to() {
        assert_eq!(safe_return_to(Some("/orders")).as_deref(), Some("/orders"));
        assert_eq!(
            safe_return_to(Some("/orders?user_id=1")).as_deref(),
            Some("/orders?user_id=1")
        );
        assert_eq!(safe_return_to(Some("//evil.example")), None);
        assert_eq!(safe_return_to(Some("https://evil.example")), None);
        assert_eq!(safe_return_to(Some("/\\evil.example")), None);
        assert_eq!(safe_return_to(None), None);
    }

    #[test]
    fn test_is_htmx() {
        let mut headers = HeaderMap::new();
        assert!(!is_htmx(&headers));
        headers.insert("HX-Request", HeaderValue::from_static("true"));
        assert!(is_htmx(&headers));
    }
}
