//! REST backend client.
//!
//! Every entity is a collection under the configured base URL:
//!
//! - `GET    {base}/{collection}` - list
//! - `GET    {base}/{collection}/{id}` - fetch one
//! - `POST   {base}/{collection}` - create
//! - `PUT    {base}/{collection}/{id}` - update
//! - `DELETE {base}/{collection}/{id}` - delete
//!
//! Calls are generic over [`Resource`]. Errors carry the server's `detail`
//! message when one is present so views can show it verbatim.

mod error;

pub use error::BackendError;

use std::sync::Arc;

use reqwest::StatusCode;
use reqwest::header::{CONTENT_TYPE, HeaderMap, HeaderValue};
use serde::de::DeserializeOwned;
use shopdesk_core::{Order, UserId};
use url::Url;

use crate::resource::{Orders, Resource};

/// REST backend client.
///
/// Cheap to clone; all clones share one connection pool.
#[derive(Clone)]
pub struct BackendClient {
    inner: Arc<BackendClientInner>,
}

struct BackendClientInner {
    client: reqwest::Client,
    base_url: Url,
}

impl BackendClient {
    /// Create a client for the backend at `base_url`.
    ///
    /// # Errors
    ///
    /// Returns an error if the base URL cannot carry path segments or the
    /// HTTP client fails to build.
    pub fn new(base_url: Url) -> Result<Self, BackendError> {
        if base_url.cannot_be_a_base() {
            return Err(BackendError::InvalidUrl(base_url.to_string()));
        }

        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .build()?;

        Ok(Self {
            inner: Arc::new(BackendClientInner { client, base_url }),
        })
    }

    /// The configured base URL.
    #[must_use]
    pub fn base_url(&self) -> &Url {
        &self.inner.base_url
    }

    /// List every record of a collection.
    ///
    /// # Errors
    ///
    /// Returns an error on transport failure, a non-success status, or an
    /// unparseable body.
    #[tracing::instrument(skip(self), fields(collection = R::COLLECTION))]
    pub async fn list<R: Resource>(&self) -> Result<Vec<R::Record>, BackendError> {
        let url = self.url(&[R::COLLECTION])?;
        let response = self.inner.client.get(url).send().await?;
        handle_response(response).await
    }

    /// Fetch one record.
    ///
    /// # Errors
    ///
    /// Returns [`BackendError::NotFound`] when the backend answers 404, and
    /// other variants as for [`Self::list`].
    #[tracing::instrument(skip(self), fields(collection = R::COLLECTION))]
    pub async fn fetch<R: Resource>(&self, id: R::Id) -> Result<R::Record, BackendError> {
        let url = self.url(&[R::COLLECTION, &id.to_string()])?;
        let response = self.inner.client.get(url).send().await?;
        handle_response(response).await
    }

    /// Create a record and return what the backend stored.
    ///
    /// # Errors
    ///
    /// Returns [`BackendError::Api`] with the server detail when the backend
    /// rejects the payload.
    #[tracing::instrument(skip(self, payload), fields(collection = R::COLLECTION))]
    pub async fn create<R: Resource>(&self, payload: &R::Create) -> Result<R::Record, BackendError> {
        let url = self.url(&[R::COLLECTION])?;
        let response = self.inner.client.post(url).json(payload).send().await?;
        handle_response(response).await
    }

    /// Replace the fields carried by `payload`.
    ///
    /// # Errors
    ///
    /// As for [`Self::create`].
    #[tracing::instrument(skip(self, payload), fields(collection = R::COLLECTION))]
    pub async fn update<R: Resource>(
        &self,
        id: R::Id,
        payload: &R::Update,
    ) -> Result<R::Record, BackendError> {
        let url = self.url(&[R::COLLECTION, &id.to_string()])?;
        let response = self.inner.client.put(url).json(payload).send().await?;
        handle_response(response).await
    }

    /// Delete a record. The response body, if any, is ignored.
    ///
    /// # Errors
    ///
    /// As for [`Self::fetch`].
    #[tracing::instrument(skip(self), fields(collection = R::COLLECTION))]
    pub async fn delete<R: Resource>(&self, id: R::Id) -> Result<(), BackendError> {
        let url = self.url(&[R::COLLECTION, &id.to_string()])?;
        let response = self.inner.client.delete(url).send().await?;

        if response.status().is_success() {
            return Ok(());
        }

        Err(parse_error(response).await)
    }

    /// List the orders placed by one user (`GET /orders?user_id=`).
    ///
    /// # Errors
    ///
    /// As for [`Self::list`].
    #[tracing::instrument(skip(self))]
    pub async fn list_orders_for_user(&self, user_id: UserId) -> Result<Vec<Order>, BackendError> {
        let mut url = self.url(&[Orders::COLLECTION])?;
        url.query_pairs_mut()
            .append_pair("user_id", &user_id.to_string());
        let response = self.inner.client.get(url).send().await?;
        handle_response(response).await
    }

    /// Probe `GET {base}/health`.
    ///
    /// # Errors
    ///
    /// Returns an error when the backend is unreachable or unhealthy.
    pub async fn health(&self) -> Result<(), BackendError> {
        let url = self.url(&["health"])?;
        let response = self.inner.client.get(url).send().await?;

        if response.status().is_success() {
            return Ok(());
        }

        Err(parse_error(response).await)
    }

    /// Join path segments onto the base URL, percent-encoding each one.
    fn url(&self, segments: &[&str]) -> Result<Url, BackendError> {
        let mut url = self.inner.base_url.clone();
        url.path_segments_mut()
            .map_err(|()| BackendError::InvalidUrl(self.inner.base_url.to_string()))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }
}

/// Handle API response and parse JSON.
async fn handle_response<T: DeserializeOwned>(
    response: reqwest::Response,
) -> Result<T, BackendError> {
    if response.status().is_success() {
        return response
            .json()
            .await
            .map_err(|e| BackendError::Parse(format!("Failed to parse response: {e}")));
    }

    Err(parse_error(response).await)
}

/// Turn an error response into a [`BackendError`], keeping the server detail.
async fn parse_error(response: reqwest::Response) -> BackendError {
    let status = response.status();
    let body = response.text().await.unwrap_or_default();
    let detail = error::extract_detail(&body).unwrap_or_default();

    tracing::warn!(status = status.as_u16(), detail = %detail, "Backend returned an error");

    if status == StatusCode::NOT_FOUND {
        return BackendError::NotFound(detail);
    }

    BackendError::Api {
        status: status.as_u16(),
        detail,
    }
}

impl std::fmt::Debug for BackendClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BackendClient")
            .field("base_url", &self.inner.base_url.as_str())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use shopdesk_core::Uuid;

    use super::*;
    use crate::resource::Users;

    fn client(base: &str) -> BackendClient {
        BackendClient::new(Url::parse(base).unwrap()).unwrap()
    }

    #[test]
    fn test_url_joins_segments() {
        let client = client("http://localhost:8000/api/v1");
        assert_eq!(
            client.url(&[Users::COLLECTION]).unwrap().as_str(),
            "http://localhost:8000/api/v1/users"
        );
    }

    #[test]
    fn test_url_tolerates_trailing_slash() {
        let client = client("http://localhost:8000/api/v1/");
        let id = UserId::new(Uuid::nil());
        assert_eq!(
            client.url(&["users", &id.to_string()]).unwrap().as_str(),
            "http://localhost:8000/api/v1/users/00000000-0000-0000-0000-000000000000"
        );
    }

    #[test]
    fn test_url_encodes_segments() {
        let client = client("http://localhost:8000");
        assert_eq!(
            client.url(&["items", "a/b"]).unwrap().as_str(),
            "http://localhost:8000/items/a%2Fb"
        );
    }

    #[test]
    fn test_rejects_non_base_url() {
        let err = BackendClient::new(Url::parse("mailto:ops@example.com").unwrap()).unwrap_err();
        assert!(matches!(err, BackendError::InvalidUrl(_)));
    }

    #[test]
    fn test_debug_shows_base_url() {
        let client = client("http://localhost:8000/api/v1");
        assert!(format!("{client:?}").contains("localhost:8000/api/v1"));
    }
}
