//! Backend REST API gateway.
//!
//! One async method per backend endpoint. Every method returns
//! [`ApiResult`]: expected failures (transport errors, non-2xx responses,
//! `success: false` bodies) come back as an [`ApiFailure`] value, never as a
//! panic.
//!
//! # Response normalization
//!
//! 1. Transport error, or a 2xx body that is not the expected JSON:
//!    [`ApiFailure::network`].
//! 2. Non-2xx: the body's `error` (or the operation's fallback message), with
//!    the HTTP status and the body's `status`/`errorCode` kept.
//! 3. 2xx with `success: false`: the body's `error` unchanged.
//! 4. Otherwise the payload is decoded from the same JSON body.
//!
//! # Example
//!
//! ```rust,ignore
//! let backend = BackendClient::new(&config.backend);
//!
//! match backend.get_storefront_data().await {
//!     Ok(data) => render(data.storefront, data.bundles),
//!     Err(failure) => tracing::warn!(error = %failure, "Storefront unavailable"),
//! }
//! ```

mod customer;
mod storefront;
pub mod types;
mod wallet;

#[cfg(test)]
pub(crate) mod fixtures;

use std::sync::Arc;

use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use serde::ser::SerializeStruct;
use serde::{Serialize, Serializer};
use serde_json::Value;
use thiserror::Error;
use tracing::warn;

use crate::config::BackendConfig;

pub use types::*;

/// Message shown when the backend cannot be reached.
pub const NETWORK_ERROR_MESSAGE: &str = "Network error. Please try again.";

/// Error code attached to transport failures.
pub const NETWORK_ERROR_CODE: &str = "NETWORK_ERROR";

// =============================================================================
// ApiFailure
// =============================================================================

/// A failed backend call, normalized.
///
/// Serializes as `{"success": false, "error": ..., "errorCode"?: ..., "status"?: ...}`
/// so JSON endpoints can hand it straight back to the browser.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{error}")]
pub struct ApiFailure {
    /// Human-readable message, safe to show to the customer.
    pub error: String,
    /// Machine-readable code from the backend (or `NETWORK_ERROR`).
    pub error_code: Option<String>,
    /// Entity status reported alongside the failure (e.g. a payment status).
    pub status: Option<String>,
    /// HTTP status of the backend response; `None` for transport failures.
    pub http_status: Option<StatusCode>,
}

impl ApiFailure {
    /// Failure for an unreachable backend or an unreadable response.
    #[must_use]
    pub fn network() -> Self {
        Self {
            error: NETWORK_ERROR_MESSAGE.to_string(),
            error_code: Some(NETWORK_ERROR_CODE.to_string()),
            status: None,
            http_status: None,
        }
    }

    /// Whether this is a transport failure rather than a backend answer.
    #[must_use]
    pub fn is_network(&self) -> bool {
        self.http_status.is_none()
    }

    /// Whether the backend answered with a non-2xx status.
    #[must_use]
    pub fn is_http_error(&self) -> bool {
        self.http_status.is_some_and(|s| !s.is_success())
    }

    /// Build a failure from a backend error body.
    fn from_body(body: Option<&Value>, http_status: StatusCode, fallback: &str) -> Self {
        let field = |name: &str| {
            body.and_then(|b| b.get(name))
                .and_then(Value::as_str)
                .filter(|s| !s.is_empty())
                .map(str::to_string)
        };

        Self {
            error: field("error").unwrap_or_else(|| fallback.to_string()),
            error_code: field("errorCode"),
            status: field("status"),
            http_status: Some(http_status),
        }
    }
}

impl Serialize for ApiFailure {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let len = 2 + usize::from(self.error_code.is_some()) + usize::from(self.status.is_some());
        let mut state = serializer.serialize_struct("ApiFailure", len)?;
        state.serialize_field("success", &false)?;
        state.serialize_field("error", &self.error)?;
        if let Some(code) = &self.error_code {
            state.serialize_field("errorCode", code)?;
        }
        if let Some(status) = &self.status {
            state.serialize_field("status", status)?;
        }
        state.end()
    }
}

/// Result of a backend call.
pub type ApiResult<T> = Result<T, ApiFailure>;

// =============================================================================
// BackendClient
// =============================================================================

/// How a 2xx body with `success: false` is treated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Envelope {
    /// `success: false` is a failure.
    Checked,
    /// `success: false` is a normal answer; decode it like any other body.
    Passthrough,
}

/// Client for the backend REST API.
///
/// Cheap to clone; all clones share one connection pool.
#[derive(Clone)]
pub struct BackendClient {
    inner: Arc<BackendClientInner>,
}

struct BackendClientInner {
    client: reqwest::Client,
    api_url: String,
    storefront_slug: String,
}

impl BackendClient {
    /// Create a new backend client.
    #[must_use]
    pub fn new(config: &BackendConfig) -> Self {
        Self {
            inner: Arc::new(BackendClientInner {
                client: reqwest::Client::new(),
                api_url: config.api_url.trim_end_matches('/').to_string(),
                storefront_slug: config.storefront_slug.clone(),
            }),
        }
    }

    /// Slug of the storefront this client sells for.
    #[must_use]
    pub fn storefront_slug(&self) -> &str {
        &self.inner.storefront_slug
    }

    /// Absolute URL for a backend path.
    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.inner.api_url)
    }

    fn http(&self) -> &reqwest::Client {
        &self.inner.client
    }

    /// Send a request and normalize the response.
    async fn send<T: DeserializeOwned>(
        &self,
        request: reqwest::RequestBuilder,
        fallback: &str,
    ) -> ApiResult<T> {
        self.exchange(request, fallback, Envelope::Checked).await
    }

    /// Like [`Self::send`], but a 2xx `success: false` body is decoded
    /// instead of failing.
    async fn send_passthrough<T: DeserializeOwned>(
        &self,
        request: reqwest::RequestBuilder,
        fallback: &str,
    ) -> ApiResult<T> {
        self.exchange(request, fallback, Envelope::Passthrough)
            .await
    }

    async fn exchange<T: DeserializeOwned>(
        &self,
        request: reqwest::RequestBuilder,
        fallback: &str,
        envelope: Envelope,
    ) -> ApiResult<T> {
        let response = request.send().await.map_err(|e| {
            warn!(error = %e, "Backend request failed");
            ApiFailure::network()
        })?;

        let http_status = response.status();
        let body = response.bytes().await.map_err(|e| {
            warn!(error = %e, status = %http_status, "Failed to read backend response");
            ApiFailure::network()
        })?;
        let json: Option<Value> = serde_json::from_slice(&body).ok();

        if !http_status.is_success() {
            let failure = ApiFailure::from_body(json.as_ref(), http_status, fallback);
            warn!(
                status = %http_status,
                error = %failure.error,
                error_code = ?failure.error_code,
                "Backend returned non-success status"
            );
            return Err(failure);
        }

        let Some(json) = json else {
            warn!(
                status = %http_status,
                body = %String::from_utf8_lossy(&body).chars().take(200).collect::<String>(),
                "Backend returned a non-JSON body"
            );
            return Err(ApiFailure::network());
        };

        if envelope == Envelope::Checked && json.get("success").and_then(Value::as_bool) == Some(false)
        {
            let failure = ApiFailure::from_body(Some(&json), http_status, fallback);
            tracing::debug!(error = %failure.error, "Backend reported failure");
            return Err(failure);
        }

        serde_json::from_value(json).map_err(|e| {
            warn!(error = %e, "Backend response did not match the expected shape");
            ApiFailure::network()
        })
    }
}
