//! Integration tests for Bundle Shop.
//!
//! Each test starts an in-process stub of the backend REST API and the real
//! storefront router, both on ephemeral ports, then drives the storefront
//! over HTTP with `reqwest`.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p bundle-shop-integration-tests
//! ```
//!
//! # Example
//!
//! ```rust,ignore
//! let ctx = TestContext::start(backend::router()).await;
//! let resp = ctx.get("/health").send().await.unwrap();
//! assert_eq!(resp.status(), 200);
//! ```

#![allow(clippy::unwrap_used, clippy::missing_panics_doc)]

pub mod backend;

use std::net::SocketAddr;

use axum::Router;
use bundle_shop_storefront::{app, config::StorefrontConfig, state::AppState};
use reqwest::{Client, RequestBuilder, redirect};
use tokio::net::TcpListener;

/// Serve `router` on `127.0.0.1:0` and return the bound address.
pub async fn serve(router: Router) -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    addr
}

/// A running storefront wired to a stub backend.
pub struct TestContext {
    /// Client that does not follow redirects, so tests can assert on them.
    pub client: Client,
    pub storefront_url: String,
    pub backend_url: String,
}

impl TestContext {
    /// Start `backend` and a storefront pointing at it.
    pub async fn start(backend: Router) -> Self {
        let backend_url = format!("http://{}", serve(backend).await);
        Self::with_backend_url(backend_url).await
    }

    /// Start a storefront whose backend cannot be reached.
    pub async fn without_backend() -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);
        Self::with_backend_url(format!("http://{addr}")).await
    }

    async fn with_backend_url(backend_url: String) -> Self {
        let api_url = backend_url.clone();
        let config = StorefrontConfig::from_lookup(|key| match key {
            "API_URL" => Some(api_url.clone()),
            "STOREFRONT_SLUG" => Some(backend::SLUG.to_string()),
            "PAYSTACK_PUBLIC_KEY" => Some("pk_test_123".to_string()),
            _ => None,
        })
        .unwrap();

        let storefront_url = format!("http://{}", serve(app(AppState::new(config))).await);
        let client = Client::builder()
            .redirect(redirect::Policy::none())
            .build()
            .unwrap();

        Self {
            client,
            storefront_url,
            backend_url,
        }
    }

    /// Absolute storefront URL for `path`.
    #[must_use]
    pub fn url(&self, path: &str) -> String {
        format!("{}{path}", self.storefront_url)
    }

    /// GET a storefront path.
    #[must_use]
    pub fn get(&self, path: &str) -> RequestBuilder {
        self.client.get(self.url(path))
    }

    /// POST to a storefront path.
    #[must_use]
    pub fn post(&self, path: &str) -> RequestBuilder {
        self.client.post(self.url(path))
    }
}

/// All `Set-Cookie` values on a response.
#[must_use]
pub fn set_cookies(response: &reqwest::Response) -> Vec<String> {
    response
        .headers()
        .get_all(reqwest::header::SET_COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .map(String::from)
        .collect()
}

/// The `Location` header of a redirect.
#[must_use]
pub fn location(response: &reqwest::Response) -> Option<String> {
    response
        .headers()
        .get(reqwest::header::LOCATION)
        .and_then(|value| value.to_str().ok())
        .map(String::from)
}
