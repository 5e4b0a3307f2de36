//! Test doubles for the backend API.

use std::net::SocketAddr;

use axum::Router;
use serde_json::{Value, json};
use tokio::net::TcpListener;

use super::BackendClient;
use crate::config::BackendConfig;

/// An in-process backend serving a test router on an ephemeral port.
pub(crate) struct StubBackend {
    addr: SocketAddr,
}

impl StubBackend {
    /// Serve `router` on `127.0.0.1:0` until the test runtime shuts down.
    pub(crate) async fn serve(router: Router) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, router).await.unwrap();
        });
        Self { addr }
    }

    /// Backend configuration pointing at this stub with the `main` slug.
    pub(crate) fn config(&self) -> BackendConfig {
        BackendConfig {
            api_url: format!("http://{}", self.addr),
            storefront_slug: "main".to_string(),
        }
    }

    /// A client pointing at this stub.
    pub(crate) fn client(&self) -> BackendClient {
        BackendClient::new(&self.config())
    }
}

/// A client pointing at a port nothing listens on.
pub(crate) async fn unreachable_client() -> BackendClient {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    BackendClient::new(&BackendConfig {
        api_url: format!("http://{addr}"),
        storefront_slug: "main".to_string(),
    })
}

/// Backend JSON for a storefront bundle.
pub(crate) fn bundle_json(id: &str, display_order: i32, final_price: &str, visible: bool) -> Value {
    json!({
        "id": id,
        "bundleId": format!("b-{id}"),
        "storefrontId": "sf1",
        "markupType": "FIXED",
        "markupValue": "1.00",
        "isVisible": visible,
        "displayOrder": display_order,
        "customName": null,
        "bundleName": format!("Bundle {id}"),
        "bundleValue": "1",
        "bundleCapacity": "1GB",
        "bundleDuration": "30 days",
        "offerCode": "MTN-1GB",
        "offerName": "MTN",
        "basePrice": final_price,
        "finalPrice": final_price,
        "markupAmount": "0.00"
    })
}

/// Backend JSON for the storefront record.
pub(crate) fn storefront_json() -> Value {
    json!({
        "id": "sf1",
        "agentId": "agent1",
        "slug": "main",
        "businessName": "Volta Data",
        "description": "Cheap data, fast",
        "logoUrl": null,
        "bannerUrl": null,
        "primaryColor": "#0f766e",
        "secondaryColor": "#f59e0b",
        "phoneNumber": "0241234567",
        "whatsappNumber": null,
        "email": "hello@example.com",
        "socialLinks": {},
        "isActive": true,
        "isVerified": true
    })
}

/// Backend JSON for a customer profile.
pub(crate) fn customer_json() -> Value {
    json!({
        "id": "c1",
        "phoneNumber": "0241234567",
        "email": "ama@example.com",
        "firstName": "Ama",
        "lastName": "Mensah",
        "accountStatus": "ACTIVE",
        "tier": "CUSTOMER",
        "agentNumber": null,
        "walletBalance": "25.00"
    })
}
