//! Integration tests for the JSON checkout and wallet order endpoints.

#![allow(clippy::unwrap_used)]

use bundle_shop_integration_tests::{
    TestContext,
    backend::{self, BROKE_BENEFICIARY, PAID_REFERENCE, VALID_TOKEN},
};
use reqwest::{StatusCode, header::COOKIE};
use serde_json::{Value, json};

async fn body(resp: reqwest::Response) -> Value {
    resp.json().await.unwrap()
}

#[tokio::test]
async fn test_checkout_returns_hosted_payment() {
    let ctx = TestContext::start(backend::router()).await;
    let resp = ctx
        .post("/api/checkout")
        .json(&json!({ "storefrontBundleId": "sb-cheap", "beneficiaryPhone": "0241234567" }))
        .send()
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    let body = body(resp).await;
    assert_eq!(body["success"], true);
    assert_eq!(body["authorizationUrl"], "https://checkout.paystack.com/abc");
    assert_eq!(body["reference"], "ref-new");
    assert_eq!(body["orderId"], "o1");
}

#[tokio::test]
async fn test_checkout_validation() {
    let ctx = TestContext::start(backend::router()).await;
    let cases = [
        (json!({ "beneficiaryPhone": "0241234567" }), "Missing required fields"),
        (
            json!({ "storefrontBundleId": "sb-cheap", "beneficiaryPhone": "024123" }),
            "Invalid phone number format",
        ),
        (
            json!({
                "storefrontBundleId": "sb-cheap",
                "beneficiaryPhone": "0241234567",
                "customerPhone": "0141234567"
            }),
            "Invalid customer phone number format",
        ),
    ];

    for (request, error) in cases {
        let resp = ctx.post("/api/checkout").json(&request).send().await.unwrap();
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        let body = body(resp).await;
        assert_eq!(body["success"], false);
        assert_eq!(body["error"], error);
    }
}

#[tokio::test]
async fn test_checkout_backend_rejection_is_400() {
    let ctx = TestContext::start(backend::router()).await;
    let resp = ctx
        .post("/api/checkout")
        .json(&json!({ "storefrontBundleId": "sb-gone", "beneficiaryPhone": "0241234567" }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body(resp).await["error"], "Bundle not available");
}

#[tokio::test]
async fn test_verify_payment() {
    let ctx = TestContext::start(backend::router()).await;

    let resp = ctx
        .post("/api/checkout/verify")
        .json(&json!({ "reference": PAID_REFERENCE }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let paid = body(resp).await;
    assert_eq!(paid["status"], "SUCCESS");
    assert_eq!(paid["orderNumber"], "ORD-0001");

    let resp = ctx
        .post("/api/checkout/verify")
        .json(&json!({ "reference": "ref-unknown" }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    let missing = body(resp).await;
    assert_eq!(missing["error"], "Payment not found");
    assert_eq!(missing["status"], "FAILED");
}

#[tokio::test]
async fn test_verify_payment_without_backend() {
    let ctx = TestContext::without_backend().await;
    let resp = ctx
        .post("/api/checkout/verify")
        .json(&json!({ "reference": PAID_REFERENCE }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body(resp).await["error"], "Internal server error");
}

#[tokio::test]
async fn test_wallet_order_requires_session() {
    let ctx = TestContext::start(backend::router()).await;
    let resp = ctx
        .post("/api/order/wallet")
        .json(&json!({ "storefrontBundleId": "sb-cheap", "beneficiaryPhone": "0241234567" }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(body(resp).await["error"], "Not authenticated");
}

#[tokio::test]
async fn test_wallet_order_passes_backend_json_through() {
    let ctx = TestContext::start(backend::router()).await;
    let resp = ctx
        .post("/api/order/wallet")
        .header(COOKIE, format!("customer_token={VALID_TOKEN}"))
        .json(&json!({ "storefrontBundleId": "sb-cheap", "beneficiaryPhone": "0241234567" }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let order = body(resp).await;
    assert_eq!(order["orderId"], "o9");
    assert_eq!(order["paymentMethod"], "wallet");
    assert_eq!(order["newBalance"], "15.00");
}

#[tokio::test]
async fn test_wallet_order_mirrors_backend_status() {
    let ctx = TestContext::start(backend::router()).await;
    let resp = ctx
        .post("/api/order/wallet")
        .header(COOKIE, format!("customer_token={VALID_TOKEN}"))
        .json(&json!({ "storefrontBundleId": "sb-cheap", "beneficiaryPhone": BROKE_BENEFICIARY }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::PAYMENT_REQUIRED);
    let body = body(resp).await;
    assert_eq!(body["error"], "Insufficient wallet balance");
    assert_eq!(body["errorCode"], "INSUFFICIENT_BALANCE");
}

#[tokio::test]
async fn test_wallet_order_missing_fields() {
    let ctx = TestContext::start(backend::router()).await;
    let resp = ctx
        .post("/api/order/wallet")
        .header(COOKIE, format!("customer_token={VALID_TOKEN}"))
        .json(&json!({ "storefrontBundleId": "sb-cheap" }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body(resp).await["error"], "Missing required fields");
}
