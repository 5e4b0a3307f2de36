//! Stub of the backend REST API.
//!
//! One known customer (`0241234567` / `secret1`) whose bearer token is
//! [`VALID_TOKEN`], one paid payment reference ([`PAID_REFERENCE`]) and a
//! storefront with four bundles, one of them hidden.

use std::collections::HashMap;

use axum::{
    Json, Router,
    extract::{Path, Query},
    http::{HeaderMap, StatusCode, header::AUTHORIZATION},
    response::{IntoResponse, Response},
    routing::{get, post},
};
use serde_json::{Value, json};

/// Storefront slug the stub serves.
pub const SLUG: &str = "main";

/// Phone number of the known customer.
pub const CUSTOMER_PHONE: &str = "0241234567";

/// Password of the known customer.
pub const CUSTOMER_PASSWORD: &str = "secret1";

/// Bearer token accepted by the stub.
pub const VALID_TOKEN: &str = "tok-valid";

/// Payment reference the stub reports as paid.
pub const PAID_REFERENCE: &str = "ref-paid";

/// Beneficiary for which wallet orders fail with 402.
pub const BROKE_BENEFICIARY: &str = "0200000000";

/// Build the stub backend router.
pub fn router() -> Router {
    Router::new()
        .route("/api/v1/storefront/orders", get(lookup_orders))
        .route(
            "/api/v1/storefront/payment/verify",
            get(payment_status).post(verify_payment),
        )
        .route("/api/v1/storefront/{slug}", get(storefront))
        .route("/api/v1/storefront/{slug}/order/initialize", post(initialize))
        .route("/api/v1/customer/login", post(login))
        .route("/api/v1/customer/me", get(profile))
        .route("/api/v1/customer/orders", get(customer_orders))
        .route("/api/v1/customer/logout", post(logout))
        .route("/api/v1/customer/order/bundle", post(wallet_order))
}

fn rejected(status: StatusCode, error: &str) -> Response {
    (status, Json(json!({ "success": false, "error": error }))).into_response()
}

fn authorized(headers: &HeaderMap) -> bool {
    headers
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .is_some_and(|value| value == format!("Bearer {VALID_TOKEN}"))
}

/// Backend JSON for a storefront bundle.
#[must_use]
pub fn bundle(id: &str, name: &str, display_order: i32, final_price: &str, visible: bool) -> Value {
    json!({
        "id": id,
        "bundleId": format!("b-{id}"),
        "storefrontId": "sf1",
        "markupType": "FIXED",
        "markupValue": "1.00",
        "isVisible": visible,
        "displayOrder": display_order,
        "customName": null,
        "bundleName": name,
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

fn customer() -> Value {
    json!({
        "id": "c1",
        "phoneNumber": CUSTOMER_PHONE,
        "email": "ama@example.com",
        "firstName": "Ama",
        "lastName": "Mensah",
        "tier": "CUSTOMER",
        "walletBalance": "25.00"
    })
}

async fn storefront(Path(slug): Path<String>) -> Response {
    if slug != SLUG {
        return rejected(StatusCode::NOT_FOUND, "Storefront not found");
    }
    Json(json!({
        "success": true,
        "storefront": {
            "id": "sf1",
            "agentId": "agent1",
            "slug": SLUG,
            "businessName": "Volta Data",
            "primaryColor": "#0f766e",
            "secondaryColor": "#f59e0b",
            "isActive": true,
            "isVerified": true
        },
        "bundles": [
            bundle("sb-late", "Late Bundle", 2, "5.00", true),
            bundle("sb-dear", "Dear Bundle", 1, "20.00", true),
            bundle("sb-cheap", "Cheap Bundle", 1, "10.00", true),
            bundle("sb-hidden", "Hidden Bundle", 0, "1.00", false),
        ]
    }))
    .into_response()
}

async fn initialize(Json(body): Json<Value>) -> Response {
    if body["storefrontBundleId"] == "sb-gone" {
        return rejected(StatusCode::NOT_FOUND, "Bundle not available");
    }
    Json(json!({
        "success": true,
        "authorizationUrl": "https://checkout.paystack.com/abc",
        "accessCode": "abc",
        "reference": "ref-new",
        "orderId": "o1",
        "customerPhone": body["customerPhone"],
    }))
    .into_response()
}

async fn verify_payment(Json(body): Json<Value>) -> Response {
    if body["reference"] == PAID_REFERENCE {
        return Json(json!({
            "success": true,
            "status": "SUCCESS",
            "orderId": "o1",
            "orderNumber": "ORD-0001"
        }))
        .into_response();
    }
    (
        StatusCode::NOT_FOUND,
        Json(json!({ "success": false, "error": "Payment not found", "status": "FAILED" })),
    )
        .into_response()
}

async fn payment_status(Query(query): Query<HashMap<String, String>>) -> Response {
    if query.get("reference").map(String::as_str) == Some(PAID_REFERENCE) {
        return Json(json!({
            "success": true,
            "status": "SUCCESS",
            "message": "Payment successful!",
            "order": {
                "id": "o1",
                "reference": PAID_REFERENCE,
                "bundleName": "Cheap Bundle",
                "bundleCapacity": "1GB",
                "beneficiaryPhone": CUSTOMER_PHONE,
                "totalPrice": "10.00",
                "paymentStatus": "SUCCESS",
                "createdAt": "2026-01-15T10:30:00Z"
            }
        }))
        .into_response();
    }
    Json(json!({ "success": false, "status": "PENDING", "message": "Payment is still processing" }))
        .into_response()
}

async fn lookup_orders(Query(query): Query<HashMap<String, String>>) -> Response {
    let orders = if query.get("phone").map(String::as_str) == Some(CUSTOMER_PHONE) {
        vec![json!({
            "id": "o1",
            "reference": PAID_REFERENCE,
            "bundleName": "Cheap Bundle",
            "bundleCapacity": "1GB",
            "beneficiaryPhone": CUSTOMER_PHONE,
            "totalPrice": "10.00",
            "paymentStatus": "SUCCESS",
            "orderStatus": "DELIVERED",
            "offerName": "MTN",
            "offerProvider": "MTN",
            "storefrontName": "Volta Data",
            "createdAt": "2026-01-15T10:30:00Z"
        })]
    } else {
        Vec::new()
    };
    Json(json!({ "success": true, "orders": orders })).into_response()
}

async fn login(Json(body): Json<Value>) -> Response {
    if body["phoneNumber"] == CUSTOMER_PHONE && body["password"] == CUSTOMER_PASSWORD {
        return Json(json!({ "success": true, "token": VALID_TOKEN, "customer": customer() }))
            .into_response();
    }
    rejected(StatusCode::UNAUTHORIZED, "Invalid phone number or password")
}

async fn profile(headers: HeaderMap) -> Response {
    if !authorized(&headers) {
        return rejected(StatusCode::UNAUTHORIZED, "Invalid or expired token");
    }
    Json(json!({ "success": true, "customer": customer() })).into_response()
}

async fn customer_orders(headers: HeaderMap) -> Response {
    if !authorized(&headers) {
        return rejected(StatusCode::UNAUTHORIZED, "Invalid or expired token");
    }
    Json(json!({
        "success": true,
        "orders": [{
            "id": "o7",
            "orderNumber": "ORD-0007",
            "status": "COMPLETED",
            "bundleValue": "1GB",
            "bundleName": "Cheap Bundle",
            "beneficiaryPhone": CUSTOMER_PHONE,
            "amount": "10.00",
            "paymentMethod": "wallet",
            "createdAt": 1_768_473_000_000_i64
        }],
        "pagination": { "page": 1, "limit": 20, "totalCount": 1, "totalPages": 1, "hasMore": false }
    }))
    .into_response()
}

async fn logout() -> Response {
    Json(json!({ "success": true })).into_response()
}

async fn wallet_order(headers: HeaderMap, Json(body): Json<Value>) -> Response {
    if !authorized(&headers) {
        return rejected(StatusCode::UNAUTHORIZED, "Invalid or expired token");
    }
    if body["beneficiaryPhone"] == BROKE_BENEFICIARY {
        return (
            StatusCode::PAYMENT_REQUIRED,
            Json(json!({
                "success": false,
                "error": "Insufficient wallet balance",
                "errorCode": "INSUFFICIENT_BALANCE"
            })),
        )
            .into_response();
    }
    Json(json!({
        "success": true,
        "message": "Order placed",
        "orderId": "o9",
        "paymentMethod": body["paymentMethod"],
        "newBalance": "15.00"
    }))
    .into_response()
}
