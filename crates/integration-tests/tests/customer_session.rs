//! Integration tests for the customer session cookie and dashboard.

#![allow(clippy::unwrap_used)]

use bundle_shop_integration_tests::{
    TestContext,
    backend::{self, CUSTOMER_PASSWORD, CUSTOMER_PHONE, VALID_TOKEN},
    location, set_cookies,
};
use reqwest::{StatusCode, header::COOKIE};

fn session(token: &str) -> String {
    format!("customer_token={token}")
}

#[tokio::test]
async fn test_dashboard_without_cookie_redirects_to_login() {
    let ctx = TestContext::start(backend::router()).await;
    let resp = ctx.get("/dashboard").send().await.unwrap();
    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&resp).unwrap(), "/login");
    assert!(set_cookies(&resp).is_empty());
}

#[tokio::test]
async fn test_rejected_cookie_is_cleared() {
    let ctx = TestContext::start(backend::router()).await;
    let resp = ctx
        .get("/dashboard")
        .header(COOKIE, session("tok-expired"))
        .send()
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&resp).unwrap(), "/login");

    let cookies = set_cookies(&resp);
    assert_eq!(cookies.len(), 1);
    assert!(cookies[0].starts_with("customer_token=;"));
    assert!(cookies[0].contains("Max-Age=0"));
}

#[tokio::test]
async fn test_login_sets_cookie_and_opens_dashboard() {
    let ctx = TestContext::start(backend::router()).await;
    let resp = ctx
        .post("/login")
        .form(&[("phoneNumber", CUSTOMER_PHONE), ("password", CUSTOMER_PASSWORD)])
        .send()
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&resp).unwrap(), "/dashboard");

    let cookies = set_cookies(&resp);
    let cookie = cookies
        .iter()
        .find(|c| c.starts_with("customer_token="))
        .unwrap();
    assert!(cookie.starts_with(&session(VALID_TOKEN)));
    assert!(cookie.contains("HttpOnly"));
    assert!(cookie.contains("Secure"));
    assert!(cookie.contains("SameSite=Lax"));
    assert!(cookie.contains("Max-Age=604800"));

    let resp = ctx
        .get("/dashboard")
        .header(COOKIE, session(VALID_TOKEN))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let html = resp.text().await.unwrap();
    assert!(html.contains("Ama Mensah"));
    assert!(html.contains("ORD-0007"));
    assert!(html.contains("GHS 25.00"));
}

#[tokio::test]
async fn test_login_over_stale_cookie_keeps_new_session() {
    let ctx = TestContext::start(backend::router()).await;
    let resp = ctx
        .post("/login")
        .header(COOKIE, session("tok-expired"))
        .form(&[("phoneNumber", CUSTOMER_PHONE), ("password", CUSTOMER_PASSWORD)])
        .send()
        .await
        .unwrap();

    let cookies = set_cookies(&resp);
    assert_eq!(cookies.len(), 1);
    assert!(cookies[0].starts_with(&session(VALID_TOKEN)));
}

#[tokio::test]
async fn test_login_rejections() {
    let ctx = TestContext::start(backend::router()).await;

    let resp = ctx
        .post("/login")
        .form(&[("phoneNumber", "0741234567"), ("password", "whatever")])
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    assert!(resp.text().await.unwrap().contains("Use format: 0241234567"));

    let resp = ctx
        .post("/login")
        .form(&[("phoneNumber", CUSTOMER_PHONE), ("password", "wrong-password")])
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    assert!(set_cookies(&resp).is_empty());
    assert!(
        resp.text()
            .await
            .unwrap()
            .contains("Invalid phone number or password")
    );
}

#[tokio::test]
async fn test_signed_in_customer_skips_login_page() {
    let ctx = TestContext::start(backend::router()).await;
    for path in ["/login", "/register"] {
        let resp = ctx
            .get(path)
            .header(COOKIE, session(VALID_TOKEN))
            .send()
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::SEE_OTHER, "{path}");
        assert_eq!(location(&resp).unwrap(), "/dashboard");
    }
}

#[tokio::test]
async fn test_logout_clears_cookie() {
    let ctx = TestContext::start(backend::router()).await;
    let resp = ctx
        .post("/dashboard/logout")
        .header(COOKIE, session(VALID_TOKEN))
        .send()
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&resp).unwrap(), "/");
    let cookies = set_cookies(&resp);
    assert!(cookies.iter().any(|c| c.starts_with("customer_token=;")));
}

#[tokio::test]
async fn test_registration_validation_happens_before_backend() {
    // No backend: any network call would surface as "Network error".
    let ctx = TestContext::without_backend().await;
    let resp = ctx
        .post("/register")
        .form(&[
            ("phoneNumber", CUSTOMER_PHONE),
            ("password", "abc"),
            ("confirmPassword", "abc"),
        ])
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let html = resp.text().await.unwrap();
    assert!(!html.contains("Network error"));
    assert!(html.contains(CUSTOMER_PHONE), "submitted values are re-filled");
}

#[tokio::test]
async fn test_wallet_topup_amount_validation() {
    let ctx = TestContext::start(backend::router()).await;
    let resp = ctx
        .post("/dashboard/wallet/initialize")
        .header(COOKIE, session(VALID_TOKEN))
        .form(&[("amount", "5")])
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}
