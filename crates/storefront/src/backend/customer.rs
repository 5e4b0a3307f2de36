//! Customer account endpoints: registration, login, profile, orders and
//! password reset.

use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use serde::de::IgnoredAny;
use serde_json::{Value, json};
use tracing::{debug, instrument};

use bundle_shop_core::{NewPassword, PhoneNumber};

use super::{
    ApiResult, BackendClient, Customer, CustomerOrderPage, LoginSession, PasswordResetRequested,
    RegisterRequest, WalletOrderRequest,
};

/// Orders per page of the customer's history.
pub const ORDERS_PAGE_SIZE: u32 = 20;

#[derive(Debug, Deserialize)]
struct Registered {
    #[serde(default)]
    customer: Option<Customer>,
}

#[derive(Deserialize)]
struct LoginResponse {
    #[serde(default)]
    token: Option<String>,
    #[serde(default)]
    customer: Option<Customer>,
}

#[derive(Debug, Deserialize)]
struct Profile {
    customer: Customer,
}

impl BackendClient {
    /// Create a customer account.
    ///
    /// # Errors
    ///
    /// Returns [`super::ApiFailure`] if the backend is unreachable or rejects
    /// the registration (e.g. the phone number is taken).
    #[instrument(skip(self, request), fields(phone = %request.phone_number))]
    pub async fn register_customer(&self, request: &RegisterRequest) -> ApiResult<Option<Customer>> {
        let url = self.url("/api/v1/customer/register");
        let registered: Registered = self
            .send(self.http().post(url).json(request), "Registration failed")
            .await?;
        Ok(registered.customer)
    }

    /// Exchange a phone number and password for a bearer token.
    ///
    /// # Errors
    ///
    /// Returns [`super::ApiFailure`] if the backend is unreachable or the
    /// credentials are rejected.
    #[instrument(skip(self, password), fields(phone = %phone))]
    pub async fn login_customer(&self, phone: &PhoneNumber, password: &str) -> ApiResult<LoginSession> {
        let url = self.url("/api/v1/customer/login");
        let response: LoginResponse = self
            .send(
                self.http().post(url).json(&json!({
                    "phoneNumber": phone.as_str(),
                    "password": password,
                })),
                "Invalid credentials",
            )
            .await?;

        Ok(LoginSession {
            token: response.token.map(SecretString::from),
            customer: response.customer,
        })
    }

    /// Resolve a bearer token to the customer it belongs to.
    ///
    /// # Errors
    ///
    /// Returns [`super::ApiFailure`] if the backend is unreachable or the
    /// token is not valid.
    #[instrument(skip_all)]
    pub async fn get_customer_profile(&self, token: &SecretString) -> ApiResult<Customer> {
        let url = self.url("/api/v1/customer/me");
        let profile: Profile = self
            .send(
                self.http().get(url).bearer_auth(token.expose_secret()),
                "Failed to get profile",
            )
            .await?;
        Ok(profile.customer)
    }

    /// Fetch one page of the customer's order history.
    ///
    /// # Errors
    ///
    /// Returns [`super::ApiFailure`] if the backend is unreachable or reports
    /// an error.
    #[instrument(skip(self, token))]
    pub async fn get_customer_orders(
        &self,
        token: &SecretString,
        page: u32,
    ) -> ApiResult<CustomerOrderPage> {
        let url = self.url(&format!(
            "/api/v1/customer/orders?page={}&limit={ORDERS_PAGE_SIZE}",
            page.max(1)
        ));
        self.send(
            self.http().get(url).bearer_auth(token.expose_secret()),
            "Failed to get orders",
        )
        .await
    }

    /// Revoke a bearer token.
    ///
    /// An unreachable backend counts as success so the caller can always
    /// clear its session.
    ///
    /// # Errors
    ///
    /// Returns [`super::ApiFailure`] if the backend answers with an error.
    #[instrument(skip_all)]
    pub async fn logout_customer(&self, token: &SecretString) -> ApiResult<()> {
        let url = self.url("/api/v1/customer/logout");
        match self
            .send::<IgnoredAny>(
                self.http().post(url).bearer_auth(token.expose_secret()),
                "Logout failed",
            )
            .await
        {
            Ok(_) => Ok(()),
            Err(failure) if failure.is_network() => {
                debug!("Backend unreachable during logout, treating as logged out");
                Ok(())
            }
            Err(failure) => Err(failure),
        }
    }

    /// Buy a bundle with the customer's wallet balance.
    ///
    /// The backend's JSON answer is returned as-is, including a 2xx body
    /// with `success: false`.
    ///
    /// # Errors
    ///
    /// Returns [`super::ApiFailure`] if the backend is unreachable or answers
    /// with a non-2xx status.
    #[instrument(
        skip(self, token, request),
        fields(bundle_id = %request.storefront_bundle_id)
    )]
    pub async fn place_wallet_order(
        &self,
        token: &SecretString,
        request: &WalletOrderRequest,
    ) -> ApiResult<Value> {
        let url = self.url("/api/v1/customer/order/bundle");
        self.send_passthrough(
            self.http()
                .post(url)
                .bearer_auth(token.expose_secret())
                .json(&json!({
                    "storefrontBundleId": request.storefront_bundle_id,
                    "beneficiaryPhone": request.beneficiary_phone,
                    "paymentMethod": "wallet",
                })),
            "Failed to process order",
        )
        .await
    }

    /// Send a password reset code to a phone number.
    ///
    /// # Errors
    ///
    /// Returns [`super::ApiFailure`] if the backend is unreachable or refuses
    /// to send a code.
    #[instrument(skip(self), fields(phone = %phone))]
    pub async fn request_password_reset(
        &self,
        phone: &PhoneNumber,
    ) -> ApiResult<PasswordResetRequested> {
        let url = self.url("/api/v1/customer/password/forgot");
        self.send(
            self.http()
                .post(url)
                .json(&json!({ "phoneNumber": phone.as_str() })),
            "Failed to send reset code",
        )
        .await
    }

    /// Set a new password using the code sent by [`Self::request_password_reset`].
    ///
    /// # Errors
    ///
    /// Returns [`super::ApiFailure`] if the backend is unreachable or the code
    /// is wrong or expired.
    #[instrument(skip(self, otp_code, new_password), fields(phone = %phone))]
    pub async fn reset_password(
        &self,
        phone: &PhoneNumber,
        otp_code: &str,
        new_password: &NewPassword,
    ) -> ApiResult<()> {
        let url = self.url("/api/v1/customer/password/reset");
        self.send::<IgnoredAny>(
            self.http().post(url).json(&json!({
                "phoneNumber": phone.as_str(),
                "otpCode": otp_code,
                "newPassword": new_password.expose(),
            })),
            "Failed to reset password",
        )
        .await?;
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::collections::HashMap;

    use axum::extract::Query;
    use axum::http::{HeaderMap, StatusCode};
    use axum::routing::{get, post};
    use axum::{Json, Router};
    use serde_json::json;

    use super::super::fixtures::{StubBackend, customer_json, unreachable_client};
    use super::super::NETWORK_ERROR_MESSAGE;
    use super::*;
    use bundle_shop_core::StorefrontBundleId;

    fn phone() -> PhoneNumber {
        PhoneNumber::parse("0241234567").unwrap()
    }

    fn token() -> SecretString {
        SecretString::from("tok-123".to_string())
    }

    fn bearer(headers: &HeaderMap) -> Option<String> {
        headers
            .get("authorization")
            .and_then(|v| v.to_str().ok())
            .map(str::to_string)
    }

    fn wallet_order() -> WalletOrderRequest {
        WalletOrderRequest {
            storefront_bundle_id: StorefrontBundleId::new("sb1"),
            beneficiary_phone: "0241234567".to_string(),
        }
    }

    #[tokio::test]
    async fn test_login_returns_token_and_customer() {
        let stub = StubBackend::serve(Router::new().route(
            "/api/v1/customer/login",
            post(|Json(body): Json<Value>| async move {
                assert_eq!(body["phoneNumber"], "0241234567");
                assert_eq!(body["password"], "secret1");
                Json(json!({ "success": true, "token": "tok-123", "customer": customer_json() }))
            }),
        ))
        .await;

        let session = stub.client().login_customer(&phone(), "secret1").await.unwrap();
        assert_eq!(session.token.unwrap().expose_secret(), "tok-123");
        assert_eq!(session.customer.unwrap().first_name, "Ama");
    }

    #[tokio::test]
    async fn test_login_rejected() {
        let stub = StubBackend::serve(Router::new().route(
            "/api/v1/customer/login",
            post(|| async {
                (
                    StatusCode::UNAUTHORIZED,
                    Json(json!({ "success": false, "error": "Invalid phone number or password" })),
                )
            }),
        ))
        .await;

        let failure = stub.client().login_customer(&phone(), "nope").await.unwrap_err();
        assert_eq!(failure.error, "Invalid phone number or password");
        assert_eq!(failure.http_status, Some(StatusCode::UNAUTHORIZED));
    }

    #[tokio::test]
    async fn test_profile_sends_bearer_token() {
        let stub = StubBackend::serve(Router::new().route(
            "/api/v1/customer/me",
            get(|headers: HeaderMap| async move {
                if bearer(&headers).as_deref() == Some("Bearer tok-123") {
                    (StatusCode::OK, Json(json!({ "success": true, "customer": customer_json() })))
                } else {
                    (
                        StatusCode::UNAUTHORIZED,
                        Json(json!({ "success": false, "error": "Invalid token" })),
                    )
                }
            }),
        ))
        .await;
        let client = stub.client();

        let customer = client.get_customer_profile(&token()).await.unwrap();
        assert_eq!(customer.id.as_str(), "c1");

        let other = SecretString::from("forged".to_string());
        let failure = client.get_customer_profile(&other).await.unwrap_err();
        assert_eq!(failure.error, "Invalid token");
    }

    #[tokio::test]
    async fn test_profile_without_email_or_name() {
        let stub = StubBackend::serve(Router::new().route(
            "/api/v1/customer/me",
            get(|| async {
                let mut customer = customer_json();
                customer["email"] = json!(null);
                customer["firstName"] = json!(null);
                customer["lastName"] = json!(null);
                Json(json!({ "success": true, "customer": customer }))
            }),
        ))
        .await;

        let customer = stub.client().get_customer_profile(&token()).await.unwrap();
        assert!(customer.email.is_empty());
        assert_eq!(customer.display_name(), "0241234567");
    }

    #[tokio::test]
    async fn test_orders_page_query() {
        let stub = StubBackend::serve(Router::new().route(
            "/api/v1/customer/orders",
            get(|Query(query): Query<HashMap<String, String>>| async move {
                assert_eq!(query.get("page").map(String::as_str), Some("3"));
                assert_eq!(query.get("limit").map(String::as_str), Some("20"));
                Json(json!({
                    "success": true,
                    "orders": [{
                        "id": "o1",
                        "orderNumber": "ORD-1",
                        "status": "COMPLETED",
                        "bundleValue": "1",
                        "bundleName": "1GB",
                        "beneficiaryPhone": "0241234567",
                        "amount": "5.00",
                        "paymentMethod": "wallet",
                        "createdAt": 1_767_607_200_000_i64
                    }],
                    "pagination": {
                        "page": 3, "limit": 20, "totalCount": 41, "totalPages": 3, "hasMore": false
                    }
                }))
            }),
        ))
        .await;

        let page = stub.client().get_customer_orders(&token(), 3).await.unwrap();
        assert_eq!(page.orders.len(), 1);
        assert_eq!(page.pagination.total_count, 41);
    }

    #[tokio::test]
    async fn test_logout_masks_network_failure() {
        let client = unreachable_client().await;
        assert!(client.logout_customer(&token()).await.is_ok());
    }

    #[tokio::test]
    async fn test_wallet_order_passes_body_through() {
        let stub = StubBackend::serve(Router::new().route(
            "/api/v1/customer/order/bundle",
            post(|Json(body): Json<Value>| async move {
                assert_eq!(body["paymentMethod"], "wallet");
                Json(json!({ "success": false, "error": "Insufficient balance", "balance": "2.00" }))
            }),
        ))
        .await;

        let value = stub
            .client()
            .place_wallet_order(&token(), &wallet_order())
            .await
            .unwrap();
        assert_eq!(value["error"], "Insufficient balance");
        assert_eq!(value["balance"], "2.00");
    }

    #[tokio::test]
    async fn test_password_reset_flow() {
        let stub = StubBackend::serve(
            Router::new()
                .route(
                    "/api/v1/customer/password/forgot",
                    post(|| async {
                        Json(json!({ "success": true, "expiresAt": "2026-01-05T10:10:00Z" }))
                    }),
                )
                .route(
                    "/api/v1/customer/password/reset",
                    post(|Json(body): Json<Value>| async move {
                        if body["otpCode"] == "123456" {
                            Json(json!({ "success": true, "message": "Password reset" }))
                        } else {
                            Json(json!({ "success": false, "error": "Invalid or expired code" }))
                        }
                    }),
                ),
        )
        .await;
        let client = stub.client();

        let requested = client.request_password_reset(&phone()).await.unwrap();
        assert!(requested.expires_at.is_some());

        let password = NewPassword::parse("secret1", "secret1").unwrap();
        assert!(client.reset_password(&phone(), "123456", &password).await.is_ok());
        let failure = client
            .reset_password(&phone(), "000000", &password)
            .await
            .unwrap_err();
        assert_eq!(failure.error, "Invalid or expired code");
    }

    #[tokio::test]
    async fn test_success_false_error_passes_through_unchanged() {
        let soft_fail = || async { Json(json!({ "success": false, "error": "X" })) };
        let stub = StubBackend::serve(
            Router::new()
                .route("/api/v1/customer/register", post(soft_fail))
                .route("/api/v1/customer/me", get(soft_fail))
                .route("/api/v1/customer/orders", get(soft_fail))
                .route("/api/v1/customer/logout", post(soft_fail))
                .route("/api/v1/customer/password/forgot", post(soft_fail)),
        )
        .await;
        let client = stub.client();
        let register = RegisterRequest {
            phone_number: "0241234567".to_string(),
            password: "secret1".to_string(),
            email: None,
            first_name: None,
            last_name: None,
        };

        assert_eq!(client.register_customer(&register).await.unwrap_err().error, "X");
        assert_eq!(client.get_customer_profile(&token()).await.unwrap_err().error, "X");
        assert_eq!(client.get_customer_orders(&token(), 1).await.unwrap_err().error, "X");
        assert_eq!(client.logout_customer(&token()).await.unwrap_err().error, "X");
        assert_eq!(client.request_password_reset(&phone()).await.unwrap_err().error, "X");
    }

    #[tokio::test]
    async fn test_unreachable_backend() {
        let client = unreachable_client().await;
        let password = NewPassword::parse("secret1", "secret1").unwrap();

        assert_eq!(
            client.login_customer(&phone(), "secret1").await.unwrap_err().error,
            NETWORK_ERROR_MESSAGE
        );
        assert_eq!(
            client.get_customer_orders(&token(), 1).await.unwrap_err().error,
            NETWORK_ERROR_MESSAGE
        );
        assert_eq!(
            client
                .reset_password(&phone(), "123456", &password)
                .await
                .unwrap_err()
                .error,
            NETWORK_ERROR_MESSAGE
        );
        assert!(
            client
                .place_wallet_order(&token(), &wallet_order())
                .await
                .unwrap_err()
                .is_network()
        );
    }
}
