//! HTTP route handlers for the storefront.
//!
//! # Route Structure
//!
//! ```text
//! GET  /                          - Home page
//! GET  /internet                  - Bundle listing with checkout
//!
//! # Orders
//! GET  /orders?phone=             - Order lookup by phone
//! POST /orders                    - Lookup form (redirects to ?phone=)
//! GET  /order/{reference}         - Payment result (?trxref= wins)
//!
//! # Auth
//! GET  /login                     - Login page
//! POST /login                     - Login action
//! GET  /register                  - Register page
//! POST /register                  - Register action
//! GET  /forgot-password           - Password reset page
//! POST /forgot-password/request   - Send reset code
//! POST /forgot-password/reset     - Set new password
//!
//! # Dashboard (requires auth)
//! GET  /dashboard?page=           - Account overview and order history
//! POST /dashboard/logout          - Logout action
//! GET  /dashboard/wallet          - Wallet page
//! POST /dashboard/wallet/initialize - Start a topup
//! POST /dashboard/wallet/verify   - Confirm a topup
//!
//! # JSON API
//! POST /api/checkout              - Start guest checkout
//! POST /api/checkout/verify       - Verify a checkout payment
//! POST /api/order/wallet          - Buy with wallet balance (requires auth)
//! ```

pub mod api;
pub mod auth;
pub mod bundles;
pub mod dashboard;
pub mod home;
pub mod order;
pub mod orders;
pub mod wallet;

use axum::{
    Router,
    routing::{get, post},
};

use crate::middleware::CustomerContext;
use crate::state::AppState;

/// Header data shared by every page.
#[derive(Debug, Clone, Default)]
pub struct Nav {
    /// Display name of the signed-in customer, if any.
    pub customer_name: Option<String>,
}

impl Nav {
    /// Navigation state for an optional signed-in customer.
    #[must_use]
    pub fn for_customer(ctx: Option<&CustomerContext>) -> Self {
        Self {
            customer_name: ctx.map(|ctx| ctx.customer.display_name()),
        }
    }

    /// Whether a customer is signed in.
    #[must_use]
    pub const fn signed_in(&self) -> bool {
        self.customer_name.is_some()
    }
}

/// A failed form submission: a message, tagged with the offending field when
/// there is one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormError {
    pub field: Option<&'static str>,
    pub message: String,
}

impl FormError {
    /// Failure caused by one form field.
    #[must_use]
    pub fn field(field: &'static str, message: impl Into<String>) -> Self {
        Self {
            field: Some(field),
            message: message.into(),
        }
    }

    /// Failure not tied to a single field (e.g. a backend rejection).
    #[must_use]
    pub fn general(message: impl Into<String>) -> Self {
        Self {
            field: None,
            message: message.into(),
        }
    }

    /// Whether this failure concerns `field`.
    #[must_use]
    pub fn is_for(&self, field: &str) -> bool {
        self.field == Some(field)
    }
}

/// Create the auth routes router.
pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/login", get(auth::login_page).post(auth::login))
        .route("/register", get(auth::register_page).post(auth::register))
        .route("/forgot-password", get(auth::forgot_password_page))
        .route("/forgot-password/request", post(auth::request_reset_code))
        .route("/forgot-password/reset", post(auth::reset_password))
}

/// Create the dashboard routes router.
pub fn dashboard_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(dashboard::index))
        .route("/logout", post(dashboard::logout))
        .route("/wallet", get(wallet::show))
        .route("/wallet/initialize", post(wallet::initialize))
        .route("/wallet/verify", post(wallet::verify))
}

/// Create the JSON API routes router.
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .route("/checkout", post(api::checkout::start))
        .route("/checkout/verify", post(api::checkout::verify))
        .route("/order/wallet", post(api::order::wallet))
}

/// Create all routes for the storefront.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(home::home))
        .route("/internet", get(bundles::internet))
        .route("/orders", get(orders::show).post(orders::lookup))
        .route("/order/{reference}", get(order::show))
        .merge(auth_routes())
        .nest("/dashboard", dashboard_routes())
        .nest("/api", api_routes())
}
