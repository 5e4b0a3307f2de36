//! Guest checkout API.
//!
//! `start` creates an order and a hosted payment; `verify` relays the
//! payment reference back to the backend once the customer returns.

use axum::{Json, body::Bytes, extract::State, http::StatusCode};
use bundle_shop_core::{OrderId, PhoneNumber, StorefrontBundleId};
use serde::{Deserialize, Serialize};
use tracing::instrument;

use super::{json_body, required};
use crate::backend::{ApiFailure, CheckoutRequest};
use crate::error::{AppError, Result, add_breadcrumb};
use crate::state::AppState;

// =============================================================================
// Start
// =============================================================================

/// Checkout request body.
#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct StartCheckout {
    pub storefront_bundle_id: Option<String>,
    pub beneficiary_phone: Option<String>,
    pub customer_phone: Option<String>,
    pub customer_email: Option<String>,
    pub customer_name: Option<String>,
}

impl StartCheckout {
    /// Validate the body into a backend request.
    ///
    /// The paying customer's phone defaults to the beneficiary's.
    fn into_request(self) -> Result<CheckoutRequest> {
        let (Some(bundle_id), Some(beneficiary)) = (
            required(self.storefront_bundle_id.as_deref()),
            required(self.beneficiary_phone.as_deref()),
        ) else {
            return Err(AppError::BadRequest("Missing required fields".to_string()));
        };

        let beneficiary = PhoneNumber::parse(beneficiary)
            .map_err(|_| AppError::BadRequest("Invalid phone number format".to_string()))?;

        let customer = match required(self.customer_phone.as_deref()) {
            Some(phone) => PhoneNumber::parse(phone).map_err(|_| {
                AppError::BadRequest("Invalid customer phone number format".to_string())
            })?,
            None => beneficiary.clone(),
        };

        Ok(CheckoutRequest {
            storefront_bundle_id: StorefrontBundleId::new(bundle_id),
            beneficiary_phone: beneficiary.into_inner(),
            customer_phone: customer.into_inner(),
            customer_email: required(self.customer_email.as_deref()).map(str::to_string),
            customer_name: required(self.customer_name.as_deref()).map(str::to_string),
        })
    }
}

/// Successful checkout start.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutStarted {
    pub success: bool,
    pub authorization_url: Option<String>,
    pub reference: Option<String>,
    pub order_id: Option<OrderId>,
}

/// Start a guest checkout.
///
/// POST /api/checkout
///
/// # Errors
///
/// 400 for invalid input or a backend rejection, 500 for a malformed body.
#[instrument(skip_all)]
pub async fn start(State(state): State<AppState>, body: Bytes) -> Result<Json<CheckoutStarted>> {
    let request = json_body::<StartCheckout>(&body)?.into_request()?;

    let payment = state
        .backend()
        .initialize_payment(&request)
        .await
        .map_err(|failure| {
            tracing::warn!(error = %failure, "Checkout initialization failed");
            AppError::Upstream {
                status: StatusCode::BAD_REQUEST,
                failure,
            }
        })?;

    add_breadcrumb(
        "checkout",
        "Payment initialized",
        Some(&[("reference", payment.reference.as_deref().unwrap_or_default())]),
    );

    Ok(Json(CheckoutStarted {
        success: true,
        authorization_url: payment.authorization_url,
        reference: payment.reference,
        order_id: payment.order_id,
    }))
}

// =============================================================================
// Verify
// =============================================================================

/// Verification request body.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct VerifyCheckout {
    pub reference: Option<String>,
}

/// Successful verification.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutVerified {
    pub success: bool,
    pub status: Option<String>,
    pub order_id: Option<OrderId>,
    pub order_number: Option<String>,
}

/// Verify a checkout payment.
///
/// POST /api/checkout/verify
///
/// # Errors
///
/// 400 without a reference; backend rejections keep the backend's status;
/// 500 when the backend is unreachable or the body is malformed.
#[instrument(skip_all)]
pub async fn verify(State(state): State<AppState>, body: Bytes) -> Result<Json<CheckoutVerified>> {
    let body: VerifyCheckout = json_body(&body)?;
    let Some(reference) = required(body.reference.as_deref()) else {
        return Err(AppError::BadRequest(
            "Payment reference is required".to_string(),
        ));
    };

    let verified = state
        .backend()
        .verify_payment(reference)
        .await
        .map_err(|failure| upstream_error(failure, reference))?;

    Ok(Json(CheckoutVerified {
        success: true,
        status: verified.status,
        order_id: verified.order_id,
        order_number: verified.order_number,
    }))
}

fn upstream_error(failure: ApiFailure, reference: &str) -> AppError {
    if failure.is_network() {
        return AppError::Internal(format!("payment verification for {reference}: {failure}"));
    }
    tracing::warn!(error = %failure, %reference, "Payment verification failed");
    // A 2xx `success:false` answer keeps its 2xx status.
    let status = failure.http_status.unwrap_or(StatusCode::BAD_REQUEST);
    AppError::Upstream { status, failure }
}
