//! Wallet-paid order API.

use axum::{Json, body::Bytes, extract::State, http::StatusCode};
use bundle_shop_core::StorefrontBundleId;
use serde::Deserialize;
use serde_json::Value;
use tracing::instrument;

use super::{json_body, required};
use crate::backend::{ApiFailure, WalletOrderRequest};
use crate::error::{AppError, Result, add_breadcrumb};
use crate::middleware::OptionalCustomer;
use crate::state::AppState;

const WALLET_ORDER_FAILED: &str = "Failed to process order";

/// Wallet order request body.
#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct WalletOrder {
    pub storefront_bundle_id: Option<String>,
    pub beneficiary_phone: Option<String>,
}

impl WalletOrder {
    fn into_request(self) -> Result<WalletOrderRequest> {
        match (
            required(self.storefront_bundle_id.as_deref()),
            required(self.beneficiary_phone.as_deref()),
        ) {
            (Some(bundle_id), Some(phone)) => Ok(WalletOrderRequest {
                storefront_bundle_id: StorefrontBundleId::new(bundle_id),
                beneficiary_phone: phone.to_string(),
            }),
            _ => Err(AppError::BadRequest("Missing required fields".to_string())),
        }
    }
}

/// Buy a bundle with the signed-in customer's wallet balance.
///
/// POST /api/order/wallet
///
/// The backend's JSON is returned as-is on success.
///
/// # Errors
///
/// 401 without a session, 400 for missing fields, the backend's status for
/// a backend rejection, 500 when the backend is unreachable.
#[instrument(skip_all)]
pub async fn wallet(
    State(state): State<AppState>,
    OptionalCustomer(customer): OptionalCustomer,
    body: Bytes,
) -> Result<Json<Value>> {
    let Some(ctx) = customer else {
        return Err(AppError::Unauthorized("Not authenticated".to_string()));
    };
    let request = json_body::<WalletOrder>(&body)?.into_request()?;

    let order = state
        .backend()
        .place_wallet_order(&ctx.token, &request)
        .await
        .map_err(wallet_order_error)?;

    add_breadcrumb(
        "checkout",
        "Wallet order placed",
        Some(&[("bundle_id", request.storefront_bundle_id.as_str())]),
    );
    Ok(Json(order))
}

fn wallet_order_error(failure: ApiFailure) -> AppError {
    tracing::warn!(error = %failure, "Wallet order failed");
    if failure.is_network() {
        return AppError::Upstream {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            failure: ApiFailure {
                error: WALLET_ORDER_FAILED.to_string(),
                ..failure
            },
        };
    }
    AppError::mirrored(failure, StatusCode::BAD_REQUEST)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use axum::response::IntoResponse;

    use super::*;

    #[test]
    fn test_missing_fields() {
        let order: WalletOrder =
            serde_json::from_value(serde_json::json!({ "storefrontBundleId": "sb1" })).unwrap();
        assert!(matches!(
            order.into_request(),
            Err(AppError::BadRequest(message)) if message == "Missing required fields"
        ));
    }

    #[test]
    fn test_network_failure_answers_500() {
        let response = wallet_order_error(ApiFailure::network()).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn test_backend_status_is_mirrored() {
        let failure = ApiFailure {
            error: "Insufficient wallet balance".to_string(),
            error_code: Some("INSUFFICIENT_BALANCE".to_string()),
            status: None,
            http_status: Some(StatusCode::PAYMENT_REQUIRED),
        };
        let response = wallet_order_error(failure).into_response();
        assert_eq!(response.status(), StatusCode::PAYMENT_REQUIRED);
    }
}
