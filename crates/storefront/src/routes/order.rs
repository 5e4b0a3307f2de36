//! Payment result page, the return target of the hosted checkout.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    extract::{Path, Query, State},
    response::IntoResponse,
};
use bundle_shop_core::PaymentStatus;
use serde::Deserialize;
use tracing::instrument;

use crate::backend::{PaidOrder, PaymentStatusReport};
use crate::filters;
use crate::middleware::OptionalCustomer;
use crate::routes::Nav;
use crate::state::AppState;

/// Query parameters Paystack appends when redirecting back.
#[derive(Debug, Deserialize)]
pub struct CallbackQuery {
    pub trxref: Option<String>,
}

/// Payment result shown to the customer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaymentOutcome {
    pub success: bool,
    pub status: PaymentStatus,
    pub message: String,
    pub order: Option<PaidOrder>,
}

impl PaymentOutcome {
    fn failed(message: &str) -> Self {
        Self {
            success: false,
            status: PaymentStatus::Failed,
            message: message.to_string(),
            order: None,
        }
    }

    fn from_report(report: PaymentStatusReport) -> Self {
        Self {
            success: report.success,
            status: report.effective_status(),
            message: report.effective_message(),
            order: report.order,
        }
    }
}

/// Payment result page template.
#[derive(Template, WebTemplate)]
#[template(path = "order.html")]
pub struct OrderTemplate {
    pub nav: Nav,
    pub reference: String,
    pub outcome: PaymentOutcome,
}

/// Reference to verify: Paystack's `trxref` if present, else the path one.
fn payment_reference(path_reference: String, trxref: Option<String>) -> String {
    trxref
        .filter(|r| !r.trim().is_empty())
        .unwrap_or(path_reference)
}

/// Verify a payment and show its outcome.
#[instrument(skip(state, customer, query))]
pub async fn show(
    State(state): State<AppState>,
    OptionalCustomer(customer): OptionalCustomer,
    Path(reference): Path<String>,
    Query(query): Query<CallbackQuery>,
) -> impl IntoResponse {
    let reference = payment_reference(reference, query.trxref);

    let outcome = match state.backend().payment_status(&reference).await {
        Ok(report) => PaymentOutcome::from_report(report),
        Err(e) if e.is_network() => PaymentOutcome::failed(
            "Network error. Please check your order history or contact support.",
        ),
        Err(e) => {
            tracing::warn!(error = %e, %reference, "Payment status lookup failed");
            PaymentOutcome::failed("Could not verify payment status")
        }
    };

    OrderTemplate {
        nav: Nav::for_customer(customer.as_ref()),
        reference,
        outcome,
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_trxref_overrides_path_reference() {
        assert_eq!(
            payment_reference("path-ref".to_string(), Some("tx-1".to_string())),
            "tx-1"
        );
        assert_eq!(payment_reference("path-ref".to_string(), None), "path-ref");
        assert_eq!(
            payment_reference("path-ref".to_string(), Some(String::new())),
            "path-ref"
        );
    }

    #[test]
    fn test_outcome_from_report_defaults() {
        let report: PaymentStatusReport =
            serde_json::from_value(serde_json::json!({ "success": false })).unwrap();
        let outcome = PaymentOutcome::from_report(report);
        assert_eq!(outcome.status, PaymentStatus::Failed);
        assert_eq!(outcome.message, "Payment verification failed");
    }
}
