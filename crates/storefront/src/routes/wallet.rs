//! Wallet route handlers: balance and topups.
//!
//! A topup is two actions around the Paystack inline widget: `initialize`
//! creates the topup and returns an access code for the widget, and `verify`
//! confirms it once the widget reports the payment done.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use bundle_shop_core::{Email, TopupAmount, TopupId};
use serde::Deserialize;
use tracing::instrument;

use crate::backend::{Customer, TopupInit, TopupVerification};
use crate::error::add_breadcrumb;
use crate::filters;
use crate::middleware::{CustomerContext, RequireCustomer};
use crate::routes::{FormError, Nav};
use crate::state::AppState;

/// Topup start form data.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct InitializeForm {
    pub amount: String,
    pub email: String,
}

/// Topup confirmation form data.
#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct VerifyForm {
    pub topup_id: String,
}

/// Wallet page template.
#[derive(Template, WebTemplate)]
#[template(path = "dashboard/wallet.html")]
pub struct WalletTemplate {
    pub nav: Nav,
    pub customer: Customer,
    pub paystack_public_key: String,
    pub amount: String,
    pub email: String,
    /// A started topup waiting for the widget.
    pub topup: Option<TopupInit>,
    /// A confirmed topup.
    pub verified: Option<TopupVerification>,
    /// Topup status reported with a failed verification.
    pub status: Option<String>,
    pub error: Option<FormError>,
}

impl WalletTemplate {
    fn new(state: &AppState, ctx: CustomerContext) -> Self {
        Self {
            nav: Nav::for_customer(Some(&ctx)),
            email: ctx.customer.email.clone(),
            customer: ctx.customer,
            paystack_public_key: state.config().payments.paystack_public_key.clone(),
            amount: String::new(),
            topup: None,
            verified: None,
            status: None,
            error: None,
        }
    }

    fn failed(mut self, error: FormError) -> Response {
        self.error = Some(error);
        (StatusCode::BAD_REQUEST, self).into_response()
    }

    /// Balance to show: the fresh one after a topup, else the profile's.
    #[must_use]
    pub fn balance(&self) -> &str {
        self.verified
            .as_ref()
            .and_then(|v| v.new_balance.as_deref())
            .unwrap_or(&self.customer.wallet_balance)
    }
}

/// Display the wallet page.
#[instrument(skip_all)]
pub async fn show(
    State(state): State<AppState>,
    RequireCustomer(ctx): RequireCustomer,
) -> impl IntoResponse {
    WalletTemplate::new(&state, ctx)
}

/// Start a topup and hand the access code to the page's payment widget.
#[instrument(skip_all, fields(customer_id = %ctx.customer.id))]
pub async fn initialize(
    State(state): State<AppState>,
    RequireCustomer(ctx): RequireCustomer,
    Form(form): Form<InitializeForm>,
) -> Response {
    let token = ctx.token.clone();
    let mut page = WalletTemplate::new(&state, ctx);
    page.amount = form.amount.trim().to_string();
    if !form.email.trim().is_empty() {
        page.email = form.email.trim().to_string();
    }

    let amount = match TopupAmount::parse(&form.amount) {
        Ok(amount) => amount,
        Err(e) => return page.failed(FormError::field("amount", e.to_string())),
    };
    let email = match Email::parse_optional(Some(form.email.as_str())) {
        Ok(email) => email,
        Err(e) => return page.failed(FormError::field("email", e.to_string())),
    };

    match state
        .backend()
        .initialize_topup(&token, &amount, email.as_ref())
        .await
    {
        Ok(topup) => {
            add_breadcrumb(
                "wallet",
                "Topup initialized",
                Some(&[("topup_id", topup.topup_id.as_str())]),
            );
            page.topup = Some(topup);
            page.into_response()
        }
        Err(e) => {
            tracing::warn!(error = %e, "Topup initialization failed");
            page.failed(FormError::general(e.error))
        }
    }
}

/// Confirm a topup after the widget reports the payment complete.
#[instrument(skip_all, fields(customer_id = %ctx.customer.id))]
pub async fn verify(
    State(state): State<AppState>,
    RequireCustomer(ctx): RequireCustomer,
    Form(form): Form<VerifyForm>,
) -> Response {
    let token = ctx.token.clone();
    let mut page = WalletTemplate::new(&state, ctx);

    let topup_id = TopupId::new(form.topup_id.trim());
    if topup_id.is_empty() {
        return page.failed(FormError::general("Topup ID is required"));
    }

    match state.backend().verify_topup(&token, &topup_id).await {
        Ok(verified) => {
            add_breadcrumb(
                "wallet",
                "Topup verified",
                Some(&[("topup_id", topup_id.as_str())]),
            );
            page.verified = Some(verified);
            page.into_response()
        }
        Err(e) => {
            tracing::warn!(error = %e, "Topup verification failed");
            page.status = e.status.clone();
            page.failed(FormError::general(e.error))
        }
    }
}
