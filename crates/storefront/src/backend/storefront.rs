//! Public storefront endpoints: catalog, guest checkout, order lookup.

use serde::Deserialize;
use serde_json::json;
use tracing::instrument;

use super::{
    ApiResult, BackendClient, CheckoutRequest, PaymentInit, PaymentStatusReport,
    PaymentVerification, PublicOrder, StorefrontData,
};

#[derive(Debug, Deserialize)]
struct OrderLookup {
    #[serde(default)]
    orders: Vec<PublicOrder>,
}

impl BackendClient {
    /// Fetch the storefront record and all of its bundles.
    ///
    /// # Errors
    ///
    /// Returns [`super::ApiFailure`] if the backend is unreachable or reports
    /// an error.
    #[instrument(skip(self), fields(slug = %self.storefront_slug()))]
    pub async fn get_storefront_data(&self) -> ApiResult<StorefrontData> {
        let url = self.url(&format!(
            "/api/v1/storefront/{}",
            urlencoding::encode(self.storefront_slug())
        ));
        self.send(self.http().get(url), "Failed to load storefront")
            .await
    }

    /// Start a guest checkout and get the hosted payment details.
    ///
    /// # Errors
    ///
    /// Returns [`super::ApiFailure`] if the backend is unreachable or rejects
    /// the order.
    #[instrument(
        skip(self, request),
        fields(bundle_id = %request.storefront_bundle_id)
    )]
    pub async fn initialize_payment(&self, request: &CheckoutRequest) -> ApiResult<PaymentInit> {
        let url = self.url(&format!(
            "/api/v1/storefront/{}/order/initialize",
            urlencoding::encode(self.storefront_slug())
        ));
        self.send(
            self.http().post(url).json(request),
            "Payment initialization failed",
        )
        .await
    }

    /// Ask the backend to verify a payment reference.
    ///
    /// # Errors
    ///
    /// Returns [`super::ApiFailure`] if the backend is unreachable or cannot
    /// verify the payment. The failure carries the backend's payment status.
    #[instrument(skip(self))]
    pub async fn verify_payment(&self, reference: &str) -> ApiResult<PaymentVerification> {
        let url = self.url("/api/v1/storefront/payment/verify");
        self.send(
            self.http()
                .post(url)
                .json(&json!({ "reference": reference })),
            "Failed to verify payment",
        )
        .await
    }

    /// Look up the status of a payment for the order result page.
    ///
    /// A report with `success: false` is returned as `Ok`: it describes a
    /// failed payment, not a failed request.
    ///
    /// # Errors
    ///
    /// Returns [`super::ApiFailure`] if the backend is unreachable or answers
    /// with a non-2xx status.
    #[instrument(skip(self))]
    pub async fn payment_status(&self, reference: &str) -> ApiResult<PaymentStatusReport> {
        let url = self.url(&format!(
            "/api/v1/storefront/payment/verify?reference={}",
            urlencoding::encode(reference)
        ));
        self.send_passthrough(self.http().get(url), "Could not verify payment status")
            .await
    }

    /// Find guest orders placed with a phone number.
    ///
    /// # Errors
    ///
    /// Returns [`super::ApiFailure`] if the backend is unreachable or reports
    /// an error.
    #[instrument(skip(self, phone))]
    pub async fn lookup_orders(&self, phone: &str) -> ApiResult<Vec<PublicOrder>> {
        let url = self.url(&format!(
            "/api/v1/storefront/orders?phone={}",
            urlencoding::encode(phone)
        ));
        let lookup: OrderLookup = self.send(self.http().get(url), "No orders found").await?;
        Ok(lookup.orders)
    }
}
