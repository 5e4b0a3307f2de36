//! Wallet topup endpoints.

use secrecy::{ExposeSecret, SecretString};
use serde_json::json;
use tracing::instrument;

use bundle_shop_core::{Email, TopupAmount, TopupId};

use super::{ApiResult, BackendClient, TopupInit, TopupVerification};

impl BackendClient {
    /// Start a wallet topup and get the hosted payment access code.
    ///
    /// # Errors
    ///
    /// Returns [`super::ApiFailure`] if the backend is unreachable or refuses
    /// the topup.
    #[instrument(skip(self, token, email), fields(amount = %amount))]
    pub async fn initialize_topup(
        &self,
        token: &SecretString,
        amount: &TopupAmount,
        email: Option<&Email>,
    ) -> ApiResult<TopupInit> {
        let url = self.url("/api/v1/customer/wallet/topup/initialize");

        let mut body = json!({ "amount": amount.as_str() });
        if let Some(email) = email {
            body["email"] = json!(email.as_str());
        }

        self.send(
            self.http()
                .post(url)
                .bearer_auth(token.expose_secret())
                .json(&body),
            "Failed to initialize topup",
        )
        .await
    }

    /// Confirm a topup after the hosted payment completed.
    ///
    /// # Errors
    ///
    /// Returns [`super::ApiFailure`] if the backend is unreachable or the
    /// payment did not go through. The failure carries the topup status.
    #[instrument(skip(self, token))]
    pub async fn verify_topup(
        &self,
        token: &SecretString,
        topup_id: &TopupId,
    ) -> ApiResult<TopupVerification> {
        let url = self.url("/api/v1/customer/wallet/topup/verify");
        self.send(
            self.http()
                .post(url)
                .bearer_auth(token.expose_secret())
                .json(&json!({ "topupId": topup_id.as_str() })),
            "Failed to verify payment",
        )
        .await
    }
}
