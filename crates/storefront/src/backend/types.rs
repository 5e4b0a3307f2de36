//! Request and response records exchanged with the backend API.
//!
//! Field names follow the backend's camelCase JSON. Prices and balances stay
//! decimal-as-text; use [`Price`] to compare or format them.

use std::collections::HashMap;

use bundle_shop_core::{
    BundleId, CustomerId, MarkupType, OrderId, PaymentStatus, Price, StorefrontBundleId,
    StorefrontId, TopupId,
};
use secrecy::SecretString;
use serde::{Deserialize, Deserializer, Serialize};

/// Decode `null` like a missing field.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

// =============================================================================
// Storefront
// =============================================================================

/// A merchant's public page configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Storefront {
    pub id: StorefrontId,
    pub agent_id: String,
    pub slug: String,
    pub business_name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub logo_url: Option<String>,
    #[serde(default)]
    pub banner_url: Option<String>,
    pub primary_color: String,
    pub secondary_color: String,
    #[serde(default)]
    pub phone_number: Option<String>,
    #[serde(default)]
    pub whatsapp_number: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub social_links: HashMap<String, String>,
    pub is_active: bool,
    pub is_verified: bool,
}

/// A sellable bundle offer with the storefront's pricing applied.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StorefrontBundle {
    pub id: StorefrontBundleId,
    pub bundle_id: BundleId,
    pub storefront_id: StorefrontId,
    pub markup_type: MarkupType,
    pub markup_value: String,
    pub is_visible: bool,
    pub display_order: i32,
    #[serde(default)]
    pub custom_name: Option<String>,
    pub bundle_name: String,
    pub bundle_value: String,
    pub bundle_capacity: String,
    pub bundle_duration: String,
    pub offer_code: String,
    pub offer_name: String,
    pub base_price: String,
    pub final_price: String,
    pub markup_amount: String,
}

impl StorefrontBundle {
    /// Name shown to customers: the merchant's custom name if set.
    #[must_use]
    pub fn display_name(&self) -> &str {
        self.custom_name
            .as_deref()
            .filter(|name| !name.trim().is_empty())
            .unwrap_or(&self.bundle_name)
    }

    /// Parsed sale price, `None` if the backend sent something unparseable.
    #[must_use]
    pub fn price(&self) -> Option<Price> {
        Price::parse(&self.final_price).ok()
    }
}

/// Storefront page data: branding plus every configured bundle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StorefrontData {
    pub storefront: Storefront,
    #[serde(default, deserialize_with = "null_as_default")]
    pub bundles: Vec<StorefrontBundle>,
}

// =============================================================================
// Checkout
// =============================================================================

/// Guest checkout input for a hosted payment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutRequest {
    pub storefront_bundle_id: StorefrontBundleId,
    pub beneficiary_phone: String,
    pub customer_phone: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub customer_email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub customer_name: Option<String>,
}

/// A hosted payment ready to be completed by the customer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentInit {
    #[serde(default)]
    pub authorization_url: Option<String>,
    #[serde(default)]
    pub access_code: Option<String>,
    #[serde(default)]
    pub reference: Option<String>,
    #[serde(default)]
    pub order_id: Option<OrderId>,
}

/// Result of verifying a payment reference.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentVerification {
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub order_id: Option<OrderId>,
    #[serde(default)]
    pub order_number: Option<String>,
}

/// Order snapshot attached to a payment status report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaidOrder {
    pub id: OrderId,
    pub reference: String,
    pub bundle_name: String,
    pub bundle_capacity: String,
    pub beneficiary_phone: String,
    pub total_price: String,
    pub payment_status: String,
    pub created_at: String,
}

/// Payment status report shown on the order result page.
///
/// Unlike other responses, `success: false` here is a normal answer
/// ("the payment failed"), not a request failure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentStatusReport {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
    #[serde(default)]
    pub order: Option<PaidOrder>,
}

impl PaymentStatusReport {
    /// Reported status, defaulting from the `success` flag when absent or
    /// unrecognized.
    #[must_use]
    pub fn effective_status(&self) -> PaymentStatus {
        self.status
            .as_deref()
            .and_then(|s| s.parse().ok())
            .unwrap_or_else(|| PaymentStatus::from_success(self.success))
    }

    /// Message for the customer, defaulting from the `success` flag.
    #[must_use]
    pub fn effective_message(&self) -> String {
        self.message
            .clone()
            .filter(|m| !m.is_empty())
            .or_else(|| self.error.clone().filter(|m| !m.is_empty()))
            .unwrap_or_else(|| {
                if self.success {
                    "Payment successful!".to_string()
                } else {
                    "Payment verification failed".to_string()
                }
            })
    }
}

/// Order found by the public phone-number lookup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PublicOrder {
    pub id: OrderId,
    pub reference: String,
    pub bundle_name: String,
    pub bundle_capacity: String,
    pub beneficiary_phone: String,
    pub total_price: String,
    pub payment_status: String,
    pub order_status: String,
    pub offer_name: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub offer_provider: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub storefront_name: String,
    pub created_at: String,
}

// =============================================================================
// Customer accounts
// =============================================================================

/// A registered customer's identity and account snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Customer {
    pub id: CustomerId,
    pub phone_number: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub email: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub first_name: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub last_name: String,
    #[serde(default)]
    pub account_status: Option<String>,
    pub tier: String,
    #[serde(default)]
    pub agent_number: Option<String>,
    pub wallet_balance: String,
}

impl Customer {
    /// Full name, or the phone number for customers who never gave one.
    #[must_use]
    pub fn display_name(&self) -> String {
        let name = format!("{} {}", self.first_name.trim(), self.last_name.trim());
        let name = name.trim();
        if name.is_empty() {
            self.phone_number.clone()
        } else {
            name.to_string()
        }
    }
}

/// Account registration input.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    pub phone_number: String,
    pub password: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
}

/// A successful login: the bearer token (if issued) and the customer.
#[derive(Debug, Clone)]
pub struct LoginSession {
    pub token: Option<SecretString>,
    pub customer: Option<Customer>,
}

/// One order in the customer's history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomerOrder {
    pub id: OrderId,
    pub order_number: String,
    pub status: String,
    pub bundle_value: String,
    pub bundle_name: String,
    pub beneficiary_phone: String,
    pub amount: String,
    pub payment_method: String,
    /// Milliseconds since the Unix epoch.
    pub created_at: i64,
}

/// Pagination block of the order history.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Pagination {
    pub page: u32,
    pub limit: u32,
    pub total_count: u64,
    pub total_pages: u32,
    pub has_more: bool,
}

impl Default for Pagination {
    fn default() -> Self {
        Self {
            page: 1,
            limit: 20,
            total_count: 0,
            total_pages: 0,
            has_more: false,
        }
    }
}

/// One page of the customer's order history.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomerOrderPage {
    #[serde(default, deserialize_with = "null_as_default")]
    pub orders: Vec<CustomerOrder>,
    #[serde(default)]
    pub pagination: Pagination,
}

/// Order paid from the customer's wallet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WalletOrderRequest {
    pub storefront_bundle_id: StorefrontBundleId,
    pub beneficiary_phone: String,
}

// =============================================================================
// Wallet
// =============================================================================

/// A wallet topup waiting for the hosted payment step.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TopupInit {
    pub topup_id: TopupId,
    #[serde(default)]
    pub access_code: Option<String>,
    #[serde(default)]
    pub amount: Option<String>,
    #[serde(default)]
    pub reference: Option<String>,
}

/// Result of verifying a wallet topup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TopupVerification {
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub new_balance: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
}

// =============================================================================
// Password reset
// =============================================================================

/// Confirmation that a reset code was sent.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PasswordResetRequested {
    /// When the code expires; the backend sends either text or epoch millis.
    #[serde(default)]
    pub expires_at: Option<serde_json::Value>,
}
