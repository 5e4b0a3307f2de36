//! Bundle listing route handler.

use std::cmp::Ordering;

use askama::Template;
use askama_web::WebTemplate;
use axum::{extract::State, response::IntoResponse};
use bundle_shop_core::{Price, PhoneNumber};
use tracing::instrument;

use crate::backend::{Storefront, StorefrontBundle};
use crate::filters;
use crate::middleware::OptionalCustomer;
use crate::routes::Nav;
use crate::state::AppState;

/// Bundle listing page template.
#[derive(Template, WebTemplate)]
#[template(path = "internet.html")]
pub struct InternetTemplate {
    pub nav: Nav,
    pub storefront: Option<Storefront>,
    pub bundles: Vec<StorefrontBundle>,
    pub paystack_public_key: String,
    pub phone_example: &'static str,
}

/// Keep only visible bundles, ordered by `display_order` and then by
/// ascending price.
///
/// Bundles whose price cannot be parsed sort after priced ones within the
/// same display order.
#[must_use]
pub fn visible_sorted(bundles: Vec<StorefrontBundle>) -> Vec<StorefrontBundle> {
    let mut visible: Vec<StorefrontBundle> =
        bundles.into_iter().filter(|b| b.is_visible).collect();

    visible.sort_by(|a, b| {
        a.display_order
            .cmp(&b.display_order)
            .then_with(|| compare_prices(a.price(), b.price()))
    });

    visible
}

fn compare_prices(a: Option<Price>, b: Option<Price>) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) => a.cmp(&b),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

/// Display all bundles for sale.
///
/// An unavailable storefront renders an empty listing.
#[instrument(skip(state, customer))]
pub async fn internet(
    State(state): State<AppState>,
    OptionalCustomer(customer): OptionalCustomer,
) -> impl IntoResponse {
    let (storefront, bundles) = match state.backend().get_storefront_data().await {
        Ok(data) => (Some(data.storefront), visible_sorted(data.bundles)),
        Err(e) => {
            tracing::warn!(error = %e, "Failed to load storefront bundles");
            (None, Vec::new())
        }
    };

    InternetTemplate {
        nav: Nav::for_customer(customer.as_ref()),
        storefront,
        bundles,
        paystack_public_key: state.config().payments.paystack_public_key.clone(),
        phone_example: PhoneNumber::EXAMPLE,
    }
}
