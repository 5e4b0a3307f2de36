//! Home page route handler.

use askama::Template;
use askama_web::WebTemplate;
use axum::{extract::State, response::IntoResponse};
use tracing::instrument;

use crate::backend::{Storefront, StorefrontBundle};
use crate::filters;
use crate::middleware::OptionalCustomer;
use crate::routes::{Nav, bundles::visible_sorted};
use crate::state::AppState;

/// Number of bundles featured on the home page.
const FEATURED_BUNDLE_COUNT: usize = 6;

/// Home page template.
#[derive(Template, WebTemplate)]
#[template(path = "home.html")]
pub struct HomeTemplate {
    pub nav: Nav,
    pub storefront: Option<Storefront>,
    pub featured: Vec<StorefrontBundle>,
}

/// Display the home page with the storefront branding and a few bundles.
#[instrument(skip(state, customer))]
pub async fn home(
    State(state): State<AppState>,
    OptionalCustomer(customer): OptionalCustomer,
) -> impl IntoResponse {
    let (storefront, featured) = match state.backend().get_storefront_data().await {
        Ok(data) => {
            let mut featured = visible_sorted(data.bundles);
            featured.truncate(FEATURED_BUNDLE_COUNT);
            (Some(data.storefront), featured)
        }
        Err(e) => {
            tracing::warn!(error = %e, "Failed to load storefront for home page");
            (None, Vec::new())
        }
    };

    HomeTemplate {
        nav: Nav::for_customer(customer.as_ref()),
        storefront,
        featured,
    }
}
