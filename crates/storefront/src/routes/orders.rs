//! Public order lookup by phone number.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
};
use bundle_shop_core::PhoneNumber;
use serde::Deserialize;
use tracing::instrument;

use crate::backend::PublicOrder;
use crate::filters;
use crate::middleware::OptionalCustomer;
use crate::routes::Nav;
use crate::state::AppState;

/// Query parameters for the lookup page.
#[derive(Debug, Deserialize)]
pub struct LookupQuery {
    pub phone: Option<String>,
}

/// Lookup form data.
#[derive(Debug, Deserialize)]
pub struct LookupForm {
    #[serde(default)]
    pub phone: String,
}

/// Order lookup page template.
#[derive(Template, WebTemplate)]
#[template(path = "orders.html")]
pub struct OrdersTemplate {
    pub nav: Nav,
    pub phone: String,
    /// `None` until a lookup has been made.
    pub orders: Option<Vec<PublicOrder>>,
    pub error: Option<String>,
}

/// Display the lookup form and, when `?phone=` is present, the matching orders.
#[instrument(skip_all)]
pub async fn show(
    State(state): State<AppState>,
    OptionalCustomer(customer): OptionalCustomer,
    Query(query): Query<LookupQuery>,
) -> impl IntoResponse {
    let nav = Nav::for_customer(customer.as_ref());

    let Some(phone) = query.phone.filter(|p| !p.trim().is_empty()) else {
        return OrdersTemplate {
            nav,
            phone: String::new(),
            orders: None,
            error: None,
        };
    };

    let (orders, error) = match state.backend().lookup_orders(phone.trim()).await {
        Ok(orders) => (orders, None),
        Err(e) if e.is_network() => (Vec::new(), Some("Network error".to_string())),
        Err(e) if e.is_http_error() => (Vec::new(), Some("Failed to fetch orders".to_string())),
        Err(e) => (Vec::new(), Some(e.error)),
    };

    OrdersTemplate {
        nav,
        phone,
        orders: Some(orders),
        error,
    }
}

/// Validate the lookup form and redirect to the results.
#[instrument(skip_all)]
pub async fn lookup(
    OptionalCustomer(customer): OptionalCustomer,
    Form(form): Form<LookupForm>,
) -> Response {
    match PhoneNumber::parse(form.phone.trim()) {
        Ok(phone) => {
            Redirect::to(&format!("/orders?phone={}", urlencoding::encode(phone.as_str())))
                .into_response()
        }
        Err(e) => (
            StatusCode::BAD_REQUEST,
            OrdersTemplate {
                nav: Nav::for_customer(customer.as_ref()),
                phone: form.phone.trim().to_string(),
                orders: None,
                error: Some(e.to_string()),
            },
        )
            .into_response(),
    }
}
