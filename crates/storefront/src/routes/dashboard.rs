//! Customer dashboard route handlers.
//!
//! These routes require authentication.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    extract::{Query, State},
    response::{IntoResponse, Redirect, Response},
};
use serde::Deserialize;
use tracing::instrument;

use crate::backend::{Customer, CustomerOrder, CustomerOrderPage, Pagination};
use crate::error::{add_breadcrumb, clear_sentry_user};
use crate::filters;
use crate::middleware::{OptionalCustomer, RequireCustomer, append_cookie, removal_cookie};
use crate::routes::Nav;
use crate::state::AppState;

/// Query parameters for the dashboard.
#[derive(Debug, Default, Deserialize)]
pub struct DashboardQuery {
    /// Order history page, 1-based. Anything unparseable means page 1.
    pub page: Option<String>,
}

impl DashboardQuery {
    fn page(&self) -> u32 {
        self.page
            .as_deref()
            .and_then(|p| p.trim().parse::<u32>().ok())
            .filter(|&p| p > 0)
            .unwrap_or(1)
    }
}

/// Dashboard page template.
#[derive(Template, WebTemplate)]
#[template(path = "dashboard/index.html")]
pub struct DashboardTemplate {
    pub nav: Nav,
    pub customer: Customer,
    pub orders: Vec<CustomerOrder>,
    pub pagination: Pagination,
    pub error: Option<String>,
}

impl DashboardTemplate {
    /// Previous page number, if any.
    #[must_use]
    pub fn previous_page(&self) -> Option<u32> {
        (self.pagination.page > 1).then(|| self.pagination.page - 1)
    }

    /// Next page number, if any.
    #[must_use]
    pub fn next_page(&self) -> Option<u32> {
        self.pagination
            .has_more
            .then(|| self.pagination.page + 1)
    }
}

/// Display the account overview with one page of order history.
///
/// Order history failures still render the page, with an empty history.
#[instrument(skip(state, ctx), fields(customer_id = %ctx.customer.id))]
pub async fn index(
    State(state): State<AppState>,
    RequireCustomer(ctx): RequireCustomer,
    Query(query): Query<DashboardQuery>,
) -> impl IntoResponse {
    let page = query.page();

    let (history, error) = match state.backend().get_customer_orders(&ctx.token, page).await {
        Ok(history) => (history, None),
        Err(e) => {
            tracing::warn!(error = %e, "Failed to load order history");
            (CustomerOrderPage::default(), Some(e.error))
        }
    };

    DashboardTemplate {
        nav: Nav::for_customer(Some(&ctx)),
        customer: ctx.customer,
        orders: history.orders,
        pagination: history.pagination,
        error,
    }
}

/// Log out: revoke the token with the backend and clear the cookie.
///
/// Always ends the local session, whatever the backend says.
#[instrument(skip_all)]
pub async fn logout(
    State(state): State<AppState>,
    OptionalCustomer(customer): OptionalCustomer,
) -> Response {
    if let Some(ctx) = customer
        && let Err(e) = state.backend().logout_customer(&ctx.token).await
    {
        tracing::warn!(error = %e, "Backend logout failed");
    }

    clear_sentry_user();
    add_breadcrumb("auth", "Customer signed out", None);

    let mut response = Redirect::to("/").into_response();
    append_cookie(response.headers_mut(), &removal_cookie());
    response
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_page_parsing() {
        let query = |page: Option<&str>| DashboardQuery {
            page: page.map(str::to_string),
        };
        assert_eq!(query(None).page(), 1);
        assert_eq!(query(Some("3")).page(), 3);
        assert_eq!(query(Some("0")).page(), 1);
        assert_eq!(query(Some("-2")).page(), 1);
        assert_eq!(query(Some("abc")).page(), 1);
    }
}
