//! Customer session middleware and extractors.
//!
//! The session is a single `customer_token` cookie holding the backend's
//! bearer token. On every request [`customer_context_middleware`] resolves
//! the token to a [`Customer`] and stores a [`CustomerContext`] in the request
//! extensions. A token the backend no longer accepts is cleared from the
//! browser and the request continues as a guest.

use axum::{
    extract::{FromRequestParts, OriginalUri, Request, State},
    http::{
        HeaderMap, HeaderValue,
        header::{COOKIE, SET_COOKIE},
        request::Parts,
    },
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};
use secrecy::{ExposeSecret, SecretString};
use tower_sessions::cookie::{Cookie, SameSite, time::Duration};
use tracing::{Span, debug};

use crate::backend::Customer;
use crate::error::set_sentry_user;
use crate::state::AppState;

/// Name of the session cookie.
pub const SESSION_COOKIE_NAME: &str = "customer_token";

/// Session lifetime in seconds (7 days).
pub const SESSION_MAX_AGE_SECONDS: i64 = 7 * 24 * 60 * 60;

/// The signed-in customer for the current request.
#[derive(Debug, Clone)]
pub struct CustomerContext {
    pub customer: Customer,
    pub token: SecretString,
}

// =============================================================================
// Cookie helpers
// =============================================================================

/// Build the `Set-Cookie` value that starts a session.
#[must_use]
pub fn session_cookie(token: &SecretString) -> Cookie<'static> {
    Cookie::build((SESSION_COOKIE_NAME, token.expose_secret().to_owned()))
        .http_only(true)
        .secure(true)
        .same_site(SameSite::Lax)
        .path("/")
        .max_age(Duration::seconds(SESSION_MAX_AGE_SECONDS))
        .build()
}

/// Build the `Set-Cookie` value that ends a session.
#[must_use]
pub fn removal_cookie() -> Cookie<'static> {
    Cookie::build((SESSION_COOKIE_NAME, ""))
        .http_only(true)
        .secure(true)
        .same_site(SameSite::Lax)
        .path("/")
        .max_age(Duration::ZERO)
        .build()
}

/// Append a cookie to a response's `Set-Cookie` headers.
pub fn append_cookie(headers: &mut HeaderMap, cookie: &Cookie<'_>) {
    if let Ok(value) = HeaderValue::from_str(&cookie.to_string()) {
        headers.append(SET_COOKIE, value);
    }
}

/// Read the session token from the request's `Cookie` headers.
#[must_use]
pub fn session_token(headers: &HeaderMap) -> Option<SecretString> {
    headers
        .get_all(COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(Cookie::split_parse)
        .filter_map(Result::ok)
        .find(|cookie| cookie.name() == SESSION_COOKIE_NAME && !cookie.value().is_empty())
        .map(|cookie| SecretString::from(cookie.value().to_owned()))
}

/// Whether a response already sets the session cookie.
fn sets_session_cookie(headers: &HeaderMap) -> bool {
    let prefix = format!("{SESSION_COOKIE_NAME}=");
    headers
        .get_all(SET_COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .any(|value| value.starts_with(&prefix))
}

// =============================================================================
// Middleware
// =============================================================================

/// Resolve the session cookie to a customer for downstream handlers.
///
/// If the backend rejects the token (or cannot be reached), the cookie is
/// deleted on the response unless the handler set a fresh one.
pub async fn customer_context_middleware(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Response {
    let Some(token) = session_token(request.headers()) else {
        return next.run(request).await;
    };

    match state.backend().get_customer_profile(&token).await {
        Ok(customer) => {
            Span::current().record("customer_id", customer.id.as_str());
            set_sentry_user(&customer.id, Some(&customer.email));
            request
                .extensions_mut()
                .insert(CustomerContext { customer, token });
            next.run(request).await
        }
        Err(failure) => {
            debug!(error = %failure, "Session token rejected, clearing cookie");
            let mut response = next.run(request).await;
            if !sets_session_cookie(response.headers()) {
                append_cookie(response.headers_mut(), &removal_cookie());
            }
            response
        }
    }
}

// =============================================================================
// Extractors
// =============================================================================

/// Extractor that requires a signed-in customer.
///
/// If no customer is signed in, page requests are redirected to `/login` and
/// `/api/` requests get a 401 JSON response.
///
/// # Example
///
/// ```rust,ignore
/// async fn dashboard(RequireCustomer(ctx): RequireCustomer) -> impl IntoResponse {
///     format!("Hello, {}!", ctx.customer.display_name())
/// }
/// ```
pub struct RequireCustomer(pub CustomerContext);

/// Error returned when a customer is required but nobody is signed in.
#[derive(Debug)]
pub enum CustomerRejection {
    /// Redirect to login page (for HTML requests).
    RedirectToLogin,
    /// Unauthorized response (for API requests).
    Unauthorized,
}

impl IntoResponse for CustomerRejection {
    fn into_response(self) -> Response {
        match self {
            Self::RedirectToLogin => Redirect::to("/login").into_response(),
            Self::Unauthorized => crate::error::AppError::Unauthorized(
                "Not authenticated".to_string(),
            )
            .into_response(),
        }
    }
}

impl<S> FromRequestParts<S> for RequireCustomer
where
    S: Send + Sync,
{
    type Rejection = CustomerRejection;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<CustomerContext>()
            .cloned()
            .map(Self)
            .ok_or_else(|| {
                // Nested routers see a stripped URI; match on the original.
                let path = parts
                    .extensions
                    .get::<OriginalUri>()
                    .map_or_else(|| parts.uri.path(), |uri| uri.0.path());
                if path.starts_with("/api/") {
                    CustomerRejection::Unauthorized
                } else {
                    CustomerRejection::RedirectToLogin
                }
            })
    }
}

/// Extractor that optionally gets the signed-in customer.
///
/// Unlike `RequireCustomer`, this never rejects the request.
pub struct OptionalCustomer(pub Option<CustomerContext>);

impl<S> FromRequestParts<S> for OptionalCustomer
where
    S: Send + Sync,
{
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(Self(parts.extensions.get::<CustomerContext>().cloned()))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use axum::http::StatusCode;
    use axum::http::header::LOCATION;

    use super::*;

    #[test]
    fn test_session_cookie_attributes() {
        let cookie = session_cookie(&SecretString::from("tok-123".to_string())).to_string();
        assert!(cookie.starts_with("customer_token=tok-123"));
        assert!(cookie.contains("HttpOnly"));
        assert!(cookie.contains("Secure"));
        assert!(cookie.contains("SameSite=Lax"));
        assert!(cookie.contains("Path=/"));
        assert!(cookie.contains("Max-Age=604800"));
    }

    #[test]
    fn test_removal_cookie_expires_immediately() {
        let cookie = removal_cookie().to_string();
        assert!(cookie.starts_with("customer_token=;"));
        assert!(cookie.contains("Max-Age=0"));
        assert!(cookie.contains("Path=/"));
    }

    #[test]
    fn test_session_token_from_cookie_header() {
        let mut headers = HeaderMap::new();
        headers.insert(
            COOKIE,
            HeaderValue::from_static("theme=dark; customer_token=tok-123; other=1"),
        );
        assert_eq!(session_token(&headers).unwrap().expose_secret(), "tok-123");

        let mut headers = HeaderMap::new();
        headers.insert(COOKIE, HeaderValue::from_static("customer_token="));
        assert!(session_token(&headers).is_none());
        assert!(session_token(&HeaderMap::new()).is_none());
    }

    #[test]
    fn test_sets_session_cookie() {
        let mut headers = HeaderMap::new();
        append_cookie(&mut headers, &Cookie::new("theme", "dark"));
        assert!(!sets_session_cookie(&headers));

        append_cookie(&mut headers, &session_cookie(&SecretString::from("t".to_string())));
        assert!(sets_session_cookie(&headers));
    }

    #[tokio::test]
    async fn test_require_customer_rejection_by_path() {
        let (mut parts, ()) = axum::http::Request::builder()
            .uri("/dashboard")
            .body(())
            .unwrap()
            .into_parts();
        let rejection = RequireCustomer::from_request_parts(&mut parts, &())
            .await
            .err()
            .unwrap();
        let response = rejection.into_response();
        assert!(response.status().is_redirection());
        assert_eq!(response.headers()[LOCATION], "/login");

        let (mut parts, ()) = axum::http::Request::builder()
            .uri("/api/order/wallet")
            .body(())
            .unwrap()
            .into_parts();
        let rejection = RequireCustomer::from_request_parts(&mut parts, &())
            .await
            .err()
            .unwrap();
        assert_eq!(rejection.into_response().status(), StatusCode::UNAUTHORIZED);
    }
}
