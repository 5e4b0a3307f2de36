//! HTTP middleware stack for the storefront.
//!
//! # Middleware Order (outermost first)
//!
//! 1. Sentry layers (per-request hub, transactions)
//! 2. `TraceLayer` (request span)
//! 3. Request ID (recorded into the span)
//! 4. Security headers
//! 5. Customer context (session cookie → signed-in customer)

pub mod customer;
pub mod request_id;
pub mod security_headers;

pub use customer::{
    CustomerContext, OptionalCustomer, RequireCustomer, SESSION_COOKIE_NAME, append_cookie,
    customer_context_middleware, removal_cookie, session_cookie,
};
pub use request_id::request_id_middleware;
pub use security_headers::security_headers_middleware;
