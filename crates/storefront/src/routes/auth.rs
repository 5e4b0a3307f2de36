//! Authentication route handlers.
//!
//! Login, registration and the two-step password reset (request a code by
//! SMS, then set a new password with it). Signing in stores the backend's
//! bearer token in the session cookie.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
};
use bundle_shop_core::{Email, NewPassword, PasswordError, PhoneError, PhoneNumber};
use serde::Deserialize;
use tracing::instrument;

use crate::backend::RegisterRequest;
use crate::error::{add_breadcrumb, set_sentry_user};
use crate::filters;
use crate::middleware::{OptionalCustomer, append_cookie, session_cookie};
use crate::routes::{FormError, Nav};
use crate::state::AppState;

// =============================================================================
// Form Types
// =============================================================================

/// Login form data.
#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct LoginForm {
    pub phone_number: String,
    pub password: String,
}

/// Registration form data.
#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct RegisterForm {
    pub phone_number: String,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub password: String,
    pub confirm_password: String,
}

/// Reset code request form data.
#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct RequestCodeForm {
    pub phone_number: String,
}

/// New password form data.
#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ResetPasswordForm {
    pub phone_number: String,
    pub otp_code: String,
    pub new_password: String,
    pub confirm_password: String,
}

// =============================================================================
// Query Types
// =============================================================================

/// Flags set by redirects back to the login page.
#[derive(Debug, Default, Deserialize)]
pub struct LoginQuery {
    pub registered: Option<String>,
    pub reset: Option<String>,
}

impl LoginQuery {
    fn notice(&self) -> Option<&'static str> {
        if self.registered.as_deref() == Some("true") {
            Some("Account created. You can now sign in.")
        } else if self.reset.as_deref() == Some("true") {
            Some("Password reset. Sign in with your new password.")
        } else {
            None
        }
    }
}

// =============================================================================
// Templates
// =============================================================================

/// Login page template.
#[derive(Template, WebTemplate)]
#[template(path = "auth/login.html")]
pub struct LoginTemplate {
    pub nav: Nav,
    pub phone_number: String,
    pub notice: Option<&'static str>,
    pub error: Option<FormError>,
}

/// Register page template.
#[derive(Template, WebTemplate)]
#[template(path = "auth/register.html")]
pub struct RegisterTemplate {
    pub nav: Nav,
    pub phone_number: String,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub error: Option<FormError>,
}

/// Which half of the password reset the page shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResetStep {
    /// Ask for the phone number to send a code to.
    Phone,
    /// Ask for the code and the new password.
    Otp,
}

/// Password reset page template.
#[derive(Template, WebTemplate)]
#[template(path = "auth/forgot_password.html")]
pub struct ForgotPasswordTemplate {
    pub nav: Nav,
    pub step: ResetStep,
    pub phone_number: String,
    pub expires_at: Option<String>,
    pub error: Option<FormError>,
}

impl ForgotPasswordTemplate {
    fn phone_step(phone_number: String, error: Option<FormError>) -> Self {
        Self {
            nav: Nav::default(),
            step: ResetStep::Phone,
            phone_number,
            expires_at: None,
            error,
        }
    }

    fn otp_step(phone_number: String, error: Option<FormError>) -> Self {
        Self {
            nav: Nav::default(),
            step: ResetStep::Otp,
            phone_number,
            expires_at: None,
            error,
        }
    }

    /// Whether the code entry step is shown.
    #[must_use]
    pub fn is_otp_step(&self) -> bool {
        self.step == ResetStep::Otp
    }
}

/// Phone format message shown on the account forms.
fn phone_error_message(error: &PhoneError) -> String {
    match error {
        PhoneError::Empty => error.to_string(),
        PhoneError::InvalidFormat => {
            format!("{error}. Use format: {}", PhoneNumber::EXAMPLE)
        }
    }
}

// =============================================================================
// Login Routes
// =============================================================================

/// Display the login page, or go to the dashboard if already signed in.
pub async fn login_page(
    OptionalCustomer(customer): OptionalCustomer,
    Query(query): Query<LoginQuery>,
) -> Response {
    if customer.is_some() {
        return Redirect::to("/dashboard").into_response();
    }

    LoginTemplate {
        nav: Nav::default(),
        phone_number: String::new(),
        notice: query.notice(),
        error: None,
    }
    .into_response()
}

/// Handle login form submission.
#[instrument(skip_all)]
pub async fn login(State(state): State<AppState>, Form(form): Form<LoginForm>) -> Response {
    let phone_number = form.phone_number.trim().to_string();
    let fail = |status: StatusCode, error: FormError| {
        (
            status,
            LoginTemplate {
                nav: Nav::default(),
                phone_number: phone_number.clone(),
                notice: None,
                error: Some(error),
            },
        )
            .into_response()
    };

    if phone_number.is_empty() || form.password.is_empty() {
        return fail(
            StatusCode::BAD_REQUEST,
            FormError::general("Phone number and password are required"),
        );
    }

    let phone = match PhoneNumber::parse(&phone_number) {
        Ok(phone) => phone,
        Err(e) => {
            return fail(
                StatusCode::BAD_REQUEST,
                FormError::field("phoneNumber", phone_error_message(&e)),
            );
        }
    };

    let session = match state.backend().login_customer(&phone, &form.password).await {
        Ok(session) => session,
        Err(e) => {
            tracing::info!(error = %e, "Login rejected");
            return fail(StatusCode::UNAUTHORIZED, FormError::general(e.error));
        }
    };

    if let Some(customer) = &session.customer {
        set_sentry_user(&customer.id, Some(&customer.email));
    }
    add_breadcrumb("auth", "Customer signed in", None);

    let mut response = Redirect::to("/dashboard").into_response();
    match &session.token {
        Some(token) => append_cookie(response.headers_mut(), &session_cookie(token)),
        None => tracing::warn!("Login succeeded without a session token"),
    }
    response
}

// =============================================================================
// Registration Routes
// =============================================================================

/// Display the registration page, or go to the dashboard if already signed in.
pub async fn register_page(OptionalCustomer(customer): OptionalCustomer) -> Response {
    if customer.is_some() {
        return Redirect::to("/dashboard").into_response();
    }

    RegisterTemplate {
        nav: Nav::default(),
        phone_number: String::new(),
        email: String::new(),
        first_name: String::new(),
        last_name: String::new(),
        error: None,
    }
    .into_response()
}

/// Check a registration form, returning what to send to the backend.
fn validate_registration(form: &RegisterForm) -> Result<RegisterRequest, FormError> {
    let phone_number = form.phone_number.trim();
    if phone_number.is_empty() || form.password.is_empty() {
        return Err(FormError::general("Phone number and password are required"));
    }

    let phone = PhoneNumber::parse(phone_number)
        .map_err(|e| FormError::field("phoneNumber", phone_error_message(&e)))?;

    let password = NewPassword::parse(&form.password, &form.confirm_password).map_err(|e| {
        let field = match e {
            PasswordError::TooShort { .. } => "password",
            PasswordError::Mismatch => "confirmPassword",
        };
        FormError::field(field, e.to_string())
    })?;

    let email = Email::parse_optional(Some(form.email.as_str()))
        .map_err(|e| FormError::field("email", e.to_string()))?;

    let optional = |value: &str| {
        let value = value.trim();
        (!value.is_empty()).then(|| value.to_string())
    };

    Ok(RegisterRequest {
        phone_number: phone.into_inner(),
        password: password.expose().to_string(),
        email: email.map(Email::into_inner),
        first_name: optional(&form.first_name),
        last_name: optional(&form.last_name),
    })
}

/// Handle registration form submission.
#[instrument(skip_all)]
pub async fn register(State(state): State<AppState>, Form(form): Form<RegisterForm>) -> Response {
    let fail = |error: FormError| {
        (
            StatusCode::BAD_REQUEST,
            RegisterTemplate {
                nav: Nav::default(),
                phone_number: form.phone_number.trim().to_string(),
                email: form.email.trim().to_string(),
                first_name: form.first_name.trim().to_string(),
                last_name: form.last_name.trim().to_string(),
                error: Some(error),
            },
        )
            .into_response()
    };

    let request = match validate_registration(&form) {
        Ok(request) => request,
        Err(error) => return fail(error),
    };

    match state.backend().register_customer(&request).await {
        Ok(_) => {
            add_breadcrumb("auth", "Customer registered", None);
            Redirect::to("/login?registered=true").into_response()
        }
        Err(e) => {
            tracing::info!(error = %e, "Registration rejected");
            fail(FormError::general(e.error))
        }
    }
}

// =============================================================================
// Password Reset Routes
// =============================================================================

/// Display the first step of the password reset.
pub async fn forgot_password_page() -> impl IntoResponse {
    ForgotPasswordTemplate::phone_step(String::new(), None)
}

/// Send a reset code to the submitted phone number.
#[instrument(skip_all)]
pub async fn request_reset_code(
    State(state): State<AppState>,
    Form(form): Form<RequestCodeForm>,
) -> Response {
    let phone_number = form.phone_number.trim().to_string();

    let phone = match PhoneNumber::parse(&phone_number) {
        Ok(phone) => phone,
        Err(e) => {
            return (
                StatusCode::BAD_REQUEST,
                ForgotPasswordTemplate::phone_step(
                    phone_number,
                    Some(FormError::field("phoneNumber", e.to_string())),
                ),
            )
                .into_response();
        }
    };

    match state.backend().request_password_reset(&phone).await {
        Ok(requested) => {
            let mut page = ForgotPasswordTemplate::otp_step(phone_number, None);
            page.expires_at = requested.expires_at.map(|value| match value {
                serde_json::Value::String(text) => text,
                other => other.to_string(),
            });
            page.into_response()
        }
        Err(e) => (
            StatusCode::BAD_REQUEST,
            ForgotPasswordTemplate::phone_step(phone_number, Some(FormError::general(e.error))),
        )
            .into_response(),
    }
}

/// Check a new-password form.
///
/// The confirmation is compared before the length rule so a typo is reported
/// first.
fn validate_reset(form: &ResetPasswordForm) -> Result<(PhoneNumber, NewPassword), FormError> {
    if form.phone_number.trim().is_empty()
        || form.otp_code.trim().is_empty()
        || form.new_password.is_empty()
        || form.confirm_password.is_empty()
    {
        return Err(FormError::general("All fields are required"));
    }

    if form.new_password != form.confirm_password {
        return Err(FormError::field(
            "confirmPassword",
            PasswordError::Mismatch.to_string(),
        ));
    }

    let password = NewPassword::parse(&form.new_password, &form.confirm_password)
        .map_err(|e| FormError::field("newPassword", e.to_string()))?;

    let phone = PhoneNumber::parse(form.phone_number.trim())
        .map_err(|e| FormError::field("phoneNumber", e.to_string()))?;

    Ok((phone, password))
}

/// Set a new password with the reset code.
#[instrument(skip_all)]
pub async fn reset_password(
    State(state): State<AppState>,
    Form(form): Form<ResetPasswordForm>,
) -> Response {
    let fail = |error: FormError| {
        (
            StatusCode::BAD_REQUEST,
            ForgotPasswordTemplate::otp_step(form.phone_number.trim().to_string(), Some(error)),
        )
            .into_response()
    };

    let (phone, password) = match validate_reset(&form) {
        Ok(valid) => valid,
        Err(error) => return fail(error),
    };

    match state
        .backend()
        .reset_password(&phone, form.otp_code.trim(), &password)
        .await
    {
        Ok(()) => {
            add_breadcrumb("auth", "Password reset", None);
            Redirect::to("/login?reset=true").into_response()
        }
        Err(e) => fail(FormError::general(e.error)),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn register_form() -> RegisterForm {
        RegisterForm {
            phone_number: "0241234567".to_string(),
            email: String::new(),
            first_name: " Ama ".to_string(),
            last_name: String::new(),
            password: "secret1".to_string(),
            confirm_password: "secret1".to_string(),
        }
    }

    #[test]
    fn test_login_notice() {
        let query = LoginQuery {
            registered: Some("true".to_string()),
            reset: None,
        };
        assert!(query.notice().unwrap().starts_with("Account created"));
        assert!(LoginQuery::default().notice().is_none());
    }

    #[test]
    fn test_phone_error_message_includes_example() {
        assert_eq!(
            phone_error_message(&PhoneError::InvalidFormat),
            "Invalid phone number format. Use format: 0241234567"
        );
    }

    #[test]
    fn test_valid_registration() {
        let request = validate_registration(&register_form()).unwrap();
        assert_eq!(request.phone_number, "0241234567");
        assert_eq!(request.first_name.as_deref(), Some("Ama"));
        assert!(request.last_name.is_none());
        assert!(request.email.is_none());
    }

    #[test]
    fn test_registration_failures_tag_fields() {
        let mut form = register_form();
        form.phone_number = "0441234567".to_string();
        assert!(validate_registration(&form).unwrap_err().is_for("phoneNumber"));

        let mut form = register_form();
        form.password = "abc".to_string();
        form.confirm_password = "abc".to_string();
        let error = validate_registration(&form).unwrap_err();
        assert!(error.is_for("password"));
        assert_eq!(error.message, "Password must be at least 6 characters");

        let mut form = register_form();
        form.confirm_password = "secret2".to_string();
        let error = validate_registration(&form).unwrap_err();
        assert_eq!(error.message, "Passwords do not match");

        let mut form = register_form();
        form.email = "not-an-email".to_string();
        assert_eq!(
            validate_registration(&form).unwrap_err().message,
            "Invalid email format"
        );

        let mut form = register_form();
        form.password = String::new();
        assert_eq!(
            validate_registration(&form).unwrap_err().message,
            "Phone number and password are required"
        );
    }

    #[test]
    fn test_reset_validation_order() {
        let form = ResetPasswordForm {
            phone_number: "0241234567".to_string(),
            otp_code: "123456".to_string(),
            new_password: "abc".to_string(),
            confirm_password: "abd".to_string(),
        };
        assert_eq!(validate_reset(&form).unwrap_err().message, "Passwords do not match");

        let form = ResetPasswordForm {
            confirm_password: "abc".to_string(),
            ..form
        };
        assert_eq!(
            validate_reset(&form).unwrap_err().message,
            "Password must be at least 6 characters"
        );

        let form = ResetPasswordForm {
            otp_code: String::new(),
            ..form
        };
        assert_eq!(validate_reset(&form).unwrap_err().message, "All fields are required");
    }
}
