//! Authentication handlers.
//!
//! ```text
//! POST /api/v1/auth/register {"email":"ada@example.com","password":"…","fullName":"Ada Lovelace"}
//! POST /api/v1/auth/login    {"email":"ada@example.com","password":"…"}
//! POST /api/v1/auth/logout
//! ```

use actix_web::{HttpResponse, post, web};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::{
    Error, LoginCredentials, LoginValidationError, Registration, RegistrationValidationError,
    User, UserValidationError,
};
use crate::inbound::http::ApiResult;
use crate::inbound::http::schemas::{ErrorSchema, UserSchema};
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{FieldName, invalid_field_error, require};

const EMAIL: FieldName = FieldName::new("email");
const PASSWORD: FieldName = FieldName::new("password");
const FULL_NAME: FieldName = FieldName::new("fullName");
const PHONE: FieldName = FieldName::new("phone");

/// Body for `POST /api/v1/auth/register`.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    #[schema(example = "ada@example.com")]
    pub email: Option<String>,
    #[schema(example = "correct horse battery")]
    pub password: Option<String>,
    #[schema(example = "Ada Lovelace")]
    pub full_name: Option<String>,
    pub phone: Option<String>,
}

/// Body for `POST /api/v1/auth/login`.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    pub email: Option<String>,
    pub password: Option<String>,
}

/// Attribute a user-field failure to the request field that caused it.
pub(crate) fn user_field_error(err: UserValidationError) -> Error {
    let field = match err {
        UserValidationError::InvalidEmail => EMAIL,
        UserValidationError::FullNameLength { .. } => FULL_NAME,
        UserValidationError::EmptyPhone
        | UserValidationError::PhoneTooLong { .. }
        | UserValidationError::PhoneInvalidCharacters => PHONE,
        UserValidationError::InvalidId | UserValidationError::UnknownRole(_) => {
            return Error::invalid_request(err.to_string());
        }
    };
    invalid_field_error(field, err)
}

fn registration_error(err: RegistrationValidationError) -> Error {
    match err {
        RegistrationValidationError::Field(inner) => user_field_error(inner),
        other @ RegistrationValidationError::PasswordLength { .. } => {
            invalid_field_error(PASSWORD, other)
        }
    }
}

fn login_error(err: LoginValidationError) -> Error {
    match err {
        LoginValidationError::EmptyEmail => invalid_field_error(EMAIL, err),
        LoginValidationError::EmptyPassword => invalid_field_error(PASSWORD, err),
    }
}

pub(crate) fn parse_registration(payload: RegisterRequest) -> Result<Registration, Error> {
    let email = require(payload.email, EMAIL)?;
    let password = require(payload.password, PASSWORD)?;
    let full_name = require(payload.full_name, FULL_NAME)?;
    Registration::try_from_parts(&email, &password, &full_name, payload.phone.as_deref())
        .map_err(registration_error)
}

fn parse_login(payload: LoginRequest) -> Result<LoginCredentials, Error> {
    let email = require(payload.email, EMAIL)?;
    let password = require(payload.password, PASSWORD)?;
    LoginCredentials::try_from_parts(&email, &password).map_err(login_error)
}

/// Create an account and sign it in.
#[utoipa::path(
    post,
    path = "/api/v1/auth/register",
    request_body = RegisterRequest,
    responses(
        (status = 201, description = "Account created", body = UserSchema,
            headers(("Set-Cookie" = String, description = "Session cookie"))),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 409, description = "Email already registered", body = ErrorSchema),
        (status = 503, description = "Service unavailable", body = ErrorSchema)
    ),
    tags = ["auth"],
    operation_id = "register",
    security([])
)]
#[post("/auth/register")]
pub async fn register(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<RegisterRequest>,
) -> ApiResult<HttpResponse> {
    let registration = parse_registration(payload.into_inner())?;
    let user: User = state.registration.register(registration).await?;
    session.sign_in(&user)?;
    Ok(HttpResponse::Created().json(user))
}

/// Authenticate and establish a session.
///
/// Unknown emails and wrong passwords produce the same `401` payload.
#[utoipa::path(
    post,
    path = "/api/v1/auth/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Signed in", body = UserSchema,
            headers(("Set-Cookie" = String, description = "Session cookie"))),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 401, description = "Invalid credentials", body = ErrorSchema),
        (status = 503, description = "Service unavailable", body = ErrorSchema)
    ),
    tags = ["auth"],
    operation_id = "login",
    security([])
)]
#[post("/auth/login")]
pub async fn login(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<LoginRequest>,
) -> ApiResult<web::Json<User>> {
    let credentials = parse_login(payload.into_inner())?;
    let user = state.login.authenticate(&credentials).await?;
    session.sign_in(&user)?;
    Ok(web::Json(user))
}

/// Clear the session cookie.
#[utoipa::path(
    post,
    path = "/api/v1/auth/logout",
    responses((status = 204, description = "Signed out")),
    tags = ["auth"],
    operation_id = "logout",
    security([])
)]
#[post("/auth/logout")]
pub async fn logout(session: SessionContext) -> HttpResponse {
    session.sign_out();
    HttpResponse::NoContent().finish()
}

#[cfg(test)]
mod tests {
    use rstest::rstest;
    use serde_json::json;

    use super::*;
    use crate::domain::ErrorCode;

    fn registration(email: &str, password: &str) -> RegisterRequest {
        RegisterRequest {
            email: Some(email.to_owned()),
            password: Some(password.to_owned()),
            full_name: Some("Ada Lovelace".to_owned()),
            phone: None,
        }
    }

    #[rstest]
    #[case(registration("not-an-email", "long enough"), "email")]
    #[case(registration("ada@example.com", "short"), "password")]
    #[case(RegisterRequest { full_name: None, ..registration("ada@example.com", "long enough") }, "fullName")]
    #[case(RegisterRequest { phone: Some("call me".to_owned()), ..registration("ada@example.com", "long enough") }, "phone")]
    fn registration_errors_name_the_field(#[case] payload: RegisterRequest, #[case] field: &str) {
        let err = parse_registration(payload).expect_err("invalid registration");
        assert_eq!(err.code(), ErrorCode::InvalidRequest);
        assert_eq!(
            err.details().and_then(|details| details.get("field")),
            Some(&json!(field))
        );
    }

    #[rstest]
    fn login_requires_both_fields() {
        let err = parse_login(LoginRequest {
            email: Some("ada@example.com".to_owned()),
            password: None,
        })
        .expect_err("missing password");
        assert_eq!(
            err.details(),
            Some(&json!({"field": "password", "code": "missing_field"}))
        );
    }
}
