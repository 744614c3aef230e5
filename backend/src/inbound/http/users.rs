//! Account handlers.
//!
//! ```text
//! GET    /api/v1/users
//! GET    /api/v1/users/me
//! PATCH  /api/v1/users/me {"fullName":"Ada King"}
//! GET    /api/v1/users/me/bookings
//! GET    /api/v1/users/{id}
//! PATCH  /api/v1/users/{id}
//! DELETE /api/v1/users/{id}
//! ```
//!
//! The `me` routes must be registered before the `{id}` routes.

use actix_web::{HttpResponse, delete, get, patch, web};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::{BookingDetails, Email, Error, FullName, PhoneNumber, User, UserId, UserPatch};
use crate::inbound::http::ApiResult;
use crate::inbound::http::auth::user_field_error;
use crate::inbound::http::schemas::{BookingSchema, ErrorSchema, UserSchema};
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{FieldName, parse_uuid};

/// Profile fields a caller may change. Omitted fields stay as they are.
#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateUserRequest {
    pub email: Option<String>,
    pub full_name: Option<String>,
    pub phone: Option<String>,
}

fn parse_patch(payload: UpdateUserRequest) -> Result<UserPatch, Error> {
    Ok(UserPatch {
        email: payload
            .email
            .map(Email::new)
            .transpose()
            .map_err(user_field_error)?,
        full_name: payload
            .full_name
            .map(FullName::new)
            .transpose()
            .map_err(user_field_error)?,
        phone: payload
            .phone
            .map(PhoneNumber::new)
            .transpose()
            .map_err(user_field_error)?,
    })
}

fn parse_user_id(raw: &str) -> Result<UserId, Error> {
    parse_uuid(raw, FieldName::new("id")).map(UserId::from_uuid)
}

/// List every account.
#[utoipa::path(
    get,
    path = "/api/v1/users",
    responses(
        (status = 200, description = "Users", body = [UserSchema]),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 403, description = "Administrators only", body = ErrorSchema)
    ),
    tags = ["users"],
    operation_id = "listUsers"
)]
#[get("/users")]
pub async fn list_users(
    state: web::Data<HttpState>,
    session: SessionContext,
) -> ApiResult<web::Json<Vec<User>>> {
    let requester = session.require_requester()?;
    Ok(web::Json(state.users.list_users(&requester).await?))
}

/// The signed-in account.
#[utoipa::path(
    get,
    path = "/api/v1/users/me",
    responses(
        (status = 200, description = "Current user", body = UserSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema)
    ),
    tags = ["users"],
    operation_id = "currentUser"
)]
#[get("/users/me")]
pub async fn current_user(
    state: web::Data<HttpState>,
    session: SessionContext,
) -> ApiResult<web::Json<User>> {
    let requester = session.require_requester()?;
    let user = state.users.get_user(&requester, requester.user_id).await?;
    Ok(web::Json(user))
}

/// Edit the signed-in account.
#[utoipa::path(
    patch,
    path = "/api/v1/users/me",
    request_body = UpdateUserRequest,
    responses(
        (status = 200, description = "Updated user", body = UserSchema),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 409, description = "Email already registered", body = ErrorSchema)
    ),
    tags = ["users"],
    operation_id = "updateCurrentUser"
)]
#[patch("/users/me")]
pub async fn update_current_user(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<UpdateUserRequest>,
) -> ApiResult<web::Json<User>> {
    let requester = session.require_requester()?;
    let patch = parse_patch(payload.into_inner())?;
    let user = state
        .users_command
        .update_user(&requester, requester.user_id, patch)
        .await?;
    Ok(web::Json(user))
}

/// Bookings owned by the signed-in account.
#[utoipa::path(
    get,
    path = "/api/v1/users/me/bookings",
    responses(
        (status = 200, description = "Own bookings, newest first", body = [BookingSchema]),
        (status = 401, description = "Unauthorised", body = ErrorSchema)
    ),
    tags = ["users"],
    operation_id = "listOwnBookings"
)]
#[get("/users/me/bookings")]
pub async fn list_own_bookings(
    state: web::Data<HttpState>,
    session: SessionContext,
) -> ApiResult<web::Json<Vec<BookingDetails>>> {
    let requester = session.require_requester()?;
    Ok(web::Json(state.bookings.list_for_user(&requester).await?))
}

/// One account by id.
#[utoipa::path(
    get,
    path = "/api/v1/users/{id}",
    params(("id" = String, Path, description = "User id")),
    responses(
        (status = 200, description = "User", body = UserSchema),
        (status = 400, description = "Invalid id", body = ErrorSchema),
        (status = 403, description = "Administrators only", body = ErrorSchema),
        (status = 404, description = "Not found", body = ErrorSchema)
    ),
    tags = ["users"],
    operation_id = "getUser"
)]
#[get("/users/{id}")]
pub async fn get_user(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
) -> ApiResult<web::Json<User>> {
    let requester = session.require_requester()?;
    let id = parse_user_id(&path)?;
    Ok(web::Json(state.users.get_user(&requester, id).await?))
}

/// Edit any account.
#[utoipa::path(
    patch,
    path = "/api/v1/users/{id}",
    params(("id" = String, Path, description = "User id")),
    request_body = UpdateUserRequest,
    responses(
        (status = 200, description = "Updated user", body = UserSchema),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 403, description = "Administrators only", body = ErrorSchema),
        (status = 404, description = "Not found", body = ErrorSchema),
        (status = 409, description = "Email already registered", body = ErrorSchema)
    ),
    tags = ["users"],
    operation_id = "updateUser"
)]
#[patch("/users/{id}")]
pub async fn update_user(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
    payload: web::Json<UpdateUserRequest>,
) -> ApiResult<web::Json<User>> {
    let requester = session.require_requester()?;
    let id = parse_user_id(&path)?;
    let patch = parse_patch(payload.into_inner())?;
    Ok(web::Json(
        state.users_command.update_user(&requester, id, patch).await?,
    ))
}

/// Remove an account without bookings.
#[utoipa::path(
    delete,
    path = "/api/v1/users/{id}",
    params(("id" = String, Path, description = "User id")),
    responses(
        (status = 204, description = "Deleted"),
        (status = 400, description = "Invalid id or user still has bookings", body = ErrorSchema),
        (status = 403, description = "Administrators only", body = ErrorSchema),
        (status = 404, description = "Not found", body = ErrorSchema)
    ),
    tags = ["users"],
    operation_id = "deleteUser"
)]
#[delete("/users/{id}")]
pub async fn delete_user(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
) -> ApiResult<HttpResponse> {
    let requester = session.require_requester()?;
    let id = parse_user_id(&path)?;
    state.users_command.delete_user(&requester, id).await?;
    Ok(HttpResponse::NoContent().finish())
}

#[cfg(test)]
mod tests;
