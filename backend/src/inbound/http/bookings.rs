//! Booking handlers.
//!
//! ```text
//! POST   /api/v1/bookings {"apartmentId":"…","checkIn":"2024-12-20","checkOut":"2024-12-27","guests":2}
//! GET    /api/v1/bookings
//! GET    /api/v1/bookings/{id}
//! PATCH  /api/v1/bookings/{id} {"status":"confirmed"}
//! PATCH  /api/v1/bookings/{id}/cancel
//! DELETE /api/v1/bookings/{id}
//! ```
//!
//! Every route requires a session. Ownership and role rules live in the
//! booking service; the handlers only translate the wire format.

use actix_web::{HttpResponse, delete, get, patch, post, web};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::{
    ApartmentId, BookingDetails, BookingId, BookingPatch, BookingRequest, BookingStatus, Error,
};
use crate::inbound::http::ApiResult;
use crate::inbound::http::schemas::{BookingSchema, ErrorSchema};
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{FieldName, invalid_field_error, parse_uuid, require};

const APARTMENT_ID: FieldName = FieldName::new("apartmentId");
const STATUS: FieldName = FieldName::new("status");

/// Body for `POST /api/v1/bookings`.
#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateBookingRequest {
    #[schema(format = Uuid)]
    pub apartment_id: Option<String>,
    #[schema(value_type = Option<String>, format = Date, example = "2024-12-20")]
    pub check_in: Option<NaiveDate>,
    #[schema(value_type = Option<String>, format = Date, example = "2024-12-27")]
    pub check_out: Option<NaiveDate>,
    #[schema(example = 2)]
    pub guests: Option<u32>,
    pub notes: Option<String>,
}

/// Body for `PATCH /api/v1/bookings/{id}`. Omitted fields stay as they are.
#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateBookingRequest {
    #[schema(example = "confirmed")]
    pub status: Option<String>,
    #[schema(value_type = Option<String>, format = Date)]
    pub check_in: Option<NaiveDate>,
    #[schema(value_type = Option<String>, format = Date)]
    pub check_out: Option<NaiveDate>,
    pub guests: Option<u32>,
    pub notes: Option<String>,
}

fn parse_booking_id(raw: &str) -> Result<BookingId, Error> {
    parse_uuid(raw, FieldName::new("id")).map(BookingId::from_uuid)
}

fn parse_request(payload: CreateBookingRequest) -> Result<BookingRequest, Error> {
    let apartment_id = require(payload.apartment_id, APARTMENT_ID)?;
    Ok(BookingRequest {
        apartment_id: parse_uuid(&apartment_id, APARTMENT_ID).map(ApartmentId::from_uuid)?,
        check_in: require(payload.check_in, FieldName::new("checkIn"))?,
        check_out: require(payload.check_out, FieldName::new("checkOut"))?,
        guests: require(payload.guests, FieldName::new("guests"))?,
        notes: payload.notes,
    })
}

fn parse_patch(payload: UpdateBookingRequest) -> Result<BookingPatch, Error> {
    let status = payload
        .status
        .map(|raw| raw.parse::<BookingStatus>())
        .transpose()
        .map_err(|err| invalid_field_error(STATUS, err))?;
    Ok(BookingPatch {
        status,
        check_in: payload.check_in,
        check_out: payload.check_out,
        guests: payload.guests,
        notes: payload.notes,
    })
}

/// Request a stay. New bookings start as `pending`.
#[utoipa::path(
    post,
    path = "/api/v1/bookings",
    request_body = CreateBookingRequest,
    responses(
        (status = 201, description = "Booking created", body = BookingSchema),
        (status = 400, description = "Invalid request or dates unavailable", body = ErrorSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 404, description = "Apartment not found", body = ErrorSchema)
    ),
    tags = ["bookings"],
    operation_id = "createBooking"
)]
#[post("/bookings")]
pub async fn create_booking(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<CreateBookingRequest>,
) -> ApiResult<HttpResponse> {
    let requester = session.require_requester()?;
    let request = parse_request(payload.into_inner())?;
    let booking = state.bookings_command.create(&requester, request).await?;
    Ok(HttpResponse::Created().json(booking))
}

/// Every booking, newest first.
#[utoipa::path(
    get,
    path = "/api/v1/bookings",
    responses(
        (status = 200, description = "Bookings", body = [BookingSchema]),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 403, description = "Administrators only", body = ErrorSchema)
    ),
    tags = ["bookings"],
    operation_id = "listBookings"
)]
#[get("/bookings")]
pub async fn list_bookings(
    state: web::Data<HttpState>,
    session: SessionContext,
) -> ApiResult<web::Json<Vec<BookingDetails>>> {
    let requester = session.require_requester()?;
    Ok(web::Json(state.bookings.list_all(&requester).await?))
}

/// One booking. Guests only see their own.
#[utoipa::path(
    get,
    path = "/api/v1/bookings/{id}",
    params(("id" = String, Path, description = "Booking id")),
    responses(
        (status = 200, description = "Booking", body = BookingSchema),
        (status = 400, description = "Invalid id", body = ErrorSchema),
        (status = 403, description = "Not your booking", body = ErrorSchema),
        (status = 404, description = "Not found", body = ErrorSchema)
    ),
    tags = ["bookings"],
    operation_id = "getBooking"
)]
#[get("/bookings/{id}")]
pub async fn get_booking(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
) -> ApiResult<web::Json<BookingDetails>> {
    let requester = session.require_requester()?;
    let id = parse_booking_id(&path)?;
    Ok(web::Json(state.bookings.get(&requester, id).await?))
}

/// Change status, dates, guests or notes.
#[utoipa::path(
    patch,
    path = "/api/v1/bookings/{id}",
    params(("id" = String, Path, description = "Booking id")),
    request_body = UpdateBookingRequest,
    responses(
        (status = 200, description = "Updated booking", body = BookingSchema),
        (status = 400, description = "Invalid request or transition", body = ErrorSchema),
        (status = 403, description = "Not allowed", body = ErrorSchema),
        (status = 404, description = "Not found", body = ErrorSchema)
    ),
    tags = ["bookings"],
    operation_id = "updateBooking"
)]
#[patch("/bookings/{id}")]
pub async fn update_booking(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
    payload: web::Json<UpdateBookingRequest>,
) -> ApiResult<web::Json<BookingDetails>> {
    let requester = session.require_requester()?;
    let id = parse_booking_id(&path)?;
    let patch = parse_patch(payload.into_inner())?;
    Ok(web::Json(
        state.bookings_command.update(&requester, id, patch).await?,
    ))
}

/// Cancel a pending or confirmed booking.
#[utoipa::path(
    patch,
    path = "/api/v1/bookings/{id}/cancel",
    params(("id" = String, Path, description = "Booking id")),
    responses(
        (status = 200, description = "Cancelled booking", body = BookingSchema),
        (status = 400, description = "Booking can no longer be cancelled", body = ErrorSchema),
        (status = 403, description = "Not your booking", body = ErrorSchema),
        (status = 404, description = "Not found", body = ErrorSchema)
    ),
    tags = ["bookings"],
    operation_id = "cancelBooking"
)]
#[patch("/bookings/{id}/cancel")]
pub async fn cancel_booking(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
) -> ApiResult<web::Json<BookingDetails>> {
    let requester = session.require_requester()?;
    let id = parse_booking_id(&path)?;
    Ok(web::Json(state.bookings_command.cancel(&requester, id).await?))
}

/// Hard delete.
#[utoipa::path(
    delete,
    path = "/api/v1/bookings/{id}",
    params(("id" = String, Path, description = "Booking id")),
    responses(
        (status = 204, description = "Deleted"),
        (status = 400, description = "Invalid id", body = ErrorSchema),
        (status = 403, description = "Administrators only", body = ErrorSchema),
        (status = 404, description = "Not found", body = ErrorSchema)
    ),
    tags = ["bookings"],
    operation_id = "deleteBooking"
)]
#[delete("/bookings/{id}")]
pub async fn delete_booking(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
) -> ApiResult<HttpResponse> {
    let requester = session.require_requester()?;
    let id = parse_booking_id(&path)?;
    state.bookings_command.delete(&requester, id).await?;
    Ok(HttpResponse::NoContent().finish())
}
