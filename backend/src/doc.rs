//! OpenAPI document for the booking API.
//!
//! Registers every handler under `/api/v1`, the health checks, the domain
//! schema wrappers from [`crate::inbound::http::schemas`] and the session
//! cookie security scheme. Served by Swagger UI in debug builds and printed
//! by the `openapi-dump` binary.

use utoipa::openapi::security::{ApiKey, ApiKeyValue, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::inbound::http::apartments::{CreateApartmentRequest, UpdateApartmentRequest};
use crate::inbound::http::auth::{LoginRequest, RegisterRequest};
use crate::inbound::http::bookings::{CreateBookingRequest, UpdateBookingRequest};
use crate::inbound::http::schemas::{
    ApartmentImageSchema, ApartmentSchema, ApartmentSummarySchema, AvailabilitySchema,
    BookingSchema, BookingStatusSchema, ErrorCodeSchema, ErrorSchema, GuestSummarySchema,
    RoleSchema, UserSchema,
};
use crate::inbound::http::users::UpdateUserRequest;

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi
            .components
            .get_or_insert_with(utoipa::openapi::Components::default);
        components.add_security_scheme(
            "SessionCookie",
            SecurityScheme::ApiKey(ApiKey::Cookie(ApiKeyValue::with_description(
                "session",
                "Session cookie issued by POST /api/v1/auth/login or /api/v1/auth/register.",
            ))),
        );
    }
}

/// OpenAPI document for the REST API.
#[derive(OpenApi)]
#[openapi(
    modifiers(&SecurityAddon),
    info(
        title = "Apartment booking API",
        description = "Catalogue, availability and booking workflow for short-stay apartments."
    ),
    servers((url = "/", description = "Relative to the deployment base URL")),
    security(("SessionCookie" = [])),
    paths(
        crate::inbound::http::auth::register,
        crate::inbound::http::auth::login,
        crate::inbound::http::auth::logout,
        crate::inbound::http::users::list_users,
        crate::inbound::http::users::current_user,
        crate::inbound::http::users::update_current_user,
        crate::inbound::http::users::list_own_bookings,
        crate::inbound::http::users::get_user,
        crate::inbound::http::users::update_user,
        crate::inbound::http::users::delete_user,
        crate::inbound::http::apartments::list_apartments,
        crate::inbound::http::apartments::get_apartment,
        crate::inbound::http::apartments::check_availability,
        crate::inbound::http::apartments::create_apartment,
        crate::inbound::http::apartments::update_apartment,
        crate::inbound::http::apartments::delete_apartment,
        crate::inbound::http::bookings::create_booking,
        crate::inbound::http::bookings::list_bookings,
        crate::inbound::http::bookings::get_booking,
        crate::inbound::http::bookings::update_booking,
        crate::inbound::http::bookings::cancel_booking,
        crate::inbound::http::bookings::delete_booking,
        crate::inbound::http::health::ready,
        crate::inbound::http::health::live,
    ),
    components(schemas(
        ErrorSchema,
        ErrorCodeSchema,
        UserSchema,
        RoleSchema,
        ApartmentSchema,
        ApartmentImageSchema,
        ApartmentSummarySchema,
        GuestSummarySchema,
        BookingSchema,
        BookingStatusSchema,
        AvailabilitySchema,
        RegisterRequest,
        LoginRequest,
        UpdateUserRequest,
        CreateApartmentRequest,
        UpdateApartmentRequest,
        CreateBookingRequest,
        UpdateBookingRequest,
    )),
    tags(
        (name = "auth", description = "Registration and session management"),
        (name = "users", description = "Account administration and self-service"),
        (name = "apartments", description = "Catalogue and availability"),
        (name = "bookings", description = "Reservation workflow"),
        (name = "health", description = "Orchestration health checks")
    )
)]
pub struct ApiDoc;
