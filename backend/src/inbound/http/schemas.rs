//! OpenAPI schema definitions for domain types.
//!
//! Domain types stay free of `ToSchema`; the wrappers here mirror their wire
//! shape so utoipa can document the payloads the handlers return.

use utoipa::ToSchema;

/// OpenAPI schema for [`crate::domain::ErrorCode`].
#[derive(ToSchema)]
#[schema(as = crate::domain::ErrorCode)]
pub enum ErrorCodeSchema {
    /// The request is malformed, fails validation or breaks a booking rule.
    #[schema(rename = "invalid_request")]
    InvalidRequest,
    /// Authentication failed or is missing.
    #[schema(rename = "unauthorized")]
    Unauthorized,
    /// Authenticated but not permitted to perform this action.
    #[schema(rename = "forbidden")]
    Forbidden,
    /// The requested resource does not exist.
    #[schema(rename = "not_found")]
    NotFound,
    /// The request clashes with existing state.
    #[schema(rename = "conflict")]
    Conflict,
    /// The database could not be reached.
    #[schema(rename = "service_unavailable")]
    ServiceUnavailable,
    /// An unexpected error occurred on the server.
    #[schema(rename = "internal_error")]
    InternalError,
}

/// OpenAPI schema for [`crate::domain::Error`].
#[derive(ToSchema)]
#[schema(as = crate::domain::Error)]
#[schema(rename_all = "camelCase")]
#[expect(
    dead_code,
    reason = "Used only for OpenAPI schema generation via utoipa"
)]
pub struct ErrorSchema {
    #[schema(example = "invalid_request")]
    code: ErrorCodeSchema,
    #[schema(example = "Selected dates are not available")]
    message: String,
    /// Correlation identifier echoed in the `trace-id` header.
    #[schema(example = "3fa85f64-5717-4562-b3fc-2c963f66afa6")]
    trace_id: Option<String>,
    /// Field name, validation code or booking rejection reason.
    #[schema(example = json!({"reason": "date_conflict"}))]
    details: Option<serde_json::Value>,
}

/// OpenAPI schema for [`crate::domain::Role`].
#[derive(ToSchema)]
#[schema(as = crate::domain::Role)]
pub enum RoleSchema {
    #[schema(rename = "user")]
    User,
    #[schema(rename = "admin")]
    Admin,
}

/// OpenAPI schema for [`crate::domain::User`]. Password hashes never leave
/// the server.
#[derive(ToSchema)]
#[schema(as = crate::domain::User)]
#[schema(rename_all = "camelCase")]
#[expect(
    dead_code,
    reason = "Used only for OpenAPI schema generation via utoipa"
)]
pub struct UserSchema {
    #[schema(format = Uuid, example = "3fa85f64-5717-4562-b3fc-2c963f66afa6")]
    id: String,
    #[schema(format = Email, example = "ada@example.com")]
    email: String,
    #[schema(example = "Ada Lovelace")]
    full_name: String,
    phone: Option<String>,
    role: RoleSchema,
    #[schema(format = DateTime)]
    created_at: String,
    #[schema(format = DateTime)]
    updated_at: String,
}

/// OpenAPI schema for [`crate::domain::ApartmentImage`].
#[derive(ToSchema)]
#[schema(as = crate::domain::ApartmentImage)]
#[schema(rename_all = "camelCase")]
#[expect(
    dead_code,
    reason = "Used only for OpenAPI schema generation via utoipa"
)]
pub struct ApartmentImageSchema {
    #[schema(example = "https://cdn.example/loft.jpg")]
    image_url: String,
    is_main: bool,
}

/// OpenAPI schema for [`crate::domain::Apartment`].
#[derive(ToSchema)]
#[schema(as = crate::domain::Apartment)]
#[schema(rename_all = "camelCase")]
#[expect(
    dead_code,
    reason = "Used only for OpenAPI schema generation via utoipa"
)]
pub struct ApartmentSchema {
    #[schema(format = Uuid)]
    id: String,
    #[schema(example = "Sunny loft in Palermo")]
    title: String,
    description: String,
    #[schema(minimum = 1, maximum = 2)]
    bedrooms: u8,
    #[schema(minimum = 1, maximum = 5)]
    bathrooms: u8,
    #[schema(minimum = 1, maximum = 10)]
    max_guests: u32,
    /// Whole currency units per night.
    #[schema(example = 15000)]
    price_per_night: u64,
    address: String,
    city: String,
    country: String,
    square_meters: u32,
    amenities: Vec<String>,
    is_available: bool,
    /// The first entry is the main image.
    images: Vec<ApartmentImageSchema>,
    #[schema(format = DateTime)]
    created_at: String,
    #[schema(format = DateTime)]
    updated_at: String,
}

/// OpenAPI schema for [`crate::domain::ApartmentSummary`].
#[derive(ToSchema)]
#[schema(as = crate::domain::ApartmentSummary)]
#[schema(rename_all = "camelCase")]
#[expect(
    dead_code,
    reason = "Used only for OpenAPI schema generation via utoipa"
)]
pub struct ApartmentSummarySchema {
    #[schema(format = Uuid)]
    id: String,
    title: String,
    bedrooms: u8,
    price_per_night: u64,
    address: String,
    city: String,
    main_image: Option<String>,
}

/// OpenAPI schema for [`crate::domain::GuestSummary`].
#[derive(ToSchema)]
#[schema(as = crate::domain::GuestSummary)]
#[schema(rename_all = "camelCase")]
#[expect(
    dead_code,
    reason = "Used only for OpenAPI schema generation via utoipa"
)]
pub struct GuestSummarySchema {
    #[schema(format = Uuid)]
    id: String,
    #[schema(format = Email)]
    email: String,
    full_name: String,
    phone: Option<String>,
}

/// OpenAPI schema for [`crate::domain::BookingStatus`].
#[derive(ToSchema)]
#[schema(as = crate::domain::BookingStatus)]
pub enum BookingStatusSchema {
    #[schema(rename = "pending")]
    Pending,
    #[schema(rename = "confirmed")]
    Confirmed,
    #[schema(rename = "cancelled")]
    Cancelled,
    #[schema(rename = "completed")]
    Completed,
}

/// OpenAPI schema for [`crate::domain::BookingDetails`].
///
/// `guest` is omitted on a caller's own booking list.
#[derive(ToSchema)]
#[schema(as = crate::domain::BookingDetails)]
#[schema(rename_all = "camelCase")]
#[expect(
    dead_code,
    reason = "Used only for OpenAPI schema generation via utoipa"
)]
pub struct BookingSchema {
    #[schema(format = Uuid)]
    id: String,
    #[schema(format = Uuid)]
    user_id: String,
    #[schema(format = Uuid)]
    apartment_id: String,
    #[schema(format = Date, example = "2024-12-20")]
    check_in: String,
    #[schema(format = Date, example = "2024-12-27")]
    check_out: String,
    guests: u32,
    /// Nights multiplied by the nightly price.
    #[schema(example = 105000)]
    total_price: u64,
    status: BookingStatusSchema,
    notes: Option<String>,
    #[schema(format = DateTime)]
    created_at: String,
    #[schema(format = DateTime)]
    updated_at: String,
    apartment: Option<ApartmentSummarySchema>,
    guest: Option<GuestSummarySchema>,
}

/// OpenAPI schema for [`crate::domain::Availability`].
#[derive(ToSchema)]
#[schema(as = crate::domain::Availability)]
#[schema(rename_all = "camelCase")]
#[expect(
    dead_code,
    reason = "Used only for OpenAPI schema generation via utoipa"
)]
pub struct AvailabilitySchema {
    available: bool,
    conflicting_bookings: u32,
}
