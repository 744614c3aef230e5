//! Domain primitives, aggregates and use-case services.
//!
//! Purpose: hold the booking rules independently of HTTP and storage.
//! Inbound adapters talk to the services through the driving ports in
//! [`ports`]; the services reach storage through the driven ports.
//!
//! Public surface:
//! - [`Error`] / [`ErrorCode`]: transport-agnostic error payload.
//! - [`Apartment`], [`Booking`], [`User`]: aggregates with their value types.
//! - [`BookingService`]: the booking workflow engine.
//! - [`ApartmentService`], [`UserService`], [`AuthService`]: catalogue and
//!   account use-cases.

pub mod apartment;
pub mod apartment_service;
pub mod auth;
pub mod auth_service;
pub mod booking;
pub mod booking_service;
pub mod error;
pub mod ports;
pub mod trace_id;
pub mod user;
pub mod user_service;

#[cfg(test)]
pub(crate) mod fixtures;

pub use self::apartment::{
    Apartment, ApartmentDraft, ApartmentFilter, ApartmentId, ApartmentImage, ApartmentPatch,
    ApartmentSummary, ApartmentValidationError, Bedrooms,
};
pub use self::apartment_service::ApartmentService;
pub use self::auth::{
    LoginCredentials, LoginValidationError, Registration, RegistrationValidationError, Requester,
};
pub use self::auth_service::AuthService;
pub use self::booking::{
    Availability, Booking, BookingDetails, BookingError, BookingId, BookingPatch, BookingRequest,
    BookingStatus, BookingUpdatePolicy, GuestSummary, StayDates, UnknownBookingStatus,
};
pub use self::booking_service::BookingService;
pub use self::error::{Error, ErrorCode, ErrorValidationError};
pub use self::trace_id::{TRACE_ID_HEADER, TraceId};
pub use self::user::{
    Email, FullName, PhoneNumber, Role, User, UserId, UserPatch, UserValidationError,
};
pub use self::user_service::UserService;

/// Convenient API result alias.
///
/// # Examples
/// ```
/// use actix_web::HttpResponse;
/// use backend::domain::{ApiResult, Error};
///
/// fn handler() -> ApiResult<HttpResponse> {
///     Err(Error::forbidden("nope"))
/// }
/// ```
pub type ApiResult<T> = Result<T, Error>;
