//! Bookings and the pure rules of the booking workflow.
//!
//! Everything here is side-effect free: date ranges, overlap tests, nightly
//! pricing and the status state machine. [`crate::domain::BookingService`]
//! sequences these rules around the repository ports.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use serde_json::json;
use uuid::Uuid;

use crate::domain::{ApartmentId, ApartmentSummary, Email, Error, FullName, PhoneNumber, User, UserId};

/// Maximum stored length of guest notes.
pub const NOTES_MAX: usize = 1000;

/// Stable booking identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BookingId(Uuid);

impl BookingId {
    pub const fn from_uuid(id: Uuid) -> Self {
        Self(id)
    }

    pub fn random() -> Self {
        Self(Uuid::new_v4())
    }

    pub const fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl fmt::Display for BookingId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Lifecycle state of a booking.
///
/// ```text
/// pending ──► confirmed ──► completed
///    │            │
///    └──► cancelled ◄┘
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BookingStatus {
    Pending,
    Confirmed,
    Cancelled,
    Completed,
}

impl BookingStatus {
    /// Statuses that hold the apartment's dates.
    pub const ACTIVE: [Self; 2] = [Self::Pending, Self::Confirmed];

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Confirmed => "confirmed",
            Self::Cancelled => "cancelled",
            Self::Completed => "completed",
        }
    }

    /// Whether a booking in this status blocks its date range.
    pub const fn is_active(self) -> bool {
        matches!(self, Self::Pending | Self::Confirmed)
    }

    /// Validate a move to `next`, returning the new status.
    ///
    /// Re-entering the current status is rejected; callers that treat it as
    /// a no-op must check before calling.
    pub fn transition_to(self, next: Self) -> Result<Self, BookingError> {
        let allowed = matches!(
            (self, next),
            (Self::Pending, Self::Confirmed | Self::Cancelled)
                | (Self::Confirmed, Self::Cancelled | Self::Completed)
        );
        if allowed {
            Ok(next)
        } else {
            Err(BookingError::InvalidTransition {
                from: self,
                to: next,
            })
        }
    }
}

impl fmt::Display for BookingStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Raised when a status string is not one of the four known values.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown booking status: {0}")]
pub struct UnknownBookingStatus(pub String);

impl FromStr for BookingStatus {
    type Err = UnknownBookingStatus;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(Self::Pending),
            "confirmed" => Ok(Self::Confirmed),
            "cancelled" => Ok(Self::Cancelled),
            "completed" => Ok(Self::Completed),
            other => Err(UnknownBookingStatus(other.to_owned())),
        }
    }
}

/// Check-in/check-out pair with `check_out > check_in`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", try_from = "RawStayDates")]
pub struct StayDates {
    check_in: NaiveDate,
    check_out: NaiveDate,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawStayDates {
    check_in: NaiveDate,
    check_out: NaiveDate,
}

impl TryFrom<RawStayDates> for StayDates {
    type Error = BookingError;

    fn try_from(value: RawStayDates) -> Result<Self, Self::Error> {
        Self::new(value.check_in, value.check_out)
    }
}

impl StayDates {
    /// Validate the ordering of a date pair.
    pub fn new(check_in: NaiveDate, check_out: NaiveDate) -> Result<Self, BookingError> {
        if check_out <= check_in {
            return Err(BookingError::invalid_date_range(
                "check-out date must be after check-in date",
            ));
        }
        Ok(Self {
            check_in,
            check_out,
        })
    }

    pub const fn check_in(&self) -> NaiveDate {
        self.check_in
    }

    pub const fn check_out(&self) -> NaiveDate {
        self.check_out
    }

    /// Billable nights. Both ends are calendar dates, so the day difference is
    /// already whole and needs no rounding.
    pub fn nights(&self) -> u64 {
        let days = self.check_out.signed_duration_since(self.check_in).num_days();
        u64::try_from(days).unwrap_or(0)
    }

    /// Inclusive overlap: a stay ending on the day another starts conflicts.
    pub fn overlaps(&self, other: &Self) -> bool {
        self.check_in <= other.check_out && self.check_out >= other.check_in
    }

    /// `nights × rate`, or `InvalidInput` when the product does not fit.
    pub fn total_price(&self, price_per_night: u64) -> Result<u64, BookingError> {
        self.nights()
            .checked_mul(price_per_night)
            .ok_or_else(|| BookingError::invalid_input("total price is too large"))
    }
}

/// Stored reservation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Booking {
    pub id: BookingId,
    pub user_id: UserId,
    pub apartment_id: ApartmentId,
    #[serde(flatten)]
    pub stay: StayDates,
    pub guests: u32,
    /// Whole currency units for the full stay.
    pub total_price: u64,
    pub status: BookingStatus,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Guest fields embedded into booking reads.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GuestSummary {
    pub id: UserId,
    pub email: Email,
    pub full_name: FullName,
    pub phone: Option<PhoneNumber>,
}

impl From<&User> for GuestSummary {
    fn from(value: &User) -> Self {
        Self {
            id: value.id,
            email: value.email.clone(),
            full_name: value.full_name.clone(),
            phone: value.phone.clone(),
        }
    }
}

/// A booking with its related records embedded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookingDetails {
    #[serde(flatten)]
    pub booking: Booking,
    pub apartment: Option<ApartmentSummary>,
    pub guest: Option<GuestSummary>,
}

/// Unvalidated create request as received from a guest.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BookingRequest {
    pub apartment_id: ApartmentId,
    pub check_in: NaiveDate,
    pub check_out: NaiveDate,
    pub guests: u32,
    pub notes: Option<String>,
}

/// Partial booking update; `None` leaves the field untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BookingPatch {
    pub status: Option<BookingStatus>,
    pub check_in: Option<NaiveDate>,
    pub check_out: Option<NaiveDate>,
    pub guests: Option<u32>,
    pub notes: Option<String>,
}

impl BookingPatch {
    pub const fn touches_dates(&self) -> bool {
        self.check_in.is_some() || self.check_out.is_some()
    }
}

/// Result of an availability query.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Availability {
    pub available: bool,
    pub conflicting_bookings: usize,
}

impl Availability {
    pub const fn from_conflicts(conflicting_bookings: usize) -> Self {
        Self {
            available: conflicting_bookings == 0,
            conflicting_bookings,
        }
    }
}

/// How much re-validation `update` performs.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BookingUpdatePolicy {
    /// Re-check range, overlap and capacity whenever dates or guests change.
    #[default]
    Strict,
    /// Recompute the price only, as the first release of the API did.
    Legacy,
}

impl FromStr for BookingUpdatePolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "strict" => Ok(Self::Strict),
            "legacy" => Ok(Self::Legacy),
            other => Err(format!("unknown booking update policy: {other}")),
        }
    }
}

/// Normalise guest notes: trim, drop blanks, cap length.
pub fn normalise_notes(notes: Option<String>) -> Result<Option<String>, BookingError> {
    let Some(raw) = notes else {
        return Ok(None);
    };
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }
    if trimmed.chars().count() > NOTES_MAX {
        return Err(BookingError::invalid_input(format!(
            "notes must be at most {NOTES_MAX} characters"
        )));
    }
    Ok(Some(trimmed.to_owned()))
}

/// Failures of the booking workflow.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BookingError {
    #[error("{message}")]
    InvalidInput { message: String },
    #[error("{message}")]
    InvalidDateRange { message: String },
    #[error("{entity} {id} not found")]
    NotFound { entity: &'static str, id: String },
    #[error("apartment is not available for booking")]
    Unavailable,
    #[error("guests ({guests}) exceed the apartment maximum of {max_guests}")]
    CapacityExceeded { guests: u32, max_guests: u32 },
    #[error("apartment is already booked for the selected dates")]
    DateConflict,
    #[error("you do not have access to this booking")]
    Forbidden,
    #[error("cannot move booking from {from} to {to}")]
    InvalidTransition {
        from: BookingStatus,
        to: BookingStatus,
    },
    #[error("booking store failure: {message}")]
    StoreFailure { message: String, connection: bool },
}

impl BookingError {
    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::InvalidInput {
            message: message.into(),
        }
    }

    pub fn invalid_date_range(message: impl Into<String>) -> Self {
        Self::InvalidDateRange {
            message: message.into(),
        }
    }

    pub fn booking_not_found(id: BookingId) -> Self {
        Self::NotFound {
            entity: "booking",
            id: id.to_string(),
        }
    }

    pub fn apartment_not_found(id: ApartmentId) -> Self {
        Self::NotFound {
            entity: "apartment",
            id: id.to_string(),
        }
    }

    /// snake_case name reported as `details.reason`.
    pub const fn reason(&self) -> &'static str {
        match self {
            Self::InvalidInput { .. } => "invalid_input",
            Self::InvalidDateRange { .. } => "invalid_date_range",
            Self::NotFound { .. } => "not_found",
            Self::Unavailable => "unavailable",
            Self::CapacityExceeded { .. } => "capacity_exceeded",
            Self::DateConflict => "date_conflict",
            Self::Forbidden => "forbidden",
            Self::InvalidTransition { .. } => "invalid_transition",
            Self::StoreFailure { .. } => "store_failure",
        }
    }
}

impl From<BookingError> for Error {
    fn from(value: BookingError) -> Self {
        let reason = value.reason();
        let message = value.to_string();
        let error = match &value {
            BookingError::InvalidInput { .. }
            | BookingError::InvalidDateRange { .. }
            | BookingError::Unavailable
            | BookingError::CapacityExceeded { .. }
            | BookingError::DateConflict
            | BookingError::InvalidTransition { .. } => Self::invalid_request(message),
            BookingError::NotFound { .. } => Self::not_found(message),
            BookingError::Forbidden => Self::forbidden(message),
            BookingError::StoreFailure {
                connection: true, ..
            } => Self::service_unavailable(message),
            BookingError::StoreFailure { .. } => Self::internal(message),
        };
        error.with_details(json!({ "reason": reason }))
    }
}
