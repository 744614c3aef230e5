//! Port for booking persistence, overlap counts and embedded reads.

use async_trait::async_trait;

use crate::domain::{ApartmentId, Booking, BookingDetails, BookingId, StayDates, UserId};

use super::define_port_error;

define_port_error! {
    /// Errors raised by booking repository adapters.
    pub enum BookingRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } => "booking repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "booking repository query failed: {message}",
        /// The write would double-book the apartment.
        Conflict { message: String } => "booking conflicts with an active reservation: {message}",
    }
}

/// Port for the booking store.
///
/// `insert` must be atomic with respect to the overlap rule: adapters
/// re-check active bookings for the apartment in the same unit of work and
/// report `Conflict` instead of writing a double booking.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait BookingRepository: Send + Sync {
    /// Count pending or confirmed bookings of `apartment_id` whose inclusive
    /// range intersects `stay`, ignoring `exclude`.
    async fn count_overlapping(
        &self,
        apartment_id: &ApartmentId,
        stay: &StayDates,
        exclude: Option<BookingId>,
    ) -> Result<usize, BookingRepositoryError>;

    async fn insert(&self, booking: &Booking) -> Result<(), BookingRepositoryError>;

    async fn update(&self, booking: &Booking) -> Result<(), BookingRepositoryError>;

    /// Hard delete; `false` when nothing matched.
    async fn delete(&self, id: &BookingId) -> Result<bool, BookingRepositoryError>;

    async fn find_by_id(&self, id: &BookingId) -> Result<Option<Booking>, BookingRepositoryError>;

    /// One booking with its apartment summary and guest embedded.
    async fn find_details(
        &self,
        id: &BookingId,
    ) -> Result<Option<BookingDetails>, BookingRepositoryError>;

    /// Every booking, newest first, with apartment and guest embedded.
    async fn list_all_details(&self) -> Result<Vec<BookingDetails>, BookingRepositoryError>;

    /// Bookings owned by `user_id`, newest first, with the apartment embedded.
    async fn list_details_for_user(
        &self,
        user_id: &UserId,
    ) -> Result<Vec<BookingDetails>, BookingRepositoryError>;
}
