//! Driving port for booking reads and availability queries.

use async_trait::async_trait;
use chrono::NaiveDate;

use crate::domain::{ApartmentId, Availability, BookingDetails, BookingId, Error, Requester};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait BookingQuery: Send + Sync {
    /// One booking visible to the requester.
    async fn get(&self, requester: &Requester, id: BookingId) -> Result<BookingDetails, Error>;

    /// Every booking; administrators only.
    async fn list_all(&self, requester: &Requester) -> Result<Vec<BookingDetails>, Error>;

    /// The requester's own bookings.
    async fn list_for_user(&self, requester: &Requester) -> Result<Vec<BookingDetails>, Error>;

    /// Whether the range is free of active bookings.
    async fn availability(
        &self,
        apartment_id: ApartmentId,
        check_in: NaiveDate,
        check_out: NaiveDate,
    ) -> Result<Availability, Error>;
}
