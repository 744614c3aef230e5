//! Driving port for booking mutations.
//!
//! Inbound adapters call this port with an authenticated [`Requester`]; the
//! implementation owns every workflow rule.

use async_trait::async_trait;

use crate::domain::{BookingDetails, BookingId, BookingPatch, BookingRequest, Error, Requester};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait BookingCommand: Send + Sync {
    /// Validate and persist a new pending booking.
    async fn create(
        &self,
        requester: &Requester,
        request: BookingRequest,
    ) -> Result<BookingDetails, Error>;

    /// Apply a partial update.
    async fn update(
        &self,
        requester: &Requester,
        id: BookingId,
        patch: BookingPatch,
    ) -> Result<BookingDetails, Error>;

    /// Move the booking to `cancelled`.
    async fn cancel(&self, requester: &Requester, id: BookingId) -> Result<BookingDetails, Error>;

    /// Hard delete; administrators only.
    async fn delete(&self, requester: &Requester, id: BookingId) -> Result<(), Error>;
}
