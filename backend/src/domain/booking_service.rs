//! Booking workflow engine.
//!
//! Each operation runs one linear validation pipeline and stops at the first
//! failing rule. The pure rules live in [`crate::domain::booking`]; this
//! module sequences them around the repository ports and the clock.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::NaiveDate;
use mockable::Clock;
use tracing::{error, info};

use crate::domain::ports::{
    ApartmentRepository, ApartmentRepositoryError, BookingCommand, BookingQuery,
    BookingRepository, BookingRepositoryError,
};
use crate::domain::{
    Apartment, ApartmentId, ApartmentSummary, Availability, Booking, BookingDetails, BookingError,
    BookingId, BookingPatch, BookingRequest, BookingStatus, BookingUpdatePolicy, Error, Requester,
    StayDates, booking::normalise_notes,
};

fn map_booking_store_error(err: BookingRepositoryError) -> BookingError {
    match err {
        BookingRepositoryError::Conflict { .. } => BookingError::DateConflict,
        BookingRepositoryError::Connection { message } => {
            error!(%message, "booking store unavailable");
            BookingError::StoreFailure {
                message,
                connection: true,
            }
        }
        BookingRepositoryError::Query { message } => {
            error!(%message, "booking store query failed");
            BookingError::StoreFailure {
                message,
                connection: false,
            }
        }
    }
}

fn map_apartment_store_error(err: ApartmentRepositoryError) -> BookingError {
    error!(error = %err, "apartment lookup failed during booking workflow");
    let connection = matches!(err, ApartmentRepositoryError::Connection { .. });
    BookingError::StoreFailure {
        message: err.to_string(),
        connection,
    }
}

fn ensure_capacity(guests: u32, apartment: &Apartment) -> Result<(), BookingError> {
    if guests == 0 {
        return Err(BookingError::invalid_input("guests must be at least 1"));
    }
    if guests > apartment.max_guests {
        return Err(BookingError::CapacityExceeded {
            guests,
            max_guests: apartment.max_guests,
        });
    }
    Ok(())
}

/// Booking workflow service implementing [`BookingCommand`] and
/// [`BookingQuery`].
#[derive(Clone)]
pub struct BookingService<B, A> {
    bookings: Arc<B>,
    apartments: Arc<A>,
    clock: Arc<dyn Clock>,
    policy: BookingUpdatePolicy,
}

impl<B, A> BookingService<B, A> {
    /// Create a service with the default (`strict`) update policy.
    pub fn new(bookings: Arc<B>, apartments: Arc<A>, clock: Arc<dyn Clock>) -> Self {
        Self {
            bookings,
            apartments,
            clock,
            policy: BookingUpdatePolicy::default(),
        }
    }

    /// Select how much re-validation `update` performs.
    #[must_use]
    pub fn with_update_policy(mut self, policy: BookingUpdatePolicy) -> Self {
        self.policy = policy;
        self
    }

    fn today(&self) -> NaiveDate {
        self.clock.utc().date_naive()
    }
}

impl<B, A> BookingService<B, A>
where
    B: BookingRepository,
    A: ApartmentRepository,
{
    async fn load_apartment(&self, id: &ApartmentId) -> Result<Apartment, BookingError> {
        self.apartments
            .find_by_id(id)
            .await
            .map_err(map_apartment_store_error)?
            .ok_or_else(|| BookingError::apartment_not_found(*id))
    }

    async fn load_owned(&self, requester: &Requester, id: BookingId) -> Result<Booking, BookingError> {
        let booking = self
            .bookings
            .find_by_id(&id)
            .await
            .map_err(map_booking_store_error)?
            .ok_or_else(|| BookingError::booking_not_found(id))?;
        if !requester.may_access(&booking.user_id) {
            return Err(BookingError::Forbidden);
        }
        Ok(booking)
    }

    async fn load_details(&self, id: BookingId) -> Result<BookingDetails, BookingError> {
        self.bookings
            .find_details(&id)
            .await
            .map_err(map_booking_store_error)?
            .ok_or_else(|| BookingError::booking_not_found(id))
    }

    async fn ensure_no_overlap(
        &self,
        apartment_id: &ApartmentId,
        stay: &StayDates,
        exclude: Option<BookingId>,
    ) -> Result<(), BookingError> {
        let conflicts = self
            .bookings
            .count_overlapping(apartment_id, stay, exclude)
            .await
            .map_err(map_booking_store_error)?;
        if conflicts > 0 {
            return Err(BookingError::DateConflict);
        }
        Ok(())
    }

    /// Validate a request and persist it as a pending booking.
    pub async fn create_booking(
        &self,
        requester: &Requester,
        request: BookingRequest,
    ) -> Result<BookingDetails, BookingError> {
        if request.guests == 0 {
            return Err(BookingError::invalid_input("guests must be at least 1"));
        }
        let notes = normalise_notes(request.notes)?;

        if request.check_in < self.today() {
            return Err(BookingError::invalid_date_range(
                "check-in date cannot be in the past",
            ));
        }
        let stay = StayDates::new(request.check_in, request.check_out)?;

        let apartment = self.load_apartment(&request.apartment_id).await?;
        if !apartment.is_available {
            return Err(BookingError::Unavailable);
        }
        ensure_capacity(request.guests, &apartment)?;
        self.ensure_no_overlap(&apartment.id, &stay, None).await?;

        let total_price = stay.total_price(apartment.price_per_night)?;
        let now = self.clock.utc();
        let booking = Booking {
            id: BookingId::random(),
            user_id: requester.user_id,
            apartment_id: apartment.id,
            stay,
            guests: request.guests,
            total_price,
            status: BookingStatus::Pending,
            notes,
            created_at: now,
            updated_at: now,
        };
        self.bookings
            .insert(&booking)
            .await
            .map_err(map_booking_store_error)?;

        info!(
            booking_id = %booking.id,
            apartment_id = %booking.apartment_id,
            user_id = %booking.user_id,
            nights = booking.stay.nights(),
            total_price = booking.total_price,
            "booking created"
        );
        Ok(BookingDetails {
            apartment: Some(ApartmentSummary::from(&apartment)),
            guest: None,
            booking,
        })
    }

    /// Apply a partial update under the configured policy.
    pub async fn update_booking(
        &self,
        requester: &Requester,
        id: BookingId,
        patch: BookingPatch,
    ) -> Result<BookingDetails, BookingError> {
        let current = self.load_owned(requester, id).await?;
        self.apply_patch(requester, current, patch).await
    }

    async fn apply_patch(
        &self,
        requester: &Requester,
        current: Booking,
        mut patch: BookingPatch,
    ) -> Result<BookingDetails, BookingError> {
        let strict = self.policy == BookingUpdatePolicy::Strict;
        let mut next = current.clone();

        if let Some(status) = patch.status.filter(|status| *status != current.status) {
            if status != BookingStatus::Cancelled && !requester.is_privileged() {
                return Err(BookingError::Forbidden);
            }
            next.status = current.status.transition_to(status)?;
        }

        // Blank notes leave the stored text alone.
        if let Some(notes) = normalise_notes(patch.notes.take())? {
            next.notes = Some(notes);
        }

        let guests_changed = patch.guests.is_some_and(|guests| guests != current.guests);
        if let Some(guests) = patch.guests {
            if guests == 0 {
                return Err(BookingError::invalid_input("guests must be at least 1"));
            }
            next.guests = guests;
        }

        let dates_changed = patch.touches_dates();
        if dates_changed || (strict && guests_changed) {
            let apartment = self.load_apartment(&current.apartment_id).await?;
            if dates_changed {
                let stay = StayDates::new(
                    patch.check_in.unwrap_or(current.stay.check_in()),
                    patch.check_out.unwrap_or(current.stay.check_out()),
                )?;
                if strict && next.status.is_active() {
                    self.ensure_no_overlap(&current.apartment_id, &stay, Some(current.id))
                        .await?;
                }
                next.total_price = stay.total_price(apartment.price_per_night)?;
                next.stay = stay;
            }
            if strict && guests_changed {
                ensure_capacity(next.guests, &apartment)?;
            }
        }

        next.updated_at = self.clock.utc();
        self.bookings
            .update(&next)
            .await
            .map_err(map_booking_store_error)?;

        info!(
            booking_id = %next.id,
            from = %current.status,
            to = %next.status,
            repriced = dates_changed,
            "booking updated"
        );
        self.load_details(next.id).await
    }

    /// Move a booking to `cancelled`.
    pub async fn cancel_booking(
        &self,
        requester: &Requester,
        id: BookingId,
    ) -> Result<BookingDetails, BookingError> {
        let current = self.load_owned(requester, id).await?;
        current.status.transition_to(BookingStatus::Cancelled)?;
        let patch = BookingPatch {
            status: Some(BookingStatus::Cancelled),
            ..BookingPatch::default()
        };
        let details = self.apply_patch(requester, current, patch).await?;
        info!(booking_id = %id, user_id = %requester.user_id, "booking cancelled");
        Ok(details)
    }

    /// Hard delete a booking; administrators only.
    pub async fn delete_booking(
        &self,
        requester: &Requester,
        id: BookingId,
    ) -> Result<(), BookingError> {
        if !requester.is_privileged() {
            return Err(BookingError::Forbidden);
        }
        let removed = self
            .bookings
            .delete(&id)
            .await
            .map_err(map_booking_store_error)?;
        if !removed {
            return Err(BookingError::booking_not_found(id));
        }
        info!(booking_id = %id, "booking deleted");
        Ok(())
    }

    pub async fn get_booking(
        &self,
        requester: &Requester,
        id: BookingId,
    ) -> Result<BookingDetails, BookingError> {
        let details = self.load_details(id).await?;
        if !requester.may_access(&details.booking.user_id) {
            return Err(BookingError::Forbidden);
        }
        Ok(details)
    }

    pub async fn list_all_bookings(
        &self,
        requester: &Requester,
    ) -> Result<Vec<BookingDetails>, BookingError> {
        if !requester.is_privileged() {
            return Err(BookingError::Forbidden);
        }
        self.bookings
            .list_all_details()
            .await
            .map_err(map_booking_store_error)
    }

    pub async fn list_bookings_for(
        &self,
        requester: &Requester,
    ) -> Result<Vec<BookingDetails>, BookingError> {
        self.bookings
            .list_details_for_user(&requester.user_id)
            .await
            .map_err(map_booking_store_error)
    }

    /// Count active bookings overlapping the requested range.
    pub async fn check_availability(
        &self,
        apartment_id: ApartmentId,
        check_in: NaiveDate,
        check_out: NaiveDate,
    ) -> Result<Availability, BookingError> {
        let stay = StayDates::new(check_in, check_out)?;
        let conflicts = self
            .bookings
            .count_overlapping(&apartment_id, &stay, None)
            .await
            .map_err(map_booking_store_error)?;
        Ok(Availability::from_conflicts(conflicts))
    }
}

#[async_trait]
impl<B, A> BookingCommand for BookingService<B, A>
where
    B: BookingRepository,
    A: ApartmentRepository,
{
    async fn create(
        &self,
        requester: &Requester,
        request: BookingRequest,
    ) -> Result<BookingDetails, Error> {
        Ok(self.create_booking(requester, request).await?)
    }

    async fn update(
        &self,
        requester: &Requester,
        id: BookingId,
        patch: BookingPatch,
    ) -> Result<BookingDetails, Error> {
        Ok(self.update_booking(requester, id, patch).await?)
    }

    async fn cancel(&self, requester: &Requester, id: BookingId) -> Result<BookingDetails, Error> {
        Ok(self.cancel_booking(requester, id).await?)
    }

    async fn delete(&self, requester: &Requester, id: BookingId) -> Result<(), Error> {
        Ok(self.delete_booking(requester, id).await?)
    }
}

#[async_trait]
impl<B, A> BookingQuery for BookingService<B, A>
where
    B: BookingRepository,
    A: ApartmentRepository,
{
    async fn get(&self, requester: &Requester, id: BookingId) -> Result<BookingDetails, Error> {
        Ok(self.get_booking(requester, id).await?)
    }

    async fn list_all(&self, requester: &Requester) -> Result<Vec<BookingDetails>, Error> {
        Ok(self.list_all_bookings(requester).await?)
    }

    async fn list_for_user(&self, requester: &Requester) -> Result<Vec<BookingDetails>, Error> {
        Ok(self.list_bookings_for(requester).await?)
    }

    async fn availability(
        &self,
        apartment_id: ApartmentId,
        check_in: NaiveDate,
        check_out: NaiveDate,
    ) -> Result<Availability, Error> {
        Ok(self
            .check_availability(apartment_id, check_in, check_out)
            .await?)
    }
}

#[cfg(test)]
#[path = "booking_service_tests.rs"]
mod tests;
