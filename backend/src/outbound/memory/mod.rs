//! In-process store implementing the repository ports.
//!
//! Used when no `DATABASE_URL` is configured and by the HTTP tests. All
//! tables sit behind one async mutex. Booking inserts and updates re-check
//! overlaps under that lock, so no write can leave two active bookings on
//! the same dates.

use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::domain::ports::{
    ApartmentRepository, ApartmentRepositoryError, BookingRepository, BookingRepositoryError,
    StoredAccount, UserPersistenceError, UserRepository,
};
use crate::domain::{
    Apartment, ApartmentFilter, ApartmentId, ApartmentSummary, Booking, BookingDetails,
    BookingId, GuestSummary, StayDates, User, UserId,
};

#[derive(Debug, Default)]
struct Tables {
    users: Vec<StoredAccount>,
    apartments: Vec<Apartment>,
    bookings: Vec<Booking>,
}

impl Tables {
    fn user(&self, id: &UserId) -> Option<&User> {
        self.users
            .iter()
            .map(|account| &account.user)
            .find(|user| user.id == *id)
    }

    fn apartment(&self, id: &ApartmentId) -> Option<&Apartment> {
        self.apartments.iter().find(|apartment| apartment.id == *id)
    }

    fn email_taken(&self, email: &str, except: Option<UserId>) -> bool {
        self.users.iter().any(|account| {
            Some(account.user.id) != except && account.user.email.as_ref() == email
        })
    }

    fn overlapping(
        &self,
        apartment_id: &ApartmentId,
        stay: &StayDates,
        exclude: Option<BookingId>,
    ) -> usize {
        self.bookings
            .iter()
            .filter(|booking| booking.apartment_id == *apartment_id)
            .filter(|booking| Some(booking.id) != exclude)
            .filter(|booking| booking.status.is_active() && booking.stay.overlaps(stay))
            .count()
    }

    fn details(&self, booking: &Booking, with_guest: bool) -> BookingDetails {
        let guest = if with_guest {
            self.user(&booking.user_id).map(GuestSummary::from)
        } else {
            None
        };
        BookingDetails {
            booking: booking.clone(),
            apartment: self
                .apartment(&booking.apartment_id)
                .map(ApartmentSummary::from),
            guest,
        }
    }

    /// Bookings newest first; later inserts win ties.
    fn bookings_newest_first(&self, keep: impl Fn(&Booking) -> bool) -> Vec<&Booking> {
        let mut rows: Vec<&Booking> = self
            .bookings
            .iter()
            .rev()
            .filter(|booking| keep(*booking))
            .collect();
        rows.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        rows
    }
}

/// Shared in-memory tables. Clones share state.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    tables: Arc<Mutex<Tables>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserRepository for MemoryStore {
    async fn insert(&self, user: &User, password_hash: &str) -> Result<(), UserPersistenceError> {
        let mut tables = self.tables.lock().await;
        if tables.email_taken(user.email.as_ref(), None) {
            return Err(UserPersistenceError::duplicate_email(user.email.as_ref()));
        }
        tables.users.push(StoredAccount {
            user: user.clone(),
            password_hash: password_hash.to_owned(),
        });
        Ok(())
    }

    async fn update(&self, user: &User) -> Result<(), UserPersistenceError> {
        let mut tables = self.tables.lock().await;
        if tables.email_taken(user.email.as_ref(), Some(user.id)) {
            return Err(UserPersistenceError::duplicate_email(user.email.as_ref()));
        }
        if let Some(account) = tables
            .users
            .iter_mut()
            .find(|account| account.user.id == user.id)
        {
            account.user = user.clone();
        }
        Ok(())
    }

    async fn delete(&self, id: &UserId) -> Result<bool, UserPersistenceError> {
        let mut tables = self.tables.lock().await;
        if tables.bookings.iter().any(|booking| booking.user_id == *id) {
            return Err(UserPersistenceError::in_use("bookings reference this user"));
        }
        let before = tables.users.len();
        tables.users.retain(|account| account.user.id != *id);
        Ok(tables.users.len() < before)
    }

    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, UserPersistenceError> {
        Ok(self.tables.lock().await.user(id).cloned())
    }

    async fn find_account_by_email(
        &self,
        email: &str,
    ) -> Result<Option<StoredAccount>, UserPersistenceError> {
        let wanted = email.trim().to_lowercase();
        let tables = self.tables.lock().await;
        Ok(tables
            .users
            .iter()
            .find(|account| account.user.email.as_ref() == wanted)
            .cloned())
    }

    async fn list(&self) -> Result<Vec<User>, UserPersistenceError> {
        let tables = self.tables.lock().await;
        let mut users: Vec<User> = tables
            .users
            .iter()
            .rev()
            .map(|account| account.user.clone())
            .collect();
        users.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(users)
    }
}

#[async_trait]
impl ApartmentRepository for MemoryStore {
    async fn insert(&self, apartment: &Apartment) -> Result<(), ApartmentRepositoryError> {
        self.tables.lock().await.apartments.push(apartment.clone());
        Ok(())
    }

    async fn update(&self, apartment: &Apartment) -> Result<(), ApartmentRepositoryError> {
        let mut tables = self.tables.lock().await;
        if let Some(stored) = tables
            .apartments
            .iter_mut()
            .find(|stored| stored.id == apartment.id)
        {
            *stored = apartment.clone();
        }
        Ok(())
    }

    async fn delete(&self, id: &ApartmentId) -> Result<bool, ApartmentRepositoryError> {
        let mut tables = self.tables.lock().await;
        if tables.bookings.iter().any(|booking| booking.apartment_id == *id) {
            return Err(ApartmentRepositoryError::in_use(
                "bookings reference this apartment",
            ));
        }
        let before = tables.apartments.len();
        tables.apartments.retain(|apartment| apartment.id != *id);
        Ok(tables.apartments.len() < before)
    }

    async fn find_by_id(
        &self,
        id: &ApartmentId,
    ) -> Result<Option<Apartment>, ApartmentRepositoryError> {
        Ok(self.tables.lock().await.apartment(id).cloned())
    }

    async fn list(
        &self,
        filter: &ApartmentFilter,
    ) -> Result<Vec<Apartment>, ApartmentRepositoryError> {
        let tables = self.tables.lock().await;
        let mut apartments: Vec<Apartment> = tables
            .apartments
            .iter()
            .rev()
            .filter(|apartment| filter.matches(apartment))
            .cloned()
            .collect();
        apartments.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(apartments)
    }
}

#[async_trait]
impl BookingRepository for MemoryStore {
    async fn count_overlapping(
        &self,
        apartment_id: &ApartmentId,
        stay: &StayDates,
        exclude: Option<BookingId>,
    ) -> Result<usize, BookingRepositoryError> {
        Ok(self
            .tables
            .lock()
            .await
            .overlapping(apartment_id, stay, exclude))
    }

    async fn insert(&self, booking: &Booking) -> Result<(), BookingRepositoryError> {
        let mut tables = self.tables.lock().await;
        if booking.status.is_active()
            && tables.overlapping(&booking.apartment_id, &booking.stay, None) > 0
        {
            return Err(BookingRepositoryError::conflict(
                "apartment is already booked for these dates",
            ));
        }
        tables.bookings.push(booking.clone());
        Ok(())
    }

    async fn update(&self, booking: &Booking) -> Result<(), BookingRepositoryError> {
        let mut tables = self.tables.lock().await;
        if booking.status.is_active()
            && tables.overlapping(&booking.apartment_id, &booking.stay, Some(booking.id)) > 0
        {
            return Err(BookingRepositoryError::conflict(
                "apartment is already booked for these dates",
            ));
        }
        if let Some(stored) = tables
            .bookings
            .iter_mut()
            .find(|stored| stored.id == booking.id)
        {
            *stored = booking.clone();
        }
        Ok(())
    }

    async fn delete(&self, id: &BookingId) -> Result<bool, BookingRepositoryError> {
        let mut tables = self.tables.lock().await;
        let before = tables.bookings.len();
        tables.bookings.retain(|booking| booking.id != *id);
        Ok(tables.bookings.len() < before)
    }

    async fn find_by_id(&self, id: &BookingId) -> Result<Option<Booking>, BookingRepositoryError> {
        let tables = self.tables.lock().await;
        Ok(tables
            .bookings
            .iter()
            .find(|booking| booking.id == *id)
            .cloned())
    }

    async fn find_details(
        &self,
        id: &BookingId,
    ) -> Result<Option<BookingDetails>, BookingRepositoryError> {
        let tables = self.tables.lock().await;
        Ok(tables
            .bookings
            .iter()
            .find(|booking| booking.id == *id)
            .map(|booking| tables.details(booking, true)))
    }

    async fn list_all_details(&self) -> Result<Vec<BookingDetails>, BookingRepositoryError> {
        let tables = self.tables.lock().await;
        Ok(tables
            .bookings_newest_first(|_| true)
            .into_iter()
            .map(|booking| tables.details(booking, true))
            .collect())
    }

    async fn list_details_for_user(
        &self,
        user_id: &UserId,
    ) -> Result<Vec<BookingDetails>, BookingRepositoryError> {
        let tables = self.tables.lock().await;
        let owner = *user_id;
        Ok(tables
            .bookings_newest_first(move |booking| booking.user_id == owner)
            .into_iter()
            .map(|booking| tables.details(booking, false))
            .collect())
    }
}

#[cfg(test)]
mod tests;
