//! PostgreSQL-backed `BookingRepository`.
//!
//! Inserts run in a SERIALIZABLE transaction that re-counts overlapping
//! active bookings before writing. The `bookings_no_overlap` exclusion
//! constraint backs this up; either failure surfaces as
//! [`BookingRepositoryError::Conflict`].

use std::collections::HashMap;

use async_trait::async_trait;
use diesel::pg::Pg;
use diesel::prelude::*;
use diesel_async::scoped_futures::ScopedFutureExt;
use diesel_async::{AsyncPgConnection, RunQueryDsl};
use uuid::Uuid;

use crate::domain::ports::{BookingRepository, BookingRepositoryError};
use crate::domain::{
    ApartmentId, Booking, BookingDetails, BookingId, BookingStatus, StayDates, UserId,
};

use super::diesel_basic_error_mapping::{
    ConstraintFailure, classify_database_error, map_basic_diesel_error, map_basic_pool_error,
};
use super::mapping::{
    booking_from_row, booking_update, guest_from_row, new_booking_row, summary_from_row,
};
use super::models::{ApartmentRow, BookingRow, UserRow};
use super::pool::{DbPool, PoolError};
use super::schema::{apartment_images, apartments, bookings, users};

const OVERLAP_MESSAGE: &str = "apartment is already booked for these dates";

/// Diesel implementation of [`BookingRepository`].
#[derive(Clone)]
pub struct DieselBookingRepository {
    pool: DbPool,
}

impl DieselBookingRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> BookingRepositoryError {
    map_basic_pool_error(error, BookingRepositoryError::connection)
}

fn map_diesel_error(error: diesel::result::Error) -> BookingRepositoryError {
    match classify_database_error(&error) {
        Some(ConstraintFailure::Overlap) => BookingRepositoryError::conflict(OVERLAP_MESSAGE),
        _ => map_basic_diesel_error(
            error,
            BookingRepositoryError::query,
            BookingRepositoryError::connection,
        ),
    }
}

fn query_error(err: impl ToString) -> BookingRepositoryError {
    BookingRepositoryError::query(err.to_string())
}

/// Outcome of the guarded insert transaction.
enum InsertFailure {
    Overlap,
    Database(diesel::result::Error),
}

impl From<diesel::result::Error> for InsertFailure {
    fn from(value: diesel::result::Error) -> Self {
        Self::Database(value)
    }
}

/// Count active bookings whose inclusive range touches `stay`.
async fn overlapping_count(
    conn: &mut AsyncPgConnection,
    apartment_id: Uuid,
    stay: StayDates,
    exclude: Option<Uuid>,
) -> QueryResult<i64> {
    let active: Vec<&str> = BookingStatus::ACTIVE.iter().map(|s| s.as_str()).collect();
    let mut query = bookings::table
        .select(diesel::dsl::count_star())
        .filter(bookings::apartment_id.eq(apartment_id))
        .filter(bookings::status.eq_any(active))
        .filter(bookings::check_in.le(stay.check_out()))
        .filter(bookings::check_out.ge(stay.check_in()))
        .into_boxed::<Pg>();
    if let Some(excluded) = exclude {
        query = query.filter(bookings::id.ne(excluded));
    }
    query.get_result(conn).await
}

/// Main image URL per apartment.
async fn main_images(
    conn: &mut AsyncPgConnection,
    apartment_ids: &[Uuid],
) -> QueryResult<HashMap<Uuid, String>> {
    let rows: Vec<(Uuid, String)> = apartment_images::table
        .filter(apartment_images::apartment_id.eq_any(apartment_ids))
        .filter(apartment_images::is_main.eq(true))
        .select((apartment_images::apartment_id, apartment_images::image_url))
        .load(conn)
        .await?;
    Ok(rows.into_iter().collect())
}

fn details_from_rows(
    booking: BookingRow,
    apartment: &ApartmentRow,
    guest: Option<UserRow>,
    images: &HashMap<Uuid, String>,
) -> Result<BookingDetails, BookingRepositoryError> {
    let summary = summary_from_row(apartment, images.get(&apartment.id).cloned())
        .map_err(query_error)?;
    let guest = guest
        .map(guest_from_row)
        .transpose()
        .map_err(query_error)?;
    Ok(BookingDetails {
        booking: booking_from_row(booking).map_err(query_error)?,
        apartment: Some(summary),
        guest,
    })
}

impl DieselBookingRepository {
    async fn load_full_details(
        &self,
        only: Option<Uuid>,
    ) -> Result<Vec<BookingDetails>, BookingRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let mut query = bookings::table
            .inner_join(apartments::table)
            .inner_join(users::table)
            .select((
                BookingRow::as_select(),
                ApartmentRow::as_select(),
                UserRow::as_select(),
            ))
            .order(bookings::created_at.desc())
            .into_boxed::<Pg>();
        if let Some(id) = only {
            query = query.filter(bookings::id.eq(id));
        }
        let rows: Vec<(BookingRow, ApartmentRow, UserRow)> =
            query.load(&mut conn).await.map_err(map_diesel_error)?;

        let ids: Vec<Uuid> = rows.iter().map(|(_, apartment, _)| apartment.id).collect();
        let images = main_images(&mut conn, &ids)
            .await
            .map_err(map_diesel_error)?;
        rows.into_iter()
            .map(|(booking, apartment, guest)| {
                details_from_rows(booking, &apartment, Some(guest), &images)
            })
            .collect()
    }
}

#[async_trait]
impl BookingRepository for DieselBookingRepository {
    async fn count_overlapping(
        &self,
        apartment_id: &ApartmentId,
        stay: &StayDates,
        exclude: Option<BookingId>,
    ) -> Result<usize, BookingRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let count = overlapping_count(
            &mut conn,
            *apartment_id.as_uuid(),
            *stay,
            exclude.map(|id| *id.as_uuid()),
        )
        .await
        .map_err(map_diesel_error)?;
        usize::try_from(count).map_err(query_error)
    }

    async fn insert(&self, booking: &Booking) -> Result<(), BookingRepositoryError> {
        let row = new_booking_row(booking).map_err(query_error)?;
        let apartment_id = *booking.apartment_id.as_uuid();
        let stay = booking.stay;
        let guarded = booking.status.is_active();
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        conn.build_transaction()
            .serializable()
            .run(|conn| {
                async move {
                    if guarded && overlapping_count(conn, apartment_id, stay, None).await? > 0 {
                        return Err(InsertFailure::Overlap);
                    }
                    diesel::insert_into(bookings::table)
                        .values(&row)
                        .execute(conn)
                        .await?;
                    Ok(())
                }
                .scope_boxed()
            })
            .await
            .map_err(|failure| match failure {
                InsertFailure::Overlap => BookingRepositoryError::conflict(OVERLAP_MESSAGE),
                InsertFailure::Database(err) => map_diesel_error(err),
            })
    }

    async fn update(&self, booking: &Booking) -> Result<(), BookingRepositoryError> {
        let changes = booking_update(booking).map_err(query_error)?;
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        diesel::update(bookings::table.find(booking.id.as_uuid()))
            .set(&changes)
            .execute(&mut conn)
            .await
            .map(|_| ())
            .map_err(map_diesel_error)
    }

    async fn delete(&self, id: &BookingId) -> Result<bool, BookingRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let removed = diesel::delete(bookings::table.find(id.as_uuid()))
            .execute(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(removed > 0)
    }

    async fn find_by_id(&self, id: &BookingId) -> Result<Option<Booking>, BookingRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row = bookings::table
            .find(id.as_uuid())
            .select(BookingRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;
        row.map(booking_from_row).transpose().map_err(query_error)
    }

    async fn find_details(
        &self,
        id: &BookingId,
    ) -> Result<Option<BookingDetails>, BookingRepositoryError> {
        let mut details = self.load_full_details(Some(*id.as_uuid())).await?;
        Ok(details.pop())
    }

    async fn list_all_details(&self) -> Result<Vec<BookingDetails>, BookingRepositoryError> {
        self.load_full_details(None).await
    }

    async fn list_details_for_user(
        &self,
        user_id: &UserId,
    ) -> Result<Vec<BookingDetails>, BookingRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let rows: Vec<(BookingRow, ApartmentRow)> = bookings::table
            .inner_join(apartments::table)
            .filter(bookings::user_id.eq(user_id.as_uuid()))
            .select((BookingRow::as_select(), ApartmentRow::as_select()))
            .order(bookings::created_at.desc())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        let ids: Vec<Uuid> = rows.iter().map(|(_, apartment)| apartment.id).collect();
        let images = main_images(&mut conn, &ids)
            .await
            .map_err(map_diesel_error)?;
        rows.into_iter()
            .map(|(booking, apartment)| details_from_rows(booking, &apartment, None, &images))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use diesel::result::{DatabaseErrorInformation, DatabaseErrorKind};
    use rstest::rstest;

    use super::*;

    struct ConstraintInfo(Option<&'static str>);

    impl DatabaseErrorInformation for ConstraintInfo {
        fn message(&self) -> &str {
            "constraint violated"
        }
        fn details(&self) -> Option<&str> {
            None
        }
        fn hint(&self) -> Option<&str> {
            None
        }
        fn table_name(&self) -> Option<&str> {
            Some("bookings")
        }
        fn column_name(&self) -> Option<&str> {
            None
        }
        fn constraint_name(&self) -> Option<&str> {
            self.0
        }
        fn statement_position(&self) -> Option<i32> {
            None
        }
    }

    fn database_error(kind: DatabaseErrorKind, constraint: Option<&'static str>) -> diesel::result::Error {
        diesel::result::Error::DatabaseError(kind, Box::new(ConstraintInfo(constraint)))
    }

    #[rstest]
    #[case(database_error(DatabaseErrorKind::Unknown, Some("bookings_no_overlap")))]
    #[case(database_error(DatabaseErrorKind::SerializationFailure, None))]
    fn overlap_failures_become_conflicts(#[case] error: diesel::result::Error) {
        assert!(matches!(
            map_diesel_error(error),
            BookingRepositoryError::Conflict { .. }
        ));
    }

    #[rstest]
    fn other_database_failures_are_query_errors() {
        let error = database_error(DatabaseErrorKind::CheckViolation, Some("bookings_guests_check"));
        assert!(matches!(
            map_diesel_error(error),
            BookingRepositoryError::Query { .. }
        ));
    }
}
