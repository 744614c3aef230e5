//! PostgreSQL-backed `ApartmentRepository`.
//!
//! Listings and their images are written in one transaction; reads fetch the
//! image rows with a second query and stitch them on in `mapping`.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::scoped_futures::ScopedFutureExt;
use diesel_async::{AsyncConnection, AsyncPgConnection, RunQueryDsl};
use uuid::Uuid;

use crate::domain::ports::{ApartmentRepository, ApartmentRepositoryError};
use crate::domain::{Apartment, ApartmentFilter, ApartmentId};

use super::diesel_basic_error_mapping::{
    ConstraintFailure, classify_database_error, map_basic_diesel_error, map_basic_pool_error,
};
use super::mapping::{apartment_from_rows, apartment_write, images_by_apartment, new_image_rows};
use super::models::{ApartmentImageRow, ApartmentRow};
use super::pool::{DbPool, PoolError};
use super::schema::{apartment_images, apartments};

/// Diesel implementation of [`ApartmentRepository`].
#[derive(Clone)]
pub struct DieselApartmentRepository {
    pool: DbPool,
}

impl DieselApartmentRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> ApartmentRepositoryError {
    map_basic_pool_error(error, ApartmentRepositoryError::connection)
}

fn map_diesel_error(error: diesel::result::Error) -> ApartmentRepositoryError {
    map_basic_diesel_error(
        error,
        ApartmentRepositoryError::query,
        ApartmentRepositoryError::connection,
    )
}

fn query_error(err: impl ToString) -> ApartmentRepositoryError {
    ApartmentRepositoryError::query(err.to_string())
}

async fn load_images(
    conn: &mut AsyncPgConnection,
    ids: &[Uuid],
) -> Result<Vec<ApartmentImageRow>, diesel::result::Error> {
    apartment_images::table
        .filter(apartment_images::apartment_id.eq_any(ids))
        .order((apartment_images::apartment_id, apartment_images::position))
        .select(ApartmentImageRow::as_select())
        .load(conn)
        .await
}

fn assemble(
    rows: Vec<ApartmentRow>,
    images: Vec<ApartmentImageRow>,
) -> Result<Vec<Apartment>, ApartmentRepositoryError> {
    let mut grouped = images_by_apartment(images);
    rows.into_iter()
        .map(|row| {
            let images = grouped.remove(&row.id).unwrap_or_default();
            apartment_from_rows(row, images).map_err(query_error)
        })
        .collect()
}

#[async_trait]
impl ApartmentRepository for DieselApartmentRepository {
    async fn insert(&self, apartment: &Apartment) -> Result<(), ApartmentRepositoryError> {
        let row = apartment_write(apartment).map_err(query_error)?;
        let images = new_image_rows(apartment).map_err(query_error)?;
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        conn.transaction(|conn| {
            async move {
                diesel::insert_into(apartments::table)
                    .values(&row)
                    .execute(conn)
                    .await?;
                if !images.is_empty() {
                    diesel::insert_into(apartment_images::table)
                        .values(&images)
                        .execute(conn)
                        .await?;
                }
                Ok(())
            }
            .scope_boxed()
        })
        .await
        .map_err(map_diesel_error)
    }

    async fn update(&self, apartment: &Apartment) -> Result<(), ApartmentRepositoryError> {
        let row = apartment_write(apartment).map_err(query_error)?;
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        diesel::update(apartments::table.find(apartment.id.as_uuid()))
            .set(&row)
            .execute(&mut conn)
            .await
            .map(|_| ())
            .map_err(map_diesel_error)
    }

    async fn delete(&self, id: &ApartmentId) -> Result<bool, ApartmentRepositoryError> {
        let apartment_id = *id.as_uuid();
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let removed = conn
            .transaction(|conn| {
                async move {
                    diesel::delete(
                        apartment_images::table
                            .filter(apartment_images::apartment_id.eq(apartment_id)),
                    )
                    .execute(conn)
                    .await?;
                    diesel::delete(apartments::table.find(apartment_id))
                        .execute(conn)
                        .await
                }
                .scope_boxed()
            })
            .await
            .map_err(|err| match classify_database_error(&err) {
                Some(ConstraintFailure::ForeignKey) => {
                    ApartmentRepositoryError::in_use("bookings reference this apartment")
                }
                _ => map_diesel_error(err),
            })?;
        Ok(removed > 0)
    }

    async fn find_by_id(
        &self,
        id: &ApartmentId,
    ) -> Result<Option<Apartment>, ApartmentRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let Some(row) = apartments::table
            .find(id.as_uuid())
            .select(ApartmentRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?
        else {
            return Ok(None);
        };
        let images = load_images(&mut conn, &[row.id])
            .await
            .map_err(map_diesel_error)?;
        apartment_from_rows(row, images)
            .map(Some)
            .map_err(query_error)
    }

    async fn list(
        &self,
        filter: &ApartmentFilter,
    ) -> Result<Vec<Apartment>, ApartmentRepositoryError> {
        let mut query = apartments::table
            .filter(apartments::is_available.eq(true))
            .into_boxed();
        if let Some(bedrooms) = filter.bedrooms() {
            query = query.filter(apartments::bedrooms.eq(i16::from(u8::from(bedrooms))));
        }
        if let Some(min) = filter.min_price() {
            let min = i64::try_from(min).unwrap_or(i64::MAX);
            query = query.filter(apartments::price_per_night.ge(min));
        }
        if let Some(max) = filter.max_price() {
            let max = i64::try_from(max).unwrap_or(i64::MAX);
            query = query.filter(apartments::price_per_night.le(max));
        }

        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let rows: Vec<ApartmentRow> = query
            .order(apartments::created_at.desc())
            .select(ApartmentRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        let ids: Vec<Uuid> = rows.iter().map(|row| row.id).collect();
        let images = load_images(&mut conn, &ids)
            .await
            .map_err(map_diesel_error)?;
        assemble(rows, images)
    }
}
