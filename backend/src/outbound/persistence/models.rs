//! Internal Diesel row structs for database operations.
//!
//! These types are implementation details of the persistence layer and must
//! never be exposed to the domain. Conversions live in `mapping.rs`.

use chrono::{DateTime, NaiveDate, Utc};
use diesel::prelude::*;
use uuid::Uuid;

use super::schema::{apartment_images, apartments, bookings, users};

// ---------------------------------------------------------------------------
// Users
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = users)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct UserRow {
    pub id: Uuid,
    pub email: String,
    pub password_hash: String,
    pub full_name: String,
    pub phone: Option<String>,
    pub role: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = users)]
pub(crate) struct NewUserRow<'a> {
    pub id: Uuid,
    pub email: &'a str,
    pub password_hash: &'a str,
    pub full_name: &'a str,
    pub phone: Option<&'a str>,
    pub role: &'a str,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Profile changeset. `phone` is written even when `None`.
#[derive(Debug, Clone, AsChangeset)]
#[diesel(table_name = users)]
#[diesel(treat_none_as_null = true)]
pub(crate) struct UserUpdate<'a> {
    pub email: &'a str,
    pub full_name: &'a str,
    pub phone: Option<&'a str>,
    pub updated_at: DateTime<Utc>,
}

// ---------------------------------------------------------------------------
// Apartments
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = apartments)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct ApartmentRow {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub bedrooms: i16,
    pub bathrooms: i16,
    pub max_guests: i32,
    pub price_per_night: i64,
    pub address: String,
    pub city: String,
    pub country: String,
    pub square_meters: i32,
    pub amenities: Vec<String>,
    pub is_available: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Used for both inserts and full-row updates.
#[derive(Debug, Clone, Insertable, AsChangeset)]
#[diesel(table_name = apartments)]
pub(crate) struct ApartmentWrite<'a> {
    pub id: Uuid,
    pub title: &'a str,
    pub description: &'a str,
    pub bedrooms: i16,
    pub bathrooms: i16,
    pub max_guests: i32,
    pub price_per_night: i64,
    pub address: &'a str,
    pub city: &'a str,
    pub country: &'a str,
    pub square_meters: i32,
    pub amenities: &'a [String],
    pub is_available: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = apartment_images)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct ApartmentImageRow {
    pub apartment_id: Uuid,
    pub image_url: String,
    pub is_main: bool,
    pub position: i32,
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = apartment_images)]
pub(crate) struct NewApartmentImageRow<'a> {
    pub id: Uuid,
    pub apartment_id: Uuid,
    pub image_url: &'a str,
    pub is_main: bool,
    pub position: i32,
}

// ---------------------------------------------------------------------------
// Bookings
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = bookings)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct BookingRow {
    pub id: Uuid,
    pub user_id: Uuid,
    pub apartment_id: Uuid,
    pub check_in: NaiveDate,
    pub check_out: NaiveDate,
    pub guests: i32,
    pub total_price: i64,
    pub status: String,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = bookings)]
pub(crate) struct NewBookingRow<'a> {
    pub id: Uuid,
    pub user_id: Uuid,
    pub apartment_id: Uuid,
    pub check_in: NaiveDate,
    pub check_out: NaiveDate,
    pub guests: i32,
    pub total_price: i64,
    pub status: &'a str,
    pub notes: Option<&'a str>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Mutable booking columns. `notes` is cleared when `None`.
#[derive(Debug, Clone, AsChangeset)]
#[diesel(table_name = bookings)]
#[diesel(treat_none_as_null = true)]
pub(crate) struct BookingUpdate<'a> {
    pub check_in: NaiveDate,
    pub check_out: NaiveDate,
    pub guests: i32,
    pub total_price: i64,
    pub status: &'a str,
    pub notes: Option<&'a str>,
    pub updated_at: DateTime<Utc>,
}
