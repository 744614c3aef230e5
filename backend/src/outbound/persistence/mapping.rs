//! Row ↔ domain conversions.
//!
//! This is the only place where snake_case storage columns meet the domain
//! types. Reads re-validate every field so a hand-edited row surfaces as a
//! query error instead of leaking an invalid aggregate.

use std::collections::HashMap;

use uuid::Uuid;

use crate::domain::{
    Apartment, ApartmentId, ApartmentImage, ApartmentSummary, Bedrooms, Booking, BookingId,
    BookingStatus, Email, FullName, GuestSummary, PhoneNumber, Role, StayDates, User, UserId,
};

use super::models::{
    ApartmentImageRow, ApartmentRow, ApartmentWrite, BookingRow, BookingUpdate, NewApartmentImageRow,
    NewBookingRow, NewUserRow, UserRow, UserUpdate,
};

/// A stored row that no longer satisfies the domain rules.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{table} row {id} is invalid: {message}")]
pub(crate) struct RowMappingError {
    table: &'static str,
    id: Uuid,
    message: String,
}

impl RowMappingError {
    fn new(table: &'static str, id: Uuid, message: impl ToString) -> Self {
        Self {
            table,
            id,
            message: message.to_string(),
        }
    }
}

/// Value does not fit the column type.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{field} is out of range for storage")]
pub(crate) struct ColumnRangeError {
    field: &'static str,
}

fn to_column<T, U>(field: &'static str, value: T) -> Result<U, ColumnRangeError>
where
    U: TryFrom<T>,
{
    U::try_from(value).map_err(|_| ColumnRangeError { field })
}

// ---------------------------------------------------------------------------
// Users
// ---------------------------------------------------------------------------

/// Decode a user row, returning the profile and the stored password hash.
pub(crate) fn user_from_row(row: UserRow) -> Result<(User, String), RowMappingError> {
    let id = row.id;
    let invalid = |err: String| RowMappingError::new("users", id, err);
    let user = User {
        id: UserId::from_uuid(row.id),
        email: Email::new(&row.email).map_err(|err| invalid(err.to_string()))?,
        full_name: FullName::new(&row.full_name).map_err(|err| invalid(err.to_string()))?,
        phone: row
            .phone
            .as_deref()
            .map(PhoneNumber::new)
            .transpose()
            .map_err(|err| invalid(err.to_string()))?,
        role: row.role.parse::<Role>().map_err(|err| invalid(err.to_string()))?,
        created_at: row.created_at,
        updated_at: row.updated_at,
    };
    Ok((user, row.password_hash))
}

pub(crate) fn new_user_row<'a>(user: &'a User, password_hash: &'a str) -> NewUserRow<'a> {
    NewUserRow {
        id: *user.id.as_uuid(),
        email: user.email.as_ref(),
        password_hash,
        full_name: user.full_name.as_ref(),
        phone: user.phone.as_ref().map(AsRef::as_ref),
        role: user.role.as_str(),
        created_at: user.created_at,
        updated_at: user.updated_at,
    }
}

pub(crate) fn user_update(user: &User) -> UserUpdate<'_> {
    UserUpdate {
        email: user.email.as_ref(),
        full_name: user.full_name.as_ref(),
        phone: user.phone.as_ref().map(AsRef::as_ref),
        updated_at: user.updated_at,
    }
}

pub(crate) fn guest_from_row(row: UserRow) -> Result<GuestSummary, RowMappingError> {
    let (user, _) = user_from_row(row)?;
    Ok(GuestSummary::from(&user))
}

// ---------------------------------------------------------------------------
// Apartments
// ---------------------------------------------------------------------------

fn bedrooms_from_column(id: Uuid, raw: i16) -> Result<Bedrooms, RowMappingError> {
    u8::try_from(raw)
        .ok()
        .and_then(|value| Bedrooms::try_from(value).ok())
        .ok_or_else(|| RowMappingError::new("apartments", id, format!("bedrooms {raw}")))
}

fn unsigned_column<T, U>(id: Uuid, field: &'static str, raw: T) -> Result<U, RowMappingError>
where
    T: Copy + std::fmt::Display,
    U: TryFrom<T>,
{
    U::try_from(raw).map_err(|_| RowMappingError::new("apartments", id, format!("{field} {raw}")))
}

/// Assemble an apartment from its row and image rows (any order).
pub(crate) fn apartment_from_rows(
    row: ApartmentRow,
    mut images: Vec<ApartmentImageRow>,
) -> Result<Apartment, RowMappingError> {
    let id = row.id;
    images.sort_by_key(|image| image.position);
    let apartment = Apartment {
        id: ApartmentId::from_uuid(id),
        title: row.title,
        description: row.description,
        bedrooms: bedrooms_from_column(id, row.bedrooms)?,
        bathrooms: unsigned_column(id, "bathrooms", row.bathrooms)?,
        max_guests: unsigned_column(id, "max_guests", row.max_guests)?,
        price_per_night: unsigned_column(id, "price_per_night", row.price_per_night)?,
        address: row.address,
        city: row.city,
        country: row.country,
        square_meters: unsigned_column(id, "square_meters", row.square_meters)?,
        amenities: row.amenities,
        is_available: row.is_available,
        images: images
            .into_iter()
            .map(|image| ApartmentImage {
                image_url: image.image_url,
                is_main: image.is_main,
            })
            .collect(),
        created_at: row.created_at,
        updated_at: row.updated_at,
    };
    apartment
        .validate()
        .map_err(|err| RowMappingError::new("apartments", id, err))?;
    Ok(apartment)
}

/// Group image rows by apartment id.
pub(crate) fn images_by_apartment(
    rows: Vec<ApartmentImageRow>,
) -> HashMap<Uuid, Vec<ApartmentImageRow>> {
    let mut grouped: HashMap<Uuid, Vec<ApartmentImageRow>> = HashMap::new();
    for row in rows {
        grouped.entry(row.apartment_id).or_default().push(row);
    }
    grouped
}

pub(crate) fn apartment_write(apartment: &Apartment) -> Result<ApartmentWrite<'_>, ColumnRangeError> {
    Ok(ApartmentWrite {
        id: *apartment.id.as_uuid(),
        title: &apartment.title,
        description: &apartment.description,
        bedrooms: i16::from(u8::from(apartment.bedrooms)),
        bathrooms: i16::from(apartment.bathrooms),
        max_guests: to_column("max_guests", apartment.max_guests)?,
        price_per_night: to_column("price_per_night", apartment.price_per_night)?,
        address: &apartment.address,
        city: &apartment.city,
        country: &apartment.country,
        square_meters: to_column("square_meters", apartment.square_meters)?,
        amenities: &apartment.amenities,
        is_available: apartment.is_available,
        created_at: apartment.created_at,
        updated_at: apartment.updated_at,
    })
}

pub(crate) fn new_image_rows(
    apartment: &Apartment,
) -> Result<Vec<NewApartmentImageRow<'_>>, ColumnRangeError> {
    apartment
        .images
        .iter()
        .enumerate()
        .map(|(index, image)| {
            Ok(NewApartmentImageRow {
                id: Uuid::new_v4(),
                apartment_id: *apartment.id.as_uuid(),
                image_url: &image.image_url,
                is_main: image.is_main,
                position: to_column("position", index)?,
            })
        })
        .collect()
}

/// Apartment summary for booking reads; `main_image` comes from a separate
/// image lookup.
pub(crate) fn summary_from_row(
    row: &ApartmentRow,
    main_image: Option<String>,
) -> Result<ApartmentSummary, RowMappingError> {
    Ok(ApartmentSummary {
        id: ApartmentId::from_uuid(row.id),
        title: row.title.clone(),
        bedrooms: bedrooms_from_column(row.id, row.bedrooms)?,
        price_per_night: unsigned_column(row.id, "price_per_night", row.price_per_night)?,
        address: row.address.clone(),
        city: row.city.clone(),
        main_image,
    })
}

// ---------------------------------------------------------------------------
// Bookings
// ---------------------------------------------------------------------------

pub(crate) fn booking_from_row(row: BookingRow) -> Result<Booking, RowMappingError> {
    let id = row.id;
    let invalid = |err: String| RowMappingError::new("bookings", id, err);
    Ok(Booking {
        id: BookingId::from_uuid(id),
        user_id: UserId::from_uuid(row.user_id),
        apartment_id: ApartmentId::from_uuid(row.apartment_id),
        stay: StayDates::new(row.check_in, row.check_out).map_err(|err| invalid(err.to_string()))?,
        guests: u32::try_from(row.guests).map_err(|err| invalid(err.to_string()))?,
        total_price: u64::try_from(row.total_price).map_err(|err| invalid(err.to_string()))?,
        status: row.status.parse::<BookingStatus>().map_err(|err| invalid(err.to_string()))?,
        notes: row.notes,
        created_at: row.created_at,
        updated_at: row.updated_at,
    })
}

pub(crate) fn new_booking_row(booking: &Booking) -> Result<NewBookingRow<'_>, ColumnRangeError> {
    Ok(NewBookingRow {
        id: *booking.id.as_uuid(),
        user_id: *booking.user_id.as_uuid(),
        apartment_id: *booking.apartment_id.as_uuid(),
        check_in: booking.stay.check_in(),
        check_out: booking.stay.check_out(),
        guests: to_column("guests", booking.guests)?,
        total_price: to_column("total_price", booking.total_price)?,
        status: booking.status.as_str(),
        notes: booking.notes.as_deref(),
        created_at: booking.created_at,
        updated_at: booking.updated_at,
    })
}

pub(crate) fn booking_update(booking: &Booking) -> Result<BookingUpdate<'_>, ColumnRangeError> {
    Ok(BookingUpdate {
        check_in: booking.stay.check_in(),
        check_out: booking.stay.check_out(),
        guests: to_column("guests", booking.guests)?,
        total_price: to_column("total_price", booking.total_price)?,
        status: booking.status.as_str(),
        notes: booking.notes.as_deref(),
        updated_at: booking.updated_at,
    })
}
