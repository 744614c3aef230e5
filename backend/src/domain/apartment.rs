//! Apartment listings.
//!
//! An [`Apartment`] is only ever built from input that passed
//! [`Apartment::validate`]; repositories re-validate rows on the way out so a
//! hand-edited database cannot smuggle an invalid listing into the workflow.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::json;
use uuid::Uuid;

use crate::domain::Error;

pub const TITLE_MIN: usize = 5;
pub const TITLE_MAX: usize = 200;
pub const DESCRIPTION_MIN: usize = 20;
pub const DESCRIPTION_MAX: usize = 2000;
pub const ADDRESS_MIN: usize = 10;
pub const ADDRESS_MAX: usize = 300;
pub const PLACE_MIN: usize = 2;
pub const PLACE_MAX: usize = 100;
pub const BATHROOMS_MIN: u8 = 1;
pub const BATHROOMS_MAX: u8 = 5;
pub const MAX_GUESTS_MIN: u32 = 1;
pub const MAX_GUESTS_MAX: u32 = 10;

/// Validation failures for apartment fields.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ApartmentValidationError {
    #[error("{field} must be between {min} and {max} characters")]
    TextLength {
        field: &'static str,
        min: usize,
        max: usize,
    },
    #[error("bedrooms must be 1 or 2, got {0}")]
    Bedrooms(u8),
    #[error("bathrooms must be between 1 and 5")]
    Bathrooms,
    #[error("maxGuests must be between 1 and 10")]
    MaxGuests,
    #[error("squareMeters must be at least 1")]
    SquareMeters,
    #[error("amenities must not contain blank entries")]
    BlankAmenity,
    #[error("image URLs must not be blank")]
    BlankImageUrl,
    #[error("minPrice must not exceed maxPrice")]
    PriceRange,
}

impl ApartmentValidationError {
    /// camelCase name of the offending field, for error details.
    pub const fn field(&self) -> &'static str {
        match self {
            Self::TextLength { field, .. } => *field,
            Self::Bedrooms(_) => "bedrooms",
            Self::Bathrooms => "bathrooms",
            Self::MaxGuests => "maxGuests",
            Self::SquareMeters => "squareMeters",
            Self::BlankAmenity => "amenities",
            Self::BlankImageUrl => "images",
            Self::PriceRange => "minPrice",
        }
    }
}

impl From<ApartmentValidationError> for Error {
    fn from(value: ApartmentValidationError) -> Self {
        Self::invalid_request(value.to_string()).with_details(json!({
            "field": value.field(),
            "reason": "invalid_input",
        }))
    }
}

/// Stable apartment identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ApartmentId(Uuid);

impl ApartmentId {
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

impl fmt::Display for ApartmentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Number of bedrooms. The catalogue only carries one- and two-bedroom units.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum Bedrooms {
    One,
    Two,
}

impl TryFrom<u8> for Bedrooms {
    type Error = ApartmentValidationError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(Self::One),
            2 => Ok(Self::Two),
            other => Err(ApartmentValidationError::Bedrooms(other)),
        }
    }
}

impl From<Bedrooms> for u8 {
    fn from(value: Bedrooms) -> Self {
        match value {
            Bedrooms::One => 1,
            Bedrooms::Two => 2,
        }
    }
}

/// Listing photo. The first image of a listing is the primary one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApartmentImage {
    pub image_url: String,
    pub is_main: bool,
}

impl ApartmentImage {
    /// Build the image list for a listing, marking the first one as main.
    pub fn from_urls(urls: Vec<String>) -> Result<Vec<Self>, ApartmentValidationError> {
        urls.into_iter()
            .enumerate()
            .map(|(index, url)| {
                let trimmed = url.trim();
                if trimmed.is_empty() {
                    return Err(ApartmentValidationError::BlankImageUrl);
                }
                Ok(Self {
                    image_url: trimmed.to_owned(),
                    is_main: index == 0,
                })
            })
            .collect()
    }
}

/// Rentable apartment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Apartment {
    pub id: ApartmentId,
    pub title: String,
    pub description: String,
    pub bedrooms: Bedrooms,
    pub bathrooms: u8,
    pub max_guests: u32,
    /// Whole currency units per night.
    pub price_per_night: u64,
    pub address: String,
    pub city: String,
    pub country: String,
    pub square_meters: u32,
    pub amenities: Vec<String>,
    pub is_available: bool,
    pub images: Vec<ApartmentImage>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

fn check_length(
    field: &'static str,
    value: &str,
    min: usize,
    max: usize,
) -> Result<(), ApartmentValidationError> {
    let length = value.trim().chars().count();
    if (min..=max).contains(&length) {
        Ok(())
    } else {
        Err(ApartmentValidationError::TextLength { field, min, max })
    }
}

impl Apartment {
    /// Check every field rule.
    pub fn validate(&self) -> Result<(), ApartmentValidationError> {
        check_length("title", &self.title, TITLE_MIN, TITLE_MAX)?;
        check_length("description", &self.description, DESCRIPTION_MIN, DESCRIPTION_MAX)?;
        check_length("address", &self.address, ADDRESS_MIN, ADDRESS_MAX)?;
        check_length("city", &self.city, PLACE_MIN, PLACE_MAX)?;
        check_length("country", &self.country, PLACE_MIN, PLACE_MAX)?;
        if !(BATHROOMS_MIN..=BATHROOMS_MAX).contains(&self.bathrooms) {
            return Err(ApartmentValidationError::Bathrooms);
        }
        if !(MAX_GUESTS_MIN..=MAX_GUESTS_MAX).contains(&self.max_guests) {
            return Err(ApartmentValidationError::MaxGuests);
        }
        if self.square_meters == 0 {
            return Err(ApartmentValidationError::SquareMeters);
        }
        if self.amenities.iter().any(|amenity| amenity.trim().is_empty()) {
            return Err(ApartmentValidationError::BlankAmenity);
        }
        Ok(())
    }

    /// URL of the primary image, if the listing has photos.
    pub fn main_image(&self) -> Option<&str> {
        self.images
            .iter()
            .find(|image| image.is_main)
            .or_else(|| self.images.first())
            .map(|image| image.image_url.as_str())
    }
}

/// Input for creating a listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApartmentDraft {
    pub title: String,
    pub description: String,
    pub bedrooms: Bedrooms,
    pub bathrooms: u8,
    pub max_guests: u32,
    pub price_per_night: u64,
    pub address: String,
    pub city: String,
    pub country: String,
    pub square_meters: u32,
    pub amenities: Vec<String>,
    pub image_urls: Vec<String>,
    pub is_available: bool,
}

impl ApartmentDraft {
    /// Materialise the draft as a validated listing.
    pub fn into_apartment(
        self,
        id: ApartmentId,
        now: DateTime<Utc>,
    ) -> Result<Apartment, ApartmentValidationError> {
        let apartment = Apartment {
            id,
            title: self.title.trim().to_owned(),
            description: self.description.trim().to_owned(),
            bedrooms: self.bedrooms,
            bathrooms: self.bathrooms,
            max_guests: self.max_guests,
            price_per_night: self.price_per_night,
            address: self.address.trim().to_owned(),
            city: self.city.trim().to_owned(),
            country: self.country.trim().to_owned(),
            square_meters: self.square_meters,
            amenities: self.amenities,
            is_available: self.is_available,
            images: ApartmentImage::from_urls(self.image_urls)?,
            created_at: now,
            updated_at: now,
        };
        apartment.validate()?;
        Ok(apartment)
    }
}

/// Partial listing update; `None` leaves the field untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ApartmentPatch {
    pub title: Option<String>,
    pub description: Option<String>,
    pub bedrooms: Option<Bedrooms>,
    pub bathrooms: Option<u8>,
    pub max_guests: Option<u32>,
    pub price_per_night: Option<u64>,
    pub address: Option<String>,
    pub city: Option<String>,
    pub country: Option<String>,
    pub square_meters: Option<u32>,
    pub amenities: Option<Vec<String>>,
    pub is_available: Option<bool>,
}

impl ApartmentPatch {
    /// Overwrite the provided fields and re-check every rule.
    pub fn apply(
        self,
        mut apartment: Apartment,
        now: DateTime<Utc>,
    ) -> Result<Apartment, ApartmentValidationError> {
        let trim = |value: String| value.trim().to_owned();
        if let Some(title) = self.title {
            apartment.title = trim(title);
        }
        if let Some(description) = self.description {
            apartment.description = trim(description);
        }
        if let Some(bedrooms) = self.bedrooms {
            apartment.bedrooms = bedrooms;
        }
        if let Some(bathrooms) = self.bathrooms {
            apartment.bathrooms = bathrooms;
        }
        if let Some(max_guests) = self.max_guests {
            apartment.max_guests = max_guests;
        }
        if let Some(price) = self.price_per_night {
            apartment.price_per_night = price;
        }
        if let Some(address) = self.address {
            apartment.address = trim(address);
        }
        if let Some(city) = self.city {
            apartment.city = trim(city);
        }
        if let Some(country) = self.country {
            apartment.country = trim(country);
        }
        if let Some(square_meters) = self.square_meters {
            apartment.square_meters = square_meters;
        }
        if let Some(amenities) = self.amenities {
            apartment.amenities = amenities;
        }
        if let Some(is_available) = self.is_available {
            apartment.is_available = is_available;
        }
        apartment.updated_at = now;
        apartment.validate()?;
        Ok(apartment)
    }
}

/// Public catalogue filter. Only available listings are ever returned.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ApartmentFilter {
    bedrooms: Option<Bedrooms>,
    min_price: Option<u64>,
    max_price: Option<u64>,
}

impl ApartmentFilter {
    /// Build a filter, rejecting inverted price ranges.
    pub fn new(
        bedrooms: Option<Bedrooms>,
        min_price: Option<u64>,
        max_price: Option<u64>,
    ) -> Result<Self, ApartmentValidationError> {
        if let (Some(min), Some(max)) = (min_price, max_price) {
            if min > max {
                return Err(ApartmentValidationError::PriceRange);
            }
        }
        Ok(Self {
            bedrooms,
            min_price,
            max_price,
        })
    }

    pub const fn bedrooms(&self) -> Option<Bedrooms> {
        self.bedrooms
    }

    pub const fn min_price(&self) -> Option<u64> {
        self.min_price
    }

    pub const fn max_price(&self) -> Option<u64> {
        self.max_price
    }

    /// In-process equivalent of the repository query.
    pub fn matches(&self, apartment: &Apartment) -> bool {
        let price = apartment.price_per_night;
        apartment.is_available
            && self.bedrooms.map_or(true, |bedrooms| apartment.bedrooms == bedrooms)
            && self.min_price.map_or(true, |min| price >= min)
            && self.max_price.map_or(true, |max| price <= max)
    }
}

/// Apartment fields embedded into booking reads.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApartmentSummary {
    pub id: ApartmentId,
    pub title: String,
    pub bedrooms: Bedrooms,
    pub price_per_night: u64,
    pub address: String,
    pub city: String,
    pub main_image: Option<String>,
}

impl From<&Apartment> for ApartmentSummary {
    fn from(value: &Apartment) -> Self {
        Self {
            id: value.id,
            title: value.title.clone(),
            bedrooms: value.bedrooms,
            price_per_night: value.price_per_night,
            address: value.address.clone(),
            city: value.city.clone(),
            main_image: value.main_image().map(str::to_owned),
        }
    }
}

#[cfg(test)]
mod tests;
