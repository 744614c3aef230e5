//! Shared builders for domain unit tests.

use chrono::{DateTime, Local, NaiveDate, TimeZone, Utc};
use mockable::Clock;

use crate::domain::{
    Apartment, ApartmentDraft, ApartmentId, Bedrooms, Email, FullName, Role, User, UserId,
};

pub(crate) fn ts(year: i32, month: u32, day: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(year, month, day, 9, 0, 0)
        .single()
        .expect("valid timestamp")
}

pub(crate) fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).expect("valid date")
}

/// Clock pinned to a single instant.
pub(crate) struct FixtureClock(pub DateTime<Utc>);

impl Clock for FixtureClock {
    fn local(&self) -> DateTime<Local> {
        self.0.with_timezone(&Local)
    }

    fn utc(&self) -> DateTime<Utc> {
        self.0
    }
}

pub(crate) fn sample_draft() -> ApartmentDraft {
    ApartmentDraft {
        title: "Sunny loft in Palermo".to_owned(),
        description: "Bright one-bedroom loft close to parks and cafes.".to_owned(),
        bedrooms: Bedrooms::One,
        bathrooms: 1,
        max_guests: 4,
        price_per_night: 15_000,
        address: "Av. Santa Fe 1234, Palermo".to_owned(),
        city: "Buenos Aires".to_owned(),
        country: "Argentina".to_owned(),
        square_meters: 45,
        amenities: vec!["wifi".to_owned(), "kitchen".to_owned()],
        image_urls: vec!["https://cdn.example/loft.jpg".to_owned()],
        is_available: true,
    }
}

pub(crate) fn sample_apartment(price_per_night: u64, max_guests: u32) -> Apartment {
    let mut draft = sample_draft();
    draft.price_per_night = price_per_night;
    draft.max_guests = max_guests;
    draft
        .into_apartment(ApartmentId::random(), ts(2024, 1, 1))
        .expect("sample draft is valid")
}

pub(crate) fn sample_user(role: Role) -> User {
    let id = UserId::random();
    User {
        id,
        email: Email::new(format!("{id}@example.com")).expect("valid email"),
        full_name: FullName::new("Ada Lovelace").expect("valid name"),
        phone: None,
        role,
        created_at: ts(2024, 1, 1),
        updated_at: ts(2024, 1, 1),
    }
}
