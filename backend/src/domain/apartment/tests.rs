//! Tests for apartment validation and filtering.

use super::*;
use crate::domain::fixtures::{sample_apartment, sample_draft, ts};
use rstest::rstest;

#[rstest]
fn draft_marks_first_image_as_main() {
    let mut draft = sample_draft();
    draft.image_urls = vec![
        " https://cdn.example/a.jpg ".to_owned(),
        "https://cdn.example/b.jpg".to_owned(),
    ];
    let apartment = draft
        .into_apartment(ApartmentId::random(), ts(2024, 1, 1))
        .expect("valid draft");

    assert_eq!(apartment.images.len(), 2);
    assert_eq!(apartment.main_image(), Some("https://cdn.example/a.jpg"));
    assert!(apartment.images.iter().skip(1).all(|image| !image.is_main));
}

#[rstest]
#[case::short_title(|d: &mut ApartmentDraft| d.title = "Flat".to_owned(), "title")]
#[case::short_description(|d: &mut ApartmentDraft| d.description = "Too short".to_owned(), "description")]
#[case::short_address(|d: &mut ApartmentDraft| d.address = "Main St".to_owned(), "address")]
#[case::short_city(|d: &mut ApartmentDraft| d.city = "X".to_owned(), "city")]
#[case::no_bathrooms(|d: &mut ApartmentDraft| d.bathrooms = 0, "bathrooms")]
#[case::too_many_bathrooms(|d: &mut ApartmentDraft| d.bathrooms = 6, "bathrooms")]
#[case::zero_guests(|d: &mut ApartmentDraft| d.max_guests = 0, "maxGuests")]
#[case::crowd(|d: &mut ApartmentDraft| d.max_guests = 11, "maxGuests")]
#[case::no_area(|d: &mut ApartmentDraft| d.square_meters = 0, "squareMeters")]
#[case::blank_amenity(|d: &mut ApartmentDraft| d.amenities.push("  ".to_owned()), "amenities")]
#[case::blank_image(|d: &mut ApartmentDraft| d.image_urls.push(String::new()), "images")]
fn draft_rejects_rule_violations(#[case] mutate: fn(&mut ApartmentDraft), #[case] field: &str) {
    let mut draft = sample_draft();
    mutate(&mut draft);
    let err = draft
        .into_apartment(ApartmentId::random(), ts(2024, 1, 1))
        .expect_err("invalid draft");
    assert_eq!(err.field(), field);
}

#[rstest]
#[case(0, false)]
#[case(1, true)]
#[case(2, true)]
#[case(3, false)]
fn bedrooms_only_accepts_one_or_two(#[case] raw: u8, #[case] ok: bool) {
    assert_eq!(Bedrooms::try_from(raw).is_ok(), ok);
}

#[rstest]
fn patch_revalidates_the_merged_record() {
    let apartment = sample_apartment(15_000, 4);
    let patch = ApartmentPatch {
        max_guests: Some(12),
        ..ApartmentPatch::default()
    };
    assert_eq!(
        patch.apply(apartment, ts(2024, 2, 1)),
        Err(ApartmentValidationError::MaxGuests)
    );
}

#[rstest]
fn patch_overwrites_and_stamps() {
    let apartment = sample_apartment(15_000, 4);
    let created = apartment.created_at;
    let patch = ApartmentPatch {
        price_per_night: Some(18_000),
        is_available: Some(false),
        ..ApartmentPatch::default()
    };
    let updated = patch.apply(apartment, ts(2024, 2, 1)).expect("valid patch");
    assert_eq!(updated.price_per_night, 18_000);
    assert!(!updated.is_available);
    assert_eq!(updated.created_at, created);
    assert_eq!(updated.updated_at, ts(2024, 2, 1));
}

#[rstest]
fn filter_rejects_inverted_price_range() {
    assert_eq!(
        ApartmentFilter::new(None, Some(200), Some(100)),
        Err(ApartmentValidationError::PriceRange)
    );
}

#[rstest]
#[case(ApartmentFilter::default(), true)]
#[case(ApartmentFilter::new(Some(Bedrooms::Two), None, None).expect("filter"), false)]
#[case(ApartmentFilter::new(None, Some(15_000), Some(15_000)).expect("filter"), true)]
#[case(ApartmentFilter::new(None, Some(15_001), None).expect("filter"), false)]
#[case(ApartmentFilter::new(None, None, Some(14_999)).expect("filter"), false)]
fn filter_matches_bedrooms_and_inclusive_price(
    #[case] filter: ApartmentFilter,
    #[case] expected: bool,
) {
    let apartment = sample_apartment(15_000, 4);
    assert_eq!(apartment.bedrooms, Bedrooms::One);
    assert_eq!(filter.matches(&apartment), expected);
}

#[rstest]
fn filter_never_matches_unavailable_listings() {
    let mut apartment = sample_apartment(15_000, 4);
    apartment.is_available = false;
    assert!(!ApartmentFilter::default().matches(&apartment));
}

#[rstest]
fn apartment_serialises_camel_case() {
    let value = serde_json::to_value(sample_apartment(15_000, 4)).expect("serialise");
    assert_eq!(value["pricePerNight"], 15_000);
    assert_eq!(value["maxGuests"], 4);
    assert_eq!(value["bedrooms"], 1);
    assert_eq!(value["isAvailable"], true);
}
