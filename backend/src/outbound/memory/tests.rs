//! Behaviour of the in-process store.

use rstest::rstest;

use super::*;
use crate::domain::fixtures::{date, sample_apartment, sample_user, ts};
use crate::domain::{BookingStatus, Role};

fn booking_for(
    user: &User,
    apartment: &Apartment,
    check_in: u32,
    check_out: u32,
    status: BookingStatus,
) -> Booking {
    Booking {
        id: BookingId::random(),
        user_id: user.id,
        apartment_id: apartment.id,
        stay: StayDates::new(date(2024, 12, check_in), date(2024, 12, check_out))
            .expect("valid stay"),
        guests: 2,
        total_price: 10_000,
        status,
        notes: None,
        created_at: ts(2024, 11, check_in),
        updated_at: ts(2024, 11, check_in),
    }
}

async fn seeded() -> (MemoryStore, User, Apartment) {
    let store = MemoryStore::new();
    let user = sample_user(Role::User);
    let apartment = sample_apartment(15_000, 4);
    UserRepository::insert(&store, &user, "hash")
        .await
        .expect("user stored");
    ApartmentRepository::insert(&store, &apartment)
        .await
        .expect("apartment stored");
    (store, user, apartment)
}

#[tokio::test]
async fn duplicate_email_is_rejected() {
    let (store, user, _) = seeded().await;
    let mut twin = sample_user(Role::User);
    twin.email = user.email.clone();

    let err = UserRepository::insert(&store, &twin, "hash")
        .await
        .expect_err("email clash");

    assert!(matches!(err, UserPersistenceError::DuplicateEmail { .. }));
}

#[tokio::test]
async fn accounts_are_found_by_email_regardless_of_case() {
    let (store, user, _) = seeded().await;
    let lookup = user.email.as_ref().to_uppercase();

    let account = store
        .find_account_by_email(&lookup)
        .await
        .expect("lookup succeeds")
        .expect("account exists");

    assert_eq!(account.user.id, user.id);
    assert_eq!(account.password_hash, "hash");
}

#[rstest]
#[case(20, 27, 1)]
#[case(27, 30, 1)]
#[case(28, 30, 0)]
#[case(10, 20, 1)]
#[tokio::test]
async fn overlap_counts_touching_ranges(
    #[case] check_in: u32,
    #[case] check_out: u32,
    #[case] expected: usize,
) {
    let (store, user, apartment) = seeded().await;
    let existing = booking_for(&user, &apartment, 20, 27, BookingStatus::Pending);
    BookingRepository::insert(&store, &existing)
        .await
        .expect("booking stored");

    let window = StayDates::new(date(2024, 12, check_in), date(2024, 12, check_out))
        .expect("valid window");
    let count = store
        .count_overlapping(&apartment.id, &window, None)
        .await
        .expect("count succeeds");

    assert_eq!(count, expected);
}

#[tokio::test]
async fn inactive_and_excluded_bookings_do_not_overlap() {
    let (store, user, apartment) = seeded().await;
    let cancelled = booking_for(&user, &apartment, 20, 27, BookingStatus::Cancelled);
    let pending = booking_for(&user, &apartment, 1, 5, BookingStatus::Pending);
    for booking in [&cancelled, &pending] {
        BookingRepository::insert(&store, booking)
            .await
            .expect("booking stored");
    }

    assert_eq!(
        store
            .count_overlapping(&apartment.id, &cancelled.stay, None)
            .await
            .expect("count succeeds"),
        0
    );
    assert_eq!(
        store
            .count_overlapping(&apartment.id, &pending.stay, Some(pending.id))
            .await
            .expect("count succeeds"),
        0
    );
}

#[tokio::test]
async fn overlapping_insert_is_a_conflict() {
    let (store, user, apartment) = seeded().await;
    let first = booking_for(&user, &apartment, 20, 27, BookingStatus::Confirmed);
    let second = booking_for(&user, &apartment, 25, 28, BookingStatus::Pending);
    BookingRepository::insert(&store, &first)
        .await
        .expect("first booking stored");

    let err = BookingRepository::insert(&store, &second)
        .await
        .expect_err("overlap rejected");

    assert!(matches!(err, BookingRepositoryError::Conflict { .. }));
}

#[tokio::test]
async fn updates_cannot_move_onto_booked_dates() {
    let (store, user, apartment) = seeded().await;
    let held = booking_for(&user, &apartment, 20, 27, BookingStatus::Pending);
    let mut moving = booking_for(&user, &apartment, 28, 30, BookingStatus::Pending);
    for booking in [&held, &moving] {
        BookingRepository::insert(&store, booking)
            .await
            .expect("booking stored");
    }

    moving.stay = StayDates::new(date(2024, 12, 21), date(2024, 12, 23)).expect("valid stay");
    let err = BookingRepository::update(&store, &moving)
        .await
        .expect_err("overlap rejected");

    assert!(matches!(err, BookingRepositoryError::Conflict { .. }));
    assert_eq!(
        store
            .count_overlapping(&apartment.id, &held.stay, None)
            .await
            .expect("count succeeds"),
        1
    );
}

#[tokio::test]
async fn updates_may_keep_their_own_dates_or_go_inactive() {
    let (store, user, apartment) = seeded().await;
    let held = booking_for(&user, &apartment, 20, 27, BookingStatus::Pending);
    let mut other = booking_for(&user, &apartment, 28, 30, BookingStatus::Pending);
    for booking in [&held, &other] {
        BookingRepository::insert(&store, booking)
            .await
            .expect("booking stored");
    }

    let mut confirmed = held.clone();
    confirmed.status = BookingStatus::Confirmed;
    BookingRepository::update(&store, &confirmed)
        .await
        .expect("own dates do not clash");

    other.status = BookingStatus::Cancelled;
    other.stay = StayDates::new(date(2024, 12, 21), date(2024, 12, 23)).expect("valid stay");
    BookingRepository::update(&store, &other)
        .await
        .expect("cancelled bookings hold no dates");
}

#[tokio::test]
async fn referenced_rows_cannot_be_deleted() {
    let (store, user, apartment) = seeded().await;
    let booking = booking_for(&user, &apartment, 20, 27, BookingStatus::Completed);
    BookingRepository::insert(&store, &booking)
        .await
        .expect("booking stored");

    let apartment_err = ApartmentRepository::delete(&store, &apartment.id)
        .await
        .expect_err("apartment in use");
    let user_err = UserRepository::delete(&store, &user.id)
        .await
        .expect_err("user in use");

    assert!(matches!(
        apartment_err,
        ApartmentRepositoryError::InUse { .. }
    ));
    assert!(matches!(user_err, UserPersistenceError::InUse { .. }));
}

#[tokio::test]
async fn details_embed_apartment_and_guest() {
    let (store, user, apartment) = seeded().await;
    let older = booking_for(&user, &apartment, 1, 3, BookingStatus::Pending);
    let newer = booking_for(&user, &apartment, 10, 12, BookingStatus::Pending);
    for booking in [&older, &newer] {
        BookingRepository::insert(&store, booking)
            .await
            .expect("booking stored");
    }

    let all = store.list_all_details().await.expect("list succeeds");
    let mine = store
        .list_details_for_user(&user.id)
        .await
        .expect("list succeeds");

    let ids: Vec<BookingId> = all.iter().map(|details| details.booking.id).collect();
    assert_eq!(ids, vec![newer.id, older.id]);
    let first = all.first().expect("bookings listed");
    assert_eq!(
        first.guest.as_ref().map(|guest| guest.id),
        Some(user.id)
    );
    assert_eq!(
        first
            .apartment
            .as_ref()
            .and_then(|summary| summary.main_image.clone()),
        apartment.main_image().map(str::to_owned)
    );
    assert_eq!(mine.len(), 2);
    assert!(mine.iter().all(|details| details.guest.is_none()));
}

#[tokio::test]
async fn listing_applies_the_catalogue_filter() {
    let (store, _, apartment) = seeded().await;
    let mut hidden = sample_apartment(9_000, 2);
    hidden.is_available = false;
    ApartmentRepository::insert(&store, &hidden)
        .await
        .expect("apartment stored");

    let listed = ApartmentRepository::list(&store, &ApartmentFilter::default())
        .await
        .expect("list succeeds");

    assert_eq!(listed.len(), 1);
    assert_eq!(listed.first().map(|a| a.id), Some(apartment.id));
}
