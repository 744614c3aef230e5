//! Overlap guarantees of the Diesel booking adapter against embedded
//! PostgreSQL.
//!
//! Concurrent creates race past the service-level count and must be settled
//! by the SERIALIZABLE insert or the `bookings_no_overlap` constraint. Date
//! moves that skip the service check must hit the constraint.
//!
//! Run with `cargo test --features embedded-postgres`.

use std::sync::Arc;

use backend::domain::ports::{
    ApartmentRepository, BookingRepository, BookingRepositoryError, UserRepository,
};
use backend::domain::{
    ApartmentDraft, ApartmentId, Bedrooms, BookingError, BookingPatch, BookingRequest,
    BookingService, BookingUpdatePolicy, Email, FullName, Requester, Role, StayDates, User,
    UserId,
};
use backend::outbound::persistence::{
    DbPool, DieselApartmentRepository, DieselBookingRepository, DieselUserRepository,
    PoolConfig, run_migrations,
};
use chrono::{DateTime, Local, NaiveDate, TimeZone, Utc};
use mockable::Clock;
use pg_embedded_setup_unpriv::TestCluster;
use rstest::{fixture, rstest};
use tokio::runtime::Runtime;
use uuid::Uuid;

mod support;

use support::{handle_cluster_setup_failure, reset_database, test_cluster};

type Service = BookingService<DieselBookingRepository, DieselApartmentRepository>;

struct FixedClock(DateTime<Utc>);

impl Clock for FixedClock {
    fn local(&self) -> DateTime<Local> {
        self.0.with_timezone(&Local)
    }

    fn utc(&self) -> DateTime<Utc> {
        self.0
    }
}

struct TestContext {
    runtime: Runtime,
    _cluster: TestCluster,
    bookings: Arc<DieselBookingRepository>,
    apartments: Arc<DieselApartmentRepository>,
    apartment_id: ApartmentId,
    alice: Requester,
    bob: Requester,
}

impl TestContext {
    fn service(&self, policy: BookingUpdatePolicy) -> Service {
        BookingService::new(
            Arc::clone(&self.bookings),
            Arc::clone(&self.apartments),
            Arc::new(FixedClock(now())),
        )
        .with_update_policy(policy)
    }
}

fn now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 12, 1, 9, 0, 0)
        .single()
        .expect("valid timestamp")
}

fn date(day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 12, day).expect("valid date")
}

fn request(apartment_id: ApartmentId, check_in: u32, check_out: u32) -> BookingRequest {
    BookingRequest {
        apartment_id,
        check_in: date(check_in),
        check_out: date(check_out),
        guests: 2,
        notes: None,
    }
}

fn guest(name: &str) -> User {
    let id = UserId::random();
    User {
        id,
        email: Email::new(format!("{id}@example.com")).expect("valid email"),
        full_name: FullName::new(name).expect("valid name"),
        phone: None,
        role: Role::User,
        created_at: now(),
        updated_at: now(),
    }
}

fn listing() -> ApartmentDraft {
    ApartmentDraft {
        title: "Harbour view studio".to_owned(),
        description: "Compact studio a short walk from the ferry terminal.".to_owned(),
        bedrooms: Bedrooms::One,
        bathrooms: 1,
        max_guests: 4,
        price_per_night: 15_000,
        address: "12 Quay Street".to_owned(),
        city: "Auckland".to_owned(),
        country: "New Zealand".to_owned(),
        square_meters: 32,
        amenities: vec!["wifi".to_owned()],
        image_urls: vec!["https://cdn.example/studio.jpg".to_owned()],
        is_available: true,
    }
}

fn setup_context() -> Result<TestContext, String> {
    let cluster = test_cluster()?;
    let database = format!("booking_overlap_{}", Uuid::new_v4().simple());
    let database_url = reset_database(&cluster, &database)?;

    let runtime = Runtime::new().map_err(|err| err.to_string())?;
    let pool = runtime.block_on(async {
        run_migrations(&database_url)
            .await
            .map_err(|err| err.to_string())?;
        let config = PoolConfig::new(database_url.as_str())
            .with_max_size(4)
            .with_min_idle(Some(2));
        DbPool::new(config).await.map_err(|err| err.to_string())
    })?;

    let users = DieselUserRepository::new(pool.clone());
    let apartments = Arc::new(DieselApartmentRepository::new(pool.clone()));
    let bookings = Arc::new(DieselBookingRepository::new(pool));

    let (alice, bob) = (guest("Alice Guest"), guest("Bob Guest"));
    let apartment = listing()
        .into_apartment(ApartmentId::random(), now())
        .map_err(|err| err.to_string())?;
    runtime.block_on(async {
        for user in [&alice, &bob] {
            users
                .insert(user, "$argon2id$placeholder")
                .await
                .map_err(|err| err.to_string())?;
        }
        apartments
            .insert(&apartment)
            .await
            .map_err(|err| err.to_string())
    })?;

    Ok(TestContext {
        runtime,
        _cluster: cluster,
        bookings,
        apartments,
        apartment_id: apartment.id,
        alice: Requester::new(alice.id, Role::User),
        bob: Requester::new(bob.id, Role::User),
    })
}

#[fixture]
fn repo_context() -> Option<TestContext> {
    match setup_context() {
        Ok(ctx) => Some(ctx),
        Err(reason) => handle_cluster_setup_failure(reason),
    }
}

#[rstest]
fn concurrent_overlapping_creates_admit_exactly_one(repo_context: Option<TestContext>) {
    let Some(context) = repo_context else {
        eprintln!("SKIP-TEST-CLUSTER: concurrent_overlapping_creates_admit_exactly_one skipped");
        return;
    };
    let service = context.service(BookingUpdatePolicy::Strict);
    let apartment_id = context.apartment_id;

    let (first, second) = context.runtime.block_on(async {
        tokio::join!(
            service.create_booking(&context.alice, request(apartment_id, 20, 27)),
            service.create_booking(&context.bob, request(apartment_id, 24, 30)),
        )
    });

    let outcomes = [first, second];
    let admitted = outcomes.iter().filter(|outcome| outcome.is_ok()).count();
    assert_eq!(admitted, 1, "exactly one create wins: {outcomes:?}");
    let rejected = outcomes
        .into_iter()
        .find_map(Result::err)
        .expect("one create is rejected");
    assert_eq!(rejected, BookingError::DateConflict);

    let window = StayDates::new(date(20), date(30)).expect("valid window");
    let held = context
        .runtime
        .block_on(async {
            context
                .bookings
                .count_overlapping(&apartment_id, &window, None)
                .await
        })
        .expect("count succeeds");
    assert_eq!(held, 1);
}

#[rstest]
fn moving_dates_onto_a_held_stay_is_refused(repo_context: Option<TestContext>) {
    let Some(context) = repo_context else {
        eprintln!("SKIP-TEST-CLUSTER: moving_dates_onto_a_held_stay_is_refused skipped");
        return;
    };
    let strict = context.service(BookingUpdatePolicy::Strict);
    let legacy = context.service(BookingUpdatePolicy::Legacy);
    let apartment_id = context.apartment_id;
    let move_in = BookingPatch {
        check_in: Some(date(25)),
        ..BookingPatch::default()
    };

    let moved = context.runtime.block_on(async {
        strict
            .create_booking(&context.alice, request(apartment_id, 20, 27))
            .await
            .expect("first stay booked");
        let later = strict
            .create_booking(&context.bob, request(apartment_id, 28, 30))
            .await
            .expect("back-to-back stay booked");
        let later_id = later.booking.id;

        let strict_err = strict
            .update_booking(&context.bob, later_id, move_in.clone())
            .await
            .expect_err("strict update must not overlap");
        let legacy_err = legacy
            .update_booking(&context.bob, later_id, move_in)
            .await
            .expect_err("legacy update must not overlap");

        let mut raw = context
            .bookings
            .find_by_id(&later_id)
            .await
            .expect("lookup succeeds")
            .expect("booking exists");
        raw.stay = StayDates::new(date(26), date(30)).expect("valid stay");
        let store_err = context
            .bookings
            .update(&raw)
            .await
            .expect_err("constraint rejects the move");

        let stored = context
            .bookings
            .find_by_id(&later_id)
            .await
            .expect("lookup succeeds")
            .expect("booking exists");
        (strict_err, legacy_err, store_err, stored)
    });

    let (strict_err, legacy_err, store_err, stored) = moved;
    assert_eq!(strict_err, BookingError::DateConflict);
    assert_eq!(legacy_err, BookingError::DateConflict);
    assert!(
        matches!(store_err, BookingRepositoryError::Conflict { .. }),
        "unexpected store error: {store_err:?}"
    );
    assert_eq!(stored.stay.check_in(), date(28));
    assert_eq!(stored.stay.check_out(), date(30));
}
