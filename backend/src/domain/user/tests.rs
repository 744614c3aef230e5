//! Tests for user field validation.

use super::*;
use chrono::TimeZone;
use rstest::rstest;

#[rstest]
#[case("3fa85f64-5717-4562-b3fc-2c963f66afa6", true)]
#[case(" 3fa85f64-5717-4562-b3fc-2c963f66afa6", false)]
#[case("not-a-uuid", false)]
#[case("", false)]
fn user_id_parsing(#[case] raw: &str, #[case] ok: bool) {
    assert_eq!(UserId::new(raw).is_ok(), ok);
}

#[rstest]
fn email_is_normalised() {
    let email = Email::new("  Ada@Example.COM ").expect("valid email");
    assert_eq!(email.as_ref(), "ada@example.com");
}

#[rstest]
#[case("ada")]
#[case("ada@")]
#[case("ada@example")]
#[case("a da@example.com")]
fn email_rejects_malformed_input(#[case] raw: &str) {
    assert_eq!(Email::new(raw), Err(UserValidationError::InvalidEmail));
}

#[rstest]
#[case(1, false)]
#[case(2, true)]
#[case(100, true)]
#[case(101, false)]
fn full_name_length_bounds(#[case] length: usize, #[case] ok: bool) {
    assert_eq!(FullName::new("x".repeat(length)).is_ok(), ok);
}

#[rstest]
#[case("+54 11 5555-1234", Ok(()))]
#[case("(011) 555 1234", Ok(()))]
#[case("   ", Err(UserValidationError::EmptyPhone))]
#[case("555-CALL", Err(UserValidationError::PhoneInvalidCharacters))]
fn phone_validation(#[case] raw: &str, #[case] expected: Result<(), UserValidationError>) {
    assert_eq!(PhoneNumber::new(raw).map(|_| ()), expected);
}

#[rstest]
fn role_round_trips_through_strings() {
    for role in [Role::User, Role::Admin] {
        assert_eq!(role.as_str().parse::<Role>(), Ok(role));
    }
    assert!(matches!(
        "owner".parse::<Role>(),
        Err(UserValidationError::UnknownRole(_))
    ));
}

#[rstest]
fn patch_only_touches_provided_fields() {
    let created = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).single().expect("timestamp");
    let later = Utc.with_ymd_and_hms(2024, 2, 1, 0, 0, 0).single().expect("timestamp");
    let user = User {
        id: UserId::random(),
        email: Email::new("ada@example.com").expect("email"),
        full_name: FullName::new("Ada Lovelace").expect("name"),
        phone: None,
        role: Role::User,
        created_at: created,
        updated_at: created,
    };

    let patch = UserPatch {
        phone: Some(PhoneNumber::new("+44 20 7946 0000").expect("phone")),
        ..UserPatch::default()
    };
    let updated = patch.apply(user.clone(), later);

    assert_eq!(updated.email, user.email);
    assert_eq!(updated.full_name, user.full_name);
    assert_eq!(
        updated.phone.as_ref().map(AsRef::as_ref),
        Some("+44 20 7946 0000")
    );
    assert_eq!(updated.updated_at, later);
    assert_eq!(updated.created_at, created);
}

#[rstest]
fn user_serialises_camel_case() {
    let at = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).single().expect("timestamp");
    let user = User {
        id: UserId::new("3fa85f64-5717-4562-b3fc-2c963f66afa6").expect("id"),
        email: Email::new("ada@example.com").expect("email"),
        full_name: FullName::new("Ada Lovelace").expect("name"),
        phone: None,
        role: Role::Admin,
        created_at: at,
        updated_at: at,
    };
    let value = serde_json::to_value(&user).expect("serialise");
    assert_eq!(value["fullName"], "Ada Lovelace");
    assert_eq!(value["role"], "admin");
    assert!(value.get("passwordHash").is_none());
}
