//! Account and authentication endpoints over the in-memory store.

use actix_web::http::StatusCode;
use actix_web::test;
use rstest::rstest;
use serde_json::json;

use crate::domain::Role;
use crate::inbound::http::test_utils::{
    PASSWORD, init_app, json_body, login_cookie, seed_user,
};
use crate::outbound::memory::MemoryStore;

#[actix_web::test]
async fn registration_signs_the_new_account_in() {
    let store = MemoryStore::new();
    let app = init_app(&store).await;

    let response = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/api/v1/auth/register")
            .set_json(json!({
                "email": "Grace@Example.com",
                "password": PASSWORD,
                "fullName": "Grace Hopper",
            }))
            .to_request(),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let cookie = response
        .response()
        .cookies()
        .find(|cookie| cookie.name() == "session")
        .map(|cookie| cookie.into_owned())
        .expect("session cookie");
    let body = json_body(response).await;
    assert_eq!(body["email"], "grace@example.com");
    assert_eq!(body["role"], "user");
    assert!(body.get("passwordHash").is_none());

    let me = test::call_service(
        &app,
        test::TestRequest::get()
            .uri("/api/v1/users/me")
            .cookie(cookie)
            .to_request(),
    )
    .await;
    assert_eq!(me.status(), StatusCode::OK);
    assert_eq!(json_body(me).await["fullName"], "Grace Hopper");
}

#[actix_web::test]
async fn duplicate_registration_is_a_conflict() {
    let store = MemoryStore::new();
    let existing = seed_user(&store, Role::User).await;
    let app = init_app(&store).await;

    let response = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/api/v1/auth/register")
            .set_json(json!({
                "email": existing.email.as_ref(),
                "password": PASSWORD,
                "fullName": "Someone Else",
            }))
            .to_request(),
    )
    .await;

    assert_eq!(response.status(), StatusCode::CONFLICT);
    assert_eq!(json_body(response).await["code"], "conflict");
}

#[rstest]
#[case("nobody@example.com", PASSWORD)]
#[case("", "wrong password")]
#[actix_web::test]
async fn bad_credentials_are_rejected(#[case] email: &str, #[case] password: &str) {
    let store = MemoryStore::new();
    let user = seed_user(&store, Role::User).await;
    let app = init_app(&store).await;
    let email = if email.is_empty() {
        user.email.as_ref().to_owned()
    } else {
        email.to_owned()
    };

    let response = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/api/v1/auth/login")
            .set_json(json!({"email": email, "password": password}))
            .to_request(),
    )
    .await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(json_body(response).await["message"], "invalid credentials");
}

#[actix_web::test]
async fn anonymous_profile_reads_are_unauthorised() {
    let store = MemoryStore::new();
    let app = init_app(&store).await;

    let response = test::call_service(
        &app,
        test::TestRequest::get().uri("/api/v1/users/me").to_request(),
    )
    .await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[actix_web::test]
async fn logout_returns_no_content() {
    let store = MemoryStore::new();
    let user = seed_user(&store, Role::User).await;
    let app = init_app(&store).await;
    let cookie = login_cookie(&app, &user).await;

    let response = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/api/v1/auth/logout")
            .cookie(cookie)
            .to_request(),
    )
    .await;

    assert_eq!(response.status(), StatusCode::NO_CONTENT);
}

#[rstest]
#[case(Role::User, StatusCode::FORBIDDEN)]
#[case(Role::Admin, StatusCode::OK)]
#[actix_web::test]
async fn user_listing_is_for_administrators(#[case] role: Role, #[case] expected: StatusCode) {
    let store = MemoryStore::new();
    let caller = seed_user(&store, role).await;
    let app = init_app(&store).await;
    let cookie = login_cookie(&app, &caller).await;

    let response = test::call_service(
        &app,
        test::TestRequest::get()
            .uri("/api/v1/users")
            .cookie(cookie)
            .to_request(),
    )
    .await;

    assert_eq!(response.status(), expected);
}

#[actix_web::test]
async fn guests_cannot_read_other_profiles() {
    let store = MemoryStore::new();
    let caller = seed_user(&store, Role::User).await;
    let other = seed_user(&store, Role::User).await;
    let app = init_app(&store).await;
    let cookie = login_cookie(&app, &caller).await;

    let response = test::call_service(
        &app,
        test::TestRequest::get()
            .uri(&format!("/api/v1/users/{}", other.id))
            .cookie(cookie)
            .to_request(),
    )
    .await;

    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[actix_web::test]
async fn malformed_user_ids_are_bad_requests() {
    let store = MemoryStore::new();
    let admin = seed_user(&store, Role::Admin).await;
    let app = init_app(&store).await;
    let cookie = login_cookie(&app, &admin).await;

    let response = test::call_service(
        &app,
        test::TestRequest::get()
            .uri("/api/v1/users/not-a-uuid")
            .cookie(cookie)
            .to_request(),
    )
    .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(json_body(response).await["details"]["code"], "invalid_uuid");
}

#[actix_web::test]
async fn profile_edits_validate_and_apply() {
    let store = MemoryStore::new();
    let user = seed_user(&store, Role::User).await;
    let app = init_app(&store).await;
    let cookie = login_cookie(&app, &user).await;

    let rejected = test::call_service(
        &app,
        test::TestRequest::patch()
            .uri("/api/v1/users/me")
            .cookie(cookie.clone())
            .set_json(json!({"phone": "call me maybe"}))
            .to_request(),
    )
    .await;
    assert_eq!(rejected.status(), StatusCode::BAD_REQUEST);
    assert_eq!(json_body(rejected).await["details"]["field"], "phone");

    let accepted = test::call_service(
        &app,
        test::TestRequest::patch()
            .uri("/api/v1/users/me")
            .cookie(cookie)
            .set_json(json!({"fullName": "Ada King", "phone": "+44 20 7946 0958"}))
            .to_request(),
    )
    .await;
    assert_eq!(accepted.status(), StatusCode::OK);
    let body = json_body(accepted).await;
    assert_eq!(body["fullName"], "Ada King");
    assert_eq!(body["phone"], "+44 20 7946 0958");
}

#[actix_web::test]
async fn admins_delete_accounts() {
    let store = MemoryStore::new();
    let admin = seed_user(&store, Role::Admin).await;
    let target = seed_user(&store, Role::User).await;
    let app = init_app(&store).await;
    let cookie = login_cookie(&app, &admin).await;
    let uri = format!("/api/v1/users/{}", target.id);

    let deleted = test::call_service(
        &app,
        test::TestRequest::delete()
            .uri(&uri)
            .cookie(cookie.clone())
            .to_request(),
    )
    .await;
    assert_eq!(deleted.status(), StatusCode::NO_CONTENT);

    let again = test::call_service(
        &app,
        test::TestRequest::delete().uri(&uri).cookie(cookie).to_request(),
    )
    .await;
    assert_eq!(again.status(), StatusCode::NOT_FOUND);
}

#[actix_web::test]
async fn malformed_json_is_an_invalid_request() {
    let store = MemoryStore::new();
    let app = init_app(&store).await;

    let response = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/api/v1/auth/login")
            .insert_header(("content-type", "application/json"))
            .set_payload("{not json")
            .to_request(),
    )
    .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(json_body(response).await["code"], "invalid_request");
}
