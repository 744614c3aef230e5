//! Test helpers for inbound HTTP components.

use std::sync::Arc;

use actix_session::{SessionMiddleware, storage::CookieSessionStore};
use actix_web::cookie::{Cookie, Key};
use actix_web::dev::{Service, ServiceResponse};
use actix_web::{App, test, web};
use async_trait::async_trait;
use serde_json::{Value, json};

use crate::domain::fixtures::{FixtureClock, sample_apartment, sample_user, ts};
use crate::domain::ports::{
    ApartmentRepository, PasswordHashError, PasswordHasher, UserRepository,
};
use crate::domain::{Apartment, BookingUpdatePolicy, Role, User};
use crate::inbound::http::configure_api;
use crate::inbound::http::state::{HttpState, Repositories};
use crate::outbound::memory::MemoryStore;

/// Password every seeded account signs in with.
pub const PASSWORD: &str = "correct horse battery";

/// Session middleware with a fresh key and the `Secure` flag off for plain
/// HTTP tests.
pub fn test_session_middleware() -> SessionMiddleware<CookieSessionStore> {
    SessionMiddleware::builder(CookieSessionStore::default(), Key::generate())
        .cookie_name("session".to_owned())
        .cookie_secure(false)
        .build()
}

/// Reversible stand-in for Argon2 so handler tests stay fast.
#[derive(Debug, Default, Clone, Copy)]
pub struct PlainHasher;

#[async_trait]
impl PasswordHasher for PlainHasher {
    async fn hash(&self, password: &str) -> Result<String, PasswordHashError> {
        Ok(format!("plain:{password}"))
    }

    async fn verify(&self, password: &str, hash: &str) -> Result<bool, PasswordHashError> {
        hash.strip_prefix("plain:")
            .map(|stored| stored == password)
            .ok_or_else(|| PasswordHashError::malformed_hash("missing plain: prefix"))
    }
}

/// Handler state over `store`, with "today" pinned to 2024-12-01.
pub fn memory_state(store: &MemoryStore) -> HttpState {
    let store = Arc::new(store.clone());
    HttpState::from_repositories(
        Repositories {
            users: Arc::clone(&store),
            apartments: Arc::clone(&store),
            bookings: store,
            hasher: Arc::new(PlainHasher),
        },
        Arc::new(FixtureClock(ts(2024, 12, 1))),
        BookingUpdatePolicy::Strict,
    )
}

/// Store an account that signs in with [`PASSWORD`].
pub async fn seed_user(store: &MemoryStore, role: Role) -> User {
    let user = sample_user(role);
    UserRepository::insert(store, &user, &format!("plain:{PASSWORD}"))
        .await
        .expect("seed user");
    user
}

/// Store an available listing sleeping four at 150 per night.
pub async fn seed_apartment(store: &MemoryStore) -> Apartment {
    let apartment = sample_apartment(150, 4);
    ApartmentRepository::insert(store, &apartment)
        .await
        .expect("seed apartment");
    apartment
}

/// Full API app over the in-memory store.
pub async fn init_app(
    store: &MemoryStore,
) -> impl Service<actix_http::Request, Response = ServiceResponse, Error = actix_web::Error> {
    test::init_service(
        App::new()
            .app_data(web::Data::new(memory_state(store)))
            .service(
                web::scope("/api/v1")
                    .wrap(test_session_middleware())
                    .configure(configure_api),
            ),
    )
    .await
}

/// Sign `user` in and return the session cookie.
pub async fn login_cookie<S>(app: &S, user: &User) -> Cookie<'static>
where
    S: Service<actix_http::Request, Response = ServiceResponse, Error = actix_web::Error>,
{
    let request = test::TestRequest::post()
        .uri("/api/v1/auth/login")
        .set_json(json!({"email": user.email.as_ref(), "password": PASSWORD}))
        .to_request();
    let response = test::call_service(app, request).await;
    assert!(response.status().is_success(), "login failed: {}", response.status());
    response
        .response()
        .cookies()
        .find(|cookie| cookie.name() == "session")
        .map(Cookie::into_owned)
        .expect("session cookie")
}

/// Read a response body as JSON.
pub async fn json_body(response: ServiceResponse) -> Value {
    let bytes = test::read_body(response).await;
    serde_json::from_slice(&bytes).expect("JSON body")
}
