//! Builds handler state over either PostgreSQL or the in-memory store.

use std::sync::Arc;

use actix_web::web;
use mockable::DefaultClock;
use tracing::info;

use backend::domain::BookingUpdatePolicy;
use backend::inbound::http::state::{HttpState, Repositories};
use backend::outbound::credentials::Argon2PasswordHasher;
use backend::outbound::memory::MemoryStore;
use backend::outbound::persistence::{
    DbPool, DieselApartmentRepository, DieselBookingRepository, DieselUserRepository,
};

use super::ServerConfig;

fn diesel_state(pool: &DbPool, policy: BookingUpdatePolicy) -> HttpState {
    HttpState::from_repositories(
        Repositories {
            users: Arc::new(DieselUserRepository::new(pool.clone())),
            apartments: Arc::new(DieselApartmentRepository::new(pool.clone())),
            bookings: Arc::new(DieselBookingRepository::new(pool.clone())),
            hasher: Arc::new(Argon2PasswordHasher::new()),
        },
        Arc::new(DefaultClock),
        policy,
    )
}

fn memory_state(policy: BookingUpdatePolicy) -> HttpState {
    let store = Arc::new(MemoryStore::new());
    HttpState::from_repositories(
        Repositories {
            users: Arc::clone(&store),
            apartments: Arc::clone(&store),
            bookings: store,
            hasher: Arc::new(Argon2PasswordHasher::new()),
        },
        Arc::new(DefaultClock),
        policy,
    )
}

/// Build the shared HTTP state, preferring the database when one is set.
pub(super) fn build_http_state(config: &ServerConfig) -> web::Data<HttpState> {
    let policy = config.update_policy;
    let state = match &config.db_pool {
        Some(pool) => {
            info!(?policy, "serving bookings from PostgreSQL");
            diesel_state(pool, policy)
        }
        None => {
            info!(?policy, "no database configured; using the in-memory store");
            memory_state(policy)
        }
    };
    web::Data::new(state)
}
