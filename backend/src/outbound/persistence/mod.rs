//! PostgreSQL persistence adapters using Diesel ORM.
//!
//! Repositories translate between Diesel rows and domain types; they hold no
//! booking rules beyond the storage-level overlap guard on insert. Connections
//! come from a `bb8` pool driven by `diesel-async`.
//!
//! # Example
//!
//! ```ignore
//! use backend::outbound::persistence::{DbPool, DieselBookingRepository, PoolConfig};
//!
//! let pool = DbPool::new(PoolConfig::new("postgres://localhost/booking")).await?;
//! let bookings = DieselBookingRepository::new(pool);
//! ```

mod diesel_apartment_repository;
mod diesel_basic_error_mapping;
mod diesel_booking_repository;
mod diesel_user_repository;
mod mapping;
mod migrations;
mod models;
mod pool;
mod schema;

pub use diesel_apartment_repository::DieselApartmentRepository;
pub use diesel_booking_repository::DieselBookingRepository;
pub use diesel_user_repository::DieselUserRepository;
pub use migrations::{MigrationError, run_migrations};
pub use pool::{DbPool, PoolConfig, PoolError};
