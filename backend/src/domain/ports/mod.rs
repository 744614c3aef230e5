//! Domain ports and supporting types for the hexagonal boundary.
//!
//! Driven ports (`*Repository`, [`PasswordHasher`]) are implemented by the
//! outbound adapters. Driving ports (`*Command`, `*Query`, [`LoginService`],
//! [`RegistrationService`]) are implemented by the domain services and called
//! by the HTTP adapter.

mod macros;
pub(crate) use macros::define_port_error;

mod apartment_command;
mod apartment_query;
mod apartment_repository;
mod booking_command;
mod booking_query;
mod booking_repository;
mod login_service;
mod password_hasher;
mod user_repository;
mod users_command;
mod users_query;

pub use apartment_command::ApartmentCommand;
#[cfg(test)]
pub use apartment_command::MockApartmentCommand;
pub use apartment_query::ApartmentQuery;
#[cfg(test)]
pub use apartment_query::MockApartmentQuery;
#[cfg(test)]
pub use apartment_repository::MockApartmentRepository;
pub use apartment_repository::{ApartmentRepository, ApartmentRepositoryError};
pub use booking_command::BookingCommand;
#[cfg(test)]
pub use booking_command::MockBookingCommand;
pub use booking_query::BookingQuery;
#[cfg(test)]
pub use booking_query::MockBookingQuery;
#[cfg(test)]
pub use booking_repository::MockBookingRepository;
pub use booking_repository::{BookingRepository, BookingRepositoryError};
pub use login_service::{LoginService, RegistrationService};
#[cfg(test)]
pub use login_service::{MockLoginService, MockRegistrationService};
#[cfg(test)]
pub use password_hasher::MockPasswordHasher;
pub use password_hasher::{PasswordHashError, PasswordHasher};
#[cfg(test)]
pub use user_repository::MockUserRepository;
pub use user_repository::{StoredAccount, UserPersistenceError, UserRepository};
#[cfg(test)]
pub use users_command::MockUsersCommand;
pub use users_command::UsersCommand;
#[cfg(test)]
pub use users_query::MockUsersQuery;
pub use users_query::UsersQuery;
