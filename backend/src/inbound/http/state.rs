//! Shared HTTP adapter state.
//!
//! Handlers receive this through `web::Data` and only see the driving ports,
//! so they can be exercised against in-memory adapters or mocks.

use std::sync::Arc;

use mockable::Clock;

use crate::domain::ports::{
    ApartmentCommand, ApartmentQuery, ApartmentRepository, BookingCommand, BookingQuery,
    BookingRepository, LoginService, PasswordHasher, RegistrationService, UserRepository,
    UsersCommand, UsersQuery,
};
use crate::domain::{
    ApartmentService, AuthService, BookingService, BookingUpdatePolicy, UserService,
};

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    pub login: Arc<dyn LoginService>,
    pub registration: Arc<dyn RegistrationService>,
    pub users: Arc<dyn UsersQuery>,
    pub users_command: Arc<dyn UsersCommand>,
    pub apartments: Arc<dyn ApartmentQuery>,
    pub apartments_command: Arc<dyn ApartmentCommand>,
    pub bookings: Arc<dyn BookingQuery>,
    pub bookings_command: Arc<dyn BookingCommand>,
}

/// Driven adapters the domain services are built on.
pub struct Repositories<U, A, B, H> {
    pub users: Arc<U>,
    pub apartments: Arc<A>,
    pub bookings: Arc<B>,
    pub hasher: Arc<H>,
}

impl HttpState {
    /// Compose the domain services over a set of driven adapters.
    pub fn from_repositories<U, A, B, H>(
        repos: Repositories<U, A, B, H>,
        clock: Arc<dyn Clock>,
        policy: BookingUpdatePolicy,
    ) -> Self
    where
        U: UserRepository + 'static,
        A: ApartmentRepository + 'static,
        B: BookingRepository + 'static,
        H: PasswordHasher + 'static,
    {
        let Repositories {
            users,
            apartments,
            bookings,
            hasher,
        } = repos;
        let auth = Arc::new(AuthService::new(Arc::clone(&users), hasher, Arc::clone(&clock)));
        let accounts = Arc::new(UserService::new(users, Arc::clone(&clock)));
        let catalogue = Arc::new(ApartmentService::new(
            Arc::clone(&apartments),
            Arc::clone(&clock),
        ));
        let workflow = Arc::new(
            BookingService::new(bookings, apartments, clock).with_update_policy(policy),
        );
        Self {
            login: auth.clone(),
            registration: auth,
            users: accounts.clone(),
            users_command: accounts,
            apartments: catalogue.clone(),
            apartments_command: catalogue,
            bookings: workflow.clone(),
            bookings_command: workflow,
        }
    }
}
