//! Driving port for the public apartment catalogue.

use async_trait::async_trait;

use crate::domain::{Apartment, ApartmentFilter, ApartmentId, Error};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ApartmentQuery: Send + Sync {
    /// Available listings matching the filter, newest first.
    async fn list(&self, filter: ApartmentFilter) -> Result<Vec<Apartment>, Error>;

    async fn get(&self, id: ApartmentId) -> Result<Apartment, Error>;
}
