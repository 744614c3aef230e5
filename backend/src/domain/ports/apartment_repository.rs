//! Port for apartment listings and their images.

use async_trait::async_trait;

use crate::domain::{Apartment, ApartmentFilter, ApartmentId};

use super::define_port_error;

define_port_error! {
    /// Errors raised by apartment repository adapters.
    pub enum ApartmentRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } => "apartment repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "apartment repository query failed: {message}",
        /// Bookings still reference the apartment.
        InUse { message: String } => "apartment is still referenced: {message}",
    }
}

/// Port for reading and writing apartments with embedded images.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ApartmentRepository: Send + Sync {
    /// Persist the apartment and its images in one unit of work.
    async fn insert(&self, apartment: &Apartment) -> Result<(), ApartmentRepositoryError>;

    /// Overwrite the scalar fields of an apartment. Images are left as stored.
    async fn update(&self, apartment: &Apartment) -> Result<(), ApartmentRepositoryError>;

    /// Delete images then the apartment; `false` when nothing matched.
    async fn delete(&self, id: &ApartmentId) -> Result<bool, ApartmentRepositoryError>;

    async fn find_by_id(
        &self,
        id: &ApartmentId,
    ) -> Result<Option<Apartment>, ApartmentRepositoryError>;

    /// Listings matching `filter`, newest first.
    async fn list(
        &self,
        filter: &ApartmentFilter,
    ) -> Result<Vec<Apartment>, ApartmentRepositoryError>;
}
