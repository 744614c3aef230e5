//! Driving port for apartment administration.

use async_trait::async_trait;

use crate::domain::{Apartment, ApartmentDraft, ApartmentId, ApartmentPatch, Error, Requester};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ApartmentCommand: Send + Sync {
    async fn create(&self, requester: &Requester, draft: ApartmentDraft)
    -> Result<Apartment, Error>;

    async fn update(
        &self,
        requester: &Requester,
        id: ApartmentId,
        patch: ApartmentPatch,
    ) -> Result<Apartment, Error>;

    async fn delete(&self, requester: &Requester, id: ApartmentId) -> Result<(), Error>;
}
