//! Apartment catalogue service.
//!
//! Reads are public; every mutation requires an administrator.

use std::sync::Arc;

use async_trait::async_trait;
use mockable::Clock;
use tracing::info;

use crate::domain::ports::{
    ApartmentCommand, ApartmentQuery, ApartmentRepository, ApartmentRepositoryError,
};
use crate::domain::{
    Apartment, ApartmentDraft, ApartmentFilter, ApartmentId, ApartmentPatch, Error, Requester,
};

fn map_repository_error(error: ApartmentRepositoryError) -> Error {
    match error {
        ApartmentRepositoryError::Connection { message } => {
            Error::service_unavailable(format!("apartment repository unavailable: {message}"))
        }
        ApartmentRepositoryError::Query { message } => {
            Error::internal(format!("apartment repository error: {message}"))
        }
        ApartmentRepositoryError::InUse { .. } => Error::invalid_request(
            "apartment has bookings and cannot be deleted",
        )
        .with_details(serde_json::json!({ "reason": "invalid_input" })),
    }
}

fn require_admin(requester: &Requester) -> Result<(), Error> {
    if requester.is_privileged() {
        Ok(())
    } else {
        Err(Error::forbidden("administrator role required"))
    }
}

fn not_found(id: ApartmentId) -> Error {
    Error::not_found(format!("apartment {id} not found"))
}

/// Catalogue service implementing [`ApartmentQuery`] and [`ApartmentCommand`].
#[derive(Clone)]
pub struct ApartmentService<R> {
    repo: Arc<R>,
    clock: Arc<dyn Clock>,
}

impl<R> ApartmentService<R> {
    pub fn new(repo: Arc<R>, clock: Arc<dyn Clock>) -> Self {
        Self { repo, clock }
    }
}

#[async_trait]
impl<R> ApartmentQuery for ApartmentService<R>
where
    R: ApartmentRepository,
{
    async fn list(&self, filter: ApartmentFilter) -> Result<Vec<Apartment>, Error> {
        self.repo.list(&filter).await.map_err(map_repository_error)
    }

    async fn get(&self, id: ApartmentId) -> Result<Apartment, Error> {
        self.repo
            .find_by_id(&id)
            .await
            .map_err(map_repository_error)?
            .ok_or_else(|| not_found(id))
    }
}

#[async_trait]
impl<R> ApartmentCommand for ApartmentService<R>
where
    R: ApartmentRepository,
{
    async fn create(
        &self,
        requester: &Requester,
        draft: ApartmentDraft,
    ) -> Result<Apartment, Error> {
        require_admin(requester)?;
        let apartment = draft.into_apartment(ApartmentId::random(), self.clock.utc())?;
        self.repo
            .insert(&apartment)
            .await
            .map_err(map_repository_error)?;
        info!(apartment_id = %apartment.id, images = apartment.images.len(), "apartment created");
        Ok(apartment)
    }

    async fn update(
        &self,
        requester: &Requester,
        id: ApartmentId,
        patch: ApartmentPatch,
    ) -> Result<Apartment, Error> {
        require_admin(requester)?;
        let current = self.get(id).await?;
        let updated = patch.apply(current, self.clock.utc())?;
        self.repo
            .update(&updated)
            .await
            .map_err(map_repository_error)?;
        info!(apartment_id = %id, "apartment updated");
        Ok(updated)
    }

    async fn delete(&self, requester: &Requester, id: ApartmentId) -> Result<(), Error> {
        require_admin(requester)?;
        let removed = self.repo.delete(&id).await.map_err(map_repository_error)?;
        if !removed {
            return Err(not_found(id));
        }
        info!(apartment_id = %id, "apartment deleted");
        Ok(())
    }
}
