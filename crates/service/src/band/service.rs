use std::sync::Arc;
use serde_json::Value;
use tracing::{info, instrument};

use models::band::{self, BandPayload};
use crate::band::repository::BandRepository;
use crate::errors::ServiceError;

/// Application service for bands.
/// Holds no state of its own; validates payloads and ids, then makes exactly
/// one repository call.
pub struct BandService<R: BandRepository + ?Sized> {
    repo: Arc<R>,
}

impl<R: BandRepository + ?Sized> BandService<R> {
    pub fn new(repo: Arc<R>) -> Self { Self { repo } }

    #[instrument(skip_all)]
    pub async fn create(&self, body: &Value) -> Result<band::Model, ServiceError> {
        let payload = BandPayload::from_json(body)?;
        let created = self.repo.create(&payload).await?;
        info!(id = %created.id, "band_created");
        Ok(created)
    }

    pub async fn list(&self) -> Result<Vec<band::Model>, ServiceError> { self.repo.list().await }

    /// A malformed id is a store-level fault, not a miss.
    pub async fn get(&self, id: &str) -> Result<Option<band::Model>, ServiceError> {
        let id = band::parse_id(id)?;
        self.repo.get(id).await
    }

    #[instrument(skip(self, body))]
    pub async fn update(&self, id: &str, body: &Value) -> Result<band::Model, ServiceError> {
        let id = band::parse_id(id)?;
        let payload = BandPayload::from_json(body)?;
        let updated = self.repo.update(id, &payload).await?;
        info!(id = %updated.id, "band_updated");
        Ok(updated)
    }

    #[instrument(skip(self))]
    pub async fn delete(&self, id: &str) -> Result<band::Model, ServiceError> {
        let id = band::parse_id(id)?;
        let deleted = self.repo.delete(id).await?;
        info!(id = %deleted.id, "band_deleted");
        Ok(deleted)
    }
}
