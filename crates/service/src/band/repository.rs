use std::sync::Arc;

use async_trait::async_trait;
use models::band::{self, BandPayload};
use sea_orm::DatabaseConnection;
use uuid::Uuid;

use crate::errors::ServiceError;
use crate::storage::memory_band_store::MemoryBandStore;

/// Record store for bands. Every method is a single store operation.
#[async_trait]
pub trait BandRepository: Send + Sync {
    async fn list(&self) -> Result<Vec<band::Model>, ServiceError>;
    async fn create(&self, payload: &BandPayload) -> Result<band::Model, ServiceError>;
    async fn get(&self, id: Uuid) -> Result<Option<band::Model>, ServiceError>;
    async fn update(&self, id: Uuid, payload: &BandPayload) -> Result<band::Model, ServiceError>;
    async fn delete(&self, id: Uuid) -> Result<band::Model, ServiceError>;
}

/// SeaORM-backed repository implementation.
pub struct SeaOrmBandRepository {
    pub db: DatabaseConnection,
}

#[async_trait]
impl BandRepository for SeaOrmBandRepository {
    async fn list(&self) -> Result<Vec<band::Model>, ServiceError> {
        crate::db::band_service::list_bands(&self.db).await
    }

    async fn create(&self, payload: &BandPayload) -> Result<band::Model, ServiceError> {
        crate::db::band_service::create_band(&self.db, payload).await
    }

    async fn get(&self, id: Uuid) -> Result<Option<band::Model>, ServiceError> {
        crate::db::band_service::get_band(&self.db, id).await
    }

    async fn update(&self, id: Uuid, payload: &BandPayload) -> Result<band::Model, ServiceError> {
        crate::db::band_service::update_band(&self.db, id, payload).await
    }

    async fn delete(&self, id: Uuid) -> Result<band::Model, ServiceError> {
        crate::db::band_service::delete_band(&self.db, id).await
    }
}

/// In-process repository, used by tests and `memory://` deployments.
pub struct MemoryBandRepository {
    pub store: Arc<MemoryBandStore>,
}

impl MemoryBandRepository {
    pub fn new() -> Self {
        Self { store: MemoryBandStore::new() }
    }
}

impl Default for MemoryBandRepository {
    fn default() -> Self { Self::new() }
}

#[async_trait]
impl BandRepository for MemoryBandRepository {
    async fn list(&self) -> Result<Vec<band::Model>, ServiceError> {
        Ok(self.store.list().await)
    }

    async fn create(&self, payload: &BandPayload) -> Result<band::Model, ServiceError> {
        self.store.insert(payload).await
    }

    async fn get(&self, id: Uuid) -> Result<Option<band::Model>, ServiceError> {
        Ok(self.store.get(&id).await)
    }

    async fn update(&self, id: Uuid, payload: &BandPayload) -> Result<band::Model, ServiceError> {
        self.store.update(&id, payload).await?.ok_or_else(|| ServiceError::not_found("band"))
    }

    async fn delete(&self, id: Uuid) -> Result<band::Model, ServiceError> {
        self.store.remove(&id).await?.ok_or_else(|| ServiceError::not_found("band"))
    }
}
