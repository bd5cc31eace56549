use std::{collections::HashMap, io::ErrorKind, path::PathBuf, sync::Arc};
use tokio::{fs, sync::RwLock};
use uuid::Uuid;

use models::band::{self, BandPayload};
use crate::errors::ServiceError;

#[derive(Clone)]
struct Slot {
    seq: u64,
    band: band::Model,
}

#[derive(Default)]
struct Inner {
    rows: HashMap<Uuid, Slot>,
    next_seq: u64,
}

/// Band store kept in process memory, optionally mirrored to a JSON file.
///
/// Each operation takes the lock once, so single-record operations are atomic
/// with respect to each other. Listing ties that survive the year/name order
/// fall back to insertion order.
#[derive(Clone)]
pub struct MemoryBandStore {
    inner: Arc<RwLock<Inner>>,
    file_path: Option<PathBuf>,
}

impl MemoryBandStore {
    pub fn new() -> Arc<Self> {
        Arc::new(Self { inner: Arc::new(RwLock::new(Inner::default())), file_path: None })
    }

    /// Load from `path`, creating the file with an empty list only if it does not exist.
    pub async fn with_file<P: Into<PathBuf>>(path: P) -> Result<Arc<Self>, ServiceError> {
        let file_path = path.into();
        if let Some(parent) = file_path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).await.map_err(|e| ServiceError::Db(e.to_string()))?;
        }

        let bands: Vec<band::Model> = match fs::read(&file_path).await {
            Ok(bytes) => serde_json::from_slice(&bytes).map_err(|e| ServiceError::Db(e.to_string()))?,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                fs::write(&file_path, b"[]").await.map_err(|e| ServiceError::Db(e.to_string()))?;
                Vec::new()
            }
            Err(e) => return Err(ServiceError::Db(format!("cannot read {}: {e}", file_path.display()))),
        };

        let mut inner = Inner::default();
        for b in bands {
            let seq = inner.next_seq;
            inner.next_seq += 1;
            inner.rows.insert(b.id, Slot { seq, band: b });
        }
        Ok(Arc::new(Self { inner: Arc::new(RwLock::new(inner)), file_path: Some(file_path) }))
    }

    async fn save(&self, inner: &Inner) -> Result<(), ServiceError> {
        let Some(path) = &self.file_path else { return Ok(()) };
        let mut slots: Vec<&Slot> = inner.rows.values().collect();
        slots.sort_by_key(|s| s.seq);
        let bands: Vec<&band::Model> = slots.into_iter().map(|s| &s.band).collect();
        let data = serde_json::to_vec_pretty(&bands).map_err(|e| ServiceError::Db(e.to_string()))?;
        fs::write(path, data).await.map_err(|e| ServiceError::Db(e.to_string()))?;
        Ok(())
    }

    pub async fn list(&self) -> Vec<band::Model> {
        let inner = self.inner.read().await;
        let mut slots: Vec<&Slot> = inner.rows.values().collect();
        slots.sort_by(|a, b| band::listing_order(&a.band, &b.band).then(a.seq.cmp(&b.seq)));
        slots.into_iter().map(|s| s.band.clone()).collect()
    }

    /// Insert and persist. A failed write leaves the store as it was.
    pub async fn insert(&self, payload: &BandPayload) -> Result<band::Model, ServiceError> {
        let mut inner = self.inner.write().await;
        let created = payload.to_model(Uuid::new_v4());
        let seq = inner.next_seq;
        inner.next_seq += 1;
        inner.rows.insert(created.id, Slot { seq, band: created.clone() });
        if let Err(e) = self.save(&inner).await {
            inner.rows.remove(&created.id);
            inner.next_seq = seq;
            return Err(e);
        }
        Ok(created)
    }

    pub async fn get(&self, id: &Uuid) -> Option<band::Model> {
        let inner = self.inner.read().await;
        inner.rows.get(id).map(|s| s.band.clone())
    }

    /// Merge and persist; `None` if the id is unknown. A failed write restores the previous band.
    pub async fn update(&self, id: &Uuid, payload: &BandPayload) -> Result<Option<band::Model>, ServiceError> {
        let mut inner = self.inner.write().await;
        let Some(slot) = inner.rows.get_mut(id) else { return Ok(None) };
        let previous = slot.band.clone();
        payload.apply_to(&mut slot.band);
        let updated = slot.band.clone();
        if let Err(e) = self.save(&inner).await {
            if let Some(slot) = inner.rows.get_mut(id) {
                slot.band = previous;
            }
            return Err(e);
        }
        Ok(Some(updated))
    }

    /// Remove and persist; returns the removed band if it existed. A failed write puts it back.
    pub async fn remove(&self, id: &Uuid) -> Result<Option<band::Model>, ServiceError> {
        let mut inner = self.inner.write().await;
        let Some(slot) = inner.rows.remove(id) else { return Ok(None) };
        if let Err(e) = self.save(&inner).await {
            inner.rows.insert(*id, slot);
            return Err(e);
        }
        Ok(Some(slot.band))
    }
}
