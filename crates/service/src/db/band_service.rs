use sea_orm::DatabaseConnection;
use uuid::Uuid;
use models::band::{self, BandPayload};
use crate::errors::ServiceError;

/// List all bands, year descending then name ascending.
pub async fn list_bands(db: &DatabaseConnection) -> Result<Vec<band::Model>, ServiceError> {
    Ok(band::list_sorted(db).await?)
}

/// Insert a validated payload; the id is generated here.
pub async fn create_band(db: &DatabaseConnection, payload: &BandPayload) -> Result<band::Model, ServiceError> {
    Ok(band::create(db, payload).await?)
}

/// Get a band by id.
pub async fn get_band(db: &DatabaseConnection, id: Uuid) -> Result<Option<band::Model>, ServiceError> {
    Ok(band::find(db, id).await?)
}

/// Merge the present payload fields into the stored band.
pub async fn update_band(db: &DatabaseConnection, id: Uuid, payload: &BandPayload) -> Result<band::Model, ServiceError> {
    band::update(db, id, payload).await?.ok_or_else(|| ServiceError::not_found("band"))
}

/// Delete a band, returning its last contents.
pub async fn delete_band(db: &DatabaseConnection, id: Uuid) -> Result<band::Model, ServiceError> {
    band::delete(db, id).await?.ok_or_else(|| ServiceError::not_found("band"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::get_db;
    use serde_json::json;

    #[tokio::test]
    async fn band_crud_service() -> Result<(), anyhow::Error> {
        let Some(db) = get_db().await? else { return Ok(()) };

        let p = BandPayload::from_json(&json!({"name": "svc band", "dayOfWeek": "Saturday", "year": 2011}))?;
        let a = create_band(&db, &p).await?;
        let found = get_band(&db, a.id).await?.unwrap();
        assert_eq!(found.name.as_deref(), Some("svc band"));
        assert_eq!(found.day_of_week.as_deref(), Some("Saturday"));

        let patch = BandPayload::from_json(&json!({"instagram": "@svc"}))?;
        let updated = update_band(&db, a.id, &patch).await?;
        assert_eq!(updated.instagram.as_deref(), Some("@svc"));
        assert_eq!(updated.year, Some(2011.0));

        let list_all = list_bands(&db).await?;
        assert!(list_all.iter().any(|x| x.id == a.id));

        let deleted = delete_band(&db, a.id).await?;
        assert_eq!(deleted.id, a.id);
        let again = delete_band(&db, a.id).await;
        assert!(matches!(again, Err(ServiceError::NotFound(_))));
        let missing = update_band(&db, a.id, &patch).await;
        assert!(matches!(missing, Err(ServiceError::NotFound(_))));

        Ok(())
    }
}
