use utoipa::OpenApi;
use utoipa::ToSchema;

#[derive(ToSchema)]
pub struct HealthResponse { pub status: String }

/// Stored band as returned by every band route. Absent fields are omitted.
#[derive(ToSchema)]
#[schema(rename_all = "camelCase")]
pub struct BandDoc {
    pub id: String,
    pub name: Option<String>,
    pub country: Option<String>,
    pub website: Option<String>,
    pub facebook: Option<String>,
    pub instagram: Option<String>,
    pub day_of_week: Option<String>,
    pub year: Option<f64>,
}

/// Partial band accepted by POST and PUT. Unknown keys are ignored; `null` clears a field.
#[derive(ToSchema)]
#[schema(rename_all = "camelCase")]
pub struct BandInputDoc {
    pub name: Option<String>,
    pub country: Option<String>,
    pub website: Option<String>,
    pub facebook: Option<String>,
    pub instagram: Option<String>,
    pub day_of_week: Option<String>,
    pub year: Option<f64>,
}

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::routes::health,
        crate::routes::bands::create,
        crate::routes::bands::list,
        crate::routes::bands::get,
        crate::routes::bands::update,
        crate::routes::bands::delete,
    ),
    components(
        schemas(
            HealthResponse,
            BandDoc,
            BandInputDoc,
        )
    ),
    tags(
        (name = "health"),
        (name = "bands", description = "Band records")
    )
)]
pub struct ApiDoc;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn document_lists_band_paths() {
        let doc = ApiDoc::openapi();
        assert!(doc.paths.paths.contains_key("/bands"));
        assert!(doc.paths.paths.contains_key("/bands/{id}"));
        assert!(doc.paths.paths.contains_key("/health"));
    }
}
