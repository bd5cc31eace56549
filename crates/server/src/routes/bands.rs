use axum::{
    body::Bytes,
    extract::{Path, State},
    http::{header, HeaderMap, StatusCode},
    Json,
};
use serde_json::Value;
use tracing::info;

use models::band;

use crate::{errors::JsonApiError, routes::ServerState};

fn is_json_content_type(headers: &HeaderMap) -> bool {
    let Some(ct) = headers.get(header::CONTENT_TYPE).and_then(|v| v.to_str().ok()) else {
        return false;
    };
    let essence = ct.split(';').next().unwrap_or_default().trim().to_ascii_lowercase();
    essence == "application/json" || (essence.starts_with("application/") && essence.ends_with("+json"))
}

/// Bodies that are empty or sent without a JSON content type count as an
/// empty payload; bodies that claim JSON but do not parse are rejected.
fn decode_body(headers: &HeaderMap, body: &Bytes) -> Result<Value, JsonApiError> {
    if !is_json_content_type(headers) || body.iter().all(u8::is_ascii_whitespace) {
        return Ok(Value::Object(Default::default()));
    }
    serde_json::from_slice(body).map_err(|e| {
        JsonApiError::new(
            StatusCode::BAD_REQUEST,
            "Validation Error",
            Some(format!("Failed to parse the request body as JSON: {e}")),
        )
    })
}

#[utoipa::path(
    post, path = "/bands", tag = "bands",
    request_body = crate::openapi::BandInputDoc,
    responses(
        (status = 201, description = "Created", body = crate::openapi::BandDoc),
        (status = 400, description = "Validation Error")
    )
)]
pub async fn create(
    State(state): State<ServerState>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<(StatusCode, Json<band::Model>), JsonApiError> {
    let body = decode_body(&headers, &body)?;
    match state.bands.create(&body).await {
        Ok(m) => Ok((StatusCode::CREATED, Json(m))),
        Err(e) => Err(JsonApiError::from_service(e, StatusCode::BAD_REQUEST, "Create Failed")),
    }
}

#[utoipa::path(
    get, path = "/bands", tag = "bands",
    responses(
        (status = 200, description = "All bands, year descending then name ascending", body = [crate::openapi::BandDoc]),
        (status = 500, description = "List Failed")
    )
)]
pub async fn list(State(state): State<ServerState>) -> Result<Json<Vec<band::Model>>, JsonApiError> {
    match state.bands.list().await {
        Ok(list) => { info!(count = list.len(), "list bands"); Ok(Json(list)) }
        Err(e) => Err(JsonApiError::from_service(e, StatusCode::INTERNAL_SERVER_ERROR, "List Failed")),
    }
}

#[utoipa::path(
    get, path = "/bands/{id}", tag = "bands",
    params(("id" = String, Path, description = "Band ID")),
    responses(
        (status = 200, description = "OK", body = crate::openapi::BandDoc),
        (status = 404, description = "Not Found"),
        (status = 500, description = "Malformed id or store failure")
    )
)]
pub async fn get(State(state): State<ServerState>, Path(id): Path<String>) -> Result<Json<band::Model>, JsonApiError> {
    match state.bands.get(&id).await {
        Ok(Some(m)) => Ok(Json(m)),
        Ok(None) => Err(JsonApiError::bare(StatusCode::NOT_FOUND)),
        Err(e) => Err(JsonApiError::from_service(e, StatusCode::INTERNAL_SERVER_ERROR, "Get Failed")),
    }
}

#[utoipa::path(
    put, path = "/bands/{id}", tag = "bands",
    params(("id" = String, Path, description = "Band ID")),
    request_body = crate::openapi::BandInputDoc,
    responses(
        (status = 200, description = "Updated", body = crate::openapi::BandDoc),
        (status = 400, description = "Validation Error or Update Failed"),
        (status = 404, description = "Not Found")
    )
)]
pub async fn update(
    State(state): State<ServerState>,
    Path(id): Path<String>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Json<band::Model>, JsonApiError> {
    let body = decode_body(&headers, &body)?;
    match state.bands.update(&id, &body).await {
        Ok(m) => Ok(Json(m)),
        Err(e) => Err(JsonApiError::from_service(e, StatusCode::BAD_REQUEST, "Update Failed")),
    }
}

#[utoipa::path(
    delete, path = "/bands/{id}", tag = "bands",
    params(("id" = String, Path, description = "Band ID")),
    responses(
        (status = 200, description = "Deleted; body is the removed band", body = crate::openapi::BandDoc),
        (status = 404, description = "Not Found"),
        (status = 500, description = "Delete Failed")
    )
)]
pub async fn delete(State(state): State<ServerState>, Path(id): Path<String>) -> Result<Json<band::Model>, JsonApiError> {
    match state.bands.delete(&id).await {
        Ok(m) => Ok(Json(m)),
        Err(e) => Err(JsonApiError::from_service(e, StatusCode::INTERNAL_SERVER_ERROR, "Delete Failed")),
    }
}
