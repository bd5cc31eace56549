use std::sync::Arc;

use axum::{routing::get, Json, Router};
use tower_http::{
    cors::CorsLayer,
    trace::{TraceLayer, DefaultMakeSpan, DefaultOnRequest, DefaultOnResponse, DefaultOnFailure},
};
use tracing::Level;
use utoipa::OpenApi;

use common::types::Health;
use service::band::{repository::BandRepository, service::BandService};

use crate::openapi::ApiDoc;

pub mod bands;

/// Shared handler state; the store handle is injected here at startup.
#[derive(Clone)]
pub struct ServerState {
    pub bands: Arc<BandService<dyn BandRepository>>,
}

impl ServerState {
    pub fn new(repo: Arc<dyn BandRepository>) -> Self {
        Self { bands: Arc::new(BandService::new(repo)) }
    }
}

#[utoipa::path(get, path = "/health", tag = "health", responses((status = 200, description = "OK", body = crate::openapi::HealthResponse)))]
pub async fn health() -> Json<Health> {
    Json(Health::ok())
}

pub async fn openapi_json() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}

/// Build the full application router: band CRUD, health, and the OpenAPI document
pub fn build_router(state: ServerState, cors: CorsLayer) -> Router {
    let band_routes = Router::new()
        .route("/bands", get(bands::list).post(bands::create))
        .route("/bands/:id", get(bands::get).put(bands::update).delete(bands::delete));

    Router::new()
        .route("/health", get(health))
        .route("/api-docs/openapi.json", get(openapi_json))
        .merge(band_routes)
        .with_state(state)
        .layer(cors)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(
                    DefaultMakeSpan::new()
                        .level(Level::INFO)
                        .include_headers(false),
                )
                .on_request(
                    DefaultOnRequest::new()
                        .level(Level::INFO),
                )
                // status code and latency
                .on_response(
                    DefaultOnResponse::new()
                        .level(Level::INFO)
                        .include_headers(false),
                )
                .on_failure(
                    DefaultOnFailure::new()
                        .level(Level::ERROR),
                )
        )
}
