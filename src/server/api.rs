//! api.rs — Rutas HTTP: /health y /zones (GET: zonas por uso del suelo, POST: por ids)

use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde::Deserialize;
use serde_json::json;
use std::sync::Arc;
use tower_http::{compression::CompressionLayer, cors::CorsLayer};
use tracing::{error, info};

use crate::error::StoreError;
use crate::estimator::{round_to, CityDensity, ZoneAreaEstimator};
use crate::models::types::{CityZonesResponse, ZoneRequest, ZonesResponse};
use crate::store::ZoneStore;

#[derive(Clone)]
pub struct ApiState<S> {
    pub store: S,
    pub estimator: ZoneAreaEstimator,
    pub density: CityDensity,
    pub default_landuse: Arc<str>,
}

pub fn router<S: ZoneStore>(state: ApiState<S>) -> Router {
    Router::new()
        .route("/health", get(|| async { "ok" }))
        .route("/zones", get(list_zones::<S>).post(zone_details::<S>))
        .with_state(state)
        .layer(CorsLayer::permissive())
        .layer(CompressionLayer::new())
}

/// Query de `GET /zones`
#[derive(Debug, Deserialize)]
pub struct ZonesQuery {
    /// Uso del suelo a filtrar; si se omite, el de configuración (`residential`)
    pub landuse: Option<String>,
}

async fn list_zones<S: ZoneStore>(
    State(st): State<ApiState<S>>,
    Query(q): Query<ZonesQuery>,
) -> Result<Json<CityZonesResponse>, ApiError> {
    let landuse = q.landuse.as_deref().unwrap_or(st.default_landuse.as_ref());
    let zones = st.store.find_by_landuse(landuse).await?;
    let out = st.estimator.estimate_batch(&zones, st.density, true);
    info!(landuse, found = zones.len(), served = out.len(), "GET /zones");
    Ok(Json(CityZonesResponse {
        city_density: round_to(st.density.per_km2(), 2),
        zones: out,
    }))
}

/// Ids inexistentes se omiten: la respuesta es 200 aunque no haya ninguna.
async fn zone_details<S: ZoneStore>(
    State(st): State<ApiState<S>>,
    Json(req): Json<ZoneRequest>,
) -> Result<Json<ZonesResponse>, ApiError> {
    let zones = st.store.find_by_ids(&req.zone_ids).await?;
    let out = st.estimator.estimate_batch(&zones, st.density, false);
    info!(requested = req.zone_ids.len(), served = out.len(), "POST /zones");
    Ok(Json(ZonesResponse { zones: out }))
}

#[derive(Debug)]
pub struct ApiError(StoreError);

impl From<StoreError> for ApiError {
    fn from(e: StoreError) -> Self { Self(e) }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        error!("almacén de zonas: {}", self.0);
        let body = Json(json!({ "error": "almacén de zonas no disponible" }));
        (StatusCode::INTERNAL_SERVER_ERROR, body).into_response()
    }
}
