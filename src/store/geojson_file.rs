//! geojson_file.rs
//!
//! Carga de zonas desde un GeoJSON (FeatureCollection) en memoria.
//!
//! - `properties.zoneId` (o el `id` del feature) → identificador
//! - `properties.landuse` (o `properties.tags.landuse`) → uso del suelo
//! - Polygon → anillo exterior; MultiPolygon → anillo exterior del primero
//!
//! Los features sin id o sin polígono se saltan con un aviso.

use geojson::{feature::Id, Feature, GeoJson, Value};
use serde_json::Value as JsonValue;
use tracing::{info, warn};

use super::MemoryZoneStore;
use crate::error::StoreError;
use crate::models::types::{GeoVertex, Zone};

pub fn load_geojson(path: &str) -> Result<MemoryZoneStore, StoreError> {
    let text = std::fs::read_to_string(path)
        .map_err(|source| StoreError::Io { path: path.to_string(), source })?;
    let zones = parse_zones(&text)?;
    info!("GeoJSON {path}: {} zonas", zones.len());
    Ok(MemoryZoneStore::new(zones))
}

pub fn parse_zones(text: &str) -> Result<Vec<Zone>, StoreError> {
    let gj: GeoJson = text.parse()?;
    let fc = match gj {
        GeoJson::FeatureCollection(fc) => fc,
        _ => return Err(StoreError::Format("el GeoJSON debe ser FeatureCollection".into())),
    };
    let mut zones = Vec::with_capacity(fc.features.len());
    for (idx, feat) in fc.features.iter().enumerate() {
        let Some(zone_id) = feature_id(feat) else {
            warn!("feature #{idx} sin zoneId, se ignora");
            continue;
        };
        let Some(geometry) = feat.geometry.as_ref().and_then(|g| exterior_ring(&g.value)) else {
            warn!(zone = %zone_id, "feature #{idx} sin polígono válido, se ignora");
            continue;
        };
        zones.push(Zone::new(zone_id, feature_landuse(feat), geometry));
    }
    Ok(zones)
}

fn feature_id(feat: &Feature) -> Option<String> {
    match feat.property("zoneId") {
        Some(JsonValue::String(s)) => return Some(s.clone()),
        Some(JsonValue::Number(n)) => return Some(n.to_string()),
        _ => {}
    }
    match &feat.id {
        Some(Id::String(s)) => Some(s.clone()),
        Some(Id::Number(n)) => Some(n.to_string()),
        None => None,
    }
}

fn feature_landuse(feat: &Feature) -> String {
    feat.property("landuse")
        .or_else(|| feat.property("tags").and_then(|t| t.get("landuse")))
        .and_then(JsonValue::as_str)
        .unwrap_or_default()
        .to_string()
}

fn exterior_ring(value: &Value) -> Option<Vec<GeoVertex>> {
    let ring = match value {
        Value::Polygon(rings) => rings.first()?,
        Value::MultiPolygon(polys) => polys.first()?.first()?,
        _ => return None,
    };
    ring.iter()
        .map(|pos| match pos.as_slice() {
            [lon, lat, ..] => Some(GeoVertex { lon: *lon, lat: *lat }),
            _ => None,
        })
        .collect()
}
