//! types.rs
//! Modelos de datos compartidos por el servicio: zonas del almacén,
//! vértices, métricas calculadas, cuerpos HTTP y configuración de arranque

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Vértice geográfico WGS84 (EPSG:4326), en grados.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct GeoVertex {
    pub lon: f64,
    pub lat: f64,
}

/// Vértice proyectado (UTM), en metros. Nunca se persiste.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ProjectedVertex {
    pub x: f64,
    pub y: f64,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ZoneTags {
    #[serde(default)]
    pub landuse: String,
}

/// Documento de zona tal como vive en el almacén:
/// `{ "zoneId": "...", "tags": { "landuse": "residential" }, "geometry": [{ "lon", "lat" }, ...] }`
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Zone {
    #[serde(rename = "zoneId")]
    pub zone_id: String,
    #[serde(default)]
    pub tags: ZoneTags,
    #[serde(default)]
    pub geometry: Vec<GeoVertex>,
}

impl Zone {
    pub fn new(
        zone_id: impl Into<String>,
        landuse: impl Into<String>,
        geometry: Vec<GeoVertex>,
    ) -> Self {
        Self {
            zone_id: zone_id.into(),
            tags: ZoneTags { landuse: landuse.into() },
            geometry,
        }
    }

    pub fn landuse(&self) -> &str { &self.tags.landuse }
}

/// Resultado del cálculo, sin redondear.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ZoneMetrics {
    pub area_km2: f64,
    pub population: f64,
}

/// Fila de respuesta (ya redondeada).
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ZoneOut {
    #[serde(rename = "zoneId")]
    pub zone_id: String,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none", default)]
    pub landuse: Option<String>,
    pub area_km2: f64,
    pub population: f64,
}

/// Respuesta de `GET /zones`
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CityZonesResponse {
    pub city_density: f64,
    pub zones: Vec<ZoneOut>,
}

/// Respuesta de `POST /zones`
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ZonesResponse {
    pub zones: Vec<ZoneOut>,
}

/// Cuerpo de `POST /zones`: `{ "zone_ids": ["zoneId1", "zoneId2"] }`
#[derive(Clone, Debug, Deserialize)]
pub struct ZoneRequest {
    pub zone_ids: Vec<String>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct AppCfg {
    /// Dirección/puerto del servidor HTTP (Axum)
    pub bind: String,

    /// Conexión MongoDB
    pub mongo_uri: String,
    pub mongo_db: String,
    pub mongo_collection: String,

    /// Si está definido se sirven las zonas desde este GeoJSON en vez de MongoDB
    pub zones_geojson: Option<String>,

    /// Datos de ciudad para la densidad (Mohammédia por defecto)
    pub city_population: f64,
    pub city_area_km2: f64,

    /// Par de CRS de la proyección
    pub source_crs: String,
    pub target_crs: String,

    /// Filtro por defecto de `GET /zones`
    pub default_landuse: String,
}

impl Default for AppCfg {
    fn default() -> Self {
        Self {
            bind: "0.0.0.0:8000".into(),
            mongo_uri: "mongodb://localhost:27017/".into(),
            mongo_db: "geofencingDB".into(),
            mongo_collection: "zones".into(),
            zones_geojson: None,
            city_population: 220455.0,
            city_area_km2: 33.76,
            source_crs: "EPSG:4326".into(),
            target_crs: "EPSG:32630".into(),
            default_landuse: "residential".into(),
        }
    }
}

impl AppCfg {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|k| std::env::var(k).ok())
    }

    /// Config desde una función de búsqueda de variables (env en producción).
    pub fn from_lookup(get: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let mut c = Self::default();
        if let Some(v) = get("BIND") { c.bind = v; }
        if let Some(v) = get("MONGO_URI") { c.mongo_uri = v; }
        if let Some(v) = get("MONGO_DB") { c.mongo_db = v; }
        if let Some(v) = get("MONGO_COLLECTION") { c.mongo_collection = v; }
        if let Some(v) = get("ZONES_GEOJSON").filter(|v| !v.trim().is_empty()) {
            c.zones_geojson = Some(v);
        }
        if let Some(v) = get("CITY_POPULATION") {
            c.city_population = parse_f64("CITY_POPULATION", v)?;
        }
        if let Some(v) = get("CITY_AREA_KM2") {
            c.city_area_km2 = parse_f64("CITY_AREA_KM2", v)?;
        }
        if let Some(v) = get("SOURCE_CRS") { c.source_crs = v; }
        if let Some(v) = get("TARGET_CRS") { c.target_crs = v; }
        if let Some(v) = get("DEFAULT_LANDUSE") { c.default_landuse = v; }
        Ok(c)
    }
}

fn parse_f64(var: &'static str, v: String) -> Result<f64, ConfigError> {
    match v.trim().parse::<f64>() {
        Ok(x) if x.is_finite() => Ok(x),
        _ => Err(ConfigError::InvalidVar { var, value: v }),
    }
}
