//! error.rs
//!
//! Errores del servicio: por zona (cálculo), configuración y almacén.
//! El binario los envuelve en `anyhow` al arrancar.

use thiserror::Error;

/// Fallo del cálculo de una zona concreta. Nunca aborta un lote.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ZoneError {
    #[error("coordenada fuera de rango: lon={lon}, lat={lat}")]
    InvalidCoordinate { lon: f64, lat: f64 },

    #[error("polígono degenerado: {distinct} vértices distintos (mínimo 3)")]
    DegeneratePolygon { distinct: usize },
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("variable {var} inválida: {value:?}")]
    InvalidVar { var: &'static str, value: String },

    #[error("CRS: {0}")]
    Crs(String),

    #[error("densidad inválida: población={population}, área={area_km2} km²")]
    Density { population: f64, area_km2: f64 },
}

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("mongodb: {0}")]
    Mongo(#[from] mongodb::error::Error),

    #[error("lectura de {path}: {source}")]
    Io { path: String, source: std::io::Error },

    #[error("geojson: {0}")]
    GeoJson(#[from] geojson::Error),

    #[error("formato de zonas: {0}")]
    Format(String),
}
