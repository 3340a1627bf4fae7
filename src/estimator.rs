//! estimator.rs
//!
//! Área y población estimada por zona.
//!
//! Pipeline: vértices lon/lat → UTM (metros) → polígono → área (km²) → población.
//! La población se obtiene con una densidad uniforme de ciudad (hab/km²).
//!
//! Todo es puro y sin estado: la proyección y la densidad se fijan al arrancar.

use std::collections::HashSet;

use geo::{Area, LineString, Polygon};
use tracing::warn;

use crate::error::{ConfigError, ZoneError};
use crate::models::types::{GeoVertex, ProjectedVertex, Zone, ZoneMetrics, ZoneOut};
use crate::utm::UtmProjection;

/// Densidad de ciudad (hab/km²) = población total / área total.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CityDensity(f64);

impl CityDensity {
    pub fn from_city(population: f64, area_km2: f64) -> Result<Self, ConfigError> {
        let ok = population.is_finite()
            && population >= 0.0
            && area_km2.is_finite()
            && area_km2 > 0.0;
        if !ok {
            return Err(ConfigError::Density { population, area_km2 });
        }
        Ok(Self(population / area_km2))
    }

    pub fn per_km2(&self) -> f64 { self.0 }
}

#[derive(Clone, Copy, Debug, Default)]
pub struct ZoneAreaEstimator {
    projection: UtmProjection,
}

impl ZoneAreaEstimator {
    pub fn new(projection: UtmProjection) -> Self { Self { projection } }

    pub fn projection(&self) -> &UtmProjection { &self.projection }

    /// Proyecta vértice a vértice conservando el orden.
    /// Un vértice que la proyección no puede representar (a 90° del meridiano
    /// central) también es `InvalidCoordinate`.
    pub fn project(&self, vertices: &[GeoVertex]) -> Result<Vec<ProjectedVertex>, ZoneError> {
        vertices
            .iter()
            .map(|v| {
                let invalid = ZoneError::InvalidCoordinate { lon: v.lon, lat: v.lat };
                if !valid_geo(v) {
                    return Err(invalid);
                }
                let p = self.projection.forward(*v);
                if !(p.x.is_finite() && p.y.is_finite()) {
                    return Err(invalid);
                }
                Ok(p)
            })
            .collect()
    }

    /// Área plana (shoelace, valor absoluto) en km².
    /// Un anillo con >= 3 vértices distintos pero colineal devuelve 0.0.
    pub fn compute_area(&self, projected: &[ProjectedVertex]) -> Result<f64, ZoneError> {
        let distinct = distinct_vertices(projected);
        if distinct < 3 {
            return Err(ZoneError::DegeneratePolygon { distinct });
        }
        // Polygon::new cierra el anillo si hace falta
        let ring: LineString<f64> = projected.iter().map(|p| (p.x, p.y)).collect();
        let poly = Polygon::new(ring, vec![]);
        Ok(poly.unsigned_area() / 1e6)
    }

    pub fn estimate_population(&self, area_km2: f64, density: CityDensity) -> f64 {
        area_km2 * density.per_km2()
    }

    pub fn estimate_zone_metrics(
        &self,
        zone: &Zone,
        density: CityDensity,
    ) -> Result<ZoneMetrics, ZoneError> {
        let projected = self.project(&zone.geometry)?;
        let area_km2 = self.compute_area(&projected)?;
        Ok(ZoneMetrics { area_km2, population: self.estimate_population(area_km2, density) })
    }

    /// Calcula un lote aislando errores: la zona que falla se registra y se omite.
    /// Con `with_type` se incluye el `landuse` en cada fila.
    pub fn estimate_batch(
        &self,
        zones: &[Zone],
        density: CityDensity,
        with_type: bool,
    ) -> Vec<ZoneOut> {
        let mut out = Vec::with_capacity(zones.len());
        for zone in zones {
            match self.estimate_zone_metrics(zone, density) {
                Ok(m) => out.push(ZoneOut {
                    zone_id: zone.zone_id.clone(),
                    landuse: with_type.then(|| zone.landuse().to_string()),
                    area_km2: round_to(m.area_km2, 6),
                    population: round_to(m.population, 2),
                }),
                Err(e) => warn!(zone = %zone.zone_id, "zona omitida: {e}"),
            }
        }
        out
    }
}

#[inline]
fn valid_geo(v: &GeoVertex) -> bool {
    v.lon.is_finite()
        && v.lat.is_finite()
        && (-180.0..=180.0).contains(&v.lon)
        && (-90.0..=90.0).contains(&v.lat)
}

fn distinct_vertices(projected: &[ProjectedVertex]) -> usize {
    // + 0.0 unifica -0.0 y 0.0
    projected
        .iter()
        .map(|p| ((p.x + 0.0).to_bits(), (p.y + 0.0).to_bits()))
        .collect::<HashSet<_>>()
        .len()
}

/// Redondeo de presentación (6 decimales área, 2 población/densidad).
#[inline]
pub fn round_to(x: f64, decimals: i32) -> f64 {
    let k = 10f64.powi(decimals);
    (x * k).round() / k
}
