//! store/mod.rs
//!
//! Acceso de sólo lectura a las zonas.
//!
//! - `MongoZoneStore`: colección `zones` de `geofencingDB`.
//! - `MemoryZoneStore`: lista fija en memoria (la rellena el loader GeoJSON
//!   o los tests).
//!
//! Un id que no existe simplemente no aparece en el resultado.

pub mod geojson_file;
pub mod mongo;

use std::future::Future;
use std::sync::Arc;

use crate::error::StoreError;
use crate::models::types::Zone;

pub use geojson_file::load_geojson;
pub use mongo::MongoZoneStore;

pub trait ZoneStore: Clone + Send + Sync + 'static {
    /// Zonas cuyo `tags.landuse` es exactamente `landuse`.
    fn find_by_landuse(
        &self,
        landuse: &str,
    ) -> impl Future<Output = Result<Vec<Zone>, StoreError>> + Send;

    /// Zonas cuyo `zoneId` está en `ids`, en el orden del almacén.
    fn find_by_ids(
        &self,
        ids: &[String],
    ) -> impl Future<Output = Result<Vec<Zone>, StoreError>> + Send;
}

#[derive(Clone, Debug, Default)]
pub struct MemoryZoneStore {
    zones: Arc<Vec<Zone>>,
}

impl MemoryZoneStore {
    pub fn new(zones: Vec<Zone>) -> Self { Self { zones: Arc::new(zones) } }

    pub fn len(&self) -> usize { self.zones.len() }

    pub fn is_empty(&self) -> bool { self.zones.is_empty() }
}

impl ZoneStore for MemoryZoneStore {
    async fn find_by_landuse(&self, landuse: &str) -> Result<Vec<Zone>, StoreError> {
        Ok(self.zones.iter().filter(|z| z.landuse() == landuse).cloned().collect())
    }

    async fn find_by_ids(&self, ids: &[String]) -> Result<Vec<Zone>, StoreError> {
        Ok(self.zones.iter().filter(|z| ids.contains(&z.zone_id)).cloned().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::types::GeoVertex;
    use pretty_assertions::assert_eq;

    fn store() -> MemoryZoneStore {
        let g = vec![GeoVertex { lon: -7.39, lat: 33.68 }];
        MemoryZoneStore::new(vec![
            Zone::new("A", "residential", g.clone()),
            Zone::new("P", "industrial", g.clone()),
            Zone::new("B", "residential", g),
        ])
    }

    fn ids(zones: &[Zone]) -> Vec<&str> { zones.iter().map(|z| z.zone_id.as_str()).collect() }

    #[tokio::test]
    async fn filters_by_landuse() {
        let s = store();
        assert_eq!(ids(&s.find_by_landuse("residential").await.unwrap()), ["A", "B"]);
        assert!(s.find_by_landuse("farmland").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn unknown_ids_are_absent() {
        let s = store();
        let req = vec!["B".to_string(), "A".to_string(), "Z".to_string(), "A".to_string()];
        assert_eq!(ids(&s.find_by_ids(&req).await.unwrap()), ["A", "B"]);
        assert!(s.find_by_ids(&[]).await.unwrap().is_empty());
    }
}
