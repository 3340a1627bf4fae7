use pretty_assertions::assert_eq;
use std::io::Write;

use geozonas::error::StoreError;
use geozonas::estimator::{CityDensity, ZoneAreaEstimator};
use geozonas::store::{load_geojson, ZoneStore};

const ZONAS: &str = r#"{
  "type": "FeatureCollection",
  "features": [
    { "type": "Feature", "properties": { "zoneId": "alia", "landuse": "residential" },
      "geometry": { "type": "Polygon", "coordinates": [[[-7.390,33.680],[-7.380,33.680],[-7.380,33.690],[-7.390,33.690],[-7.390,33.680]]] } },
    { "type": "Feature", "properties": { "zoneId": "puerto", "landuse": "industrial" },
      "geometry": { "type": "Polygon", "coordinates": [[[-7.400,33.700],[-7.390,33.700],[-7.390,33.710],[-7.400,33.700]]] } },
    { "type": "Feature", "properties": { "zoneId": "linea", "landuse": "residential" },
      "geometry": { "type": "Polygon", "coordinates": [[[-7.390,33.680],[-7.380,33.680],[-7.390,33.680]]] } }
  ]
}"#;

fn write_tmp(content: &str) -> tempfile::NamedTempFile {
    let mut f = tempfile::NamedTempFile::new().unwrap();
    f.write_all(content.as_bytes()).unwrap();
    f
}

#[tokio::test]
async fn geojson_file_serves_zones() {
    let f = write_tmp(ZONAS);
    let store = load_geojson(f.path().to_str().unwrap()).unwrap();
    assert_eq!(store.len(), 3);

    let residential = store.find_by_landuse("residential").await.unwrap();
    assert_eq!(residential.len(), 2);

    let picked = store.find_by_ids(&["puerto".to_string(), "nada".to_string()]).await.unwrap();
    assert_eq!(picked.len(), 1);
    assert_eq!(picked[0].landuse(), "industrial");
}

#[tokio::test]
async fn degenerate_zone_from_file_is_dropped_from_batch() {
    let f = write_tmp(ZONAS);
    let store = load_geojson(f.path().to_str().unwrap()).unwrap();
    let zones = store.find_by_landuse("residential").await.unwrap();

    let density = CityDensity::from_city(220455.0, 33.76).unwrap();
    let out = ZoneAreaEstimator::default().estimate_batch(&zones, density, true);
    assert_eq!(out.len(), 1);
    assert_eq!(out[0].zone_id, "alia");
    // ~0.93 km x ~1.11 km en Mohammédia
    assert!(out[0].area_km2 > 1.0 && out[0].area_km2 < 1.1, "area = {}", out[0].area_km2);
}

#[test]
fn missing_file_is_an_io_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("no-existe.geojson");
    let err = load_geojson(path.to_str().unwrap()).unwrap_err();
    assert!(matches!(err, StoreError::Io { .. }));
}
