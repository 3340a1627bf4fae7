//! main.rs — API de zonas residenciales: área UTM + población estimada

use anyhow::{Context, Result};
use std::sync::Arc;
use tokio::signal;
use tracing::info;

use geozonas::estimator::{CityDensity, ZoneAreaEstimator};
use geozonas::models::types::AppCfg;
use geozonas::server::api::{self, ApiState};
use geozonas::store::{self, MongoZoneStore, ZoneStore};
use geozonas::utm::UtmProjection;

#[tokio::main]
async fn main() -> Result<()> {
    // Logs (RUST_LOG manda si está definido)
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cfg = AppCfg::from_env().context("configuración")?;

    // Proyección y densidad: fijas para toda la vida del proceso
    let projection = UtmProjection::from_crs_pair(&cfg.source_crs, &cfg.target_crs)
        .context("par de CRS")?;
    let density = CityDensity::from_city(cfg.city_population, cfg.city_area_km2)
        .context("densidad de ciudad")?;
    info!(
        "Proyección {} → EPSG:{}, densidad {:.2} hab/km²",
        cfg.source_crs,
        projection.epsg(),
        density.per_km2()
    );
    let estimator = ZoneAreaEstimator::new(projection);

    let app = match &cfg.zones_geojson {
        Some(path) => {
            info!("Zonas desde GeoJSON: {path}");
            let store = store::load_geojson(path).with_context(|| format!("cargar {path}"))?;
            api::router(state(store, estimator, density, &cfg))
        }
        None => {
            info!("Zonas desde MongoDB: {}/{}", cfg.mongo_db, cfg.mongo_collection);
            let store =
                MongoZoneStore::connect(&cfg.mongo_uri, &cfg.mongo_db, &cfg.mongo_collection)
                    .await
                    .context("conectar a MongoDB")?;
            api::router(state(store, estimator, density, &cfg))
        }
    };

    info!("Escuchando en http://{}", cfg.bind);
    let listener = tokio::net::TcpListener::bind(&cfg.bind)
        .await
        .with_context(|| format!("bind {}", cfg.bind))?;
    let serve = axum::serve(listener, app);
    tokio::select! {
        r = serve => { r?; },
        _ = signal::ctrl_c() => { info!("Señal de salida recibida"); }
    }

    Ok(())
}

fn state<S: ZoneStore>(
    store: S,
    estimator: ZoneAreaEstimator,
    density: CityDensity,
    cfg: &AppCfg,
) -> ApiState<S> {
    ApiState {
        store,
        estimator,
        density,
        default_landuse: Arc::from(cfg.default_landuse.as_str()),
    }
}
