//! mongo.rs
//! Backend MongoDB. Documentos: `{ zoneId, tags: { landuse }, geometry: [{ lon, lat }] }`

use std::time::Duration;

use futures::stream::TryStreamExt;
use mongodb::{
    bson::{self, doc, Document},
    options::ClientOptions,
    Client, Collection,
};
use tracing::{debug, warn};

use super::ZoneStore;
use crate::error::StoreError;
use crate::models::types::Zone;

#[derive(Clone)]
pub struct MongoZoneStore {
    zones: Collection<Document>,
}

impl MongoZoneStore {
    /// Un único cliente por proceso; se pasa al router como estado.
    pub async fn connect(uri: &str, db: &str, collection: &str) -> Result<Self, StoreError> {
        let mut opts = ClientOptions::parse(uri).await?;
        opts.app_name = Some(env!("CARGO_PKG_NAME").to_string());
        opts.connect_timeout = Some(Duration::from_secs(5));
        opts.server_selection_timeout = Some(Duration::from_secs(5));
        let client = Client::with_options(opts)?;
        Ok(Self { zones: client.database(db).collection(collection) })
    }

    /// Un documento que no encaja en `Zone` se registra y se salta; sólo los
    /// fallos del cursor abortan la consulta.
    async fn find(&self, filter: Document) -> Result<Vec<Zone>, StoreError> {
        debug!(?filter, "mongo find");
        let mut cursor = self.zones.find(filter, None).await?;
        let mut out = Vec::new();
        while let Some(raw) = cursor.try_next().await? {
            if let Some(zone) = zone_from_document(raw) {
                out.push(zone);
            }
        }
        Ok(out)
    }
}

impl ZoneStore for MongoZoneStore {
    async fn find_by_landuse(&self, landuse: &str) -> Result<Vec<Zone>, StoreError> {
        self.find(landuse_filter(landuse)).await
    }

    async fn find_by_ids(&self, ids: &[String]) -> Result<Vec<Zone>, StoreError> {
        self.find(ids_filter(ids)).await
    }
}

fn landuse_filter(landuse: &str) -> Document {
    doc! { "tags.landuse": landuse }
}

fn ids_filter(ids: &[String]) -> Document {
    doc! { "zoneId": { "$in": ids.to_vec() } }
}

fn zone_from_document(raw: Document) -> Option<Zone> {
    let id = raw.get_str("zoneId").unwrap_or("?").to_string();
    match bson::from_document::<Zone>(raw) {
        Ok(zone) => Some(zone),
        Err(e) => {
            warn!(zone = %id, "documento de zona inválido, se ignora: {e}");
            None
        }
    }
}
