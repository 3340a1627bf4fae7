//! geozonas: zonas de uso del suelo con área proyectada (UTM) y población
//! estimada a partir de la densidad de la ciudad, servidas por HTTP.

pub mod error;
pub mod estimator;
pub mod models;
pub mod server;
pub mod store;
pub mod utm;
