//! utm.rs
//!
//! Proyección UTM (transversa de Mercator) ↔ WGS84 (lon/lat).
//!
//! - Los polígonos llegan en EPSG:4326 y el área se calcula en metros,
//!   por defecto en EPSG:32630 (UTM huso 30N).
//! - Serie de Krüger de 3er orden: error por debajo del milímetro dentro del huso.
//!
//! La proyección se construye una vez al arrancar y es de sólo lectura.

use crate::error::ConfigError;
use crate::models::types::{GeoVertex, ProjectedVertex};

// Elipsoide WGS84
const A: f64 = 6378137.0;
const F: f64 = 1.0 / 298.257223563;
const K0: f64 = 0.9996;
const FALSE_EASTING: f64 = 500000.0;
const FALSE_NORTHING_SOUTH: f64 = 10000000.0;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct UtmProjection {
    zone: u8,
    north: bool,
    lon0: f64, // meridiano central (rad)
    // constantes de la serie, derivadas de n = f / (2 - f)
    a_rect: f64,
    e: f64,
    alpha: [f64; 3],
    beta: [f64; 3],
    delta: [f64; 3],
}

impl UtmProjection {
    pub fn new(zone: u8, north: bool) -> Result<Self, ConfigError> {
        if !(1..=60).contains(&zone) {
            return Err(ConfigError::Crs(format!("huso UTM fuera de rango: {zone}")));
        }
        Ok(Self::with_zone(zone, north))
    }

    fn with_zone(zone: u8, north: bool) -> Self {
        let n = F / (2.0 - F);
        let (n2, n3) = (n * n, n * n * n);
        let a_rect = A / (1.0 + n) * (1.0 + n2 / 4.0 + n2 * n2 / 64.0);
        let alpha = [
            n / 2.0 - 2.0 * n2 / 3.0 + 5.0 * n3 / 16.0,
            13.0 * n2 / 48.0 - 3.0 * n3 / 5.0,
            61.0 * n3 / 240.0,
        ];
        let beta = [
            n / 2.0 - 2.0 * n2 / 3.0 + 37.0 * n3 / 96.0,
            n2 / 48.0 + n3 / 15.0,
            17.0 * n3 / 480.0,
        ];
        let delta = [
            2.0 * n - 2.0 * n2 / 3.0 - 2.0 * n3,
            7.0 * n2 / 3.0 - 8.0 * n3 / 5.0,
            56.0 * n3 / 15.0,
        ];
        Self {
            zone,
            north,
            lon0: (zone as f64 * 6.0 - 183.0).to_radians(),
            a_rect,
            e: 2.0 * n.sqrt() / (1.0 + n),
            alpha,
            beta,
            delta,
        }
    }

    /// Construye la proyección a partir del par de CRS de configuración,
    /// p.ej. `("EPSG:4326", "EPSG:32630")`.
    pub fn from_crs_pair(source: &str, target: &str) -> Result<Self, ConfigError> {
        if !source.trim().eq_ignore_ascii_case("EPSG:4326") {
            return Err(ConfigError::Crs(format!("CRS origen no soportado: {source}")));
        }
        let code = target
            .trim()
            .to_ascii_uppercase()
            .strip_prefix("EPSG:")
            .and_then(|c| c.parse::<u32>().ok())
            .ok_or_else(|| ConfigError::Crs(format!("CRS destino inválido: {target}")))?;
        match code {
            32601..=32660 => Self::new((code - 32600) as u8, true),
            32701..=32760 => Self::new((code - 32700) as u8, false),
            _ => Err(ConfigError::Crs(format!("CRS destino no es UTM/WGS84: {target}"))),
        }
    }

    pub fn zone(&self) -> u8 { self.zone }

    pub fn is_north(&self) -> bool { self.north }

    pub fn epsg(&self) -> u32 {
        if self.north { 32600 + self.zone as u32 } else { 32700 + self.zone as u32 }
    }

    fn false_northing(&self) -> f64 {
        if self.north { 0.0 } else { FALSE_NORTHING_SOUTH }
    }

    /// lon/lat (grados) → x/y (metros). No valida rangos: eso lo hace el estimador.
    pub fn forward(&self, v: GeoVertex) -> ProjectedVertex {
        let phi = v.lat.to_radians();
        let dlon = v.lon.to_radians() - self.lon0;

        let sin_phi = phi.sin();
        let t = (sin_phi.atanh() - self.e * (self.e * sin_phi).atanh()).sinh();
        let xi_p = t.atan2(dlon.cos());
        let eta_p = (dlon.sin() / (1.0 + t * t).sqrt()).atanh();

        let mut xi = xi_p;
        let mut eta = eta_p;
        for (j, a) in self.alpha.iter().enumerate() {
            let k = 2.0 * (j as f64 + 1.0);
            xi += a * (k * xi_p).sin() * (k * eta_p).cosh();
            eta += a * (k * xi_p).cos() * (k * eta_p).sinh();
        }

        ProjectedVertex {
            x: FALSE_EASTING + K0 * self.a_rect * eta,
            y: self.false_northing() + K0 * self.a_rect * xi,
        }
    }

    /// x/y (metros) → lon/lat (grados).
    pub fn inverse(&self, p: ProjectedVertex) -> GeoVertex {
        let xi = (p.y - self.false_northing()) / (K0 * self.a_rect);
        let eta = (p.x - FALSE_EASTING) / (K0 * self.a_rect);

        let mut xi_p = xi;
        let mut eta_p = eta;
        for (j, b) in self.beta.iter().enumerate() {
            let k = 2.0 * (j as f64 + 1.0);
            xi_p -= b * (k * xi).sin() * (k * eta).cosh();
            eta_p -= b * (k * xi).cos() * (k * eta).sinh();
        }

        let chi = (xi_p.sin() / eta_p.cosh()).asin();
        let mut phi = chi;
        for (j, d) in self.delta.iter().enumerate() {
            let k = 2.0 * (j as f64 + 1.0);
            phi += d * (k * chi).sin();
        }
        let lon = self.lon0 + eta_p.sinh().atan2(xi_p.cos());

        GeoVertex { lon: lon.to_degrees(), lat: phi.to_degrees() }
    }
}

impl Default for UtmProjection {
    /// EPSG:32630
    fn default() -> Self {
        Self::with_zone(30, true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn gv(lon: f64, lat: f64) -> GeoVertex { GeoVertex { lon, lat } }

    #[test]
    fn central_meridian_on_equator_maps_to_false_origin() {
        let p = UtmProjection::default().forward(gv(-3.0, 0.0));
        assert!((p.x - 500000.0).abs() < 1e-6, "x = {}", p.x);
        assert!(p.y.abs() < 1e-6, "y = {}", p.y);
    }

    #[test]
    fn three_degrees_off_meridian_on_equator() {
        let proj = UtmProjection::default();
        let east = proj.forward(gv(0.0, 0.0));
        let west = proj.forward(gv(-6.0, 0.0));
        assert!((east.x - 833978.56).abs() < 0.05, "x = {}", east.x);
        assert!((west.x - 166021.44).abs() < 0.05, "x = {}", west.x);
    }

    #[test]
    fn easting_is_symmetric_around_central_meridian() {
        let proj = UtmProjection::default();
        let a = proj.forward(gv(-3.0 + 1.2, 33.7));
        let b = proj.forward(gv(-3.0 - 1.2, 33.7));
        assert!(((a.x - 500000.0) + (b.x - 500000.0)).abs() < 1e-6);
        assert!((a.y - b.y).abs() < 1e-6);
    }

    #[rstest]
    #[case(-7.3833, 33.6861)] // Mohammédia
    #[case(-3.7038, 40.4168)] // Madrid
    #[case(-0.8773, 41.6561)]
    fn inverse_undoes_forward(#[case] lon: f64, #[case] lat: f64) {
        let proj = UtmProjection::default();
        let back = proj.inverse(proj.forward(gv(lon, lat)));
        // 1e-7 grados ≈ 1 cm
        assert!((back.lon - lon).abs() < 1e-7, "lon {} vs {}", back.lon, lon);
        assert!((back.lat - lat).abs() < 1e-7, "lat {} vs {}", back.lat, lat);
    }

    #[test]
    fn southern_hemisphere_uses_false_northing() {
        let proj = UtmProjection::from_crs_pair("EPSG:4326", "EPSG:32730").unwrap();
        assert!(!proj.is_north());
        let p = proj.forward(gv(-3.0, 0.0));
        assert!((p.y - 10000000.0).abs() < 1e-6);
    }

    #[rstest]
    #[case("EPSG:4326", "EPSG:32630", 30, true)]
    #[case("epsg:4326", "epsg:32601", 1, true)]
    #[case("EPSG:4326", "EPSG:32760", 60, false)]
    fn crs_pair_is_parsed(
        #[case] src: &str,
        #[case] dst: &str,
        #[case] zone: u8,
        #[case] north: bool,
    ) {
        let proj = UtmProjection::from_crs_pair(src, dst).unwrap();
        assert_eq!(proj.zone(), zone);
        assert_eq!(proj.is_north(), north);
    }

    #[rstest]
    #[case("EPSG:3857", "EPSG:32630")]
    #[case("EPSG:4326", "EPSG:25830")]
    #[case("EPSG:4326", "EPSG:32600")]
    #[case("EPSG:4326", "32630")]
    fn unsupported_crs_pair_is_rejected(#[case] src: &str, #[case] dst: &str) {
        assert!(matches!(UtmProjection::from_crs_pair(src, dst), Err(ConfigError::Crs(_))));
    }
}
