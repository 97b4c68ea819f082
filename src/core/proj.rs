use crate::types::{DriftError, DriftResult};

/// North-polar stereographic projection used by the OSI-SAF sea-ice grids.
///
/// Equivalent to `+proj=stere +a=6378273 +b=6356889.44891 +lat_0=90
/// +lat_ts=70 +lon_0=-45 +units=km`. The geographic side is
/// WGS84-equivalent; longitude/latitude pass through with no datum shift.
/// All interfaces are longitude-first, degrees on the geographic side and
/// kilometers on the projected side.
#[derive(Debug, Clone)]
pub struct PolarStereographic {
    /// Semi-major axis, km
    a: f64,
    /// First eccentricity
    e: f64,
    /// Central meridian, radians
    lon_0: f64,
    /// a * m_c / t_c, precomputed scale at the true-scale latitude
    rho_scale: f64,
}

/// Ellipsoid semi-axes of the OSI-SAF grid definition, km
const OSI_SAF_A_KM: f64 = 6378.273;
const OSI_SAF_B_KM: f64 = 6356.889449;

/// True-scale latitude and central meridian of the grid, degrees
const OSI_SAF_LAT_TS_DEG: f64 = 70.0;
const OSI_SAF_LON_0_DEG: f64 = -45.0;

/// Convergence tolerance for the inverse latitude iteration, radians
const INV_TOLERANCE: f64 = 1e-12;
const INV_MAX_ITER: usize = 15;

impl PolarStereographic {
    /// Construct a north-polar stereographic projection.
    ///
    /// `a_km`/`b_km` are the ellipsoid semi-axes, `lat_ts_deg` the
    /// true-scale latitude and `lon_0_deg` the central meridian.
    pub fn new(a_km: f64, b_km: f64, lat_ts_deg: f64, lon_0_deg: f64) -> Self {
        let e = (1.0 - (b_km * b_km) / (a_km * a_km)).sqrt();
        let lat_ts = lat_ts_deg.to_radians();

        // Snyder (1987) eq. 14-15 and 15-9 evaluated at the true-scale
        // latitude; rho = rho_scale * t(lat) thereafter.
        let m_c = lat_ts.cos() / (1.0 - e * e * lat_ts.sin() * lat_ts.sin()).sqrt();
        let t_c = Self::half_angle_t(lat_ts, e);

        Self {
            a: a_km,
            e,
            lon_0: lon_0_deg.to_radians(),
            rho_scale: a_km * m_c / t_c,
        }
    }

    /// The projection of the OSI-SAF northern-hemisphere products
    pub fn osi_saf_north() -> Self {
        Self::new(
            OSI_SAF_A_KM,
            OSI_SAF_B_KM,
            OSI_SAF_LAT_TS_DEG,
            OSI_SAF_LON_0_DEG,
        )
    }

    /// Geographic (degrees) to projected (km).
    pub fn to_projected(&self, lon_deg: f64, lat_deg: f64) -> DriftResult<(f64, f64)> {
        if !lon_deg.is_finite() || !lat_deg.is_finite() {
            return Err(DriftError::InvalidCoordinate(format!(
                "non-finite geographic input ({}, {})",
                lon_deg, lat_deg
            )));
        }
        if !(-90.0..=90.0).contains(&lat_deg) || lat_deg == -90.0 {
            return Err(DriftError::InvalidCoordinate(format!(
                "latitude {} outside the projectable range (-90, 90]",
                lat_deg
            )));
        }

        let lat = lat_deg.to_radians();
        let d_lon = lon_deg.to_radians() - self.lon_0;

        let rho = self.rho_scale * Self::half_angle_t(lat, self.e);
        Ok((rho * d_lon.sin(), -rho * d_lon.cos()))
    }

    /// Projected (km) to geographic (degrees). Longitude is normalized to
    /// (-180, 180].
    pub fn to_geographic(&self, x_km: f64, y_km: f64) -> DriftResult<(f64, f64)> {
        if !x_km.is_finite() || !y_km.is_finite() {
            return Err(DriftError::InvalidCoordinate(format!(
                "non-finite projected input ({}, {})",
                x_km, y_km
            )));
        }

        let rho = x_km.hypot(y_km);
        if rho == 0.0 {
            return Ok((normalize_lon(self.lon_0.to_degrees()), 90.0));
        }

        let t = rho / self.rho_scale;

        // Fixed-point iteration on Snyder eq. 7-9; converges in a handful
        // of steps anywhere north of the equator.
        let mut lat = std::f64::consts::FRAC_PI_2 - 2.0 * t.atan();
        for _ in 0..INV_MAX_ITER {
            let e_sin = self.e * lat.sin();
            let next = std::f64::consts::FRAC_PI_2
                - 2.0 * (t * ((1.0 - e_sin) / (1.0 + e_sin)).powf(self.e / 2.0)).atan();
            let delta = (next - lat).abs();
            lat = next;
            if delta < INV_TOLERANCE {
                break;
            }
        }

        let lon = self.lon_0 + x_km.atan2(-y_km);
        Ok((normalize_lon(lon.to_degrees()), lat.to_degrees()))
    }

    /// Snyder eq. 15-9: t = tan(pi/4 - lat/2) / ((1 - e sin)/(1 + e sin))^(e/2)
    fn half_angle_t(lat: f64, e: f64) -> f64 {
        let e_sin = e * lat.sin();
        (std::f64::consts::FRAC_PI_4 - lat / 2.0).tan()
            / ((1.0 - e_sin) / (1.0 + e_sin)).powf(e / 2.0)
    }
}

fn normalize_lon(lon_deg: f64) -> f64 {
    let mut lon = lon_deg;
    while lon <= -180.0 {
        lon += 360.0;
    }
    while lon > 180.0 {
        lon -= 360.0;
    }
    lon
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn pole_maps_to_origin() {
        let proj = PolarStereographic::osi_saf_north();
        let (x, y) = proj.to_projected(123.0, 90.0).unwrap();
        assert_abs_diff_eq!(x, 0.0, epsilon = 1e-9);
        assert_abs_diff_eq!(y, 0.0, epsilon = 1e-9);

        let (lon, lat) = proj.to_geographic(0.0, 0.0).unwrap();
        assert_abs_diff_eq!(lat, 90.0, epsilon = 1e-9);
        assert_abs_diff_eq!(lon, -45.0, epsilon = 1e-9);
    }

    #[test]
    fn central_meridian_axis_signs() {
        let proj = PolarStereographic::osi_saf_north();

        // On the central meridian x vanishes and y points south-negative.
        let (x, y) = proj.to_projected(-45.0, 80.0).unwrap();
        assert_abs_diff_eq!(x, 0.0, epsilon = 1e-9);
        assert!(y < 0.0);

        // 90 degrees east of the central meridian lies on the +x axis.
        let (x, y) = proj.to_projected(45.0, 80.0).unwrap();
        assert!(x > 0.0);
        assert_abs_diff_eq!(y, 0.0, epsilon = 1e-6);
    }

    #[test]
    fn true_scale_latitude_radius() {
        // At 70N the radial distance must be comfortably inside the
        // ellipsoid radius and far from zero.
        let proj = PolarStereographic::osi_saf_north();
        let (x, y) = proj.to_projected(-45.0, 70.0).unwrap();
        let rho = x.hypot(y);
        assert!(rho > 2000.0 && rho < 2500.0, "rho = {}", rho);
    }

    #[test]
    fn round_trip_sample_points() {
        let proj = PolarStereographic::osi_saf_north();
        for &(lon, lat) in &[(-10.0, 85.0), (0.0, 79.0), (150.0, 72.5), (-179.5, 68.0)] {
            let (x, y) = proj.to_projected(lon, lat).unwrap();
            let (lon2, lat2) = proj.to_geographic(x, y).unwrap();
            assert_abs_diff_eq!(lon2, lon, epsilon = 1e-6);
            assert_abs_diff_eq!(lat2, lat, epsilon = 1e-6);
        }
    }

    #[test]
    fn rejects_malformed_input() {
        let proj = PolarStereographic::osi_saf_north();
        assert!(matches!(
            proj.to_projected(f64::NAN, 80.0),
            Err(DriftError::InvalidCoordinate(_))
        ));
        assert!(matches!(
            proj.to_projected(0.0, 91.0),
            Err(DriftError::InvalidCoordinate(_))
        ));
        assert!(matches!(
            proj.to_geographic(f64::INFINITY, 0.0),
            Err(DriftError::InvalidCoordinate(_))
        ));
    }
}
