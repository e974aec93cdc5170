//! Geodetic coordinates
use geo::{Distance, Geodesic, Point};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Geodetic [Coordinate] in decimal degrees (WGS84).
#[derive(Default, Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Coordinate {
    /// Latitude in decimal degrees
    pub latitude: f64,
    /// Longitude in decimal degrees
    pub longitude: f64,
}

impl Coordinate {
    /// Builds new [Coordinate] from latitude and longitude, in decimal degrees.
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }

    /// Builds a [Coordinate] from unconstrained optimizer parameters,
    /// folded back into the valid range. See [wrap].
    pub fn wrapped(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude: wrap(latitude),
            longitude: wrap(longitude),
        }
    }

    /// Geodesic (WGS84 ellipsoid) distance to other [Coordinate], in meters.
    pub fn geodesic_distance_m(&self, rhs: &Self) -> f64 {
        Geodesic::distance(self.point(), rhs.point())
    }

    /// Geodesic (WGS84 ellipsoid) distance to other [Coordinate], in kilometers.
    pub fn geodesic_distance_km(&self, rhs: &Self) -> f64 {
        self.geodesic_distance_m(rhs) / 1000.0
    }

    fn point(&self) -> Point<f64> {
        Point::new(self.longitude, self.latitude)
    }
}

impl From<(f64, f64)> for Coordinate {
    fn from(latlon: (f64, f64)) -> Self {
        Self::new(latlon.0, latlon.1)
    }
}

impl std::fmt::Display for Coordinate {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "({:.6}°, {:.6}°)", self.latitude, self.longitude)
    }
}

/// Folds an unconstrained parameter into [-90, 90[: `((x + 90) mod 180) - 90`,
/// with a floored modulo. The same fold is applied to both latitude and longitude,
/// so towers east of 90°E or west of 90°W cannot be located correctly: the estimate
/// is folded 180° away and reports a radius of thousands of kilometers.
pub fn wrap(x: f64) -> f64 {
    (x + 90.0).rem_euclid(180.0) - 90.0
}
