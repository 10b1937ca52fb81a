//! Haversine great-circle distance.

use super::GeoPoint;

/// Mean Earth radius in kilometers.
pub const EARTH_RADIUS_KM: f64 = 6371.0088;

/// Mean Earth radius in statute miles.
pub const EARTH_RADIUS_MI: f64 = 3958.7613;

/// Unit a distance is reported in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Unit {
    #[default]
    Kilometers,
    Miles,
}

impl Unit {
    /// Mean Earth radius expressed in this unit.
    pub fn earth_radius(self) -> f64 {
        match self {
            Unit::Kilometers => EARTH_RADIUS_KM,
            Unit::Miles => EARTH_RADIUS_MI,
        }
    }
}

/// Great-circle distance between two points over a spherical Earth.
///
/// The result is never negative, is exactly `0.0` for identical points, and
/// is bit-identical when the arguments are swapped: the deltas are taken as
/// absolute values and the remaining products commute exactly.
pub fn haversine_distance(from: &GeoPoint, to: &GeoPoint, unit: Unit) -> f64 {
    let phi1 = from.latitude().to_radians();
    let phi2 = to.latitude().to_radians();

    let delta_phi = (to.latitude() - from.latitude()).abs().to_radians();
    let delta_lambda = (to.longitude() - from.longitude()).abs().to_radians();

    let a = (delta_phi / 2.0).sin().powi(2)
        + (delta_lambda / 2.0).sin().powi(2) * (phi1.cos() * phi2.cos());

    // Rounding can push `a` a hair past 1 for antipodal points
    let a = a.clamp(0.0, 1.0);
    let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());

    unit.earth_radius() * c
}

/// A validated pair of points to measure between.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DistanceRequest {
    pub from: GeoPoint,
    pub to: GeoPoint,
}

impl DistanceRequest {
    pub fn new(from: GeoPoint, to: GeoPoint) -> Self {
        Self { from, to }
    }

    pub fn distance(&self, unit: Unit) -> f64 {
        haversine_distance(&self.from, &self.to, unit)
    }
}
