//! Validated latitude/longitude pairs.

use serde::Serialize;

use crate::error::CoordinateError;

pub const MIN_LATITUDE: f64 = -90.0;
pub const MAX_LATITUDE: f64 = 90.0;
pub const MIN_LONGITUDE: f64 = -180.0;
pub const MAX_LONGITUDE: f64 = 180.0;

/// A location on the Earth's surface, in decimal degrees.
///
/// Construction goes through [`GeoPoint::new`], so every value of this type
/// is finite and inside the valid latitude/longitude ranges.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct GeoPoint {
    #[serde(rename = "lat")]
    latitude: f64,
    #[serde(rename = "lng")]
    longitude: f64,
}

impl GeoPoint {
    /// Create a point, rejecting NaN, infinities and out-of-range degrees.
    pub fn new(latitude: f64, longitude: f64) -> Result<Self, CoordinateError> {
        // NaN fails `contains`, so it is rejected here too
        if !(MIN_LATITUDE..=MAX_LATITUDE).contains(&latitude) {
            return Err(CoordinateError::LatitudeOutOfRange(latitude));
        }
        if !(MIN_LONGITUDE..=MAX_LONGITUDE).contains(&longitude) {
            return Err(CoordinateError::LongitudeOutOfRange(longitude));
        }

        Ok(Self {
            latitude,
            longitude,
        })
    }

    pub fn latitude(&self) -> f64 {
        self.latitude
    }

    pub fn longitude(&self) -> f64 {
        self.longitude
    }
}
