//! Geographic primitives and great-circle distance.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │         POST /map/distance              │
//! └────────────────────┬────────────────────┘
//!                      │ serde_json::Value
//!                      ▼
//! ┌─────────────────────────────────────────┐
//! │       validate_distance_request         │
//! │  (shape, count, numeric, range checks)  │
//! └────────────────────┬────────────────────┘
//!                      │ DistanceRequest
//!                      ▼
//! ┌─────────────────────────────────────────┐
//! │          haversine_distance             │
//! │   (spherical Earth, mean radius)        │
//! └─────────────────────────────────────────┘
//! ```
//!
//! Everything here is pure: no I/O, no shared state, safe to call from any
//! number of request tasks at once.
//!
//! # Example
//!
//! ```
//! use geoserve::geo::{haversine_distance, GeoPoint, Unit};
//!
//! let a = GeoPoint::new(0.0, 0.0).unwrap();
//! let b = GeoPoint::new(0.0, 1.0).unwrap();
//!
//! let km = haversine_distance(&a, &b, Unit::Kilometers);
//! assert!((km - 111.19).abs() < 0.5);
//! ```

mod distance;
mod point;
mod validate;

pub use distance::{haversine_distance, DistanceRequest, Unit, EARTH_RADIUS_KM, EARTH_RADIUS_MI};
pub use point::{GeoPoint, MAX_LATITUDE, MAX_LONGITUDE, MIN_LATITUDE, MIN_LONGITUDE};
pub use validate::{validate_coordinates, validate_distance_request, REQUIRED_POINTS};
