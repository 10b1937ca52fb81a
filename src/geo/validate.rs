//! Validation of untrusted distance request bodies.
//!
//! The body arrives as an arbitrary JSON value. Checks run in a fixed order:
//! the `coordinates` array must exist, it must hold exactly two entries, and
//! each entry must carry numeric, in-range `lat` and `lng` fields.

use serde_json::Value;

use super::{DistanceRequest, GeoPoint};
use crate::error::ValidationError;

/// Number of points a distance request must carry.
pub const REQUIRED_POINTS: usize = 2;

/// Validate a full request body of the form `{"coordinates": [...]}`.
pub fn validate_distance_request(body: &Value) -> Result<DistanceRequest, ValidationError> {
    let coordinates = body
        .get("coordinates")
        .ok_or(ValidationError::MissingCoordinates)?;

    validate_coordinates(coordinates)
}

/// Validate the `coordinates` value itself.
pub fn validate_coordinates(coordinates: &Value) -> Result<DistanceRequest, ValidationError> {
    let entries = coordinates
        .as_array()
        .ok_or(ValidationError::MissingCoordinates)?;

    if entries.len() != REQUIRED_POINTS {
        return Err(ValidationError::WrongCount {
            count: entries.len(),
        });
    }

    let from = parse_point(0, &entries[0])?;
    let to = parse_point(1, &entries[1])?;

    Ok(DistanceRequest::new(from, to))
}

fn parse_point(index: usize, entry: &Value) -> Result<GeoPoint, ValidationError> {
    let lat = numeric_field(index, entry, "lat")?;
    let lng = numeric_field(index, entry, "lng")?;

    GeoPoint::new(lat, lng).map_err(|source| ValidationError::InvalidPoint { index, source })
}

fn numeric_field(index: usize, entry: &Value, field: &'static str) -> Result<f64, ValidationError> {
    // `Value::get` on a non-object yields None, which covers entries like `5` or `"a"`
    entry
        .get(field)
        .and_then(Value::as_f64)
        .ok_or(ValidationError::MalformedPoint { index, field })
}
