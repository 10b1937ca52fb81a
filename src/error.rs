use thiserror::Error;

/// Errors raised when constructing a [`GeoPoint`](crate::geo::GeoPoint) from raw values
#[derive(Debug, Clone, Copy, PartialEq, Error)]
pub enum CoordinateError {
    /// Latitude is non-finite or outside [-90, 90]
    #[error("latitude {0} is outside [-90, 90]")]
    LatitudeOutOfRange(f64),

    /// Longitude is non-finite or outside [-180, 180]
    #[error("longitude {0} is outside [-180, 180]")]
    LongitudeOutOfRange(f64),
}

/// Client-caused errors while validating a distance request body
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    /// The body could not be read as JSON at all
    #[error("Request body must be valid JSON: {0}")]
    MalformedBody(String),

    /// The body has no `coordinates` array
    #[error("A 'coordinates' array is required.")]
    MissingCoordinates,

    /// The `coordinates` array does not hold exactly two entries
    #[error("Two coordinates are required.")]
    WrongCount { count: usize },

    /// A coordinate entry is missing a field or the field is not a number
    #[error("Coordinate {index} must have a numeric '{field}' field.")]
    MalformedPoint { index: usize, field: &'static str },

    /// A coordinate entry holds numbers outside the valid ranges
    #[error("Coordinate {index} is invalid: {source}.")]
    InvalidPoint {
        index: usize,
        #[source]
        source: CoordinateError,
    },
}

/// Errors from the blob store and the upload pipeline
#[derive(Debug, Error)]
pub enum StorageError {
    /// An upload request carried no file content
    #[error("No file uploaded")]
    NoFileProvided,

    /// The upload exceeded the configured body limit
    #[error("Upload exceeds the maximum allowed size")]
    TooLarge,

    /// The multipart stream could not be parsed
    #[error("Malformed upload: {0}")]
    MalformedUpload(String),

    /// No blob is stored under the requested name
    #[error("File not found: {0}")]
    NotFound(String),

    /// Underlying filesystem failure
    #[error("Storage I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors from account registration, login and token verification
#[derive(Debug, Clone, PartialEq, Error)]
pub enum AccountError {
    /// Username or password failed basic checks
    #[error("Invalid account data: {0}")]
    InvalidInput(String),

    /// The username is already registered
    #[error("Username already taken: {0}")]
    UsernameTaken(String),

    /// Unknown username or wrong password
    #[error("Invalid username or password")]
    InvalidCredentials,

    /// No bearer token on a request that needs one
    #[error("Missing bearer token")]
    MissingToken,

    /// Token is not of the form `<username>.<expiry>.<signature>`
    #[error("Malformed token")]
    MalformedToken,

    /// Token signature does not match
    #[error("Invalid token signature")]
    InvalidToken,

    /// Token is past its expiry
    #[error("Token expired at {expired_at} (current time: {current_time})")]
    Expired { expired_at: u64, current_time: u64 },
}
