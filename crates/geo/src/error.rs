//! Error types for the geo crate.

use thiserror::Error;

/// Result type alias for geo operations.
pub type Result<T> = std::result::Result<T, GeoError>;

/// Errors that can occur during geo operations.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum GeoError {
    /// Latitude or longitude outside the valid range
    #[error("Invalid coordinate: {0}")]
    InvalidCoordinate(String),

    /// Text that does not look like `lat,lon`
    #[error("Invalid coordinate format '{0}', expected LAT,LON")]
    InvalidFormat(String),
}

/// Error code for programmatic handling.
/// Range: 10xxx for geo errors.
#[repr(u32)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GeoErrorCode {
    /// Invalid coordinate values
    InvalidCoordinate = 10002,
    /// Unparseable coordinate text
    InvalidFormat = 10004,
}

impl GeoError {
    /// Returns the error code for this error.
    pub fn code(&self) -> GeoErrorCode {
        match self {
            GeoError::InvalidCoordinate(_) => GeoErrorCode::InvalidCoordinate,
            GeoError::InvalidFormat(_) => GeoErrorCode::InvalidFormat,
        }
    }
}
