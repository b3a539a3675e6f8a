//! Error taxonomy for the route search workflow
//!
//! Ignored clicks and duplicate selection requests are not errors; they are
//! reported through [`crate::selection::CommitOutcome`] and never reach this
//! type.

use rutekita_api_client::ApiError;
use thiserror::Error;

/// Result type alias for workflow operations
pub type Result<T> = std::result::Result<T, RouteSearchError>;

/// Route search errors
#[derive(Error, Debug)]
pub enum RouteSearchError {
    /// Calculate was triggered without both endpoints
    #[error("Incomplete selection: both origin and destination must be set")]
    IncompleteSelection,

    /// Network failure or non-2xx response
    #[error("Routing service request failed: {0}")]
    TransportFailure(#[source] ApiError),

    /// 2xx response whose payload is not a usable route
    #[error("Malformed routing response: {0}")]
    MalformedResponse(String),

    /// Well-formed response with a non-success status
    #[error("Routing service returned status '{status}'")]
    Rejected {
        /// Status string reported by the backend
        status: String,
        /// Optional reason from the backend
        message: Option<String>,
    },

    /// Invalid or unreadable configuration
    #[error("Configuration error: {0}")]
    Config(String),
}

/// Error codes for programmatic handling.
/// Range: 20xxx for route search errors.
#[repr(u32)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouteSearchErrorCode {
    IncompleteSelection = 20001,
    TransportFailure = 20002,
    MalformedResponse = 20003,
    Rejected = 20004,
    Config = 20005,
}

impl RouteSearchError {
    /// Create a configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Create a malformed-response error
    pub fn malformed(msg: impl Into<String>) -> Self {
        Self::MalformedResponse(msg.into())
    }

    /// Returns the error code for this error
    pub fn code(&self) -> RouteSearchErrorCode {
        match self {
            Self::IncompleteSelection => RouteSearchErrorCode::IncompleteSelection,
            Self::TransportFailure(_) => RouteSearchErrorCode::TransportFailure,
            Self::MalformedResponse(_) => RouteSearchErrorCode::MalformedResponse,
            Self::Rejected { .. } => RouteSearchErrorCode::Rejected,
            Self::Config(_) => RouteSearchErrorCode::Config,
        }
    }

    /// True for every way a route computation can fail after the request was sent
    #[must_use]
    pub fn is_computation_failure(&self) -> bool {
        matches!(
            self,
            Self::TransportFailure(_) | Self::MalformedResponse(_) | Self::Rejected { .. }
        )
    }

    /// Short text for the user-facing failure notice
    pub fn user_message(&self) -> String {
        match self {
            Self::IncompleteSelection => {
                "Set both the origin and the destination on the map.".to_string()
            }
            Self::TransportFailure(e) if e.is_auth_error() => {
                "Your session has expired. Sign in again and retry.".to_string()
            }
            Self::TransportFailure(_) | Self::MalformedResponse(_) => {
                "Could not reach the routing service.".to_string()
            }
            Self::Rejected { message: Some(m), .. } => m.clone(),
            Self::Rejected { status, .. } => format!("The routing service answered '{status}'."),
            Self::Config(m) => m.clone(),
        }
    }
}

impl From<ApiError> for RouteSearchError {
    fn from(err: ApiError) -> Self {
        if err.is_malformed() {
            Self::MalformedResponse(err.to_string())
        } else {
            Self::TransportFailure(err)
        }
    }
}
