//! Errors returned by [`Tracker`](crate::Tracker) calls.

use mixpanel_core::EngineError;
use thiserror::Error;

use crate::transport::TransportError;

/// Errors from `track` and `update`.
#[derive(Debug, Error)]
pub enum TrackError {
    /// The service answered that the call did not succeed.
    ///
    /// Same value for both `track` and `update`.
    #[error("track failed")]
    TrackFailed,

    /// Request could not be built, sent, or understood.
    #[error("transport error: {0}")]
    Transport(#[from] TransportError),

    /// The simulation cannot apply the requested update.
    #[error("invalid operation: {0}")]
    InvalidOperation(String),
}

impl From<EngineError> for TrackError {
    fn from(err: EngineError) -> Self {
        match err {
            EngineError::InvalidOperation(msg) => Self::InvalidOperation(msg),
        }
    }
}
