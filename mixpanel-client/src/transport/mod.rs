//! Tracker abstraction for mixpanel-lite.
//!
//! This module defines the two-operation client contract and its
//! implementations (HTTP, in-memory simulation).
//!
//! # Design
//!
//! The tracker trait is async and stateless per call:
//! - `track()` records one event for a distinct id
//! - `update()` applies one profile update to a distinct id
//!
//! Each call maps to exactly one remote operation. There is no queueing,
//! batching or retrying.
//!
//! # Example
//!
//! ```ignore
//! async fn sign_up<T: Tracker>(tracker: &T, user: &str) -> Result<(), TrackError> {
//!     tracker.track(user, "Signed Up", &Event::new()).await?;
//!     tracker.update(user, &Update::set_once().property("plan", "free")).await
//! }
//! ```

mod http;
mod mock;

pub use http::{Endpoint, HttpTracker};
pub use mock::MockTracker;

use async_trait::async_trait;
use mixpanel_types::{Event, TypesError, Update};
use thiserror::Error;

use crate::error::TrackError;

/// Transport errors.
#[derive(Debug, Error)]
pub enum TransportError {
    /// HTTP request failed (connection, TLS, body read).
    #[error("http error: {0}")]
    Http(#[source] reqwest::Error),

    /// Server answered with a non-2xx status.
    #[error("unexpected status {0}")]
    Status(u16),

    /// Server answered 2xx with a body that is neither `1` nor `0`.
    #[error("unexpected response body: {0:?}")]
    UnexpectedResponse(String),

    /// Payload could not be encoded.
    #[error("encoding failed: {0}")]
    Encode(#[from] TypesError),
}

/// Client contract shared by the HTTP client and the simulation.
///
/// Code under test takes a `Tracker` and is handed a [`MockTracker`];
/// production code hands it an [`HttpTracker`].
#[async_trait]
pub trait Tracker: Send + Sync {
    /// Record `event` under `event_name` for `distinct_id`.
    async fn track(
        &self,
        distinct_id: &str,
        event_name: &str,
        event: &Event,
    ) -> Result<(), TrackError>;

    /// Apply `update` to the profile of `distinct_id`.
    async fn update(&self, distinct_id: &str, update: &Update) -> Result<(), TrackError>;
}
