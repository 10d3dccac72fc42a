//! # mixpanel-client
//!
//! Track events and update user profiles on a Mixpanel-compatible service.
//!
//! Two implementations share the [`Tracker`] trait:
//!
//! - [`HttpTracker`] sends each call as one GET request to `/track` or
//!   `/engage` with a base64 `data` parameter.
//! - [`MockTracker`] applies each call to an in-memory [`ProfileStore`]
//!   that reproduces the service's profile-merge rules, for tests without
//!   network access.
//!
//! ## Example
//!
//! ```ignore
//! use mixpanel_client::{Event, MockTracker, Tracker, Update};
//!
//! let tracker = MockTracker::new();
//! tracker.track("13793", "Signed Up", &Event::new().property("Referred By", "Friend")).await?;
//! tracker.update("13793", &Update::set_once().property("plan", "free")).await?;
//!
//! assert_eq!(tracker.events("13793").len(), 1);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod config;
pub mod error;
pub mod transport;

pub use config::{ClientConfig, ConfigError, DEFAULT_BASE_URL};
pub use error::TrackError;
pub use transport::{Endpoint, HttpTracker, MockTracker, Tracker, TransportError};

pub use mixpanel_core::{Profile, ProfileStore, RecordedEvent};
pub use mixpanel_types::{
    Event, Operation, Properties, PropertyValue, Update, UpdateTime, IP_NO_GEOLOCATE,
};
