//! # mixpanel-core
//!
//! Pure profile simulation for mixpanel-lite (no I/O, instant tests).
//!
//! This crate reproduces the service's profile-update semantics in memory:
//! - [`Profile`] - accumulated state for one distinct id
//! - [`engine`] - applies `$set`, `$set_once`, `$append` and `$union`
//! - [`ProfileStore`] - one profile per distinct id, created lazily
//!
//! Nothing here locks or performs I/O. `mixpanel-client` wraps the store in a
//! mutex to expose it behind the same trait as the HTTP client.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod engine;
pub mod profile;
pub mod store;

pub use engine::EngineError;
pub use profile::{Profile, RecordedEvent};
pub use store::ProfileStore;
