//! # mixpanel-types
//!
//! Wire format types for the mixpanel-lite tracking client.
//!
//! This crate provides the data model shared by the HTTP client and the
//! in-memory simulation:
//! - [`PropertyValue`], [`Properties`] - Dynamic property values
//! - [`Event`] - A named occurrence tied to a user
//! - [`Update`], [`Operation`], [`UpdateTime`] - Profile mutations
//! - [`TrackPayload`], [`EngagePayload`] - JSON documents sent on the wire
//! - [`TypesError`] - Error types

#![warn(missing_docs)]
#![warn(clippy::all)]

mod error;
mod event;
mod payload;
mod update;
mod value;

pub use error::TypesError;
pub use event::Event;
pub use payload::{decode_data, encode_data, EngagePayload, TrackPayload};
pub use update::{Operation, Update, UpdateTime, IP_NO_GEOLOCATE};
pub use value::{Properties, PropertyValue};
