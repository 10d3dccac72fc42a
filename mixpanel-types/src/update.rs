//! Profile update requests.

use chrono::{DateTime, Utc};
use std::fmt;
use std::str::FromStr;

use crate::error::TypesError;
use crate::value::{Properties, PropertyValue};

/// IP value telling the service not to geolocate the request.
///
/// The simulation only stores it on profiles that have no IP yet.
pub const IP_NO_GEOLOCATE: &str = "0";

/// How the properties of an [`Update`] merge into a profile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    /// `$set`: overwrite values.
    Set,
    /// `$set_once`: set values only where absent.
    SetOnce,
    /// `$add`: increment numeric values.
    Add,
    /// `$append`: push a value onto a list.
    Append,
    /// `$union`: merge lists without duplicates.
    Union,
    /// `$remove`: remove a value from a list.
    Remove,
    /// `$unset`: delete properties.
    Unset,
}

impl Operation {
    /// All operations, in wire-literal order.
    pub const ALL: [Operation; 7] = [
        Self::Set,
        Self::SetOnce,
        Self::Add,
        Self::Append,
        Self::Union,
        Self::Remove,
        Self::Unset,
    ];

    /// The literal used as the payload key, e.g. `$set`.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Set => "$set",
            Self::SetOnce => "$set_once",
            Self::Add => "$add",
            Self::Append => "$append",
            Self::Union => "$union",
            Self::Remove => "$remove",
            Self::Unset => "$unset",
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Operation {
    type Err = TypesError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|op| op.as_str() == s)
            .ok_or_else(|| TypesError::UnknownOperation(s.to_string()))
    }
}

/// Timestamp attached to an [`Update`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpdateTime {
    /// Record the update as happening at this time.
    At(DateTime<Utc>),
    /// Do not touch the profile's last-seen time.
    Ignore,
}

/// A request to mutate a user's profile.
#[derive(Debug, Clone, PartialEq)]
pub struct Update {
    /// Merge operation.
    pub operation: Operation,
    /// Properties to apply.
    pub properties: Properties,
    /// Originating IP.
    pub ip: Option<String>,
    /// Update time, or the ignore-time marker.
    pub time: Option<UpdateTime>,
}

impl Update {
    /// Create an update with no properties.
    pub fn new(operation: Operation) -> Self {
        Self {
            operation,
            properties: Properties::new(),
            ip: None,
            time: None,
        }
    }

    /// Shorthand for `Update::new(Operation::Set)`.
    pub fn set() -> Self {
        Self::new(Operation::Set)
    }

    /// Shorthand for `Update::new(Operation::SetOnce)`.
    pub fn set_once() -> Self {
        Self::new(Operation::SetOnce)
    }

    /// Shorthand for `Update::new(Operation::Append)`.
    pub fn append() -> Self {
        Self::new(Operation::Append)
    }

    /// Shorthand for `Update::new(Operation::Union)`.
    pub fn union() -> Self {
        Self::new(Operation::Union)
    }

    /// Add a property.
    pub fn property(mut self, key: impl Into<String>, value: impl Into<PropertyValue>) -> Self {
        self.properties.insert(key.into(), value.into());
        self
    }

    /// Set the originating IP.
    pub fn with_ip(mut self, ip: impl Into<String>) -> Self {
        self.ip = Some(ip.into());
        self
    }

    /// Set the update time.
    pub fn at(mut self, timestamp: DateTime<Utc>) -> Self {
        self.time = Some(UpdateTime::At(timestamp));
        self
    }

    /// Leave the profile's last-seen time unchanged.
    pub fn ignore_time(mut self) -> Self {
        self.time = Some(UpdateTime::Ignore);
        self
    }
}
