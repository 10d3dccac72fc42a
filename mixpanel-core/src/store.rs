//! Profile store for the simulation.
//!
//! Holds exactly one [`Profile`] per distinct id for the lifetime of the
//! store. Profiles are created on first use by either `track` or `update`
//! and are never removed (short of [`ProfileStore::clear`]).

use chrono::{DateTime, Utc};
use mixpanel_types::{Event, PropertyValue, Update};
use std::collections::BTreeMap;
use std::fmt;

use crate::engine::{self, EngineError};
use crate::profile::{Profile, RecordedEvent};

/// All simulated profiles, keyed by distinct id.
///
/// Not synchronized; wrap it in a lock to share between tasks.
#[derive(Debug, Clone, Default)]
pub struct ProfileStore {
    profiles: BTreeMap<String, Profile>,
}

impl ProfileStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the profile for `distinct_id`, creating it if needed.
    pub fn profile_mut(&mut self, distinct_id: &str) -> &mut Profile {
        self.profiles.entry(distinct_id.to_string()).or_default()
    }

    /// Record a tracked event.
    pub fn track(&mut self, distinct_id: &str, event_name: &str, event: &Event) {
        engine::record_event(self.profile_mut(distinct_id), event_name, event);
    }

    /// Apply a profile update.
    ///
    /// The profile is created even if the update is rejected.
    pub fn update(&mut self, distinct_id: &str, update: &Update) -> Result<(), EngineError> {
        engine::apply_update(self.profile_mut(distinct_id), update)
    }

    /// Get a profile, if it exists.
    pub fn get(&self, distinct_id: &str) -> Option<&Profile> {
        self.profiles.get(distinct_id)
    }

    /// Get one property of a profile.
    pub fn property(&self, distinct_id: &str, key: &str) -> Option<&PropertyValue> {
        self.get(distinct_id)?.property(key)
    }

    /// Events tracked for a profile, in call order. Empty if unknown.
    pub fn events(&self, distinct_id: &str) -> &[RecordedEvent] {
        self.get(distinct_id)
            .map(|p| p.events.as_slice())
            .unwrap_or_default()
    }

    /// Stored IP of a profile.
    pub fn ip(&self, distinct_id: &str) -> Option<&str> {
        self.get(distinct_id)?.ip.as_deref()
    }

    /// Stored time of a profile.
    pub fn time(&self, distinct_id: &str) -> Option<DateTime<Utc>> {
        self.get(distinct_id)?.time
    }

    /// Known distinct ids, sorted.
    pub fn distinct_ids(&self) -> Vec<&str> {
        self.profiles.keys().map(String::as_str).collect()
    }

    /// Iterate over `(distinct_id, profile)` pairs, sorted by id.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Profile)> {
        self.profiles.iter().map(|(id, p)| (id.as_str(), p))
    }

    /// Number of profiles.
    pub fn len(&self) -> usize {
        self.profiles.len()
    }

    /// Check if no profile exists yet.
    pub fn is_empty(&self) -> bool {
        self.profiles.is_empty()
    }

    /// Drop all profiles.
    pub fn clear(&mut self) {
        self.profiles.clear();
    }
}

impl fmt::Display for ProfileStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (id, profile) in self.iter() {
            writeln!(f, "{id}:")?;
            write!(f, "{profile}")?;
        }
        Ok(())
    }
}
