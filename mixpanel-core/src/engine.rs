//! Update engine for the profile simulation.
//!
//! Applies one [`Update`] to one [`Profile`] the way the service does:
//!
//! | Operation   | Effect on each key                                       |
//! |-------------|----------------------------------------------------------|
//! | `$set`      | overwrite                                                |
//! | `$set_once` | set only if absent                                       |
//! | `$append`   | push onto the list (new one-element list if absent)      |
//! | `$union`    | order-preserving union of string lists (verbatim if absent) |
//!
//! An update is checked in full before anything is written, so a rejected
//! update leaves the profile exactly as it was.

use mixpanel_types::{
    Event, Operation, PropertyValue, Update, UpdateTime, IP_NO_GEOLOCATE,
};
use thiserror::Error;

use crate::profile::{Profile, RecordedEvent};

/// Errors raised by the simulation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EngineError {
    /// Unsupported operation, or an operation that does not fit the stored value.
    #[error("invalid operation: {0}")]
    InvalidOperation(String),
}

/// Merge operations the simulation implements.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Merge {
    Set,
    SetOnce,
    Append,
    Union,
}

impl TryFrom<Operation> for Merge {
    type Error = EngineError;

    fn try_from(op: Operation) -> Result<Self, Self::Error> {
        match op {
            Operation::Set => Ok(Self::Set),
            Operation::SetOnce => Ok(Self::SetOnce),
            Operation::Append => Ok(Self::Append),
            Operation::Union => Ok(Self::Union),
            other => Err(EngineError::InvalidOperation(format!(
                "the simulation only supports $set, $set_once, $append and $union, got {other}"
            ))),
        }
    }
}

/// Record a tracked event on the profile. Never fails.
pub fn record_event(profile: &mut Profile, event_name: &str, event: &Event) {
    profile.events.push(RecordedEvent {
        name: event_name.to_string(),
        event: event.clone(),
    });
}

/// Apply `update` to `profile`.
///
/// On error the profile is unchanged.
pub fn apply_update(profile: &mut Profile, update: &Update) -> Result<(), EngineError> {
    let merge = Merge::try_from(update.operation)?;
    validate(profile, merge, update)?;

    if let Some(ip) = update.ip.as_deref().filter(|ip| !ip.is_empty()) {
        if ip != IP_NO_GEOLOCATE || profile.ip.is_none() {
            profile.ip = Some(ip.to_string());
        }
    }
    if let Some(UpdateTime::At(ts)) = update.time {
        profile.time = Some(ts);
    }

    for (key, value) in &update.properties {
        match merge {
            Merge::Set => {
                profile.properties.insert(key.clone(), value.clone());
            }
            Merge::SetOnce => {
                profile
                    .properties
                    .entry(key.clone())
                    .or_insert_with(|| value.clone());
            }
            Merge::Append => append(profile, key, value),
            Merge::Union => union(profile, key, value),
        }
    }

    Ok(())
}

fn validate(profile: &Profile, merge: Merge, update: &Update) -> Result<(), EngineError> {
    for (key, incoming) in &update.properties {
        let Some(existing) = profile.properties.get(key) else {
            continue;
        };
        match merge {
            Merge::Append if !existing.is_list() => {
                return Err(EngineError::InvalidOperation(format!(
                    "can only $append onto an array, {key} is not one"
                )));
            }
            Merge::Union => {
                if existing.as_string_list().is_none() {
                    return Err(EngineError::InvalidOperation(format!(
                        "can only $union onto an array of strings, {key} is not one"
                    )));
                }
                if incoming.as_string_list().is_none() {
                    return Err(EngineError::InvalidOperation(format!(
                        "$union value for {key} must be an array of strings"
                    )));
                }
            }
            _ => {}
        }
    }
    Ok(())
}

fn append(profile: &mut Profile, key: &str, value: &PropertyValue) {
    match profile.properties.get_mut(key) {
        Some(PropertyValue::List(items)) => items.push(value.clone()),
        // validate() rejects non-list values
        Some(_) => {}
        None => {
            profile
                .properties
                .insert(key.to_string(), PropertyValue::List(vec![value.clone()]));
        }
    }
}

fn union(profile: &mut Profile, key: &str, value: &PropertyValue) {
    match profile.properties.get_mut(key) {
        Some(PropertyValue::List(items)) => {
            for candidate in value.as_list().unwrap_or_default() {
                if !items.contains(candidate) {
                    items.push(candidate.clone());
                }
            }
        }
        Some(_) => {}
        // First write is stored as given, without shape checks.
        None => {
            profile.properties.insert(key.to_string(), value.clone());
        }
    }
}
