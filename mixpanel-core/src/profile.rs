//! Simulated per-user profile state.

use chrono::{DateTime, SecondsFormat, Utc};
use mixpanel_types::{Event, Properties, PropertyValue};
use std::fmt;

/// An event recorded against a profile, with the name it was tracked under.
#[derive(Debug, Clone, PartialEq)]
pub struct RecordedEvent {
    /// Event name passed to `track`.
    pub name: String,
    /// The tracked event.
    pub event: Event,
}

/// Accumulated state for one distinct id.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Profile {
    /// Profile properties, mutated in place by updates.
    pub properties: Properties,
    /// Last IP stored by an update.
    pub ip: Option<String>,
    /// Last time stored by an update.
    pub time: Option<DateTime<Utc>>,
    /// Tracked events in call order.
    pub events: Vec<RecordedEvent>,
}

impl Profile {
    /// Create an empty profile.
    pub fn new() -> Self {
        Self::default()
    }

    /// Look up a property.
    pub fn property(&self, key: &str) -> Option<&PropertyValue> {
        self.properties.get(key)
    }

    /// Names of tracked events, in call order.
    pub fn event_names(&self) -> Vec<&str> {
        self.events.iter().map(|e| e.name.as_str()).collect()
    }
}

fn rfc3339(ts: Option<DateTime<Utc>>) -> String {
    ts.map(|t| t.to_rfc3339_opts(SecondsFormat::Secs, true))
        .unwrap_or_default()
}

impl fmt::Display for Profile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "  ip: {}", self.ip.as_deref().unwrap_or_default())?;
        writeln!(f, "  time: {}", rfc3339(self.time))?;
        writeln!(f, "  properties:")?;
        for (key, value) in &self.properties {
            writeln!(f, "    {key}: {value}")?;
        }
        writeln!(f, "  events:")?;
        for recorded in &self.events {
            let event = &recorded.event;
            writeln!(f, "    {}:", recorded.name)?;
            writeln!(f, "      IP: {}", event.ip.as_deref().unwrap_or_default())?;
            writeln!(f, "      Timestamp: {}", rfc3339(event.timestamp))?;
            for (key, value) in &event.properties {
                writeln!(f, "      {key}: {value}")?;
            }
        }
        Ok(())
    }
}
