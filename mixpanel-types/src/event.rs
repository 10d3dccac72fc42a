//! Tracked events.

use chrono::{DateTime, Utc};

use crate::value::{Properties, PropertyValue};

/// A named occurrence tied to a user.
///
/// The event name and distinct id are passed alongside the event when it is
/// tracked; this type carries everything else.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Event {
    /// Free-form event properties.
    pub properties: Properties,
    /// When the event happened. The service uses the receive time if absent.
    pub timestamp: Option<DateTime<Utc>>,
    /// Originating IP, used by the service for geolocation.
    pub ip: Option<String>,
}

impl Event {
    /// Create an event with no properties.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an event from an existing property mapping.
    pub fn with_properties(properties: Properties) -> Self {
        Self {
            properties,
            ..Self::default()
        }
    }

    /// Add a property.
    pub fn property(mut self, key: impl Into<String>, value: impl Into<PropertyValue>) -> Self {
        self.properties.insert(key.into(), value.into());
        self
    }

    /// Set the event time.
    pub fn at(mut self, timestamp: DateTime<Utc>) -> Self {
        self.timestamp = Some(timestamp);
        self
    }

    /// Set the originating IP.
    pub fn with_ip(mut self, ip: impl Into<String>) -> Self {
        self.ip = Some(ip.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn builder_collects_fields() {
        let ts = Utc.with_ymd_and_hms(2024, 1, 2, 3, 4, 5).unwrap();
        let event = Event::new()
            .property("Referred By", "Friend")
            .property("count", 2)
            .with_ip("10.0.0.1")
            .at(ts);

        assert_eq!(event.properties.len(), 2);
        assert_eq!(event.properties["count"], PropertyValue::Int(2));
        assert_eq!(event.ip.as_deref(), Some("10.0.0.1"));
        assert_eq!(event.timestamp, Some(ts));
    }

    #[test]
    fn later_property_overwrites() {
        let event = Event::new().property("k", "a").property("k", "b");
        assert_eq!(event.properties["k"], PropertyValue::from("b"));
    }
}
