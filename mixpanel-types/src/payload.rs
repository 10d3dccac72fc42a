//! Wire payloads for the `/track` and `/engage` endpoints.
//!
//! Both endpoints take a single `data` query parameter holding a JSON
//! document encoded as standard base64 with padding.

use base64::{engine::general_purpose::STANDARD, Engine};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::{Event, Properties, PropertyValue, TypesError, Update, UpdateTime};

/// Body of a `/track` request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrackPayload {
    /// Event name
    pub event: String,
    /// Event properties plus `distinct_id`, `token` and the optional `ip`/`time`
    pub properties: Properties,
}

impl TrackPayload {
    /// Build the payload for tracking `event` as `event_name` for `distinct_id`.
    ///
    /// Reserved keys overwrite caller properties of the same name.
    pub fn new(token: &str, distinct_id: &str, event_name: &str, event: &Event) -> Self {
        let mut properties = event.properties.clone();
        properties.insert("distinct_id".into(), distinct_id.into());
        properties.insert("token".into(), token.into());
        if let Some(ip) = &event.ip {
            properties.insert("ip".into(), ip.as_str().into());
        }
        if let Some(ts) = event.timestamp {
            properties.insert("time".into(), ts.timestamp().into());
        }
        Self {
            event: event_name.to_string(),
            properties,
        }
    }

    /// Encode as the `data` query parameter.
    pub fn encode(&self) -> Result<String, TypesError> {
        encode_data(self)
    }
}

/// Body of an `/engage` request.
///
/// A flat object of `$`-prefixed keys; the operation literal maps to the
/// update's properties.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EngagePayload(pub Properties);

impl EngagePayload {
    /// Build the payload applying `update` to the profile of `distinct_id`.
    pub fn new(token: &str, distinct_id: &str, update: &Update) -> Self {
        let mut body = Properties::new();
        body.insert("$distinct_id".into(), distinct_id.into());
        body.insert("$token".into(), token.into());
        body.insert(
            update.operation.as_str().into(),
            PropertyValue::Map(update.properties.clone()),
        );
        if let Some(ip) = &update.ip {
            body.insert("$ip".into(), ip.as_str().into());
        }
        match update.time {
            Some(UpdateTime::At(ts)) => {
                body.insert("$time".into(), ts.timestamp().into());
            }
            Some(UpdateTime::Ignore) => {
                body.insert("$ignore_time".into(), true.into());
            }
            None => {}
        }
        Self(body)
    }

    /// Encode as the `data` query parameter.
    pub fn encode(&self) -> Result<String, TypesError> {
        encode_data(self)
    }
}

/// Serialize `value` to JSON and base64-encode it.
pub fn encode_data<T: Serialize>(value: &T) -> Result<String, TypesError> {
    let json = serde_json::to_vec(value).map_err(TypesError::Encode)?;
    Ok(STANDARD.encode(json))
}

/// Reverse of [`encode_data`].
pub fn decode_data<T: DeserializeOwned>(data: &str) -> Result<T, TypesError> {
    let bytes = STANDARD
        .decode(data)
        .map_err(|e| TypesError::Decode(e.to_string()))?;
    serde_json::from_slice(&bytes).map_err(|e| TypesError::Decode(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    const TOKEN: &str = "e3bc4100330c35722740fb8c6f5abddc";

    fn decoded_json(data: &str) -> String {
        String::from_utf8(STANDARD.decode(data).unwrap()).unwrap()
    }

    // ===========================================
    // Track payload
    // ===========================================

    #[test]
    fn track_payload_matches_service_reference() {
        let event = Event::new().property("Referred By", "Friend");
        let data = TrackPayload::new(TOKEN, "13793", "Signed Up", &event)
            .encode()
            .unwrap();

        assert_eq!(
            decoded_json(&data),
            r#"{"event":"Signed Up","properties":{"Referred By":"Friend","distinct_id":"13793","token":"e3bc4100330c35722740fb8c6f5abddc"}}"#
        );
    }

    #[test]
    fn track_payload_includes_ip_and_time() {
        let ts = Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap();
        let event = Event::new().with_ip("203.0.113.9").at(ts);
        let payload = TrackPayload::new(TOKEN, "u1", "Login", &event);

        assert_eq!(payload.properties["ip"], PropertyValue::from("203.0.113.9"));
        assert_eq!(payload.properties["time"], PropertyValue::Int(ts.timestamp()));
    }

    #[test]
    fn reserved_keys_win_over_caller_properties() {
        let event = Event::new().property("token", "spoofed");
        let payload = TrackPayload::new(TOKEN, "u1", "x", &event);
        assert_eq!(payload.properties["token"], PropertyValue::from(TOKEN));
    }

    // ===========================================
    // Engage payload
    // ===========================================

    #[test]
    fn engage_payload_matches_service_reference() {
        let update = Update::set()
            .property("Address", "1313 Mockingbird Lane")
            .property("Birthday", "1948-01-01");
        let data = EngagePayload::new(TOKEN, "13793", &update).encode().unwrap();

        assert_eq!(
            decoded_json(&data),
            r#"{"$distinct_id":"13793","$set":{"Address":"1313 Mockingbird Lane","Birthday":"1948-01-01"},"$token":"e3bc4100330c35722740fb8c6f5abddc"}"#
        );
    }

    #[test]
    fn engage_payload_time_fields() {
        let ts = Utc.with_ymd_and_hms(2020, 2, 3, 4, 5, 6).unwrap();
        let timed = EngagePayload::new(TOKEN, "u1", &Update::set().at(ts).with_ip("0"));
        assert_eq!(timed.0["$time"], PropertyValue::Int(ts.timestamp()));
        assert_eq!(timed.0["$ip"], PropertyValue::from("0"));
        assert!(!timed.0.contains_key("$ignore_time"));

        let ignored = EngagePayload::new(TOKEN, "u1", &Update::set().ignore_time());
        assert_eq!(ignored.0["$ignore_time"], PropertyValue::Bool(true));
        assert!(!ignored.0.contains_key("$time"));
    }

    #[test]
    fn decode_reverses_encode() {
        let update = Update::union().property("tags", vec!["a", "b"]);
        let payload = EngagePayload::new(TOKEN, "u1", &update);
        let decoded: EngagePayload = decode_data(&payload.encode().unwrap()).unwrap();
        assert_eq!(decoded, payload);
    }

    #[test]
    fn decode_rejects_garbage() {
        assert!(matches!(
            decode_data::<TrackPayload>("not base64!"),
            Err(TypesError::Decode(_))
        ));
    }
}
