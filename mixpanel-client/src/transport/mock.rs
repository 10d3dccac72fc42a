//! Mock tracker for testing.
//!
//! Applies calls to an in-memory [`ProfileStore`] so tests can assert on the
//! resulting profiles instead of on HTTP traffic.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use mixpanel_core::{Profile, ProfileStore, RecordedEvent};
use mixpanel_types::{Event, PropertyValue, Update};
use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use super::Tracker;
use crate::error::TrackError;

/// Mock tracker for testing.
///
/// Clones share the same profiles. All access goes through one mutex, so the
/// mock can be driven from several tasks at once.
#[derive(Debug, Default)]
pub struct MockTracker {
    inner: Arc<Mutex<ProfileStore>>,
}

impl MockTracker {
    /// Create a new mock tracker with no profiles.
    pub fn new() -> Self {
        Self::default()
    }

    fn store(&self) -> MutexGuard<'_, ProfileStore> {
        // A panic while holding the lock cannot leave the store half-updated:
        // the engine validates before writing.
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Run `f` with read access to the whole store.
    pub fn with_store<R>(&self, f: impl FnOnce(&ProfileStore) -> R) -> R {
        f(&self.store())
    }

    /// Snapshot of a profile.
    pub fn profile(&self, distinct_id: &str) -> Option<Profile> {
        self.store().get(distinct_id).cloned()
    }

    /// Current value of one profile property.
    pub fn property(&self, distinct_id: &str, key: &str) -> Option<PropertyValue> {
        self.store().property(distinct_id, key).cloned()
    }

    /// Events tracked for a distinct id, in call order.
    pub fn events(&self, distinct_id: &str) -> Vec<RecordedEvent> {
        self.store().events(distinct_id).to_vec()
    }

    /// Stored IP of a profile.
    pub fn ip(&self, distinct_id: &str) -> Option<String> {
        self.store().ip(distinct_id).map(str::to_string)
    }

    /// Stored time of a profile.
    pub fn time(&self, distinct_id: &str) -> Option<DateTime<Utc>> {
        self.store().time(distinct_id)
    }

    /// Known distinct ids, sorted.
    pub fn distinct_ids(&self) -> Vec<String> {
        self.store()
            .distinct_ids()
            .into_iter()
            .map(str::to_string)
            .collect()
    }

    /// Number of profiles.
    pub fn len(&self) -> usize {
        self.store().len()
    }

    /// Check if no profile exists yet.
    pub fn is_empty(&self) -> bool {
        self.store().is_empty()
    }

    /// Drop all profiles.
    pub fn reset(&self) {
        self.store().clear();
    }
}

impl Clone for MockTracker {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl fmt::Display for MockTracker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", *self.store())
    }
}

#[async_trait]
impl Tracker for MockTracker {
    async fn track(
        &self,
        distinct_id: &str,
        event_name: &str,
        event: &Event,
    ) -> Result<(), TrackError> {
        tracing::trace!(distinct_id, event_name, "mock track");
        self.store().track(distinct_id, event_name, event);
        Ok(())
    }

    async fn update(&self, distinct_id: &str, update: &Update) -> Result<(), TrackError> {
        tracing::trace!(distinct_id, operation = %update.operation, "mock update");
        self.store().update(distinct_id, update).map_err(|e| {
            tracing::debug!(distinct_id, "mock rejected update: {}", e);
            TrackError::from(e)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mixpanel_types::Operation;

    fn strings(items: &[&str]) -> PropertyValue {
        PropertyValue::from(items.to_vec())
    }

    // ===========================================
    // Update semantics through the trait
    // ===========================================

    #[tokio::test]
    async fn update_union() {
        let tracker = MockTracker::new();
        let batches: [&[&str]; 3] = [&["a"], &["b"], &["c", "a", "b", "d"]];

        for batch in batches {
            let update = Update::union()
                .property("f", strings(batch))
                .with_ip("127.0.0.1");
            tracker.update("1", &update).await.unwrap();
        }

        assert_eq!(tracker.property("1", "f"), Some(strings(&["a", "b", "c", "d"])));
        assert_eq!(tracker.ip("1").as_deref(), Some("127.0.0.1"));
    }

    #[tokio::test]
    async fn set_once_is_idempotent() {
        let tracker = MockTracker::new();
        tracker
            .update("1", &Update::set_once().property("k", "v1"))
            .await
            .unwrap();
        tracker
            .update("1", &Update::set_once().property("k", "v2"))
            .await
            .unwrap();

        assert_eq!(tracker.property("1", "k"), Some(PropertyValue::from("v1")));
    }

    #[tokio::test]
    async fn append_accumulates() {
        let tracker = MockTracker::new();
        tracker
            .update("1", &Update::append().property("k", "x"))
            .await
            .unwrap();
        tracker
            .update("1", &Update::append().property("k", "y"))
            .await
            .unwrap();

        assert_eq!(tracker.property("1", "k"), Some(strings(&["x", "y"])));
    }

    #[tokio::test]
    async fn unsupported_operation_is_invalid() {
        let tracker = MockTracker::new();
        tracker
            .update("1", &Update::set().property("n", 1))
            .await
            .unwrap();

        let result = tracker
            .update("1", &Update::new(Operation::Add).property("n", 1))
            .await;

        assert!(matches!(result, Err(TrackError::InvalidOperation(_))));
        assert_eq!(tracker.property("1", "n"), Some(PropertyValue::Int(1)));
    }

    #[tokio::test]
    async fn union_onto_scalar_is_invalid() {
        let tracker = MockTracker::new();
        tracker
            .update("1", &Update::set().property("f", "x"))
            .await
            .unwrap();

        let result = tracker
            .update("1", &Update::union().property("f", strings(&["a"])))
            .await;
        assert!(matches!(result, Err(TrackError::InvalidOperation(_))));
    }

    // ===========================================
    // Track
    // ===========================================

    #[tokio::test]
    async fn track_records_events_in_call_order() {
        let tracker = MockTracker::new();

        tracker.track("a", "first", &Event::new()).await.unwrap();
        tracker
            .update("a", &Update::set().property("k", "v"))
            .await
            .unwrap();
        tracker.track("b", "other", &Event::new()).await.unwrap();
        tracker
            .track("a", "second", &Event::new().property("n", 2))
            .await
            .unwrap();

        let events = tracker.events("a");
        assert_eq!(events.len(), 2);
        assert_eq!(events[0].name, "first");
        assert_eq!(events[1].name, "second");
        assert_eq!(events[1].event.properties["n"], PropertyValue::Int(2));
        assert_eq!(tracker.events("b").len(), 1);
    }

    // ===========================================
    // Shared state and inspection
    // ===========================================

    #[tokio::test]
    async fn clone_shares_state() {
        let tracker1 = MockTracker::new();
        let tracker2 = tracker1.clone();

        tracker1.track("1", "from t1", &Event::new()).await.unwrap();
        tracker2.track("1", "from t2", &Event::new()).await.unwrap();

        assert_eq!(tracker1.events("1").len(), 2);
        assert_eq!(tracker2.len(), 1);
    }

    #[tokio::test]
    async fn concurrent_tracks_are_all_recorded() {
        let tracker = MockTracker::new();
        let mut handles = Vec::new();
        for i in 0..16 {
            let tracker = tracker.clone();
            handles.push(tokio::spawn(async move {
                let id = format!("user-{}", i % 4);
                tracker.track(&id, "tick", &Event::new()).await.unwrap();
                tracker
                    .update(&id, &Update::append().property("ticks", i))
                    .await
                    .unwrap();
            }));
        }
        for handle in handles {
            handle.await.unwrap();
        }

        assert_eq!(tracker.len(), 4);
        for id in tracker.distinct_ids() {
            assert_eq!(tracker.events(&id).len(), 4);
            let ticks = tracker.property(&id, "ticks").unwrap();
            assert_eq!(ticks.as_list().map(<[_]>::len), Some(4));
        }
    }

    #[tokio::test]
    async fn reset_clears_profiles() {
        let tracker = MockTracker::new();
        tracker.track("1", "x", &Event::new()).await.unwrap();
        assert!(!tracker.is_empty());

        tracker.reset();

        assert!(tracker.is_empty());
        assert!(tracker.profile("1").is_none());
    }

    #[tokio::test]
    async fn display_dumps_profiles() {
        let tracker = MockTracker::new();
        tracker
            .update("42", &Update::set().property("plan", "pro").with_ip("10.1.1.1"))
            .await
            .unwrap();
        tracker
            .track("42", "Upgraded", &Event::new())
            .await
            .unwrap();

        let dump = tracker.to_string();
        assert!(dump.starts_with("42:\n  ip: 10.1.1.1\n"));
        assert!(dump.contains("    plan: pro\n"));
        assert!(dump.contains("    Upgraded:\n"));
        assert_eq!(tracker.with_store(ProfileStore::len), 1);
    }

    #[tokio::test]
    async fn usable_as_trait_object() {
        let tracker = MockTracker::new();
        let dynamic: Box<dyn Tracker> = Box::new(tracker.clone());

        dynamic.track("1", "via dyn", &Event::new()).await.unwrap();

        assert_eq!(tracker.events("1")[0].name, "via dyn");
    }
}
