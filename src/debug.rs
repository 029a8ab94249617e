use std::collections::VecDeque;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Maximum number of events retained by a [`DebugBuffer`]
const BUFFER_CAPACITY: usize = 1000;

/// Event category, one per pipeline step kind
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DebugCategory {
    Request,
    Response,
    Error,
    Cache,
}

impl std::fmt::Display for DebugCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DebugCategory::Request => write!(f, "request"),
            DebugCategory::Response => write!(f, "response"),
            DebugCategory::Error => write!(f, "error"),
            DebugCategory::Cache => write!(f, "cache"),
        }
    }
}

/// A structured event emitted by the query pipeline
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DebugEvent {
    pub timestamp: DateTime<Utc>,
    pub category: DebugCategory,
    pub message: String,
}

/// Handle returned by [`DebugSink::subscribe`], used to unsubscribe
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ObserverId(u64);

type Observer = Arc<dyn Fn(&DebugEvent) + Send + Sync>;

/// Synchronous publish/subscribe sink for pipeline events
///
/// Observers are invoked in subscription order. A panicking observer is
/// isolated so delivery continues to the remaining observers. In-memory
/// only; there is no teardown beyond explicit unsubscribe.
#[derive(Clone, Default)]
pub struct DebugSink {
    observers: Arc<Mutex<Vec<(u64, Observer)>>>,
    next_id: Arc<AtomicU64>,
}

impl DebugSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers an observer and returns a handle for later removal
    pub fn subscribe<F>(&self, observer: F) -> ObserverId
    where
        F: Fn(&DebugEvent) + Send + Sync + 'static,
    {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let mut observers = self.observers.lock().expect("observer lock poisoned");
        observers.push((id, Arc::new(observer)));
        ObserverId(id)
    }

    /// Removes a previously registered observer; unknown ids are a no-op
    pub fn unsubscribe(&self, id: ObserverId) {
        let mut observers = self.observers.lock().expect("observer lock poisoned");
        observers.retain(|(observer_id, _)| *observer_id != id.0);
    }

    /// Delivers an event to every observer, in subscription order
    pub fn publish(&self, category: DebugCategory, message: impl Into<String>) {
        let event = DebugEvent {
            timestamp: Utc::now(),
            category,
            message: message.into(),
        };

        // Snapshot under the lock so an observer can subscribe/unsubscribe
        // from within its own callback without deadlocking.
        let snapshot: Vec<Observer> = {
            let observers = self.observers.lock().expect("observer lock poisoned");
            observers.iter().map(|(_, o)| Arc::clone(o)).collect()
        };

        for observer in snapshot {
            if catch_unwind(AssertUnwindSafe(|| observer(&event))).is_err() {
                tracing::warn!(category = %event.category, "Debug observer panicked");
            }
        }
    }
}

/// Bounded ring buffer of the most recent debug events
///
/// Convenience observer for presentation code; retains the last 1000 events.
#[derive(Clone, Default)]
pub struct DebugBuffer {
    events: Arc<Mutex<VecDeque<DebugEvent>>>,
}

impl DebugBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Attaches this buffer to a sink, returning the subscription handle
    pub fn attach(&self, sink: &DebugSink) -> ObserverId {
        let events = Arc::clone(&self.events);
        sink.subscribe(move |event| {
            let mut events = events.lock().expect("event buffer lock poisoned");
            if events.len() == BUFFER_CAPACITY {
                events.pop_front();
            }
            events.push_back(event.clone());
        })
    }

    /// Returns a copy of the buffered events, oldest first
    pub fn snapshot(&self) -> Vec<DebugEvent> {
        let events = self.events.lock().expect("event buffer lock poisoned");
        events.iter().cloned().collect()
    }
}
