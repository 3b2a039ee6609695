//! Usage analytics sink.
//!
//! The symptom model reports each checkbox change as an [`AnalyticsEvent`].
//! Where those events go is up to the embedding application; this module only
//! defines the seam and a few stock sinks.

use std::fmt;
use std::sync::Mutex;

use tracing::info;

/// An analytics signal emitted by the symptom model.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AnalyticsEvent {
    /// The user started tracking a category.
    SymptomAdded(String),
    /// The user stopped tracking a category.
    SymptomCancelled(String),
}

impl AnalyticsEvent {
    /// Build the event matching a toggle direction.
    #[must_use]
    pub fn for_toggle(category: &str, tracked: bool) -> Self {
        if tracked {
            Self::SymptomAdded(category.to_string())
        } else {
            Self::SymptomCancelled(category.to_string())
        }
    }

    /// The category the event is about.
    #[must_use]
    pub fn category(&self) -> &str {
        match self {
            Self::SymptomAdded(c) | Self::SymptomCancelled(c) => c,
        }
    }
}

impl fmt::Display for AnalyticsEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::SymptomAdded(c) => write!(f, "symptom_add:{c}"),
            Self::SymptomCancelled(c) => write!(f, "symptom_cancel:{c}"),
        }
    }
}

/// Receiver of analytics events. Implementations must not block.
pub trait Analytics: Send + Sync {
    /// Record one event.
    fn record(&self, event: AnalyticsEvent);
}

/// Drops every event.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopAnalytics;

impl Analytics for NoopAnalytics {
    fn record(&self, _event: AnalyticsEvent) {}
}

/// Emits events as `tracing` records under the `symptrack::analytics` target.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingAnalytics;

impl Analytics for TracingAnalytics {
    fn record(&self, event: AnalyticsEvent) {
        info!(target: "symptrack::analytics", event = %event, "analytics event");
    }
}

/// Keeps events in memory, in arrival order.
#[derive(Debug, Default)]
pub struct RecordingAnalytics {
    events: Mutex<Vec<AnalyticsEvent>>,
}

impl RecordingAnalytics {
    /// Create an empty recorder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of the events recorded so far.
    #[must_use]
    pub fn events(&self) -> Vec<AnalyticsEvent> {
        self.events
            .lock()
            .map(|events| events.clone())
            .unwrap_or_default()
    }
}

impl Analytics for RecordingAnalytics {
    fn record(&self, event: AnalyticsEvent) {
        if let Ok(mut events) = self.events.lock() {
            events.push(event);
        }
    }
}
