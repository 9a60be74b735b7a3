//! Event sink trait and implementations.

use super::ProgressEvent;
use parking_lot::RwLock;
use tracing::{debug, info, Level};

/// Trait for sinks that observe a planning run.
///
/// A sink is handed to exactly one run. Implementations must return
/// promptly and must never panic; anything that can fail (a closed
/// connection, a full buffer) is handled inside the sink.
pub trait EventSink: Send + Sync {
    /// Delivers one event without blocking.
    fn try_emit(&self, event: ProgressEvent);
}

/// A no-op event sink that discards all events.
///
/// Used when a run has no observer.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoOpEventSink;

impl EventSink for NoOpEventSink {
    fn try_emit(&self, _event: ProgressEvent) {}
}

/// An event sink that logs events using the tracing framework.
#[derive(Debug, Clone)]
pub struct LoggingEventSink {
    /// The log level to use.
    level: Level,
}

impl Default for LoggingEventSink {
    fn default() -> Self {
        Self { level: Level::INFO }
    }
}

impl LoggingEventSink {
    /// Creates a new logging event sink with the specified level.
    #[must_use]
    pub fn new(level: Level) -> Self {
        Self { level }
    }

    /// Creates a debug-level logging sink.
    #[must_use]
    pub fn debug() -> Self {
        Self::new(Level::DEBUG)
    }

    /// Creates an info-level logging sink.
    #[must_use]
    pub fn info() -> Self {
        Self::new(Level::INFO)
    }

    fn summary(event: &ProgressEvent) -> String {
        match event {
            ProgressEvent::ContextFound(d) => {
                format!("{} relevant piece(s)", d.relevant_pieces.len())
            }
            ProgressEvent::PlanGenerated(d) => {
                format!("plan '{}' with {} step(s)", d.plan.name, d.plan.steps.len())
            }
            ProgressEvent::StepCreated(d) => format!("step '{}' ({})", d.step.name, d.step.kind),
        }
    }
}

impl EventSink for LoggingEventSink {
    fn try_emit(&self, event: ProgressEvent) {
        let summary = Self::summary(&event);
        if self.level == Level::DEBUG {
            debug!(
                event_type = event.event_type(),
                timestamp = event.timestamp(),
                "Event: {}", summary
            );
        } else {
            info!(
                event_type = event.event_type(),
                timestamp = event.timestamp(),
                "Event: {}", summary
            );
        }
    }
}

/// A collecting event sink for testing purposes.
#[derive(Debug, Default)]
pub struct CollectingEventSink {
    events: RwLock<Vec<ProgressEvent>>,
}

impl CollectingEventSink {
    /// Creates a new collecting sink.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns all collected events.
    #[must_use]
    pub fn events(&self) -> Vec<ProgressEvent> {
        self.events.read().clone()
    }

    /// Returns the type names of collected events, in order.
    #[must_use]
    pub fn event_types(&self) -> Vec<&'static str> {
        self.events.read().iter().map(ProgressEvent::event_type).collect()
    }

    /// Returns the number of collected events.
    #[must_use]
    pub fn len(&self) -> usize {
        self.events.read().len()
    }

    /// Returns true if no events have been collected.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.events.read().is_empty()
    }

    /// Clears all collected events.
    pub fn clear(&self) {
        self.events.write().clear();
    }

    /// Returns events of the given type.
    #[must_use]
    pub fn events_of_type(&self, event_type: &str) -> Vec<ProgressEvent> {
        self.events
            .read()
            .iter()
            .filter(|e| e.event_type() == event_type)
            .cloned()
            .collect()
    }
}

impl EventSink for CollectingEventSink {
    fn try_emit(&self, event: ProgressEvent) {
        self.events.write().push(event);
    }
}
