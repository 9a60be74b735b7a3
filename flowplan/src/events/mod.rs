//! Progress events and the sinks that deliver them.
//!
//! A planning run reports each milestone as a [`ProgressEvent`] to the
//! sink passed into that run. Sinks must accept every event without
//! blocking or failing; when nobody observes a run, [`NoOpEventSink`]
//! takes its place.

mod channel;
mod progress;
mod sink;

pub use channel::{ChannelEventSink, SinkMetrics};
pub use progress::{ContextFoundData, PlanGeneratedData, ProgressEvent, StepCreatedData};
pub use sink::{CollectingEventSink, EventSink, LoggingEventSink, NoOpEventSink};

use std::sync::Arc;

/// Returns `observer`, or a no-op sink when there is none.
#[must_use]
pub fn sink_or_noop(observer: Option<Arc<dyn EventSink>>) -> Arc<dyn EventSink> {
    observer.unwrap_or_else(|| Arc::new(NoOpEventSink))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::ContextItem;

    #[test]
    fn test_missing_observer_becomes_noop() {
        let sink = sink_or_noop(None);
        sink.try_emit(ProgressEvent::context_found(&[ContextItem::new("a", "b")]));
    }

    #[test]
    fn test_present_observer_is_kept() {
        let collecting = Arc::new(CollectingEventSink::new());
        let sink = sink_or_noop(Some(collecting.clone()));

        sink.try_emit(ProgressEvent::context_found(&[]));
        assert_eq!(collecting.len(), 1);
    }
}
