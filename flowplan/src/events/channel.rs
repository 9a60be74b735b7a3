//! A sink that forwards events into a bounded tokio channel.
//!
//! This is the hand-off point to a transport: the receiving half is
//! drained by whatever owns the client connection. The sending side
//! never waits; when the buffer is full or the receiver is gone the
//! event is dropped and counted.

use super::{EventSink, ProgressEvent};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio::sync::mpsc::error::TrySendError;
use tracing::warn;

/// Delivery counters for a [`ChannelEventSink`].
#[derive(Debug, Default)]
pub struct SinkMetrics {
    emitted: AtomicU64,
    dropped_full: AtomicU64,
    dropped_closed: AtomicU64,
}

impl SinkMetrics {
    /// Number of events handed to the channel.
    #[must_use]
    pub fn emitted(&self) -> u64 {
        self.emitted.load(Ordering::Relaxed)
    }

    /// Number of events dropped, for any reason.
    #[must_use]
    pub fn dropped(&self) -> u64 {
        self.dropped_full.load(Ordering::Relaxed) + self.dropped_closed.load(Ordering::Relaxed)
    }

    /// Number of events dropped because the buffer was full.
    #[must_use]
    pub fn dropped_full(&self) -> u64 {
        self.dropped_full.load(Ordering::Relaxed)
    }

    /// Number of events dropped because the receiver was closed.
    #[must_use]
    pub fn dropped_closed(&self) -> u64 {
        self.dropped_closed.load(Ordering::Relaxed)
    }

    /// Converts metrics to a dictionary.
    #[must_use]
    pub fn to_dict(&self) -> serde_json::Value {
        serde_json::json!({
            "emitted": self.emitted(),
            "dropped_full": self.dropped_full(),
            "dropped_closed": self.dropped_closed(),
        })
    }
}

/// Event sink backed by a bounded `mpsc` channel.
#[derive(Debug, Clone)]
pub struct ChannelEventSink {
    tx: mpsc::Sender<ProgressEvent>,
    metrics: Arc<SinkMetrics>,
}

impl ChannelEventSink {
    /// Creates a sink and the receiver that drains it.
    ///
    /// A capacity of zero is raised to one.
    #[must_use]
    pub fn new(capacity: usize) -> (Self, mpsc::Receiver<ProgressEvent>) {
        let (tx, rx) = mpsc::channel(capacity.max(1));
        let sink = Self {
            tx,
            metrics: Arc::new(SinkMetrics::default()),
        };
        (sink, rx)
    }

    /// Returns the delivery counters.
    #[must_use]
    pub fn metrics(&self) -> Arc<SinkMetrics> {
        Arc::clone(&self.metrics)
    }
}

impl EventSink for ChannelEventSink {
    fn try_emit(&self, event: ProgressEvent) {
        match self.tx.try_send(event) {
            Ok(()) => {
                self.metrics.emitted.fetch_add(1, Ordering::Relaxed);
            }
            Err(TrySendError::Full(event)) => {
                self.metrics.dropped_full.fetch_add(1, Ordering::Relaxed);
                warn!(event_type = event.event_type(), "Observer buffer full, dropping event");
            }
            Err(TrySendError::Closed(event)) => {
                self.metrics.dropped_closed.fetch_add(1, Ordering::Relaxed);
                warn!(event_type = event.event_type(), "Observer disconnected, dropping event");
            }
        }
    }
}
