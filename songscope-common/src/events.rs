//! Dashboard events and the EventBus that distributes them
//!
//! Every visual update the selection controller makes is published as a
//! [`DashboardEvent`]; the dashboard service forwards them to the browser over
//! Server-Sent Events.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;

/// Visual updates pushed to connected dashboards
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum DashboardEvent {
    /// Status badge text changed
    StatusChanged {
        text: String,
        timestamp: DateTime<Utc>,
    },

    /// Scatter plot replaced with a new chart description
    ScatterRendered {
        x_field: String,
        y_field: String,
        /// Realized sample size (may be below the configured limit)
        sample_size: usize,
        /// Vega-Lite chart description
        spec: serde_json::Value,
        timestamp: DateTime<Utc>,
    },

    /// Scatter plot removed
    ScatterCleared { timestamp: DateTime<Utc> },
}

impl DashboardEvent {
    /// Event name used for the SSE `event:` field
    pub fn event_type(&self) -> &'static str {
        match self {
            DashboardEvent::StatusChanged { .. } => "StatusChanged",
            DashboardEvent::ScatterRendered { .. } => "ScatterRendered",
            DashboardEvent::ScatterCleared { .. } => "ScatterCleared",
        }
    }
}

/// Central event distribution bus
///
/// Wraps `tokio::sync::broadcast`: publishing never blocks, slow subscribers
/// see a lag error instead of holding up the controller, and dropped
/// receivers are cleaned up automatically.
///
/// ```
/// use songscope_common::events::{DashboardEvent, EventBus};
///
/// let bus = EventBus::new(64);
/// let mut rx = bus.subscribe();
///
/// bus.emit_lossy(DashboardEvent::ScatterCleared { timestamp: chrono::Utc::now() });
/// assert!(matches!(rx.try_recv(), Ok(DashboardEvent::ScatterCleared { .. })));
/// ```
#[derive(Clone)]
pub struct EventBus {
    tx: broadcast::Sender<DashboardEvent>,
    capacity: usize,
}

impl EventBus {
    /// Creates a new EventBus buffering up to `capacity` events per subscriber
    pub fn new(capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(capacity);
        Self { tx, capacity }
    }

    /// Subscribe to all future events
    pub fn subscribe(&self) -> broadcast::Receiver<DashboardEvent> {
        self.tx.subscribe()
    }

    /// Emit an event; `Err` if nobody is listening
    #[allow(clippy::result_large_err)]
    pub fn emit(
        &self,
        event: DashboardEvent,
    ) -> Result<usize, broadcast::error::SendError<DashboardEvent>> {
        self.tx.send(event)
    }

    /// Emit an event, ignoring the no-subscriber case
    ///
    /// A dashboard with no open browser tab is normal.
    pub fn emit_lossy(&self, event: DashboardEvent) {
        let _ = self.tx.send(event);
    }

    pub fn subscriber_count(&self) -> usize {
        self.tx.receiver_count()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_eventbus_new() {
        let bus = EventBus::new(16);
        assert_eq!(bus.capacity(), 16);
        assert_eq!(bus.subscriber_count(), 0);
    }

    #[test]
    fn test_eventbus_subscribe() {
        let bus = EventBus::new(16);
        let _rx = bus.subscribe();
        assert_eq!(bus.subscriber_count(), 1);
        let _rx2 = bus.subscribe();
        assert_eq!(bus.subscriber_count(), 2);
    }

    #[test]
    fn test_emit_without_subscribers() {
        let bus = EventBus::new(16);
        let event = DashboardEvent::ScatterCleared { timestamp: Utc::now() };
        assert!(bus.emit(event.clone()).is_err());
        bus.emit_lossy(event);
    }

    #[tokio::test]
    async fn test_emit_reaches_every_subscriber() {
        let bus = EventBus::new(16);
        let mut rx1 = bus.subscribe();
        let mut rx2 = bus.subscribe();

        let event = DashboardEvent::StatusChanged {
            text: "hello".to_string(),
            timestamp: Utc::now(),
        };
        assert_eq!(bus.emit(event.clone()).unwrap(), 2);

        assert_eq!(rx1.recv().await.unwrap(), event);
        assert_eq!(rx2.recv().await.unwrap(), event);
    }

    #[test]
    fn test_event_serialization_tagged() {
        let event = DashboardEvent::ScatterRendered {
            x_field: "energy".to_string(),
            y_field: "tempo".to_string(),
            sample_size: 3,
            spec: serde_json::json!({"mark": "point"}),
            timestamp: Utc::now(),
        };
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["type"], "ScatterRendered");
        assert_eq!(json["sample_size"], 3);
        assert_eq!(json["spec"]["mark"], "point");
        assert_eq!(event.event_type(), "ScatterRendered");
    }
}
