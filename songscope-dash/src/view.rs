//! Broadcasting implementation of the dashboard view
//!
//! Turns controller output into chart descriptions, publishes them on the
//! EventBus for SSE clients, and keeps a snapshot of what is currently shown
//! so a freshly loaded page can catch up.

use chrono::Utc;
use serde::Serialize;
use tracing::debug;

use songscope_common::events::{DashboardEvent, EventBus};
use songscope_common::selection::{DashboardView, ScatterRequest};

use crate::charts;

/// What the dashboard currently shows
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ViewSnapshot {
    pub status: String,
    /// Scatter chart description, `None` when cleared
    pub scatter: Option<serde_json::Value>,
    /// Realized size of the current sample
    pub sample_size: Option<usize>,
}

/// [`DashboardView`] that publishes every update on an [`EventBus`]
pub struct BroadcastView {
    events: EventBus,
    snapshot: ViewSnapshot,
}

impl BroadcastView {
    pub fn new(events: EventBus) -> Self {
        Self {
            events,
            snapshot: ViewSnapshot::default(),
        }
    }

    pub fn snapshot(&self) -> &ViewSnapshot {
        &self.snapshot
    }
}

impl DashboardView for BroadcastView {
    fn set_status(&mut self, text: &str) {
        self.snapshot.status = text.to_string();
        self.events.emit_lossy(DashboardEvent::StatusChanged {
            text: text.to_string(),
            timestamp: Utc::now(),
        });
    }

    fn render_scatter(&mut self, request: ScatterRequest<'_>) {
        let spec = charts::scatter_spec(&request);
        let sample_size = request.songs.len();
        debug!(
            "Rendering scatter {} x {} with {} songs ({} listeners)",
            request.x_field,
            request.y_field,
            sample_size,
            self.events.subscriber_count()
        );

        self.snapshot.scatter = Some(spec.clone());
        self.snapshot.sample_size = Some(sample_size);
        self.events.emit_lossy(DashboardEvent::ScatterRendered {
            x_field: request.x_field.to_string(),
            y_field: request.y_field.to_string(),
            sample_size,
            spec,
            timestamp: Utc::now(),
        });
    }

    fn clear_scatter(&mut self) {
        self.snapshot.scatter = None;
        self.snapshot.sample_size = None;
        self.events.emit_lossy(DashboardEvent::ScatterCleared {
            timestamp: Utc::now(),
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use songscope_common::songs::{FieldValue, SongRecord};

    #[test]
    fn test_render_then_clear_updates_snapshot_and_bus() {
        let bus = EventBus::new(16);
        let mut rx = bus.subscribe();
        let mut view = BroadcastView::new(bus);
        let song = SongRecord::new()
            .with("energy", FieldValue::Number(0.2))
            .with("tempo", FieldValue::Number(90.0));

        view.render_scatter(ScatterRequest {
            x_field: "energy",
            y_field: "tempo",
            x_label: "Energy".to_string(),
            y_label: "Tempo".to_string(),
            songs: vec![&song],
        });
        assert_eq!(view.snapshot().sample_size, Some(1));
        assert!(view.snapshot().scatter.is_some());
        match rx.try_recv().unwrap() {
            DashboardEvent::ScatterRendered { sample_size, x_field, .. } => {
                assert_eq!(sample_size, 1);
                assert_eq!(x_field, "energy");
            }
            other => panic!("unexpected event {:?}", other),
        }

        view.clear_scatter();
        view.set_status("idle");
        assert_eq!(
            *view.snapshot(),
            ViewSnapshot {
                status: "idle".to_string(),
                scatter: None,
                sample_size: None
            }
        );
        assert!(matches!(rx.try_recv().unwrap(), DashboardEvent::ScatterCleared { .. }));
        assert!(matches!(rx.try_recv().unwrap(), DashboardEvent::StatusChanged { .. }));
    }
}
