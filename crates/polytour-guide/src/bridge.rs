//! Event bridge: raw editor notifications in, semantic events out.
//!
//! The drawing engine fires one-dimensional "something changed" notifications.
//! The bridge re-reads the injected snapshot, diffs it against the last
//! observed summary, classifies the diff into exactly one semantic event (or
//! none), and publishes it on the event bus. It owns no domain state beyond
//! the last-seen mode and polygon count.

use std::sync::Arc;

use polytour_core::{
    EditorEvent, EditorSnapshot, EventBus, FailureEvent, FailureReason, GeometryOracle, Polygon,
    SelectionEvent, ShapeEvent, Tool, ToolEvent,
};

/// Raw change notifications consumed from the drawing engine.
#[derive(Debug, Clone)]
pub enum EditorNotification {
    /// The active tool may have changed.
    ModeChanged,
    /// The polygon set mutated.
    PolygonsChanged,
    /// The selection set changed.
    PolygonsSelected,
    /// An operation failed upstream; carries the engine's free-text message.
    UpstreamError(String),
}

/// Classifies snapshot diffs into semantic events.
pub struct EventBridge {
    snapshot: Arc<dyn EditorSnapshot>,
    oracle: Arc<dyn GeometryOracle>,
    bus: Arc<EventBus>,
    last_mode: Tool,
    last_count: usize,
}

impl EventBridge {
    /// Create a bridge over the given snapshot, capturing the initial mode
    /// and polygon count as the diff baseline.
    pub fn new(
        snapshot: Arc<dyn EditorSnapshot>,
        oracle: Arc<dyn GeometryOracle>,
        bus: Arc<EventBus>,
    ) -> Self {
        let last_mode = snapshot.mode();
        let last_count = snapshot.polygons().len();
        Self {
            snapshot,
            oracle,
            bus,
            last_mode,
            last_count,
        }
    }

    /// Handle one raw notification. Any derived semantic event is published
    /// synchronously before this returns; nothing is reported back.
    pub fn notify(&mut self, notification: EditorNotification) {
        match notification {
            EditorNotification::ModeChanged => self.on_mode_changed(),
            EditorNotification::PolygonsChanged => self.on_polygons_changed(),
            EditorNotification::PolygonsSelected => self.on_selection_changed(),
            EditorNotification::UpstreamError(message) => self.on_upstream_error(&message),
        }
    }

    /// The tool the bridge last observed.
    pub fn last_mode(&self) -> Tool {
        self.last_mode
    }

    /// The polygon count the bridge last observed.
    pub fn last_count(&self) -> usize {
        self.last_count
    }

    fn on_mode_changed(&mut self) {
        let current = self.snapshot.mode();
        if current == self.last_mode {
            return;
        }
        self.publish(EditorEvent::Tool(ToolEvent::Changed {
            previous: self.last_mode,
            current,
        }));
        self.last_mode = current;
    }

    fn on_polygons_changed(&mut self) {
        let polygons = self.snapshot.polygons();
        let current_count = polygons.len();

        if current_count > self.last_count {
            let added = current_count - self.last_count;
            let mode = self.snapshot.mode();

            if added == 1 && mode == Tool::Pen {
                let polygon = polygons[current_count - 1].clone();
                let touches_existing =
                    self.touches_existing(&polygon, &polygons[..current_count - 1]);
                self.publish(EditorEvent::Shape(ShapeEvent::Created {
                    polygon,
                    total_polygons: current_count,
                    touches_existing,
                }));
            } else if mode == Tool::Split {
                self.publish(EditorEvent::Shape(ShapeEvent::Split {
                    new_polygons: polygons[self.last_count..].to_vec(),
                    total_polygons: current_count,
                    split_count: added,
                }));
            } else {
                tracing::trace!("Unclassified polygon increase of {} under {}", added, mode);
            }
        } else {
            // A merge combines two-or-more inputs into one survivor, so the
            // consumed count is one more than the raw delta.
            let merged_count = self.last_count - current_count + 1;
            self.publish(EditorEvent::Shape(ShapeEvent::Merged {
                remaining_polygons: polygons,
                total_polygons: current_count,
                merged_count,
            }));
        }

        self.last_count = current_count;
    }

    fn on_selection_changed(&self) {
        let selected = self.snapshot.selection();
        let selected_count = selected.len();
        self.publish(EditorEvent::Selection(SelectionEvent::Changed {
            selected,
            selected_count,
        }));
    }

    fn on_upstream_error(&self, message: &str) {
        if message.contains("touching") || message.contains("intersecting") {
            self.publish(EditorEvent::Failure(FailureEvent::MergeFailed {
                reason: FailureReason::NotTouching,
                message: message.to_string(),
            }));
        } else if message.contains("slicing") || message.contains("target polygon") {
            self.publish(EditorEvent::Failure(FailureEvent::SplitFailed {
                reason: FailureReason::NoIntersection,
                message: message.to_string(),
            }));
        } else {
            tracing::trace!("Dropping unclassified engine error: {}", message);
        }
    }

    fn touches_existing(&self, polygon: &Polygon, existing: &[Polygon]) -> bool {
        existing
            .iter()
            .any(|other| self.oracle.intersects(polygon.boundary(), other.boundary()))
    }

    fn publish(&self, event: EditorEvent) {
        if let Err(err) = self.bus.publish(event) {
            tracing::debug!("Event dropped: {}", err);
        }
    }
}

impl std::fmt::Debug for EventBridge {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventBridge")
            .field("last_mode", &self.last_mode)
            .field("last_count", &self.last_count)
            .finish()
    }
}
