//! Event type definitions for the event bus.
//!
//! This module defines the semantic events derived from raw editor state
//! changes, organized by category. Events are designed to be cloneable and
//! serializable for logging/replay; they are constructed, broadcast, and
//! discarded, never stored by the onboarding layer.

use serde::{Deserialize, Serialize};

use crate::data::{Polygon, Tool};

/// Root event enum for all semantic editor events
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum EditorEvent {
    /// Active tool changes
    Tool(ToolEvent),
    /// Polygon lifecycle (created / split / merged)
    Shape(ShapeEvent),
    /// Selection changes
    Selection(SelectionEvent),
    /// Failed boolean operations
    Failure(FailureEvent),
}

impl EditorEvent {
    /// Get the category of this event
    pub fn category(&self) -> EventCategory {
        match self {
            EditorEvent::Tool(_) => EventCategory::Tool,
            EditorEvent::Shape(_) => EventCategory::Shape,
            EditorEvent::Selection(_) => EventCategory::Selection,
            EditorEvent::Failure(_) => EventCategory::Failure,
        }
    }

    /// Get a short description of this event for logging
    pub fn description(&self) -> String {
        match self {
            EditorEvent::Tool(e) => e.description(),
            EditorEvent::Shape(e) => e.description(),
            EditorEvent::Selection(e) => e.description(),
            EditorEvent::Failure(e) => e.description(),
        }
    }
}

/// Event category for filtering
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EventCategory {
    /// Active tool change events.
    Tool,
    /// Polygon lifecycle events.
    Shape,
    /// Selection change events.
    Selection,
    /// Failed operation events.
    Failure,
}

impl std::fmt::Display for EventCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EventCategory::Tool => write!(f, "Tool"),
            EventCategory::Shape => write!(f, "Shape"),
            EventCategory::Selection => write!(f, "Selection"),
            EventCategory::Failure => write!(f, "Failure"),
        }
    }
}

/// Tool change events
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum ToolEvent {
    /// The active tool changed.
    Changed {
        /// Tool that was active before the change.
        previous: Tool,
        /// Tool that is active now.
        current: Tool,
    },
}

impl ToolEvent {
    fn description(&self) -> String {
        match self {
            ToolEvent::Changed { previous, current } => {
                format!("Tool: {} -> {}", previous, current)
            }
        }
    }
}

/// Polygon lifecycle events
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum ShapeEvent {
    /// A single polygon was drawn with the pen tool.
    Created {
        /// The newly created polygon.
        polygon: Polygon,
        /// Total polygon count after the creation.
        total_polygons: usize,
        /// Whether the new polygon's region intersects any existing one.
        touches_existing: bool,
    },
    /// One or more polygons were produced by a split operation.
    Split {
        /// The polygons added by the split, in engine order.
        new_polygons: Vec<Polygon>,
        /// Total polygon count after the split.
        total_polygons: usize,
        /// Number of polygons the split added.
        split_count: usize,
    },
    /// Polygons were merged into one surviving shape.
    Merged {
        /// The polygons remaining after the merge.
        remaining_polygons: Vec<Polygon>,
        /// Total polygon count after the merge.
        total_polygons: usize,
        /// Number of polygons consumed by the merge (inputs, not delta).
        merged_count: usize,
    },
}

impl ShapeEvent {
    fn description(&self) -> String {
        match self {
            ShapeEvent::Created {
                total_polygons,
                touches_existing,
                ..
            } => format!(
                "Created (total {}, touching: {})",
                total_polygons, touches_existing
            ),
            ShapeEvent::Split {
                split_count,
                total_polygons,
                ..
            } => format!("Split +{} (total {})", split_count, total_polygons),
            ShapeEvent::Merged {
                merged_count,
                total_polygons,
                ..
            } => format!("Merged {} (total {})", merged_count, total_polygons),
        }
    }
}

/// Selection change events
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum SelectionEvent {
    /// The selection set changed.
    Changed {
        /// Ids of the currently selected polygons.
        selected: Vec<u64>,
        /// Number of selected polygons.
        selected_count: usize,
    },
}

impl SelectionEvent {
    fn description(&self) -> String {
        match self {
            SelectionEvent::Changed { selected_count, .. } => {
                format!("Selected: {} polygons", selected_count)
            }
        }
    }
}

/// Structured reason for a failed boolean operation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureReason {
    /// Merge inputs do not share an edge or point.
    NotTouching,
    /// The slicing shape does not intersect the target polygon.
    NoIntersection,
}

impl FailureReason {
    /// Stable string form of this reason.
    pub fn as_str(&self) -> &'static str {
        match self {
            FailureReason::NotTouching => "not_touching",
            FailureReason::NoIntersection => "no_intersection",
        }
    }
}

impl std::fmt::Display for FailureReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Failed operation events
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum FailureEvent {
    /// A merge was rejected by the engine.
    MergeFailed {
        /// Structured failure reason.
        reason: FailureReason,
        /// Original engine error text.
        message: String,
    },
    /// A split was rejected by the engine.
    SplitFailed {
        /// Structured failure reason.
        reason: FailureReason,
        /// Original engine error text.
        message: String,
    },
}

impl FailureEvent {
    fn description(&self) -> String {
        match self {
            FailureEvent::MergeFailed { reason, .. } => format!("Merge failed: {}", reason),
            FailureEvent::SplitFailed { reason, .. } => format!("Split failed: {}", reason),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::Point;

    #[test]
    fn test_event_category() {
        let event = EditorEvent::Tool(ToolEvent::Changed {
            previous: Tool::Select,
            current: Tool::Pen,
        });
        assert_eq!(event.category(), EventCategory::Tool);

        let event = EditorEvent::Selection(SelectionEvent::Changed {
            selected: vec![1, 2],
            selected_count: 2,
        });
        assert_eq!(event.category(), EventCategory::Selection);
    }

    #[test]
    fn test_event_description() {
        let event = EditorEvent::Shape(ShapeEvent::Created {
            polygon: Polygon::new(1, vec![Point::new(0.0, 0.0)]),
            total_polygons: 1,
            touches_existing: false,
        });
        assert!(event.description().contains("Created"));
        assert!(event.description().contains("total 1"));
    }

    #[test]
    fn test_event_serialization() {
        let event = EditorEvent::Failure(FailureEvent::MergeFailed {
            reason: FailureReason::NotTouching,
            message: "Polygons are not touching".to_string(),
        });
        let json = serde_json::to_string(&event).expect("Should serialize");
        assert!(json.contains("not_touching"));
        let parsed: EditorEvent = serde_json::from_str(&json).expect("Should deserialize");

        if let EditorEvent::Failure(FailureEvent::MergeFailed { reason, .. }) = parsed {
            assert_eq!(reason, FailureReason::NotTouching);
        } else {
            panic!("Wrong event type after deserialization");
        }
    }
}
