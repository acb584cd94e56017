//! # Polytour Core
//!
//! Core types, traits, and the event bus for the Polytour onboarding layer.
//! Provides the editor-facing vocabulary (tools, polygons, snapshots), the
//! semantic event taxonomy, and the publish/subscribe machinery used to fan
//! those events out to the tour and any other interested observer.

pub mod data;
pub mod event_bus;

pub use data::{EditorSnapshot, GeometryOracle, Point, Polygon, Tool};

// Re-export event bus for convenience
pub use event_bus::{
    event_bus, EditorEvent, EventBus, EventBusConfig, EventBusError, EventCategory, EventFilter,
    FailureEvent, FailureReason, SelectionEvent, ShapeEvent, Subscription, SubscriptionId,
    ToolEvent,
};
