//! # Polytour Guide
//!
//! The onboarding layer of the polygon editor: derives semantic events from
//! raw editor state changes and drives a guided tour that stays synchronized
//! with what the user does on screen, persists completion across sessions,
//! and recovers gracefully from idle users and malformed state.
//!
//! The host wires four seams: an [`EditorSnapshot`](polytour_core::EditorSnapshot)
//! plus [`GeometryOracle`](polytour_core::GeometryOracle) feeding the
//! [`EventBridge`], and a [`StepPresenter`] plus [`TourSurface`] receiving the
//! [`TourController`]'s imperative calls. Nothing here raises an error across
//! the public boundary; failure degrades functionality instead of blocking
//! the tutorial.

pub mod bridge;
pub mod completion;
pub mod error;
pub mod schedule;
pub mod surface;
pub mod tour;

pub use bridge::{EditorNotification, EventBridge};
pub use completion::{CompletionStore, JsonFileStorage, MarkerStorage, MemoryStorage};
pub use error::StorageError;
pub use schedule::{ScheduledTask, Scheduler, TimerHandle, TokioScheduler};
pub use surface::{HighlightController, StepPresenter, TourSurface, UiTarget};
pub use tour::{
    default_steps, ButtonAction, StepAction, StepButton, StepId, TourConfig, TourController,
    TourProgress, TourStep,
};
