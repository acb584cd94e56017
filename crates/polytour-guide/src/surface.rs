//! Outward-facing UI seams.
//!
//! The tour never touches the DOM (or whatever the host renders with)
//! directly; it talks to two host-implemented traits. [`StepPresenter`] is
//! the step-popup widget (show/cancel/complete primitives), [`TourSurface`]
//! is everything else the tour emphasizes on screen: affordance highlights,
//! canvas hints, and the completion celebration.

use parking_lot::Mutex;
use std::collections::HashSet;
use std::sync::Arc;

use crate::tour::TourStep;

/// UI affordances the tour can attach to or emphasize.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UiTarget {
    /// The pen (polygon creation) tool button.
    PenTool,
    /// The split tool button.
    SplitTool,
    /// The select tool button.
    SelectTool,
    /// The merge action button.
    MergeButton,
    /// The drawing canvas container.
    Canvas,
}

impl UiTarget {
    /// Stable string form of this target.
    pub fn as_str(&self) -> &'static str {
        match self {
            UiTarget::PenTool => "pen",
            UiTarget::SplitTool => "split",
            UiTarget::SelectTool => "select",
            UiTarget::MergeButton => "merge",
            UiTarget::Canvas => "canvas",
        }
    }
}

impl std::fmt::Display for UiTarget {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Visual emphasis surface implemented by the host UI.
///
/// A missing target is not an error: `highlight`/`unhighlight` return whether
/// the target was found, and the tour skips emphasis it could not apply.
/// Showing a hint replaces any hint currently visible.
pub trait TourSurface: Send + Sync {
    /// Add visual emphasis to a target. Returns false if the target does not
    /// exist in the host UI.
    fn highlight(&self, target: UiTarget) -> bool;

    /// Remove visual emphasis from a target. Returns false if the target does
    /// not exist in the host UI.
    fn unhighlight(&self, target: UiTarget) -> bool;

    /// Show a hint near the canvas, replacing any existing hint.
    fn show_hint(&self, message: &str);

    /// Remove the hint, if any.
    fn hide_hint(&self);

    /// Play a celebration effect on tour completion.
    fn celebrate(&self) {}
}

/// Step-popup widget implemented by the host UI.
///
/// `cancel` and `complete` may be invoked when no step is currently showing;
/// implementations must treat that as a no-op.
pub trait StepPresenter: Send + Sync {
    /// Show the popup for a step, replacing the previous one.
    fn show(&self, step: &TourStep);

    /// Dismiss the popup without completing the tour.
    fn cancel(&self);

    /// Dismiss the popup, marking the tour finished.
    fn complete(&self);
}

/// Tracks which highlights were actually applied so cleanup removes exactly
/// those, and removing everything twice stays a no-op.
pub struct HighlightController {
    surface: Arc<dyn TourSurface>,
    applied: Mutex<HashSet<UiTarget>>,
}

impl HighlightController {
    /// Create a controller over the given surface.
    pub fn new(surface: Arc<dyn TourSurface>) -> Self {
        Self {
            surface,
            applied: Mutex::new(HashSet::new()),
        }
    }

    /// Highlight a target, remembering it if the host found it.
    pub fn apply(&self, target: UiTarget) {
        if self.surface.highlight(target) {
            self.applied.lock().insert(target);
        } else {
            tracing::trace!("Highlight target {} not found, skipping", target);
        }
    }

    /// Remove a highlight whether or not this controller applied it.
    pub fn remove(&self, target: UiTarget) {
        self.surface.unhighlight(target);
        self.applied.lock().remove(&target);
    }

    /// Remove every highlight this controller applied.
    pub fn clear(&self) {
        let mut applied = self.applied.lock();
        for target in applied.drain() {
            self.surface.unhighlight(target);
        }
    }

    /// Whether a highlight is currently tracked as applied.
    pub fn is_applied(&self, target: UiTarget) -> bool {
        self.applied.lock().contains(&target)
    }
}

impl std::fmt::Debug for HighlightController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HighlightController")
            .field("applied", &self.applied.lock())
            .finish()
    }
}
