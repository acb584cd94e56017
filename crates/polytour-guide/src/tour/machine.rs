//! Tour state machine.
//!
//! Consumes semantic events from the bus and drives the step sequence:
//! advancing on matching events, deferring advances behind a settle delay,
//! arming one-shot idle hints, and cleaning up highlights and timers when the
//! run ends. Events that do not match the current step are ignored, and a
//! deactivated run turns every late event and stale timer into a no-op.

use parking_lot::Mutex;
use std::sync::{Arc, Weak};
use std::time::Duration;

use polytour_core::{
    EditorEvent, EventBus, EventCategory, EventFilter, SelectionEvent, ShapeEvent, Subscription,
    Tool, ToolEvent,
};

use crate::completion::CompletionStore;
use crate::schedule::{Scheduler, TimerHandle};
use crate::surface::{HighlightController, StepPresenter, TourSurface, UiTarget};
use crate::tour::steps::{default_steps, hints, ButtonAction, StepAction, StepId, TourStep};

/// Timing knobs for the tour.
#[derive(Debug, Clone)]
pub struct TourConfig {
    /// Deferral before advancing past event-driven steps, letting the
    /// renderer finish its own update before the next popup attaches.
    pub settle_delay: Duration,
    /// How long to wait on a tool-selection step before showing the idle hint.
    pub idle_timeout: Duration,
}

impl Default for TourConfig {
    fn default() -> Self {
        Self {
            settle_delay: Duration::from_millis(500),
            idle_timeout: Duration::from_secs(20),
        }
    }
}

/// Per-run progress flags, for hosts and tests.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TourProgress {
    /// A polygon touching an existing one was drawn.
    pub touching_created: bool,
    /// A split operation landed.
    pub split_done: bool,
    /// A merge operation landed.
    pub merge_done: bool,
}

/// Mutable session state of one tour run.
#[derive(Default)]
struct TourRun {
    active: bool,
    step_index: usize,
    /// Lifecycle token: bumped on every activation and deactivation so that
    /// deferred callbacks from an earlier run never act on a later one.
    generation: u64,
    progress: TourProgress,
    pending: Vec<TimerHandle>,
}

/// Drives the guided tour against the event bus.
///
/// Dropping the controller unsubscribes it from the bus.
pub struct TourController {
    inner: Arc<TourInner>,
    _subscription: Subscription,
}

struct TourInner {
    /// Self-handle captured by deferred callbacks.
    weak: Weak<TourInner>,
    steps: Vec<TourStep>,
    presenter: Arc<dyn StepPresenter>,
    surface: Arc<dyn TourSurface>,
    highlights: HighlightController,
    scheduler: Arc<dyn Scheduler>,
    completion: Mutex<CompletionStore>,
    run: Mutex<TourRun>,
    config: TourConfig,
}

impl TourController {
    /// Create a controller with default steps and timing, subscribed to the
    /// given bus.
    pub fn new(
        bus: &EventBus,
        presenter: Arc<dyn StepPresenter>,
        surface: Arc<dyn TourSurface>,
        scheduler: Arc<dyn Scheduler>,
        completion: CompletionStore,
    ) -> Self {
        Self::with_config(
            bus,
            presenter,
            surface,
            scheduler,
            completion,
            TourConfig::default(),
        )
    }

    /// Create a controller with custom timing.
    pub fn with_config(
        bus: &EventBus,
        presenter: Arc<dyn StepPresenter>,
        surface: Arc<dyn TourSurface>,
        scheduler: Arc<dyn Scheduler>,
        completion: CompletionStore,
        config: TourConfig,
    ) -> Self {
        let inner = Arc::new_cyclic(|weak| TourInner {
            weak: weak.clone(),
            steps: default_steps(),
            presenter,
            highlights: HighlightController::new(surface.clone()),
            surface,
            scheduler,
            completion: Mutex::new(completion),
            run: Mutex::new(TourRun::default()),
            config,
        });

        let handler = Arc::clone(&inner);
        let subscription = bus.subscribe(
            EventFilter::Categories(vec![
                EventCategory::Tool,
                EventCategory::Shape,
                EventCategory::Selection,
            ]),
            move |event| handler.handle_event(&event),
        );

        Self {
            inner,
            _subscription: subscription,
        }
    }

    /// Whether the tour was completed in this or a previous session.
    pub fn is_completed(&self) -> bool {
        self.inner.completion.lock().is_completed()
    }

    /// Whether a run is currently active.
    pub fn is_active(&self) -> bool {
        self.inner.run.lock().active
    }

    /// The currently active step, if a run is in progress.
    pub fn current_step(&self) -> Option<StepId> {
        let run = self.inner.run.lock();
        run.active.then(|| self.inner.steps[run.step_index].id)
    }

    /// Per-run progress flags.
    pub fn progress(&self) -> TourProgress {
        self.inner.run.lock().progress
    }

    /// Begin a run at the first step. No-op (returns false) if the tour was
    /// already completed or a run is already active.
    pub fn start(&self) -> bool {
        self.inner.start()
    }

    /// Abandon the run: cancel the popup, remove all emphasis, keep the
    /// completion record untouched. Safe to call twice.
    pub fn skip_tour(&self) {
        self.inner.skip();
    }

    /// Finish the tour: persist the completion marker (best-effort),
    /// deactivate, and clean up. Safe to call twice.
    pub fn complete_tour(&self) {
        self.inner.complete();
    }

    /// Clear the persisted completion record and per-run flags, for replay
    /// or testing.
    pub fn reset_onboarding(&self) {
        self.inner.reset();
    }

    /// Dispatch a popup button press.
    pub fn handle_button(&self, action: ButtonAction) {
        self.inner.handle_button(action);
    }
}

impl std::fmt::Debug for TourController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let run = self.inner.run.lock();
        f.debug_struct("TourController")
            .field("active", &run.active)
            .field("step", &self.inner.steps[run.step_index].id)
            .finish()
    }
}

impl TourInner {
    fn start(&self) -> bool {
        if self.completion.lock().is_completed() {
            tracing::debug!("Tour already completed, not starting");
            return false;
        }

        let mut run = self.run.lock();
        if run.active {
            return false;
        }
        run.active = true;
        run.generation = run.generation.wrapping_add(1);
        run.step_index = 0;
        run.progress = TourProgress::default();
        tracing::debug!("Tour started");
        self.enter_step(&mut run);
        true
    }

    fn skip(&self) {
        tracing::debug!("Tour skipped");
        self.deactivate();
        self.presenter.cancel();
    }

    fn complete(&self) {
        tracing::debug!("Tour completed");
        self.completion.lock().mark_completed();
        self.deactivate();
        self.presenter.complete();
    }

    fn reset(&self) {
        self.completion.lock().reset();
        self.run.lock().progress = TourProgress::default();
    }

    /// Deactivate the run and undo everything visible. Idempotent.
    fn deactivate(&self) {
        let mut run = self.run.lock();
        run.active = false;
        run.generation = run.generation.wrapping_add(1);
        for handle in run.pending.drain(..) {
            handle.cancel();
        }
        drop(run);

        self.highlights.clear();
        self.surface.hide_hint();
    }

    fn handle_button(&self, action: ButtonAction) {
        match action {
            ButtonAction::Next => {
                let mut run = self.run.lock();
                if run.active {
                    self.advance(&mut run);
                }
            }
            ButtonAction::Skip => self.skip(),
            ButtonAction::Complete => self.complete(),
        }
    }

    fn handle_event(&self, event: &EditorEvent) {
        let mut run = self.run.lock();
        if !run.active {
            return;
        }

        match event {
            EditorEvent::Tool(ToolEvent::Changed { current, .. }) => {
                self.on_tool_changed(&mut run, *current);
            }
            EditorEvent::Shape(ShapeEvent::Created {
                touches_existing, ..
            }) => {
                self.on_polygon_created(&mut run, *touches_existing);
            }
            EditorEvent::Shape(ShapeEvent::Split { .. }) => {
                self.on_polygon_split(&mut run);
            }
            EditorEvent::Shape(ShapeEvent::Merged { .. }) => {
                self.on_polygons_merged(&mut run);
            }
            EditorEvent::Selection(SelectionEvent::Changed { selected_count, .. }) => {
                self.on_selection_changed(&mut run, *selected_count);
            }
            EditorEvent::Failure(_) => {}
        }
    }

    fn on_tool_changed(&self, run: &mut TourRun, current: Tool) {
        let step = self.steps[run.step_index].id;
        match (step, current) {
            (StepId::DrawPolygon, Tool::Pen) => {
                self.highlights.remove(UiTarget::PenTool);
                self.advance(run);
            }
            (StepId::SplitPolygon, Tool::Split) => {
                self.highlights.remove(UiTarget::SplitTool);
                self.advance(run);
                self.surface.show_hint(hints::SPLIT_OVERLAP);
            }
            (StepId::DrawTouching, Tool::Pen) => {
                self.highlights.remove(UiTarget::PenTool);
                self.advance(run);
                self.surface.show_hint(hints::DRAW_TOUCHING);
            }
            (StepId::SelectMerge, Tool::Select) => {
                self.highlights.remove(UiTarget::SelectTool);
                self.advance(run);
                self.surface.show_hint(hints::SELECT_TO_MERGE);
            }
            _ => tracing::trace!("Ignoring tool change to {} at step {}", current, step),
        }
    }

    fn on_polygon_created(&self, run: &mut TourRun, touches_existing: bool) {
        match self.steps[run.step_index].id {
            StepId::DrawingInstructions => {
                self.highlights.remove(UiTarget::Canvas);
                self.advance_after_settle(run);
            }
            StepId::TouchingInstructions => {
                if touches_existing {
                    run.progress.touching_created = true;
                    self.highlights.remove(UiTarget::Canvas);
                    self.surface.hide_hint();
                    self.advance_after_settle(run);
                } else {
                    self.surface.show_hint(hints::MUST_TOUCH);
                }
            }
            step => tracing::trace!("Ignoring polygon creation at step {}", step),
        }
    }

    fn on_polygon_split(&self, run: &mut TourRun) {
        match self.steps[run.step_index].id {
            StepId::SplittingInstructions => {
                run.progress.split_done = true;
                self.highlights.remove(UiTarget::Canvas);
                self.surface.hide_hint();
                self.advance_after_settle(run);
            }
            step => tracing::trace!("Ignoring split at step {}", step),
        }
    }

    fn on_polygons_merged(&self, run: &mut TourRun) {
        match self.steps[run.step_index].id {
            StepId::SelectionInstructions => {
                run.progress.merge_done = true;
                self.highlights.remove(UiTarget::Canvas);
                self.surface.hide_hint();
                self.advance_after_settle(run);
            }
            step => tracing::trace!("Ignoring merge at step {}", step),
        }
    }

    fn on_selection_changed(&self, run: &mut TourRun, selected_count: usize) {
        if self.steps[run.step_index].id == StepId::SelectionInstructions && selected_count >= 2 {
            self.highlights.remove(UiTarget::Canvas);
            self.highlights.apply(UiTarget::MergeButton);
            self.surface.show_hint(hints::CLICK_MERGE);
        }
    }

    /// Move to the next step: exit actions, index bump, popup, entry actions.
    fn advance(&self, run: &mut TourRun) {
        if !run.active || run.step_index + 1 >= self.steps.len() {
            return;
        }
        let exit_actions = self.steps[run.step_index].on_exit;
        self.apply_actions(exit_actions, run);

        run.step_index += 1;
        self.enter_step(run);
    }

    fn enter_step(&self, run: &mut TourRun) {
        let step = &self.steps[run.step_index];
        tracing::debug!("Entering step {}", step.id);
        self.presenter.show(step);
        let enter_actions = step.on_enter;
        self.apply_actions(enter_actions, run);
    }

    fn apply_actions(&self, actions: &[StepAction], run: &mut TourRun) {
        for action in actions {
            match action {
                StepAction::Highlight(target) => self.highlights.apply(*target),
                StepAction::Unhighlight(target) => self.highlights.remove(*target),
                StepAction::AwaitTool(tool) => self.arm_idle_watch(run, *tool),
                StepAction::Celebrate => self.surface.celebrate(),
            }
        }
    }

    /// Defer the advance by the settle delay; a skip or completion in the
    /// meantime bumps the generation and the callback does nothing.
    fn advance_after_settle(&self, run: &mut TourRun) {
        let weak = self.weak.clone();
        let generation = run.generation;
        let handle = self.scheduler.schedule(
            self.config.settle_delay,
            Box::new(move || {
                let Some(inner) = weak.upgrade() else { return };
                let mut run = inner.run.lock();
                if run.active && run.generation == generation {
                    inner.advance(&mut run);
                }
            }),
        );
        run.pending.push(handle);
    }

    /// One check per step entry: if the run is still sitting on this step
    /// when the timeout fires, the expected tool was never chosen.
    fn arm_idle_watch(&self, run: &mut TourRun, expected: Tool) {
        let weak = self.weak.clone();
        let generation = run.generation;
        let step_index = run.step_index;
        let handle = self.scheduler.schedule(
            self.config.idle_timeout,
            Box::new(move || {
                let Some(inner) = weak.upgrade() else { return };
                let run = inner.run.lock();
                let stalled =
                    run.active && run.generation == generation && run.step_index == step_index;
                drop(run);
                if stalled {
                    tracing::debug!("Idle while waiting for the {} tool", expected);
                    inner.surface.show_hint(hints::IDLE);
                }
            }),
        );
        run.pending.push(handle);
    }
}
