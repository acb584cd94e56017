//! Shared test doubles for the integration tests.
#![allow(dead_code)]

use parking_lot::Mutex;
use std::collections::HashSet;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use polytour_core::{EditorSnapshot, GeometryOracle, Point, Polygon, Tool};
use polytour_guide::{StepId, StepPresenter, TourStep, TourSurface, UiTarget};

/// Scriptable stand-in for the drawing engine's store.
pub struct FakeEditor {
    mode: Mutex<Tool>,
    polygons: Mutex<Vec<Polygon>>,
    selection: Mutex<Vec<u64>>,
}

impl FakeEditor {
    pub fn new(mode: Tool) -> Self {
        Self {
            mode: Mutex::new(mode),
            polygons: Mutex::new(Vec::new()),
            selection: Mutex::new(Vec::new()),
        }
    }

    pub fn with_polygons(mode: Tool, polygons: Vec<Polygon>) -> Self {
        let editor = Self::new(mode);
        *editor.polygons.lock() = polygons;
        editor
    }

    pub fn set_mode(&self, mode: Tool) {
        *self.mode.lock() = mode;
    }

    pub fn push_polygon(&self, polygon: Polygon) {
        self.polygons.lock().push(polygon);
    }

    pub fn remove_polygons(&self, count: usize) {
        let mut polygons = self.polygons.lock();
        let keep = polygons.len().saturating_sub(count);
        polygons.truncate(keep);
    }

    pub fn set_selection(&self, selected: Vec<u64>) {
        *self.selection.lock() = selected;
    }
}

impl EditorSnapshot for FakeEditor {
    fn mode(&self) -> Tool {
        *self.mode.lock()
    }

    fn polygons(&self) -> Vec<Polygon> {
        self.polygons.lock().clone()
    }

    fn selection(&self) -> Vec<u64> {
        self.selection.lock().clone()
    }
}

/// Axis-aligned square with its corner at (x, y).
pub fn square(id: u64, x: f64, y: f64, size: f64) -> Polygon {
    Polygon::new(
        id,
        vec![
            Point::new(x, y),
            Point::new(x + size, y),
            Point::new(x + size, y + size),
            Point::new(x, y + size),
        ],
    )
}

/// Bounding-box oracle: regions intersect when their boxes overlap, edges
/// included. Exact enough for squares, which is all the tests draw.
pub struct RectOracle;

impl GeometryOracle for RectOracle {
    fn intersects(&self, a: &[Point], b: &[Point]) -> bool {
        let bounds = |points: &[Point]| {
            points.iter().fold(
                (f64::INFINITY, f64::INFINITY, f64::NEG_INFINITY, f64::NEG_INFINITY),
                |(min_x, min_y, max_x, max_y), p| {
                    (
                        min_x.min(p.x),
                        min_y.min(p.y),
                        max_x.max(p.x),
                        max_y.max(p.y),
                    )
                },
            )
        };
        let (a_min_x, a_min_y, a_max_x, a_max_y) = bounds(a);
        let (b_min_x, b_min_y, b_max_x, b_max_y) = bounds(b);
        a_min_x <= b_max_x && b_min_x <= a_max_x && a_min_y <= b_max_y && b_min_y <= a_max_y
    }
}

/// Surface that records everything the tour asks of it.
#[derive(Default)]
pub struct RecordingSurface {
    highlighted: Mutex<HashSet<UiTarget>>,
    hints: Mutex<Vec<String>>,
    hint_visible: Mutex<Option<String>>,
    celebrations: AtomicUsize,
}

impl RecordingSurface {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_highlighted(&self, target: UiTarget) -> bool {
        self.highlighted.lock().contains(&target)
    }

    pub fn hints(&self) -> Vec<String> {
        self.hints.lock().clone()
    }

    pub fn visible_hint(&self) -> Option<String> {
        self.hint_visible.lock().clone()
    }

    pub fn celebrations(&self) -> usize {
        self.celebrations.load(Ordering::SeqCst)
    }
}

impl TourSurface for RecordingSurface {
    fn highlight(&self, target: UiTarget) -> bool {
        self.highlighted.lock().insert(target);
        true
    }

    fn unhighlight(&self, target: UiTarget) -> bool {
        self.highlighted.lock().remove(&target);
        true
    }

    fn show_hint(&self, message: &str) {
        self.hints.lock().push(message.to_string());
        *self.hint_visible.lock() = Some(message.to_string());
    }

    fn hide_hint(&self) {
        *self.hint_visible.lock() = None;
    }

    fn celebrate(&self) {
        self.celebrations.fetch_add(1, Ordering::SeqCst);
    }
}

/// Presenter that records the steps it was asked to show.
#[derive(Default)]
pub struct RecordingPresenter {
    shown: Mutex<Vec<StepId>>,
    cancels: AtomicUsize,
    completes: AtomicUsize,
}

impl RecordingPresenter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn shown(&self) -> Vec<StepId> {
        self.shown.lock().clone()
    }

    pub fn cancels(&self) -> usize {
        self.cancels.load(Ordering::SeqCst)
    }

    pub fn completes(&self) -> usize {
        self.completes.load(Ordering::SeqCst)
    }
}

impl StepPresenter for RecordingPresenter {
    fn show(&self, step: &TourStep) {
        self.shown.lock().push(step.id);
    }

    fn cancel(&self) {
        self.cancels.fetch_add(1, Ordering::SeqCst);
    }

    fn complete(&self) {
        self.completes.fetch_add(1, Ordering::SeqCst);
    }
}

/// Collects every event published on a bus.
pub fn capture_events(
    bus: &Arc<polytour_core::EventBus>,
) -> (
    Arc<Mutex<Vec<polytour_core::EditorEvent>>>,
    polytour_core::Subscription,
) {
    let captured = Arc::new(Mutex::new(Vec::new()));
    let sink = captured.clone();
    let subscription = bus.subscribe(polytour_core::EventFilter::All, move |event| {
        sink.lock().push(event);
    });
    (captured, subscription)
}
