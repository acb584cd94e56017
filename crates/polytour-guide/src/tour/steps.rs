//! The tour's step sequence.
//!
//! Steps are fixed data: popup content, the affordance the popup attaches to,
//! buttons, and declarative enter/exit actions. Payload-dependent advance
//! rules live in the state machine's event handlers.

use polytour_core::Tool;

use crate::surface::UiTarget;

/// Identifiers for the tour steps, in tour order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StepId {
    /// Intro popup with skip/continue buttons.
    Welcome,
    /// Waiting for the pen tool to be selected.
    DrawPolygon,
    /// Waiting for the first polygon to be drawn.
    DrawingInstructions,
    /// Waiting for the split tool to be selected.
    SplitPolygon,
    /// Waiting for a split to land.
    SplittingInstructions,
    /// Waiting for the pen tool again.
    DrawTouching,
    /// Waiting for a polygon touching an existing one.
    TouchingInstructions,
    /// Waiting for the select tool.
    SelectMerge,
    /// Waiting for a selection and merge.
    SelectionInstructions,
    /// Final popup with the finish button.
    Completion,
}

impl StepId {
    /// Stable string form of this step id.
    pub fn as_str(&self) -> &'static str {
        match self {
            StepId::Welcome => "welcome",
            StepId::DrawPolygon => "draw-polygon",
            StepId::DrawingInstructions => "drawing-instructions",
            StepId::SplitPolygon => "split-polygon",
            StepId::SplittingInstructions => "splitting-instructions",
            StepId::DrawTouching => "draw-touching",
            StepId::TouchingInstructions => "touching-instructions",
            StepId::SelectMerge => "select-merge",
            StepId::SelectionInstructions => "selection-instructions",
            StepId::Completion => "completion",
        }
    }
}

impl std::fmt::Display for StepId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Declarative action run when a step is entered or exited.
#[derive(Debug, Clone, Copy)]
pub enum StepAction {
    /// Emphasize a UI affordance.
    Highlight(UiTarget),
    /// Remove emphasis from a UI affordance.
    Unhighlight(UiTarget),
    /// Arm the one-shot idle hint while waiting for this tool.
    AwaitTool(Tool),
    /// Play the completion celebration.
    Celebrate,
}

/// What a popup button does when pressed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ButtonAction {
    /// Advance to the next step.
    Next,
    /// Abandon the tour without marking completion.
    Skip,
    /// Finish the tour and persist completion.
    Complete,
}

/// A button rendered in a step popup.
#[derive(Debug, Clone, Copy)]
pub struct StepButton {
    /// Button label.
    pub label: &'static str,
    /// Action dispatched to the tour when pressed.
    pub action: ButtonAction,
}

/// One unit of the guided tour.
#[derive(Debug, Clone)]
pub struct TourStep {
    /// Step identifier.
    pub id: StepId,
    /// Popup title.
    pub title: &'static str,
    /// Popup body copy.
    pub body: &'static str,
    /// Affordance the popup attaches to.
    pub attach: UiTarget,
    /// Popup buttons; empty for steps advanced by editor events.
    pub buttons: &'static [StepButton],
    /// Actions run when the step becomes active.
    pub on_enter: &'static [StepAction],
    /// Actions run when the step is left.
    pub on_exit: &'static [StepAction],
}

/// Hint copy shown near the canvas.
pub mod hints {
    /// After choosing the split tool.
    pub const SPLIT_OVERLAP: &str = "Draw a polygon that overlaps your existing shape!";
    /// After switching back to the pen tool.
    pub const DRAW_TOUCHING: &str = "Draw a polygon that touches an existing one!";
    /// After choosing the select tool.
    pub const SELECT_TO_MERGE: &str = "Select the touching polygon(s) to merge them.";
    /// Corrective hint when the new polygon does not touch anything.
    pub const MUST_TOUCH: &str = "They need to share an edge or a point.";
    /// Once two or more polygons are selected.
    pub const CLICK_MERGE: &str = "Now click the Merge button!";
    /// Generic nudge after a period of inactivity.
    pub const IDLE: &str = "Need help? Follow the highlight and step title.";
}

/// The standard ten-step tour.
pub fn default_steps() -> Vec<TourStep> {
    vec![
        TourStep {
            id: StepId::Welcome,
            title: "Let's Go!",
            body: "You'll master 4 quick moves: draw a polygon, split it, \
                   add a touching one, merge them.",
            attach: UiTarget::Canvas,
            buttons: &[
                StepButton {
                    label: "Skip",
                    action: ButtonAction::Skip,
                },
                StepButton {
                    label: "Let's Go",
                    action: ButtonAction::Next,
                },
            ],
            on_enter: &[],
            on_exit: &[],
        },
        TourStep {
            id: StepId::DrawPolygon,
            title: "Step 1 · Draw A Polygon!",
            body: "Click Pen to start drawing.",
            attach: UiTarget::PenTool,
            buttons: &[],
            on_enter: &[StepAction::Highlight(UiTarget::PenTool)],
            on_exit: &[],
        },
        TourStep {
            id: StepId::DrawingInstructions,
            title: "Pen is Active!",
            body: "Click the canvas to drop points. Click on the first point \
                   to close the shape (needs 3+ points).",
            attach: UiTarget::Canvas,
            buttons: &[],
            on_enter: &[StepAction::Highlight(UiTarget::Canvas)],
            on_exit: &[StepAction::Unhighlight(UiTarget::Canvas)],
        },
        TourStep {
            id: StepId::SplitPolygon,
            title: "Step 2 · Time to Slice",
            body: "Choose Split, draw another polygon overlapping your first one.",
            attach: UiTarget::SplitTool,
            buttons: &[],
            on_enter: &[
                StepAction::Highlight(UiTarget::SplitTool),
                StepAction::AwaitTool(Tool::Split),
            ],
            on_exit: &[],
        },
        TourStep {
            id: StepId::SplittingInstructions,
            title: "Step 2.5 · Split",
            body: "Draw another polygon overlapping your first one, \
                   and double-click to cut!",
            attach: UiTarget::Canvas,
            buttons: &[],
            on_enter: &[StepAction::Highlight(UiTarget::Canvas)],
            on_exit: &[StepAction::Unhighlight(UiTarget::Canvas)],
        },
        TourStep {
            id: StepId::DrawTouching,
            title: "Step 3 · Make It Touch",
            body: "Switch back to Pen. Draw a new polygon that touches an \
                   existing one (share an edge or corner).",
            attach: UiTarget::PenTool,
            buttons: &[],
            on_enter: &[
                StepAction::Highlight(UiTarget::PenTool),
                StepAction::AwaitTool(Tool::Pen),
            ],
            on_exit: &[],
        },
        TourStep {
            id: StepId::TouchingInstructions,
            title: "Step 3.5 · Touch",
            body: "Draw another polygon touching the other(s).",
            attach: UiTarget::Canvas,
            buttons: &[],
            on_enter: &[StepAction::Highlight(UiTarget::Canvas)],
            on_exit: &[StepAction::Unhighlight(UiTarget::Canvas)],
        },
        TourStep {
            id: StepId::SelectMerge,
            title: "Step 4 · Merging",
            body: "Tap Select, to select the polygons.",
            attach: UiTarget::SelectTool,
            buttons: &[],
            on_enter: &[
                StepAction::Highlight(UiTarget::SelectTool),
                StepAction::AwaitTool(Tool::Select),
            ],
            on_exit: &[],
        },
        TourStep {
            id: StepId::SelectionInstructions,
            title: "Step 4.5 · Select Polygons",
            body: "Click on canvas and drag to draw a selection rectangle.",
            attach: UiTarget::Canvas,
            buttons: &[],
            on_enter: &[StepAction::Highlight(UiTarget::Canvas)],
            on_exit: &[
                StepAction::Unhighlight(UiTarget::Canvas),
                StepAction::Unhighlight(UiTarget::MergeButton),
            ],
        },
        TourStep {
            id: StepId::Completion,
            title: "You Did It!",
            body: "You can now draw, split, and merge like a Boolean wizard.",
            attach: UiTarget::Canvas,
            buttons: &[StepButton {
                label: "Finish",
                action: ButtonAction::Complete,
            }],
            on_enter: &[StepAction::Celebrate],
            on_exit: &[],
        },
    ]
}
