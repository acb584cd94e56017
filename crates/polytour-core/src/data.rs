//! Editor-facing data model.
//!
//! The drawing engine owns the authoritative application state; this module
//! defines the read-only view of it that the onboarding layer consumes, plus
//! the geometry capability it borrows for the touching test.

use serde::{Deserialize, Serialize};

/// A 2D point on the editor canvas.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    /// Horizontal coordinate.
    pub x: f64,
    /// Vertical coordinate.
    pub y: f64,
}

impl Point {
    /// Create a new point.
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// A closed polygon: identity plus an ordered boundary.
///
/// Polygons are never mutated by the onboarding layer; they are snapshots of
/// engine state carried through events for observers that want the geometry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Polygon {
    /// Engine-assigned identity, stable for the lifetime of the shape.
    pub id: u64,
    /// Ordered boundary points forming a closed ring (last connects to first).
    pub points: Vec<Point>,
}

impl Polygon {
    /// Create a new polygon from an ordered boundary.
    pub fn new(id: u64, points: Vec<Point>) -> Self {
        Self { id, points }
    }

    /// The boundary ring of this polygon.
    pub fn boundary(&self) -> &[Point] {
        &self.points
    }
}

/// Editing tools the engine can have active.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tool {
    /// Selection / drag-select tool.
    Select,
    /// Polygon creation tool.
    Pen,
    /// Polygon slicing tool.
    Split,
}

impl Tool {
    /// Stable string form, matching the engine's mode identifiers.
    pub fn as_str(&self) -> &'static str {
        match self {
            Tool::Select => "select",
            Tool::Pen => "pen",
            Tool::Split => "split",
        }
    }
}

impl std::fmt::Display for Tool {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for Tool {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "select" => Ok(Tool::Select),
            "pen" => Ok(Tool::Pen),
            "split" => Ok(Tool::Split),
            other => Err(format!("Unknown tool: {}", other)),
        }
    }
}

/// Read-only view of the drawing engine's current state.
///
/// Implemented by the host over whatever store the engine uses. The polygon
/// sequence is append-biased: newly created shapes land at the tail, so the
/// tail identifies the most recent additions.
pub trait EditorSnapshot: Send + Sync {
    /// The currently active tool.
    fn mode(&self) -> Tool;

    /// All polygons, in engine order.
    fn polygons(&self) -> Vec<Polygon>;

    /// Ids of the currently selected polygons.
    fn selection(&self) -> Vec<u64>;
}

/// Yes/no region-intersection capability borrowed from the geometry kernel.
pub trait GeometryOracle: Send + Sync {
    /// Whether the regions bounded by `a` and `b` intersect.
    fn intersects(&self, a: &[Point], b: &[Point]) -> bool;
}
