//! Transform gizmo
//!
//! Three axis handles drawn at the selected object. Only translation is
//! interactive; Rotate and Scale can be selected but do nothing yet.

mod controller;

pub use controller::{GizmoConfig, GizmoController};

use serde::{Serialize, Deserialize};
use crate::math::{Vec2, Vec3};

/// Gizmo handle axis
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Axis {
    X,
    Y,
    Z,
}

impl Axis {
    /// Handles in hit-test order
    pub const ALL: [Axis; 3] = [Axis::X, Axis::Y, Axis::Z];

    /// Get the unit vector for this axis
    pub fn unit_vector(&self) -> Vec3 {
        match self {
            Axis::X => Vec3::new(1.0, 0.0, 0.0),
            Axis::Y => Vec3::new(0.0, 1.0, 0.0),
            Axis::Z => Vec3::new(0.0, 0.0, 1.0),
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Axis::X => "X",
            Axis::Y => "Y",
            Axis::Z => "Z",
        }
    }
}

/// Which transform the gizmo edits
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum GizmoMode {
    #[default]
    Translate,
    Rotate,
    Scale,
}

impl GizmoMode {
    pub fn label(&self) -> &'static str {
        match self {
            GizmoMode::Translate => "Translate",
            GizmoMode::Rotate => "Rotate",
            GizmoMode::Scale => "Scale",
        }
    }
}

/// How a mouse ray is tested against the axis handles
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum AxisHitTest {
    /// Distance from a fixed point `probe_distance` along the ray to the
    /// handle point nearest the ray origin. First handle under the
    /// threshold wins. Misses handles that are much nearer or farther than
    /// the probe.
    Probe,
    /// True minimum distance between ray and handle segment. Closest handle
    /// under the threshold wins instead of the first one; equal distances
    /// fall back to X, Y, Z order.
    #[default]
    Exact,
}

/// Interaction state. Only one handle can be hovered or dragged at a time.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum GizmoState {
    #[default]
    Idle,
    Hovering(Axis),
    Dragging {
        axis: Axis,
        /// Object position when the drag began (restored on cancel)
        drag_start: Vec3,
        /// Mouse position of the last applied movement
        last_mouse: Vec2,
    },
}
