//! Gizmo hover and drag handling
//!
//! Per frame: recompute the hovered handle from the mouse ray, start a drag
//! when a hovered handle is clicked, and translate the object by mouse deltas
//! while the button stays down.

use serde::{Serialize, Deserialize};
use tracing::debug;

use crate::math::{Vec2, Vec3};
use crate::picking::{Ray, ray_segment_distance};
use super::{Axis, AxisHitTest, GizmoMode, GizmoState};

/// Gizmo geometry and drag tuning
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GizmoConfig {
    /// Handle length in world units, centered on the object
    pub size: f32,
    /// Maximum ray distance (world units) that counts as hovering a handle
    pub hit_threshold: f32,
    /// World units moved per pixel of mouse movement
    pub sensitivity: f32,
    /// Mouse deltas at or below this (pixels, per component) are ignored
    pub dead_zone: f32,
    /// Probe point distance along the ray for `AxisHitTest::Probe`
    pub probe_distance: f32,
    pub hit_test: AxisHitTest,
}

impl Default for GizmoConfig {
    fn default() -> Self {
        Self {
            size: 2.0,
            hit_threshold: 0.5,
            sensitivity: 0.05,
            dead_zone: 0.05,
            probe_distance: 10.0,
            hit_test: AxisHitTest::Exact,
        }
    }
}

/// World-space movement for a mouse delta along one handle.
///
/// Screen Y grows downward, so Y is inverted; Z follows vertical mouse motion.
pub fn axis_translation(axis: Axis, delta: Vec2, sensitivity: f32) -> Vec3 {
    match axis {
        Axis::X => Vec3::new(delta.x * sensitivity, 0.0, 0.0),
        Axis::Y => Vec3::new(0.0, -delta.y * sensitivity, 0.0),
        Axis::Z => Vec3::new(0.0, 0.0, delta.y * sensitivity),
    }
}

/// Translate gizmo for the selected object
#[derive(Debug, Clone)]
pub struct GizmoController {
    pub config: GizmoConfig,
    mode: GizmoMode,
    visible: bool,
    state: GizmoState,
}

impl Default for GizmoController {
    fn default() -> Self {
        Self::new(GizmoConfig::default())
    }
}

impl GizmoController {
    pub fn new(config: GizmoConfig) -> Self {
        Self {
            config,
            mode: GizmoMode::Translate,
            visible: true,
            state: GizmoState::Idle,
        }
    }

    pub fn mode(&self) -> GizmoMode {
        self.mode
    }

    /// Switch mode. Leaving Translate drops any hover or drag.
    pub fn set_mode(&mut self, mode: GizmoMode) {
        self.mode = mode;
        if !self.is_interactive() {
            self.reset();
        }
    }

    pub fn visible(&self) -> bool {
        self.visible
    }

    pub fn set_visible(&mut self, visible: bool) {
        self.visible = visible;
        if !visible {
            self.reset();
        }
    }

    /// Handles respond to the mouse only when shown and translating
    pub fn is_interactive(&self) -> bool {
        self.visible && self.mode == GizmoMode::Translate
    }

    pub fn hovered_axis(&self) -> Option<Axis> {
        match self.state {
            GizmoState::Hovering(axis) => Some(axis),
            _ => None,
        }
    }

    pub fn dragged_axis(&self) -> Option<Axis> {
        match self.state {
            GizmoState::Dragging { axis, .. } => Some(axis),
            _ => None,
        }
    }

    pub fn is_dragging(&self) -> bool {
        matches!(self.state, GizmoState::Dragging { .. })
    }

    /// True while a handle is hovered or dragged; clicks then belong to the gizmo
    pub fn is_busy(&self) -> bool {
        self.state != GizmoState::Idle
    }

    /// Back to Idle without touching the object (selection changed)
    pub fn reset(&mut self) {
        self.state = GizmoState::Idle;
    }

    /// Endpoints of a handle centered on `center`
    pub fn axis_segment(&self, center: Vec3, axis: Axis) -> (Vec3, Vec3) {
        let half = axis.unit_vector() * (self.config.size / 2.0);
        (center - half, center + half)
    }

    /// Which handle, if any, the ray is over
    pub fn hit_test(&self, ray: &Ray, center: Vec3) -> Option<Axis> {
        match self.config.hit_test {
            AxisHitTest::Probe => self.hit_test_probe(ray, center),
            AxisHitTest::Exact => self.hit_test_exact(ray, center),
        }
    }

    fn hit_test_probe(&self, ray: &Ray, center: Vec3) -> Option<Axis> {
        let probe = ray.at(self.config.probe_distance);

        Axis::ALL.into_iter().find(|axis| {
            let (start, _) = self.axis_segment(center, *axis);
            let dir = axis.unit_vector();
            let t = (ray.origin - start).dot(dir).clamp(0.0, self.config.size);
            let closest = start + dir * t;
            (probe - closest).len() < self.config.hit_threshold
        })
    }

    fn hit_test_exact(&self, ray: &Ray, center: Vec3) -> Option<Axis> {
        Axis::ALL
            .into_iter()
            .map(|axis| {
                let (start, end) = self.axis_segment(center, axis);
                (axis, ray_segment_distance(ray, start, end))
            })
            .filter(|(_, dist)| *dist < self.config.hit_threshold)
            .min_by(|a, b| a.1.total_cmp(&b.1))
            .map(|(axis, _)| axis)
    }

    /// Recompute hover from this frame's mouse ray. A drag in progress is left alone.
    pub fn update_hover(&mut self, ray: Option<&Ray>, center: Vec3) -> Option<Axis> {
        if self.is_dragging() {
            return None;
        }
        if !self.is_interactive() {
            self.state = GizmoState::Idle;
            return None;
        }

        let hovered = ray.and_then(|ray| self.hit_test(ray, center));
        self.state = match hovered {
            Some(axis) => GizmoState::Hovering(axis),
            None => GizmoState::Idle,
        };
        hovered
    }

    /// Start dragging the hovered handle. Returns the axis if a drag began.
    pub fn begin_drag(&mut self, object_position: Vec3, mouse: Vec2) -> Option<Axis> {
        if !self.is_interactive() {
            return None;
        }
        let GizmoState::Hovering(axis) = self.state else {
            return None;
        };

        self.state = GizmoState::Dragging {
            axis,
            drag_start: object_position,
            last_mouse: mouse,
        };
        debug!(axis = axis.label(), ?object_position, "gizmo drag started");
        Some(axis)
    }

    /// Apply mouse movement to `position` while dragging.
    ///
    /// Deltas inside the dead zone on both components are skipped and do not
    /// advance the last mouse position. Returns the applied movement.
    pub fn drag(&mut self, mouse: Vec2, position: &mut Vec3) -> Option<Vec3> {
        let GizmoState::Dragging { axis, drag_start, last_mouse } = self.state else {
            return None;
        };
        if !mouse.is_finite() {
            return None;
        }

        let delta = mouse - last_mouse;
        if delta.x.abs() <= self.config.dead_zone && delta.y.abs() <= self.config.dead_zone {
            return None;
        }

        let movement = axis_translation(axis, delta, self.config.sensitivity);
        if !movement.is_finite() {
            return None;
        }
        *position += movement;
        self.state = GizmoState::Dragging { axis, drag_start, last_mouse: mouse };
        Some(movement)
    }

    /// Button released: keep the moved position and go Idle
    pub fn end_drag(&mut self) -> Option<Axis> {
        let axis = self.dragged_axis()?;
        self.state = GizmoState::Idle;
        debug!(axis = axis.label(), "gizmo drag ended");
        Some(axis)
    }

    /// Abort the drag. Returns the position the object had when it started.
    pub fn cancel_drag(&mut self) -> Option<Vec3> {
        let GizmoState::Dragging { axis, drag_start, .. } = self.state else {
            return None;
        };
        self.state = GizmoState::Idle;
        debug!(axis = axis.label(), "gizmo drag cancelled");
        Some(drag_start)
    }
}
