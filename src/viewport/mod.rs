//! 3D viewport orchestration
//!
//! Runs once per frame over an input snapshot: camera navigation first, then
//! the gizmo, then picking. A click the gizmo consumes never reaches the
//! picker, so grabbing a handle does not change the selection.

pub mod draw;

use tracing::debug;

use crate::camera::OrbitCamera;
use crate::config::EditorConfig;
use crate::gizmo::{Axis, GizmoConfig, GizmoController};
use crate::math::{Vec2, Vec3};
use crate::picking::{pick_object, screen_to_world_ray, Ray};
use crate::scene::{ObjectId, SceneArena};

/// Input for one frame, in viewport-local pixels (origin top-left)
#[derive(Debug, Clone, Copy, Default)]
pub struct ViewportInput {
    pub mouse: Vec2,
    /// Movement since the previous frame
    pub mouse_delta: Vec2,
    /// Viewport width and height
    pub size: Vec2,
    /// Cursor is over the viewport
    pub hovered: bool,
    pub left_pressed: bool,
    pub left_down: bool,
    pub right_down: bool,
    pub middle_down: bool,
    /// Wheel notches, positive zooms in
    pub scroll: f32,
    /// Escape this frame
    pub cancel_pressed: bool,
}

impl ViewportInput {
    pub fn has_extent(&self) -> bool {
        self.size.is_finite() && self.size.x > 0.0 && self.size.y > 0.0
    }
}

/// What changed during a frame
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct FrameOutcome {
    /// New selection, if it changed by picking
    pub selection_changed: Option<Option<ObjectId>>,
    /// Object moved by the gizmo and its new position
    pub moved: Option<(ObjectId, Vec3)>,
    pub drag_started: Option<Axis>,
    pub drag_ended: Option<Axis>,
    pub drag_cancelled: bool,
}

/// Owns the gizmo and routes viewport input between camera, gizmo and picker
#[derive(Debug, Clone)]
pub struct ViewportController {
    pub gizmo: GizmoController,
    pub pick_radius: f32,
    last_selection: Option<ObjectId>,
}

impl ViewportController {
    pub fn new(gizmo: GizmoConfig, pick_radius: f32) -> Self {
        Self {
            gizmo: GizmoController::new(gizmo),
            pick_radius,
            last_selection: None,
        }
    }

    pub fn from_config(config: &EditorConfig) -> Self {
        Self::new(config.gizmo, config.picking.sphere_radius)
    }

    /// World ray under the mouse, None if the viewport or camera is degenerate
    pub fn mouse_ray(&self, input: &ViewportInput, camera: &OrbitCamera) -> Option<Ray> {
        if !input.has_extent() {
            return None;
        }
        let projection = camera.projection_matrix(input.size.x / input.size.y)?;
        screen_to_world_ray(
            (input.mouse.x, input.mouse.y),
            (input.size.x, input.size.y),
            &camera.view_matrix(),
            &projection,
        )
    }

    pub fn frame(
        &mut self,
        input: &ViewportInput,
        camera: &mut OrbitCamera,
        scene: &mut SceneArena,
    ) -> FrameOutcome {
        let mut outcome = FrameOutcome::default();

        // Selection may have changed outside the viewport (hierarchy, delete)
        self.sync_selection(scene.selected());

        self.navigate(input, camera);

        // Release and cancel need no ray, so they are honored on every frame
        if let Some(id) = scene.selected() {
            self.advance_drag(input, id, scene, &mut outcome);
        }

        if !input.has_extent() {
            return outcome;
        }

        let ray = if input.hovered { self.mouse_ray(input, camera) } else { None };

        if let Some(id) = scene.selected() {
            self.update_hover(input, ray.as_ref(), id, scene, &mut outcome);
        }

        if input.left_pressed && input.hovered && !self.gizmo.is_busy() {
            if let Some(ray) = ray {
                let hit = pick_object(&ray, scene.iter(), self.pick_radius);
                if scene.select(hit) {
                    debug!(selected = ?hit, "selection changed by pick");
                    outcome.selection_changed = Some(hit);
                }
            }
        }
        self.sync_selection(scene.selected());

        outcome
    }

    fn sync_selection(&mut self, selected: Option<ObjectId>) {
        if selected != self.last_selection {
            self.gizmo.reset();
            self.last_selection = selected;
        }
    }

    fn navigate(&self, input: &ViewportInput, camera: &mut OrbitCamera) {
        if !input.hovered || self.gizmo.is_dragging() {
            return;
        }
        let delta = input.mouse_delta;
        if delta.is_finite() {
            if input.right_down {
                camera.orbit(delta.x, delta.y);
            }
            if input.middle_down {
                camera.pan(delta.x, delta.y);
            }
        }
        if input.scroll.is_finite() && input.scroll != 0.0 {
            camera.zoom(input.scroll);
        }
    }

    /// Cancel, end or continue a drag in progress
    fn advance_drag(
        &mut self,
        input: &ViewportInput,
        id: ObjectId,
        scene: &mut SceneArena,
        outcome: &mut FrameOutcome,
    ) {
        if !self.gizmo.is_dragging() {
            return;
        }
        let Some(object) = scene.selected_object_mut() else {
            return;
        };
        let position = &mut object.transform.position;

        if input.cancel_pressed {
            if let Some(start) = self.gizmo.cancel_drag() {
                *position = start;
                outcome.moved = Some((id, start));
                outcome.drag_cancelled = true;
            }
        } else if !input.left_down {
            outcome.drag_ended = self.gizmo.end_drag();
        } else if self.gizmo.drag(input.mouse, position).is_some() {
            outcome.moved = Some((id, *position));
        }
    }

    /// Recompute the hovered handle and start a drag on click
    fn update_hover(
        &mut self,
        input: &ViewportInput,
        ray: Option<&Ray>,
        id: ObjectId,
        scene: &SceneArena,
        outcome: &mut FrameOutcome,
    ) {
        if self.gizmo.is_dragging() {
            return;
        }
        let Some(object) = scene.get(id) else {
            return;
        };

        let center = object.transform.position;
        self.gizmo.update_hover(ray, center);
        if input.left_pressed && input.hovered {
            outcome.drag_started = self.gizmo.begin_drag(center, input.mouse);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::camera::{CameraConfig, ProjectionConfig};
    use crate::math::{mat4_mul, mat4_transform_vec4};
    use crate::scene::SceneObject;

    const SIZE: Vec2 = Vec2 { x: 800.0, y: 600.0 };

    /// Camera at (0, 0, -10) looking down +Z at the origin
    fn camera() -> OrbitCamera {
        OrbitCamera::new(
            CameraConfig { distance: 10.0, yaw: 0.0, pitch: 0.0, ..CameraConfig::default() },
            ProjectionConfig::default(),
        )
    }

    fn mesh_at(name: &str, position: Vec3) -> SceneObject {
        SceneObject::new(name).with_mesh("cube").with_position(position)
    }

    /// Pixel where a world point lands in an 800x600 viewport
    fn project(camera: &OrbitCamera, point: Vec3) -> Vec2 {
        let projection = camera.projection_matrix(SIZE.x / SIZE.y).unwrap();
        let clip = mat4_transform_vec4(
            &mat4_mul(&projection, &camera.view_matrix()),
            [point.x, point.y, point.z, 1.0],
        );
        let (ndc_x, ndc_y) = (clip[0] / clip[3], clip[1] / clip[3]);
        Vec2::new((ndc_x + 1.0) / 2.0 * SIZE.x, (1.0 - ndc_y) / 2.0 * SIZE.y)
    }

    fn hover(mouse: Vec2) -> ViewportInput {
        ViewportInput { mouse, size: SIZE, hovered: true, ..ViewportInput::default() }
    }

    fn click(mouse: Vec2) -> ViewportInput {
        ViewportInput { left_pressed: true, left_down: true, ..hover(mouse) }
    }

    fn held(mouse: Vec2) -> ViewportInput {
        ViewportInput { left_down: true, ..hover(mouse) }
    }

    fn center() -> Vec2 {
        Vec2::new(SIZE.x / 2.0, SIZE.y / 2.0)
    }

    fn position(scene: &SceneArena, id: ObjectId) -> Vec3 {
        scene.get(id).unwrap().transform.position
    }

    fn assert_vec_eq(a: Vec3, b: Vec3) {
        assert!((a - b).len() < 1e-4, "{:?} != {:?}", a, b);
    }

    /// Scene with `Target` at the origin (selected) and controller already
    /// dragging its X handle from the returned mouse position
    fn dragging_x() -> (ViewportController, OrbitCamera, SceneArena, ObjectId, Vec2) {
        let mut cam = camera();
        let mut scene = SceneArena::new();
        let target = scene.insert(mesh_at("Target", Vec3::ZERO));
        scene.select(Some(target));

        let mut controller = ViewportController::new(GizmoConfig::default(), 1.0);
        let grab = project(&cam, Vec3::new(0.8, 0.0, 0.0));
        let outcome = controller.frame(&click(grab), &mut cam, &mut scene);
        assert_eq!(outcome.drag_started, Some(Axis::X));
        (controller, cam, scene, target, grab)
    }

    #[test]
    fn test_click_center_selects_object_at_origin() {
        let mut cam = camera();
        let mut scene = SceneArena::new();
        let target = scene.insert(mesh_at("Target", Vec3::ZERO));
        let mut controller = ViewportController::new(GizmoConfig::default(), 1.0);

        let outcome = controller.frame(&click(center()), &mut cam, &mut scene);
        assert_eq!(outcome.selection_changed, Some(Some(target)));
        assert_eq!(scene.selected(), Some(target));
    }

    #[test]
    fn test_click_empty_space_deselects() {
        let mut cam = camera();
        let mut scene = SceneArena::new();
        let target = scene.insert(mesh_at("Target", Vec3::ZERO));
        scene.select(Some(target));
        let mut controller = ViewportController::new(GizmoConfig::default(), 1.0);

        let outcome = controller.frame(&click(Vec2::new(20.0, 20.0)), &mut cam, &mut scene);
        assert_eq!(outcome.selection_changed, Some(None));
        assert_eq!(scene.selected(), None);
    }

    #[test]
    fn test_click_on_handle_does_not_pick() {
        let mut cam = camera();
        let mut scene = SceneArena::new();
        let target = scene.insert(mesh_at("Target", Vec3::ZERO));
        // Sits on the ray toward the X handle, nearer the camera
        scene.insert(mesh_at("Blocker", Vec3::new(0.4, 0.0, -5.0)));
        scene.select(Some(target));
        let mut controller = ViewportController::new(GizmoConfig::default(), 1.0);

        let grab = project(&cam, Vec3::new(0.8, 0.0, 0.0));
        let outcome = controller.frame(&click(grab), &mut cam, &mut scene);

        assert_eq!(outcome.drag_started, Some(Axis::X));
        assert_eq!(outcome.selection_changed, None);
        assert_eq!(scene.selected(), Some(target));
    }

    #[test]
    fn test_hover_without_click() {
        let mut cam = camera();
        let mut scene = SceneArena::new();
        let target = scene.insert(mesh_at("Target", Vec3::ZERO));
        scene.select(Some(target));
        let mut controller = ViewportController::new(GizmoConfig::default(), 1.0);

        let over_y = project(&cam, Vec3::new(0.0, 0.8, 0.0));
        controller.frame(&hover(over_y), &mut cam, &mut scene);
        assert_eq!(controller.gizmo.hovered_axis(), Some(Axis::Y));

        controller.frame(&hover(Vec2::new(10.0, 10.0)), &mut cam, &mut scene);
        assert!(!controller.gizmo.is_busy());
    }

    #[test]
    fn test_drag_moves_along_each_axis() {
        let (mut controller, mut cam, mut scene, target, grab) = dragging_x();

        let outcome = controller.frame(&held(grab + Vec2::new(10.0, 0.0)), &mut cam, &mut scene);
        assert_vec_eq(position(&scene, target), Vec3::new(0.5, 0.0, 0.0));
        assert_eq!(outcome.moved.map(|(id, _)| id), Some(target));

        // Vertical motion does nothing on X
        controller.frame(&held(grab + Vec2::new(10.0, 40.0)), &mut cam, &mut scene);
        assert_vec_eq(position(&scene, target), Vec3::new(0.5, 0.0, 0.0));
    }

    #[test]
    fn test_drag_y_inverts_screen_y() {
        let mut cam = camera();
        let mut scene = SceneArena::new();
        let target = scene.insert(mesh_at("Target", Vec3::ZERO));
        scene.select(Some(target));
        let mut controller = ViewportController::new(GizmoConfig::default(), 1.0);

        let grab = project(&cam, Vec3::new(0.0, 0.8, 0.0));
        assert_eq!(controller.frame(&click(grab), &mut cam, &mut scene).drag_started, Some(Axis::Y));
        controller.frame(&held(grab + Vec2::new(0.0, 10.0)), &mut cam, &mut scene);
        assert_vec_eq(position(&scene, target), Vec3::new(0.0, -0.5, 0.0));
    }

    #[test]
    fn test_drag_z_follows_screen_y() {
        // The Z handle points at a level camera, so look from below at an angle
        let mut cam = OrbitCamera::new(
            CameraConfig { distance: 10.0, yaw: 0.0, pitch: 60.0, ..CameraConfig::default() },
            ProjectionConfig::default(),
        );
        let mut scene = SceneArena::new();
        let target = scene.insert(mesh_at("Target", Vec3::ZERO));
        scene.select(Some(target));
        let mut controller = ViewportController::new(GizmoConfig::default(), 1.0);

        let grab = project(&cam, Vec3::new(0.0, 0.0, 0.9));
        assert_eq!(controller.frame(&click(grab), &mut cam, &mut scene).drag_started, Some(Axis::Z));
        controller.frame(&held(grab + Vec2::new(0.0, 10.0)), &mut cam, &mut scene);
        assert_vec_eq(position(&scene, target), Vec3::new(0.0, 0.0, 0.5));
    }

    #[test]
    fn test_release_ends_drag() {
        let (mut controller, mut cam, mut scene, target, grab) = dragging_x();
        controller.frame(&held(grab + Vec2::new(10.0, 0.0)), &mut cam, &mut scene);

        let outcome = controller.frame(&hover(grab + Vec2::new(30.0, 0.0)), &mut cam, &mut scene);
        assert_eq!(outcome.drag_ended, Some(Axis::X));
        assert!(!controller.gizmo.is_dragging());
        // Release frame does not move the object
        assert_vec_eq(position(&scene, target), Vec3::new(0.5, 0.0, 0.0));
    }

    #[test]
    fn test_escape_restores_start() {
        let (mut controller, mut cam, mut scene, target, grab) = dragging_x();
        controller.frame(&held(grab + Vec2::new(40.0, 0.0)), &mut cam, &mut scene);
        assert_vec_eq(position(&scene, target), Vec3::new(2.0, 0.0, 0.0));

        let input = ViewportInput { cancel_pressed: true, ..held(grab + Vec2::new(40.0, 0.0)) };
        let outcome = controller.frame(&input, &mut cam, &mut scene);
        assert!(outcome.drag_cancelled);
        assert_eq!(outcome.moved, Some((target, Vec3::ZERO)));
        assert_vec_eq(position(&scene, target), Vec3::ZERO);
        assert!(!controller.gizmo.is_dragging());
    }

    #[test]
    fn test_camera_locked_while_dragging() {
        let (mut controller, mut cam, mut scene, _, grab) = dragging_x();
        let yaw = cam.yaw;

        let input = ViewportInput {
            right_down: true,
            mouse_delta: Vec2::new(50.0, 0.0),
            ..held(grab)
        };
        controller.frame(&input, &mut cam, &mut scene);
        assert_eq!(cam.yaw, yaw);
    }

    #[test]
    fn test_navigation() {
        let mut cam = camera();
        let mut scene = SceneArena::new();
        let mut controller = ViewportController::new(GizmoConfig::default(), 1.0);

        let orbit = ViewportInput { right_down: true, mouse_delta: Vec2::new(40.0, 0.0), ..hover(center()) };
        controller.frame(&orbit, &mut cam, &mut scene);
        assert!((cam.yaw - 10.0).abs() < 1e-5);

        let zoom = ViewportInput { scroll: 2.0, ..hover(center()) };
        controller.frame(&zoom, &mut cam, &mut scene);
        assert!((cam.distance - 9.0).abs() < 1e-5);

        // Not over the viewport: ignored
        let outside = ViewportInput { hovered: false, ..zoom };
        controller.frame(&outside, &mut cam, &mut scene);
        assert!((cam.distance - 9.0).abs() < 1e-5);
    }

    #[test]
    fn test_external_selection_change_resets_gizmo() {
        let mut cam = camera();
        let mut scene = SceneArena::new();
        let a = scene.insert(mesh_at("A", Vec3::ZERO));
        let b = scene.insert(mesh_at("B", Vec3::new(5.0, 0.0, 0.0)));
        scene.select(Some(a));
        let mut controller = ViewportController::new(GizmoConfig::default(), 1.0);

        let grab = project(&cam, Vec3::new(0.8, 0.0, 0.0));
        controller.frame(&click(grab), &mut cam, &mut scene);
        assert!(controller.gizmo.is_dragging());

        scene.select(Some(b));
        controller.frame(&held(grab + Vec2::new(20.0, 0.0)), &mut cam, &mut scene);
        assert!(!controller.gizmo.is_dragging());
        assert_vec_eq(position(&scene, a), Vec3::ZERO);
        assert_vec_eq(position(&scene, b), Vec3::new(5.0, 0.0, 0.0));
    }

    #[test]
    fn test_removed_selection_mid_drag() {
        let (mut controller, mut cam, mut scene, target, grab) = dragging_x();
        scene.remove(target);

        let outcome = controller.frame(&held(grab + Vec2::new(10.0, 0.0)), &mut cam, &mut scene);
        assert_eq!(outcome.moved, None);
        assert!(!controller.gizmo.is_dragging());
    }

    #[test]
    fn test_zero_size_viewport_is_inert() {
        let mut cam = camera();
        let mut scene = SceneArena::new();
        let target = scene.insert(mesh_at("Target", Vec3::ZERO));
        let mut controller = ViewportController::new(GizmoConfig::default(), 1.0);

        let input = ViewportInput { size: Vec2::ZERO, ..click(Vec2::ZERO) };
        let outcome = controller.frame(&input, &mut cam, &mut scene);
        assert_eq!(outcome, FrameOutcome::default());
        assert_eq!(scene.selected(), None);
        assert!(controller.mouse_ray(&input, &cam).is_none());

        scene.select(Some(target));
        let outcome = controller.frame(&input, &mut cam, &mut scene);
        assert_eq!(outcome, FrameOutcome::default());
    }

    #[test]
    fn test_release_during_zero_size_frame_ends_drag() {
        let (mut controller, mut cam, mut scene, target, grab) = dragging_x();

        // Held through a layout transient: the drag survives
        let collapsed = ViewportInput { size: Vec2::ZERO, ..held(grab) };
        controller.frame(&collapsed, &mut cam, &mut scene);
        assert!(controller.gizmo.is_dragging());

        let released = ViewportInput { size: Vec2::ZERO, ..hover(grab + Vec2::new(10.0, 0.0)) };
        let outcome = controller.frame(&released, &mut cam, &mut scene);
        assert_eq!(outcome.drag_ended, Some(Axis::X));
        assert!(!controller.gizmo.is_dragging());

        // A later click far away must not move the object
        let outcome = controller.frame(&click(Vec2::new(700.0, 300.0)), &mut cam, &mut scene);
        assert_eq!(outcome.moved, None);
        assert_vec_eq(position(&scene, target), Vec3::ZERO);
    }
}
