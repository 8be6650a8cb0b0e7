//! Viewport rendering with macroquad
//!
//! Editor math types are converted to macroquad's glam vectors at the
//! boundary. The 3D camera uses the same right-handed GL perspective as
//! picking, so what is drawn under the cursor is what gets picked.

use macroquad::math::{vec3, Vec3 as GlVec3};
use macroquad::prelude::{
    draw_cube, draw_grid, draw_line_3d, draw_rectangle, draw_sphere_wires,
    draw_text, screen_height, set_camera, set_default_camera, Camera3D, Color, BLACK, BLUE,
    DARKGRAY, GRAY, GREEN, LIGHTGRAY, ORANGE, RED, WHITE, YELLOW,
};

use crate::camera::OrbitCamera;
use crate::gizmo::{Axis, GizmoController};
use crate::math::{mat4_transform_point, Vec2, Vec3};
use crate::scene::{SceneArena, SceneObject};

const FONT_SIZE: f32 = 18.0;
const LINE_HEIGHT: f32 = 20.0;
const MARKER_SIZE: f32 = 0.3;
const HANDLE_TIP: f32 = 0.12;
const PANEL_ORIGIN: f32 = 4.0;
const PANEL_WIDTH: f32 = 240.0;

fn gl(v: Vec3) -> GlVec3 {
    vec3(v.x, v.y, v.z)
}

/// macroquad camera matching `OrbitCamera`
pub fn scene_camera(camera: &OrbitCamera) -> Camera3D {
    Camera3D {
        position: gl(camera.position()),
        target: gl(camera.focus),
        up: vec3(0.0, 1.0, 0.0),
        fovy: camera.projection.fov_y.to_radians(),
        ..Default::default()
    }
}

fn axis_base_color(axis: Axis) -> Color {
    match axis {
        Axis::X => RED,
        Axis::Y => GREEN,
        Axis::Z => BLUE,
    }
}

/// Dimmed at rest, full strength on hover, yellow while dragged
fn axis_color(base: Color, is_hovered: bool, is_dragging: bool) -> Color {
    if is_dragging {
        YELLOW
    } else if is_hovered {
        Color::new(base.r, base.g, base.b, 1.0)
    } else {
        Color::new(base.r * 0.78, base.g * 0.78, base.b * 0.78, 0.78)
    }
}

fn material_color(object: &SceneObject) -> Color {
    match object.material.as_ref().map(|m| m.name()) {
        Some("checker") => LIGHTGRAY,
        Some("wood") => Color::new(0.55, 0.38, 0.22, 1.0),
        Some("stone") => GRAY,
        _ => Color::new(0.75, 0.72, 0.65, 1.0),
    }
}

/// Unit cube edges through the object's model matrix, so rotation shows
fn draw_box_edges(object: &SceneObject, color: Color) {
    let model = object.transform.model_matrix();
    let corner = |i: usize| {
        let local = Vec3::new(
            if i & 1 == 0 { -0.5 } else { 0.5 },
            if i & 2 == 0 { -0.5 } else { 0.5 },
            if i & 4 == 0 { -0.5 } else { 0.5 },
        );
        gl(mat4_transform_point(&model, local))
    };
    // Corners differing in exactly one bit share an edge
    for i in 0..8 {
        for bit in [1, 2, 4] {
            if i & bit == 0 {
                draw_line_3d(corner(i), corner(i | bit), color);
            }
        }
    }
}

/// Objects without a mesh are drawn as a small axis cross
fn draw_marker(position: Vec3, color: Color) {
    for axis in Axis::ALL {
        let half = axis.unit_vector() * MARKER_SIZE;
        draw_line_3d(gl(position - half), gl(position + half), color);
    }
}

/// Grid, objects, selection sphere and gizmo. Leaves the default camera set.
pub fn draw_scene(scene: &SceneArena, camera: &OrbitCamera, gizmo: &GizmoController, pick_radius: f32) {
    set_camera(&scene_camera(camera));

    draw_grid(20, 1.0, DARKGRAY, GRAY);

    let selected = scene.selected();
    for (id, object) in scene.iter() {
        let is_selected = selected == Some(id);
        let position = object.transform.position;

        if object.has_mesh() {
            let t = &object.transform;
            if t.rotation == Vec3::ZERO {
                draw_cube(gl(position), gl(t.scale), None, material_color(object));
            }
            draw_box_edges(object, if is_selected { ORANGE } else { BLACK });
        } else {
            draw_marker(position, if is_selected { ORANGE } else { WHITE });
        }
    }

    if let Some(object) = scene.selected_object() {
        let center = object.transform.position;
        draw_sphere_wires(gl(center), pick_radius, None, Color::new(1.0, 0.65, 0.0, 0.25));
        if gizmo.visible() {
            draw_gizmo(gizmo, center);
        }
    }

    set_default_camera();
}

fn draw_gizmo(gizmo: &GizmoController, center: Vec3) {
    for axis in Axis::ALL {
        let (start, end) = gizmo.axis_segment(center, axis);
        let color = axis_color(
            axis_base_color(axis),
            gizmo.hovered_axis() == Some(axis),
            gizmo.dragged_axis() == Some(axis),
        );
        draw_line_3d(gl(start), gl(end), color);
        draw_cube(gl(end), vec3(HANDLE_TIP, HANDLE_TIP, HANDLE_TIP), None, color);
    }
}

/// Hierarchy panel rect as (x, y, w, h). Grows with the object count.
pub fn hierarchy_panel(scene: &SceneArena) -> (f32, f32, f32, f32) {
    let rows = scene.len().max(1) as f32 + 1.0;
    (PANEL_ORIGIN, PANEL_ORIGIN, PANEL_WIDTH, rows * LINE_HEIGHT + 8.0)
}

/// True when the mouse is over the hierarchy panel, which owns its clicks
pub fn over_hierarchy(scene: &SceneArena, mouse: Vec2) -> bool {
    let (x, y, w, h) = hierarchy_panel(scene);
    mouse.x >= x && mouse.x < x + w && mouse.y >= y && mouse.y < y + h
}

/// Hierarchy, inspector and status text over the viewport
pub fn draw_overlay(scene: &SceneArena, gizmo: &GizmoController, status: &str) {
    let selected = scene.selected();
    let (px, py, pw, ph) = hierarchy_panel(scene);
    draw_rectangle(px, py, pw, ph, Color::new(0.0, 0.0, 0.0, 0.5));

    let mut y = py + LINE_HEIGHT;
    draw_text("Hierarchy", 10.0, y, FONT_SIZE, YELLOW);
    if scene.is_empty() {
        draw_text("  (empty scene)", 10.0, y + LINE_HEIGHT, FONT_SIZE, LIGHTGRAY);
    }
    for (id, object) in scene.iter() {
        y += LINE_HEIGHT;
        let marker = if selected == Some(id) { ">" } else { " " };
        let color = if object.has_mesh() { WHITE } else { LIGHTGRAY };
        let row = format!("{} {:>2} {}", marker, id.index(), object.name);
        draw_text(&row, 10.0, y, FONT_SIZE, color);
    }

    let bottom = screen_height();
    if let Some(object) = scene.selected_object() {
        let t = &object.transform;
        let inspector = format!(
            "{}  pos ({:.2}, {:.2}, {:.2})  rot ({:.1}, {:.1}, {:.1})  scale ({:.2}, {:.2}, {:.2})",
            object.name,
            t.position.x, t.position.y, t.position.z,
            t.rotation.x, t.rotation.y, t.rotation.z,
            t.scale.x, t.scale.y, t.scale.z,
        );
        draw_text(&inspector, 10.0, bottom - 2.0 * LINE_HEIGHT, FONT_SIZE, WHITE);
    }

    let gizmo_label = if gizmo.visible() { gizmo.mode().label() } else { "Hidden" };
    let line = format!("[{}] {}", gizmo_label, status);
    draw_text(&line, 10.0, bottom - 0.5 * LINE_HEIGHT, FONT_SIZE, LIGHTGRAY);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_axis_color_states() {
        let dragged = axis_color(RED, false, true);
        assert_eq!((dragged.r, dragged.g, dragged.b), (YELLOW.r, YELLOW.g, YELLOW.b));
        let hovered = axis_color(GREEN, true, false);
        assert_eq!((hovered.g, hovered.a), (GREEN.g, 1.0));
        assert!(axis_color(GREEN, false, false).a < 1.0);
    }

    #[test]
    fn test_scene_camera_matches_orbit() {
        let orbit = OrbitCamera::default();
        let cam = scene_camera(&orbit);
        let eye = orbit.position();
        assert!((cam.position - vec3(eye.x, eye.y, eye.z)).length() < 1e-5);
        assert!((cam.fovy - 45f32.to_radians()).abs() < 1e-6);
    }

    #[test]
    fn test_hierarchy_panel_covers_rows() {
        let mut scene = SceneArena::new();
        let (_, _, _, empty_height) = hierarchy_panel(&scene);
        assert!(over_hierarchy(&scene, Vec2::new(100.0, 30.0)));
        assert!(!over_hierarchy(&scene, Vec2::new(100.0, empty_height + 10.0)));
        assert!(!over_hierarchy(&scene, Vec2::new(400.0, 30.0)));

        for name in ["a", "b", "c"] {
            scene.insert(SceneObject::new(name));
        }
        // Third row sits below the empty panel and is now covered
        let third_row = PANEL_ORIGIN + 3.5 * LINE_HEIGHT;
        assert!(third_row > empty_height);
        assert!(over_hierarchy(&scene, Vec2::new(100.0, third_row)));
    }
}
