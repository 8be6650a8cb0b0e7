//! Rampage Editor: scene editor viewport
//!
//! Click an object to select it, drag the gizmo handles to move it along an
//! axis. Right mouse orbits, middle mouse pans, wheel zooms.

/// Version from Cargo.toml
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

mod camera;
mod config;
mod error;
mod gizmo;
mod logging;
mod math;
mod picking;
mod scene;
mod viewport;

use macroquad::prelude::{
    clear_background, is_key_down, is_key_pressed, is_mouse_button_down, is_mouse_button_pressed,
    mouse_position, mouse_wheel, next_frame, screen_height, screen_width, Color, Conf, KeyCode,
    MouseButton,
};
use tracing::{info, warn};

use camera::OrbitCamera;
use config::EditorConfig;
use gizmo::GizmoMode;
use math::Vec2;
use scene::{default_scene, load_scene, save_scene, SceneArena};
use viewport::{FrameOutcome, ViewportController, ViewportInput};

fn window_conf() -> Conf {
    Conf {
        window_title: format!("Rampage Editor v{}", VERSION),
        window_width: 1280,
        window_height: 720,
        window_resizable: true,
        high_dpi: true,
        ..Default::default()
    }
}

/// Everything the frame loop mutates
struct EditorState {
    config: EditorConfig,
    camera: OrbitCamera,
    scene: SceneArena,
    controller: ViewportController,
    status: String,
    /// None until the first frame has seen the cursor
    last_mouse: Option<Vec2>,
}

impl EditorState {
    fn new(config: EditorConfig) -> Self {
        let scene = initial_scene(&config);
        let status = format!("{} objects", scene.len());
        Self {
            camera: OrbitCamera::new(config.camera, config.projection),
            controller: ViewportController::from_config(&config),
            scene,
            config,
            status,
            last_mouse: None,
        }
    }
}

fn initial_scene(config: &EditorConfig) -> SceneArena {
    let path = &config.scene_path;
    if !path.exists() {
        info!(path = %path.display(), "no scene file, starting from the default scene");
        return default_scene();
    }
    match load_scene(path) {
        Ok(scene) => scene,
        Err(e) => {
            warn!(path = %path.display(), error = %e, "failed to load scene, using the default scene");
            default_scene()
        }
    }
}

/// Movement since the previous frame. Zero on the first frame, when there is
/// no previous position to measure from.
fn mouse_delta(mouse: Vec2, last_mouse: &mut Option<Vec2>) -> Vec2 {
    let delta = last_mouse.map_or(Vec2::ZERO, |last| mouse - last);
    *last_mouse = Some(mouse);
    delta
}

/// Inside the window and not over the hierarchy panel
fn viewport_hovered(scene: &SceneArena, mouse: Vec2, size: Vec2) -> bool {
    let in_window = mouse.x >= 0.0 && mouse.y >= 0.0 && mouse.x < size.x && mouse.y < size.y;
    in_window && !viewport::draw::over_hierarchy(scene, mouse)
}

/// Snapshot of this frame's mouse and keyboard state for the viewport
fn gather_input(last_mouse: &mut Option<Vec2>, scene: &SceneArena) -> ViewportInput {
    let mouse = Vec2::from(mouse_position());
    let mouse_delta = mouse_delta(mouse, last_mouse);

    let size = Vec2::new(screen_width(), screen_height());
    let hovered = viewport_hovered(scene, mouse, size);

    // Wheel units differ per platform, only the direction is used
    let wheel = mouse_wheel().1;
    let scroll = if wheel == 0.0 { 0.0 } else { wheel.signum() };

    ViewportInput {
        mouse,
        mouse_delta,
        size,
        hovered,
        left_pressed: is_mouse_button_pressed(MouseButton::Left),
        left_down: is_mouse_button_down(MouseButton::Left),
        right_down: is_mouse_button_down(MouseButton::Right),
        middle_down: is_mouse_button_down(MouseButton::Middle),
        scroll,
        cancel_pressed: is_key_pressed(KeyCode::Escape),
    }
}

fn handle_shortcuts(state: &mut EditorState) {
    let ctrl = is_key_down(KeyCode::LeftControl)
        || is_key_down(KeyCode::RightControl)
        || is_key_down(KeyCode::LeftSuper)
        || is_key_down(KeyCode::RightSuper);

    if ctrl {
        if is_key_pressed(KeyCode::S) {
            handle_save(state);
        } else if is_key_pressed(KeyCode::O) {
            handle_reload(state);
        }
        return;
    }

    let gizmo = &mut state.controller.gizmo;
    for (key, mode) in [
        (KeyCode::W, GizmoMode::Translate),
        (KeyCode::E, GizmoMode::Rotate),
        (KeyCode::R, GizmoMode::Scale),
    ] {
        if is_key_pressed(key) {
            gizmo.set_mode(mode);
            state.status = format!("{} mode", mode.label());
        }
    }

    if is_key_pressed(KeyCode::G) {
        let visible = !gizmo.visible();
        gizmo.set_visible(visible);
        state.status = if visible { "Gizmo shown" } else { "Gizmo hidden" }.to_string();
    }

    if is_key_pressed(KeyCode::F) {
        if let Some(object) = state.scene.selected_object() {
            state.camera.focus_on(object.transform.position);
            state.status = format!("Focused {}", object.name);
        }
    }

    if is_key_pressed(KeyCode::Tab) {
        if let Some(object) = state.scene.select_next().and_then(|id| state.scene.get(id)) {
            state.status = format!("Selected {}", object.name);
        }
    }

    if is_key_pressed(KeyCode::Delete) {
        if let Some(object) = state.scene.selected().and_then(|id| state.scene.remove(id)) {
            info!(name = %object.name, "object deleted");
            state.status = format!("Deleted {}", object.name);
        }
    }
}

fn handle_save(state: &mut EditorState) {
    let path = &state.config.scene_path;
    state.status = match save_scene(&state.scene, path, state.config.compress_scenes) {
        Ok(()) => format!("Saved {}", path.display()),
        Err(e) => {
            warn!(path = %path.display(), error = %e, "scene save failed");
            format!("Save failed: {}", e)
        }
    };
}

fn handle_reload(state: &mut EditorState) {
    let path = &state.config.scene_path;
    state.status = match load_scene(path) {
        Ok(mut scene) => {
            // Ids do not survive a reload, keep the selection by name
            let selected_name = state.scene.selected_object().map(|o| o.name.as_str());
            if let Some(id) = selected_name.and_then(|name| scene.find_by_name(name)) {
                scene.select(Some(id));
            }
            state.scene = scene;
            format!("Reloaded {} ({} objects)", path.display(), state.scene.len())
        }
        Err(e) => {
            warn!(path = %path.display(), error = %e, "scene reload failed");
            format!("Reload failed: {}", e)
        }
    };
}

fn report_outcome(state: &mut EditorState, outcome: &FrameOutcome) {
    if let Some(selection) = outcome.selection_changed {
        state.status = match selection.and_then(|id| state.scene.get(id)) {
            Some(object) => format!("Selected {}", object.name),
            None => "Selection cleared".to_string(),
        };
    }
    if outcome.drag_cancelled {
        state.status = "Move cancelled".to_string();
    } else if let Some((id, position)) = outcome.moved {
        if let Some(object) = state.scene.get(id) {
            state.status = format!(
                "Moving {} to ({:.2}, {:.2}, {:.2})",
                object.name, position.x, position.y, position.z
            );
        }
    }
}

#[macroquad::main(window_conf)]
async fn main() {
    logging::init_logging();
    info!(version = VERSION, "Rampage Editor starting");

    let config = EditorConfig::load_or_create(&EditorConfig::default_path());
    let mut state = EditorState::new(config);

    loop {
        let input = gather_input(&mut state.last_mouse, &state.scene);
        handle_shortcuts(&mut state);

        let outcome = state.controller.frame(&input, &mut state.camera, &mut state.scene);
        report_outcome(&mut state, &outcome);

        clear_background(Color::new(0.12, 0.12, 0.14, 1.0));
        viewport::draw::draw_scene(
            &state.scene,
            &state.camera,
            &state.controller.gizmo,
            state.controller.pick_radius,
        );
        viewport::draw::draw_overlay(&state.scene, &state.controller.gizmo, &state.status);

        next_frame().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_frame_has_no_mouse_delta() {
        let mut last = None;
        assert_eq!(mouse_delta(Vec2::new(640.0, 360.0), &mut last), Vec2::ZERO);
        assert_eq!(mouse_delta(Vec2::new(650.0, 355.0), &mut last), Vec2::new(10.0, -5.0));
        assert_eq!(last, Some(Vec2::new(650.0, 355.0)));
    }

    #[test]
    fn test_hierarchy_panel_is_not_viewport() {
        let scene = default_scene();
        let size = Vec2::new(1280.0, 720.0);
        assert!(!viewport_hovered(&scene, Vec2::new(20.0, 30.0), size));
        assert!(viewport_hovered(&scene, Vec2::new(640.0, 360.0), size));
        assert!(!viewport_hovered(&scene, Vec2::new(1300.0, 360.0), size));
    }
}
