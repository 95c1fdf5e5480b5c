//! 3D stage drawing and orbit-style camera controls for the scene view.
//!
//! This module hosts every use of macroquad's 3D camera and model calls so
//! the rest of the adapter can stay two-dimensional. The stage itself is
//! static; only the camera moves, driven by mouse drags.

use glam::Vec3;
use laser_arena_rendering::{CameraRig, SceneStage, SurfaceRegion};
use macroquad::{
    camera::{set_camera, Camera3D, Projection},
    color::{Color as MacroquadColor, BLUE, GREEN, RED},
    input::{is_mouse_button_down, mouse_position, MouseButton},
    math::{vec2, vec3, Vec3 as MacroquadVec3},
    models::{draw_line_3d, draw_plane},
    texture::Texture2D,
};

const ORBIT_SENSITIVITY: f32 = 0.008;
const MIN_PITCH: f32 = 0.1;
const MAX_PITCH: f32 = 1.45;

/// Interactive orbit around the stage origin, seeded from the camera rig.
#[derive(Clone, Copy, Debug)]
pub(crate) struct OrbitControls {
    target: Vec3,
    distance: f32,
    yaw: f32,
    pitch: f32,
    last_cursor: Option<(f32, f32)>,
}

impl OrbitControls {
    /// Seeds the orbit so its initial position matches the rig exactly.
    pub(crate) fn for_camera(rig: &CameraRig) -> Self {
        let offset = rig.position() - rig.target();
        let distance = offset.length().max(f32::EPSILON);

        Self {
            target: rig.target(),
            distance,
            yaw: offset.z.atan2(offset.x),
            pitch: (offset.y / distance).clamp(-1.0, 1.0).asin(),
            last_cursor: None,
        }
    }

    /// Polls mouse input and applies any drag to the orbit angles.
    pub(crate) fn update(&mut self) {
        let cursor = mouse_position();
        if is_mouse_button_down(MouseButton::Left) {
            if let Some((last_x, last_y)) = self.last_cursor {
                self.apply_drag(cursor.0 - last_x, cursor.1 - last_y);
            }
            self.last_cursor = Some(cursor);
        } else {
            self.last_cursor = None;
        }
    }

    fn apply_drag(&mut self, delta_x: f32, delta_y: f32) {
        self.yaw -= delta_x * ORBIT_SENSITIVITY;
        self.pitch = (self.pitch + delta_y * ORBIT_SENSITIVITY).clamp(MIN_PITCH, MAX_PITCH);
    }

    /// Camera position derived from the current orbit angles.
    pub(crate) fn camera_position(&self) -> Vec3 {
        self.target
            + self.distance
                * Vec3::new(
                    self.pitch.cos() * self.yaw.cos(),
                    self.pitch.sin(),
                    self.pitch.cos() * self.yaw.sin(),
                )
    }
}

/// Draws the static stage into its viewport region.
pub(crate) fn draw_scene_stage(
    stage: &SceneStage,
    orbit: &OrbitControls,
    region: SurfaceRegion,
    screen_height: f32,
) {
    // macroquad viewports are anchored at the bottom-left corner
    let viewport_y = (screen_height - region.y() - region.height()) as i32;

    let camera = Camera3D {
        position: to_macroquad_vec3(orbit.camera_position()),
        target: to_macroquad_vec3(stage.camera().target()),
        up: vec3(0.0, 1.0, 0.0),
        fovy: stage.camera().half_height(),
        aspect: Some(region.width() / region.height().max(1.0)),
        projection: Projection::Orthographics,
        viewport: Some((
            region.x() as i32,
            viewport_y,
            region.width() as i32,
            region.height() as i32,
        )),
        ..Default::default()
    };
    set_camera(&camera);

    let half = stage.ground().extent() / 2.0;
    let texture: Option<Texture2D> = None;
    draw_plane(
        vec3(0.0, 0.0, 0.0),
        vec2(half, half),
        texture,
        lit_ground_color(stage),
    );

    let length = stage.axis_helper().length();
    draw_line_3d(vec3(0.0, 0.0, 0.0), vec3(length, 0.0, 0.0), RED);
    draw_line_3d(vec3(0.0, 0.0, 0.0), vec3(0.0, length, 0.0), GREEN);
    draw_line_3d(vec3(0.0, 0.0, 0.0), vec3(0.0, 0.0, length), BLUE);
}

// Flat approximation of the stage lights: the ambient term scales the plane
// color and the point light adds a fixed highlight.
fn lit_ground_color(stage: &SceneStage) -> MacroquadColor {
    let ground = stage.ground().color();
    let ambient = stage.ambient();
    let boost = stage.point_light().intensity() * 0.1;
    let scale = (ambient.intensity() + boost).min(1.0);

    MacroquadColor::new(
        (ground.red * ambient.color().red * scale).min(1.0),
        (ground.green * ambient.color().green * scale).min(1.0),
        (ground.blue * ambient.color().blue * scale).min(1.0),
        ground.alpha,
    )
}

fn to_macroquad_vec3(value: Vec3) -> MacroquadVec3 {
    vec3(value.x, value.y, value.z)
}

#[cfg(test)]
mod tests {
    use super::*;
    use laser_arena_rendering::{CAMERA_OFFSET, POINT_LIGHT_INTENSITY};

    #[test]
    fn orbit_seed_reproduces_the_rig_position() {
        let stage = SceneStage::from_viewport(640.0, 480.0);
        let orbit = OrbitControls::for_camera(&stage.camera());

        let position = orbit.camera_position();
        assert!((position - CAMERA_OFFSET).length() < 1e-3);
    }

    #[test]
    fn dragging_keeps_the_orbit_distance_constant() {
        let stage = SceneStage::from_viewport(640.0, 480.0);
        let mut orbit = OrbitControls::for_camera(&stage.camera());
        let distance_before = orbit.camera_position().length();

        orbit.apply_drag(120.0, -45.0);
        let distance_after = orbit.camera_position().length();

        assert!((distance_before - distance_after).abs() < 1e-3);
    }

    #[test]
    fn pitch_is_clamped_to_keep_the_camera_above_the_ground() {
        let stage = SceneStage::from_viewport(640.0, 480.0);
        let mut orbit = OrbitControls::for_camera(&stage.camera());

        orbit.apply_drag(0.0, -10_000.0);
        assert!(orbit.camera_position().y > 0.0);

        orbit.apply_drag(0.0, 10_000.0);
        assert!(orbit.camera_position().y > 0.0);
    }

    #[test]
    fn ground_lighting_saturates_at_full_intensity() {
        let stage = SceneStage::from_viewport(640.0, 480.0);
        let color = lit_ground_color(&stage);

        // ambient is already at full intensity, so the highlight cannot
        // push channels past 1.0
        assert!(POINT_LIGHT_INTENSITY > 0.0);
        assert!(color.r <= 1.0 && color.g <= 1.0 && color.b <= 1.0);
        assert!((color.r - 1.0).abs() < f32::EPSILON);
    }
}
