use crate::data::types::SceneUniformStd140 as SceneUniform;
use glam::{Mat4, Vec3};
use winit::event::{ElementState, MouseButton, MouseScrollDelta, WindowEvent};

/// Direction of the key light, pointing from the scene toward the light.
/// Normalized at use; the raw value mirrors a light placed high and to the side.
const TOP_LIGHT_DIR: Vec3 = Vec3::new(500.0, 500.0, 500.0);
const TOP_LIGHT_COLOR: [f32; 3] = [1.0, 1.0, 1.0];
/// Dim grey ambient term; per-model intensity comes from the preset.
const AMBIENT_COLOR: [f32; 3] = [0.2, 0.2, 0.2];

#[derive(Debug, Clone)]
pub struct OrbitCamera {
    // --- Orbital Parameters (Primary State) ---
    /// The world-space point the camera orbits around.
    pub target: Vec3,
    /// Distance from the camera to the target.
    pub radius: f32,
    /// Azimuth angle around the world Y axis (radians). Zero looks down -Z
    /// from the +Z side of the target.
    pub azimuth_rad: f32,
    /// Elevation angle above the target's horizontal plane (radians).
    pub elevation_rad: f32,

    // --- Projection Parameters ---
    /// Vertical field of view (radians).
    pub fov_y_rad: f32,
    pub aspect: f32,
    pub near: f32,
    pub far: f32,
}

impl OrbitCamera {
    /// Creates a camera on the +Z axis at `radius` from `target`.
    pub fn new(target: Vec3, radius: f32, fov_y_deg: f32, aspect: f32) -> Self {
        Self {
            target,
            radius,
            azimuth_rad: 0.0,
            elevation_rad: 0.0,
            fov_y_rad: fov_y_deg.to_radians(),
            aspect,
            near: 0.1,
            far: 1000.0,
        }
    }

    /// Updates the projection aspect ratio after a window resize.
    pub fn set_aspect(&mut self, aspect: f32) {
        self.aspect = aspect;
    }

    /// Camera position derived from the orbital parameters.
    pub fn position(&self) -> Vec3 {
        let (sin_az, cos_az) = self.azimuth_rad.sin_cos();
        let (sin_el, cos_el) = self.elevation_rad.sin_cos();
        self.target + self.radius * Vec3::new(cos_el * sin_az, sin_el, cos_el * cos_az)
    }

    pub fn view(&self) -> Mat4 {
        Mat4::look_at_rh(self.position(), self.target, Vec3::Y)
    }

    /// wgpu clip space: x,y in [-1, 1], depth in [0, 1].
    pub fn proj(&self) -> Mat4 {
        Mat4::perspective_rh(self.fov_y_rad, self.aspect, self.near, self.far)
    }

    /// Combined view-projection matrix for the current frame.
    pub fn view_proj(&self) -> Mat4 {
        self.proj() * self.view()
    }

    /// Builds the per-frame scene uniform from the current camera state.
    pub fn make_scene_uniform(&self, ambient_intensity: f32) -> SceneUniform {
        SceneUniform {
            view_proj: self.view_proj().to_cols_array_2d(),
            light_dir: TOP_LIGHT_DIR.normalize().to_array(),
            _pad0: 0.0,
            light_color: TOP_LIGHT_COLOR,
            _pad1: 0.0,
            ambient_color: AMBIENT_COLOR,
            ambient_intensity,
        }
    }
}

/// Zoom distance clamp for the orbit controls, per model preset.
#[derive(Debug, Clone, Copy)]
pub struct OrbitLimits {
    pub min_distance: f32,
    pub max_distance: f32,
}

pub struct CameraController {
    /// `None` disables the controls entirely; the camera then stays where the
    /// preset put it.
    limits: Option<OrbitLimits>,
    mouse_down: bool,
    last_mouse: Option<(f64, f64)>,
}

impl CameraController {
    pub fn new(limits: Option<OrbitLimits>) -> Self {
        Self {
            limits,
            mouse_down: false,
            last_mouse: None,
        }
    }

    /// Handles window events and updates the camera.
    pub fn handle_event(&mut self, event: &WindowEvent, camera: &mut OrbitCamera) {
        if self.limits.is_none() {
            return;
        }

        match event {
            WindowEvent::MouseInput { button, state, .. } => {
                if *button == MouseButton::Left {
                    self.mouse_down = *state == ElementState::Pressed;
                }
            }
            WindowEvent::CursorMoved { position, .. } => {
                self.handle_cursor_orbit((position.x, position.y), camera);
            }
            WindowEvent::MouseWheel { delta, .. } => {
                let scroll = match delta {
                    MouseScrollDelta::LineDelta(_, y) => *y,
                    MouseScrollDelta::PixelDelta(pos) => pos.y as f32 / 120.0,
                };

                self.handle_scroll(scroll, camera);
            }
            _ => {}
        }
    }

    /// Adjusts the orbit radius based on scroll input, clamped to the preset
    /// zoom range. Positive delta = scroll up = zoom in = decrease radius.
    fn handle_scroll(&mut self, delta: f32, camera: &mut OrbitCamera) {
        let Some(limits) = self.limits else { return };

        let zoom = 1.1_f32.powf(-delta);
        camera.radius = (camera.radius * zoom).clamp(limits.min_distance, limits.max_distance);
    }

    /// Rotates the camera around the target while the left mouse button is held.
    fn handle_cursor_orbit(&mut self, xy: (f64, f64), camera: &mut OrbitCamera) {
        if let Some(last) = self.last_mouse {
            if self.mouse_down {
                let dx = ((xy.0 - last.0) * 0.005) as f32;
                let dy = ((last.1 - xy.1) * 0.005) as f32;

                camera.azimuth_rad -= dx;
                camera.elevation_rad += dy;

                // Clamp elevation short of the poles to keep the up vector valid.
                camera.elevation_rad = camera
                    .elevation_rad
                    .clamp(-89.0f32.to_radians(), 89.0f32.to_radians());
            }
        }
        self.last_mouse = Some(xy);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f32 = 1e-5;

    #[test]
    fn default_orbit_puts_camera_on_positive_z() {
        let camera = OrbitCamera::new(Vec3::ZERO, 0.7, 100.0, 800.0 / 600.0);
        let pos = camera.position();
        assert!(pos.abs_diff_eq(Vec3::new(0.0, 0.0, 0.7), EPS), "{pos:?}");
    }

    #[test]
    fn orbit_preserves_radius() {
        let mut camera = OrbitCamera::new(Vec3::new(1.0, 2.0, 3.0), 0.7, 100.0, 1.0);
        camera.azimuth_rad = 1.1;
        camera.elevation_rad = -0.4;
        let dist = (camera.position() - camera.target).length();
        assert!((dist - 0.7).abs() < EPS);
    }

    #[test]
    fn target_projects_to_ndc_origin() {
        let camera = OrbitCamera::new(Vec3::ZERO, 0.7, 100.0, 800.0 / 600.0);
        let clip = camera.view_proj() * Vec3::ZERO.extend(1.0);
        let ndc = clip.truncate() / clip.w;
        assert!(ndc.x.abs() < EPS && ndc.y.abs() < EPS);
    }

    #[test]
    fn scroll_zoom_respects_preset_clamp() {
        let mut camera = OrbitCamera::new(Vec3::ZERO, 0.7, 100.0, 1.0);
        let mut controller = CameraController::new(Some(OrbitLimits {
            min_distance: 0.5,
            max_distance: 1.0,
        }));

        controller.handle_scroll(-100.0, &mut camera);
        assert_eq!(camera.radius, 1.0);

        controller.handle_scroll(100.0, &mut camera);
        assert_eq!(camera.radius, 0.5);
    }

    #[test]
    fn disabled_controller_leaves_camera_alone() {
        let mut camera = OrbitCamera::new(Vec3::ZERO, 500.0, 100.0, 1.0);
        let mut controller = CameraController::new(None);

        controller.handle_scroll(10.0, &mut camera);
        assert_eq!(camera.radius, 500.0);
    }

    #[test]
    fn drag_orbit_clamps_elevation() {
        let mut camera = OrbitCamera::new(Vec3::ZERO, 0.7, 100.0, 1.0);
        let mut controller = CameraController::new(Some(OrbitLimits {
            min_distance: 0.5,
            max_distance: 1.0,
        }));

        controller.mouse_down = true;
        controller.last_mouse = Some((0.0, 0.0));
        controller.handle_cursor_orbit((0.0, -10_000.0), &mut camera);

        assert!(camera.elevation_rad <= 89.0f32.to_radians() + EPS);
    }
}
