//! Screen-anchored hotspot labels.
//!
//! A hotspot binds a fixed 3D anchor point on the model to an on-screen
//! interactive label. Anchors never move; only the projected screen position
//! is refreshed, once per rendered frame, so the label tracks the model as
//! the camera orbits.

use crate::camera::OrbitCamera;
use glam::{Mat4, Vec2, Vec3};

/// Physical pixel size of the rendering surface.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
}

impl Viewport {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }
}

/// Projects a world-space point into pixel coordinates.
///
/// The point is taken through the camera's view-projection into normalized
/// device coordinates (x,y in [-1, 1] when in view), then mapped to pixels
/// with the vertical axis inverted: screen Y grows downward, NDC Y upward.
/// Points outside the frustum land outside the viewport; they are not
/// clamped or hidden.
pub fn project_to_screen(point: Vec3, view_proj: &Mat4, viewport: Viewport) -> Vec2 {
    let clip = *view_proj * point.extend(1.0);
    let ndc = clip.truncate() / clip.w;

    let half_w = viewport.width * 0.5;
    let half_h = viewport.height * 0.5;
    Vec2::new(ndc.x * half_w + half_w, -ndc.y * half_h + half_h)
}

#[derive(Debug, Clone)]
pub struct Hotspot {
    /// World-space anchor on the model. Never mutated after creation.
    pub anchor: Vec3,
    pub label: String,
    /// Pixel position of the label, as of the most recent update.
    pub screen_pos: Vec2,
}

impl Hotspot {
    /// Recomputes the label's pixel position from the current camera state.
    /// Mutates only `screen_pos`.
    pub fn update_position(&mut self, view_proj: &Mat4, viewport: Viewport) {
        self.screen_pos = project_to_screen(self.anchor, view_proj, viewport);
    }
}

/// Sink for click notifications; receives the activated hotspot's label.
pub type ClickObserver = Box<dyn FnMut(&str)>;

/// The ordered collection of hotspots plus the click observer.
///
/// Hotspots are created once, after the model finishes loading, and live for
/// the rest of the session; there is no removal.
pub struct HotspotSet {
    hotspots: Vec<Hotspot>,
    on_click: ClickObserver,
}

impl HotspotSet {
    pub fn new(on_click: impl FnMut(&str) + 'static) -> Self {
        Self {
            hotspots: Vec::new(),
            on_click: Box::new(on_click),
        }
    }

    /// Records a new hotspot with its initial screen position already
    /// consistent with the current camera, and returns its index.
    pub fn create(
        &mut self,
        anchor: Vec3,
        label: impl Into<String>,
        camera: &OrbitCamera,
        viewport: Viewport,
    ) -> usize {
        let mut hotspot = Hotspot {
            anchor,
            label: label.into(),
            screen_pos: Vec2::ZERO,
        };
        hotspot.update_position(&camera.view_proj(), viewport);

        self.hotspots.push(hotspot);
        self.hotspots.len() - 1
    }

    /// Refreshes every hotspot from the camera state of the current frame.
    pub fn update_positions(&mut self, camera: &OrbitCamera, viewport: Viewport) {
        let view_proj = camera.view_proj();
        for hotspot in &mut self.hotspots {
            hotspot.update_position(&view_proj, viewport);
        }
    }

    /// Reports a click on the hotspot at `index` to the observer. The
    /// observer decides what to do with it; no hotspot state changes.
    pub fn notify_clicked(&mut self, index: usize) {
        let Some(hotspot) = self.hotspots.get(index) else {
            return;
        };
        (self.on_click)(&hotspot.label);
    }

    pub fn iter(&self) -> impl Iterator<Item = &Hotspot> {
        self.hotspots.iter()
    }

    pub fn len(&self) -> usize {
        self.hotspots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.hotspots.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    const EPS: f32 = 1e-3;

    fn laptop_camera(viewport: Viewport) -> OrbitCamera {
        // Camera on +Z at 0.7, looking at the origin, 100 degree vertical FOV.
        OrbitCamera::new(Vec3::ZERO, 0.7, 100.0, viewport.width / viewport.height)
    }

    /// Independent scalar-math projection for a camera sitting on the +Z axis
    /// at `eye_z`, looking at the origin.
    fn reference_project(point: Vec3, eye_z: f32, fov_y_deg: f32, viewport: Viewport) -> Vec2 {
        let f = 1.0 / (fov_y_deg.to_radians() * 0.5).tan();
        let aspect = viewport.width / viewport.height;
        let view_z = point.z - eye_z;

        let ndc_x = f / aspect * point.x / -view_z;
        let ndc_y = f * point.y / -view_z;

        let half_w = viewport.width * 0.5;
        let half_h = viewport.height * 0.5;
        Vec2::new(ndc_x * half_w + half_w, -ndc_y * half_h + half_h)
    }

    fn recording_set() -> (HotspotSet, Rc<RefCell<Vec<String>>>) {
        let clicks = Rc::new(RefCell::new(Vec::new()));
        let sink = clicks.clone();
        let set = HotspotSet::new(move |label: &str| sink.borrow_mut().push(label.to_string()));
        (set, clicks)
    }

    #[test]
    fn projection_matches_closed_form() {
        let viewport = Viewport::new(800.0, 600.0);
        let camera = laptop_camera(viewport);
        let view_proj = camera.view_proj();

        for point in [
            Vec3::new(0.0, 0.1, -0.25),
            Vec3::new(0.1, -0.05, 0.2),
            Vec3::new(-0.3, 0.0, 0.0),
        ] {
            let got = project_to_screen(point, &view_proj, viewport);
            let want = reference_project(point, 0.7, 100.0, viewport);
            assert!(
                (got - want).length() < EPS,
                "point {point:?}: got {got:?}, want {want:?}"
            );
        }
    }

    #[test]
    fn update_is_idempotent_while_camera_is_still() {
        let viewport = Viewport::new(800.0, 600.0);
        let camera = laptop_camera(viewport);
        let view_proj = camera.view_proj();

        let mut hotspot = Hotspot {
            anchor: Vec3::new(0.0, 0.1, -0.25),
            label: "LED Screen".into(),
            screen_pos: Vec2::ZERO,
        };

        hotspot.update_position(&view_proj, viewport);
        let first = hotspot.screen_pos;
        hotspot.update_position(&view_proj, viewport);

        assert_eq!(first, hotspot.screen_pos);
    }

    #[test]
    fn resize_rescales_pixels_at_fixed_ndc() {
        let before = Viewport::new(800.0, 600.0);
        let after = Viewport::new(1024.0, 768.0);
        let camera = laptop_camera(before);
        let view_proj = camera.view_proj();
        let anchor = Vec3::new(0.1, -0.12, 0.0);

        let pos_before = project_to_screen(anchor, &view_proj, before);
        let pos_after = project_to_screen(anchor, &view_proj, after);

        // Recover NDC from the first projection and re-apply the new half extents.
        let ndc_x = (pos_before.x - before.width * 0.5) / (before.width * 0.5);
        let ndc_y = -(pos_before.y - before.height * 0.5) / (before.height * 0.5);
        let want = Vec2::new(
            ndc_x * after.width * 0.5 + after.width * 0.5,
            -ndc_y * after.height * 0.5 + after.height * 0.5,
        );

        assert!((pos_after - want).length() < EPS);
    }

    #[test]
    fn create_builds_one_entry_per_pair_with_initial_positions() {
        let viewport = Viewport::new(800.0, 600.0);
        let camera = laptop_camera(viewport);
        let (mut set, _clicks) = recording_set();

        let pairs = [
            (Vec3::new(0.0, 0.1, -0.25), "LED Screen"),
            (Vec3::new(0.0, -0.12, 0.0), "Keyboard"),
            (Vec3::new(0.15, 0.0, 0.1), "Trackpad"),
        ];
        for (anchor, label) in pairs {
            set.create(anchor, label, &camera, viewport);
        }

        assert_eq!(set.len(), pairs.len());
        let view_proj = camera.view_proj();
        for (hotspot, (anchor, label)) in set.iter().zip(pairs) {
            assert_eq!(hotspot.label, label);
            assert_eq!(hotspot.anchor, anchor);
            let want = project_to_screen(anchor, &view_proj, viewport);
            assert_eq!(hotspot.screen_pos, want);
        }
    }

    #[test]
    fn click_notifies_exactly_once_and_leaves_others_untouched() {
        let viewport = Viewport::new(800.0, 600.0);
        let camera = laptop_camera(viewport);
        let (mut set, clicks) = recording_set();

        set.create(Vec3::new(0.0, 0.1, -0.25), "LED Screen", &camera, viewport);
        set.create(Vec3::new(0.0, -0.12, 0.0), "Keyboard", &camera, viewport);
        let keyboard_before = set.iter().nth(1).cloned().unwrap();

        set.notify_clicked(0);

        assert_eq!(*clicks.borrow(), vec!["LED Screen".to_string()]);
        let keyboard_after = set.iter().nth(1).cloned().unwrap();
        assert_eq!(keyboard_after.label, keyboard_before.label);
        assert_eq!(keyboard_after.anchor, keyboard_before.anchor);
        assert_eq!(keyboard_after.screen_pos, keyboard_before.screen_pos);
    }

    #[test]
    fn out_of_range_click_is_ignored() {
        let (mut set, clicks) = recording_set();
        set.notify_clicked(3);
        assert!(clicks.borrow().is_empty());
    }

    #[test]
    fn laptop_scenario_projects_both_hotspots_deterministically() {
        // Camera at z = 0.7 looking at the origin, 100 degree FOV, 800x600.
        let viewport = Viewport::new(800.0, 600.0);
        let camera = laptop_camera(viewport);
        let (mut set, _clicks) = recording_set();

        set.create(Vec3::new(0.0, 0.1, -0.25), "LED Screen", &camera, viewport);
        set.create(Vec3::new(0.0, -0.12, 0.0), "Keyboard", &camera, viewport);
        set.update_positions(&camera, viewport);

        let led = set.iter().next().unwrap();
        let keyboard = set.iter().nth(1).unwrap();

        // Both anchors sit on the camera axis in X, so they stay centered
        // horizontally; Y follows the closed-form projection.
        let want_led = reference_project(Vec3::new(0.0, 0.1, -0.25), 0.7, 100.0, viewport);
        let want_keyboard = reference_project(Vec3::new(0.0, -0.12, 0.0), 0.7, 100.0, viewport);

        assert!((led.screen_pos - want_led).length() < EPS);
        assert!((keyboard.screen_pos - want_keyboard).length() < EPS);

        assert!((led.screen_pos.x - 400.0).abs() < EPS);
        assert!((keyboard.screen_pos.x - 400.0).abs() < EPS);
        // The LED screen anchor is above center, the keyboard below.
        assert!(led.screen_pos.y < 300.0);
        assert!(keyboard.screen_pos.y > 300.0);
    }
}
