//! Per-model presets.
//!
//! Camera distance, zoom range, lighting intensity, and the fixed hotspot
//! anchors are all tied to a specific model's geometry, so they live in one
//! lookup table keyed by model name. Unknown names fall back to a distant,
//! uncontrolled camera with no hotspots.

use crate::camera::OrbitLimits;
use glam::Vec3;
use std::path::{Path, PathBuf};

pub const DEFAULT_MODEL_NAME: &str = "laptop2";

/// A fixed point of interest on a model, in world space.
#[derive(Debug, Clone, Copy)]
pub struct HotspotAnchor {
    pub position: Vec3,
    pub label: &'static str,
}

#[derive(Debug, Clone, Copy)]
pub struct ModelPreset {
    /// Initial orbit radius.
    pub camera_distance: f32,
    /// Ambient light multiplier.
    pub ambient_intensity: f32,
    /// Orbit controls with their zoom clamp, or `None` to pin the camera.
    pub orbit: Option<OrbitLimits>,
    pub hotspots: &'static [HotspotAnchor],
}

const LAPTOP2: ModelPreset = ModelPreset {
    camera_distance: 0.7,
    ambient_intensity: 5.0,
    orbit: Some(OrbitLimits {
        min_distance: 0.5,
        max_distance: 1.0,
    }),
    hotspots: &[
        HotspotAnchor {
            position: Vec3::new(0.0, 0.1, -0.25),
            label: "LED Screen",
        },
        HotspotAnchor {
            position: Vec3::new(0.0, -0.12, 0.0),
            label: "Keyboard",
        },
    ],
};

const FALLBACK: ModelPreset = ModelPreset {
    camera_distance: 500.0,
    ambient_intensity: 1.0,
    orbit: None,
    hotspots: &[],
};

/// Looks up the preset for a model name.
pub fn preset_for(name: &str) -> &'static ModelPreset {
    match name {
        "laptop2" => &LAPTOP2,
        _ => &FALLBACK,
    }
}

/// Model assets live at `<models_dir>/<name>/scene.gltf`.
pub fn model_path(models_dir: &Path, name: &str) -> PathBuf {
    models_dir.join(name).join("scene.gltf")
}
