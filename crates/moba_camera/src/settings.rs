use std::path::Path;

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    #[error("failed to read camera settings: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse camera settings: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("failed to serialize camera settings: {0}")]
    Serialize(#[from] toml::ser::Error),
}

/// Per-controller tunables. Every group uses `#[serde(default)]` so a TOML file only needs the
/// values it overrides.
#[derive(Component, Clone, Debug, PartialEq, Reflect, Serialize, Deserialize)]
#[reflect(Component)]
#[serde(default)]
pub struct MobaCameraSettings {
    /// clamp the pivot to [`CameraBoundary`](crate::CameraBoundary) volumes
    pub use_boundaries: bool,
    /// follow [`lock_target`](Self::lock_target) instead of panning
    pub camera_locked: bool,
    #[serde(skip)]
    pub lock_target: Option<Entity>,
    pub movement: MovementSettings,
    pub rotation: RotationSettings,
    pub zoom: ZoomSettings,
    pub selection: SelectionSettings,
}

impl Default for MobaCameraSettings {
    fn default() -> Self {
        Self {
            use_boundaries: false,
            camera_locked: false,
            lock_target: None,
            movement: default(),
            rotation: default(),
            zoom: default(),
            selection: default(),
        }
    }
}

impl MobaCameraSettings {
    pub fn from_toml_str(content: &str) -> Result<Self, SettingsError> {
        Ok(toml::from_str(content)?)
    }

    pub fn to_toml_string(&self) -> Result<String, SettingsError> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Loads settings from a TOML file. Missing fields use defaults.
    pub fn load(path: &Path) -> Result<Self, SettingsError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    pub fn set_lock_target(&mut self, target: Option<Entity>) {
        self.lock_target = target;
    }
}

#[derive(Clone, Debug, PartialEq, Reflect, Serialize, Deserialize)]
#[serde(default)]
pub struct MovementSettings {
    /// lerp factor per frame when following the lock target, also the per-frame step toward a zoom hit
    pub lock_transition_rate: f32,
    pub camera_movement_rate: f32,
    /// move the pivot when the cursor hovers near a window edge
    pub edge_hover_movement: bool,
    /// distance in logical pixels from the window edge that counts as hovering
    pub edge_hover_offset: f32,
    pub default_height: f32,
    /// pin the pivot's y to [`default_height`](Self::default_height) on startup
    pub use_default_height: bool,
    /// take the lock target's y when following it
    pub use_lock_target_height: bool,
}

impl Default for MovementSettings {
    fn default() -> Self {
        Self {
            lock_transition_rate: 0.1,
            camera_movement_rate: 0.5,
            edge_hover_movement: true,
            edge_hover_offset: 10.0,
            default_height: 0.0,
            use_default_height: true,
            use_lock_target_height: true,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Reflect, Serialize, Deserialize)]
#[serde(default)]
pub struct RotationSettings {
    /// rotate by a fixed step regardless of finger speed
    pub constant_rate: bool,
    pub lock_pitch: bool,
    pub lock_yaw: bool,
    /// (pitch, yaw) in degrees
    pub default_rotation: Vec2,
    /// (pitch, yaw) degrees per unit of input per second
    pub rate: Vec2,
}

impl Default for RotationSettings {
    fn default() -> Self {
        Self {
            constant_rate: false,
            lock_pitch: true,
            lock_yaw: true,
            default_rotation: Vec2::new(-45.0, 0.0),
            rate: Vec2::new(100.0, 100.0),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Reflect, Serialize, Deserialize)]
#[serde(default)]
pub struct ZoomSettings {
    pub invert: bool,
    pub default_zoom: f32,
    pub min_zoom: f32,
    pub max_zoom: f32,
    pub rate: f32,
    /// zoom by a fixed step regardless of pinch speed
    pub constant_rate: bool,
    /// Clamp the zoom at [`min_zoom`](Self::min_zoom). When off, pinching can zoom past the minimum.
    pub enforce_min_zoom: bool,
}

impl Default for ZoomSettings {
    fn default() -> Self {
        Self {
            invert: false,
            default_zoom: 15.0,
            min_zoom: 10.0,
            max_zoom: 20.0,
            rate: 10.0,
            constant_rate: false,
            enforce_min_zoom: false,
        }
    }
}

impl ZoomSettings {
    /// Bumps `max_zoom` to `min_zoom + 1` when the range is inverted. Returns true if it did.
    pub fn sanitize_range(&mut self) -> bool {
        if self.max_zoom < self.min_zoom {
            self.max_zoom = self.min_zoom + 1.0;
            return true;
        }
        false
    }
}

/// Hold-to-focus and recentering tunables.
#[derive(Clone, Debug, PartialEq, Reflect, Serialize, Deserialize)]
#[serde(default)]
pub struct SelectionSettings {
    /// seconds a single touch must stay still before a point of interest is picked
    pub hold_threshold: f32,
    /// world units per frame while flying to a point of interest
    pub poi_move_speed: f32,
    /// the flight ends once the camera drops to this altitude
    pub altitude_floor: f32,
    pub recenter_dead_zone: f32,
    /// the pivot drifts here while a two finger twist is active
    pub rotation_center: Vec3,
    pub rotate_to_center_speed: f32,
    /// max change in finger spread (pixels) for a two finger gesture to count as a twist
    pub twist_threshold: f32,
}

impl Default for SelectionSettings {
    fn default() -> Self {
        Self {
            hold_threshold: 0.5,
            poi_move_speed: 0.5,
            altitude_floor: 20.0,
            recenter_dead_zone: 0.2,
            rotation_center: Vec3::new(45.0, 1.8, -4.6),
            rotate_to_center_speed: 2.0,
            twist_threshold: 10.0,
        }
    }
}
