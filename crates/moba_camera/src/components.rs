use bevy::prelude::*;

use crate::settings::MobaCameraSettings;

/// The three entities a controller drives. Parent the camera to the offset; pivot and offset are
/// positioned in world space.
#[derive(Component, Clone, Copy, Debug, Default, Reflect)]
#[reflect(Component)]
pub struct MobaCameraRig {
    pub pivot: Option<Entity>,
    pub offset: Option<Entity>,
    pub camera: Option<Entity>,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RigError {
    #[error("moba camera requirements missing: {}. Parent the offset to the pivot and the camera to the offset", .0.join(" / "))]
    MissingNodes(Vec<&'static str>),
}

impl MobaCameraRig {
    pub fn new(pivot: Entity, offset: Entity, camera: Entity) -> Self {
        Self {
            pivot: Some(pivot),
            offset: Some(offset),
            camera: Some(camera),
        }
    }

    /// The entity rendering through this rig.
    pub fn camera(&self) -> Option<Entity> {
        self.camera
    }

    /// `[pivot, offset, camera]`, or the names of whichever are missing
    pub fn nodes(&self) -> Result<[Entity; 3], RigError> {
        match (self.pivot, self.offset, self.camera) {
            (Some(pivot), Some(offset), Some(camera)) => Ok([pivot, offset, camera]),
            _ => {
                let missing = [("pivot", self.pivot), ("offset", self.offset), ("camera", self.camera)]
                    .into_iter()
                    .filter(|(_, node)| node.is_none())
                    .map(|(name, _)| name)
                    .collect();
                Err(RigError::MissingNodes(missing))
            }
        }
    }
}

/// Zoom and rotation carried from frame to frame.
#[derive(Clone, Debug, PartialEq, Reflect)]
pub struct CameraState {
    pub current_zoom: f32,
    /// (pitch, yaw) in degrees
    pub current_rotation: Vec2,
    /// touch 0 and 1 positions from the last two finger frame
    pub previous_touch_positions: [Vec2; 2],
    /// current zoom relative to the default zoom, scales pan speed
    pub zoom_level: f32,
    /// the rig needs recomputing on the next apply pass
    pub changed: bool,
}

impl Default for CameraState {
    fn default() -> Self {
        Self {
            current_zoom: 0.0,
            current_rotation: Vec2::ZERO,
            previous_touch_positions: [Vec2::ZERO; 2],
            zoom_level: 1.0,
            changed: true,
        }
    }
}

/// Hold-to-focus and recentering transitions. Each part clears itself once its transition ends.
#[derive(Clone, Debug, Default, PartialEq, Reflect)]
pub struct SelectionState {
    /// time the current single touch began, while it is still a candidate long press
    pub press_started: Option<f32>,
    pub cast_pending: bool,
    pub moving_to_target: bool,
    pub selected_target: Option<Vec3>,
    /// screen midpoint of the current pinch
    pub midpoint: Option<Vec2>,
    pub zoom_ray_pending: bool,
    /// floor point under the pinch the pivot recenters onto
    pub zoom_target: Option<Vec3>,
    pub rotate_to_center: bool,
}

impl SelectionState {
    pub fn reset_press(&mut self) {
        self.press_started = None;
        self.cast_pending = false;
    }
}

/// Gesture driven orbit camera. Needs [`MobaCameraSettings`] and [`MobaCameraRig`] on the same entity.
#[derive(Component, Clone, Debug, PartialEq, Reflect)]
#[reflect(Component)]
pub struct MobaCamera {
    pub(crate) state: CameraState,
    pub(crate) selection: SelectionState,
    pub(crate) enabled: bool,
}

impl Default for MobaCamera {
    fn default() -> Self {
        Self {
            state: default(),
            selection: default(),
            enabled: true,
        }
    }
}

impl MobaCamera {
    /// A controller already initialized from `settings`.
    pub fn from_settings(settings: &MobaCameraSettings) -> Self {
        let mut camera = Self::default();
        camera.reset(settings);
        camera
    }

    /// Back to the default zoom and rotation with every transition cleared.
    pub fn reset(&mut self, settings: &MobaCameraSettings) {
        self.state = CameraState {
            current_zoom: settings.zoom.default_zoom,
            current_rotation: settings.rotation.default_rotation,
            ..default()
        };
        self.selection = default();
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn state(&self) -> &CameraState {
        &self.state
    }

    pub fn selection(&self) -> &SelectionState {
        &self.selection
    }

    pub fn current_zoom(&self) -> f32 {
        self.state.current_zoom
    }

    /// (pitch, yaw) in degrees
    pub fn current_rotation(&self) -> Vec2 {
        self.state.current_rotation
    }

    pub fn zoom_level(&self) -> f32 {
        self.state.zoom_level
    }

    pub fn is_moving_to_target(&self) -> bool {
        self.selection.moving_to_target
    }

    pub fn set_zoom(&mut self, amount: f32) {
        self.state.current_zoom = amount;
        self.state.changed = true;
    }

    /// `rotation` is (pitch, yaw) in degrees
    pub fn set_rotation(&mut self, rotation: Vec2) {
        self.state.current_rotation = rotation;
        self.state.changed = true;
    }

    pub fn set_rotation_axes(&mut self, pitch: f32, yaw: f32) {
        self.set_rotation(Vec2::new(pitch, yaw));
    }
}

#[derive(Bundle, Default)]
pub struct MobaCameraBundle {
    pub camera: MobaCamera,
    pub settings: MobaCameraSettings,
    pub rig: MobaCameraRig,
}

impl MobaCameraBundle {
    pub fn new(rig: MobaCameraRig, settings: MobaCameraSettings) -> Self {
        Self {
            camera: MobaCamera::from_settings(&settings),
            settings,
            rig,
        }
    }
}

/// Sent when a long press lands on the point of interest layer. Hook haptics up to this.
#[derive(Event, Clone, Copy, Debug, PartialEq)]
pub struct PointOfInterestSelected {
    /// the entity holding the [`MobaCamera`]
    pub controller: Entity,
    pub position: Vec3,
}
