use bevy::prelude::*;
use touch_input::TouchRecord;

use crate::{
    components::MobaCamera,
    raycast::{InterestLayer, ScreenRaycast},
    rig::RigPose,
    settings::{MovementSettings, RotationSettings, ZoomSettings},
};

/// fixed zoom or rotation step used by the constant rate settings
const CONSTANT_STEP: f32 = 3.0;

/// pivot distance to the lock target below which following stops
const LOCK_DEAD_ZONE: f32 = 0.2;

/// Direction of a two finger twist as seen on screen.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Twist {
    Clockwise,
    CounterClockwise,
}

impl Twist {
    /// `before` and `after` are the touch 0 → touch 1 vectors in viewport space (+y down).
    pub fn between(before: Vec2, after: Vec2) -> Self {
        if before.perp_dot(after) < 0.0 {
            Twist::CounterClockwise
        } else {
            Twist::Clockwise
        }
    }

    fn pitch_step(self) -> f32 {
        match self {
            Twist::CounterClockwise => -CONSTANT_STEP,
            Twist::Clockwise => CONSTANT_STEP,
        }
    }

    fn yaw_step(self) -> f32 {
        match self {
            Twist::CounterClockwise => CONSTANT_STEP,
            Twist::Clockwise => -CONSTANT_STEP,
        }
    }
}

impl MobaCamera {
    /// Pinch zoom. Reads the previous touch positions, so it must run before [`Self::process_rotation`].
    pub(crate) fn process_zoom(
        &mut self,
        settings: &ZoomSettings,
        touches: &[TouchRecord],
        dt: f32,
        raycast: &impl ScreenRaycast,
    ) {
        let [t0, t1, ..] = touches else {
            self.selection.midpoint = None;
            return;
        };
        if !(t0.is_moved() && t1.is_moved()) {
            self.selection.midpoint = None;
            return;
        }

        let midpoint = match self.selection.midpoint {
            Some(midpoint) => midpoint,
            None => {
                let midpoint = (t0.position + t1.position) / 2.0;
                self.selection.midpoint = Some(midpoint);
                self.selection.zoom_ray_pending = true;
                midpoint
            }
        };

        let [prev0, prev1] = self.state.previous_touch_positions;
        let previous_spread = prev0.distance(prev1);
        let current_spread = t0.position.distance(t1.position);

        self.state.changed = true;

        let change = if settings.constant_rate {
            if previous_spread < current_spread {
                CONSTANT_STEP
            } else {
                -CONSTANT_STEP
            }
        } else {
            current_spread - previous_spread
        };
        let direction = if settings.invert { -1.0 } else { 1.0 };

        self.state.current_zoom += change * settings.rate * direction * dt;
        if settings.default_zoom != 0.0 {
            self.state.zoom_level = self.state.current_zoom / settings.default_zoom;
        }

        if self.selection.zoom_ray_pending {
            if let Some(hit) = raycast.cast(midpoint, InterestLayer::Floor) {
                self.selection.zoom_target = Some(hit);
                self.selection.zoom_ray_pending = false;
            }
        }
    }

    /// Two finger twist. Always records this frame's positions for the next frame.
    pub(crate) fn process_rotation(
        &mut self,
        settings: &RotationSettings,
        twist_threshold: f32,
        touches: &[TouchRecord],
        dt: f32,
    ) {
        let [t0, t1, ..] = touches else { return };

        let [prev0, prev1] = self.state.previous_touch_positions;
        let (cur0, cur1) = (t0.position, t1.position);
        let mut pitch_change = 0.0;
        let mut yaw_change = 0.0;

        if t0.is_moved() && t1.is_moved() {
            let before = prev1 - prev0;
            let after = cur1 - cur0;

            if (before.length() - after.length()).abs() < twist_threshold {
                self.selection.rotate_to_center = true;
                let twist = Twist::between(before, after);

                if !settings.lock_pitch {
                    // screen y grows downward, pitch follows the finger upward
                    let raw = prev0.y - cur0.y;
                    if raw != 0.0 {
                        pitch_change = if settings.constant_rate { twist.pitch_step() } else { raw };
                        self.state.changed = true;
                    }
                }

                if !settings.lock_yaw {
                    let raw = cur1.x - prev1.x;
                    if raw != 0.0 {
                        yaw_change = if settings.constant_rate { twist.yaw_step() } else { raw };
                        self.state.changed = true;
                    }
                }
            }
        } else {
            self.selection.rotate_to_center = false;
        }

        self.state.current_rotation.x += pitch_change * settings.rate.x * dt;
        self.state.current_rotation.y += yaw_change * settings.rate.y * dt;

        self.state.previous_touch_positions = [cur0, cur1];
    }

    /// One finger drag slides the camera against the drag direction.
    pub(crate) fn process_pan(&self, settings: &MovementSettings, rig: &mut RigPose, touches: &[TouchRecord], dt: f32) {
        let [touch] = touches else { return };
        if !touch.is_moved() {
            return;
        }

        let direction = touch.delta.normalize_or_zero();
        let movement = -direction.x * rig.camera_right() + direction.y * rig.camera_up();
        let translation = rig.camera_translation()
            + movement * self.state.zoom_level * settings.camera_movement_rate * dt;
        rig.set_camera_translation(translation);
    }

    /// Eases the pivot toward the lock target.
    pub(crate) fn follow_target(&mut self, settings: &MovementSettings, rig: &mut RigPose, target: Vec3) {
        let pivot = rig.pivot.translation;
        if pivot.distance(target) <= LOCK_DEAD_ZONE {
            return;
        }

        let mut target = target;
        if !settings.use_lock_target_height {
            target.y = if settings.use_default_height {
                settings.default_height
            } else {
                pivot.y
            };
        }

        rig.pivot.translation = pivot.lerp(target, settings.lock_transition_rate);
        self.state.changed = true;
    }

    /// Scrolls the pivot while the cursor rests within `edge_hover_offset` of a window edge.
    pub(crate) fn edge_hover(
        &mut self,
        settings: &MovementSettings,
        rig: &mut RigPose,
        cursor: Vec2,
        viewport_size: Vec2,
        dt: f32,
    ) {
        if viewport_size.cmple(Vec2::ZERO).any() {
            return;
        }

        let edge = settings.edge_hover_offset;
        let mut screen_direction = Vec2::ZERO;
        if cursor.x <= edge {
            screen_direction.x -= 1.0;
        } else if cursor.x >= viewport_size.x - edge {
            screen_direction.x += 1.0;
        }
        if cursor.y <= edge {
            screen_direction.y += 1.0;
        } else if cursor.y >= viewport_size.y - edge {
            screen_direction.y -= 1.0;
        }
        if screen_direction == Vec2::ZERO {
            return;
        }

        let right = rig.pivot.rotation * Vec3::X;
        let forward = rig.pivot.rotation * Vec3::NEG_Z;
        let movement = (screen_direction.x * right + screen_direction.y * forward).normalize_or_zero();
        rig.pivot.translation += movement * self.state.zoom_level * settings.camera_movement_rate * dt;
        self.state.changed = true;
    }
}
