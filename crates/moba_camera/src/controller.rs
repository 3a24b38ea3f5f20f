use bevy::{log::debug, prelude::*};
use touch_input::TouchRecord;

use crate::{
    components::MobaCamera,
    raycast::ScreenRaycast,
    rig::RigPose,
    settings::MobaCameraSettings,
    utils::math::{approach, move_towards},
};

pub const MAX_PITCH: f32 = 89.0;
pub const MIN_PITCH: f32 = -89.0;

/// Everything the controller reads from the outside world for one frame.
#[derive(Clone, Copy, Debug)]
pub struct FrameContext<'a> {
    pub touches: &'a [TouchRecord],
    pub dt: f32,
    /// seconds since startup, for long press timing
    pub elapsed: f32,
    /// mouse cursor in viewport space, `None` on touch screens
    pub cursor: Option<Vec2>,
    pub viewport_size: Vec2,
    /// world position of the lock target, if locked onto one
    pub lock_target: Option<Vec3>,
}

impl<'a> FrameContext<'a> {
    pub fn new(touches: &'a [TouchRecord], dt: f32, elapsed: f32) -> Self {
        Self {
            touches,
            dt,
            elapsed,
            cursor: None,
            viewport_size: Vec2::ZERO,
            lock_target: None,
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct FrameOutcome {
    /// a point of interest was picked this frame
    pub selected: Option<Vec3>,
    /// the apply pass recomputed the rig
    pub applied: bool,
}

impl MobaCamera {
    /// Runs one frame: selection, zoom, rotation, movement, then the apply pass.
    pub fn update(
        &mut self,
        settings: &mut MobaCameraSettings,
        rig: &mut RigPose,
        frame: &FrameContext,
        raycast: &impl ScreenRaycast,
    ) -> FrameOutcome {
        if !self.enabled {
            return FrameOutcome::default();
        }

        let selected = self.select_target(&settings.selection, frame.touches, frame.elapsed, raycast);
        self.process_zoom(&settings.zoom, frame.touches, frame.dt, raycast);
        self.process_rotation(&settings.rotation, settings.selection.twist_threshold, frame.touches, frame.dt);
        self.process_movement(settings, rig, frame);
        let applied = self.apply(settings, rig);

        FrameOutcome { selected, applied }
    }

    fn process_movement(&mut self, settings: &MobaCameraSettings, rig: &mut RigPose, frame: &FrameContext) {
        match frame.lock_target {
            Some(target) if settings.camera_locked => self.follow_target(&settings.movement, rig, target),
            _ => {
                self.process_pan(&settings.movement, rig, frame.touches, frame.dt);
                if settings.movement.edge_hover_movement && frame.touches.is_empty() {
                    if let Some(cursor) = frame.cursor {
                        self.edge_hover(&settings.movement, rig, cursor, frame.viewport_size, frame.dt);
                    }
                }
            }
        }
    }

    /// Clamps the state, advances pending transitions and lays out the rig. Does nothing unless
    /// something changed since the last pass. Returns whether it ran.
    pub fn apply(&mut self, settings: &mut MobaCameraSettings, rig: &mut RigPose) -> bool {
        if !self.state.changed {
            return false;
        }

        if settings.zoom.sanitize_range() {
            debug!("max zoom below min zoom, raised to {}", settings.zoom.max_zoom);
        }

        let zoom = &settings.zoom;
        if self.state.current_zoom > zoom.max_zoom {
            self.state.current_zoom = zoom.max_zoom;
        }
        if zoom.enforce_min_zoom && self.state.current_zoom < zoom.min_zoom {
            self.state.current_zoom = zoom.min_zoom;
        }

        self.state.current_rotation.x = self.state.current_rotation.x.clamp(MIN_PITCH, MAX_PITCH);
        if zoom.default_zoom != 0.0 {
            self.state.zoom_level = self.state.current_zoom / zoom.default_zoom;
        }

        let selection = &settings.selection;

        if self.selection.moving_to_target {
            match self.selection.selected_target {
                Some(target) if rig.camera_altitude() > selection.altitude_floor => {
                    rig.pivot.translation = move_towards(rig.pivot.translation, target, selection.poi_move_speed);
                    let camera = move_towards(rig.camera_translation(), rig.pivot.translation, selection.poi_move_speed);
                    rig.set_camera_translation(camera);
                }
                _ => {
                    self.selection.moving_to_target = false;
                    self.selection.selected_target = None;
                }
            }
        }

        if let Some(target) = self.selection.zoom_target {
            match approach(
                rig.pivot.translation,
                target,
                settings.movement.lock_transition_rate,
                selection.recenter_dead_zone,
            ) {
                Some(pivot) => rig.pivot.translation = pivot,
                None => self.selection.zoom_target = None,
            }
        }

        if self.selection.rotate_to_center {
            match approach(
                rig.pivot.translation,
                selection.rotation_center,
                selection.rotate_to_center_speed,
                selection.recenter_dead_zone,
            ) {
                Some(pivot) => rig.pivot.translation = pivot,
                None => self.selection.rotate_to_center = false,
            }
        }

        self.lay_out(rig);

        self.state.changed = false;
        true
    }

    /// Places the offset around the pivot for the current rotation and zoom without advancing any
    /// transition.
    pub fn lay_out(&self, rig: &mut RigPose) {
        let rotation = self.state.current_rotation;
        rig.orbit(rotation.x, rotation.y, self.state.current_zoom);
    }
}

#[cfg(test)]
mod tests {
    use touch_input::TouchPhase;

    use super::*;
    use crate::raycast::{InterestLayer, NoRaycast};

    fn touch(id: u64, position: Vec2, delta: Vec2, phase: TouchPhase) -> TouchRecord {
        TouchRecord {
            id,
            position,
            delta,
            delta_time: 0.02,
            phase,
            tap_count: 1,
        }
    }

    fn setup(settings: &MobaCameraSettings) -> (MobaCamera, RigPose) {
        let mut camera = MobaCamera::from_settings(settings);
        let mut rig = RigPose::default();
        let mut settings = settings.clone();
        assert!(camera.apply(&mut settings, &mut rig));
        (camera, rig)
    }

    #[test]
    fn default_zoom_above_max_clamps_to_max() {
        let mut settings = MobaCameraSettings::default();
        settings.zoom.min_zoom = 10.0;
        settings.zoom.max_zoom = 20.0;
        settings.zoom.default_zoom = 25.0;

        let mut camera = MobaCamera::from_settings(&settings);
        let mut rig = RigPose::default();
        camera.apply(&mut settings, &mut rig);

        assert_eq!(camera.current_zoom(), 20.0);
        assert!((rig.offset.translation.distance(rig.pivot.translation) - 20.0).abs() < 1e-4);
    }

    #[test]
    fn inverted_range_is_corrected_before_clamping() {
        let mut settings = MobaCameraSettings::default();
        settings.zoom.min_zoom = 30.0;
        settings.zoom.max_zoom = 5.0;

        let mut camera = MobaCamera::from_settings(&settings);
        camera.set_zoom(100.0);
        camera.apply(&mut settings, &mut RigPose::default());

        assert_eq!(settings.zoom.max_zoom, 31.0);
        assert_eq!(camera.current_zoom(), 31.0);
    }

    #[test]
    fn zoom_below_min_is_left_alone_unless_enforced() {
        let mut settings = MobaCameraSettings::default();
        let mut camera = MobaCamera::from_settings(&settings);
        camera.set_zoom(2.0);
        camera.apply(&mut settings, &mut RigPose::default());
        assert_eq!(camera.current_zoom(), 2.0);

        settings.zoom.enforce_min_zoom = true;
        camera.set_zoom(2.0);
        camera.apply(&mut settings, &mut RigPose::default());
        assert_eq!(camera.current_zoom(), settings.zoom.min_zoom);
    }

    #[test]
    fn zoom_level_follows_the_clamped_zoom() {
        let mut settings = MobaCameraSettings::default();
        let mut camera = MobaCamera::from_settings(&settings);
        let mut rig = RigPose::default();

        camera.set_zoom(100.0);
        camera.apply(&mut settings, &mut rig);
        assert!((camera.zoom_level() - 20.0 / 15.0).abs() < 1e-5);

        camera.set_zoom(7.5);
        camera.apply(&mut settings, &mut rig);
        assert!((camera.zoom_level() - 0.5).abs() < 1e-5);
    }

    #[test]
    fn lay_out_leaves_transitions_pending() {
        let settings = MobaCameraSettings::default();
        let (mut camera, mut rig) = setup(&settings);
        camera.selection.zoom_target = Some(Vec3::new(10.0, 0.0, 0.0));
        rig.pivot.translation = Vec3::new(2.0, 0.0, 0.0);

        camera.lay_out(&mut rig);

        assert_eq!(rig.pivot.translation, Vec3::new(2.0, 0.0, 0.0));
        assert!((rig.offset.translation.x - 2.0).abs() < 1e-4);
        assert!(camera.selection().zoom_target.is_some());
    }

    #[test]
    fn pitch_is_clamped_for_any_input() {
        let mut settings = MobaCameraSettings::default();
        let mut camera = MobaCamera::from_settings(&settings);
        let mut rig = RigPose::default();

        for pitch in [-1000.0, -89.5, -10.0, 0.0, 88.9, 90.0, 5000.0] {
            camera.set_rotation_axes(pitch, 30.0);
            camera.apply(&mut settings, &mut rig);
            let clamped = camera.current_rotation().x;
            assert!((MIN_PITCH..=MAX_PITCH).contains(&clamped), "{pitch} -> {clamped}");
        }
    }

    #[test]
    fn apply_is_skipped_when_nothing_changed() {
        let settings = MobaCameraSettings::default();
        let (mut camera, mut rig) = setup(&settings);
        let before = rig;
        rig.pivot.translation = Vec3::new(5.0, 0.0, 0.0);

        let mut settings = settings;
        assert!(!camera.apply(&mut settings, &mut rig));
        // offset was not re-laid around the moved pivot
        assert_eq!(rig.offset, before.offset);
    }

    #[test]
    fn offset_always_orbits_the_pivot() {
        let mut settings = MobaCameraSettings::default();
        let mut camera = MobaCamera::from_settings(&settings);
        let mut rig = RigPose::default();
        rig.pivot.translation = Vec3::new(-3.0, 1.0, 7.0);
        camera.set_rotation_axes(-30.0, 120.0);
        camera.set_zoom(12.0);
        camera.apply(&mut settings, &mut rig);

        let arm = rig.offset.translation - rig.pivot.translation;
        assert!((arm.length() - 12.0).abs() < 1e-4);
        let forward = rig.offset.rotation * Vec3::NEG_Z;
        assert!(forward.distance(-arm.normalize()) < 1e-4);
    }

    #[test]
    fn single_touch_pans_only_while_moving() {
        let mut settings = MobaCameraSettings::default();
        let (mut camera, mut rig) = setup(&settings);
        let dt = 0.02;
        let at = Vec2::new(300.0, 300.0);

        let frames: [(&[TouchRecord], bool); 5] = [
            (&[], false),
            (&[touch(0, at, Vec2::ZERO, TouchPhase::Began)], false),
            (&[touch(0, at, Vec2::new(12.0, -4.0), TouchPhase::Moved)], true),
            (&[touch(0, at, Vec2::ZERO, TouchPhase::Ended)], false),
            (&[], false),
        ];

        for (i, (touches, pans)) in frames.into_iter().enumerate() {
            let before = rig.camera_translation();
            let frame = FrameContext::new(touches, dt, i as f32 * dt);
            let _ = camera.update(&mut settings, &mut rig, &frame, &NoRaycast);
            let moved = rig.camera_translation().distance(before) > 1e-6;
            assert_eq!(moved, pans, "frame {i}");
        }
    }

    #[test]
    fn pinch_out_then_recenter_on_floor_hit() {
        let mut settings = MobaCameraSettings::default();
        let (mut camera, mut rig) = setup(&settings);
        let floor_hit = Vec3::new(0.5, 0.0, 0.0);
        let floor = |_: Vec2, layer: InterestLayer| (layer == InterestLayer::Floor).then_some(floor_hit);

        let dt = 0.01;
        let prev = [Vec2::new(100.0, 300.0), Vec2::new(200.0, 300.0)];
        camera.state.previous_touch_positions = prev;
        let touches = [
            touch(0, Vec2::new(98.0, 300.0), Vec2::new(-2.0, 0.0), TouchPhase::Moved),
            touch(1, Vec2::new(202.0, 300.0), Vec2::new(2.0, 0.0), TouchPhase::Moved),
        ];
        let outcome = camera.update(&mut settings, &mut rig, &FrameContext::new(&touches, dt, 0.0), &floor);

        assert!(outcome.applied);
        assert!((camera.current_zoom() - (15.0 + 4.0 * 10.0 * dt)).abs() < 1e-4);
        // the spread grew by 4px, well under the twist threshold, so the pivot also heads for the rotation center
        assert!(camera.selection().rotate_to_center);
        assert_eq!(camera.selection().zoom_target, Some(floor_hit));
    }

    #[test]
    fn zoom_target_clears_once_reached() {
        let mut settings = MobaCameraSettings::default();
        let (mut camera, mut rig) = setup(&settings);
        camera.selection.zoom_target = Some(Vec3::new(0.25, 0.0, 0.0));

        camera.state.changed = true;
        camera.apply(&mut settings, &mut rig);
        assert!((rig.pivot.translation.x - 0.1).abs() < 1e-5);
        assert!(camera.selection().zoom_target.is_some());

        camera.state.changed = true;
        camera.apply(&mut settings, &mut rig);
        assert!(camera.selection().zoom_target.is_none());
    }

    #[test]
    fn long_press_flies_toward_the_point_of_interest() {
        let mut settings = MobaCameraSettings::default();
        settings.zoom.max_zoom = 60.0;
        settings.zoom.default_zoom = 60.0;
        let (mut camera, mut rig) = setup(&settings);
        let poi = Vec3::new(10.0, 0.0, -10.0);
        let raycast = |_: Vec2, layer: InterestLayer| (layer == InterestLayer::PointOfInterest).then_some(poi);
        let at = Vec2::new(400.0, 200.0);
        let dt = 0.1;

        let hold = [touch(0, at, Vec2::ZERO, TouchPhase::Began)];
        let _ = camera.update(&mut settings, &mut rig, &FrameContext::new(&hold, dt, 0.0), &raycast);
        let hold = [touch(0, at, Vec2::ZERO, TouchPhase::Stationary)];
        let outcome = camera.update(&mut settings, &mut rig, &FrameContext::new(&hold, dt, 0.6), &raycast);
        assert_eq!(outcome.selected, Some(poi));

        let start = rig.pivot.translation;
        let mut selections = 0;
        for frame in 0..2000 {
            let outcome = camera.update(&mut settings, &mut rig, &FrameContext::new(&[], dt, 0.7 + frame as f32 * dt), &raycast);
            selections += usize::from(outcome.selected.is_some());
            if !camera.is_moving_to_target() {
                break;
            }
        }

        assert_eq!(selections, 0);
        assert!(!camera.is_moving_to_target());
        assert_eq!(camera.selection().selected_target, None);
        assert!(rig.pivot.translation.distance(poi) < start.distance(poi));
        assert!(rig.camera_altitude() <= settings.selection.altitude_floor + 1.0);
    }

    #[test]
    fn locked_camera_follows_instead_of_panning() {
        let mut settings = MobaCameraSettings::default();
        settings.camera_locked = true;
        let (mut camera, mut rig) = setup(&settings);
        let camera_before = rig.camera.translation;

        let drag = [touch(0, Vec2::new(10.0, 10.0), Vec2::new(20.0, 0.0), TouchPhase::Moved)];
        let mut frame = FrameContext::new(&drag, 0.02, 0.0);
        frame.lock_target = Some(Vec3::new(10.0, 0.0, 0.0));
        let _ = camera.update(&mut settings, &mut rig, &frame, &NoRaycast);

        assert_eq!(rig.camera.translation, camera_before);
        assert!((rig.pivot.translation.x - 1.0).abs() < 1e-4);
    }

    #[test]
    fn disabled_controller_does_nothing() {
        let mut settings = MobaCameraSettings::default();
        let mut camera = MobaCamera::from_settings(&settings);
        camera.enabled = false;
        let mut rig = RigPose::default();

        let outcome = camera.update(&mut settings, &mut rig, &FrameContext::new(&[], 0.02, 0.0), &NoRaycast);
        assert_eq!(outcome, FrameOutcome::default());
        assert_eq!(rig, RigPose::default());
    }
}
