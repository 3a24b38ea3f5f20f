use bevy::prelude::*;

/// Working copy of the three rig transforms for one frame.
///
/// `pivot` and `offset` are world space; `camera` is local to `offset`, matching a camera entity
/// parented to the offset entity.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RigPose {
    pub pivot: Transform,
    pub offset: Transform,
    pub camera: Transform,
}

impl Default for RigPose {
    fn default() -> Self {
        Self {
            pivot: Transform::IDENTITY,
            offset: Transform::IDENTITY,
            camera: Transform::IDENTITY,
        }
    }
}

impl RigPose {
    pub fn camera_translation(&self) -> Vec3 {
        self.offset.transform_point(self.camera.translation)
    }

    pub fn set_camera_translation(&mut self, world: Vec3) {
        self.camera.translation = self.offset.rotation.inverse() * (world - self.offset.translation) / self.offset.scale;
    }

    pub fn camera_rotation(&self) -> Quat {
        self.offset.rotation * self.camera.rotation
    }

    /// +X of the camera in world space
    pub fn camera_right(&self) -> Vec3 {
        self.camera_rotation() * Vec3::X
    }

    /// +Y of the camera in world space
    pub fn camera_up(&self) -> Vec3 {
        self.camera_rotation() * Vec3::Y
    }

    pub fn camera_altitude(&self) -> f32 {
        self.camera_translation().y
    }

    /// Yaws the pivot, then places the offset `zoom` units out along the pivot's back axis tilted by
    /// `pitch` around the pivot's right axis, looking back at the pivot. Angles are in degrees.
    pub fn orbit(&mut self, pitch: f32, yaw: f32, zoom: f32) {
        self.pivot.rotation = Quat::from_rotation_y(yaw.to_radians());

        let back = self.pivot.rotation * Vec3::Z;
        let right = self.pivot.rotation * Vec3::X;
        let direction = Quat::from_axis_angle(right, pitch.to_radians()) * back;

        self.offset.translation = self.pivot.translation + direction * zoom;
        self.offset.look_at(self.pivot.translation, Dir3::Y);
    }
}
