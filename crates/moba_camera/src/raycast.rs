use bevy::prelude::*;
use bevy_rapier3d::prelude::*;
use serde::{Deserialize, Serialize};

/// Collision layers the camera casts screen rays against. Give colliders a matching
/// `CollisionGroups` membership to make them hittable.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Reflect, Serialize, Deserialize)]
pub enum InterestLayer {
    /// ground the pivot recenters onto when a pinch begins
    Floor,
    /// selectable objects the camera flies to after a long press
    PointOfInterest,
}

impl InterestLayer {
    pub const fn group(self) -> Group {
        match self {
            InterestLayer::Floor => Group::GROUP_9,
            InterestLayer::PointOfInterest => Group::GROUP_10,
        }
    }

    /// `CollisionGroups` for a collider living on this layer
    pub fn collision_groups(self) -> CollisionGroups {
        CollisionGroups::new(self.group(), Group::ALL)
    }
}

/// Casts a ray from the camera through a viewport point and reports the first hit on `layer`.
pub trait ScreenRaycast {
    fn cast(&self, screen_position: Vec2, layer: InterestLayer) -> Option<Vec3>;
}

impl<F> ScreenRaycast for F
where
    F: Fn(Vec2, InterestLayer) -> Option<Vec3>,
{
    fn cast(&self, screen_position: Vec2, layer: InterestLayer) -> Option<Vec3> {
        self(screen_position, layer)
    }
}

/// Never hits. Used when there is no physics context or no render camera to cast from.
pub struct NoRaycast;

impl ScreenRaycast for NoRaycast {
    fn cast(&self, _: Vec2, _: InterestLayer) -> Option<Vec3> {
        None
    }
}

pub struct RapierScreenRaycast<'a> {
    pub context: &'a RapierContext,
    pub camera: &'a Camera,
    pub camera_transform: &'a GlobalTransform,
}

impl ScreenRaycast for RapierScreenRaycast<'_> {
    fn cast(&self, screen_position: Vec2, layer: InterestLayer) -> Option<Vec3> {
        let ray = self.camera.viewport_to_world(self.camera_transform, screen_position)?;
        let filter = QueryFilter::default().groups(CollisionGroups::new(Group::ALL, layer.group()));
        let (_, toi) = self
            .context
            .cast_ray(ray.origin, *ray.direction, f32::MAX, true, filter)?;
        Some(ray.get_point(toi))
    }
}
