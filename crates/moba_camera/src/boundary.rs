use bevy::prelude::*;

/// A convex volume the pivot is kept inside when
/// [`MobaCameraSettings::use_boundaries`](crate::MobaCameraSettings::use_boundaries) is set.
/// Placed, rotated and scaled by the entity's `GlobalTransform`.
#[derive(Component, Clone, Copy, Debug, PartialEq, Reflect)]
#[reflect(Component)]
pub enum CameraBoundary {
    Box { half_extents: Vec3 },
    Sphere { radius: f32 },
}

impl Default for CameraBoundary {
    fn default() -> Self {
        CameraBoundary::Box {
            half_extents: Vec3::splat(0.5),
        }
    }
}

impl CameraBoundary {
    pub fn contains(&self, transform: &GlobalTransform, point: Vec3) -> bool {
        match *self {
            CameraBoundary::Box { half_extents } => {
                let local = transform.affine().inverse().transform_point3(point);
                local.abs().cmple(half_extents).all()
            }
            CameraBoundary::Sphere { radius } => {
                let (scale, _, center) = transform.to_scale_rotation_translation();
                point.distance(center) <= radius * scale.max_element()
            }
        }
    }

    /// Closest point on or inside the volume.
    pub fn closest_point(&self, transform: &GlobalTransform, point: Vec3) -> Vec3 {
        match *self {
            CameraBoundary::Box { half_extents } => {
                let local = transform.affine().inverse().transform_point3(point);
                transform.transform_point(local.clamp(-half_extents, half_extents))
            }
            CameraBoundary::Sphere { radius } => {
                let (scale, _, center) = transform.to_scale_rotation_translation();
                let radius = radius * scale.max_element();
                let offset = point - center;
                if offset.length() <= radius {
                    point
                } else {
                    center + offset.normalize_or_zero() * radius
                }
            }
        }
    }
}

/// Returns where `point` must move to so it lies within one of `volumes`: `None` when it already
/// does (or there are no volumes), otherwise the closest point on the nearest volume.
pub fn constrain_to_boundaries<'a>(
    point: Vec3,
    volumes: impl IntoIterator<Item = (&'a CameraBoundary, &'a GlobalTransform)>,
) -> Option<Vec3> {
    let mut nearest: Option<(f32, Vec3)> = None;
    for (volume, transform) in volumes {
        if volume.contains(transform, point) {
            return None;
        }
        let candidate = volume.closest_point(transform, point);
        let distance = candidate.distance_squared(point);
        if nearest.map_or(true, |(best, _)| distance < best) {
            nearest = Some((distance, candidate));
        }
    }
    nearest.map(|(_, candidate)| candidate)
}
