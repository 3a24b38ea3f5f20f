use bevy::math::Vec3;

/// moves current towards target by at most max_delta without overshooting
pub fn move_towards(current: Vec3, target: Vec3, max_delta: f32) -> Vec3 {
    let to_target = target - current;
    let distance = to_target.length();
    if distance <= max_delta || distance <= f32::EPSILON {
        return target;
    }
    current + to_target / distance * max_delta
}

/// steps current towards target unless it is already within dead_zone. Returns `None` once arrived.
pub fn approach(current: Vec3, target: Vec3, step: f32, dead_zone: f32) -> Option<Vec3> {
    if current.distance(target) > dead_zone {
        Some(move_towards(current, target, step))
    } else {
        None
    }
}
