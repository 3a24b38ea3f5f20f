use bevy::prelude::*;
use bevy_rapier3d::prelude::RapierContext;
use touch_input::TouchFrame;

use crate::{
    boundary::{constrain_to_boundaries, CameraBoundary},
    components::*,
    controller::FrameContext,
    raycast::{NoRaycast, RapierScreenRaycast},
    rig::RigPose,
    settings::MobaCameraSettings,
};

const NODE_NAMES: [&str; 3] = ["pivot", "offset", "camera"];

fn read_pose(nodes: &[Mut<Transform>; 3]) -> RigPose {
    RigPose {
        pivot: *nodes[0],
        offset: *nodes[1],
        camera: *nodes[2],
    }
}

fn write_pose(nodes: [Mut<Transform>; 3], pose: &RigPose) {
    let [mut pivot, mut offset, mut camera] = nodes;
    pivot.set_if_neq(pose.pivot);
    offset.set_if_neq(pose.offset);
    camera.set_if_neq(pose.camera);
}

/// Validates newly added rigs and puts them in their starting state. A rig with missing nodes
/// stays disabled.
pub(crate) fn init_rig(
    mut controllers: Query<(Entity, &MobaCameraRig, &MobaCameraSettings, &mut MobaCamera), Added<MobaCameraRig>>,
    mut transforms: Query<&mut Transform>,
) {
    for (entity, rig, settings, mut controller) in &mut controllers {
        let nodes = rig.nodes().and_then(|nodes| {
            let missing: Vec<_> = NODE_NAMES
                .into_iter()
                .zip(nodes)
                .filter(|(_, node)| !transforms.contains(*node))
                .map(|(name, _)| name)
                .collect();
            if missing.is_empty() {
                Ok(nodes)
            } else {
                Err(RigError::MissingNodes(missing))
            }
        });

        let [pivot, ..] = match nodes {
            Ok(nodes) => nodes,
            Err(err) => {
                warn!("{err} (controller {entity:?})");
                controller.enabled = false;
                continue;
            }
        };

        controller.reset(settings);
        controller.enabled = true;

        if settings.movement.use_default_height {
            if let Ok(mut pivot) = transforms.get_mut(pivot) {
                pivot.translation.y = settings.movement.default_height;
            }
        }
        debug!("moba camera {entity:?} ready");
    }
}

/// Feeds this frame's touches through every enabled controller and writes the rig back.
#[allow(clippy::too_many_arguments)]
pub(crate) fn camera_update(
    time: Res<Time>,
    touch_frame: Res<TouchFrame>,
    rapier: Option<Res<RapierContext>>,
    mut controllers: Query<(Entity, &MobaCameraRig, &mut MobaCameraSettings, &mut MobaCamera)>,
    mut transforms: Query<&mut Transform>,
    cameras: Query<(&Camera, &GlobalTransform)>,
    targets: Query<&GlobalTransform>,
    mut selected: EventWriter<PointOfInterestSelected>,
) {
    for (entity, rig, mut settings, mut controller) in &mut controllers {
        if !controller.is_enabled() {
            continue;
        }
        let Ok(nodes) = rig.nodes() else { continue };
        let Ok(rig_transforms) = transforms.get_many_mut(nodes) else { continue };
        let mut pose = read_pose(&rig_transforms);

        let lock_target = settings
            .lock_target
            .and_then(|target| targets.get(target).ok())
            .map(GlobalTransform::translation);
        let frame = FrameContext {
            touches: touch_frame.touches(),
            dt: time.delta_seconds(),
            elapsed: time.elapsed_seconds(),
            cursor: touch_frame.cursor,
            viewport_size: touch_frame.viewport_size,
            lock_target,
        };

        // apply may correct the zoom range, keep change detection quiet otherwise
        let mut working = settings.clone();
        let outcome = match (rapier.as_deref(), cameras.get(nodes[2])) {
            (Some(context), Ok((camera, camera_transform))) => {
                let raycast = RapierScreenRaycast {
                    context,
                    camera,
                    camera_transform,
                };
                controller.update(&mut working, &mut pose, &frame, &raycast)
            }
            _ => controller.update(&mut working, &mut pose, &frame, &NoRaycast),
        };
        settings.set_if_neq(working);
        write_pose(rig_transforms, &pose);

        if let Some(position) = outcome.selected {
            debug!("point of interest selected at {position}");
            selected.send(PointOfInterestSelected {
                controller: entity,
                position,
            });
        }
    }
}

/// Pulls the pivot back inside the nearest [`CameraBoundary`] and re-lays the rig around it.
pub(crate) fn enforce_boundaries(
    controllers: Query<(&MobaCameraRig, &MobaCameraSettings, &MobaCamera)>,
    boundaries: Query<(&CameraBoundary, &GlobalTransform)>,
    mut transforms: Query<&mut Transform>,
) {
    for (rig, settings, controller) in &controllers {
        if !settings.use_boundaries || !controller.is_enabled() {
            continue;
        }
        let Ok(nodes) = rig.nodes() else { continue };
        let Ok(rig_transforms) = transforms.get_many_mut(nodes) else { continue };
        let mut pose = read_pose(&rig_transforms);

        let Some(inside) = constrain_to_boundaries(pose.pivot.translation, boundaries.iter()) else {
            continue;
        };
        pose.pivot.translation = inside;
        controller.lay_out(&mut pose);
        write_pose(rig_transforms, &pose);
    }
}
