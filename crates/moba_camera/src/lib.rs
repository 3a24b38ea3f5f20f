use bevy::prelude::*;
use touch_input::TouchInputPlugin;

pub use self::boundary::*;
pub use self::components::*;
pub use self::controller::{FrameContext, FrameOutcome, MAX_PITCH, MIN_PITCH};
pub use self::gestures::Twist;
pub use self::raycast::*;
pub use self::rig::RigPose;
pub use self::settings::*;
use self::systems::*;

mod boundary;
mod components;
mod controller;
mod gestures;
mod raycast;
mod rig;
mod selection;
mod settings;
mod systems;
pub mod utils;

#[derive(SystemSet, Clone, PartialEq, Eq, Debug, Hash)]
pub struct MobaCameraSystemSet;

#[derive(SystemSet, Clone, PartialEq, Eq, Debug, Hash)]
pub enum MobaCameraStages {
    /// validates newly spawned rigs
    Setup,
    /// gestures, selection and the apply pass
    Gestures,
    /// boundary volumes
    Constrain,
}

/// Drives every [`MobaCamera`] from the touches gathered by [`TouchInputPlugin`], which gets added
/// if it isn't already.
#[derive(Default)]
pub struct MobaCameraPlugin;

impl Plugin for MobaCameraPlugin {
    fn build(&self, app: &mut App) {
        if !app.is_plugin_added::<TouchInputPlugin>() {
            app.add_plugins(TouchInputPlugin);
        }

        app.configure_sets(
            Update,
            (
                MobaCameraStages::Setup,
                MobaCameraStages::Gestures,
                MobaCameraStages::Constrain,
            )
                .chain()
                .in_set(MobaCameraSystemSet),
        );

        app.register_type::<MobaCamera>()
            .register_type::<MobaCameraRig>()
            .register_type::<MobaCameraSettings>()
            .register_type::<CameraBoundary>()
            .add_event::<PointOfInterestSelected>()
            .add_systems(
                Update,
                (
                    init_rig.in_set(MobaCameraStages::Setup),
                    camera_update.in_set(MobaCameraStages::Gestures),
                    enforce_boundaries.in_set(MobaCameraStages::Constrain),
                ),
            );
    }
}

pub mod prelude {
    pub use crate::{
        CameraBoundary, InterestLayer, MobaCamera, MobaCameraBundle, MobaCameraPlugin, MobaCameraRig,
        MobaCameraSettings, MobaCameraStages, MobaCameraSystemSet, PointOfInterestSelected,
    };
    pub use touch_input::{InputMode, TouchFrame, TouchInputConfig, TouchInputPlugin, TouchPhase, TouchRecord};
}
