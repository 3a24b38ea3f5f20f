use bevy::{input::InputSystem, prelude::*};

pub use self::components::*;
pub use self::systems::{emulate_mouse_touches, emulated_touch_count, filter_touch_delta, normalize_touch};
use self::systems::*;

mod components;
mod systems;

/// Runs in `PreUpdate` once Bevy has processed raw input, so every `Update` system sees the same [`TouchFrame`].
#[derive(SystemSet, Clone, PartialEq, Eq, Debug, Hash)]
pub struct TouchInputSystemSet;

/// Normalizes platform touches (or mouse buttons on desktop) into [`TouchFrame`] every frame.
#[derive(Default)]
pub struct TouchInputPlugin;

impl Plugin for TouchInputPlugin {
    fn build(&self, app: &mut App) {
        app.register_type::<TouchInputConfig>()
            .register_type::<TouchRecord>()
            .init_resource::<TouchInputConfig>()
            .init_resource::<TouchFrame>()
            .configure_sets(PreUpdate, TouchInputSystemSet.after(InputSystem))
            .add_systems(PreUpdate, gather_touches.in_set(TouchInputSystemSet));
    }
}
