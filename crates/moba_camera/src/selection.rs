use bevy::prelude::*;
use touch_input::{TouchPhase, TouchRecord};

use crate::{
    components::MobaCamera,
    raycast::{InterestLayer, ScreenRaycast},
    settings::SelectionSettings,
};

impl MobaCamera {
    /// Long press state machine: press, hold still past the threshold, cast against the point of
    /// interest layer, then fly there. Returns the hit point on the frame a target gets selected.
    pub(crate) fn select_target(
        &mut self,
        settings: &SelectionSettings,
        touches: &[TouchRecord],
        elapsed: f32,
        raycast: &impl ScreenRaycast,
    ) -> Option<Vec3> {
        // the apply pass ends the flight once the camera reaches the floor
        if self.selection.moving_to_target {
            self.state.changed = true;
        }

        let [touch] = touches else { return None };
        let selection = &mut self.selection;

        if touch.phase == TouchPhase::Began && selection.press_started.is_none() {
            selection.press_started = Some(elapsed);
        } else if touch.phase == TouchPhase::Stationary && selection.press_started.is_some() {
            let held_long_enough = selection
                .press_started
                .is_some_and(|started| elapsed - started > settings.hold_threshold);
            if held_long_enough && !selection.moving_to_target {
                selection.cast_pending = true;
            }
        } else if touch.phase == TouchPhase::Ended
            || (selection.press_started.is_some() && touch.phase != TouchPhase::Stationary)
        {
            selection.reset_press();
        }

        if !selection.cast_pending {
            return None;
        }

        let hit = raycast.cast(touch.position, InterestLayer::PointOfInterest)?;
        selection.reset_press();
        selection.moving_to_target = true;
        selection.selected_target = Some(hit);
        self.state.changed = true;
        Some(hit)
    }
}
