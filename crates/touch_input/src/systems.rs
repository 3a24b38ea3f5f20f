use bevy::{input::mouse::MouseMotion, prelude::*, utils::HashMap, window::PrimaryWindow};

use super::components::*;

/// the three mouse buttons standing in for fingers 0, 1 and 2
const EMULATED_BUTTONS: [MouseButton; 3] = [MouseButton::Left, MouseButton::Right, MouseButton::Middle];

/// Zeroes jitter on each axis. Wide screens get the wider deadzone on top of the narrow one.
pub fn filter_touch_delta(delta: Vec2, wide_screen: bool, config: &TouchInputConfig) -> Vec2 {
    let filter = |d: f32| {
        if d.abs() <= config.touch_dead_zone || (wide_screen && d.abs() <= config.wide_touch_dead_zone) {
            0.0
        } else {
            d
        }
    };
    Vec2::new(filter(delta.x), filter(delta.y))
}

/// Applies the deadzone and downgrades a barely-moving touch to stationary.
pub fn normalize_touch(mut touch: TouchRecord, wide_screen: bool, config: &TouchInputConfig) -> TouchRecord {
    touch.delta = filter_touch_delta(touch.delta, wide_screen, config);

    if touch.phase == TouchPhase::Moved
        && touch.delta.x.abs() < config.stationary_threshold
        && touch.delta.y.abs() < config.stationary_threshold
    {
        touch.phase = TouchPhase::Stationary;
    }
    touch
}

/// Number of emulated fingers: one past the highest button that is held or was just released.
pub fn emulated_touch_count(buttons: &ButtonInput<MouseButton>) -> usize {
    EMULATED_BUTTONS
        .iter()
        .rposition(|b| buttons.pressed(*b) || buttons.just_released(*b))
        .map_or(0, |i| i + 1)
}

/// Builds touch records out of mouse button state. Every emulated finger shares the cursor
/// position and the frame's mouse delta.
pub fn emulate_mouse_touches(
    buttons: &ButtonInput<MouseButton>,
    mouse_delta: Vec2,
    cursor: Vec2,
    dt: f32,
    config: &TouchInputConfig,
) -> Vec<TouchRecord> {
    let dead = |d: f32| if d.abs() <= config.mouse_dead_zone { 0.0 } else { d };
    let delta = Vec2::new(dead(mouse_delta.x), dead(mouse_delta.y));

    (0..emulated_touch_count(buttons))
        .map(|index| {
            let button = EMULATED_BUTTONS[index];
            let phase = if buttons.just_pressed(button) {
                TouchPhase::Began
            } else if buttons.just_released(button) {
                TouchPhase::Ended
            } else if buttons.pressed(button) {
                if delta != Vec2::ZERO {
                    TouchPhase::Moved
                } else {
                    TouchPhase::Stationary
                }
            } else {
                TouchPhase::Canceled
            };

            TouchRecord {
                id: index as u64,
                position: cursor,
                delta,
                delta_time: dt,
                phase,
                tap_count: 1,
            }
        })
        .collect()
}

/// Refreshes [`TouchFrame`] from whichever backend [`TouchInputConfig::mode`] selects.
#[allow(clippy::too_many_arguments)]
pub(crate) fn gather_touches(
    time: Res<Time>,
    config: Res<TouchInputConfig>,
    touches: Res<Touches>,
    buttons: Res<ButtonInput<MouseButton>>,
    mut mouse_events: EventReader<MouseMotion>,
    window_q: Query<&Window, With<PrimaryWindow>>,
    mut frame: ResMut<TouchFrame>,
    mut last_positions: Local<HashMap<u64, Vec2>>,
) {
    let dt = time.delta_seconds();
    let window = window_q.get_single().ok();
    let mouse_delta: Vec2 = mouse_events.read().fold(Vec2::ZERO, |acc, evt| acc + evt.delta);

    frame.viewport_size = window.map_or(Vec2::ZERO, |w| Vec2::new(w.width(), w.height()));

    let records = match config.mode {
        InputMode::Touch => {
            frame.cursor = None;
            let wide_screen = window.is_some_and(|w| w.width() > config.wide_screen_width);

            let mut raw: Vec<(&bevy::input::touch::Touch, TouchPhase)> = touches
                .iter()
                .map(|t| {
                    let phase = if touches.just_pressed(t.id()) {
                        TouchPhase::Began
                    } else {
                        TouchPhase::Moved
                    };
                    (t, phase)
                })
                .chain(touches.iter_just_released().map(|t| (t, TouchPhase::Ended)))
                .chain(touches.iter_just_canceled().map(|t| (t, TouchPhase::Canceled)))
                .collect();
            raw.sort_by_key(|(t, _)| t.id());

            let records: Vec<TouchRecord> = raw
                .into_iter()
                .map(|(t, phase)| {
                    let position = t.position();
                    let delta = last_positions.get(&t.id()).map_or(Vec2::ZERO, |last| position - *last);
                    let phase = match phase {
                        TouchPhase::Moved if delta == Vec2::ZERO => TouchPhase::Stationary,
                        other => other,
                    };
                    let record = TouchRecord {
                        id: t.id(),
                        position,
                        delta,
                        delta_time: dt,
                        phase,
                        tap_count: 1,
                    };
                    normalize_touch(record, wide_screen, &config)
                })
                .collect();

            last_positions.clear();
            for t in touches.iter() {
                last_positions.insert(t.id(), t.position());
            }
            records
        }
        InputMode::Mouse => {
            frame.cursor = window.and_then(Window::cursor_position);
            let cursor = frame.cursor.unwrap_or_default();
            emulate_mouse_touches(&buttons, mouse_delta, cursor, dt, &config)
        }
    };

    frame.replace(records);
}
